//! Dashboard session: filter and selection state driven by [`Action`]s.
//!
//! [`Session::apply`] is the only way state changes. Fetching is not done
//! here; a date selection returns an [`Effect`] that the caller (usually the
//! [`Driver`]) executes before feeding the result back as
//! [`Action::FeedLoaded`].

pub mod driver;

pub use driver::*;

use log::debug;
use rand::Rng;
use std::sync::Arc;
use time::Date;

use crate::common::{format_date, OverviewStats};
use crate::feed::{FeedOutcome, Language, Manifest};
use crate::index::{CategoryCounts, CategoryIndex, Paper, SortMode};
use crate::preferences::Preferences;
use crate::view::{filtered, page_count, page_of, FilterState, PageView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Discrete user actions, plus the internal load completion
#[derive(Debug, Clone)]
pub enum Action {
    SelectDate(Date),
    /// `None` shows all categories
    SelectCategory(Option<String>),
    /// Sidebar behaviour: selecting the active category clears it
    ToggleCategory(String),
    ToggleKeyword(String),
    ToggleAuthor(String),
    SetSearchText(String),
    SetSortMode(SortMode),
    SetPage(usize),
    /// Index into the full filtered sequence
    SelectPaper(usize),
    ClosePaper,
    NavigatePaper(Direction),
    RandomPaper,
    FeedLoaded {
        generation: u64,
        date: Date,
        outcome: FeedOutcome,
    },
}

/// Work requested by the reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadFeed {
        date: Date,
        language: Language,
        generation: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading { date: Date },
    Ready { papers: usize, dropped: usize },
    NoData { date: Date },
    Failed { date: Date, message: String },
}

/// Detail view state, indexing the full filtered sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Listing,
    Detail(usize),
}

#[derive(Debug, Clone)]
pub struct Session {
    manifest: Arc<Manifest>,
    preferred_language: Option<Language>,
    date: Option<Date>,
    language: Option<Language>,
    status: LoadStatus,
    generation: u64,
    index: CategoryIndex,
    filter: FilterState,
    filtered: Vec<Paper>,
    selection: Selection,
}

impl Session {
    pub fn new(manifest: Manifest, preferences: &Preferences, preferred_language: Option<Language>) -> Self {
        Self {
            manifest: Arc::new(manifest),
            preferred_language,
            date: None,
            language: None,
            status: LoadStatus::Idle,
            generation: 0,
            index: CategoryIndex::new(),
            filter: preferences.filter_state(),
            filtered: Vec::new(),
            selection: Selection::Listing,
        }
    }

    /// Apply one action; returns work for the caller when a fetch is needed
    pub fn apply<R: Rng + ?Sized>(&mut self, action: Action, rng: &mut R) -> Option<Effect> {
        match action {
            Action::SelectDate(date) => {
                self.generation += 1;
                let language = self.manifest.select_language(date, self.preferred_language);
                self.date = Some(date);
                self.language = Some(language);
                self.status = LoadStatus::Loading { date };
                return Some(Effect::LoadFeed {
                    date,
                    language,
                    generation: self.generation,
                });
            }
            Action::FeedLoaded {
                generation,
                date,
                outcome,
            } => self.finish_load(generation, date, outcome),
            Action::SelectCategory(category) => {
                if self.filter.selected_category != category {
                    self.filter.selected_category = category;
                    self.reset_listing();
                }
            }
            Action::ToggleCategory(category) => {
                let next = if self.filter.selected_category.as_deref() == Some(category.as_str()) {
                    None
                } else {
                    Some(category)
                };
                self.filter.selected_category = next;
                self.reset_listing();
            }
            Action::ToggleKeyword(keyword) => {
                self.filter.active_keywords.toggle(&keyword);
                self.reset_listing();
            }
            Action::ToggleAuthor(author) => {
                self.filter.active_authors.toggle(&author);
                self.reset_listing();
            }
            Action::SetSearchText(text) => {
                if self.filter.search_query != text {
                    self.filter.search_query = text;
                    self.reset_listing();
                }
            }
            Action::SetSortMode(mode) => {
                self.filter.sort_mode = Some(mode);
                self.index = self.index.resorted(mode);
                self.reset_listing();
            }
            Action::SetPage(page) => {
                if page >= 1 && page <= self.page_count() {
                    self.filter.page = page;
                }
            }
            Action::SelectPaper(index) => {
                if index < self.filtered.len() {
                    self.selection = Selection::Detail(index);
                }
            }
            Action::ClosePaper => self.selection = Selection::Listing,
            Action::NavigatePaper(direction) => self.navigate(direction),
            Action::RandomPaper => {
                if !self.filtered.is_empty() {
                    self.selection = Selection::Detail(rng.gen_range(0..self.filtered.len()));
                }
            }
        }
        None
    }

    fn finish_load(&mut self, generation: u64, date: Date, outcome: FeedOutcome) {
        if generation != self.generation {
            debug!(
                "Discarding stale load of {} (generation {}, current {})",
                format_date(date),
                generation,
                self.generation
            );
            return;
        }

        match outcome {
            FeedOutcome::Loaded(feed) => {
                let mut index = CategoryIndex::from_records(feed.records);
                if let Some(mode) = self.filter.sort_mode {
                    index = index.resorted(mode);
                }
                self.status = LoadStatus::Ready {
                    papers: index.len(),
                    dropped: feed.stats.lines_dropped,
                };
                self.language = Some(feed.language);
                self.index = index;
            }
            FeedOutcome::NoData => {
                self.status = LoadStatus::NoData { date };
                self.index = CategoryIndex::new();
            }
            FeedOutcome::Failed(message) => {
                self.status = LoadStatus::Failed { date, message };
                self.index = CategoryIndex::new();
            }
        }
        self.reset_listing();
    }

    fn navigate(&mut self, direction: Direction) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        let next = match (self.selection, direction) {
            (Selection::Listing, Direction::Next) => 0,
            (Selection::Listing, Direction::Previous) => len - 1,
            (Selection::Detail(i), Direction::Next) => (i + 1) % len,
            (Selection::Detail(i), Direction::Previous) => (i + len - 1) % len,
        };
        self.selection = Selection::Detail(next);
    }

    /// The filtered sequence changed: back to page 1 of the listing
    fn reset_listing(&mut self) {
        self.filtered = filtered(&self.index, &self.filter);
        self.filter.page = 1;
        self.selection = Selection::Listing;
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn date(&self) -> Option<Date> {
        self.date
    }

    pub fn language(&self) -> Option<Language> {
        self.language
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn index(&self) -> &CategoryIndex {
        &self.index
    }

    pub fn counts(&self) -> CategoryCounts {
        self.index.counts()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Full filtered sequence, all pages
    pub fn filtered(&self) -> &[Paper] {
        &self.filtered
    }

    pub fn page_count(&self) -> usize {
        page_count(self.filtered.len(), self.filter.page_size)
    }

    pub fn page(&self) -> PageView {
        page_of(&self.filtered, &self.filter)
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Selected paper and its position in the filtered sequence
    pub fn selected(&self) -> Option<(usize, &Paper)> {
        match self.selection {
            Selection::Listing => None,
            Selection::Detail(i) => self.filtered.get(i).map(|p| (i, p)),
        }
    }

    pub fn overview(&self) -> OverviewStats {
        OverviewStats {
            total_papers: self.index.len(),
            total_categories: self.index.category_count(),
            available_dates: self.manifest.len(),
            latest_date: self.manifest.latest().map(format_date),
        }
    }
}
