use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use super::{Action, Effect, Session};
use crate::common::format_date;
use crate::feed::{FeedLoader, FeedOutcome};

/// Quiet period before typed search text is applied
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Runs a [`Session`] against a stream of actions.
///
/// Fetches run on spawned tasks and come back as `FeedLoaded` actions, so a
/// slow load never blocks input. Search text is debounced; only the last
/// value typed within the quiet period is applied. Every state change is
/// published on the `watch` channel passed to [`Driver::run`].
pub struct Driver {
    loader: Arc<FeedLoader>,
    session: Session,
    search_delay: Duration,
    rng: StdRng,
}

impl Driver {
    pub fn new(loader: FeedLoader, session: Session) -> Self {
        Self {
            loader: Arc::new(loader),
            session,
            search_delay: SEARCH_DEBOUNCE,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_search_delay(mut self, delay: Duration) -> Self {
        self.search_delay = delay;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Process actions until the channel closes, then wait for pending
    /// search text and in-flight loads before returning the final session.
    pub async fn run(mut self, mut actions: mpsc::Receiver<Action>, updates: watch::Sender<Session>) -> Session {
        let (loaded_tx, mut loaded_rx) = mpsc::unbounded_channel::<Action>();
        let mut in_flight = 0usize;
        let mut actions_open = true;
        let mut pending_search: Option<String> = None;

        let debounce = tokio::time::sleep(Duration::ZERO);
        tokio::pin!(debounce);

        updates.send_replace(self.session.clone());

        loop {
            if !actions_open && in_flight == 0 && pending_search.is_none() {
                break;
            }

            tokio::select! {
                received = actions.recv(), if actions_open => match received {
                    Some(Action::SetSearchText(text)) => {
                        pending_search = Some(text);
                        debounce.as_mut().reset(Instant::now() + self.search_delay);
                    }
                    Some(action) => {
                        if self.dispatch(action, &updates, &loaded_tx) {
                            in_flight += 1;
                        }
                    }
                    None => actions_open = false,
                },
                Some(loaded) = loaded_rx.recv(), if in_flight > 0 => {
                    in_flight -= 1;
                    self.dispatch(loaded, &updates, &loaded_tx);
                }
                () = &mut debounce, if pending_search.is_some() => {
                    if let Some(text) = pending_search.take() {
                        self.dispatch(Action::SetSearchText(text), &updates, &loaded_tx);
                    }
                }
            }
        }

        self.session
    }

    /// Apply one action and publish the new state; true when a load was spawned
    fn dispatch(&mut self, action: Action, updates: &watch::Sender<Session>, loaded_tx: &mpsc::UnboundedSender<Action>) -> bool {
        let effect = self.session.apply(action, &mut self.rng);
        updates.send_replace(self.session.clone());

        let Some(Effect::LoadFeed { date, language, generation }) = effect else {
            return false;
        };

        debug!("Loading {} ({}) as generation {}", format_date(date), language, generation);
        let loader = Arc::clone(&self.loader);
        let tx = loaded_tx.clone();
        tokio::spawn(async move {
            let outcome = FeedOutcome::from_result(loader.load_feed(date, language).await);
            // The receiver lives as long as the driver loop
            let _ = tx.send(Action::FeedLoaded { generation, date, outcome });
        });
        true
    }
}
