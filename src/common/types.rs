use serde::Serialize;

/// Line accounting for one parsed feed document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    pub lines_read: usize,
    pub records_kept: usize,
    pub lines_dropped: usize,
}

/// Dashboard overview numbers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverviewStats {
    pub total_papers: usize,
    pub total_categories: usize,
    pub available_dates: usize,
    pub latest_date: Option<String>,
}
