// In-memory presentation surface.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{ErrorRegion, OFFLINE_BANNER_TEXT, ResultsRegion, StatusBanner, UserEntry};

/// What the results region currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResultsView {
    #[default]
    Empty,
    Placeholder(String),
    Entries(Vec<UserEntry>),
}

impl ResultsView {
    /// Rendered entries, or an empty slice for any other view.
    pub fn entries(&self) -> &[UserEntry] {
        match self {
            Self::Entries(entries) => entries,
            Self::Empty | Self::Placeholder(_) => &[],
        }
    }

    /// One line per visible item, as a text surface would print them.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Empty => Vec::new(),
            Self::Placeholder(text) => vec![text.clone()],
            Self::Entries(entries) => entries.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Point-in-time copy of every region, plus how often each was written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceSnapshot {
    pub banner_visible: bool,
    pub results: ResultsView,
    pub error: Option<String>,
    pub banner_writes: usize,
    pub results_writes: usize,
    pub error_writes: usize,
}

impl SurfaceSnapshot {
    /// The banner text, if the banner is visible.
    pub fn banner_text(&self) -> Option<&'static str> {
        self.banner_visible.then_some(OFFLINE_BANNER_TEXT)
    }
}

/// A presentation surface that just remembers what it was told.
///
/// Implements all three region traits, so one `Arc<MemorySurface>` can be
/// handed to both controllers.
#[derive(Debug, Default)]
pub struct MemorySurface {
    state: Mutex<SurfaceSnapshot>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SurfaceSnapshot {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StatusBanner for MemorySurface {
    fn set_visible(&self, visible: bool) {
        let mut state = self.lock();
        state.banner_visible = visible;
        state.banner_writes += 1;
    }
}

impl ResultsRegion for MemorySurface {
    fn clear(&self) {
        let mut state = self.lock();
        state.results = ResultsView::Empty;
        state.results_writes += 1;
    }

    fn show_placeholder(&self, text: &str) {
        let mut state = self.lock();
        state.results = ResultsView::Placeholder(text.to_owned());
        state.results_writes += 1;
    }

    fn show_entries(&self, entries: &[UserEntry]) {
        let mut state = self.lock();
        state.results = ResultsView::Entries(entries.to_vec());
        state.results_writes += 1;
    }
}

impl ErrorRegion for MemorySurface {
    fn clear(&self) {
        let mut state = self.lock();
        state.error = None;
        state.error_writes += 1;
    }

    fn show(&self, message: &str) {
        let mut state = self.lock();
        state.error = Some(message.to_owned());
        state.error_writes += 1;
    }
}
