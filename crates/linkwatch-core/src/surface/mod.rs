// ── Presentation surface ──
//
// Write-only sinks the controllers render into. Each region has exactly
// one writer: the banner belongs to the connectivity monitor, the results
// and error regions belong to the fetch controller. Implementations are
// supplied by the embedder (terminal, GUI, test double) and injected at
// construction.

mod memory;

use std::fmt;

use linkwatch_api::User;

pub use memory::{MemorySurface, ResultsView, SurfaceSnapshot};

/// Text of the status banner while it is visible.
pub const OFFLINE_BANNER_TEXT: &str = "You are currently offline";

/// The connectivity banner. Only its visibility is ever written.
pub trait StatusBanner: Send + Sync {
    fn set_visible(&self, visible: bool);
}

/// The replaceable list of fetched users.
pub trait ResultsRegion: Send + Sync {
    /// Remove all content.
    fn clear(&self);

    /// Replace the content with a single placeholder line.
    fn show_placeholder(&self, text: &str);

    /// Replace the content with `entries`, in order.
    fn show_entries(&self, entries: &[UserEntry]);
}

/// The replaceable error message.
pub trait ErrorRegion: Send + Sync {
    fn clear(&self);

    fn show(&self, message: &str);
}

/// Display form of one [`User`]: the name (rendered strong by sinks that can
/// style text) followed by the email in parentheses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEntry {
    pub name: String,
    pub email: String,
}

impl UserEntry {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl From<&User> for UserEntry {
    fn from(user: &User) -> Self {
        Self::new(user.name.clone(), user.email.clone())
    }
}

impl fmt::Display for UserEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.email)
    }
}
