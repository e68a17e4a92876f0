// ── Fetch error taxonomy ──
//
// Every way a fetch can fail, reduced to three kinds. The kinds only
// matter to diagnostics: the presentation surface shows one message for
// all of them. The `From<linkwatch_api::Error>` impl sorts transport-layer
// errors into the taxonomy.

use strum::{Display, IntoStaticStr};
use thiserror::Error;

/// Why a fetch ended in the `Error` state.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (unreachable, DNS, reset, timeout).
    #[error("transport failure: {message}")]
    Transport { message: String },

    /// The endpoint answered with a non-ok status.
    #[error("remote answered with HTTP {status}")]
    Application { status: u16 },

    /// The body was not the expected JSON list of users.
    #[error("malformed response body: {message}")]
    Parse { message: String },
}

/// Field-free discriminant of [`FetchError`], for structured log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum FetchErrorKind {
    Transport,
    Application,
    Parse,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Transport { .. } => FetchErrorKind::Transport,
            Self::Application { .. } => FetchErrorKind::Application,
            Self::Parse { .. } => FetchErrorKind::Parse,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<linkwatch_api::Error> for FetchError {
    fn from(err: linkwatch_api::Error) -> Self {
        // Any answer from the endpoint, even one surfaced by reqwest itself,
        // is an application failure.
        if let Some(status) = err.status() {
            return FetchError::Application { status };
        }
        match err {
            linkwatch_api::Error::Transport(ref e) if e.is_decode() => FetchError::Parse {
                message: e.to_string(),
            },
            linkwatch_api::Error::Deserialization { message, body: _ } => {
                FetchError::Parse { message }
            }
            other => FetchError::Transport {
                message: other.to_string(),
            },
        }
    }
}
