// linkwatch-core: Connectivity banner and on-demand fetch controller.

pub mod config;
pub mod connectivity;
pub mod error;
pub mod fetch;
pub mod surface;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ProbeSettings, TlsVerification, WatchConfig};
pub use connectivity::{
    ConnectivityMonitor, ConnectivitySignal, ConnectivitySource, ConnectivityState,
    ConnectivityStream, ManualSource, ObserverHandle, ProbeSource,
};
pub use error::{FetchError, FetchErrorKind};
pub use fetch::{
    FETCH_FAILED_MESSAGE, FetchController, FetchState, LOADING_PLACEHOLDER, TriggerOutcome,
    UserDirectory,
};
pub use surface::{
    ErrorRegion, MemorySurface, OFFLINE_BANNER_TEXT, ResultsRegion, ResultsView, StatusBanner,
    SurfaceSnapshot, UserEntry,
};

pub use linkwatch_api::User;
