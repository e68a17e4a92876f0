// linkwatch-api: Async Rust client for the remote user resource.

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{DEFAULT_ENDPOINT, UsersClient};
pub use error::Error;
pub use models::User;
pub use transport::{TlsMode, TransportConfig};
