// User resource HTTP client
//
// Wraps `reqwest::Client` with the one request this system makes: a GET of
// a fixed endpoint that answers with a JSON array of user records.

use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::User;
use crate::transport::TransportConfig;

/// Endpoint queried when no other is configured.
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/users";

/// Raw HTTP client for the remote user resource.
///
/// Every call is a single request-response cycle. There is no retry and
/// no cancellation; a caller that wants another attempt calls again.
#[derive(Debug, Clone)]
pub struct UsersClient {
    http: reqwest::Client,
    endpoint: Url,
    timeout: Option<Duration>,
}

impl UsersClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(endpoint: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            endpoint,
            timeout: Some(transport.timeout),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, endpoint: Url) -> Self {
        Self {
            http,
            endpoint,
            timeout: None,
        }
    }

    /// Parse `endpoint` and wrap a pre-built `reqwest::Client`.
    pub fn from_reqwest(endpoint: &str, http: reqwest::Client) -> Result<Self, Error> {
        let endpoint = Url::parse(endpoint)?;
        Ok(Self::with_client(http, endpoint))
    }

    /// The endpoint this client queries.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch the user list.
    ///
    /// A non-2xx status is reported as [`Error::Status`] without reading the
    /// body. A 2xx body that is not a JSON array of users is reported as
    /// [`Error::Deserialization`].
    pub async fn list_users(&self) -> Result<Vec<User>, Error> {
        debug!("GET {}", self.endpoint);

        let resp = self
            .http
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: self.endpoint.to_string(),
            });
        }

        let body = resp.text().await.map_err(|e| self.transport_error(e))?;

        let users: Vec<User> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            })?;

        debug!(count = users.len(), "user list received");
        Ok(users)
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        match self.timeout {
            Some(timeout) if err.is_timeout() => Error::Timeout {
                timeout_secs: timeout.as_secs(),
            },
            _ => Error::Transport(err),
        }
    }
}
