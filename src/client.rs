//! Authenticated HTTP client for the Jamf Pro Classic API.
//!
//! `JssClient` wraps a `reqwest::Client` and the run's [`Session`]. Every
//! request is a single GET with HTTP Basic authorization; the response body
//! is parsed as XML and returned as an owned [`XmlElement`] tree.
//!
//! Failed requests (transport error or non-2xx status) are returned to the
//! caller as-is and never retried.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderValue};

use crate::error::{JssError, Result};
use crate::session::Session;
use crate::urls::compose_url;
use crate::xml::XmlElement;

/// Connect timeout for the Jamf Pro server.
/// Covers TCP + TLS handshake only; the request itself is unbounded.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the underlying `reqwest::Client`.
fn build_http_client() -> Result<Client> {
    Ok(Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .user_agent(concat!("jss-scripts/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Read-only client for one Jamf Pro server.
pub struct JssClient {
    client: Client,
    session: Session,
}

impl JssClient {
    /// Creates a client for the given session.
    ///
    /// # Errors
    ///
    /// `JssError::Network` if the TLS backend cannot be initialised.
    pub fn new(session: Session) -> Result<Self> {
        Ok(JssClient {
            client: build_http_client()?,
            session,
        })
    }

    /// The session this client authenticates with.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Composes a URL against the session base URL.
    pub fn url(&self, segment: &str, more: &[&str]) -> Result<String> {
        compose_url(&self.session.endpoint.base_url, segment, more)
    }

    /// Sends an authenticated GET to `url` and parses the body as XML.
    ///
    /// # Errors
    ///
    /// - `JssError::MissingUrl`: `url` is empty.
    /// - `JssError::Network`: transport failure.
    /// - `JssError::Request`: non-success status; body preserved.
    /// - `JssError::Parse`: body is not well-formed XML.
    pub async fn fetch(&self, url: &str) -> Result<XmlElement> {
        if url.is_empty() {
            return Err(JssError::MissingUrl);
        }

        tracing::debug!(%url, "GET");
        let creds = &self.session.credentials;
        let resp = self
            .client
            .get(url)
            .basic_auth(&creds.username, Some(&creds.password))
            .header(ACCEPT, HeaderValue::from_static("application/xml"))
            .send()
            .await?;

        // Read body before checking status so the server's diagnostic page
        // ends up in the error.
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            tracing::warn!(%url, %status, "request failed");
            return Err(JssError::Request {
                status,
                url: url.to_string(),
                body,
            });
        }

        XmlElement::parse(&body, url)
    }

    /// Composes a URL from path segments and fetches it.
    pub async fn fetch_path(&self, segment: &str, more: &[&str]) -> Result<XmlElement> {
        let url = self.url(segment, more)?;
        self.fetch(&url).await
    }
}
