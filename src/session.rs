//! Per-run session state.
//!
//! A [`Session`] is built once at startup from the resolved credentials and
//! endpoint and then handed to the [`JssClient`](crate::client::JssClient).
//! Nothing else in the crate holds connection state.

use crate::auth::{CredentialResolver, Credentials};
use crate::endpoint::{Endpoint, EndpointResolver};
use crate::error::Result;
use crate::prompt::Prompt;

/// Everything needed to talk to one Jamf Pro server for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Basic-auth account.
    pub credentials: Credentials,
    /// Server base URL.
    pub endpoint: Endpoint,
}

impl Session {
    /// Builds a session from already-known values.
    pub fn new(credentials: Credentials, endpoint: Endpoint) -> Self {
        Session {
            credentials,
            endpoint,
        }
    }

    /// Resolves credentials first, then the endpoint, prompting through
    /// `prompt` for anything not preset.
    pub fn resolve(
        credentials: &mut CredentialResolver,
        endpoint: &EndpointResolver,
        prompt: &mut dyn Prompt,
    ) -> Result<Self> {
        let credentials = credentials.resolve(prompt)?;
        let endpoint = endpoint.resolve(prompt)?;
        tracing::debug!(user = %credentials.username, url = %endpoint.base_url, "session resolved");
        Ok(Session::new(credentials, endpoint))
    }
}
