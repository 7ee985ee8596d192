//! Read-only client for the Jamf Pro Classic API (`/JSSResource`).
//!
//! Resolves credentials and the server URL once per run, fetches XML
//! resource collections with HTTP Basic authentication, and provides two
//! queries on top:
//!
//! - which policies run which scripts;
//! - the script bodies of Mac computer extension attributes, saved to disk.
//!
//! # Modules
//!
//! - [`auth`]: credential resolution and caching.
//! - [`client`]: authenticated XML GET client.
//! - [`config`]: optional TOML settings file.
//! - [`endpoint`]: server URL from Jamf preferences or prompt.
//! - [`error`]: typed error hierarchy (`JssError`).
//! - [`extension_attributes`]: Mac script extraction.
//! - [`policies`]: policy/script enumeration.
//! - [`prompt`]: interactive input abstraction.
//! - [`resource`]: `{id, name}` collection handles.
//! - [`session`]: per-run credentials + endpoint.
//! - [`urls`]: request URL composition.
//! - [`xml`]: owned XML element tree.
//!
//! # Quick Start
//!
//! ```ignore
//! use jss_scripts::auth::Credentials;
//! use jss_scripts::client::JssClient;
//! use jss_scripts::endpoint::Endpoint;
//! use jss_scripts::policies::PolicyScriptEnumerator;
//! use jss_scripts::session::Session;
//!
//! let session = Session::new(
//!     Credentials::new("api-reader", "secret"),
//!     Endpoint::new("https://jss.example.com:8443")?,
//! );
//! let client = JssClient::new(session)?;
//! let mut pairs = PolicyScriptEnumerator::new(&client);
//! while let Some(pair) = pairs.next().await? {
//!     println!("{pair}");
//! }
//! ```

#![warn(missing_docs)]

pub mod auth;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod extension_attributes;
pub mod policies;
pub mod prompt;
pub mod resource;
pub mod session;
pub mod urls;
pub mod xml;
