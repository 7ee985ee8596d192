//! Typed error hierarchy for the jss-scripts crate.
//!
//! `JssError` covers every failure boundary the tool crosses: resolving the
//! session (credentials, endpoint), composing request URLs, talking to the
//! Jamf Pro Classic API, interpreting the XML it returns, and writing
//! extracted scripts to disk.
//!
//! Only `FileWrite` is treated as recoverable by the orchestration layer
//! (one bad file does not stop the batch). Everything else propagates to
//! `main`, which reports it and exits with a non-zero status.

use std::path::PathBuf;

use reqwest::StatusCode;

/// Unified error type for all jss-scripts operations.
#[derive(Debug, thiserror::Error)]
pub enum JssError {
    /// The session could not be resolved: the endpoint preference store was
    /// unreadable, `jss_url` was missing, the config file was malformed, or
    /// interactive input failed.
    #[error("configuration error: {message}")]
    Configuration {
        /// What was being resolved and why it failed.
        message: String,
        /// The underlying I/O or parse error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A request was attempted with an empty URL.
    #[error("Missing required URL component.")]
    MissingUrl,

    /// The base URL could not be parsed or a path could not be joined to it.
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        /// The offending base URL.
        url: String,
        /// Parser diagnostic.
        #[source]
        source: url::ParseError,
    },

    /// The server answered with a non-success HTTP status.
    ///
    /// The body is kept because the Classic API puts its diagnostic
    /// (e.g. "The server has not found anything matching the request URI")
    /// in an HTML or XML error page.
    #[error("request to {url} failed with {status}: {body}")]
    Request {
        /// HTTP status returned by the server.
        status: StatusCode,
        /// The full request URL.
        url: String,
        /// Raw response body, or an empty string if it could not be read.
        body: String,
    },

    /// Transport-level failure (DNS, TCP, TLS) with no HTTP status.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The policy listing could not be written to stdout.
    #[error("unable to write output: {0}")]
    Output(#[from] std::io::Error),

    /// The policy listing could not be rendered as JSON.
    #[error("unable to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The response body was not well-formed XML.
    #[error("failed to parse XML from {url}: {source}")]
    Parse {
        /// The request URL whose body failed to parse.
        url: String,
        /// Parser diagnostic with line/column information.
        #[source]
        source: roxmltree::Error,
    },

    /// The XML parsed but lacked an element the query depends on.
    #[error("missing <{element}> in {context}")]
    MissingElement {
        /// Element path that was expected (e.g. `scripts/size`).
        element: String,
        /// Where it was expected (e.g. `policy 12`).
        context: String,
    },

    /// The output directory for extracted scripts could not be created.
    #[error("Unable to create folder: '{}'.", path.display())]
    OutputDir {
        /// Directory that was being created.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// A single extracted script could not be written.
    #[error("Unable to write to file: '{}'.", path.display())]
    FileWrite {
        /// Target file.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
}

impl JssError {
    /// Shorthand for a `Configuration` error without an underlying cause.
    pub fn configuration(message: impl Into<String>) -> Self {
        JssError::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a `MissingElement` error.
    pub fn missing(element: impl Into<String>, context: impl Into<String>) -> Self {
        JssError::MissingElement {
            element: element.into(),
            context: context.into(),
        }
    }
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, JssError>;
