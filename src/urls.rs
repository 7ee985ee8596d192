//! Request URL composition.
//!
//! Path segments are joined the way a filesystem path is joined (a segment
//! starting with `/` restarts the path), and the result is then resolved
//! against the server base URL using RFC 3986 relative resolution. Segment
//! contents are not escaped: they are numeric ids and fixed literals.

use url::Url;

use crate::error::{JssError, Result};

/// Joins `segment` and `more` into one relative path.
///
/// Mirrors filesystem joining: no separator is inserted after a segment
/// that already ends in `/`, and an absolute segment discards everything
/// joined before it.
pub fn join_segments(segment: &str, more: &[&str]) -> String {
    let mut joined = segment.to_string();
    for part in more {
        if part.starts_with('/') {
            joined = (*part).to_string();
        } else if joined.is_empty() || joined.ends_with('/') {
            joined.push_str(part);
        } else {
            joined.push('/');
            joined.push_str(part);
        }
    }
    joined
}

/// Composes a request URL from a base URL and one or more path segments.
///
/// ```
/// use jss_scripts::urls::compose_url;
///
/// let url = compose_url("https://jss.example.com:8443", "JSSResource/policies/id", &["7", "subset/scripts"]).unwrap();
/// assert_eq!(url, "https://jss.example.com:8443/JSSResource/policies/id/7/subset/scripts");
/// ```
///
/// # Errors
///
/// `JssError::InvalidUrl` when `base` is not an absolute URL.
pub fn compose_url(base: &str, segment: &str, more: &[&str]) -> Result<String> {
    let invalid = |source| JssError::InvalidUrl {
        url: base.to_string(),
        source,
    };
    let base_url = Url::parse(base).map_err(invalid)?;
    let joined = base_url.join(&join_segments(segment, more)).map_err(invalid)?;
    Ok(joined.into())
}
