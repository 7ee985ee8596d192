//! Lightweight handles into top-level Classic API collections.
//!
//! List endpoints (`/JSSResource/policies`,
//! `/JSSResource/computerextensionattributes`, ...) return a `<size>` element
//! followed by one summary element per record carrying just `<id>` and
//! `<name>`. The id is the only key usable to fetch anything further about
//! the record.

use crate::client::JssClient;
use crate::error::{JssError, Result};
use crate::xml::XmlElement;

/// `{id, name}` summary of one record in a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    /// Numeric record id.
    pub id: i64,
    /// Display name.
    pub name: String,
}

impl ResourceRef {
    /// Reads `<id>` and `<name>` from a summary element.
    ///
    /// `kind` names the record type in errors (e.g. `"policy"`).
    pub fn from_element(el: &XmlElement, kind: &str) -> Result<Self> {
        let id_text = el
            .find_text("id")
            .ok_or_else(|| JssError::missing("id", kind))?;
        let id: i64 = id_text
            .trim()
            .parse()
            .map_err(|_| JssError::missing("id", format!("{kind} (non-numeric id '{id_text}')")))?;
        let name = el
            .find_text("name")
            .ok_or_else(|| JssError::missing("name", format!("{kind} {id}")))?
            .to_string();
        Ok(ResourceRef { id, name })
    }
}

/// Collects every `item_tag` child of a list response, in document order.
pub fn refs_from_list(list: &XmlElement, item_tag: &str) -> Result<Vec<ResourceRef>> {
    list.children_named(item_tag)
        .map(|el| ResourceRef::from_element(el, item_tag))
        .collect()
}

/// Fetches a collection and returns its record handles.
pub async fn list_refs(client: &JssClient, path: &str, item_tag: &str) -> Result<Vec<ResourceRef>> {
    let list = client.fetch_path(path, &[]).await?;
    refs_from_list(&list, item_tag)
}
