//! Extraction of Mac extension attribute scripts.
//!
//! A computer extension attribute may define several `<input_type>`
//! elements, one per platform. An input type is extracted when, scanning its
//! immediate children once in document order, a `<type>` child reads
//! `script` and a `<platform>` child reads `Mac`. Its `<script>` text is
//! then written to `<attribute name>.txt` in the output directory.
//!
//! Edge cases kept from the long-standing behavior of this tool:
//! - several `<script>` children: the last one scanned wins;
//! - a matching input type without `<script>`: an empty file is written;
//! - two attributes with the same name: the later one overwrites the file.
//!
//! Write failures are logged and counted; they do not stop the batch.

use std::path::{Path, PathBuf};

use crate::client::JssClient;
use crate::error::{JssError, Result};
use crate::resource::ResourceRef;
use crate::xml::XmlElement;

/// Collection path for computer extension attributes.
pub const EXTENSION_ATTRIBUTES_PATH: &str = "/JSSResource/computerextensionattributes";

const ITEM_TAG: &str = "computer_extension_attribute";

/// Result of scanning one `<input_type>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputType {
    /// Last `<type>` text seen, if any.
    pub kind: Option<String>,
    /// Last `<platform>` text seen, if any.
    pub platform: Option<String>,
    /// Last `<script>` text seen, if any.
    pub script: Option<String>,
    /// Some `<type>` child read exactly `script`.
    pub is_script: bool,
    /// Some `<platform>` child read exactly `Mac`.
    pub is_mac: bool,
}

impl InputType {
    /// Scans the immediate children of an `<input_type>` element.
    pub fn scan(el: &XmlElement) -> Self {
        let mut input = InputType::default();
        for child in &el.children {
            let text = child.text_or_empty();
            match child.tag.as_str() {
                "type" => {
                    input.is_script |= text == "script";
                    input.kind = Some(text.to_string());
                }
                "platform" => {
                    input.is_mac |= text == "Mac";
                    input.platform = Some(text.to_string());
                }
                "script" => input.script = Some(text.to_string()),
                _ => {}
            }
        }
        input
    }

    /// The script body to save, when this is a Mac script input type.
    ///
    /// A matching input type without a `<script>` child yields `""`.
    pub fn mac_script(&self) -> Option<&str> {
        (self.is_script && self.is_mac).then(|| self.script.as_deref().unwrap_or(""))
    }
}

/// A computer extension attribute with its input types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionAttribute {
    /// Display name; also the output file stem.
    pub name: String,
    /// Scanned `<input_type>` children in document order.
    pub input_types: Vec<InputType>,
}

impl ExtensionAttribute {
    /// Reads a `<computer_extension_attribute>` record.
    pub fn from_element(el: &XmlElement) -> Result<Self> {
        let name = el
            .find_text("name")
            .ok_or_else(|| JssError::missing("name", ITEM_TAG))?
            .to_string();
        let input_types = el.children_named("input_type").map(InputType::scan).collect();
        Ok(ExtensionAttribute { name, input_types })
    }
}

/// Outcome of an extraction run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Files written successfully, in write order. A path appears twice
    /// when a later attribute overwrote it.
    pub written: Vec<PathBuf>,
    /// Files that could not be written.
    pub failed: Vec<PathBuf>,
}

impl ExtractionSummary {
    /// Number of successful writes.
    pub fn files_written(&self) -> usize {
        self.written.len()
    }
}

/// Fetches every computer extension attribute with its input types.
///
/// List entries that already embed `<input_type>` elements are used as
/// they are. Plain `{id, name}` summaries are followed up with
/// `GET /JSSResource/computerextensionattributes/id/{id}`.
pub async fn list_extension_attributes(client: &JssClient) -> Result<Vec<ExtensionAttribute>> {
    let list = client.fetch_path(EXTENSION_ATTRIBUTES_PATH, &[]).await?;
    let mut attributes = Vec::new();
    for entry in list.children_named(ITEM_TAG) {
        if entry.child("input_type").is_some() {
            attributes.push(ExtensionAttribute::from_element(entry)?);
            continue;
        }
        let summary = ResourceRef::from_element(entry, ITEM_TAG)?;
        let id = summary.id.to_string();
        let full = client
            .fetch_path("JSSResource/computerextensionattributes/id", &[id.as_str()])
            .await?;
        attributes.push(ExtensionAttribute::from_element(&full)?);
    }
    tracing::debug!(count = attributes.len(), "fetched extension attributes");
    Ok(attributes)
}

/// Creates `dir` (and parents) unless it already exists.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(|source| JssError::OutputDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// `<dir>/<name>.txt`.
pub fn script_file_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.txt"))
}

/// Writes one script body, replacing any existing file.
pub fn write_script(path: &Path, body: &str) -> Result<()> {
    std::fs::write(path, body).map_err(|source| JssError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes the Mac script of every matching input type into `dir`.
///
/// Each failed write is logged and recorded in the summary; the remaining
/// attributes are still processed.
pub fn save_scripts(attributes: &[ExtensionAttribute], dir: &Path) -> ExtractionSummary {
    let mut summary = ExtractionSummary::default();
    for attribute in attributes {
        for input in &attribute.input_types {
            let Some(body) = input.mac_script() else {
                continue;
            };
            let path = script_file_path(dir, &attribute.name);
            match write_script(&path, body) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "saved extension attribute script");
                    summary.written.push(path);
                }
                Err(e) => {
                    tracing::error!("{e}");
                    summary.failed.push(path);
                }
            }
        }
    }
    summary
}

/// Creates `output_dir`, fetches all extension attributes and saves their
/// Mac scripts.
///
/// # Errors
///
/// - `JssError::OutputDir`: the directory could not be created.
/// - Any request, parse or missing-element error while fetching.
///
/// Individual file write failures are not errors; see
/// [`ExtractionSummary::failed`].
pub async fn run(client: &JssClient, output_dir: &Path) -> Result<ExtractionSummary> {
    ensure_output_dir(output_dir)?;
    let attributes = list_extension_attributes(client).await?;
    Ok(save_scripts(&attributes, output_dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(xml: &str) -> InputType {
        InputType::scan(&XmlElement::parse(xml, "test").unwrap())
    }

    fn attribute(name: &str, inputs: &[&str]) -> ExtensionAttribute {
        ExtensionAttribute {
            name: name.to_string(),
            input_types: inputs.iter().map(|x| input(x)).collect(),
        }
    }

    #[test]
    fn mac_script_matches() {
        let it = input(
            "<input_type><type>script</type><platform>Mac</platform>\
             <script>#!/bin/sh\necho \"&lt;result&gt;ok&lt;/result&gt;\"</script></input_type>",
        );
        assert!(it.is_script && it.is_mac);
        assert_eq!(it.mac_script(), Some("#!/bin/sh\necho \"<result>ok</result>\""));
    }

    #[test]
    fn windows_script_is_never_extracted() {
        let it = input(
            "<input_type><type>script</type><platform>Windows</platform>\
             <script>echo hi</script></input_type>",
        );
        assert!(it.is_script);
        assert!(!it.is_mac);
        assert_eq!(it.mac_script(), None);
    }

    #[test]
    fn non_script_type_is_not_extracted() {
        let it = input("<input_type><type>Text Field</type><platform>Mac</platform></input_type>");
        assert_eq!(it.mac_script(), None);
    }

    #[test]
    fn mac_script_without_body_is_empty() {
        let it = input("<input_type><type>script</type><platform>Mac</platform></input_type>");
        assert_eq!(it.mac_script(), Some(""));
    }

    #[test]
    fn last_script_child_wins() {
        let it = input(
            "<input_type><script>first</script><type>script</type>\
             <platform>Mac</platform><script>second</script></input_type>",
        );
        assert_eq!(it.mac_script(), Some("second"));
    }

    #[test]
    fn values_are_case_sensitive() {
        let it = input("<input_type><type>Script</type><platform>mac</platform></input_type>");
        assert!(!it.is_script);
        assert!(!it.is_mac);
    }

    #[test]
    fn attribute_reads_all_input_types() {
        let el = XmlElement::parse(
            "<computer_extension_attribute><id>3</id><name>Battery</name>\
             <input_type><type>script</type><platform>Mac</platform><script>a</script></input_type>\
             <input_type><type>script</type><platform>Windows</platform><script>b</script></input_type>\
             </computer_extension_attribute>",
            "test",
        )
        .unwrap();
        let attr = ExtensionAttribute::from_element(&el).unwrap();
        assert_eq!(attr.name, "Battery");
        assert_eq!(attr.input_types.len(), 2);
        assert_eq!(attr.input_types[1].platform.as_deref(), Some("Windows"));
    }

    #[test]
    fn save_scripts_writes_only_mac_scripts() {
        let dir = tempfile::tempdir().unwrap();
        let attrs = vec![
            attribute(
                "Battery",
                &["<input_type><type>script</type><platform>Mac</platform><script>pmset</script></input_type>"],
            ),
            attribute(
                "Defender",
                &["<input_type><type>script</type><platform>Windows</platform><script>echo hi</script></input_type>"],
            ),
        ];
        let summary = save_scripts(&attrs, dir.path());
        assert_eq!(summary.files_written(), 1);
        assert_eq!(std::fs::read_to_string(dir.path().join("Battery.txt")).unwrap(), "pmset");
        assert!(!dir.path().join("Defender.txt").exists());
    }

    #[test]
    fn duplicate_names_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let mac = |body: &str| {
            format!("<input_type><type>script</type><platform>Mac</platform><script>{body}</script></input_type>")
        };
        let attrs = vec![
            attribute("Dup", &[mac("first").as_str()]),
            attribute("Dup", &[mac("second").as_str()]),
        ];
        let summary = save_scripts(&attrs, dir.path());
        assert_eq!(summary.files_written(), 2);
        assert_eq!(std::fs::read_to_string(dir.path().join("Dup.txt")).unwrap(), "second");
    }

    #[test]
    fn failed_write_does_not_stop_batch() {
        let dir = tempfile::tempdir().unwrap();
        let mac = "<input_type><type>script</type><platform>Mac</platform><script>x</script></input_type>";
        // A name pointing into a missing subdirectory cannot be written.
        let attrs = vec![
            attribute("missing/Broken", &[mac]),
            attribute("Good", &[mac]),
        ];
        let summary = save_scripts(&attrs, dir.path());
        assert_eq!(summary.files_written(), 1);
        assert_eq!(summary.failed, vec![dir.path().join("missing/Broken.txt")]);
        assert!(dir.path().join("Good.txt").exists());
    }

    #[test]
    fn ensure_output_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a/b/ext_att_scripts");
        ensure_output_dir(&out).unwrap();
        ensure_output_dir(&out).unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn ensure_output_dir_fails_when_path_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("taken");
        std::fs::write(&file, "").unwrap();
        let err = ensure_output_dir(&file).unwrap_err();
        assert!(matches!(err, JssError::OutputDir { .. }));
    }
}
