//! Policy script enumeration.
//!
//! Lists every policy on the server (including those created through Casper
//! Remote, which the web interface hides) together with the scripts each
//! one runs:
//!
//! 1. `GET /JSSResource/policies`: `{id, name}` for every policy.
//! 2. For each policy, `GET /JSSResource/policies/id/{id}/subset/scripts`.
//! 3. When the subset's `<size>` is not `"0"`, yield one
//!    [`PolicyScript`] per `<script>` in document order.
//!
//! That is N+1 requests for N policies, issued one at a time.

use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;

use crate::client::JssClient;
use crate::error::{JssError, Result};
use crate::resource::{ResourceRef, list_refs};
use crate::xml::XmlElement;

/// Collection path for policies.
pub const POLICIES_PATH: &str = "/JSSResource/policies";

/// Width of the policy name column in the text listing.
pub const POLICY_COLUMN_WIDTH: usize = 60;

/// Width of the script name column in the text listing.
pub const SCRIPT_COLUMN_WIDTH: usize = 30;

/// A policy's `scripts` subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSubset {
    /// The `<scripts><size>` text exactly as the server sent it.
    pub size: String,
    /// Script names in document order.
    pub scripts: Vec<String>,
}

impl ScriptSubset {
    /// Reads the subset from a `policies/id/{id}/subset/scripts` response.
    ///
    /// `context` names the policy in errors.
    pub fn from_element(root: &XmlElement, context: &str) -> Result<Self> {
        let size = root
            .find_text("scripts/size")
            .ok_or_else(|| JssError::missing("scripts/size", context))?
            .to_string();
        let scripts = root
            .find_all("scripts/script")
            .into_iter()
            .map(|s| {
                s.find_text("name")
                    .map(str::to_string)
                    .ok_or_else(|| JssError::missing("scripts/script/name", context))
            })
            .collect::<Result<_>>()?;
        Ok(ScriptSubset { size, scripts })
    }

    /// Whether the policy carries scripts.
    ///
    /// `size` is compared as a string against the literal `"0"`, so values
    /// such as `"00"` or `"0 "` count as non-empty.
    pub fn has_scripts(&self) -> bool {
        self.size != "0"
    }
}

/// One (policy, script) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyScript {
    /// Name of the policy.
    pub policy_name: String,
    /// Name of a script the policy runs.
    pub script_name: String,
}

/// Renders the pair as one row of the fixed-width listing.
impl fmt::Display for PolicyScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<pw$} {:<sw$} ",
            self.policy_name,
            self.script_name,
            pw = POLICY_COLUMN_WIDTH,
            sw = SCRIPT_COLUMN_WIDTH
        )
    }
}

/// Fetches the `scripts` subset for one policy.
pub async fn get_script_subset(client: &JssClient, policy_id: i64) -> Result<ScriptSubset> {
    let id = policy_id.to_string();
    let root = client
        .fetch_path("JSSResource/policies/id", &[id.as_str(), "subset/scripts"])
        .await?;
    ScriptSubset::from_element(&root, &format!("policy {policy_id}"))
}

/// Lazily walks policies and yields their scripts.
///
/// The policy list is fetched on the first call to [`next`](Self::next);
/// each policy's subset is fetched only when the pairs before it have been
/// consumed. Once exhausted the enumerator keeps returning `None`.
pub struct PolicyScriptEnumerator<'a> {
    client: &'a JssClient,
    policies: Option<std::vec::IntoIter<ResourceRef>>,
    pending: VecDeque<PolicyScript>,
}

impl<'a> PolicyScriptEnumerator<'a> {
    /// Creates an enumerator. No request is sent until `next()`.
    pub fn new(client: &'a JssClient) -> Self {
        PolicyScriptEnumerator {
            client,
            policies: None,
            pending: VecDeque::new(),
        }
    }

    /// Returns the next pair, or `None` when every policy has been visited.
    ///
    /// # Errors
    ///
    /// Any request, parse or missing-element error from the list or subset
    /// calls. The run is expected to stop on the first error.
    pub async fn next(&mut self) -> Result<Option<PolicyScript>> {
        loop {
            if let Some(pair) = self.pending.pop_front() {
                return Ok(Some(pair));
            }

            if self.policies.is_none() {
                let refs = list_refs(self.client, POLICIES_PATH, "policy").await?;
                tracing::debug!(count = refs.len(), "fetched policy list");
                self.policies = Some(refs.into_iter());
            }

            let Some(policy) = self.policies.as_mut().and_then(Iterator::next) else {
                return Ok(None);
            };

            let subset = get_script_subset(self.client, policy.id).await?;
            if !subset.has_scripts() {
                tracing::debug!(id = policy.id, name = %policy.name, "policy has no scripts");
                continue;
            }
            self.pending
                .extend(subset.scripts.into_iter().map(|script_name| PolicyScript {
                    policy_name: policy.name.clone(),
                    script_name,
                }));
        }
    }

    /// Drains the enumerator into a vector.
    pub async fn collect_all(mut self) -> Result<Vec<PolicyScript>> {
        let mut out = Vec::new();
        while let Some(pair) = self.next().await? {
            out.push(pair);
        }
        Ok(out)
    }
}
