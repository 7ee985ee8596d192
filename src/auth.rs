//! Credential resolution for HTTP Basic authentication.
//!
//! The Classic API authenticates every request with Basic auth, so the only
//! state needed is a username and password. [`CredentialResolver`] obtains
//! them once per run: preset values (CLI flags, environment, config file)
//! are used when present and whatever is still missing is prompted for.
//! The result is cached so later calls never prompt again.

use std::fmt;

use crate::error::{JssError, Result};
use crate::prompt::Prompt;

const USERNAME_PROMPT: &str = "Enter JSS Username: ";
const PASSWORD_PROMPT: &str = "Enter JSS Password: ";

/// Username and password for the Jamf Pro API account.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// API account name.
    pub username: String,
    /// API account password.
    pub password: String,
}

impl Credentials {
    /// Builds credentials from any string-like values.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Keeps the password out of debug logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Resolves [`Credentials`] at most once.
///
/// Invariants:
/// - `cached` is `None` until the first successful `resolve()`.
/// - After that, `resolve()` returns a clone of `cached` without touching
///   the prompt.
#[derive(Default)]
pub struct CredentialResolver {
    username: Option<String>,
    password: Option<String>,
    cached: Option<Credentials>,
}

impl CredentialResolver {
    /// Creates a resolver with optional preset values. A `None` field is
    /// prompted for on the first `resolve()`.
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        CredentialResolver {
            username,
            password,
            cached: None,
        }
    }

    /// Returns the credentials for this run, prompting for missing parts
    /// the first time only.
    ///
    /// # Errors
    ///
    /// `JssError::Configuration` if reading from the prompt fails (for
    /// example stdin is closed).
    pub fn resolve(&mut self, prompt: &mut dyn Prompt) -> Result<Credentials> {
        if let Some(creds) = &self.cached {
            return Ok(creds.clone());
        }

        let username = match &self.username {
            Some(u) => u.clone(),
            None => prompt.read_line(USERNAME_PROMPT).map_err(input_error)?,
        };
        let password = match &self.password {
            Some(p) => p.clone(),
            None => prompt.read_password(PASSWORD_PROMPT).map_err(input_error)?,
        };

        let creds = Credentials { username, password };
        self.username = None;
        self.password = None;
        self.cached = Some(creds.clone());
        Ok(creds)
    }

    /// The cached credentials, if `resolve()` has already succeeded.
    pub fn cached(&self) -> Option<&Credentials> {
        self.cached.as_ref()
    }
}

fn input_error(e: std::io::Error) -> JssError {
    JssError::Configuration {
        message: "unable to read credentials".to_string(),
        source: Some(Box::new(e)),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io;

    /// Answers prompts from a queue and records what was asked.
    #[derive(Default)]
    pub(crate) struct ScriptedPrompt {
        pub answers: VecDeque<String>,
        pub asked: Vec<String>,
    }

    impl ScriptedPrompt {
        pub fn with_answers(answers: &[&str]) -> Self {
            ScriptedPrompt {
                answers: answers.iter().map(|a| a.to_string()).collect(),
                asked: Vec::new(),
            }
        }

        fn next(&mut self, prompt: &str) -> io::Result<String> {
            self.asked.push(prompt.to_string());
            self.answers
                .pop_front()
                .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))
        }
    }

    impl Prompt for ScriptedPrompt {
        fn read_line(&mut self, prompt: &str) -> io::Result<String> {
            self.next(prompt)
        }

        fn read_password(&mut self, prompt: &str) -> io::Result<String> {
            self.next(prompt)
        }
    }

    #[test]
    fn nothing_cached_before_resolve() {
        let resolver = CredentialResolver::default();
        assert!(resolver.cached().is_none());
    }

    #[test]
    fn prompts_for_both_when_no_presets() {
        let mut prompt = ScriptedPrompt::with_answers(&["admin", "pw"]);
        let mut resolver = CredentialResolver::default();
        let creds = resolver.resolve(&mut prompt).unwrap();
        assert_eq!(creds, Credentials::new("admin", "pw"));
        assert_eq!(prompt.asked, vec![USERNAME_PROMPT, PASSWORD_PROMPT]);
    }

    #[test]
    fn second_resolve_does_not_prompt() {
        let mut prompt = ScriptedPrompt::with_answers(&["admin", "pw"]);
        let mut resolver = CredentialResolver::default();
        let first = resolver.resolve(&mut prompt).unwrap();
        let second = resolver.resolve(&mut prompt).unwrap();
        assert_eq!(first, second);
        assert_eq!(prompt.asked.len(), 2, "no prompts after the first resolve");
    }

    #[test]
    fn preset_username_only_prompts_for_password() {
        let mut prompt = ScriptedPrompt::with_answers(&["pw"]);
        let mut resolver = CredentialResolver::new(Some("reader".into()), None);
        let creds = resolver.resolve(&mut prompt).unwrap();
        assert_eq!(creds.username, "reader");
        assert_eq!(creds.password, "pw");
        assert_eq!(prompt.asked, vec![PASSWORD_PROMPT]);
    }

    #[test]
    fn full_presets_never_prompt() {
        let mut prompt = ScriptedPrompt::default();
        let mut resolver = CredentialResolver::new(Some("u".into()), Some("p".into()));
        resolver.resolve(&mut prompt).unwrap();
        assert!(prompt.asked.is_empty());
    }

    #[test]
    fn closed_stdin_is_a_configuration_error() {
        let mut prompt = ScriptedPrompt::default();
        let err = CredentialResolver::default().resolve(&mut prompt).unwrap_err();
        assert!(matches!(err, JssError::Configuration { .. }));
    }

    #[test]
    fn failed_prompt_keeps_preset_username_for_retry() {
        let mut resolver = CredentialResolver::new(Some("reader".into()), None);

        let mut closed = ScriptedPrompt::default();
        assert!(resolver.resolve(&mut closed).is_err());
        assert!(resolver.cached().is_none());

        let mut prompt = ScriptedPrompt::with_answers(&["pw"]);
        let creds = resolver.resolve(&mut prompt).unwrap();
        assert_eq!(creds, Credentials::new("reader", "pw"));
        assert_eq!(prompt.asked, vec![PASSWORD_PROMPT]);
    }

    #[test]
    fn debug_output_redacts_password() {
        let dbg = format!("{:?}", Credentials::new("admin", "hunter2"));
        assert!(dbg.contains("admin"));
        assert!(!dbg.contains("hunter2"));
    }
}
