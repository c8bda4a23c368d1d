//! Incremental editor for the `cc` field.
//!
//! The server stores CC recipients as one comma-joined string. While a record
//! is being edited the addresses live here as an ordered, duplicate-free set,
//! and the string form is only ever produced by [`CcListEditor::serialize`].

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::warn;

static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@,]+@[^\s@,]+\.[^\s@,]+$").expect("email shape pattern is valid")
});

const SEPARATOR: char = ',';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CcListError {
    #[error("Email cannot be empty")]
    EmptyInput,
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
    #[error("Email already added: {0}")]
    DuplicateEntry(String),
}

pub fn is_email_shaped(candidate: &str) -> bool {
    EMAIL_SHAPE.is_match(candidate)
}

#[derive(Debug, Clone, Default)]
pub struct CcListEditor {
    pending: String,
    entries: IndexSet<String>,
    error: Option<CcListError>,
}

impl CcListEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the working set from a stored `cc` string. Entries are trimmed;
    /// blanks, repeats and addresses that fail the shape check are dropped.
    pub fn from_serialized(cc: &str) -> Self {
        let mut editor = Self::new();
        editor.load(cc);
        editor
    }

    /// Replaces the working set wholesale. `None` resets to empty.
    pub fn reinitialize(&mut self, cc: Option<&str>) {
        self.pending.clear();
        self.error = None;
        self.entries.clear();
        if let Some(cc) = cc {
            self.load(cc);
        }
    }

    fn load(&mut self, cc: &str) {
        for raw in cc.split(SEPARATOR) {
            let entry = raw.trim();
            if entry.is_empty() {
                continue;
            }
            if !is_email_shaped(entry) {
                warn!(entry = %entry, "Dropping malformed address from stored cc list.");
                continue;
            }
            self.entries.insert(entry.to_string());
        }
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn set_pending(&mut self, input: impl Into<String>) {
        self.pending = input.into();
    }

    /// Adds one address. On failure the set and pending input are left as they
    /// were and the error is kept for display.
    pub fn add(&mut self, candidate: &str) -> Result<(), CcListError> {
        let result = self.try_insert(candidate.trim());
        match &result {
            Ok(()) => {
                self.pending.clear();
                self.error = None;
            }
            Err(e) => self.error = Some(e.clone()),
        }
        result
    }

    /// Adds whatever is in the pending input.
    pub fn add_pending(&mut self) -> Result<(), CcListError> {
        let candidate = self.pending.clone();
        self.add(&candidate)
    }

    fn try_insert(&mut self, email: &str) -> Result<(), CcListError> {
        if email.is_empty() {
            return Err(CcListError::EmptyInput);
        }
        if !is_email_shaped(email) {
            return Err(CcListError::InvalidFormat(email.to_string()));
        }
        if self.entries.contains(email) {
            return Err(CcListError::DuplicateEntry(email.to_string()));
        }
        self.entries.insert(email.to_string());
        Ok(())
    }

    /// Exact-match removal; absent addresses are a no-op. Returns whether
    /// anything was removed.
    pub fn remove(&mut self, email: &str) -> bool {
        self.entries.shift_remove(email)
    }

    pub fn serialize(&self) -> String {
        self.entries
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn contains(&self, email: &str) -> bool {
        self.entries.contains(email)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn error(&self) -> Option<&CcListError> {
        self.error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_valid_addresses_grows_set() {
        let mut editor = CcListEditor::new();
        for (i, email) in ["a@x.com", "b@y.org", "first.last@mail.example.net"]
            .iter()
            .enumerate()
        {
            editor.add(email).unwrap();
            assert_eq!(editor.len(), i + 1);
            assert!(editor.serialize().contains(email));
        }
        assert_eq!(
            editor.serialize(),
            "a@x.com,b@y.org,first.last@mail.example.net"
        );
    }

    #[test]
    fn test_add_trims_and_clears_pending() {
        let mut editor = CcListEditor::new();
        editor.set_pending("  ops@x.com ");
        editor.add_pending().unwrap();
        assert_eq!(editor.pending(), "");
        assert_eq!(editor.serialize(), "ops@x.com");
        assert!(editor.error().is_none());
    }

    #[test]
    fn test_add_rejects_malformed() {
        let mut editor = CcListEditor::from_serialized("a@x.com");
        editor.set_pending("not-an-email");
        let err = editor.add_pending().unwrap_err();
        assert_eq!(err, CcListError::InvalidFormat("not-an-email".to_string()));
        assert_eq!(editor.len(), 1);
        assert_eq!(editor.pending(), "not-an-email");
        assert_eq!(editor.error(), Some(&err));

        for bad in ["user@nodot", "@x.com", "a b@x.com", "a@x."] {
            assert!(editor.add(bad).is_err(), "{bad} should be rejected");
        }
        assert_eq!(editor.serialize(), "a@x.com");
    }

    #[test]
    fn test_add_rejects_separator() {
        let mut editor = CcListEditor::new();
        for bad in ["a,b@x.com", "c@y.com,junk", "d@x,y.com"] {
            assert!(
                matches!(editor.add(bad), Err(CcListError::InvalidFormat(_))),
                "{bad} should be rejected"
            );
        }
        assert!(editor.is_empty());

        editor.add("a@x.com").unwrap();
        editor.add("b@y.com").unwrap();
        let reloaded = CcListEditor::from_serialized(&editor.serialize());
        assert_eq!(
            reloaded.entries().collect::<Vec<_>>(),
            editor.entries().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_add_rejects_empty() {
        let mut editor = CcListEditor::new();
        assert_eq!(editor.add("   "), Err(CcListError::EmptyInput));
        assert!(editor.is_empty());
    }

    #[test]
    fn test_add_twice_reports_duplicate() {
        let mut editor = CcListEditor::new();
        editor.add("dup@x.com").unwrap();
        assert_eq!(
            editor.add("dup@x.com"),
            Err(CcListError::DuplicateEntry("dup@x.com".to_string()))
        );
        assert_eq!(editor.len(), 1);
        // Case-sensitive: a different spelling is a different entry.
        editor.add("Dup@x.com").unwrap();
        assert_eq!(editor.len(), 2);
    }

    #[test]
    fn test_successful_add_clears_previous_error() {
        let mut editor = CcListEditor::new();
        let _ = editor.add("bad");
        assert!(editor.error().is_some());
        editor.add("good@x.com").unwrap();
        assert!(editor.error().is_none());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut editor = CcListEditor::from_serialized("a@x.com,b@y.com");
        let before = editor.serialize();
        assert!(!editor.remove("c@z.com"));
        assert_eq!(editor.serialize(), before);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut editor = CcListEditor::from_serialized("a@x.com,b@y.com,c@z.com");
        assert!(editor.remove("b@y.com"));
        assert_eq!(editor.serialize(), "a@x.com,c@z.com");
    }

    #[test]
    fn test_reinitialize_trims_entries() {
        let mut editor = CcListEditor::from_serialized("old@x.com");
        editor.set_pending("half-typed");
        editor.reinitialize(Some("a@x.com, b@y.com"));
        assert_eq!(editor.entries().collect::<Vec<_>>(), vec!["a@x.com", "b@y.com"]);
        assert_eq!(editor.pending(), "");

        editor.reinitialize(None);
        assert!(editor.is_empty());
        assert_eq!(editor.serialize(), "");
    }

    #[test]
    fn test_load_drops_blank_duplicate_and_malformed_entries() {
        let editor = CcListEditor::from_serialized("a@x.com,, a@x.com ,junk,b@y.com");
        assert_eq!(editor.serialize(), "a@x.com,b@y.com");
    }
}
