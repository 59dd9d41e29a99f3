//! Preview synchronization — reconciles the structured form, the markdown
//! edit buffer, and the rendered preview.
//!
//! The policy is one-way-at-a-time: while `Derived`, the buffer is a pure
//! function of the [`Document`]; the first manual edit breaks the mirror
//! (`Diverged`) and from then on structured changes leave the buffer alone
//! and raise an advisory warning instead. Only an explicit discard returns
//! to `Derived`. No transition can fail.

use serde::Serialize;

use crate::document::{markdown, Document};

/// Whether the markdown buffer is still a pure function of the structured
/// document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    Derived,
    Diverged,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewSync {
    markdown: String,
    state: SyncState,
    /// Set when a structured change arrives while diverged: form edits are
    /// not reflected until manual edits are discarded. Advisory only.
    stale_warning: bool,
}

impl PreviewSync {
    /// Initial state for a document built from the structured form.
    pub fn derived(doc: &Document) -> Self {
        Self {
            markdown: markdown::assemble(doc),
            state: SyncState::Derived,
            stale_warning: false,
        }
    }

    /// Initial state when hydrated from a previously saved markdown blob
    /// with no structured counterpart: read-first, diverged-equivalent.
    pub fn from_saved(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
            state: SyncState::Diverged,
            stale_warning: false,
        }
    }

    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn stale_warning(&self) -> bool {
        self.stale_warning
    }

    /// A structured-form field changed. Mirrors the document while
    /// derived; while diverged the buffer is never silently overwritten —
    /// the stale warning is raised instead.
    pub fn document_changed(&mut self, doc: &Document) {
        match self.state {
            SyncState::Derived => self.markdown = markdown::assemble(doc),
            SyncState::Diverged => self.stale_warning = true,
        }
    }

    /// The user edited the markdown buffer directly.
    pub fn manual_edit(&mut self, text: impl Into<String>) {
        self.markdown = text.into();
        self.state = SyncState::Diverged;
    }

    /// Explicit "discard manual edits": rebuild from the document and
    /// return to the derived mirror.
    pub fn discard_manual_edits(&mut self, doc: &Document) {
        self.markdown = markdown::assemble(doc);
        self.state = SyncState::Derived;
        self.stale_warning = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_summary(summary: &str) -> Document {
        Document {
            summary: summary.to_string(),
            ..Document::default()
        }
    }

    #[test]
    fn test_derived_preview_mirrors_document() {
        let doc = doc_with_summary("First");
        let preview = PreviewSync::derived(&doc);
        assert_eq!(preview.state(), SyncState::Derived);
        assert_eq!(preview.markdown(), markdown::assemble(&doc));
    }

    #[test]
    fn test_form_change_while_derived_reassembles() {
        let mut doc = doc_with_summary("First");
        let mut preview = PreviewSync::derived(&doc);

        doc.summary = "Second".to_string();
        preview.document_changed(&doc);

        assert_eq!(preview.state(), SyncState::Derived);
        assert!(preview.markdown().contains("Second"));
        assert!(!preview.stale_warning());
    }

    #[test]
    fn test_manual_edit_transitions_to_diverged() {
        let doc = doc_with_summary("First");
        let mut preview = PreviewSync::derived(&doc);

        preview.manual_edit("# Hand-written resume");

        assert_eq!(preview.state(), SyncState::Diverged);
        assert_eq!(preview.markdown(), "# Hand-written resume");
    }

    // The divergence law: no structured mutation changes the buffer until
    // an explicit discard.
    #[test]
    fn test_form_change_while_diverged_warns_without_overwriting() {
        let mut doc = doc_with_summary("First");
        let mut preview = PreviewSync::derived(&doc);
        preview.manual_edit("# Hand-written resume");

        doc.summary = "Second".to_string();
        preview.document_changed(&doc);

        assert_eq!(preview.markdown(), "# Hand-written resume");
        assert!(preview.stale_warning());
        assert_eq!(preview.state(), SyncState::Diverged);
    }

    #[test]
    fn test_discard_returns_to_derived_and_clears_warning() {
        let mut doc = doc_with_summary("First");
        let mut preview = PreviewSync::derived(&doc);
        preview.manual_edit("# Hand-written resume");
        doc.summary = "Second".to_string();
        preview.document_changed(&doc);

        preview.discard_manual_edits(&doc);

        assert_eq!(preview.state(), SyncState::Derived);
        assert!(!preview.stale_warning());
        assert!(preview.markdown().contains("Second"));
    }

    #[test]
    fn test_hydrated_preview_starts_diverged_without_warning() {
        let preview = PreviewSync::from_saved("# Saved resume");
        assert_eq!(preview.state(), SyncState::Diverged);
        assert_eq!(preview.markdown(), "# Saved resume");
        assert!(!preview.stale_warning());
    }
}
