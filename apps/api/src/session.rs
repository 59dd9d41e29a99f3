//! Editor session — the single logical owner of the in-memory
//! `Document`/`PreviewSync` pair.
//!
//! All structured mutations funnel through [`EditorSession::touch`], which
//! applies the preview-sync policy. The three suspendable operation
//! classes (generation, save, export) carry independent loading flags and
//! are never coupled: a pending generation does not block a save. There is
//! no cancellation — a superseding call starts a new task without aborting
//! the old one, so a stale response may land after a newer one
//! (last-write-wins by arrival order).
//!
//! Every failure path leaves the document and preview exactly as they
//! were and records the error message as a notification, so the user can
//! retry without data loss.

use tracing::info;
use uuid::Uuid;

use crate::document::{
    self, validate, ContactInfo, Document, Entry, EntryPatch, IndexOutOfRange, Section,
};
use crate::errors::AppError;
use crate::export::{DocumentExporter, ExportOptions};
use crate::models::ResumeRow;
use crate::generation::prompts::GenerationContext;
use crate::generation::Generator;
use crate::preview::PreviewSync;
use crate::store::DocumentStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// A transient, toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

pub struct EditorSession {
    document: Document,
    preview: PreviewSync,
    dirty: bool,
    saving: bool,
    generating: bool,
    exporting: bool,
    notifications: Vec<Notification>,
}

impl EditorSession {
    /// Fresh session: empty document, preview derived from it.
    pub fn new() -> Self {
        Self::with_document(Document::default())
    }

    pub fn with_document(document: Document) -> Self {
        let preview = PreviewSync::derived(&document);
        Self {
            document,
            preview,
            dirty: false,
            saving: false,
            generating: false,
            exporting: false,
            notifications: Vec::new(),
        }
    }

    /// Session hydrated from a previously saved markdown blob: the preview
    /// starts in the read-first diverged state, the structured form empty.
    pub fn from_saved(markdown: impl Into<String>) -> Self {
        Self {
            document: Document::default(),
            preview: PreviewSync::from_saved(markdown),
            dirty: false,
            saving: false,
            generating: false,
            exporting: false,
            notifications: Vec::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn preview(&self) -> &PreviewSync {
        &self.preview
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    // ── structured-form mutations ───────────────────────────────────────

    pub fn set_contact_info(&mut self, contact: ContactInfo) {
        self.document.contact_info = contact;
        self.touch();
    }

    pub fn set_summary(&mut self, summary: impl Into<String>) {
        self.document.summary = summary.into();
        self.touch();
    }

    pub fn set_skills(&mut self, skills: impl Into<String>) {
        self.document.skills = skills.into();
        self.touch();
    }

    pub fn add_entry(&mut self, section: Section, entry: Entry) {
        document::append_entry(self.document.entries_mut(section), entry);
        self.touch();
    }

    pub fn update_entry(
        &mut self,
        section: Section,
        index: usize,
        patch: EntryPatch,
    ) -> Result<(), IndexOutOfRange> {
        document::update_entry(self.document.entries_mut(section), index, patch)?;
        self.touch();
        Ok(())
    }

    pub fn remove_entry(&mut self, section: Section, index: usize) -> Result<Entry, IndexOutOfRange> {
        let removed = document::remove_entry(self.document.entries_mut(section), index)?;
        self.touch();
        Ok(removed)
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.preview.document_changed(&self.document);
    }

    // ── markdown buffer ─────────────────────────────────────────────────

    pub fn edit_markdown(&mut self, text: impl Into<String>) {
        self.preview.manual_edit(text);
        self.dirty = true;
    }

    pub fn discard_manual_edits(&mut self) {
        self.preview.discard_manual_edits(&self.document);
    }

    // ── async operations ────────────────────────────────────────────────

    /// Saves the preview markdown (never the structured document) for
    /// `user_id`. Validation errors block the save; a store failure leaves
    /// all session state untouched and records the message verbatim.
    pub async fn save(
        &mut self,
        store: &dyn DocumentStore,
        user_id: Uuid,
    ) -> Result<ResumeRow, AppError> {
        let errors = validate::validate_document(&self.document);
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        self.saving = true;
        let result = store.save_resume(user_id, self.preview.markdown()).await;
        self.saving = false;

        match result {
            Ok(row) => {
                self.dirty = false;
                self.notify(Severity::Success, "Resume saved successfully!");
                Ok(row)
            }
            Err(e) => {
                self.notify(Severity::Error, e.to_string());
                Err(e.into())
            }
        }
    }

    /// Requests an AI-generated cover letter. On success the generated
    /// text replaces the markdown buffer (diverged, like any manual
    /// content); on failure the form state is preserved and the error is
    /// recorded for a retry.
    pub async fn generate(
        &mut self,
        generator: &dyn Generator,
        ctx: &GenerationContext,
    ) -> Result<(), AppError> {
        self.generating = true;
        let result = generator.cover_letter(ctx).await;
        self.generating = false;

        match result {
            Ok(content) => {
                info!(company = %ctx.company_name, "cover letter generated");
                self.preview.manual_edit(content);
                self.dirty = true;
                self.notify(Severity::Success, "Cover letter generated successfully!");
                Ok(())
            }
            Err(e) => {
                self.notify(Severity::Error, e.to_string());
                Err(e.into())
            }
        }
    }

    /// Renders the current preview through the export collaborator with
    /// the fixed product configuration. Failure reports an export error
    /// without mutating document state.
    pub async fn export(
        &mut self,
        exporter: &dyn DocumentExporter,
        anchor_id: &str,
    ) -> Result<Vec<u8>, AppError> {
        self.exporting = true;
        let result = exporter
            .export(anchor_id, self.preview.markdown(), &ExportOptions::default())
            .await;
        self.exporting = false;

        match result {
            Ok(bytes) => {
                self.notify(Severity::Success, "PDF downloaded successfully!");
                Ok(bytes)
            }
            Err(e) => {
                self.notify(Severity::Error, e.to_string());
                Err(e.into())
            }
        }
    }

    fn notify(&mut self, severity: Severity, message: impl Into<String>) {
        self.notifications.push(Notification {
            severity,
            message: message.into(),
        });
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::export::ExportError;
    use crate::generation::GenerationError;
    use crate::interview::{QuizQuestion, QuizReview};
    use crate::models::{AssessmentRow, CoverLetterRow};
    use crate::preview::SyncState;
    use crate::store::{NewAssessment, NewCoverLetter, StoreError};

    // ── mock collaborators ──────────────────────────────────────────────

    struct MockStore {
        fail_with: Option<String>,
        saved: Mutex<Vec<String>>,
    }

    impl MockStore {
        fn ok() -> Self {
            Self {
                fail_with: None,
                saved: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                saved: Mutex::new(Vec::new()),
            }
        }

        fn saved_contents(&self) -> Vec<String> {
            self.saved.lock().unwrap().clone()
        }
    }

    fn resume_row(user_id: Uuid, content: &str) -> ResumeRow {
        ResumeRow {
            id: Uuid::new_v4(),
            user_id,
            content: content.to_string(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[async_trait]
    impl DocumentStore for MockStore {
        async fn save_resume(
            &self,
            user_id: Uuid,
            content: &str,
        ) -> Result<ResumeRow, StoreError> {
            if let Some(msg) = &self.fail_with {
                return Err(StoreError::Persistence(msg.clone()));
            }
            self.saved.lock().unwrap().push(content.to_string());
            Ok(resume_row(user_id, content))
        }

        async fn load_resume(&self, _user_id: Uuid) -> Result<Option<ResumeRow>, StoreError> {
            Ok(None)
        }

        async fn save_cover_letter(
            &self,
            _new: NewCoverLetter,
        ) -> Result<CoverLetterRow, StoreError> {
            unimplemented!("not exercised by session tests")
        }

        async fn list_cover_letters(
            &self,
            _user_id: Uuid,
        ) -> Result<Vec<CoverLetterRow>, StoreError> {
            Ok(vec![])
        }

        async fn get_cover_letter(&self, id: Uuid) -> Result<CoverLetterRow, StoreError> {
            Err(StoreError::NotFound(format!("Cover letter {id} not found")))
        }

        async fn delete_cover_letter(&self, _id: Uuid) -> Result<(), StoreError> {
            Ok(())
        }

        async fn save_assessment(
            &self,
            _new: NewAssessment,
        ) -> Result<AssessmentRow, StoreError> {
            unimplemented!("not exercised by session tests")
        }

        async fn list_assessments(
            &self,
            _user_id: Uuid,
        ) -> Result<Vec<AssessmentRow>, StoreError> {
            Ok(vec![])
        }
    }

    struct MockGenerator {
        response: Result<String, String>,
    }

    #[async_trait]
    impl Generator for MockGenerator {
        async fn cover_letter(
            &self,
            _ctx: &GenerationContext,
        ) -> Result<String, GenerationError> {
            match &self.response {
                Ok(content) => Ok(content.clone()),
                Err(msg) => Err(GenerationError::Api {
                    status: 500,
                    message: msg.clone(),
                }),
            }
        }

        async fn quiz(
            &self,
            _industry: &str,
            _skills: &[String],
        ) -> Result<Vec<QuizQuestion>, GenerationError> {
            Ok(vec![])
        }

        async fn improvement_tip(
            &self,
            _industry: &str,
            _wrong: &[&QuizReview],
        ) -> Result<String, GenerationError> {
            Ok(String::new())
        }
    }

    struct MockExporter {
        fail: bool,
    }

    #[async_trait]
    impl DocumentExporter for MockExporter {
        async fn export(
            &self,
            _anchor_id: &str,
            markdown: &str,
            _options: &ExportOptions,
        ) -> Result<Vec<u8>, ExportError> {
            if self.fail {
                return Err(ExportError::Service {
                    status: 503,
                    message: "renderer down".to_string(),
                });
            }
            Ok(markdown.as_bytes().to_vec())
        }
    }

    fn ctx() -> GenerationContext {
        GenerationContext {
            company_name: "Acme".to_string(),
            job_title: "Engineer".to_string(),
            job_description: "Rust".to_string(),
            tone: Default::default(),
        }
    }

    // ── structured edits and preview sync ───────────────────────────────

    #[test]
    fn test_field_change_recomputes_derived_preview() {
        let mut session = EditorSession::new();
        session.set_summary("Backend engineer");
        assert!(session.preview().markdown().contains("Backend engineer"));
        assert!(session.is_dirty());
    }

    #[test]
    fn test_diverged_summary_change_leaves_buffer_and_warns() {
        let mut session = EditorSession::new();
        session.edit_markdown("# My resume");

        session.set_summary("New summary");

        assert_eq!(session.preview().markdown(), "# My resume");
        assert!(session.preview().stale_warning());
    }

    #[test]
    fn test_discard_manual_edits_restores_mirror() {
        let mut session = EditorSession::new();
        session.set_summary("Summary");
        session.edit_markdown("# My resume");
        session.discard_manual_edits();

        assert_eq!(session.preview().state(), SyncState::Derived);
        assert!(session.preview().markdown().contains("Summary"));
    }

    #[test]
    fn test_entry_ops_route_through_preview() {
        let mut session = EditorSession::new();
        session.add_entry(
            Section::Experience,
            Entry {
                title: "Engineer".to_string(),
                organization: "Acme".to_string(),
                ..Entry::default()
            },
        );
        assert!(session.preview().markdown().contains("Engineer @ Acme"));

        session.remove_entry(Section::Experience, 0).unwrap();
        assert!(!session.preview().markdown().contains("Engineer @ Acme"));
    }

    #[test]
    fn test_hydrated_session_starts_read_first() {
        let session = EditorSession::from_saved("# Saved");
        assert_eq!(session.preview().state(), SyncState::Diverged);
        assert_eq!(session.preview().markdown(), "# Saved");
        assert!(!session.is_dirty());
    }

    // ── save ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_save_submits_preview_markdown() {
        let mut session = EditorSession::new();
        session.set_summary("Summary");
        let store = MockStore::ok();

        let row = session.save(&store, Uuid::new_v4()).await.unwrap();

        assert_eq!(session.preview().markdown(), store.saved_contents()[0]);
        assert_eq!(row.content, store.saved_contents()[0]);
        assert!(!session.is_dirty());
    }

    #[tokio::test]
    async fn test_save_blocked_by_validation_errors() {
        let mut session = EditorSession::new();
        session.add_entry(Section::Experience, Entry::default());
        let store = MockStore::ok();

        let err = session.save(&store, Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(fields) if fields.len() == 2));
        assert!(store.saved_contents().is_empty(), "store must not be called");
    }

    #[tokio::test]
    async fn test_failed_save_preserves_state_and_records_error() {
        let mut session = EditorSession::new();
        session.set_summary("Summary");
        session.edit_markdown("# Hand edited");
        let document_before = session.document().clone();
        let store = MockStore::failing("network unreachable");

        let result = session.save(&store, Uuid::new_v4()).await;

        assert!(result.is_err());
        assert_eq!(session.document(), &document_before);
        assert_eq!(session.preview().markdown(), "# Hand edited");
        assert_eq!(session.preview().state(), SyncState::Diverged);
        assert!(session.is_dirty(), "failed save must not mark clean");
        // Error message surfaced verbatim.
        let notes = session.notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].severity, Severity::Error);
        assert_eq!(notes[0].message, "network unreachable");
    }

    // ── generate ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_generate_replaces_preview_with_letter() {
        let mut session = EditorSession::new();
        let generator = MockGenerator {
            response: Ok("Dear hiring manager,".to_string()),
        };

        session.generate(&generator, &ctx()).await.unwrap();

        assert_eq!(session.preview().markdown(), "Dear hiring manager,");
        assert_eq!(session.preview().state(), SyncState::Diverged);
    }

    #[tokio::test]
    async fn test_failed_generation_preserves_form_state() {
        let mut session = EditorSession::new();
        session.set_summary("Summary");
        let before = session.preview().markdown().to_string();
        let generator = MockGenerator {
            response: Err("model overloaded".to_string()),
        };

        let result = session.generate(&generator, &ctx()).await;

        assert!(result.is_err());
        assert_eq!(session.preview().markdown(), before);
        assert_eq!(session.notifications().len(), 1);
        assert_eq!(session.notifications()[0].severity, Severity::Error);
    }

    // ── export ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_export_renders_current_preview() {
        let mut session = EditorSession::new();
        session.edit_markdown("# Resume");
        let exporter = MockExporter { fail: false };

        let bytes = session.export(&exporter, "resume-pdf").await.unwrap();

        assert_eq!(bytes, b"# Resume");
    }

    #[tokio::test]
    async fn test_failed_export_leaves_document_untouched() {
        let mut session = EditorSession::new();
        session.set_summary("Summary");
        let document_before = session.document().clone();
        let exporter = MockExporter { fail: true };

        let result = session.export(&exporter, "resume-pdf").await;

        assert!(matches!(result, Err(AppError::Export(_))));
        assert_eq!(session.document(), &document_before);
        assert!(!session.is_exporting());
    }
}
