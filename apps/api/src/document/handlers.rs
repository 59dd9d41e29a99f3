use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::{markdown, Document};
use crate::errors::AppError;
use crate::models::ResumeRow;
use crate::session::EditorSession;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct SaveResumeRequest {
    pub user_id: Uuid,
    /// Structured form state; validated before the save when provided.
    /// A hydrated raw-markdown session has no structured counterpart and
    /// omits it.
    #[serde(default)]
    pub document: Option<Document>,
    /// The preview markdown — this is what gets persisted, never the
    /// structured document.
    pub content: String,
}

#[derive(Serialize)]
pub struct AssembleResponse {
    pub markdown: String,
}

/// GET /api/v1/resume
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ResumeRow>, AppError> {
    let row = state.store.load_resume(params.user_id).await?;
    row.map(Json)
        .ok_or_else(|| AppError::NotFound("No saved resume".to_string()))
}

/// POST /api/v1/resume
/// Rebuilds an editor session from the submitted state so the same rules
/// the editor enforces (validation gates the save, the preview markdown is
/// what persists) hold server-side.
pub async fn handle_save_resume(
    State(state): State<AppState>,
    Json(req): Json<SaveResumeRequest>,
) -> Result<Json<ResumeRow>, AppError> {
    let mut session = match req.document {
        Some(doc) => {
            let mut session = EditorSession::with_document(doc);
            session.edit_markdown(req.content);
            session
        }
        None => EditorSession::from_saved(req.content),
    };
    let row = session.save(state.store.as_ref(), req.user_id).await?;
    Ok(Json(row))
}

/// POST /api/v1/resume/assemble
/// Derives the markdown preview from the structured form.
pub async fn handle_assemble(Json(doc): Json<Document>) -> Json<AssembleResponse> {
    Json(AssembleResponse {
        markdown: markdown::assemble(&doc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;

    use crate::document::Entry;
    use crate::export::{DocumentExporter, ExportError, ExportOptions};
    use crate::generation::prompts::GenerationContext;
    use crate::generation::{GenerationError, Generator};
    use crate::interview::{QuizQuestion, QuizReview};
    use crate::models::{AssessmentRow, CoverLetterRow};
    use crate::store::{DocumentStore, NewAssessment, NewCoverLetter, StoreError};

    struct StubStore;

    #[async_trait]
    impl DocumentStore for StubStore {
        async fn save_resume(&self, user_id: Uuid, content: &str) -> Result<ResumeRow, StoreError> {
            Ok(ResumeRow {
                id: Uuid::new_v4(),
                user_id,
                content: content.to_string(),
                created_at: chrono::Utc::now(),
                updated_at: chrono::Utc::now(),
            })
        }

        async fn load_resume(&self, _user_id: Uuid) -> Result<Option<ResumeRow>, StoreError> {
            Ok(None)
        }

        async fn save_cover_letter(
            &self,
            _new: NewCoverLetter,
        ) -> Result<CoverLetterRow, StoreError> {
            unimplemented!("not exercised by resume handler tests")
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

        async fn save_assessment(&self, _new: NewAssessment) -> Result<AssessmentRow, StoreError> {
            unimplemented!("not exercised by resume handler tests")
        }

        async fn list_assessments(&self, _user_id: Uuid) -> Result<Vec<AssessmentRow>, StoreError> {
            Ok(vec![])
        }
    }

    struct StubGenerator;

    #[async_trait]
    impl Generator for StubGenerator {
        async fn cover_letter(&self, _ctx: &GenerationContext) -> Result<String, GenerationError> {
            Err(GenerationError::EmptyContent)
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

    struct StubExporter;

    #[async_trait]
    impl DocumentExporter for StubExporter {
        async fn export(
            &self,
            _anchor_id: &str,
            _markdown: &str,
            _options: &ExportOptions,
        ) -> Result<Vec<u8>, ExportError> {
            Ok(vec![])
        }
    }

    fn app_state() -> AppState {
        AppState {
            store: Arc::new(StubStore),
            generator: Arc::new(StubGenerator),
            exporter: Arc::new(StubExporter),
        }
    }

    #[tokio::test]
    async fn test_save_resume_persists_submitted_markdown() {
        let req = SaveResumeRequest {
            user_id: Uuid::new_v4(),
            document: Some(Document::default()),
            content: "# Edited by hand".to_string(),
        };

        let Json(row) = handle_save_resume(State(app_state()), Json(req))
            .await
            .unwrap();

        assert_eq!(row.content, "# Edited by hand");
    }

    #[tokio::test]
    async fn test_save_resume_without_document_skips_validation() {
        let req = SaveResumeRequest {
            user_id: Uuid::new_v4(),
            document: None,
            content: "# Raw markdown session".to_string(),
        };

        let Json(row) = handle_save_resume(State(app_state()), Json(req))
            .await
            .unwrap();

        assert_eq!(row.content, "# Raw markdown session");
    }

    #[tokio::test]
    async fn test_save_resume_rejects_invalid_document() {
        let req = SaveResumeRequest {
            user_id: Uuid::new_v4(),
            // An all-empty entry is missing its required title and organization.
            document: Some(Document {
                experience: vec![Entry::default()],
                ..Document::default()
            }),
            content: "irrelevant".to_string(),
        };

        let err = handle_save_resume(State(app_state()), Json(req))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }
}
