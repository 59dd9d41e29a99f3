//! Persistence boundary. Handlers and the editor session depend on the
//! [`DocumentStore`] trait; [`PgStore`] is the Postgres implementation.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AssessmentRow, CoverLetterRow, ResumeRow};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    /// Surfaced verbatim; in-memory state is preserved so nothing is lost.
    #[error("{0}")]
    Persistence(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Persistence(e.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct NewCoverLetter {
    pub user_id: Uuid,
    pub company_name: String,
    pub job_title: String,
    pub job_description: String,
    pub tone: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct NewAssessment {
    pub user_id: Uuid,
    pub quiz_score: f64,
    pub questions: Value,
    pub category: String,
    pub improvement_tip: Option<String>,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Upserts the single resume a user has; `content` is markdown.
    async fn save_resume(&self, user_id: Uuid, content: &str) -> Result<ResumeRow, StoreError>;

    async fn load_resume(&self, user_id: Uuid) -> Result<Option<ResumeRow>, StoreError>;

    async fn save_cover_letter(&self, new: NewCoverLetter)
        -> Result<CoverLetterRow, StoreError>;

    async fn list_cover_letters(&self, user_id: Uuid) -> Result<Vec<CoverLetterRow>, StoreError>;

    async fn get_cover_letter(&self, id: Uuid) -> Result<CoverLetterRow, StoreError>;

    async fn delete_cover_letter(&self, id: Uuid) -> Result<(), StoreError>;

    async fn save_assessment(&self, new: NewAssessment) -> Result<AssessmentRow, StoreError>;

    /// Most recent first.
    async fn list_assessments(&self, user_id: Uuid) -> Result<Vec<AssessmentRow>, StoreError>;
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn save_resume(&self, user_id: Uuid, content: &str) -> Result<ResumeRow, StoreError> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO resumes (id, user_id, content, created_at, updated_at)
            VALUES ($1, $2, $3, now(), now())
            ON CONFLICT (user_id)
            DO UPDATE SET content = EXCLUDED.content, updated_at = now()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn load_resume(&self, user_id: Uuid) -> Result<Option<ResumeRow>, StoreError> {
        let row = sqlx::query_as("SELECT * FROM resumes WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn save_cover_letter(
        &self,
        new: NewCoverLetter,
    ) -> Result<CoverLetterRow, StoreError> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO cover_letters
                (id, user_id, company_name, job_title, job_description, tone,
                 content, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, now())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(&new.company_name)
        .bind(&new.job_title)
        .bind(&new.job_description)
        .bind(&new.tone)
        .bind(&new.content)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_cover_letters(&self, user_id: Uuid) -> Result<Vec<CoverLetterRow>, StoreError> {
        let rows = sqlx::query_as(
            "SELECT * FROM cover_letters WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_cover_letter(&self, id: Uuid) -> Result<CoverLetterRow, StoreError> {
        let row: Option<CoverLetterRow> =
            sqlx::query_as("SELECT * FROM cover_letters WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.ok_or_else(|| StoreError::NotFound(format!("Cover letter {id} not found")))
    }

    async fn delete_cover_letter(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM cover_letters WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("Cover letter {id} not found")));
        }
        Ok(())
    }

    async fn save_assessment(&self, new: NewAssessment) -> Result<AssessmentRow, StoreError> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO assessments
                (id, user_id, quiz_score, questions, category, improvement_tip,
                 created_at)
            VALUES ($1, $2, $3, $4, $5, $6, now())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(new.quiz_score)
        .bind(&new.questions)
        .bind(&new.category)
        .bind(&new.improvement_tip)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_assessments(&self, user_id: Uuid) -> Result<Vec<AssessmentRow>, StoreError> {
        let rows = sqlx::query_as(
            "SELECT * FROM assessments WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
