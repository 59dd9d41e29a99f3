use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::document::handlers::UserIdQuery;
use crate::errors::AppError;
use crate::generation::prompts::{GenerationContext, Tone};
use crate::models::CoverLetterRow;
use crate::state::AppState;
use crate::store::NewCoverLetter;

#[derive(Deserialize)]
pub struct GenerateCoverLetterRequest {
    pub user_id: Uuid,
    pub company_name: String,
    pub job_title: String,
    pub job_description: String,
    #[serde(default)]
    pub tone: Tone,
}

/// POST /api/v1/cover-letters
/// Generates a cover letter and stores it. A generation failure surfaces
/// as a transient error; nothing is persisted in that case.
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    Json(req): Json<GenerateCoverLetterRequest>,
) -> Result<Json<CoverLetterRow>, AppError> {
    let ctx = GenerationContext {
        company_name: req.company_name,
        job_title: req.job_title,
        job_description: req.job_description,
        tone: req.tone,
    };

    let content = state.generator.cover_letter(&ctx).await?;
    info!(company = %ctx.company_name, tone = %ctx.tone, "cover letter generated");

    let row = state
        .store
        .save_cover_letter(NewCoverLetter {
            user_id: req.user_id,
            company_name: ctx.company_name,
            job_title: ctx.job_title,
            job_description: ctx.job_description,
            tone: ctx.tone.to_string(),
            content,
        })
        .await?;
    Ok(Json(row))
}

/// GET /api/v1/cover-letters
pub async fn handle_list_cover_letters(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<CoverLetterRow>>, AppError> {
    let rows = state.store.list_cover_letters(params.user_id).await?;
    Ok(Json(rows))
}

/// GET /api/v1/cover-letters/:id
pub async fn handle_get_cover_letter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CoverLetterRow>, AppError> {
    let row = state.store.get_cover_letter(id).await?;
    Ok(Json(row))
}

/// DELETE /api/v1/cover-letters/:id
pub async fn handle_delete_cover_letter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.delete_cover_letter(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
