use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::document::handlers::UserIdQuery;
use crate::errors::AppError;
use crate::interview::{self, AssessmentStats, QuizQuestion};
use crate::models::AssessmentRow;
use crate::state::AppState;
use crate::store::NewAssessment;

#[derive(Deserialize)]
pub struct QuizRequest {
    pub industry: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// POST /api/v1/interview/quiz
pub async fn handle_generate_quiz(
    State(state): State<AppState>,
    Json(req): Json<QuizRequest>,
) -> Result<Json<Vec<QuizQuestion>>, AppError> {
    let questions = state.generator.quiz(&req.industry, &req.skills).await?;
    Ok(Json(questions))
}

#[derive(Deserialize)]
pub struct QuizSubmission {
    pub user_id: Uuid,
    pub industry: String,
    pub category: String,
    pub questions: Vec<QuizQuestion>,
    pub answers: Vec<String>,
}

/// POST /api/v1/interview/quiz/result
/// Grades the submission, asks for an improvement tip when something was
/// answered wrong, and stores the assessment. A tip failure is tolerated —
/// the graded result is saved either way.
pub async fn handle_submit_quiz(
    State(state): State<AppState>,
    Json(req): Json<QuizSubmission>,
) -> Result<Json<AssessmentRow>, AppError> {
    let mut result = interview::grade(&req.questions, &req.answers);

    let tip = {
        let wrong = interview::wrong_answers(&result);
        if wrong.is_empty() {
            None
        } else {
            match state.generator.improvement_tip(&req.industry, &wrong).await {
                Ok(tip) => Some(tip),
                Err(e) => {
                    warn!("improvement tip generation failed: {e}");
                    None
                }
            }
        }
    };
    result.improvement_tip = tip;

    let questions = serde_json::to_value(&result.questions).map_err(anyhow::Error::from)?;
    let row = state
        .store
        .save_assessment(NewAssessment {
            user_id: req.user_id,
            quiz_score: result.quiz_score,
            questions,
            category: req.category,
            improvement_tip: result.improvement_tip,
        })
        .await?;
    Ok(Json(row))
}

/// GET /api/v1/interview/assessments
pub async fn handle_list_assessments(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<AssessmentRow>>, AppError> {
    let rows = state.store.list_assessments(params.user_id).await?;
    Ok(Json(rows))
}

/// GET /api/v1/interview/stats
pub async fn handle_stats(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<AssessmentStats>, AppError> {
    let rows = state.store.list_assessments(params.user_id).await?;
    Ok(Json(interview::assessment_stats(&rows)))
}
