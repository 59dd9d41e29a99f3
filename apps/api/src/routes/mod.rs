pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::document::handlers as resume;
use crate::export;
use crate::generation::handlers as cover_letters;
use crate::interview::handlers as interview;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume
        .route(
            "/api/v1/resume",
            get(resume::handle_get_resume).post(resume::handle_save_resume),
        )
        .route("/api/v1/resume/assemble", post(resume::handle_assemble))
        // Export
        .route("/api/v1/export", post(export::handle_export))
        // Cover letters
        .route(
            "/api/v1/cover-letters",
            get(cover_letters::handle_list_cover_letters)
                .post(cover_letters::handle_generate_cover_letter),
        )
        .route(
            "/api/v1/cover-letters/:id",
            get(cover_letters::handle_get_cover_letter)
                .delete(cover_letters::handle_delete_cover_letter),
        )
        // Mock interview
        .route("/api/v1/interview/quiz", post(interview::handle_generate_quiz))
        .route(
            "/api/v1/interview/quiz/result",
            post(interview::handle_submit_quiz),
        )
        .route(
            "/api/v1/interview/assessments",
            get(interview::handle_list_assessments),
        )
        .route("/api/v1/interview/stats", get(interview::handle_stats))
        .with_state(state)
}
