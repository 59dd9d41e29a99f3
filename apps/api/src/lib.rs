//! Career-coach API: structured resume editing with a live markdown
//! preview, AI cover-letter generation, and mock-interview quizzes.

pub mod config;
pub mod db;
pub mod document;
pub mod errors;
pub mod export;
pub mod generation;
pub mod interview;
pub mod models;
pub mod preview;
pub mod routes;
pub mod session;
pub mod state;
pub mod store;
