use std::sync::Arc;

use crate::export::DocumentExporter;
use crate::generation::Generator;
use crate::store::DocumentStore;

/// Shared application state injected into all route handlers via Axum
/// extractors. Collaborators live behind trait objects so handlers can be
/// tested with mocks.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub generator: Arc<dyn Generator>,
    pub exporter: Arc<dyn DocumentExporter>,
}
