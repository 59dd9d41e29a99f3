//! Document export boundary. The service hands the render collaborator a
//! markdown string and a DOM anchor id; the collaborator returns the
//! rendered file. Export failures never touch document state.

use async_trait::async_trait;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    A4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
}

/// Render configuration. The defaults are fixed product settings, not
/// user preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Page margin in millimeters, applied on all sides.
    pub margin_mm: u32,
    pub page_format: PageFormat,
    pub orientation: Orientation,
    /// JPEG quality for rasterized content, 0.0–1.0.
    pub image_quality: f64,
    /// Raster scale factor.
    pub raster_scale: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            margin_mm: 15,
            page_format: PageFormat::A4,
            orientation: Orientation::Portrait,
            image_quality: 0.98,
            raster_scale: 2,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("render service error (status {status}): {message}")]
    Service { status: u16, message: String },
}

/// The export collaborator contract: render markdown to a downloadable
/// document.
#[async_trait]
pub trait DocumentExporter: Send + Sync {
    async fn export(
        &self,
        anchor_id: &str,
        markdown: &str,
        options: &ExportOptions,
    ) -> Result<Vec<u8>, ExportError>;
}

#[derive(Debug, Serialize)]
struct RenderRequest<'a> {
    anchor_id: &'a str,
    markdown: &'a str,
    options: &'a ExportOptions,
}

/// Posts the markdown to an external render service and returns the PDF
/// bytes.
#[derive(Clone)]
pub struct HttpRenderExporter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRenderExporter {
    pub fn new(endpoint: String) -> Result<Self, ExportError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl DocumentExporter for HttpRenderExporter {
    async fn export(
        &self,
        anchor_id: &str,
        markdown: &str,
        options: &ExportOptions,
    ) -> Result<Vec<u8>, ExportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&RenderRequest {
                anchor_id,
                markdown,
                options,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ExportError::Service {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub anchor_id: String,
    pub content: String,
}

/// POST /api/v1/export
pub async fn handle_export(
    State(state): State<AppState>,
    Json(req): Json<ExportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = state
        .exporter
        .export(&req.anchor_id, &req.content, &ExportOptions::default())
        .await?;
    Ok(([(header::CONTENT_TYPE, "application/pdf")], bytes))
}
