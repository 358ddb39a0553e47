//! Slide deck loading: either a local manifest written by a previous
//! upload, or a fresh upload of the deck file to the upload service.

use std::path::Path;

use anyhow::{Context, Result};
use companion_core::{SlideDescriptor, StudentProfile};
use reqwest::multipart;
use serde::Deserialize;

/// Response document of the upload service.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    slides: Vec<SlideDescriptor>,
    #[serde(default)]
    message: String,
}

/// Reads slide descriptors from a manifest file: either the bare
/// descriptor array or the full upload response saved to disk.
pub async fn load_manifest(path: &Path) -> Result<Vec<SlideDescriptor>> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read manifest {}", path.display()))?;

    if let Ok(descriptors) = serde_json::from_slice::<Vec<SlideDescriptor>>(&bytes) {
        return Ok(descriptors);
    }
    let response: UploadResponse = serde_json::from_slice(&bytes)
        .context("manifest is neither a slide list nor an upload response")?;
    Ok(response.slides)
}

/// Client for the upload collaborator: sends the deck file plus the
/// passthrough form fields and returns the converted slide sequence.
pub struct UploadClient {
    client: reqwest::Client,
    endpoint: String,
}

impl UploadClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    pub async fn upload_deck(
        &self,
        path: &Path,
        profile: &StudentProfile,
    ) -> Result<Vec<SlideDescriptor>> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read deck file {}", path.display()))?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("deck.pdf")
            .to_string();

        let form = multipart::Form::new()
            .part("file", multipart::Part::bytes(bytes).file_name(file_name))
            .text("gradeLevel", profile.grade_level.value())
            .text("subject", profile.subject.value())
            .text("studentLevel", profile.understanding_level.value())
            .text("explanationStyle", profile.explanation_style.value())
            .text("studentPersona", profile.student_persona.value());

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json::<UploadResponse>()
            .await?;

        if !response.message.is_empty() {
            tracing::info!("upload service: {}", response.message);
        }
        Ok(response.slides)
    }
}
