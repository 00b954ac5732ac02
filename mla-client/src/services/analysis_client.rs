//! Analysis Service client
//!
//! Sends the selected file as a multipart upload and decodes the JSON reply.

use super::{build_http_client, ServiceEndpoints};
use crate::error::{ClientError, ClientResult};
use crate::upload::UploadRequest;
use async_trait::async_trait;
use mla_common::models::AnalysisResponse;
use reqwest::multipart::{Form, Part};

const MIDI_MIME: &str = "audio/midi";

/// Analysis Service contract
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Upload a file for analysis
    ///
    /// # Returns
    /// * `Ok(AnalysisResponse)` - Any decodable reply, including `success: false`
    /// * `Err(ClientError::Transport)` - Network failure or undecodable body
    async fn analyze(&self, request: &UploadRequest) -> ClientResult<AnalysisResponse>;
}

/// HTTP implementation of [`AnalysisService`]
pub struct HttpAnalysisClient {
    http_client: reqwest::Client,
    endpoints: ServiceEndpoints,
}

impl HttpAnalysisClient {
    pub fn new(endpoints: ServiceEndpoints) -> ClientResult<Self> {
        Ok(Self {
            http_client: build_http_client()?,
            endpoints,
        })
    }

    async fn build_form(&self, request: &UploadRequest) -> ClientResult<Form> {
        let bytes = tokio::fs::read(&request.file.path).await.map_err(|e| {
            ClientError::Transport(format!("Read {} failed: {}", request.file.path.display(), e))
        })?;

        let part = Part::bytes(bytes)
            .file_name(request.file.name.clone())
            .mime_str(MIDI_MIME)?;
        let mut form = Form::new().part("file", part);

        if let Some(prefs) = &request.preferences {
            for goal in &prefs.goals {
                form = form.text("goals", goal.tag());
            }
            if let Some(genre) = &prefs.target_genre {
                form = form.text("target_genre", genre.clone());
            }
            if let Some(notes) = &prefs.additional_notes {
                form = form.text("additional_notes", notes.clone());
            }
            if prefs.auto_improve {
                form = form.text("auto_improve", "true");
            }
        }

        Ok(form)
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisClient {
    async fn analyze(&self, request: &UploadRequest) -> ClientResult<AnalysisResponse> {
        let url = self.endpoints.upload_url();
        tracing::debug!(url = %url, file = %request.file.name, size = request.file.size, "Uploading file for analysis");

        let form = self.build_form(request).await?;
        let response = self
            .http_client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        // Failure replies (4xx/5xx) still carry a JSON body with `error`
        let body: AnalysisResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Transport(format!("HTTP {}: {}", status.as_u16(), e)))?;

        tracing::debug!(status = status.as_u16(), success = body.is_success(), "Analysis response received");
        Ok(body)
    }
}
