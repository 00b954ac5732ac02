//! Artifact Service client
//!
//! Saves a generated artifact locally and asks the service to delete its
//! temporary copy.

use super::{build_http_client, ServiceEndpoints};
use crate::download::DownloadLink;
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Artifact Service contract
#[async_trait]
pub trait ArtifactService: Send + Sync {
    /// Fetch the artifact behind `link` and save it under `dest_dir`
    async fn download(&self, link: &DownloadLink, dest_dir: &Path) -> ClientResult<PathBuf>;

    /// Delete the temporary artifact; callers treat failure as advisory
    async fn cleanup(&self, download_id: &str) -> ClientResult<()>;

    /// URL the download link should point at
    fn download_url(&self, download_id: &str) -> String;
}

/// HTTP implementation of [`ArtifactService`]
pub struct HttpArtifactClient {
    http_client: reqwest::Client,
    endpoints: ServiceEndpoints,
}

impl HttpArtifactClient {
    pub fn new(endpoints: ServiceEndpoints) -> ClientResult<Self> {
        Ok(Self {
            http_client: build_http_client()?,
            endpoints,
        })
    }
}

/// Keep only the final path component of a server-chosen filename
fn safe_file_name(filename: &str) -> &str {
    Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(crate::render::DEFAULT_IMPROVED_FILENAME)
}

#[async_trait]
impl ArtifactService for HttpArtifactClient {
    async fn download(&self, link: &DownloadLink, dest_dir: &Path) -> ClientResult<PathBuf> {
        tracing::debug!(url = %link.url, filename = %link.filename, "Fetching artifact");

        let response = self
            .http_client
            .get(&link.url)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Transport(format!(
                "Artifact download failed with HTTP {}",
                status.as_u16()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        tokio::fs::create_dir_all(dest_dir)
            .await
            .map_err(|e| ClientError::Storage(format!("{}: {}", dest_dir.display(), e)))?;
        let target = dest_dir.join(safe_file_name(&link.filename));
        tokio::fs::write(&target, &bytes)
            .await
            .map_err(|e| ClientError::Storage(format!("{}: {}", target.display(), e)))?;

        tracing::info!(path = %target.display(), bytes = bytes.len(), "Artifact saved");
        Ok(target)
    }

    async fn cleanup(&self, download_id: &str) -> ClientResult<()> {
        let url = self.endpoints.cleanup_url(download_id);
        tracing::debug!(url = %url, "Requesting artifact cleanup");

        self.http_client
            .post(&url)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(())
    }

    fn download_url(&self, download_id: &str) -> String {
        self.endpoints.download_url(download_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_file_name_strips_directories() {
        assert_eq!(safe_file_name("song_improved.mid"), "song_improved.mid");
        assert_eq!(safe_file_name("../../etc/passwd"), "passwd");
        assert_eq!(safe_file_name(".."), "improved_music.mid");
        assert_eq!(safe_file_name(""), "improved_music.mid");
    }
}
