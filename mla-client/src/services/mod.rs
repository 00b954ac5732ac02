//! External service clients
//!
//! The Analysis Service and Artifact Service are collaborators reached only
//! through these traits; the HTTP implementations use `reqwest`.

pub mod analysis_client;
pub mod artifact_client;

pub use analysis_client::{AnalysisService, HttpAnalysisClient};
pub use artifact_client::{ArtifactService, HttpArtifactClient};

const USER_AGENT: &str = concat!("mla/", env!("CARGO_PKG_VERSION"));

/// URL layout of the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    base_url: String,
}

impl ServiceEndpoints {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST` multipart upload
    pub fn upload_url(&self) -> String {
        format!("{}/upload", self.base_url)
    }

    /// `GET` artifact stream
    pub fn download_url(&self, download_id: &str) -> String {
        self.resource_url("download", download_id)
    }

    /// `POST` artifact deletion
    pub fn cleanup_url(&self, download_id: &str) -> String {
        self.resource_url("cleanup", download_id)
    }

    /// `<base>/<route>/<id>` with the id percent-encoded as one path segment
    fn resource_url(&self, route: &str, id: &str) -> String {
        let Ok(mut url) = reqwest::Url::parse(&self.base_url) else {
            // Unparseable base: the request itself will report the error
            return format!("{}/{}/{}", self.base_url, route, id);
        };
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(route).push(id);
        }
        url.to_string()
    }
}

/// Shared HTTP client construction
///
/// No request timeout is set: a hung analysis blocks only that submission.
fn build_http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().user_agent(USER_AGENT).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_trim_trailing_slash() {
        let endpoints = ServiceEndpoints::new("http://localhost:5000/");
        assert_eq!(endpoints.upload_url(), "http://localhost:5000/upload");
        assert_eq!(endpoints.download_url("abc123"), "http://localhost:5000/download/abc123");
        assert_eq!(endpoints.cleanup_url("abc123"), "http://localhost:5000/cleanup/abc123");
    }

    #[test]
    fn test_download_id_is_one_encoded_segment() {
        let endpoints = ServiceEndpoints::new("http://localhost:5000");
        assert_eq!(
            endpoints.download_url("a/b?c#d"),
            "http://localhost:5000/download/a%2Fb%3Fc%23d"
        );
        assert_eq!(
            endpoints.cleanup_url("../x y"),
            "http://localhost:5000/cleanup/..%2Fx%20y"
        );
    }

    #[test]
    fn test_base_path_prefix_is_kept() {
        let endpoints = ServiceEndpoints::new("http://example.test/api/");
        assert_eq!(endpoints.download_url("abc"), "http://example.test/api/download/abc");
    }
}
