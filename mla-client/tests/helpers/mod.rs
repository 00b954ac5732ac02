//! Test Helper Utilities
//!
//! Mock Analysis/Artifact service served by a real axum router on an
//! ephemeral port, so tests exercise the production reqwest clients.

#![allow(dead_code)]

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// One multipart upload as received by the mock
#[derive(Debug, Clone, Default)]
pub struct ReceivedUpload {
    pub file_name: Option<String>,
    pub file_bytes: Vec<u8>,
    pub content_type: Option<String>,
    /// Non-file text parts in arrival order
    pub fields: Vec<(String, String)>,
}

impl ReceivedUpload {
    pub fn field_values(&self, name: &str) -> Vec<String> {
        self.fields
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
            .collect()
    }
}

/// Canned reply for `POST /upload`
#[derive(Debug, Clone)]
pub enum UploadReply {
    Json(StatusCode, Value),
    Raw(StatusCode, String),
}

struct MockState {
    upload_reply: Mutex<UploadReply>,
    uploads: Mutex<Vec<ReceivedUpload>>,
    artifacts: Mutex<Vec<(String, Vec<u8>)>>,
    downloads: Mutex<Vec<String>>,
    cleanups: Mutex<Vec<String>>,
}

/// Handle to a running mock service
#[derive(Clone)]
pub struct MockService {
    base_url: String,
    state: Arc<MockState>,
}

impl MockService {
    /// Start the mock on 127.0.0.1 with an OS-assigned port
    pub async fn start() -> Self {
        let state = Arc::new(MockState {
            upload_reply: Mutex::new(UploadReply::Json(
                StatusCode::OK,
                serde_json::json!({"success": true}),
            )),
            uploads: Mutex::new(Vec::new()),
            artifacts: Mutex::new(Vec::new()),
            downloads: Mutex::new(Vec::new()),
            cleanups: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/upload", post(upload))
            .route("/download/:id", get(download))
            .route("/cleanup/:id", post(cleanup))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn reply_json(&self, body: Value) {
        self.reply_json_with_status(StatusCode::OK, body);
    }

    pub fn reply_json_with_status(&self, status: StatusCode, body: Value) {
        *self.state.upload_reply.lock().unwrap() = UploadReply::Json(status, body);
    }

    pub fn reply_raw(&self, status: StatusCode, body: &str) {
        *self.state.upload_reply.lock().unwrap() = UploadReply::Raw(status, body.to_string());
    }

    /// Make `GET /download/<id>` serve `bytes`
    pub fn add_artifact(&self, id: &str, bytes: &[u8]) {
        self.state
            .artifacts
            .lock()
            .unwrap()
            .push((id.to_string(), bytes.to_vec()));
    }

    pub fn uploads(&self) -> Vec<ReceivedUpload> {
        self.state.uploads.lock().unwrap().clone()
    }

    pub fn downloads(&self) -> Vec<String> {
        self.state.downloads.lock().unwrap().clone()
    }

    pub fn cleanups(&self) -> Vec<String> {
        self.state.cleanups.lock().unwrap().clone()
    }
}

async fn upload(State(state): State<Arc<MockState>>, mut multipart: Multipart) -> Response {
    let mut received = ReceivedUpload::default();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            received.file_name = field.file_name().map(str::to_string);
            received.content_type = field.content_type().map(str::to_string);
            received.file_bytes = field.bytes().await.unwrap().to_vec();
        } else {
            let value = field.text().await.unwrap();
            received.fields.push((name, value));
        }
    }
    state.uploads.lock().unwrap().push(received);

    let reply = state.upload_reply.lock().unwrap().clone();
    match reply {
        UploadReply::Json(status, body) => (status, Json(body)).into_response(),
        UploadReply::Raw(status, body) => (status, body).into_response(),
    }
}

async fn download(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    state.downloads.lock().unwrap().push(id.clone());
    let artifact = state
        .artifacts
        .lock()
        .unwrap()
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, bytes)| bytes.clone());
    match artifact {
        Some(bytes) => (StatusCode::OK, bytes).into_response(),
        None => (StatusCode::NOT_FOUND, Json(serde_json::json!({"error": "File not found"}))).into_response(),
    }
}

async fn cleanup(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    state.cleanups.lock().unwrap().push(id);
    Json(serde_json::json!({"success": true})).into_response()
}

/// Write a small file with the given name into `dir`
pub fn write_file(dir: &std::path::Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Minimal header-only standard MIDI file
pub const MIDI_HEADER: &[u8] = b"MThd\x00\x00\x00\x06\x00\x01\x00\x01\x01\xe0";

/// A base URL nothing is listening on
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
