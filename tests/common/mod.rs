//! In-process stand-in for the detection backend.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use durianleaf::edu::EduCard;
use durianleaf::{DetectionResult, HistoryEntry, Stats, UiError, View};
use image::{Rgba, RgbaImage};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub struct Backend {
    pub predict: Mutex<(StatusCode, Value)>,
    pub image_status: Mutex<StatusCode>,
    pub stats_ok: Mutex<bool>,
    pub clear: Mutex<Value>,
    pub predict_hits: AtomicUsize,
    pub image_hits: AtomicUsize,
    pub clear_hits: AtomicUsize,
    pub uploads: Mutex<Vec<Vec<u8>>>,
    pub image_paths: Mutex<Vec<String>>,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            predict: Mutex::new((StatusCode::OK, predict_ok("42"))),
            image_status: Mutex::new(StatusCode::OK),
            stats_ok: Mutex::new(true),
            clear: Mutex::new(json!({"success": true, "message": "Riwayat berhasil dihapus."})),
            predict_hits: AtomicUsize::new(0),
            image_hits: AtomicUsize::new(0),
            clear_hits: AtomicUsize::new(0),
            uploads: Mutex::new(Vec::new()),
            image_paths: Mutex::new(Vec::new()),
        }
    }
}

impl Backend {
    pub fn hits(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

pub fn predict_ok(log_id: &str) -> Value {
    json!({
        "success": true,
        "dominant_label": "healthy",
        "description": "Daun berwarna hijau merata.",
        "inference_time": 0.084,
        "image_width": 64,
        "image_height": 32,
        "log_id": log_id,
        "detections": [
            {
                "class_id": 3,
                "label": "healthy",
                "confidence": 0.912,
                "bbox": {"x_center": 0.5, "y_center": 0.5, "width": 0.5, "height": 0.5}
            }
        ]
    })
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([20, 120, 40, 255]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

async fn predict(State(b): State<Arc<Backend>>, body: Bytes) -> impl IntoResponse {
    b.predict_hits.fetch_add(1, Ordering::SeqCst);
    b.uploads.lock().unwrap().push(body.to_vec());
    let (status, value) = b.predict.lock().unwrap().clone();
    (
        status,
        [(header::SET_COOKIE, "session=sid-123; Path=/")],
        Json(value),
    )
}

async fn stats(State(b): State<Arc<Backend>>) -> axum::response::Response {
    if !*b.stats_ok.lock().unwrap() {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    Json(json!({
        "success": true,
        "total_detections": 3,
        "healthy_count": 1,
        "per_class": {"algal": 2, "healthy": 1}
    }))
    .into_response()
}

async fn history(headers: HeaderMap) -> Json<Value> {
    let has_session = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("session=sid-123"));
    if has_session {
        Json(json!({
            "success": true,
            "history": [
                {"id": "42", "timestamp": "2026-10-18T09:00:00", "dominant_label": "healthy", "inference_time": 0.084},
                {"timestamp": "2026-10-17T08:00:00"}
            ]
        }))
    } else {
        Json(json!({"success": true, "history": []}))
    }
}

async fn clear_history(State(b): State<Arc<Backend>>) -> Json<Value> {
    b.clear_hits.fetch_add(1, Ordering::SeqCst);
    Json(b.clear.lock().unwrap().clone())
}

async fn image(
    State(b): State<Arc<Backend>>,
    Path(id): Path<String>,
    uri: axum::http::Uri,
) -> axum::response::Response {
    b.image_hits.fetch_add(1, Ordering::SeqCst);
    b.image_paths.lock().unwrap().push(uri.to_string());
    let status = *b.image_status.lock().unwrap();
    if status != StatusCode::OK {
        return (status, "Gambar tidak ditemukan").into_response();
    }
    if id == "missing" {
        return (StatusCode::NOT_FOUND, "Data tidak ditemukan").into_response();
    }
    ([(header::CONTENT_TYPE, "image/png")], png(64, 32)).into_response()
}

async fn export_pdf(Path(id): Path<String>) -> axum::response::Response {
    if id == "missing" {
        return (StatusCode::NOT_FOUND, "Data tidak ditemukan").into_response();
    }
    (
        [(header::CONTENT_TYPE, "application/pdf")],
        format!("%PDF-1.4 report {id}").into_bytes(),
    )
        .into_response()
}

/// Serves `backend` on an ephemeral port and returns its base URL.
pub async fn spawn(backend: Arc<Backend>) -> String {
    let app = Router::new()
        .route("/predict", post(predict))
        .route("/api/stats", get(stats))
        .route("/api/history", get(history))
        .route("/api/clear-history", post(clear_history))
        .route("/image/{id}", get(image))
        .route("/export-pdf/{id}", get(export_pdf))
        .with_state(backend);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Base URL nothing is listening on.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// View that records what the page would show.
#[derive(Debug, Default)]
pub struct RecordingView {
    pub errors: Vec<String>,
    pub error_visible: bool,
    pub detect_enabled: Vec<bool>,
    pub loading: bool,
    pub results: Vec<DetectionResult>,
    pub results_visible: bool,
    pub stats: Vec<Stats>,
    pub history: Vec<Vec<HistoryEntry>>,
    pub documents: Vec<String>,
    pub edu: Vec<EduCard>,
}

impl View for RecordingView {
    fn show_error(&mut self, error: &UiError) {
        self.errors.push(error.to_string());
        self.error_visible = true;
    }
    fn hide_error(&mut self) {
        self.error_visible = false;
    }
    fn set_detect_enabled(&mut self, enabled: bool) {
        self.detect_enabled.push(enabled);
    }
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
    fn show_results(&mut self, result: &DetectionResult) {
        self.results.push(result.clone());
        self.results_visible = true;
    }
    fn hide_results(&mut self) {
        self.results_visible = false;
    }
    fn show_stats(&mut self, stats: &Stats) {
        self.stats.push(stats.clone());
    }
    fn show_history(&mut self, entries: &[HistoryEntry]) {
        self.history.push(entries.to_vec());
    }
    fn open_document(&mut self, url: &str) {
        self.documents.push(url.to_string());
    }
    fn show_edu(&mut self, card: &EduCard) {
        self.edu.push(card.clone());
    }
}
