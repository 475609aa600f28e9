//! Event handlers of the detection page.
//!
//! Each handler mirrors one user interaction. State lives in [`UiState`] and is overwritten as a
//! whole; the last completed handler wins.

use crate::api::{image_url, pdf_url, ApiClient};
use crate::canvas::{Canvas2d, RasterCanvas};
use crate::edu::{self, EduCard};
use crate::error::UiError;
use crate::model::{HistoryEntry, PLACEHOLDER};
use crate::render::Preview;
use crate::state::UiState;
use crate::view::View;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const DETECT_FAILED: &str = "Gagal mendeteksi.";
const CLEAR_FAILED: &str = "Gagal menghapus riwayat.";

pub struct App<V: View, C: Canvas2d = RasterCanvas> {
    api: ApiClient,
    view: V,
    preview: Preview<C>,
    state: UiState,
}

impl<V: View, C: Canvas2d> App<V, C> {
    pub fn new(api: ApiClient, view: V, preview: Preview<C>) -> Self {
        Self {
            api,
            view,
            preview,
            state: UiState::default(),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn preview(&self) -> &Preview<C> {
        &self.preview
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// A file was chosen (or the choice was cancelled with `None`).
    pub async fn select_file(&mut self, file: Option<PathBuf>) -> Result<(), UiError> {
        self.state.current_file = file;
        self.clear_result();

        let Some(path) = self.state.current_file.clone() else {
            return Ok(());
        };
        if let Err(e) = self
            .preview
            .render_local_preview(&path, &self.state.last_detections)
            .await
        {
            tracing::warn!(error = %e, "local preview failed");
            return self.fail(UiError::InvalidImage);
        }
        Ok(())
    }

    /// Runs inference on the chosen file. The detect action stays disabled until it settles.
    pub async fn detect(&mut self) -> Result<(), UiError> {
        let Some(file) = self.state.current_file.clone() else {
            return self.fail(UiError::NoFileSelected);
        };

        self.view.hide_error();
        self.view.set_detect_enabled(false);
        self.view.set_loading(true);

        let outcome = self.run_detect(&file).await;

        self.view.set_loading(false);
        self.view.set_detect_enabled(true);

        outcome.or_else(|e| self.fail(e))
    }

    async fn run_detect(&mut self, file: &Path) -> Result<(), UiError> {
        let res = self.api.predict(file).await.map_err(|e| {
            tracing::error!(error = %e, "prediction request failed");
            UiError::Connectivity
        })?;
        if !res.success {
            return Err(UiError::backend(res.message.as_deref(), DETECT_FAILED));
        }

        let result = res.to_result();
        tracing::info!(
            label = result.dominant_label_text(),
            detections = result.detections.len(),
            log_id = ?result.log_id,
            "detection finished"
        );
        self.state.last_detections = result.detections.clone();
        self.state.last_log_id = result.log_id.clone();
        self.state.dominant_label = result.dominant_label.clone();
        self.view.show_results(&result);

        let rendered = match self.state.last_log_id.clone() {
            Some(id) => self.show_annotated(&image_url(&id, now_millis())).await,
            None => {
                self.preview.draw(&self.state.last_detections);
                Ok(())
            }
        };

        self.load_stats().await;
        self.load_history().await;
        rendered
    }

    /// Shows the annotated image of a history row and makes it the target of the PDF action.
    ///
    /// The row only becomes the current result once its image has loaded; on failure the
    /// previous result stays in place, overlay included.
    pub async fn select_history_row(&mut self, entry: &HistoryEntry) -> Result<(), UiError> {
        let Some(id) = entry.id.clone() else {
            return Ok(());
        };
        if let Err(e) = self.show_annotated(&image_url(&id, now_millis())).await {
            return self.fail(e);
        }
        self.state.last_log_id = Some(id);
        self.state.last_detections.clear();
        self.state.dominant_label = entry.dominant_label.clone();
        Ok(())
    }

    /// Opens the PDF report of the current result and returns its path.
    pub fn download_pdf(&mut self) -> Result<String, UiError> {
        let Some(id) = self.state.last_log_id.clone() else {
            return self.fail(UiError::NoPdfData);
        };
        let url = pdf_url(&id);
        self.view.open_document(&url);
        Ok(url)
    }

    pub async fn clear_history(&mut self) -> Result<(), UiError> {
        let res = match self.api.clear_history().await {
            Ok(res) => res,
            Err(e) => {
                tracing::warn!(error = %e, "clear history request failed");
                return self.fail(UiError::ClearHistoryFailed);
            }
        };
        if !res.success {
            return self.fail(UiError::backend(res.message.as_deref(), CLEAR_FAILED));
        }

        self.state.last_log_id = None;
        self.state.last_detections.clear();
        self.preview.clear_overlay();

        self.load_stats().await;
        self.load_history().await;
        Ok(())
    }

    /// Shows the education card for the dominant label of the current result.
    pub fn open_edu(&mut self) -> Result<EduCard, UiError> {
        let label = self
            .state
            .dominant_label
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty() && *l != PLACEHOLDER)
            .map(str::to_string);
        let Some(label) = label else {
            return self.fail(UiError::NoResultForEdu);
        };
        let card = edu::lookup(&label);
        self.view.show_edu(&card);
        Ok(card)
    }

    /// Refreshes the stats panel. Failures are only logged.
    pub async fn load_stats(&mut self) {
        match self.api.stats().await {
            Ok(stats) => self.view.show_stats(&stats),
            Err(e) => tracing::warn!(error = %e, "failed to load stats"),
        }
    }

    /// Refreshes the history table. Failures are only logged.
    pub async fn load_history(&mut self) {
        match self.api.history().await {
            Ok(entries) => {
                self.view.show_history(&entries);
                self.state.history = entries;
            }
            Err(e) => tracing::warn!(error = %e, "failed to load history"),
        }
    }

    /// The viewport changed width; keep the overlay aligned with the re-laid-out image.
    pub fn resize(&mut self, viewport_width: u32) {
        self.preview
            .on_resize(viewport_width, &self.state.last_detections);
    }

    fn clear_result(&mut self) {
        self.view.hide_results();
        self.state.clear_result();
        self.preview.clear_overlay();
        self.view.hide_error();
    }

    async fn show_annotated(&mut self, url: &str) -> Result<(), UiError> {
        self.preview
            .render_annotated_image(url, &self.api)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "annotated image failed to load");
                UiError::ImageLoad
            })
    }

    fn fail<T>(&mut self, error: UiError) -> Result<T, UiError> {
        self.view.show_error(&error);
        Err(error)
    }
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
