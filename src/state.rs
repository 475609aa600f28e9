use crate::model::{Detection, HistoryEntry, LogId};
use std::path::PathBuf;

/// Everything the page remembers between events. Replaced wholesale, never merged.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub current_file: Option<PathBuf>,
    pub last_detections: Vec<Detection>,
    pub last_log_id: Option<LogId>,
    pub dominant_label: Option<String>,
    /// Last history listing, newest first.
    pub history: Vec<HistoryEntry>,
}

impl UiState {
    /// Forgets the current result. The chosen file and history listing are kept.
    pub fn clear_result(&mut self) {
        self.last_detections.clear();
        self.last_log_id = None;
        self.dominant_label = None;
    }
}
