//! Presentation seam. Handlers talk to a [`View`]; how it is shown is up to the implementation.

use crate::edu::EduCard;
use crate::error::UiError;
use crate::model::{DetectionResult, HistoryEntry, Stats};

pub trait View {
    /// Shows the single inline error banner.
    fn show_error(&mut self, error: &UiError);
    fn hide_error(&mut self);
    fn set_detect_enabled(&mut self, enabled: bool);
    fn set_loading(&mut self, loading: bool);
    fn show_results(&mut self, result: &DetectionResult);
    fn hide_results(&mut self);
    fn show_stats(&mut self, stats: &Stats);
    fn show_history(&mut self, entries: &[HistoryEntry]);
    /// Opens a backend document (the PDF report) in a new viewing context.
    fn open_document(&mut self, url: &str);
    fn show_edu(&mut self, card: &EduCard);
}

/// Writes everything to the terminal. Errors go to stderr.
#[derive(Debug, Default)]
pub struct TerminalView {
    base_url: String,
}

impl TerminalView {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl View for TerminalView {
    fn show_error(&mut self, error: &UiError) {
        eprintln!("[ERR] {error}");
    }

    fn hide_error(&mut self) {}

    fn set_detect_enabled(&mut self, enabled: bool) {
        tracing::trace!(enabled, "detect action");
    }

    fn set_loading(&mut self, loading: bool) {
        if loading {
            println!("Mendeteksi...");
        }
    }

    fn show_results(&mut self, result: &DetectionResult) {
        println!("Label dominan : {}", result.dominant_label_text());
        println!("Deskripsi     : {}", result.description_text());
        let timing = result.inference_time_text();
        if !timing.is_empty() {
            println!("{timing}");
        }
        for line in result.detection_lines() {
            println!("  {line}");
        }
    }

    fn hide_results(&mut self) {}

    fn show_stats(&mut self, stats: &Stats) {
        println!("Total deteksi : {}", stats.total_detections);
        println!("Daun sehat    : {}", stats.healthy_count);
        for line in stats.per_class_lines() {
            println!("  {line}");
        }
    }

    fn show_history(&mut self, entries: &[HistoryEntry]) {
        if entries.is_empty() {
            println!("Riwayat kosong.");
            return;
        }
        for entry in entries {
            let [timestamp, label, timing, pdf] = entry.cells();
            let id = entry.id.as_ref().map(|id| id.as_str()).unwrap_or("-");
            println!("{id:<20} {timestamp:<20} {label:<18} {timing:<10} {pdf}");
        }
    }

    fn open_document(&mut self, url: &str) {
        println!("PDF: {}{}", self.base_url.trim_end_matches('/'), url);
    }

    fn show_edu(&mut self, card: &EduCard) {
        println!("{}", card.title);
        println!("{}", card.desc);
        for action in &card.actions {
            println!("  - {action}");
        }
    }
}
