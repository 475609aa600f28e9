//! Wire types exchanged with the detection backend.
//!
//! The backend is lenient about which fields it sends (an empty prediction has no `log_id`, old
//! history rows may lack `inference_time`), so nearly everything here is optional and decoding
//! never fails on a missing field.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Placeholder shown wherever a field is absent.
pub const PLACEHOLDER: &str = "-";

/// Center/size box with every component a fraction of the image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub class_id: Option<i64>,
    #[serde(default)]
    pub bbox: Option<BBox>,
}

/// Identifier of a logged detection. The backend emits strings, but numeric ids are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LogId(String);

impl LogId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for LogId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Str(String),
            Int(i64),
            Float(f64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Str(s) => LogId(s),
            Raw::Int(n) => LogId(n.to_string()),
            Raw::Float(n) => LogId(n.to_string()),
        })
    }
}

/// Treats `""` the same as a missing id, matching how a falsy id is ignored.
fn non_empty_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<LogId>, D::Error> {
    let id = Option::<LogId>::deserialize(deserializer)?;
    Ok(id.filter(|id| !id.as_str().is_empty()))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detections: Option<Vec<Detection>>,
    #[serde(default)]
    pub dominant_label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub inference_time: Option<f64>,
    #[serde(default, deserialize_with = "non_empty_id")]
    pub log_id: Option<LogId>,
    #[serde(default, deserialize_with = "non_empty_id")]
    pub id: Option<LogId>,
}

impl PredictResponse {
    pub fn log_id(&self) -> Option<&LogId> {
        self.log_id.as_ref().or(self.id.as_ref())
    }

    /// Transient UI copy of a successful prediction.
    pub fn to_result(&self) -> DetectionResult {
        DetectionResult {
            dominant_label: self.dominant_label.clone(),
            description: self.description.clone(),
            inference_time: self.inference_time,
            detections: self.detections.clone().unwrap_or_default(),
            log_id: self.log_id().cloned(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionResult {
    pub dominant_label: Option<String>,
    pub description: Option<String>,
    /// Seconds.
    pub inference_time: Option<f64>,
    pub detections: Vec<Detection>,
    pub log_id: Option<LogId>,
}

impl DetectionResult {
    pub fn dominant_label_text(&self) -> &str {
        self.dominant_label.as_deref().unwrap_or(PLACEHOLDER)
    }

    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or(PLACEHOLDER)
    }

    /// Empty when the backend did not report a timing.
    pub fn inference_time_text(&self) -> String {
        match self.inference_time {
            Some(t) => format!("Waktu inferensi: {t} detik"),
            None => String::new(),
        }
    }

    /// One numbered line per detection, in backend order.
    pub fn detection_lines(&self) -> Vec<String> {
        self.detections
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let label = d.label.as_deref().unwrap_or(PLACEHOLDER);
                let confidence = d
                    .confidence
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| PLACEHOLDER.to_string());
                format!("{}. {label} (confidence: {confidence})", i + 1)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HistoryEntry {
    #[serde(default, deserialize_with = "non_empty_id")]
    pub id: Option<LogId>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub dominant_label: Option<String>,
    #[serde(default)]
    pub inference_time: Option<f64>,
}

impl HistoryEntry {
    /// Cells of a history table row: timestamp, label, timing and the PDF column.
    pub fn cells(&self) -> [String; 4] {
        [
            self.timestamp.clone().unwrap_or_else(|| PLACEHOLDER.into()),
            self.dominant_label
                .clone()
                .unwrap_or_else(|| PLACEHOLDER.into()),
            match self.inference_time {
                Some(t) => format!("{t} s"),
                None => format!("{PLACEHOLDER} s"),
            },
            match &self.id {
                Some(_) => "PDF".into(),
                None => PLACEHOLDER.into(),
            },
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub total_detections: u64,
    #[serde(default)]
    pub healthy_count: u64,
    #[serde(default, deserialize_with = "class_counts")]
    pub per_class: Vec<(String, u64)>,
}

impl Stats {
    pub fn per_class_lines(&self) -> Vec<String> {
        self.per_class
            .iter()
            .map(|(label, count)| format!("{label}: {count}"))
            .collect()
    }
}

/// Keeps per-class counts in the order the backend listed them. Non-numeric counts are dropped.
fn class_counts<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<(String, u64)>, D::Error> {
    let map = Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(map
        .into_iter()
        .filter_map(|(label, count)| count.as_u64().map(|n| (label, n)))
        .collect())
}

/// Reply of mutating endpoints such as `/api/clear-history`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
