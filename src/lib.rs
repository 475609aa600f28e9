//! Client for the DurianLeaf detection backend: uploads leaf images, renders the detected boxes,
//! and shows history, statistics and educational content per disease label.

pub mod api;
pub mod app;
pub mod canvas;
pub mod cli;
pub mod config;
pub mod edu;
pub mod error;
pub mod geometry;
pub mod model;
pub mod render;
pub mod state;
pub mod view;

pub use api::ApiClient;
pub use app::App;
pub use canvas::{Canvas2d, RasterCanvas};
pub use config::Config;
pub use error::{ApiError, RenderError, UiError};
pub use model::{BBox, Detection, DetectionResult, HistoryEntry, LogId, Stats};
pub use render::{draw_boxes, label_text, Preview};
pub use state::UiState;
pub use view::{TerminalView, View};
