use crate::config::{DEFAULT_SESSION_FILE, DEFAULT_URL, DEFAULT_VIEWPORT};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "durianleaf", version, about = "Durian leaf disease detection client")]
pub struct Cli {
    /// Base URL of the detection backend.
    #[arg(long, env = "DURIANLEAF_URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// Viewport width the preview is laid out in, in pixels.
    #[arg(long, env = "DURIANLEAF_VIEWPORT", default_value_t = DEFAULT_VIEWPORT)]
    pub viewport: u32,

    /// TTF/OTF font used for box labels. Without it, label chips are drawn without text.
    #[arg(long, env = "DURIANLEAF_FONT")]
    pub font: Option<PathBuf>,

    /// File the backend session cookie is kept in between runs.
    #[arg(long, env = "DURIANLEAF_SESSION", default_value = DEFAULT_SESSION_FILE)]
    pub session_file: PathBuf,

    /// Do not read or write the session file.
    #[arg(long)]
    pub no_session: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Upload an image and show the detection result.
    Detect {
        image: PathBuf,
        /// Write the on-screen preview (annotated) to this file.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Show educational content for the dominant label.
        #[arg(long)]
        edu: bool,
        /// Download the PDF report to this file.
        #[arg(long)]
        pdf: Option<PathBuf>,
    },
    /// List past detections of this session.
    History,
    /// Show detection statistics of this session.
    Stats,
    /// Fetch the annotated image of a past detection.
    Show {
        id: String,
        #[arg(long)]
        out: PathBuf,
    },
    /// Download the PDF report of a past detection.
    Pdf {
        id: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Delete the history of this session.
    ClearHistory,
    /// Show educational content for a label.
    Edu { label: String },
}
