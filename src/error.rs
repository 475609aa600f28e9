use thiserror::Error;

/// Failures talking to the detection backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("could not decode response from {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("invalid url {0}")]
    Url(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failures loading or drawing an image surface.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read image {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch image {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: ApiError,
    },
    #[error("failed to decode image {src}: {reason}")]
    Decode { src: String, reason: String },
    #[error("invalid font {path}: {reason}")]
    Font { path: String, reason: String },
}

/// Everything that ends up in the error banner. `Display` is the text the user reads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UiError {
    #[error("Silakan pilih gambar terlebih dahulu.")]
    NoFileSelected,
    #[error("Tidak dapat terhubung ke server.")]
    Connectivity,
    #[error("{0}")]
    Backend(String),
    #[error("Belum ada data PDF.")]
    NoPdfData,
    #[error("Deteksi dulu supaya edukasi bisa ditampilkan.")]
    NoResultForEdu,
    #[error("Gagal menghapus riwayat.")]
    ClearHistoryFailed,
    #[error("Gagal memuat gambar hasil deteksi.")]
    ImageLoad,
    #[error("Gambar tidak dapat dibaca.")]
    InvalidImage,
}

impl UiError {
    /// Backend-reported failure, with a fallback when the backend sent no message.
    pub fn backend(message: Option<&str>, fallback: &str) -> Self {
        match message.map(str::trim).filter(|m| !m.is_empty()) {
            Some(m) => UiError::Backend(m.to_string()),
            None => UiError::Backend(fallback.to_string()),
        }
    }
}
