use crate::cli::Cli;
use std::path::{Path, PathBuf};

pub const DEFAULT_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_VIEWPORT: u32 = 800;
pub const DEFAULT_SESSION_FILE: &str = ".durianleaf-session";

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub base_url: String,
    /// Width the preview is laid out in, in pixels.
    pub viewport_width: u32,
    pub font: Option<PathBuf>,
    /// Where the backend session cookie is kept between runs. `None` disables persistence.
    pub session_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_URL.to_string(),
            viewport_width: DEFAULT_VIEWPORT,
            font: None,
            session_file: Some(PathBuf::from(DEFAULT_SESSION_FILE)),
        }
    }
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        Self {
            base_url: cli.url.clone(),
            viewport_width: cli.viewport.max(1),
            font: cli.font.clone(),
            session_file: (!cli.no_session).then(|| cli.session_file.clone()),
        }
    }
}

impl Config {
    /// Cookie string saved by a previous run, if any.
    pub fn load_session(&self) -> Option<String> {
        let path = self.session_file.as_deref()?;
        match std::fs::read_to_string(path) {
            Ok(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Ok(_) => None,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read session file");
                None
            }
        }
    }

    pub fn save_session(&self, cookies: Option<&str>) -> std::io::Result<()> {
        let (Some(path), Some(cookies)) = (self.session_file.as_deref(), cookies) else {
            return Ok(());
        };
        write_session(path, cookies)
    }
}

fn write_session(path: &Path, cookies: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, cookies)
}
