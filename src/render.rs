//! Detection render pipeline: turns detections into an annotated on-screen preview.
//!
//! A [`Preview`] plays the part of the page's image element plus its overlay canvas. It shows
//! either a locally chosen file with boxes drawn client-side, or an annotated image from the
//! backend whose boxes are already burned in. Drawing only ever happens after the image has been
//! decoded, because the overlay is sized from the image's rendered dimensions.

use crate::canvas::{Canvas2d, RasterCanvas};
use crate::error::{ApiError, RenderError};
use crate::geometry::{chip_top, fit_display, to_pixel_rect, DisplaySize, PixelRect};
use crate::model::Detection;
use image::{imageops, Rgba, RgbaImage};
use std::future::Future;
use std::path::Path;

pub const STROKE_COLOR: Rgba<u8> = Rgba([0xE1, 0x1D, 0x48, 0xFF]);
pub const LINE_WIDTH: u32 = 2;
/// `rgba(0,0,0,0.6)`
pub const CHIP_COLOR: Rgba<u8> = Rgba([0, 0, 0, 153]);
pub const CHIP_HEIGHT: f64 = 18.0;
pub const CHIP_PADDING: f64 = 10.0;
pub const TEXT_COLOR: Rgba<u8> = Rgba([0xFF, 0xFF, 0xFF, 0xFF]);
pub const DEFAULT_LABEL: &str = "obj";

/// Annotated images are fetched at most this many times before giving up.
const ANNOTATED_FETCH_ATTEMPTS: usize = 2;

/// Text of the chip above a box: the label plus the confidence as a whole percentage.
pub fn label_text(det: &Detection) -> String {
    let label = det.label.as_deref().unwrap_or(DEFAULT_LABEL);
    match det.confidence {
        Some(c) => format!("{label} {:.0}%", (c * 100.0).round()),
        None => label.to_string(),
    }
}

/// Draws every detection that has a box onto `canvas`.
///
/// `display` is the rendered size of the image the canvas covers, or `None` while no image is
/// loaded. The canvas is cleared first; with nothing to draw it is left blank at its current size.
/// Otherwise the backing store is resized to `display` on every call, since the image may have
/// been re-laid out since the last draw.
pub fn draw_boxes<C: Canvas2d + ?Sized>(
    detections: &[Detection],
    display: Option<DisplaySize>,
    canvas: &mut C,
) {
    canvas.clear();

    let display = match display {
        Some(d) if !detections.is_empty() => d,
        _ => return,
    };
    canvas.resize(display);

    for det in detections {
        let Some(bbox) = &det.bbox else {
            continue;
        };
        let rect = to_pixel_rect(bbox, display);
        let text = label_text(det);

        canvas.stroke_rect(rect, STROKE_COLOR, LINE_WIDTH);

        let text_w = canvas.measure_text(&text);
        canvas.fill_rect(
            PixelRect {
                x: rect.x,
                y: chip_top(rect.y, CHIP_HEIGHT),
                w: text_w + CHIP_PADDING,
                h: CHIP_HEIGHT,
            },
            CHIP_COLOR,
        );
        canvas.fill_text(
            &text,
            rect.x + CHIP_PADDING / 2.0,
            chip_top(rect.y, CHIP_HEIGHT - 2.0),
            TEXT_COLOR,
        );
    }
}

/// Where the currently shown image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    /// A local file; boxes are drawn on the overlay.
    Local,
    /// A server-rendered image; the overlay stays blank.
    Annotated,
}

/// Anything that can produce the bytes behind an image URL.
pub trait ImageFetcher {
    fn fetch_image(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, ApiError>> + Send;
}

struct Loaded {
    kind: PreviewKind,
    image: RgbaImage,
}

/// Preview surface: the displayed image and the overlay canvas stacked on top of it.
pub struct Preview<C: Canvas2d = RasterCanvas> {
    src: Option<String>,
    loaded: Option<Loaded>,
    viewport_width: u32,
    display: DisplaySize,
    canvas: C,
}

impl<C: Canvas2d> Preview<C> {
    pub fn new(canvas: C, viewport_width: u32) -> Self {
        Self {
            src: None,
            loaded: None,
            viewport_width,
            display: DisplaySize::default(),
            canvas,
        }
    }

    /// Source of the image currently shown.
    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    pub fn kind(&self) -> Option<PreviewKind> {
        self.loaded.as_ref().map(|l| l.kind)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn display_size(&self) -> DisplaySize {
        self.display
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// Blanks the overlay without touching the image.
    pub fn clear_overlay(&mut self) {
        self.canvas.clear();
    }

    /// Redraws the overlay for the image shown now. Annotated images carry their own boxes.
    pub fn draw(&mut self, detections: &[Detection]) {
        match self.kind() {
            Some(PreviewKind::Local) => draw_boxes(detections, Some(self.display), &mut self.canvas),
            Some(PreviewKind::Annotated) => self.canvas.clear(),
            None => draw_boxes(detections, None, &mut self.canvas),
        }
    }

    /// Loads a local image file, then overlays whatever detections are held (often none yet).
    ///
    /// On failure the previous image stays on screen.
    pub async fn render_local_preview(
        &mut self,
        path: &Path,
        detections: &[Detection],
    ) -> Result<(), RenderError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| RenderError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let src = path.display().to_string();
        let image = decode(src.clone(), bytes).await?;
        self.show(src, PreviewKind::Local, image);
        self.draw(detections);
        tracing::debug!(src = self.src(), display = ?self.display, "local preview rendered");
        Ok(())
    }

    /// Fetches and shows a server-annotated image, blanking the overlay once it has loaded.
    ///
    /// A failed fetch is retried once. If the image still cannot be loaded, the previous
    /// visual state is kept and the error is returned for the caller to report.
    pub async fn render_annotated_image<F: ImageFetcher>(
        &mut self,
        url: &str,
        fetcher: &F,
    ) -> Result<(), RenderError> {
        let mut attempt = 0;
        let bytes = loop {
            attempt += 1;
            match fetcher.fetch_image(url).await {
                Ok(bytes) => break bytes,
                Err(source) if attempt >= ANNOTATED_FETCH_ATTEMPTS => {
                    return Err(RenderError::Fetch {
                        url: url.to_string(),
                        source,
                    });
                }
                Err(e) => tracing::warn!(url, error = %e, "annotated image fetch failed, retrying"),
            }
        };
        let image = decode(url.to_string(), bytes).await?;
        self.show(url.to_string(), PreviewKind::Annotated, image);
        self.canvas.clear();
        tracing::debug!(src = url, display = ?self.display, "annotated image rendered");
        Ok(())
    }

    /// Re-lays out the image for a new viewport width and keeps the overlay aligned with it.
    pub fn on_resize(&mut self, viewport_width: u32, detections: &[Detection]) {
        self.viewport_width = viewport_width;
        if let Some(loaded) = &self.loaded {
            self.display = fit_display(loaded.image.dimensions(), viewport_width);
        }
        self.draw(detections);
    }

    fn show(&mut self, src: String, kind: PreviewKind, image: RgbaImage) {
        self.display = fit_display(image.dimensions(), self.viewport_width);
        self.src = Some(src);
        self.loaded = Some(Loaded { kind, image });
    }
}

impl Preview<RasterCanvas> {
    /// What is on screen: the image at its display size with the overlay composited on top.
    pub fn compose(&self) -> Option<RgbaImage> {
        let loaded = self.loaded.as_ref()?;
        if self.display.is_empty() {
            return None;
        }
        let mut frame = if loaded.image.dimensions() == (self.display.width, self.display.height) {
            loaded.image.clone()
        } else {
            imageops::resize(
                &loaded.image,
                self.display.width,
                self.display.height,
                imageops::FilterType::Triangle,
            )
        };
        imageops::overlay(&mut frame, self.canvas.pixels(), 0, 0);
        Some(frame)
    }
}

async fn decode(src: String, bytes: Vec<u8>) -> Result<RgbaImage, RenderError> {
    let task_src = src.clone();
    tokio::task::spawn_blocking(move || {
        image::load_from_memory(&bytes)
            .map(|img| img.to_rgba8())
            .map_err(|e| RenderError::Decode {
                src: task_src,
                reason: e.to_string(),
            })
    })
    .await
    .map_err(|e| RenderError::Decode {
        src,
        reason: e.to_string(),
    })?
}
