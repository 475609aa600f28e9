use crate::model::BBox;

/// Rectangle in display pixels, top-left anchored. May extend past the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Integer size of a rendered surface, like `clientWidth`/`clientHeight`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplaySize {
    pub width: u32,
    pub height: u32,
}

impl DisplaySize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Converts a normalized center/size box into pixels on a surface of the given display size.
pub fn to_pixel_rect(bbox: &BBox, display: DisplaySize) -> PixelRect {
    let dw = f64::from(display.width);
    let dh = f64::from(display.height);
    PixelRect {
        x: (bbox.x_center - bbox.width / 2.0) * dw,
        y: (bbox.y_center - bbox.height / 2.0) * dh,
        w: bbox.width * dw,
        h: bbox.height * dh,
    }
}

/// Top edge of a label chip sitting directly above a box whose top is `y`, never above 0.
pub fn chip_top(y: f64, chip_h: f64) -> f64 {
    (y - chip_h).max(0.0)
}

/// Size a responsive image (`max-width: 100%`, auto height) renders at inside a viewport.
pub fn fit_display(natural: (u32, u32), viewport_width: u32) -> DisplaySize {
    let (nw, nh) = natural;
    if nw == 0 || nh == 0 {
        return DisplaySize::default();
    }
    let width = nw.min(viewport_width);
    let height = (f64::from(nh) * f64::from(width) / f64::from(nw)).round() as u32;
    DisplaySize::new(width, height)
}
