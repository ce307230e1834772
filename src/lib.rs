//! Dominant-color extraction and viewport mapping for an image color picker.
//!
//! Two independent subsystems back the picker's interesting behavior:
//!
//! - A median-cut quantization pipeline that turns a decoded image into a
//!   small ordered palette of representative colors: a single scan buckets
//!   pixels into a reduced-precision histogram, the occupied color space is
//!   recursively split into boxes, and each box becomes one [`Swatch`]
//!   ranked by pixel population.
//! - A viewport mapper translating between on-screen pointer coordinates
//!   and exact image pixels under a fit-to-container scale and a bounded
//!   user zoom factor.
//!
//! Image decoding, rendering, and every other GUI concern stay outside;
//! pixels come in through the [`PixelSource`] trait and results leave as
//! plain values.
//!
//! ```
//! use hueboard::{extract_palette, PixelView};
//!
//! let pixels = vec![rgb::RGB { r: 64, g: 128, b: 208 }; 16 * 16];
//! let view = PixelView::new(&pixels, 16, 16)?;
//! let swatches = extract_palette(&view, 7)?;
//! assert_eq!(swatches.len(), 1);
//! assert_eq!(swatches[0].hex(), "#4080d0");
//! # Ok::<(), hueboard::PickError>(())
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod histogram;
pub mod median_cut;
pub mod palette;
pub mod source;
pub mod viewport;

pub use error::PickError;
pub use histogram::{Histogram, ReducedColor, DEFAULT_REDUCTION_BITS};
pub use median_cut::{quantize, quantize_with, CancelToken, ColorBox};
pub use palette::{assemble, hex_color, Swatch};
pub use source::{PixelSource, PixelView};
pub use viewport::{
    fit_scale_ratio, image_pixel_to_viewport_size, viewport_point_to_image_pixel, zoom,
    ViewportState, ZoomChange, ZoomDirection, FIT_MARGIN, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP,
};

use rgb::RGB;
use tracing::debug;

/// Swatches extracted when the caller does not ask for a specific count.
pub const DEFAULT_COLOR_COUNT: u32 = 7;

/// Configuration for palette extraction.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Number of swatches to produce (at least 1). Fewer come back when the
    /// image holds fewer distinct reduced colors.
    pub color_count: u32,
    /// Bits kept per channel when bucketing colors (1..=8).
    pub reduction_bits: u8,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            color_count: DEFAULT_COLOR_COUNT,
            reduction_bits: DEFAULT_REDUCTION_BITS,
        }
    }
}

impl ExtractConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color_count(mut self, n: u32) -> Self {
        self.color_count = n;
        self
    }

    pub fn reduction_bits(mut self, bits: u8) -> Self {
        self.reduction_bits = bits;
        self
    }
}

/// Extract the `color_count` dominant colors of `source`, most populous
/// first.
pub fn extract_palette<S: PixelSource + ?Sized>(
    source: &S,
    color_count: u32,
) -> Result<Vec<Swatch>, PickError> {
    extract_palette_with(source, &ExtractConfig::new().color_count(color_count))
}

/// Extract a palette under an explicit [`ExtractConfig`].
pub fn extract_palette_with<S: PixelSource + ?Sized>(
    source: &S,
    config: &ExtractConfig,
) -> Result<Vec<Swatch>, PickError> {
    run_extraction(source, config, None)
}

/// Like [`extract_palette_with`], checking `cancel` between box splits.
///
/// A cancelled run is not an error: it returns the swatches for however
/// many boxes were produced before the checkpoint fired, still ordered and
/// still covering every pixel.
pub fn extract_palette_cancellable<S: PixelSource + ?Sized>(
    source: &S,
    config: &ExtractConfig,
    cancel: &CancelToken,
) -> Result<Vec<Swatch>, PickError> {
    run_extraction(source, config, Some(cancel))
}

fn run_extraction<S: PixelSource + ?Sized>(
    source: &S,
    config: &ExtractConfig,
    cancel: Option<&CancelToken>,
) -> Result<Vec<Swatch>, PickError> {
    validate_inputs(source, config)?;

    let hist = Histogram::build(source, config.reduction_bits)?;
    debug!(
        buckets = hist.distinct_colors(),
        pixels = hist.total(),
        "color histogram built"
    );

    let boxes = median_cut::quantize_with(&hist, config.color_count as usize, cancel);
    debug!(boxes = boxes.len(), target = config.color_count, "median cut finished");

    Ok(palette::assemble(&boxes, &hist))
}

fn validate_inputs<S: PixelSource + ?Sized>(
    source: &S,
    config: &ExtractConfig,
) -> Result<(), PickError> {
    if source.width() == 0 || source.height() == 0 {
        return Err(PickError::ZeroDimension);
    }
    if config.color_count == 0 {
        return Err(PickError::InvalidColorCount(config.color_count));
    }
    Ok(())
}

/// Color sample resolved under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickedColor {
    /// Image pixel coordinates.
    pub x: usize,
    pub y: usize,
    pub color: RGB<u8>,
}

impl PickedColor {
    /// Canonical lower-case `#rrggbb` form for the status bar or clipboard.
    pub fn hex(&self) -> String {
        palette::hex_color(self.color)
    }
}

/// Resolve the image pixel under a pointer position and read its color.
///
/// `None` when the pointer sits over the letterboxed margin or outside the
/// displayed image; the presentation layer treats that as "cursor left the
/// image".
pub fn color_under_cursor<S: PixelSource + ?Sized>(
    source: &S,
    view: &ViewportState,
    pointer_x: f64,
    pointer_y: f64,
) -> Option<PickedColor> {
    let (x, y) = view.pixel_at(pointer_x, pointer_y, source.width(), source.height())?;
    Some(PickedColor {
        x,
        y,
        color: source.pixel(x, y),
    })
}
