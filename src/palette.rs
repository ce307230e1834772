//! Swatch assembly and textual color representation.

use std::fmt;

use rgb::RGB;

use crate::histogram::Histogram;
use crate::median_cut::ColorBox;

/// A palette entry: the representative color of one color-space box plus
/// the pixel population backing it, used for ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    pub color: RGB<u8>,
    pub population: u64,
}

impl Swatch {
    /// Canonical lower-case `#rrggbb` form, the text written to the
    /// clipboard and shown next to each swatch.
    pub fn hex(&self) -> String {
        hex_color(self.color)
    }
}

impl fmt::Display for Swatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}",
            self.color.r, self.color.g, self.color.b
        )
    }
}

/// Format a color as lower-case `#rrggbb`, two zero-padded hex digits per
/// channel.
pub fn hex_color(color: RGB<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

/// Order boxes into the final swatch list, most populous first.
///
/// The sort is stable, so boxes of equal population keep the quantizer's
/// emission order and the whole pipeline stays reproducible. Two boxes may
/// average to the same displayed color; that is accepted output, not a
/// condition to dedupe.
pub fn assemble(boxes: &[ColorBox], hist: &Histogram) -> Vec<Swatch> {
    let mut swatches: Vec<Swatch> = boxes
        .iter()
        .map(|b| Swatch {
            color: b.mean_color(hist),
            population: b.population(),
        })
        .collect();
    swatches.sort_by(|a, b| b.population.cmp(&a.population));
    swatches
}
