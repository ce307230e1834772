//! Mapping between viewport (pointer) coordinates and image pixels.
//!
//! Pure functions over explicit state: the presentation layer owns a
//! [`ViewportState`] per loaded image, feeds container-resize and wheel
//! events through it, and consults it on every pointer move to resolve
//! which pixel sits under the cursor. Nothing here blocks or allocates —
//! these calls sit on the interactive input path.

use crate::error::PickError;

/// Fraction of the container left as visual margin around a fitted image.
pub const FIT_MARGIN: f64 = 0.95;

/// Inclusive lower bound of the user zoom factor.
pub const ZOOM_MIN: f64 = 0.5;

/// Inclusive upper bound of the user zoom factor.
pub const ZOOM_MAX: f64 = 2.0;

/// Zoom factor change per wheel step.
pub const ZOOM_STEP: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Result of a zoom step: the new factor plus whether it differs from the
/// previous one, so callers can skip redundant redraws and notifications.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomChange {
    pub factor: f64,
    pub changed: bool,
}

/// Best-fit scale for an image inside a container, leaving a margin on
/// both axes: `0.95 * min(cw/iw, ch/ih)`.
pub fn fit_scale_ratio(
    image_width: usize,
    image_height: usize,
    container_width: usize,
    container_height: usize,
) -> Result<f64, PickError> {
    if image_width == 0 || image_height == 0 {
        return Err(PickError::ZeroDimension);
    }
    if container_width == 0 || container_height == 0 {
        return Err(PickError::EmptyContainer {
            width: container_width,
            height: container_height,
        });
    }
    let x = container_width as f64 / image_width as f64;
    let y = container_height as f64 / image_height as f64;
    Ok(FIT_MARGIN * x.min(y))
}

/// Step the zoom factor and clamp it to `[ZOOM_MIN, ZOOM_MAX]`.
///
/// A step from inside the range that would overshoot a bound lands on the
/// bound; only a step from an already saturated factor leaves it unchanged,
/// reported through [`ZoomChange::changed`].
pub fn zoom(current: f64, direction: ZoomDirection, step: f64) -> ZoomChange {
    let candidate = match direction {
        ZoomDirection::In => current + step,
        ZoomDirection::Out => current - step,
    };
    let factor = candidate.clamp(ZOOM_MIN, ZOOM_MAX);
    ZoomChange {
        factor,
        changed: factor != current,
    }
}

/// Truncating pointer-to-pixel transform.
///
/// No bounds check happens here: a pointer over the letterboxed margin
/// maps to a coordinate outside `[0, width) x [0, height)` and callers
/// must reject it, or use [`ViewportState::pixel_at`] which does.
pub fn viewport_point_to_image_pixel(
    pointer_x: f64,
    pointer_y: f64,
    effective_scale: f64,
) -> (i64, i64) {
    (
        (pointer_x / effective_scale) as i64,
        (pointer_y / effective_scale) as i64,
    )
}

/// Size of the rendered surface for an image at the given scale, rounded
/// to the nearest pixel per axis.
pub fn image_pixel_to_viewport_size(
    image_width: usize,
    image_height: usize,
    effective_scale: f64,
) -> (usize, usize) {
    (
        (image_width as f64 * effective_scale).round() as usize,
        (image_height as f64 * effective_scale).round() as usize,
    )
}

/// Per-image view state owned by the presentation layer.
///
/// `fit_scale_ratio` is recomputed whenever the image or container size
/// changes; `zoom_factor` moves only on zoom input and resets to 1.0 with
/// each freshly loaded image (a new `ViewportState`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    fit_scale_ratio: f64,
    zoom_factor: f64,
    container_width: usize,
    container_height: usize,
}

impl ViewportState {
    /// State for a freshly loaded image: best-fit scale, zoom at 1.0.
    pub fn fit(
        image_width: usize,
        image_height: usize,
        container_width: usize,
        container_height: usize,
    ) -> Result<Self, PickError> {
        let ratio = fit_scale_ratio(image_width, image_height, container_width, container_height)?;
        Ok(Self {
            fit_scale_ratio: ratio,
            zoom_factor: 1.0,
            container_width,
            container_height,
        })
    }

    /// Recompute the fit ratio after a container resize. The user's zoom
    /// factor is untouched.
    pub fn resize_container(
        &mut self,
        image_width: usize,
        image_height: usize,
        container_width: usize,
        container_height: usize,
    ) -> Result<(), PickError> {
        self.fit_scale_ratio =
            fit_scale_ratio(image_width, image_height, container_width, container_height)?;
        self.container_width = container_width;
        self.container_height = container_height;
        Ok(())
    }

    pub fn fit_scale_ratio(&self) -> f64 {
        self.fit_scale_ratio
    }

    pub fn zoom_factor(&self) -> f64 {
        self.zoom_factor
    }

    pub fn container_size(&self) -> (usize, usize) {
        (self.container_width, self.container_height)
    }

    /// Scale actually applied to the image on screen.
    pub fn effective_scale(&self) -> f64 {
        self.fit_scale_ratio * self.zoom_factor
    }

    /// One wheel step in; returns whether the factor changed.
    pub fn zoom_in(&mut self) -> bool {
        self.apply_zoom(ZoomDirection::In)
    }

    /// One wheel step out; returns whether the factor changed.
    pub fn zoom_out(&mut self) -> bool {
        self.apply_zoom(ZoomDirection::Out)
    }

    fn apply_zoom(&mut self, direction: ZoomDirection) -> bool {
        let change = zoom(self.zoom_factor, direction, ZOOM_STEP);
        self.zoom_factor = change.factor;
        change.changed
    }

    /// Image pixel under the pointer, or `None` when the pointer sits over
    /// the letterboxed margin or outside the displayed image.
    pub fn pixel_at(
        &self,
        pointer_x: f64,
        pointer_y: f64,
        image_width: usize,
        image_height: usize,
    ) -> Option<(usize, usize)> {
        if pointer_x < 0.0 || pointer_y < 0.0 {
            return None;
        }
        let (x, y) = viewport_point_to_image_pixel(pointer_x, pointer_y, self.effective_scale());
        if x < 0 || y < 0 || x as u64 >= image_width as u64 || y as u64 >= image_height as u64 {
            return None;
        }
        Some((x as usize, y as usize))
    }

    /// Size of the rendered surface for the image under this state.
    pub fn display_size(&self, image_width: usize, image_height: usize) -> (usize, usize) {
        image_pixel_to_viewport_size(image_width, image_height, self.effective_scale())
    }
}
