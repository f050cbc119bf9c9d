//! Contains the FrameSpec struct, which describes one frame to be
//! rendered: the relationship between a rectangle on the integral
//! pixel plane, with its origin at the top left, and a rectangle on
//! the complex plane anchored at its center point.  A scale value
//! gives the complex-plane distance between adjacent pixels.
//!
//! The y axis is deliberately inverted between the two planes: pixel
//! rows grow downward while the imaginary axis grows upward, so the
//! set is not drawn hanging upside down.

use std::sync::Arc;

use num::Complex;

use error::GenerationError;
use palette::Palette;

/// An immutable description of one frame: pixel dimensions, the
/// complex-plane point under the center of the pixel grid, the
/// per-pixel scale, the iteration cap, and the palette to color with.
/// Construction validates everything, so a FrameSpec in hand is
/// always renderable.
#[derive(Debug, Clone)]
pub struct FrameSpec {
    /// Width of the image in pixels.
    pub px_size: usize,
    /// Height of the image in pixels.
    pub py_size: usize,
    /// The complex-plane point at the center of the pixel grid.
    pub center: Complex<f64>,
    /// Complex-plane distance between adjacent pixels.  Always
    /// positive, and always large enough that stepping by it actually
    /// changes the coordinate (see `new`).
    pub scale: f64,
    /// Maximum number of escape-test iterations per point.
    pub max_iterations: u32,
    /// The palette used to color this frame.  Shared and read-only
    /// during a render.
    pub palette: Arc<Palette>,
}

impl FrameSpec {
    /// Constructor.  Rejects empty images, a non-positive iteration
    /// cap, and any scale that double precision can no longer
    /// resolve: once `center + scale == center` in either axis,
    /// adjacent pixels would all collapse onto the same plane point,
    /// so the zoom step is refused outright rather than clamped.
    pub fn new(
        px_size: usize,
        py_size: usize,
        center: Complex<f64>,
        scale: f64,
        max_iterations: u32,
        palette: Arc<Palette>,
    ) -> Result<FrameSpec, GenerationError> {
        let spec = FrameSpec {
            px_size,
            py_size,
            center,
            scale,
            max_iterations,
            palette,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Re-check the constructor's invariants.  The fields are public,
    /// so the renderer runs this again before dispatching any
    /// parallel work rather than trusting that nobody fiddled.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.px_size == 0 || self.py_size == 0 {
            return Err(GenerationError::InvalidConfiguration(
                "frame dimensions must be positive",
            ));
        }
        if self.max_iterations < 1 {
            return Err(GenerationError::InvalidIterationCap);
        }
        if !(self.scale > 0.0)
            || !self.scale.is_finite()
            || !self.center.re.is_finite()
            || !self.center.im.is_finite()
        {
            return Err(GenerationError::PrecisionExhausted(self.scale));
        }
        if self.center.re + self.scale == self.center.re
            || self.center.im + self.scale == self.center.im
        {
            return Err(GenerationError::PrecisionExhausted(self.scale));
        }
        Ok(())
    }

    /// The total number of pixels in the frame.
    pub fn len(&self) -> usize {
        self.px_size * self.py_size
    }

    /// Whether the frame holds no pixels, which `new` never permits.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The pixel at the center of the grid.
    pub fn pixel_center(&self) -> (i64, i64) {
        ((self.px_size / 2) as i64, (self.py_size / 2) as i64)
    }

    /// The real coordinate of pixel column `px`.
    pub fn rx_value(&self, px: i64) -> f64 {
        self.center.re + ((px - (self.px_size / 2) as i64) as f64) * self.scale
    }

    /// The imaginary coordinate of pixel row `py`.  Rows grow
    /// downward, the imaginary axis upward.
    pub fn ry_value(&self, py: i64) -> f64 {
        self.center.im + (((self.py_size / 2) as i64 - py) as f64) * self.scale
    }

    /// The complex-plane point under a pixel.
    pub fn point_at(&self, px: i64, py: i64) -> Complex<f64> {
        Complex::new(self.rx_value(px), self.ry_value(py))
    }

    /// Given a point on the complex plane, the pixel coordinates
    /// (possibly outside the grid, possibly negative) that come
    /// closest to it.  The inverse of `point_at`.
    pub fn pixel_coordinates_of(&self, point: Complex<f64>) -> (i64, i64) {
        let px = ((point.re - self.center.re) / self.scale).round() as i64
            + (self.px_size / 2) as i64;
        let py = ((self.center.im - point.im) / self.scale).round() as i64
            + (self.py_size / 2) as i64;
        (px, py)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::{Color, Palette};

    fn palette() -> Arc<Palette> {
        Arc::new(
            Palette::build(&[Color::new(255, 255, 255), Color::new(255, 0, 0)], 4).unwrap(),
        )
    }

    fn spec(px: usize, py: usize, re: f64, im: f64, scale: f64) -> FrameSpec {
        FrameSpec::new(px, py, Complex::new(re, im), scale, 50, palette()).unwrap()
    }

    #[test]
    fn rejects_empty_dimensions() {
        let r = FrameSpec::new(0, 4, Complex::new(0.0, 0.0), 1.0, 50, palette());
        assert!(r.is_err());
    }

    #[test]
    fn rejects_zero_iteration_cap() {
        let r = FrameSpec::new(4, 4, Complex::new(0.0, 0.0), 1.0, 0, palette());
        assert_eq!(r.unwrap_err(), GenerationError::InvalidIterationCap);
    }

    #[test]
    fn rejects_exhausted_scale() {
        // 1e-18 vanishes next to 1.0 in an f64.
        let r = FrameSpec::new(4, 4, Complex::new(1.0, 1.0), 1e-18, 50, palette());
        match r {
            Err(GenerationError::PrecisionExhausted(_)) => (),
            other => panic!("expected PrecisionExhausted, got {:?}", other),
        }
        // The same scale is fine at a center where f64 can resolve it.
        assert!(FrameSpec::new(4, 4, Complex::new(0.0, 0.0), 1e-18, 50, palette()).is_ok());
    }

    #[test]
    fn rejects_nonpositive_scale() {
        assert!(FrameSpec::new(4, 4, Complex::new(0.0, 0.0), 0.0, 50, palette()).is_err());
        assert!(FrameSpec::new(4, 4, Complex::new(0.0, 0.0), -1.0, 50, palette()).is_err());
    }

    #[test]
    fn center_pixel_maps_to_center_point() {
        let s = spec(4, 4, 0.0, 0.0, 1.0);
        assert_eq!(s.point_at(2, 2), Complex::new(0.0, 0.0));
        assert_eq!(s.rx_value(0), -2.0);
        assert_eq!(s.rx_value(3), 1.0);
        // Row 0 is the top of the image, so its imaginary part is high.
        assert_eq!(s.ry_value(0), 2.0);
        assert_eq!(s.ry_value(3), -1.0);
    }

    #[test]
    fn pixel_coordinates_invert_point_at() {
        let s = spec(640, 480, -0.5, 0.25, 0.003);
        for &(px, py) in &[(0, 0), (320, 240), (639, 479), (17, 401)] {
            assert_eq!(s.pixel_coordinates_of(s.point_at(px, py)), (px, py));
        }
    }

    #[test]
    fn points_off_the_grid_map_off_the_grid() {
        let s = spec(4, 4, 0.0, 0.0, 1.0);
        assert_eq!(s.pixel_coordinates_of(Complex::new(-5.0, 0.0)), (-3, 2));
        assert_eq!(s.pixel_coordinates_of(Complex::new(0.0, 9.0)), (2, -7));
    }
}
