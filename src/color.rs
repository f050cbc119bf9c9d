//! Maps an escape-test result to a pixel color.  Coloring by the raw
//! integer iteration count produces visible banding, since every
//! pixel in a band shares one color; instead the count is smoothed
//! into a real number with the standard "renormalized iteration
//! count" double-log term, and the palette is sampled fractionally.

use convergence::ConvergenceResult;
use palette::Palette;

/// The color of a set member: black.
pub const INTERIOR: u32 = 0;

/// Turn one convergence result into a packed 0x00RRGGBB pixel.
///
/// Non-escaping points are black.  For escaped points the palette is
/// indexed by `n - log2(0.5 * ln|z|^2 / ln 1e100)`, where z is the
/// final iterate; the base-1e100 normalization stretches the smoothing
/// term over the whole palette cycle.  Exactly which formula is used
/// here is a visual tuning choice, not a contract, but it must stay
/// consistent so that reused and recomputed pixels agree.
pub fn color_of(result: &ConvergenceResult, palette: &Palette) -> u32 {
    if result.is_non_escaping() {
        return INTERIOR;
    }
    let mag2 = result.point.norm_sqr();
    // ln of a value <= 1 would feed log2 a non-positive argument and
    // the pixel would come out NaN-colored; clamp to the raw count.
    let v = if mag2 <= 1.0 {
        f64::from(result.iterations)
    } else {
        f64::from(result.iterations) - (0.5 * mag2.ln() / 1e100_f64.ln()).log2()
    };
    palette.get_interpolated(v).pack()
}

#[cfg(test)]
mod tests {
    use super::*;
    use convergence::{ConvergenceResult, ESCAPED_IMMEDIATELY};
    use num::Complex;
    use palette::{Color, Palette};

    fn palette() -> Palette {
        Palette::build(&[Color::new(255, 255, 255), Color::new(255, 0, 0)], 256).unwrap()
    }

    #[test]
    fn set_members_are_black() {
        let r = ConvergenceResult::non_escaping(Complex::new(0.1, 0.1));
        assert_eq!(color_of(&r, &palette()), INTERIOR);
    }

    #[test]
    fn escaped_points_take_a_palette_color() {
        let r = ConvergenceResult {
            iterations: 14,
            point: Complex::new(-3.49, -0.21),
        };
        let c = Color::unpack(color_of(&r, &palette()));
        // All palette entries here have a saturated red channel, and
        // none of them is pure black.
        assert_eq!(c.r, 255);
    }

    #[test]
    fn immediate_escapes_are_colored_not_black() {
        let r = ConvergenceResult {
            iterations: ESCAPED_IMMEDIATELY,
            point: Complex::new(-2.0, 2.0),
        };
        assert_ne!(color_of(&r, &palette()), INTERIOR);
    }

    #[test]
    fn tiny_final_magnitude_clamps_instead_of_nan() {
        // |z|^2 <= 1 at escape cannot happen with the radius-2 test,
        // but an engine implementation is free to stop elsewhere.
        let r = ConvergenceResult {
            iterations: 7,
            point: Complex::new(0.5, 0.0),
        };
        let p = palette();
        assert_eq!(color_of(&r, &p), p.get_interpolated(7.0).pack());
    }

    #[test]
    fn smoothing_only_nudges_within_the_cycle() {
        // Two escapes with the same count but different final
        // magnitudes should land near each other in the palette.
        let p = palette();
        let a = ConvergenceResult {
            iterations: 10,
            point: Complex::new(2.1, 0.0),
        };
        let b = ConvergenceResult {
            iterations: 10,
            point: Complex::new(40.0, 0.0),
        };
        assert_ne!(color_of(&a, &p), INTERIOR);
        assert_ne!(color_of(&b, &p), INTERIOR);
    }
}
