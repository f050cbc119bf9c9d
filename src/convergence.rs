// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time test.  Given a point c on the complex plane, the
//! Mandelbrot iteration z = z * z + c either stays bounded forever
//! (the point belongs to the set) or eventually "escapes" past
//! magnitude 2, and the number of iterations it took to do so is the
//! value the colorizer turns into a pixel.
//!
//! The test is expressed as a trait so that other escape-time
//! formulae are new implementations rather than new subclasses; the
//! renderer is generic over it.

use num::Complex;

/// Iteration count reported when the point is already outside the
/// escape radius before the first iteration.
pub const ESCAPED_IMMEDIATELY: u32 = 0;

/// Iteration count reported when the point never escaped within the
/// cap.  Larger than any permissible cap.
pub const NON_ESCAPING: u32 = ::std::u32::MAX;

/// The outcome of an escape test: how many iterations the point took
/// to escape (or one of the two sentinels above), and the value of
/// the iterate when the test stopped.  The final iterate feeds the
/// colorizer's smoothing term.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConvergenceResult {
    /// Number of iterations before escape, `ESCAPED_IMMEDIATELY`, or
    /// `NON_ESCAPING`.
    pub iterations: u32,
    /// Where the iterate was when the test stopped.
    pub point: Complex<f64>,
}

impl ConvergenceResult {
    /// A result for a point that never escaped.
    pub fn non_escaping(point: Complex<f64>) -> ConvergenceResult {
        ConvergenceResult {
            iterations: NON_ESCAPING,
            point,
        }
    }

    /// Whether this point is considered a member of the set.
    pub fn is_non_escaping(&self) -> bool {
        self.iterations == NON_ESCAPING
    }
}

/// A pluggable escape-time test.  Implementations must be pure: no
/// shared mutable state, so that disjoint pixels may be tested from
/// as many threads as the renderer cares to run.
pub trait ConvergenceEngine: Sync {
    /// Check whether `point` escapes within `max_iterations`
    /// iterations, returning the count and the final iterate.
    fn check_convergence(&self, point: Complex<f64>, max_iterations: u32) -> ConvergenceResult;
}

/// The classic Mandelbrot test, z = z * z + c, with two well-known
/// shortcuts: points inside the main cardioid or the period-2 bulb
/// can never escape, and detecting them with a little algebra is far
/// cheaper than grinding through the full iteration cap to find out.
#[derive(Copy, Clone, Debug, Default)]
pub struct MandelbrotEngine;

impl ConvergenceEngine for MandelbrotEngine {
    fn check_convergence(&self, point: Complex<f64>, max_iterations: u32) -> ConvergenceResult {
        let (re, im) = (point.re, point.im);

        // Interior of the main cardioid.
        let q = (re - 0.25) * (re - 0.25) + im * im;
        if q * (q + re - 0.25) < 0.25 * im * im {
            return ConvergenceResult::non_escaping(point);
        }
        // Interior of the period-2 bulb centered on -1.
        if (re + 1.0) * (re + 1.0) + im * im < 0.0625 {
            return ConvergenceResult::non_escaping(point);
        }
        // Already outside the escape radius; no iterations needed.
        if re * re + im * im > 4.0 {
            return ConvergenceResult {
                iterations: ESCAPED_IMMEDIATELY,
                point,
            };
        }

        // The first iteration is implicit: z starts at c rather than
        // zero.  Squared magnitudes throughout; sqrt never pays.
        let mut zr = re;
        let mut zi = im;
        for i in 1..max_iterations {
            let t = zr * zr - zi * zi + re;
            zi = 2.0 * zr * zi + im;
            zr = t;
            if zr * zr + zi * zi > 4.0 {
                return ConvergenceResult {
                    iterations: i,
                    point: Complex::new(zr, zi),
                };
            }
        }
        ConvergenceResult::non_escaping(Complex::new(zr, zi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(re: f64, im: f64, max: u32) -> ConvergenceResult {
        MandelbrotEngine.check_convergence(Complex::new(re, im), max)
    }

    #[test]
    fn origin_never_escapes() {
        for &max in &[1, 2, 50, 10_000] {
            let r = check(0.0, 0.0, max);
            assert!(r.is_non_escaping());
            assert_eq!(r.point, Complex::new(0.0, 0.0));
        }
    }

    #[test]
    fn cardioid_and_bulb_short_circuit() {
        // Deep inside the main cardioid.
        assert!(check(-0.1, 0.1, 1).is_non_escaping());
        // Center of the period-2 bulb.
        assert!(check(-1.0, 0.0, 1).is_non_escaping());
        // Both shortcuts report the input point untouched.
        assert_eq!(check(-1.0, 0.0, 1).point, Complex::new(-1.0, 0.0));
    }

    #[test]
    fn far_away_points_escape_immediately() {
        for &max in &[1, 100, 100_000] {
            let r = check(3.0, 3.0, max);
            assert_eq!(r.iterations, ESCAPED_IMMEDIATELY);
            assert_eq!(r.point, Complex::new(3.0, 3.0));
        }
    }

    #[test]
    fn exterior_point_escapes_after_some_iterations() {
        // c = 0.3 + 0.6i lies outside the set but inside the escape
        // radius, so it takes real work to classify.
        let r = check(0.3, 0.6, 1000);
        assert!(!r.is_non_escaping());
        assert!(r.iterations >= 1);
        assert!(r.point.norm_sqr() > 4.0);
    }

    #[test]
    fn escape_count_is_stable_once_cap_exceeds_it() {
        let first = check(0.3, 0.6, 1000);
        for &max in &[2000, 5000, 100_000] {
            assert_eq!(check(0.3, 0.6, max).iterations, first.iterations);
        }
    }

    #[test]
    fn interior_point_off_the_shortcuts_runs_to_the_cap() {
        // c = -0.16 + 1.032i sits in a tiny bulb off the main body,
        // caught by neither shortcut.
        let r = check(-0.16, 1.032, 2000);
        assert!(r.is_non_escaping());
        assert!(r.point.norm_sqr() <= 4.0);
    }

    #[test]
    fn a_cap_of_one_permits_no_iterations() {
        // Outside both shortcuts, inside the radius: with a cap of 1
        // the loop body never runs.
        let r = check(0.3, 0.6, 1);
        assert!(r.is_non_escaping());
        assert_eq!(r.point, Complex::new(0.3, 0.6));
    }
}
