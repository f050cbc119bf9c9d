#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Panbrot: an interactive Mandelbrot rasterizer
//!
//! An escape-time fractal is drawn by classifying every point of the
//! complex plane by how many iterations of a formula it takes before
//! the point's magnitude exceeds a threshold ("escapes"), then mapping
//! that count to a color.  Panbrot renders such images a frame at a
//! time: the caller describes a viewport (center, scale, pixel
//! dimensions, iteration cap, palette) and receives an owned pixel
//! buffer of packed 32-bit RGB.
//!
//! Because the intended caller is an interactive shell in which the
//! user pans and drags, successive frames usually overlap.  The
//! renderer retains the previous frame and, when the new viewport
//! overlaps the old one at the same scale, copies the shared rectangle
//! instead of recomputing it; only the freshly exposed strips are
//! handed to the worker threads.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate itertools;
extern crate num;
extern crate num_cpus;

pub mod color;
pub mod convergence;
pub mod error;
pub mod frame;
pub mod overlap;
pub mod palette;
pub mod render;

pub use convergence::{ConvergenceEngine, ConvergenceResult, MandelbrotEngine};
pub use error::GenerationError;
pub use frame::FrameSpec;
pub use palette::{Color, Palette};
pub use render::FrameRenderer;
