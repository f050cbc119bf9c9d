// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The rasterizer.  Takes a FrameSpec and produces the pixel buffer,
//! farming the per-pixel work out to a pool of scoped worker threads.
//!
//! The interesting part is what it *doesn't* compute.  The renderer
//! keeps the last frame it produced, and when the next frame overlaps
//! it at the same scale the shared rectangle is copied over wholesale.
//! What remains to be computed is the canvas minus that rectangle,
//! which decomposes into at most four strips arranged in a ring
//! around it:
//!
//! ```text
//! +------+
//! |000000|
//! |11xxx2|
//! |11xxx2|
//! |333333|
//! +------+
//! ```
//!
//! Each strip is diced into row-aligned work units of roughly
//! `PREFERRED_UNIT_SIZE` pixels, and the units are fed to the workers
//! through a shared queue.  Units cover disjoint pixel rectangles, so
//! the workers never contend on output: each renders into a private
//! block that is blitted into the frame after the join.

use std::sync::{Arc, Mutex};

use crossbeam;
use num::Complex;
use num_cpus;

use color::color_of;
use convergence::ConvergenceEngine;
use error::GenerationError;
use frame::FrameSpec;
use overlap::compute_overlap;

/// Number of pixels a work unit should aim for.  Big enough that a
/// unit amortizes its queue and allocation overhead, small enough
/// that an image splits into more units than cores and the pool stays
/// busy to the end.
const PREFERRED_UNIT_SIZE: usize = 50_000;

/// An axis-aligned pixel rectangle within the frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Rect {
    px: usize,
    py: usize,
    width: usize,
    height: usize,
}

impl Rect {
    fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// One parcel of work: a run of whole rows within a strip.  Together
/// with the FrameSpec it is self-contained, and units never share a
/// pixel, so they can be processed in any order on any thread.
#[derive(Copy, Clone, Debug)]
struct WorkUnit {
    px: usize,
    py: usize,
    width: usize,
    rows: usize,
}

/// The frame retained from the previous render, consulted read-only
/// at the start of the next one.
struct PreviousFrame {
    spec: FrameSpec,
    pixels: Vec<u32>,
}

/// Renders frames one at a time, recycling whatever the previous
/// frame can contribute.  The previous frame lives here as plain
/// owned state: taking `&mut self` makes overlapping renders against
/// one renderer a compile error rather than a runtime lock.
pub struct FrameRenderer<E> {
    engine: E,
    threads: usize,
    previous: Option<PreviousFrame>,
}

impl<E: ConvergenceEngine> FrameRenderer<E> {
    /// A renderer using one worker per logical CPU.
    pub fn new(engine: E) -> FrameRenderer<E> {
        FrameRenderer::with_threads(engine, num_cpus::get())
    }

    /// A renderer with an explicit worker count.  A count of zero is
    /// treated as one.
    pub fn with_threads(engine: E, threads: usize) -> FrameRenderer<E> {
        FrameRenderer {
            engine,
            threads: threads.max(1),
            previous: None,
        }
    }

    /// Forget the previous frame.  The next render recomputes every
    /// pixel.
    pub fn clear(&mut self) {
        self.previous = None;
    }

    /// Generate the frame described by `spec` and return its pixel
    /// buffer: packed 0x00RRGGBB, row-major, top-to-bottom.
    ///
    /// On success the frame is also retained for overlap reuse by the
    /// next call.  On any error nothing is retained and the previous
    /// frame survives untouched, so an interactive caller can keep
    /// showing it.
    pub fn render(&mut self, spec: &FrameSpec) -> Result<Vec<u32>, GenerationError> {
        spec.validate()?;

        let mut pixels = vec![0u32; spec.len()];
        let ignored = self.copy_reusable(spec, &mut pixels);
        let units = make_units(spec, ignored);
        self.generate(spec, units, &mut pixels)?;

        self.previous = Some(PreviousFrame {
            spec: spec.clone(),
            pixels: pixels.clone(),
        });
        Ok(pixels)
    }

    /// If the previous frame overlaps the new one, blit the shared
    /// rectangle into the new buffer and return it as the area the
    /// workers must leave alone.
    fn copy_reusable(&self, spec: &FrameSpec, pixels: &mut [u32]) -> Option<Rect> {
        let previous = self.previous.as_ref()?;
        let overlap = compute_overlap(&previous.spec, spec)?;
        for row in 0..overlap.py_size {
            let src =
                (overlap.py_begin_in_source + row) * previous.spec.px_size + overlap.px_begin_in_source;
            let dst = (overlap.py_begin_in_destination + row) * spec.px_size
                + overlap.px_begin_in_destination;
            pixels[dst..dst + overlap.px_size]
                .copy_from_slice(&previous.pixels[src..src + overlap.px_size]);
        }
        Some(Rect {
            px: overlap.px_begin_in_destination,
            py: overlap.py_begin_in_destination,
            width: overlap.px_size,
            height: overlap.py_size,
        })
    }

    /// Run the work units through the thread pool and blit the
    /// resulting blocks into the frame.
    fn generate(
        &self,
        spec: &FrameSpec,
        units: Vec<WorkUnit>,
        pixels: &mut [u32],
    ) -> Result<(), GenerationError> {
        if units.is_empty() {
            // Full overlap; the copy already was the whole frame.
            return Ok(());
        }

        let workers = self.threads.min(units.len());
        let unit_count = units.len();
        let queue = Arc::new(Mutex::new(units.into_iter()));
        let engine = &self.engine;

        let rendered = match crossbeam::scope(|spawner| {
            let mut handles = Vec::with_capacity(workers);
            for _ in 0..workers {
                let queue = queue.clone();
                handles.push(spawner.spawn(move |_| {
                    let mut done = Vec::new();
                    loop {
                        let unit = { queue.lock().unwrap().next() };
                        match unit {
                            Some(unit) => {
                                let block = generate_unit(engine, spec, &unit);
                                done.push((unit, block));
                            }
                            None => break,
                        }
                    }
                    done
                }));
            }
            let mut rendered = Vec::with_capacity(unit_count);
            for handle in handles {
                match handle.join() {
                    Ok(mut blocks) => rendered.append(&mut blocks),
                    Err(_) => return Err(GenerationError::Worker),
                }
            }
            Ok(rendered)
        }) {
            Ok(result) => result?,
            Err(_) => return Err(GenerationError::Worker),
        };

        for (unit, block) in rendered {
            for row in 0..unit.rows {
                let dst = (unit.py + row) * spec.px_size + unit.px;
                let src = row * unit.width;
                pixels[dst..dst + unit.width].copy_from_slice(&block[src..src + unit.width]);
            }
        }
        Ok(())
    }
}

/// Render one unit into a private block, row-major.
///
/// Every pixel's plane coordinate is derived directly from the
/// FrameSpec mapping rather than by stepping a running value across
/// the unit.  Stepping
/// would be a hair cheaper but would make a pixel's value depend on
/// where its unit happened to start, and the reuse machinery requires
/// that a recycled pixel be bit-identical to a recomputed one.
fn generate_unit<E: ConvergenceEngine>(
    engine: &E,
    spec: &FrameSpec,
    unit: &WorkUnit,
) -> Vec<u32> {
    let mut block = Vec::with_capacity(unit.width * unit.rows);
    for row in 0..unit.rows {
        let im = spec.ry_value((unit.py + row) as i64);
        for col in 0..unit.width {
            let re = spec.rx_value((unit.px + col) as i64);
            let result = engine.check_convergence(Complex::new(re, im), spec.max_iterations);
            block.push(color_of(&result, &spec.palette));
        }
    }
    block
}

/// The canvas minus the ignored rectangle, as up to four disjoint
/// strips: a full-width strip above, one below, and the two side
/// pieces spanning the ignored rows.  No ignored area means the
/// single strip covering everything.
fn sections(spec: &FrameSpec, ignored: Option<Rect>) -> Vec<Rect> {
    let full = Rect {
        px: 0,
        py: 0,
        width: spec.px_size,
        height: spec.py_size,
    };
    let ign = match ignored {
        None => return vec![full],
        Some(r) => r,
    };
    let candidates = [
        Rect {
            px: 0,
            py: 0,
            width: full.width,
            height: ign.py,
        },
        Rect {
            px: 0,
            py: ign.py,
            width: ign.px,
            height: ign.height,
        },
        Rect {
            px: ign.px + ign.width,
            py: ign.py,
            width: full.width - ign.px - ign.width,
            height: ign.height,
        },
        Rect {
            px: 0,
            py: ign.py + ign.height,
            width: full.width,
            height: full.height - ign.py - ign.height,
        },
    ];
    candidates.iter().cloned().filter(|s| !s.is_empty()).collect()
}

/// Dice the strips into row-aligned work units of at most
/// `PREFERRED_UNIT_SIZE` pixels (always at least one row, however
/// wide the frame is); each strip's final unit takes whatever rows
/// are left.
fn make_units(spec: &FrameSpec, ignored: Option<Rect>) -> Vec<WorkUnit> {
    let mut units = Vec::new();
    for section in sections(spec, ignored) {
        let rows_per_unit = (PREFERRED_UNIT_SIZE / section.width).max(1);
        let mut claimed = 0;
        while claimed < section.height {
            let rows = rows_per_unit.min(section.height - claimed);
            units.push(WorkUnit {
                px: section.px,
                py: section.py + claimed,
                width: section.width,
                rows,
            });
            claimed += rows;
        }
    }
    units
}
