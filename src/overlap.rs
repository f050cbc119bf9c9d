//! Computes how much of the previous frame can be recycled into the
//! next one.  When two frames share a scale, their pixel grids are
//! two windows onto the same lattice of plane points, and the
//! rectangle where the windows intersect can be copied instead of
//! recomputed.  The rectangle is described twice over, once in each
//! frame's own pixel coordinates.

use frame::FrameSpec;

/// The pixel rectangle shared by two frames of equal scale, located
/// in both frames' coordinate systems.  `source` is the frame being
/// copied from (the previous frame), `destination` the one being
/// generated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Overlap {
    /// Width of the shared rectangle in pixels.
    pub px_size: usize,
    /// Height of the shared rectangle in pixels.
    pub py_size: usize,
    /// Leftmost column of the rectangle in the source frame.
    pub px_begin_in_source: usize,
    /// Topmost row of the rectangle in the source frame.
    pub py_begin_in_source: usize,
    /// Leftmost column of the rectangle in the destination frame.
    pub px_begin_in_destination: usize,
    /// Topmost row of the rectangle in the destination frame.
    pub py_begin_in_destination: usize,
}

/// Find the reusable rectangle between a previous frame and the next
/// one, or None when nothing can be reused.
///
/// Reuse requires pixel-for-pixel identical output, so the scales
/// must match exactly (a changed scale makes pixel alignment
/// meaningless), and so must the iteration cap and the palette, both
/// of which change colors without changing geometry.  Given all
/// that, the rectangle is found by anchoring both grids at their
/// shared plane point: the overlap extends from each edge by the
/// smaller of the two center-to-edge distances.
pub fn compute_overlap(prev: &FrameSpec, next: &FrameSpec) -> Option<Overlap> {
    if prev.scale != next.scale
        || prev.max_iterations != next.max_iterations
        || prev.palette != next.palette
    {
        return None;
    }

    // The previous frame's center, seen from each grid.  In its own
    // grid it sits at the grid center by construction.
    let (px_in_prev, py_in_prev) = prev.pixel_center();
    let (px_in_next, py_in_next) = next.pixel_coordinates_of(prev.center);

    let px_to_begin = px_in_prev.min(px_in_next);
    let py_to_begin = py_in_prev.min(py_in_next);
    let px_to_end = (prev.px_size as i64 - px_in_prev).min(next.px_size as i64 - px_in_next);
    let py_to_end = (prev.py_size as i64 - py_in_prev).min(next.py_size as i64 - py_in_next);

    let px_size = px_to_begin + px_to_end;
    let py_size = py_to_begin + py_to_end;
    if px_size <= 0 || py_size <= 0 {
        return None;
    }

    Some(Overlap {
        px_size: px_size as usize,
        py_size: py_size as usize,
        px_begin_in_source: (px_in_prev - px_to_begin) as usize,
        py_begin_in_source: (py_in_prev - py_to_begin) as usize,
        px_begin_in_destination: (px_in_next - px_to_begin) as usize,
        py_begin_in_destination: (py_in_next - py_to_begin) as usize,
    })
}
