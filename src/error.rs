//! The ways a render can refuse to happen.  All of these are reported
//! synchronously from the constructor or `render` call that hit them;
//! none of them disturb the renderer's retained previous frame, so an
//! interactive caller may keep displaying the last good image.

/// Errors produced while building palettes or generating frames.
#[derive(Debug, Fail, Clone, PartialEq)]
pub enum GenerationError {
    /// A palette or frame was described with impossible geometry.
    /// Not retryable; the configuration itself is wrong.
    #[fail(display = "invalid configuration: {}", _0)]
    InvalidConfiguration(&'static str),

    /// The requested scale is so small that adjacent pixel
    /// coordinates are no longer distinguishable in an f64.  Zooming
    /// further in is refused rather than silently clamped.
    #[fail(display = "scale {} exhausts double precision at this center", _0)]
    PrecisionExhausted(f64),

    /// The iteration cap must be at least 1.
    #[fail(display = "iteration cap must be at least 1")]
    InvalidIterationCap,

    /// A worker thread died mid-frame.  The partially generated
    /// buffer is discarded and the previous frame is kept.
    #[fail(display = "a render worker failed")]
    Worker,
}
