use std::ops::Range;

use crate::paint::Color;
use crate::transform::TransformSet;

/// Outcome of acquiring a frame from the backend.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameStatus {
    /// A frame is acquired and cleared; drawing may proceed.
    Ready,
    /// No frame this iteration (surface busy or being reconfigured).
    Skipped,
    /// The surface failed in a way reconfiguring cannot fix.
    Failed,
}

/// Per-frame GPU operations issued by [`FrameLoop`](super::FrameLoop).
///
/// Within one iteration calls arrive in this order:
/// `begin_frame`, then (only when it returned `Ready`) `upload_transforms`,
/// `draw`, `present`.
pub trait FrameBackend {
    /// Acquires the next frame and clears its color buffer to `clear`.
    fn begin_frame(&mut self, clear: Color) -> FrameStatus;

    /// Uploads model, view and projection to the program's uniform block.
    fn upload_transforms(&mut self, transforms: &TransformSet);

    /// Binds program and geometry and draws `vertices` as a triangle list.
    fn draw(&mut self, vertices: Range<u32>);

    /// Presents the acquired frame.
    fn present(&mut self);
}

impl<B: FrameBackend + ?Sized> FrameBackend for &mut B {
    fn begin_frame(&mut self, clear: Color) -> FrameStatus {
        (**self).begin_frame(clear)
    }

    fn upload_transforms(&mut self, transforms: &TransformSet) {
        (**self).upload_transforms(transforms)
    }

    fn draw(&mut self, vertices: Range<u32>) {
        (**self).draw(vertices)
    }

    fn present(&mut self) {
        (**self).present()
    }
}
