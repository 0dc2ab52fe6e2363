use crate::paint::Color;
use crate::render::TRIANGLE_VERTICES;
use crate::time::{Clock, FrameClock, FrameTime, SystemClock};
use crate::transform::{RotationState, TransformSet};

use super::backend::{FrameBackend, FrameStatus};
use super::config::SceneConfig;

/// Frame loop state.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    Running,
    /// Terminal; no further frames are drawn.
    Closing,
}

/// Why the loop left `Running`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CloseReason {
    /// The window asked to close.
    Requested,
    /// The backend reported an unrecoverable surface failure.
    SurfaceFailed,
}

/// Per-frame update/render loop for the spinning triangle.
///
/// Owns the rotation and the transform set exclusively. Each
/// [`iterate`](FrameLoop::iterate) call clears, advances the rotation by the
/// elapsed clock time, uploads the matrices, draws the triangle and presents.
/// Event processing stays with the caller, which reports close requests
/// through [`request_close`](FrameLoop::request_close).
pub struct FrameLoop<C: Clock = SystemClock> {
    clock: FrameClock<C>,
    rotation: RotationState,
    transforms: TransformSet,
    clear_color: Color,
    vertex_count: u32,

    state: LoopState,
    close_reason: Option<CloseReason>,
    frames_drawn: u64,
    last_frame: Option<FrameTime>,
}

impl<C: Clock> FrameLoop<C> {
    /// Creates a running loop. The clock baseline is taken here, so the first
    /// frame's `dt` covers the time between construction and that frame.
    pub fn new(clock: C, config: &SceneConfig, aspect: f32) -> Self {
        Self {
            clock: FrameClock::new(clock),
            rotation: RotationState::new(config.angular_velocity),
            transforms: TransformSet::new(config.camera_distance, config.projection(aspect)),
            clear_color: config.clear_color,
            vertex_count: TRIANGLE_VERTICES.len() as u32,
            state: LoopState::Running,
            close_reason: None,
            frames_drawn: 0,
            last_frame: None,
        }
    }

    /// Moves the loop to `Closing`. Later calls keep the first reason.
    pub fn request_close(&mut self) {
        self.close(CloseReason::Requested);
    }

    fn close(&mut self, reason: CloseReason) {
        if self.state == LoopState::Running {
            log::debug!("frame loop closing: {reason:?} after {} frames", self.frames_drawn);
            self.state = LoopState::Closing;
            self.close_reason = Some(reason);
        }
    }

    /// Runs one iteration against `backend` and returns the resulting state.
    ///
    /// A `Closing` loop returns immediately without touching the backend.
    /// Skipped frames leave the clock untouched, so the next drawn frame
    /// catches the rotation up.
    pub fn iterate<B: FrameBackend + ?Sized>(&mut self, backend: &mut B) -> LoopState {
        if self.state == LoopState::Closing {
            return self.state;
        }

        match backend.begin_frame(self.clear_color) {
            FrameStatus::Ready => {}
            FrameStatus::Skipped => {
                log::trace!("frame skipped");
                return self.state;
            }
            FrameStatus::Failed => {
                log::warn!("surface failed; stopping the frame loop");
                self.close(CloseReason::SurfaceFailed);
                return self.state;
            }
        }

        let ft = self.clock.tick();
        self.rotation.advance(ft.dt);
        self.transforms.set_rotation(self.rotation.wrapped_angle());

        backend.upload_transforms(&self.transforms);
        backend.draw(0..self.vertex_count);
        backend.present();

        self.frames_drawn += 1;
        self.last_frame = Some(ft);

        log::trace!(
            "frame {} dt={:.4}s angle={:.3}rad",
            ft.frame_index,
            ft.dt,
            self.rotation.angle()
        );

        self.state
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn close_reason(&self) -> Option<CloseReason> {
        self.close_reason
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    pub fn transforms(&self) -> &TransformSet {
        &self.transforms
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Timing of the most recent drawn frame.
    pub fn last_frame(&self) -> Option<FrameTime> {
        self.last_frame
    }
}
