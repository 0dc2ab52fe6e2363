use std::ops::Range;

use winit::window::Window;

use crate::core::{FrameBackend, FrameStatus};
use crate::device::{Gpu, GpuFrame, SurfaceErrorAction};
use crate::paint::Color;
use crate::transform::TransformSet;

use super::scene::TriangleScene;

/// [`FrameBackend`] that renders the triangle scene to a window surface.
///
/// Borrowed for one redraw: the runtime builds it around the window's GPU
/// context and the scene, hands it to the frame loop, then drops it.
pub struct WgpuFrameBackend<'a, 'w> {
    gpu: &'a mut Gpu<'w>,
    scene: &'a TriangleScene,
    window: &'a Window,

    frame: Option<GpuFrame>,
    clear: Color,
    drawn: bool,
    failure: Option<wgpu::SurfaceError>,
}

impl<'a, 'w> WgpuFrameBackend<'a, 'w> {
    pub fn new(gpu: &'a mut Gpu<'w>, scene: &'a TriangleScene, window: &'a Window) -> Self {
        Self {
            gpu,
            scene,
            window,
            frame: None,
            clear: Color::BLACK,
            drawn: false,
            failure: None,
        }
    }

    /// The surface error behind the last [`FrameStatus::Failed`], if any.
    pub fn take_failure(&mut self) -> Option<wgpu::SurfaceError> {
        self.failure.take()
    }

    fn clear_pass(frame: &mut GpuFrame, clear: Color) -> wgpu::RenderPass<'_> {
        frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("spindle triangle pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear.into()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

impl FrameBackend for WgpuFrameBackend<'_, '_> {
    fn begin_frame(&mut self, clear: Color) -> FrameStatus {
        match self.gpu.begin_frame() {
            Ok(frame) => {
                self.frame = Some(frame);
                self.clear = clear;
                self.drawn = false;
                FrameStatus::Ready
            }
            Err(err) => match self.gpu.handle_surface_error(&err) {
                SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                    log::warn!("surface error: {err}; skipping frame");
                    FrameStatus::Skipped
                }
                SurfaceErrorAction::Fatal => {
                    self.failure = Some(err);
                    FrameStatus::Failed
                }
            },
        }
    }

    fn upload_transforms(&mut self, transforms: &TransformSet) {
        self.scene
            .vertex_array
            .upload(self.gpu.queue(), transforms);
    }

    fn draw(&mut self, vertices: Range<u32>) {
        let Some(frame) = self.frame.as_mut() else {
            log::warn!("draw without an acquired frame");
            return;
        };

        let scene = self.scene;
        {
            let mut rpass = Self::clear_pass(frame, self.clear);
            rpass.set_pipeline(scene.program.pipeline());
            rpass.set_bind_group(0, scene.vertex_array.bind_group(), &[]);
            rpass.set_vertex_buffer(0, scene.geometry.buffer().slice(..));
            rpass.draw(vertices, 0..1);
        }
        self.drawn = true;
    }

    fn present(&mut self) {
        let Some(mut frame) = self.frame.take() else {
            return;
        };

        // Nothing drawn: still clear so the frame is not left undefined.
        if !self.drawn {
            drop(Self::clear_pass(&mut frame, self.clear));
        }

        self.window.pre_present_notify();
        self.gpu.submit(frame);
    }
}
