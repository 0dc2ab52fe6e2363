use crate::device::Gpu;

/// Renderer-facing context (device/queue + surface format).
///
/// This is intentionally small and stable.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
        }
    }

    #[inline]
    pub fn from_gpu(gpu: &'a Gpu<'_>) -> Self {
        Self::new(gpu.device(), gpu.queue(), gpu.surface_format())
    }
}
