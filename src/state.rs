use wgpu::{
    BindGroup, BindGroupLayout, Device, Instance, Queue, RenderPipeline, Sampler, Surface,
    SurfaceConfiguration, Texture,
};

use crate::input::PointerTracker;
use crate::router::PointerRouter;

pub struct GpuContext {
    pub instance: Instance,
    pub surface: Surface<'static>,
    pub device: Device,
    pub queue: Queue,
    pub config: SurfaceConfiguration,
    pub present_pipeline: RenderPipeline,
    pub frame_bind_group_layout: BindGroupLayout,
    pub sampler: Sampler,
}

/// GPU copy of the composed CPU frame.
pub struct FrameTexture {
    pub texture: Texture,
    pub bind_group: BindGroup,
    pub width: u32,
    pub height: u32,
}

pub struct InputState {
    pub tracker: PointerTracker,
    pub router: PointerRouter,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            tracker: PointerTracker::new(),
            router: PointerRouter::new(),
        }
    }
}
