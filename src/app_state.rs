use crate::canvas::{BrushState, StrokeSurface};
use crate::color_picker::ColorPicker;
use crate::config::Settings;
use crate::state::{FrameTexture, GpuContext, InputState};
use crate::ui::ControlPanel;
use anyhow::{Context, anyhow};
use std::sync::Arc;
use tiny_skia::Pixmap;
use winit::dpi::PhysicalSize;
use winit::window::Window;

pub struct State {
    pub window: Arc<Window>,
    pub size: PhysicalSize<u32>,

    pub gpu: GpuContext,
    pub frame_texture: FrameTexture,
    /// CPU frame composed on every update and uploaded to `frame_texture`.
    pub frame: Pixmap,
    pub input: InputState,

    pub settings: Settings,
    pub surface: StrokeSurface,
    pub panel: ControlPanel,
    pub picker: ColorPicker,
}

impl State {
    pub async fn new(window: Arc<Window>, settings: Settings) -> anyhow::Result<State> {
        let mut size = window.inner_size();
        size.width = size.width.max(1);
        size.height = size.height.max(1);
        let scale = window.scale_factor() as f32;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("creating window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no graphics adapter for this window")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("requesting graphics device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("window surface reports no texture formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);
        log::info!(
            "Surface configured: {}x{} {:?}",
            size.width,
            size.height,
            surface_format
        );

        let frame_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("frame_bind_group_layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("frame_sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Present Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../data/shaders/present.wgsl").into()),
        });

        let present_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Present Pipeline Layout"),
                bind_group_layouts: &[&frame_bind_group_layout],
                push_constant_ranges: &[],
            });

        let present_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Present Pipeline"),
            layout: Some(&present_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let gpu = GpuContext {
            instance,
            surface,
            device,
            queue,
            config,
            present_pipeline,
            frame_bind_group_layout,
            sampler,
        };

        let frame_texture = create_frame_texture(&gpu, size.width, size.height);
        let frame = Pixmap::new(size.width, size.height)
            .ok_or_else(|| anyhow!("cannot allocate a {}x{} frame", size.width, size.height))?;

        let mut panel = ControlPanel::new(&settings.panel);
        panel.layout(size.width as f32, size.height as f32, scale);

        let mut picker = ColorPicker::new(settings.picker.size);
        picker.layout(size.width as f32, size.height as f32, scale);

        let brush = BrushState::new(settings.brush.color, settings.brush.width);
        let mut surface =
            StrokeSurface::new(size.width, canvas_height(size.height, panel.height()), brush)?;
        panel.apply_width(&mut surface);

        Ok(Self {
            window,
            size,
            gpu,
            frame_texture,
            frame,
            input: InputState::new(),
            settings,
            surface,
            panel,
            picker,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// The platform tore down the native window (Android pause); rebuild the
    /// wgpu surface against the current one.
    pub fn recreate_surface(&mut self) -> anyhow::Result<()> {
        self.gpu.surface = self
            .gpu
            .instance
            .create_surface(self.window.clone())
            .context("recreating window surface")?;
        self.gpu
            .surface
            .configure(&self.gpu.device, &self.gpu.config);
        log::info!("Window surface recreated");
        Ok(())
    }
}

pub(crate) fn create_frame_texture(gpu: &GpuContext, width: u32, height: u32) -> FrameTexture {
    let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("frame_texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("frame_bind_group"),
        layout: &gpu.frame_bind_group_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&gpu.sampler),
            },
        ],
    });

    FrameTexture {
        texture,
        bind_group,
        width,
        height,
    }
}

/// Resizes the stroke surface only when its size actually changes, since a
/// resize drops everything drawn so far. Returns whether it was resized.
pub(crate) fn fit_surface(
    surface: &mut StrokeSurface,
    width: u32,
    height: u32,
) -> anyhow::Result<bool> {
    if surface.size() == (width, height) {
        log::debug!("Stroke surface already {}x{}", width, height);
        return Ok(false);
    }
    surface.resize(width, height)?;
    Ok(true)
}

/// Rows left for the drawing area once the control strip is taken out.
pub(crate) fn canvas_height(window_height: u32, panel_height: f32) -> u32 {
    let rows = (window_height as f32 - panel_height).floor();
    if rows >= 1.0 { rows as u32 } else { 1 }
}
