//! Renderer: wgpu device/surface, scene pipelines and the egui overlay.
//! wgpu = 23.x, egui-wgpu = 0.30.x, winit = 0.30.x

pub mod mesh;
pub mod pipeline;
pub mod uniforms;

use std::num::NonZeroU64;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use wgpu::{
    BindGroup, BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingType,
    Buffer, BufferBindingType, BufferUsages, CommandEncoderDescriptor, Device, DeviceDescriptor,
    Extent3d, Features, Instance, InstanceDescriptor, Limits, LoadOp, Operations,
    PipelineLayoutDescriptor, PowerPreference, PresentMode, Queue, RenderPassColorAttachment,
    RenderPassDescriptor, ShaderModuleDescriptor, ShaderSource, ShaderStages, StoreOp, Surface,
    SurfaceConfiguration, SurfaceError, TextureDescriptor, TextureDimension, TextureFormat,
    TextureUsages, TextureView, TextureViewDescriptor, util::DeviceExt,
};
use winit::{dpi::PhysicalSize, window::Window};

use crate::mesh::{GpuMeshes, SceneMeshes};
use crate::pipeline::{DEPTH_FORMAT, PipelineKey, Pipelines};
use crate::uniforms::{FrameRecorder, FrameUniform, MAX_DRAWS, ObjectUniform, clear_value};

/// egui output for one frame, drawn on top of the scene.
pub struct Overlay {
    pub paint_jobs: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

pub struct GpuState {
    // Surface
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,

    // Device/queue
    device: Device,
    queue: Queue,

    // Pipelines & geometry
    pipelines: Pipelines,
    meshes: GpuMeshes,

    // Uniforms
    frame_buf: Buffer,
    frame_bg: BindGroup,
    object_buf: Buffer,
    object_bg: BindGroup,
    object_stride: u64,

    // Depth
    depth_view: TextureView,

    // Overlay
    egui_renderer: egui_wgpu::Renderer,

    // Size cache
    width: u32,
    height: u32,
}

impl GpuState {
    /// Create GPU state bound to an `Arc<Window>` and upload the scene meshes.
    pub async fn new(
        window: Arc<Window>,
        backends: wgpu::Backends,
        scene_meshes: &SceneMeshes,
    ) -> Result<Self> {
        let PhysicalSize { width, height } = window.inner_size();
        let width = width.max(1);
        let height = height.max(1);

        // Instance & surface
        let instance = Instance::new(InstanceDescriptor {
            backends,
            ..Default::default()
        });
        let surface: Surface<'static> = instance
            .create_surface(window.clone())
            .context("create_surface failed")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow!("No suitable GPU adapter for {backends:?}"))?;
        let info = adapter.get_info();
        log::info!("Adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &DeviceDescriptor {
                    label: Some("Armature Device"),
                    required_features: Features::empty(),
                    required_limits: Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .context("request_device failed")?;

        let caps = surface.get_capabilities(&adapter);
        let surface_format = pick_surface_format(&caps.formats)
            .ok_or_else(|| anyhow!("Surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);
        log::info!("Surface configured: {width}x{height} {surface_format:?}");

        let depth_view = create_depth_view(&device, &surface_config);

        // ==== Shaders ====
        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("Phong WGSL"),
            source: ShaderSource::Wgsl(include_str!("shaders/phong.wgsl").into()),
        });

        // ==== Uniform layouts ====
        let frame_size = std::mem::size_of::<FrameUniform>() as u64;
        let object_size = std::mem::size_of::<ObjectUniform>() as u64;
        let frame_bgl = uniform_layout(&device, "Frame BGL", frame_size, false)?;
        let object_bgl = uniform_layout(&device, "Object BGL", object_size, true)?;

        let frame_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame UBO"),
            contents: bytemuck::bytes_of(&FrameUniform::default()),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        let frame_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame BG"),
            layout: &frame_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buf.as_entire_binding(),
            }],
        });

        let alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let object_stride = object_size.div_ceil(alignment) * alignment;
        let object_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Object UBO"),
            size: object_stride * MAX_DRAWS as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let object_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object BG"),
            layout: &object_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &object_buf,
                    offset: 0,
                    size: NonZeroU64::new(object_size),
                }),
            }],
        });

        // ==== Pipelines ====
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Scene PipelineLayout"),
            bind_group_layouts: &[&frame_bgl, &object_bgl],
            push_constant_ranges: &[],
        });
        let pipelines = Pipelines::new(&device, &pipeline_layout, &shader, surface_format);

        // ==== Geometry ====
        let meshes = GpuMeshes::upload(&device, scene_meshes);

        let egui_renderer =
            egui_wgpu::Renderer::new(&device, surface_format, Some(DEPTH_FORMAT), 1, false);

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
            pipelines,
            meshes,
            frame_buf,
            frame_bg,
            object_buf,
            object_bg,
            object_stride,
            depth_view,
            egui_renderer,
            width,
            height,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Resize: reconfigure surface & recreate depth view.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.surface_config.width = self.width;
        self.surface_config.height = self.height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = create_depth_view(&self.device, &self.surface_config);
    }

    /// Render one recorded frame, then the overlay on top of it.
    pub fn render(
        &mut self,
        recorded: &FrameRecorder,
        overlay: Overlay,
    ) -> Result<(), SurfaceError> {
        // --- uniforms
        self.queue.write_buffer(
            &self.frame_buf,
            0,
            bytemuck::bytes_of(recorded.frame_uniform()),
        );
        for (i, object) in recorded.objects().iter().enumerate() {
            self.queue.write_buffer(
                &self.object_buf,
                i as u64 * self.object_stride,
                bytemuck::bytes_of(object),
            );
        }

        // --- frame & pass
        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&Default::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("MainEncoder"),
            });

        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.width, self.height],
            pixels_per_point: overlay.pixels_per_point,
        };
        for (id, delta) in &overlay.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, delta);
        }
        let egui_cmds = self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &overlay.paint_jobs,
            &screen,
        );

        {
            let mut rpass = encoder
                .begin_render_pass(&RenderPassDescriptor {
                    label: Some("MainPass"),
                    color_attachments: &[Some(RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: Operations {
                            load: LoadOp::Clear(clear_value(recorded.clear_color())),
                            store: StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                        view: &self.depth_view,
                        depth_ops: Some(Operations {
                            load: LoadOp::Clear(1.0),
                            store: StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }),
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();

            rpass.set_bind_group(0, &self.frame_bg, &[]);
            let options = recorded.options();
            for call in recorded.draws() {
                let mesh = self.meshes.get(call.geometry);
                let (indices, count) = mesh.indices(call.mode);
                let offset = (u64::from(call.object) * self.object_stride) as u32;
                rpass.set_pipeline(self.pipelines.get(PipelineKey::new(call.mode, options)));
                rpass.set_bind_group(1, &self.object_bg, &[offset]);
                rpass.set_vertex_buffer(0, mesh.vertex_buf.slice(..));
                rpass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..count, 0, 0..1);
            }

            self.egui_renderer
                .render(&mut rpass, &overlay.paint_jobs, &screen);
        }

        self.queue
            .submit(egui_cmds.into_iter().chain(std::iter::once(encoder.finish())));
        frame.present();

        for id in &overlay.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        Ok(())
    }

    pub fn is_surface_lost(err: &SurfaceError) -> bool {
        matches!(err, SurfaceError::Lost | SurfaceError::Outdated)
    }

    pub fn recreate_surface(&mut self) {
        self.resize(self.width, self.height);
    }
}

fn uniform_layout(
    device: &Device,
    label: &str,
    size: u64,
    dynamic: bool,
) -> Result<BindGroupLayout> {
    let min_binding_size =
        NonZeroU64::new(size).ok_or_else(|| anyhow!("{label}: empty uniform block"))?;
    Ok(device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[BindGroupLayoutEntry {
            binding: 0,
            visibility: ShaderStages::VERTEX | ShaderStages::FRAGMENT,
            ty: BindingType::Buffer {
                ty: BufferBindingType::Uniform,
                has_dynamic_offset: dynamic,
                min_binding_size: Some(min_binding_size),
            },
            count: None,
        }],
    }))
}

/// Shader colours are already display-ready and egui blends in gamma space,
/// so a non-sRGB target is preferred.
fn pick_surface_format(formats: &[TextureFormat]) -> Option<TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first().copied())
}

/// Create a depth texture view matching the surface config.
fn create_depth_view(device: &Device, sc: &SurfaceConfiguration) -> TextureView {
    let tex = device.create_texture(&TextureDescriptor {
        label: Some("DepthTex"),
        size: Extent3d {
            width: sc.width.max(1),
            height: sc.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    tex.create_view(&TextureViewDescriptor::default())
}
