//! WebGPU wireframe renderer
//!
//! One vertex buffer per geometry, one uniform buffer + bind group per
//! object. Objects are drawn as translucent line lists over a transparent
//! canvas so the page shows through.

use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Mat4, Quat, Vec3};
use std::collections::{BTreeMap, HashMap};
use wgpu::util::DeviceExt;

use super::camera::Camera;
use super::geometry;
use super::vertex::Vertex;
use super::{GeometryHandle, MaterialHandle, MaterialParams, ObjectHandle, Renderer, Viewport};
use crate::consts::*;
use crate::scene::{Rgb, ShapeKind, Transform};
use crate::wrap_angle;

/// Directional light position (shines toward the origin)
const LIGHT_POSITION: [f32; 4] = [0.0, 0.0, 5.0, 0.0];

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4], // offset 0
    camera_pos: [f32; 4],     // offset 64
    light_pos: [f32; 4],      // offset 80
    lighting: [f32; 4],       // offset 96 - x: ambient, y: directional
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ObjectUniform {
    model: [[f32; 4]; 4],
    color: [f32; 4],    // rgb + opacity
    emissive: [f32; 4], // rgb + unused
    specular: [f32; 4], // rgb + shininess
}

struct GpuGeometry {
    buffer: wgpu::Buffer,
    vertex_count: u32,
}

struct GpuObject {
    geometry: GeometryHandle,
    material: MaterialHandle,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    transform: Transform,
    color: Rgb,
    emissive: Rgb,
}

/// Model matrix for a live transform (angles wrapped here, not in the animator)
pub fn model_matrix(transform: &Transform) -> Mat4 {
    let rotation = Quat::from_euler(
        EulerRot::XYZ,
        wrap_angle(transform.rotation.x) as f32,
        wrap_angle(transform.rotation.y) as f32,
        wrap_angle(transform.rotation.z) as f32,
    );
    Mat4::from_scale_rotation_translation(Vec3::splat(transform.scale), rotation, transform.position)
}

// ============================================================================
// WIREFRAME RENDERER
// ============================================================================

pub struct WireframeRenderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,

    camera: Camera,
    /// Last known size in CSS pixels
    viewport: Viewport,
    pixel_ratio: f32,

    next_id: u32,
    geometries: HashMap<u32, GpuGeometry>,
    materials: HashMap<u32, MaterialParams>,
    /// Ordered by id so draw order matches creation order
    objects: BTreeMap<u32, GpuObject>,
}

impl WireframeRenderer {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        viewport: Viewport,
        pixel_ratio: f32,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("hero-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);
        log::info!("Surface alpha modes: {:?}", surface_caps.alpha_modes);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        // The canvas sits behind page content; prefer compositing with alpha
        let alpha_mode = surface_caps
            .alpha_modes
            .iter()
            .find(|m| **m == wgpu::CompositeAlphaMode::PreMultiplied)
            .copied()
            .unwrap_or(surface_caps.alpha_modes[0]);

        let (width, height) = physical_size(viewport, pixel_ratio);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        log::info!(
            "Surface config: {}x{} ({:?}, {:?})",
            width,
            height,
            surface_format,
            alpha_mode
        );
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("wireframe_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("wireframe.wgsl").into()),
        });

        let camera = Camera::new(viewport);
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&globals_for(&camera)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bind_group_layout"),
            entries: &[uniform_entry(0)],
        });

        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object_bind_group_layout"),
            entries: &[uniform_entry(0)],
        });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("wireframe_pipeline_layout"),
            bind_group_layouts: &[&globals_layout, &object_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("wireframe_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            globals_bind_group,
            object_layout,
            camera,
            viewport,
            pixel_ratio,
            next_id: 1,
            geometries: HashMap::new(),
            materials: HashMap::new(),
            objects: BTreeMap::new(),
        })
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reconfigure the surface at the current size (after a lost surface)
    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Upload uniforms and draw every live object
    pub fn draw(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&globals_for(&self.camera)),
        );

        for obj in self.objects.values() {
            let Some(material) = self.materials.get(&obj.material.0) else {
                continue;
            };
            let uniform = ObjectUniform {
                model: model_matrix(&obj.transform).to_cols_array_2d(),
                color: [obj.color.r, obj.color.g, obj.color.b, material.opacity],
                emissive: [obj.emissive.r, obj.emissive.g, obj.emissive.b, 0.0],
                specular: [
                    material.specular.r,
                    material.specular.g,
                    material.specular.b,
                    material.shininess,
                ],
            };
            self.queue
                .write_buffer(&obj.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("wireframe_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("wireframe_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.globals_bind_group, &[]);
            for obj in self.objects.values() {
                let Some(geometry) = self.geometries.get(&obj.geometry.0) else {
                    continue;
                };
                render_pass.set_bind_group(1, &obj.bind_group, &[]);
                render_pass.set_vertex_buffer(0, geometry.buffer.slice(..));
                render_pass.draw(0..geometry.vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn globals_for(camera: &Camera) -> Globals {
    Globals {
        view_proj: camera.view_projection().to_cols_array_2d(),
        camera_pos: camera.eye.extend(1.0).to_array(),
        light_pos: LIGHT_POSITION,
        lighting: [AMBIENT_INTENSITY, DIRECTIONAL_INTENSITY, 0.0, 0.0],
    }
}

/// Backing surface size in device pixels (never zero)
fn physical_size(viewport: Viewport, pixel_ratio: f32) -> (u32, u32) {
    let width = (viewport.width * pixel_ratio).max(1.0) as u32;
    let height = (viewport.height * pixel_ratio).max(1.0) as u32;
    (width, height)
}

impl Renderer for WireframeRenderer {
    fn viewport_size(&self) -> Viewport {
        crate::platform::window_viewport().unwrap_or(self.viewport)
    }

    fn create_geometry(&mut self, kind: ShapeKind, scale: f32) -> GeometryHandle {
        let id = self.next_id();
        let vertices = geometry::wireframe(kind, scale);
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(kind.as_str()),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        self.geometries.insert(
            id,
            GpuGeometry {
                buffer,
                vertex_count: vertices.len() as u32,
            },
        );
        GeometryHandle(id)
    }

    fn create_material(&mut self, params: &MaterialParams) -> MaterialHandle {
        let id = self.next_id();
        self.materials.insert(id, *params);
        MaterialHandle(id)
    }

    fn create_object(&mut self, geometry: GeometryHandle, material: MaterialHandle) -> ObjectHandle {
        let id = self.next_id();
        let uniform_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("object_uniform"),
            size: std::mem::size_of::<ObjectUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("object_bind_group"),
            layout: &self.object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let (color, emissive) = self
            .materials
            .get(&material.0)
            .map(|m| (m.color, m.emissive))
            .unwrap_or_default();

        self.objects.insert(
            id,
            GpuObject {
                geometry,
                material,
                uniform_buffer,
                bind_group,
                transform: Transform::default(),
                color,
                emissive,
            },
        );
        ObjectHandle::new(id)
    }

    fn set_transform(&mut self, object: &ObjectHandle, transform: &Transform) {
        if let Some(obj) = self.objects.get_mut(&object.id()) {
            obj.transform = *transform;
        }
    }

    fn set_colors(&mut self, object: &ObjectHandle, color: Rgb, emissive: Rgb) {
        if let Some(obj) = self.objects.get_mut(&object.id()) {
            obj.color = color;
            obj.emissive = emissive;
        }
    }

    fn resize(&mut self, viewport: Viewport) {
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return;
        }
        self.viewport = viewport;
        self.camera.set_viewport(viewport);
        let (width, height) = physical_size(viewport, self.pixel_ratio);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    fn render(&mut self) {
        match self.draw() {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => self.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory!");
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }

    fn dispose(&mut self, object: ObjectHandle) {
        let Some(obj) = self.objects.remove(&object.id()) else {
            log::warn!("Dispose of unknown object {}", object.id());
            return;
        };
        obj.uniform_buffer.destroy();
        if let Some(geometry) = self.geometries.remove(&obj.geometry.0) {
            geometry.buffer.destroy();
        }
        self.materials.remove(&obj.material.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn test_uniform_layouts_match_shader() {
        assert_eq!(std::mem::size_of::<Globals>(), 112);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 112);
    }

    #[test]
    fn test_model_matrix_places_object() {
        let transform = Transform {
            position: Vec3::new(6.0, -1.0, -3.0),
            rotation: DVec3::ZERO,
            scale: 2.0,
        };
        let p = model_matrix(&transform).transform_point3(Vec3::X);
        assert!((p - Vec3::new(8.0, -1.0, -3.0)).length() < 1e-5);
    }

    #[test]
    fn test_model_matrix_wraps_large_angles() {
        let base = Transform {
            position: Vec3::ZERO,
            rotation: DVec3::new(0.5, 0.25, 0.0),
            scale: 1.0,
        };
        let spun = Transform {
            rotation: base.rotation + DVec3::splat(std::f64::consts::TAU * 1000.0),
            ..base
        };
        let a = model_matrix(&base).transform_point3(Vec3::ONE);
        let b = model_matrix(&spun).transform_point3(Vec3::ONE);
        assert!((a - b).length() < 1e-4);
    }

    #[test]
    fn test_physical_size_never_zero() {
        assert_eq!(physical_size(Viewport::new(0.0, 0.0), 2.0), (1, 1));
        assert_eq!(physical_size(Viewport::new(800.0, 600.0), 2.0), (1600, 1200));
    }
}
