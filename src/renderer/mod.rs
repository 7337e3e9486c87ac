//! Rendering module
//!
//! The scene only talks to a `Renderer`: it creates one geometry, one
//! material and one object per floating shape, pushes transforms and colors
//! every frame and disposes everything on teardown. `HeadlessRenderer`
//! records that traffic; `WireframeRenderer` draws it with WebGPU.

pub mod camera;
pub mod geometry;
pub mod headless;
pub mod vertex;
pub mod wireframe_pipeline;

pub use camera::Camera;
pub use headless::HeadlessRenderer;
pub use wireframe_pipeline::WireframeRenderer;

use serde::{Deserialize, Serialize};

use crate::consts::{EMISSIVE_FACTOR, SHININESS, SPECULAR_FACTOR};
use crate::scene::{Rgb, ShapeKind, Transform};

/// Drawable area in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width over height, 1.0 for a degenerate viewport
    pub fn aspect(&self) -> f32 {
        if self.width > 0.0 && self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

/// Renderer-side geometry buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryHandle(pub u32);

/// Renderer-side material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u32);

/// A drawable object owning one geometry and one material
///
/// Not `Clone`: `Renderer::dispose` consumes it, so each object is released once.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ObjectHandle(u32);

impl ObjectHandle {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Phong-style wireframe material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialParams {
    pub color: Rgb,
    pub emissive: Rgb,
    pub specular: Rgb,
    pub shininess: f32,
    pub opacity: f32,
    pub wireframe: bool,
}

impl MaterialParams {
    /// Translucent wireframe with glow and highlight derived from `color`
    pub fn wireframe(color: Rgb, opacity: f32) -> Self {
        Self {
            color,
            emissive: color.scale(EMISSIVE_FACTOR),
            specular: color.scale(SPECULAR_FACTOR),
            shininess: SHININESS,
            opacity: opacity.clamp(0.0, 1.0),
            wireframe: true,
        }
    }
}

/// Capabilities the scene needs from its host
pub trait Renderer {
    /// Current drawable size (queried, not cached by callers)
    fn viewport_size(&self) -> Viewport;

    fn create_geometry(&mut self, kind: ShapeKind, scale: f32) -> GeometryHandle;

    fn create_material(&mut self, params: &MaterialParams) -> MaterialHandle;

    fn create_object(&mut self, geometry: GeometryHandle, material: MaterialHandle) -> ObjectHandle;

    fn set_transform(&mut self, object: &ObjectHandle, transform: &Transform);

    fn set_colors(&mut self, object: &ObjectHandle, color: Rgb, emissive: Rgb);

    /// Recompute projection and backing surface for a new viewport
    fn resize(&mut self, viewport: Viewport);

    /// Draw all live objects
    fn render(&mut self);

    /// Release the object together with its geometry and material
    fn dispose(&mut self, object: ObjectHandle);
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn viewport_size(&self) -> Viewport {
        (**self).viewport_size()
    }

    fn create_geometry(&mut self, kind: ShapeKind, scale: f32) -> GeometryHandle {
        (**self).create_geometry(kind, scale)
    }

    fn create_material(&mut self, params: &MaterialParams) -> MaterialHandle {
        (**self).create_material(params)
    }

    fn create_object(&mut self, geometry: GeometryHandle, material: MaterialHandle) -> ObjectHandle {
        (**self).create_object(geometry, material)
    }

    fn set_transform(&mut self, object: &ObjectHandle, transform: &Transform) {
        (**self).set_transform(object, transform)
    }

    fn set_colors(&mut self, object: &ObjectHandle, color: Rgb, emissive: Rgb) {
        (**self).set_colors(object, color, emissive)
    }

    fn resize(&mut self, viewport: Viewport) {
        (**self).resize(viewport)
    }

    fn render(&mut self) {
        (**self).render()
    }

    fn dispose(&mut self, object: ObjectHandle) {
        (**self).dispose(object)
    }
}
