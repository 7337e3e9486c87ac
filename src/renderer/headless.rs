//! Renderer that draws nothing and remembers everything
//!
//! Used for native runs and tests: it tracks live handles so teardown leaks
//! show up as non-zero counts.

use std::collections::HashMap;

use super::camera::Camera;
use super::geometry;
use super::{GeometryHandle, MaterialHandle, MaterialParams, ObjectHandle, Renderer, Viewport};
use crate::scene::{Rgb, ShapeKind, Transform};

#[derive(Debug, Clone)]
pub struct HeadlessGeometry {
    pub kind: ShapeKind,
    pub scale: f32,
    pub vertex_count: usize,
}

#[derive(Debug, Clone)]
pub struct HeadlessObject {
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,
    pub transform: Transform,
    pub color: Rgb,
    pub emissive: Rgb,
}

#[derive(Debug)]
pub struct HeadlessRenderer {
    viewport: Viewport,
    pub camera: Camera,
    next_id: u32,
    geometries: HashMap<u32, HeadlessGeometry>,
    materials: HashMap<u32, MaterialParams>,
    objects: HashMap<u32, HeadlessObject>,
    /// Frames drawn so far
    pub frames: u64,
    /// Number of resize calls
    pub resizes: u32,
    /// Number of objects disposed
    pub disposed: u32,
}

impl HeadlessRenderer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            camera: Camera::new(viewport),
            next_id: 1,
            geometries: HashMap::new(),
            materials: HashMap::new(),
            objects: HashMap::new(),
            frames: 0,
            resizes: 0,
            disposed: 0,
        }
    }

    /// Simulate the window changing size (takes effect on the next query)
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn object(&self, handle: &ObjectHandle) -> Option<&HeadlessObject> {
        self.objects.get(&handle.id())
    }

    pub fn geometry(&self, handle: GeometryHandle) -> Option<&HeadlessGeometry> {
        self.geometries.get(&handle.0)
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&MaterialParams> {
        self.materials.get(&handle.0)
    }

    pub fn live_objects(&self) -> usize {
        self.objects.len()
    }

    pub fn live_geometries(&self) -> usize {
        self.geometries.len()
    }

    pub fn live_materials(&self) -> usize {
        self.materials.len()
    }
}

impl Renderer for HeadlessRenderer {
    fn viewport_size(&self) -> Viewport {
        self.viewport
    }

    fn create_geometry(&mut self, kind: ShapeKind, scale: f32) -> GeometryHandle {
        let id = self.next_id();
        let vertex_count = geometry::wireframe(kind, scale).len();
        self.geometries.insert(
            id,
            HeadlessGeometry {
                kind,
                scale,
                vertex_count,
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
        let (color, emissive) = self
            .materials
            .get(&material.0)
            .map(|m| (m.color, m.emissive))
            .unwrap_or_default();
        self.objects.insert(
            id,
            HeadlessObject {
                geometry,
                material,
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
        self.viewport = viewport;
        self.camera.set_viewport(viewport);
        self.resizes += 1;
    }

    fn render(&mut self) {
        self.frames += 1;
    }

    fn dispose(&mut self, object: ObjectHandle) {
        if let Some(obj) = self.objects.remove(&object.id()) {
            self.geometries.remove(&obj.geometry.0);
            self.materials.remove(&obj.material.0);
            self.disposed += 1;
        } else {
            log::warn!("Dispose of unknown object {}", object.id());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispose_releases_geometry_and_material() {
        let mut renderer = HeadlessRenderer::new(Viewport::new(800.0, 600.0));
        let geometry = renderer.create_geometry(ShapeKind::Octahedron, 1.0);
        let material = renderer.create_material(&MaterialParams::wireframe(Rgb::BLACK, 0.3));
        let object = renderer.create_object(geometry, material);

        assert_eq!(renderer.geometry(geometry).map(|g| g.vertex_count), Some(24));
        assert_eq!(renderer.live_objects(), 1);

        renderer.dispose(object);
        assert_eq!(renderer.live_objects(), 0);
        assert_eq!(renderer.live_geometries(), 0);
        assert_eq!(renderer.live_materials(), 0);
        assert_eq!(renderer.disposed, 1);
    }
}
