//! Scene lifecycle: mount, per-frame step, resize, teardown
//!
//! A mounted `Scene` owns its renderer, its objects and the animation clock.
//! Dropping it disposes every renderer object it created, so teardown happens
//! on every exit path, including a panic part-way through mounting.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::animator::{FrameInput, update_object};
use super::clock::AnimationClock;
use super::input::InputState;
use super::object::FloatingObject;
use super::placement::place_object;
use super::scale::resolve_scale;
use crate::consts::*;
use crate::renderer::{MaterialParams, ObjectHandle, Renderer};
use crate::settings::{JitterMode, SceneSettings};

/// Number of objects for a viewport width: one per 400px, between 3 and 5
pub fn object_count(viewport_width: f32) -> usize {
    // Float-to-int casts saturate (NaN -> 0), so clamp handles every input
    let per_width = (viewport_width / WIDTH_PER_OBJECT).floor() as usize;
    per_width.clamp(MIN_OBJECTS, MAX_OBJECTS)
}

/// An object together with its renderer handle
struct SceneEntry {
    object: FloatingObject,
    handle: ObjectHandle,
    /// Viewport scale multiplier used by the latest frame
    viewport_scale: f32,
}

/// A mounted hero scene
pub struct Scene<R: Renderer> {
    renderer: R,
    settings: SceneSettings,
    entries: Vec<SceneEntry>,
    clock: AnimationClock,
    rng: Pcg32,
}

impl<R: Renderer> Scene<R> {
    /// Create and place the floating objects for the renderer's current viewport
    ///
    /// The object count is fixed here and not revisited on resize.
    pub fn mount(renderer: R, settings: SceneSettings, fallback_seed: u64) -> Self {
        let seed = settings.resolve_seed(fallback_seed);
        let viewport = renderer.viewport_size();
        let count = object_count(viewport.width);

        let mut scene = Self {
            renderer,
            settings,
            entries: Vec::with_capacity(count),
            clock: AnimationClock::new(),
            rng: Pcg32::seed_from_u64(seed),
        };

        for index in 0..count {
            scene.spawn(index, viewport.width);
        }

        log::info!(
            "Scene mounted: {} objects for {}x{} viewport (seed {}, jitter {})",
            count,
            viewport.width,
            viewport.height,
            seed,
            scene.settings.jitter.as_str()
        );
        scene
    }

    fn spawn(&mut self, index: usize, viewport_width: f32) {
        let scale = resolve_scale(viewport_width, &mut self.rng);
        let placed: Vec<Vec2> = self.entries.iter().map(|e| e.object.footprint()).collect();
        let position = place_object(&placed, scale, &mut self.rng);
        let object = FloatingObject::new(index, position, scale, &mut self.rng);
        let viewport_scale = resolve_scale(viewport_width, &mut self.rng);

        let geometry = self.renderer.create_geometry(object.kind(), scale);
        let material = self
            .renderer
            .create_material(&MaterialParams::wireframe(object.color, self.settings.opacity));
        let handle = self.renderer.create_object(geometry, material);
        self.renderer.set_transform(&handle, &object.transform);

        log::debug!(
            "Spawned {} #{} at ({:.2}, {:.2}) scale {:.2}",
            object.kind().as_str(),
            index,
            position.x,
            position.y,
            scale
        );

        self.entries.push(SceneEntry {
            object,
            handle,
            viewport_scale,
        });
    }

    /// Advance one frame: tick the clock once, update objects in index order, draw
    ///
    /// Returns the clock time used for this frame.
    pub fn frame(&mut self, input: &InputState) -> f64 {
        if self.settings.reduced_motion {
            self.renderer.render();
            return self.clock.time();
        }

        let time = self.clock.tick();
        let viewport_width = match self.settings.jitter {
            JitterMode::PerFrame => self.renderer.viewport_size().width,
            JitterMode::PerResize => 0.0,
        };

        for entry in &mut self.entries {
            if self.settings.jitter == JitterMode::PerFrame {
                entry.viewport_scale = resolve_scale(viewport_width, &mut self.rng);
            }
            let frame = FrameInput {
                time,
                input,
                viewport_scale: entry.viewport_scale,
            };
            update_object(&mut entry.object, &frame);
            self.renderer.set_transform(&entry.handle, &entry.object.transform);
            self.renderer
                .set_colors(&entry.handle, entry.object.color, entry.object.emissive);
        }

        self.renderer.render();
        time
    }

    /// Viewport changed: update the renderer projection (object count stays fixed)
    pub fn resize(&mut self) {
        let viewport = self.renderer.viewport_size();
        self.renderer.resize(viewport);

        if self.settings.jitter == JitterMode::PerResize {
            for entry in &mut self.entries {
                entry.viewport_scale = resolve_scale(viewport.width, &mut self.rng);
            }
        }
        log::debug!("Scene resized to {}x{}", viewport.width, viewport.height);
    }

    /// Tear the scene down now (same as dropping it)
    pub fn unmount(self) {
        drop(self);
    }

    pub fn objects(&self) -> impl Iterator<Item = &FloatingObject> {
        self.entries.iter().map(|e| &e.object)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn time(&self) -> f64 {
        self.clock.time()
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

impl<R: Renderer> Drop for Scene<R> {
    fn drop(&mut self) {
        let released = self.entries.len();
        for entry in self.entries.drain(..) {
            self.renderer.dispose(entry.handle);
        }
        log::info!("Scene unmounted, released {} objects", released);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{HeadlessRenderer, Viewport};
    use crate::scene::ShapeKind;

    fn settings(seed: u64) -> SceneSettings {
        SceneSettings {
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_object_count() {
        assert_eq!(object_count(1920.0), 4);
        assert_eq!(object_count(300.0), 3);
        assert_eq!(object_count(3000.0), 5);
        assert_eq!(object_count(0.0), 3);
        assert_eq!(object_count(-100.0), 3);
        assert_eq!(object_count(f32::NAN), 3);
        assert_eq!(object_count(f32::INFINITY), 5);
    }

    #[test]
    fn test_mount_creates_objects() {
        let mut renderer = HeadlessRenderer::new(Viewport::new(1920.0, 1080.0));
        {
            let scene = Scene::mount(&mut renderer, settings(1), 0);
            assert_eq!(scene.len(), 4);
            let kinds: Vec<ShapeKind> = scene.objects().map(|o| o.kind()).collect();
            assert_eq!(kinds, ShapeKind::ALL.to_vec());
            for (i, obj) in scene.objects().enumerate() {
                assert_eq!(obj.index(), i);
                assert_eq!(obj.base_position().z, PLACEMENT_DEPTH);
            }
            assert_eq!(scene.renderer().live_objects(), 4);
            assert_eq!(scene.renderer().live_geometries(), 4);
            assert_eq!(scene.renderer().live_materials(), 4);
        }
        // Dropped: everything released exactly once
        assert_eq!(renderer.live_objects(), 0);
        assert_eq!(renderer.live_geometries(), 0);
        assert_eq!(renderer.live_materials(), 0);
        assert_eq!(renderer.disposed, 4);
    }

    #[test]
    fn test_unmount_releases() {
        let mut renderer = HeadlessRenderer::new(Viewport::new(3000.0, 1200.0));
        let scene = Scene::mount(&mut renderer, settings(2), 0);
        assert_eq!(scene.len(), 5);
        scene.unmount();
        assert_eq!(renderer.live_objects(), 0);
        assert_eq!(renderer.disposed, 5);
    }

    #[test]
    fn test_placed_objects_separated_unless_fallback() {
        let mut renderer = HeadlessRenderer::new(Viewport::new(3000.0, 1080.0));
        let scene = Scene::mount(&mut renderer, settings(3), 0);
        let objects: Vec<&FloatingObject> = scene.objects().collect();
        for (j, later) in objects.iter().enumerate() {
            if later.footprint() == Vec2::ZERO {
                continue;
            }
            let min_distance = later.base_scale() * SEPARATION_FACTOR;
            for earlier in &objects[..j] {
                assert!(earlier.footprint().distance(later.footprint()) >= min_distance - 1e-4);
            }
        }
    }

    #[test]
    fn test_frame_ticks_once_and_pushes_state() {
        let mut renderer = HeadlessRenderer::new(Viewport::new(1280.0, 720.0));
        {
            let mut scene = Scene::mount(&mut renderer, settings(4), 0);
            let input = InputState::default();
            let t1 = scene.frame(&input);
            let t2 = scene.frame(&input);
            assert!((t1 - CLOCK_STEP).abs() < 1e-7);
            assert!((t2 - 2.0 * CLOCK_STEP).abs() < 1e-7);
        }
        assert_eq!(renderer.frames, 2);
    }

    #[test]
    fn test_pointer_shifts_every_object() {
        let mut still = HeadlessRenderer::new(Viewport::new(1280.0, 720.0));
        let mut pointed = HeadlessRenderer::new(Viewport::new(1280.0, 720.0));
        let mut a = Scene::mount(&mut still, settings(5), 0);
        let mut b = Scene::mount(&mut pointed, settings(5), 0);
        let centre = InputState::default();
        let corner = InputState {
            pointer: Vec2::new(1.0, 1.0),
            scroll: 0.0,
        };
        for _ in 0..600 {
            a.frame(&centre);
            b.frame(&corner);
        }
        // Offset converges to pointer * 0.3 * (1 - 0.99^600)
        for (oa, ob) in a.objects().zip(b.objects()) {
            let shift = ob.transform.position.truncate() - oa.transform.position.truncate();
            assert!((shift - Vec2::splat(0.3)).length() < 0.01, "shift {shift:?}");
            assert!(ob.transform.position.is_finite());
        }
    }

    #[test]
    fn test_renderer_sees_live_transforms() {
        let mut renderer = HeadlessRenderer::new(Viewport::new(1280.0, 720.0));
        let mut scene = Scene::mount(&mut renderer, settings(6), 0);
        scene.frame(&InputState::default());
        let first = scene.entries[0].object.transform;
        let pushed = scene
            .renderer()
            .object(&scene.entries[0].handle)
            .map(|o| o.transform);
        assert_eq!(pushed, Some(first));
    }

    #[test]
    fn test_same_seed_same_layout() {
        let mut r1 = HeadlessRenderer::new(Viewport::new(1920.0, 1080.0));
        let mut r2 = HeadlessRenderer::new(Viewport::new(1920.0, 1080.0));
        let s1 = Scene::mount(&mut r1, settings(99), 0);
        let s2 = Scene::mount(&mut r2, settings(99), 0);
        for (a, b) in s1.objects().zip(s2.objects()) {
            assert_eq!(a.base_position(), b.base_position());
            assert_eq!(a.base_scale(), b.base_scale());
        }
    }

    #[test]
    fn test_resize_keeps_object_count() {
        let mut renderer = HeadlessRenderer::new(Viewport::new(1920.0, 1080.0));
        {
            let mut scene = Scene::mount(&mut renderer, settings(7), 0);
            assert_eq!(scene.len(), 4);
            scene.renderer.set_viewport(Viewport::new(400.0, 800.0));
            scene.resize();
            assert_eq!(scene.len(), 4);
            assert_eq!(scene.renderer().camera.aspect, 0.5);
        }
        assert_eq!(renderer.resizes, 1);
    }

    #[test]
    fn test_per_resize_jitter_is_stable_between_resizes() {
        let mut renderer = HeadlessRenderer::new(Viewport::new(1920.0, 1080.0));
        let mut scene = Scene::mount(
            &mut renderer,
            SceneSettings {
                seed: Some(8),
                jitter: JitterMode::PerResize,
                ..Default::default()
            },
            0,
        );
        let before: Vec<f32> = scene.entries.iter().map(|e| e.viewport_scale).collect();
        scene.frame(&InputState::default());
        let after: Vec<f32> = scene.entries.iter().map(|e| e.viewport_scale).collect();
        assert_eq!(before, after);

        scene.resize();
        let resized: Vec<f32> = scene.entries.iter().map(|e| e.viewport_scale).collect();
        assert_ne!(before, resized);
    }

    #[test]
    fn test_per_frame_jitter_redraws() {
        let mut renderer = HeadlessRenderer::new(Viewport::new(1920.0, 1080.0));
        let mut scene = Scene::mount(&mut renderer, settings(11), 0);
        assert_eq!(scene.settings().jitter, JitterMode::PerFrame);
        let input = InputState::default();

        scene.frame(&input);
        let first: Vec<f32> = scene.entries.iter().map(|e| e.viewport_scale).collect();
        scene.frame(&input);
        let second: Vec<f32> = scene.entries.iter().map(|e| e.viewport_scale).collect();

        for (a, b) in first.iter().zip(&second) {
            assert_ne!(a, b);
            assert!((0.75..1.25).contains(a) && (0.75..1.25).contains(b));
        }
    }

    #[test]
    fn test_reduced_motion_holds_pose() {
        let mut renderer = HeadlessRenderer::new(Viewport::new(1920.0, 1080.0));
        {
            let mut scene = Scene::mount(
                &mut renderer,
                SceneSettings {
                    seed: Some(9),
                    reduced_motion: true,
                    ..Default::default()
                },
                0,
            );
            let before: Vec<_> = scene.objects().map(|o| o.transform).collect();
            for _ in 0..10 {
                assert_eq!(scene.frame(&InputState::default()), 0.0);
            }
            let after: Vec<_> = scene.objects().map(|o| o.transform).collect();
            assert_eq!(before, after);
        }
        assert_eq!(renderer.frames, 10);
    }

    #[test]
    fn test_scroll_at_zero_range_keeps_transforms_finite() {
        let mut renderer = HeadlessRenderer::new(Viewport::new(1920.0, 1080.0));
        let mut scene = Scene::mount(&mut renderer, settings(10), 0);
        let mut input = InputState::default();
        input.on_scroll(0.0, 1080.0, 1080.0);
        for _ in 0..100 {
            scene.frame(&input);
        }
        for obj in scene.objects() {
            assert!(obj.transform.scale.is_finite());
            assert!(obj.transform.position.is_finite());
        }
    }
}
