//! Per-frame object animation
//!
//! Each frame every object bobs on a small ellipse around its base position,
//! leans toward the pointer, spins, breathes with scroll and cycles hue. All
//! targets are approached with the same exponential smoothing law.

use glam::Vec2;

use super::color::Rgb;
use super::input::InputState;
use super::object::FloatingObject;
use crate::consts::*;
use crate::damp;

/// Everything an object update reads for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    /// Clock time for this frame (shared by all objects)
    pub time: f64,
    pub input: &'a InputState,
    /// Viewport-derived scale multiplier (the resolver's jittered scale)
    pub viewport_scale: f32,
}

/// Bobbing offset from the base position at `time`
pub fn float_offset_at(time: f64, phase: f32) -> Vec2 {
    let t = time + f64::from(phase);
    Vec2::new(
        t.cos() as f32 * FLOAT_AMPLITUDE_X,
        t.sin() as f32 * FLOAT_AMPLITUDE_Y,
    )
}

/// Position the object is currently pulled toward (x, y)
pub fn target_position(object: &FloatingObject, frame: &FrameInput) -> Vec2 {
    object.footprint()
        + float_offset_at(frame.time, object.float_offset())
        + frame.input.pointer * POINTER_INFLUENCE
}

/// Scale the object is currently pulled toward
pub fn target_scale(object: &FloatingObject, frame: &FrameInput) -> f32 {
    let scroll_scale = 1.0 + frame.input.scroll * SCROLL_SCALE_GAIN;
    object.base_scale() * scroll_scale * frame.viewport_scale
}

/// Hue-cycled color for object `index` at `time`
pub fn target_color(index: usize, time: f64) -> Rgb {
    let hue = (time * HUE_RATE + index as f64 * HUE_STEP_PER_OBJECT).rem_euclid(1.0);
    Rgb::from_hsl(hue as f32, SATURATION, LIGHTNESS)
}

/// Advance one object by one frame
pub fn update_object(object: &mut FloatingObject, frame: &FrameInput) {
    let target = target_position(object, frame);
    let scale = target_scale(object, frame);
    let spin = object.rotation_speed();

    let transform = &mut object.transform;
    transform.position.x = damp(transform.position.x, target.x, SMOOTHING);
    transform.position.y = damp(transform.position.y, target.y, SMOOTHING);
    transform.rotation += spin;
    transform.scale = damp(transform.scale, scale, SMOOTHING);

    let color = target_color(object.index(), frame.time);
    object.color = object.color.lerp(color, SMOOTHING);
    object.emissive = color.scale(EMISSIVE_FACTOR);
}
