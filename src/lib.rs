//! Hero Scene - floating wireframe shapes for a landing page hero section
//!
//! Core modules:
//! - `scene`: Placement, scale, clock, animator, input and lifecycle (no platform deps)
//! - `renderer`: Host renderer capability plus headless and WebGPU implementations
//! - `settings`: User-tunable scene settings (LocalStorage on web)
//! - `platform`: Window size, pixel ratio and clock queries

pub mod platform;
pub mod renderer;
pub mod scene;
pub mod settings;

pub use renderer::{HeadlessRenderer, Renderer, Viewport};
pub use scene::{InputState, Scene};
pub use settings::{JitterMode, SceneSettings};

/// Scene tuning constants
pub mod consts {
    /// Clock advance per rendered frame (frame-count based, not delta time)
    pub const CLOCK_STEP: f64 = 0.003;
    /// Exponential smoothing factor for position, scale and color
    pub const SMOOTHING: f32 = 0.01;

    /// Weight of the normalized pointer on the float target
    pub const POINTER_INFLUENCE: f32 = 0.3;
    /// Horizontal bobbing amplitude
    pub const FLOAT_AMPLITUDE_X: f32 = 0.3;
    /// Vertical bobbing amplitude
    pub const FLOAT_AMPLITUDE_Y: f32 = 0.5;
    /// Extra scale at full scroll (1.0 + SCROLL_SCALE_GAIN)
    pub const SCROLL_SCALE_GAIN: f32 = 0.2;

    /// Viewport width at which the base scale is 1.0
    pub const REFERENCE_WIDTH: f32 = 1920.0;
    /// Random scale multiplier range (75% - 125%)
    pub const SCALE_JITTER_MIN: f32 = 0.75;
    pub const SCALE_JITTER_MAX: f32 = 1.25;

    /// One object per this many pixels of viewport width
    pub const WIDTH_PER_OBJECT: f32 = 400.0;
    pub const MIN_OBJECTS: usize = 3;
    pub const MAX_OBJECTS: usize = 5;

    /// Placement search
    pub const PLACEMENT_ATTEMPTS: u32 = 100;
    pub const PLACEMENT_SECTIONS: u32 = 3;
    pub const SECTION_SPACING: f32 = 6.0;
    /// Minimum separation as a multiple of object scale
    pub const SEPARATION_FACTOR: f32 = 3.0;
    /// All objects float on this depth plane
    pub const PLACEMENT_DEPTH: f32 = -3.0;

    /// Per-axis angular velocity range is +/- this (radians per frame)
    pub const MAX_ROTATION_SPEED: f64 = 0.001;
    /// Float speed range (carried per object)
    pub const FLOAT_SPEED_MIN: f32 = 0.001;
    pub const FLOAT_SPEED_MAX: f32 = 0.003;

    /// Hue cycling
    pub const HUE_RATE: f64 = 0.1;
    pub const HUE_STEP_PER_OBJECT: f64 = 0.3;
    pub const SATURATION: f32 = 0.6;
    pub const LIGHTNESS: f32 = 0.5;

    /// Material
    pub const EMISSIVE_FACTOR: f32 = 0.2;
    pub const SPECULAR_FACTOR: f32 = 0.5;
    pub const SHININESS: f32 = 100.0;

    /// Camera (perspective, eye on +z looking at the origin)
    pub const CAMERA_FOV_DEGREES: f32 = 75.0;
    pub const CAMERA_NEAR: f32 = 0.1;
    pub const CAMERA_FAR: f32 = 1000.0;
    pub const CAMERA_Z: f32 = 8.0;

    /// Lighting
    pub const AMBIENT_INTENSITY: f32 = 0.4;
    pub const DIRECTIONAL_INTENSITY: f32 = 0.6;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    angle.rem_euclid(std::f64::consts::TAU)
}

/// Linear interpolation toward `target` by factor `t`
#[inline]
pub fn damp(current: f32, target: f32, t: f32) -> f32 {
    current + (target - current) * t
}
