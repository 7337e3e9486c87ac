//! Floating object types

use glam::{DVec3, Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::f64::consts::PI;

use super::color::{PALETTE, Rgb};
use crate::consts::*;

/// Geometry of a floating object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Torus
    Ring,
    /// (2,3) torus knot
    Knot,
    Octahedron,
    Icosahedron,
}

impl ShapeKind {
    /// Assignment order: object `i` gets `ALL[i % 4]`
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Ring,
        ShapeKind::Knot,
        ShapeKind::Octahedron,
        ShapeKind::Icosahedron,
    ];

    pub fn for_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Ring => "ring",
            ShapeKind::Knot => "knot",
            ShapeKind::Octahedron => "octahedron",
            ShapeKind::Icosahedron => "icosahedron",
        }
    }
}

/// Live transform, rewritten every frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles (radians), unbounded; f64 so per-frame spin stays additive
    pub rotation: DVec3,
    /// Uniform scale
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: DVec3::ZERO,
            scale: 1.0,
        }
    }
}

/// A floating shape in the hero scene
///
/// Creation-time parameters are private and exposed read-only; only the
/// transform and colors change after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingObject {
    index: usize,
    kind: ShapeKind,
    base_position: Vec3,
    base_scale: f32,
    /// Phase offset of the bobbing motion, [0, 2π)
    float_offset: f32,
    float_speed: f32,
    /// Per-axis angular velocity (radians per frame)
    rotation_speed: DVec3,

    pub transform: Transform,
    /// Live diffuse color (smoothed)
    pub color: Rgb,
    /// Glow color (copied from the hue target each frame)
    pub emissive: Rgb,
}

impl FloatingObject {
    /// Create object `index` at `base_position` and draw its random animation parameters
    pub fn new<R: Rng>(index: usize, base_position: Vec3, base_scale: f32, rng: &mut R) -> Self {
        let color = PALETTE[index % PALETTE.len()];
        let rotation = DVec3::new(
            rng.random_range(0.0..PI),
            rng.random_range(0.0..PI),
            rng.random_range(0.0..PI),
        );

        Self {
            index,
            kind: ShapeKind::for_index(index),
            base_position,
            base_scale,
            float_offset: rng.random_range(0.0..TAU),
            float_speed: rng.random_range(FLOAT_SPEED_MIN..FLOAT_SPEED_MAX),
            rotation_speed: DVec3::new(
                rng.random_range(-MAX_ROTATION_SPEED..MAX_ROTATION_SPEED),
                rng.random_range(-MAX_ROTATION_SPEED..MAX_ROTATION_SPEED),
                rng.random_range(-MAX_ROTATION_SPEED..MAX_ROTATION_SPEED),
            ),
            transform: Transform {
                position: base_position,
                rotation,
                scale: 1.0,
            },
            color,
            emissive: color.scale(EMISSIVE_FACTOR),
        }
    }

    /// Create with explicit animation parameters (no randomness)
    pub fn with_params(
        index: usize,
        base_position: Vec3,
        base_scale: f32,
        float_offset: f32,
        rotation_speed: DVec3,
    ) -> Self {
        let color = PALETTE[index % PALETTE.len()];
        Self {
            index,
            kind: ShapeKind::for_index(index),
            base_position,
            base_scale,
            float_offset,
            float_speed: FLOAT_SPEED_MIN,
            rotation_speed,
            transform: Transform {
                position: base_position,
                ..Default::default()
            },
            color,
            emissive: color.scale(EMISSIVE_FACTOR),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn base_position(&self) -> Vec3 {
        self.base_position
    }

    /// Base position projected on the placement plane
    pub fn footprint(&self) -> Vec2 {
        self.base_position.truncate()
    }

    pub fn base_scale(&self) -> f32 {
        self.base_scale
    }

    pub fn float_offset(&self) -> f32 {
        self.float_offset
    }

    pub fn float_speed(&self) -> f32 {
        self.float_speed
    }

    pub fn rotation_speed(&self) -> DVec3 {
        self.rotation_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_shape_cycle() {
        assert_eq!(ShapeKind::for_index(0), ShapeKind::Ring);
        assert_eq!(ShapeKind::for_index(3), ShapeKind::Icosahedron);
        assert_eq!(ShapeKind::for_index(4), ShapeKind::Ring);
    }

    #[test]
    fn test_new_draws_parameters_in_range() {
        let mut rng = Pcg32::seed_from_u64(9);
        for index in 0..50 {
            let obj = FloatingObject::new(index, Vec3::new(1.0, 2.0, -3.0), 1.1, &mut rng);
            assert!((0.0..TAU).contains(&obj.float_offset()));
            assert!((FLOAT_SPEED_MIN..FLOAT_SPEED_MAX).contains(&obj.float_speed()));
            assert!(obj.rotation_speed().abs().max_element() < MAX_ROTATION_SPEED);
            assert!(obj.transform.rotation.max_element() < PI);
            assert!(obj.transform.rotation.min_element() >= 0.0);
            assert_eq!(obj.transform.position, obj.base_position());
            assert_eq!(obj.transform.scale, 1.0);
            assert_eq!(obj.color, PALETTE[index % 6]);
        }
    }
}
