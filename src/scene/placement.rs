//! Non-overlapping initial placement
//!
//! Candidates cycle through three horizontal sections (left, centre, right)
//! with a little jitter, and the first one far enough from every already
//! placed object wins.

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::consts::*;

/// Position used when the search gives up. May overlap other objects.
pub const FALLBACK_POSITION: Vec3 = Vec3::new(0.0, 0.0, PLACEMENT_DEPTH);

/// Generate the candidate for a given attempt
fn candidate<R: Rng>(attempt: u32, rng: &mut R) -> Vec3 {
    let section = (attempt % PLACEMENT_SECTIONS) as f32;
    let base_x = (section - 1.0) * SECTION_SPACING;
    let x = base_x + rng.random_range(-1.0..1.0);
    let y = rng.random_range(-1.0..1.0);
    Vec3::new(x, y, PLACEMENT_DEPTH)
}

/// True if `pos` keeps at least `min_distance` from every existing position (x,y plane)
fn is_clear(pos: Vec2, existing: &[Vec2], min_distance: f32) -> bool {
    existing.iter().all(|other| pos.distance(*other) >= min_distance)
}

/// Search for a non-overlapping position. Returns `None` if every attempt collided.
pub fn find_placement<R: Rng>(existing: &[Vec2], scale: f32, rng: &mut R) -> Option<Vec3> {
    let min_distance = scale * SEPARATION_FACTOR;

    (0..PLACEMENT_ATTEMPTS)
        .map(|attempt| candidate(attempt, rng))
        .find(|pos| is_clear(pos.truncate(), existing, min_distance))
}

/// Place an object of the given scale, falling back to the origin plane when crowded
pub fn place_object<R: Rng>(existing: &[Vec2], scale: f32, rng: &mut R) -> Vec3 {
    find_placement(existing, scale, rng).unwrap_or_else(|| {
        log::debug!(
            "No clear position after {} attempts (scale {:.2}, {} placed), using fallback",
            PLACEMENT_ATTEMPTS,
            scale,
            existing.len()
        );
        FALLBACK_POSITION
    })
}
