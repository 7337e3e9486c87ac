//! Viewport-driven object scale

use rand::Rng;

use crate::consts::*;

/// Base scale for a viewport width: 1.0 up to the reference width, growing linearly past it
#[inline]
pub fn base_scale(viewport_width: f32) -> f32 {
    if !viewport_width.is_finite() {
        return 1.0;
    }
    (viewport_width / REFERENCE_WIDTH).max(1.0)
}

/// Base scale with a random 75%-125% multiplier applied
pub fn resolve_scale<R: Rng>(viewport_width: f32, rng: &mut R) -> f32 {
    base_scale(viewport_width) * rng.random_range(SCALE_JITTER_MIN..SCALE_JITTER_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_base_scale_reference_width() {
        assert_eq!(base_scale(1920.0), 1.0);
    }

    #[test]
    fn test_base_scale_never_below_one() {
        assert_eq!(base_scale(320.0), 1.0);
        assert_eq!(base_scale(0.0), 1.0);
        assert_eq!(base_scale(-50.0), 1.0);
        assert_eq!(base_scale(f32::NAN), 1.0);
        assert_eq!(base_scale(3840.0), 2.0);
    }

    #[test]
    fn test_resolve_scale_within_jitter_range() {
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..1000 {
            let s = resolve_scale(3840.0, &mut rng);
            assert!((1.5..2.5).contains(&s), "scale {s} out of range");
        }
    }
}
