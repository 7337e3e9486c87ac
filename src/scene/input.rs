//! Pointer, touch and scroll tracking
//!
//! Event handlers write into `InputState`; the frame step only reads it.

use glam::Vec2;

/// Screen-space rectangle of the scene container (CSS pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Normalize a client position to [-1, 1] on both axes, +y up
///
/// Zero-sized bounds map to the centre rather than producing NaN.
pub fn normalize_pointer(client: Vec2, bounds: Bounds) -> Vec2 {
    if bounds.width <= 0.0 || bounds.height <= 0.0 {
        return Vec2::ZERO;
    }
    let x = ((client.x - bounds.left) / bounds.width) * 2.0 - 1.0;
    let y = -((client.y - bounds.top) / bounds.height) * 2.0 + 1.0;
    let pointer = Vec2::new(x, y);
    if pointer.is_finite() { pointer } else { Vec2::ZERO }
}

/// Scroll progress through the page in [0, 1]
///
/// A page no taller than the viewport has nothing to scroll and reports 0.
pub fn scroll_fraction(scroll_y: f32, document_height: f32, viewport_height: f32) -> f32 {
    let range = document_height - viewport_height;
    if !range.is_finite() || range <= 0.0 {
        return 0.0;
    }
    let fraction = scroll_y / range;
    if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    }
}

/// Input shared between event handlers and the frame step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    /// Normalized pointer position (x, y in [-1, 1])
    pub pointer: Vec2,
    /// Scroll progress (0 = top, 1 = bottom)
    pub scroll: f32,
}

impl InputState {
    pub fn on_pointer_move(&mut self, client: Vec2, bounds: Bounds) {
        self.pointer = normalize_pointer(client, bounds);
    }

    /// Track the first active touch point; extra touches are ignored
    pub fn on_touch_move(&mut self, touches: &[Vec2], bounds: Bounds) {
        if let Some(first) = touches.first() {
            self.on_pointer_move(*first, bounds);
        }
    }

    pub fn on_scroll(&mut self, scroll_y: f32, document_height: f32, viewport_height: f32) {
        self.scroll = scroll_fraction(scroll_y, document_height, viewport_height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bounds() -> Bounds {
        Bounds::new(100.0, 50.0, 800.0, 600.0)
    }

    #[test]
    fn test_pointer_center() {
        let b = bounds();
        assert_eq!(normalize_pointer(b.center(), b), Vec2::ZERO);
    }

    #[test]
    fn test_pointer_corners() {
        let b = bounds();
        assert_eq!(normalize_pointer(Vec2::new(100.0, 50.0), b), Vec2::new(-1.0, 1.0));
        assert_eq!(normalize_pointer(Vec2::new(900.0, 650.0), b), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_pointer_degenerate_bounds() {
        let b = Bounds::new(0.0, 0.0, 0.0, 600.0);
        assert_eq!(normalize_pointer(Vec2::new(10.0, 10.0), b), Vec2::ZERO);
    }

    #[test]
    fn test_touch_uses_first_point() {
        let b = bounds();
        let mut input = InputState::default();
        input.on_touch_move(&[Vec2::new(100.0, 50.0), Vec2::new(900.0, 650.0)], b);
        assert_eq!(input.pointer, Vec2::new(-1.0, 1.0));

        // No touches leaves the pointer alone
        input.on_touch_move(&[], b);
        assert_eq!(input.pointer, Vec2::new(-1.0, 1.0));
    }

    #[test]
    fn test_scroll_fraction() {
        assert_eq!(scroll_fraction(0.0, 3000.0, 1000.0), 0.0);
        assert_eq!(scroll_fraction(1000.0, 3000.0, 1000.0), 0.5);
        assert_eq!(scroll_fraction(2000.0, 3000.0, 1000.0), 1.0);
        assert!(scroll_fraction(1999.0, 3000.0, 1000.0) > 0.99);
    }

    #[test]
    fn test_scroll_fraction_clamps_overscroll() {
        assert_eq!(scroll_fraction(2500.0, 3000.0, 1000.0), 1.0);
        assert_eq!(scroll_fraction(-40.0, 3000.0, 1000.0), 0.0);
    }

    #[test]
    fn test_scroll_fraction_guards_zero_range() {
        assert_eq!(scroll_fraction(0.0, 1000.0, 1000.0), 0.0);
        assert_eq!(scroll_fraction(10.0, 800.0, 1000.0), 0.0);

        let mut input = InputState::default();
        input.on_scroll(0.0, 1000.0, 1000.0);
        assert!(!input.scroll.is_nan());
        assert_eq!(input.scroll, 0.0);
    }

    proptest! {
        #[test]
        fn prop_pointer_inside_bounds_is_normalized(
            fx in 0.0f32..=1.0,
            fy in 0.0f32..=1.0,
            left in -500.0f32..500.0,
            top in -500.0f32..500.0,
            width in 1.0f32..4000.0,
            height in 1.0f32..4000.0,
        ) {
            let b = Bounds::new(left, top, width, height);
            let client = Vec2::new(left + fx * width, top + fy * height);
            let p = normalize_pointer(client, b);
            prop_assert!(p.x >= -1.0 - 1e-3 && p.x <= 1.0 + 1e-3);
            prop_assert!(p.y >= -1.0 - 1e-3 && p.y <= 1.0 + 1e-3);
        }

        #[test]
        fn prop_scroll_fraction_in_unit_range(
            scroll_y in -1e6f32..1e6,
            document_height in 0.0f32..1e6,
            viewport_height in 0.0f32..1e6,
        ) {
            let f = scroll_fraction(scroll_y, document_height, viewport_height);
            prop_assert!((0.0..=1.0).contains(&f));
        }
    }
}
