//! Platform abstraction layer
//!
//! Browser/native differences for window size, pixel ratio and time.

use crate::renderer::Viewport;

/// Current window inner size in CSS pixels
#[cfg(target_arch = "wasm32")]
pub fn window_viewport() -> Option<Viewport> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some(Viewport::new(width as f32, height as f32))
}

/// Device pixel ratio capped at `max`
#[cfg(target_arch = "wasm32")]
pub fn pixel_ratio(max: f32) -> f32 {
    web_sys::window()
        .map(|w| w.device_pixel_ratio() as f32)
        .unwrap_or(1.0)
        .min(max)
}

/// Milliseconds since the epoch (used for seeding)
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn window_viewport() -> Option<Viewport> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn pixel_ratio(max: f32) -> f32 {
    1.0f32.min(max)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// A host resource that stays attached until the guard drops
///
/// Lets a multi-step setup bail out with `?` at any point after attaching.
pub struct Attached<T, F: FnMut(&T)> {
    item: T,
    detach: F,
}

impl<T, F: FnMut(&T)> Attached<T, F> {
    pub fn new(item: T, detach: F) -> Self {
        Self { item, detach }
    }

    pub fn get(&self) -> &T {
        &self.item
    }
}

impl<T, F: FnMut(&T)> Drop for Attached<T, F> {
    fn drop(&mut self) {
        (self.detach)(&self.item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn setup(detached: &Cell<u32>, fail_at: Option<u32>) -> Result<Attached<u32, impl FnMut(&u32) + '_>, String> {
        let attached = Attached::new(7, |_: &u32| detached.set(detached.get() + 1));
        for step in 0..3 {
            if fail_at == Some(step) {
                return Err(format!("step {step} failed"));
            }
        }
        Ok(attached)
    }

    #[test]
    fn test_failed_setup_detaches() {
        let detached = Cell::new(0);
        assert!(setup(&detached, Some(1)).is_err());
        assert_eq!(detached.get(), 1);
    }

    #[test]
    fn test_successful_setup_stays_attached_until_drop() {
        let detached = Cell::new(0);
        let attached = setup(&detached, None);
        assert_eq!(attached.as_ref().map(|a| *a.get()), Ok(7));
        assert_eq!(detached.get(), 0);
        drop(attached);
        assert_eq!(detached.get(), 1);
    }

    #[test]
    fn test_native_pixel_ratio_respects_cap() {
        assert_eq!(pixel_ratio(2.0), 1.0);
        assert_eq!(pixel_ratio(0.5), 0.5);
    }
}
