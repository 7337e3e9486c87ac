//! Scene layout and animation module
//!
//! Everything that decides where the floating shapes are lives here. Like the
//! renderer-independent parts of any frame loop it is:
//! - Seeded RNG only (injected, never ambient)
//! - Fixed per-frame step (one clock tick per rendered frame)
//! - Stable iteration order (by object index)
//! - No platform dependencies; drawing goes through `renderer::Renderer`

pub mod animator;
pub mod clock;
pub mod color;
pub mod input;
pub mod lifecycle;
pub mod object;
pub mod placement;
pub mod scale;

pub use animator::{FrameInput, update_object};
pub use clock::AnimationClock;
pub use color::{PALETTE, Rgb};
pub use input::{Bounds, InputState, normalize_pointer, scroll_fraction};
pub use lifecycle::{Scene, object_count};
pub use object::{FloatingObject, ShapeKind, Transform};
pub use placement::{find_placement, place_object};
pub use scale::{base_scale, resolve_scale};
