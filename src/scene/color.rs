//! RGB colors, HSL conversion and the object palette

use serde::{Deserialize, Serialize};

/// Linear-blend RGB color, components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// Starting colors, assigned by object index
pub const PALETTE: [Rgb; 6] = [
    Rgb::from_hex(0xff1493), // Deep pink
    Rgb::from_hex(0x4169e1), // Royal blue
    Rgb::from_hex(0x32cd32), // Lime green
    Rgb::from_hex(0xffa500), // Orange
    Rgb::from_hex(0x9400d3), // Violet
    Rgb::from_hex(0x00ced1), // Dark turquoise
];

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// From a 0xRRGGBB literal
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// From hue, saturation, lightness (all in [0, 1]); hue wraps
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.rem_euclid(1.0);
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);

        if s == 0.0 {
            return Self::new(l, l, l);
        }

        let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Self {
            r: hue_to_channel(p, q, h + 1.0 / 3.0),
            g: hue_to_channel(p, q, h),
            b: hue_to_channel(p, q, h - 1.0 / 3.0),
        }
    }

    /// Move toward `target` by factor `t` per channel
    pub fn lerp(self, target: Rgb, t: f32) -> Self {
        Self {
            r: crate::damp(self.r, target.r, t),
            g: crate::damp(self.g, target.g, t),
            b: crate::damp(self.b, target.b, t),
        }
    }

    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}
