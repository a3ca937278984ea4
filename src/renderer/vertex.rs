//! Instance types for 2D rendering
//!
//! All `#[repr(C)]` + `Pod` so a GPU host can upload slices with
//! `bytemuck::cast_slice` without conversion.

use bytemuck::{Pod, Zeroable};

/// The bird sprite
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct BirdInstance {
    /// Top-left corner
    pub pos: [f32; 2],
    pub size: f32,
    /// Degrees, positive = nose down
    pub rotation: f32,
    /// Vertical draw offset on top of `pos`
    pub bob: f32,
    pub alpha: f32,
}

/// One pipe pair
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PipeInstance {
    pub x: f32,
    pub width: f32,
    pub gap_top: f32,
    pub gap_bottom: f32,
    /// Cap tilts in degrees
    pub top_cap_tilt: f32,
    pub bottom_cap_tilt: f32,
}

/// Debris dot
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub pos: [f32; 2],
    pub color: [f32; 4],
    pub radius: f32,
}

/// Radial glow of a fresh death effect
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GlowInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub alpha: f32,
}

impl GlowInstance {
    /// Glow color with the instance alpha applied
    pub fn color(&self) -> [f32; 4] {
        let [r, g, b, _] = colors::GLOW;
        [r, g, b, self.alpha]
    }
}

/// Line segment of the streak phase
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct StreakInstance {
    pub start: [f32; 2],
    pub end: [f32; 2],
    pub color: [f32; 4],
    pub width: f32,
}

/// HSB (hue in degrees, saturation/brightness in [0, 1]) to RGBA
pub fn hsb_to_rgba(hue: f32, saturation: f32, brightness: f32, alpha: f32) -> [f32; 4] {
    let s = saturation.clamp(0.0, 1.0);
    let v = brightness.clamp(0.0, 1.0);
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = v * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    [r + m, g + m, b + m, alpha.clamp(0.0, 1.0)]
}

/// Colors for game elements
pub mod colors {
    pub const SKY: [f32; 4] = [0.44, 0.75, 0.96, 1.0];
    pub const PIPE: [f32; 4] = [0.27, 0.72, 0.27, 1.0];
    pub const PIPE_CAP: [f32; 4] = [0.20, 0.58, 0.20, 1.0];
    pub const BIRD: [f32; 4] = [1.0, 0.84, 0.0, 1.0];
    pub const GLOW: [f32; 4] = [0.95, 0.7, 0.3, 1.0];
    pub const HUD_TEXT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f32; 4], b: [f32; 4]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-4)
    }

    #[test]
    fn test_hsb_primaries() {
        assert!(close(hsb_to_rgba(0.0, 1.0, 1.0, 1.0), [1.0, 0.0, 0.0, 1.0]));
        assert!(close(hsb_to_rgba(120.0, 1.0, 1.0, 0.5), [0.0, 1.0, 0.0, 0.5]));
        assert!(close(hsb_to_rgba(240.0, 1.0, 1.0, 1.0), [0.0, 0.0, 1.0, 1.0]));
        assert!(close(hsb_to_rgba(360.0, 1.0, 1.0, 1.0), [1.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_hsb_grey_and_clamps() {
        assert!(close(hsb_to_rgba(200.0, 0.0, 0.5, 2.0), [0.5, 0.5, 0.5, 1.0]));
        assert!(close(hsb_to_rgba(-60.0, 1.0, 1.0, -1.0), [1.0, 0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_instances_are_tightly_packed() {
        assert_eq!(std::mem::size_of::<BirdInstance>(), 6 * 4);
        assert_eq!(std::mem::size_of::<PipeInstance>(), 6 * 4);
        assert_eq!(std::mem::size_of::<ParticleInstance>(), 7 * 4);
        assert_eq!(std::mem::size_of::<StreakInstance>(), 9 * 4);
        let pipes = [PipeInstance::default(); 3];
        assert_eq!(bytemuck::cast_slice::<PipeInstance, u8>(&pipes[..]).len(), 3 * 24);
    }
}
