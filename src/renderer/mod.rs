//! Rendering data
//!
//! No drawing happens here. Each frame the host asks for a [`Frame`] and
//! uploads or paints its instance lists however it likes.

pub mod frame;
pub mod vertex;

pub use frame::{Frame, Hud};
pub use vertex::{
    BirdInstance, GlowInstance, ParticleInstance, PipeInstance, StreakInstance, colors,
    hsb_to_rgba,
};
