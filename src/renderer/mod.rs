//! Presentation boundary
//!
//! The simulation never depends on a renderer. A renderer receives a [`Frame`]
//! (raw tile grid plus vehicle pose) and a target frame rate, and reports any
//! failure to present back to the caller.

pub mod palette;
pub mod text;

pub use text::TextRenderer;

use crate::error::RenderError;
use crate::sim::{Footprint, Track, VehicleState};

/// Everything needed to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub track: &'a Track,
    pub vehicle: VehicleState,
    pub footprint: Footprint,
}

/// A presentation backend, lifecycled independently of the simulation
pub trait Renderer {
    /// Present a frame, pacing to `fps`
    fn draw(&mut self, frame: &Frame<'_>, fps: u32) -> Result<(), RenderError>;

    /// Release the display surface; later draws fail with [`RenderError::Closed`]
    fn close(&mut self);
}
