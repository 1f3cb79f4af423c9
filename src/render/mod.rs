//! Canvas 2D rendering
//!
//! Thin wrappers over `CanvasRenderingContext2d`: a DPR-aware surface, a
//! shared parallax starfield, and one draw pass per game. The simulations
//! never see any of this.

pub mod background;
pub mod balance;
pub mod gate;
pub mod orbit;
pub mod surface;

pub use background::Starfield;
pub use surface::Surface;
