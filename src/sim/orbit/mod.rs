//! Orbit Hop - a forgiving orbital toy with multiple planets
//!
//! Hold thrust to burn along the heading, steer left/right, brake for a
//! retrograde burn. Land gently to visit planets, collect stars, don't
//! drift off into the void.

pub mod state;
pub mod tick;

pub use state::{Body, BodyId, Camera, OrbitEvent, OrbitTuning, OrbitWorld, Ship, Star};
pub use tick::{OrbitInput, gravity_accel, step};
