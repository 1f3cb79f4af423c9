//! Deterministic simulation module
//!
//! All gameplay logic lives here. Each game is an explicit world struct
//! advanced by a pure step function:
//! - Input is a snapshot sampled once per step
//! - Layout-affecting randomness draws only from a seeded gameplay stream;
//!   cosmetic randomness (particles, twinkle) has its own stream
//! - dt is clamped inside the step so callers cannot destabilize integration
//! - No rendering or platform dependencies

pub mod balance;
pub mod gate;
pub mod orbit;
pub mod particles;

pub use balance::{BalanceEvent, BalanceInput, BalanceWorld};
pub use gate::{GateEvent, GateInput, GateWorld};
pub use orbit::{Body, BodyId, Camera, OrbitEvent, OrbitInput, OrbitWorld, Ship, Star};
pub use particles::{MAX_PARTICLES, Particle, step_particles};
