//! Orbit Hop world state and seeded generation
//!
//! Everything layout-affecting draws from the gameplay RNG stream so one
//! seed reproduces the same world; particle jitter and star spin phases use
//! a separate cosmetic stream that never perturbs layout.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::heading_vec;
use crate::sim::particles::Particle;

/// Stream offset separating the cosmetic RNG from the gameplay RNG
const COSMETIC_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// Stable identifier for a massive body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub u8);

impl BodyId {
    /// Single-letter label shown in the HUD ('A', 'B', ...)
    pub fn label(self) -> char {
        (b'A' + self.0) as char
    }
}

/// A massive body. Immutable after world generation.
#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    pub pos: Vec2,
    pub radius: f32,
    pub mass: f32,
    /// Palette slot for rendering
    pub hue: u8,
}

/// The player's ship. Mutated every simulation step.
#[derive(Debug, Clone)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    pub heading: f32,
    /// Propellant level, kept within [0, 1]
    pub fuel: f32,
    pub landed: bool,
    /// Body the ship is resting on, when landed
    pub landed_on: Option<BodyId>,
}

/// A collectible star. Collected at most once.
#[derive(Debug, Clone)]
pub struct Star {
    pub pos: Vec2,
    pub alive: bool,
    /// Decorative rotation phase, cosmetic only
    pub spin: f32,
}

/// Smoothed follower camera. Rendering only, never feeds back into physics.
#[derive(Debug, Clone)]
pub struct Camera {
    pub pos: Vec2,
    pub vel: Vec2,
    pub zoom: f32,
}

/// Gameplay events emitted by a step, drained by the shell for audio/HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitEvent {
    Landed { body: BodyId },
    Bounced,
    Launched,
    StarCollected,
    RunEnded,
}

/// Orbit Hop tuning constants.
///
/// The source games shipped several near-duplicate tunings; this is one
/// independent parameter set, not a reconciliation of all of them.
#[derive(Debug, Clone, Copy)]
pub struct OrbitTuning {
    /// Gravitational constant (scaled for pixel-space masses)
    pub gravity: f32,
    /// Softening length: keeps acceleration finite at a body's center
    pub softening: f32,
    /// Thrust acceleration along the heading
    pub thrust: f32,
    /// Steering rate, radians per second
    pub turn_rate: f32,
    /// Per-step easing of the heading toward the velocity direction
    pub heading_align: f32,
    pub max_speed: f32,
    /// Baseline space "stabilizer" drag
    pub drag: f32,
    /// Drag inside a body's atmosphere band
    pub atmo_drag: f32,
    /// Atmosphere band outer edge as a multiple of body radius
    pub atmo_band: f32,
    /// Fuel drained per second inside an atmosphere
    pub atmo_fuel_drain: f32,
    pub fuel_burn: f32,
    pub fuel_regen: f32,
    /// Pickup radius for stars
    pub star_radius: f32,
    /// Contact below this speed lands; above it bounces
    pub land_speed: f32,
    /// Resting height above the surface
    pub land_pad: f32,
    /// Outward speed imparted on launch
    pub launch_speed: f32,
    pub launch_fuel_cost: f32,
    pub land_score: f32,
    pub land_fuel: f32,
    pub star_score: f32,
    pub star_fuel: f32,
    /// Survival score per second
    pub time_score: f32,
    /// Extra score per unit of speed per second
    pub speed_score: f32,
    /// Surface distance past which the rescue pull engages
    pub rescue_distance: f32,
    pub rescue_accel: f32,
    /// Score bled per second while the rescue pull is active
    pub rescue_score_bleed: f32,
    /// Multiple of `rescue_distance` past which the run ends
    pub lost_factor: f32,
    /// Normal-velocity reflection factor on a too-fast contact
    pub bounce_restitution: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
}

impl Default for OrbitTuning {
    fn default() -> Self {
        Self {
            gravity: 6_000_000.0,
            softening: 180.0,
            thrust: 520.0,
            turn_rate: 2.6,
            heading_align: 0.06,
            max_speed: 1400.0,
            drag: 0.0025,
            atmo_drag: 0.22,
            atmo_band: 1.45,
            atmo_fuel_drain: 0.04,
            fuel_burn: 0.10,
            fuel_regen: 0.06,
            star_radius: 18.0,
            land_speed: 280.0,
            land_pad: 10.0,
            launch_speed: 320.0,
            launch_fuel_cost: 0.08,
            land_score: 250.0,
            land_fuel: 0.35,
            star_score: 120.0,
            star_fuel: 0.12,
            time_score: 22.0,
            speed_score: 0.02,
            rescue_distance: 6800.0,
            rescue_accel: 260.0,
            rescue_score_bleed: 8.0,
            lost_factor: 1.35,
            bounce_restitution: 1.8,
            zoom_min: 0.45,
            zoom_max: 1.05,
        }
    }
}

/// Number of collectible stars sprinkled around the bodies
pub const STAR_COUNT: usize = 14;

/// Starting orbit height above the home body's surface
pub const START_ORBIT_HEIGHT: f32 = 360.0;

/// Complete Orbit Hop session state
#[derive(Debug, Clone)]
pub struct OrbitWorld {
    /// Run seed for reproducibility
    pub seed: u32,
    /// Elapsed simulated time
    pub time: f32,
    pub running: bool,
    pub score: f32,
    pub bodies: Vec<Body>,
    pub ship: Ship,
    pub stars: Vec<Star>,
    /// Bodies visited this run, in first-visit order
    pub visited: Vec<BodyId>,
    pub camera: Camera,
    pub tuning: OrbitTuning,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Events from the most recent step
    pub events: Vec<OrbitEvent>,
    pub(crate) cosmetic_rng: Pcg32,
}

impl OrbitWorld {
    /// Generate a world from a seed with default tuning
    pub fn new(seed: u32) -> Self {
        Self::with_tuning(seed, OrbitTuning::default())
    }

    /// Generate a world from a seed. Two calls with the same seed produce
    /// identical body and star layouts.
    pub fn with_tuning(seed: u32, tuning: OrbitTuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(u64::from(seed));
        let mut cosmetic_rng = Pcg32::seed_from_u64(u64::from(seed) ^ COSMETIC_STREAM);

        let bodies = vec![
            Body {
                id: BodyId(0),
                pos: Vec2::ZERO,
                radius: 220.0,
                mass: 8.0,
                hue: 0,
            },
            Body {
                id: BodyId(1),
                pos: Vec2::new(
                    1400.0 + rng.random::<f32>() * 600.0,
                    -900.0 + rng.random::<f32>() * 600.0,
                ),
                radius: 140.0,
                mass: 4.5,
                hue: 1,
            },
            Body {
                id: BodyId(2),
                pos: Vec2::new(
                    -1600.0 - rng.random::<f32>() * 700.0,
                    1100.0 + rng.random::<f32>() * 700.0,
                ),
                radius: 160.0,
                mass: 5.2,
                hue: 2,
            },
        ];

        // Ship starts on a near-circular orbit around the home body
        let angle = rng.random::<f32>() * TAU;
        let home = &bodies[0];
        let orbit_r = home.radius + START_ORBIT_HEIGHT;
        let mu = tuning.gravity * home.mass;
        let speed = (mu / orbit_r).sqrt() * (0.98 + rng.random::<f32>() * 0.06);
        let radial = heading_vec(angle);
        let tangent = Vec2::new(-angle.sin(), angle.cos());

        let ship = Ship {
            pos: home.pos + radial * orbit_r,
            vel: tangent * speed,
            heading: tangent.y.atan2(tangent.x),
            fuel: 1.0,
            landed: false,
            landed_on: None,
        };

        let mut stars = Vec::with_capacity(STAR_COUNT);
        for i in 0..STAR_COUNT {
            let body = &bodies[i % bodies.len()];
            let ang = rng.random::<f32>() * TAU;
            let rad = body.radius * 2.2 + rng.random::<f32>() * 560.0;
            stars.push(Star {
                pos: body.pos + heading_vec(ang) * rad,
                alive: true,
                spin: cosmetic_rng.random::<f32>() * TAU,
            });
        }

        let camera = Camera {
            pos: ship.pos,
            vel: Vec2::ZERO,
            zoom: 0.9,
        };

        Self {
            seed,
            time: 0.0,
            running: true,
            score: 0.0,
            bodies,
            ship,
            stars,
            visited: Vec::new(),
            camera,
            tuning,
            particles: Vec::new(),
            events: Vec::new(),
            cosmetic_rng,
        }
    }

    /// Nearest body and the ship's distance to its surface (negative when
    /// inside the body)
    pub fn nearest_body(&self) -> Option<(&Body, f32)> {
        self.bodies
            .iter()
            .map(|b| (b, self.ship.pos.distance(b.pos) - b.radius))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Stars collected so far
    pub fn stars_collected(&self) -> usize {
        self.stars.iter().filter(|s| !s.alive).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_deterministic() {
        let a = OrbitWorld::new(20260807);
        let b = OrbitWorld::new(20260807);

        assert_eq!(a.bodies.len(), b.bodies.len());
        for (ba, bb) in a.bodies.iter().zip(&b.bodies) {
            assert_eq!(ba.id, bb.id);
            assert_eq!(ba.pos, bb.pos);
            assert_eq!(ba.mass, bb.mass);
        }
        assert_eq!(a.stars.len(), b.stars.len());
        for (sa, sb) in a.stars.iter().zip(&b.stars) {
            assert_eq!(sa.pos, sb.pos);
            assert!(sa.alive && sb.alive);
        }
        assert_eq!(a.ship.pos, b.ship.pos);
        assert_eq!(a.ship.vel, b.ship.vel);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = OrbitWorld::new(1);
        let b = OrbitWorld::new(2);
        assert_ne!(a.bodies[1].pos, b.bodies[1].pos);
    }

    #[test]
    fn test_ship_starts_in_orbit_band() {
        let world = OrbitWorld::new(42);
        let home = &world.bodies[0];
        let dist = world.ship.pos.distance(home.pos);
        assert!((dist - (home.radius + START_ORBIT_HEIGHT)).abs() < 1.0);
        assert!(world.ship.fuel == 1.0);
        assert!(!world.ship.landed);
    }

    #[test]
    fn test_body_labels() {
        assert_eq!(BodyId(0).label(), 'A');
        assert_eq!(BodyId(2).label(), 'C');
    }
}
