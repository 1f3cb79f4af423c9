//! Balance the Rocket - attitude control under ramping wind
//!
//! Keep the rocket upright and inside the rails while the wind picks up.
//! Periodic stability checks award score for holding a tight envelope.
//! The wind is built from fixed sinusoids, so a run is fully deterministic
//! given the input sequence.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::MAX_FRAME_DT;
use crate::sim::particles::{MAX_PARTICLES, Particle, step_particles};

use std::f32::consts::{PI, TAU};

/// Thrust cuts out below this fuel level
const FUEL_EPSILON: f32 = 0.001;

/// Hold time a check leaks per second spent outside the envelope
const HOLD_LEAK: f32 = 0.8;

/// Thruster particle velocity damping per second
const THRUSTER_DECAY: f32 = 1.2;

/// Input snapshot for one step
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceInput {
    pub left: bool,
    pub right: bool,
}

/// Gameplay events emitted by a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceEvent {
    CheckStarted,
    CheckPassed,
    CheckFailed,
    Crashed,
}

/// Balance tuning constants (one independent parameter set)
#[derive(Debug, Clone, Copy)]
pub struct BalanceTuning {
    /// Crash tilt, radians
    pub max_angle: f32,
    /// Crash offset as a fraction of arena width
    pub max_offset_frac: f32,
    pub base_wind: f32,
    /// Wind amplitude growth per second
    pub wind_ramp: f32,
    pub wind_gust: f32,
    /// Gust cycle frequency, Hz
    pub wind_freq: f32,
    /// Control torque
    pub torque: f32,
    /// Wind-to-torque coupling
    pub wind_torque: f32,
    /// Wind lateral push
    pub wind_force: f32,
    /// Control lateral push
    pub ctrl_force: f32,
    /// Angular velocity damping per second
    pub damp_angle: f32,
    /// Lateral velocity damping per second
    pub damp_offset: f32,
    pub fuel_burn: f32,
    pub fuel_regen: f32,
    /// Fuel awarded for a passed check
    pub fuel_bonus: f32,
    /// Seconds between stability checks
    pub check_every: f32,
    /// Check window length, seconds
    pub check_len: f32,
    /// Hold time required to pass
    pub check_hold: f32,
    pub check_tight_angle: f32,
    /// Tight offset envelope as a fraction of arena width
    pub check_tight_frac: f32,
    pub score_time: f32,
    pub score_check: f32,
    /// Bonus rate while hovering very stable
    pub score_clean: f32,
    pub check_penalty: f32,
    pub clean_angle: f32,
    pub clean_frac: f32,
    /// Easy-mode scaling
    pub easy_wind: f32,
    pub easy_torque: f32,
    pub easy_max_angle: f32,
    pub easy_max_offset_frac: f32,
}

impl Default for BalanceTuning {
    fn default() -> Self {
        Self {
            max_angle: 0.62,
            max_offset_frac: 0.42,
            base_wind: 0.35,
            wind_ramp: 0.08,
            wind_gust: 0.65,
            wind_freq: 0.12,
            torque: 2.4,
            wind_torque: 1.25,
            wind_force: 260.0,
            ctrl_force: 95.0,
            damp_angle: 1.15,
            damp_offset: 0.55,
            fuel_burn: 0.16,
            fuel_regen: 0.08,
            fuel_bonus: 0.20,
            check_every: 10.0,
            check_len: 2.2,
            check_hold: 1.2,
            check_tight_angle: 0.20,
            check_tight_frac: 0.12,
            score_time: 8.0,
            score_check: 220.0,
            score_clean: 35.0,
            check_penalty: 80.0,
            clean_angle: 0.09,
            clean_frac: 0.05,
            easy_wind: 0.75,
            easy_torque: 0.9,
            easy_max_angle: 0.72,
            easy_max_offset_frac: 0.52,
        }
    }
}

/// Complete Balance session state
#[derive(Debug, Clone)]
pub struct BalanceWorld {
    pub time: f32,
    pub running: bool,
    pub score: f32,
    /// Propellant level, kept within [0, 1]
    pub fuel: f32,
    /// Tilt, radians, 0 = upright
    pub angle: f32,
    pub ang_vel: f32,
    /// Lateral offset from center, pixels
    pub offset: f32,
    pub offset_vel: f32,
    /// Last sampled wind value (HUD indicator)
    pub wind: f32,
    pub checks_done: u32,
    pub checks_passed: u32,
    pub check_active: bool,
    pub check_elapsed: f32,
    pub check_held: f32,
    /// Arena width, used to scale offset bounds
    pub width: f32,
    pub easy: bool,
    pub tuning: BalanceTuning,
    /// Visual particles in rocket-local space
    pub particles: Vec<Particle>,
    /// Events from the most recent step
    pub events: Vec<BalanceEvent>,
    cosmetic_rng: Pcg32,
}

impl BalanceWorld {
    pub fn new(width: f32, easy: bool) -> Self {
        Self::with_tuning(width, easy, BalanceTuning::default())
    }

    pub fn with_tuning(width: f32, easy: bool, tuning: BalanceTuning) -> Self {
        Self {
            time: 0.0,
            running: true,
            score: 0.0,
            fuel: 1.0,
            angle: 0.0,
            ang_vel: 0.0,
            offset: 0.0,
            offset_vel: 0.0,
            wind: 0.0,
            checks_done: 0,
            checks_passed: 0,
            check_active: false,
            check_elapsed: 0.0,
            check_held: 0.0,
            width: width.max(1.0),
            easy,
            tuning,
            particles: Vec::new(),
            events: Vec::new(),
            cosmetic_rng: Pcg32::seed_from_u64(0x5EED_BA1A),
        }
    }

    /// Crash tilt bound for the current mode
    pub fn max_angle(&self) -> f32 {
        if self.easy {
            self.tuning.easy_max_angle
        } else {
            self.tuning.max_angle
        }
    }

    /// Crash offset bound (pixels) for the current mode
    pub fn max_offset(&self) -> f32 {
        let frac = if self.easy {
            self.tuning.easy_max_offset_frac
        } else {
            self.tuning.max_offset_frac
        };
        frac * self.width
    }

    /// Current wind amplitude, for the HUD percentage readout
    pub fn wind_amplitude(&self) -> f32 {
        self.tuning.base_wind + self.tuning.wind_ramp * self.time
    }
}

/// Deterministic wind sample: ramping amplitude shaping a gust/noise/drift
/// sum through tanh
fn sample_wind(tuning: &BalanceTuning, time: f32, easy: bool) -> f32 {
    let amp = tuning.base_wind + tuning.wind_ramp * time;
    let gust = (time * tuning.wind_freq * TAU).sin() * tuning.wind_gust;
    let noise = ((time * 1.7).sin() + (time * 0.91 + 2.1).sin()) * 0.30;
    let drift = 0.35 * (time * 0.23 + 1.1).sin() + 0.25 * (time * 0.07 + 2.7).sin();
    let mut wind = amp * (gust + noise + drift).tanh();
    if easy {
        wind *= tuning.easy_wind;
    }
    wind
}

/// Advance the world by one step
pub fn step(world: &mut BalanceWorld, input: &BalanceInput, dt: f32) {
    if !world.running {
        return;
    }
    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    if dt <= 0.0 {
        return;
    }

    world.events.clear();
    world.time += dt;

    let tuning = world.tuning;
    let wind = sample_wind(&tuning, world.time, world.easy);
    world.wind = wind;

    // Stability check scheduling
    if !world.check_active {
        let next_at = (world.checks_done + 1) as f32 * tuning.check_every;
        if world.time >= next_at {
            world.check_active = true;
            world.check_elapsed = 0.0;
            world.check_held = 0.0;
            world.events.push(BalanceEvent::CheckStarted);
        }
    } else {
        world.check_elapsed += dt;
        let inside = world.angle.abs() < tuning.check_tight_angle
            && world.offset.abs() < tuning.check_tight_frac * world.width;
        if inside {
            world.check_held += dt;
        } else {
            world.check_held = (world.check_held - dt * HOLD_LEAK).max(0.0);
        }

        if world.check_elapsed >= tuning.check_len {
            world.checks_done += 1;
            if world.check_held >= tuning.check_hold {
                world.checks_passed += 1;
                world.score += tuning.score_check;
                world.fuel = (world.fuel + tuning.fuel_bonus).clamp(0.0, 1.0);
                world.events.push(BalanceEvent::CheckPassed);
            } else {
                world.score = (world.score - tuning.check_penalty).max(0.0);
                world.events.push(BalanceEvent::CheckFailed);
            }
            world.check_active = false;
            world.check_elapsed = 0.0;
            world.check_held = 0.0;
        }
    }

    // Thruster inputs, limited by fuel
    let mut left = input.left;
    let mut right = input.right;
    let burning = (left as u8 + right as u8) as f32;
    world.fuel = (world.fuel - burning * tuning.fuel_burn * dt).clamp(0.0, 1.0);
    if world.fuel <= FUEL_EPSILON {
        left = false;
        right = false;
    }
    if !left && !right {
        world.fuel = (world.fuel + tuning.fuel_regen * dt).clamp(0.0, 1.0);
    }

    // Angular and lateral dynamics: first-order integrators with
    // exponential damping
    let ctrl = (right as i8 - left as i8) as f32;
    let ctrl_torque = ctrl * tuning.torque * if world.easy { tuning.easy_torque } else { 1.0 };
    world.ang_vel += (wind * tuning.wind_torque + ctrl_torque) * dt;
    world.ang_vel *= (-tuning.damp_angle * dt).exp();
    world.angle += world.ang_vel * dt;

    let force = wind * tuning.wind_force + ctrl * tuning.ctrl_force;
    world.offset_vel += force * dt;
    world.offset_vel *= (-tuning.damp_offset * dt).exp();
    world.offset += world.offset_vel * dt;

    // Scoring: survival rate plus a clean-hover bonus
    world.score += tuning.score_time * dt;
    if world.angle.abs() < tuning.clean_angle
        && world.offset.abs() < tuning.clean_frac * world.width
    {
        world.score += tuning.score_clean * dt;
    }

    // Thruster exhaust, cosmetic only
    if left {
        spawn_thruster(world, -1.0);
    }
    if right {
        spawn_thruster(world, 1.0);
    }
    step_particles(&mut world.particles, dt, THRUSTER_DECAY, 0.0);

    // Crash bounds
    if world.angle.abs() > world.max_angle() || world.offset.abs() > world.max_offset() {
        world.running = false;
        world.events.push(BalanceEvent::Crashed);
    }
}

/// Emit a burst from one thruster, in rocket-local coordinates (x relative
/// to the arena center, y below the rocket's midpoint)
fn spawn_thruster(world: &mut BalanceWorld, side: f32) {
    let strength = 0.85;
    let count = (6.0 + 14.0 * strength) as usize;
    let base_speed = 120.0 + 190.0 * strength;
    for _ in 0..count {
        if world.particles.len() >= MAX_PARTICLES {
            break;
        }
        let jitter = (world.cosmetic_rng.random::<f32>() - 0.5) * 6.0;
        let jitter2 = (world.cosmetic_rng.random::<f32>() - 0.5) * 4.0;
        let emit = world.angle + PI / 2.0 + side * 0.18
            + (world.cosmetic_rng.random::<f32>() - 0.5) * 0.35;
        let speed = base_speed + world.cosmetic_rng.random::<f32>() * 70.0;
        world.particles.push(Particle {
            pos: Vec2::new(world.offset + side * 12.0 + jitter, 30.0 + jitter2),
            vel: Vec2::new(emit.cos(), emit.sin()) * speed,
            life: 0.20 + world.cosmetic_rng.random::<f32>() * 0.25,
            radius: 1.5 + world.cosmetic_rng.random::<f32>() * 2.8,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 120.0;
    const WIDTH: f32 = 900.0;

    /// Tuning with the wind turned off, for tests that need a still arena
    fn calm() -> BalanceTuning {
        BalanceTuning {
            base_wind: 0.0,
            wind_ramp: 0.0,
            ..BalanceTuning::default()
        }
    }

    #[test]
    fn test_still_air_stays_upright() {
        let mut world = BalanceWorld::with_tuning(WIDTH, false, calm());
        for _ in 0..600 {
            step(&mut world, &BalanceInput::default(), DT);
        }
        assert!(world.running);
        assert_eq!(world.angle, 0.0);
        assert_eq!(world.offset, 0.0);
        assert!(world.score > 0.0);
    }

    #[test]
    fn test_tilt_past_bound_crashes() {
        let mut world = BalanceWorld::new(WIDTH, false);
        world.angle = world.max_angle() + 0.2;
        step(&mut world, &BalanceInput::default(), DT);
        assert!(!world.running);
        assert!(world.events.contains(&BalanceEvent::Crashed));

        // A crashed run no longer advances
        let t = world.time;
        step(&mut world, &BalanceInput::default(), DT);
        assert_eq!(world.time, t);
    }

    #[test]
    fn test_easy_mode_widens_bounds() {
        let hard = BalanceWorld::new(WIDTH, false);
        let easy = BalanceWorld::new(WIDTH, true);
        assert!(easy.max_angle() > hard.max_angle());
        assert!(easy.max_offset() > hard.max_offset());
    }

    #[test]
    fn test_stability_check_passes_while_steady() {
        let mut world = BalanceWorld::with_tuning(WIDTH, false, calm());
        // Run past the first full check window
        let horizon = world.tuning.check_every + world.tuning.check_len + 0.5;
        let mut saw_start = false;
        while world.time < horizon {
            step(&mut world, &BalanceInput::default(), DT);
            saw_start |= world.events.contains(&BalanceEvent::CheckStarted);
        }
        assert!(saw_start);
        assert_eq!(world.checks_done, 1);
        assert_eq!(world.checks_passed, 1);
        assert!(world.score > world.tuning.score_check);
    }

    #[test]
    fn test_stability_check_fails_off_center() {
        let mut world = BalanceWorld::with_tuning(WIDTH, false, calm());
        // Park outside the tight envelope but inside the crash bounds;
        // zero out the drift each step so it stays there
        let horizon = world.tuning.check_every + world.tuning.check_len + 0.5;
        while world.time < horizon {
            world.offset = world.tuning.check_tight_frac * WIDTH * 2.0;
            world.offset_vel = 0.0;
            step(&mut world, &BalanceInput::default(), DT);
        }
        assert_eq!(world.checks_done, 1);
        assert_eq!(world.checks_passed, 0);
    }

    #[test]
    fn test_thrusters_torque_opposite_ways() {
        let mut left_world = BalanceWorld::with_tuning(WIDTH, false, calm());
        let mut right_world = BalanceWorld::with_tuning(WIDTH, false, calm());
        let left = BalanceInput {
            left: true,
            ..Default::default()
        };
        let right = BalanceInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..30 {
            step(&mut left_world, &left, DT);
            step(&mut right_world, &right, DT);
        }
        assert!(left_world.angle < 0.0);
        assert!(right_world.angle > 0.0);
        assert!(left_world.fuel < 1.0);
    }

    #[test]
    fn test_empty_tank_cuts_thrust() {
        let mut world = BalanceWorld::with_tuning(WIDTH, false, calm());
        world.fuel = 0.0;
        let input = BalanceInput {
            right: true,
            ..Default::default()
        };
        step(&mut world, &input, DT);
        assert_eq!(world.ang_vel, 0.0, "no torque without fuel");
        assert!(world.fuel >= 0.0);
    }

    #[test]
    fn test_runs_are_deterministic() {
        let mut a = BalanceWorld::new(WIDTH, false);
        let mut b = BalanceWorld::new(WIDTH, false);
        let input = BalanceInput {
            left: true,
            ..Default::default()
        };
        for i in 0..500 {
            let snapshot = if i % 3 == 0 {
                input
            } else {
                BalanceInput::default()
            };
            step(&mut a, &snapshot, DT);
            step(&mut b, &snapshot, DT);
        }
        assert_eq!(a.angle, b.angle);
        assert_eq!(a.offset, b.offset);
        assert_eq!(a.score, b.score);
        assert_eq!(a.fuel, b.fuel);
    }

    proptest! {
        #[test]
        fn prop_fuel_stays_clamped(
            inputs in proptest::collection::vec((any::<bool>(), any::<bool>()), 1..80),
            dt in 0.0f32..0.1,
        ) {
            let mut world = BalanceWorld::new(WIDTH, false);
            for (left, right) in inputs {
                step(&mut world, &BalanceInput { left, right }, dt);
                prop_assert!((0.0..=1.0).contains(&world.fuel));
            }
        }

        #[test]
        fn prop_crash_always_stops_the_run(angle in -2.0f32..2.0, offset in -2_000.0f32..2_000.0) {
            let mut world = BalanceWorld::new(WIDTH, false);
            world.angle = angle;
            world.offset = offset;
            // Clearly past a bound: one step of wind cannot pull it back inside
            let exceeded = angle.abs() > world.max_angle() + 0.01
                || offset.abs() > world.max_offset() + 1.0;
            step(&mut world, &BalanceInput::default(), 1.0 / 120.0);
            if exceeded {
                prop_assert!(!world.running);
            }
            if !world.running {
                prop_assert!(world.events.contains(&BalanceEvent::Crashed));
            }
        }
    }
}
