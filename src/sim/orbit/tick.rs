//! The gravity & trajectory integrator
//!
//! `step` advances one Orbit Hop world by a clamped real-time increment:
//! steering, thrust and fuel, softened multi-body gravity, drag, a
//! semi-implicit Euler integration (velocity first, then position - the
//! stable ordering for orbital motion), landing/bounce/launch resolution,
//! star collection, and the out-of-bounds rescue rule.

use glam::Vec2;

use super::state::{OrbitEvent, OrbitTuning, OrbitWorld, Ship};
use crate::consts::MAX_FRAME_DT;
use crate::sim::particles::{MAX_PARTICLES, Particle, step_particles};
use crate::{angle_lerp, heading_vec, lerp};

/// Thrust cuts out below this fuel level
const FUEL_EPSILON: f32 = 0.01;

/// Below this speed the heading no longer eases toward the velocity
const ALIGN_MIN_SPEED: f32 = 18.0;

/// Below this speed a braking burn reverses the heading instead of
/// following true retrograde
const RETRO_MIN_SPEED: f32 = 10.0;

/// Exhaust particle velocity damping per second
const EXHAUST_DECAY: f32 = 1.2;

/// Decorative star rotation rate, radians per second
const STAR_SPIN_RATE: f32 = 1.2;

/// Input snapshot for one step, sampled once per frame
#[derive(Debug, Clone, Copy, Default)]
pub struct OrbitInput {
    /// Main burn along the heading (or retrograde while braking)
    pub thrust: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    /// Retro-burn modifier
    pub brake: bool,
}

/// Net gravitational acceleration at `pos`.
///
/// The softening length keeps the result finite even at a body's center.
pub fn gravity_accel(bodies: &[super::state::Body], pos: Vec2, tuning: &OrbitTuning) -> Vec2 {
    let soft2 = tuning.softening * tuning.softening;
    let mut accel = Vec2::ZERO;
    for body in bodies {
        let delta = body.pos - pos;
        let r2 = delta.length_squared() + soft2;
        let mag = tuning.gravity * body.mass / r2;
        accel += delta / r2.sqrt() * mag;
    }
    accel
}

fn cap_speed(ship: &mut Ship, max_speed: f32) {
    let speed2 = ship.vel.length_squared();
    if speed2 > max_speed * max_speed {
        ship.vel *= max_speed / speed2.sqrt();
    }
}

/// Advance the world by one step. `dt` is real elapsed seconds, clamped
/// internally; out-of-range inputs are clamped rather than rejected.
pub fn step(world: &mut OrbitWorld, input: &OrbitInput, dt: f32) {
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
    let OrbitWorld {
        ship,
        bodies,
        stars,
        visited,
        camera,
        particles,
        events,
        cosmetic_rng,
        score,
        running,
        ..
    } = world;

    // Steering rotates the heading; coasting eases it toward the velocity
    if !ship.landed {
        let turn = (input.turn_right as i8 - input.turn_left as i8) as f32;
        ship.heading += turn * tuning.turn_rate * dt;

        if turn == 0.0 {
            let speed = ship.vel.length();
            if speed > ALIGN_MIN_SPEED {
                let vel_angle = ship.vel.y.atan2(ship.vel.x);
                ship.heading = angle_lerp(ship.heading, vel_angle, tuning.heading_align);
            }
        }
    }

    // Thrust burns fuel along the heading (retrograde while braking);
    // coasting regenerates it
    if !ship.landed && input.thrust && ship.fuel > FUEL_EPSILON {
        let mut dir = heading_vec(ship.heading);
        if input.brake {
            dir = if ship.vel.length() > RETRO_MIN_SPEED {
                -ship.vel.normalize()
            } else {
                -dir
            };
        }
        ship.vel += dir * tuning.thrust * dt;
        ship.fuel = (ship.fuel - tuning.fuel_burn * dt).clamp(0.0, 1.0);

        if particles.len() < MAX_PARTICLES {
            use rand::Rng;
            particles.push(Particle {
                pos: ship.pos,
                vel: -ship.vel * 0.08,
                life: 0.45 + cosmetic_rng.random::<f32>() * 0.35,
                radius: 2.0 + cosmetic_rng.random::<f32>() * 3.0,
            });
        }
    } else {
        ship.fuel = (ship.fuel + tuning.fuel_regen * dt).clamp(0.0, 1.0);
    }

    // Gravity (velocity first: semi-implicit Euler)
    if !ship.landed {
        ship.vel += gravity_accel(bodies, ship.pos, &tuning) * dt;
    }

    // Drag: tiny stabilizer everywhere, stronger inside an atmosphere band,
    // which also drains fuel
    let mut drag = tuning.drag;
    for body in bodies.iter() {
        if ship.pos.distance(body.pos) < body.radius * tuning.atmo_band {
            drag = drag.max(tuning.atmo_drag);
            ship.fuel = (ship.fuel - tuning.atmo_fuel_drain * dt).clamp(0.0, 1.0);
        }
    }
    if !ship.landed {
        ship.vel *= (-drag * dt).exp();
    }

    cap_speed(ship, tuning.max_speed);

    // Position from the updated velocity
    if !ship.landed {
        ship.pos += ship.vel * dt;
    }

    // Contact resolution: gentle contact lands, fast contact bounces
    if ship.landed {
        // Launch: a new burn un-lands the ship along the surface normal
        if input.thrust && ship.fuel > FUEL_EPSILON {
            let anchor = ship
                .landed_on
                .and_then(|id| bodies.iter().find(|b| b.id == id))
                .or(bodies.first());
            if let Some(body) = anchor {
                let normal = (ship.pos - body.pos).normalize_or(Vec2::X);
                ship.landed = false;
                ship.landed_on = None;
                ship.vel = normal * tuning.launch_speed;
                ship.fuel = (ship.fuel - tuning.launch_fuel_cost).clamp(0.0, 1.0);
                events.push(OrbitEvent::Launched);
            }
        }
    } else {
        for body in bodies.iter() {
            let dist = ship.pos.distance(body.pos);
            if dist >= body.radius + tuning.land_pad {
                continue;
            }
            let normal = (ship.pos - body.pos).normalize_or(Vec2::X);
            let speed = ship.vel.length();
            if speed < tuning.land_speed {
                ship.landed = true;
                ship.landed_on = Some(body.id);
                ship.pos = body.pos + normal * (body.radius + tuning.land_pad);
                ship.vel = Vec2::ZERO;
                ship.fuel = (ship.fuel + tuning.land_fuel).clamp(0.0, 1.0);
                *score += tuning.land_score;
                if !visited.contains(&body.id) {
                    visited.push(body.id);
                }
                events.push(OrbitEvent::Landed { body: body.id });
                break;
            }
            // Too fast: reflect the inward normal component, scaled
            let vn = ship.vel.dot(normal);
            if vn < 0.0 {
                ship.vel -= tuning.bounce_restitution * vn * normal;
                events.push(OrbitEvent::Bounced);
            }
        }
    }

    // Star collection, at most once per star
    for star in stars.iter_mut() {
        star.spin += STAR_SPIN_RATE * dt;
        if star.alive && ship.pos.distance(star.pos) < tuning.star_radius {
            star.alive = false;
            *score += tuning.star_score;
            ship.fuel = (ship.fuel + tuning.star_fuel).clamp(0.0, 1.0);
            events.push(OrbitEvent::StarCollected);
        }
    }

    // Survival scoring, monotonic except for the rescue bleed below
    *score += tuning.time_score * dt + tuning.speed_score * ship.vel.length() * dt;

    // Out-of-bounds: a soft rescue pull first, then the run ends
    let nearest = bodies
        .iter()
        .map(|b| (b, ship.pos.distance(b.pos) - b.radius))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    if let Some((body, dist)) = nearest {
        if dist > tuning.rescue_distance {
            let back = (body.pos - ship.pos).normalize_or_zero();
            ship.vel += back * tuning.rescue_accel * dt;
            *score = (*score - tuning.rescue_score_bleed * dt).max(0.0);
            if dist > tuning.rescue_distance * tuning.lost_factor {
                *running = false;
                events.push(OrbitEvent::RunEnded);
            }
        }
    }

    // The cap is a world invariant, so re-apply after contact/rescue kicks
    cap_speed(ship, tuning.max_speed);

    step_particles(particles, dt, EXHAUST_DECAY, 0.0);

    // Camera: smoothed follower with speed-driven zoom-out
    camera.vel = camera.vel.lerp((ship.pos - camera.pos) * 2.6, 0.05);
    camera.pos += camera.vel * dt;
    let zoom_target = (0.92 - ship.vel.length() / 3600.0).clamp(tuning.zoom_min, tuning.zoom_max);
    camera.zoom = lerp(camera.zoom, zoom_target, 0.06);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::orbit::state::{OrbitTuning, START_ORBIT_HEIGHT};
    use proptest::prelude::*;
    use std::f32::consts::TAU;

    const DT: f32 = 1.0 / 120.0;

    fn hold_thrust() -> OrbitInput {
        OrbitInput {
            thrust: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_gravity_finite_at_body_center() {
        let world = OrbitWorld::new(7);
        for body in &world.bodies {
            let accel = gravity_accel(&world.bodies, body.pos, &world.tuning);
            assert!(accel.is_finite(), "accel blew up at center of {:?}", body.id);
        }
    }

    #[test]
    fn test_circular_orbit_stays_circular() {
        // Zero drag so only the integrator can perturb the orbit; zero
        // softening so sqrt(G*M/R) is the exact circular speed
        let tuning = OrbitTuning {
            drag: 0.0,
            softening: 0.0,
            ..OrbitTuning::default()
        };
        let mut world = OrbitWorld::with_tuning(99, tuning);
        let home = world.bodies[0].clone();
        let orbit_r = home.radius + START_ORBIT_HEIGHT;
        let speed = (tuning.gravity * home.mass / orbit_r).sqrt();
        world.ship.pos = home.pos + Vec2::new(orbit_r, 0.0);
        world.ship.vel = Vec2::new(0.0, speed);

        let period = TAU * orbit_r / speed;
        let steps = (period / DT).ceil() as usize;
        let input = OrbitInput::default();
        for _ in 0..steps {
            step(&mut world, &input, DT);
            let dist = world.ship.pos.distance(home.pos);
            assert!(
                (dist - orbit_r).abs() < orbit_r * 0.02,
                "orbit drifted to {dist} (expected ~{orbit_r})"
            );
        }
        assert!(world.running);
    }

    #[test]
    fn test_fast_contact_bounces() {
        let mut world = OrbitWorld::new(3);
        let home = world.bodies[0].clone();
        world.ship.pos = home.pos + Vec2::new(home.radius + 5.0, 0.0);
        world.ship.vel = Vec2::new(-400.0, 0.0); // well above the landing speed

        step(&mut world, &OrbitInput::default(), DT);

        assert!(!world.ship.landed);
        assert!(
            world.ship.vel.x > 0.0,
            "normal velocity component should flip, got {:?}",
            world.ship.vel
        );
        assert!(world.events.contains(&OrbitEvent::Bounced));
    }

    #[test]
    fn test_gentle_contact_lands_and_rewards() {
        let mut world = OrbitWorld::new(3);
        let home = world.bodies[0].clone();
        world.ship.pos = home.pos + Vec2::new(home.radius + 5.0, 0.0);
        world.ship.vel = Vec2::new(-50.0, 0.0);
        world.ship.fuel = 0.5;
        let score_before = world.score;

        step(&mut world, &OrbitInput::default(), DT);

        assert!(world.ship.landed);
        assert_eq!(world.ship.landed_on, Some(home.id));
        assert_eq!(world.ship.vel, Vec2::ZERO);
        assert_eq!(world.visited, vec![home.id]);
        assert!(world.score > score_before + world.tuning.land_score - 1.0);
        assert!(world.ship.fuel > 0.5);
        assert!(world.events.contains(&OrbitEvent::Landed { body: home.id }));
    }

    #[test]
    fn test_landing_is_idempotent() {
        let mut world = OrbitWorld::new(3);
        let home = world.bodies[0].clone();
        world.ship.landed = true;
        world.ship.landed_on = Some(home.id);
        world.ship.pos = home.pos + Vec2::new(home.radius + world.tuning.land_pad, 0.0);
        world.ship.vel = Vec2::ZERO;
        let rest_pos = world.ship.pos;

        for _ in 0..60 {
            step(&mut world, &OrbitInput::default(), DT);
            assert_eq!(world.ship.pos, rest_pos);
            assert_eq!(world.ship.vel, Vec2::ZERO);
            assert!(world.ship.landed);
        }
    }

    #[test]
    fn test_launch_unlands_along_normal() {
        let mut world = OrbitWorld::new(3);
        let home = world.bodies[0].clone();
        world.ship.landed = true;
        world.ship.landed_on = Some(home.id);
        world.ship.pos = home.pos + Vec2::new(home.radius + world.tuning.land_pad, 0.0);
        world.ship.vel = Vec2::ZERO;
        world.ship.fuel = 1.0;

        step(&mut world, &hold_thrust(), DT);

        assert!(!world.ship.landed);
        assert_eq!(world.ship.landed_on, None);
        assert!(world.ship.vel.x > 0.0, "launch should push outward");
        assert!(world.ship.fuel < 1.0);
        assert!(world.events.contains(&OrbitEvent::Launched));
    }

    #[test]
    fn test_star_collects_exactly_once() {
        let mut world = OrbitWorld::new(3);
        // Push the rest of the field out of pickup range
        for star in world.stars.iter_mut().skip(1) {
            star.pos += Vec2::new(100_000.0, 0.0);
        }
        world.stars[0].pos = world.ship.pos;

        step(&mut world, &OrbitInput::default(), DT);
        assert!(!world.stars[0].alive);
        assert!(world.events.contains(&OrbitEvent::StarCollected));
        assert_eq!(world.stars_collected(), 1);

        // Park the ship on the dead star again: no second collection
        world.ship.pos = world.stars[0].pos;
        step(&mut world, &OrbitInput::default(), DT);
        assert!(!world.events.contains(&OrbitEvent::StarCollected));
        assert_eq!(world.stars_collected(), 1);
    }

    #[test]
    fn test_empty_tank_gives_no_thrust() {
        let tuning = OrbitTuning {
            drag: 0.0,
            ..OrbitTuning::default()
        };
        let mut world = OrbitWorld::with_tuning(3, tuning);
        world.bodies.clear(); // isolate thrust from gravity
        world.ship.fuel = 0.0;
        let vel_before = world.ship.vel;

        step(&mut world, &hold_thrust(), DT);

        assert_eq!(world.ship.vel, vel_before);
        assert!(world.ship.fuel > 0.0, "tank regenerates while not burning");
    }

    #[test]
    fn test_drifting_too_far_ends_the_run() {
        let mut world = OrbitWorld::new(3);
        let limit = world.tuning.rescue_distance * world.tuning.lost_factor;
        world.ship.pos = Vec2::new(limit + 5000.0, 0.0);
        world.ship.vel = Vec2::ZERO;

        step(&mut world, &OrbitInput::default(), DT);

        assert!(!world.running);
        assert!(world.events.contains(&OrbitEvent::RunEnded));

        // A finished run no longer advances
        let pos = world.ship.pos;
        step(&mut world, &hold_thrust(), DT);
        assert_eq!(world.ship.pos, pos);
    }

    #[test]
    fn test_rescue_pulls_back_before_the_limit() {
        let mut world = OrbitWorld::new(3);
        // Past the rescue line but short of the lost line for every body,
        // including the off-center ones
        world.ship.pos = Vec2::new(9_500.0, 0.0);
        world.ship.vel = Vec2::ZERO;
        world.score = 100.0;

        step(&mut world, &OrbitInput::default(), DT);

        assert!(world.running);
        assert!(world.ship.vel.x < 0.0, "rescue should pull toward the bodies");
        assert!(world.score < 100.0 + world.tuning.time_score * DT);
    }

    #[test]
    fn test_steps_are_deterministic() {
        let mut a = OrbitWorld::new(555);
        let mut b = OrbitWorld::new(555);
        let inputs = [
            OrbitInput::default(),
            hold_thrust(),
            OrbitInput {
                thrust: true,
                turn_left: true,
                ..Default::default()
            },
            OrbitInput {
                brake: true,
                thrust: true,
                ..Default::default()
            },
        ];
        for _ in 0..200 {
            for input in &inputs {
                step(&mut a, input, DT);
                step(&mut b, input, DT);
            }
        }
        assert_eq!(a.ship.pos, b.ship.pos);
        assert_eq!(a.ship.vel, b.ship.vel);
        assert_eq!(a.ship.fuel, b.ship.fuel);
        assert_eq!(a.score, b.score);
    }

    proptest! {
        #[test]
        fn prop_gravity_is_finite_and_bounded(
            seed in any::<u32>(),
            x in -20_000.0f32..20_000.0,
            y in -20_000.0f32..20_000.0,
        ) {
            let world = OrbitWorld::new(seed);
            let accel = gravity_accel(&world.bodies, Vec2::new(x, y), &world.tuning);
            prop_assert!(accel.is_finite());
            let soft2 = world.tuning.softening * world.tuning.softening;
            let bound: f32 = world
                .bodies
                .iter()
                .map(|b| world.tuning.gravity * b.mass / soft2)
                .sum();
            prop_assert!(accel.length() <= bound * 1.001);
        }

        #[test]
        fn prop_fuel_and_speed_stay_clamped(
            seed in any::<u32>(),
            inputs in proptest::collection::vec(
                (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()),
                1..60,
            ),
            dt in 0.0f32..0.1,
        ) {
            let mut world = OrbitWorld::new(seed);
            for (thrust, turn_left, turn_right, brake) in inputs {
                let input = OrbitInput { thrust, turn_left, turn_right, brake };
                step(&mut world, &input, dt);
                prop_assert!((0.0..=1.0).contains(&world.ship.fuel));
                prop_assert!(world.ship.vel.length() <= world.tuning.max_speed * 1.0001);
            }
        }
    }
}
