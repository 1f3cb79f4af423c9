//! Cosmetic particle pool shared by the games
//!
//! Particles never affect gameplay: they are spawned from a world's cosmetic
//! RNG stream, decay, and are discarded once lifetime or radius crosses the
//! floor.

use glam::Vec2;

/// A short-lived visual particle (exhaust puff, thruster spark)
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining lifetime in seconds
    pub life: f32,
    pub radius: f32,
}

/// Soft cap per world; spawns are skipped once the pool is full
pub const MAX_PARTICLES: usize = 256;

/// Radius below which a particle is culled regardless of lifetime
const MIN_RADIUS: f32 = 0.3;

/// Advance and cull a particle pool.
///
/// `vel_decay` and `shrink` are per-second exponential decay constants for
/// velocity and radius (pass 0.0 for no decay).
pub fn step_particles(parts: &mut Vec<Particle>, dt: f32, vel_decay: f32, shrink: f32) {
    let damp = (-vel_decay * dt).exp();
    let thin = (-shrink * dt).exp();
    for p in parts.iter_mut() {
        p.life -= dt;
        p.pos += p.vel * dt;
        p.vel *= damp;
        p.radius *= thin;
    }
    parts.retain(|p| p.life > 0.0 && p.radius > MIN_RADIUS);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn puff(life: f32, radius: f32) -> Particle {
        Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(10.0, 0.0),
            life,
            radius,
        }
    }

    #[test]
    fn test_expired_particles_are_culled() {
        let mut parts = vec![puff(0.05, 2.0), puff(1.0, 2.0)];
        step_particles(&mut parts, 0.1, 2.0, 0.0);
        assert_eq!(parts.len(), 1);
        assert!(parts[0].life > 0.0);
    }

    #[test]
    fn test_shrunk_particles_are_culled() {
        let mut parts = vec![puff(10.0, 0.31)];
        // Heavy shrink drives the radius under the floor in one step
        step_particles(&mut parts, 0.5, 0.0, 6.0);
        assert!(parts.is_empty());
    }

    #[test]
    fn test_velocity_decays() {
        let mut parts = vec![puff(1.0, 2.0)];
        step_particles(&mut parts, 0.1, 5.0, 0.0);
        assert!(parts[0].vel.x < 10.0);
        assert!(parts[0].vel.x > 0.0);
    }
}
