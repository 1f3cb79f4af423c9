//! Orbit Hop draw pass

use std::f64::consts::TAU;

use crate::sim::orbit::OrbitWorld;

use super::background::Starfield;
use super::surface::Surface;

/// Body fill / atmosphere ring colors by palette slot
const BODY_COLORS: [(&str, &str); 3] = [
    ("#1f3b5f", "#2b6cb0"),
    ("#224f3f", "#34d399"),
    ("#4a2b52", "#a855f7"),
];

pub fn draw(surface: &Surface, bg: &Starfield, world: &OrbitWorld, thrusting: bool) {
    let ctx = &surface.ctx;
    let (w, h) = (surface.width, surface.height);

    bg.draw(
        surface,
        world.time,
        world.camera.pos.x * 0.002 * w,
        world.camera.pos.y * 0.002 * h,
    );

    // World transform: camera-centered, zoomed
    ctx.save();
    let _ = ctx.translate(f64::from(w / 2.0), f64::from(h / 2.0));
    let z = f64::from(world.camera.zoom);
    let _ = ctx.scale(z, z);
    let _ = ctx.translate(
        f64::from(-world.camera.pos.x),
        f64::from(-world.camera.pos.y),
    );

    for body in &world.bodies {
        let (fill, ring) = BODY_COLORS[body.hue as usize % BODY_COLORS.len()];
        surface.fill_circle(body.pos.x, body.pos.y, body.radius, fill);

        // Atmosphere band
        ctx.set_stroke_style_str("rgba(251,113,133,.20)");
        ctx.set_line_width(12.0);
        ctx.begin_path();
        let _ = ctx.arc(
            f64::from(body.pos.x),
            f64::from(body.pos.y),
            f64::from(body.radius * world.tuning.atmo_band),
            0.0,
            TAU,
        );
        ctx.stroke();

        // Orbit hint ring
        ctx.set_stroke_style_str(ring);
        ctx.set_global_alpha(0.12);
        ctx.set_line_width(2.0);
        ctx.begin_path();
        let _ = ctx.arc(
            f64::from(body.pos.x),
            f64::from(body.pos.y),
            f64::from(body.radius * 2.4),
            0.0,
            TAU,
        );
        ctx.stroke();
        ctx.set_global_alpha(1.0);

        surface.hud_text(
            &body.id.label().to_string(),
            body.pos.x - 4.0,
            body.pos.y + 4.0,
            "rgba(255,255,255,.75)",
        );
    }

    for star in world.stars.iter().filter(|s| s.alive) {
        draw_star(surface, star.pos.x, star.pos.y, 10.0, star.spin);
    }

    // Exhaust, additive
    ctx.set_global_composite_operation("lighter").ok();
    for p in &world.particles {
        ctx.set_global_alpha(f64::from((p.life / 0.8).clamp(0.0, 1.0) * 0.75));
        surface.fill_circle(p.pos.x, p.pos.y, p.radius, "rgba(96,165,250,.55)");
    }
    ctx.set_global_composite_operation("source-over").ok();
    ctx.set_global_alpha(1.0);

    draw_ship(surface, world, thrusting);

    ctx.restore();

    draw_hud(surface, world);
}

fn draw_star(surface: &Surface, x: f32, y: f32, radius: f32, spin: f32) {
    let ctx = &surface.ctx;
    ctx.save();
    let _ = ctx.translate(f64::from(x), f64::from(y));
    let _ = ctx.rotate(f64::from(spin));
    ctx.set_fill_style_str("rgba(52,211,153,.85)");
    ctx.begin_path();
    for i in 0..5 {
        let outer = i as f64 * TAU / 5.0;
        let inner = outer + TAU / 10.0;
        let r = f64::from(radius);
        ctx.line_to(outer.cos() * r, outer.sin() * r);
        ctx.line_to(inner.cos() * r * 0.45, inner.sin() * r * 0.45);
    }
    ctx.close_path();
    ctx.fill();
    ctx.restore();
}

fn draw_ship(surface: &Surface, world: &OrbitWorld, thrusting: bool) {
    let ctx = &surface.ctx;
    let ship = &world.ship;

    ctx.save();
    let _ = ctx.translate(f64::from(ship.pos.x), f64::from(ship.pos.y));
    let _ = ctx.rotate(f64::from(ship.heading));

    // Glow
    ctx.set_global_alpha(0.12);
    surface.fill_circle(0.0, 0.0, 18.0, "#60a5fa");
    ctx.set_global_alpha(1.0);

    // Hull
    ctx.set_fill_style_str("rgba(235,240,250,.92)");
    surface.round_rect_path(-14.0, -6.0, 28.0, 12.0, 6.0);
    ctx.fill();

    // Nose
    ctx.begin_path();
    ctx.move_to(18.0, 0.0);
    ctx.line_to(8.0, -7.0);
    ctx.line_to(8.0, 7.0);
    ctx.close_path();
    ctx.fill();

    // Fin
    ctx.set_fill_style_str("rgba(251,113,133,.85)");
    ctx.begin_path();
    ctx.move_to(-10.0, 0.0);
    ctx.line_to(-20.0, -9.0);
    ctx.line_to(-16.0, 0.0);
    ctx.close_path();
    ctx.fill();

    // Window
    surface.fill_circle(2.0, 0.0, 3.4, "rgba(96,165,250,.35)");

    if thrusting && ship.fuel > 0.01 && !ship.landed {
        ctx.set_fill_style_str("rgba(96,165,250,.70)");
        ctx.begin_path();
        ctx.move_to(-14.0, -4.0);
        let _ = ctx.quadratic_curve_to(-30.0, 0.0, -14.0, 4.0);
        ctx.close_path();
        ctx.fill();
    }

    ctx.restore();
}

fn draw_hud(surface: &Surface, world: &OrbitWorld) {
    let visited = world.visited.len();
    let total_bodies = world.bodies.len();
    let collected = world.stars_collected();
    let total_stars = world.stars.len();

    surface.hud_text(
        &format!(
            "score {}   visited {visited}/{total_bodies}   stars {collected}/{total_stars}",
            world.score as u64
        ),
        16.0,
        22.0,
        "rgba(255,255,255,.85)",
    );

    surface.meter(16.0, 34.0, 220.0, 10.0, world.ship.fuel, "rgba(96,165,250,.55)");
    surface.hud_text("fuel", 246.0, 43.0, "rgba(255,255,255,.45)");

    if let Some((body, dist)) = world.nearest_body() {
        let landed = if world.ship.landed {
            "LANDED (hold to launch)"
        } else {
            ""
        };
        surface.hud_text(
            &format!(
                "nearest {}   dist {}   {landed}",
                body.id.label(),
                dist.max(0.0) as i64
            ),
            16.0,
            54.0,
            "rgba(255,255,255,.60)",
        );
    }
}
