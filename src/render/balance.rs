//! Balance the Rocket draw pass

use crate::sim::balance::BalanceWorld;

use super::background::Starfield;
use super::surface::Surface;

/// Vertical offset of the rocket's midpoint below screen center
const ROCKET_DROP: f32 = 34.0;

pub fn draw(
    surface: &Surface,
    bg: &Starfield,
    world: &BalanceWorld,
    left_on: bool,
    right_on: bool,
) {
    let ctx = &surface.ctx;
    let (w, h) = (surface.width, surface.height);

    bg.draw(surface, world.time, -world.offset * 0.18, -world.angle * 18.0);

    // Guide rails
    ctx.set_stroke_style_str("rgba(96,165,250,.10)");
    ctx.set_line_width(2.0);
    ctx.begin_path();
    ctx.move_to(f64::from(w) * 0.33, 0.0);
    ctx.line_to(f64::from(w) * 0.33, f64::from(h));
    ctx.move_to(f64::from(w) * 0.66, 0.0);
    ctx.line_to(f64::from(w) * 0.66, f64::from(h));
    ctx.stroke();

    draw_hud(surface, world);

    let rocket_x = w / 2.0 + world.offset;
    let rocket_y = h / 2.0 + ROCKET_DROP;

    // Thruster exhaust, additive, in rocket-local space
    ctx.set_global_composite_operation("lighter").ok();
    ctx.save();
    let _ = ctx.translate(f64::from(w / 2.0), f64::from(rocket_y));
    for p in &world.particles {
        ctx.set_global_alpha(f64::from((p.life / 0.45).clamp(0.0, 1.0) * 0.85));
        surface.fill_circle(p.pos.x, p.pos.y, p.radius, "rgba(96,165,250,.65)");
    }
    ctx.restore();
    ctx.set_global_composite_operation("source-over").ok();
    ctx.set_global_alpha(1.0);

    draw_rocket(surface, world, rocket_x, rocket_y, left_on, right_on);

    // Tilt warning strip
    let danger = (world.angle.abs() / world.max_angle()).min(1.0);
    if world.running && danger > 0.6 {
        ctx.set_fill_style_str(&format!(
            "rgba(251,113,133,{:.3})",
            (danger - 0.6) / 0.4 * 0.8
        ));
        ctx.fill_rect(0.0, 0.0, f64::from(w), 4.0);
    }
}

fn draw_rocket(
    surface: &Surface,
    world: &BalanceWorld,
    x: f32,
    y: f32,
    left_on: bool,
    right_on: bool,
) {
    let ctx = &surface.ctx;
    let fueled = world.fuel > 0.01;

    ctx.save();
    let _ = ctx.translate(f64::from(x), f64::from(y));
    let _ = ctx.rotate(f64::from(world.angle));

    // Capsule
    ctx.set_fill_style_str("rgba(229,231,235,.92)");
    surface.round_rect_path(-16.0, -52.0, 32.0, 92.0, 14.0);
    ctx.fill();

    // Nose cone
    ctx.set_fill_style_str("rgba(255,255,255,.94)");
    ctx.begin_path();
    ctx.move_to(-14.0, -52.0);
    let _ = ctx.quadratic_curve_to(0.0, -78.0, 14.0, -52.0);
    ctx.close_path();
    ctx.fill();

    // Window
    surface.fill_circle(0.0, -14.0, 8.2, "rgba(59,130,246,.35)");

    // Fins
    ctx.set_fill_style_str("rgba(251,113,133,.85)");
    ctx.begin_path();
    ctx.move_to(-16.0, 22.0);
    ctx.line_to(-30.0, 34.0);
    ctx.line_to(-16.0, 38.0);
    ctx.close_path();
    ctx.fill();
    ctx.begin_path();
    ctx.move_to(16.0, 22.0);
    ctx.line_to(30.0, 34.0);
    ctx.line_to(16.0, 38.0);
    ctx.close_path();
    ctx.fill();

    // Engine block and nozzles
    ctx.set_fill_style_str("rgba(148,163,184,.85)");
    surface.round_rect_path(-12.0, 34.0, 24.0, 10.0, 6.0);
    ctx.fill();
    ctx.set_fill_style_str("rgba(15,23,42,.75)");
    surface.round_rect_path(-16.0, 40.0, 10.0, 10.0, 5.0);
    ctx.fill();
    surface.round_rect_path(6.0, 40.0, 10.0, 10.0, 5.0);
    ctx.fill();

    if left_on && fueled {
        flame(surface, -11.0);
    }
    if right_on && fueled {
        flame(surface, 11.0);
    }

    ctx.restore();
}

fn flame(surface: &Surface, x: f64) {
    let ctx = &surface.ctx;
    ctx.set_fill_style_str("rgba(96,165,250,.70)");
    ctx.begin_path();
    ctx.move_to(x - 6.0, 46.0);
    let _ = ctx.quadratic_curve_to(x, 68.0, x + 6.0, 46.0);
    ctx.close_path();
    ctx.fill();
}

fn draw_hud(surface: &Surface, world: &BalanceWorld) {
    let ctx = &surface.ctx;
    let w = surface.width;

    surface.hud_text(
        &format!(
            "time {:.1}s    score {}    checks {}/{}",
            world.time, world.score as u64, world.checks_passed, world.checks_done
        ),
        16.0,
        22.0,
        "rgba(255,255,255,.85)",
    );

    let amp = world.wind_amplitude().max(1e-6);
    let wind_pct = ((world.wind / amp).clamp(-1.0, 1.0) * 100.0).round();
    surface.hud_text(&format!("wind {wind_pct}%"), 16.0, 42.0, "rgba(255,255,255,.60)");

    surface.meter(16.0, 54.0, 220.0, 10.0, world.fuel, "rgba(52,211,153,.55)");
    surface.hud_text("fuel", 246.0, 63.0, "rgba(255,255,255,.45)");

    // Stability check banner with progress bar and safe-zone markers
    if world.check_active {
        let progress = (world.check_elapsed / world.tuning.check_len).clamp(0.0, 1.0);
        ctx.set_fill_style_str("rgba(0,0,0,.35)");
        surface.round_rect_path(w / 2.0 - 110.0, 70.0, 220.0, 28.0, 12.0);
        ctx.fill();
        surface.hud_text("STABILITY CHECK", w / 2.0 - 48.0, 89.0, "rgba(255,255,255,.85)");
        ctx.set_fill_style_str("rgba(255,255,255,.14)");
        surface.round_rect_path(w / 2.0 - 80.0, 98.0, 160.0, 6.0, 4.0);
        ctx.fill();
        ctx.set_fill_style_str("rgba(96,165,250,.65)");
        surface.round_rect_path(w / 2.0 - 80.0, 98.0, 160.0 * progress, 6.0, 4.0);
        ctx.fill();

        let bound = world.tuning.check_tight_frac * w;
        ctx.set_stroke_style_str("rgba(52,211,153,.18)");
        ctx.set_line_width(2.0);
        ctx.stroke_rect(
            f64::from(w / 2.0 - bound),
            0.0,
            f64::from(2.0 * bound),
            f64::from(surface.height),
        );
    }
}
