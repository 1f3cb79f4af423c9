//! Daily Gate Run draw pass

use crate::sim::gate::GateWorld;

use super::surface::Surface;

pub fn draw(surface: &Surface, world: &GateWorld, pressed: bool, mode_label: &str) {
    let ctx = &surface.ctx;
    let (w, h) = (surface.width, surface.height);

    // Radial galaxy backdrop
    let cx = f64::from(w) * 0.75;
    let cy = f64::from(h) * 0.25;
    if let Ok(gradient) =
        ctx.create_radial_gradient(cx, cy, 40.0, cx, cy, f64::from(w.max(h)))
    {
        let _ = gradient.add_color_stop(0.0, "#0b1b2b");
        let _ = gradient.add_color_stop(0.55, "#050914");
        let _ = gradient.add_color_stop(1.0, "#03040a");
        ctx.set_fill_style_canvas_gradient(&gradient);
    } else {
        ctx.set_fill_style_str("#050914");
    }
    ctx.fill_rect(0.0, 0.0, f64::from(w), f64::from(h));

    // Seed-speckled stars, stable for the day's course
    for i in 0..120u32 {
        let x = ((i as f32 * 97.3 + (world.seed % 997) as f32) * 0.73).rem_euclid(w);
        let y = ((i as f32 * 53.7 + (world.seed % 607) as f32) * 0.91).rem_euclid(h);
        let r = if i % 9 == 0 { 1.6 } else { 1.0 };
        let alpha = 0.16 + (i % 7) as f32 * 0.03;
        surface.fill_circle(x, y, r, &format!("rgba(255,255,255,{alpha:.2})"));
    }

    let gap = world.gap();
    for gate in &world.gates {
        if gate.x > w + world.tuning.gate_width || gate.x + world.tuning.gate_width < 0.0 {
            continue;
        }
        let top = gate.center - gap / 2.0;
        let bottom = gate.center + gap / 2.0;

        ctx.set_fill_style_str("rgba(59,130,246,.12)");
        surface.round_rect_path(gate.x, 0.0, world.tuning.gate_width, top, 14.0);
        ctx.fill();
        surface.round_rect_path(gate.x, bottom, world.tuning.gate_width, h - bottom, 14.0);
        ctx.fill();

        // Glow lips on the gap edges
        ctx.set_fill_style_str("rgba(96,165,250,.22)");
        ctx.fill_rect(
            f64::from(gate.x),
            f64::from(top - 5.0),
            f64::from(world.tuning.gate_width),
            5.0,
        );
        ctx.fill_rect(
            f64::from(gate.x),
            f64::from(bottom),
            f64::from(world.tuning.gate_width),
            5.0,
        );
    }

    // Ship capsule, tilted by vertical speed
    ctx.save();
    let _ = ctx.translate(f64::from(world.tuning.player_x), f64::from(world.y));
    let tilt = (world.vy / 900.0).clamp(-0.65, 0.65);
    let _ = ctx.rotate(f64::from(tilt));

    ctx.set_fill_style_str("rgba(255,255,255,.92)");
    surface.round_rect_path(-14.0, -10.0, 28.0, 20.0, 10.0);
    ctx.fill();
    surface.fill_circle(2.0, 0.0, 6.2, "rgba(59,130,246,.22)");

    if pressed {
        ctx.set_fill_style_str("rgba(96,165,250,.68)");
        ctx.begin_path();
        ctx.move_to(-16.0, -6.0);
        let _ = ctx.quadratic_curve_to(-30.0, 0.0, -16.0, 6.0);
        ctx.close_path();
        ctx.fill();
    }
    ctx.restore();

    surface.hud_text(
        &format!("gates {}   {mode_label}", world.passed),
        16.0,
        26.0,
        "rgba(255,255,255,.60)",
    );
}
