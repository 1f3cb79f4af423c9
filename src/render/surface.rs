//! Device-pixel-ratio aware canvas surface

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Canvas + 2D context sized in CSS pixels with the backing store scaled by
/// the device pixel ratio (capped at 2 to bound fill cost)
pub struct Surface {
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    /// Logical width in CSS pixels
    pub width: f32,
    /// Logical height in CSS pixels
    pub height: f32,
    pub dpr: f64,
}

impl Surface {
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        let mut surface = Self {
            canvas,
            ctx,
            width: 0.0,
            height: 0.0,
            dpr: 1.0,
        };
        surface.resize();
        Some(surface)
    }

    /// Re-read the element size and device pixel ratio, resizing the backing
    /// store to match. Returns true when the logical size changed.
    pub fn resize(&mut self) -> bool {
        let Some(window) = web_sys::window() else {
            return false;
        };
        let dpr = window.device_pixel_ratio().clamp(1.0, 2.0);
        let rect = self.canvas.get_bounding_client_rect();
        let width = (rect.width().floor() as f32).max(320.0);
        let height = (rect.height().floor() as f32).max(200.0);

        let changed = width != self.width || height != self.height || dpr != self.dpr;
        if changed {
            self.width = width;
            self.height = height;
            self.dpr = dpr;
            self.canvas.set_width((f64::from(width) * dpr) as u32);
            self.canvas.set_height((f64::from(height) * dpr) as u32);
        }
        // setTransform instead of scale: resizing resets the context state
        let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
        changed
    }

    /// Filled circle helper
    pub fn fill_circle(&self, x: f32, y: f32, radius: f32, color: &str) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(color);
        ctx.begin_path();
        let _ = ctx.arc(
            f64::from(x),
            f64::from(y),
            f64::from(radius.max(0.0)),
            0.0,
            std::f64::consts::TAU,
        );
        ctx.fill();
    }

    /// Trace a rounded-rectangle path (caller fills or strokes)
    pub fn round_rect_path(&self, x: f32, y: f32, w: f32, h: f32, r: f32) {
        let ctx = &self.ctx;
        let rr = f64::from(r.min(w / 2.0).min(h / 2.0));
        let (x, y, w, h) = (f64::from(x), f64::from(y), f64::from(w), f64::from(h));
        ctx.begin_path();
        ctx.move_to(x + rr, y);
        let _ = ctx.arc_to(x + w, y, x + w, y + h, rr);
        let _ = ctx.arc_to(x + w, y + h, x, y + h, rr);
        let _ = ctx.arc_to(x, y + h, x, y, rr);
        let _ = ctx.arc_to(x, y, x + w, y, rr);
        ctx.close_path();
    }

    /// Horizontal meter (fuel bars)
    pub fn meter(&self, x: f32, y: f32, w: f32, h: f32, fill: f32, color: &str) {
        self.ctx.set_fill_style_str("rgba(255,255,255,.12)");
        self.round_rect_path(x, y, w, h, 6.0);
        self.ctx.fill();
        self.ctx.set_fill_style_str(color);
        self.round_rect_path(x, y, w * fill.clamp(0.0, 1.0), h, 6.0);
        self.ctx.fill();
    }

    /// Small monospace HUD line
    pub fn hud_text(&self, text: &str, x: f32, y: f32, color: &str) {
        let ctx = &self.ctx;
        ctx.set_font("12px ui-monospace, SFMono-Regular, Menlo, monospace");
        ctx.set_fill_style_str(color);
        let _ = ctx.fill_text(text, f64::from(x), f64::from(y));
    }
}
