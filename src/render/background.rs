//! Shared parallax starfield backdrop
//!
//! Regenerated on resize from a size-derived seed so the speckle pattern is
//! stable for a given canvas size. Purely cosmetic.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::surface::Surface;

struct BgStar {
    x: f32,
    y: f32,
    /// Parallax depth (0 = far, 1 = near)
    z: f32,
    /// Twinkle phase
    tw: f32,
    size: f32,
}

struct Nebula {
    x: f32,
    y: f32,
    radius: f32,
    color: &'static str,
}

const NEBULA_COLORS: [&str; 3] = [
    "rgba(96,165,250,.10)",
    "rgba(52,211,153,.08)",
    "rgba(168,85,247,.08)",
];

/// Background star density: one star per this many square pixels
const STAR_AREA: f32 = 4200.0;

pub struct Starfield {
    stars: Vec<BgStar>,
    nebulas: Vec<Nebula>,
    width: f32,
    height: f32,
}

impl Starfield {
    pub fn new(width: f32, height: f32) -> Self {
        let mut field = Self {
            stars: Vec::new(),
            nebulas: Vec::new(),
            width: 0.0,
            height: 0.0,
        };
        field.regenerate(width, height);
        field
    }

    /// Rebuild the speckle for a new canvas size
    pub fn regenerate(&mut self, width: f32, height: f32) {
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;

        let seed = 9001 + width as u64 * 3 + height as u64 * 5;
        let mut rng = Pcg32::seed_from_u64(seed);

        self.stars.clear();
        let count = (width * height / STAR_AREA) as usize;
        for _ in 0..count {
            self.stars.push(BgStar {
                x: rng.random::<f32>() * width,
                y: rng.random::<f32>() * height,
                z: 0.2 + rng.random::<f32>() * 0.8,
                tw: rng.random::<f32>() * std::f32::consts::TAU,
                size: 0.6 + rng.random::<f32>() * 1.8,
            });
        }

        self.nebulas.clear();
        for (i, color) in NEBULA_COLORS.iter().enumerate() {
            self.nebulas.push(Nebula {
                x: width * (0.25 + 0.27 * i as f32),
                y: height * (0.20 + 0.30 * ((i as f32 * 0.7).sin().abs())),
                radius: width.min(height) * (0.55 + 0.1 * i as f32),
                color,
            });
        }
    }

    /// Paint the gradient, nebulas, and twinkling stars.
    /// `parallax` shifts the stars against camera/rocket motion.
    pub fn draw(&self, surface: &Surface, t: f32, parallax_x: f32, parallax_y: f32) {
        let ctx = &surface.ctx;
        let (w, h) = (self.width, self.height);

        ctx.set_fill_style_str("#070a12");
        ctx.fill_rect(0.0, 0.0, f64::from(w), f64::from(h));

        for n in &self.nebulas {
            let x = f64::from(n.x + (t * 0.12).sin() * 18.0);
            let y = f64::from(n.y + (t * 0.10).cos() * 14.0);
            if let Ok(gradient) =
                ctx.create_radial_gradient(x, y, 0.0, x, y, f64::from(n.radius))
            {
                let _ = gradient.add_color_stop(0.0, n.color);
                let _ = gradient.add_color_stop(1.0, "rgba(0,0,0,0)");
                ctx.set_fill_style_canvas_gradient(&gradient);
                ctx.fill_rect(0.0, 0.0, f64::from(w), f64::from(h));
            }
        }

        for s in &self.stars {
            let tw = 0.6 + 0.4 * (s.tw + t * 0.9).sin();
            let x = (s.x - parallax_x * s.z + t * 10.0 * s.z).rem_euclid(w);
            let y = (s.y - parallax_y * s.z + t * 3.0 * s.z).rem_euclid(h);
            ctx.set_fill_style_str(&format!("rgba(255,255,255,{:.3})", 0.55 * tw));
            ctx.fill_rect(
                f64::from(x),
                f64::from(y),
                f64::from(s.size),
                f64::from(s.size),
            );
        }
    }
}
