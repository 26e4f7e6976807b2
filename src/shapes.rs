//! Drifting outline polygons for the page background.

use std::f64::consts::{PI, TAU};

use crate::config::{BackgroundConfig, Rgb};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub x: f64,
    pub y: f64,
    /// Circumradius.
    pub size: f64,
    pub sides: u32,
    pub vx: f64,
    pub vy: f64,
    pub angle: f64,
    pub rotation: f64,
    pub alpha: f64,
}

impl Shape {
    /// `rng` yields uniform samples in `[0, 1)`.
    pub fn random(bounds: Bounds, cfg: &BackgroundConfig, rng: &mut impl FnMut() -> f64) -> Self {
        // rng() can't reach 1.0, so the floor stays below side_variants
        let extra_sides = (rng() * cfg.side_variants as f64).floor() as u32;
        Self {
            x: rng() * bounds.width,
            y: rng() * bounds.height,
            size: cfg.min_size + rng() * cfg.size_span,
            sides: cfg.min_sides + extra_sides.min(cfg.side_variants.saturating_sub(1)),
            vx: (rng() - 0.5) * cfg.max_speed,
            vy: (rng() - 0.5) * cfg.max_speed,
            angle: rng() * PI,
            rotation: (rng() - 0.5) * cfg.max_spin,
            alpha: cfg.min_alpha + rng() * cfg.alpha_span,
        }
    }

    /// Advance one frame, wrapping to the far edge once a shape drifts more
    /// than `margin` outside `bounds`.
    pub fn step(&mut self, bounds: Bounds, margin: f64) {
        self.x += self.vx;
        self.y += self.vy;
        self.angle += self.rotation;

        self.x = wrap(self.x, bounds.width, margin);
        self.y = wrap(self.y, bounds.height, margin);
    }

    /// Vertices in shape-local coordinates (unrotated, centred on the
    /// origin). The first vertex is repeated at the end to close the path.
    pub fn outline(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        let n = self.sides;
        (0..=n).map(move |i| {
            let a = i as f64 / n as f64 * TAU;
            (a.cos() * self.size, a.sin() * self.size)
        })
    }

    pub fn stroke_style(&self, color: Rgb) -> String {
        let Rgb(r, g, b) = color;
        format!("rgba({r},{g},{b},{})", self.alpha)
    }
}

fn wrap(v: f64, extent: f64, margin: f64) -> f64 {
    if v < -margin {
        extent + margin
    } else if v > extent + margin {
        -margin
    } else {
        v
    }
}

/// Fixed pool of shapes. Shapes are never respawned; they recycle by
/// wrapping around the viewport.
#[derive(Debug)]
pub struct ShapeField {
    shapes: Vec<Shape>,
    bounds: Bounds,
    margin: f64,
}

impl ShapeField {
    pub fn new(cfg: &BackgroundConfig, bounds: Bounds, mut rng: impl FnMut() -> f64) -> Self {
        let shapes = (0..cfg.shape_count)
            .map(|_| Shape::random(bounds, cfg, &mut rng))
            .collect();
        Self {
            shapes,
            bounds,
            margin: cfg.margin,
        }
    }

    pub fn step(&mut self) {
        for shape in &mut self.shapes {
            shape.step(self.bounds, self.margin);
        }
    }

    /// Takes new viewport bounds. Shapes keep their simulated positions;
    /// any now outside the margin wrap on the next step.
    pub fn resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }
}
