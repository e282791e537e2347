//! Synthetic polar and airfoil tables shared by the unit tests.

use std::f64::consts::PI;

use crate::geometry::AirfoilShape;
use crate::polar::{PolarSample, PolarSurface};
use crate::vector::Vec2;

/// Lift curve with a linear range up to 10 deg and a soft stall beyond.
fn lift(alpha: f64) -> f64 {
    if alpha <= 10.0 {
        0.1 + 0.1 * alpha
    } else {
        1.1 - 0.05 * (alpha - 10.0)
    }
}

/// Parabolic drag polar, falling with Reynolds number.
fn drag(alpha: f64, re: f64) -> f64 {
    (0.01 + 0.0004 * alpha * alpha) * (200000.0 / re).powf(0.2)
}

/// Polar table on Re {50k, 100k, 200k, 500k} x alpha {-10, -8, .., 14}.
pub(crate) fn synthetic_samples() -> Vec<PolarSample> {
    let mut samples = Vec::new();
    for &re in &[50000.0, 100000.0, 200000.0, 500000.0] {
        for k in 0..=12 {
            let alpha = -10.0 + 2.0 * k as f64;
            let cl = lift(alpha);
            let cd = drag(alpha, re);
            samples.push(PolarSample::new(re, alpha, cl, cd, cl / cd));
        }
    }
    samples
}

pub(crate) fn synthetic_polar() -> PolarSurface {
    PolarSurface::build(&synthetic_samples()).expect("synthetic polar triangulates")
}

/// Closed 61-point symmetric profile, trailing edge -> upper side -> leading
/// edge (index 30) -> lower side -> trailing edge.
pub(crate) fn symmetric_airfoil() -> AirfoilShape {
    let points = (0..61)
        .map(|i| {
            let theta = PI * i as f64 / 30.0;
            let x = 0.5 * (1.0 + theta.cos());
            let t = 0.12 * (x.sqrt() * 1.4845 - x * 0.63 - x * x * 1.758 + x.powi(3) * 1.4215 - x.powi(4) * 0.5075);
            let y = if i <= 30 { t } else { -t };
            Vec2::new(x, y)
        })
        .collect();
    AirfoilShape::new(points)
}
