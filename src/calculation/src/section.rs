/// Blade-element-momentum update for a single radial station.
///
/// A [`BladeSection`] carries the evolving induction factors, chord and twist
/// of one station. [`SectionSolver::step`] computes the next estimate from the
/// current one without touching the section; the caller decides when to
/// apply it. No tip-loss or hub-loss correction is applied.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::constants::{model_params::InitialGuess, RotorConstants};
use crate::error::{BladeError, Result};
use crate::polar::PolarSurface;

/// One radial station of the blade.
#[derive(Debug, Clone, PartialEq)]
pub struct BladeSection {
    /// Station radius (m), fixed at creation
    pub radius: f64,
    /// Axial induction factor
    pub a: f64,
    /// Angular induction factor
    pub a1: f64,
    /// Chord (m)
    pub chord: f64,
    /// Twist angle (rad), zero until the first update
    pub twist: f64,
    /// Diagnostics of the most recent update
    pub last_step: Option<SectionStep>,
}

impl BladeSection {
    /// Station at `radius` seeded with the first-guess values.
    pub fn new(radius: f64, guess: &InitialGuess) -> Self {
        Self {
            radius,
            a: guess.a0,
            a1: guess.a1_0,
            chord: guess.chord0,
            twist: 0.0,
            last_step: None,
        }
    }

    /// Section carrying the result of `step`.
    pub fn advanced(&self, step: SectionStep) -> Self {
        Self {
            radius: self.radius,
            a: step.a,
            a1: step.a1,
            chord: step.chord,
            twist: step.twist,
            last_step: Some(step),
        }
    }

    /// Incremental power coefficient of the last update (0 before any).
    pub fn delta_cp(&self) -> f64 {
        self.last_step.map_or(0.0, |s| s.delta_cp)
    }
}

/// Result of one BEM update at one station.
///
/// `a`, `a1`, `chord`, `delta_cp` and `twist` are the new state; the rest are
/// intermediates kept for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionStep {
    pub w: f64,        // Relative wind speed (m/s)
    pub phi: f64,      // Inflow angle (rad)
    pub re: f64,       // Reynolds number after the floor clamp
    pub alpha: f64,    // Best angle of attack (deg)
    pub cl: f64,
    pub cd: f64,
    pub cx: f64,       // Tangential force coefficient
    pub cy: f64,       // Normal force coefficient
    pub a: f64,
    pub a1: f64,
    pub chord: f64,    // (m)
    pub delta_cp: f64,
    pub twist: f64,    // (rad)
}

/// Ideal chord of an optimum rotor with wake rotation.
///
/// c = 8πR / (9 B λ cl) / sqrt(4/9 + λ²x² (1 + 2 / (9 λ²x²))²), x = r / R
pub fn ideal_chord(radius: f64, rotor_radius: f64, blade_count: u32, tip_speed_ratio: f64, cl: f64) -> f64 {
    let x = radius / rotor_radius;
    let lx2 = tip_speed_ratio.powi(2) * x * x;
    let root = (4.0 / 9.0 + lx2 * (1.0 + 2.0 / (9.0 * lx2)).powi(2)).sqrt();
    (8.0 * PI * rotor_radius) / (9.0 * blade_count as f64 * tip_speed_ratio * cl) / root
}

/// Per-station BEM update bound to a polar surface and a rotor definition.
#[derive(Debug, Clone, Copy)]
pub struct SectionSolver<'a> {
    polar: &'a PolarSurface,
    constants: &'a RotorConstants,
}

impl<'a> SectionSolver<'a> {
    pub fn new(polar: &'a PolarSurface, constants: &'a RotorConstants) -> Self {
        Self { polar, constants }
    }

    /// Compute the next estimate for `section`. `station` only labels errors.
    pub fn step(&self, station: usize, section: &BladeSection) -> Result<SectionStep> {
        let c = self.constants;
        let params = &c.solver;
        let domain = |reason: &str| BladeError::Domain {
            station,
            reason: reason.to_string(),
        };

        let u = c.wind_speed;
        let omega = c.omega();
        let b = c.blade_count as f64;
        let r = section.radius;

        // --- 1. Inflow ---
        let axial = u * (1.0 - section.a);
        let tangential = omega * r * (1.0 + section.a1);
        let w = axial.hypot(tangential);
        let phi = axial.atan2(tangential);

        // Polar data is undefined below the floor
        let re = (w * section.chord / c.kinematic_viscosity).max(params.re_floor);

        // --- 2. Most efficient operating point ---
        let best = self
            .polar
            .best_alpha(re, params.alpha_min, params.alpha_max, params.resolution)?;
        if !(best.cl > 0.0) {
            return Err(domain("lift coefficient at best alpha is not positive"));
        }

        let chord = ideal_chord(r, c.max_radius, c.blade_count, c.tip_speed_ratio, best.cl);

        // --- 3. Force coefficients ---
        let (sin_phi, cos_phi) = phi.sin_cos();
        let cy = best.cl * cos_phi + best.cd * sin_phi;
        let cx = best.cl * sin_phi - best.cd * cos_phi;

        // --- 4. Induction factors ---
        if sin_phi.abs() < f64::EPSILON {
            return Err(domain("inflow angle is degenerate (sin phi = 0)"));
        }
        let sigma = b * chord / (2.0 * PI * r);
        let s2 = 4.0 * sin_phi * sin_phi;
        let bq = (sigma / s2) * (cy * cy - sigma * cx * cx / s2);
        let a = bq / (bq + 1.0);
        if !a.is_finite() {
            return Err(domain("axial induction diverges (B = -1)"));
        }

        if cos_phi.abs() < f64::EPSILON {
            return Err(domain("inflow is purely axial (cos phi = 0)"));
        }
        let f = b * chord * cx / (2.0 * PI * r * 4.0 * sin_phi * cos_phi);
        if !f.is_finite() || (1.0 - f).abs() < f64::EPSILON {
            return Err(domain("angular induction diverges (F = 1)"));
        }
        let a1 = f / (1.0 - f);

        // --- 5. Power contribution of the radial slice ---
        let dr = c.radial_step();
        let rho = c.air_density;
        let induced = 4.0 * PI * rho * u * omega.powi(2) * r * a1 * (1.0 - a) * r.powi(2) * dr;
        let profile = 0.5 * rho * w.powi(2) * best.cd * cos_phi * chord * b * omega * r * dr;
        let delta_cp = (induced - profile) / c.wind_power();

        let twist = phi - best.alpha.to_radians();

        log::trace!(
            "station {} r={:.4} w={:.2} phi={:.2}deg Re={:.0} alpha={:.2} c={:.4} a={:.3} a1={:.4} dCp={:.4}",
            station,
            r,
            w,
            phi.to_degrees(),
            re,
            best.alpha,
            chord,
            a,
            a1,
            delta_cp
        );

        Ok(SectionStep {
            w,
            phi,
            re,
            alpha: best.alpha,
            cl: best.cl,
            cd: best.cd,
            cx,
            cy,
            a,
            a1,
            chord,
            delta_cp,
            twist,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::synthetic_polar;
    use approx::assert_relative_eq;

    #[test]
    fn test_ideal_chord_tip_and_root() {
        // x = 1, lambda = 6: sqrt(4/9 + 36 (1 + 2/324)²)
        let root = (4.0 / 9.0 + 36.0 * (1.0 + 2.0 / 324.0_f64).powi(2)).sqrt();
        let expected = 8.0 * PI * 0.2 / (9.0 * 3.0 * 6.0 * 0.5) / root;
        assert_relative_eq!(ideal_chord(0.2, 0.2, 3, 6.0, 0.5), expected, epsilon = 1e-15);

        // Chord shrinks towards the tip
        assert!(ideal_chord(0.05, 0.2, 3, 6.0, 0.5) > ideal_chord(0.2, 0.2, 3, 6.0, 0.5));
    }

    #[test]
    fn test_step_root_station() {
        let polar = synthetic_polar();
        let constants = RotorConstants::small_s822();
        let solver = SectionSolver::new(&polar, &constants);
        let section = BladeSection::new(0.05, &constants.initial);

        let s = solver.step(0, &section).unwrap();

        assert_relative_eq!(s.w, 9.849670248287504, epsilon = 1e-9);
        assert_relative_eq!(s.phi, 0.4184098812841754, epsilon = 1e-9);
        assert_eq!(s.re, 50000.0);
        assert_relative_eq!(s.alpha, 4.0606060606060606, epsilon = 1e-9);
        assert_relative_eq!(s.cl, 0.5060606060606061, epsilon = 1e-9);
        assert_relative_eq!(s.cd, 0.02195981044231738, epsilon = 1e-9);
        assert_relative_eq!(s.chord, 0.0344866711343747, epsilon = 1e-9);
        assert_relative_eq!(s.cx, 0.1855510088565092, epsilon = 1e-9);
        assert_relative_eq!(s.cy, 0.47132832865574936, epsilon = 1e-9);
        assert_relative_eq!(s.a, 0.0927454607855163, epsilon = 1e-9);
        assert_relative_eq!(s.a1, 0.04291392534760163, epsilon = 1e-9);
        assert_relative_eq!(s.delta_cp, 0.013487200732150246, epsilon = 1e-9);
        assert_relative_eq!(s.twist, 0.3475389359001632, epsilon = 1e-9);
    }

    #[test]
    fn test_step_tip_station() {
        let polar = synthetic_polar();
        let constants = RotorConstants::small_s822();
        let solver = SectionSolver::new(&polar, &constants);
        let section = BladeSection::new(0.2, &constants.initial);

        let s = solver.step(8, &section).unwrap();

        assert_relative_eq!(s.w, 36.22176147014388, epsilon = 1e-9);
        assert_relative_eq!(s.chord, 0.010094770450278208, epsilon = 1e-9);
        assert_relative_eq!(s.a, 0.11172604049971696, epsilon = 1e-9);
        assert_relative_eq!(s.a1, 0.0018737547990129385, epsilon = 1e-9);
        assert_relative_eq!(s.delta_cp, 0.020776493850578618, epsilon = 1e-9);
        assert_relative_eq!(s.twist, 0.039841153503988674, epsilon = 1e-9);
    }

    #[test]
    fn test_step_is_pure() {
        let polar = synthetic_polar();
        let constants = RotorConstants::small_s822();
        let solver = SectionSolver::new(&polar, &constants);
        let section = BladeSection::new(0.1, &constants.initial);
        let before = section.clone();

        let first = solver.step(2, &section).unwrap();
        let second = solver.step(2, &section).unwrap();

        assert_eq!(section, before);
        assert_eq!(first, second);
    }

    #[test]
    fn test_step_degenerate_inflow() {
        let polar = synthetic_polar();
        let constants = RotorConstants::small_s822();
        let solver = SectionSolver::new(&polar, &constants);

        // U (1 - a) = 0 puts the inflow angle at exactly zero
        let mut section = BladeSection::new(0.1, &constants.initial);
        section.a = 1.0;

        match solver.step(3, &section) {
            Err(BladeError::Domain { station, .. }) => assert_eq!(station, 3),
            other => panic!("expected domain error, got {:?}", other),
        }
    }

    #[test]
    fn test_step_purely_axial_inflow() {
        let polar = synthetic_polar();
        let constants = RotorConstants::small_s822();
        let solver = SectionSolver::new(&polar, &constants);

        // Omega r (1 + a1) = 0 puts the inflow angle at pi/2, where cos phi is
        // only rounding noise
        let mut section = BladeSection::new(0.1, &constants.initial);
        section.a1 = -1.0;

        match solver.step(5, &section) {
            Err(BladeError::Domain { station, reason }) => {
                assert_eq!(station, 5);
                assert!(reason.contains("cos phi"));
            }
            other => panic!("expected domain error, got {:?}", other),
        }
    }

    #[test]
    fn test_step_clamps_reynolds_floor() {
        let polar = synthetic_polar();
        let constants = RotorConstants::small_s822();
        let solver = SectionSolver::new(&polar, &constants);
        let mut section = BladeSection::new(0.1, &constants.initial);
        section.chord = 1e-4;

        let s = solver.step(0, &section).unwrap();
        assert_eq!(s.re, constants.solver.re_floor);
    }

    #[test]
    fn test_advanced_applies_step() {
        let polar = synthetic_polar();
        let constants = RotorConstants::small_s822();
        let solver = SectionSolver::new(&polar, &constants);
        let section = BladeSection::new(0.125, &constants.initial);

        let step = solver.step(4, &section).unwrap();
        let next = section.advanced(step);

        assert_eq!(next.radius, 0.125);
        assert_eq!(next.chord, step.chord);
        assert_eq!(next.twist, step.twist);
        assert_eq!(next.delta_cp(), step.delta_cp);
        assert_eq!(section.delta_cp(), 0.0);
    }
}
