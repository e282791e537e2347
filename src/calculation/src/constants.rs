/// Design constants and solver parameters for the blade calculation.
///
/// Everything the calculation needs is carried by an explicit, immutable
/// [`RotorConstants`] value that is handed to each stage. Presets mirror the
/// small S822 rotor the design tool was built around.

use std::collections::HashMap;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{BladeError, Result};
use crate::geometry::{ProfileSplit, ProjectionMode};

/// Operating point, rotor layout and first-guess values for the design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotorConstants {
    /// Number of blades (-)
    pub blade_count: u32,

    /// Hub radius (m)
    /// Not used by the BEM equations, only checked against `min_radius`.
    pub hub_radius: f64,

    /// Innermost working radius of the blade (m)
    pub min_radius: f64,

    /// Outermost working radius, i.e. the rotor radius (m)
    pub max_radius: f64,

    /// Number of radial stations (-)
    pub section_count: usize,

    /// Rated wind speed (m/s)
    pub wind_speed: f64,

    /// Design tip-speed ratio, Omega * R / U (-)
    pub tip_speed_ratio: f64,

    /// Air density (kg/m³)
    /// Standard value: 1.225 kg/m³ at 15°C, 1 atm
    pub air_density: f64,

    /// Kinematic viscosity of air (m²/s)
    pub kinematic_viscosity: f64,

    /// First-guess values every station starts from
    pub initial: model_params::InitialGuess,

    /// Number of BEM sweeps (no convergence test)
    pub iterations: usize,

    pub solver: model_params::SolverParams,

    pub projection: model_params::ProjectionParams,
}

impl RotorConstants {
    /// Three-bladed 0.2 m rotor on the S822 airfoil at 6 m/s, tip-speed ratio 6.
    pub fn small_s822() -> Self {
        Self {
            blade_count: 3,
            hub_radius: 0.01,
            min_radius: 0.05,
            max_radius: 0.20,
            section_count: 9,
            wind_speed: 6.0,
            tip_speed_ratio: 6.0,
            air_density: 1.225,
            kinematic_viscosity: 1.45e-5,
            initial: model_params::InitialGuess::default(),
            iterations: 10,
            solver: model_params::SolverParams::default(),
            projection: model_params::ProjectionParams::default(),
        }
    }

    /// Create constants for a custom rotor, keeping the S822 defaults for
    /// everything not given.
    pub fn custom(
        blade_count: u32,
        min_radius: f64,
        max_radius: f64,
        section_count: usize,
        wind_speed: f64,
        tip_speed_ratio: f64,
        air_density: Option<f64>,
    ) -> Self {
        Self {
            blade_count,
            hub_radius: min_radius.min(0.01),
            min_radius,
            max_radius,
            section_count,
            wind_speed,
            tip_speed_ratio,
            air_density: air_density.unwrap_or(1.225),
            ..Self::small_s822()
        }
    }

    /// Rated angular speed, Omega = lambda * U / R (rad/s)
    #[inline(always)]
    pub fn omega(&self) -> f64 {
        self.tip_speed_ratio * self.wind_speed / self.max_radius
    }

    /// Rated rotor speed in revolutions per minute.
    pub fn rated_rpm(&self) -> f64 {
        self.omega() * 60.0 / (2.0 * PI)
    }

    /// Width of the radial slice each station stands for.
    /// The working span is divided by the station count, not count - 1.
    #[inline(always)]
    pub fn radial_step(&self) -> f64 {
        (self.max_radius - self.min_radius) / self.section_count as f64
    }

    /// Rotor disk area (m²)
    pub fn swept_area(&self) -> f64 {
        PI * self.max_radius.powi(2)
    }

    /// Kinetic power of the wind through the rotor disk, 0.5 * rho * A * U³ (W)
    pub fn wind_power(&self) -> f64 {
        0.5 * self.air_density * self.swept_area() * self.wind_speed.powi(3)
    }

    /// Check that the configuration describes a usable rotor.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: &str| Err(BladeError::InvalidParameter(msg.to_string()));

        if self.blade_count == 0 {
            return fail("blade count must be at least 1");
        }
        if self.section_count == 0 {
            return fail("section count must be at least 1");
        }
        if !(self.min_radius > 0.0) || !(self.max_radius > 0.0) {
            return fail("working radii must be positive");
        }
        if self.section_count > 1 && self.min_radius >= self.max_radius {
            return fail("min radius must be below max radius");
        }
        if self.hub_radius < 0.0 || self.hub_radius > self.min_radius {
            return fail("hub radius must lie between 0 and the min working radius");
        }
        if !(self.wind_speed > 0.0) {
            return fail("wind speed must be positive");
        }
        if !(self.tip_speed_ratio > 0.0) {
            return fail("tip-speed ratio must be positive");
        }
        if !(self.air_density > 0.0) || !(self.kinematic_viscosity > 0.0) {
            return fail("air density and viscosity must be positive");
        }
        if !(self.initial.chord0 > 0.0) {
            return fail("initial chord must be positive");
        }
        self.solver.validate()?;
        self.projection.validate()
    }

    /// Get a summary of the constants for reporting.
    pub fn summary(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("blades (-)".to_string(), format!("{}", self.blade_count));
        map.insert("hub radius (m)".to_string(), format!("{:.3}", self.hub_radius));
        map.insert("min radius (m)".to_string(), format!("{:.3}", self.min_radius));
        map.insert("max radius (m)".to_string(), format!("{:.3}", self.max_radius));
        map.insert("sections (-)".to_string(), format!("{}", self.section_count));
        map.insert("U (m/s)".to_string(), format!("{:.2}", self.wind_speed));
        map.insert("lambda (-)".to_string(), format!("{:.2}", self.tip_speed_ratio));
        map.insert("ρ_air (kg/m³)".to_string(), format!("{:.4}", self.air_density));
        map.insert("Ω (rpm)".to_string(), format!("{:.1}", self.rated_rpm()));
        map.insert("sweeps (-)".to_string(), format!("{}", self.iterations));
        map
    }
}

impl Default for RotorConstants {
    fn default() -> Self {
        Self::small_s822()
    }
}

/// Solver and projection tuning parameters.
pub mod model_params {
    use serde::{Deserialize, Serialize};

    use super::{ProfileSplit, ProjectionMode};
    use crate::error::{BladeError, Result};

    /// Uniform first-guess values for every station.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct InitialGuess {
        pub a0: f64,     // Axial induction factor
        pub a1_0: f64,   // Angular induction factor
        pub chord0: f64, // Chord (m)
    }

    impl Default for InitialGuess {
        fn default() -> Self {
            Self {
                a0: 0.333,
                a1_0: 0.0,
                chord0: 0.02,
            }
        }
    }

    /// Parameters of the per-station angle-of-attack search.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct SolverParams {
        pub alpha_min: f64,  // Search window start (deg)
        pub alpha_max: f64,  // Search window end (deg)
        pub resolution: usize,
        pub re_floor: f64,   // Polar data is undefined below this Reynolds number
    }

    impl Default for SolverParams {
        fn default() -> Self {
            Self {
                alpha_min: -10.0,
                alpha_max: 14.0,
                resolution: 100,
                re_floor: 50000.0,
            }
        }
    }

    impl SolverParams {
        pub fn validate(&self) -> Result<()> {
            if self.resolution == 0 {
                return Err(BladeError::InvalidParameter(
                    "alpha resolution must be at least 1".to_string(),
                ));
            }
            if !(self.alpha_min <= self.alpha_max) {
                return Err(BladeError::InvalidParameter(format!(
                    "alpha window [{}, {}] is inverted",
                    self.alpha_min, self.alpha_max
                )));
            }
            if !(self.re_floor > 0.0) {
                return Err(BladeError::InvalidParameter(
                    "Reynolds floor must be positive".to_string(),
                ));
            }
            Ok(())
        }
    }

    /// How the twisted sections are laid out in 3D and exported.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct ProjectionParams {
        pub mode: ProjectionMode,
        pub pivot: [f64; 2],   // Rotation pivot in normalised airfoil coordinates
        pub unit_scale: f64,   // 100 writes centimetres from metres
        pub split: ProfileSplit,
    }

    impl Default for ProjectionParams {
        fn default() -> Self {
            Self {
                mode: ProjectionMode::Cylindrical,
                pivot: [0.0, 0.0],
                unit_scale: 100.0,
                split: ProfileSplit::S822,
            }
        }
    }

    impl ProjectionParams {
        pub fn validate(&self) -> Result<()> {
            if !(self.unit_scale > 0.0) || !self.unit_scale.is_finite() {
                return Err(BladeError::InvalidParameter(
                    "unit scale must be positive".to_string(),
                ));
            }
            self.split.validate()
        }
    }
}
