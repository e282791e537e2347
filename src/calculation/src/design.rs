/// End-to-end blade design: polar surface, BEM sweeps and 3D sections.
///
/// [`BladeDesign`] wires the stages together for one [`RotorConstants`] and
/// returns everything a caller needs to report or export the blade in a
/// single [`DesignReport`]. Nothing here touches the file system.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::RotorConstants;
use crate::error::Result;
use crate::geometry::{AirfoilShape, GeometryProjector, ProjectedProfile};
use crate::polar::{PolarSample, PolarSurface};
use crate::section::BladeSection;
use crate::solver::{BladeSolver, RotorState, SweepResidual};

/// Diagnostic row for one station after the last sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationReport {
    pub r: f64,
    pub w: f64,
    pub phi: f64,     // (rad)
    pub re: f64,
    pub alpha: f64,   // (deg)
    pub cd: f64,
    pub cl: f64,
    pub chord: f64,
    pub cx: f64,
    pub cy: f64,
    pub a: f64,
    pub a1: f64,
    pub delta_cp: f64,
    pub twist: f64,   // (rad)
}

impl StationReport {
    /// Row for a section that has been through at least one sweep.
    pub fn from_section(section: &BladeSection) -> Option<Self> {
        section.last_step.map(|s| Self {
            r: section.radius,
            w: s.w,
            phi: s.phi,
            re: s.re,
            alpha: s.alpha,
            cd: s.cd,
            cl: s.cl,
            chord: s.chord,
            cx: s.cx,
            cy: s.cy,
            a: s.a,
            a1: s.a1,
            delta_cp: s.delta_cp,
            twist: s.twist,
        })
    }
}

/// Everything produced by one design run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignReport {
    pub constants: RotorConstants,
    pub stations: Vec<StationReport>,
    pub profiles: Vec<ProjectedProfile>,
    pub cp_total: f64,
    pub residuals: Vec<SweepResidual>,
}

impl DesignReport {
    /// Get summary statistics as a dictionary.
    pub fn summary(&self) -> HashMap<String, f64> {
        let mut summary = HashMap::new();
        summary.insert("stations".to_string(), self.profiles.len() as f64);
        summary.insert("sweeps".to_string(), self.residuals.len() as f64);
        summary.insert("cp_total".to_string(), self.cp_total);
        summary.insert("rated_rpm".to_string(), self.constants.rated_rpm());
        summary.insert(
            "shaft_power_w".to_string(),
            self.cp_total * self.constants.wind_power(),
        );

        if !self.stations.is_empty() {
            let chords = self.stations.iter().map(|s| s.chord);
            summary.insert("max_chord".to_string(), chords.clone().fold(f64::NEG_INFINITY, f64::max));
            summary.insert("min_chord".to_string(), chords.fold(f64::INFINITY, f64::min));
            summary.insert(
                "root_twist_deg".to_string(),
                self.stations[0].twist.to_degrees(),
            );
            summary.insert(
                "tip_twist_deg".to_string(),
                self.stations[self.stations.len() - 1].twist.to_degrees(),
            );
        }
        if let Some(last) = self.residuals.last() {
            summary.insert("final_residual".to_string(), last.max());
        }

        summary
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// One rotor definition bound to one polar surface.
#[derive(Debug, Clone, Copy)]
pub struct BladeDesign<'a> {
    constants: &'a RotorConstants,
    polar: &'a PolarSurface,
}

impl<'a> BladeDesign<'a> {
    pub fn new(constants: &'a RotorConstants, polar: &'a PolarSurface) -> Self {
        Self { constants, polar }
    }

    /// Run the configured number of sweeps and project the final stations.
    pub fn run(&self, shape: &AirfoilShape) -> Result<DesignReport> {
        self.run_with(shape, |_, _| {})
    }

    /// Like [`run`](Self::run), reporting each completed sweep to `on_sweep`.
    pub fn run_with<F>(&self, shape: &AirfoilShape, on_sweep: F) -> Result<DesignReport>
    where
        F: FnMut(usize, &RotorState),
    {
        let initial = RotorState::new(self.constants)?;
        let solver = BladeSolver::new(self.polar, self.constants);
        let outcome = solver.solve_with(initial, self.constants.iterations, on_sweep)?;

        let projector = GeometryProjector::new(self.constants.projection);
        let profiles = projector.project_rotor(&outcome.state, shape)?;

        let stations = outcome
            .state
            .sections()
            .iter()
            .filter_map(StationReport::from_section)
            .collect();

        log::info!(
            "blade designed: {} stations, {} sweeps, Cp = {:.4}",
            profiles.len(),
            outcome.residuals.len(),
            outcome.cp_total
        );

        Ok(DesignReport {
            constants: self.constants.clone(),
            stations,
            profiles,
            cp_total: outcome.cp_total,
            residuals: outcome.residuals,
        })
    }
}

/// Build the polar surface from raw samples and run the design.
pub fn design_blade(
    constants: &RotorConstants,
    samples: &[PolarSample],
    shape: &AirfoilShape,
) -> Result<DesignReport> {
    let polar = PolarSurface::build(samples)?;
    BladeDesign::new(constants, &polar).run(shape)
}
