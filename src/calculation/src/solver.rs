/// Fixed-iteration BEM solver over all radial stations.
///
/// Each sweep updates every station from the previous sweep's state. Stations
/// are independent within a sweep and run on the rayon pool; results are
/// gathered in station order, so the outcome does not depend on scheduling.
/// There is no convergence test and no relaxation between sweeps, but every
/// sweep records its largest state change so callers can judge convergence.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::RotorConstants;
use crate::error::{BladeError, Result};
use crate::polar::{linspace, PolarSurface};
use crate::section::{BladeSection, SectionSolver};

/// Ordered stations of one blade, radius strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct RotorState {
    sections: Vec<BladeSection>,
}

impl RotorState {
    /// `section_count` stations evenly spaced on `[min_radius, max_radius]`,
    /// all seeded with the first-guess values.
    pub fn new(constants: &RotorConstants) -> Result<Self> {
        constants.validate()?;
        let sections = linspace(constants.min_radius, constants.max_radius, constants.section_count)
            .iter()
            .map(|&r| BladeSection::new(r, &constants.initial))
            .collect();
        Ok(Self { sections })
    }

    /// Wrap existing sections, checking they are non-empty and ordered.
    pub fn from_sections(sections: Vec<BladeSection>) -> Result<Self> {
        if sections.is_empty() {
            return Err(BladeError::InvalidParameter(
                "rotor needs at least one section".to_string(),
            ));
        }
        if let Some(i) = sections.windows(2).position(|w| !(w[1].radius > w[0].radius)) {
            return Err(BladeError::InvalidParameter(format!(
                "section radii must increase strictly (stations {} and {})",
                i,
                i + 1
            )));
        }
        Ok(Self { sections })
    }

    pub fn sections(&self) -> &[BladeSection] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn radii(&self) -> Vec<f64> {
        self.sections.iter().map(|s| s.radius).collect()
    }

    /// Sum of the stations' incremental power coefficients from the last sweep.
    pub fn cp_total(&self) -> f64 {
        self.sections.iter().map(BladeSection::delta_cp).sum()
    }

    /// Largest per-station change between `previous` and `self`.
    fn residual_from(&self, previous: &Self, sweep: usize) -> SweepResidual {
        let mut residual = SweepResidual {
            sweep,
            max_chord_delta: 0.0,
            max_a_delta: 0.0,
            max_a1_delta: 0.0,
        };
        for (new, old) in self.sections.iter().zip(&previous.sections) {
            residual.max_chord_delta = residual.max_chord_delta.max((new.chord - old.chord).abs());
            residual.max_a_delta = residual.max_a_delta.max((new.a - old.a).abs());
            residual.max_a1_delta = residual.max_a1_delta.max((new.a1 - old.a1).abs());
        }
        residual
    }
}

/// State change produced by one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepResidual {
    /// 1-based sweep number
    pub sweep: usize,
    pub max_chord_delta: f64,
    pub max_a_delta: f64,
    pub max_a1_delta: f64,
}

impl SweepResidual {
    pub fn max(&self) -> f64 {
        self.max_chord_delta.max(self.max_a_delta).max(self.max_a1_delta)
    }
}

/// Final state of a solve plus its convergence history.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub state: RotorState,
    pub cp_total: f64,
    pub residuals: Vec<SweepResidual>,
}

impl SolveOutcome {
    /// True when the last sweep changed no station by more than `tol`.
    /// A solve with no sweeps has not converged.
    pub fn converged(&self, tol: f64) -> bool {
        self.residuals.last().map_or(false, |r| r.max() <= tol)
    }
}

/// Runs sweeps of the per-station update over a [`RotorState`].
#[derive(Debug, Clone, Copy)]
pub struct BladeSolver<'a> {
    section: SectionSolver<'a>,
}

impl<'a> BladeSolver<'a> {
    pub fn new(polar: &'a PolarSurface, constants: &'a RotorConstants) -> Self {
        Self {
            section: SectionSolver::new(polar, constants),
        }
    }

    /// One sweep: every station updated from `state`.
    ///
    /// Any station failure aborts the whole sweep.
    pub fn sweep(&self, state: &RotorState) -> Result<RotorState> {
        let sections = state
            .sections
            .par_iter()
            .enumerate()
            .map(|(i, s)| self.section.step(i, s).map(|step| s.advanced(step)))
            .collect::<Result<Vec<_>>>()?;
        Ok(RotorState { sections })
    }

    /// Exactly `iterations` sweeps starting from `initial`.
    pub fn solve(&self, initial: RotorState, iterations: usize) -> Result<SolveOutcome> {
        self.solve_with(initial, iterations, |_, _| {})
    }

    /// Like [`solve`](Self::solve), handing every completed sweep to `on_sweep`
    /// together with its 1-based number.
    pub fn solve_with<F>(&self, initial: RotorState, iterations: usize, mut on_sweep: F) -> Result<SolveOutcome>
    where
        F: FnMut(usize, &RotorState),
    {
        let mut state = initial;
        let mut residuals = Vec::with_capacity(iterations);

        for sweep in 1..=iterations {
            let next = self.sweep(&state)?;
            let residual = next.residual_from(&state, sweep);
            log::debug!(
                "sweep {}/{}: Cp = {:.5}, max |dc| = {:.3e}, max |da| = {:.3e}, max |da1| = {:.3e}",
                sweep,
                iterations,
                next.cp_total(),
                residual.max_chord_delta,
                residual.max_a_delta,
                residual.max_a1_delta
            );
            on_sweep(sweep, &next);
            residuals.push(residual);
            state = next;
        }

        let cp_total = state.cp_total();
        Ok(SolveOutcome {
            state,
            cp_total,
            residuals,
        })
    }
}
