/// Continuous airfoil polar lookup over (Reynolds number, angle of attack).
///
/// Scattered polar samples are triangulated (Delaunay) in the raw (Re, alpha)
/// plane and cl, cd and eta are interpolated linearly inside each triangle.
/// Queries outside the convex hull of the samples are reported as
/// [`BladeError::OutOfDomain`] instead of being extrapolated.

use std::fmt;

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use spade::{
    DelaunayTriangulation, FloatTriangulation, HasPosition, HierarchyHintGenerator, Point2,
    Triangulation,
};

use crate::error::{BladeError, Result};

/// One measured polar row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarSample {
    pub re: f64,    // Reynolds number (-)
    pub alpha: f64, // Angle of attack (deg)
    pub cl: f64,    // Lift coefficient
    pub cd: f64,    // Drag coefficient
    pub eta: f64,   // Aerodynamic efficiency
}

impl PolarSample {
    pub const fn new(re: f64, alpha: f64, cl: f64, cd: f64, eta: f64) -> Self {
        Self { re, alpha, cl, cd, eta }
    }
}

/// Interpolated coefficients at one (Re, alpha) point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarPoint {
    pub cl: f64,
    pub cd: f64,
    pub eta: f64,
}

/// Most efficient angle of attack found by [`PolarSurface::best_alpha`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestAlpha {
    pub alpha: f64, // (deg)
    pub cl: f64,
    pub cd: f64,
    pub eta: f64,
}

/// Bounding box of the sampled (Re, alpha) domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarBounds {
    pub re_min: f64,
    pub re_max: f64,
    pub alpha_min: f64,
    pub alpha_max: f64,
}

/// Triangulation vertex carrying the three coefficients.
#[derive(Debug, Clone, Copy)]
struct PolarNode {
    position: Point2<f64>,
    cl: f64,
    cd: f64,
    eta: f64,
}

impl HasPosition for PolarNode {
    type Scalar = f64;

    fn position(&self) -> Point2<f64> {
        self.position
    }
}

type PolarTriangulation = DelaunayTriangulation<PolarNode, (), (), (), HierarchyHintGenerator<f64>>;

/// Piecewise-linear cl/cd/eta surfaces over the convex hull of the samples.
pub struct PolarSurface {
    triangulation: PolarTriangulation,
    bounds: PolarBounds,
}

impl fmt::Debug for PolarSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolarSurface")
            .field("nodes", &self.triangulation.num_vertices())
            .field("triangles", &self.triangulation.num_inner_faces())
            .field("bounds", &self.bounds)
            .finish()
    }
}

impl PolarSurface {
    /// Triangulate the samples.
    ///
    /// Samples sharing an (Re, alpha) pair collapse into one node holding the
    /// last sample's coefficients. Fails with [`BladeError::InsufficientData`]
    /// unless at least three non-collinear nodes remain.
    pub fn build(samples: &[PolarSample]) -> Result<Self> {
        let mut triangulation = PolarTriangulation::new();
        let mut bounds = PolarBounds {
            re_min: f64::INFINITY,
            re_max: f64::NEG_INFINITY,
            alpha_min: f64::INFINITY,
            alpha_max: f64::NEG_INFINITY,
        };

        for (index, s) in samples.iter().enumerate() {
            if !s.re.is_finite() || !s.alpha.is_finite() || s.re <= 0.0 {
                return Err(BladeError::InvalidSample {
                    index,
                    reason: format!("non-physical coordinates Re = {}, alpha = {}", s.re, s.alpha),
                });
            }

            let node = PolarNode {
                position: Point2::new(s.re, s.alpha),
                cl: s.cl,
                cd: s.cd,
                eta: s.eta,
            };
            triangulation
                .insert(node)
                .map_err(|e| BladeError::InvalidSample { index, reason: format!("{:?}", e) })?;

            bounds.re_min = bounds.re_min.min(s.re);
            bounds.re_max = bounds.re_max.max(s.re);
            bounds.alpha_min = bounds.alpha_min.min(s.alpha);
            bounds.alpha_max = bounds.alpha_max.max(s.alpha);
        }

        // All-collinear inputs produce vertices but no triangles.
        if triangulation.num_inner_faces() == 0 {
            return Err(BladeError::InsufficientData {
                distinct: triangulation.num_vertices(),
            });
        }

        log::debug!(
            "polar surface: {} nodes, {} triangles, Re [{:.0}, {:.0}], alpha [{:.2}, {:.2}]",
            triangulation.num_vertices(),
            triangulation.num_inner_faces(),
            bounds.re_min,
            bounds.re_max,
            bounds.alpha_min,
            bounds.alpha_max
        );

        Ok(Self { triangulation, bounds })
    }

    /// Number of distinct (Re, alpha) nodes.
    pub fn len(&self) -> usize {
        self.triangulation.num_vertices()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bounds(&self) -> PolarBounds {
        self.bounds
    }

    /// Interpolate cl, cd and eta at (re, alpha).
    pub fn evaluate(&self, re: f64, alpha: f64) -> Result<PolarPoint> {
        let out_of_domain = || BladeError::OutOfDomain { re, alpha };
        if !re.is_finite() || !alpha.is_finite() {
            return Err(out_of_domain());
        }

        // One point location serves all three coefficients
        let mut weights = Vec::with_capacity(3);
        self.triangulation
            .barycentric()
            .get_weights(Point2::new(re, alpha), &mut weights);
        if weights.is_empty() {
            return Err(out_of_domain());
        }

        let mut point = PolarPoint { cl: 0.0, cd: 0.0, eta: 0.0 };
        for (handle, weight) in weights {
            let vertex = self.triangulation.vertex(handle);
            let node = vertex.data();
            point.cl += node.cl * weight;
            point.cd += node.cd * weight;
            point.eta += node.eta * weight;
        }
        Ok(point)
    }

    /// Scan `resolution` evenly spaced angles on `[alpha_min, alpha_max]` at
    /// fixed `re` and return the one with the highest eta.
    ///
    /// Ties keep the first (lowest) angle. Every sampled angle must lie in the
    /// polar domain; the first one that does not is returned as
    /// [`BladeError::OutOfDomain`].
    pub fn best_alpha(
        &self,
        re: f64,
        alpha_min: f64,
        alpha_max: f64,
        resolution: usize,
    ) -> Result<BestAlpha> {
        if resolution == 0 {
            return Err(BladeError::InvalidParameter(
                "alpha resolution must be at least 1".to_string(),
            ));
        }
        if !(alpha_min <= alpha_max) {
            return Err(BladeError::InvalidParameter(format!(
                "alpha window [{}, {}] is inverted",
                alpha_min, alpha_max
            )));
        }

        let mut best: Option<BestAlpha> = None;
        for &alpha in linspace(alpha_min, alpha_max, resolution).iter() {
            let p = self.evaluate(re, alpha)?;
            if best.map_or(true, |b| p.eta > b.eta) {
                best = Some(BestAlpha {
                    alpha,
                    cl: p.cl,
                    cd: p.cd,
                    eta: p.eta,
                });
            }
        }

        // resolution >= 1, so at least one angle was scanned
        best.ok_or_else(|| BladeError::OutOfDomain { re, alpha: alpha_min })
    }
}

/// Evenly spaced grid with both end points included exactly.
pub(crate) fn linspace(start: f64, end: f64, n: usize) -> Array1<f64> {
    let mut grid = Array1::linspace(start, end, n);
    if n > 1 {
        grid[n - 1] = end;
    }
    grid
}
