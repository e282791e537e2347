/// Projection of the airfoil profile onto the blade surface.
///
/// Every station scales the shared unit-chord profile by its chord, rotates
/// it by its twist about a pivot and places it at its radius, either on a
/// flat plane or wrapped onto a cylinder of that radius. The resulting point
/// sequence is also split into two half-profiles that overlap at the leading
/// edge, which is how CAD lofting tools expect the sections.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::model_params::ProjectionParams;
use crate::error::{BladeError, Result};
use crate::section::BladeSection;
use crate::solver::RotorState;
use crate::vector::{Vec2, Vec3};

/// Normalised airfoil profile, unit chord.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirfoilShape {
    points: Vec<Vec2>,
}

impl AirfoilShape {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    pub fn from_xy(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(BladeError::InvalidParameter(format!(
                "airfoil columns differ in length: {} x values, {} y values",
                x.len(),
                y.len()
            )));
        }
        Ok(Self::new(x.iter().zip(y).map(|(&x, &y)| Vec2::new(x, y)).collect()))
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the first point with the smallest x.
    pub fn leading_edge_index(&self) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, p)| match best {
                Some((_, x)) if x <= p.x => best,
                _ => Some((i, p.x)),
            })
            .map(|(i, _)| i)
    }
}

/// Surface the sections are placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    /// Flat section at z = radius
    Planar,
    /// Section wrapped onto the cylinder of the station radius
    Cylindrical,
}

/// Where the profile is cut into its two halves.
///
/// Half A covers `[0, leading_edge]`, half B covers
/// `[leading_edge, point_count)`; both contain the leading-edge point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSplit {
    pub leading_edge: usize,
    pub point_count: usize,
}

impl ProfileSplit {
    /// 61-point S822 table with the leading edge at index 30.
    pub const S822: Self = Self {
        leading_edge: 30,
        point_count: 61,
    };

    /// Split derived from the shape: leading edge at the minimum x, all points used.
    pub fn detect(shape: &AirfoilShape) -> Result<Self> {
        let leading_edge = shape
            .leading_edge_index()
            .ok_or(BladeError::ShapeSize { required: 1, actual: 0 })?;
        Ok(Self {
            leading_edge,
            point_count: shape.len(),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.leading_edge >= self.point_count {
            return Err(BladeError::InvalidParameter(format!(
                "leading edge index {} outside a {}-point profile",
                self.leading_edge, self.point_count
            )));
        }
        Ok(())
    }

    fn half_a(&self) -> std::ops::Range<usize> {
        0..self.leading_edge + 1
    }

    fn half_b(&self) -> std::ops::Range<usize> {
        self.leading_edge..self.point_count
    }
}

/// 3D section of one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedProfile {
    /// Station radius (m, working units)
    pub radius: f64,
    pub full: Vec<Vec3>,
    pub half_a: Vec<Vec3>,
    pub half_b: Vec<Vec3>,
}

/// Maps the airfoil profile of each station into 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryProjector {
    params: ProjectionParams,
}

impl GeometryProjector {
    pub fn new(params: ProjectionParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ProjectionParams {
        &self.params
    }

    /// Project `shape` with the chord, twist and radius of `section`.
    pub fn project(&self, section: &BladeSection, shape: &AirfoilShape) -> Result<ProjectedProfile> {
        let split = self.params.split;
        split.validate()?;
        if shape.len() < split.point_count {
            return Err(BladeError::ShapeSize {
                required: split.point_count,
                actual: shape.len(),
            });
        }

        let pivot = Vec2::from(self.params.pivot);
        let radius = section.radius;
        let scale = self.params.unit_scale;

        let full: Vec<Vec3> = shape
            .points()
            .iter()
            .map(|p| {
                let local = p.sub(&pivot).mul(section.chord).rotate(section.twist);
                let placed = match self.params.mode {
                    ProjectionMode::Cylindrical => {
                        let sigma = local.x / radius;
                        Vec3::new(radius * sigma.sin(), local.y, radius * sigma.cos())
                    }
                    ProjectionMode::Planar => Vec3::new(local.x, local.y, radius),
                };
                placed.mul(scale)
            })
            .collect();

        let half_a = full[split.half_a()].to_vec();
        let half_b = full[split.half_b()].to_vec();

        Ok(ProjectedProfile {
            radius,
            full,
            half_a,
            half_b,
        })
    }

    /// Project every station of `state`, in station order.
    pub fn project_rotor(&self, state: &RotorState, shape: &AirfoilShape) -> Result<Vec<ProjectedProfile>> {
        state
            .sections()
            .par_iter()
            .map(|s| self.project(s, shape))
            .collect()
    }
}
