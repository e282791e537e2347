//! Error type shared by every stage of the blade design.

use thiserror::Error;

/// Failures raised by polar lookup, the BEM sweep and geometry projection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BladeError {
    /// Fewer than three non-collinear (Re, alpha) points were supplied.
    #[error("polar data is insufficient: {distinct} distinct points, need 3 non-collinear")]
    InsufficientData { distinct: usize },

    /// A polar sample could not be inserted into the triangulation.
    #[error("polar sample {index} rejected: {reason}")]
    InvalidSample { index: usize, reason: String },

    /// The query point lies outside the convex hull of the polar samples.
    #[error("polar lookup out of domain at Re = {re:.0}, alpha = {alpha:.3} deg")]
    OutOfDomain { re: f64, alpha: f64 },

    /// Degenerate algebra in the induction-factor update.
    #[error("BEM update failed at station {station}: {reason}")]
    Domain { station: usize, reason: String },

    /// The airfoil shape has too few points for the half-profile split.
    #[error("airfoil shape has {actual} points, split requires at least {required}")]
    ShapeSize { required: usize, actual: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, BladeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failure() {
        let err = BladeError::ShapeSize { required: 61, actual: 40 };
        assert_eq!(
            err.to_string(),
            "airfoil shape has 40 points, split requires at least 61"
        );

        let err = BladeError::OutOfDomain { re: 600000.0, alpha: 2.5 };
        assert!(err.to_string().contains("Re = 600000"));
    }
}
