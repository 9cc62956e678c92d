//! Rigid-body superposition oracle.
//!
//! The group matcher only consumes the [`Superpose`] trait; the bundled
//! [`LeastSquaresFit`] is the default least-squares (Kabsch) implementation
//! built on nalgebra's SVD.

use crate::model::types::{Point, Rotation, Translation};
use crate::ops::error::Error;
use nalgebra::SVD;

/// Result of fitting a moving coordinate set onto a reference one.
///
/// The operator maps the reference frame onto the moving frame:
/// `moving_i ≈ rotation · reference_i + translation`.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    pub rotation: Rotation,
    pub translation: Translation,
    pub rmsd: f64,
}

/// Rigid-body superposition between two equally sized coordinate sets.
pub trait Superpose {
    fn fit(&self, reference: &[Point], moving: &[Point]) -> Result<FitResult, Error>;
}

/// Least-squares rigid-body fit (Kabsch algorithm).
#[derive(Debug, Clone, Copy, Default)]
pub struct LeastSquaresFit;

impl Superpose for LeastSquaresFit {
    fn fit(&self, reference: &[Point], moving: &[Point]) -> Result<FitResult, Error> {
        if reference.len() != moving.len() || reference.is_empty() {
            return Err(Error::CoordinateMismatch {
                reference: reference.len(),
                moving: moving.len(),
            });
        }

        let n = reference.len() as f64;
        let centroid_ref: Translation =
            reference.iter().map(|p| p.coords).sum::<Translation>() / n;
        let centroid_mov: Translation =
            moving.iter().map(|p| p.coords).sum::<Translation>() / n;

        // Cross-covariance of the centered coordinate sets.
        let mut h = Rotation::zeros();
        for (r, m) in reference.iter().zip(moving.iter()) {
            h += (r.coords - centroid_ref) * (m.coords - centroid_mov).transpose();
        }

        let svd = SVD::new(h, true, true);
        let (u, v_t) = match (svd.u, svd.v_t) {
            (Some(u), Some(v_t)) => (u, v_t),
            _ => {
                return Err(Error::CoordinateMismatch {
                    reference: reference.len(),
                    moving: moving.len(),
                })
            }
        };

        // Reflection fix: force a proper rotation.
        let mut rotation = v_t.transpose() * u.transpose();
        if rotation.determinant() < 0.0 {
            let mut v = v_t.transpose();
            let flipped = -v.column(2).clone_owned();
            v.set_column(2, &flipped);
            rotation = v * u.transpose();
        }

        let translation = centroid_mov - rotation * centroid_ref;

        let mut sum_sq = 0.0;
        for (r, m) in reference.iter().zip(moving.iter()) {
            let mapped = rotation * r.coords + translation;
            sum_sq += (mapped - m.coords).norm_squared();
        }
        let rmsd = (sum_sq / n).sqrt();

        Ok(FitResult {
            rotation,
            translation,
            rmsd,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_points() -> Vec<Point> {
        vec![
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(0.0, 0.0, 1.0),
            Point::new(1.0, 1.0, 1.0),
        ]
    }

    #[test]
    fn fit_recovers_pure_translation() {
        let reference = reference_points();
        let shift = Translation::new(3.0, -2.0, 0.5);
        let moving: Vec<Point> = reference.iter().map(|p| p + shift).collect();

        let fit = LeastSquaresFit.fit(&reference, &moving).unwrap();

        assert!((fit.rotation - Rotation::identity()).amax() < 1e-9);
        assert!((fit.translation - shift).amax() < 1e-9);
        assert!(fit.rmsd < 1e-9);
    }

    #[test]
    fn fit_recovers_known_rotation() {
        let reference = reference_points();
        // 90 degrees about z.
        let rotation = Rotation::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        let shift = Translation::new(1.0, 2.0, 3.0);
        let moving: Vec<Point> = reference
            .iter()
            .map(|p| Point::from(rotation * p.coords + shift))
            .collect();

        let fit = LeastSquaresFit.fit(&reference, &moving).unwrap();

        assert!((fit.rotation - rotation).amax() < 1e-9);
        assert!((fit.translation - shift).amax() < 1e-9);
        assert!(fit.rmsd < 1e-9);
        assert!((fit.rotation.determinant() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn fit_reports_residual_rmsd() {
        let reference = reference_points();
        let mut moving = reference.clone();
        moving[0].x += 0.2;

        let fit = LeastSquaresFit.fit(&reference, &moving).unwrap();

        assert!(fit.rmsd > 0.0);
        assert!(fit.rmsd < 0.2);
    }

    #[test]
    fn fit_rejects_mismatched_lengths() {
        let reference = reference_points();
        let moving = reference[..3].to_vec();

        assert!(matches!(
            LeastSquaresFit.fit(&reference, &moving),
            Err(Error::CoordinateMismatch {
                reference: 4,
                moving: 3
            })
        ));
    }

    #[test]
    fn fit_rejects_empty_sets() {
        assert!(LeastSquaresFit.fit(&[], &[]).is_err());
    }
}
