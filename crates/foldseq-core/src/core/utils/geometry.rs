use nalgebra::{Matrix3, Point3, Rotation3, Vector3};
use thiserror::Error;

const SVD_MAX_ITERATIONS: usize = 1000;

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("Point sets differ in size: {mobile} mobile vs {reference} reference")]
    LengthMismatch { mobile: usize, reference: usize },
    #[error("Cannot superpose empty point sets")]
    Empty,
    #[error("Coordinate {index} of the {set} set is not finite")]
    NonFinite { set: &'static str, index: usize },
    #[error("Singular value decomposition failed: {0}")]
    Decomposition(&'static str),
}

/// A rigid-body transform that maps mobile coordinates onto a reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Superposition {
    pub rotation: Rotation3<f64>,
    pub translation: Vector3<f64>,
    /// RMSD between the transformed mobile points and the reference, in Angstroms.
    pub rmsd: f64,
}

impl Superposition {
    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        self.rotation * point + self.translation
    }
}

pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum: Vector3<f64> = points.iter().map(|p| p.coords).sum();
    Some(Point3::from(sum / points.len() as f64))
}

pub fn calculate_rmsd(coords1: &[Point3<f64>], coords2: &[Point3<f64>]) -> Option<f64> {
    if coords1.len() != coords2.len() || coords1.is_empty() {
        return None;
    }
    let n = coords1.len() as f64;
    let squared_dist_sum: f64 = coords1
        .iter()
        .zip(coords2.iter())
        .map(|(p1, p2)| (p1 - p2).norm_squared())
        .sum();
    Some((squared_dist_sum / n).sqrt())
}

/// Computes the least-squares rigid transform that moves `mobile` onto `reference`.
///
/// Both slices are paired index by index. The rotation is obtained from the
/// SVD of the covariance matrix (Kabsch) with the sign of the last singular
/// vector flipped when needed, so the result is always a proper rotation.
///
/// # Errors
///
/// Returns [`GeometryError::LengthMismatch`] for unpaired inputs,
/// [`GeometryError::Empty`] when there is nothing to fit,
/// [`GeometryError::NonFinite`] for NaN or infinite coordinates, and
/// [`GeometryError::Decomposition`] when the SVD does not converge.
pub fn superpose(
    mobile: &[Point3<f64>],
    reference: &[Point3<f64>],
) -> Result<Superposition, GeometryError> {
    if mobile.len() != reference.len() {
        return Err(GeometryError::LengthMismatch {
            mobile: mobile.len(),
            reference: reference.len(),
        });
    }
    check_finite(mobile, "mobile")?;
    check_finite(reference, "reference")?;
    let mobile_centroid = centroid(mobile).ok_or(GeometryError::Empty)?;
    let reference_centroid = centroid(reference).ok_or(GeometryError::Empty)?;

    let h = mobile
        .iter()
        .zip(reference.iter())
        .fold(Matrix3::zeros(), |acc, (m, r)| {
            acc + (r - reference_centroid) * (m - mobile_centroid).transpose()
        });

    let svd = h
        .try_svd(true, true, f64::EPSILON, SVD_MAX_ITERATIONS)
        .ok_or(GeometryError::Decomposition("no convergence"))?;
    let u = svd.u.ok_or(GeometryError::Decomposition("missing U"))?;
    let v_t = svd.v_t.ok_or(GeometryError::Decomposition("missing V^T"))?;

    let mut correction = Matrix3::identity();
    if (u * v_t).determinant() < 0.0 {
        correction[(2, 2)] = -1.0;
    }

    let rotation = Rotation3::from_matrix_unchecked(u * correction * v_t);
    let translation = reference_centroid.coords - rotation * mobile_centroid.coords;

    let fitted: Vec<Point3<f64>> = mobile
        .iter()
        .map(|p| rotation * p + translation)
        .collect();
    let rmsd = calculate_rmsd(&fitted, reference).ok_or(GeometryError::Empty)?;
    if !rmsd.is_finite() || rotation.matrix().iter().any(|v| !v.is_finite()) {
        return Err(GeometryError::Decomposition("non-finite result"));
    }

    Ok(Superposition {
        rotation,
        translation,
        rmsd,
    })
}

fn check_finite(points: &[Point3<f64>], set: &'static str) -> Result<(), GeometryError> {
    match points.iter().position(|p| p.coords.iter().any(|c| !c.is_finite())) {
        Some(index) => Err(GeometryError::NonFinite { set, index }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Unit;

    fn sample_points() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.5, 0.0, 0.0),
            Point3::new(1.5, 1.2, 0.3),
            Point3::new(-0.4, 2.0, 1.1),
            Point3::new(0.7, -1.3, 2.2),
        ]
    }

    #[test]
    fn centroid_of_empty_set_is_none() {
        assert!(centroid(&[]).is_none());
    }

    #[test]
    fn centroid_is_the_mean_position() {
        let points = [Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 4.0, -6.0)];
        assert_eq!(centroid(&points), Some(Point3::new(1.0, 2.0, -3.0)));
    }

    #[test]
    fn rmsd_rejects_mismatched_or_empty_input() {
        let a = [Point3::new(0.0, 0.0, 0.0)];
        assert!(calculate_rmsd(&a, &[]).is_none());
        assert!(calculate_rmsd(&[], &[]).is_none());
    }

    #[test]
    fn rmsd_of_uniform_shift_equals_shift_length() {
        let a = sample_points();
        let b: Vec<_> = a.iter().map(|p| p + Vector3::new(3.0, 0.0, 4.0)).collect();
        let rmsd = calculate_rmsd(&a, &b).unwrap();
        assert!((rmsd - 5.0).abs() < 1e-12);
    }

    #[test]
    fn superpose_pure_translation() {
        let from = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let to = vec![
            Point3::new(10.0, 20.0, 30.0),
            Point3::new(11.0, 20.0, 30.0),
            Point3::new(10.0, 21.0, 30.0),
        ];

        let fit = superpose(&from, &to).unwrap();

        assert!(fit.rotation.angle().abs() < 1e-9);
        assert!((fit.translation - Vector3::new(10.0, 20.0, 30.0)).norm() < 1e-9);
        assert!(fit.rmsd < 1e-9);
    }

    #[test]
    fn superpose_recovers_rotation_and_translation() {
        let reference = sample_points();
        let axis = Unit::new_normalize(Vector3::new(1.0, 2.0, -0.5));
        let rotation = Rotation3::from_axis_angle(&axis, 1.1);
        let shift = Vector3::new(-4.0, 7.5, 2.25);
        let mobile: Vec<_> = reference.iter().map(|p| rotation * p + shift).collect();

        let fit = superpose(&mobile, &reference).unwrap();

        assert!(fit.rmsd < 1e-9, "rmsd was {}", fit.rmsd);
        for (m, r) in mobile.iter().zip(reference.iter()) {
            assert!((fit.apply(m) - r).norm() < 1e-9);
        }
    }

    #[test]
    fn superpose_never_returns_a_reflection() {
        let reference = sample_points();
        let mirrored: Vec<_> = reference
            .iter()
            .map(|p| Point3::new(-p.x, p.y, p.z))
            .collect();

        let fit = superpose(&mirrored, &reference).unwrap();

        assert!((fit.rotation.matrix().determinant() - 1.0).abs() < 1e-9);
        assert!(fit.rmsd > 0.0);
    }

    #[test]
    fn superpose_reports_residual_rmsd_for_noisy_data() {
        let reference = sample_points();
        let mut mobile = reference.clone();
        mobile[0].x += 0.5;

        let fit = superpose(&mobile, &reference).unwrap();
        let naive = calculate_rmsd(&mobile, &reference).unwrap();

        assert!(fit.rmsd > 0.0);
        assert!(fit.rmsd <= naive + 1e-12);
    }

    #[test]
    fn superpose_rejects_bad_input() {
        let points = sample_points();
        assert_eq!(
            superpose(&points[..2], &points[..3]),
            Err(GeometryError::LengthMismatch {
                mobile: 2,
                reference: 3
            })
        );
        assert_eq!(superpose(&[], &[]), Err(GeometryError::Empty));
    }

    #[test]
    fn superpose_rejects_non_finite_coordinates() {
        let reference = sample_points();
        let mut mobile = reference.clone();
        mobile[3].y = f64::NAN;
        assert_eq!(
            superpose(&mobile, &reference),
            Err(GeometryError::NonFinite {
                set: "mobile",
                index: 3
            })
        );

        let mut reference_inf = reference.clone();
        reference_inf[0].z = f64::INFINITY;
        assert_eq!(
            superpose(&reference, &reference_inf),
            Err(GeometryError::NonFinite {
                set: "reference",
                index: 0
            })
        );
    }
}
