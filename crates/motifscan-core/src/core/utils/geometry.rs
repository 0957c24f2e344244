use nalgebra::{Matrix3, Point3, Vector3};

/// The optimal rigid-body transform taking a moving point set onto a fixed one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Superposition {
    pub rotation: Matrix3<f64>,
    pub translation: Vector3<f64>,
    pub rmsd: f64,
}

impl Superposition {
    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation * point.coords + self.translation)
    }
}

pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Some(Point3::from(sum / points.len() as f64))
}

/// Plain RMSD between two paired point sets, without any superposition.
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

/// Least-squares rigid superposition of `moving` onto `fixed` (Kabsch).
///
/// Points are paired by index. The rotation is corrected so it never contains a
/// reflection. Returns `None` when the sets differ in length, are empty, or the SVD
/// does not converge.
pub fn superpose(fixed: &[Point3<f64>], moving: &[Point3<f64>]) -> Option<Superposition> {
    if fixed.len() != moving.len() || fixed.is_empty() {
        return None;
    }
    let fixed_center = centroid(fixed)?;
    let moving_center = centroid(moving)?;

    let mut covariance = Matrix3::<f64>::zeros();
    for (m, f) in moving.iter().zip(fixed.iter()) {
        covariance += (m - moving_center) * (f - fixed_center).transpose();
    }

    let svd = covariance.svd(true, true);
    let u = svd.u?;
    let v_t = svd.v_t?;

    let handedness = (v_t.transpose() * u.transpose()).determinant();
    let mut correction = Matrix3::<f64>::identity();
    if handedness < 0.0 {
        correction[(2, 2)] = -1.0;
    }
    let rotation = v_t.transpose() * correction * u.transpose();
    let translation = fixed_center.coords - rotation * moving_center.coords;

    let squared_dist_sum: f64 = moving
        .iter()
        .zip(fixed.iter())
        .map(|(m, f)| (Point3::from(rotation * m.coords + translation) - f).norm_squared())
        .sum();

    Some(Superposition {
        rotation,
        translation,
        rmsd: (squared_dist_sum / fixed.len() as f64).sqrt(),
    })
}

/// RMSD after optimal rigid superposition, or `None` if the sets are not comparable.
pub fn superposition_rmsd(fixed: &[Point3<f64>], moving: &[Point3<f64>]) -> Option<f64> {
    superpose(fixed, moving).map(|s| s.rmsd)
}
