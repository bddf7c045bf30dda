// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Exact four-point homography estimation.

use nalgebra::{Matrix3, Point2, SMatrix, SVector, Vector3};
use pagewarp_core::error::{PagewarpError, Result};

/// Collinearity tolerance, relative to the squared extent of the point set.
const COLLINEAR_TOLERANCE: f64 = 1e-9;

/// Projective transform `dst ~ H * src`, scaled so that `h33 = 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography {
    h: Matrix3<f64>,
}

impl Homography {
    /// Solve for the transform taking each `src[i]` to `dst[i]`.
    ///
    /// Fails with `DegenerateCorners` when three points of either set are
    /// collinear (or coincide), or when the solved matrix is singular.
    pub fn from_correspondences(src: &[Point2<f64>; 4], dst: &[Point2<f64>; 4]) -> Result<Self> {
        ensure_general_position(src, "source")?;
        ensure_general_position(dst, "destination")?;

        let (src_n, t_src) = normalize_points(src);
        let (dst_n, t_dst) = normalize_points(dst);

        // Unknowns: [h11 h12 h13 h21 h22 h23 h31 h32], with h33 = 1.
        // For each correspondence (x, y) -> (u, v):
        //   h11 x + h12 y + h13 - u h31 x - u h32 y = u
        //   h21 x + h22 y + h23 - v h31 x - v h32 y = v
        let mut a = SMatrix::<f64, 8, 8>::zeros();
        let mut b = SVector::<f64, 8>::zeros();
        for k in 0..4 {
            let (x, y) = (src_n[k].x, src_n[k].y);
            let (u, v) = (dst_n[k].x, dst_n[k].y);

            let r0 = 2 * k;
            a[(r0, 0)] = x;
            a[(r0, 1)] = y;
            a[(r0, 2)] = 1.0;
            a[(r0, 6)] = -u * x;
            a[(r0, 7)] = -u * y;
            b[r0] = u;

            let r1 = 2 * k + 1;
            a[(r1, 3)] = x;
            a[(r1, 4)] = y;
            a[(r1, 5)] = 1.0;
            a[(r1, 6)] = -v * x;
            a[(r1, 7)] = -v * y;
            b[r1] = v;
        }

        let x = a
            .lu()
            .solve(&b)
            .ok_or_else(|| PagewarpError::DegenerateCorners("correspondence system is singular".into()))?;

        let hn = Matrix3::new(
            x[0], x[1], x[2], //
            x[3], x[4], x[5], //
            x[6], x[7], 1.0,
        );

        let t_dst_inv = t_dst
            .try_inverse()
            .ok_or_else(|| PagewarpError::DegenerateCorners("destination normalization failed".into()))?;
        let h = t_dst_inv * hn * t_src;

        let scale = h[(2, 2)];
        if scale.abs() < 1e-12 {
            return Err(PagewarpError::DegenerateCorners(
                "transform maps the source origin to infinity".into(),
            ));
        }
        let h = h / scale;
        if h.try_inverse().is_none() {
            return Err(PagewarpError::DegenerateCorners("transform is not invertible".into()));
        }

        Ok(Self { h })
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.h
    }

    /// Map a point. `None` if it lands on the line at infinity.
    pub fn apply(&self, p: Point2<f64>) -> Option<Point2<f64>> {
        let v = self.h * Vector3::new(p.x, p.y, 1.0);
        if v[2].abs() < 1e-12 {
            return None;
        }
        Some(Point2::new(v[0] / v[2], v[1] / v[2]))
    }

    /// Row-major single-precision entries, as `imageproc` projections take.
    pub fn to_row_major_f32(&self) -> [f32; 9] {
        let m = &self.h;
        [
            m[(0, 0)] as f32,
            m[(0, 1)] as f32,
            m[(0, 2)] as f32,
            m[(1, 0)] as f32,
            m[(1, 1)] as f32,
            m[(1, 2)] as f32,
            m[(2, 0)] as f32,
            m[(2, 1)] as f32,
            m[(2, 2)] as f32,
        ]
    }
}

/// Reject point sets where any three points are collinear.
fn ensure_general_position(pts: &[Point2<f64>; 4], label: &str) -> Result<()> {
    let mut extent = 0.0f64;
    for i in 0..4 {
        for j in i + 1..4 {
            extent = extent.max((pts[j] - pts[i]).norm_squared());
        }
    }

    const TRIPLES: [(usize, usize, usize); 4] = [(0, 1, 2), (0, 1, 3), (0, 2, 3), (1, 2, 3)];
    for (i, j, k) in TRIPLES {
        let ab = pts[j] - pts[i];
        let ac = pts[k] - pts[i];
        let cross = ab.x * ac.y - ab.y * ac.x;
        if cross.abs() <= COLLINEAR_TOLERANCE * extent {
            return Err(PagewarpError::DegenerateCorners(format!(
                "{label} points {i}, {j} and {k} are collinear"
            )));
        }
    }
    Ok(())
}

/// Hartley normalization: translate to the centroid and scale so the mean
/// distance from it is sqrt(2).
fn normalize_points(pts: &[Point2<f64>; 4]) -> ([Point2<f64>; 4], Matrix3<f64>) {
    let cx = pts.iter().map(|p| p.x).sum::<f64>() / 4.0;
    let cy = pts.iter().map(|p| p.y).sum::<f64>() / 4.0;
    let mean_dist = pts
        .iter()
        .map(|p| ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt())
        .sum::<f64>()
        / 4.0;

    let s = if mean_dist > 1e-12 {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };
    let t = Matrix3::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0);

    let out = pts.map(|p| {
        let v = t * Vector3::new(p.x, p.y, 1.0);
        Point2::new(v[0], v[1])
    });
    (out, t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pts(raw: [(f64, f64); 4]) -> [Point2<f64>; 4] {
        raw.map(|(x, y)| Point2::new(x, y))
    }

    #[test]
    fn maps_each_correspondence_exactly() {
        let src = pts([(320.0, 40.0), (60.0, 70.0), (40.0, 250.0), (350.0, 270.0)]);
        let dst = pts([(500.0, 0.0), (0.0, 0.0), (0.0, 714.0), (500.0, 714.0)]);
        let h = Homography::from_correspondences(&src, &dst).unwrap();

        for (s, d) in src.iter().zip(&dst) {
            let mapped = h.apply(*s).unwrap();
            assert_relative_eq!(mapped.x, d.x, epsilon = 1e-6);
            assert_relative_eq!(mapped.y, d.y, epsilon = 1e-6);
        }
        assert_relative_eq!(h.matrix()[(2, 2)], 1.0);
    }

    #[test]
    fn same_square_gives_identity() {
        let square = pts([(10.0, 0.0), (0.0, 0.0), (0.0, 10.0), (10.0, 10.0)]);
        let h = Homography::from_correspondences(&square, &square).unwrap();
        assert_relative_eq!(*h.matrix(), Matrix3::identity(), epsilon = 1e-9);
    }

    #[test]
    fn reverse_solve_undoes_mapping() {
        let src = pts([(300.0, 20.0), (10.0, 35.0), (25.0, 410.0), (290.0, 380.0)]);
        let dst = pts([(200.0, 0.0), (0.0, 0.0), (0.0, 280.0), (200.0, 280.0)]);
        let h = Homography::from_correspondences(&src, &dst).unwrap();
        let inv = Homography::from_correspondences(&dst, &src).unwrap();

        let p = Point2::new(150.0, 200.0);
        let back = inv.apply(h.apply(p).unwrap()).unwrap();
        assert_relative_eq!(back.x, p.x, epsilon = 1e-6);
        assert_relative_eq!(back.y, p.y, epsilon = 1e-6);
    }

    #[test]
    fn collinear_source_is_degenerate() {
        let src = pts([(0.0, 0.0), (50.0, 0.0), (100.0, 0.0), (50.0, 80.0)]);
        let dst = pts([(10.0, 0.0), (0.0, 0.0), (0.0, 10.0), (10.0, 10.0)]);
        let err = Homography::from_correspondences(&src, &dst).unwrap_err();
        assert!(matches!(err, PagewarpError::DegenerateCorners(_)));
    }

    #[test]
    fn repeated_point_is_degenerate() {
        let src = pts([(5.0, 5.0), (5.0, 5.0), (0.0, 10.0), (10.0, 10.0)]);
        let dst = pts([(10.0, 0.0), (0.0, 0.0), (0.0, 10.0), (10.0, 10.0)]);
        assert!(Homography::from_correspondences(&src, &dst).is_err());
    }
}
