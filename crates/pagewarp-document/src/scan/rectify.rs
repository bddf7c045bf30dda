// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective rectification: map the four page corners onto an upright
// rectangle of the target size and resample with bilinear interpolation.

use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use nalgebra::Point2;
use pagewarp_core::TargetGeometry;
use pagewarp_core::error::{PagewarpError, Result};
use tracing::{debug, instrument};

use super::corners::CornerSet;
use super::homography::Homography;

/// Fill for output pixels whose source falls outside the photograph.
const OUTSIDE: Rgb<u8> = Rgb([0, 0, 0]);

/// Destination rectangle corners, in the canonical corner order:
/// top-right, top-left, bottom-left, bottom-right.
pub fn destination_corners(target: TargetGeometry) -> [Point2<f64>; 4] {
    let w = f64::from(target.width);
    let h = f64::from(target.height);
    [
        Point2::new(w, 0.0),
        Point2::new(0.0, 0.0),
        Point2::new(0.0, h),
        Point2::new(w, h),
    ]
}

/// Solve the homography taking `corners` onto the target rectangle.
pub fn page_homography(corners: &CornerSet, target: TargetGeometry) -> Result<Homography> {
    let src = corners.to_f64().map(|(x, y)| Point2::new(x, y));
    let homography = Homography::from_correspondences(&src, &destination_corners(target))?;
    if src.iter().any(|&p| homography.apply(p).is_none()) {
        return Err(PagewarpError::DegenerateCorners(
            "a corner maps to the line at infinity".into(),
        ));
    }
    debug!(matrix = ?homography.matrix(), "Homography solved");
    Ok(homography)
}

/// Warp the page bounded by `corners` into a `target`-sized image.
///
/// `corners[i]` lands on the i-th destination corner, so the corners must
/// already be in canonical order for an upright result.
#[instrument(skip(source, corners), fields(width = target.width, height = target.height))]
pub fn rectify(source: &RgbImage, corners: &CornerSet, target: TargetGeometry) -> Result<RgbImage> {
    let homography = page_homography(corners, target)?;
    let projection = Projection::from_matrix(homography.to_row_major_f32()).ok_or_else(|| {
        PagewarpError::DegenerateCorners("projection could not be inverted".into())
    })?;

    let mut page = RgbImage::new(target.width, target.height);
    warp_into(source, &projection, Interpolation::Bilinear, OUTSIDE, &mut page);

    debug!(
        source_w = source.width(),
        source_h = source.height(),
        "Page rectified"
    );
    Ok(page)
}
