// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Checkpoint previews. Both functions draw on a copy; the source photo is
// never touched.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};
use imageproc::point::Point;

use crate::scan::contour::Contour;
use crate::scan::corners::CornerSet;

/// Marker color for outlines and corners.
pub const MARK_COLOR: Rgb<u8> = Rgb([255, 0, 100]);
/// Radius of the disc drawn at each corner.
pub const CORNER_RADIUS: i32 = 20;
/// Width of the lines joining corners.
pub const LINE_THICKNESS: i32 = 3;

/// Copy of `image` with `contour` traced as a closed outline.
pub fn outline_contour(image: &RgbImage, contour: &Contour) -> RgbImage {
    let mut preview = image.clone();
    draw_closed_path(&mut preview, contour.points(), 1);
    preview
}

/// Copy of `image` with a disc on every corner and a thick line between
/// consecutive corners.
pub fn mark_corners(image: &RgbImage, corners: &CornerSet) -> RgbImage {
    let mut preview = image.clone();
    draw_closed_path(&mut preview, corners.points(), LINE_THICKNESS);
    for p in corners.points() {
        draw_filled_circle_mut(&mut preview, (p.x, p.y), CORNER_RADIUS, MARK_COLOR);
    }
    preview
}

/// Draw segments `p[i] -> p[i+1]` including the closing one. Thickness is
/// built from parallel one-pixel lines offset across the dominant axis.
fn draw_closed_path(image: &mut RgbImage, points: &[Point<i32>], thickness: i32) {
    let n = points.len();
    if n == 0 {
        return;
    }
    if n == 1 {
        let p = points[0];
        if p.x >= 0 && p.y >= 0 && (p.x as u32) < image.width() && (p.y as u32) < image.height() {
            image.put_pixel(p.x as u32, p.y as u32, MARK_COLOR);
        }
        return;
    }

    let half = thickness.max(1) / 2;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let steep = (b.y - a.y).abs() > (b.x - a.x).abs();
        for k in -half..=half {
            let (ox, oy) = if steep { (k, 0) } else { (0, k) };
            draw_line_segment_mut(
                image,
                ((a.x + ox) as f32, (a.y + oy) as f32),
                ((b.x + ox) as f32, (b.y + oy) as f32),
                MARK_COLOR,
            );
        }
    }
}
