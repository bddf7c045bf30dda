// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contour extraction. Only the outer silhouettes of foreground regions are
// kept; holes and anything nested inside them are dropped.

use imageproc::contours::{BorderType, find_contours};
use imageproc::geometry::arc_length;
use imageproc::point::Point;
use tracing::{debug, instrument};

use super::binarize::BinaryMask;

/// Closed boundary curve of a foreground region.
///
/// Built once from a mask and never edited; the closed-loop arc length is
/// computed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    points: Vec<Point<i32>>,
    arc_length: f64,
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        let arc_length = if points.is_empty() {
            0.0
        } else {
            arc_length(&points, true)
        };
        Self { points, arc_length }
    }

    pub fn points(&self) -> &[Point<i32>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Perimeter, including the closing edge from the last point to the first.
    pub fn arc_length(&self) -> f64 {
        self.arc_length
    }

    /// Length of the diagonal of the axis-aligned bounding box.
    pub fn bounding_diagonal(&self) -> f64 {
        let Some(first) = self.points.first() else {
            return 0.0;
        };
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &self.points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        let dx = f64::from(max_x - min_x);
        let dy = f64::from(max_y - min_y);
        (dx * dx + dy * dy).sqrt()
    }
}

/// Trace the outer boundaries of the mask's 8-connected foreground regions.
///
/// Returns an empty vector when the mask has no foreground.
#[instrument(skip(mask), fields(width = mask.width(), height = mask.height()))]
pub fn extract_contours(mask: &BinaryMask) -> Vec<Contour> {
    let borders = find_contours::<i32>(mask.as_gray());
    let total = borders.len();

    let contours: Vec<Contour> = borders
        .into_iter()
        .filter(|border| border.border_type == BorderType::Outer && border.parent.is_none())
        .map(|border| Contour::new(compact(&border.points)))
        .collect();

    debug!(
        borders = total,
        external = contours.len(),
        "Contours extracted"
    );
    contours
}

/// Drop vertices that sit in the middle of a straight run.
///
/// A point is redundant when the step into it and the step out of it point
/// the same way; removing it leaves the polygon unchanged. Consecutive
/// duplicates are merged first.
fn compact(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let mut ring: Vec<Point<i32>> = Vec::with_capacity(points.len());
    for &p in points {
        if ring.last() != Some(&p) {
            ring.push(p);
        }
    }
    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }

    let n = ring.len();
    if n < 3 {
        return ring;
    }

    let kept: Vec<Point<i32>> = (0..n)
        .filter(|&i| {
            let prev = ring[(i + n - 1) % n];
            let cur = ring[i];
            let next = ring[(i + 1) % n];
            let (ax, ay) = (cur.x - prev.x, cur.y - prev.y);
            let (bx, by) = (next.x - cur.x, next.y - cur.y);
            let cross = ax * by - ay * bx;
            let dot = ax * bx + ay * by;
            !(cross == 0 && dot > 0)
        })
        .map(|i| ring[i])
        .collect();

    if kept.is_empty() { ring } else { kept }
}

// -- Tests --------------------------------------------------------------------
