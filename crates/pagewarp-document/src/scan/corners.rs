// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Corner approximation: grow a Douglas-Peucker tolerance until the document
// contour collapses to exactly four vertices, then put those vertices in the
// order the rectifier expects.

use imageproc::geometry::arc_length;
use imageproc::point::Point;
use pagewarp_core::config::CornerSearch;
use pagewarp_core::error::{PagewarpError, Result};
use pagewarp_core::CornerOrder;
use tracing::{debug, info, instrument, warn};

use super::contour::Contour;

/// Exactly four corner points of a document outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CornerSet([Point<i32>; 4]);

impl CornerSet {
    pub fn new(points: [Point<i32>; 4]) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[Point<i32>; 4] {
        &self.0
    }

    /// Closed perimeter of the quadrilateral.
    pub fn arc_length(&self) -> f64 {
        arc_length(&self.0, true)
    }

    /// Corners as floating-point `(x, y)` pairs.
    pub fn to_f64(&self) -> [(f64, f64); 4] {
        self.0.map(|p| (f64::from(p.x), f64::from(p.y)))
    }
}

impl TryFrom<&[Point<i32>]> for CornerSet {
    type Error = PagewarpError;

    fn try_from(points: &[Point<i32>]) -> Result<Self> {
        let array: [Point<i32>; 4] = points.try_into().map_err(|_| {
            PagewarpError::DegenerateCorners(format!("expected 4 corners, got {}", points.len()))
        })?;
        Ok(Self(array))
    }
}

/// Result of a successful tolerance search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Approximation {
    /// Corners in contour traversal order.
    pub corners: CornerSet,
    /// Tolerance at which exactly four vertices remained.
    pub epsilon: f64,
    /// Number of tolerances tried.
    pub attempts: usize,
}

/// Reduce `contour` to four corners.
///
/// Tolerances `epsilon_start + k * epsilon_step` are tried in turn up to
/// `epsilon_max` (the contour's bounding-box diagonal when unset). Larger
/// tolerances never add vertices, so the search also gives up as soon as
/// fewer than four remain.
#[instrument(skip(contour), fields(points = contour.len()))]
pub fn approximate_corners(contour: &Contour, search: &CornerSearch) -> Result<Approximation> {
    let epsilon_max = search
        .epsilon_max
        .unwrap_or_else(|| contour.bounding_diagonal())
        .max(search.epsilon_start);

    let mut vertex_count = contour.len();
    if vertex_count < 4 {
        warn!(vertex_count, "Contour has too few points for four corners");
        return Err(PagewarpError::ApproximationDidNotConverge {
            epsilon_max,
            vertex_count,
        });
    }

    let mut attempts = 0usize;
    loop {
        let epsilon = search.epsilon_start + search.epsilon_step * attempts as f64;
        if epsilon > epsilon_max {
            break;
        }
        attempts += 1;

        let polygon = simplify_closed(contour.points(), epsilon);
        vertex_count = polygon.len();
        debug!(epsilon, vertex_count, "Approximation attempt");

        if vertex_count == 4 {
            let corners = CornerSet::try_from(polygon.as_slice())?;
            info!(epsilon, attempts, corners = ?corners.points(), "Four corners found");
            return Ok(Approximation {
                corners,
                epsilon,
                attempts,
            });
        }
        if vertex_count < 4 {
            break;
        }
    }

    warn!(epsilon_max, vertex_count, attempts, "Corner search did not converge");
    Err(PagewarpError::ApproximationDidNotConverge {
        epsilon_max,
        vertex_count,
    })
}

/// Apply the configured corner ordering.
pub fn arrange_corners(corners: CornerSet, order: CornerOrder) -> CornerSet {
    match order {
        CornerOrder::Canonical => order_corners(corners),
        CornerOrder::Traversal => corners,
    }
}

/// Put corners in destination order: top-right, top-left, bottom-left,
/// bottom-right.
///
/// Points are sorted by angle around their centroid (y grows downwards, so
/// this is visual clockwise order) and the cycle is rotated to start at the
/// point with the smallest `x + y`.
pub fn order_corners(corners: CornerSet) -> CornerSet {
    let points = *corners.points();
    let cx = points.iter().map(|p| f64::from(p.x)).sum::<f64>() / 4.0;
    let cy = points.iter().map(|p| f64::from(p.y)).sum::<f64>() / 4.0;

    let mut sorted = points;
    sorted.sort_by(|a, b| {
        let angle_a = (f64::from(a.y) - cy).atan2(f64::from(a.x) - cx);
        let angle_b = (f64::from(b.y) - cy).atan2(f64::from(b.x) - cx);
        angle_a.total_cmp(&angle_b)
    });

    let mut start = 0;
    for (i, p) in sorted.iter().enumerate() {
        let best = sorted[start];
        if p.x + p.y < best.x + best.y {
            start = i;
        }
    }

    let top_left = sorted[start];
    let top_right = sorted[(start + 1) % 4];
    let bottom_right = sorted[(start + 2) % 4];
    let bottom_left = sorted[(start + 3) % 4];
    CornerSet([top_right, top_left, bottom_left, bottom_right])
}

// -- Polygon simplification ---------------------------------------------------

/// Douglas-Peucker simplification of a closed curve.
///
/// The curve is split at two far-apart anchors: the point farthest from the
/// first point, and the point farthest from that one. Each of the two chains
/// between them is simplified on its own. Output keeps traversal order.
pub fn simplify_closed(points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let a = farthest_from(points, points[0]);
    let b = farthest_from(points, points[a]);
    if a == b {
        return vec![points[a]];
    }
    let (lo, hi) = (a.min(b), a.max(b));

    let forward = simplify_open(&points[lo..=hi], epsilon);
    let wrapped: Vec<Point<i32>> = points[hi..].iter().chain(&points[..=lo]).copied().collect();
    let backward = simplify_open(&wrapped, epsilon);

    // `forward` runs lo..hi and `backward` runs hi..lo; drop the shared ends.
    let mut polygon = forward;
    polygon.extend_from_slice(&backward[1..backward.len() - 1]);
    polygon
}

/// Douglas-Peucker simplification of an open chain; both ends are kept.
fn simplify_open(chain: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    let n = chain.len();
    if n <= 2 {
        return chain.to_vec();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0usize, n - 1)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let mut max_dist = 0.0;
        let mut index = start;
        for (i, &p) in chain.iter().enumerate().take(end).skip(start + 1) {
            let d = segment_distance(p, chain[start], chain[end]);
            if d > max_dist {
                max_dist = d;
                index = i;
            }
        }
        if max_dist > epsilon {
            keep[index] = true;
            stack.push((index, end));
            stack.push((start, index));
        }
    }

    chain
        .iter()
        .zip(&keep)
        .filter_map(|(&p, &k)| k.then_some(p))
        .collect()
}

/// Index of the first point at maximum distance from `origin`.
fn farthest_from(points: &[Point<i32>], origin: Point<i32>) -> usize {
    let mut best = 0;
    let mut best_dist = -1i64;
    for (i, p) in points.iter().enumerate() {
        let dx = i64::from(p.x - origin.x);
        let dy = i64::from(p.y - origin.y);
        let dist = dx * dx + dy * dy;
        if dist > best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}

/// Euclidean distance from `p` to the segment `a`-`b`.
fn segment_distance(p: Point<i32>, a: Point<i32>, b: Point<i32>) -> f64 {
    let (px, py) = (f64::from(p.x), f64::from(p.y));
    let (ax, ay) = (f64::from(a.x), f64::from(a.y));
    let (bx, by) = (f64::from(b.x), f64::from(b.y));
    let (dx, dy) = (bx - ax, by - ay);
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return ((px - ax).powi(2) + (py - ay).powi(2)).sqrt();
    }
    let t = (((px - ax) * dx + (py - ay) * dy) / len2).clamp(0.0, 1.0);
    let (qx, qy) = (ax + t * dx, ay + t * dy);
    ((px - qx).powi(2) + (py - qy).powi(2)).sqrt()
}

// -- Tests --------------------------------------------------------------------
