// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline: binarization, contour extraction, page selection, corner
// search, and perspective rectification.

pub mod binarize;
pub mod contour;
pub mod corners;
pub mod homography;
pub mod pipeline;
pub mod rectify;
pub mod select;

pub use binarize::{BinaryMask, StructuringElement, binarize};
pub use contour::{Contour, extract_contours};
pub use corners::{Approximation, CornerSet, approximate_corners, arrange_corners, order_corners};
pub use homography::Homography;
pub use pipeline::{Detection, DocumentScanner, ScanOutcome};
pub use rectify::{destination_corners, rectify};
pub use select::select_document;
