// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagewarp-document: finds the page in a photo and flattens it.
//
// Provides image decoding/encoding and preview drawing (`raster`), and the
// scanning pipeline (`scan`): binarize, trace contours, pick the page, reduce
// it to four corners, and warp it onto an upright rectangle.

pub mod raster;
pub mod scan;

// Re-export the primary types so callers can use `pagewarp_document::DocumentScanner` etc.
pub use scan::{CornerSet, Detection, DocumentScanner, ScanOutcome};
