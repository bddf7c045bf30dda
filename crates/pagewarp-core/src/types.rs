// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Pagewarp scan pipeline.

use serde::{Deserialize, Serialize};

/// The two points at which an operator may stop a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Checkpoint {
    /// The document outline has been selected; corners are not yet computed.
    DocumentDetected,
    /// The four corners are known; the page has not been extracted yet.
    CornersFound,
}

impl std::fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DocumentDetected => write!(f, "document detection"),
            Self::CornersFound => write!(f, "corner review"),
        }
    }
}

/// Outcome of an operator checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Proceed,
    Cancel,
}

/// Output page proportions as `numerator : denominator` (height : width).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub numerator: u32,
    pub denominator: u32,
}

impl AspectRatio {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Parse the `N:D` form used on the command line.
    pub fn parse(text: &str) -> Option<Self> {
        let (num, den) = text.split_once(':')?;
        let numerator = num.trim().parse().ok()?;
        let denominator = den.trim().parse().ok()?;
        Some(Self::new(numerator, denominator))
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::new(10, 7)
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.numerator, self.denominator)
    }
}

/// Fixed size of the rectified page, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetGeometry {
    pub width: u32,
    pub height: u32,
}

impl TargetGeometry {
    /// Derive the page height from `width` and `ratio` with integer division.
    ///
    /// Returns `None` when the ratio has a zero denominator or the derived
    /// height does not fit in a `u32`.
    pub fn from_ratio(width: u32, ratio: AspectRatio) -> Option<Self> {
        if ratio.denominator == 0 {
            return None;
        }
        let height = u64::from(width) * u64::from(ratio.numerator) / u64::from(ratio.denominator);
        let height = u32::try_from(height).ok()?;
        Some(Self { width, height })
    }
}

/// Size of the elliptical structuring element used by the noise opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelSize {
    pub width: u32,
    pub height: u32,
}

impl Default for KernelSize {
    fn default() -> Self {
        Self {
            width: 5,
            height: 5,
        }
    }
}

/// How detected corners are matched to the output rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CornerOrder {
    /// Sort corners around their centroid so the top-left corner of the
    /// photographed page lands top-left in the output.
    #[default]
    Canonical,
    /// Keep the contour's traversal order.
    Traversal,
}
