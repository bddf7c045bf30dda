// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document scanner: runs binarize -> contours -> select -> corners -> rectify
// with one fixed configuration, stopping at two operator checkpoints.

use image::RgbImage;
use pagewarp_bridge::{AutoProceed, OperatorConsole};
use pagewarp_core::error::{PagewarpError, Result};
use pagewarp_core::{Checkpoint, Decision, ScanConfig, TargetGeometry};
use tracing::{info, instrument, warn};

use super::binarize::binarize;
use super::contour::{Contour, extract_contours};
use super::corners::{CornerSet, approximate_corners, arrange_corners};
use super::rectify::rectify;
use super::select::select_document;
use crate::raster::annotate::{mark_corners, outline_contour};

/// Everything found in a photo before it is warped.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Number of external contours in the cleaned mask.
    pub contour_count: usize,
    /// Boundary chosen as the page.
    pub document: Contour,
    /// Page corners, already arranged for the destination rectangle.
    pub corners: CornerSet,
    /// Tolerance at which four corners appeared.
    pub epsilon: f64,
}

/// Result of a complete scan.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub detection: Detection,
    /// Rectified page with the configured target dimensions.
    pub page: RgbImage,
}

/// Pipeline driver holding a validated, immutable configuration.
///
/// ```ignore
/// let scanner = DocumentScanner::new(ScanConfig::default())?;
/// let photo = raster::decode("receipt.jpg")?;
/// let outcome = scanner.scan(&photo)?;
/// raster::encode(&outcome.page, "receipt-flat.png")?;
/// ```
#[derive(Debug, Clone)]
pub struct DocumentScanner {
    config: ScanConfig,
    target: TargetGeometry,
}

impl DocumentScanner {
    /// Validate `config` and build a scanner around it.
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        let target = config.target_geometry()?;
        Ok(Self { config, target })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Output page size.
    pub fn target(&self) -> TargetGeometry {
        self.target
    }

    // -- Stages ---------------------------------------------------------------

    /// Binarize `image` and pick the page boundary.
    ///
    /// Returns the number of candidate contours alongside the chosen one.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn locate_document(&self, image: &RgbImage) -> Result<(usize, Contour)> {
        let mask = binarize(image, self.config.threshold, self.config.kernel);
        let contours = extract_contours(&mask);
        let document = select_document(&contours).inspect_err(|_| {
            warn!("No document boundary in the image");
        })?;
        info!(
            contours = contours.len(),
            arc_length = document.arc_length(),
            "Document located"
        );
        Ok((contours.len(), document.clone()))
    }

    /// Reduce the page boundary to four arranged corners.
    pub fn find_corners(&self, document: &Contour) -> Result<(CornerSet, f64)> {
        let approximation = approximate_corners(document, &self.config.corner_search)?;
        let corners = arrange_corners(approximation.corners, self.config.corner_order);
        Ok((corners, approximation.epsilon))
    }

    /// Run every stage up to, but not including, the warp.
    pub fn detect(&self, image: &RgbImage) -> Result<Detection> {
        let (contour_count, document) = self.locate_document(image)?;
        let (corners, epsilon) = self.find_corners(&document)?;
        Ok(Detection {
            contour_count,
            document,
            corners,
            epsilon,
        })
    }

    /// Warp the page bounded by `corners` to the target size.
    pub fn extract(&self, image: &RgbImage, corners: &CornerSet) -> Result<RgbImage> {
        let page = rectify(image, corners, self.target)?;
        info!(
            width = page.width(),
            height = page.height(),
            "Page extracted"
        );
        Ok(page)
    }

    // -- Whole pipeline -------------------------------------------------------

    /// Full scan with both checkpoints approved automatically.
    pub fn scan(&self, image: &RgbImage) -> Result<ScanOutcome> {
        self.scan_with(image, &mut AutoProceed)
    }

    /// Full scan, asking `console` to confirm the detected page and then the
    /// detected corners. A `Cancel` at either point stops the scan before the
    /// next stage runs.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn scan_with(&self, image: &RgbImage, console: &mut dyn OperatorConsole) -> Result<ScanOutcome> {
        let (contour_count, document) = self.locate_document(image)?;
        confirm(
            console,
            Checkpoint::DocumentDetected,
            &outline_contour(image, &document),
        )?;

        let (corners, epsilon) = self.find_corners(&document)?;
        confirm(console, Checkpoint::CornersFound, &mark_corners(image, &corners))?;

        let page = self.extract(image, &corners)?;
        Ok(ScanOutcome {
            detection: Detection {
                contour_count,
                document,
                corners,
                epsilon,
            },
            page,
        })
    }
}

fn confirm(console: &mut dyn OperatorConsole, checkpoint: Checkpoint, preview: &RgbImage) -> Result<()> {
    match console.await_decision(checkpoint, preview)? {
        Decision::Proceed => Ok(()),
        Decision::Cancel => {
            warn!(%checkpoint, "Scan cancelled by operator");
            Err(PagewarpError::OperatorCancelled { checkpoint })
        }
    }
}

// -- Tests --------------------------------------------------------------------
