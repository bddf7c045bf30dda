// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Trait definition for the operator confirmation seam.

use image::RgbImage;
use pagewarp_core::error::Result;
use pagewarp_core::{Checkpoint, Decision};

/// Blocking confirmation from whoever supervises a scan.
pub trait OperatorConsole {
    /// Show `preview` for `checkpoint` and wait for a decision.
    ///
    /// Returns `Decision::Cancel` if the operator declines; errors are for
    /// failures of the console itself (e.g. the preview could not be written).
    fn await_decision(&mut self, checkpoint: Checkpoint, preview: &RgbImage) -> Result<Decision>;
}
