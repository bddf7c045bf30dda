// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Non-interactive console for batch runs and tests.

use image::RgbImage;
use pagewarp_core::error::Result;
use pagewarp_core::{Checkpoint, Decision};

use crate::traits::OperatorConsole;

/// Console that approves every checkpoint.
pub struct AutoProceed;

impl OperatorConsole for AutoProceed {
    fn await_decision(&mut self, checkpoint: Checkpoint, preview: &RgbImage) -> Result<Decision> {
        tracing::debug!(
            %checkpoint,
            width = preview.width(),
            height = preview.height(),
            "Checkpoint approved automatically"
        );
        Ok(Decision::Proceed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_proceeds() {
        let preview = RgbImage::new(4, 4);
        let mut console = AutoProceed;
        for checkpoint in [Checkpoint::DocumentDetected, Checkpoint::CornersFound] {
            assert_eq!(console.await_decision(checkpoint, &preview).unwrap(), Decision::Proceed);
        }
    }
}
