// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pagewarp: operator confirmation bridges.
//
// The scan pipeline stops twice to let a person confirm what it found. This
// crate defines that seam and the two ways of answering it: automatically, or
// from a terminal.

pub mod stub;
pub mod terminal;
pub mod traits;

use std::path::PathBuf;

pub use stub::AutoProceed;
pub use terminal::TerminalConsole;
pub use traits::OperatorConsole;

/// Pick the operator console for this run.
///
/// Interactive runs prompt on stdin/stderr and, when `preview_dir` is set,
/// write each checkpoint preview there so it can be opened in a viewer.
/// Everything else proceeds without asking.
pub fn operator_console(interactive: bool, preview_dir: Option<PathBuf>) -> Box<dyn OperatorConsole> {
    if interactive {
        Box::new(TerminalConsole::stdio(preview_dir))
    } else {
        Box::new(AutoProceed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use pagewarp_core::{Checkpoint, Decision};

    #[test]
    fn non_interactive_console_proceeds_everywhere() {
        let mut console = operator_console(false, None);
        let preview = RgbImage::new(4, 4);
        for checkpoint in [Checkpoint::DocumentDetected, Checkpoint::CornersFound] {
            assert_eq!(
                console.await_decision(checkpoint, &preview).unwrap(),
                Decision::Proceed
            );
        }
    }
}
