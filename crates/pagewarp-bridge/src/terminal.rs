// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line-based terminal console. There is no preview window: previews are
// written as PNG files the operator can open while the prompt waits.

use std::io::{BufRead, StdinLock, Stderr, Write};
use std::path::{Path, PathBuf};

use image::RgbImage;
use pagewarp_core::error::{PagewarpError, Result};
use pagewarp_core::{Checkpoint, Decision};
use tracing::{info, warn};

use crate::traits::OperatorConsole;

/// Prompts on `output` and reads answers from `input`, one line each.
pub struct TerminalConsole<R, W> {
    input: R,
    output: W,
    preview_dir: Option<PathBuf>,
}

impl TerminalConsole<StdinLock<'static>, Stderr> {
    /// Console bound to the process's stdin and stderr.
    pub fn stdio(preview_dir: Option<PathBuf>) -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr(), preview_dir)
    }
}

impl<R: BufRead, W: Write> TerminalConsole<R, W> {
    pub fn new(input: R, output: W, preview_dir: Option<PathBuf>) -> Self {
        Self {
            input,
            output,
            preview_dir,
        }
    }

    fn write_preview(&self, checkpoint: Checkpoint, preview: &RgbImage) -> Result<Option<PathBuf>> {
        let Some(dir) = &self.preview_dir else {
            return Ok(None);
        };
        let path = preview_path(dir, checkpoint);
        preview.save(&path).map_err(|err| {
            PagewarpError::ImageError(format!("failed to write preview {}: {}", path.display(), err))
        })?;
        info!(path = %path.display(), %checkpoint, "Preview written");
        Ok(Some(path))
    }
}

impl<R: BufRead, W: Write> OperatorConsole for TerminalConsole<R, W> {
    fn await_decision(&mut self, checkpoint: Checkpoint, preview: &RgbImage) -> Result<Decision> {
        let preview_path = self.write_preview(checkpoint, preview)?;
        if let Some(path) = &preview_path {
            writeln!(self.output, "Preview: {}", path.display())?;
        }

        loop {
            write!(self.output, "{} [Enter/y = continue, n/q = cancel]: ", prompt(checkpoint))?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                warn!(%checkpoint, "Input closed while waiting for operator; cancelling");
                return Ok(Decision::Cancel);
            }
            match parse_answer(&line) {
                Some(decision) => return Ok(decision),
                None => writeln!(self.output, "Please answer y or n.")?,
            }
        }
    }
}

fn prompt(checkpoint: Checkpoint) -> &'static str {
    match checkpoint {
        Checkpoint::DocumentDetected => "Document found. Select it automatically?",
        Checkpoint::CornersFound => "Corners marked. Extract the document?",
    }
}

fn preview_path(dir: &Path, checkpoint: Checkpoint) -> PathBuf {
    let name = match checkpoint {
        Checkpoint::DocumentDetected => "document.png",
        Checkpoint::CornersFound => "corners.png",
    };
    dir.join(name)
}

/// Map one line of operator input to a decision. `None` means ask again.
fn parse_answer(line: &str) -> Option<Decision> {
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "y" | "yes" | "x" => Some(Decision::Proceed),
        "n" | "no" | "q" | "quit" | "esc" => Some(Decision::Cancel),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(input: &str) -> TerminalConsole<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalConsole::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), None)
    }

    #[test]
    fn answers_are_parsed() {
        assert_eq!(parse_answer("\n"), Some(Decision::Proceed));
        assert_eq!(parse_answer(" Yes \n"), Some(Decision::Proceed));
        assert_eq!(parse_answer("x"), Some(Decision::Proceed));
        assert_eq!(parse_answer("q\n"), Some(Decision::Cancel));
        assert_eq!(parse_answer("ESC"), Some(Decision::Cancel));
        assert_eq!(parse_answer("maybe"), None);
    }

    #[test]
    fn reprompts_until_valid_answer() {
        let mut console = console("what\nn\n");
        let preview = RgbImage::new(2, 2);
        let decision = console
            .await_decision(Checkpoint::CornersFound, &preview)
            .unwrap();
        assert_eq!(decision, Decision::Cancel);

        let transcript = String::from_utf8(console.output).unwrap();
        assert_eq!(transcript.matches("Extract the document?").count(), 2);
        assert!(transcript.contains("Please answer y or n."));
    }

    #[test]
    fn closed_input_cancels() {
        let mut console = console("");
        let preview = RgbImage::new(2, 2);
        let decision = console
            .await_decision(Checkpoint::DocumentDetected, &preview)
            .unwrap();
        assert_eq!(decision, Decision::Cancel);
    }

    #[test]
    fn preview_is_written_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut console = TerminalConsole::new(
            Cursor::new(b"y\n".to_vec()),
            Vec::new(),
            Some(dir.path().to_path_buf()),
        );
        let preview = RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30]));
        let decision = console
            .await_decision(Checkpoint::DocumentDetected, &preview)
            .unwrap();
        assert_eq!(decision, Decision::Proceed);

        let written = image::open(dir.path().join("document.png")).unwrap().to_rgb8();
        assert_eq!(written, preview);
    }
}
