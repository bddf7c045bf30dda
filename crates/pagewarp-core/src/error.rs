// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Pagewarp.

use thiserror::Error;

use crate::types::Checkpoint;

/// Top-level error type for all Pagewarp operations.
///
/// Every variant is terminal for the current scan: nothing in the pipeline
/// retries on its own.
#[derive(Debug, Error)]
pub enum PagewarpError {
    // -- Detection errors --
    #[error("no document contour found in the image")]
    NoContourFound,

    #[error(
        "corner approximation did not converge: no epsilon up to {epsilon_max:.2} gave 4 corners (last attempt kept {vertex_count})"
    )]
    ApproximationDidNotConverge { epsilon_max: f64, vertex_count: usize },

    // -- Rectification errors --
    #[error("document corners are degenerate: {0}")]
    DegenerateCorners(String),

    // -- Operator --
    #[error("operator cancelled the scan at {checkpoint}")]
    OperatorCancelled { checkpoint: Checkpoint },

    // -- Codec / configuration --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PagewarpError>;
