// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster I/O and preview drawing.

pub mod annotate;
pub mod codec;

pub use annotate::{mark_corners, outline_contour};
pub use codec::{decode, decode_bytes, encode};
