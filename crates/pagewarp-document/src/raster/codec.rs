// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image file decoding and encoding. Every pipeline stage works on 8-bit RGB,
// so inputs are converted on the way in.

use std::path::Path;

use image::RgbImage;
use pagewarp_core::error::{PagewarpError, Result};
use tracing::{debug, info, instrument};

/// Decode an image file of any supported format into 8-bit RGB.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn decode(path: impl AsRef<Path>) -> Result<RgbImage> {
    let img = image::open(path.as_ref()).map_err(|err| {
        PagewarpError::ImageError(format!(
            "failed to open {}: {}",
            path.as_ref().display(),
            err
        ))
    })?;
    info!(width = img.width(), height = img.height(), "Image loaded");
    Ok(img.into_rgb8())
}

/// Decode encoded bytes (JPEG, PNG, etc.) into 8-bit RGB.
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn decode_bytes(data: &[u8]) -> Result<RgbImage> {
    let img = image::load_from_memory(data)
        .map_err(|err| PagewarpError::ImageError(format!("failed to decode image: {}", err)))?;
    debug!(
        width = img.width(),
        height = img.height(),
        "Image decoded from bytes"
    );
    Ok(img.into_rgb8())
}

/// Write `image` to `path`. The format is chosen from the file extension.
#[instrument(skip(image), fields(path = %path.as_ref().display()))]
pub fn encode(image: &RgbImage, path: impl AsRef<Path>) -> Result<()> {
    image.save(path.as_ref()).map_err(|err| {
        PagewarpError::ImageError(format!(
            "failed to save image to {}: {}",
            path.as_ref().display(),
            err
        ))
    })?;
    info!(
        width = image.width(),
        height = image.height(),
        "Image saved"
    );
    Ok(())
}
