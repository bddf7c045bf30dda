// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan configuration. Set once before a scan starts and never mutated by the
// pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PagewarpError, Result};
use crate::types::{AspectRatio, CornerOrder, KernelSize, TargetGeometry};

/// Largest structuring element side the morphology backend accepts.
pub const MAX_KERNEL_SIDE: u32 = 511;

/// Settings for one document scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Page proportions (height : width) of the extracted document.
    pub aspect_ratio: AspectRatio,
    /// Width of the extracted document in pixels; height follows the ratio.
    pub target_width: u32,
    /// Gray level (0-255) at or above which a pixel counts as paper.
    pub threshold: u8,
    /// Elliptical structuring element for the noise-removing opening.
    pub kernel: KernelSize,
    /// Bounds of the corner tolerance search.
    pub corner_search: CornerSearch,
    /// How detected corners are matched to the output rectangle.
    pub corner_order: CornerOrder,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: AspectRatio::default(),
            target_width: 500,
            threshold: 200,
            kernel: KernelSize::default(),
            corner_search: CornerSearch::default(),
            corner_order: CornerOrder::default(),
        }
    }
}

/// Tolerance search used to reduce a contour to four corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CornerSearch {
    /// First tolerance tried, in pixels.
    pub epsilon_start: f64,
    /// Increment between attempts, in pixels.
    pub epsilon_step: f64,
    /// Largest tolerance tried. `None` uses the contour's bounding-box diagonal.
    pub epsilon_max: Option<f64>,
}

impl Default for CornerSearch {
    fn default() -> Self {
        Self {
            epsilon_start: 1.0,
            epsilon_step: 0.1,
            epsilon_max: None,
        }
    }
}

impl ScanConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        let ratio = self.aspect_ratio;
        if ratio.numerator == 0 || ratio.denominator == 0 {
            return Err(PagewarpError::InvalidConfig(format!(
                "aspect ratio {ratio} must have non-zero terms"
            )));
        }
        if self.target_width == 0 {
            return Err(PagewarpError::InvalidConfig(
                "target width must be at least 1 pixel".into(),
            ));
        }
        let geometry = self.target_geometry()?;
        if geometry.height == 0 {
            return Err(PagewarpError::InvalidConfig(format!(
                "width {} with ratio {ratio} gives a zero page height",
                self.target_width
            )));
        }
        if self.kernel.width == 0 || self.kernel.height == 0 {
            return Err(PagewarpError::InvalidConfig(format!(
                "structuring element {}x{} must not be empty",
                self.kernel.width, self.kernel.height
            )));
        }
        if self.kernel.width > MAX_KERNEL_SIDE || self.kernel.height > MAX_KERNEL_SIDE {
            return Err(PagewarpError::InvalidConfig(format!(
                "structuring element {}x{} exceeds {MAX_KERNEL_SIDE} pixels per side",
                self.kernel.width, self.kernel.height
            )));
        }
        self.corner_search.validate()
    }

    /// Output page size implied by `target_width` and `aspect_ratio`.
    pub fn target_geometry(&self) -> Result<TargetGeometry> {
        TargetGeometry::from_ratio(self.target_width, self.aspect_ratio).ok_or_else(|| {
            PagewarpError::InvalidConfig(format!(
                "width {} with ratio {} has no valid page height",
                self.target_width, self.aspect_ratio
            ))
        })
    }
}

impl CornerSearch {
    fn validate(&self) -> Result<()> {
        if !(self.epsilon_start.is_finite() && self.epsilon_start > 0.0) {
            return Err(PagewarpError::InvalidConfig(format!(
                "epsilon_start must be positive, got {}",
                self.epsilon_start
            )));
        }
        if !(self.epsilon_step.is_finite() && self.epsilon_step > 0.0) {
            return Err(PagewarpError::InvalidConfig(format!(
                "epsilon_step must be positive, got {}",
                self.epsilon_step
            )));
        }
        if let Some(max) = self.epsilon_max {
            if !max.is_finite() || max < self.epsilon_start {
                return Err(PagewarpError::InvalidConfig(format!(
                    "epsilon_max {max} must be finite and at least epsilon_start {}",
                    self.epsilon_start
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ScanConfig::default();
        config.validate().unwrap();
        assert_eq!(config.threshold, 200);
        assert_eq!(config.kernel, KernelSize { width: 5, height: 5 });
        assert_eq!(
            config.target_geometry().unwrap(),
            TargetGeometry { width: 500, height: 714 }
        );
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ScanConfig =
            serde_json::from_str(r#"{ "threshold": 180, "corner_search": { "epsilon_step": 0.5 } }"#)
                .unwrap();
        assert_eq!(config.threshold, 180);
        assert_eq!(config.corner_search.epsilon_step, 0.5);
        assert_eq!(config.corner_search.epsilon_start, 1.0);
        assert_eq!(config.target_width, 500);
    }

    #[test]
    fn zero_ratio_is_rejected() {
        let config = ScanConfig {
            aspect_ratio: AspectRatio::new(0, 7),
            ..ScanConfig::default()
        };
        assert!(matches!(config.validate(), Err(PagewarpError::InvalidConfig(_))));
    }

    #[test]
    fn oversized_kernel_is_rejected() {
        let config = ScanConfig {
            kernel: KernelSize {
                width: 512,
                height: 5,
            },
            ..ScanConfig::default()
        };
        assert!(matches!(config.validate(), Err(PagewarpError::InvalidConfig(_))));

        let largest = ScanConfig {
            kernel: KernelSize {
                width: MAX_KERNEL_SIDE,
                height: MAX_KERNEL_SIDE,
            },
            ..ScanConfig::default()
        };
        assert!(largest.validate().is_ok());
    }

    #[test]
    fn zero_height_is_rejected() {
        let config = ScanConfig {
            target_width: 1,
            aspect_ratio: AspectRatio::new(1, 7),
            ..ScanConfig::default()
        };
        assert!(matches!(config.validate(), Err(PagewarpError::InvalidConfig(_))));
    }

    #[test]
    fn bad_epsilon_bounds_are_rejected() {
        let mut config = ScanConfig::default();
        config.corner_search.epsilon_step = 0.0;
        assert!(config.validate().is_err());

        let mut config = ScanConfig::default();
        config.corner_search.epsilon_max = Some(0.5);
        assert!(config.validate().is_err());

        let mut config = ScanConfig::default();
        config.corner_search.epsilon_start = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.json");
        let config = ScanConfig {
            threshold: 150,
            corner_order: CornerOrder::Traversal,
            ..ScanConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(ScanConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.json");
        std::fs::write(&path, r#"{ "target_width": 0 }"#).unwrap();
        assert!(matches!(ScanConfig::load(&path), Err(PagewarpError::InvalidConfig(_))));
    }
}
