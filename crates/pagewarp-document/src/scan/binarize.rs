// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Binarization: grayscale conversion and a fixed global threshold, followed
// by a morphological opening with an elliptical structuring element that
// wipes out speckles while keeping the page silhouette.

use image::{GrayImage, Luma, RgbImage, imageops};
use imageproc::morphology::{Mask, grayscale_open};
use pagewarp_core::KernelSize;
use pagewarp_core::config::MAX_KERNEL_SIDE;
use tracing::{debug, instrument};

/// Mask value for paper (bright) pixels.
pub const FOREGROUND: u8 = 255;
/// Mask value for everything else.
pub const BACKGROUND: u8 = 0;

/// Single-channel image whose pixels are exactly `FOREGROUND` or `BACKGROUND`.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryMask(GrayImage);

impl BinaryMask {
    /// Threshold a grayscale image: pixels at or above `threshold` become
    /// foreground.
    pub fn from_threshold(gray: &GrayImage, threshold: u8) -> Self {
        let (width, height) = gray.dimensions();
        let data = gray
            .as_raw()
            .iter()
            .map(|&v| if v >= threshold { FOREGROUND } else { BACKGROUND })
            .collect();
        // Buffer length matches the source dimensions by construction.
        Self(GrayImage::from_raw(width, height, data).unwrap_or_else(|| GrayImage::new(width, height)))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.0.get_pixel(x, y).0[0] == FOREGROUND
    }

    /// Number of foreground pixels.
    pub fn foreground_count(&self) -> usize {
        self.0.as_raw().iter().filter(|&&v| v == FOREGROUND).count()
    }

    /// Borrow the mask as a plain grayscale image.
    pub fn as_gray(&self) -> &GrayImage {
        &self.0
    }
}

/// Flat structuring element, stored as offsets from its anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuringElement {
    width: u32,
    height: u32,
    offsets: Vec<(i32, i32)>,
}

impl StructuringElement {
    /// Ellipse inscribed in a `width x height` box, anchored at its center.
    ///
    /// Row `i` spans columns `c - dx ..= c + dx` with
    /// `dx = round(c * sqrt((r² - dy²) / r²))`, where `r = height / 2`,
    /// `c = width / 2` and `dy = i - r`. A 5x5 element is a plus-shaped disc:
    /// single pixels on the top and bottom rows, full rows in between.
    /// Sides are clamped to `1..=MAX_KERNEL_SIDE`.
    pub fn ellipse(size: KernelSize) -> Self {
        let width = size.width.clamp(1, MAX_KERNEL_SIDE);
        let height = size.height.clamp(1, MAX_KERNEL_SIDE);
        let r = (height / 2) as i32;
        let c = (width / 2) as i32;
        let inv_r2 = if r > 0 { 1.0 / (r * r) as f64 } else { 0.0 };

        let mut offsets = Vec::new();
        for i in 0..height as i32 {
            let dy = i - r;
            let dx = if dy.abs() <= r {
                (c as f64 * (((r * r - dy * dy) as f64) * inv_r2).sqrt()).round() as i32
            } else {
                0
            };
            let j1 = (c - dx).max(0);
            let j2 = (c + dx + 1).min(width as i32);
            for j in j1..j2 {
                offsets.push((j - c, dy));
            }
        }

        Self {
            width,
            height,
            offsets,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Offsets `(dx, dy)` relative to the anchor.
    pub fn offsets(&self) -> &[(i32, i32)] {
        &self.offsets
    }

    /// Anchor position inside the `width x height` box.
    pub fn anchor(&self) -> (u32, u32) {
        (self.width / 2, self.height / 2)
    }

    /// The element drawn as a `width x height` image, `FOREGROUND` where it
    /// covers.
    pub fn to_image(&self) -> GrayImage {
        let (cx, cy) = (self.anchor().0 as i32, self.anchor().1 as i32);
        let mut image = GrayImage::from_pixel(self.width, self.height, Luma([BACKGROUND]));
        for &(dx, dy) in &self.offsets {
            image.put_pixel((cx + dx) as u32, (cy + dy) as u32, Luma([FOREGROUND]));
        }
        image
    }

    /// The element as an `imageproc` morphology mask.
    pub fn to_mask(&self) -> Mask {
        let (cx, cy) = self.anchor();
        // Sides never exceed MAX_KERNEL_SIDE, so the anchor fits in a u8.
        let cx = u8::try_from(cx).unwrap_or(u8::MAX);
        let cy = u8::try_from(cy).unwrap_or(u8::MAX);
        Mask::from_image(&self.to_image(), cx, cy)
    }
}

/// Convert to single-channel luminance.
pub fn to_grayscale(image: &RgbImage) -> GrayImage {
    imageops::grayscale(image)
}

/// Morphological opening (erosion followed by dilation). Samples outside
/// the image are ignored, so the frame neither erodes nor grows the mask.
pub fn open(mask: &BinaryMask, element: &StructuringElement) -> BinaryMask {
    BinaryMask(grayscale_open(mask.as_gray(), &element.to_mask()))
}

/// Full binarization stage: grayscale, threshold, then opening with an
/// elliptical element of `kernel` size. Always returns a mask the size of
/// `image`.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn binarize(image: &RgbImage, threshold: u8, kernel: KernelSize) -> BinaryMask {
    let gray = to_grayscale(image);
    let thresholded = BinaryMask::from_threshold(&gray, threshold);
    debug!(
        foreground = thresholded.foreground_count(),
        "Threshold applied"
    );

    let element = StructuringElement::ellipse(kernel);
    let opened = open(&thresholded, &element);
    debug!(
        foreground = opened.foreground_count(),
        kernel_w = element.width(),
        kernel_h = element.height(),
        "Morphological opening complete"
    );
    opened
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gray_with_square(size: u32, x0: u32, y0: u32, side: u32, value: u8) -> GrayImage {
        let mut img = GrayImage::from_pixel(size, size, Luma([20u8]));
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                img.put_pixel(x, y, Luma([value]));
            }
        }
        img
    }

    #[test]
    fn ellipse_5x5_matches_reference_shape() {
        let element = StructuringElement::ellipse(KernelSize { width: 5, height: 5 });
        let rows: Vec<String> = (-2..=2)
            .map(|dy| {
                (-2..=2)
                    .map(|dx| if element.offsets().contains(&(dx, dy)) { '1' } else { '0' })
                    .collect()
            })
            .collect();
        assert_eq!(rows, ["00100", "11111", "11111", "11111", "00100"]);
        assert_eq!(element.offsets().len(), 17);
    }

    #[test]
    fn ellipse_renders_to_kernel_image() {
        let element = StructuringElement::ellipse(KernelSize { width: 5, height: 5 });
        let image = element.to_image();
        assert_eq!(image.dimensions(), (5, 5));
        assert_eq!(image.pixels().filter(|p| p.0[0] == FOREGROUND).count(), 17);
        assert_eq!(image.get_pixel(0, 0).0[0], BACKGROUND);
        assert_eq!(image.get_pixel(2, 0).0[0], FOREGROUND);
        assert_eq!(element.anchor(), (2, 2));
    }

    #[test]
    fn oversized_ellipse_is_clamped() {
        let element = StructuringElement::ellipse(KernelSize {
            width: 2000,
            height: 3,
        });
        assert_eq!((element.width(), element.height()), (MAX_KERNEL_SIDE, 3));
    }

    #[test]
    fn opening_ignores_samples_beyond_the_frame() {
        // A block flush with the top-left corner keeps its corner pixel.
        let mut gray = GrayImage::new(30, 30);
        for y in 0..10 {
            for x in 0..10 {
                gray.put_pixel(x, y, Luma([255]));
            }
        }
        let mask = BinaryMask::from_threshold(&gray, 200);
        let opened = open(&mask, &StructuringElement::ellipse(KernelSize::default()));
        assert!(opened.is_foreground(0, 0));
        assert!(opened.is_foreground(5, 5));
        assert!(!opened.is_foreground(12, 12));
    }

    #[test]
    fn ellipse_1x1_is_identity_element() {
        let element = StructuringElement::ellipse(KernelSize { width: 1, height: 1 });
        assert_eq!(element.offsets(), &[(0, 0)]);
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut gray = GrayImage::new(3, 1);
        gray.put_pixel(0, 0, Luma([199]));
        gray.put_pixel(1, 0, Luma([200]));
        gray.put_pixel(2, 0, Luma([255]));
        let mask = BinaryMask::from_threshold(&gray, 200);
        assert!(!mask.is_foreground(0, 0));
        assert!(mask.is_foreground(1, 0));
        assert!(mask.is_foreground(2, 0));
    }

    #[test]
    fn opening_removes_small_speckle() {
        let gray = gray_with_square(40, 10, 10, 3, 255);
        let mask = BinaryMask::from_threshold(&gray, 200);
        assert_eq!(mask.foreground_count(), 9);

        let element = StructuringElement::ellipse(KernelSize::default());
        assert_eq!(open(&mask, &element).foreground_count(), 0);
    }

    #[test]
    fn opening_keeps_large_region_interior() {
        let gray = gray_with_square(60, 10, 10, 30, 255);
        let mask = BinaryMask::from_threshold(&gray, 200);
        let element = StructuringElement::ellipse(KernelSize::default());
        let opened = open(&mask, &element);

        for y in 11..39 {
            for x in 11..39 {
                assert!(opened.is_foreground(x, y), "lost ({x}, {y})");
            }
        }
        assert!(!opened.is_foreground(5, 5));
        // Only the corner pixels the ellipse cannot reach are trimmed.
        assert!(opened.foreground_count() >= 30 * 30 - 4 * 3);
    }

    #[test]
    fn border_does_not_erode_region_touching_edge() {
        let gray = GrayImage::from_pixel(12, 12, Luma([255u8]));
        let mask = BinaryMask::from_threshold(&gray, 200);
        let element = StructuringElement::ellipse(KernelSize::default());
        assert_eq!(open(&mask, &element).foreground_count(), 144);
    }

    #[test]
    fn binarize_output_is_strictly_binary_and_same_size() {
        let mut image = RgbImage::from_pixel(31, 17, Rgb([10, 10, 10]));
        for y in 2..15 {
            for x in 3..28 {
                image.put_pixel(x, y, Rgb([((x * 9) % 256) as u8, 230, 240]));
            }
        }
        let mask = binarize(&image, 200, KernelSize::default());
        assert_eq!((mask.width(), mask.height()), (31, 17));
        assert!(
            mask.as_gray()
                .as_raw()
                .iter()
                .all(|&v| v == FOREGROUND || v == BACKGROUND)
        );
    }

    #[test]
    fn dark_image_has_empty_mask() {
        let image = RgbImage::from_pixel(20, 20, Rgb([40, 40, 40]));
        assert_eq!(binarize(&image, 200, KernelSize::default()).foreground_count(), 0);
    }
}
