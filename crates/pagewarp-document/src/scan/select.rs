// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document selection: the page is the contour with the longest perimeter.

use pagewarp_core::error::{PagewarpError, Result};
use tracing::debug;

use super::contour::Contour;

/// Pick the contour with the largest arc length. The first one wins a tie.
pub fn select_document(contours: &[Contour]) -> Result<&Contour> {
    let (first, rest) = contours.split_first().ok_or(PagewarpError::NoContourFound)?;

    let mut best = first;
    for contour in rest {
        if contour.arc_length() > best.arc_length() {
            best = contour;
        }
    }

    debug!(
        candidates = contours.len(),
        arc_length = best.arc_length(),
        "Document contour selected"
    );
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use imageproc::point::Point;

    fn square(origin: i32, side: i32) -> Contour {
        Contour::new(vec![
            Point::new(origin, origin),
            Point::new(origin + side, origin),
            Point::new(origin + side, origin + side),
            Point::new(origin, origin + side),
        ])
    }

    #[test]
    fn empty_input_is_no_contour() {
        assert!(matches!(select_document(&[]), Err(PagewarpError::NoContourFound)));
    }

    #[test]
    fn longest_perimeter_wins() {
        let contours = vec![square(0, 5), square(10, 50), square(100, 20)];
        let chosen = select_document(&contours).unwrap();
        assert_eq!(chosen, &contours[1]);
    }

    #[test]
    fn first_maximum_wins_ties() {
        let contours = vec![square(0, 3), square(10, 30), square(60, 30)];
        let chosen = select_document(&contours).unwrap();
        assert!(std::ptr::eq(chosen, &contours[1]));
    }
}
