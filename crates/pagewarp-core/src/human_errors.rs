// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the person holding the camera.
//
// Every scan failure is mapped to plain English with a clear next step. The
// severity tells the caller whether to retake the photo, change a setting, or
// give up.

use crate::error::PagewarpError;

/// What the user should do about a failed scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The photo itself is the problem; take it again.
    Retake,
    /// A setting (threshold, ratio, search bounds) should be changed.
    Adjust,
    /// The user stopped the scan on purpose.
    Cancelled,
    /// Cannot be fixed by retaking or adjusting (bad file, disk problem).
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Severity level.
    pub severity: Severity,
}

/// Convert a `PagewarpError` into a `HumanError`.
pub fn humanize_error(err: &PagewarpError) -> HumanError {
    match err {
        PagewarpError::NoContourFound => HumanError {
            message: "We couldn't find a page in the photo.".into(),
            suggestion: "Put the page on a dark surface with good light and take the photo again, or lower the brightness threshold.".into(),
            severity: Severity::Retake,
        },

        PagewarpError::ApproximationDidNotConverge { vertex_count, .. } => HumanError {
            message: "We found something, but couldn't find its four corners.".into(),
            suggestion: format!(
                "Make sure all four corners of the page are visible and nothing covers its edges, then try again. (Best outline had {vertex_count} corners.)"
            ),
            severity: Severity::Retake,
        },

        PagewarpError::DegenerateCorners(_) => HumanError {
            message: "The page corners don't form a usable shape.".into(),
            suggestion: "Take the photo from more directly above the page so it isn't seen edge-on.".into(),
            severity: Severity::Retake,
        },

        PagewarpError::OperatorCancelled { .. } => HumanError {
            message: "The scan was cancelled.".into(),
            suggestion: "Nothing was saved. Run the scan again when you're ready.".into(),
            severity: Severity::Cancelled,
        },

        PagewarpError::InvalidConfig(detail) => HumanError {
            message: "One of the scan settings isn't valid.".into(),
            suggestion: format!("Check the settings file or command-line options. ({detail})"),
            severity: Severity::Adjust,
        },

        PagewarpError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            severity: Severity::Permanent,
        },

        PagewarpError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                    severity: Severity::Permanent,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "We don't have permission to use that file.".into(),
                    suggestion: "Check the file permissions, or choose a different location.".into(),
                    severity: Severity::Permanent,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your storage may be full.".into(),
                    severity: Severity::Permanent,
                }
            }
        }

        PagewarpError::Serialization(_) => HumanError {
            message: "The settings file couldn't be read.".into(),
            suggestion: "Make sure it is valid JSON, or remove it to use the defaults.".into(),
            severity: Severity::Adjust,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Checkpoint;

    #[test]
    fn missing_page_means_retake() {
        let human = humanize_error(&PagewarpError::NoContourFound);
        assert_eq!(human.severity, Severity::Retake);
    }

    #[test]
    fn unconverged_corners_mention_vertex_count() {
        let err = PagewarpError::ApproximationDidNotConverge {
            epsilon_max: 42.0,
            vertex_count: 3,
        };
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Retake);
        assert!(human.suggestion.contains('3'));
    }

    #[test]
    fn cancel_is_its_own_severity() {
        let err = PagewarpError::OperatorCancelled {
            checkpoint: Checkpoint::CornersFound,
        };
        assert_eq!(humanize_error(&err).severity, Severity::Cancelled);
    }

    #[test]
    fn bad_settings_mean_adjust() {
        let err = PagewarpError::InvalidConfig("threshold".into());
        assert_eq!(humanize_error(&err).severity, Severity::Adjust);
    }

    #[test]
    fn missing_file_is_permanent() {
        let err = PagewarpError::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Permanent);
        assert!(human.message.contains("couldn't be found"));
    }
}
