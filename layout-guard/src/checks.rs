/// Layout stability invariants evaluated against a single snapshot.
use crate::snapshot::{ConsoleLevel, LayoutSnapshot};
use constants::layout::{
    MAX_TRANSITION_OVERLAY_OPACITY, OVERFLOW_TOLERANCE_PX, VISIBLE_TEXT_MIN_OPACITY,
};
use serde::{Deserialize, Serialize};

/// Bounds the checks compare against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuardThresholds {
    pub overflow_tolerance_px: f32,
    pub max_overlay_opacity: f32,
    pub visible_text_min_opacity: f32,
}

impl Default for GuardThresholds {
    fn default() -> Self {
        Self {
            overflow_tolerance_px: OVERFLOW_TOLERANCE_PX,
            max_overlay_opacity: MAX_TRANSITION_OVERLAY_OPACITY,
            visible_text_min_opacity: VISIBLE_TEXT_MIN_OPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    PageError {
        message: String,
    },
    ConsoleError {
        message: String,
    },
    FailedRequest {
        url: String,
    },
    ServerError {
        url: String,
        status: u16,
    },
    HorizontalOverflow {
        document_width: f32,
        viewport_width: f32,
    },
    TextOutsideViewport {
        text: String,
        left: f32,
        right: f32,
    },
    OverlayTooOpaque {
        opacity: f32,
    },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PageError { message } => write!(f, "uncaught page error: {message}"),
            Self::ConsoleError { message } => write!(f, "console error: {message}"),
            Self::FailedRequest { url } => write!(f, "failed same-origin request: {url}"),
            Self::ServerError { url, status } => write!(f, "HTTP {status} from {url}"),
            Self::HorizontalOverflow {
                document_width,
                viewport_width,
            } => write!(
                f,
                "horizontal overflow: document {document_width:.1}px > viewport {viewport_width:.1}px"
            ),
            Self::TextOutsideViewport { text, left, right } => write!(
                f,
                "visible text \"{text}\" spans {left:.1}..{right:.1}px, outside the viewport"
            ),
            Self::OverlayTooOpaque { opacity } => {
                write!(f, "transition overlay opacity {opacity:.3} above bound")
            }
        }
    }
}

/// Evaluate every invariant against one snapshot.
/// Returns an empty list for a stable frame.
pub fn check_snapshot(snapshot: &LayoutSnapshot, thresholds: &GuardThresholds) -> Vec<Violation> {
    let mut violations = Vec::new();

    for message in &snapshot.page_errors {
        violations.push(Violation::PageError {
            message: message.clone(),
        });
    }

    for entry in &snapshot.console {
        if entry.level == ConsoleLevel::Error {
            violations.push(Violation::ConsoleError {
                message: entry.message.clone(),
            });
        }
    }

    for request in &snapshot.requests {
        if let Some(status) = request.status.filter(|s| *s >= 500) {
            violations.push(Violation::ServerError {
                url: request.url.clone(),
                status,
            });
        } else if request.same_origin && request.failed {
            violations.push(Violation::FailedRequest {
                url: request.url.clone(),
            });
        }
    }

    let viewport_width = snapshot.viewport.width;
    if snapshot.document_width > viewport_width + thresholds.overflow_tolerance_px {
        violations.push(Violation::HorizontalOverflow {
            document_width: snapshot.document_width,
            viewport_width,
        });
    }

    for text_box in &snapshot.text_boxes {
        let visible =
            text_box.displayed && text_box.opacity > thresholds.visible_text_min_opacity;
        if !visible || text_box.text.trim().is_empty() {
            continue;
        }
        let tolerance = thresholds.overflow_tolerance_px;
        if text_box.left < -tolerance || text_box.right > viewport_width + tolerance {
            violations.push(Violation::TextOutsideViewport {
                text: text_box.text.clone(),
                left: text_box.left,
                right: text_box.right,
            });
        }
    }

    if let Some(opacity) = snapshot.overlay_opacity {
        if opacity > thresholds.max_overlay_opacity {
            violations.push(Violation::OverlayTooOpaque { opacity });
        }
    }

    violations
}
