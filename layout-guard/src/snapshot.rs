/// Captured page state at one scroll position of one viewport.
use serde::{Deserialize, Serialize};

/// Viewport size in CSS (logical) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Horizontal extent and visibility of one rendered text node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    pub text: String,
    pub left: f32,
    pub right: f32,
    /// Effective opacity, ancestors included.
    pub opacity: f32,
    /// False when the node or an ancestor is hidden (`display: none` equivalent).
    pub displayed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleLevel {
    Log,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleEntry {
    pub level: ConsoleLevel,
    pub message: String,
}

/// One network request issued by the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub url: String,
    pub same_origin: bool,
    /// HTTP status, absent when the request never produced a response.
    pub status: Option<u16>,
    pub failed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub viewport: Viewport,
    pub scroll_offset: f32,
    /// Equivalent of `document.documentElement.scrollWidth`.
    pub document_width: f32,
    #[serde(default)]
    pub text_boxes: Vec<TextBox>,
    /// Opacity of the designated transition overlay, absent once removed.
    #[serde(default)]
    pub overlay_opacity: Option<f32>,
    #[serde(default)]
    pub page_errors: Vec<String>,
    #[serde(default)]
    pub console: Vec<ConsoleEntry>,
    #[serde(default)]
    pub requests: Vec<RequestRecord>,
}

impl LayoutSnapshot {
    /// Empty snapshot of a page exactly as wide as its viewport.
    pub fn blank(viewport: Viewport, scroll_offset: f32) -> Self {
        Self {
            viewport,
            scroll_offset,
            document_width: viewport.width,
            text_boxes: Vec::new(),
            overlay_opacity: None,
            page_errors: Vec::new(),
            console: Vec::new(),
            requests: Vec::new(),
        }
    }
}
