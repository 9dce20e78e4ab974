#![forbid(unsafe_code)]

//! Headless display list that sheets render into.
//!
//! A [`Frame`] is an ordered list of [`Layer`]s, bottom to top. The Base
//! Surface contributes one [`LayerKind::Base`] layer; every mounted sheet
//! contributes one [`LayerKind::Sheet`] layer carrying its animated geometry
//! and backdrop. Screens draw text lines through a [`Canvas`], which clips to
//! the layer's width (by display width) and height.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::color::Rgba;
use crate::geometry::{Rect, Size};
use crate::key::RouteKey;

/// What produced a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    /// The persistent bottom route. Never animated.
    Base,
    /// A presented sheet.
    Sheet,
}

/// Tinted fill behind a sheet's content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backdrop {
    /// Configured background color.
    pub color: Rgba,
    /// Effective opacity for this frame (`progress × target_opacity`).
    pub opacity: f32,
}

impl Backdrop {
    /// The color with the effective opacity applied to alpha.
    #[must_use]
    pub fn resolved_color(&self) -> Rgba {
        self.color.with_opacity(self.opacity)
    }
}

/// One rendered route.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub route: RouteKey,
    pub kind: LayerKind,
    /// Area covered by the layer (sheet body, including its backdrop).
    pub area: Rect,
    /// Area the screen content was drawn into.
    pub content_area: Rect,
    pub backdrop: Option<Backdrop>,
    /// Presentation progress, `1.0` for the base.
    pub progress: f64,
    /// Lines the screen drew, top to bottom.
    pub lines: Vec<String>,
}

/// Ordered display list for one rendered frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    size: Size,
    layers: Vec<Layer>,
}

impl Frame {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            size: Size::new(width, height),
            layers: Vec::new(),
        }
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Full-screen rectangle.
    #[must_use]
    pub fn area(&self) -> Rect {
        Rect::from_size(self.size)
    }

    /// Layers bottom to top.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Route keys in stacking order.
    pub fn route_keys(&self) -> impl Iterator<Item = &RouteKey> + '_ {
        self.layers.iter().map(|layer| &layer.route)
    }

    /// Find the layer for a route.
    #[must_use]
    pub fn layer(&self, key: &RouteKey) -> Option<&Layer> {
        self.layers.iter().find(|layer| &layer.route == key)
    }

    /// Append a layer on top.
    pub fn push_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }
}

/// Drawing surface handed to a screen's render function.
#[derive(Debug)]
pub struct Canvas<'a> {
    area: Rect,
    lines: &'a mut Vec<String>,
}

impl<'a> Canvas<'a> {
    #[must_use]
    pub fn new(area: Rect, lines: &'a mut Vec<String>) -> Self {
        Self { area, lines }
    }

    /// Area the screen may draw into.
    #[must_use]
    pub fn area(&self) -> Rect {
        self.area
    }

    /// Rows still available.
    #[must_use]
    pub fn remaining_rows(&self) -> u16 {
        let used = u16::try_from(self.lines.len()).unwrap_or(u16::MAX);
        self.area.height.saturating_sub(used)
    }

    /// Draw one line, clipped to the canvas width.
    ///
    /// Returns `false` once the canvas is full; the line is dropped.
    pub fn line(&mut self, text: impl AsRef<str>) -> bool {
        if self.remaining_rows() == 0 {
            return false;
        }
        self.lines.push(clip_to_width(text.as_ref(), self.area.width));
        true
    }
}

/// Truncate `text` so its display width does not exceed `max_width`.
///
/// Wide graphemes that would straddle the edge are dropped entirely.
fn clip_to_width(text: &str, max_width: u16) -> String {
    let max_width = usize::from(max_width);
    let mut out = String::with_capacity(text.len().min(max_width * 4));
    let mut width = 0;
    for grapheme in text.graphemes(true) {
        let w = UnicodeWidthStr::width(grapheme);
        if width + w > max_width {
            break;
        }
        width += w;
        out.push_str(grapheme);
    }
    out
}
