#![forbid(unsafe_code)]

//! The Base Surface: the bottom route, drawn full-screen without a sheet
//! wrapper, animation, or dismiss semantics.

use sheetnav_core::{Canvas, Descriptor, Frame, Layer, LayerKind, Rect, RouteKey};

use crate::Widget;

/// Persistent backdrop the sheets stack on top of.
#[derive(Debug, Clone, Copy)]
pub struct BaseSurface<'a> {
    key: &'a RouteKey,
    descriptor: &'a Descriptor,
}

impl<'a> BaseSurface<'a> {
    pub fn new(key: &'a RouteKey, descriptor: &'a Descriptor) -> Self {
        Self { key, descriptor }
    }
}

impl Widget for BaseSurface<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        let mut lines = Vec::new();
        if !area.is_empty() {
            self.descriptor.render(&mut Canvas::new(area, &mut lines));
        }
        frame.push_layer(Layer {
            route: self.key.clone(),
            kind: LayerKind::Base,
            area,
            content_area: area,
            backdrop: None,
            progress: 1.0,
            lines,
        });
    }
}
