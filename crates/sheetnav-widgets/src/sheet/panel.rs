#![forbid(unsafe_code)]

//! A single presented sheet.
//!
//! The panel owns its animation and reports what happens to it through the
//! [`EventQueue`]: a [`SheetEvent::ProgressChanged`] for every movement and a
//! single [`SheetEvent::Dismissed`] once progress reaches 0 from above. It
//! never removes itself; the owner decides when to unmount.
//!
//! # Invariants
//!
//! - `Dismissed` is emitted at most once per presentation. Re-presenting a
//!   closed panel starts a new presentation.
//! - `close()` is idempotent and always runs the full exit animation from the
//!   current progress; removal is never instantaneous.
//! - A panel closed before it ever left progress 0 emits `Dismissed` straight
//!   away, so it can still be unmounted.
//!
//! # Failure Modes
//!
//! - Gestures on a panel with `gesture_enabled = false` are ignored.
//! - `snap_to` with an out-of-range index returns `false` and changes nothing.

use std::time::Duration;

use sheetnav_core::{Backdrop, Canvas, Descriptor, Frame, Layer, LayerKind, Rect, RouteKey, SheetOptions};

use super::animation::{SheetAnimation, SheetAnimationConfig, SheetPhase};
use super::event::{EventQueue, SheetEvent};
use crate::Widget;

/// Progress below which a released drag closes the sheet.
const RELEASE_CLOSE_THRESHOLD: f64 = 0.5;

/// One animated sheet instance.
#[derive(Debug, Clone)]
pub struct Panel {
    key: RouteKey,
    options: SheetOptions,
    config: SheetAnimationConfig,
    animation: SheetAnimation,
    snap_index: usize,
    dismissed: bool,
}

impl Panel {
    /// Create a mounted, closed panel for `key`.
    pub fn new(key: RouteKey, options: &SheetOptions, config: &SheetAnimationConfig) -> Self {
        Self {
            key,
            options: options.clone().normalized(),
            config: config.effective(options.animation_enabled),
            animation: SheetAnimation::new(),
            snap_index: 0,
            dismissed: false,
        }
    }

    pub fn key(&self) -> &RouteKey {
        &self.key
    }

    pub fn options(&self) -> &SheetOptions {
        &self.options
    }

    pub fn phase(&self) -> SheetPhase {
        self.animation.phase()
    }

    /// Presentation progress: 1 open, 0 closed.
    pub fn progress(&self) -> f64 {
        self.animation.progress()
    }

    /// Index of the active snap point.
    pub fn snap_index(&self) -> usize {
        self.snap_index
    }

    /// Whether `Dismissed` was already emitted for this presentation.
    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_animating()
    }

    /// Whether the panel is closing or closed.
    pub fn is_leaving(&self) -> bool {
        self.animation.is_leaving()
    }

    /// Begin the enter animation toward the first snap point.
    ///
    /// Called once at mount. Calling it on a closing panel reverses the exit
    /// from the current progress; on a closed panel it starts a new
    /// presentation.
    pub fn present(&mut self) {
        if self.animation.is_closed() {
            self.dismissed = false;
            self.snap_index = 0;
        }
        self.animation.start_opening(&self.config);
    }

    /// Begin the exit animation. Idempotent.
    pub fn close(&mut self, queue: &mut EventQueue) {
        self.animation.start_closing(&self.config);
        if self.animation.is_closed() {
            self.emit_dismiss(queue);
        }
    }

    /// The full-area touchable behind the content closes the sheet.
    pub fn tap_backdrop(&mut self, queue: &mut EventQueue) {
        self.close(queue);
    }

    /// User swipe that flings the sheet closed without an explicit `close()`.
    ///
    /// Returns `false` if gestures are disabled for this route.
    pub fn swipe_dismiss(&mut self, queue: &mut EventQueue) -> bool {
        if !self.options.gesture_enabled {
            return false;
        }
        self.close(queue);
        true
    }

    /// Follow a user drag to `progress`.
    ///
    /// Returns `false` if gestures are disabled or the panel is already
    /// leaving.
    pub fn drag_to(&mut self, progress: f64, queue: &mut EventQueue) -> bool {
        if !self.options.gesture_enabled || self.is_leaving() {
            return false;
        }
        if let Some((previous, current)) = self.animation.drag_to(progress) {
            self.emit(previous, current, queue);
        }
        if self.animation.is_closed() {
            self.emit_dismiss(queue);
        }
        true
    }

    /// End a drag: settle open, or close below the halfway point.
    pub fn release(&mut self, queue: &mut EventQueue) {
        if self.phase() != SheetPhase::Dragging {
            return;
        }
        if self.progress() < RELEASE_CLOSE_THRESHOLD {
            self.close(queue);
        } else {
            self.animation.start_opening(&self.config);
        }
    }

    /// Select one of the configured snap points.
    pub fn snap_to(&mut self, index: usize) -> bool {
        if index >= self.options.snap_points.len() {
            return false;
        }
        self.snap_index = index;
        true
    }

    /// Advance the animation and report movement.
    pub fn tick(&mut self, delta: Duration, queue: &mut EventQueue) {
        if let Some((previous, current)) = self.animation.tick(delta) {
            self.emit(previous, current, queue);
        }
    }

    fn emit(&mut self, previous: f64, current: f64, queue: &mut EventQueue) {
        queue.push(SheetEvent::ProgressChanged {
            key: self.key.clone(),
            previous,
            current,
        });
        if previous > 0.0 && current == 0.0 {
            self.emit_dismiss(queue);
        }
    }

    fn emit_dismiss(&mut self, queue: &mut EventQueue) {
        if self.dismissed {
            return;
        }
        self.dismissed = true;
        queue.push(SheetEvent::Dismissed {
            key: self.key.clone(),
        });
    }

    /// Sheet body and content rectangles within `screen` at the current
    /// progress. The body slides up from the bottom edge.
    pub fn layout(&self, screen: Rect) -> (Rect, Rect) {
        let snap = self
            .options
            .snap_points
            .get(self.snap_index)
            .copied()
            .unwrap_or_default();
        let full = snap.resolve(screen.height);
        let visible = (f64::from(full) * self.progress()).round() as u16;
        let body = screen.bottom_slice(visible);

        let content_height = self.options.height.resolve(screen.height);
        let top = body.y.saturating_add(full.saturating_sub(content_height));
        let height = content_height.min(screen.bottom().saturating_sub(top));
        let content = Rect::new(body.x, top, body.width, height);
        (body, content)
    }
}

/// Render adapter pairing a panel with its descriptor snapshot.
#[derive(Debug, Clone, Copy)]
pub struct SheetView<'a> {
    panel: &'a Panel,
    descriptor: &'a Descriptor,
}

impl<'a> SheetView<'a> {
    pub fn new(panel: &'a Panel, descriptor: &'a Descriptor) -> Self {
        Self { panel, descriptor }
    }
}

impl Widget for SheetView<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        if !self.panel.phase().is_visible() {
            return;
        }
        let (body, content_area) = self.panel.layout(area);
        let options = self.panel.options();
        let mut lines = Vec::new();
        if !content_area.is_empty() {
            self.descriptor
                .render(&mut Canvas::new(content_area, &mut lines));
        }
        frame.push_layer(Layer {
            route: self.panel.key().clone(),
            kind: LayerKind::Sheet,
            area: body,
            content_area,
            backdrop: Some(Backdrop {
                color: options.background_color,
                opacity: self.panel.progress() as f32 * options.target_opacity,
            }),
            progress: self.panel.progress(),
            lines,
        });
    }
}
