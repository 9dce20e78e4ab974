#![forbid(unsafe_code)]

//! Sheet widgets for sheetnav.

pub mod sheet;

pub use sheet::{
    BaseSurface, DismissOutcome, EventQueue, Panel, PanelRecord, ReconcileReport, SheetAnimation,
    SheetAnimationConfig, SheetEasing, SheetEvent, SheetPhase, SheetView, StackReconciler,
};

use sheetnav_core::{Frame, Rect};

/// A `Widget` is a renderable component.
///
/// Widgets append layers to a `Frame` within a given `Rect`.
pub trait Widget {
    /// Render the widget into the frame at the given area.
    fn render(&self, area: Rect, frame: &mut Frame);
}
