#![forbid(unsafe_code)]

//! Bottom-sheet presentation: the Base Surface, animated sheet panels, and the
//! reconciler that keeps them in step with navigation state.
//!
//! # Lifecycle
//!
//! A route appended to the state gets a [`Panel`] that slides up from the
//! bottom edge. A route dropped from the state keeps its panel mounted while
//! it slides back down, drawn from the descriptor snapshot taken at mount.
//! A panel the user dismisses (backdrop tap, swipe, drag) tells the container
//! with a pop so state and screen agree again.
//!
//! Each frame, in order:
//!
//! 1. [`StackReconciler::reconcile`] when the state changed.
//! 2. [`StackReconciler::tick`] to advance animations.
//! 3. Drain the [`EventQueue`] into [`StackReconciler::handle_event`].
//! 4. [`StackReconciler::render`] into a [`Frame`](sheetnav_core::Frame).
//!
//! # Example
//!
//! ```ignore
//! use sheetnav_widgets::sheet::{EventQueue, StackReconciler};
//!
//! let mut stack = StackReconciler::new();
//! let mut queue = EventQueue::new();
//! stack.reconcile(&state, &descriptors);
//! stack.tick(Duration::from_millis(16), &mut queue);
//! for event in queue.drain() {
//!     stack.handle_event(&event, Some(&dispatcher));
//! }
//! ```

mod animation;
mod base;
mod event;
mod panel;
mod stack;

pub use animation::{SheetAnimation, SheetAnimationConfig, SheetEasing, SheetPhase};
pub use base::BaseSurface;
pub use event::{EventQueue, SheetEvent};
pub use panel::{Panel, SheetView};
pub use stack::{DismissOutcome, PanelRecord, ReconcileReport, StackReconciler};
