#![forbid(unsafe_code)]

//! Sheet navigator: the frame loop that ties a [`StackRouter`] to a
//! [`StackReconciler`].
//!
//! # Frame order
//!
//! [`SheetNavigator::frame`] runs, in order:
//!
//! 1. Deferred tab-press checks.
//! 2. Reconcile, if the router state changed since the last reconcile.
//! 3. Tick every panel.
//! 4. Deliver queued panel events; user dismissals dispatch pops through a
//!    [`ContainerHandle`].
//! 5. Reconcile again if those pops changed the state.
//! 6. Render the Base Surface and every mounted sheet.
//!
//! State diffs and dismissal handling never interleave: both run on the
//! caller's thread, one step at a time.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use sheetnav_core::{
    DescriptorRegistry, Frame, NavAction, NavigationState, Result, RouteKey, Size,
};
use sheetnav_widgets::{DismissOutcome, EventQueue, Panel, StackReconciler};
use tracing::{debug, debug_span};

use crate::config::NavigatorConfig;
use crate::handle::ContainerHandle;
use crate::router::StackRouter;
use crate::tab::{
    PendingTabPress, TabPress, TabPressOutcome, TabResetSkip, TabResetTiming, reset_decision,
};

/// Default viewport when none is given.
const DEFAULT_SIZE: Size = Size::new(80, 24);

/// Drives one sheet stack.
#[derive(Debug)]
pub struct SheetNavigator {
    router: Rc<RefCell<StackRouter>>,
    handle: ContainerHandle,
    stack: StackReconciler,
    queue: EventQueue,
    /// Descriptors of the last reconciled state.
    descriptors: DescriptorRegistry,
    /// Router version of the last reconcile. `None` before the first.
    reconciled: Option<u64>,
    size: Size,
    focused: bool,
    tab_reset: TabResetTiming,
    pending_tab: Option<PendingTabPress>,
    frames: u64,
}

impl SheetNavigator {
    /// Wrap `router` with the default animation and tab behavior.
    pub fn new(router: StackRouter) -> Self {
        Self::build(router, StackReconciler::new(), TabResetTiming::default())
    }

    /// Wrap `router` and apply `config`.
    ///
    /// Config defaults replace the router registry's default options.
    pub fn with_config(mut router: StackRouter, config: &NavigatorConfig) -> Self {
        let registry = router.registry_mut();
        registry.set_defaults(config.defaults.clone());
        registry.set_gestures_enabled(config.gestures_enabled);
        let stack = StackReconciler::with_config(config.to_animation_config());
        Self::build(router, stack, config.tab_reset)
    }

    fn build(router: StackRouter, stack: StackReconciler, tab_reset: TabResetTiming) -> Self {
        let router = Rc::new(RefCell::new(router));
        let handle = ContainerHandle::new(&router);
        let mut navigator = Self {
            router,
            handle,
            stack,
            queue: EventQueue::new(),
            descriptors: DescriptorRegistry::new(),
            reconciled: None,
            size: DEFAULT_SIZE,
            focused: true,
            tab_reset,
            pending_tab: None,
            frames: 0,
        };
        navigator.sync();
        navigator
    }

    /// Viewport size for rendered frames.
    #[must_use]
    pub fn size(mut self, width: u16, height: u16) -> Self {
        self.size = Size::new(width, height);
        self
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.size = Size::new(width, height);
    }

    // --- Accessors ---

    /// Dispatch handle for collaborators; does not keep the router alive.
    pub fn handle(&self) -> ContainerHandle {
        self.handle.clone()
    }

    /// Snapshot of the current navigation state.
    pub fn state(&self) -> NavigationState {
        self.router.borrow().state().clone()
    }

    pub fn version(&self) -> u64 {
        self.router.borrow().version()
    }

    pub fn stack(&self) -> &StackReconciler {
        &self.stack
    }

    pub fn panel(&self, key: &RouteKey) -> Option<&Panel> {
        self.stack.panel(key)
    }

    /// Topmost sheet that is not already leaving.
    pub fn top(&self) -> Option<RouteKey> {
        self.stack
            .rendered_keys()
            .iter()
            .rev()
            .find(|key| self.stack.is_removing(key) == Some(false))
            .cloned()
    }

    /// No animation is running and no exit or tab check is pending.
    pub fn is_settled(&self) -> bool {
        self.pending_tab.is_none()
            && self.reconciled == Some(self.version())
            && self.stack.is_settled()
            && self.queue.is_empty()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    // --- Navigation ---

    /// Apply `action` to the router. Returns whether the state changed.
    ///
    /// The reconciler sees the change at the next [`frame`](Self::frame).
    pub fn dispatch(&mut self, action: NavAction) -> Result<bool> {
        self.router.borrow_mut().apply(action)
    }

    /// Push a registered screen.
    pub fn push(&mut self, name: &str) -> Result<bool> {
        self.dispatch(NavAction::push(name))
    }

    /// Pop `key` from the state. Sheets above it stay presented.
    pub fn pop(&mut self, key: &RouteKey) -> Result<bool> {
        let target = self.router.borrow().id().clone();
        self.dispatch(NavAction::pop(key.clone(), target))
    }

    // --- Frame Loop ---

    /// Advance by `delta` and render.
    pub fn frame(&mut self, delta: Duration) -> Frame {
        self.frames += 1;
        let _span = debug_span!("sheet_frame", frame = self.frames).entered();

        if let Some(pending) = self.pending_tab.take() {
            self.evaluate_tab_press(&pending.press, pending.was_focused);
        }

        self.sync();
        self.stack.tick(delta, &mut self.queue);

        for event in self.queue.drain() {
            if let Some(DismissOutcome::Evicted { dispatched }) =
                self.stack.handle_event(&event, Some(&self.handle))
            {
                debug!(key = %event.key(), dispatched, "sheet evicted");
            }
        }

        self.sync();
        self.render()
    }

    /// Render without advancing time.
    pub fn render(&self) -> Frame {
        let mut frame = Frame::new(self.size.width, self.size.height);
        let router = self.router.borrow();
        self.stack.render(router.state(), &self.descriptors, &mut frame);
        frame
    }

    /// Reconcile if the router moved on since the last reconcile.
    fn sync(&mut self) {
        let router = self.router.borrow();
        let version = router.version();
        if self.reconciled == Some(version) {
            return;
        }
        self.descriptors = router.descriptors();
        let report = self.stack.reconcile(router.state(), &self.descriptors);
        if !report.missing_descriptor.is_empty() {
            debug!(keys = ?report.missing_descriptor, "routes without a descriptor not mounted");
        }
        self.reconciled = Some(version);
    }

    // --- Gestures ---

    /// Tap the backdrop behind sheet `key`.
    pub fn tap_backdrop(&mut self, key: &RouteKey) -> bool {
        let Some(panel) = self.stack.panel_mut(key) else {
            return false;
        };
        panel.tap_backdrop(&mut self.queue);
        true
    }

    /// Fling sheet `key` closed.
    pub fn swipe_dismiss(&mut self, key: &RouteKey) -> bool {
        self.stack
            .panel_mut(key)
            .is_some_and(|panel| panel.swipe_dismiss(&mut self.queue))
    }

    /// Drag sheet `key` to `progress` (0 closed, 1 open).
    pub fn drag(&mut self, key: &RouteKey, progress: f64) -> bool {
        self.stack
            .panel_mut(key)
            .is_some_and(|panel| panel.drag_to(progress, &mut self.queue))
    }

    /// End a drag on sheet `key`.
    pub fn release(&mut self, key: &RouteKey) -> bool {
        let Some(panel) = self.stack.panel_mut(key) else {
            return false;
        };
        panel.release(&mut self.queue);
        true
    }

    /// Move sheet `key` to snap point `index`.
    pub fn snap_to(&mut self, key: &RouteKey, index: usize) -> bool {
        self.stack
            .panel_mut(key)
            .is_some_and(|panel| panel.snap_to(index))
    }

    // --- Tabs ---

    /// Whether the tab hosting this stack is focused.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// The hosting tab was pressed.
    ///
    /// Focus is sampled now. The reset conditions are checked now or at the
    /// start of the next frame, depending on [`TabResetTiming`]; a press
    /// replaces any press still waiting.
    pub fn on_tab_press(&mut self, press: TabPress) -> TabPressOutcome {
        let was_focused = self.focused;
        match self.tab_reset {
            TabResetTiming::Immediate => self.evaluate_tab_press(&press, was_focused),
            TabResetTiming::NextFrame => {
                self.pending_tab = Some(PendingTabPress { press, was_focused });
                TabPressOutcome::Deferred
            }
        }
    }

    fn evaluate_tab_press(&mut self, press: &TabPress, was_focused: bool) -> TabPressOutcome {
        let (index, target) = {
            let router = self.router.borrow();
            (router.state().index(), router.id().clone())
        };
        match reset_decision(index, was_focused, press) {
            Ok(()) => match self.dispatch(NavAction::PopToTop { target }) {
                Ok(true) => {
                    debug!(index, "tab press reset stack");
                    TabPressOutcome::Reset
                }
                Ok(false) => TabPressOutcome::Ignored(TabResetSkip::OnlyBase),
                Err(err) => {
                    debug!(error = %err, "tab reset dropped");
                    TabPressOutcome::Ignored(TabResetSkip::OnlyBase)
                }
            },
            Err(skip) => {
                debug!(index, reason = ?skip, "tab press ignored");
                TabPressOutcome::Ignored(skip)
            }
        }
    }
}
