#![forbid(unsafe_code)]

//! Test harness and reference fixtures for sheetnav.
//!
//! - [`RecordingDispatcher`]: a [`Dispatch`] that records every action, and
//!   can pretend its container was torn down.
//! - [`text_screen`], [`state`], [`descriptors`]: fixtures for routes whose
//!   screens draw a single label.
//! - [`StackDriver`]: drives a bare [`StackReconciler`] frame by frame,
//!   delivering panel events and recording dismissal outcomes.
//! - [`dump_frame`]: a stable text rendering of a [`Frame`] for assertions.
//! - [`strategies`]: proptest strategies for navigation scripts.
//!
//! # JSONL
//!
//! [`RecordingDispatcher::to_jsonl`] writes one action per line in the wire
//! shape the navigation container receives:
//!
//! ```json
//! {"action":"pop","source":"detail-1","target":"stack"}
//! ```

use std::cell::{Cell, RefCell};
use std::fmt::Write as _;
use std::time::Duration;

use sheetnav_core::{
    Canvas, ContainerId, Descriptor, DescriptorRegistry, Dispatch, Frame, LayerKind, NavAction,
    NavigationState, Result, Route, RouteKey, Screen, SheetError, SheetOptions,
};
use sheetnav_widgets::{DismissOutcome, EventQueue, SheetEvent, StackReconciler};

/// Frame time used by the drivers.
pub const FRAME: Duration = Duration::from_millis(16);

/// Upper bound on frames spent settling before giving up.
pub const MAX_SETTLE_FRAMES: usize = 1_000;

/// Container id used by the fixtures.
pub const CONTAINER: &str = "stack";

// ============================================================================
// Fixtures
// ============================================================================

/// A screen that draws `label` on its first line.
pub fn text_screen(label: impl Into<String>) -> impl Screen + 'static {
    let label = label.into();
    move |canvas: &mut Canvas<'_>| {
        canvas.line(&label);
    }
}

/// Navigation state over `keys`; the first key is the base.
///
/// # Panics
///
/// If `keys` is empty or has duplicates.
pub fn state(keys: &[&str]) -> NavigationState {
    let routes = keys.iter().map(|k| Route::new(*k, *k)).collect();
    NavigationState::new(ContainerId::new(CONTAINER), routes).expect("valid fixture state")
}

/// Descriptors drawing each key's own name, with default options.
pub fn descriptors(keys: &[&str]) -> DescriptorRegistry {
    keys.iter()
        .map(|k| {
            let descriptor = Descriptor::new(
                std::rc::Rc::new(text_screen(*k)),
                SheetOptions::default(),
            );
            (RouteKey::new(k), descriptor)
        })
        .collect()
}

/// Text rendering of a frame, one line per layer:
/// `base home-0 p=1.00 [home]` or `sheet detail-1 p=0.42 a=0.42 [detail]`.
pub fn dump_frame(frame: &Frame) -> String {
    let mut out = String::new();
    for layer in frame.layers() {
        let kind = match layer.kind {
            LayerKind::Base => "base",
            LayerKind::Sheet => "sheet",
        };
        let _ = write!(out, "{kind} {} p={:.2}", layer.route, layer.progress);
        if let Some(backdrop) = layer.backdrop {
            let _ = write!(out, " a={:.2}", backdrop.opacity);
        }
        let _ = writeln!(out, " [{}]", layer.lines.join("|"));
    }
    out
}

// ============================================================================
// RecordingDispatcher
// ============================================================================

/// Records dispatched actions.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    actions: RefCell<Vec<NavAction>>,
    gone: Cell<bool>,
    rejected: Cell<usize>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate container teardown: later dispatches fail with
    /// [`SheetError::ContainerGone`] and are not recorded.
    pub fn tear_down(&self) {
        self.gone.set(true);
    }

    pub fn actions(&self) -> Vec<NavAction> {
        self.actions.borrow().clone()
    }

    /// Number of pops whose source is `key`.
    pub fn pops_for(&self, key: &str) -> usize {
        self.actions
            .borrow()
            .iter()
            .filter(|a| matches!(a, NavAction::Pop { source, .. } if source.as_str() == key))
            .count()
    }

    /// Dispatches refused after teardown.
    pub fn rejected(&self) -> usize {
        self.rejected.get()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.borrow().is_empty()
    }

    /// Recorded actions as JSON lines.
    pub fn to_jsonl(&self) -> String {
        let mut out = String::new();
        for action in self.actions.borrow().iter() {
            // NavAction serializes infallibly: strings only.
            if let Ok(line) = serde_json::to_string(action) {
                out.push_str(&line);
                out.push('\n');
            }
        }
        out
    }
}

impl Dispatch for RecordingDispatcher {
    fn dispatch(&self, action: NavAction) -> Result<()> {
        if self.gone.get() {
            self.rejected.set(self.rejected.get() + 1);
            return Err(SheetError::ContainerGone);
        }
        tracing::trace!(action = %action, "recorded");
        self.actions.borrow_mut().push(action);
        Ok(())
    }
}

// ============================================================================
// StackDriver
// ============================================================================

/// Drives a [`StackReconciler`] against a scripted navigation state.
///
/// Pops the reconciler dispatches are recorded but not applied; call
/// [`StackDriver::apply_pops`] to let the state catch up the way a real
/// container would.
#[derive(Debug)]
pub struct StackDriver {
    pub stack: StackReconciler,
    pub queue: EventQueue,
    pub dispatcher: RecordingDispatcher,
    keys: Vec<String>,
    registry: DescriptorRegistry,
    outcomes: Vec<(RouteKey, DismissOutcome)>,
    applied_pops: usize,
}

impl StackDriver {
    /// Start with only `base` in the state.
    pub fn new(base: &str) -> Self {
        let mut driver = Self {
            stack: StackReconciler::new(),
            queue: EventQueue::new(),
            dispatcher: RecordingDispatcher::new(),
            keys: Vec::new(),
            registry: DescriptorRegistry::new(),
            outcomes: Vec::new(),
            applied_pops: 0,
        };
        driver.set(&[base]);
        driver
    }

    /// Current state keys, base first.
    pub fn keys(&self) -> Vec<&str> {
        self.keys.iter().map(String::as_str).collect()
    }

    pub fn state(&self) -> NavigationState {
        state(&self.keys())
    }

    /// Replace the state and reconcile.
    pub fn set(&mut self, keys: &[&str]) {
        self.keys = keys.iter().map(|k| (*k).to_owned()).collect();
        self.registry = descriptors(keys);
        let state = self.state();
        self.stack.reconcile(&state, &self.registry);
    }

    /// Append `key` to the state.
    pub fn push(&mut self, key: &str) {
        let mut keys = self.keys.clone();
        keys.push(key.to_owned());
        let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        self.set(&refs);
    }

    /// Remove `key` from the state (any position but the base).
    pub fn remove(&mut self, key: &str) {
        let keys: Vec<String> = self.keys.iter().filter(|k| *k != key).cloned().collect();
        let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        self.set(&refs);
    }

    /// One frame: tick panels, deliver events.
    pub fn step(&mut self) {
        self.stack.tick(FRAME, &mut self.queue);
        let events: Vec<SheetEvent> = self.queue.drain().collect();
        for event in events {
            if let Some(outcome) = self.stack.handle_event(&event, Some(&self.dispatcher)) {
                self.outcomes.push((event.key().clone(), outcome));
            }
        }
    }

    /// Step until the reconciler is idle.
    pub fn settle(&mut self) {
        for _ in 0..MAX_SETTLE_FRAMES {
            self.step();
            if self.stack.is_settled() {
                return;
            }
        }
    }

    /// Apply recorded pops the state has not seen yet.
    pub fn apply_pops(&mut self) {
        let actions = self.dispatcher.actions();
        let pending: Vec<RouteKey> = actions[self.applied_pops..]
            .iter()
            .filter_map(|action| match action {
                NavAction::Pop { source, .. } => Some(source.clone()),
                _ => None,
            })
            .collect();
        self.applied_pops = actions.len();
        for key in pending {
            self.remove(key.as_str());
        }
    }

    /// User swipe on sheet `key`. Returns false if nothing is mounted.
    pub fn swipe(&mut self, key: &str) -> bool {
        let key = RouteKey::new(key);
        match self.stack.panel_mut(&key) {
            Some(panel) => panel.swipe_dismiss(&mut self.queue),
            None => false,
        }
    }

    /// Mounted sheet keys, bottom to top.
    pub fn rendered(&self) -> Vec<&str> {
        self.stack
            .rendered_keys()
            .iter()
            .map(RouteKey::as_str)
            .collect()
    }

    /// Dismissal outcomes seen so far.
    pub fn outcomes(&self) -> &[(RouteKey, DismissOutcome)] {
        &self.outcomes
    }

    /// Evictions recorded for `key`.
    pub fn evictions(&self, key: &str) -> usize {
        self.outcomes
            .iter()
            .filter(|(k, o)| k.as_str() == key && matches!(o, DismissOutcome::Evicted { .. }))
            .count()
    }

    pub fn render(&self) -> Frame {
        let mut frame = Frame::new(40, 20);
        self.stack.render(&self.state(), &self.registry, &mut frame);
        frame
    }
}

// ============================================================================
// Strategies
// ============================================================================

/// proptest strategies for navigation scripts.
pub mod strategies {
    use proptest::prelude::*;

    /// One scripted step against a [`StackDriver`](super::StackDriver).
    #[derive(Debug, Clone)]
    pub enum Op {
        /// Push a fresh key.
        Push,
        /// Remove the sheet at this index of the tail (mod length).
        Remove(usize),
        /// Swipe-dismiss the rendered sheet at this index (mod length).
        Swipe(usize),
        /// Advance this many frames.
        Tick(u8),
        /// Let the state catch up with dispatched pops.
        ApplyPops,
    }

    pub fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => Just(Op::Push),
            2 => any::<usize>().prop_map(Op::Remove),
            2 => any::<usize>().prop_map(Op::Swipe),
            3 => (1u8..20).prop_map(Op::Tick),
            1 => Just(Op::ApplyPops),
        ]
    }

    pub fn script() -> impl Strategy<Value = Vec<Op>> {
        prop::collection::vec(op(), 1..60)
    }
}
