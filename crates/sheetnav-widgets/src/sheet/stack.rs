#![forbid(unsafe_code)]

//! Stack reconciler: keeps the declarative route list and the set of mounted,
//! animating sheets in agreement.
//!
//! The navigation state says which sheets *should* be shown. Panels say which
//! sheets are *still on screen*, including ones already dropped from the
//! state but still animating out. The reconciler owns every [`PanelRecord`],
//! the descriptor snapshots, and the ordered list of mounted keys.
//!
//! # Invariants
//!
//! - Every tail key of the last reconciled state with a descriptor is mounted.
//! - A record with `removing == false` belongs to a key in the last
//!   reconciled tail; `removing == true` records are absent from it but stay
//!   mounted until their panel dismisses.
//! - Mounted keys keep the order in which they were first appended, whatever
//!   happens to other keys.
//! - A user-driven dismissal (record not `removing`) dispatches exactly one
//!   pop before the record is evicted; a state-driven one dispatches none.
//!
//! # Failure Modes
//!
//! - Dismissal of an already-evicted key is a no-op
//!   ([`DismissOutcome::AlreadyEvicted`]).
//! - A mounted key without a descriptor snapshot is skipped at render time.
//! - A pop that cannot be delivered (container gone) is dropped silently.
//!
//! # Example
//!
//! ```ignore
//! let mut stack = StackReconciler::new();
//! let mut queue = EventQueue::new();
//!
//! // Navigation state changed: diff keys, mount or flag panels.
//! stack.reconcile(&state, &descriptors);
//!
//! // Each frame: start pending closes, advance animations.
//! stack.tick(frame_time, &mut queue);
//!
//! // Deliver panel events; user dismissals dispatch a pop.
//! for event in queue.drain() {
//!     stack.handle_event(&event, Some(&container));
//! }
//!
//! // Project base + sheets into the frame.
//! stack.render(&state, &descriptors, &mut frame);
//! ```

use std::time::Duration;

use ahash::{AHashMap, AHashSet};
use sheetnav_core::{
    ContainerId, Descriptor, DescriptorRegistry, Dispatch, Frame, NavAction, NavigationState,
    RouteKey,
};

use super::animation::{SheetAnimationConfig, SheetPhase};
use super::base::BaseSurface;
use super::event::{EventQueue, SheetEvent};
use super::panel::{Panel, SheetView};
use crate::Widget;

/// Mount record for one sheet key.
#[derive(Debug, Clone)]
pub struct PanelRecord {
    key: RouteKey,
    /// The state dropped this key; the panel must close.
    removing: bool,
    panel: Panel,
}

impl PanelRecord {
    pub fn key(&self) -> &RouteKey {
        &self.key
    }

    pub fn is_removing(&self) -> bool {
        self.removing
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }
}

/// What one call to [`StackReconciler::reconcile`] changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Keys newly mounted, in stacking order.
    pub added: Vec<RouteKey>,
    /// Keys flagged `removing`.
    pub dropped: Vec<RouteKey>,
    /// Keys that came back while still closing and were re-presented.
    pub revived: Vec<RouteKey>,
    /// New keys the registry had no descriptor for; not mounted.
    pub missing_descriptor: Vec<RouteKey>,
}

impl ReconcileReport {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.dropped.is_empty()
            && self.revived.is_empty()
            && self.missing_descriptor.is_empty()
    }
}

/// Result of a dismissal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissOutcome {
    /// The record was evicted. `dispatched` is true if a pop reached the
    /// container.
    Evicted { dispatched: bool },
    /// Nothing is mounted under that key any more.
    AlreadyEvicted,
    /// The panel was re-presented after the event was queued.
    Superseded,
}

/// Reconciles navigation state with mounted sheet panels.
#[derive(Debug, Default)]
pub struct StackReconciler {
    /// Mounted sheet keys, bottom to top.
    rendered: Vec<RouteKey>,
    records: AHashMap<RouteKey, PanelRecord>,
    /// Descriptor snapshots taken when each key was first observed.
    snapshots: AHashMap<RouteKey, Descriptor>,
    /// Tail keys of the last reconciled state.
    previous_tail: Vec<RouteKey>,
    /// Container of the last reconciled state; target of pop dispatches.
    container: Option<ContainerId>,
    config: SheetAnimationConfig,
}

impl StackReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reconciler whose panels use `config` for their transitions.
    pub fn with_config(config: SheetAnimationConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SheetAnimationConfig {
        &self.config
    }

    // --- State Diffing ---

    /// Diff the state's tail keys against the previous ones.
    ///
    /// New keys get a descriptor snapshot, a record, and a presented panel,
    /// appended on top. Dropped keys are flagged `removing`; their panels
    /// start closing on the next [`tick`](Self::tick). A new key missing from
    /// `registry` is reported and mounted once a later registry has it.
    pub fn reconcile(
        &mut self,
        state: &NavigationState,
        registry: &DescriptorRegistry,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        let tail: Vec<RouteKey> = state.tail_keys().cloned().collect();
        let previous: AHashSet<&RouteKey> = self.previous_tail.iter().collect();
        let current: AHashSet<&RouteKey> = tail.iter().collect();

        for key in tail.iter().filter(|key| !previous.contains(key)) {
            if let Some(record) = self.records.get_mut(key) {
                // Dropped earlier, back before the exit finished.
                if record.removing {
                    record.removing = false;
                    record.panel.present();
                    report.revived.push(key.clone());
                }
                continue;
            }

            let Some(descriptor) = registry.get(key) else {
                report.missing_descriptor.push(key.clone());
                continue;
            };

            let mut panel = Panel::new(key.clone(), descriptor.options(), &self.config);
            panel.present();
            self.snapshots.insert(key.clone(), descriptor.clone());
            self.records.insert(
                key.clone(),
                PanelRecord {
                    key: key.clone(),
                    removing: false,
                    panel,
                },
            );
            self.rendered.push(key.clone());
            report.added.push(key.clone());
        }

        for key in self.previous_tail.iter().filter(|key| !current.contains(key)) {
            if let Some(record) = self.records.get_mut(key)
                && !record.removing
            {
                record.removing = true;
                report.dropped.push(key.clone());
            }
        }

        // Keys without a descriptor stay out so the next reconcile retries them.
        self.previous_tail = tail
            .into_iter()
            .filter(|key| !report.missing_descriptor.contains(key))
            .collect();
        self.container = Some(state.key.clone());

        #[cfg(feature = "tracing")]
        if !report.is_empty() {
            tracing::debug!(
                container = %state.key,
                added = ?report.added,
                dropped = ?report.dropped,
                revived = ?report.revived,
                missing = ?report.missing_descriptor,
                "sheet stack reconciled"
            );
        }

        report
    }

    // --- Frame Step ---

    /// Start exits for `removing` records, then advance every panel.
    pub fn tick(&mut self, delta: Duration, queue: &mut EventQueue) {
        for key in &self.rendered {
            let Some(record) = self.records.get_mut(key) else {
                continue;
            };
            if record.removing {
                record.panel.close(queue);
            }
            record.panel.tick(delta, queue);
        }
    }

    // --- Event Handling ---

    /// Route one panel event.
    ///
    /// Returns the outcome for `Dismissed` events, `None` otherwise.
    pub fn handle_event(
        &mut self,
        event: &SheetEvent,
        dispatch: Option<&dyn Dispatch>,
    ) -> Option<DismissOutcome> {
        match event {
            SheetEvent::ProgressChanged { .. } => None,
            SheetEvent::Dismissed { key } => {
                if let Some(record) = self.records.get(key)
                    && record.panel.phase() != SheetPhase::Closed
                {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(key = %key, "stale dismiss for re-presented sheet ignored");
                    return Some(DismissOutcome::Superseded);
                }
                Some(self.handle_dismiss(key, dispatch))
            }
        }
    }

    /// A panel finished leaving.
    ///
    /// If the state never asked for the removal, a pop targeting `key` is
    /// dispatched first so the container catches up. The record is evicted
    /// either way.
    pub fn handle_dismiss(
        &mut self,
        key: &RouteKey,
        dispatch: Option<&dyn Dispatch>,
    ) -> DismissOutcome {
        let Some(record) = self.records.get(key) else {
            #[cfg(feature = "tracing")]
            tracing::trace!(key = %key, "duplicate dismiss ignored");
            return DismissOutcome::AlreadyEvicted;
        };

        let mut dispatched = false;
        if !record.removing
            && let (Some(dispatch), Some(target)) = (dispatch, self.container.clone())
        {
            let action = NavAction::pop(key.clone(), target);
            match dispatch.dispatch(action) {
                Ok(()) => {
                    dispatched = true;
                    #[cfg(feature = "tracing")]
                    tracing::debug!(key = %key, "user dismissal dispatched pop");
                }
                Err(_err) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(key = %key, error = %_err, "pop dropped");
                }
            }
        }

        self.evict(key);
        DismissOutcome::Evicted { dispatched }
    }

    /// Forget everything about `key`.
    fn evict(&mut self, key: &RouteKey) {
        self.snapshots.remove(key);
        self.records.remove(key);
        self.rendered.retain(|k| k != key);
    }

    // --- Rendering ---

    /// Project the Base Surface and every mounted sheet into `frame`,
    /// bottom to top.
    pub fn render(
        &self,
        state: &NavigationState,
        registry: &DescriptorRegistry,
        frame: &mut Frame,
    ) {
        let area = frame.area();

        if let Some(base) = state.base_key() {
            match registry.get(base) {
                Some(descriptor) => BaseSurface::new(base, descriptor).render(area, frame),
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(key = %base, "base route has no descriptor");
                }
            }
        }

        for key in &self.rendered {
            match (self.records.get(key), self.snapshots.get(key)) {
                (Some(record), Some(descriptor)) => {
                    SheetView::new(&record.panel, descriptor).render(area, frame);
                }
                _ => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(key = %key, "stale key skipped");
                }
            }
        }
    }

    // --- Gestures ---

    /// Mutable access to a mounted panel (gestures, snapping).
    pub fn panel_mut(&mut self, key: &RouteKey) -> Option<&mut Panel> {
        self.records.get_mut(key).map(|record| &mut record.panel)
    }

    // --- State Queries ---

    /// Mounted sheet keys, bottom to top.
    pub fn rendered_keys(&self) -> &[RouteKey] {
        &self.rendered
    }

    /// Tail keys of the last reconciled state.
    pub fn previous_tail_keys(&self) -> &[RouteKey] {
        &self.previous_tail
    }

    pub fn record(&self, key: &RouteKey) -> Option<&PanelRecord> {
        self.records.get(key)
    }

    pub fn panel(&self, key: &RouteKey) -> Option<&Panel> {
        self.records.get(key).map(|record| &record.panel)
    }

    /// `Some(removing)` for a mounted key, `None` once evicted.
    pub fn is_removing(&self, key: &RouteKey) -> Option<bool> {
        self.records.get(key).map(|record| record.removing)
    }

    pub fn snapshot(&self, key: &RouteKey) -> Option<&Descriptor> {
        self.snapshots.get(key)
    }

    pub fn contains(&self, key: &RouteKey) -> bool {
        self.records.contains_key(key)
    }

    /// Number of mounted sheets.
    pub fn depth(&self) -> usize {
        self.rendered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rendered.is_empty()
    }

    /// No panel is animating and no exit is pending.
    pub fn is_settled(&self) -> bool {
        self.records
            .values()
            .all(|record| !record.removing && !record.panel.is_animating())
    }
}
