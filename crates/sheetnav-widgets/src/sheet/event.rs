#![forbid(unsafe_code)]

//! Discrete sheet events and the single-threaded queue that carries them.
//!
//! Panels never call back into the reconciler. They push [`SheetEvent`]s into
//! an [`EventQueue`], and the owner drains the queue into
//! [`StackReconciler::handle_event`](super::StackReconciler::handle_event)
//! once the frame's animation step is done.

use std::collections::VecDeque;

use sheetnav_core::RouteKey;

/// Something a panel reports.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetEvent {
    /// Progress moved during a tick or drag (1 = open, 0 = closed).
    ProgressChanged {
        key: RouteKey,
        previous: f64,
        current: f64,
    },
    /// Progress reached 0 from above. Sent at most once per presentation.
    Dismissed { key: RouteKey },
}

impl SheetEvent {
    /// Route the event is about.
    pub fn key(&self) -> &RouteKey {
        match self {
            Self::ProgressChanged { key, .. } | Self::Dismissed { key } => key,
        }
    }

    pub fn is_dismissed(&self) -> bool {
        matches!(self, Self::Dismissed { .. })
    }
}

/// FIFO queue of sheet events.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<SheetEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SheetEvent) {
        self.events.push_back(event);
    }

    pub fn pop(&mut self) -> Option<SheetEvent> {
        self.events.pop_front()
    }

    /// Take every queued event, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = SheetEvent> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SheetEvent> + '_ {
        self.events.iter()
    }
}
