#![forbid(unsafe_code)]

//! Tab re-selection: pressing the active tab again resets its sheet stack.
//!
//! A [`TabPress`] is shared with every collaborator listening for the press.
//! Any of them may call [`TabPress::prevent_default`] to keep the stack as it
//! is. The reset happens only if all of these hold:
//!
//! 1. the state has more than one route,
//! 2. the tab was focused when it was pressed,
//! 3. no collaborator prevented the default.
//!
//! With [`TabResetTiming::NextFrame`] the check runs at the start of the next
//! frame, so listeners that react after the press still get a say.

use std::cell::Cell;
use std::rc::Rc;

/// When a tab-press reset is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "kebab-case"))]
pub enum TabResetTiming {
    /// At the start of the next frame.
    #[default]
    NextFrame,
    /// Synchronously, inside the press handler.
    Immediate,
}

/// A tab-press event. Clones share the prevented flag.
#[derive(Debug, Clone, Default)]
pub struct TabPress {
    default_prevented: Rc<Cell<bool>>,
}

impl TabPress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the stack as it is.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// What a tab press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabPressOutcome {
    /// The stack was reset to its base route.
    Reset,
    /// Evaluation postponed to the next frame.
    Deferred,
    /// A reset condition failed.
    Ignored(TabResetSkip),
}

/// Why a tab press did not reset the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabResetSkip {
    OnlyBase,
    NotFocused,
    DefaultPrevented,
}

/// A press waiting for the next frame, with focus sampled at press time.
#[derive(Debug, Clone)]
pub(crate) struct PendingTabPress {
    pub(crate) press: TabPress,
    pub(crate) was_focused: bool,
}

/// Apply the reset conditions. `index` is the state index (0 = base only).
pub(crate) fn reset_decision(
    index: usize,
    was_focused: bool,
    press: &TabPress,
) -> Result<(), TabResetSkip> {
    if index == 0 {
        return Err(TabResetSkip::OnlyBase);
    }
    if !was_focused {
        return Err(TabResetSkip::NotFocused);
    }
    if press.is_default_prevented() {
        return Err(TabResetSkip::DefaultPrevented);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_prevention() {
        let press = TabPress::new();
        let listener = press.clone();
        assert!(!press.is_default_prevented());
        listener.prevent_default();
        assert!(press.is_default_prevented());
    }

    #[test]
    fn decision_checks_every_condition() {
        let press = TabPress::new();
        assert_eq!(reset_decision(0, true, &press), Err(TabResetSkip::OnlyBase));
        assert_eq!(reset_decision(2, false, &press), Err(TabResetSkip::NotFocused));
        assert_eq!(reset_decision(2, true, &press), Ok(()));
        press.prevent_default();
        assert_eq!(
            reset_decision(2, true, &press),
            Err(TabResetSkip::DefaultPrevented)
        );
    }

    #[test]
    fn next_frame_is_default_timing() {
        assert_eq!(TabResetTiming::default(), TabResetTiming::NextFrame);
    }
}
