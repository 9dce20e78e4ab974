#![forbid(unsafe_code)]

//! Navigation actions and the dispatch seam toward the navigation container.

use core::fmt;

use crate::error::Result;
use crate::key::{ContainerId, RouteKey};

/// An action understood by the navigation-state reducer.
///
/// Serialized (under the `serde` feature) as
/// `{ "action": "pop", "source": "detail-1", "target": "stack-0" }`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "action", rename_all = "kebab-case"))]
pub enum NavAction {
    /// Present a registered screen on top of the stack.
    Push { name: String },
    /// Remove `source` from container `target`. Routes above it stay.
    Pop { source: RouteKey, target: ContainerId },
    /// Remove every sheet, keeping only the base.
    PopToTop { target: ContainerId },
    /// Swap `source` for a fresh presentation of screen `name`.
    Replace { source: RouteKey, name: String },
}

impl NavAction {
    /// Pop action targeting `source` in container `target`.
    #[must_use]
    pub fn pop(source: RouteKey, target: ContainerId) -> Self {
        Self::Pop { source, target }
    }

    #[must_use]
    pub fn push(name: impl Into<String>) -> Self {
        Self::Push { name: name.into() }
    }

    /// Short name used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Push { .. } => "push",
            Self::Pop { .. } => "pop",
            Self::PopToTop { .. } => "pop-to-top",
            Self::Replace { .. } => "replace",
        }
    }
}

impl fmt::Display for NavAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push { name } => write!(f, "push({name})"),
            Self::Pop { source, target } => write!(f, "pop({source} in {target})"),
            Self::PopToTop { target } => write!(f, "pop-to-top({target})"),
            Self::Replace { source, name } => write!(f, "replace({source} -> {name})"),
        }
    }
}

/// Something that accepts navigation actions.
///
/// Implementations that may outlive their container must report
/// [`SheetError::ContainerGone`](crate::SheetError::ContainerGone) instead of
/// panicking; callers treat that as a silent drop.
pub trait Dispatch {
    fn dispatch(&self, action: NavAction) -> Result<()>;
}

impl<D: Dispatch + ?Sized> Dispatch for &D {
    fn dispatch(&self, action: NavAction) -> Result<()> {
        (**self).dispatch(action)
    }
}
