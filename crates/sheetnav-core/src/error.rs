#![forbid(unsafe_code)]

//! Error type shared by the sheetnav crates.
//!
//! None of these errors are user-visible. The reconciler treats stale keys,
//! duplicate dismissals, and dispatch after teardown as local no-ops; the
//! variants below exist so collaborators (router, config, parsers) can report
//! programming errors precisely.

use crate::key::RouteKey;

/// Convenience alias used across sheetnav.
pub type Result<T, E = SheetError> = std::result::Result<T, E>;

/// Errors from navigation-state and option handling.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SheetError {
    /// A navigation state must always contain the base route.
    #[error("navigation state has no routes")]
    EmptyState,
    /// Route keys must be unique within one navigation state.
    #[error("duplicate route key '{0}'")]
    DuplicateRouteKey(RouteKey),
    /// An action referenced a route key that the state does not contain.
    #[error("unknown route key '{0}'")]
    UnknownRoute(RouteKey),
    /// A push or replace named a screen that was never registered.
    #[error("no screen registered under '{0}'")]
    UnknownScreen(String),
    /// The base route is torn down with the whole stack, never popped.
    #[error("the base route '{0}' cannot be popped")]
    BaseRouteNotPoppable(RouteKey),
    /// The navigation container was dropped before the action arrived.
    #[error("navigation container is no longer reachable")]
    ContainerGone,
    /// A size spec could not be parsed.
    #[error("invalid size '{0}': expected cells (\"12\") or a percentage (\"50%\")")]
    InvalidSize(String),
    /// A color could not be parsed.
    #[error("invalid color '{0}': expected #rrggbb, #rrggbbaa, or a color name")]
    InvalidColor(String),
}
