#![forbid(unsafe_code)]

//! Weak dispatch handle to a [`StackRouter`].
//!
//! Sheets and the reconciler hold a [`ContainerHandle`] rather than the router
//! itself, so a torn-down container cannot be kept alive, or resurrected, by
//! a late dismissal.
//!
//! # Failure Modes
//!
//! - **Dispatch after teardown**: returns [`SheetError::ContainerGone`]; the
//!   reconciler drops it silently.
//! - **Re-entrant dispatch**: dispatching while the router is already
//!   borrowed (from inside [`StackRouter::apply`]) panics (RefCell borrow
//!   rules). The navigator never holds a router borrow while delivering
//!   sheet events.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use sheetnav_core::{Dispatch, NavAction, Result, SheetError};
use tracing::debug;

use crate::router::StackRouter;

/// Non-owning [`Dispatch`] implementation for a router.
#[derive(Debug, Clone)]
pub struct ContainerHandle {
    router: Weak<RefCell<StackRouter>>,
}

impl ContainerHandle {
    pub fn new(router: &Rc<RefCell<StackRouter>>) -> Self {
        Self {
            router: Rc::downgrade(router),
        }
    }

    /// Whether the router is still alive.
    pub fn is_connected(&self) -> bool {
        self.router.strong_count() > 0
    }
}

impl Dispatch for ContainerHandle {
    fn dispatch(&self, action: NavAction) -> Result<()> {
        let Some(router) = self.router.upgrade() else {
            debug!(action = %action, "dispatch after container teardown dropped");
            return Err(SheetError::ContainerGone);
        };
        router.borrow_mut().apply(action).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::ScreenRegistry;
    use sheetnav_core::{Canvas, ContainerId, RouteKey};

    fn router() -> Rc<RefCell<StackRouter>> {
        let registry = ScreenRegistry::new()
            .screen("home", |_: &mut Canvas<'_>| {})
            .screen("detail", |_: &mut Canvas<'_>| {});
        Rc::new(RefCell::new(StackRouter::new("stack", registry, "home").unwrap()))
    }

    #[test]
    fn dispatch_reaches_live_router() {
        let router = router();
        let handle = ContainerHandle::new(&router);
        handle.dispatch(NavAction::push("detail")).unwrap();
        handle
            .dispatch(NavAction::pop(RouteKey::new("detail-1"), ContainerId::new("stack")))
            .unwrap();
        assert_eq!(router.borrow().version(), 2);
    }

    #[test]
    fn dispatch_after_teardown_reports_gone() {
        let router = router();
        let handle = ContainerHandle::new(&router);
        assert!(handle.is_connected());
        drop(router);
        assert!(!handle.is_connected());
        assert_eq!(
            handle.dispatch(NavAction::push("detail")),
            Err(SheetError::ContainerGone)
        );
    }

    #[test]
    fn handle_does_not_keep_router_alive() {
        let router = router();
        let handle = ContainerHandle::new(&router);
        let weak = Rc::downgrade(&router);
        drop(router);
        assert!(weak.upgrade().is_none());
        drop(handle);
    }
}
