#![forbid(unsafe_code)]

//! Declarative navigation state: an ordered stack of routes.
//!
//! # Invariants
//!
//! - The first route is the Base Surface; the rest are sheets, bottom to top.
//! - Route keys are unique within one state ([`NavigationState::validate`]).
//!
//! The container that owns the state grows and shrinks it at the tail, but
//! consumers must tolerate removal from any position.

use crate::error::{Result, SheetError};
use crate::key::{ContainerId, RouteKey};
use ahash::AHashSet;

/// One entry of the navigation stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Unique key for this presentation.
    pub key: RouteKey,
    /// Name of the registered screen this route shows.
    pub name: String,
}

impl Route {
    #[must_use]
    pub fn new(key: impl Into<RouteKey>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
        }
    }
}

/// Ordered route list owned by a navigation container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    /// The container this state belongs to.
    pub key: ContainerId,
    routes: Vec<Route>,
}

impl NavigationState {
    /// Build a state and check its invariants.
    pub fn new(key: ContainerId, routes: Vec<Route>) -> Result<Self> {
        let state = Self { key, routes };
        state.validate()?;
        Ok(state)
    }

    /// Check that the state is non-empty and its keys are unique.
    pub fn validate(&self) -> Result<()> {
        if self.routes.is_empty() {
            return Err(SheetError::EmptyState);
        }
        let mut seen = AHashSet::with_capacity(self.routes.len());
        for route in &self.routes {
            if !seen.insert(&route.key) {
                return Err(SheetError::DuplicateRouteKey(route.key.clone()));
            }
        }
        Ok(())
    }

    /// All routes, base first.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// The Base Surface route.
    #[must_use]
    pub fn base(&self) -> Option<&Route> {
        self.routes.first()
    }

    /// Key of the Base Surface route.
    #[must_use]
    pub fn base_key(&self) -> Option<&RouteKey> {
        self.base().map(|route| &route.key)
    }

    /// Stacked sheet routes, bottom to top (the base excluded).
    #[must_use]
    pub fn tail(&self) -> &[Route] {
        self.routes.get(1..).unwrap_or_default()
    }

    /// Keys of every stacked sheet, bottom to top (the base excluded).
    pub fn tail_keys(&self) -> impl Iterator<Item = &RouteKey> + '_ {
        self.routes.iter().skip(1).map(|route| &route.key)
    }

    /// Index of the focused (top) route. `0` means only the base is shown.
    #[must_use]
    pub fn index(&self) -> usize {
        self.routes.len().saturating_sub(1)
    }

    /// Number of routes including the base.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Whether a route with this key is present.
    #[must_use]
    pub fn contains(&self, key: &RouteKey) -> bool {
        self.position(key).is_some()
    }

    /// Position of the route with this key.
    #[must_use]
    pub fn position(&self, key: &RouteKey) -> Option<usize> {
        self.routes.iter().position(|route| &route.key == key)
    }

    /// Append a route on top of the stack.
    pub fn push(&mut self, route: Route) -> Result<()> {
        if self.contains(&route.key) {
            return Err(SheetError::DuplicateRouteKey(route.key));
        }
        self.routes.push(route);
        Ok(())
    }

    /// Remove the route at `key`. Routes above it keep their order.
    ///
    /// The base cannot be removed.
    pub fn remove(&mut self, key: &RouteKey) -> Result<Route> {
        let idx = self
            .position(key)
            .ok_or_else(|| SheetError::UnknownRoute(key.clone()))?;
        if idx == 0 {
            return Err(SheetError::BaseRouteNotPoppable(key.clone()));
        }
        Ok(self.routes.remove(idx))
    }

    /// Drop every sheet, keeping only the base.
    pub fn truncate_to_base(&mut self) -> Vec<Route> {
        if self.routes.len() <= 1 {
            return Vec::new();
        }
        self.routes.split_off(1)
    }

    /// Swap the route at `key` for `route`, keeping its position.
    pub fn replace(&mut self, key: &RouteKey, route: Route) -> Result<Route> {
        let idx = self
            .position(key)
            .ok_or_else(|| SheetError::UnknownRoute(key.clone()))?;
        if &route.key != key && self.contains(&route.key) {
            return Err(SheetError::DuplicateRouteKey(route.key));
        }
        Ok(std::mem::replace(&mut self.routes[idx], route))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(keys: &[&str]) -> NavigationState {
        let routes = keys.iter().map(|k| Route::new(*k, "screen")).collect();
        NavigationState::new(ContainerId::new("stack"), routes).unwrap()
    }

    #[test]
    fn base_and_tail_split() {
        let s = state(&["base", "detail-1", "detail-2"]);
        assert_eq!(s.base_key().map(RouteKey::as_str), Some("base"));
        let tail: Vec<_> = s.tail_keys().map(RouteKey::as_str).collect();
        assert_eq!(tail, ["detail-1", "detail-2"]);
        assert_eq!(s.index(), 2);
    }

    #[test]
    fn empty_state_is_rejected() {
        let err = NavigationState::new(ContainerId::new("stack"), Vec::new()).unwrap_err();
        assert_eq!(err, SheetError::EmptyState);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let routes = vec![Route::new("a", "x"), Route::new("a", "y")];
        let err = NavigationState::new(ContainerId::new("stack"), routes).unwrap_err();
        assert_eq!(err, SheetError::DuplicateRouteKey(RouteKey::new("a")));
    }

    #[test]
    fn remove_keeps_routes_above() {
        let mut s = state(&["base", "a", "b", "c"]);
        let removed = s.remove(&RouteKey::new("b")).unwrap();
        assert_eq!(removed.key.as_str(), "b");
        let keys: Vec<_> = s.routes().iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, ["base", "a", "c"]);
    }

    #[test]
    fn base_cannot_be_removed() {
        let mut s = state(&["base", "a"]);
        let err = s.remove(&RouteKey::new("base")).unwrap_err();
        assert!(matches!(err, SheetError::BaseRouteNotPoppable(_)));
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn truncate_to_base_on_base_only_is_empty() {
        let mut s = state(&["base"]);
        assert!(s.truncate_to_base().is_empty());
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn replace_keeps_position() {
        let mut s = state(&["base", "a", "b"]);
        let old = s.replace(&RouteKey::new("a"), Route::new("z", "other")).unwrap();
        assert_eq!(old.key.as_str(), "a");
        let keys: Vec<_> = s.routes().iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, ["base", "z", "b"]);
    }

    #[test]
    fn push_rejects_existing_key() {
        let mut s = state(&["base", "a"]);
        assert!(s.push(Route::new("a", "x")).is_err());
        assert!(s.push(Route::new("b", "x")).is_ok());
    }
}
