#![forbid(unsafe_code)]

//! Stack router: the navigation-state container sheets are reconciled
//! against.
//!
//! [`StackRouter`] owns a [`NavigationState`] and reduces [`NavAction`]s into
//! it. Screens are looked up by name in a [`ScreenRegistry`]; every route gets
//! a fresh key `"{name}-{n}"`, so a screen pushed twice is two presentations.
//!
//! # Invariants
//!
//! - The state always holds the base route; no action removes it.
//! - `version` increments exactly once per action that changed the state.
//! - Keys are never reused within one router.

use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;
use sheetnav_core::{
    ContainerId, Descriptor, DescriptorRegistry, NavAction, NavigationState, Result, Route,
    RouteKey, Screen, SheetError, SheetOptions,
};
use tracing::debug;

// ---------------------------------------------------------------------------
// ScreenRegistry
// ---------------------------------------------------------------------------

struct ScreenEntry {
    screen: Rc<dyn Screen>,
    /// Screen-specific options. `None` takes the registry defaults.
    options: Option<SheetOptions>,
}

/// Registered screens by route name.
pub struct ScreenRegistry {
    screens: AHashMap<String, ScreenEntry>,
    /// Registration order; the first name is the default initial route.
    order: Vec<String>,
    defaults: SheetOptions,
    gestures_enabled: bool,
}

impl Default for ScreenRegistry {
    fn default() -> Self {
        Self {
            screens: AHashMap::new(),
            order: Vec::new(),
            defaults: SheetOptions::default(),
            gestures_enabled: true,
        }
    }
}

impl fmt::Debug for ScreenRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenRegistry")
            .field("screens", &self.order)
            .field("defaults", &self.defaults)
            .field("gestures_enabled", &self.gestures_enabled)
            .finish()
    }
}

impl ScreenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a screen that presents with the registry defaults.
    #[must_use]
    pub fn screen(mut self, name: impl Into<String>, screen: impl Screen + 'static) -> Self {
        self.insert(name.into(), Rc::new(screen), None);
        self
    }

    /// Register a screen with its own options.
    #[must_use]
    pub fn screen_with(
        mut self,
        name: impl Into<String>,
        screen: impl Screen + 'static,
        options: SheetOptions,
    ) -> Self {
        self.insert(name.into(), Rc::new(screen), Some(options));
        self
    }

    /// Options for screens registered without their own.
    #[must_use]
    pub fn defaults(mut self, options: SheetOptions) -> Self {
        self.defaults = options;
        self
    }

    /// Turn user gestures off for every screen when `false`.
    #[must_use]
    pub fn gestures_enabled(mut self, enabled: bool) -> Self {
        self.gestures_enabled = enabled;
        self
    }

    pub(crate) fn set_defaults(&mut self, options: SheetOptions) {
        self.defaults = options;
    }

    pub(crate) fn set_gestures_enabled(&mut self, enabled: bool) {
        self.gestures_enabled = enabled;
    }

    fn insert(&mut self, name: String, screen: Rc<dyn Screen>, options: Option<SheetOptions>) {
        if !self.screens.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.screens.insert(name, ScreenEntry { screen, options });
    }

    pub fn contains(&self, name: &str) -> bool {
        self.screens.contains_key(name)
    }

    /// Name of the first registered screen.
    pub fn first(&self) -> Option<&str> {
        self.order.first().map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    /// Effective options for `name`.
    pub fn options(&self, name: &str) -> Option<SheetOptions> {
        let entry = self.screens.get(name)?;
        let mut options = entry
            .options
            .clone()
            .unwrap_or_else(|| self.defaults.clone());
        options.gesture_enabled &= self.gestures_enabled;
        Some(options.normalized())
    }

    /// Descriptor for a route showing screen `name`.
    pub fn descriptor(&self, name: &str) -> Option<Descriptor> {
        let entry = self.screens.get(name)?;
        let options = self.options(name)?;
        Some(Descriptor::new(Rc::clone(&entry.screen), options))
    }
}

// ---------------------------------------------------------------------------
// StackRouter
// ---------------------------------------------------------------------------

/// Navigation-state container and reducer.
#[derive(Debug)]
pub struct StackRouter {
    state: NavigationState,
    registry: ScreenRegistry,
    next_id: u64,
    version: u64,
}

impl StackRouter {
    /// Create a router whose base route shows screen `initial`.
    pub fn new(
        id: impl Into<ContainerId>,
        registry: ScreenRegistry,
        initial: &str,
    ) -> Result<Self> {
        if !registry.contains(initial) {
            return Err(SheetError::UnknownScreen(initial.to_owned()));
        }
        let base = Route::new(format!("{initial}-0"), initial);
        let state = NavigationState::new(id.into(), vec![base])?;
        Ok(Self {
            state,
            registry,
            next_id: 1,
            version: 0,
        })
    }

    /// Create a router whose base route is the first registered screen.
    pub fn with_first_screen(id: impl Into<ContainerId>, registry: ScreenRegistry) -> Result<Self> {
        let initial = registry.first().map(str::to_owned).ok_or(SheetError::EmptyState)?;
        Self::new(id, registry, &initial)
    }

    pub fn id(&self) -> &ContainerId {
        &self.state.key
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Bumped once per state change.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn registry(&self) -> &ScreenRegistry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut ScreenRegistry {
        &mut self.registry
    }

    /// Descriptors for every route of the current state.
    pub fn descriptors(&self) -> DescriptorRegistry {
        self.state
            .routes()
            .iter()
            .filter_map(|route| {
                let descriptor = self.registry.descriptor(&route.name)?;
                Some((route.key.clone(), descriptor))
            })
            .collect()
    }

    /// Reduce `action` into the state.
    ///
    /// Returns `Ok(true)` if the state changed. Actions addressed to another
    /// container, and pops of keys that are already gone, return `Ok(false)`.
    pub fn apply(&mut self, action: NavAction) -> Result<bool> {
        let changed = match &action {
            NavAction::Push { name } => {
                let route = self.route(name)?;
                self.state.push(route)?;
                true
            }
            NavAction::Pop { source, target } => {
                if !self.addressed_to(target) || !self.state.contains(source) {
                    false
                } else {
                    self.state.remove(source)?;
                    true
                }
            }
            NavAction::PopToTop { target } => {
                self.addressed_to(target) && !self.state.truncate_to_base().is_empty()
            }
            NavAction::Replace { source, name } => {
                let route = self.route(name)?;
                self.state.replace(source, route)?;
                true
            }
        };

        if changed {
            self.version += 1;
        }
        debug!(
            container = %self.state.key,
            action = %action,
            changed,
            version = self.version,
            depth = self.state.len(),
            "navigation action applied"
        );
        Ok(changed)
    }

    fn addressed_to(&self, target: &ContainerId) -> bool {
        target == &self.state.key
    }

    fn route(&mut self, name: &str) -> Result<Route> {
        if !self.registry.contains(name) {
            return Err(SheetError::UnknownScreen(name.to_owned()));
        }
        let key = RouteKey::new(format!("{name}-{}", self.next_id));
        self.next_id += 1;
        Ok(Route::new(key, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetnav_core::{Canvas, Rgba};

    fn noop(_: &mut Canvas<'_>) {}

    fn registry() -> ScreenRegistry {
        ScreenRegistry::new()
            .screen("home", noop)
            .screen("detail", noop)
            .screen_with("picker", noop, SheetOptions::new().target_opacity(0.4))
    }

    fn router() -> StackRouter {
        StackRouter::new("stack", registry(), "home").unwrap()
    }

    fn keys(router: &StackRouter) -> Vec<&str> {
        router.state().routes().iter().map(|r| r.key.as_str()).collect()
    }

    fn id() -> ContainerId {
        ContainerId::new("stack")
    }

    #[test]
    fn starts_with_base_only() {
        let r = router();
        assert_eq!(keys(&r), ["home-0"]);
        assert_eq!(r.version(), 0);
        assert_eq!(r.state().index(), 0);
    }

    #[test]
    fn first_screen_becomes_base() {
        let r = StackRouter::with_first_screen("stack", registry()).unwrap();
        assert_eq!(r.state().routes()[0].name, "home");
        assert_eq!(
            StackRouter::with_first_screen("stack", ScreenRegistry::new()).unwrap_err(),
            SheetError::EmptyState
        );
    }

    #[test]
    fn push_generates_fresh_keys() {
        let mut r = router();
        assert!(r.apply(NavAction::push("detail")).unwrap());
        assert!(r.apply(NavAction::push("detail")).unwrap());
        assert_eq!(keys(&r), ["home-0", "detail-1", "detail-2"]);
        assert_eq!(r.version(), 2);
    }

    #[test]
    fn push_unknown_screen_fails() {
        let mut r = router();
        let err = r.apply(NavAction::push("settings")).unwrap_err();
        assert_eq!(err, SheetError::UnknownScreen("settings".into()));
        assert_eq!(r.version(), 0);
    }

    #[test]
    fn pop_removes_only_the_source() {
        let mut r = router();
        for _ in 0..3 {
            r.apply(NavAction::push("detail")).unwrap();
        }
        assert!(r.apply(NavAction::pop(RouteKey::new("detail-2"), id())).unwrap());
        assert_eq!(keys(&r), ["home-0", "detail-1", "detail-3"]);
    }

    #[test]
    fn pop_of_missing_key_or_other_container_is_noop() {
        let mut r = router();
        r.apply(NavAction::push("detail")).unwrap();
        let v = r.version();
        assert!(!r.apply(NavAction::pop(RouteKey::new("gone"), id())).unwrap());
        assert!(
            !r.apply(NavAction::pop(RouteKey::new("detail-1"), ContainerId::new("other")))
                .unwrap()
        );
        assert_eq!(r.version(), v);
    }

    #[test]
    fn base_is_never_popped() {
        let mut r = router();
        let err = r
            .apply(NavAction::pop(RouteKey::new("home-0"), id()))
            .unwrap_err();
        assert_eq!(err, SheetError::BaseRouteNotPoppable(RouteKey::new("home-0")));
    }

    #[test]
    fn pop_to_top_keeps_base() {
        let mut r = router();
        r.apply(NavAction::push("detail")).unwrap();
        r.apply(NavAction::push("picker")).unwrap();
        assert!(r.apply(NavAction::PopToTop { target: id() }).unwrap());
        assert_eq!(keys(&r), ["home-0"]);
        assert!(!r.apply(NavAction::PopToTop { target: id() }).unwrap());
    }

    #[test]
    fn replace_swaps_in_place_with_new_key() {
        let mut r = router();
        r.apply(NavAction::push("detail")).unwrap();
        r.apply(NavAction::push("detail")).unwrap();
        let action = NavAction::Replace {
            source: RouteKey::new("detail-1"),
            name: "picker".into(),
        };
        assert!(r.apply(action).unwrap());
        assert_eq!(keys(&r), ["home-0", "picker-3", "detail-2"]);
    }

    #[test]
    fn descriptors_merge_registry_defaults() {
        let registry = registry()
            .defaults(SheetOptions::new().background_color(Rgba::WHITE))
            .gestures_enabled(false);
        let mut r = StackRouter::new("stack", registry, "home").unwrap();
        r.apply(NavAction::push("detail")).unwrap();
        r.apply(NavAction::push("picker")).unwrap();

        let d = r.descriptors();
        assert_eq!(d.len(), 3);
        let detail = d.get(&RouteKey::new("detail-1")).unwrap().options();
        assert_eq!(detail.background_color, Rgba::WHITE);
        assert!(!detail.gesture_enabled);
        let picker = d.get(&RouteKey::new("picker-2")).unwrap().options();
        assert_eq!(picker.background_color, Rgba::BLACK);
        assert!((picker.target_opacity - 0.4).abs() < f32::EPSILON);
        assert!(!picker.gesture_enabled);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Push,
            Pop(usize),
            PopToTop,
            Replace(usize),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                3 => Just(Op::Push),
                2 => any::<usize>().prop_map(Op::Pop),
                1 => Just(Op::PopToTop),
                1 => any::<usize>().prop_map(Op::Replace),
            ]
        }

        proptest! {
            #[test]
            fn base_survives_and_keys_stay_unique(ops in prop::collection::vec(op(), 1..50)) {
                let mut r = router();
                let mut changes = 0u64;
                for op in ops {
                    let tail: Vec<RouteKey> = r.state().tail_keys().cloned().collect();
                    let action = match op {
                        Op::Push => NavAction::push("detail"),
                        Op::PopToTop => NavAction::PopToTop { target: id() },
                        Op::Pop(_) | Op::Replace(_) if tail.is_empty() => continue,
                        Op::Pop(i) => NavAction::pop(tail[i % tail.len()].clone(), id()),
                        Op::Replace(i) => NavAction::Replace {
                            source: tail[i % tail.len()].clone(),
                            name: "picker".into(),
                        },
                    };
                    if r.apply(action).unwrap() {
                        changes += 1;
                    }

                    prop_assert_eq!(r.state().routes()[0].key.as_str(), "home-0");
                    prop_assert!(r.state().validate().is_ok());
                    prop_assert_eq!(r.version(), changes);
                    prop_assert_eq!(r.descriptors().len(), r.state().len());
                }
            }
        }
    }
}
