#![forbid(unsafe_code)]

//! Descriptor registry: what to render for each route key, and how.
//!
//! A [`Descriptor`] pairs a route's [`Screen`] with its [`SheetOptions`]. The
//! navigation container supplies a fresh [`DescriptorRegistry`] for every
//! state it publishes. Consumers that outlive a key (a sheet still animating
//! out) snapshot the descriptor by cloning it; a clone shares the screen and
//! is never mutated afterwards.

use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;

use crate::frame::Canvas;
use crate::key::RouteKey;
use crate::options::SheetOptions;

/// Render capability of a route.
pub trait Screen {
    /// Draw the route's content.
    fn render(&self, canvas: &mut Canvas<'_>);
}

impl<F> Screen for F
where
    F: Fn(&mut Canvas<'_>),
{
    fn render(&self, canvas: &mut Canvas<'_>) {
        self(canvas)
    }
}

/// Render capability plus options for one route key.
#[derive(Clone)]
pub struct Descriptor {
    screen: Rc<dyn Screen>,
    options: SheetOptions,
}

impl Descriptor {
    #[must_use]
    pub fn new(screen: Rc<dyn Screen>, options: SheetOptions) -> Self {
        Self {
            screen,
            options: options.normalized(),
        }
    }

    /// Build from a closure.
    #[must_use]
    pub fn from_fn(render: impl Fn(&mut Canvas<'_>) + 'static, options: SheetOptions) -> Self {
        Self::new(Rc::new(render), options)
    }

    #[must_use]
    pub fn options(&self) -> &SheetOptions {
        &self.options
    }

    /// Draw the route's content.
    pub fn render(&self, canvas: &mut Canvas<'_>) {
        self.screen.render(canvas);
    }

    /// Whether two descriptors share the same screen instance.
    #[must_use]
    pub fn same_screen(&self, other: &Descriptor) -> bool {
        Rc::ptr_eq(&self.screen, &other.screen)
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Per-state map from route key to descriptor.
#[derive(Debug, Clone, Default)]
pub struct DescriptorRegistry {
    entries: AHashMap<RouteKey, Descriptor>,
}

impl DescriptorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the descriptor for a key.
    #[must_use]
    pub fn get(&self, key: &RouteKey) -> Option<&Descriptor> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: RouteKey, descriptor: Descriptor) -> Option<Descriptor> {
        self.entries.insert(key, descriptor)
    }

    pub fn remove(&mut self, key: &RouteKey) -> Option<Descriptor> {
        self.entries.remove(key)
    }

    /// Keep only the keys accepted by `keep`.
    pub fn retain_keys(&mut self, mut keep: impl FnMut(&RouteKey) -> bool) {
        self.entries.retain(|key, _| keep(key));
    }

    #[must_use]
    pub fn contains(&self, key: &RouteKey) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(RouteKey, Descriptor)> for DescriptorRegistry {
    fn from_iter<I: IntoIterator<Item = (RouteKey, Descriptor)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn text(line: &'static str) -> Descriptor {
        Descriptor::from_fn(
            move |canvas: &mut Canvas<'_>| {
                canvas.line(line);
            },
            SheetOptions::default(),
        )
    }

    #[test]
    fn snapshot_survives_registry_removal() {
        let mut registry = DescriptorRegistry::new();
        registry.insert(RouteKey::new("a"), text("hello"));
        let snapshot = registry.get(&RouteKey::new("a")).cloned().unwrap();
        registry.remove(&RouteKey::new("a"));
        assert!(registry.get(&RouteKey::new("a")).is_none());

        let mut lines = Vec::new();
        snapshot.render(&mut Canvas::new(Rect::new(0, 0, 10, 1), &mut lines));
        assert_eq!(lines, ["hello"]);
    }

    #[test]
    fn clones_share_the_screen() {
        let d = text("x");
        assert!(d.same_screen(&d.clone()));
        assert!(!d.same_screen(&text("x")));
    }

    #[test]
    fn retain_keys_filters() {
        let mut registry: DescriptorRegistry = ["a", "b", "c"]
            .into_iter()
            .map(|k| (RouteKey::new(k), text("x")))
            .collect();
        registry.retain_keys(|k| k.as_str() != "b");
        assert_eq!(registry.len(), 2);
        assert!(!registry.contains(&RouteKey::new("b")));
    }

    #[test]
    fn options_are_normalized_on_construction() {
        let d = Descriptor::from_fn(|_: &mut Canvas<'_>| {}, SheetOptions {
            snap_points: Vec::new(),
            ..SheetOptions::default()
        });
        assert_eq!(d.options().snap_points.len(), 1);
    }
}
