//! Component contract and the per-request environment
//!
//! Components wrap external resources (a cache, a database pool, ...). The
//! application creates each one once at startup and registers it into an
//! [`Environment`] template; every request gets a cheap clone of that
//! template through which handlers reach the components.

use crate::error::{ComponentError, ComponentResult};
use indexmap::IndexMap;
use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

/// A resource wrapper created once at application startup
pub trait Component: Send + Sync + Debug + 'static {
    /// Name the component is registered under
    fn name(&self) -> &'static str;

    /// Upcast for typed lookup through [`Environment::component`]
    fn as_any(&self) -> &dyn Any;
}

/// Registered components, reachable by name
///
/// Cloning is cheap: components are shared behind `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    components: IndexMap<&'static str, Arc<dyn Component>>,
}

impl Environment {
    /// Create empty environment
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component under its name
    ///
    /// # Errors
    /// [`ComponentError::Duplicate`] if the name is taken.
    pub fn register(&mut self, component: Arc<dyn Component>) -> ComponentResult<()> {
        let name = component.name();
        if self.components.contains_key(name) {
            return Err(ComponentError::Duplicate(name.to_string()));
        }
        tracing::debug!(component = name, "component registered");
        self.components.insert(name, component);
        Ok(())
    }

    /// Get a component by name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Component>> {
        self.components.get(name)
    }

    /// Get a component by name as its concrete type
    #[must_use]
    pub fn component<T: Component>(&self, name: &str) -> Option<&T> {
        self.get(name)
            .and_then(|component| component.as_any().downcast_ref::<T>())
    }

    /// Check if a component is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Registered names, in registration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.components.keys().copied()
    }

    /// Number of registered components
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if no component is registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Counter {
        start: u32,
    }

    impl Component for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug)]
    struct Clock;

    impl Component for Clock {
        fn name(&self) -> &'static str {
            "clock"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn register_and_lookup() {
        let mut env = Environment::new();
        env.register(Arc::new(Counter { start: 7 })).unwrap();

        assert!(env.contains("counter"));
        assert_eq!(env.component::<Counter>("counter").unwrap().start, 7);
        assert!(env.component::<Clock>("counter").is_none());
        assert!(env.get("missing").is_none());
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut env = Environment::new();
        env.register(Arc::new(Counter { start: 1 })).unwrap();

        let err = env.register(Arc::new(Counter { start: 2 })).unwrap_err();
        assert!(matches!(err, ComponentError::Duplicate(ref name) if name == "counter"));
        assert_eq!(env.component::<Counter>("counter").unwrap().start, 1);
    }

    #[test]
    fn names_follow_registration_order() {
        let mut env = Environment::new();
        env.register(Arc::new(Clock)).unwrap();
        env.register(Arc::new(Counter { start: 0 })).unwrap();

        assert_eq!(env.names().collect::<Vec<_>>(), vec!["clock", "counter"]);
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn clones_share_components() {
        let mut env = Environment::new();
        env.register(Arc::new(Counter { start: 3 })).unwrap();

        let request_env = env.clone();
        assert!(Arc::ptr_eq(
            env.get("counter").unwrap(),
            request_env.get("counter").unwrap()
        ));
    }
}
