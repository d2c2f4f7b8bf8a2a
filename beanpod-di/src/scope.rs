//! Component instances are contained in a [Scope] - a container which decides when to reuse an
//! instance. The only lifecycle supported is the lazy singleton: [SingletonScope] keeps each
//! instance, keyed by component name, until the container is closed.

use crate::instance_provider::ComponentInstanceAnyPtr;
use fxhash::FxHashMap;
#[cfg(test)]
use mockall::automock;

pub type ScopePtr = Box<dyn Scope + Send + Sync>;

/// A scope containing component instances. See module documentation for information on scopes.
#[cfg_attr(test, automock)]
pub trait Scope {
    /// Gets an instance stored for the given component name, if available in this scope.
    fn instance(&self, name: &str) -> Option<ComponentInstanceAnyPtr>;

    /// Stores given instance in the scope. Uniqueness of instances is guaranteed by the caller.
    fn store_instance(&mut self, name: &str, instance: ComponentInstanceAnyPtr);

    /// Drops all stored instances.
    fn clear(&mut self);
}

/// Scope for instances shared between components.
#[derive(Default)]
pub struct SingletonScope {
    instances: FxHashMap<String, ComponentInstanceAnyPtr>,
}

impl SingletonScope {
    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl Scope for SingletonScope {
    #[inline]
    fn instance(&self, name: &str) -> Option<ComponentInstanceAnyPtr> {
        self.instances.get(name).cloned()
    }

    #[inline]
    fn store_instance(&mut self, name: &str, instance: ComponentInstanceAnyPtr) {
        self.instances.insert(name.to_string(), instance);
    }

    #[inline]
    fn clear(&mut self) {
        self.instances.clear();
    }
}
