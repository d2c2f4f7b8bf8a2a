//! The public entry point: a [ComponentContainer] owns component definitions and their singleton
//! instances. It starts open and becomes permanently closed after [ComponentContainer::close].
//!
//! ```
//! use beanpod_di::container::ComponentContainer;
//! use beanpod_di::instance_provider::{ComponentInstancePtr, TypedComponentInstanceProvider};
//! use beanpod_di::Component;
//!
//! #[derive(Component)]
//! struct Repository;
//!
//! #[derive(Component)]
//! struct Service {
//!     repository: ComponentInstancePtr<Repository>,
//! }
//!
//! let container = ComponentContainer::new();
//! container.register::<Repository>().unwrap();
//! container.register_named::<Service>("service").unwrap();
//!
//! let service = container.instance_by_name_typed::<Service>("service").unwrap();
//! let repository = container.instance_typed::<Repository>().unwrap();
//! assert!(ComponentInstancePtr::ptr_eq(&service.repository, &repository));
//!
//! container.close();
//! assert!(container.instance_typed::<Repository>().is_err());
//! ```

use crate::component::{Component, Injectable, TypeDescriptor};
use crate::component_registry::{ComponentDefinition, ComponentDefinitionMap};
use crate::error::ContainerError;
use crate::factory::{ComponentDefinitionRegistryPtr, ComponentFactory};
use crate::instance_provider::{CastFunction, ComponentInstanceAnyPtr, ComponentInstanceProvider};
use crate::scope::{ScopePtr, SingletonScope};
use parking_lot::Mutex;
use std::mem;
use tracing::debug;

/// Builder for [ComponentContainer] with sensible defaults, for easy construction.
pub struct ComponentContainerBuilder {
    definition_registry: ComponentDefinitionRegistryPtr,
    scope: ScopePtr,
}

impl Default for ComponentContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentContainerBuilder {
    /// Creates a new builder with a default configuration.
    pub fn new() -> Self {
        Self {
            definition_registry: Box::<ComponentDefinitionMap>::default(),
            scope: Box::<SingletonScope>::default(),
        }
    }

    /// Sets new [ComponentDefinitionRegistry](crate::component_registry::ComponentDefinitionRegistry).
    pub fn with_definition_registry(
        mut self,
        definition_registry: ComponentDefinitionRegistryPtr,
    ) -> Self {
        self.definition_registry = definition_registry;
        self
    }

    /// Sets new [Scope](crate::scope::Scope) for singleton instances.
    pub fn with_scope(mut self, scope: ScopePtr) -> Self {
        self.scope = scope;
        self
    }

    /// Builds resulting [ComponentContainer].
    pub fn build(self) -> ComponentContainer {
        ComponentContainer::from_factory(ComponentFactory::new(
            self.definition_registry,
            self.scope,
        ))
    }
}

enum ContainerState {
    Open(ComponentFactory),
    Closed,
}

/// Container for components and their instances. Safe to share between threads - all operations
/// are serialized by a single lock, which is also held while components are being constructed.
pub struct ComponentContainer {
    state: Mutex<ContainerState>,
}

impl Default for ComponentContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentContainer {
    /// Creates an empty container with a default configuration.
    pub fn new() -> Self {
        ComponentContainerBuilder::new().build()
    }

    #[inline]
    pub fn builder() -> ComponentContainerBuilder {
        ComponentContainerBuilder::new()
    }

    /// Creates a container using given factory.
    pub fn from_factory(factory: ComponentFactory) -> Self {
        Self {
            state: Mutex::new(ContainerState::Open(factory)),
        }
    }

    fn with_factory<R>(
        &self,
        operation: impl FnOnce(&mut ComponentFactory) -> Result<R, ContainerError>,
    ) -> Result<R, ContainerError> {
        match &mut *self.state.lock() {
            ContainerState::Open(factory) => operation(factory),
            ContainerState::Closed => Err(ContainerError::ContainerClosed),
        }
    }

    /// Registers a component under its default name.
    pub fn register<T: Component>(&self) -> Result<(), ContainerError> {
        self.with_factory(|factory| factory.register(ComponentDefinition::of::<T>()?))
    }

    /// Registers a component under given name.
    pub fn register_named<T: Component>(
        &self,
        name: impl Into<String>,
    ) -> Result<(), ContainerError> {
        let name = name.into();
        self.with_factory(|factory| factory.register(ComponentDefinition::named::<T>(name)?))
    }

    /// Registers a prepared definition.
    pub fn register_definition(
        &self,
        definition: ComponentDefinition,
    ) -> Result<(), ContainerError> {
        self.with_factory(|factory| factory.register(definition))
    }

    /// Checks if any component can be injected as given type.
    ///
    /// Unlike other operations, this doesn't fail on a closed container. A closed container has no
    /// definitions, so `false` is returned.
    pub fn is_registered<T: Injectable + ?Sized>(&self) -> bool {
        self.with_factory(|factory| {
            Ok(factory
                .definition_registry()
                .is_registered(TypeDescriptor::of::<T>()))
        })
        .unwrap_or(false)
    }

    /// Checks if there's a component with given name. Returns `false` on a closed container, the
    /// same way [ComponentContainer::is_registered] does.
    pub fn is_name_registered(&self, name: &str) -> bool {
        self.with_factory(|factory| Ok(factory.definition_registry().is_name_registered(name)))
            .unwrap_or(false)
    }

    /// Eagerly creates instances of all registered components.
    pub fn instantiate_all(&self) -> Result<(), ContainerError> {
        self.with_factory(|factory| factory.instantiate_all())
    }

    /// Drops all instances and definitions, and rejects any further operations. Closing an already
    /// closed container does nothing.
    pub fn close(&self) {
        let mut state = self.state.lock();
        if let ContainerState::Open(mut factory) = mem::replace(&mut *state, ContainerState::Closed)
        {
            factory.clear();
            debug!("Component container closed.");
        }
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        matches!(&*self.state.lock(), ContainerState::Closed)
    }
}

impl ComponentInstanceProvider for ComponentContainer {
    fn instance(
        &self,
        target: TypeDescriptor,
    ) -> Result<(ComponentInstanceAnyPtr, CastFunction), ContainerError> {
        self.with_factory(|factory| factory.instance(target))
    }

    fn instances(
        &self,
        target: TypeDescriptor,
    ) -> Result<Vec<(ComponentInstanceAnyPtr, CastFunction)>, ContainerError> {
        self.with_factory(|factory| factory.instances(target))
    }

    fn instance_by_name(&self, name: &str) -> Result<ComponentInstanceAnyPtr, ContainerError> {
        self.with_factory(|factory| factory.instance_by_name(name))
    }

    fn instance_by_name_and_type(
        &self,
        name: &str,
        target: TypeDescriptor,
    ) -> Result<(ComponentInstanceAnyPtr, CastFunction), ContainerError> {
        self.with_factory(|factory| factory.instance_by_name_and_type(name, target))
    }
}
