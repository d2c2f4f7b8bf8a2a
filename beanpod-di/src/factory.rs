//! Core functionality for creating [Component](crate::component::Component) instances.
//!
//! Resolution is depth-first: a component's dependencies are looked up by type and resolved
//! recursively before its constructor is invoked. Components currently under construction are
//! tracked in a [ResolutionContext] passed explicitly through the recursion, so a dependency cycle
//! is reported instead of overflowing the stack.

use crate::component::TypeDescriptor;
use crate::component_registry::{ComponentDefinition, ComponentDefinitionRegistry};
use crate::constructor::construct;
use crate::error::ContainerError;
use crate::instance_provider::{CastFunction, ComponentInstanceAnyPtr};
use crate::scope::ScopePtr;
use fxhash::FxHashSet;
use itertools::Itertools;
use tracing::{debug, trace};

pub type ComponentDefinitionRegistryPtr = Box<dyn ComponentDefinitionRegistry + Send + Sync>;

/// Names of components under construction within a single top-level resolution, in the order
/// they were entered.
#[derive(Default, Debug)]
pub struct ResolutionContext {
    under_construction: FxHashSet<String>,
    chain: Vec<String>,
}

impl ResolutionContext {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_under_construction(&self, name: &str) -> bool {
        self.under_construction.contains(name)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    fn enter(&mut self, name: &str) -> Result<(), ContainerError> {
        if self.is_under_construction(name) {
            return Err(ContainerError::CircularDependency {
                name: name.to_string(),
                chain: self
                    .chain
                    .iter()
                    .cloned()
                    .chain([name.to_string()])
                    .collect(),
            });
        }

        self.under_construction.insert(name.to_string());
        self.chain.push(name.to_string());

        Ok(())
    }

    fn leave(&mut self, name: &str) {
        self.under_construction.remove(name);
        if let Some(position) = self.chain.iter().rposition(|entry| entry == name) {
            self.chain.remove(position);
        }
    }
}

/// Generic factory for [Component](crate::component::Component) instances. Uses definitions from
/// the [ComponentDefinitionRegistry] and a [scope](crate::scope) to create and store instances for
/// reuse.
pub struct ComponentFactory {
    definition_registry: ComponentDefinitionRegistryPtr,
    scope: ScopePtr,
}

impl ComponentFactory {
    pub fn new(definition_registry: ComponentDefinitionRegistryPtr, scope: ScopePtr) -> Self {
        Self {
            definition_registry,
            scope,
        }
    }

    #[inline]
    pub fn definition_registry(&self) -> &(dyn ComponentDefinitionRegistry + Send + Sync) {
        self.definition_registry.as_ref()
    }

    /// Adds a new definition to the underlying registry.
    pub fn register(&mut self, definition: ComponentDefinition) -> Result<(), ContainerError> {
        debug!(
            name = definition.name(),
            produced_type = definition.produced_type().type_name(),
            "Registering component."
        );

        self.definition_registry.register(definition)
    }

    /// Returns an instance for given definition, creating it along with all its dependencies if
    /// not present in the scope yet.
    pub fn resolve(
        &mut self,
        definition: &ComponentDefinition,
        context: &mut ResolutionContext,
    ) -> Result<ComponentInstanceAnyPtr, ContainerError> {
        if let Some(instance) = self.scope.instance(definition.name()) {
            trace!(name = definition.name(), "Reusing existing instance.");
            return Ok(instance);
        }

        context.enter(definition.name())?;
        let instance = self.create_instance(definition, context);
        context.leave(definition.name());

        let instance = instance?;
        self.scope.store_instance(definition.name(), instance.clone());

        Ok(instance)
    }

    fn create_instance(
        &mut self,
        definition: &ComponentDefinition,
        context: &mut ResolutionContext,
    ) -> Result<ComponentInstanceAnyPtr, ContainerError> {
        let arguments: Vec<(ComponentInstanceAnyPtr, CastFunction)> = definition
            .dependency_types()
            .iter()
            .map(|dependency_type| {
                let (dependency, cast) = self
                    .definition_registry
                    .unique_component_by_type(*dependency_type)
                    .map_err(|error| match error {
                        ContainerError::NoComponentOfType(dependency_type) => {
                            ContainerError::MissingDependency {
                                dependent: definition.name().to_string(),
                                dependency_type,
                            }
                        }
                        error => error,
                    })?;

                self.resolve(&dependency, context)
                    .map(|instance| (instance, cast))
            })
            .try_collect()?;

        debug!(
            name = definition.name(),
            dependencies = arguments.len(),
            "Constructing component."
        );

        construct(definition.name(), definition.constructor(), arguments)
    }

    /// Returns the only instance compatible with given type.
    pub fn instance(
        &mut self,
        target: TypeDescriptor,
    ) -> Result<(ComponentInstanceAnyPtr, CastFunction), ContainerError> {
        let (definition, cast) = self.definition_registry.unique_component_by_type(target)?;
        self.resolve(&definition, &mut ResolutionContext::new())
            .map(|instance| (instance, cast))
    }

    /// Returns all instances compatible with given type, in registration order.
    pub fn instances(
        &mut self,
        target: TypeDescriptor,
    ) -> Result<Vec<(ComponentInstanceAnyPtr, CastFunction)>, ContainerError> {
        self.definition_registry
            .components_by_type(target)
            .iter()
            .map(|(definition, cast)| {
                self.resolve(definition, &mut ResolutionContext::new())
                    .map(|instance| (instance, *cast))
            })
            .try_collect()
    }

    /// Returns the instance with given name.
    pub fn instance_by_name(
        &mut self,
        name: &str,
    ) -> Result<ComponentInstanceAnyPtr, ContainerError> {
        let definition = self.definition_registry.component_by_name(name)?;
        self.resolve(&definition, &mut ResolutionContext::new())
    }

    /// Returns the instance with given name, if it can be used as given type.
    pub fn instance_by_name_and_type(
        &mut self,
        name: &str,
        target: TypeDescriptor,
    ) -> Result<(ComponentInstanceAnyPtr, CastFunction), ContainerError> {
        let definition = self.definition_registry.component_by_name(name)?;
        let cast = definition
            .cast_for(target)
            .ok_or_else(|| ContainerError::TypeMismatch {
                name: name.to_string(),
                expected: target.type_name(),
                actual: definition.produced_type().type_name(),
            })?;

        self.resolve(&definition, &mut ResolutionContext::new())
            .map(|instance| (instance, cast))
    }

    /// Creates instances of all registered components, in registration order.
    pub fn instantiate_all(&mut self) -> Result<(), ContainerError> {
        for definition in self.definition_registry.all_definitions() {
            self.resolve(&definition, &mut ResolutionContext::new())?;
        }

        Ok(())
    }

    /// Drops all instances and definitions.
    pub fn clear(&mut self) {
        self.scope.clear();
        self.definition_registry.clear();
    }
}
