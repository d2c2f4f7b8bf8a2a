//! Functionality related to registering definitions of components. The
//! [ComponentFactory](crate::factory::ComponentFactory) creates [Component] instances based on
//! definitions stored in a [ComponentDefinitionRegistry].

use crate::component::{Component, ComponentDowncast, TypeDescriptor};
use crate::constructor::{select_constructor, ConstructorDefinition};
use crate::error::ContainerError;
use crate::instance_provider::{CastFunction, ComponentInstanceAnyPtr};
use derivative::Derivative;
use fxhash::FxHashMap;
use itertools::Itertools;
#[cfg(test)]
use mockall::automock;
use std::any::Any;
use std::sync::Arc;

pub type ComponentDefinitionPtr = Arc<ComponentDefinition>;

/// A type a component can be injected as, with the function casting an instance to it.
#[derive(Derivative, Clone, Copy)]
#[derivative(Debug)]
pub struct ComponentAlias {
    pub provided_type: TypeDescriptor,

    /// Cast function associated for given type. Please see the documentation for [CastFunction]
    /// for details on usage.
    #[derivative(Debug = "ignore")]
    pub cast: CastFunction,
}

impl ComponentAlias {
    /// Creates an alias `Source` for component of type `Target`. This is useful when registering
    /// `dyn Trait` as an alias for a given concrete type.
    pub fn of<Source: ComponentDowncast<Target> + ?Sized, Target: Component>() -> Self {
        Self {
            provided_type: TypeDescriptor::of::<Source>(),
            cast: cast_to::<Source, Target>,
        }
    }
}

fn cast_to<Source: ComponentDowncast<Target> + ?Sized, Target: Component>(
    instance: ComponentInstanceAnyPtr,
) -> Result<Box<dyn Any>, ComponentInstanceAnyPtr> {
    Source::downcast(instance).map(|instance| Box::new(instance) as Box<dyn Any>)
}

/// Definition for a [Component] registered in a definition registry. Immutable once created.
#[derive(Debug)]
pub struct ComponentDefinition {
    name: String,
    produced_type: TypeDescriptor,
    // produced type first, followed by aliases
    provided_types: Vec<ComponentAlias>,
    constructor: ConstructorDefinition,
}

impl ComponentDefinition {
    /// Creates a definition for a component type, named with its
    /// [default name](Component::default_name).
    pub fn of<T: Component>() -> Result<Self, ContainerError> {
        Self::named::<T>(T::default_name())
    }

    /// Creates a definition for a component type with an explicit name.
    pub fn named<T: Component>(name: impl Into<String>) -> Result<Self, ContainerError> {
        Self::new(
            name.into(),
            ComponentAlias::of::<T, T>(),
            T::aliases(),
            T::constructors(),
        )
    }

    /// Creates a definition from raw parts. The injectable constructor is selected from the given
    /// ones, which fails if there is no single candidate.
    pub fn new(
        name: String,
        produced_type: ComponentAlias,
        aliases: Vec<ComponentAlias>,
        constructors: Vec<ConstructorDefinition>,
    ) -> Result<Self, ContainerError> {
        let constructor =
            select_constructor(produced_type.provided_type.type_name(), constructors)?;
        let provided_types = [produced_type]
            .into_iter()
            .chain(aliases)
            .unique_by(|alias| alias.provided_type)
            .collect();

        Ok(Self {
            name,
            produced_type: produced_type.provided_type,
            provided_types,
            constructor,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn produced_type(&self) -> TypeDescriptor {
        self.produced_type
    }

    /// Ordered types of the selected constructor parameters.
    #[inline]
    pub fn dependency_types(&self) -> &[TypeDescriptor] {
        self.constructor.parameters()
    }

    #[inline]
    pub fn provided_types(&self) -> impl Iterator<Item = TypeDescriptor> + '_ {
        self.provided_types.iter().map(|alias| alias.provided_type)
    }

    /// Returns the cast function for given type, if this component can be injected as it.
    pub fn cast_for(&self, target: TypeDescriptor) -> Option<CastFunction> {
        self.provided_types
            .iter()
            .find(|alias| alias.provided_type == target)
            .map(|alias| alias.cast)
    }

    #[inline]
    pub fn provides(&self, target: TypeDescriptor) -> bool {
        self.cast_for(target).is_some()
    }

    #[inline]
    pub fn constructor(&self) -> &ConstructorDefinition {
        &self.constructor
    }
}

/// A registry of component definitions which can be used when requesting instances via a
/// [ComponentFactory](crate::factory::ComponentFactory).
#[cfg_attr(test, automock)]
pub trait ComponentDefinitionRegistry {
    /// Adds a new definition. Fails if the name is already registered.
    fn register(&mut self, definition: ComponentDefinition) -> Result<(), ContainerError>;

    /// Returns a definition with given name.
    fn component_by_name(&self, name: &str) -> Result<ComponentDefinitionPtr, ContainerError>;

    /// Returns the only definition compatible with given type, along with the cast function for
    /// that type. Multiple compatible definitions are an error.
    fn unique_component_by_type(
        &self,
        target: TypeDescriptor,
    ) -> Result<(ComponentDefinitionPtr, CastFunction), ContainerError>;

    /// Returns all definitions compatible with given type, in registration order.
    fn components_by_type(
        &self,
        target: TypeDescriptor,
    ) -> Vec<(ComponentDefinitionPtr, CastFunction)>;

    /// Returns all definitions, in registration order.
    fn all_definitions(&self) -> Vec<ComponentDefinitionPtr>;

    /// Checks if any definition is compatible with given type.
    fn is_registered(&self, target: TypeDescriptor) -> bool;

    /// Checks if there's a definition with given name.
    fn is_name_registered(&self, name: &str) -> bool;

    /// Removes all definitions.
    fn clear(&mut self);
}

/// Registry keeping definitions in registration order.
#[derive(Default, Clone, Debug)]
pub struct ComponentDefinitionMap {
    definitions: Vec<ComponentDefinitionPtr>,
    names: FxHashMap<String, usize>,
}

impl ComponentDefinitionMap {
    #[inline]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    fn compatible_components(
        &self,
        target: TypeDescriptor,
    ) -> impl Iterator<Item = (ComponentDefinitionPtr, CastFunction)> + '_ {
        self.definitions.iter().filter_map(move |definition| {
            definition
                .cast_for(target)
                .map(|cast| (definition.clone(), cast))
        })
    }
}

impl ComponentDefinitionRegistry for ComponentDefinitionMap {
    fn register(&mut self, definition: ComponentDefinition) -> Result<(), ContainerError> {
        if self.names.contains_key(definition.name()) {
            return Err(ContainerError::DuplicateName(definition.name().to_string()));
        }

        self.names
            .insert(definition.name().to_string(), self.definitions.len());
        self.definitions.push(Arc::new(definition));

        Ok(())
    }

    fn component_by_name(&self, name: &str) -> Result<ComponentDefinitionPtr, ContainerError> {
        self.names
            .get(name)
            .and_then(|index| self.definitions.get(*index))
            .cloned()
            .ok_or_else(|| ContainerError::NoNamedComponent(name.to_string()))
    }

    fn unique_component_by_type(
        &self,
        target: TypeDescriptor,
    ) -> Result<(ComponentDefinitionPtr, CastFunction), ContainerError> {
        self.compatible_components(target)
            .exactly_one()
            .map_err(|candidates| {
                let candidates = candidates
                    .map(|(definition, _)| definition.name().to_string())
                    .collect_vec();

                if candidates.is_empty() {
                    ContainerError::NoComponentOfType(target.type_name())
                } else {
                    ContainerError::AmbiguousType {
                        type_name: target.type_name(),
                        candidates,
                    }
                }
            })
    }

    #[inline]
    fn components_by_type(
        &self,
        target: TypeDescriptor,
    ) -> Vec<(ComponentDefinitionPtr, CastFunction)> {
        self.compatible_components(target).collect()
    }

    #[inline]
    fn all_definitions(&self) -> Vec<ComponentDefinitionPtr> {
        self.definitions.clone()
    }

    #[inline]
    fn is_registered(&self, target: TypeDescriptor) -> bool {
        self.definitions
            .iter()
            .any(|definition| definition.provides(target))
    }

    #[inline]
    fn is_name_registered(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    fn clear(&mut self) {
        self.definitions.clear();
        self.names.clear();
    }
}

#[cfg(test)]
//noinspection DuplicatedCode
mod tests {
    use crate::component::{Component, ComponentDowncast, Injectable, TypeDescriptor};
    use crate::component_registry::{
        ComponentAlias, ComponentDefinition, ComponentDefinitionMap, ComponentDefinitionRegistry,
    };
    use crate::constructor::ConstructorDefinition;
    use crate::error::ContainerError;
    use crate::instance_provider::{cast_instance, ComponentInstanceAnyPtr, ComponentInstancePtr};
    use std::any::type_name;

    trait TestTrait {
        fn value(&self) -> i8;
    }

    impl Injectable for dyn TestTrait + Send + Sync {}

    struct TestComponent;

    impl Injectable for TestComponent {}

    impl Component for TestComponent {
        fn constructors() -> Vec<ConstructorDefinition> {
            vec![ConstructorDefinition::parameterless(|| Ok(TestComponent))]
        }

        fn aliases() -> Vec<ComponentAlias> {
            vec![ComponentAlias::of::<dyn TestTrait + Send + Sync, Self>()]
        }
    }

    impl TestTrait for TestComponent {
        fn value(&self) -> i8 {
            1
        }
    }

    impl ComponentDowncast<TestComponent> for dyn TestTrait + Send + Sync {
        fn downcast(
            source: ComponentInstanceAnyPtr,
        ) -> Result<ComponentInstancePtr<Self>, ComponentInstanceAnyPtr> {
            source
                .downcast::<TestComponent>()
                .map(|p| p as ComponentInstancePtr<Self>)
        }
    }

    struct OtherComponent;

    impl Injectable for OtherComponent {}

    impl Component for OtherComponent {
        fn constructors() -> Vec<ConstructorDefinition> {
            vec![ConstructorDefinition::parameterless(|| Ok(OtherComponent))]
        }
    }

    fn trait_type() -> TypeDescriptor {
        TypeDescriptor::of::<dyn TestTrait + Send + Sync>()
    }

    #[test]
    fn should_create_definition_with_default_name() {
        let definition = ComponentDefinition::of::<TestComponent>().unwrap();

        assert_eq!(definition.name(), type_name::<TestComponent>());
        assert_eq!(
            definition.produced_type(),
            TypeDescriptor::of::<TestComponent>()
        );
        assert!(definition.dependency_types().is_empty());
        assert!(definition.provides(TypeDescriptor::of::<TestComponent>()));
        assert!(definition.provides(trait_type()));
        assert!(!definition.provides(TypeDescriptor::of::<OtherComponent>()));
    }

    #[test]
    fn should_cast_to_alias() {
        let definition = ComponentDefinition::of::<TestComponent>().unwrap();
        let instance = ComponentInstancePtr::new(TestComponent) as ComponentInstanceAnyPtr;

        let cast = definition.cast_for(trait_type()).unwrap();
        let instance = cast_instance::<dyn TestTrait + Send + Sync>(instance, cast).unwrap();

        assert_eq!(instance.value(), 1);
    }

    #[test]
    fn should_register_definition() {
        let mut registry = ComponentDefinitionMap::default();
        registry
            .register(ComponentDefinition::named::<TestComponent>("a").unwrap())
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.component_by_name("a").unwrap().name(), "a");
        assert!(registry.is_name_registered("a"));
        assert!(registry.is_registered(TypeDescriptor::of::<TestComponent>()));
        assert!(registry.is_registered(trait_type()));
        assert!(!registry.is_registered(TypeDescriptor::of::<OtherComponent>()));
    }

    #[test]
    fn should_not_register_duplicate_name() {
        let mut registry = ComponentDefinitionMap::default();
        registry
            .register(ComponentDefinition::named::<TestComponent>("name").unwrap())
            .unwrap();

        assert!(matches!(
            registry
                .register(ComponentDefinition::named::<OtherComponent>("name").unwrap())
                .unwrap_err(),
            ContainerError::DuplicateName(name) if name == "name"
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn should_not_find_missing_name() {
        let registry = ComponentDefinitionMap::default();

        assert!(matches!(
            registry.component_by_name("missing").unwrap_err(),
            ContainerError::NoNamedComponent(name) if name == "missing"
        ));
    }

    #[test]
    fn should_find_unique_component_by_type() {
        let mut registry = ComponentDefinitionMap::default();
        registry
            .register(ComponentDefinition::named::<TestComponent>("a").unwrap())
            .unwrap();
        registry
            .register(ComponentDefinition::named::<OtherComponent>("b").unwrap())
            .unwrap();

        let (definition, _) = registry.unique_component_by_type(trait_type()).unwrap();
        assert_eq!(definition.name(), "a");

        let (definition, _) = registry
            .unique_component_by_type(TypeDescriptor::of::<OtherComponent>())
            .unwrap();
        assert_eq!(definition.name(), "b");
    }

    #[test]
    fn should_reject_ambiguous_type() {
        let mut registry = ComponentDefinitionMap::default();
        registry
            .register(ComponentDefinition::named::<TestComponent>("a").unwrap())
            .unwrap();
        registry
            .register(ComponentDefinition::named::<TestComponent>("b").unwrap())
            .unwrap();

        match registry.unique_component_by_type(trait_type()).unwrap_err() {
            ContainerError::AmbiguousType {
                type_name,
                candidates,
            } => {
                assert_eq!(type_name, trait_type().type_name());
                assert_eq!(candidates, vec!["a".to_string(), "b".to_string()]);
            }
            error => panic!("unexpected error: {error}"),
        }
    }

    #[test]
    fn should_not_find_missing_type() {
        let registry = ComponentDefinitionMap::default();

        assert!(matches!(
            registry.unique_component_by_type(trait_type()).unwrap_err(),
            ContainerError::NoComponentOfType(_)
        ));
        assert!(registry.components_by_type(trait_type()).is_empty());
    }

    #[test]
    fn should_return_all_components_in_registration_order() {
        let mut registry = ComponentDefinitionMap::default();
        for name in ["c", "a", "b"] {
            registry
                .register(ComponentDefinition::named::<TestComponent>(name).unwrap())
                .unwrap();
        }
        registry
            .register(ComponentDefinition::named::<OtherComponent>("other").unwrap())
            .unwrap();

        let names: Vec<_> = registry
            .components_by_type(trait_type())
            .into_iter()
            .map(|(definition, _)| definition.name().to_string())
            .collect();

        assert_eq!(names, ["c", "a", "b"]);
        assert_eq!(registry.all_definitions().len(), 4);
    }

    #[test]
    fn should_clear_definitions() {
        let mut registry = ComponentDefinitionMap::default();
        registry
            .register(ComponentDefinition::named::<TestComponent>("a").unwrap())
            .unwrap();
        registry.clear();

        assert!(registry.is_empty());
        assert!(!registry.is_name_registered("a"));
        registry
            .register(ComponentDefinition::named::<TestComponent>("a").unwrap())
            .unwrap();
    }
}
