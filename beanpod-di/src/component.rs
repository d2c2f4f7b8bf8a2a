//! One of the basic blocks of dependency injection is a [Component]. Components are injectable
//! objects, which themselves can contain dependencies to other components.
//!
//! ## Registering concrete components
//!
//! Any type which wants to be managed by the container needs to implement `Component`. The trait
//! describes how to construct the type: its [constructors](Component::constructors), each listing
//! the types of its parameters, and the other types the component can be injected as
//! ([aliases](Component::aliases)). For convenience, the trait can be automatically derived if the
//! `derive` feature is enabled:
//!
//! ```
//! use beanpod_di::instance_provider::ComponentInstancePtr;
//! use beanpod_di::{Component, component_alias, injectable};
//!
//! #[injectable]
//! trait TestTrait {}
//!
//! #[derive(Component)]
//! #[component(aliases = ["dyn TestTrait + Send + Sync"])]
//! struct TestDependency;
//!
//! #[component_alias]
//! impl TestTrait for TestDependency {}
//!
//! #[derive(Component)]
//! #[component(name = "test_component")]
//! struct TestComponent {
//!     // concrete type dependency
//!     dependency_1: ComponentInstancePtr<TestDependency>,
//!     // dyn Trait dependency - note the Send + Sync bounds
//!     dependency_2: ComponentInstancePtr<dyn TestTrait + Send + Sync>,
//!     #[component(default)]
//!     default: i8,
//!     #[component(default = "dummy_expr")]
//!     default_expr: i8,
//! }
//!
//! fn dummy_expr() -> i8 {
//!     -1
//! }
//! ```
//!
//! ### Supported `#[component]` struct configuration
//!
//! * `name = "name"` - use the given name instead of the fully-qualified type name
//! * `aliases = ["type"]` - other types this component can be injected as; each needs a
//! [ComponentDowncast] implementation, usually generated with `#[component_alias]`
//! * `constructor = "expr"` - call `expr(dependencies...)` to construct the component, instead of
//! using standard struct construction; parameters must be in the same order as fields in the struct
//! while non-injected fields can be ignored with the `#[component(ignore)]` attribute
//!
//! ### Supported `#[component]` field configuration
//!
//! * `default` - use `Default::default()` initialization
//! * `default = "expr"` - call `expr()` for initialization
//! * `ignore` - ignore the field when using custom constructor
//!
//! ## Component aliases
//!
//! Component aliases are different types, which can refer to a concrete component type. Usually
//! they are simply `dyn Traits`, which makes it possible to inject an abstract `dyn Trait` type
//! instead of a concrete component type. Each injectable trait should be marked as such, which can
//! be done with the `#[injectable]` helper attribute. A lookup by type matches every component
//! which lists the requested type among its aliases.

use crate::component_registry::ComponentAlias;
use crate::constructor::ConstructorDefinition;
use crate::instance_provider::{ComponentInstanceAnyPtr, ComponentInstancePtr};
use std::any::{type_name, TypeId};
use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};

/// Base trait for components for dependency injection.
///
/// Components might depend on other components, which forms the basis for dependency injection. To
/// make the system work, your component instances must be wrapped in a [ComponentInstancePtr].
/// Please see the module-level documentation for more information.
pub trait Component: Injectable + Send + Sync + Sized {
    /// Returns all constructors of this component. Exactly one of them must be usable for
    /// injection: either it's the only one, or it's the only one taking parameters.
    fn constructors() -> Vec<ConstructorDefinition>;

    /// Returns additional types this component can be injected as.
    fn aliases() -> Vec<ComponentAlias> {
        Vec::new()
    }

    /// Name used when registering without an explicit one.
    fn default_name() -> String {
        type_name::<Self>().to_string()
    }
}

/// Helper trait for types implemented by components, thus allowing injection of components based
/// on `dyn Trait` types. The type `C` refers to a concrete component type. Typically automatically
/// derived when using the `#[component_alias]` attribute.
pub trait ComponentDowncast<C: Component>: Injectable {
    fn downcast(
        source: ComponentInstanceAnyPtr,
    ) -> Result<ComponentInstancePtr<Self>, ComponentInstanceAnyPtr>;
}

impl<C: Component> ComponentDowncast<C> for C {
    #[inline]
    fn downcast(
        source: ComponentInstanceAnyPtr,
    ) -> Result<ComponentInstancePtr<Self>, ComponentInstanceAnyPtr> {
        source.downcast()
    }
}

/// Marker trait for injectable types - components and aliases.
pub trait Injectable: 'static {}

/// Runtime identity of a type, usable as a lookup key. Two descriptors are equal when they
/// describe the same type.
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    type_id: TypeId,
    type_name: &'static str,
}

impl TypeDescriptor {
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl Debug for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}
