//! A minimal inversion-of-control container. Given a set of registered
//! [components](component::Component), it builds and caches fully-wired instances, resolving
//! constructor dependencies transitively by type.
//!
//! The main building blocks are:
//!
//! * [Component](component::Component) - describes how a type is constructed and which types it can
//! be injected as
//! * [ComponentDefinitionRegistry](component_registry::ComponentDefinitionRegistry) - stores
//! registered component definitions
//! * [Scope](scope::Scope) - stores already created singleton instances
//! * [ComponentFactory](factory::ComponentFactory) - resolves definitions into instances
//! * [ComponentContainer](container::ComponentContainer) - thread-safe facade over all of the above
//!
//! ### Features
//!
//! * `derive` - automatically derive `Component` for structs and register trait aliases (enabled by
//! default)

pub mod component;
pub mod component_registry;
pub mod constructor;
pub mod container;
mod error;
pub mod factory;
pub mod instance_provider;
pub mod scope;

pub use error::{ArgumentError, ContainerError};

#[cfg(feature = "derive")]
pub use beanpod_di_derive::{component_alias, injectable, Component};
