//! Access to component instances. [ComponentInstanceProvider] is the type-erased interface, while
//! [TypedComponentInstanceProvider] is implemented on top of it for every provider and returns
//! strongly-typed pointers.

use crate::component::{Injectable, TypeDescriptor};
use crate::error::ContainerError;
use std::any::{type_name, Any};
use std::error::Error;
use std::sync::Arc;

pub type ComponentInstancePtr<T> = Arc<T>;

pub type ComponentInstanceAnyPtr = ComponentInstancePtr<dyn Any + Send + Sync + 'static>;

/// Shared error type returned by constructors and application code.
pub type ErrorPtr = Arc<dyn Error + Send + Sync>;

/// Casts a type-erased instance to a `Box<ComponentInstancePtr<T>>`, where `T` is the type the
/// function was registered for. Since `T` can be unsized (e.g. `dyn Trait`), the result is itself
/// boxed as `dyn Any`. On failure, the original instance is returned.
pub type CastFunction =
    fn(instance: ComponentInstanceAnyPtr) -> Result<Box<dyn Any>, ComponentInstanceAnyPtr>;

/// Generic provider for component instances.
pub trait ComponentInstanceProvider {
    /// Returns the single instance compatible with the given type. Fails if there's none or more
    /// than one compatible component.
    fn instance(
        &self,
        target: TypeDescriptor,
    ) -> Result<(ComponentInstanceAnyPtr, CastFunction), ContainerError>;

    /// Returns all instances compatible with the given type, in registration order.
    fn instances(
        &self,
        target: TypeDescriptor,
    ) -> Result<Vec<(ComponentInstanceAnyPtr, CastFunction)>, ContainerError>;

    /// Returns the instance with the given name, as its concrete type.
    fn instance_by_name(&self, name: &str) -> Result<ComponentInstanceAnyPtr, ContainerError>;

    /// Returns the instance with the given name, checking it can be used as the given type.
    fn instance_by_name_and_type(
        &self,
        name: &str,
        target: TypeDescriptor,
    ) -> Result<(ComponentInstanceAnyPtr, CastFunction), ContainerError>;
}

/// Helper trait for [ComponentInstanceProvider] providing strongly-typed access.
pub trait TypedComponentInstanceProvider {
    /// Typesafe version of [ComponentInstanceProvider::instance].
    fn instance_typed<T: Injectable + ?Sized>(
        &self,
    ) -> Result<ComponentInstancePtr<T>, ContainerError>;

    /// Tries to get an instance like [TypedComponentInstanceProvider::instance_typed] does, but
    /// returns `None` when no component of the type is registered.
    fn instance_option<T: Injectable + ?Sized>(
        &self,
    ) -> Result<Option<ComponentInstancePtr<T>>, ContainerError>;

    /// Typesafe version of [ComponentInstanceProvider::instances].
    fn instances_typed<T: Injectable + ?Sized>(
        &self,
    ) -> Result<Vec<ComponentInstancePtr<T>>, ContainerError>;

    /// Typesafe version of [ComponentInstanceProvider::instance_by_name_and_type].
    fn instance_by_name_typed<T: Injectable + ?Sized>(
        &self,
        name: &str,
    ) -> Result<ComponentInstancePtr<T>, ContainerError>;
}

impl<CIP: ComponentInstanceProvider + ?Sized> TypedComponentInstanceProvider for CIP {
    fn instance_typed<T: Injectable + ?Sized>(
        &self,
    ) -> Result<ComponentInstancePtr<T>, ContainerError> {
        self.instance(TypeDescriptor::of::<T>())
            .and_then(|(instance, cast)| cast_instance_or_error(instance, cast))
    }

    fn instance_option<T: Injectable + ?Sized>(
        &self,
    ) -> Result<Option<ComponentInstancePtr<T>>, ContainerError> {
        match self.instance_typed::<T>() {
            Ok(instance) => Ok(Some(instance)),
            Err(ContainerError::NoComponentOfType(_)) => Ok(None),
            Err(error) => Err(error),
        }
    }

    fn instances_typed<T: Injectable + ?Sized>(
        &self,
    ) -> Result<Vec<ComponentInstancePtr<T>>, ContainerError> {
        self.instances(TypeDescriptor::of::<T>()).and_then(|instances| {
            instances
                .into_iter()
                .map(|(instance, cast)| cast_instance_or_error(instance, cast))
                .collect()
        })
    }

    fn instance_by_name_typed<T: Injectable + ?Sized>(
        &self,
        name: &str,
    ) -> Result<ComponentInstancePtr<T>, ContainerError> {
        self.instance_by_name_and_type(name, TypeDescriptor::of::<T>())
            .and_then(|(instance, cast)| cast_instance_or_error(instance, cast))
    }
}

/// Applies the cast function and unwraps the resulting pointer.
pub(crate) fn cast_instance<T: ?Sized + 'static>(
    instance: ComponentInstanceAnyPtr,
    cast: CastFunction,
) -> Option<ComponentInstancePtr<T>> {
    cast(instance)
        .ok()
        .and_then(|instance| instance.downcast::<ComponentInstancePtr<T>>().ok())
        .map(|instance| *instance)
}

fn cast_instance_or_error<T: ?Sized + 'static>(
    instance: ComponentInstanceAnyPtr,
    cast: CastFunction,
) -> Result<ComponentInstancePtr<T>, ContainerError> {
    cast_instance(instance, cast).ok_or(ContainerError::IncompatibleComponent(type_name::<T>()))
}
