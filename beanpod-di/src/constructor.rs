//! Constructor selection and invocation. A [Component](crate::component::Component) exposes its
//! constructors as [ConstructorDefinition]s, each declaring the ordered types of its parameters.
//! [select_constructor] picks the one used for injection when a component definition is created,
//! and the resolver later invokes it with already-resolved dependencies passed positionally through
//! [ConstructorArguments].

use crate::component::TypeDescriptor;
use crate::error::{ArgumentError, ContainerError};
use crate::instance_provider::{
    cast_instance, CastFunction, ComponentInstanceAnyPtr, ComponentInstancePtr, ErrorPtr,
};
use derivative::Derivative;
use itertools::Itertools;
use std::any::type_name;
use std::sync::Arc;
use std::vec::IntoIter;

/// Type-erased constructor body.
pub type ConstructorFunction = Box<
    dyn Fn(&mut ConstructorArguments) -> Result<ComponentInstanceAnyPtr, ErrorPtr> + Send + Sync,
>;

/// A single way of constructing a component.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct ConstructorDefinition {
    parameters: Vec<TypeDescriptor>,
    #[derivative(Debug = "ignore")]
    function: ConstructorFunction,
}

impl ConstructorDefinition {
    /// Creates a constructor taking arguments of given types. The function should take exactly
    /// that many arguments from [ConstructorArguments], in the same order.
    pub fn new<T, F>(parameters: Vec<TypeDescriptor>, function: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&mut ConstructorArguments) -> Result<T, ErrorPtr> + Send + Sync + 'static,
    {
        Self {
            parameters,
            function: Box::new(move |arguments| {
                function(arguments)
                    .map(|instance| ComponentInstancePtr::new(instance) as ComponentInstanceAnyPtr)
            }),
        }
    }

    /// Creates a constructor without parameters.
    pub fn parameterless<T, F>(function: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> Result<T, ErrorPtr> + Send + Sync + 'static,
    {
        Self::new(Vec::new(), move |_| function())
    }

    /// Ordered parameter types.
    #[inline]
    pub fn parameters(&self) -> &[TypeDescriptor] {
        &self.parameters
    }

    #[inline]
    pub fn is_parameterless(&self) -> bool {
        self.parameters.is_empty()
    }
}

/// Positional arguments for a constructor, in the order of its parameters.
pub struct ConstructorArguments {
    arguments: IntoIter<(ComponentInstanceAnyPtr, CastFunction)>,
}

impl ConstructorArguments {
    pub fn new(arguments: Vec<(ComponentInstanceAnyPtr, CastFunction)>) -> Self {
        Self {
            arguments: arguments.into_iter(),
        }
    }

    /// Takes the next argument as the given type.
    pub fn take<T: ?Sized + 'static>(&mut self) -> Result<ComponentInstancePtr<T>, ErrorPtr> {
        let (instance, cast) = self.arguments.next().ok_or_else(|| {
            Arc::new(ArgumentError::MissingArgument(type_name::<T>())) as ErrorPtr
        })?;

        cast_instance(instance, cast).ok_or_else(|| {
            Arc::new(ArgumentError::IncompatibleArgument(type_name::<T>())) as ErrorPtr
        })
    }

    /// Number of arguments not taken yet.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.arguments.len()
    }
}

/// Picks the constructor used for injection: the only constructor, or the only one taking
/// parameters when all others are parameterless.
pub fn select_constructor(
    type_name: &'static str,
    mut constructors: Vec<ConstructorDefinition>,
) -> Result<ConstructorDefinition, ContainerError> {
    let candidates = constructors.len();
    let error = ContainerError::AmbiguousConstructor {
        type_name,
        candidates,
    };

    if candidates == 1 {
        return constructors.pop().ok_or(error);
    }

    constructors
        .into_iter()
        .filter(|constructor| !constructor.is_parameterless())
        .exactly_one()
        .map_err(|_| error)
}

/// Invokes the constructor for the component with given name. Any failure of the constructor
/// body is reported as [ContainerError::Construction].
pub fn construct(
    name: &str,
    constructor: &ConstructorDefinition,
    arguments: Vec<(ComponentInstanceAnyPtr, CastFunction)>,
) -> Result<ComponentInstanceAnyPtr, ContainerError> {
    let mut arguments = ConstructorArguments::new(arguments);
    (constructor.function)(&mut arguments).map_err(|source| ContainerError::Construction {
        name: name.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use crate::component::TypeDescriptor;
    use crate::constructor::{
        construct, select_constructor, ConstructorArguments, ConstructorDefinition,
    };
    use crate::error::{ArgumentError, ContainerError};
    use crate::instance_provider::{
        CastFunction, ComponentInstanceAnyPtr, ComponentInstancePtr, ErrorPtr,
    };
    use std::any::Any;
    use std::sync::Arc;

    fn cast_u8(instance: ComponentInstanceAnyPtr) -> Result<Box<dyn Any>, ComponentInstanceAnyPtr> {
        instance
            .downcast::<u8>()
            .map(|instance| Box::new(instance) as Box<dyn Any>)
    }

    fn parameterless() -> ConstructorDefinition {
        ConstructorDefinition::parameterless(|| Ok(0u8))
    }

    fn parameterized(count: usize) -> ConstructorDefinition {
        ConstructorDefinition::new(vec![TypeDescriptor::of::<u8>(); count], |arguments| {
            arguments.take::<u8>().map(|value| *value)
        })
    }

    #[test]
    fn should_select_single_constructor() {
        let constructor = select_constructor("T", vec![parameterized(2)]).unwrap();
        assert_eq!(constructor.parameters().len(), 2);

        let constructor = select_constructor("T", vec![parameterless()]).unwrap();
        assert!(constructor.is_parameterless());
    }

    #[test]
    fn should_select_single_parameterized_constructor() {
        let constructor = select_constructor(
            "T",
            vec![parameterless(), parameterized(1), parameterless()],
        )
        .unwrap();

        assert_eq!(constructor.parameters(), &[TypeDescriptor::of::<u8>()]);
    }

    #[test]
    fn should_reject_multiple_parameterized_constructors() {
        assert!(matches!(
            select_constructor("T", vec![parameterized(1), parameterized(2)]).unwrap_err(),
            ContainerError::AmbiguousConstructor {
                type_name: "T",
                candidates: 2
            }
        ));
    }

    #[test]
    fn should_reject_multiple_parameterless_constructors() {
        assert!(matches!(
            select_constructor("T", vec![parameterless(), parameterless()]).unwrap_err(),
            ContainerError::AmbiguousConstructor { candidates: 2, .. }
        ));
    }

    #[test]
    fn should_reject_missing_constructor() {
        assert!(matches!(
            select_constructor("T", vec![]).unwrap_err(),
            ContainerError::AmbiguousConstructor { candidates: 0, .. }
        ));
    }

    #[test]
    fn should_pass_arguments_positionally() {
        let constructor = ConstructorDefinition::new(
            vec![TypeDescriptor::of::<u8>(), TypeDescriptor::of::<u8>()],
            |arguments| {
                let first = arguments.take::<u8>()?;
                let second = arguments.take::<u8>()?;
                Ok(*first * 10 + *second)
            },
        );

        let instance = construct(
            "name",
            &constructor,
            vec![
                (
                    ComponentInstancePtr::new(1u8) as ComponentInstanceAnyPtr,
                    cast_u8 as CastFunction,
                ),
                (
                    ComponentInstancePtr::new(2u8) as ComponentInstanceAnyPtr,
                    cast_u8 as CastFunction,
                ),
            ],
        )
        .unwrap();

        assert_eq!(*instance.downcast::<u8>().unwrap(), 12);
    }

    #[test]
    fn should_wrap_constructor_errors() {
        let constructor = ConstructorDefinition::parameterless::<u8, _>(|| {
            Err(Arc::new(ArgumentError::MissingArgument("X")) as ErrorPtr)
        });

        assert!(matches!(
            construct("name", &constructor, vec![]).unwrap_err(),
            ContainerError::Construction { name, .. } if name == "name"
        ));
    }

    #[test]
    fn should_report_missing_and_incompatible_arguments() {
        let mut arguments = ConstructorArguments::new(vec![(
            ComponentInstancePtr::new(1u8) as ComponentInstanceAnyPtr,
            cast_u8 as CastFunction,
        )]);
        assert_eq!(arguments.remaining(), 1);

        let error = arguments.take::<i8>().unwrap_err();
        assert_eq!(
            error.to_string(),
            ArgumentError::IncompatibleArgument("i8").to_string()
        );
        assert_eq!(arguments.remaining(), 0);

        let error = arguments.take::<u8>().unwrap_err();
        assert_eq!(
            error.to_string(),
            ArgumentError::MissingArgument("u8").to_string()
        );
    }
}
