use crate::instance_provider::ErrorPtr;
use thiserror::Error;

/// Errors related to registering, resolving and constructing components.
#[derive(Error, Clone, Debug)]
pub enum ContainerError {
    #[error("Attempted to register a duplicated component with name: {0}")]
    DuplicateName(String),
    #[error("Cannot find named component: {0}")]
    NoNamedComponent(String),
    #[error("Cannot find a component of type: {0}")]
    NoComponentOfType(&'static str),
    #[error("Component '{dependent}' depends on {dependency_type}, but no such component is registered")]
    MissingDependency {
        dependent: String,
        dependency_type: &'static str,
    },
    #[error("Multiple components match type {type_name}: {}", .candidates.join(", "))]
    AmbiguousType {
        type_name: &'static str,
        candidates: Vec<String>,
    },
    #[error("Component '{name}' of type {actual} cannot be used as {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("Dependency cycle detected for component '{name}': {}", .chain.join(" -> "))]
    CircularDependency { name: String, chain: Vec<String> },
    #[error("Type {type_name} must expose exactly one injectable constructor, found {candidates} candidates")]
    AmbiguousConstructor {
        type_name: &'static str,
        candidates: usize,
    },
    #[error("Error constructing component '{name}': {source}")]
    Construction { name: String, source: ErrorPtr },
    #[error("Tried to downcast component to incompatible type: {0}")]
    IncompatibleComponent(&'static str),
    #[error("Container is closed")]
    ContainerClosed,
}

impl ContainerError {
    /// Checks if this error means a name or type lookup found nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NoNamedComponent(_)
                | Self::NoComponentOfType(_)
                | Self::MissingDependency { .. }
        )
    }
}

/// Errors raised while handing positional arguments to a constructor.
#[derive(Error, Clone, Copy, Eq, PartialEq, Debug)]
pub enum ArgumentError {
    #[error("Constructor requested an argument of type {0}, but all arguments were consumed")]
    MissingArgument(&'static str),
    #[error("Constructor argument cannot be cast to type {0}")]
    IncompatibleArgument(&'static str),
}
