use crate::component::{expand_component, register_component_alias, register_injectable};
use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput, Error, ItemImpl, ItemTrait};

mod attributes;
mod component;

/// Derives `Component` for a struct. Please see the `beanpod_di::component` module documentation
/// for supported attributes.
#[proc_macro_derive(Component, attributes(component))]
pub fn generate_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_component(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

/// Marks a trait as injectable, so `dyn Trait + Send + Sync` can be requested from a container.
#[proc_macro_attribute]
pub fn injectable(_attr: TokenStream, input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as ItemTrait);
    register_injectable(&input).into()
}

/// Makes it possible to cast the implementing component to `dyn Trait + Send + Sync`. The alias
/// type also needs to be listed in `#[component(aliases = [...])]` of the component.
#[proc_macro_attribute]
pub fn component_alias(_attr: TokenStream, input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as ItemImpl);
    register_component_alias(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}
