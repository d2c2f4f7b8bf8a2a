use crate::attributes::{ComponentAttributes, DefaultDefinition, FieldAttributes};
use itertools::Itertools;
use proc_macro2::TokenStream;
use quote::quote;
use std::ops::Deref;
use syn::spanned::Spanned;
use syn::{
    Attribute, Data, DataStruct, DeriveInput, Error, Field, Fields, ItemImpl, ItemTrait, Result,
    Type,
};

const COMPONENT: &str = "component";

enum FieldInitialization {
    Dependency(Type),
    Value(TokenStream),
    Ignored,
}

fn dependency_type(ty: &Type) -> TokenStream {
    quote!(<#ty as std::ops::Deref>::Target)
}

fn take_argument(ty: &Type) -> TokenStream {
    let dependency = dependency_type(ty);
    quote!(arguments.take::<#dependency>()?)
}

fn field_attributes(field: &Field) -> Result<FieldAttributes> {
    field
        .attrs
        .iter()
        .filter(|attr| attr.path().is_ident(COMPONENT))
        .map(FieldAttributes::try_from)
        .next()
        .transpose()
        .map(Option::unwrap_or_default)
}

fn field_initialization(field: &Field) -> Result<FieldInitialization> {
    let attributes = field_attributes(field)?;
    if attributes.ignore {
        return Ok(FieldInitialization::Ignored);
    }

    Ok(match attributes.default {
        Some(DefaultDefinition::Expr(path)) => FieldInitialization::Value(quote!(#path())),
        Some(DefaultDefinition::Default) => {
            FieldInitialization::Value(quote!(std::default::Default::default()))
        }
        None => FieldInitialization::Dependency(field.ty.clone()),
    })
}

fn extract_component_attributes(attributes: &[Attribute]) -> Result<ComponentAttributes> {
    attributes
        .iter()
        .filter(|attribute| attribute.path().is_ident(COMPONENT))
        .map(ComponentAttributes::try_from)
        .next()
        .transpose()
        .map(Option::unwrap_or_default)
}

// Field initializers run in declaration order, which is also the order of constructor parameters.
fn make_struct(fields: &Fields, initializations: &[FieldInitialization]) -> Result<TokenStream> {
    let values: Vec<_> = fields
        .iter()
        .zip(initializations)
        .map(|(field, initialization)| match initialization {
            FieldInitialization::Dependency(ty) => Ok(take_argument(ty)),
            FieldInitialization::Value(value) => Ok(value.clone()),
            FieldInitialization::Ignored => Err(Error::new(
                field.span(),
                "Ignored fields require a custom constructor!",
            )),
        })
        .try_collect()?;

    Ok(match fields {
        Fields::Named(_) => {
            let idents = fields.iter().map(|field| &field.ident);
            quote! {
                Self {
                    #(#idents: #values),*
                }
            }
        }
        Fields::Unnamed(_) => quote! {
            Self(#(#values),*)
        },
        Fields::Unit => quote! { Self },
    })
}

pub fn expand_component(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(DataStruct { fields, .. }) = &input.data else {
        return Err(Error::new(
            input.span(),
            "Can only derive Component on structs!",
        ));
    };

    let ident = &input.ident;
    let attributes = extract_component_attributes(&input.attrs)?;
    let initializations: Vec<_> = fields.iter().map(field_initialization).try_collect()?;

    let dependencies = initializations
        .iter()
        .filter_map(|initialization| match initialization {
            FieldInitialization::Dependency(ty) => Some(ty),
            _ => None,
        })
        .collect_vec();

    let parameters = dependencies.iter().map(|ty| dependency_type(ty));
    let construction = if let Some(constructor) = &attributes.constructor {
        let arguments = dependencies.iter().map(|ty| take_argument(ty));
        quote!(#constructor(#(#arguments),*))
    } else {
        let generation = make_struct(fields, &initializations)?;
        quote!(Ok(#generation))
    };

    let aliases = &attributes.aliases;
    let default_name = attributes.name.map(|name| {
        quote! {
            fn default_name() -> String {
                #name.to_string()
            }
        }
    });

    Ok(quote! {
        #[automatically_derived]
        impl beanpod_di::component::Injectable for #ident {}

        #[automatically_derived]
        impl beanpod_di::component::Component for #ident {
            #[allow(unused_variables)]
            fn constructors() -> Vec<beanpod_di::constructor::ConstructorDefinition> {
                vec![beanpod_di::constructor::ConstructorDefinition::new(
                    vec![#(beanpod_di::component::TypeDescriptor::of::<#parameters>()),*],
                    |arguments: &mut beanpod_di::constructor::ConstructorArguments| -> Result<Self, beanpod_di::instance_provider::ErrorPtr> {
                        #construction
                    },
                )]
            }

            fn aliases() -> Vec<beanpod_di::component_registry::ComponentAlias> {
                vec![#(beanpod_di::component_registry::ComponentAlias::of::<#aliases, Self>()),*]
            }

            #default_name
        }
    })
}

pub fn register_injectable(item: &ItemTrait) -> TokenStream {
    let ident = &item.ident;
    quote! {
        #item

        #[automatically_derived]
        impl beanpod_di::component::Injectable for dyn #ident + Send + Sync {}
    }
}

pub fn register_component_alias(item: &ItemImpl) -> Result<TokenStream> {
    let trait_type = item
        .trait_
        .as_ref()
        .map(|(_, path, ..)| path)
        .ok_or_else(|| Error::new(item.span(), "Missing trait identifier!"))?;

    let target_type = if let Type::Path(path) = item.self_ty.deref() {
        &path.path
    } else {
        return Err(Error::new(
            item.span(),
            "Registering aliases is only available for Components!",
        ));
    };

    Ok(quote! {
        #item

        #[automatically_derived]
        impl beanpod_di::component::ComponentDowncast<#target_type> for dyn #trait_type + Send + Sync {
            fn downcast(
                source: beanpod_di::instance_provider::ComponentInstanceAnyPtr,
            ) -> Result<beanpod_di::instance_provider::ComponentInstancePtr<Self>, beanpod_di::instance_provider::ComponentInstanceAnyPtr> {
                source.downcast::<#target_type>().map(|p| p as beanpod_di::instance_provider::ComponentInstancePtr<Self>)
            }
        }
    })
}
