use syn::{Attribute, Error, Expr, ExprArray, ExprLit, ExprPath, Lit, LitStr, Token, Type};

pub enum DefaultDefinition {
    Default,
    Expr(ExprPath),
}

#[derive(Default)]
pub struct FieldAttributes {
    pub default: Option<DefaultDefinition>,
    pub ignore: bool,
}

impl TryFrom<&Attribute> for FieldAttributes {
    type Error = Error;

    fn try_from(value: &Attribute) -> Result<Self, Self::Error> {
        let mut default = None;
        let mut ignore = false;
        value.parse_nested_meta(|meta| {
            if meta.path.is_ident("default") {
                if meta.input.peek(Token![=]) {
                    let value = meta.value()?;
                    let expr: LitStr = value.parse()?;
                    default = Some(DefaultDefinition::Expr(expr.parse()?));
                } else {
                    default = Some(DefaultDefinition::Default);
                }
            } else if meta.path.is_ident("ignore") {
                ignore = true;
            } else {
                return Err(meta.error("unsupported component field attribute"));
            }

            Ok(())
        })?;

        Ok(Self { default, ignore })
    }
}

#[derive(Default)]
pub struct ComponentAttributes {
    pub name: Option<LitStr>,
    pub aliases: Vec<Type>,
    pub constructor: Option<ExprPath>,
}

fn parse_types(array: &ExprArray) -> Result<Vec<Type>, Error> {
    array
        .elems
        .iter()
        .map(|elem| {
            if let Expr::Lit(ExprLit {
                lit: Lit::Str(string),
                ..
            }) = elem
            {
                string.parse()
            } else {
                Err(Error::new_spanned(elem, "expected a type name string"))
            }
        })
        .collect()
}

impl TryFrom<&Attribute> for ComponentAttributes {
    type Error = Error;

    fn try_from(value: &Attribute) -> Result<Self, Self::Error> {
        let mut attributes = Self::default();
        value.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                attributes.name = Some(meta.value().and_then(|value| value.parse())?);
            } else if meta.path.is_ident("aliases") {
                let array: ExprArray = meta.value().and_then(|value| value.parse())?;
                attributes.aliases = parse_types(&array)?;
            } else if meta.path.is_ident("constructor") {
                let constructor: LitStr = meta.value().and_then(|value| value.parse())?;
                attributes.constructor = Some(constructor.parse()?);
            } else {
                return Err(meta.error("unsupported component attribute"));
            }

            Ok(())
        })?;

        Ok(attributes)
    }
}
