//! Parsing of `#[rowbind(...)]` attributes shared by both derives

use heck::{ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use syn::{
    spanned::Spanned, Attribute, Data, DeriveInput, Error, Field, Fields, GenericArgument, Ident,
    LitStr, Path, PathArguments, Result, Type,
};

/// How field names are turned into parameter/property names
#[derive(Clone, Copy)]
enum RenameRule {
    CamelCase,
    SnakeCase,
    PascalCase,
    ScreamingSnakeCase,
    LowerCase,
}

impl RenameRule {
    fn parse(lit: &LitStr) -> Result<Self> {
        match lit.value().as_str() {
            "camelCase" => Ok(Self::CamelCase),
            "snake_case" => Ok(Self::SnakeCase),
            "PascalCase" => Ok(Self::PascalCase),
            "SCREAMING_SNAKE_CASE" => Ok(Self::ScreamingSnakeCase),
            "lowercase" => Ok(Self::LowerCase),
            other => Err(Error::new(
                lit.span(),
                format!("unknown rename_all rule `{}`", other),
            )),
        }
    }

    fn apply(self, name: &str) -> String {
        match self {
            Self::CamelCase => name.to_lower_camel_case(),
            Self::SnakeCase => name.to_snake_case(),
            Self::PascalCase => name.to_upper_camel_case(),
            Self::ScreamingSnakeCase => name.to_shouty_snake_case(),
            Self::LowerCase => name.to_lowercase(),
        }
    }
}

/// Struct-level configuration
#[derive(Default)]
pub struct ContainerConfig {
    rename_all: Option<RenameRule>,
    /// `fn(&Self) -> Result<(), E>` run after construction
    pub validate: Option<Path>,
}

/// Default supplied when a constructor argument is omitted
pub enum DefaultValue {
    /// `Default::default()`
    Trait,
    /// A zero-argument function
    Function(Path),
}

/// Per-field configuration
pub struct FieldConfig {
    /// The field identifier
    pub ident: Ident,
    /// Parameter/property name (after renames)
    pub name: String,
    /// The field type
    pub ty: Type,
    /// `I` when the field is declared as `Option<I>`
    pub nullable_inner: Option<Type>,
    pub default: Option<DefaultValue>,
    pub skip: bool,
}

impl FieldConfig {
    pub fn nullable(&self) -> bool {
        self.nullable_inner.is_some()
    }
}

fn parse_container_config(attrs: &[Attribute]) -> Result<ContainerConfig> {
    let mut config = ContainerConfig::default();
    for attr in attrs {
        if !attr.path().is_ident("rowbind") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let lit: LitStr = meta.value()?.parse()?;
                config.rename_all = Some(RenameRule::parse(&lit)?);
            } else if meta.path.is_ident("validate") {
                let lit: LitStr = meta.value()?.parse()?;
                config.validate = Some(lit.parse()?);
            } else {
                return Err(meta.error(format!(
                    "unknown rowbind container attribute `{}`",
                    meta.path
                        .get_ident()
                        .map(|i| i.to_string())
                        .unwrap_or_default()
                )));
            }
            Ok(())
        })?;
    }
    Ok(config)
}

fn parse_field_config(field: &Field, container: &ContainerConfig) -> Result<FieldConfig> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| Error::new(field.span(), "tuple structs are not supported"))?;

    let field_name = ident.to_string();
    let field_name = field_name.trim_start_matches("r#");
    let mut name = match container.rename_all {
        Some(rule) => rule.apply(field_name),
        None => field_name.to_string(),
    };
    let mut default = None;
    let mut skip = false;

    for attr in &field.attrs {
        if !attr.path().is_ident("rowbind") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                name = lit.value();
            } else if meta.path.is_ident("default") {
                default = Some(if meta.input.peek(syn::Token![=]) {
                    let lit: LitStr = meta.value()?.parse()?;
                    DefaultValue::Function(lit.parse()?)
                } else {
                    DefaultValue::Trait
                });
            } else if meta.path.is_ident("skip") {
                skip = true;
            } else {
                return Err(meta.error(format!(
                    "unknown rowbind attribute `{}`",
                    meta.path
                        .get_ident()
                        .map(|i| i.to_string())
                        .unwrap_or_default()
                )));
            }
            Ok(())
        })?;
    }

    Ok(FieldConfig {
        ident,
        name,
        nullable_inner: option_inner(&field.ty).cloned(),
        ty: field.ty.clone(),
        default,
        skip,
    })
}

/// `I` if `ty` is spelled `Option<I>` (or a path ending in it).
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let last = path.path.segments.last()?;
    if last.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

/// Parse the struct-level and field-level configuration of `input`.
///
/// Names of bound fields must be unique ignoring case, since columns are
/// matched to them case-insensitively.
pub fn parse(input: &DeriveInput) -> Result<(ContainerConfig, Vec<FieldConfig>)> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => return Err(Error::new(input.span(), "only named fields are supported")),
        },
        _ => return Err(Error::new(input.span(), "only structs are supported")),
    };

    let container = parse_container_config(&input.attrs)?;
    let configs = fields
        .iter()
        .map(|f| parse_field_config(f, &container))
        .collect::<Result<Vec<_>>>()?;

    let mut seen: Vec<String> = Vec::new();
    for config in configs.iter().filter(|c| !c.skip) {
        let folded = config.name.to_lowercase();
        if seen.contains(&folded) {
            return Err(Error::new(
                config.ident.span(),
                format!("duplicate name `{}` (names are matched ignoring case)", config.name),
            ));
        }
        seen.push(folded);
    }

    Ok((container, configs))
}
