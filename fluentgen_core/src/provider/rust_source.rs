//! Describes Rust structs marked for batch generation with
//! `#[fluentgen::generate_builder]`.
//!
//! Structs using `#[derive(Builder)]` already get their builder from the
//! macro expansion and are never batch targets.
//!
//! Struct options live in `#[builder(name = "..", prefix = "..", optimize_copy)]`,
//! field defaults in `#[builder(default)]` or `#[builder(default = expr)]`.
//! `Option<T>` fields are nullable `T`.

use super::{ProvidedType, TypeModelProvider};
use crate::config::PartialBuilderConfig;
use crate::error::{FluentgenError, Result};
use crate::model::raw::{
    DeclarationKind, RawConstructor, RawParameter, RawType, RawTypeDescription, RawTypeKind,
    RawTypeParameter,
};
use crate::tooling::{SourceFile, WorkspaceScanner};
use quote::ToTokens;
use rayon::prelude::*;
use std::fs;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{
    Attribute, Data, DeriveInput, Fields, GenericArgument, GenericParam, Item, LitStr,
    PathArguments, Type, TypeParamBound, WherePredicate,
};
use tracing::{debug, info, trace, warn};

/// Attribute marking a struct for batch generation.
pub const MARKER_NAME: &str = "generate_builder";
/// Derive that expands a builder in place.
pub const DERIVE_NAME: &str = "Builder";
pub const ATTRIBUTE: &str = "builder";

pub struct RustSourceProvider {
    scanner: WorkspaceScanner,
    marker_names: Vec<String>,
}

impl RustSourceProvider {
    /// Scans `root`; structs carrying `#[generate_builder]` or an attribute
    /// named in `marker_aliases` are targets.
    pub fn new(root: impl Into<std::path::PathBuf>, marker_aliases: &[String]) -> Self {
        let mut marker_names = vec![MARKER_NAME.to_string()];
        marker_names.extend(marker_aliases.iter().cloned());
        Self {
            scanner: WorkspaceScanner::new(root),
            marker_names,
        }
    }

    fn describe_file(&self, file: &SourceFile) -> Result<Vec<ProvidedType>> {
        let source = fs::read_to_string(&file.path)?;
        let types = describe_source(&source, &file.module_path, &self.marker_names)
            .map_err(|e| FluentgenError::parse_error(&file.path, e.to_string()))?;
        Ok(types
            .into_iter()
            .map(|mut provided| {
                provided.origin = Some(file.path.clone());
                provided
            })
            .collect())
    }
}

impl TypeModelProvider for RustSourceProvider {
    fn name(&self) -> &str {
        "rust"
    }

    fn descriptions(&self) -> Result<Vec<ProvidedType>> {
        info!("Scanning {:?} for builder targets", self.scanner.root());
        let files = self.scanner.scan()?;
        let per_file = files
            .par_iter()
            .map(|file| self.describe_file(file))
            .collect::<Vec<_>>();

        let mut types = Vec::new();
        for (file, result) in files.iter().zip(per_file) {
            match result {
                Ok(found) => types.extend(found),
                // One unparsable file must not hide the targets in the others.
                Err(FluentgenError::ParseError { message, .. }) => {
                    warn!("Skipping {:?}: {}", file.path, message);
                }
                Err(other) => return Err(other),
            }
        }
        info!("Found {} builder targets", types.len());
        Ok(types)
    }
}

/// Every target in one source file, including those in inline modules.
pub fn describe_source(
    source: &str,
    module_path: &[String],
    marker_names: &[String],
) -> syn::Result<Vec<ProvidedType>> {
    let file = syn::parse_file(source)?;
    let mut found = Vec::new();
    collect_items(&file.items, module_path.to_vec(), marker_names, &mut found)?;
    Ok(found)
}

fn collect_items(
    items: &[Item],
    module_path: Vec<String>,
    marker_names: &[String],
    found: &mut Vec<ProvidedType>,
) -> syn::Result<()> {
    for item in items {
        match item {
            Item::Struct(item) if is_marked(&item.attrs, marker_names) => {
                if derives(&item.attrs, DERIVE_NAME) {
                    warn!(
                        "Skipping {}: it derives `Builder` and is also marked for generation",
                        item.ident
                    );
                    continue;
                }
                let input = DeriveInput::from(item.clone());
                let (description, config) = describe_derive_input(&input, &module_path)?;
                debug!("Found builder target {}", description.qualified_name);
                found.push(ProvidedType {
                    description,
                    config,
                    origin: None,
                });
            }
            Item::Mod(module) => {
                if let Some((_, content)) = &module.content {
                    let mut nested = module_path.clone();
                    nested.push(module.ident.unraw().to_string());
                    collect_items(content, nested, marker_names, found)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// `#[generate_builder]`, `#[fluentgen::generate_builder]` or an alias.
fn is_marked(attrs: &[Attribute], marker_names: &[String]) -> bool {
    attrs.iter().any(|attr| {
        attr.path()
            .segments
            .last()
            .is_some_and(|last| marker_names.iter().any(|name| last.ident == name))
    })
}

/// Whether a `#[derive(...)]` lists `derive_name`, plain or path-qualified.
pub fn derives(attrs: &[Attribute], derive_name: &str) -> bool {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("derive"))
        .any(|attr| {
            let mut hit = false;
            let _ = attr.parse_nested_meta(|meta| {
                if meta
                    .path
                    .segments
                    .last()
                    .is_some_and(|last| last.ident == derive_name)
                {
                    hit = true;
                }
                Ok(())
            });
            hit
        })
}

/// Raw description and declared builder options of one Rust type.
///
/// `module_path` may be empty, in which case the qualified name is the bare
/// type name.
pub fn describe_derive_input(
    input: &DeriveInput,
    module_path: &[String],
) -> syn::Result<(RawTypeDescription, PartialBuilderConfig)> {
    let name = input.ident.unraw().to_string();
    let qualified_name = if module_path.is_empty() {
        name.clone()
    } else {
        format!("{}::{}", module_path.join("::"), name)
    };
    trace!("Describing {}", qualified_name);

    let config = struct_config(&input.attrs, &qualified_name)?;
    let type_parameters = type_parameters(input)?;

    let (kind, constructors) = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => {
                let parameters = fields
                    .named
                    .iter()
                    .map(|field| {
                        let ident = field.ident.as_ref().ok_or_else(|| {
                            syn::Error::new(field.span(), "named field without a name")
                        })?;
                        let (has_default, default_expr) = field_default(&field.attrs)?;
                        Ok(RawParameter {
                            name: ident.unraw().to_string(),
                            ty: raw_type(&field.ty),
                            has_default,
                            default_expr,
                        })
                    })
                    .collect::<syn::Result<Vec<_>>>()?;
                (
                    DeclarationKind::ValueType,
                    vec![RawConstructor {
                        primary: true,
                        parameters,
                    }],
                )
            }
            Fields::Unnamed(_) => (DeclarationKind::TupleStruct, Vec::new()),
            Fields::Unit => (
                DeclarationKind::ValueType,
                vec![RawConstructor {
                    primary: true,
                    parameters: Vec::new(),
                }],
            ),
        },
        Data::Enum(_) => (DeclarationKind::Enum, Vec::new()),
        Data::Union(_) => (DeclarationKind::Union, Vec::new()),
    };

    Ok((
        RawTypeDescription {
            qualified_name,
            kind,
            type_parameters,
            constructors,
        },
        config,
    ))
}

/// Merges every `#[builder(...)]` on the struct; repeating an option with a
/// different value is an error.
fn struct_config(attrs: &[Attribute], type_name: &str) -> syn::Result<PartialBuilderConfig> {
    let mut config = PartialBuilderConfig::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident(ATTRIBUTE)) {
        let mut declared = PartialBuilderConfig::default();
        attr.parse_nested_meta(|meta| {
            let mut single = PartialBuilderConfig::default();
            if meta.path.is_ident("name") {
                single.class_name = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("prefix") {
                single.prefix = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("optimize_copy") {
                let enabled = if meta.input.peek(syn::Token![=]) {
                    meta.value()?.parse::<syn::LitBool>()?.value
                } else {
                    true
                };
                single.optimize_copy = Some(enabled);
            } else {
                return Err(meta.error("expected `name`, `prefix` or `optimize_copy`"));
            }
            declared = std::mem::take(&mut declared)
                .merge(single, type_name)
                .map_err(|e| meta.error(e))?;
            Ok(())
        })?;
        config = config
            .merge(declared, type_name)
            .map_err(|e| syn::Error::new_spanned(attr, e))?;
    }
    Ok(config)
}

fn field_default(attrs: &[Attribute]) -> syn::Result<(bool, Option<String>)> {
    let mut has_default = false;
    let mut default_expr = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident(ATTRIBUTE)) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("default") {
                return Err(meta.error("expected `default` or `default = <expr>`"));
            }
            if has_default {
                return Err(meta.error("duplicate `default`"));
            }
            has_default = true;
            if meta.input.peek(syn::Token![=]) {
                let expr: syn::Expr = meta.value()?.parse()?;
                default_expr = Some(expr.to_token_stream().to_string());
            }
            Ok(())
        })?;
    }
    Ok((has_default, default_expr))
}

fn type_parameters(input: &DeriveInput) -> syn::Result<Vec<RawTypeParameter>> {
    let mut parameters = Vec::new();
    for param in &input.generics.params {
        match param {
            GenericParam::Type(param) => parameters.push(RawTypeParameter {
                name: param.ident.unraw().to_string(),
                bounds: param.bounds.iter().map(raw_bound).collect(),
            }),
            GenericParam::Lifetime(lifetime) => {
                return Err(syn::Error::new_spanned(
                    &lifetime.lifetime,
                    "builders cannot be derived for types with lifetime parameters",
                ));
            }
            GenericParam::Const(constant) => {
                return Err(syn::Error::new_spanned(
                    &constant.ident,
                    "builders cannot be derived for types with const parameters",
                ));
            }
        }
    }

    if let Some(where_clause) = &input.generics.where_clause {
        for predicate in &where_clause.predicates {
            let WherePredicate::Type(predicate) = predicate else {
                return Err(syn::Error::new(
                    predicate.span(),
                    "only `T: Bound` where-predicates are supported",
                ));
            };
            let target = match &predicate.bounded_ty {
                Type::Path(path) if path.qself.is_none() => path.path.get_ident(),
                _ => None,
            }
            .and_then(|ident| {
                let name = ident.unraw().to_string();
                parameters.iter_mut().find(|p| p.name == name)
            });
            match target {
                Some(parameter) => parameter
                    .bounds
                    .extend(predicate.bounds.iter().map(raw_bound)),
                None => {
                    return Err(syn::Error::new(
                        predicate.bounded_ty.span(),
                        "where-predicates must bound a type parameter",
                    ));
                }
            }
        }
    }
    Ok(parameters)
}

/// Trait bounds become named types; `?Sized` and lifetimes stay opaque.
fn raw_bound(bound: &TypeParamBound) -> RawType {
    match bound {
        TypeParamBound::Trait(bound) if bound.lifetimes.is_none() => match bound.modifier {
            syn::TraitBoundModifier::None => {
                raw_path(&bound.path, false).unwrap_or_else(|| opaque(bound))
            }
            syn::TraitBoundModifier::Maybe(_) => {
                RawType::opaque(format!("?{}", path_name(&bound.path)))
            }
        },
        other => opaque(other),
    }
}

pub fn raw_type(ty: &Type) -> RawType {
    match ty {
        Type::Path(path) if path.qself.is_none() => {
            raw_path(&path.path, true).unwrap_or_else(|| opaque(ty))
        }
        Type::Tuple(tuple) => RawType {
            kind: RawTypeKind::Tuple(tuple.elems.iter().map(raw_type).collect()),
            nullable: false,
        },
        Type::Array(array) => RawType {
            kind: RawTypeKind::Array {
                element: Box::new(raw_type(&array.elem)),
                length: array.len.to_token_stream().to_string(),
            },
            nullable: false,
        },
        Type::Paren(paren) => raw_type(&paren.elem),
        Type::Group(group) => raw_type(&group.elem),
        other => opaque(other),
    }
}

/// `None` when the path carries anything but type arguments.
fn raw_path(path: &syn::Path, unwrap_option: bool) -> Option<RawType> {
    let last = path.segments.last()?;
    let mut arguments = Vec::new();
    match &last.arguments {
        PathArguments::None => {}
        PathArguments::AngleBracketed(generic) => {
            for argument in &generic.args {
                match argument {
                    GenericArgument::Type(ty) => arguments.push(raw_type(ty)),
                    _ => return None,
                }
            }
        }
        PathArguments::Parenthesized(_) => return None,
    }
    if path
        .segments
        .iter()
        .rev()
        .skip(1)
        .any(|segment| !segment.arguments.is_none())
    {
        return None;
    }

    if unwrap_option && last.ident == "Option" && arguments.len() == 1 {
        let mut inner = arguments.remove(0);
        if !inner.nullable {
            inner.nullable = true;
            return Some(inner);
        }
        arguments.push(inner);
    }

    Some(RawType::generic(path_name(path), arguments))
}

/// `a::b::C` without any generic arguments.
fn path_name(path: &syn::Path) -> String {
    let mut name = path
        .segments
        .iter()
        .map(|segment| segment.ident.unraw().to_string())
        .collect::<Vec<_>>()
        .join("::");
    if path.leading_colon.is_some() {
        name.insert_str(0, "::");
    }
    name
}

fn opaque(tokens: &impl ToTokens) -> RawType {
    RawType::opaque(tokens.to_token_stream().to_string())
}
