//! Rust builder output.
//!
//! [`RustEmitter::emit_tokens`] produces the builder items as a token
//! stream, which is what `#[derive(Builder)]` expands to. [`CodeEmitter::emit`]
//! wraps the same items into a standalone file: the tokens are validated
//! with `syn::parse2` and formatted with `prettyplease`.
//!
//! Generated builders hold every property in an `Option`, are consumed by
//! value through their setters and report the first unset required property
//! as a `MissingRequiredValue` of the configured runtime crate.

use super::{CodeEmitter, EmittedUnit, TargetLanguage, check_members};
use crate::error::EmitError;
use crate::model::{TypeKind, TypeParameter, TypeRef};
use crate::synthesize::{Argument, BuildBody, BuilderDescription, FieldSpec, Holder, Overlay};
use convert_case::{Case, Casing};
use heck::ToSnakeCase;
use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Ident, Path, Type, Visibility};
use tracing::{debug, trace};

pub const GENERATED_HEADER: &str = "// Code auto-generated by fluentgen. Do not edit.";

/// Keywords that cannot be written as raw identifiers.
const PATH_KEYWORDS: &[&str] = &["crate", "self", "Self", "super"];

/// Inherent methods every generated builder defines.
const BUILDER_METHODS: &[&str] = &["new", "build"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RustEmitter {
    runtime_path: String,
    visibility: String,
}

impl Default for RustEmitter {
    fn default() -> Self {
        Self::new("::fluentgen")
    }
}

impl RustEmitter {
    /// `runtime_path` is the path of the crate exporting
    /// `MissingRequiredValue`, e.g. `::fluentgen`.
    pub fn new(runtime_path: impl Into<String>) -> Self {
        Self {
            runtime_path: runtime_path.into(),
            visibility: "pub".to_string(),
        }
    }

    /// Visibility of the builder type and its methods, as source text
    /// (`pub`, `pub(crate)`, or empty for private).
    pub fn with_visibility(mut self, visibility: impl Into<String>) -> Self {
        self.visibility = visibility.into();
        self
    }

    pub fn emit_tokens(&self, builder: &BuilderDescription) -> Result<TokenStream, EmitError> {
        debug!(builder = %builder.class_name, "Generating Rust builder tokens");

        if builder.shared_default_instance.is_some() && !builder.type_parameters.is_empty() {
            return Err(EmitError::GenericSharedInstance {
                builder: builder.class_name.clone(),
            });
        }

        let vis: Visibility = syn::parse_str(&self.visibility).map_err(|e| EmitError::Render {
            builder: builder.class_name.clone(),
            message: format!("invalid visibility `{}`: {}", self.visibility, e),
        })?;
        let runtime: Path = syn::parse_str(&self.runtime_path).map_err(|e| EmitError::Render {
            builder: builder.class_name.clone(),
            message: format!("invalid runtime path `{}`: {}", self.runtime_path, e),
        })?;

        let builder_ident = ident(&builder.class_name)?;
        let target_path = constructor_path(&builder.target)?;
        let target_type = rust_type(&builder.build_function.return_type)?;
        let (impl_generics, type_generics) = generics(&builder.type_parameters)?;

        let field_decls = builder
            .fields
            .iter()
            .map(|field| {
                let name = ident(&field.name)?;
                let ty = rust_type(&holder_type(field))?;
                Ok(quote! { #name: #ty })
            })
            .collect::<Result<Vec<_>, EmitError>>()?;
        let field_names = builder
            .fields
            .iter()
            .map(|field| ident(&field.name))
            .collect::<Result<Vec<_>, _>>()?;

        let setter_names = builder
            .setters
            .iter()
            .map(|setter| setter_ident(&setter.function_name, &setter.param_name))
            .collect::<Result<Vec<_>, _>>()?;
        check_members(
            builder,
            TargetLanguage::Rust,
            &self.reserved_names(builder),
            setter_names.iter().map(|name| name.unraw().to_string()),
        )?;

        let setters = builder
            .setters
            .iter()
            .zip(&setter_names)
            .map(|(setter, function)| {
                let param = ident(&setter.param_name)?;
                let param_type = rust_type(&setter.param_type)?;
                let return_type = rust_type(&setter.return_type)?;
                let direct = builder
                    .field(&setter.param_name)
                    .is_some_and(|field| field.holder == Holder::Direct);
                let assign = if direct {
                    quote! { self.#param = #param; }
                } else {
                    quote! { self.#param = Some(#param); }
                };
                trace!(setter = %function, "Generated setter");
                Ok(quote! {
                    #vis fn #function(mut self, #param: #param_type) -> #return_type {
                        #assign
                        self
                    }
                })
            })
            .collect::<Result<Vec<_>, EmitError>>()?;

        let build_body = build_body(builder, &target_path, &target_type, &runtime)?;
        let doc = format!(" Fluent builder for [`{}`].", type_label(&builder.target));

        Ok(quote! {
            #[doc = #doc]
            #[must_use]
            #vis struct #builder_ident #impl_generics {
                #(#field_decls,)*
            }

            impl #impl_generics Default for #builder_ident #type_generics {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl #impl_generics #builder_ident #type_generics {
                #vis fn new() -> Self {
                    Self {
                        #(#field_names: None,)*
                    }
                }

                #(#setters)*

                #vis fn build(self) -> Result<#target_type, #runtime::MissingRequiredValue> {
                    #build_body
                }
            }

            impl #impl_generics #target_type {
                #vis fn builder() -> #builder_ident #type_generics {
                    #builder_ident::new()
                }
            }
        })
    }

    /// Standalone source file with the target imported from its package.
    pub fn emit_file(&self, builder: &BuilderDescription) -> Result<String, EmitError> {
        let items = self.emit_tokens(builder)?;
        let import = match (&builder.target.kind, builder.package.is_empty()) {
            (TypeKind::Named { name, .. }, false) => {
                let path = path_text(&format!("{}::{}", builder.package.join("::"), name))?;
                let path: Path = syn::parse_str(&path).map_err(|e| EmitError::Render {
                    builder: builder.class_name.clone(),
                    message: e.to_string(),
                })?;
                quote! { use #path; }
            }
            _ => quote! {},
        };

        let file: syn::File = syn::parse2(quote! {
            #import
            #items
        })
        .map_err(|e| EmitError::Render {
            builder: builder.class_name.clone(),
            message: e.to_string(),
        })?;

        let text = format!("{}\n\n{}", GENERATED_HEADER, prettyplease::unparse(&file));
        if builder.line_separator == "\n" {
            Ok(text)
        } else {
            Ok(text.replace('\n', &builder.line_separator))
        }
    }
}

impl CodeEmitter for RustEmitter {
    fn language(&self) -> TargetLanguage {
        TargetLanguage::Rust
    }

    fn file_name(&self, builder: &BuilderDescription) -> String {
        format!(
            "{}.{}",
            builder.class_name.to_case(Case::Snake),
            self.language().extension()
        )
    }

    fn emit(&self, builder: &BuilderDescription) -> Result<EmittedUnit, EmitError> {
        Ok(EmittedUnit {
            file_name: self.file_name(builder),
            package: builder.package.clone(),
            class_name: builder.class_name.clone(),
            contents: self.emit_file(builder)?,
        })
    }

    fn reserved_names(&self, _builder: &BuilderDescription) -> Vec<&'static str> {
        BUILDER_METHODS.to_vec()
    }
}

fn build_body(
    builder: &BuilderDescription,
    target_path: &Path,
    target_type: &Type,
    runtime: &Path,
) -> Result<TokenStream, EmitError> {
    let body = match &builder.build_function.body {
        BuildBody::RequiredOnly { arguments } => {
            let arguments = arguments
                .iter()
                .map(|argument| argument_init(argument, runtime))
                .collect::<Result<Vec<_>, _>>()?;
            quote! {
                Ok(#target_path {
                    #(#arguments,)*
                })
            }
        }
        BuildBody::DefaultInstanceOverlay { overlays } => {
            let defaults = overlays
                .iter()
                .map(default_init)
                .collect::<Result<Vec<_>, _>>()?;
            let overlaid = overlays
                .iter()
                .map(overlay_init)
                .collect::<Result<Vec<_>, _>>()?;
            quote! {
                static DEFAULT_INSTANCE: ::std::sync::OnceLock<#target_type> =
                    ::std::sync::OnceLock::new();
                let result = ::core::clone::Clone::clone(DEFAULT_INSTANCE.get_or_init(|| {
                    #target_path {
                        #(#defaults,)*
                    }
                }));
                Ok(#target_path {
                    #(#overlaid,)*
                })
            }
        }
        BuildBody::RequiredThenOverlay {
            arguments,
            overlays,
        } => {
            let required = arguments
                .iter()
                .map(|argument| argument_init(argument, runtime))
                .collect::<Result<Vec<_>, _>>()?;
            let defaults = overlays
                .iter()
                .map(default_init)
                .collect::<Result<Vec<_>, _>>()?;
            let overlaid = overlays
                .iter()
                .map(overlay_init)
                .collect::<Result<Vec<_>, _>>()?;
            let rest = if arguments.is_empty() {
                quote! {}
            } else {
                quote! { ..result }
            };
            quote! {
                let result = #target_path {
                    #(#required,)*
                    #(#defaults,)*
                };
                Ok(#target_path {
                    #(#overlaid,)*
                    #rest
                })
            }
        }
    };
    Ok(body)
}

fn argument_init(argument: &Argument, runtime: &Path) -> Result<TokenStream, EmitError> {
    let name = ident(&argument.property)?;
    let property = argument.property.as_str();
    if argument.is_checked() {
        Ok(quote! {
            #name: self.#name.ok_or(#runtime::MissingRequiredValue::new(#property))?
        })
    } else {
        Ok(quote! { #name: self.#name })
    }
}

fn default_init(overlay: &Overlay) -> Result<TokenStream, EmitError> {
    let name = ident(&overlay.property)?;
    match &overlay.default_expr {
        Some(expr) => {
            let expr: syn::Expr =
                syn::parse_str(expr).map_err(|e| EmitError::InvalidDefaultExpression {
                    property: overlay.property.clone(),
                    message: e.to_string(),
                })?;
            Ok(quote! { #name: #expr })
        }
        None => Ok(quote! { #name: Default::default() }),
    }
}

fn overlay_init(overlay: &Overlay) -> Result<TokenStream, EmitError> {
    let name = ident(&overlay.property)?;
    Ok(quote! { #name: self.#name.unwrap_or(result.#name) })
}

/// `Direct` holders already are the nullable property type; `Wrapped`
/// ones add an `Option` around it.
fn holder_type(field: &FieldSpec) -> TypeRef {
    match field.holder {
        Holder::Direct => field.property_type.clone(),
        Holder::Wrapped => TypeRef::generic("Option", vec![field.property_type.clone()]),
    }
}

/// `(<T: Bound, R>, <T, R>)`, both empty for non-generic builders.
fn generics(parameters: &[TypeParameter]) -> Result<(TokenStream, TokenStream), EmitError> {
    if parameters.is_empty() {
        return Ok((quote! {}, quote! {}));
    }
    let mut declared = Vec::new();
    let mut names = Vec::new();
    for parameter in parameters {
        let name = ident(&parameter.name)?;
        let bounds = parameter
            .bounds
            .iter()
            .map(|bound| rust_type(&bound.non_null()))
            .collect::<Result<Vec<_>, _>>()?;
        if bounds.is_empty() {
            declared.push(quote! { #name });
        } else {
            declared.push(quote! { #name: #(#bounds)+* });
        }
        names.push(name);
    }
    Ok((quote! { <#(#declared),*> }, quote! { <#(#names),*> }))
}

/// Path used in struct expressions: the target without type arguments.
fn constructor_path(target: &TypeRef) -> Result<Path, EmitError> {
    match &target.kind {
        TypeKind::Named { name, .. } => {
            syn::parse_str(&path_text(name)?).map_err(|_| unsupported(target))
        }
        _ => Err(unsupported(target)),
    }
}

fn type_label(ty: &TypeRef) -> String {
    match &ty.kind {
        TypeKind::Named { name, .. } => name.clone(),
        _ => ty.to_string(),
    }
}

pub fn rust_type(ty: &TypeRef) -> Result<Type, EmitError> {
    let text = type_text(ty)?;
    syn::parse_str(&text).map_err(|_| unsupported(ty))
}

fn type_text(ty: &TypeRef) -> Result<String, EmitError> {
    let inner = match &ty.kind {
        TypeKind::Named { name, arguments } => {
            let mut text = path_text(name)?;
            if !arguments.is_empty() {
                let arguments = arguments
                    .iter()
                    .map(type_text)
                    .collect::<Result<Vec<_>, _>>()?;
                text.push_str(&format!("<{}>", arguments.join(", ")));
            }
            text
        }
        TypeKind::Parameter(name) => ident(name)?.to_string(),
        TypeKind::Tuple(elements) => {
            let elements = elements
                .iter()
                .map(type_text)
                .collect::<Result<Vec<_>, _>>()?;
            match elements.as_slice() {
                [single] => format!("({},)", single),
                _ => format!("({})", elements.join(", ")),
            }
        }
        TypeKind::Array { element, length } => format!("[{}; {}]", type_text(element)?, length),
        TypeKind::Star => return Err(unsupported(ty)),
    };
    if ty.nullable {
        Ok(format!("Option<{}>", inner))
    } else {
        Ok(inner)
    }
}

/// Turns `std::collections::HashMap`, `kotlin/Int` or `Outer.Inner` into
/// Rust path text, escaping keywords.
fn path_text(name: &str) -> Result<String, EmitError> {
    let (leading, rest) = match name.strip_prefix("::") {
        Some(rest) => ("::", rest),
        None => ("", name),
    };
    let segments = rest
        .split("::")
        .flat_map(|segment| segment.split(['/', '.']))
        .map(|segment| {
            if PATH_KEYWORDS.contains(&segment) {
                Ok(segment.to_string())
            } else {
                ident(segment).map(|ident| ident.to_string())
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("{}{}", leading, segments.join("::")))
}

/// Identifier for `name`, as a raw identifier when `name` is a keyword.
pub fn ident(name: &str) -> Result<Ident, EmitError> {
    syn::parse_str::<Ident>(name)
        .or_else(|_| syn::parse_str::<Ident>(&format!("r#{}", name)))
        .map_err(|_| EmitError::InvalidIdentifier {
            name: name.to_string(),
            language: TargetLanguage::Rust.to_string(),
        })
}

/// Prefixed setters such as `withTimeout` become `with_timeout`.
fn setter_ident(function_name: &str, property: &str) -> Result<Ident, EmitError> {
    if function_name == property {
        ident(property)
    } else {
        ident(&function_name.to_snake_case())
    }
}

fn unsupported(ty: &TypeRef) -> EmitError {
    EmitError::UnsupportedType {
        ty: ty.to_string(),
        language: TargetLanguage::Rust.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuilderConfig, RunConfig};
    use crate::extract::Extractor;
    use crate::model::raw::{RawParameter, RawType, RawTypeDescription, RawTypeKind};
    use crate::strategy::select;
    use crate::synthesize::synthesize;
    use pretty_assertions::assert_eq;

    fn describe(description: RawTypeDescription, config: BuilderConfig) -> BuilderDescription {
        let run = RunConfig::default();
        let model = Extractor::new(&run).extract(&description, &config).unwrap();
        let kind = select(&model.required, &model.optional, config.optimize_copy);
        synthesize(&model, &config, &run, kind)
    }

    fn point() -> BuilderDescription {
        describe(
            RawTypeDescription::value_type(
                "crate::shapes::Point",
                vec![
                    RawParameter::required("x", RawType::named("i32")),
                    RawParameter::required("y", RawType::named("i32")),
                ],
            ),
            BuilderConfig::default(),
        )
    }

    fn emit(builder: &BuilderDescription) -> String {
        RustEmitter::default().emit(builder).unwrap().contents
    }

    /// Output with all whitespace removed, for checks inside expressions
    /// whose line breaks depend on width.
    fn squash(contents: &str) -> String {
        contents.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn test_ident_escapes_keywords() {
        assert_eq!(ident("value").unwrap().to_string(), "value");
        assert_eq!(ident("type").unwrap().to_string(), "r#type");
        assert!(ident("self").is_err());
        assert!(ident("two words").is_err());
        assert!(ident("").is_err());
    }

    #[test]
    fn test_type_rendering() {
        let ty = TypeRef::generic(
            "std::collections::HashMap",
            vec![TypeRef::named("String"), TypeRef::parameter("T").into_nullable()],
        );
        assert_eq!(
            type_text(&ty).unwrap(),
            "std::collections::HashMap<String, Option<T>>"
        );
        let tuple = TypeRef {
            kind: TypeKind::Tuple(vec![TypeRef::named("u8")]),
            nullable: false,
        };
        assert_eq!(type_text(&tuple).unwrap(), "(u8,)");
        let array = TypeRef {
            kind: TypeKind::Array {
                element: Box::new(TypeRef::named("f32")),
                length: "3".into(),
            },
            nullable: true,
        };
        assert_eq!(type_text(&array).unwrap(), "Option<[f32; 3]>");
        assert_eq!(path_text("::core::num::NonZeroU8").unwrap(), "::core::num::NonZeroU8");
        assert_eq!(path_text("kotlin/Int").unwrap(), "kotlin::Int");
        assert!(matches!(
            type_text(&TypeRef::star()),
            Err(EmitError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_file_name_is_snake_case() {
        assert_eq!(RustEmitter::default().file_name(&point()), "point_builder.rs");
    }

    #[test]
    fn test_point_file_output() {
        let contents = emit(&point());
        assert!(contents.starts_with("// Code auto-generated by fluentgen. Do not edit.\n\n"));
        assert!(contents.contains("use crate::shapes::Point;\n"));
        assert!(contents.contains("pub struct PointBuilder {\n"));
        assert!(contents.contains("    x: Option<i32>,\n"));
        assert!(contents.contains("impl Default for PointBuilder {\n"));
        assert!(contents.contains("    pub fn x(mut self, x: i32) -> PointBuilder {\n"));
        assert!(contents.contains("        self.x = Some(x);\n"));
        assert!(contents.contains(
            "    pub fn build(self) -> Result<Point, ::fluentgen::MissingRequiredValue> {\n"
        ));
        assert!(contents.contains("impl Point {\n"));
        assert!(contents.contains("    pub fn builder() -> PointBuilder {\n"));
        syn::parse_file(&contents).unwrap();
    }

    #[test]
    fn test_checked_arguments_report_property_names() {
        let tokens = RustEmitter::new("crate::runtime")
            .emit_tokens(&point())
            .unwrap()
            .to_string();
        assert!(tokens.contains("MissingRequiredValue :: new (\"x\")"));
        assert!(tokens.contains("MissingRequiredValue :: new (\"y\")"));
        assert!(tokens.contains("crate :: runtime :: MissingRequiredValue"));
    }

    #[test]
    fn test_prefixed_setters_are_snake_case() {
        let builder = describe(
            RawTypeDescription::value_type(
                "crate::Conn",
                vec![RawParameter::required("timeout_ms", RawType::named("u64"))],
            ),
            BuilderConfig {
                setter_prefix: "with".into(),
                ..Default::default()
            },
        );
        let contents = emit(&builder);
        assert!(
            contents.contains("pub fn with_timeout_ms(mut self, timeout_ms: u64) -> ConnBuilder {")
        );
    }

    #[test]
    fn test_nullable_required_field_is_direct() {
        let builder = describe(
            RawTypeDescription::value_type(
                "crate::Note",
                vec![
                    RawParameter::required("text", RawType::named("String").nullable()),
                    RawParameter::optional("tag", RawType::named("String").nullable()),
                ],
            ),
            BuilderConfig::default(),
        );
        let contents = emit(&builder);
        assert!(contents.contains("    text: Option<String>,\n"));
        assert!(contents.contains("    tag: Option<Option<String>>,\n"));
        assert!(contents.contains("        self.text = text;\n"));
        assert!(contents.contains("        self.tag = Some(tag);\n"));
        let squashed = squash(&contents);
        assert!(squashed.contains("text:self.text,tag:Default::default()"));
        assert!(squashed.contains("tag:self.tag.unwrap_or(result.tag),..result"));
        syn::parse_file(&contents).unwrap();
    }

    #[test]
    fn test_shared_default_instance_uses_once_lock() {
        let builder = describe(
            RawTypeDescription::value_type(
                "crate::Config",
                vec![
                    RawParameter {
                        default_expr: Some("1".into()),
                        ..RawParameter::optional("a", RawType::named("i32"))
                    },
                    RawParameter::optional("b", RawType::named("String")),
                ],
            ),
            BuilderConfig {
                optimize_copy: true,
                ..Default::default()
            },
        );
        let contents = emit(&builder);
        let squashed = squash(&contents);
        assert!(squashed.contains("staticDEFAULT_INSTANCE:::std::sync::OnceLock<Config>"));
        assert!(squashed.contains("Config{a:1,b:Default::default()"));
        assert!(squashed.contains("a:self.a.unwrap_or(result.a),b:self.b.unwrap_or(result.b)"));
        assert!(!squashed.contains("..result"));
        syn::parse_file(&contents).unwrap();
    }

    #[test]
    fn test_generic_builder() {
        let builder = describe(
            RawTypeDescription::value_type(
                "crate::Pair",
                vec![
                    RawParameter::required("first", RawType::named("T")),
                    RawParameter::required("second", RawType::named("R")),
                ],
            )
            .with_type_parameter(
                "T",
                vec![RawType::named("Clone"), RawType::named("std::fmt::Debug")],
            )
            .with_type_parameter("R", vec![]),
            BuilderConfig::default(),
        );
        let contents = emit(&builder);
        assert!(contents.contains("pub struct PairBuilder<T: Clone + std::fmt::Debug, R> {\n"));
        assert!(contents.contains("impl<T: Clone + std::fmt::Debug, R> PairBuilder<T, R> {\n"));
        assert!(contents.contains("    pub fn first(mut self, first: T) -> PairBuilder<T, R> {\n"));
        assert!(contents.contains("Result<Pair<T, R>, ::fluentgen::MissingRequiredValue>"));
        syn::parse_file(&contents).unwrap();
    }

    #[test]
    fn test_generic_shared_instance_is_rejected() {
        let builder = describe(
            RawTypeDescription::value_type(
                "crate::Wrapper",
                vec![RawParameter::optional("inner", RawType::named("T"))],
            )
            .with_type_parameter("T", vec![]),
            BuilderConfig {
                optimize_copy: true,
                ..Default::default()
            },
        );
        assert_eq!(
            RustEmitter::default().emit(&builder).unwrap_err(),
            EmitError::GenericSharedInstance {
                builder: "WrapperBuilder".into()
            }
        );
    }

    #[test]
    fn test_invalid_default_expression() {
        let builder = describe(
            RawTypeDescription::value_type(
                "crate::Broken",
                vec![RawParameter {
                    default_expr: Some("1 +".into()),
                    ..RawParameter::optional("a", RawType::named("i32"))
                }],
            ),
            BuilderConfig::default(),
        );
        assert!(matches!(
            RustEmitter::default().emit(&builder),
            Err(EmitError::InvalidDefaultExpression { .. })
        ));
    }

    #[test]
    fn test_setters_cannot_shadow_builder_methods() {
        let builder = describe(
            RawTypeDescription::value_type(
                "crate::Factory",
                vec![RawParameter::required("new", RawType::named("u8"))],
            ),
            BuilderConfig::default(),
        );
        assert_eq!(
            RustEmitter::default().emit_tokens(&builder).unwrap_err(),
            EmitError::MemberClash {
                builder: "FactoryBuilder".into(),
                name: "new".into(),
                language: "rust".into(),
                context: "the builder already declares it".into(),
            }
        );

        let prefixed = describe(
            RawTypeDescription::value_type(
                "crate::Factory",
                vec![RawParameter::required("new", RawType::named("u8"))],
            ),
            BuilderConfig {
                setter_prefix: "with".into(),
                ..Default::default()
            },
        );
        assert!(emit(&prefixed).contains("pub fn with_new(mut self, new: u8) -> FactoryBuilder {"));
    }

    #[test]
    fn test_snake_cased_setters_must_stay_distinct() {
        let builder = describe(
            RawTypeDescription::value_type(
                "crate::Span",
                vec![
                    RawParameter::required("startAt", RawType::named("u32")),
                    RawParameter::required("start_at", RawType::named("u32")),
                ],
            ),
            BuilderConfig {
                setter_prefix: "with".into(),
                ..Default::default()
            },
        );
        assert!(matches!(
            RustEmitter::default().emit(&builder),
            Err(EmitError::MemberClash { name, .. }) if name == "with_start_at"
        ));
    }

    #[test]
    fn test_new_does_not_go_through_default() {
        let builder = describe(
            RawTypeDescription::value_type(
                "crate::Switch",
                vec![RawParameter::required("default", RawType::named("bool"))],
            ),
            BuilderConfig::default(),
        );
        let contents = emit(&builder);
        let squashed = squash(&contents);
        assert!(squashed.contains("pubfnnew()->Self{Self{default:None}}"));
        assert!(squashed.contains("fndefault()->Self{Self::new()}"));
        assert!(
            contents.contains("    pub fn default(mut self, default: bool) -> SwitchBuilder {\n")
        );
        syn::parse_file(&contents).unwrap();
    }

    #[test]
    fn test_keyword_property_uses_raw_identifier() {
        let builder = describe(
            RawTypeDescription::value_type(
                "crate::Token",
                vec![RawParameter::required("type", RawType::named("u8"))],
            ),
            BuilderConfig::default(),
        );
        let contents = emit(&builder);
        assert!(contents.contains("    r#type: Option<u8>,\n"));
        assert!(squash(&contents).contains(
            "r#type:self.r#type.ok_or(::fluentgen::MissingRequiredValue::new(\"type\"))?"
        ));
    }

    #[test]
    fn test_visibility_and_star_types() {
        let tokens = RustEmitter::default()
            .with_visibility("pub(crate)")
            .emit_tokens(&point())
            .unwrap()
            .to_string();
        assert!(tokens.contains("pub (crate) struct PointBuilder"));

        let star = describe(
            RawTypeDescription::value_type(
                "crate::Bag",
                vec![RawParameter::required(
                    "items",
                    RawType {
                        kind: RawTypeKind::Named {
                            name: "Vec".into(),
                            arguments: vec![RawType::star()],
                        },
                        nullable: false,
                    },
                )],
            ),
            BuilderConfig::default(),
        );
        assert!(matches!(
            RustEmitter::default().emit(&star),
            Err(EmitError::UnsupportedType { .. })
        ));
    }
}
