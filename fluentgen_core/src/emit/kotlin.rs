//! Kotlin source output.

use super::{CodeEmitter, EmittedUnit, TargetLanguage, check_members};
use crate::error::EmitError;
use crate::model::{TypeKind, TypeParameter, TypeRef};
use crate::synthesize::{Argument, BuildBody, BuilderDescription, Overlay};
use tracing::debug;

pub const GENERATED_HEADER: &str = "// Code auto-generated by fluentgen. Do not edit.";

const INDENT: &str = "    ";

/// Companion value holding the shared default instance.
const DEFAULT_INSTANCE: &str = "defaultInstance";

const HARD_KEYWORDS: &[&str] = &[
    "as", "break", "class", "continue", "do", "else", "false", "for", "fun", "if", "in",
    "interface", "is", "null", "object", "package", "return", "super", "this", "throw", "true",
    "try", "typealias", "typeof", "val", "var", "when", "while",
];

/// Characters the JVM forbids in names, even between backticks.
const FORBIDDEN: &[char] = &['.', ';', '[', ']', '/', '<', '>', ':', '\\', '`', '\n', '\r'];

#[derive(Debug, Clone, Copy, Default)]
pub struct KotlinEmitter;

impl CodeEmitter for KotlinEmitter {
    fn language(&self) -> TargetLanguage {
        TargetLanguage::Kotlin
    }

    fn file_name(&self, builder: &BuilderDescription) -> String {
        format!("{}.{}", builder.class_name, self.language().extension())
    }

    fn emit(&self, builder: &BuilderDescription) -> Result<EmittedUnit, EmitError> {
        debug!(builder = %builder.class_name, "Rendering Kotlin builder");
        // Holders are builder properties, so one named like the companion
        // value would shadow it inside `build()`.
        check_members(
            builder,
            self.language(),
            &self.reserved_names(builder),
            builder.fields.iter().map(|field| field.name.clone()),
        )?;
        let contents = render(builder)?;
        Ok(EmittedUnit {
            file_name: self.file_name(builder),
            package: builder.package.clone(),
            class_name: builder.class_name.clone(),
            contents,
        })
    }

    fn reserved_names(&self, builder: &BuilderDescription) -> Vec<&'static str> {
        if builder.shared_default_instance.is_some() {
            vec![DEFAULT_INSTANCE]
        } else {
            Vec::new()
        }
    }
}

/// Accumulates indented lines, joined with the run's line separator.
struct Source {
    lines: Vec<String>,
}

impl Source {
    fn line(&mut self, depth: usize, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines.push(format!("{}{}", INDENT.repeat(depth), text));
        }
    }

    fn finish(self, separator: &str) -> String {
        let mut out = self.lines.join(separator);
        out.push_str(separator);
        out
    }
}

fn render(builder: &BuilderDescription) -> Result<String, EmitError> {
    if builder.shared_default_instance.is_some() && !builder.type_parameters.is_empty() {
        return Err(EmitError::GenericSharedInstance {
            builder: builder.class_name.clone(),
        });
    }

    let mut src = Source { lines: Vec::new() };
    src.line(0, GENERATED_HEADER);
    if !builder.package.is_empty() {
        let package = builder
            .package
            .iter()
            .map(|segment| identifier(segment))
            .collect::<Result<Vec<_>, _>>()?;
        src.line(0, format!("package {}", package.join(".")));
    }
    src.line(0, "");

    let class_name = identifier(&builder.class_name)?;
    let (parameters, where_clause) = type_parameters(&builder.type_parameters)?;
    src.line(0, format!("class {}{}{} {{", class_name, parameters, where_clause));

    for field in &builder.fields {
        src.line(
            1,
            format!(
                "private var {}: {} = null",
                identifier(&field.name)?,
                type_name(&field.ty)?
            ),
        );
    }

    for setter in &builder.setters {
        let param = identifier(&setter.param_name)?;
        src.line(0, "");
        src.line(
            1,
            format!(
                "fun {}({}: {}): {} {{",
                identifier(&setter.function_name)?,
                param,
                type_name(&setter.param_type)?,
                type_name(&setter.return_type)?
            ),
        );
        src.line(2, format!("this.{} = {}", param, param));
        src.line(2, "return this");
        src.line(1, "}");
    }

    let target = type_name(&builder.build_function.return_type)?;
    src.line(0, "");
    src.line(1, format!("fun build(): {} {{", target));
    match &builder.build_function.body {
        BuildBody::RequiredOnly { arguments } => {
            src.line(2, format!("return {}(", constructor_name(builder)?));
            arguments_block(&mut src, arguments)?;
            src.line(2, ")");
        }
        BuildBody::DefaultInstanceOverlay { overlays } => {
            src.line(2, format!("return {}.copy(", DEFAULT_INSTANCE));
            overlay_block(&mut src, overlays, DEFAULT_INSTANCE)?;
            src.line(2, ")");
        }
        BuildBody::RequiredThenOverlay {
            arguments,
            overlays,
        } => {
            src.line(2, format!("val result = {}(", constructor_name(builder)?));
            arguments_block(&mut src, arguments)?;
            src.line(2, ")");
            src.line(2, "return result.copy(");
            overlay_block(&mut src, overlays, "result")?;
            src.line(2, ")");
        }
    }
    src.line(1, "}");

    if let Some(shared) = &builder.shared_default_instance {
        src.line(0, "");
        src.line(1, "private companion object {");
        src.line(
            2,
            format!(
                "private val {}: {} by lazy {{ {}() }}",
                DEFAULT_INSTANCE,
                type_name(&shared.ty)?,
                constructor_name(builder)?
            ),
        );
        src.line(1, "}");
    }
    src.line(0, "}");

    Ok(src.finish(&builder.line_separator))
}

fn arguments_block(src: &mut Source, arguments: &[Argument]) -> Result<(), EmitError> {
    let count = arguments.len();
    for (index, argument) in arguments.iter().enumerate() {
        let name = identifier(&argument.property)?;
        let value = if argument.is_checked() {
            format!(
                "this.{} ?: throw IllegalArgumentException(\"{}\")",
                name,
                missing_message(&argument.property)
            )
        } else {
            format!("this.{}", name)
        };
        let comma = if index + 1 < count { "," } else { "" };
        src.line(3, format!("{} = {}{}", name, value, comma));
    }
    Ok(())
}

fn overlay_block(src: &mut Source, overlays: &[Overlay], base: &str) -> Result<(), EmitError> {
    let count = overlays.len();
    for (index, overlay) in overlays.iter().enumerate() {
        let name = identifier(&overlay.property)?;
        let comma = if index + 1 < count { "," } else { "" };
        src.line(
            3,
            format!("{} = this.{} ?: {}.{}{}", name, name, base, name, comma),
        );
    }
    Ok(())
}

fn missing_message(property: &str) -> String {
    format!("Property {} is mandatory and must be set in builder", property)
        .replace('"', "\\\"")
        .replace('$', "\\$")
}

/// The target's constructor: its nested path without type arguments, which
/// Kotlin infers.
fn constructor_name(builder: &BuilderDescription) -> Result<String, EmitError> {
    match &builder.target.kind {
        TypeKind::Named { name, .. } => qualified(name),
        _ => Err(unsupported(&builder.target)),
    }
}

/// `<T, R : Bound>` plus a `where` clause for parameters with several bounds.
fn type_parameters(parameters: &[TypeParameter]) -> Result<(String, String), EmitError> {
    if parameters.is_empty() {
        return Ok((String::new(), String::new()));
    }
    let mut declared = Vec::new();
    let mut constraints = Vec::new();
    for parameter in parameters {
        let name = identifier(&parameter.name)?;
        match parameter.bounds.as_slice() {
            [] => declared.push(name),
            [bound] => declared.push(format!("{} : {}", name, type_name(bound)?)),
            bounds => {
                for bound in bounds {
                    constraints.push(format!("{} : {}", name, type_name(bound)?));
                }
                declared.push(name);
            }
        }
    }
    let where_clause = if constraints.is_empty() {
        String::new()
    } else {
        format!(" where {}", constraints.join(", "))
    };
    Ok((format!("<{}>", declared.join(", ")), where_clause))
}

fn type_name(ty: &TypeRef) -> Result<String, EmitError> {
    let mut out = match &ty.kind {
        TypeKind::Named { name, arguments } => {
            let mut out = qualified(name)?;
            if !arguments.is_empty() {
                let arguments = arguments
                    .iter()
                    .map(type_name)
                    .collect::<Result<Vec<_>, _>>()?;
                out.push_str(&format!("<{}>", arguments.join(", ")));
            }
            out
        }
        TypeKind::Parameter(name) => identifier(name)?,
        TypeKind::Star => "*".to_string(),
        TypeKind::Tuple(_) | TypeKind::Array { .. } => return Err(unsupported(ty)),
    };
    if ty.nullable && !matches!(ty.kind, TypeKind::Star) {
        out.push('?');
    }
    Ok(out)
}

/// Renders `kotlin/collections/List` or `Outer.Inner` as a dotted name.
fn qualified(name: &str) -> Result<String, EmitError> {
    let segments = name
        .split(['/', '.'])
        .map(identifier)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(segments.join("."))
}

/// Backtick-quotes keywords and names that are not plain identifiers.
fn identifier(name: &str) -> Result<String, EmitError> {
    if name.is_empty() || name.contains(FORBIDDEN) {
        return Err(EmitError::InvalidIdentifier {
            name: name.to_string(),
            language: TargetLanguage::Kotlin.to_string(),
        });
    }
    let plain = name
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_alphanumeric() || c == '_');
    if plain && !HARD_KEYWORDS.contains(&name) {
        Ok(name.to_string())
    } else {
        Ok(format!("`{}`", name))
    }
}

fn unsupported(ty: &TypeRef) -> EmitError {
    EmitError::UnsupportedType {
        ty: ty.to_string(),
        language: TargetLanguage::Kotlin.to_string(),
    }
}
