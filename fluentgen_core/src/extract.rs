//! Validates a raw type description and turns it into a [`ClassModel`].

use crate::config::{BuilderConfig, RunConfig};
use crate::error::ExtractionError;
use crate::model::raw::{RawParameter, RawType, RawTypeDescription, RawTypeKind};
use crate::model::{PropertyModel, QualifiedName, TargetTypeModel, TypeKind, TypeParameter, TypeRef};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Name of the terminal builder operation; no setter may take it.
pub const BUILD_FUNCTION_NAME: &str = "build";

/// A target type plus its builder name and property partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassModel {
    pub target: TargetTypeModel,
    /// Simple name of the builder type, unique within the target package.
    pub builder_name: String,
    /// Properties without a default value, declaration order.
    pub required: Vec<PropertyModel>,
    /// Properties with a default value, declaration order.
    pub optional: Vec<PropertyModel>,
}

impl ClassModel {
    pub fn qualified_name(&self) -> &str {
        &self.target.qualified_name
    }
}

/// Uppercases the first character, leaving the rest untouched.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `prefix + Capitalized` when a prefix is configured, the bare property
/// name otherwise.
pub fn setter_name(prefix: &str, property: &str) -> String {
    if prefix.is_empty() {
        property.to_string()
    } else {
        format!("{}{}", prefix, capitalize(property))
    }
}

pub struct Extractor<'a> {
    run: &'a RunConfig,
}

impl<'a> Extractor<'a> {
    pub fn new(run: &'a RunConfig) -> Self {
        Self { run }
    }

    pub fn extract(
        &self,
        description: &RawTypeDescription,
        config: &BuilderConfig,
    ) -> Result<ClassModel, ExtractionError> {
        let type_name = description.qualified_name.as_str();
        debug!(type_name, "Extracting class model");

        if !description.kind.is_value_type() {
            return Err(ExtractionError::not_buildable(
                type_name,
                format!("{:?} declarations are not value types", description.kind),
            ));
        }

        let name = QualifiedName::parse(type_name).ok_or_else(|| {
            ExtractionError::not_buildable(type_name, "qualified name has no simple name")
        })?;

        let parameters = primary_parameters(description)?;

        let mut declared = HashSet::new();
        for parameter in &description.type_parameters {
            if !declared.insert(parameter.name.as_str()) {
                return Err(ExtractionError::duplicate_identifier(
                    type_name,
                    &parameter.name,
                    "type parameter declared twice",
                ));
            }
        }

        let type_parameters = description
            .type_parameters
            .iter()
            .map(|parameter| -> Result<TypeParameter, ExtractionError> {
                let bounds = parameter
                    .bounds
                    .iter()
                    .map(|bound| {
                        resolve_bound(bound, &declared).ok_or_else(|| {
                            ExtractionError::unresolvable_bound(
                                type_name,
                                &parameter.name,
                                bound.to_string(),
                            )
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(TypeParameter {
                    name: parameter.name.clone(),
                    bounds,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let properties = parameters
            .iter()
            .map(|parameter| property(type_name, parameter, &declared))
            .collect::<Result<Vec<_>, _>>()?;

        let target = TargetTypeModel {
            qualified_name: type_name.to_string(),
            package: name.package,
            enclosing: name.enclosing,
            simple_name: name.simple_name,
            type_parameters,
            properties,
        };
        let builder_name = config.builder_class_name(&target, self.run);
        check_identifiers(&target, &builder_name, config)?;

        let (optional, required): (Vec<_>, Vec<_>) = target
            .properties
            .iter()
            .cloned()
            .partition(|property| property.has_default_value);

        debug!(
            type_name,
            builder = %builder_name,
            required = required.len(),
            optional = optional.len(),
            "Class model extracted"
        );

        Ok(ClassModel {
            target,
            builder_name,
            required,
            optional,
        })
    }
}

fn primary_parameters(
    description: &RawTypeDescription,
) -> Result<&[RawParameter], ExtractionError> {
    let type_name = &description.qualified_name;
    let mut primaries = description.constructors.iter().filter(|c| c.primary);
    let primary = match (primaries.next(), primaries.next()) {
        (Some(primary), None) => primary,
        (None, _) => {
            return Err(ExtractionError::not_buildable(
                type_name,
                "no primary constructor",
            ));
        }
        (Some(_), Some(_)) => {
            return Err(ExtractionError::not_buildable(
                type_name,
                "more than one primary constructor",
            ));
        }
    };
    if primary.parameters.is_empty() {
        return Err(ExtractionError::not_buildable(
            type_name,
            "primary constructor has no parameters",
        ));
    }
    Ok(&primary.parameters)
}

fn property(
    type_name: &str,
    parameter: &RawParameter,
    declared: &HashSet<&str>,
) -> Result<PropertyModel, ExtractionError> {
    trace!(type_name, property = %parameter.name, ty = %parameter.ty, "Resolving property");
    let ty = resolve_type(&parameter.ty, declared).ok_or_else(|| {
        ExtractionError::not_buildable(
            type_name,
            format!(
                "type `{}` of property {} cannot be modelled",
                parameter.ty, parameter.name
            ),
        )
    })?;
    Ok(PropertyModel {
        name: parameter.name.clone(),
        ty,
        has_default_value: parameter.has_default || parameter.default_expr.is_some(),
        default_expr: parameter.default_expr.clone(),
    })
}

/// Bounds must name a type; star projections carry no upper bound.
fn resolve_bound(bound: &RawType, declared: &HashSet<&str>) -> Option<TypeRef> {
    match bound.kind {
        RawTypeKind::Star => None,
        _ => resolve_type(bound, declared),
    }
}

fn resolve_type(raw: &RawType, declared: &HashSet<&str>) -> Option<TypeRef> {
    let kind = match &raw.kind {
        RawTypeKind::Named { name, arguments } => {
            if arguments.is_empty() && declared.contains(name.as_str()) {
                TypeKind::Parameter(name.clone())
            } else {
                TypeKind::Named {
                    name: name.clone(),
                    arguments: arguments
                        .iter()
                        .map(|argument| resolve_type(argument, declared))
                        .collect::<Option<Vec<_>>>()?,
                }
            }
        }
        RawTypeKind::Tuple(elements) => TypeKind::Tuple(
            elements
                .iter()
                .map(|element| resolve_type(element, declared))
                .collect::<Option<Vec<_>>>()?,
        ),
        RawTypeKind::Array { element, length } => TypeKind::Array {
            element: Box::new(resolve_type(element, declared)?),
            length: length.clone(),
        },
        RawTypeKind::Star => TypeKind::Star,
        RawTypeKind::Opaque(_) => return None,
    };
    Some(TypeRef {
        kind,
        nullable: raw.nullable,
    })
}

fn check_identifiers(
    target: &TargetTypeModel,
    builder_name: &str,
    config: &BuilderConfig,
) -> Result<(), ExtractionError> {
    let type_name = target.qualified_name.as_str();

    if builder_name == target.simple_name {
        return Err(ExtractionError::duplicate_identifier(
            type_name,
            builder_name,
            "builder class name equals the target type name",
        ));
    }

    let mut properties = HashSet::new();
    let mut setters = HashSet::new();
    for property in &target.properties {
        if !properties.insert(property.name.as_str()) {
            return Err(ExtractionError::duplicate_identifier(
                type_name,
                &property.name,
                "property declared twice",
            ));
        }
        let setter = setter_name(&config.setter_prefix, &property.name);
        if setter == BUILD_FUNCTION_NAME {
            return Err(ExtractionError::duplicate_identifier(
                type_name,
                setter,
                "setter clashes with the build function",
            ));
        }
        if !setters.insert(setter.clone()) {
            return Err(ExtractionError::duplicate_identifier(
                type_name,
                setter,
                "two properties produce the same setter name",
            ));
        }
    }
    Ok(())
}
