//! Composes the language-neutral description of one builder.

use crate::config::{BuilderConfig, RunConfig};
use crate::error::ExtractionError;
use crate::extract::{ClassModel, Extractor, setter_name};
use crate::model::raw::RawTypeDescription;
use crate::model::{PropertyModel, TypeParameter, TypeRef};
use crate::strategy::{BodyKind, select};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Everything an emitter needs to render one builder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuilderDescription {
    /// Package (module path) of both the target and the builder.
    pub package: Vec<String>,
    pub class_name: String,
    /// The target type applied to its type parameters.
    pub target: TypeRef,
    pub type_parameters: Vec<TypeParameter>,
    pub fields: Vec<FieldSpec>,
    pub setters: Vec<SetterSpec>,
    pub build_function: BuildFunction,
    pub shared_default_instance: Option<SharedInstance>,
    pub line_separator: String,
}

impl BuilderDescription {
    /// Dotted package name, empty for the root package.
    pub fn package_name(&self) -> String {
        self.package.join(".")
    }

    /// The builder type applied to its own type parameters.
    pub fn self_type(&self) -> TypeRef {
        builder_type(&self.class_name, &self.type_parameters)
    }

    pub fn body_kind(&self) -> BodyKind {
        self.build_function.body.kind()
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// How a builder field holds its property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Holder {
    /// The property is nullable and required: the field has the property's
    /// own type and an unset field means null.
    Direct,
    /// The field wraps the property type; unset is distinct from every
    /// property value.
    Wrapped,
}

/// A private holding field, initially unset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    /// Declared type of the holder, always nullable.
    pub ty: TypeRef,
    /// Type of the property the field holds.
    pub property_type: TypeRef,
    pub holder: Holder,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SetterSpec {
    pub function_name: String,
    pub param_name: String,
    /// Matches the property type, nullability included.
    pub param_type: TypeRef,
    pub return_type: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildFunction {
    pub return_type: TypeRef,
    pub body: BuildBody,
}

/// A constructor argument taken from a builder field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Argument {
    pub property: String,
    /// Nullable properties pass the field value through; the others fail
    /// with `MissingRequiredValue` when unset.
    pub nullable: bool,
}

impl Argument {
    pub fn is_checked(&self) -> bool {
        !self.nullable
    }
}

/// An optional property substituted over a base instance when set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Overlay {
    pub property: String,
    /// Default for targets whose constructor cannot compute it.
    pub default_expr: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildBody {
    RequiredOnly {
        arguments: Vec<Argument>,
    },
    DefaultInstanceOverlay {
        overlays: Vec<Overlay>,
    },
    RequiredThenOverlay {
        arguments: Vec<Argument>,
        overlays: Vec<Overlay>,
    },
}

impl BuildBody {
    pub fn kind(&self) -> BodyKind {
        match self {
            BuildBody::RequiredOnly { .. } => BodyKind::RequiredOnly,
            BuildBody::DefaultInstanceOverlay { .. } => BodyKind::DefaultInstanceOverlay,
            BuildBody::RequiredThenOverlay { .. } => BodyKind::RequiredThenOverlay,
        }
    }

    pub fn arguments(&self) -> &[Argument] {
        match self {
            BuildBody::RequiredOnly { arguments }
            | BuildBody::RequiredThenOverlay { arguments, .. } => arguments,
            BuildBody::DefaultInstanceOverlay { .. } => &[],
        }
    }

    pub fn overlays(&self) -> &[Overlay] {
        match self {
            BuildBody::DefaultInstanceOverlay { overlays }
            | BuildBody::RequiredThenOverlay { overlays, .. } => overlays,
            BuildBody::RequiredOnly { .. } => &[],
        }
    }
}

/// The builder's lazily created, never mutated default instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SharedInstance {
    pub ty: TypeRef,
}

pub fn synthesize(
    model: &ClassModel,
    config: &BuilderConfig,
    run: &RunConfig,
    kind: BodyKind,
) -> BuilderDescription {
    let target = &model.target;
    debug!(
        type_name = %target.qualified_name,
        builder = %model.builder_name,
        kind = %kind,
        "Synthesizing builder"
    );

    let type_parameters = target.type_parameters.clone();
    let builder_self = builder_type(&model.builder_name, &type_parameters);
    let target_type = target.self_type();

    let fields = target
        .properties
        .iter()
        .map(field)
        .collect();

    let setters = target
        .properties
        .iter()
        .map(|property| {
            let function_name = setter_name(&config.setter_prefix, &property.name);
            trace!(property = %property.name, setter = %function_name, "Adding setter");
            SetterSpec {
                function_name,
                param_name: property.name.clone(),
                param_type: property.ty.clone(),
                return_type: builder_self.clone(),
            }
        })
        .collect();

    let body = match kind {
        BodyKind::RequiredOnly => BuildBody::RequiredOnly {
            arguments: arguments(&model.required),
        },
        BodyKind::DefaultInstanceOverlay => BuildBody::DefaultInstanceOverlay {
            overlays: overlays(&model.optional),
        },
        BodyKind::RequiredThenOverlay => BuildBody::RequiredThenOverlay {
            arguments: arguments(&model.required),
            overlays: overlays(&model.optional),
        },
    };

    let shared_default_instance = kind.shares_default_instance().then(|| SharedInstance {
        ty: target_type.clone(),
    });

    BuilderDescription {
        package: target.package.clone(),
        class_name: model.builder_name.clone(),
        target: target_type.clone(),
        type_parameters,
        fields,
        setters,
        build_function: BuildFunction {
            return_type: target_type,
            body,
        },
        shared_default_instance,
        line_separator: run.line_separator.clone(),
    }
}

fn builder_type(class_name: &str, type_parameters: &[TypeParameter]) -> TypeRef {
    TypeRef::generic(
        class_name,
        type_parameters
            .iter()
            .map(TypeParameter::as_type_ref)
            .collect(),
    )
}

fn field(property: &PropertyModel) -> FieldSpec {
    let holder = if property.ty.nullable && !property.has_default_value {
        Holder::Direct
    } else {
        Holder::Wrapped
    };
    FieldSpec {
        name: property.name.clone(),
        ty: property.ty.clone().into_nullable(),
        property_type: property.ty.clone(),
        holder,
    }
}

fn arguments(required: &[PropertyModel]) -> Vec<Argument> {
    required
        .iter()
        .map(|property| Argument {
            property: property.name.clone(),
            nullable: property.ty.nullable,
        })
        .collect()
}

fn overlays(optional: &[PropertyModel]) -> Vec<Overlay> {
    optional
        .iter()
        .map(|property| Overlay {
            property: property.name.clone(),
            default_expr: property.default_expr.clone(),
        })
        .collect()
}

/// Runs extraction, strategy selection and synthesis for one raw type.
pub fn build_description(
    description: &RawTypeDescription,
    config: &BuilderConfig,
    run: &RunConfig,
) -> Result<BuilderDescription, ExtractionError> {
    let model = Extractor::new(run).extract(description, config)?;
    let kind = select(&model.required, &model.optional, config.optimize_copy);
    Ok(synthesize(&model, config, run, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::raw::{RawParameter, RawType};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn describe(description: &RawTypeDescription, config: &BuilderConfig) -> BuilderDescription {
        build_description(description, config, &RunConfig::default()).unwrap()
    }

    fn point() -> RawTypeDescription {
        RawTypeDescription::value_type(
            "crate::shapes::Point",
            vec![
                RawParameter::required("x", RawType::named("i32")),
                RawParameter::required("y", RawType::named("i32")),
            ],
        )
    }

    fn config_type() -> RawTypeDescription {
        RawTypeDescription::value_type(
            "crate::Config",
            vec![
                RawParameter::optional("a", RawType::named("i32")),
                RawParameter::optional("b", RawType::named("String")),
            ],
        )
    }

    #[test]
    fn test_point_required_only() {
        let builder = describe(&point(), &BuilderConfig::default());
        assert_eq!(builder.class_name, "PointBuilder");
        assert_eq!(builder.package_name(), "crate.shapes");
        assert_eq!(builder.target, TypeRef::named("Point"));
        assert_eq!(
            builder.build_function.body,
            BuildBody::RequiredOnly {
                arguments: vec![
                    Argument {
                        property: "x".into(),
                        nullable: false
                    },
                    Argument {
                        property: "y".into(),
                        nullable: false
                    },
                ]
            }
        );
        assert!(builder.shared_default_instance.is_none());

        let setters = builder
            .setters
            .iter()
            .map(|s| (s.function_name.as_str(), s.param_type.to_string()))
            .collect::<Vec<_>>();
        assert_eq!(
            setters,
            vec![("x", "i32".to_string()), ("y", "i32".to_string())]
        );
        assert!(
            builder
                .setters
                .iter()
                .all(|s| s.return_type == TypeRef::named("PointBuilder"))
        );
        assert!(builder.fields.iter().all(|f| f.ty.nullable));
    }

    #[test]
    fn test_config_shares_default_instance() {
        let config = BuilderConfig {
            optimize_copy: true,
            ..Default::default()
        };
        let builder = describe(&config_type(), &config);
        assert_eq!(builder.body_kind(), BodyKind::DefaultInstanceOverlay);
        assert_eq!(
            builder.shared_default_instance,
            Some(SharedInstance {
                ty: TypeRef::named("Config")
            })
        );
        let overlaid = builder
            .build_function
            .body
            .overlays()
            .iter()
            .map(|o| o.property.as_str())
            .collect::<Vec<_>>();
        assert_eq!(overlaid, vec!["a", "b"]);
        assert!(builder.build_function.body.arguments().is_empty());
    }

    #[test]
    fn test_config_without_optimize_copy() {
        let builder = describe(&config_type(), &BuilderConfig::default());
        assert_eq!(builder.body_kind(), BodyKind::RequiredThenOverlay);
        assert!(builder.shared_default_instance.is_none());
    }

    #[test]
    fn test_mixed_required_then_overlay() {
        let description = RawTypeDescription::value_type(
            "crate::Mixed",
            vec![
                RawParameter::required("id", RawType::named("i32")),
                RawParameter::optional("name", RawType::named("String")),
                RawParameter::required("note", RawType::named("String").nullable()),
            ],
        );
        let builder = describe(
            &description,
            &BuilderConfig {
                optimize_copy: true,
                ..Default::default()
            },
        );
        match &builder.build_function.body {
            BuildBody::RequiredThenOverlay {
                arguments,
                overlays,
            } => {
                assert_eq!(arguments.len(), 2);
                assert!(arguments[0].is_checked());
                assert!(!arguments[1].is_checked());
                assert_eq!(overlays[0].property, "name");
            }
            other => panic!("unexpected body {:?}", other),
        }
        assert!(builder.shared_default_instance.is_none());
        assert_eq!(builder.field("note").unwrap().holder, Holder::Direct);
        assert_eq!(builder.field("name").unwrap().holder, Holder::Wrapped);
        assert_eq!(builder.field("id").unwrap().holder, Holder::Wrapped);
    }

    #[test]
    fn test_nullable_optional_is_wrapped() {
        let description = RawTypeDescription::value_type(
            "crate::Opt",
            vec![RawParameter::optional(
                "label",
                RawType::named("String").nullable(),
            )],
        );
        let builder = describe(&description, &BuilderConfig::default());
        let field = builder.field("label").unwrap();
        assert_eq!(field.holder, Holder::Wrapped);
        assert!(field.property_type.nullable);
        assert_eq!(builder.setters[0].param_type.to_string(), "String?");
    }

    #[test]
    fn test_pair_is_equally_generic() {
        let description = RawTypeDescription::value_type(
            "com/example/Pair",
            vec![
                RawParameter::required("first", RawType::named("T")),
                RawParameter::required("second", RawType::named("R")),
            ],
        )
        .with_type_parameter("T", vec![])
        .with_type_parameter("R", vec![]);
        let builder = describe(&description, &BuilderConfig::default());

        assert_eq!(
            builder.type_parameters,
            vec![TypeParameter::unbounded("T"), TypeParameter::unbounded("R")]
        );
        assert_eq!(builder.build_function.return_type.to_string(), "Pair<T, R>");
        assert_eq!(builder.setters[0].param_type, TypeRef::parameter("T"));
        assert_eq!(builder.setters[1].param_type, TypeRef::parameter("R"));
        assert_eq!(
            builder.setters[0].return_type.to_string(),
            "PairBuilder<T, R>"
        );
    }

    #[test]
    fn test_bounds_copied_verbatim() {
        let description = RawTypeDescription::value_type(
            "com/example/Ranked",
            vec![RawParameter::required("item", RawType::named("T"))],
        )
        .with_type_parameter(
            "T",
            vec![RawType::named("Comparable"), RawType::named("Serializable")],
        );
        let builder = describe(&description, &BuilderConfig::default());
        assert_eq!(
            builder.type_parameters[0].bounds,
            vec![TypeRef::named("Comparable"), TypeRef::named("Serializable")]
        );
    }

    #[test]
    fn test_custom_naming_and_prefix() {
        let config = BuilderConfig {
            custom_class_name: Some("Thing".into()),
            setter_prefix: "set".into(),
            optimize_copy: false,
        };
        let run = RunConfig {
            builder_suffix: "Maker".into(),
            line_separator: "\r\n".into(),
        };
        let model = Extractor::new(&run).extract(&point(), &config).unwrap();
        let builder = synthesize(&model, &config, &run, BodyKind::RequiredOnly);
        assert_eq!(builder.class_name, "Thing");
        assert_eq!(builder.setters[0].function_name, "setX");
        assert_eq!(builder.setters[0].param_name, "x");
        assert_eq!(builder.line_separator, "\r\n");
    }

    #[test]
    fn test_description_serializes() {
        let builder = describe(&point(), &BuilderConfig::default());
        let json = serde_json::to_string(&builder).unwrap();
        let back: BuilderDescription = serde_json::from_str(&json).unwrap();
        assert_eq!(back, builder);
    }

    proptest! {
        #[test]
        fn prop_synthesis_is_idempotent(
            defaults in proptest::collection::vec(any::<bool>(), 1..6),
            nullable in proptest::collection::vec(any::<bool>(), 6),
            optimize_copy: bool,
            prefix in prop_oneof![
                Just(String::new()),
                Just("with".to_string()),
                Just("set".to_string()),
            ],
        ) {
            let parameters = defaults
                .iter()
                .enumerate()
                .map(|(i, &has_default)| {
                    let mut ty = RawType::named("i64");
                    ty.nullable = nullable[i];
                    let name = format!("field{}", i);
                    if has_default {
                        RawParameter::optional(name, ty)
                    } else {
                        RawParameter::required(name, ty)
                    }
                })
                .collect();
            let description = RawTypeDescription::value_type("crate::Gen", parameters);
            let config = BuilderConfig {
                custom_class_name: None,
                setter_prefix: prefix,
                optimize_copy,
            };
            let first = describe(&description, &config);
            let second = describe(&description, &config);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.setters.len(), defaults.len());
            prop_assert_eq!(first.fields.len(), defaults.len());
        }
    }
}
