//! Unvalidated type descriptions as handed over by type-model providers.

use core::fmt;
use serde::{Deserialize, Serialize};

/// What kind of declaration the provider found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    /// A value type with named properties (Rust struct, Kotlin data class).
    #[default]
    ValueType,
    /// A class that is not a value type (plain Kotlin class).
    Class,
    TupleStruct,
    Enum,
    Union,
    Interface,
}

impl DeclarationKind {
    pub fn is_value_type(self) -> bool {
        matches!(self, DeclarationKind::ValueType)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawType {
    pub kind: RawTypeKind,
    #[serde(default)]
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawTypeKind {
    Named {
        name: String,
        #[serde(default)]
        arguments: Vec<RawType>,
    },
    Tuple(Vec<RawType>),
    Array {
        element: Box<RawType>,
        length: String,
    },
    Star,
    /// Something the provider could not model, kept as source text.
    Opaque(String),
}

impl RawType {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            kind: RawTypeKind::Named {
                name: name.into(),
                arguments: Vec::new(),
            },
            nullable: false,
        }
    }

    pub fn generic(name: impl Into<String>, arguments: Vec<RawType>) -> Self {
        Self {
            kind: RawTypeKind::Named {
                name: name.into(),
                arguments,
            },
            nullable: false,
        }
    }

    pub fn opaque(text: impl Into<String>) -> Self {
        Self {
            kind: RawTypeKind::Opaque(text.into()),
            nullable: false,
        }
    }

    pub fn star() -> Self {
        Self {
            kind: RawTypeKind::Star,
            nullable: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

impl fmt::Display for RawType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            RawTypeKind::Named { name, arguments } => {
                write!(f, "{}", name)?;
                if !arguments.is_empty() {
                    let args = arguments
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>();
                    write!(f, "<{}>", args.join(", "))?;
                }
            }
            RawTypeKind::Tuple(elements) => {
                let elems = elements.iter().map(ToString::to_string).collect::<Vec<_>>();
                write!(f, "({})", elems.join(", "))?;
            }
            RawTypeKind::Array { element, length } => write!(f, "[{}; {}]", element, length)?,
            RawTypeKind::Star => write!(f, "*")?,
            RawTypeKind::Opaque(text) => write!(f, "{}", text)?,
        }
        if self.nullable {
            write!(f, "?")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawTypeParameter {
    pub name: String,
    #[serde(default)]
    pub bounds: Vec<RawType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: RawType,
    #[serde(default)]
    pub has_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_expr: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawConstructor {
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub parameters: Vec<RawParameter>,
}

/// Structural description of a candidate target type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawTypeDescription {
    pub qualified_name: String,
    #[serde(default)]
    pub kind: DeclarationKind,
    #[serde(default)]
    pub type_parameters: Vec<RawTypeParameter>,
    #[serde(default)]
    pub constructors: Vec<RawConstructor>,
}

impl RawTypeDescription {
    /// Value type with a single primary constructor.
    pub fn value_type(qualified_name: impl Into<String>, parameters: Vec<RawParameter>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            kind: DeclarationKind::ValueType,
            type_parameters: Vec::new(),
            constructors: vec![RawConstructor {
                primary: true,
                parameters,
            }],
        }
    }

    pub fn with_type_parameter(mut self, name: impl Into<String>, bounds: Vec<RawType>) -> Self {
        self.type_parameters.push(RawTypeParameter {
            name: name.into(),
            bounds,
        });
        self
    }
}

impl RawParameter {
    pub fn required(name: impl Into<String>, ty: RawType) -> Self {
        Self {
            name: name.into(),
            ty,
            has_default: false,
            default_expr: None,
        }
    }

    pub fn optional(name: impl Into<String>, ty: RawType) -> Self {
        Self {
            name: name.into(),
            ty,
            has_default: true,
            default_expr: None,
        }
    }
}
