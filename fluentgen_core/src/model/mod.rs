//! The extracted shape of a target value type.
//!
//! Everything in here is plain data: built once per target type by the
//! [`Extractor`](crate::extract::Extractor), immutable afterwards and
//! serializable so that external reflectors can hand it over as JSON/TOML.

pub mod raw;

use core::fmt;
use serde::{Deserialize, Serialize};

/// Structural reference to a type, possibly parameterized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    pub kind: TypeKind,
    #[serde(default)]
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// A concrete named type, `name` is the path as written by the source.
    Named {
        name: String,
        #[serde(default)]
        arguments: Vec<TypeRef>,
    },
    /// A reference to one of the owning type's type parameters.
    Parameter(String),
    Tuple(Vec<TypeRef>),
    Array {
        element: Box<TypeRef>,
        length: String,
    },
    /// Wildcard / star projection.
    Star,
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            kind: TypeKind::Named {
                name: name.into(),
                arguments: Vec::new(),
            },
            nullable: false,
        }
    }

    pub fn generic(name: impl Into<String>, arguments: Vec<TypeRef>) -> Self {
        Self {
            kind: TypeKind::Named {
                name: name.into(),
                arguments,
            },
            nullable: false,
        }
    }

    pub fn parameter(name: impl Into<String>) -> Self {
        Self {
            kind: TypeKind::Parameter(name.into()),
            nullable: false,
        }
    }

    pub fn star() -> Self {
        Self {
            kind: TypeKind::Star,
            nullable: false,
        }
    }

    /// Same type with the nullable flag set.
    pub fn into_nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Same type with the nullable flag cleared.
    pub fn non_null(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            nullable: false,
        }
    }

    /// Returns true when the type mentions any type parameter.
    pub fn is_generic(&self) -> bool {
        match &self.kind {
            TypeKind::Parameter(_) => true,
            TypeKind::Named { arguments, .. } => arguments.iter().any(TypeRef::is_generic),
            TypeKind::Tuple(elements) => elements.iter().any(TypeRef::is_generic),
            TypeKind::Array { element, .. } => element.is_generic(),
            TypeKind::Star => false,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeKind::Named { name, arguments } => {
                write!(f, "{}", name)?;
                if !arguments.is_empty() {
                    write!(f, "<{}>", join(arguments))?;
                }
            }
            TypeKind::Parameter(name) => write!(f, "{}", name)?,
            TypeKind::Tuple(elements) => write!(f, "({})", join(elements))?,
            TypeKind::Array { element, length } => write!(f, "[{}; {}]", element, length)?,
            TypeKind::Star => write!(f, "*")?,
        }
        if self.nullable {
            write!(f, "?")?;
        }
        Ok(())
    }
}

fn join(types: &[TypeRef]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A generic type parameter with zero or more upper bounds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeParameter {
    pub name: String,
    #[serde(default)]
    pub bounds: Vec<TypeRef>,
}

impl TypeParameter {
    pub fn unbounded(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    /// The parameter as a type reference, for use in argument lists.
    pub fn as_type_ref(&self) -> TypeRef {
        TypeRef::parameter(&self.name)
    }
}

/// One primary-constructor parameter of the target type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyModel {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub has_default_value: bool,
    /// Source expression for the default, for targets whose constructor
    /// does not compute defaults itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_expr: Option<String>,
}

impl PropertyModel {
    pub fn required(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            has_default_value: false,
            default_expr: None,
        }
    }

    pub fn optional(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            has_default_value: true,
            default_expr: None,
        }
    }

    pub fn with_default_expr(mut self, expr: impl Into<String>) -> Self {
        self.has_default_value = true;
        self.default_expr = Some(expr.into());
        self
    }
}

/// The validated shape of a target value type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetTypeModel {
    /// The qualified name exactly as the provider reported it.
    pub qualified_name: String,
    /// Declaring package (or module path) segments.
    pub package: Vec<String>,
    /// Names of enclosing types for nested declarations, outermost first.
    pub enclosing: Vec<String>,
    pub simple_name: String,
    pub type_parameters: Vec<TypeParameter>,
    /// Constructor parameters in declaration order.
    pub properties: Vec<PropertyModel>,
}

impl TargetTypeModel {
    /// The target type applied to its own type parameters, e.g. `Pair<T, R>`.
    pub fn self_type(&self) -> TypeRef {
        let mut path = self.enclosing.clone();
        path.push(self.simple_name.clone());
        TypeRef::generic(
            path.join("."),
            self.type_parameters
                .iter()
                .map(TypeParameter::as_type_ref)
                .collect(),
        )
    }

    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }
}

/// A qualified name split into package, enclosing types and simple name.
///
/// Package segments are separated by `::` or `/`, nested types by `.`:
/// `crate::shapes::Point`, `com/example/Parent.Inner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    pub package: Vec<String>,
    pub enclosing: Vec<String>,
    pub simple_name: String,
}

impl QualifiedName {
    /// Returns `None` when the name has no simple-name part.
    pub fn parse(qualified: &str) -> Option<Self> {
        let qualified = qualified.trim();
        let (package, path) = if let Some(index) = qualified.rfind("::") {
            (&qualified[..index], &qualified[index + 2..])
        } else if let Some(index) = qualified.rfind('/') {
            (&qualified[..index], &qualified[index + 1..])
        } else {
            ("", qualified)
        };

        let package = package
            .split("::")
            .flat_map(|segment| segment.split('/'))
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();

        let mut nested = path
            .split('.')
            .map(str::trim)
            .map(str::to_string)
            .collect::<Vec<_>>();
        if nested.iter().any(String::is_empty) {
            return None;
        }
        let simple_name = nested.pop()?;

        Some(Self {
            package,
            enclosing: nested,
            simple_name,
        })
    }
}
