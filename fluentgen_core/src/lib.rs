// fluentgen - Fluent builder synthesis for value types

// Common modules
pub mod config;
pub mod emit;
pub mod error;
pub mod extract;
pub mod log;
pub mod model;
pub mod provider;
pub mod strategy;
pub mod synthesize;
pub mod tooling;

// Re-export commonly used items for convenience
pub use config::{BuilderConfig, PartialBuilderConfig, RunConfig};
pub use error::{EmitError, ExtractionError, FluentgenError, MissingRequiredValue, Result};
pub use extract::{ClassModel, Extractor};
pub use model::{PropertyModel, TargetTypeModel, TypeKind, TypeParameter, TypeRef};
pub use strategy::{BodyKind, select};
pub use synthesize::{BuilderDescription, build_description, synthesize};
