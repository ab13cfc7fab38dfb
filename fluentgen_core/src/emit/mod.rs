//! Rendering of builder descriptions to source files.

pub mod kotlin;
pub mod rust;

pub use kotlin::KotlinEmitter;
pub use rust::RustEmitter;

use crate::error::EmitError;
use crate::synthesize::BuilderDescription;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TargetLanguage {
    #[default]
    Rust,
    Kotlin,
}

impl TargetLanguage {
    pub fn extension(self) -> &'static str {
        match self {
            TargetLanguage::Rust => "rs",
            TargetLanguage::Kotlin => "kt",
        }
    }
}

/// One rendered, self-contained source unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmittedUnit {
    pub file_name: String,
    pub package: Vec<String>,
    pub class_name: String,
    pub contents: String,
}

pub trait CodeEmitter: Send + Sync {
    fn language(&self) -> TargetLanguage;

    /// Physical file name of the unit, `<builder>.<ext>` in the language's
    /// file naming convention.
    fn file_name(&self, builder: &BuilderDescription) -> String;

    fn emit(&self, builder: &BuilderDescription) -> Result<EmittedUnit, EmitError>;

    /// Member names the emitted builder declares for itself. A setter or
    /// holder that would take one of them is an [`EmitError::MemberClash`].
    fn reserved_names(&self, builder: &BuilderDescription) -> Vec<&'static str>;
}

/// Fails on the first generated member that is reserved or declared twice.
pub(crate) fn check_members(
    builder: &BuilderDescription,
    language: TargetLanguage,
    reserved: &[&str],
    members: impl IntoIterator<Item = String>,
) -> Result<(), EmitError> {
    let clash = |name: String, context: &str| EmitError::MemberClash {
        builder: builder.class_name.clone(),
        name,
        language: language.to_string(),
        context: context.to_string(),
    };
    let mut seen = HashSet::new();
    for member in members {
        if reserved.contains(&member.as_str()) {
            return Err(clash(member, "the builder already declares it"));
        }
        if !seen.insert(member.clone()) {
            return Err(clash(member, "two properties map to the same member"));
        }
    }
    Ok(())
}

/// Emitter for `language`; `runtime_path` is only used by Rust output.
pub fn emitter_for(language: TargetLanguage, runtime_path: &str) -> Box<dyn CodeEmitter> {
    match language {
        TargetLanguage::Rust => Box::new(RustEmitter::new(runtime_path)),
        TargetLanguage::Kotlin => Box::new(KotlinEmitter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_language_parsing_and_display() {
        assert_eq!(TargetLanguage::from_str("kotlin").unwrap(), TargetLanguage::Kotlin);
        assert_eq!(TargetLanguage::Rust.to_string(), "rust");
        assert!(TargetLanguage::from_str("java").is_err());
    }

    #[test]
    fn test_emitter_for_language() {
        assert_eq!(
            emitter_for(TargetLanguage::Kotlin, "::fluentgen").language(),
            TargetLanguage::Kotlin
        );
        assert_eq!(TargetLanguage::Kotlin.extension(), "kt");
    }
}
