//! Info command - displays detected types and the builders they would get.

use super::{build_config, load_config};
use crate::cli::{Cli, InfoArgs, InfoFormat};
use fluentgen_core::error::Result;
use fluentgen_core::strategy::BodyKind;
use fluentgen_core::tooling::{BuilderGenerator, PlannedBuilder};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeInfo {
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub builder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_kind: Option<BodyKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<PlannedBuilder> for TypeInfo {
    fn from(planned: PlannedBuilder) -> Self {
        let mut type_info = TypeInfo {
            type_name: planned.type_name,
            origin: planned.origin,
            builder: None,
            body_kind: None,
            file: None,
            error: None,
        };
        match planned.outcome {
            Ok((description, unit)) => {
                type_info.builder = Some(description.class_name.clone());
                type_info.body_kind = Some(description.body_kind());
                type_info.file = Some(unit.file_name);
            }
            Err(e) => type_info.error = Some(e.to_string()),
        }
        type_info
    }
}

pub fn run(cli: &Cli, args: &InfoArgs) -> Result<()> {
    let types = collect(cli)?;
    info!("Found {} target types", types.len());
    println!("{}", render(&types, args.format)?);
    Ok(())
}

pub fn collect(cli: &Cli) -> Result<Vec<TypeInfo>> {
    let config = load_config(cli)?;
    let generator = BuilderGenerator::new(build_config(cli, &config));
    let provided = generator.provider().descriptions()?;
    Ok(generator
        .plan(&provided)
        .into_iter()
        .map(TypeInfo::from)
        .collect())
}

fn render(types: &[TypeInfo], format: InfoFormat) -> Result<String> {
    match format {
        InfoFormat::Json => Ok(serde_json::to_string_pretty(types)?),
        InfoFormat::Pretty => {
            let mut out = String::from("=== Builder targets ===\n");
            for type_info in types {
                out.push('\n');
                out.push_str(&type_info.type_name);
                match (&type_info.builder, type_info.body_kind, &type_info.error) {
                    (Some(builder), Some(kind), _) => {
                        out.push_str(&format!("\n  builder: {}\n  body:    {}", builder, kind));
                    }
                    (_, _, Some(error)) => out.push_str(&format!("\n  error:   {}", error)),
                    _ => {}
                }
                out.push('\n');
            }
            Ok(out)
        }
    }
}
