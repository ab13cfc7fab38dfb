//! Batch builder generation for build-time and CLI usage.

use super::BuildConfig;
use crate::config::SourceKind;
use crate::emit::{CodeEmitter, EmittedUnit, emitter_for};
use crate::error::{FluentgenError, Result};
use crate::provider::{ModelFileProvider, ProvidedType, RustSourceProvider, TypeModelProvider};
use crate::synthesize::{BuilderDescription, build_description};
use core::fmt;
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, error, info};

/// Information about a generated file.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    /// Where the file was (or, on a dry run, would have been) written.
    pub path: PathBuf,
    pub bytes_written: usize,
    pub builder: String,
    pub type_name: String,
}

/// A target type no builder could be generated for.
#[derive(Debug)]
pub struct GenerationFailure {
    pub type_name: String,
    pub origin: Option<PathBuf>,
    pub error: FluentgenError,
}

/// Report of the generation process.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Generated files in input order.
    pub files: Vec<GeneratedFile>,
    pub failures: Vec<GenerationFailure>,
    pub types_processed: usize,
}

impl GenerationReport {
    fn new() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed {} types: {} written, {} failed",
            self.types_processed,
            self.files.len(),
            self.failures.len()
        )?;
        for file in &self.files {
            write!(f, "\n  {} -> {}", file.type_name, file.path.display())?;
        }
        for failure in &self.failures {
            write!(f, "\n  ! {}: {}", failure.type_name, failure.error)?;
        }
        Ok(())
    }
}

/// One type taken through the pipeline, before anything is written.
#[derive(Debug)]
pub struct PlannedBuilder {
    pub type_name: String,
    pub origin: Option<PathBuf>,
    pub outcome: Result<(BuilderDescription, EmittedUnit)>,
}

/// Generator for fluent builders.
pub struct BuilderGenerator {
    config: BuildConfig,
}

impl BuilderGenerator {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// The provider selected by the configured source kind.
    pub fn provider(&self) -> Box<dyn TypeModelProvider> {
        match self.config.source {
            SourceKind::Rust => Box::new(RustSourceProvider::new(
                &self.config.scan_path,
                &self.config.marker_aliases,
            )),
            SourceKind::Model => Box::new(ModelFileProvider::new(self.config.model_files.clone())),
        }
    }

    /// Generates builders for every type the configured provider finds.
    pub fn generate_all(&self) -> Result<GenerationReport> {
        let provider = self.provider();
        info!(
            "Starting builder generation from the {} provider",
            provider.name()
        );
        self.generate_from(provider.as_ref())
    }

    /// Generates builders for every type `provider` finds.
    ///
    /// Per-type failures are collected in the report; only provider and
    /// file system errors abort the run.
    pub fn generate_from(&self, provider: &dyn TypeModelProvider) -> Result<GenerationReport> {
        let types = provider.descriptions()?;
        let mut report = GenerationReport::new();
        report.types_processed = types.len();

        if !self.config.dry_run {
            fs::create_dir_all(&self.config.output_path)?;
        }

        for planned in self.plan(&types) {
            match planned.outcome {
                Ok((_, unit)) => {
                    let file = self.write_unit(&planned.type_name, &unit)?;
                    report.files.push(file);
                }
                Err(err) => {
                    error!(type_name = %planned.type_name, "Builder generation failed: {}", err);
                    report.failures.push(GenerationFailure {
                        type_name: planned.type_name,
                        origin: planned.origin,
                        error: err,
                    });
                }
            }
        }

        crate::fluentgen_log!(report.to_string(), "generation.log", true);
        info!(
            "Generation complete. {} builders written, {} types failed",
            report.files.len(),
            report.failures.len()
        );
        Ok(report)
    }

    /// Runs the pipeline for every type in parallel, keeping input order.
    pub fn plan(&self, types: &[ProvidedType]) -> Vec<PlannedBuilder> {
        let emitter = emitter_for(self.config.language, &self.config.runtime_path);
        types
            .par_iter()
            .map(|provided| PlannedBuilder {
                type_name: provided.qualified_name().to_string(),
                origin: provided.origin.clone(),
                outcome: self.render(provided, emitter.as_ref()),
            })
            .collect()
    }

    fn render(
        &self,
        provided: &ProvidedType,
        emitter: &dyn CodeEmitter,
    ) -> Result<(BuilderDescription, EmittedUnit)> {
        let type_name = provided.qualified_name();
        let config = provided
            .config
            .clone()
            .merge(self.config.type_overrides(type_name), type_name)?
            .resolve();
        let description = build_description(&provided.description, &config, &self.config.run)?;
        let unit = emitter.emit(&description)?;
        debug!(type_name, builder = %unit.class_name, "Rendered builder");
        Ok((description, unit))
    }

    /// Output location: one directory per package segment, leaving out a
    /// leading `crate`.
    fn unit_path(&self, unit: &EmittedUnit) -> PathBuf {
        let mut path = self.config.output_path.clone();
        let package = match unit.package.split_first() {
            Some((first, rest)) if first == "crate" => rest,
            _ => &unit.package[..],
        };
        path.extend(package);
        path.join(&unit.file_name)
    }

    fn write_unit(&self, type_name: &str, unit: &EmittedUnit) -> Result<GeneratedFile> {
        let path = self.unit_path(unit);
        if self.config.dry_run {
            debug!("Dry run, not writing {:?}", path);
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &unit.contents)?;
            info!("{} written to {:?}", unit.class_name, path);
        }
        Ok(GeneratedFile {
            path,
            bytes_written: unit.contents.len(),
            builder: unit.class_name.clone(),
            type_name: type_name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PartialBuilderConfig;
    use crate::emit::TargetLanguage;
    use crate::error::ExtractionError;
    use crate::model::raw::{DeclarationKind, RawParameter, RawType, RawTypeDescription};
    use crate::provider::MockTypeModelProvider;
    use crate::strategy::BodyKind;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn point() -> ProvidedType {
        ProvidedType::new(RawTypeDescription::value_type(
            "crate::shapes::Point",
            vec![
                RawParameter::required("x", RawType::named("i32")),
                RawParameter::required("y", RawType::named("i32")),
            ],
        ))
    }

    fn shape() -> ProvidedType {
        let mut description = RawTypeDescription::value_type("crate::Shape", Vec::new());
        description.kind = DeclarationKind::Enum;
        ProvidedType::new(description)
    }

    fn settings() -> ProvidedType {
        let mut provided = ProvidedType::new(RawTypeDescription::value_type(
            "crate::Settings",
            vec![RawParameter::optional("retries", RawType::named("u8"))],
        ));
        provided.config.optimize_copy = Some(true);
        provided
    }

    fn mock_provider(types: Vec<ProvidedType>) -> MockTypeModelProvider {
        let mut provider = MockTypeModelProvider::new();
        provider
            .expect_descriptions()
            .times(1)
            .returning(move || Ok(types.clone()));
        provider
    }

    #[test]
    fn test_dry_run_report() {
        let config = BuildConfig::builder()
            .output_path("out")
            .dry_run(true)
            .build();
        let provider = mock_provider(vec![point(), shape()]);

        let report = BuilderGenerator::new(config)
            .generate_from(&provider)
            .unwrap();

        assert!(!report.is_success());
        insta::assert_snapshot!(report.to_string(), @r"
        processed 2 types: 1 written, 1 failed
          crate::shapes::Point -> out/shapes/point_builder.rs
          ! crate::Shape: Cannot generate a builder for crate::Shape: Enum declarations are not value types
        ");
    }

    #[test]
    fn test_writes_files_per_package() {
        let temp_dir = TempDir::new().unwrap();
        let config = BuildConfig::builder()
            .output_path(temp_dir.path())
            .build();
        let provider = mock_provider(vec![point(), settings()]);

        let report = BuilderGenerator::new(config)
            .generate_from(&provider)
            .unwrap();

        assert!(report.is_success());
        let point_path = temp_dir.path().join("shapes").join("point_builder.rs");
        let settings_path = temp_dir.path().join("settings_builder.rs");
        assert_eq!(report.files[0].path, point_path);
        assert_eq!(report.files[1].path, settings_path);

        let contents = fs::read_to_string(&point_path).unwrap();
        assert_eq!(report.files[0].bytes_written, contents.len());
        assert!(contents.starts_with("// Code auto-generated by fluentgen. Do not edit."));
        assert!(contents.contains("use crate::shapes::Point;"));
        assert!(fs::read_to_string(&settings_path)
            .unwrap()
            .contains("DEFAULT_INSTANCE"));
    }

    #[test]
    fn test_plan_keeps_input_order() {
        let types = (0..16)
            .map(|i| {
                ProvidedType::new(RawTypeDescription::value_type(
                    format!("crate::T{}", i),
                    vec![RawParameter::required("v", RawType::named("u8"))],
                ))
            })
            .collect::<Vec<_>>();
        let generator = BuilderGenerator::new(BuildConfig::default());

        let names = generator
            .plan(&types)
            .into_iter()
            .map(|planned| planned.outcome.unwrap().1.class_name)
            .collect::<Vec<_>>();
        let expected = (0..16).map(|i| format!("T{}Builder", i)).collect::<Vec<_>>();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_type_overrides_are_layered() {
        let mut types = BTreeMap::new();
        types.insert(
            "crate::shapes::Point".to_string(),
            PartialBuilderConfig {
                prefix: Some("with".to_string()),
                ..Default::default()
            },
        );
        let generator = BuilderGenerator::new(
            BuildConfig::builder()
                .types(types)
                .language(TargetLanguage::Kotlin)
                .build(),
        );

        let planned = generator.plan(&[point()]);
        let (description, unit) = planned[0].outcome.as_ref().unwrap();
        assert_eq!(description.setters[0].function_name, "withX");
        assert_eq!(description.body_kind(), BodyKind::RequiredOnly);
        assert_eq!(unit.file_name, "PointBuilder.kt");
    }

    #[test]
    fn test_conflicting_overrides_fail_the_type() {
        let mut provided = point();
        provided.config.prefix = Some("set".to_string());
        let mut types = BTreeMap::new();
        types.insert(
            "crate::shapes::Point".to_string(),
            PartialBuilderConfig {
                prefix: Some("with".to_string()),
                ..Default::default()
            },
        );
        let generator = BuilderGenerator::new(BuildConfig::builder().types(types).build());

        let planned = generator.plan(&[provided]);
        assert!(matches!(
            planned[0].outcome,
            Err(FluentgenError::Extraction(
                ExtractionError::DuplicateConfiguration { .. }
            ))
        ));
    }

    #[test]
    fn test_provider_errors_abort() {
        let mut provider = MockTypeModelProvider::new();
        provider
            .expect_descriptions()
            .returning(|| Err(FluentgenError::workspace_scan("boom")));

        let result = BuilderGenerator::new(BuildConfig::builder().dry_run(true).build())
            .generate_from(&provider);
        assert!(matches!(result, Err(FluentgenError::WorkspaceScan(_))));
    }
}
