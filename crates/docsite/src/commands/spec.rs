//! `docsite validate`, `docsite routes` and `docsite convert`.

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use docsite_spec::legacy::{DocsStructure, convert_docs_to_legacy, convert_legacy_to_docs};
use docsite_spec::{DocInfo, get_docs_from_spec, load_spec, validate_full_docs_spec};

use super::{ConfigArgs, load_registry};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the validate command.
#[derive(Args)]
pub(crate) struct ValidateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

impl ValidateArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.config.load()?;
        let path = &config.paths.docs_spec;

        output.info(&format!("Validating {}", path.display()));
        let spec = load_spec(path)?;
        let result = validate_full_docs_spec(&spec);

        if !result.is_valid {
            output.highlight("Validation errors:");
            for error in &result.errors {
                output.warning(&format!("  - {error}"));
            }
            return Err(CliError::Validation(format!(
                "Docs spec has {} validation error(s)",
                result.errors.len()
            )));
        }

        let docs = get_docs_from_spec(&spec);
        output.success(&format!(
            "Docs spec is valid: {} product(s), {} page(s)",
            spec.len(),
            docs.len()
        ));
        Ok(())
    }
}

/// Output format for `routes`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum RoutesFormat {
    #[default]
    Text,
    Json,
}

/// Arguments for the routes command.
#[derive(Args)]
pub(crate) struct RoutesArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = RoutesFormat::Text)]
    format: RoutesFormat,

    /// Only list pages of this product.
    #[arg(short, long)]
    product: Option<String>,
}

impl RoutesArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.config.load()?;
        let registry = load_registry(&config)?;

        let docs: Vec<&DocInfo> = match &self.product {
            Some(product) => registry.docs_by_product(product),
            None => registry.docs().iter().collect(),
        };

        match self.format {
            RoutesFormat::Json => output.result(&serde_json::to_string_pretty(&docs)?),
            RoutesFormat::Text => {
                for doc in &docs {
                    output.result(&format_route(doc));
                }
            }
        }
        Ok(())
    }
}

fn format_route(doc: &DocInfo) -> String {
    format!(
        "{:<48} {:<40} {:.2}",
        doc.route_path, doc.path, doc.search_weight
    )
}

/// Target format for `convert`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ConvertTarget {
    /// Nested legacy records.
    Legacy,
    /// Product, section and doc tree.
    Spec,
}

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Input file (JSON or YAML spec, or JSON legacy structure).
    input: PathBuf,

    /// Format to convert to.
    #[arg(long, value_enum)]
    to: ConvertTarget,

    /// Write to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ConvertArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let json = convert(&self.input, self.to)?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, &json)?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => output.result(&json),
        }
        Ok(())
    }
}

fn convert(input: &Path, to: ConvertTarget) -> Result<String, CliError> {
    match to {
        ConvertTarget::Legacy => {
            let spec = load_spec(input)?;
            Ok(serde_json::to_string_pretty(&convert_docs_to_legacy(&spec))?)
        }
        ConvertTarget::Spec => {
            let raw = std::fs::read_to_string(input)?;
            let legacy: DocsStructure = serde_json::from_str(&raw)?;
            Ok(serde_json::to_string_pretty(&convert_legacy_to_docs(&legacy))?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsite_spec::{DocSpec, ProductSpec, SectionSpec, get_docs_from_spec};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_route() {
        let docs = get_docs_from_spec(&[ProductSpec::new(
            "mirascope",
            vec![SectionSpec::new("index", "Docs", vec![DocSpec::page("calls", "Calls")])],
        )]);
        let line = format_route(&docs[0]);
        assert!(line.starts_with("/docs/mirascope/calls "));
        assert!(line.contains(" mirascope/calls "));
        assert!(line.ends_with("1.00"));
    }

    #[test]
    fn test_convert_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let spec_path = dir.path().join("spec.json");
        let spec = vec![ProductSpec::new(
            "mirascope",
            vec![SectionSpec::new(
                "index",
                "Docs",
                vec![DocSpec::page("index", "Welcome"), DocSpec::page("calls", "Calls")],
            )],
        )];
        std::fs::write(&spec_path, serde_json::to_string(&spec).unwrap()).unwrap();

        let legacy_json = convert(&spec_path, ConvertTarget::Legacy).unwrap();
        let legacy_path = dir.path().join("legacy.json");
        std::fs::write(&legacy_path, &legacy_json).unwrap();

        let back: Vec<ProductSpec> =
            serde_json::from_str(&convert(&legacy_path, ConvertTarget::Spec).unwrap()).unwrap();
        assert_eq!(back[0].product, "mirascope");
        assert_eq!(back[0].sections[0].children.len(), 2);
    }
}
