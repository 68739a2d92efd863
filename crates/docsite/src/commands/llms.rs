//! `docsite llms` command implementation.

use std::path::PathBuf;

use clap::Args;
use docsite_llms::{LlmDocMeta, LlmDocumentProcessor, TemplateProcessor};

use super::{ConfigArgs, load_registry};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the llms command.
#[derive(Args)]
pub(crate) struct LlmsArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output directory (default: `output.llms_dir` from config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

impl LlmsArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.config.load()?;
        let registry = load_registry(&config)?;
        let paths = &config.paths;
        let output_dir = self.output_dir.unwrap_or_else(|| paths.llms_dir.clone());

        output.info(&format!("Docs: {}", paths.docs_dir.display()));
        output.info(&format!("Output: {}", output_dir.display()));

        if paths.templates_dir.is_dir() {
            let templates =
                TemplateProcessor::new(&paths.templates_dir, &paths.docs_dir, registry.docs())
                    .generate_templates(&output_dir)?;
            output.success(&format!("Generated {} template(s)", templates.len()));
        } else {
            output.warning(&format!(
                "Templates directory not found, skipping: {}",
                paths.templates_dir.display()
            ));
        }

        if paths.llms_meta.is_file() {
            let meta = LlmDocMeta::load(&paths.llms_meta)?;
            let documents =
                LlmDocumentProcessor::new(&paths.docs_dir, registry.docs()).process_all(&meta)?;
            for document in &documents {
                let (json, _) = document.write_to(&output_dir)?;
                output.info(&format!(
                    "  {} ({} tokens) -> {}",
                    document.title,
                    document.token_count,
                    json.display()
                ));
            }
            output.success(&format!("Generated {} LLM document(s)", documents.len()));
        } else {
            output.warning(&format!(
                "LLM document meta not found, skipping: {}",
                paths.llms_meta.display()
            ));
        }
        Ok(())
    }
}
