//! Export command: seed a prior table artefact from the built-in weights.

use audience_core::SegmentPriorTable;
use audience_priors::write_prior_table;
use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{ARG_EXPORT_OUTPUT, CliError, ENV_EXPORT_OUTPUT};

/// CLI arguments for the `export-priors` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Write the built-in segment prior table as pretty-printed \
                 JSON. The artefact can be edited and passed back through \
                 --priors. Missing parent directories are created.",
    about = "Write the built-in prior table to a JSON artefact"
)]
#[ortho_config(prefix = "AUDIENCE")]
pub(crate) struct ExportArgs {
    /// Destination path for the artefact.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl ExportArgs {
    pub(crate) fn into_config(self) -> Result<ExportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ExportConfig::try_from(merged)
    }
}

/// Resolved `export-priors` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExportConfig {
    pub(crate) output: Utf8PathBuf,
}

impl TryFrom<ExportArgs> for ExportConfig {
    type Error = CliError;

    fn try_from(args: ExportArgs) -> Result<Self, Self::Error> {
        let output = args.output.ok_or(CliError::MissingArgument {
            field: ARG_EXPORT_OUTPUT,
            env: ENV_EXPORT_OUTPUT,
        })?;
        Ok(Self { output })
    }
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    export_builtin(&config)
}

pub(crate) fn export_builtin(config: &ExportConfig) -> Result<(), CliError> {
    write_prior_table(&config.output, &SegmentPriorTable::builtin())?;
    Ok(())
}
