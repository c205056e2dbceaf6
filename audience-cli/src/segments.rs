//! Segments command: show the priors a set of tags would receive.

use std::io::Write;

use audience_core::TopicScores;
use audience_priors::resolve_prior_table;
use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{ARG_PRIORS, CliError, write_json};

/// CLI arguments for the `segments` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Compute the demographic segment priors for the given tags. \
                 The default weights always apply; each known tag adds its \
                 own weights and unknown tags are ignored.",
    about = "Print segment prior scores for demographic tags"
)]
#[ortho_config(prefix = "AUDIENCE")]
pub(crate) struct SegmentsArgs {
    /// Demographic segment tags.
    #[arg(value_name = "tag")]
    #[serde(default)]
    pub(crate) tags: Vec<String>,
    /// Prior table artefact; the built-in table is used when absent.
    #[arg(long = ARG_PRIORS, value_name = "path")]
    #[serde(default)]
    pub(crate) priors: Option<Utf8PathBuf>,
}

impl SegmentsArgs {
    pub(crate) fn into_config(self) -> Result<SegmentsConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(SegmentsConfig::from(merged))
    }
}

/// Resolved `segments` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SegmentsConfig {
    pub(crate) tags: Vec<String>,
    pub(crate) priors: Option<Utf8PathBuf>,
}

impl From<SegmentsArgs> for SegmentsConfig {
    fn from(args: SegmentsArgs) -> Self {
        Self {
            tags: args.tags,
            priors: args.priors,
        }
    }
}

pub(crate) fn run_segments_with(args: SegmentsArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let scores = segment_scores(&config)?;
    write_json(writer, &scores)
}

pub(crate) fn segment_scores(config: &SegmentsConfig) -> Result<TopicScores, CliError> {
    let table = resolve_prior_table(config.priors.as_deref())?;
    Ok(table.compute_segment_scores(&config.tags))
}
