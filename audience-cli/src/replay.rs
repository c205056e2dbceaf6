//! Replay command: feed a recorded session through the profile service.

use std::io::{BufReader, Write};

use audience_core::{
    LoginRequest, ProfileRequest, ProfileService, RecordEventRequest, UserProfile,
};
use audience_fs::{file_is_file, open_utf8_file};
use audience_priors::resolve_prior_table;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_PRIORS, ARG_REPLAY_SESSION, ARG_REPLAY_USER, CliError, ENV_REPLAY_SESSION, write_json,
};

/// CLI arguments for the `replay` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Replay a JSON session of login and event requests against a \
                 fresh in-memory store, then print the resulting interest \
                 profiles. Logins run first, followed by events, each in file \
                 order.",
    about = "Replay a recorded session and print interest profiles"
)]
#[ortho_config(prefix = "AUDIENCE")]
pub(crate) struct ReplayArgs {
    /// Path to a JSON session with `logins` and `events` arrays.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) session: Option<Utf8PathBuf>,
    /// Prior table artefact; the built-in table is used when absent.
    #[arg(long = ARG_PRIORS, value_name = "path")]
    #[serde(default)]
    pub(crate) priors: Option<Utf8PathBuf>,
    /// Print only the profile of this user.
    #[arg(long = ARG_REPLAY_USER, value_name = "id")]
    #[serde(default)]
    pub(crate) user: Option<String>,
}

impl ReplayArgs {
    pub(crate) fn into_config(self) -> Result<ReplayConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ReplayConfig::try_from(merged)
    }
}

/// Resolved `replay` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReplayConfig {
    pub(crate) session: Utf8PathBuf,
    pub(crate) priors: Option<Utf8PathBuf>,
    pub(crate) user: Option<String>,
}

impl ReplayConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.session, ARG_REPLAY_SESSION)?;
        if let Some(priors) = &self.priors {
            require_existing(priors, ARG_PRIORS)?;
        }
        Ok(())
    }
}

fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl TryFrom<ReplayArgs> for ReplayConfig {
    type Error = CliError;

    fn try_from(args: ReplayArgs) -> Result<Self, Self::Error> {
        let session = args.session.ok_or(CliError::MissingArgument {
            field: ARG_REPLAY_SESSION,
            env: ENV_REPLAY_SESSION,
        })?;
        Ok(Self {
            session,
            priors: args.priors,
            user: args.user,
        })
    }
}

/// Recorded traffic replayed by the command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Session {
    #[serde(default)]
    pub(crate) logins: Vec<LoginRequest>,
    #[serde(default)]
    pub(crate) events: Vec<RecordEventRequest>,
}

pub(crate) fn run_replay_with(args: ReplayArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let session = load_session(&config.session)?;
    let service = ProfileService::with_priors(resolve_prior_table(config.priors.as_deref())?);
    replay_session(&service, session)?;
    match config.user {
        Some(user_id) => {
            let profile = service
                .profile(&ProfileRequest::new(user_id))
                .map_err(CliError::Profile)?;
            write_json(writer, &profile)
        }
        None => write_json(writer, &all_profiles(&service)?),
    }
}

/// Loads a JSON-encoded [`Session`] from disk.
pub(crate) fn load_session(path: &Utf8Path) -> Result<Session, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenSession {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseSession {
        path: path.to_path_buf(),
        source,
    })
}

/// Apply every login, then every event, stopping at the first rejection.
pub(crate) fn replay_session(service: &ProfileService, session: Session) -> Result<(), CliError> {
    for (index, login) in session.logins.into_iter().enumerate() {
        service
            .login(login)
            .map_err(|source| CliError::RejectedLogin { index, source })?;
    }
    for (index, event) in session.events.into_iter().enumerate() {
        let recorded = service
            .record_event(event)
            .map_err(|source| CliError::RejectedEvent { index, source })?;
        debug!(
            "replayed event #{index}: {} now scores {}",
            recorded.topic, recorded.score
        );
    }
    Ok(())
}

/// Profiles for every user in the store, ordered by user id.
pub(crate) fn all_profiles(service: &ProfileService) -> Result<Vec<UserProfile>, CliError> {
    service
        .store()
        .user_ids()
        .into_iter()
        .map(|user_id| {
            service
                .profile(&ProfileRequest::new(user_id))
                .map_err(CliError::Profile)
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ReplayConfig, CliError> {
    let merged = ReplayArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ReplayConfig::try_from(merged)
}
