//! Prior-table artefacts for the audience engine.
//!
//! Deployments tune segment weights without recompiling by shipping a JSON
//! artefact shaped like the lookup table itself:
//!
//! ```json
//! {
//!   "default": { "music": 7 },
//!   "gamer": { "gaming": 15, "xbox": 10 }
//! }
//! ```
//!
//! [`load_prior_table`] reads such a file and checks it with
//! [`SegmentPriorTable::from_entries`], [`write_prior_table`] persists one,
//! and [`resolve_prior_table`] falls back to [`SegmentPriorTable::builtin`]
//! when no artefact is configured.
//!
//! # Examples
//!
//! ```no_run
//! use camino::Utf8Path;
//! use audience_priors::load_prior_table;
//!
//! let table = load_prior_table(Utf8Path::new("artefacts/priors.json"))
//!     .expect("load prior table");
//! let scores = table.compute_segment_scores(["gamer"]);
//! ```

#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::io::{BufReader, BufWriter, Write};

use audience_core::{SegmentPriorTable, TopicScores};
use audience_fs::{create_file, ensure_parent_dir, open_utf8_file, parent_dir};
use camino::Utf8Path;
use log::info;

mod error;

pub use error::PriorTableError;

/// Read a prior table from a JSON artefact.
///
/// The file is decoded as a plain entry map first so a rejected weight is
/// reported with the entry and topic that carry it.
///
/// # Errors
/// Returns [`PriorTableError`] when the file cannot be opened or parsed, or
/// when [`SegmentPriorTable::from_entries`] refuses its contents.
pub fn load_prior_table(path: &Utf8Path) -> Result<SegmentPriorTable, PriorTableError> {
    let file = open_utf8_file(path).map_err(|source| PriorTableError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let entries: BTreeMap<String, TopicScores> = serde_json::from_reader(BufReader::new(file))
        .map_err(|source| PriorTableError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    let table =
        SegmentPriorTable::from_entries(entries).map_err(|source| PriorTableError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
    info!(
        "loaded prior table from {path} with {} segments",
        table.segments().count()
    );
    Ok(table)
}

/// Load the artefact at `path` when given, otherwise use the built-in table.
///
/// # Errors
/// Propagates [`load_prior_table`] failures for an explicit path.
pub fn resolve_prior_table(path: Option<&Utf8Path>) -> Result<SegmentPriorTable, PriorTableError> {
    path.map_or_else(|| Ok(SegmentPriorTable::builtin()), load_prior_table)
}

/// Persist `table` as pretty-printed JSON at `path`.
///
/// Missing parent directories are created.
///
/// # Errors
/// Returns [`PriorTableError`] when the artefact cannot be written.
pub fn write_prior_table(path: &Utf8Path, table: &SegmentPriorTable) -> Result<(), PriorTableError> {
    ensure_parent_dir(path).map_err(|source| PriorTableError::CreateParent {
        path: parent_dir(path).to_path_buf(),
        source,
    })?;
    let file = create_file(path).map_err(|source| PriorTableError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, table).map_err(|source| {
        PriorTableError::Serialise {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(|source| PriorTableError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    info!("wrote prior table to {path}");
    Ok(())
}
