//! Test helpers for building temporary workspaces and session files.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Value, json};
use tempfile::TempDir;

/// Temporary directory addressed through UTF-8 paths.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn write_json(&self, name: &str, value: &Value) -> Utf8PathBuf {
        let path = self.path(name);
        let payload = serde_json::to_vec_pretty(value).expect("serialise fixture");
        write_utf8(&path, &payload);
        path
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write fixture file");
}

/// Gamer login for `u1` followed by a music event, matching the profile
/// walkthrough in the core crate.
pub(super) fn gamer_session() -> Value {
    json!({
        "logins": [
            { "user_id": "u1", "demographics": { "age": 24, "country": "US", "tags": ["gamer"] } }
        ],
        "events": [
            { "user_id": "u1", "topic": "music", "delta": 5 },
            { "user_id": "u2", "topic": "dolls" }
        ]
    })
}

/// Prior table artefact used by the CLI scenarios.
pub(super) fn scenario_priors() -> Value {
    json!({
        "default": { "music": 7 },
        "gamer": { "xbox": 10, "gaming": 15 }
    })
}
