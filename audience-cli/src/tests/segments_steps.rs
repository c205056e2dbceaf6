//! Behaviour-driven steps for the segments and export-priors commands.

use super::helpers::Workspace;
use super::*;
use audience_core::TopicScores;
use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

#[derive(Debug)]
struct SegmentsWorld {
    workspace: Workspace,
    artefact: Utf8PathBuf,
    stdout: RefCell<Vec<u8>>,
}

impl SegmentsWorld {
    fn new() -> Self {
        let workspace = Workspace::new();
        let artefact = workspace.path("exported/priors.json");
        Self {
            workspace,
            artefact,
            stdout: RefCell::new(Vec::new()),
        }
    }

    fn run(&self, argv: &[&str]) {
        let cli = Cli::try_parse_from(argv).expect("arguments should parse");
        let mut buffer = self.stdout.borrow_mut();
        buffer.clear();
        dispatch(cli.command, &mut *buffer).expect("command should succeed");
    }

    fn scores(&self) -> TopicScores {
        serde_json::from_slice(&self.stdout.borrow()).expect("stdout should be JSON scores")
    }
}

#[fixture]
fn world() -> SegmentsWorld {
    SegmentsWorld::new()
}

#[given("the built-in priors are exported to an artefact")]
fn export_builtin(#[from(world)] world: &SegmentsWorld) {
    world.run(&["audience", "export-priors", world.artefact.as_str()]);
    assert!(world.stdout.borrow().is_empty());
}

#[given("the exported artefact raises music to 30")]
fn raise_music(#[from(world)] world: &SegmentsWorld) {
    let raw = std::fs::read_to_string(world.artefact.as_std_path()).expect("read artefact");
    let mut table: serde_json::Value = serde_json::from_str(&raw).expect("artefact JSON");
    table["default"]["music"] = serde_json::json!(30);
    world.workspace.write_json("exported/priors.json", &table);
}

#[when("I run the segments command for gamer and parent")]
fn run_builtin_segments(#[from(world)] world: &SegmentsWorld) {
    world.run(&["audience", "segments", "parent", "gamer"]);
}

#[when("I run the segments command for gamer and parent using the artefact")]
fn run_artefact_segments(#[from(world)] world: &SegmentsWorld) {
    world.run(&[
        "audience",
        "segments",
        "gamer",
        "parent",
        "--priors",
        world.artefact.as_str(),
    ]);
}

fn assert_scores(world: &SegmentsWorld, music: i64) {
    let scores = world.scores();
    assert_eq!(scores.get("gaming"), Some(&15));
    assert_eq!(scores.get("xbox"), Some(&10));
    assert_eq!(scores.get("family"), Some(&10));
    assert_eq!(scores.get("toys"), Some(&6));
    assert_eq!(scores.get("music"), Some(&music));
    assert_eq!(scores.len(), 5);
}

#[then("the printed scores include gaming 15, family 10, and music 7")]
fn builtin_scores(#[from(world)] world: &SegmentsWorld) {
    assert_scores(world, 7);
}

#[then("the printed scores include gaming 15, family 10, and music 30")]
fn tuned_scores(#[from(world)] world: &SegmentsWorld) {
    assert_scores(world, 30);
}

#[scenario(path = "tests/features/segments_command.feature", index = 0)]
fn segments_builtin(#[from(world)] world: SegmentsWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/segments_command.feature", index = 1)]
fn segments_from_exported_artefact(#[from(world)] world: SegmentsWorld) {
    let _ = world;
}
