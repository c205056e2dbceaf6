#![expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]

//! Behavioural coverage for loading and exporting prior-table artefacts.

use std::cell::RefCell;

use audience_core::{SegmentPriorError, SegmentPriorTable};
use audience_priors::{PriorTableError, load_prior_table, write_prior_table};
use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

#[derive(Debug)]
struct PriorWorld {
    _tmp: TempDir,
    root: Utf8PathBuf,
    artefact: RefCell<Option<Utf8PathBuf>>,
    outcome: RefCell<Option<Result<SegmentPriorTable, PriorTableError>>>,
}

impl PriorWorld {
    fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        Self {
            _tmp: tmp,
            root,
            artefact: RefCell::new(None),
            outcome: RefCell::new(None),
        }
    }

    fn write_artefact(&self, contents: &str) {
        let path = self.root.join("priors.json");
        std::fs::write(path.as_std_path(), contents).expect("write artefact");
        self.artefact.replace(Some(path));
    }

    fn loaded(&self) -> SegmentPriorTable {
        self.outcome
            .borrow()
            .as_ref()
            .expect("outcome recorded")
            .as_ref()
            .expect("expected a loaded table")
            .clone()
    }
}

#[fixture]
fn world() -> PriorWorld {
    PriorWorld::new()
}

#[given("a prior table artefact where parent maps to toys 20")]
fn tuned_artefact(world: &PriorWorld) {
    world.write_artefact(r#"{ "parent": { "toys": 20 } }"#);
}

#[given("the built-in table is written to a nested artefact path")]
fn exported_builtin(world: &PriorWorld) {
    let path = world.root.join("exports/v1/priors.json");
    write_prior_table(&path, &SegmentPriorTable::builtin()).expect("export builtin table");
    world.artefact.replace(Some(path));
}

#[given("a prior table artefact containing malformed JSON")]
fn malformed_artefact(world: &PriorWorld) {
    world.write_artefact("{ \"parent\": ");
}

#[given("a prior table artefact where tech maps to gadgets -4")]
fn negative_artefact(world: &PriorWorld) {
    world.write_artefact(r#"{ "default": { "music": 7 }, "tech": { "gadgets": -4 } }"#);
}

#[when("the artefact is loaded")]
fn load_artefact(world: &PriorWorld) {
    let path = world
        .artefact
        .borrow()
        .clone()
        .expect("artefact path should be set");
    world.outcome.replace(Some(load_prior_table(&path)));
}

#[then("parent users receive toys 20 and no music prior")]
fn tuned_weights_apply(world: &PriorWorld) {
    let scores = world.loaded().compute_segment_scores(["parent"]);
    assert_eq!(scores.get("toys"), Some(&20));
    assert!(!scores.contains_key("music"));
    assert!(!scores.contains_key("family"));
}

#[then("the loaded table equals the built-in table")]
fn round_trip_matches(world: &PriorWorld) {
    assert_eq!(world.loaded(), SegmentPriorTable::builtin());
}

#[then("loading fails with a parse error")]
fn parse_failure(world: &PriorWorld) {
    let outcome = world.outcome.borrow();
    match outcome.as_ref().expect("outcome recorded") {
        Err(PriorTableError::Parse { .. }) => {}
        other => panic!("expected Parse error, found {other:?}"),
    }
}

#[then("loading fails naming tech and gadgets")]
fn negative_weight_failure(world: &PriorWorld) {
    let outcome = world.outcome.borrow();
    match outcome.as_ref().expect("outcome recorded") {
        Err(PriorTableError::Invalid {
            source:
                SegmentPriorError::NegativeWeight {
                    entry,
                    topic,
                    weight,
                },
            ..
        }) => {
            assert_eq!(entry, "tech");
            assert_eq!(topic, "gadgets");
            assert_eq!(*weight, -4);
        }
        other => panic!("expected NegativeWeight, found {other:?}"),
    }
}

macro_rules! register_prior_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/prior_table.feature", name = $scenario_title)]
        fn $fn_name(world: PriorWorld) {
            let _ = world;
        }
    };
}

register_prior_scenario!(
    tuned_artefact_applies,
    "a tuned artefact replaces the built-in weights"
);
register_prior_scenario!(builtin_round_trips, "exporting the built-in table round-trips");
register_prior_scenario!(malformed_json_rejected, "malformed JSON is rejected");
register_prior_scenario!(negative_weights_rejected, "negative weights are rejected");
