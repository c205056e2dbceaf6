//! Property-based tests for segment priors, event accumulation, and profile
//! computation.
//!
//! # Invariants tested
//!
//! - **Order independence:** segment scores ignore tag order and duplicates.
//! - **Prior immutability:** events never change a user's segment scores.
//! - **Additivity:** two events equal one event carrying their sum.
//! - **Inclusion:** surfaced interests score at least the inclusion threshold
//!   and name at least one source.
//! - **Ranking:** interests are sorted by descending score, ties by topic.

use std::collections::BTreeMap;

use audience_core::{
    DEFAULT_ENTRY, Demographics, INCLUSION_THRESHOLD, InterestLevel, SegmentPriorTable, UserStore,
    compute_profile,
};
use proptest::prelude::*;

const TAGS: &[&str] = &["gamer", "tech", "parent", "sports_fan", "traveller", "unknown"];
const TOPICS: &[&str] = &["music", "gaming", "xbox", "toys", "travel", "dolls", "news"];

fn tag_strategy() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(TAGS), 0..8)
}

fn topic_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(TOPICS)
}

fn events_strategy() -> impl Strategy<Value = Vec<(&'static str, i64)>> {
    prop::collection::vec((topic_strategy(), -20_i64..40), 0..24)
}

fn weights_strategy() -> impl Strategy<Value = BTreeMap<String, i64>> {
    prop::collection::btree_map(topic_strategy().prop_map(str::to_owned), 0_i64..20, 0..4)
}

fn table_strategy() -> impl Strategy<Value = SegmentPriorTable> {
    (
        weights_strategy(),
        prop::collection::btree_map(
            prop::sample::select(TAGS).prop_map(str::to_owned),
            weights_strategy(),
            0..5,
        ),
    )
        .prop_map(|(default, segments)| {
            let mut entries = segments;
            entries.insert(DEFAULT_ENTRY.to_owned(), default);
            SegmentPriorTable::from_entries(entries)
                .unwrap_or_else(|err| panic!("generated weights are non-negative: {err}"))
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Property: segment scores depend only on the set of tags.
    #[test]
    fn segment_scores_ignore_tag_order(table in table_strategy(), tags in tag_strategy()) {
        let forward = table.compute_segment_scores(&tags);
        let mut reversed = tags.clone();
        reversed.reverse();
        let mut doubled = tags.clone();
        doubled.extend(tags.iter().copied());

        prop_assert_eq!(&forward, &table.compute_segment_scores(&reversed));
        prop_assert_eq!(&forward, &table.compute_segment_scores(&doubled));
    }

    /// Property: recorded events never alter segment priors.
    #[test]
    fn events_never_change_priors(
        table in table_strategy(),
        tags in tag_strategy(),
        events in events_strategy(),
    ) {
        let store = UserStore::new(table);
        let created = store.get_or_create("u1", Some(Demographics::new(30, "US", tags)));
        for (topic, delta) in &events {
            store.record_event("u1", topic, *delta);
        }
        let current = store.get("u1");
        prop_assert_eq!(
            current.as_ref().map(|user| user.x_segment_scores()),
            Some(created.x_segment_scores())
        );
    }

    /// Property: two deltas accumulate to the same total as their sum.
    #[test]
    fn event_deltas_are_additive(
        topic in topic_strategy(),
        first in -1_000_i64..1_000,
        second in -1_000_i64..1_000,
    ) {
        let split = UserStore::new(SegmentPriorTable::default());
        split.record_event("u1", topic, first);
        let split_user = split.record_event("u1", topic, second);

        let combined = UserStore::new(SegmentPriorTable::default());
        let combined_user = combined.record_event("u1", topic, first + second);

        prop_assert_eq!(split_user.onsite_score(topic), combined_user.onsite_score(topic));
    }

    /// Property: repeated get-or-create calls agree on identity and priors.
    #[test]
    fn get_or_create_is_idempotent(
        table in table_strategy(),
        tags in tag_strategy(),
        other_tags in tag_strategy(),
        events in events_strategy(),
    ) {
        let store = UserStore::new(table);
        let first = store.get_or_create("u1", Some(Demographics::new(30, "US", tags)));
        for (topic, delta) in &events {
            store.record_event("u1", topic, *delta);
        }
        let second = store.get_or_create("u1", Some(Demographics::new(50, "DE", other_tags)));

        prop_assert_eq!(first.id(), second.id());
        prop_assert_eq!(first.demographics(), second.demographics());
        prop_assert_eq!(first.x_segment_scores(), second.x_segment_scores());
        prop_assert_eq!(store.len(), 1);
    }

    /// Property: surfaced interests clear the threshold, cite a source, and
    /// arrive in descending score order.
    #[test]
    fn profiles_are_thresholded_and_ranked(
        table in table_strategy(),
        tags in tag_strategy(),
        events in events_strategy(),
    ) {
        let store = UserStore::new(table);
        store.get_or_create("u1", Some(Demographics::new(30, "US", tags)));
        let mut user = store.get_or_create("u1", None);
        for (topic, delta) in &events {
            user = store.record_event("u1", topic, *delta);
        }

        let profile = compute_profile(&user);
        for interest in &profile.interests {
            prop_assert!(interest.score >= INCLUSION_THRESHOLD);
            prop_assert!(!interest.source.is_empty());
            prop_assert_eq!(InterestLevel::from_score(interest.score), Some(interest.interest));
        }
        for pair in profile.interests.windows(2) {
            if let [higher, lower] = pair {
                prop_assert!(
                    higher.score > lower.score
                        || (higher.score == lower.score && higher.topic < lower.topic)
                );
            }
        }

        let expected: BTreeMap<&str, i64> = user
            .onsite_scores()
            .keys()
            .chain(user.x_segment_scores().keys())
            .map(|topic| (topic.as_str(), user.onsite_score(topic) + user.segment_score(topic)))
            .filter(|(_, combined)| *combined >= INCLUSION_THRESHOLD)
            .collect();
        prop_assert_eq!(profile.interests.len(), expected.len());
    }
}
