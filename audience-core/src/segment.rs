//! Segment priors: baseline topic weights derived from demographic tags.
//!
//! A [`SegmentPriorTable`] holds a `default` entry applied to every user plus
//! zero or more tag-keyed entries. Matching entries are summed, so the result
//! never depends on the order in which tags are supplied.
//!
//! Every weight in a table is non-negative. The fallible constructors and the
//! `serde` decoder enforce this, so a [`User`](crate::User) can never start
//! with a negative prior.
//!
//! # Examples
//! ```
//! use std::collections::BTreeMap;
//! use audience_core::{SegmentPriorError, SegmentPriorTable};
//!
//! let table = SegmentPriorTable::try_new(BTreeMap::from([("music".to_owned(), 7)]))?
//!     .try_with_segment("gamer", [("gaming", 15), ("xbox", 10)])?;
//! let scores = table.compute_segment_scores(["gamer", "unknown"]);
//! assert_eq!(scores.get("gaming"), Some(&15));
//! assert_eq!(scores.get("music"), Some(&7));
//! assert_eq!(scores.len(), 3);
//!
//! let rejected = table.try_with_segment("tech", [("gadgets", -1)]);
//! assert!(matches!(rejected, Err(SegmentPriorError::NegativeWeight { .. })));
//! # Ok::<(), SegmentPriorError>(())
//! ```

use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-topic integer scores keyed by topic name.
pub type TopicScores = BTreeMap<String, i64>;

/// Key holding the default weights in the flattened entry map.
pub const DEFAULT_ENTRY: &str = "default";

/// Reasons a prior table is refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SegmentPriorError {
    /// A segment was keyed by the empty string.
    #[error("segment tag must not be empty")]
    EmptyTag,
    /// A segment was keyed by `default`, which names the default weights.
    #[error("segment tag \"default\" is reserved for the default weights")]
    ReservedTag,
    /// A weight was negative.
    #[error("weight {weight} for topic {topic:?} in {entry} must not be negative")]
    NegativeWeight {
        /// `default` or the segment tag owning the weight.
        entry: String,
        /// Topic carrying the weight.
        topic: String,
        /// Offending value.
        weight: i64,
    },
}

/// Static lookup from demographic tag to topic weight contributions.
///
/// When serialised, the default entry lives under the `default` key and every
/// other key names a segment tag, so a tag literally called `default` cannot
/// be expressed. Decoding applies the same checks as
/// [`SegmentPriorTable::from_entries`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SegmentPriorTable {
    default: TopicScores,
    #[cfg_attr(feature = "serde", serde(flatten))]
    segments: BTreeMap<String, TopicScores>,
}

impl SegmentPriorTable {
    /// Create a table whose default entry is `default` and with no segments.
    ///
    /// # Errors
    /// Returns [`SegmentPriorError::NegativeWeight`] when any default weight
    /// is below zero.
    pub fn try_new(default: TopicScores) -> Result<Self, SegmentPriorError> {
        check_weights(DEFAULT_ENTRY, &default)?;
        Ok(Self {
            default,
            segments: BTreeMap::new(),
        })
    }

    /// Build a table from a flattened map where the `default` key holds the
    /// default weights and every other key is a segment tag.
    ///
    /// A missing `default` key yields empty default weights.
    ///
    /// # Errors
    /// Returns the first [`SegmentPriorError`] found, checking the default
    /// entry before segments in tag order.
    pub fn from_entries(
        mut entries: BTreeMap<String, TopicScores>,
    ) -> Result<Self, SegmentPriorError> {
        let mut table = Self::try_new(entries.remove(DEFAULT_ENTRY).unwrap_or_default())?;
        for (tag, weights) in entries {
            table.try_insert_segment(tag, weights)?;
        }
        Ok(table)
    }

    /// The table shipped with the engine, used when no artefact is configured.
    ///
    /// | tag          | weights                          |
    /// |--------------|----------------------------------|
    /// | *(default)*  | `music: 7`                       |
    /// | `gamer`      | `gaming: 15`, `xbox: 10`         |
    /// | `tech`       | `technology: 12`, `gadgets: 8`   |
    /// | `parent`     | `family: 10`, `toys: 6`          |
    /// | `sports_fan` | `sports: 12`, `fitness: 5`       |
    /// | `traveller`  | `travel: 12`, `food: 5`          |
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_static(
            &[("music", 7)],
            &[
                ("gamer", &[("gaming", 15), ("xbox", 10)]),
                ("tech", &[("technology", 12), ("gadgets", 8)]),
                ("parent", &[("family", 10), ("toys", 6)]),
                ("sports_fan", &[("sports", 12), ("fitness", 5)]),
                ("traveller", &[("travel", 12), ("food", 5)]),
            ],
        )
    }

    /// Assemble a table from weights written into the source.
    #[must_use]
    pub(crate) fn from_static(
        default: &[(&str, i64)],
        segments: &[(&str, &[(&str, i64)])],
    ) -> Self {
        let table = Self {
            default: collect_weights(default.iter().copied()),
            segments: segments
                .iter()
                .map(|(tag, weights)| {
                    ((*tag).to_owned(), collect_weights(weights.iter().copied()))
                })
                .collect(),
        };
        debug_assert!(
            table.check().is_ok(),
            "static prior tables must use non-negative weights and plain tags"
        );
        table
    }

    /// Insert or replace the weights contributed by `tag`.
    ///
    /// The table is left unchanged when the segment is refused.
    ///
    /// # Errors
    /// Returns [`SegmentPriorError::EmptyTag`] or
    /// [`SegmentPriorError::ReservedTag`] for an unusable tag and
    /// [`SegmentPriorError::NegativeWeight`] when any weight is below zero.
    pub fn try_insert_segment<I, T>(
        &mut self,
        tag: impl Into<String>,
        weights: I,
    ) -> Result<(), SegmentPriorError>
    where
        I: IntoIterator<Item = (T, i64)>,
        T: Into<String>,
    {
        let key: String = tag.into();
        check_tag(&key)?;
        let entry = collect_weights(weights);
        check_weights(&key, &entry)?;
        self.segments.insert(key, entry);
        Ok(())
    }

    /// Add a segment while returning `self` for chaining.
    ///
    /// # Errors
    /// Fails under the same conditions as
    /// [`SegmentPriorTable::try_insert_segment`].
    pub fn try_with_segment<I, T>(
        mut self,
        tag: impl Into<String>,
        weights: I,
    ) -> Result<Self, SegmentPriorError>
    where
        I: IntoIterator<Item = (T, i64)>,
        T: Into<String>,
    {
        self.try_insert_segment(tag, weights)?;
        Ok(self)
    }

    /// Weights applied to every user regardless of tags.
    #[must_use]
    pub const fn default_weights(&self) -> &TopicScores {
        &self.default
    }

    /// Weights contributed by `tag`, if the table knows it.
    #[must_use]
    pub fn segment(&self, tag: &str) -> Option<&TopicScores> {
        self.segments.get(tag)
    }

    /// Iterate over tag entries in lexical order.
    pub fn segments(&self) -> impl Iterator<Item = (&str, &TopicScores)> {
        self.segments
            .iter()
            .map(|(tag, weights)| (tag.as_str(), weights))
    }

    /// Sum the default weights with the weights of every matching tag.
    ///
    /// Tags are de-duplicated before lookup and unknown tags contribute
    /// nothing. Sums saturate at the `i64` bounds.
    pub fn compute_segment_scores<I, S>(&self, tags: I) -> TopicScores
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: BTreeSet<String> = tags
            .into_iter()
            .map(|tag| tag.as_ref().to_owned())
            .collect();
        let mut scores = self.default.clone();
        for weights in unique.iter().filter_map(|tag| self.segments.get(tag)) {
            for (topic, weight) in weights {
                let total = scores.entry(topic.clone()).or_insert(0);
                *total = total.saturating_add(*weight);
            }
        }
        scores
    }

    fn check(&self) -> Result<(), SegmentPriorError> {
        check_weights(DEFAULT_ENTRY, &self.default)?;
        self.segments.iter().try_for_each(|(tag, weights)| {
            check_tag(tag)?;
            check_weights(tag, weights)
        })
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for SegmentPriorTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entries = BTreeMap::<String, TopicScores>::deserialize(deserializer)?;
        Self::from_entries(entries).map_err(serde::de::Error::custom)
    }
}

fn collect_weights<I, T>(weights: I) -> TopicScores
where
    I: IntoIterator<Item = (T, i64)>,
    T: Into<String>,
{
    weights
        .into_iter()
        .map(|(topic, weight)| (topic.into(), weight))
        .collect()
}

fn check_tag(tag: &str) -> Result<(), SegmentPriorError> {
    match tag {
        "" => Err(SegmentPriorError::EmptyTag),
        DEFAULT_ENTRY => Err(SegmentPriorError::ReservedTag),
        _ => Ok(()),
    }
}

fn check_weights(entry: &str, weights: &TopicScores) -> Result<(), SegmentPriorError> {
    match weights.iter().find(|(_, weight)| **weight < 0) {
        Some((topic, weight)) => Err(SegmentPriorError::NegativeWeight {
            entry: entry.to_owned(),
            topic: topic.clone(),
            weight: *weight,
        }),
        None => Ok(()),
    }
}
