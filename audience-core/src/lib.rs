//! Core domain types for the audience interest engine.
//!
//! A [`User`] collects two kinds of per-topic evidence: on-site behavioural
//! scores accumulated from events and demographic segment priors computed
//! once from a [`SegmentPriorTable`]. The [`UserStore`] owns every record and
//! [`compute_profile`] turns a snapshot into a ranked [`UserProfile`].

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod ingress;
pub mod profile;
pub mod segment;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use ingress::{
    DEFAULT_EVENT_DELTA, IngressError, LoginRequest, LoginResponse, LoginStatus, ProfileRequest,
    ProfileService, RecordEventRequest, RecordEventResponse,
};
pub use profile::{
    HIGH_THRESHOLD, INCLUSION_THRESHOLD, Interest, InterestLevel, InterestSource,
    MEDIUM_THRESHOLD, UserProfile, compute_profile,
};
pub use segment::{DEFAULT_ENTRY, SegmentPriorError, SegmentPriorTable, TopicScores};
pub use store::UserStore;

/// Age applied when a user is created without demographics.
pub const DEFAULT_AGE: u32 = 25;

/// Country applied when a user is created without demographics.
pub const DEFAULT_COUNTRY: &str = "US";

/// Segment tags applied when a user is created without demographics.
pub const DEFAULT_TAGS: &[&str] = &["gamer"];

/// Demographic attributes attached to a user at creation time.
///
/// Tags are held in an ordered set, so duplicates collapse and the order in
/// which callers supply them never matters.
///
/// # Examples
///
/// ```
/// use audience_core::Demographics;
///
/// let demographics = Demographics::new(31, "GB", ["tech", "parent", "tech"]);
/// assert_eq!(demographics.tags().len(), 2);
/// assert!(demographics.has_tag("parent"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Demographics {
    age: u32,
    country: String,
    tags: BTreeSet<String>,
}

impl Demographics {
    /// Construct demographics from an age, country code, and segment tags.
    pub fn new<I, S>(age: u32, country: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            age,
            country: country.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// The documented fallback used when a caller supplies no demographics.
    ///
    /// # Examples
    ///
    /// ```
    /// use audience_core::{DEFAULT_AGE, DEFAULT_COUNTRY, Demographics};
    ///
    /// let fallback = Demographics::fallback();
    /// assert_eq!(fallback.age(), DEFAULT_AGE);
    /// assert_eq!(fallback.country(), DEFAULT_COUNTRY);
    /// assert!(fallback.has_tag("gamer"));
    /// ```
    #[must_use]
    pub fn fallback() -> Self {
        Self::new(DEFAULT_AGE, DEFAULT_COUNTRY, DEFAULT_TAGS.iter().copied())
    }

    /// Age in years.
    #[must_use]
    pub const fn age(&self) -> u32 {
        self.age
    }

    /// Country code as supplied; not validated.
    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Segment tags in lexical order.
    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Report whether the demographics carry `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

impl Default for Demographics {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Aggregate root holding a user's identity and accumulated evidence.
///
/// Records are only created and mutated by [`UserStore`]. Values handed out
/// by the store are snapshots; mutating a clone never affects the store.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct User {
    id: String,
    demographics: Demographics,
    onsite_scores: TopicScores,
    x_segment_scores: TopicScores,
}

impl User {
    /// Build a fresh record, deriving segment scores from `priors` once.
    pub(crate) fn new(
        id: String,
        demographics: Demographics,
        priors: &SegmentPriorTable,
    ) -> Self {
        let x_segment_scores = priors.compute_segment_scores(demographics.tags());
        Self {
            id,
            demographics,
            onsite_scores: BTreeMap::new(),
            x_segment_scores,
        }
    }

    /// Add `delta` to the on-site score for `topic` and return the new total.
    ///
    /// Totals are not clamped at zero; they saturate at the `i64` bounds.
    pub(crate) fn add_onsite(&mut self, topic: &str, delta: i64) -> i64 {
        let entry = self.onsite_scores.entry(topic.to_owned()).or_insert(0);
        *entry = entry.saturating_add(delta);
        *entry
    }

    /// Stable identifier assigned at creation.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Demographics fixed at creation.
    #[must_use]
    pub const fn demographics(&self) -> &Demographics {
        &self.demographics
    }

    /// Scores accumulated from behavioural events.
    #[must_use]
    pub const fn onsite_scores(&self) -> &TopicScores {
        &self.onsite_scores
    }

    /// Scores derived from demographic segment priors.
    #[must_use]
    pub const fn x_segment_scores(&self) -> &TopicScores {
        &self.x_segment_scores
    }

    /// On-site score for `topic`, or `0` when no event touched it.
    #[must_use]
    pub fn onsite_score(&self, topic: &str) -> i64 {
        self.onsite_scores.get(topic).copied().unwrap_or(0)
    }

    /// Segment prior for `topic`, or `0` when no matched segment names it.
    #[must_use]
    pub fn segment_score(&self, topic: &str) -> i64 {
        self.x_segment_scores.get(topic).copied().unwrap_or(0)
    }
}
