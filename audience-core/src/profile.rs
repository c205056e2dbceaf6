//! Interest profiles: the ranked, explainable view of a user's evidence.
//!
//! [`compute_profile`] merges on-site and segment scores per topic, drops
//! topics with only faint signal, buckets the rest into [`InterestLevel`]s,
//! and orders them strongest first.

use std::collections::BTreeSet;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Demographics, User};

/// Combined score below which a topic is left out of the profile.
pub const INCLUSION_THRESHOLD: i64 = 5;

/// Lowest combined score levelled as [`InterestLevel::Medium`].
pub const MEDIUM_THRESHOLD: i64 = 8;

/// Lowest combined score levelled as [`InterestLevel::High`].
pub const HIGH_THRESHOLD: i64 = 15;

/// Discretised strength of an interest.
///
/// # Examples
/// ```
/// use audience_core::InterestLevel;
///
/// assert_eq!(InterestLevel::from_score(4), None);
/// assert_eq!(InterestLevel::from_score(5), Some(InterestLevel::Low));
/// assert_eq!(InterestLevel::from_score(8), Some(InterestLevel::Medium));
/// assert_eq!(InterestLevel::from_score(15), Some(InterestLevel::High));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InterestLevel {
    /// Combined score in `5..8`.
    Low,
    /// Combined score in `8..15`.
    Medium,
    /// Combined score of `15` or more.
    High,
}

impl InterestLevel {
    /// Level a combined score, or `None` when it falls below
    /// [`INCLUSION_THRESHOLD`].
    #[must_use]
    pub const fn from_score(combined: i64) -> Option<Self> {
        if combined >= HIGH_THRESHOLD {
            Some(Self::High)
        } else if combined >= MEDIUM_THRESHOLD {
            Some(Self::Medium)
        } else if combined >= INCLUSION_THRESHOLD {
            Some(Self::Low)
        } else {
            None
        }
    }

    /// Return the level as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for InterestLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signal that contributed a positive score to an interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InterestSource {
    /// Behavioural events recorded on site.
    Onsite,
    /// Demographic segment priors.
    XSegment,
}

impl InterestSource {
    /// Return the source as its wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Onsite => "onsite",
            Self::XSegment => "x_segment",
        }
    }
}

impl fmt::Display for InterestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One surfaced topic within a [`UserProfile`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interest {
    /// Topic label.
    pub topic: String,
    /// Level derived from the combined score.
    pub interest: InterestLevel,
    /// Signals with a positive contribution; never empty.
    pub source: BTreeSet<InterestSource>,
    /// Combined on-site and segment score.
    pub score: i64,
}

/// Ranked interest profile computed on demand from a [`User`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UserProfile {
    /// Identifier of the profiled user.
    pub user_id: String,
    /// Copy of the user's demographics.
    pub demographics: Demographics,
    /// Interests ordered by descending score, ties by topic name.
    pub interests: Vec<Interest>,
}

impl UserProfile {
    /// Look up the interest for `topic`, if it was surfaced.
    #[must_use]
    pub fn interest(&self, topic: &str) -> Option<&Interest> {
        self.interests.iter().find(|interest| interest.topic == topic)
    }

    /// Topics in ranked order.
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.interests.iter().map(|interest| interest.topic.as_str())
    }
}

/// Compute the ranked profile for a snapshot of `user`.
///
/// # Examples
/// ```
/// use audience_core::{InterestLevel, UserStore, compute_profile};
///
/// let store = UserStore::default();
/// store.record_event("u1", "dolls", 3);
/// let user = store.record_event("u1", "dolls", 3);
///
/// let profile = compute_profile(&user);
/// let dolls = profile.interest("dolls").expect("dolls surfaced");
/// assert_eq!(dolls.interest, InterestLevel::Low);
/// assert_eq!(profile.topics().next(), Some("gaming"));
/// ```
#[must_use]
pub fn compute_profile(user: &User) -> UserProfile {
    let topics: BTreeSet<&str> = user
        .onsite_scores()
        .keys()
        .chain(user.x_segment_scores().keys())
        .map(String::as_str)
        .collect();

    let mut interests: Vec<Interest> = topics
        .into_iter()
        .filter_map(|topic| {
            score_topic(
                topic,
                user.onsite_score(topic),
                user.segment_score(topic),
            )
        })
        .collect();

    // Topics arrive in lexical order, so a stable sort keeps ties by name.
    interests.sort_by(|a, b| b.score.cmp(&a.score));

    UserProfile {
        user_id: user.id().to_owned(),
        demographics: user.demographics().clone(),
        interests,
    }
}

fn score_topic(topic: &str, onsite: i64, segment: i64) -> Option<Interest> {
    let combined = onsite.saturating_add(segment);
    let level = InterestLevel::from_score(combined)?;
    let mut source = BTreeSet::new();
    if onsite > 0 {
        source.insert(InterestSource::Onsite);
    }
    if segment > 0 {
        source.insert(InterestSource::XSegment);
    }
    Some(Interest {
        topic: topic.to_owned(),
        interest: level,
        source,
        score: combined,
    })
}
