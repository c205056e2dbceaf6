//! Fixtures shared by unit, behaviour, and downstream crate tests.

use crate::{Demographics, ProfileService, SegmentPriorTable};

/// Prior table used throughout the profile scenarios:
/// `default → {music: 7}` and `gamer → {xbox: 10, gaming: 15}`.
#[must_use]
pub fn scenario_priors() -> SegmentPriorTable {
    SegmentPriorTable::from_static(&[("music", 7)], &[("gamer", &[("xbox", 10), ("gaming", 15)])])
}

/// Demographics carrying only the `gamer` tag.
#[must_use]
pub fn gamer_demographics() -> Demographics {
    Demographics::new(24, "US", ["gamer"])
}

/// A service over an empty store seeded with [`scenario_priors`].
#[must_use]
pub fn scenario_service() -> ProfileService {
    ProfileService::with_priors(scenario_priors())
}
