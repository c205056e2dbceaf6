//! Facade crate for the audience interest engine.
//!
//! This crate re-exports the core domain types and exposes prior-table
//! artefact handling behind the `priors` feature.

#![forbid(unsafe_code)]

pub use audience_core::{
    DEFAULT_AGE, DEFAULT_COUNTRY, DEFAULT_ENTRY, DEFAULT_EVENT_DELTA, DEFAULT_TAGS, Demographics,
    HIGH_THRESHOLD, INCLUSION_THRESHOLD, IngressError, Interest, InterestLevel, InterestSource,
    LoginRequest, LoginResponse, LoginStatus, MEDIUM_THRESHOLD, ProfileRequest, ProfileService,
    RecordEventRequest, RecordEventResponse, SegmentPriorError, SegmentPriorTable, TopicScores,
    User, UserProfile, UserStore, compute_profile,
};

#[cfg(feature = "priors")]
pub use audience_priors::{
    PriorTableError, load_prior_table, resolve_prior_table, write_prior_table,
};

#[cfg(feature = "test-support")]
pub use audience_core::test_support;
