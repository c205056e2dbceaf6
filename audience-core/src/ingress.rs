//! Request and response contracts for the collaborators that front the
//! engine (HTTP handlers, batch replays).
//!
//! [`ProfileService`] validates requests before they reach the
//! [`UserStore`] and maps missing users onto [`IngressError::NotFound`], so
//! transports only need to serialise the results.

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Demographics, SegmentPriorTable, UserProfile, UserStore, compute_profile};

/// Delta applied when an event request omits one.
pub const DEFAULT_EVENT_DELTA: i64 = 5;

const FIELD_USER_ID: &str = "user_id";
const FIELD_TOPIC: &str = "topic";

/// Errors surfaced to ingress collaborators.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IngressError {
    /// A profile was requested for a user that was never created.
    #[error("user {user_id:?} not found")]
    NotFound {
        /// Identifier from the request.
        user_id: String,
    },
    /// A required field was missing or empty.
    #[error("request is missing required field `{field}`")]
    InvalidRequest {
        /// Name of the offending field.
        field: &'static str,
    },
}

/// Ask for a user to be looked up, or created with the given demographics.
///
/// Like [`RecordEventRequest`], the identifier is optional on the wire so an
/// absent value surfaces as [`IngressError::InvalidRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoginRequest {
    /// Identifier of the user logging in.
    #[cfg_attr(feature = "serde", serde(default))]
    pub user_id: Option<String>,
    /// Demographics for a first login; ignored for known users.
    #[cfg_attr(feature = "serde", serde(default))]
    pub demographics: Option<Demographics>,
}

impl LoginRequest {
    /// Build a login for `user_id`, optionally carrying first-login
    /// demographics.
    #[must_use]
    pub fn new(user_id: impl Into<String>, demographics: Option<Demographics>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            demographics,
        }
    }
}

/// Outcome marker for [`LoginResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LoginStatus {
    /// The user exists (possibly just created).
    Ok,
}

/// Confirmation returned from [`ProfileService::login`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoginResponse {
    /// Always [`LoginStatus::Ok`].
    pub status: LoginStatus,
    /// Canonical identifier of the user.
    pub user_id: String,
}

/// Record a behavioural event against a topic.
///
/// Fields are optional on the wire so missing values can be reported as
/// [`IngressError::InvalidRequest`] rather than a decoding failure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecordEventRequest {
    /// Identifier of the acting user.
    #[cfg_attr(feature = "serde", serde(default))]
    pub user_id: Option<String>,
    /// Topic the event relates to.
    #[cfg_attr(feature = "serde", serde(default))]
    pub topic: Option<String>,
    /// Score change; [`DEFAULT_EVENT_DELTA`] when omitted.
    #[cfg_attr(feature = "serde", serde(default))]
    pub delta: Option<i64>,
}

impl RecordEventRequest {
    /// Build a request with every field present.
    #[must_use]
    pub fn new(user_id: impl Into<String>, topic: impl Into<String>, delta: i64) -> Self {
        Self {
            user_id: Some(user_id.into()),
            topic: Some(topic.into()),
            delta: Some(delta),
        }
    }
}

/// Topic and its new accumulated on-site score.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecordEventResponse {
    /// Topic the event was recorded against.
    pub topic: String,
    /// On-site total after applying the delta.
    pub score: i64,
}

/// Ask for the computed profile of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProfileRequest {
    /// Identifier of the user to profile.
    pub user_id: String,
}

impl ProfileRequest {
    /// Build a request for `user_id`.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Cloneable handle that serves ingress requests from a shared store.
///
/// # Examples
/// ```
/// use audience_core::{IngressError, ProfileRequest, ProfileService, RecordEventRequest};
///
/// let service = ProfileService::default();
/// let recorded = service
///     .record_event(RecordEventRequest::new("u1", "music", 5))
///     .expect("valid request");
/// assert_eq!(recorded.score, 5);
///
/// let missing = service.profile(&ProfileRequest::new("u2"));
/// assert!(matches!(missing, Err(IngressError::NotFound { .. })));
/// ```
#[derive(Debug, Clone)]
pub struct ProfileService {
    store: Arc<UserStore>,
}

impl ProfileService {
    /// Serve requests from `store`.
    #[must_use]
    pub const fn new(store: Arc<UserStore>) -> Self {
        Self { store }
    }

    /// Serve requests from a fresh store using `priors`.
    #[must_use]
    pub fn with_priors(priors: SegmentPriorTable) -> Self {
        Self::new(Arc::new(UserStore::new(priors)))
    }

    /// Shared store backing this service.
    #[must_use]
    pub const fn store(&self) -> &Arc<UserStore> {
        &self.store
    }

    /// Look up or create the user named in `request`.
    ///
    /// # Errors
    /// Returns [`IngressError::InvalidRequest`] when `user_id` is missing or
    /// empty.
    pub fn login(&self, request: LoginRequest) -> Result<LoginResponse, IngressError> {
        let user_id = require(request.user_id, FIELD_USER_ID)?;
        let user = self.store.get_or_create(&user_id, request.demographics);
        Ok(LoginResponse {
            status: LoginStatus::Ok,
            user_id: user.id().to_owned(),
        })
    }

    /// Accumulate the event's delta onto the user's on-site score.
    ///
    /// # Errors
    /// Returns [`IngressError::InvalidRequest`] when `user_id` or `topic` is
    /// missing or empty; the store is left untouched in that case.
    pub fn record_event(
        &self,
        request: RecordEventRequest,
    ) -> Result<RecordEventResponse, IngressError> {
        let user_id = require(request.user_id, FIELD_USER_ID)?;
        let topic = require(request.topic, FIELD_TOPIC)?;
        let delta = request.delta.unwrap_or(DEFAULT_EVENT_DELTA);
        let user = self.store.record_event(&user_id, &topic, delta);
        let score = user.onsite_score(&topic);
        Ok(RecordEventResponse { topic, score })
    }

    /// Compute the profile of an existing user.
    ///
    /// # Errors
    /// Returns [`IngressError::NotFound`] when the user was never created.
    pub fn profile(&self, request: &ProfileRequest) -> Result<UserProfile, IngressError> {
        self.store
            .get(&request.user_id)
            .map(|user| compute_profile(&user))
            .ok_or_else(|| IngressError::NotFound {
                user_id: request.user_id.clone(),
            })
    }
}

impl Default for ProfileService {
    fn default() -> Self {
        Self::new(Arc::new(UserStore::default()))
    }
}

/// Any non-empty string is accepted, including whitespace.
fn require(value: Option<String>, field: &'static str) -> Result<String, IngressError> {
    value
        .filter(|text| !text.is_empty())
        .ok_or(IngressError::InvalidRequest { field })
}
