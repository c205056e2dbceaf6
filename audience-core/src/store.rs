//! In-memory ownership of user records.
//!
//! [`UserStore`] is the only component that creates or mutates a [`User`].
//! Records sit behind per-user mutexes inside an `RwLock`-guarded map:
//! operations on one id are serialised, while different ids only share the
//! brief map lookup. Every value handed out is a snapshot taken under the
//! user's lock, so readers never observe a half-applied update.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use log::{debug, warn};

use crate::{Demographics, SegmentPriorTable, User};

type Slot = Arc<Mutex<User>>;

/// Process-lifetime registry of users keyed by identifier.
///
/// Construct one per service (or per test) and share it behind an [`Arc`].
///
/// # Examples
/// ```
/// use audience_core::{Demographics, UserStore};
///
/// let store = UserStore::default();
/// let created = store.get_or_create("u1", Some(Demographics::new(30, "US", ["tech"])));
/// let again = store.get_or_create("u1", None);
/// assert_eq!(created.demographics(), again.demographics());
///
/// let updated = store.record_event("u1", "gadgets", 5);
/// assert_eq!(updated.onsite_score("gadgets"), 5);
/// assert!(store.get("u2").is_none());
/// ```
#[derive(Debug)]
pub struct UserStore {
    priors: SegmentPriorTable,
    users: RwLock<HashMap<String, Slot>>,
}

impl UserStore {
    /// Create an empty store that derives segment scores from `priors`.
    #[must_use]
    pub fn new(priors: SegmentPriorTable) -> Self {
        Self {
            priors,
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Prior table applied to newly created users.
    #[must_use]
    pub const fn priors(&self) -> &SegmentPriorTable {
        &self.priors
    }

    /// Return the user for `user_id`, creating it when absent.
    ///
    /// Supplied `demographics` only apply on creation; an existing record is
    /// returned unchanged. When omitted, [`Demographics::fallback`] is used.
    pub fn get_or_create(&self, user_id: &str, demographics: Option<Demographics>) -> User {
        let slot = self.slot_or_create(user_id, demographics);
        snapshot(&slot)
    }

    /// Add `delta` to the on-site score for `topic`, creating the user with
    /// fallback demographics when needed, and return the updated record.
    ///
    /// Negative deltas are applied as-is, so totals may drop below zero.
    pub fn record_event(&self, user_id: &str, topic: &str, delta: i64) -> User {
        let slot = self.slot_or_create(user_id, None);
        let mut user = lock_user(&slot);
        let total = user.add_onsite(topic, delta);
        debug!("recorded {delta:+} on topic {topic:?} for user {user_id:?}; total {total}");
        user.clone()
    }

    /// Look up a user without creating it.
    #[must_use]
    pub fn get(&self, user_id: &str) -> Option<User> {
        self.existing_slot(user_id).map(|slot| snapshot(&slot))
    }

    /// Number of users created so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_map().len()
    }

    /// Report whether no user has been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_map().is_empty()
    }

    /// Identifiers of all known users in lexical order.
    #[must_use]
    pub fn user_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.read_map().keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    fn existing_slot(&self, user_id: &str) -> Option<Slot> {
        self.read_map().get(user_id).map(Arc::clone)
    }

    fn slot_or_create(&self, user_id: &str, demographics: Option<Demographics>) -> Slot {
        if let Some(slot) = self.existing_slot(user_id) {
            return slot;
        }
        let mut users = self.users.write().unwrap_or_else(|poisoned| {
            warn!("user map lock poisoned; recovering");
            poisoned.into_inner()
        });
        // Another writer may have created the record between the two locks.
        let slot = users.entry(user_id.to_owned()).or_insert_with(|| {
            let attached = demographics.unwrap_or_else(Demographics::fallback);
            debug!(
                "creating user {user_id:?} with segment tags {:?}",
                attached.tags()
            );
            Arc::new(Mutex::new(User::new(
                user_id.to_owned(),
                attached,
                &self.priors,
            )))
        });
        Arc::clone(slot)
    }

    fn read_map(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Slot>> {
        self.users.read().unwrap_or_else(|poisoned| {
            warn!("user map lock poisoned; recovering");
            poisoned.into_inner()
        })
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new(SegmentPriorTable::builtin())
    }
}

fn lock_user(slot: &Slot) -> MutexGuard<'_, User> {
    slot.lock().unwrap_or_else(|poisoned| {
        warn!("user record lock poisoned; recovering");
        poisoned.into_inner()
    })
}

fn snapshot(slot: &Slot) -> User {
    lock_user(slot).clone()
}
