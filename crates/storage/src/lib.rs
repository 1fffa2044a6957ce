use std::{collections::BTreeMap, sync::Arc};

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use shared::domain::{ActivityDetails, Participant, SignupOutcome, UnregisterOutcome};

mod seed;

pub use seed::{load_seed_file, parse_seed, ActivitySeed};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("activity '{0}' not found")]
    NotFound(String),
    #[error("activity '{0}' is defined more than once")]
    DuplicateActivity(String),
}

/// In-memory roster of every activity, shared by all request handlers.
///
/// A single lock guards the whole map: mutations hold the write half for
/// the full read-modify-write, reads copy a snapshot out under the read half.
#[derive(Clone, Default)]
pub struct RosterStore {
    activities: Arc<RwLock<BTreeMap<String, ActivityRecord>>>,
}

#[derive(Debug, Clone)]
struct ActivityRecord {
    details: ActivityDetails,
    participants: Vec<Participant>,
}

impl ActivityRecord {
    fn position_of(&self, email: &str) -> Option<usize> {
        self.participants.iter().position(|p| p.email == email)
    }

    fn snapshot(&self, name: &str) -> ActivitySnapshot {
        ActivitySnapshot {
            name: name.to_string(),
            details: self.details.clone(),
            participants: self.participants.clone(),
        }
    }
}

/// Point-in-time copy of one activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivitySnapshot {
    pub name: String,
    pub details: ActivityDetails,
    pub participants: Vec<Participant>,
}

impl ActivitySnapshot {
    pub fn participants_count(&self) -> usize {
        self.participants.len()
    }

    pub fn is_registered(&self, email: &str) -> bool {
        self.participants.iter().any(|p| p.email == email)
    }

    pub fn participant_emails(&self) -> Vec<String> {
        self.participants.iter().map(|p| p.email.clone()).collect()
    }
}

impl RosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from seed records. Activity names must be unique;
    /// repeated emails within one record collapse to their first occurrence.
    pub fn from_seed(seeds: impl IntoIterator<Item = ActivitySeed>) -> Result<Self, RosterError> {
        let mut activities = BTreeMap::new();
        for seed in seeds {
            if activities.contains_key(&seed.name) {
                return Err(RosterError::DuplicateActivity(seed.name));
            }

            let mut record = ActivityRecord {
                details: ActivityDetails {
                    description: seed.description,
                    schedule: seed.schedule,
                    max_participants: seed.max_participants,
                },
                participants: Vec::with_capacity(seed.participants.len()),
            };
            for email in seed.participants {
                if record.position_of(&email).is_none() {
                    record.participants.push(Participant::new(email, None));
                }
            }
            activities.insert(seed.name, record);
        }

        Ok(Self {
            activities: Arc::new(RwLock::new(activities)),
        })
    }

    pub async fn len(&self) -> usize {
        self.activities.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.activities.read().await.is_empty()
    }

    /// Every activity, ordered by name.
    pub async fn list_activities(&self) -> Vec<ActivitySnapshot> {
        let activities = self.activities.read().await;
        activities
            .iter()
            .map(|(name, record)| record.snapshot(name))
            .collect()
    }

    pub async fn activity(&self, activity_name: &str) -> Result<ActivitySnapshot, RosterError> {
        let activities = self.activities.read().await;
        activities
            .get(activity_name)
            .map(|record| record.snapshot(activity_name))
            .ok_or_else(|| RosterError::NotFound(activity_name.to_string()))
    }

    /// Adds `email` to the roster. Signing up twice is a no-op that keeps the
    /// display name from the first registration.
    pub async fn signup(
        &self,
        activity_name: &str,
        email: &str,
        display_name: Option<&str>,
    ) -> Result<SignupOutcome, RosterError> {
        let mut activities = self.activities.write().await;
        let record = activities
            .get_mut(activity_name)
            .ok_or_else(|| RosterError::NotFound(activity_name.to_string()))?;

        if record.position_of(email).is_some() {
            debug!(activity = activity_name, email, "participant already registered");
            return Ok(SignupOutcome::AlreadyRegistered);
        }

        record.participants.push(Participant::new(
            email,
            display_name.map(str::to_string),
        ));
        info!(
            activity = activity_name,
            email,
            participants = record.participants.len(),
            "participant signed up"
        );
        Ok(SignupOutcome::Registered)
    }

    /// Removes `email` from the roster. Removing an absent email is a no-op.
    pub async fn unregister(
        &self,
        activity_name: &str,
        email: &str,
    ) -> Result<UnregisterOutcome, RosterError> {
        let mut activities = self.activities.write().await;
        let record = activities
            .get_mut(activity_name)
            .ok_or_else(|| RosterError::NotFound(activity_name.to_string()))?;

        let Some(index) = record.position_of(email) else {
            debug!(activity = activity_name, email, "participant was not registered");
            return Ok(UnregisterOutcome::NotRegistered);
        };

        record.participants.remove(index);
        info!(
            activity = activity_name,
            email,
            participants = record.participants.len(),
            "participant unregistered"
        );
        Ok(UnregisterOutcome::Removed)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
