use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::ActivityDetails;

/// One entry of `GET /activities`. `participants_count` is derived from
/// `participants` when the summary is built and is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    pub participants: Vec<String>,
    pub participants_count: usize,
}

impl ActivitySummary {
    pub fn new(details: ActivityDetails, participants: Vec<String>) -> Self {
        let participants_count = participants.len();
        Self {
            description: details.description,
            schedule: details.schedule,
            max_participants: details.max_participants,
            participants,
            participants_count,
        }
    }
}

/// Keyed by activity name.
pub type ActivityListing = BTreeMap<String, ActivitySummary>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupQuery {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnregisterQuery {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn activities_route() -> &'static str {
    "/activities"
}

pub fn signup_action() -> &'static str {
    "signup"
}

pub fn unregister_action() -> &'static str {
    "unregister"
}
