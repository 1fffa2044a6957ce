use std::{fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// One `[[activity]]` table of a seed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySeed {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub schedule: String,
    #[serde(default)]
    pub max_participants: u32,
    #[serde(default)]
    pub participants: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default, rename = "activity")]
    activities: Vec<ActivitySeed>,
}

impl ActivitySeed {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            schedule: String::new(),
            max_participants: 0,
            participants: Vec::new(),
        }
    }

    /// Sample activities used when no seed file is configured.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self {
                name: "Chess Club".into(),
                description: "Learn strategies and compete in chess tournaments".into(),
                schedule: "Fridays, 3:30 PM - 5:00 PM".into(),
                max_participants: 12,
                participants: vec![
                    "michael@mergington.edu".into(),
                    "daniel@mergington.edu".into(),
                ],
            },
            Self {
                name: "Programming Class".into(),
                description: "Learn programming fundamentals and build software projects".into(),
                schedule: "Tuesdays and Thursdays, 3:30 PM - 4:30 PM".into(),
                max_participants: 20,
                participants: vec![
                    "emma@mergington.edu".into(),
                    "sophia@mergington.edu".into(),
                ],
            },
            Self {
                name: "Gym Class".into(),
                description: "Physical education and sports activities".into(),
                schedule: "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM".into(),
                max_participants: 30,
                participants: vec![
                    "john@mergington.edu".into(),
                    "olivia@mergington.edu".into(),
                ],
            },
            Self {
                name: "Kayaking Trip".into(),
                description: "Join us for a scenic kayak on the lake.".into(),
                schedule: "Saturdays, 9:00 AM - 12:00 PM".into(),
                max_participants: 10,
                participants: vec![
                    "alice@mergington.edu".into(),
                    "sam@mergington.edu".into(),
                    "ravi@mergington.edu".into(),
                ],
            },
            Self {
                name: "Trail Run".into(),
                description: "5k trail run through the hills.".into(),
                schedule: "Sundays, 7:30 AM - 8:30 AM".into(),
                max_participants: 25,
                participants: Vec::new(),
            },
        ]
    }
}

pub fn parse_seed(raw: &str) -> anyhow::Result<Vec<ActivitySeed>> {
    let file: SeedFile = toml::from_str(raw).context("invalid activity seed toml")?;
    Ok(file.activities)
}

pub fn load_seed_file(path: impl AsRef<Path>) -> anyhow::Result<Vec<ActivitySeed>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read activity seed file '{}'", path.display()))?;
    parse_seed(&raw).with_context(|| format!("failed to parse '{}'", path.display()))
}
