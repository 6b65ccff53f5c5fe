//! Static game configuration: the dataset plus the levels and challenges
//! played against it. Loaded once and read-only afterwards.

use std::{collections::HashSet, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::{Error, Result},
    sql::{engine::Engine, validator},
    storage::Dataset,
};

mod seed;

/// Challenge difficulty, which sets the countdown for each challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn time_limit(&self) -> Duration {
        match self {
            Difficulty::Easy => Duration::from_secs(10 * 60),
            Difficulty::Medium => Duration::from_secs(5 * 60),
            Difficulty::Hard => Duration::from_secs(3 * 60),
        }
    }

    /// Name shown to the player
    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Fácil",
            Difficulty::Medium => "Medio",
            Difficulty::Hard => "Difícil",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: u32,
    pub title: String,
    pub description: String,
    /// Reference solution; submissions are compared against it
    pub expected_query: String,
    #[serde(default)]
    pub hints: Vec<String>,
    pub table: String,
    pub difficulty: Difficulty,
}

impl Challenge {
    /// Whether a submitted query solves this challenge
    pub fn accepts(&self, submitted: &str) -> bool {
        validator::is_equivalent(submitted, &self.expected_query)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: u32,
    pub name: String,
    pub scenario: String,
    pub description: String,
    pub challenges: Vec<Challenge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(rename = "tables")]
    pub dataset: Dataset,
    pub levels: Vec<Level>,
}

impl GameConfig {
    /// The built-in game content
    pub fn seed() -> Self {
        Self {
            dataset: seed::dataset(),
            levels: seed::levels(),
        }
    }

    /// Parses and validates a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        info!(
            tables = config.dataset.tables().len(),
            levels = config.levels.len(),
            "loaded game configuration"
        );
        Ok(config)
    }

    /// Reads a JSON configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Checks that the content is consistent with the dataset: table names
    /// are unique, challenge ids are unique, and every challenge targets an
    /// existing table with a reference query that runs.
    pub fn validate(&self) -> Result<()> {
        let mut tables = HashSet::new();
        for name in self.dataset.table_names() {
            if !tables.insert(name.clone()) {
                return Err(Error::Config(format!("duplicate table {}", name)));
            }
        }

        let engine = self.engine();
        let mut ids = HashSet::new();
        for challenge in self.challenges() {
            if !ids.insert(challenge.id) {
                return Err(Error::Config(format!("duplicate challenge id {}", challenge.id)));
            }
            if !tables.contains(&challenge.table) {
                return Err(Error::Config(format!(
                    "challenge {} refers to unknown table {}",
                    challenge.id, challenge.table
                )));
            }
            engine.execute(&challenge.expected_query).map_err(|err| {
                Error::Config(format!("challenge {} expected query fails: {}", challenge.id, err))
            })?;
        }
        Ok(())
    }

    /// Every challenge, level by level
    pub fn challenges(&self) -> impl Iterator<Item = &Challenge> {
        self.levels.iter().flat_map(|level| level.challenges.iter())
    }

    pub fn challenge(&self, id: u32) -> Option<&Challenge> {
        self.challenges().find(|c| c.id == id)
    }

    /// An engine over this configuration's dataset
    pub fn engine(&self) -> Engine {
        Engine::new(self.dataset.clone())
    }
}
