use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::deserialize_timestamp;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub id: u64,
    pub project_id: Option<u64>,
    pub name: String,
    pub description: Option<String>,
    pub story_type: Option<String>,
    pub current_state: Option<String>,
    pub estimate: Option<f64>,
    pub url: Option<String>,
    pub requested_by_id: Option<u64>,
    #[serde(default)]
    pub owner_ids: Vec<u64>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub accepted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub id: Option<u64>,
    pub name: String,
}

impl Story {
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name == name)
    }
}
