use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::membership::Person;
use super::record::{deserialize_timestamp, Record};

/// One entry of a story's activity feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub kind: Option<String>,
    pub guid: Option<String>,
    pub project_version: Option<u64>,
    pub message: Option<String>,
    pub highlight: Option<String>,
    pub performed_by: Option<Person>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub occurred_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub primary_resources: Vec<Record>,
    #[serde(default)]
    pub changes: Vec<Record>,
}
