use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::deserialize_timestamp;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Integration {
    pub id: u64,
    pub kind: Option<String>,
    pub name: Option<String>,
    pub project_id: Option<u64>,
    pub external_project_id: Option<serde_json::Value>,
    pub base_url: Option<String>,
    pub can_import: Option<bool>,
    pub is_other: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}
