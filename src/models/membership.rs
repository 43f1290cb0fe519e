use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::deserialize_timestamp;

/// Project or account membership. Account memberships carry
/// `owner`/`admin` flags, project memberships a `role`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub id: u64,
    pub kind: Option<String>,
    pub person: Option<Person>,
    pub person_id: Option<u64>,
    pub project_id: Option<u64>,
    pub account_id: Option<u64>,
    pub role: Option<String>,
    pub owner: Option<bool>,
    pub admin: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub initials: Option<String>,
    pub username: Option<String>,
}

impl Membership {
    pub fn display_name(&self) -> String {
        self.person
            .as_ref()
            .and_then(|p| p.name.clone().or_else(|| p.username.clone()))
            .or_else(|| self.person_id.map(|id| format!("person #{}", id)))
            .unwrap_or_else(|| format!("membership #{}", self.id))
    }
}
