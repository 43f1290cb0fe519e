use crate::error::{Error, Result};
use crate::tracker::Capability;
use std::env;

pub const DEFAULT_API_ROOT: &str = "https://www.pivotaltracker.com/services/v5";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_token: String,
    pub account_id: Option<u64>,
    pub project_id: Option<u64>,
    pub api_root: String,
}

impl Config {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            account_id: None,
            project_id: None,
            api_root: DEFAULT_API_ROOT.to_string(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from named settings; `lookup` returns `None` for unset names.
    pub fn from_lookup<L>(lookup: L) -> Result<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let api_token = lookup("PIVOTAL_API_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                Error::Config("PIVOTAL_API_TOKEN environment variable not set".to_string())
            })?;

        let mut config = Self::new(api_token);
        config.account_id = parse_id("PIVOTAL_ACCOUNT_ID", lookup("PIVOTAL_ACCOUNT_ID"))?;
        config.project_id = parse_id("PIVOTAL_PROJECT_ID", lookup("PIVOTAL_PROJECT_ID"))?;
        if let Some(root) = lookup("PIVOTAL_API_ROOT") {
            if !root.trim().is_empty() {
                config = config.with_api_root(root.trim());
            }
        }

        Ok(config)
    }

    pub fn with_account_id(mut self, account_id: u64) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn with_project_id(mut self, project_id: u64) -> Self {
        self.project_id = Some(project_id);
        self
    }

    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = api_root.into().trim_end_matches('/').to_string();
        self
    }

    /// Project id for an operation that needs one.
    pub fn require_project(&self, capability: Capability) -> Result<u64> {
        self.project_id.ok_or(Error::MissingProjectId(capability))
    }

    /// Account id for an operation that needs one.
    pub fn require_account(&self, capability: Capability) -> Result<u64> {
        self.account_id.ok_or(Error::MissingAccountId(capability))
    }
}

fn parse_id(name: &str, raw: Option<String>) -> Result<Option<u64>> {
    match raw {
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} must be a numeric id, got '{}'", name, value))),
        None => Ok(None),
    }
}
