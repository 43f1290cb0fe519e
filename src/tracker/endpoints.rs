/// Builds resource URLs below an API root.
#[derive(Debug, Clone)]
pub struct Endpoints {
    root: String,
}

impl Endpoints {
    pub fn new(api_root: &str) -> Self {
        Self {
            root: api_root.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn accounts(&self) -> String {
        format!("{}/accounts", self.root)
    }

    pub fn account(&self, account_id: u64) -> String {
        format!("{}/{}", self.accounts(), account_id)
    }

    pub fn account_memberships(&self, account_id: u64) -> String {
        format!("{}/memberships", self.account(account_id))
    }

    pub fn projects(&self) -> String {
        format!("{}/projects", self.root)
    }

    pub fn project(&self, project_id: u64) -> String {
        format!("{}/{}", self.projects(), project_id)
    }

    pub fn project_memberships(&self, project_id: u64) -> String {
        format!("{}/memberships", self.project(project_id))
    }

    pub fn stories(&self, project_id: u64) -> String {
        format!("{}/stories", self.project(project_id))
    }

    pub fn story(&self, project_id: u64, story_id: u64) -> String {
        format!("{}/{}", self.stories(project_id), story_id)
    }

    pub fn story_activity(&self, project_id: u64, story_id: u64) -> String {
        format!("{}/activity", self.story(project_id, story_id))
    }

    pub fn integrations(&self, project_id: u64) -> String {
        format!("{}/integrations", self.project(project_id))
    }

    pub fn integration(&self, project_id: u64, integration_id: u64) -> String {
        format!("{}/{}", self.integrations(project_id), integration_id)
    }

    pub fn integration_stories(&self, project_id: u64, integration_id: u64) -> String {
        format!("{}/stories", self.integration(project_id, integration_id))
    }
}
