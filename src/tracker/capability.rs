use std::fmt;

/// Public client operation, used to name the caller in guard errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    GetStoriesByFilter,
    GetStoriesByLabel,
    GetStory,
    GetStoryActivities,
    GetProjectMemberships,
    GetAccountMemberships,
    GetIntegrations,
    GetIntegration,
    GetIntegrationStories,
    GetAllIntegrationStories,
}

impl Capability {
    pub fn name(&self) -> &'static str {
        match self {
            Capability::GetStoriesByFilter => "get_stories_by_filter",
            Capability::GetStoriesByLabel => "get_stories_by_label",
            Capability::GetStory => "get_story",
            Capability::GetStoryActivities => "get_story_activities",
            Capability::GetProjectMemberships => "get_project_memberships",
            Capability::GetAccountMemberships => "get_account_memberships",
            Capability::GetIntegrations => "get_integrations",
            Capability::GetIntegration => "get_integration",
            Capability::GetIntegrationStories => "get_integration_stories",
            Capability::GetAllIntegrationStories => "get_all_integration_stories",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
