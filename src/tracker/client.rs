use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::Record;
use crate::tracker::capability::Capability;
use crate::tracker::endpoints::Endpoints;
use crate::tracker::paginator::Paginator;
use crate::tracker::transport::{decode, Fetch, QueryParams, Transport};

pub struct TrackerClient<F = Transport> {
    fetcher: F,
    config: Config,
    endpoints: Endpoints,
}

impl TrackerClient<Transport> {
    pub fn new(config: Config) -> Result<Self> {
        let transport = Transport::new(&config.api_token)?;
        Ok(Self::with_fetcher(config, transport))
    }
}

impl<F: Fetch> TrackerClient<F> {
    pub fn with_fetcher(config: Config, fetcher: F) -> Self {
        let endpoints = Endpoints::new(&config.api_root);
        Self {
            fetcher,
            config,
            endpoints,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Every page of a listing, in server order.
    pub async fn get_all(&self, endpoint: &str, query: &QueryParams) -> Result<Vec<Record>> {
        Paginator::new(&self.fetcher)
            .fetch_all(endpoint, query)
            .await
    }

    async fn get_list(&self, endpoint: &str, query: &QueryParams) -> Result<Vec<Record>> {
        let response = self.fetcher.get(endpoint, query, false).await?;
        decode(endpoint, "response", response)
    }

    async fn get_one(&self, endpoint: &str) -> Result<Record> {
        let response = self.fetcher.get(endpoint, &QueryParams::new(), false).await?;
        decode(endpoint, "response", response)
    }

    /// Stories matching a Tracker search filter, with millisecond timestamps.
    pub async fn get_stories_by_filter(&self, filter: &str) -> Result<Vec<Record>> {
        let project_id = self.config.require_project(Capability::GetStoriesByFilter)?;
        let mut query = QueryParams::new();
        query.insert("date_format".to_string(), "millis".to_string());
        query.insert("filter".to_string(), filter.to_string());

        tracing::info!("Fetching stories in project {} matching: {}", project_id, filter);
        let stories = self.get_all(&self.endpoints.stories(project_id), &query).await?;
        tracing::info!("Found {} stories", stories.len());
        Ok(stories)
    }

    pub async fn get_stories_by_label(&self, label: &str) -> Result<Vec<Record>> {
        let project_id = self.config.require_project(Capability::GetStoriesByLabel)?;
        let mut query = QueryParams::new();
        query.insert("filter".to_string(), format!("label:\"{}\"", label));

        tracing::info!("Fetching stories in project {} labelled: {}", project_id, label);
        let stories = self.get_all(&self.endpoints.stories(project_id), &query).await?;
        tracing::info!("Found {} stories", stories.len());
        Ok(stories)
    }

    pub async fn get_story(&self, story_id: u64) -> Result<Record> {
        let project_id = self.config.require_project(Capability::GetStory)?;
        tracing::debug!("Fetching story: {}", story_id);
        self.get_one(&self.endpoints.story(project_id, story_id)).await
    }

    pub async fn get_story_activities(&self, story_id: u64) -> Result<Vec<Record>> {
        let project_id = self.config.require_project(Capability::GetStoryActivities)?;
        tracing::debug!("Fetching activity for story: {}", story_id);
        self.get_list(
            &self.endpoints.story_activity(project_id, story_id),
            &QueryParams::new(),
        )
        .await
    }

    pub async fn get_project_memberships(&self) -> Result<Vec<Record>> {
        let project_id = self.config.require_project(Capability::GetProjectMemberships)?;
        tracing::debug!("Fetching memberships for project: {}", project_id);
        self.get_list(
            &self.endpoints.project_memberships(project_id),
            &QueryParams::new(),
        )
        .await
    }

    pub async fn get_account_memberships(&self) -> Result<Vec<Record>> {
        let account_id = self.config.require_account(Capability::GetAccountMemberships)?;
        tracing::debug!("Fetching memberships for account: {}", account_id);
        self.get_list(
            &self.endpoints.account_memberships(account_id),
            &QueryParams::new(),
        )
        .await
    }

    pub async fn get_integrations(&self) -> Result<Vec<Record>> {
        let project_id = self.config.require_project(Capability::GetIntegrations)?;
        tracing::debug!("Fetching integrations for project: {}", project_id);
        self.get_list(&self.endpoints.integrations(project_id), &QueryParams::new())
            .await
    }

    pub async fn get_integration(&self, integration_id: u64) -> Result<Record> {
        let project_id = self.config.require_project(Capability::GetIntegration)?;
        tracing::debug!("Fetching integration: {}", integration_id);
        self.get_one(&self.endpoints.integration(project_id, integration_id))
            .await
    }

    /// Stories an integration knows about that are not yet linked to Tracker.
    pub async fn get_integration_stories(&self, integration_id: u64) -> Result<Vec<Record>> {
        let project_id = self.config.require_project(Capability::GetIntegrationStories)?;
        let mut query = QueryParams::new();
        query.insert("exclude_linked".to_string(), "true".to_string());

        tracing::debug!("Fetching stories for integration: {}", integration_id);
        self.get_list(
            &self.endpoints.integration_stories(project_id, integration_id),
            &query,
        )
        .await
    }

    /// Unlinked stories of every integration, in integration order.
    pub async fn get_all_integration_stories(&self) -> Result<Vec<Record>> {
        self.config
            .require_project(Capability::GetAllIntegrationStories)?;

        let integrations = self.get_integrations().await?;
        tracing::info!("Collecting stories from {} integrations", integrations.len());

        let mut results = Vec::new();
        for integration in &integrations {
            let integration_id = integration.id().ok_or(Error::MissingField {
                field: "id",
                capability: Capability::GetAllIntegrationStories,
            })?;
            let stories = self.get_integration_stories(integration_id).await?;
            results.extend(stories);
        }

        Ok(results)
    }
}
