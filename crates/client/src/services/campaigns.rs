//! Marketing campaigns. Totals are reduced locally.

use opsdesk_core::{Campaign, CampaignId, CampaignInput, CampaignTotals, Summary};
use tracing::instrument;

use crate::error::ServiceError;
use crate::http::ApiClient;
use crate::service::CollectionService;

const PATH: &str = "/marketing/campaigns";

/// Campaign backend.
#[derive(Debug, Clone)]
pub struct CampaignService {
    client: ApiClient,
}

impl CampaignService {
    /// Wrap a backend client.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl CollectionService for CampaignService {
    type Input = CampaignInput;
    type Record = Campaign;
    type Stats = CampaignTotals;

    const ENTITY: &'static str = "campaign";
    const PLURAL: &'static str = "campaigns";

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Campaign>, ServiceError> {
        self.client.get(PATH).await
    }

    async fn stats(&self, records: &[Campaign]) -> Result<CampaignTotals, ServiceError> {
        Ok(CampaignTotals::summarize(records))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn create(&self, input: &CampaignInput) -> Result<Campaign, ServiceError> {
        self.client.post(PATH, input).await
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: CampaignId, input: &CampaignInput) -> Result<Campaign, ServiceError> {
        self.client.put(&format!("{PATH}/{id}"), input).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: CampaignId) -> Result<(), ServiceError> {
        self.client.delete(&format!("{PATH}/{id}")).await
    }
}
