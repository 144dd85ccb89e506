use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::config::IngestionConfig;
use crate::models::Result;
use crate::normalizer::RawLead;

/// Ingestion collaborator boundary. Implementations deliver raw lead batches;
/// normalization and scoring happen downstream. Batches may arrive
/// incrementally - callers are expected to reconcile the selection after
/// every fetch.
#[async_trait]
pub trait LeadSource: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch_batch(&self) -> Result<Vec<RawLead>>;
}

/// Reads a JSON array of raw leads from disk (the scraper's export format).
pub struct FileLeadSource {
    path: String,
}

impl FileLeadSource {
    pub fn new(path: String) -> Self {
        Self { path }
    }
}

#[async_trait]
impl LeadSource for FileLeadSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch_batch(&self) -> Result<Vec<RawLead>> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let raws: Vec<RawLead> = serde_json::from_str(&content)?;
        info!("Loaded {} raw lead(s) from {}", raws.len(), self.path);
        Ok(raws)
    }
}

/// Fetches a raw lead batch from the search/ingestion service.
pub struct HttpLeadSource {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpLeadSource {
    pub fn new(endpoint: String, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self { endpoint, client })
    }
}

#[async_trait]
impl LeadSource for HttpLeadSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_batch(&self) -> Result<Vec<RawLead>> {
        let raws: Vec<RawLead> = self
            .client
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        info!("Fetched {} raw lead(s) from {}", raws.len(), self.endpoint);
        Ok(raws)
    }
}

/// Pick the configured source: the endpoint wins when both are set.
pub fn source_from_config(config: &IngestionConfig) -> Result<Box<dyn LeadSource>> {
    match &config.leads_endpoint {
        Some(endpoint) => Ok(Box::new(HttpLeadSource::new(
            endpoint.clone(),
            config.api_timeout_seconds,
        )?)),
        None => Ok(Box::new(FileLeadSource::new(config.leads_file.clone()))),
    }
}
