use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, warn};

use crate::crowd::CrowdRecord;
use crate::fetch::{ApiKey, BasicClient, HttpClient, fetch_bytes};
use crate::parser::parse_value_list;
use crate::services::datamall_api::{DataMallApi, TrainLine};
use crate::taxi::TaxiRecord;

pub const DEFAULT_BASE_URL: &str = "https://datamall2.mytransport.sg/ltaodataservice";

/// DataMall returns at most this many records per call and pages with `$skip`.
pub const TAXI_PAGE_SIZE: usize = 500;

/// Default upper bound on taxi pages fetched in one run.
pub const MAX_TAXI_PAGES: usize = 100;

/// LTA DataMall client over any [`HttpClient`].
pub struct DataMallClient<C> {
    http: C,
    base_url: String,
    max_taxi_pages: usize,
}

impl DataMallClient<ApiKey<BasicClient>> {
    /// Builds a live client that authenticates with `account_key`.
    pub fn new(account_key: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        let basic = BasicClient::with_timeouts(timeout, Duration::from_secs(10))?;
        let http = ApiKey::account_key(basic, account_key)?;
        Ok(Self::with_client(http, base_url))
    }
}

impl<C: HttpClient> DataMallClient<C> {
    pub fn with_client(http: C, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_taxi_pages: MAX_TAXI_PAGES,
        }
    }

    /// Caps how many `Taxi-Availability` pages one call may request.
    pub fn with_max_taxi_pages(mut self, pages: usize) -> Self {
        self.max_taxi_pages = pages;
        self
    }

    fn endpoint(&self, name: &str, query: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, name))
            .with_context(|| format!("invalid DataMall base URL '{}'", self.base_url))?;
        url.set_query(Some(query));
        Ok(url)
    }
}

#[async_trait]
impl<C: HttpClient> DataMallApi for DataMallClient<C> {
    #[tracing::instrument(skip(self), fields(line = %line))]
    async fn crowd_density(&self, line: TrainLine) -> Result<Vec<CrowdRecord>> {
        let url = self.endpoint("PCDRealTime", &format!("TrainLine={}", line.code()))?;
        let bytes = fetch_bytes(&self.http, url).await?;

        let mut records: Vec<CrowdRecord> = parse_value_list(&bytes)
            .with_context(|| format!("failed to parse crowd density for {line}"))?;
        for record in &mut records {
            record.train_line = Some(line.code().to_string());
        }

        debug!(count = records.len(), "Crowd records received");
        Ok(records)
    }

    #[tracing::instrument(skip(self))]
    async fn taxi_availability(&self) -> Result<Vec<TaxiRecord>> {
        let mut taxis = Vec::new();

        for page in 0..self.max_taxi_pages {
            let skip = page * TAXI_PAGE_SIZE;
            let url = self.endpoint("Taxi-Availability", &format!("$skip={skip}"))?;
            let bytes = fetch_bytes(&self.http, url).await?;

            let batch: Vec<TaxiRecord> = parse_value_list(&bytes)
                .with_context(|| format!("failed to parse taxi availability at offset {skip}"))?;
            let len = batch.len();
            debug!(skip, count = len, "Taxi page received");
            taxis.extend(batch);

            if len < TAXI_PAGE_SIZE {
                return Ok(taxis);
            }
        }

        warn!(
            pages = self.max_taxi_pages,
            count = taxis.len(),
            "Taxi page limit reached, result may be truncated"
        );
        Ok(taxis)
    }
}
