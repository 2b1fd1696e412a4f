use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    domain::{Round, Year},
    error::ApiError,
    protocol::{RaceSummary, ResultRow},
};
use tracing::debug;
use url::Url;

pub mod error;

pub use error::ClientError;

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Source of season and race data for the front-ends.
#[async_trait]
pub trait RaceDataSource: Send + Sync {
    async fn list_races(&self, year: Year) -> Result<Vec<RaceSummary>>;
    async fn fetch_results(&self, year: Year, round: Round) -> Result<Vec<ResultRow>>;
}

/// HTTP client for the `/api/races` and `/api/results` endpoints.
#[derive(Clone)]
pub struct ResultsClient {
    http: Client,
    base_url: Url,
}

impl ResultsClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let invalid = |reason: String| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let mut url = Url::parse(base_url.trim()).map_err(|err| invalid(err.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("api url must start with http:// or https://".into()));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            base_url: url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: err.to_string(),
            })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!(%url, ?query, "GET");
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<ApiError>().await.ok();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<T>().await.map_err(ClientError::Decode)
    }
}

#[async_trait]
impl RaceDataSource for ResultsClient {
    async fn list_races(&self, year: Year) -> Result<Vec<RaceSummary>> {
        self.get_json("api/races", &[("year", year.to_string())]).await
    }

    async fn fetch_results(&self, year: Year, round: Round) -> Result<Vec<ResultRow>> {
        self.get_json(
            "api/results",
            &[("year", year.to_string()), ("round", round.to_string())],
        )
        .await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
