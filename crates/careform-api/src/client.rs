use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use careform_core::models::batch::{BatchErrorEnvelope, BatchRequest, BatchResponse};
use careform_core::models::questionnaire::Questionnaire;
use careform_core::paths;

use crate::error::ApiError;
use crate::transport::{BatchReply, BatchTransport, BoxFuture};

/// A page of list results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    #[serde(default)]
    pub count: u64,
    pub results: Vec<T>,
}

/// Questionnaire API client. Cheap to clone; connections are pooled.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ApiError> {
        let base_url = base_url.trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("careform/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let req = self.authorize(self.http.get(self.url(path)).query(query));
        let response = req.send().await?;
        let status = response.status();
        tracing::debug!(path, status = status.as_u16(), "GET");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// List questionnaires, optionally filtered by title.
    pub async fn list_questionnaires(
        &self,
        title: Option<&str>,
    ) -> Result<Paginated<Questionnaire>, ApiError> {
        let query: Vec<(&str, &str)> = title.map(|t| vec![("title", t)]).unwrap_or_default();
        self.get_json(paths::QUESTIONNAIRE_LIST, &query).await
    }

    /// Fetch one questionnaire by slug (or id; the endpoint accepts both).
    pub async fn get_questionnaire(&self, slug: &str) -> Result<Questionnaire, ApiError> {
        self.get_json(&paths::questionnaire_detail(slug), &[]).await
    }

    async fn post_batch(&self, batch: &BatchRequest) -> Result<BatchReply, ApiError> {
        let req = self.authorize(self.http.post(self.url(paths::BATCH_REQUESTS)).json(batch));
        let response = req.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        tracing::debug!(
            status = status.as_u16(),
            requests = batch.requests.len(),
            "batch submitted"
        );

        if status.is_success() {
            let accepted: BatchResponse = serde_json::from_slice(&bytes)?;
            return Ok(BatchReply::Accepted(accepted));
        }

        match serde_json::from_slice::<BatchErrorEnvelope>(&bytes) {
            Ok(envelope) => Ok(BatchReply::Rejected(envelope)),
            Err(_) => Err(ApiError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            }),
        }
    }
}

impl BatchTransport for ApiClient {
    fn send_batch<'a>(
        &'a self,
        batch: &'a BatchRequest,
    ) -> BoxFuture<'a, Result<BatchReply, ApiError>> {
        Box::pin(self.post_batch(batch))
    }
}
