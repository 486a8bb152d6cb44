use std::time::Duration;

use serde_json::{json, Value};
use url::Url;

use crate::wire::{
    ActionResponse, FilesResponse, FullAutoRequest, JobStatusResponse, RemoteListing,
    StartJobResponse,
};
use crate::{ApiError, FailureKind};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The backend's HTTP API. Every call is a single request with no retries.
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    async fn start_job(&self, request: &FullAutoRequest) -> Result<StartJobResponse, ApiError>;

    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, ApiError>;

    /// An empty `path` lists the browse root. `success: false` is returned as
    /// [`FailureKind::Rejected`].
    async fn list_files(&self, path: &str) -> Result<RemoteListing, ApiError>;

    async fn call_action(
        &self,
        endpoint: &str,
        payload: &Value,
    ) -> Result<ActionResponse, ApiError>;

    async fn open_folder(&self, path: &str) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApiClient {
    base: Url,
    client: reqwest::Client,
}

impl ReqwestApiClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, ApiError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Appends percent-encoded path segments to the base url.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::new(FailureKind::InvalidUrl, self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<Value, ApiError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }

    async fn post(&self, url: Url, body: &impl serde::Serialize) -> Result<Value, ApiError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }
}

#[async_trait::async_trait]
impl ApiClient for ReqwestApiClient {
    async fn start_job(&self, request: &FullAutoRequest) -> Result<StartJobResponse, ApiError> {
        let url = self.endpoint(&["api", "full-auto"])?;
        decode(self.post(url, request).await?)
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, ApiError> {
        let url = self.endpoint(&["api", "job-status", job_id])?;
        decode(self.get(url).await?)
    }

    async fn list_files(&self, path: &str) -> Result<RemoteListing, ApiError> {
        let mut url = self.endpoint(&["api", "files"])?;
        if !path.is_empty() {
            url.query_pairs_mut().append_pair("path", path);
        }
        let response: FilesResponse = decode(self.get(url).await?)?;
        if !response.success {
            let message = response
                .error
                .unwrap_or_else(|| "directory listing refused".to_string());
            return Err(ApiError::new(FailureKind::Rejected, message));
        }
        Ok(RemoteListing {
            current_path: response.current_path.unwrap_or_default(),
            parent_path: response.parent_path.filter(|parent| !parent.is_empty()),
            entries: response.files,
        })
    }

    async fn call_action(
        &self,
        endpoint: &str,
        payload: &Value,
    ) -> Result<ActionResponse, ApiError> {
        let url = self.endpoint(&["api", endpoint.trim_start_matches('/')])?;
        let value = self.post(url, payload).await?;
        ActionResponse::from_value(value)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
    }

    async fn open_folder(&self, path: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "open-folder"])?;
        let value = self.post(url, &json!({ "path": path })).await?;
        match value.get("success").and_then(Value::as_bool) {
            Some(false) => {
                let message = ["message", "error"]
                    .into_iter()
                    .find_map(|key| value.get(key).and_then(Value::as_str))
                    .unwrap_or("open-folder refused");
                Err(ApiError::new(FailureKind::Rejected, message))
            }
            _ => Ok(()),
        }
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&bytes).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    if err.is_builder() {
        return ApiError::new(FailureKind::InvalidUrl, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
