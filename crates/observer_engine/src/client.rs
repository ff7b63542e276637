use std::time::Duration;

use futures_util::StreamExt;
use observer_logging::observer_debug;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use url::{form_urlencoded, Url};

use crate::{FailureKind, FetchError, RegistryListing, ResultRecord, SubmitResponse};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Base URL of the session server (serves `/sessions`).
    pub server_url: String,
    /// Base URL of the execution worker (serves `/execute` and `/logs`).
    pub worker_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".to_string(),
            worker_url: "http://localhost:8081".to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            max_bytes: 8 * 1024 * 1024,
        }
    }
}

/// Remote operations the client depends on.
#[async_trait::async_trait]
pub trait WorkerApi: Send + Sync {
    async fn fetch_registry(&self) -> Result<RegistryListing, FetchError>;

    /// Returns the job id assigned by the worker.
    async fn submit(&self, session_id: &str, snippet: &str) -> Result<String, FetchError>;

    async fn fetch_results(&self, session_id: &str) -> Result<Vec<ResultRecord>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestWorkerClient {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestWorkerClient {
    pub fn new(settings: ClientSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, FetchError> {
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, content_len));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len));
            }
            body.extend_from_slice(&chunk);
        }

        serde_json::from_slice(&body)
            .map_err(|err| FetchError::new(FailureKind::Malformed, err.to_string()))
    }
}

#[async_trait::async_trait]
impl WorkerApi for ReqwestWorkerClient {
    async fn fetch_registry(&self) -> Result<RegistryListing, FetchError> {
        let url = endpoint(&self.settings.server_url, "sessions")?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        self.read_json(response).await
    }

    async fn submit(&self, session_id: &str, snippet: &str) -> Result<String, FetchError> {
        let url = endpoint(&self.settings.worker_url, "execute")?;
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("sessionID", session_id)
            .append_pair("snippet", snippet)
            .finish();
        observer_debug!(
            "POST {} session={} snippet_len={}",
            url,
            session_id,
            snippet.len()
        );

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let accepted: SubmitResponse = self.read_json(response).await?;
        if accepted.job_id.is_empty() {
            return Err(FetchError::new(FailureKind::Malformed, "empty JobID"));
        }
        Ok(accepted.job_id)
    }

    async fn fetch_results(&self, session_id: &str) -> Result<Vec<ResultRecord>, FetchError> {
        let mut url = endpoint(&self.settings.worker_url, "logs")?;
        url.query_pairs_mut().append_pair("sessionID", session_id);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        self.read_json(response).await
    }
}

fn endpoint(base: &str, path: &str) -> Result<Url, FetchError> {
    let mut base = Url::parse(base)
        .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path)
        .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
}

fn too_large(max_bytes: u64, actual: u64) -> FetchError {
    FetchError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return FetchError::new(FailureKind::Malformed, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_relative_to_base_path() {
        assert_eq!(
            endpoint("http://host:1/api", "logs").unwrap().as_str(),
            "http://host:1/api/logs"
        );
        assert_eq!(
            endpoint("http://host:1", "sessions").unwrap().as_str(),
            "http://host:1/sessions"
        );
    }

    #[test]
    fn endpoint_rejects_garbage_base() {
        let err = endpoint("not a url", "logs").unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }
}
