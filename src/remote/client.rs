use crate::app_config::AppConfig;
use crate::domain::{AviaryStatus, Backend, Editable, Resource};
use crate::remote::list_response::ListResponse;
use crate::remote::source::{Fetch, PageRequest, Persist, StatusSource};
use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

pub fn new_client() -> Result<Client, RemoteError> {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

    let client = Client::builder().default_headers(headers).build()?;
    Ok(client)
}

/// HTTP access to the management and telemetry APIs.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: Client,
    management_url: String,
    telemetry_url: String,
}

impl RemoteClient {
    pub fn new(config: &AppConfig) -> Result<Self, RemoteError> {
        Ok(RemoteClient {
            http: new_client()?,
            management_url: config.api().management_url().to_string(),
            telemetry_url: config.api().telemetry_url().to_string(),
        })
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub fn base_url(&self, backend: Backend) -> &str {
        match backend {
            Backend::Management => &self.management_url,
            Backend::Telemetry => &self.telemetry_url,
        }
    }

    pub fn url(&self, backend: Backend, path: &str) -> String {
        format!("{}/{}", self.base_url(backend), path.trim_start_matches('/'))
    }

    /// URL of one record, with `id` percent-encoded as a single path segment.
    pub fn record_url(&self, backend: Backend, path: &str, id: &str) -> Result<Url, RemoteError> {
        let base = self.url(backend, path);
        let mut url = Url::parse(&base).map_err(|e| RemoteError::InvalidUrl(format!("{}: {}", base, e)))?;
        url.path_segments_mut()
            .map_err(|_| RemoteError::InvalidUrl(base.clone()))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    fn authorize(request: RequestBuilder, token: Option<&str>) -> Result<RequestBuilder, RemoteError> {
        match token {
            Some(token) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", token))?;
                value.set_sensitive(true);
                Ok(request.header(header::AUTHORIZATION, value))
            }
            None => Ok(request),
        }
    }

    async fn execute(request: RequestBuilder) -> Result<Response, RemoteError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match body.trim() {
            "" => format!("request failed with status {}", status),
            text => text.to_string(),
        };
        warn!(status_code = %status, "⚠️ Request failed: {}", message);
        Err(RemoteError::Status { status, message })
    }

    /// GETs `path` on `backend` and decodes the body.
    #[instrument(skip(self, token))]
    pub async fn get_json<T: DeserializeOwned>(&self, backend: Backend, path: &str, token: Option<&str>) -> Result<T, RemoteError> {
        let request = Self::authorize(self.http.get(self.url(backend, path)), token)?;
        let body = Self::execute(request).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    // Write responses may be empty or carry something other than the record
    async fn stored_record<R: Resource>(response: Response) -> Result<Option<R>, RemoteError> {
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<R>(&body) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                debug!(resource = R::SCHEMA.path, "Response is not a {}: {}", R::SCHEMA.noun(), e);
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl<R: Resource> Fetch<R> for RemoteClient {
    #[instrument(skip(self, token), fields(resource = R::SCHEMA.path))]
    async fn list(&self, token: Option<&str>, page: PageRequest) -> Result<Vec<R>, RemoteError> {
        info!("🌐 Fetching {}...", R::SCHEMA.plural);
        let request = self
            .http
            .get(self.url(R::SCHEMA.backend, R::SCHEMA.path))
            .query(&[("page", page.page), ("size", page.size)]);

        let body = Self::execute(Self::authorize(request, token)?).await?.text().await?;
        let records = serde_json::from_str::<ListResponse<R>>(&body)?.into_records();
        info!("🌐 Fetching {}... OK, {} found", R::SCHEMA.plural, records.len());

        Ok(records)
    }
}

#[async_trait]
impl<R: Editable> Persist<R> for RemoteClient {
    #[instrument(skip_all, fields(resource = R::SCHEMA.path))]
    async fn create(&self, token: &str, payload: &R::Payload) -> Result<Option<R>, RemoteError> {
        let request = self.http.post(self.url(R::SCHEMA.backend, R::SCHEMA.path)).json(payload);
        let response = Self::execute(Self::authorize(request, Some(token))?).await?;
        Self::stored_record(response).await
    }

    #[instrument(skip(self, token, payload), fields(resource = R::SCHEMA.path))]
    async fn update(&self, token: &str, id: &str, payload: &R::Payload) -> Result<Option<R>, RemoteError> {
        let request = self.http.put(self.record_url(R::SCHEMA.backend, R::SCHEMA.path, id)?).json(payload);
        let response = Self::execute(Self::authorize(request, Some(token))?).await?;
        Self::stored_record(response).await
    }

    #[instrument(skip(self, token), fields(resource = R::SCHEMA.path))]
    async fn delete(&self, token: &str, id: &str) -> Result<(), RemoteError> {
        let request = self.http.delete(self.record_url(R::SCHEMA.backend, R::SCHEMA.path, id)?);
        Self::execute(Self::authorize(request, Some(token))?).await?;
        Ok(())
    }
}

#[async_trait]
impl StatusSource for RemoteClient {
    async fn aviary_status(&self, token: Option<&str>) -> Result<AviaryStatus, RemoteError> {
        self.get_json(Backend::Management, "aviario/status", token).await
    }
}

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid header value: {0}")]
    InvalidHeaderValue(#[from] header::InvalidHeaderValue),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("{message}")]
    Status { status: StatusCode, message: String },
    #[error("unable to decode the response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RemoteError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            RemoteError::Request(e) => e.status(),
            _ => None,
        }
    }
}
