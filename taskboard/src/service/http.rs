//! HTTP client for the remote task service.
//!
//! Talks JSON to the endpoints below, relative to a base URL such as
//! `http://127.0.0.1:8000/api/`:
//!
//! - `GET tasks`, `POST tasks`
//! - `PUT tasks/{id}`, `DELETE tasks/{id}`
//! - `GET health`
//!
//! Non-success statuses become [`ServiceError::Status`]; a 404 on an
//! id-addressed call becomes [`ServiceError::NotFound`].

use std::time::Duration;

use reqwest::StatusCode;
use taskboard_proto::api::{ErrorBody, HealthStatus};
use taskboard_proto::task::{NewTask, Task, TaskId, TaskPatch, TaskRecord};
use url::Url;

use super::{ServiceError, TaskService};

/// Transport settings for [`HttpTaskService`].
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Overall per-request timeout.
    pub request_timeout: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// [`TaskService`] backed by the remote HTTP API.
///
/// Holds one pooled [`reqwest::Client`]; cloning it is cheap.
#[derive(Debug, Clone)]
pub struct HttpTaskService {
    client: reqwest::Client,
    base: Url,
}

impl HttpTaskService {
    /// Creates a client with default transport settings.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidUrl`] if `base_url` does not parse, or
    /// [`ServiceError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        Self::with_config(base_url, &HttpConfig::default())
    }

    /// Creates a client with explicit transport settings.
    ///
    /// A missing trailing slash on the base path is added so that relative
    /// endpoint paths resolve under it.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidUrl`] if `base_url` does not parse, or
    /// [`ServiceError::Http`] if the HTTP client cannot be built.
    pub fn with_config(base_url: &str, config: &HttpConfig) -> Result<Self, ServiceError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self { client, base })
    }

    /// The normalized base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    /// Queries the service health endpoint.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the request fails or the service
    /// answers with a non-success status.
    pub async fn health(&self) -> Result<HealthStatus, ServiceError> {
        let url = self.base.join("health")?;
        let resp = self.client.get(url).send().await?;
        Ok(check(resp, None).await?.json().await?)
    }

    fn tasks_url(&self) -> Result<Url, ServiceError> {
        Ok(self.base.join("tasks")?)
    }

    fn task_url(&self, id: TaskId) -> Result<Url, ServiceError> {
        Ok(self.base.join(&format!("tasks/{id}"))?)
    }
}

impl TaskService for HttpTaskService {
    async fn list(&self) -> Result<Vec<Task>, ServiceError> {
        let resp = self.client.get(self.tasks_url()?).send().await?;
        let records: Vec<TaskRecord> = check(resp, None).await?.json().await?;
        tracing::debug!(count = records.len(), "fetched task list");
        records
            .into_iter()
            .map(|r| Task::try_from(r).map_err(ServiceError::from))
            .collect()
    }

    async fn create(&self, input: &NewTask) -> Result<Task, ServiceError> {
        let resp = self
            .client
            .post(self.tasks_url()?)
            .json(&input.to_request())
            .send()
            .await?;
        let record: TaskRecord = check(resp, None).await?.json().await?;
        tracing::debug!(task_id = %record.id, "task created remotely");
        Ok(Task::try_from(record)?)
    }

    async fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ServiceError> {
        let resp = self
            .client
            .put(self.task_url(id)?)
            .json(&patch.to_request())
            .send()
            .await?;
        let record: TaskRecord = check(resp, Some(id)).await?.json().await?;
        tracing::debug!(task_id = %id, status = record.status.as_wire(), "task updated remotely");
        Ok(Task::try_from(record)?)
    }

    async fn delete(&self, id: TaskId) -> Result<(), ServiceError> {
        let resp = self.client.delete(self.task_url(id)?).send().await?;
        check(resp, Some(id)).await?;
        tracing::debug!(task_id = %id, "task deleted remotely");
        Ok(())
    }
}

/// Turns a non-success response into a [`ServiceError`].
async fn check(
    resp: reqwest::Response,
    id: Option<TaskId>,
) -> Result<reqwest::Response, ServiceError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == StatusCode::NOT_FOUND
        && let Some(id) = id
    {
        return Err(ServiceError::NotFound(id));
    }
    let body = resp.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&body).map_or(body, |b| b.detail);
    Err(ServiceError::Status {
        status: status.as_u16(),
        detail,
    })
}
