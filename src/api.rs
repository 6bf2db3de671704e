//! Backend access: the `TaskSource` / `ActivitySource` seams and their
//! HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::activity::ActivityRecord;
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::task::{NewTask, Task, TaskOrder};

#[async_trait]
pub trait TaskSource: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<Task>>;
    async fn create_task(&self, task: &NewTask) -> Result<Task>;
    async fn delete_task(&self, id: &str) -> Result<()>;
    async fn reorder_tasks(&self, tasks: &[TaskOrder]) -> Result<()>;
}

#[async_trait]
pub trait ActivitySource: Send + Sync {
    async fn activity(&self, user: &str) -> Result<Vec<ActivityRecord>>;
}

/// Some deployments wrap collections in an object, others return them bare.
#[derive(Deserialize)]
#[serde(untagged)]
enum TaskList {
    Bare(Vec<Task>),
    Wrapped { tasks: Vec<Task> },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CreatedTask {
    Bare(Task),
    Wrapped { task: Task },
}

#[derive(Serialize)]
struct ReorderBody<'a> {
    tasks: &'a [TaskOrder],
}

/// reqwest-backed client for the task and activity endpoints.
pub struct HttpClient {
    base_url: Url,
    activity_path: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &ApiConfig, token: Option<String>) -> Result<Self> {
        let base_url = Url::parse(config.base_url.trim()).map_err(|err| {
            Error::InvalidConfig(format!("api.base_url '{}': {err}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidConfig(format!(
                "api.base_url '{}' cannot be used as a base",
                config.base_url
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            base_url,
            activity_path: config.activity_path.clone(),
            token: token.or_else(|| config.token.clone()),
            client,
        })
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn activity_endpoint(&self, user: &str) -> Url {
        let segments: Vec<&str> = self
            .activity_path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| if segment == "{user}" { user } else { segment })
            .collect();
        self.endpoint(&segments)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<reqwest::Response> {
        debug!(%method, %url, "backend request");
        let path = url.path().to_string();
        let mut request = self.client.request(method.clone(), url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(Error::Api {
            method: method.to_string(),
            path,
            status: status.as_u16(),
            message: message.trim().to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.send::<()>(Method::GET, url, None).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl TaskSource for HttpClient {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        let list: TaskList = self.get_json(self.endpoint(&["tasks"])).await?;
        Ok(match list {
            TaskList::Bare(tasks) | TaskList::Wrapped { tasks } => tasks,
        })
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task> {
        let response = self
            .send(Method::POST, self.endpoint(&["tasks"]), Some(task))
            .await?;
        let text = response.text().await?;
        let created: CreatedTask = serde_json::from_str(&text)?;
        Ok(match created {
            CreatedTask::Bare(task) | CreatedTask::Wrapped { task } => task,
        })
    }

    async fn delete_task(&self, id: &str) -> Result<()> {
        self.send::<()>(Method::DELETE, self.endpoint(&["tasks", id]), None)
            .await?;
        Ok(())
    }

    async fn reorder_tasks(&self, tasks: &[TaskOrder]) -> Result<()> {
        let body = ReorderBody { tasks };
        self.send(Method::PUT, self.endpoint(&["tasks", "reorder"]), Some(&body))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ActivitySource for HttpClient {
    async fn activity(&self, user: &str) -> Result<Vec<ActivityRecord>> {
        self.get_json(self.activity_endpoint(user)).await
    }
}
