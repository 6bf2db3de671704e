//! Task board data model.
//!
//! Tasks and columns mirror the backend's JSON shape (camelCase keys).
//! A board snapshot is an `Arc<[Task]>` so renderers can keep reading an
//! older snapshot while the reconciler produces a new one.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shared, immutable board snapshot.
pub type Snapshot = Arc<[Task]>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    pub status: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status: status.into(),
            order: 0,
            created_at: None,
        }
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }
}

/// A workflow stage. Columns are supplied by configuration and never
/// created or destroyed by the reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
}

impl Column {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// One entry of the `PUT /tasks/reorder` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOrder {
    pub id: String,
    pub status: String,
    pub order: i64,
}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub status: String,
}

impl NewTask {
    /// Build a create request, rejecting blank titles.
    pub fn new(title: &str, status: &str) -> crate::error::Result<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(crate::error::Error::InvalidArgument(
                "task title cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            title: title.to_string(),
            status: status.trim().to_string(),
        })
    }
}

pub fn column_rank(columns: &[Column], status: &str) -> usize {
    columns
        .iter()
        .position(|column| column.id == status)
        .unwrap_or(columns.len())
}

pub fn is_column(columns: &[Column], id: &str) -> bool {
    columns.iter().any(|column| column.id == id)
}

pub fn find_task<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    tasks.iter().find(|task| task.id == id)
}

pub fn task_index(tasks: &[Task], id: &str) -> Option<usize> {
    tasks.iter().position(|task| task.id == id)
}

pub fn snapshot(tasks: Vec<Task>) -> Snapshot {
    Arc::from(tasks)
}
