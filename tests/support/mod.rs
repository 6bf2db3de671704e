#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use devboard::api::TaskSource;
use devboard::error::{Error, Result};
use devboard::task::{Column, NewTask, Task, TaskOrder};

pub fn columns() -> Vec<Column> {
    vec![
        Column::new("ToDo", "To Do"),
        Column::new("InProgress", "In Progress"),
        Column::new("Done", "Done"),
    ]
}

pub fn task(id: &str, status: &str, order: i64) -> Task {
    Task::new(id, id.to_uppercase(), status).with_order(order)
}

pub fn ids_in(tasks: &[Task], status: &str) -> Vec<String> {
    tasks
        .iter()
        .filter(|task| task.status == status)
        .map(|task| task.id.clone())
        .collect()
}

pub fn orders_in(tasks: &[Task], status: &str) -> Vec<i64> {
    tasks
        .iter()
        .filter(|task| task.status == status)
        .map(|task| task.order)
        .collect()
}

#[derive(Default)]
struct State {
    tasks: Vec<Task>,
    reorders: Vec<Vec<TaskOrder>>,
    fail_reorder: bool,
    fail_list: bool,
    fail_delete: bool,
    next_id: u32,
}

/// In-memory backend with switchable failures.
#[derive(Default)]
pub struct FakeSource {
    state: Mutex<State>,
}

impl FakeSource {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let source = Self::default();
        source.state.lock().expect("lock").tasks = tasks;
        source
    }

    /// Simulate another client editing the board.
    pub fn replace_tasks(&self, tasks: Vec<Task>) {
        self.state.lock().expect("lock").tasks = tasks;
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().expect("lock").tasks.clone()
    }

    pub fn reorders(&self) -> Vec<Vec<TaskOrder>> {
        self.state.lock().expect("lock").reorders.clone()
    }

    pub fn fail_reorder(&self, fail: bool) {
        self.state.lock().expect("lock").fail_reorder = fail;
    }

    pub fn fail_list(&self, fail: bool) {
        self.state.lock().expect("lock").fail_list = fail;
    }

    pub fn fail_delete(&self, fail: bool) {
        self.state.lock().expect("lock").fail_delete = fail;
    }
}

fn rejected(method: &str, path: &str) -> Error {
    Error::Api {
        method: method.to_string(),
        path: path.to_string(),
        status: 500,
        message: "boom".to_string(),
    }
}

#[async_trait]
impl TaskSource for FakeSource {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        let state = self.state.lock().expect("lock");
        if state.fail_list {
            return Err(rejected("GET", "/tasks"));
        }
        Ok(state.tasks.clone())
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task> {
        let mut state = self.state.lock().expect("lock");
        state.next_id += 1;
        let order = state
            .tasks
            .iter()
            .filter(|existing| existing.status == task.status)
            .count() as i64;
        let created = Task::new(format!("new-{}", state.next_id), &task.title, &task.status)
            .with_order(order);
        state.tasks.push(created.clone());
        Ok(created)
    }

    async fn delete_task(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock().expect("lock");
        if state.fail_delete {
            return Err(rejected("DELETE", "/tasks/{id}"));
        }
        state.tasks.retain(|task| task.id != id);
        Ok(())
    }

    async fn reorder_tasks(&self, tasks: &[TaskOrder]) -> Result<()> {
        let mut state = self.state.lock().expect("lock");
        state.reorders.push(tasks.to_vec());
        if state.fail_reorder {
            return Err(rejected("PUT", "/tasks/reorder"));
        }
        for entry in tasks {
            if let Some(task) = state.tasks.iter_mut().find(|task| task.id == entry.id) {
                task.status = entry.status.clone();
                task.order = entry.order;
            }
        }
        Ok(())
    }
}
