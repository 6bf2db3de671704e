//! Optimistic board session.
//!
//! `BoardSession` owns two snapshots: the last one the backend confirmed
//! and the one currently painted. Drag events update the painted snapshot
//! immediately; a drop that changes the board marks it dirty, and the next
//! sync sends the whole ordering in one `PUT /tasks/reorder`.
//!
//! Only one sync may be outstanding. A failed sync is never retried: the
//! session refetches the whole board instead, and if that also fails it
//! falls back to the last confirmed snapshot.

use serde::Serialize;
use tracing::{debug, info, warn};
use ulid::Ulid;

use crate::api::TaskSource;
use crate::board::{self, ColumnView};
use crate::drag::{DragEvent, DragState};
use crate::error::{Error, Result};
use crate::task::{is_column, snapshot, task_index, Column, NewTask, Snapshot, Task, TaskOrder};

/// One outstanding reorder request.
#[derive(Debug, Clone)]
pub struct SyncTicket {
    pub id: Ulid,
    pub payload: Vec<TaskOrder>,
    epoch: u64,
    sent: Snapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Nothing to send.
    Unchanged,
    /// Backend accepted the ordering.
    Reconciled,
    /// Backend rejected it; the caller must reload.
    RollbackRequired { reason: String },
    /// Backend rejected it and the board was reloaded.
    RolledBack { reason: String },
    /// The result arrived after the session was detached or reloaded.
    Discarded,
}

pub struct BoardSession {
    columns: Vec<Column>,
    confirmed: Snapshot,
    current: Snapshot,
    drag: DragState,
    dirty: bool,
    in_flight: bool,
    epoch: u64,
}

impl BoardSession {
    pub fn new(columns: Vec<Column>, tasks: Vec<Task>) -> Self {
        let tasks = snapshot(board::normalize(&columns, tasks));
        Self {
            columns,
            confirmed: tasks.clone(),
            current: tasks,
            drag: DragState::Idle,
            dirty: false,
            in_flight: false,
            epoch: 0,
        }
    }

    /// Fetch the board and start a session over it.
    pub async fn load(columns: Vec<Column>, source: &dyn TaskSource) -> Result<Self> {
        let tasks = source.list_tasks().await?;
        debug!(count = tasks.len(), "loaded board");
        Ok(Self::new(columns, tasks))
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Snapshot to paint.
    pub fn snapshot(&self) -> Snapshot {
        self.current.clone()
    }

    /// Last snapshot the backend confirmed.
    pub fn confirmed(&self) -> Snapshot {
        self.confirmed.clone()
    }

    pub fn column_view(&self) -> Vec<ColumnView> {
        board::column_view(&self.columns, &self.current)
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_syncing(&self) -> bool {
        self.in_flight
    }

    /// Feed a drag event and return the snapshot to paint.
    pub fn apply(&mut self, event: DragEvent) -> Snapshot {
        let state = std::mem::take(&mut self.drag);
        let step = state.apply(&self.columns, &self.current, event);
        self.current = step.tasks;
        if step.committed {
            self.dirty = true;
        }
        self.drag = match step.state {
            DragState::Dropped { changed: false, .. } => DragState::Idle,
            other => other,
        };
        self.current.clone()
    }

    /// Claim the in-flight slot and build the reorder payload.
    ///
    /// Returns `Ok(None)` when there is nothing to send. Drops made while a
    /// ticket is outstanding stay dirty and go out with the next sync.
    pub fn begin_sync(&mut self) -> Result<Option<SyncTicket>> {
        if self.in_flight {
            return Err(Error::SyncInFlight);
        }
        if !self.dirty {
            self.drag = std::mem::take(&mut self.drag).settle();
            return Ok(None);
        }

        // A hover that has not been dropped never goes to the backend.
        let settled = match &self.drag {
            DragState::Dragging { origin, .. } => origin.clone(),
            _ => self.current.clone(),
        };
        let sent = snapshot(board::renumber(&settled));
        let ticket = SyncTicket {
            id: Ulid::new(),
            payload: board::reorder_payload(&sent),
            epoch: self.epoch,
            sent,
        };
        self.in_flight = true;
        self.dirty = false;
        debug!(sync_id = %ticket.id, tasks = ticket.payload.len(), "sync started");
        Ok(Some(ticket))
    }

    /// Record the backend's answer for `ticket`.
    pub fn finish_sync(&mut self, ticket: SyncTicket, result: Result<()>) -> SyncOutcome {
        if ticket.epoch != self.epoch {
            debug!(sync_id = %ticket.id, "discarding stale sync result");
            return SyncOutcome::Discarded;
        }
        self.in_flight = false;

        match result {
            Ok(()) => {
                info!(sync_id = %ticket.id, "board reconciled");
                self.confirmed = ticket.sent;
                if !self.dirty {
                    self.drag = std::mem::take(&mut self.drag).settle();
                }
                SyncOutcome::Reconciled
            }
            Err(err) => {
                warn!(sync_id = %ticket.id, remote = err.is_remote(), error = %err, "board sync failed");
                SyncOutcome::RollbackRequired {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Send pending changes; on rejection reload the whole board.
    pub async fn sync_with_backend(&mut self, source: &dyn TaskSource) -> Result<SyncOutcome> {
        let Some(ticket) = self.begin_sync()? else {
            return Ok(SyncOutcome::Unchanged);
        };
        let result = source.reorder_tasks(&ticket.payload).await;
        match self.finish_sync(ticket, result) {
            SyncOutcome::RollbackRequired { reason } => {
                if let Err(err) = self.reload(source).await {
                    warn!(error = %err, "reload after failed sync failed; kept last confirmed board");
                }
                Ok(SyncOutcome::RolledBack { reason })
            }
            outcome => Ok(outcome),
        }
    }

    /// Replace both snapshots with a fresh copy of the backend board.
    ///
    /// Any outstanding sync result is discarded. If the fetch fails the
    /// painted board reverts to the last confirmed snapshot.
    pub async fn reload(&mut self, source: &dyn TaskSource) -> Result<()> {
        self.epoch += 1;
        self.in_flight = false;
        self.dirty = false;
        self.drag = DragState::Idle;

        match source.list_tasks().await {
            Ok(tasks) => {
                let fresh = snapshot(board::normalize(&self.columns, tasks));
                info!(count = fresh.len(), "board reloaded");
                self.confirmed = fresh.clone();
                self.current = fresh;
                Ok(())
            }
            Err(err) => {
                self.current = self.confirmed.clone();
                Err(err)
            }
        }
    }

    /// Stop accepting results, as when the hosting view goes away.
    pub fn detach(&mut self) {
        self.epoch += 1;
        self.in_flight = false;
    }

    /// Create a task and append it to the end of its column.
    ///
    /// Refused while a reorder is outstanding, since the confirmed board is
    /// replaced by the ticket's snapshot when it lands.
    pub async fn add_task(
        &mut self,
        source: &dyn TaskSource,
        title: &str,
        status: &str,
    ) -> Result<Task> {
        if self.in_flight {
            return Err(Error::SyncInFlight);
        }
        let request = NewTask::new(title, status)?;
        if !is_column(&self.columns, &request.status) {
            return Err(Error::UnknownColumn(request.status));
        }

        let created = source.create_task(&request).await?;
        self.confirmed = append(&self.confirmed, created.clone());
        self.current = append(&self.current, created.clone());
        Ok(created)
    }

    /// Remove a task optimistically; a rejected delete reloads the board.
    pub async fn remove_task(&mut self, source: &dyn TaskSource, id: &str) -> Result<SyncOutcome> {
        if self.in_flight {
            return Err(Error::SyncInFlight);
        }
        if task_index(&self.current, id).is_none() {
            return Err(Error::TaskNotFound(id.to_string()));
        }
        self.current = without(&self.current, id);

        match source.delete_task(id).await {
            Ok(()) => {
                self.confirmed = without(&self.confirmed, id);
                Ok(SyncOutcome::Reconciled)
            }
            Err(err) => {
                warn!(task_id = id, error = %err, "delete failed");
                if let Err(reload_err) = self.reload(source).await {
                    warn!(error = %reload_err, "reload after failed delete failed");
                }
                Ok(SyncOutcome::RolledBack {
                    reason: err.to_string(),
                })
            }
        }
    }
}

fn append(tasks: &[Task], task: Task) -> Snapshot {
    let mut next = tasks.to_vec();
    next.push(task);
    snapshot(board::renumber(&next))
}

fn without(tasks: &[Task], id: &str) -> Snapshot {
    let next: Vec<Task> = tasks.iter().filter(|task| task.id != id).cloned().collect();
    snapshot(board::renumber(&next))
}
