//! Drag-gesture state machine.
//!
//! `Idle -> Dragging -> [Over]* -> Dropped -> Idle`, with `Cancel` (or an
//! `End` outside any target) going straight from `Dragging` back to `Idle`
//! and restoring the snapshot captured at `Start`.
//!
//! The state is a plain value: the host feeds an event plus the current
//! snapshot and gets back the next state and the snapshot to paint.

use tracing::debug;

use crate::board;
use crate::task::{snapshot, task_index, Column, Snapshot};

/// Events reported by the drag surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    Start {
        active_id: String,
    },
    Over {
        over_id: String,
        pointer_below_midpoint: bool,
    },
    End {
        over_id: Option<String>,
        pointer_below_midpoint: bool,
    },
    Cancel,
}

#[derive(Debug, Clone, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        active_id: String,
        /// Snapshot at `Start`, restored on cancel.
        origin: Snapshot,
        over: Option<String>,
    },
    /// Waiting for the backend to confirm or reject the drop.
    Dropped { active_id: String, changed: bool },
}

/// Result of feeding one event.
#[derive(Debug, Clone)]
pub struct DragStep {
    pub state: DragState,
    pub tasks: Snapshot,
    /// Set only on the transition into `Dropped` when the board changed.
    pub committed: bool,
}

impl DragState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DragState::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }

    pub fn active_id(&self) -> Option<&str> {
        match self {
            DragState::Idle => None,
            DragState::Dragging { active_id, .. } | DragState::Dropped { active_id, .. } => {
                Some(active_id)
            }
        }
    }

    /// Leave `Dropped` once the drop is reconciled or rolled back.
    pub fn settle(self) -> DragState {
        match self {
            DragState::Dropped { .. } => DragState::Idle,
            other => other,
        }
    }

    pub fn apply(self, columns: &[Column], tasks: &Snapshot, event: DragEvent) -> DragStep {
        match (self, event) {
            // A new gesture may start while an earlier drop awaits the backend.
            (DragState::Idle | DragState::Dropped { .. }, DragEvent::Start { active_id }) => {
                if task_index(tasks, &active_id).is_none() {
                    debug!(active_id = %active_id, "ignoring drag start for unknown task");
                    return unchanged(DragState::Idle, tasks);
                }
                unchanged(
                    DragState::Dragging {
                        active_id,
                        origin: tasks.clone(),
                        over: None,
                    },
                    tasks,
                )
            }

            (
                DragState::Dragging {
                    active_id, origin, ..
                },
                DragEvent::Over {
                    over_id,
                    pointer_below_midpoint,
                },
            ) => {
                let next = board::move_across_columns(
                    columns,
                    tasks,
                    &active_id,
                    &over_id,
                    pointer_below_midpoint,
                )
                .map(snapshot)
                .unwrap_or_else(|| tasks.clone());
                DragStep {
                    state: DragState::Dragging {
                        active_id,
                        origin,
                        over: Some(over_id),
                    },
                    tasks: next,
                    committed: false,
                }
            }

            (
                DragState::Dragging {
                    active_id, origin, ..
                },
                DragEvent::End {
                    over_id: Some(over_id),
                    pointer_below_midpoint,
                },
            ) => {
                let next = drop_onto(columns, tasks, &active_id, &over_id, pointer_below_midpoint)
                    .unwrap_or_else(|| tasks.clone());
                let changed = board::reorder_payload(&origin) != board::reorder_payload(&next);
                DragStep {
                    state: DragState::Dropped { active_id, changed },
                    tasks: next,
                    committed: changed,
                }
            }

            (DragState::Dragging { origin, .. }, DragEvent::End { over_id: None, .. })
            | (DragState::Dragging { origin, .. }, DragEvent::Cancel) => DragStep {
                state: DragState::Idle,
                tasks: origin,
                committed: false,
            },

            (state, event) => {
                debug!(?event, "ignoring drag event in current state");
                unchanged(state, tasks)
            }
        }
    }
}

fn unchanged(state: DragState, tasks: &Snapshot) -> DragStep {
    DragStep {
        state,
        tasks: tasks.clone(),
        committed: false,
    }
}

fn drop_onto(
    columns: &[Column],
    tasks: &Snapshot,
    active_id: &str,
    over_id: &str,
    is_below: bool,
) -> Option<Snapshot> {
    let from = board::locate_container(columns, tasks, active_id)?;
    let to = board::locate_container(columns, tasks, over_id)?;
    if from != to {
        return board::move_across_columns(columns, tasks, active_id, over_id, is_below)
            .map(snapshot);
    }

    // Over its own column's empty area: nothing to reorder.
    let over_index = task_index(tasks, over_id)?;
    let active_index = task_index(tasks, active_id)?;
    if active_index == over_index {
        return None;
    }
    let target = board::same_column_target(active_index, over_index, is_below);
    Some(snapshot(board::commit_order(tasks, active_index, target)))
}
