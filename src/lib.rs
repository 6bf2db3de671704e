//! devboard - task board and activity heatmap core
//!
//! This library provides the data engines behind a developer network's
//! personal task board and contribution heatmap, plus the `devboard` CLI
//! that drives them against the backend.
//!
//! # Core Concepts
//!
//! - **Board snapshots**: immutable task collections shared with renderers
//! - **Reconciliation**: optimistic drag reordering confirmed by one batch
//!   reorder call, with a whole-board refetch when the backend says no
//! - **Drag state machine**: `Idle -> Dragging -> Dropped -> Idle`
//! - **Dense activity series**: one slot per calendar day, zero-filled
//!
//! # Module Organization
//!
//! - `task`: Task, column and payload types
//! - `board`: Pure reorder operations over a snapshot
//! - `drag`: Drag-gesture state machine
//! - `sync`: Board session, backend sync and rollback
//! - `api`: Backend traits and the reqwest client
//! - `activity`: Heatmap windowing, bucketing and intensity levels
//! - `config`: Configuration loading from `.devboard.toml`
//! - `error`: Error types and result aliases
//! - `output`: Human and JSON command output
//! - `cli`: Command-line interface using clap

pub mod activity;
pub mod api;
pub mod board;
pub mod cli;
pub mod config;
pub mod drag;
pub mod error;
pub mod output;
pub mod sync;
pub mod task;

pub use error::{Error, Result};
