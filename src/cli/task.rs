//! devboard task command implementations.

use crate::cli::Context;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};
use crate::sync::{BoardSession, SyncOutcome};
use crate::task::Task;

#[derive(serde::Serialize)]
struct RemoveReport {
    id: String,
    #[serde(flatten)]
    outcome: SyncOutcome,
}

pub(crate) async fn run_new(context: &Context, title: &str, status: Option<&str>) -> Result<()> {
    let client = context.client()?;
    let columns = context.config.board.columns.clone();
    let status = match status {
        Some(status) => status.to_string(),
        None => columns
            .first()
            .map(|column| column.id.clone())
            .unwrap_or_default(),
    };

    let mut session = BoardSession::load(columns, &client).await?;
    let created: Task = session.add_task(&client, title, &status).await?;

    let mut human = HumanOutput::new(format!("devboard task new: {}", created.id));
    human.push_summary("title", created.title.clone());
    human.push_summary("status", created.status.clone());

    emit_success(context.output, "task new", &created, Some(&human))
}

pub(crate) async fn run_rm(context: &Context, id: &str) -> Result<()> {
    let client = context.client()?;
    let mut session = BoardSession::load(context.config.board.columns.clone(), &client).await?;
    let outcome = session.remove_task(&client, id).await?;

    let mut human = HumanOutput::new(format!("devboard task rm: {id}"));
    if let SyncOutcome::RolledBack { reason } = &outcome {
        human.push_warning(format!("delete rejected, board reloaded: {reason}"));
    }

    emit_success(
        context.output,
        "task rm",
        &RemoveReport {
            id: id.to_string(),
            outcome,
        },
        Some(&human),
    )
}
