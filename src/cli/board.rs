//! devboard board command implementations.

use crate::board::ColumnView;
use crate::cli::Context;
use crate::drag::DragEvent;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::sync::{BoardSession, SyncOutcome};

pub struct MoveOptions {
    pub active: String,
    pub over: String,
    pub below: bool,
}

#[derive(serde::Serialize)]
struct ShowReport {
    columns: Vec<ColumnView>,
}

#[derive(serde::Serialize)]
struct MoveReport {
    active: String,
    over: String,
    #[serde(flatten)]
    outcome: SyncOutcome,
    columns: Vec<ColumnView>,
}

pub(crate) async fn run_show(context: &Context) -> Result<()> {
    let client = context.client()?;
    let session = BoardSession::load(context.config.board.columns.clone(), &client).await?;
    let columns = session.column_view();

    let mut human = HumanOutput::new("devboard board");
    human.push_block(render_columns(&columns));

    emit_success(context.output, "board show", &ShowReport { columns }, Some(&human))
}

pub(crate) async fn run_move(context: &Context, options: MoveOptions) -> Result<()> {
    let client = context.client()?;
    let mut session = BoardSession::load(context.config.board.columns.clone(), &client).await?;

    if crate::task::task_index(&session.snapshot(), &options.active).is_none() {
        return Err(Error::TaskNotFound(options.active));
    }
    if crate::board::locate_container(session.columns(), &session.snapshot(), &options.over)
        .is_none()
    {
        return Err(Error::InvalidArgument(format!(
            "'{}' is neither a task nor a column",
            options.over
        )));
    }

    session.apply(DragEvent::Start {
        active_id: options.active.clone(),
    });
    session.apply(DragEvent::Over {
        over_id: options.over.clone(),
        pointer_below_midpoint: options.below,
    });
    session.apply(DragEvent::End {
        over_id: Some(options.over.clone()),
        pointer_below_midpoint: options.below,
    });

    let outcome = session.sync_with_backend(&client).await?;
    let columns = session.column_view();

    let header = match &outcome {
        SyncOutcome::Unchanged => "devboard board move: nothing to change",
        SyncOutcome::RolledBack { .. } => "devboard board move: rolled back",
        _ => "devboard board move: saved",
    };
    let mut human = HumanOutput::new(header);
    human.push_block(render_columns(&columns));
    if let SyncOutcome::RolledBack { reason } = &outcome {
        human.push_warning(format!("backend rejected the new order: {reason}"));
        human.push_warning("board reloaded from the backend".to_string());
    }

    emit_success(
        context.output,
        "board move",
        &MoveReport {
            active: options.active,
            over: options.over,
            outcome,
            columns,
        },
        Some(&human),
    )
}

fn render_columns(columns: &[ColumnView]) -> String {
    let mut lines = Vec::new();
    for view in columns {
        lines.push(format!("{} ({})", view.column.title, view.tasks.len()));
        if view.tasks.is_empty() {
            lines.push("  (empty)".to_string());
        }
        for task in &view.tasks {
            lines.push(format!("  {:>3}. {}  [{}]", task.order, task.title, task.id));
        }
    }
    lines.join("\n")
}
