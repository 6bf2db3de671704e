mod support;

use devboard::drag::DragEvent;
use devboard::error::Error;
use devboard::sync::{BoardSession, SyncOutcome};
use devboard::task::{Snapshot, TaskOrder};

use support::{columns, ids_in, orders_in, task, FakeSource};

fn drag(session: &mut BoardSession, active: &str, over: &str, below: bool) -> Snapshot {
    session.apply(DragEvent::Start {
        active_id: active.to_string(),
    });
    session.apply(DragEvent::Over {
        over_id: over.to_string(),
        pointer_below_midpoint: below,
    });
    session.apply(DragEvent::End {
        over_id: Some(over.to_string()),
        pointer_below_midpoint: below,
    })
}

fn three_todo() -> FakeSource {
    FakeSource::with_tasks(vec![task("a", "ToDo", 0), task("b", "ToDo", 1), task("c", "ToDo", 2)])
}

#[tokio::test]
async fn load_sorts_by_column_and_order() -> Result<(), Box<dyn std::error::Error>> {
    let source = FakeSource::with_tasks(vec![
        task("d", "Done", 0),
        task("b", "ToDo", 7),
        task("a", "ToDo", 2),
    ]);
    let session = BoardSession::load(columns(), &source).await?;

    let ids: Vec<String> = session.snapshot().iter().map(|t| t.id.clone()).collect();
    assert_eq!(ids, vec!["a", "b", "d"]);
    let view = session.column_view();
    assert_eq!(view.len(), 3);
    assert!(view[1].tasks.is_empty());
    Ok(())
}

#[tokio::test]
async fn successful_sync_sends_one_batch_and_confirms() -> Result<(), Box<dyn std::error::Error>> {
    let source = three_todo();
    let mut session = BoardSession::load(columns(), &source).await?;

    drag(&mut session, "c", "Done", false);
    assert!(session.is_dirty());

    let outcome = session.sync_with_backend(&source).await?;
    assert_eq!(outcome, SyncOutcome::Reconciled);
    assert!(!session.is_dirty());
    assert!(session.drag_state().is_idle());

    let sent = source.reorders();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0],
        vec![
            TaskOrder { id: "a".into(), status: "ToDo".into(), order: 0 },
            TaskOrder { id: "b".into(), status: "ToDo".into(), order: 1 },
            TaskOrder { id: "c".into(), status: "Done".into(), order: 0 },
        ]
    );
    assert_eq!(&*session.confirmed(), &*session.snapshot());
    Ok(())
}

#[tokio::test]
async fn nothing_to_sync_is_unchanged() -> Result<(), Box<dyn std::error::Error>> {
    let source = three_todo();
    let mut session = BoardSession::load(columns(), &source).await?;

    drag(&mut session, "a", "a", false);
    assert!(!session.is_dirty());
    assert_eq!(session.sync_with_backend(&source).await?, SyncOutcome::Unchanged);
    assert!(source.reorders().is_empty());
    Ok(())
}

#[tokio::test]
async fn rejected_sync_reloads_backend_state() -> Result<(), Box<dyn std::error::Error>> {
    let source = three_todo();
    let mut session = BoardSession::load(columns(), &source).await?;

    // Someone else closes `a` while we drag `c`.
    source.replace_tasks(vec![task("b", "ToDo", 0), task("c", "ToDo", 1), task("a", "Done", 0)]);
    source.fail_reorder(true);
    drag(&mut session, "c", "InProgress", false);

    let outcome = session.sync_with_backend(&source).await?;
    assert!(matches!(outcome, SyncOutcome::RolledBack { .. }));

    let board = session.snapshot();
    assert_eq!(ids_in(&board, "ToDo"), vec!["b", "c"]);
    assert_eq!(ids_in(&board, "Done"), vec!["a"]);
    assert!(ids_in(&board, "InProgress").is_empty());
    assert!(!session.is_dirty());
    assert!(!session.is_syncing());
    Ok(())
}

#[tokio::test]
async fn failed_reload_falls_back_to_last_confirmed() -> Result<(), Box<dyn std::error::Error>> {
    let source = three_todo();
    let mut session = BoardSession::load(columns(), &source).await?;

    drag(&mut session, "a", "Done", false);
    session.sync_with_backend(&source).await?;
    let confirmed = session.confirmed();

    source.fail_reorder(true);
    source.fail_list(true);
    drag(&mut session, "b", "InProgress", false);
    let outcome = session.sync_with_backend(&source).await?;

    assert!(matches!(outcome, SyncOutcome::RolledBack { .. }));
    assert_eq!(&*session.snapshot(), &*confirmed);
    assert_eq!(ids_in(&session.snapshot(), "Done"), vec!["a"]);
    Ok(())
}

#[tokio::test]
async fn second_sync_while_in_flight_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let source = three_todo();
    let mut session = BoardSession::load(columns(), &source).await?;

    drag(&mut session, "a", "Done", false);
    let ticket = session.begin_sync()?.expect("ticket");
    assert!(session.is_syncing());

    // A drop while the request is out is painted but not sent.
    drag(&mut session, "b", "InProgress", false);
    assert!(matches!(session.begin_sync(), Err(Error::SyncInFlight)));
    assert_eq!(ids_in(&session.snapshot(), "InProgress"), vec!["b"]);

    let outcome = session.finish_sync(ticket, Ok(()));
    assert_eq!(outcome, SyncOutcome::Reconciled);
    assert!(session.is_dirty());
    assert_eq!(ids_in(&session.confirmed(), "InProgress"), Vec::<String>::new());

    assert_eq!(session.sync_with_backend(&source).await?, SyncOutcome::Reconciled);
    assert_eq!(ids_in(&session.confirmed(), "InProgress"), vec!["b"]);
    Ok(())
}

#[tokio::test]
async fn result_after_detach_is_discarded() -> Result<(), Box<dyn std::error::Error>> {
    let source = three_todo();
    let mut session = BoardSession::load(columns(), &source).await?;

    drag(&mut session, "a", "Done", false);
    let before = session.confirmed();
    let ticket = session.begin_sync()?.expect("ticket");
    session.detach();

    assert_eq!(session.finish_sync(ticket, Ok(())), SyncOutcome::Discarded);
    assert_eq!(&*session.confirmed(), &*before);
    Ok(())
}

#[tokio::test]
async fn add_task_appends_to_column() -> Result<(), Box<dyn std::error::Error>> {
    let source = three_todo();
    let mut session = BoardSession::load(columns(), &source).await?;

    let created = session.add_task(&source, "  Review PR ", "ToDo").await?;
    assert_eq!(created.title, "Review PR");
    assert_eq!(ids_in(&session.snapshot(), "ToDo").last(), Some(&created.id));
    assert_eq!(orders_in(&session.snapshot(), "ToDo"), vec![0, 1, 2, 3]);

    let err = session
        .add_task(&source, "Elsewhere", "Backlog")
        .await
        .expect_err("unknown column");
    assert!(matches!(err, Error::UnknownColumn(_)));
    Ok(())
}

#[tokio::test]
async fn remove_task_rolls_back_when_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let source = three_todo();
    let mut session = BoardSession::load(columns(), &source).await?;

    assert_eq!(session.remove_task(&source, "b").await?, SyncOutcome::Reconciled);
    assert_eq!(ids_in(&session.snapshot(), "ToDo"), vec!["a", "c"]);
    assert_eq!(orders_in(&session.snapshot(), "ToDo"), vec![0, 1]);

    source.fail_delete(true);
    let outcome = session.remove_task(&source, "a").await?;
    assert!(matches!(outcome, SyncOutcome::RolledBack { .. }));
    assert_eq!(ids_in(&session.snapshot(), "ToDo"), vec!["a", "c"]);

    let err = session.remove_task(&source, "zzz").await.expect_err("missing");
    assert!(matches!(err, Error::TaskNotFound(_)));
    Ok(())
}

#[tokio::test]
async fn sync_during_hover_sends_last_drop_only() -> Result<(), Box<dyn std::error::Error>> {
    let source = three_todo();
    let mut session = BoardSession::load(columns(), &source).await?;

    drag(&mut session, "a", "Done", false);
    session.apply(DragEvent::Start {
        active_id: "b".to_string(),
    });
    session.apply(DragEvent::Over {
        over_id: "InProgress".to_string(),
        pointer_below_midpoint: false,
    });
    assert_eq!(ids_in(&session.snapshot(), "InProgress"), vec!["b"]);

    assert_eq!(session.sync_with_backend(&source).await?, SyncOutcome::Reconciled);
    let sent = source.reorders();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains(&TaskOrder { id: "b".into(), status: "ToDo".into(), order: 0 }));
    assert!(sent[0].iter().all(|order| order.status != "InProgress"));
    assert!(ids_in(&session.confirmed(), "InProgress").is_empty());
    assert!(session.drag_state().is_dragging());

    session.apply(DragEvent::Cancel);
    assert!(ids_in(&session.snapshot(), "InProgress").is_empty());
    assert_eq!(ids_in(&session.snapshot(), "Done"), vec!["a"]);
    assert!(!session.is_dirty());
    Ok(())
}

#[tokio::test]
async fn create_and_delete_wait_for_in_flight_sync() -> Result<(), Box<dyn std::error::Error>> {
    let source = three_todo();
    let mut session = BoardSession::load(columns(), &source).await?;

    drag(&mut session, "c", "Done", false);
    let ticket = session.begin_sync()?.expect("ticket");

    let err = session.add_task(&source, "Late", "ToDo").await.expect_err("busy");
    assert!(matches!(err, Error::SyncInFlight));
    let err = session.remove_task(&source, "a").await.expect_err("busy");
    assert!(matches!(err, Error::SyncInFlight));
    assert_eq!(source.tasks().len(), 3);
    assert_eq!(ids_in(&session.snapshot(), "ToDo"), vec!["a", "b"]);

    assert_eq!(session.finish_sync(ticket, Ok(())), SyncOutcome::Reconciled);
    assert_eq!(ids_in(&session.confirmed(), "ToDo"), vec!["a", "b"]);
    assert_eq!(ids_in(&session.confirmed(), "Done"), vec!["c"]);

    let created = session.add_task(&source, "Late", "ToDo").await?;
    assert_eq!(ids_in(&session.confirmed(), "ToDo").last(), Some(&created.id));
    Ok(())
}
