//! Store tests against an in-memory SQLite datastore and a datastore that
//! always fails.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::domain::*;
use crate::remote::Datastore;
use crate::repository::{init_db, LocalDatastore, Repository};
use super::*;

struct FailingDatastore {
    calls: AtomicUsize,
}

#[async_trait]
impl Datastore for FailingDatastore {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn load(&self) -> DomainResult<Snapshot> {
        Err(DomainError::Internal("offline".to_string()))
    }

    async fn upsert(&self, _record: &Record) -> DomainResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(DomainError::Internal("offline".to_string()))
    }

    async fn delete(&self, _table: Table, _ids: &[String]) -> DomainResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(DomainError::Internal("offline".to_string()))
    }

    async fn delete_by_list(&self, _table: Table, _list_id: &str) -> DomainResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(DomainError::Internal("offline".to_string()))
    }
}

async fn setup_store() -> (TaskStore, Arc<LocalDatastore>) {
    setup_store_with(Arc::new(AlwaysConfirm)).await
}

async fn setup_store_with(confirm: Arc<dyn Confirm>) -> (TaskStore, Arc<LocalDatastore>) {
    let db = init_db(Path::new(":memory:")).await.expect("Failed to init test DB");
    let local = Arc::new(LocalDatastore::new(&db));
    let store = TaskStore::new(local.clone(), confirm);
    store.fetch_all().await.expect("fetch");
    (store, local)
}

#[tokio::test]
async fn test_fetch_all_marks_initialized() {
    let db = init_db(Path::new(":memory:")).await.unwrap();
    let local = Arc::new(LocalDatastore::new(&db));
    let store = TaskStore::new(local, Arc::new(AlwaysConfirm));
    assert!(!store.is_initialized().await);
    store.fetch_all().await.unwrap();
    assert!(store.is_initialized().await);
}

#[tokio::test]
async fn test_add_task_defaults_and_creates_missing_tags() {
    let (store, local) = setup_store().await;
    store.add_tag("work").await.unwrap();

    let task = store
        .add_task("  Write report ", None, None, vec!["work".to_string(), "#urgent".to_string()])
        .await
        .unwrap();

    assert_eq!(task.title, "Write report");
    assert_eq!(task.priority, Priority::None);
    assert!(!task.is_completed);
    assert!(task.subtasks.is_empty());
    assert_eq!(task.tags, vec!["work", "urgent"]);

    let tags: Vec<String> = store.tags().await.into_iter().map(|t| t.name).collect();
    assert_eq!(tags, vec!["work", "urgent"]);

    let persisted = local.load().await.unwrap();
    assert_eq!(persisted.tasks, vec![task]);
    assert_eq!(persisted.tags.len(), 2);
}

#[tokio::test]
async fn test_blank_titles_are_rejected() {
    let (store, _) = setup_store().await;
    assert!(matches!(store.add_task("   ", None, None, vec![]).await, Err(DomainError::InvalidInput(_))));
    assert!(matches!(store.add_list("", ListKind::Task).await, Err(DomainError::InvalidInput(_))));
    assert!(matches!(store.add_tag("#").await, Err(DomainError::InvalidInput(_))));
    assert!(matches!(store.add_note(" ", None).await, Err(DomainError::InvalidInput(_))));
    assert!(store.tasks().await.is_empty());
}

#[tokio::test]
async fn test_add_task_to_unknown_list_fails() {
    let (store, _) = setup_store().await;
    let err = store.add_task("t", None, Some("nope".to_string()), vec![]).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_update_and_toggle_task() {
    let (store, local) = setup_store().await;
    let task = store.add_task("Draft", None, None, vec![]).await.unwrap();
    let due = Utc::now() + Duration::days(2);

    let updated = store
        .update_task(
            &task.id,
            TaskPatch {
                title: Some("Final".to_string()),
                priority: Some(Priority::High),
                due_date: Some(Some(due)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Final");
    assert_eq!(updated.priority, Priority::High);

    let toggled = store.toggle_task(&task.id).await.unwrap();
    assert!(toggled.is_completed);
    let toggled = store.toggle_task(&task.id).await.unwrap();
    assert!(!toggled.is_completed);

    let persisted = local.tasks.find_by_id(&task.id).await.unwrap().unwrap();
    assert_eq!(persisted.title, "Final");
    assert_eq!(persisted.due_date, Some(due));
}

#[tokio::test]
async fn test_update_unknown_task_is_not_found() {
    let (store, _) = setup_store().await;
    let err = store.toggle_task("missing").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_task_moves_it_to_trash() {
    let (store, local) = setup_store().await;
    let task = store.add_task("Old", None, None, vec![]).await.unwrap();

    assert!(store.delete_task(&task.id).await.unwrap());

    assert!(store.tasks().await.is_empty());
    let trash = store.trash().await;
    assert_eq!(trash.len(), 1);
    assert_eq!(trash[0].payload, TrashPayload::Task(task));

    let persisted = local.load().await.unwrap();
    assert!(persisted.tasks.is_empty());
    assert_eq!(persisted.trash.len(), 1);
}

#[tokio::test]
async fn test_declined_confirmation_changes_nothing() {
    let (store, local) = setup_store_with(Arc::new(NeverConfirm)).await;
    let task = store.add_task("Keep me", None, None, vec![]).await.unwrap();
    let tag = store.add_tag("keep").await.unwrap();

    assert!(!store.delete_task(&task.id).await.unwrap());
    assert!(!store.delete_tag(&tag.id).await.unwrap());
    assert_eq!(store.empty_trash().await.unwrap(), None);

    assert_eq!(store.tasks().await.len(), 1);
    assert_eq!(store.tags().await.len(), 1);
    assert!(store.trash().await.is_empty());
    assert_eq!(local.load().await.unwrap().tasks.len(), 1);
}

#[tokio::test]
async fn test_confirm_sees_prompt() {
    let seen = Arc::new(std::sync::Mutex::new(Vec::<String>::new()));
    let sink = seen.clone();
    let confirm = move |prompt: &str| {
        sink.lock().unwrap().push(prompt.to_string());
        true
    };
    let (store, _) = setup_store_with(Arc::new(confirm)).await;
    let tag = store.add_tag("errands").await.unwrap();
    store.delete_tag(&tag.id).await.unwrap();

    let prompts = seen.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("#errands"));
}

#[tokio::test]
async fn test_delete_list_cascades_into_separate_trash_items() {
    let (store, local) = setup_store().await;
    let work = store.add_list("Work", ListKind::Task).await.unwrap();
    let other = store.add_list("Other", ListKind::Task).await.unwrap();
    store.add_task("a", None, Some(work.id.clone()), vec![]).await.unwrap();
    store.add_task("b", None, Some(work.id.clone()), vec![]).await.unwrap();
    let survivor = store.add_task("c", None, Some(other.id.clone()), vec![]).await.unwrap();
    store.add_note("n", Some(work.id.clone())).await.unwrap();

    assert!(store.delete_list(&work.id).await.unwrap());

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.lists, vec![other]);
    assert_eq!(snapshot.tasks, vec![survivor]);
    assert!(snapshot.notes.is_empty());

    let mut kinds: Vec<TrashKind> = snapshot.trash.iter().map(|t| t.kind()).collect();
    kinds.sort_by_key(|k| k.to_string());
    assert_eq!(kinds, vec![TrashKind::List, TrashKind::Note, TrashKind::Task, TrashKind::Task]);

    let persisted = local.load().await.unwrap();
    assert_eq!(persisted.tasks.len(), 1);
    assert!(persisted.notes.is_empty());
    assert_eq!(persisted.lists.len(), 1);
    assert_eq!(persisted.trash.len(), 4);
}

#[tokio::test]
async fn test_add_tag_is_idempotent() {
    let (store, local) = setup_store().await;
    let first = store.add_tag("home").await.unwrap();
    let second = store.add_tag(" #home ").await.unwrap();
    assert_eq!(first, second);
    assert_eq!(store.tags().await.len(), 1);
    assert_eq!(local.load().await.unwrap().tags.len(), 1);
}

#[tokio::test]
async fn test_delete_tag_strips_name_from_tasks() {
    let (store, local) = setup_store().await;
    let tagged = store
        .add_task("a", None, None, vec!["urgent".to_string(), "home".to_string()])
        .await
        .unwrap();
    let untouched = store.add_task("b", None, None, vec!["home".to_string()]).await.unwrap();
    let tag = store.snapshot().await.tag_by_name("urgent").cloned().unwrap();

    assert!(store.delete_tag(&tag.id).await.unwrap());

    assert_eq!(store.task(&tagged.id).await.unwrap().tags, vec!["home"]);
    assert_eq!(store.task(&untouched.id).await.unwrap().tags, vec!["home"]);
    assert!(store.snapshot().await.tag_by_name("urgent").is_none());

    let persisted = local.tasks.find_by_id(&tagged.id).await.unwrap().unwrap();
    assert_eq!(persisted.tags, vec!["home"]);
}

#[tokio::test]
async fn test_assign_and_remove_tag() {
    let (store, _) = setup_store().await;
    let task = store.add_task("t", None, None, vec![]).await.unwrap();

    let task = store.assign_tag_to_task(&task.id, "focus").await.unwrap();
    assert_eq!(task.tags, vec!["focus"]);
    assert!(store.snapshot().await.tag_by_name("focus").is_some());

    // Assigning again is a no-op
    let task = store.assign_tag_to_task(&task.id, "#focus").await.unwrap();
    assert_eq!(task.tags, vec!["focus"]);

    let task = store.remove_tag_from_task(&task.id, "focus").await.unwrap();
    assert!(task.tags.is_empty());
    // The tag itself survives
    assert!(store.snapshot().await.tag_by_name("focus").is_some());
}

#[tokio::test]
async fn test_subtasks() {
    let (store, _) = setup_store().await;
    let task = store.add_task("Trip", None, None, vec![]).await.unwrap();

    let pack = store.add_subtask(&task.id, "Pack").await.unwrap();
    let book = store.add_subtask(&task.id, "Book hotel").await.unwrap();

    let task = store.toggle_subtask(&task.id, &pack.id).await.unwrap();
    assert_eq!(task.subtask_progress(), (1, 2));

    assert!(store.delete_subtask(&task.id, &book.id).await.unwrap());
    let task = store.task(&task.id).await.unwrap();
    assert_eq!(task.subtasks.len(), 1);
    assert_eq!(task.subtasks[0].id, pack.id);

    assert!(store.toggle_subtask(&task.id, "missing").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_apply_drop() {
    let (store, _) = setup_store().await;
    let list = store.add_list("Inbox", ListKind::Task).await.unwrap();
    let task = store.add_task("t", None, None, vec![]).await.unwrap();

    let task = store.apply_drop(&task.id, DropTarget::List(list.id.clone())).await.unwrap();
    assert_eq!(task.list_id.as_deref(), Some(list.id.as_str()));

    let task = store.apply_drop(&task.id, DropTarget::Tag("later".to_string())).await.unwrap();
    assert_eq!(task.tags, vec!["later"]);

    let task = store.apply_drop(&task.id, DropTarget::Matrix(Priority::Medium)).await.unwrap();
    assert_eq!(task.priority, Priority::Medium);
}

#[tokio::test]
async fn test_saved_filters() {
    let (store, local) = setup_store().await;
    let criteria = FilterCriteria {
        status: StatusFilter::Active,
        priority: Some(Priority::High),
        ..Default::default()
    };
    let filter = store.save_filter("Hot", criteria).await.unwrap();
    assert_eq!(local.load().await.unwrap().filters, vec![filter.clone()]);

    assert!(store.delete_saved_filter(&filter.id).await.unwrap());
    assert!(store.filters().await.is_empty());
    // Filters are deleted outright, not trashed
    assert!(store.trash().await.is_empty());
    assert!(local.load().await.unwrap().filters.is_empty());
}

#[tokio::test]
async fn test_notes() {
    let (store, local) = setup_store().await;
    let folder = store.add_list("Journal", ListKind::Note).await.unwrap();
    let note = store.add_note("Day 1", Some(folder.id.clone())).await.unwrap();
    assert!(note.content.is_empty());

    let updated = store
        .update_note(&note.id, NotePatch { content: Some("Sunny".to_string()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(updated.content, "Sunny");
    assert!(updated.updated_at >= note.updated_at);

    assert!(store.delete_note(&note.id).await.unwrap());
    assert!(store.notes().await.is_empty());
    assert_eq!(store.trash().await[0].kind(), TrashKind::Note);
    assert!(local.load().await.unwrap().notes.is_empty());
}

#[tokio::test]
async fn test_restore_round_trip() {
    let (store, local) = setup_store().await;
    let task = store.add_task("Back", None, None, vec![]).await.unwrap();
    store.delete_task(&task.id).await.unwrap();
    let trash_id = store.trash().await[0].id.clone();

    let restored = store.restore_trash_item(&trash_id).await.unwrap();
    assert_eq!(restored.kind(), TrashKind::Task);
    assert_eq!(store.tasks().await, vec![task]);
    assert!(store.trash().await.is_empty());

    let persisted = local.load().await.unwrap();
    assert_eq!(persisted.tasks.len(), 1);
    assert!(persisted.trash.is_empty());
}

#[tokio::test]
async fn test_restore_task_of_deleted_list_detaches_it() {
    let (store, _) = setup_store().await;
    let list = store.add_list("Gone", ListKind::Task).await.unwrap();
    store.add_task("orphan", None, Some(list.id.clone()), vec![]).await.unwrap();
    store.delete_list(&list.id).await.unwrap();

    let task_item = store
        .trash()
        .await
        .into_iter()
        .find(|t| t.kind() == TrashKind::Task)
        .unwrap();
    store.restore_trash_item(&task_item.id).await.unwrap();

    let tasks = store.tasks().await;
    assert_eq!(tasks.len(), 1);
    assert!(tasks[0].list_id.is_none());
}

#[tokio::test]
async fn test_restore_tag_conflict_keeps_item_in_trash() {
    let (store, _) = setup_store().await;
    let tag = store.add_tag("dup").await.unwrap();
    store.delete_tag(&tag.id).await.unwrap();
    store.add_tag("dup").await.unwrap();

    let item_id = store.trash().await[0].id.clone();
    let err = store.restore_trash_item(&item_id).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
    assert_eq!(store.trash().await.len(), 1);
    assert_eq!(store.tags().await.len(), 1);
}

#[tokio::test]
async fn test_purge_and_empty_trash() {
    let (store, local) = setup_store().await;
    for title in ["a", "b", "c"] {
        let task = store.add_task(title, None, None, vec![]).await.unwrap();
        store.delete_task(&task.id).await.unwrap();
    }
    let first = store.trash().await[0].id.clone();

    assert!(store.permanently_delete_trash_item(&first).await.unwrap());
    assert_eq!(store.trash().await.len(), 2);

    assert_eq!(store.empty_trash().await.unwrap(), Some(2));
    assert!(store.trash().await.is_empty());
    assert!(local.load().await.unwrap().trash.is_empty());

    assert!(store.permanently_delete_trash_item("missing").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_failed_writes_are_logged_not_returned() {
    let failing = Arc::new(FailingDatastore { calls: AtomicUsize::new(0) });
    let store = TaskStore::new(failing.clone(), Arc::new(AlwaysConfirm));

    assert!(store.fetch_all().await.is_err());
    assert!(!store.is_initialized().await);

    let task = store.add_task("Offline", None, None, vec!["x".to_string()]).await.unwrap();
    store.toggle_task(&task.id).await.unwrap();
    assert!(store.delete_task(&task.id).await.unwrap());

    // In-memory state still reflects every action
    assert!(store.tasks().await.is_empty());
    assert_eq!(store.trash().await.len(), 1);
    assert_eq!(store.tags().await.len(), 1);

    // tag + task, toggle, trash + delete
    assert_eq!(failing.calls.load(Ordering::SeqCst), 5);
    assert_eq!(store.failed_writes(), 5);
}

#[tokio::test]
async fn test_set_datastore_redirects_writes() {
    let (store, first) = setup_store().await;
    let db = init_db(Path::new(":memory:")).await.unwrap();
    let second = Arc::new(LocalDatastore::new(&db));

    store.set_datastore(second.clone()).await;
    store.add_task("Elsewhere", None, None, vec![]).await.unwrap();

    assert!(first.load().await.unwrap().tasks.is_empty());
    assert_eq!(second.load().await.unwrap().tasks.len(), 1);
    assert_eq!(store.datastore().await.name(), "local");
}
