//! Repository Integration Tests
//!
//! Tests for the SQLite repositories with an in-memory database.

#[cfg(test)]
mod tests {
    use crate::domain::*;
    use crate::remote::Datastore;
    use crate::repository::*;
    use chrono::{TimeZone, Utc};
    use std::path::Path;

    async fn setup_test_db() -> LocalDatastore {
        // Use in-memory database for tests
        let db_state = init_db(Path::new(":memory:")).await.expect("Failed to init test DB");
        LocalDatastore::new(&db_state)
    }

    #[tokio::test]
    async fn test_create_and_find_task() {
        let store = setup_test_db().await;

        let mut task = Task::new("Test task".to_string());
        task.priority = Priority::High;
        task.tags = vec!["work".to_string()];
        task.due_date = Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap());
        store.tasks.create(&task).await.expect("Failed to create");

        let found = store.tasks.find_by_id(&task.id).await.expect("Find failed");
        assert_eq!(found, Some(task));
    }

    #[tokio::test]
    async fn test_update_unknown_task_is_not_found() {
        let store = setup_test_db().await;
        let task = Task::new("ghost".to_string());
        let err = store.tasks.update(&task).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_upsert_inserts_then_updates() {
        let store = setup_test_db().await;
        let mut task = Task::new("Original".to_string());

        upsert(&store.tasks, &task).await.unwrap();
        task.title = "Updated".to_string();
        task.is_completed = true;
        upsert(&store.tasks, &task).await.unwrap();

        let tasks = store.tasks.list().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Updated");
        assert!(tasks[0].is_completed);
    }

    #[tokio::test]
    async fn test_delete_task() {
        let store = setup_test_db().await;
        let task = Task::new("To delete".to_string());
        store.tasks.create(&task).await.unwrap();

        store.tasks.delete(&task.id).await.expect("Delete failed");

        let found = store.tasks.find_by_id(&task.id).await.expect("Find failed");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_tasks_by_list_and_tag() {
        let store = setup_test_db().await;

        let mut a = Task::new("a".to_string());
        a.list_id = Some("work".to_string());
        a.tags = vec!["urgent".to_string()];
        let mut b = Task::new("b".to_string());
        b.list_id = Some("home".to_string());
        b.tags = vec!["urgent-ish".to_string()];
        store.tasks.create(&a).await.unwrap();
        store.tasks.create(&b).await.unwrap();

        let work = store.tasks.list_by_list("work").await.unwrap();
        assert_eq!(work.len(), 1);
        assert_eq!(work[0].id, a.id);

        let urgent = store.tasks.list_with_tag("urgent").await.unwrap();
        assert_eq!(urgent.len(), 1);
        assert_eq!(urgent[0].id, a.id);

        assert_eq!(store.tasks.delete_by_list("work").await.unwrap(), 1);
        assert_eq!(store.tasks.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_task_search_is_case_insensitive() {
        let store = setup_test_db().await;
        let mut task = Task::new("Buy Milk".to_string());
        task.description = Some("From the corner SHOP".to_string());
        store.tasks.create(&task).await.unwrap();
        store.tasks.create(&Task::new("Walk dog".to_string())).await.unwrap();

        assert_eq!(store.tasks.search("milk").await.unwrap().len(), 1);
        assert_eq!(store.tasks.search("shop").await.unwrap().len(), 1);
        assert!(store.tasks.search("cat").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tag_names_are_unique() {
        let store = setup_test_db().await;
        store.tags.create(&Tag::new("work".to_string())).await.unwrap();

        let err = store.tags.create(&Tag::new("work".to_string())).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let found = store.tags.find_by_name("work").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_list_kind_persistence() {
        let store = setup_test_db().await;
        let list = List::new("Journal".to_string(), ListKind::Note);
        store.lists.create(&list).await.unwrap();

        let found = store.lists.find_by_id(&list.id).await.unwrap().unwrap();
        assert_eq!(found.kind, ListKind::Note);
    }

    #[tokio::test]
    async fn test_filter_criteria_persistence() {
        let store = setup_test_db().await;
        let filter = SavedFilter::new(
            "High work".to_string(),
            FilterCriteria {
                status: StatusFilter::Active,
                priority: Some(Priority::High),
                list_id: Some("work".to_string()),
                tag: None,
            },
        );
        store.filters.create(&filter).await.unwrap();

        let found = store.filters.find_by_id(&filter.id).await.unwrap().unwrap();
        assert_eq!(found, filter);
    }

    #[tokio::test]
    async fn test_notes_by_list_newest_first() {
        let store = setup_test_db().await;
        let mut older = Note::new("older".to_string(), Some("f".to_string()));
        older.updated_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut newer = Note::new("newer".to_string(), Some("f".to_string()));
        newer.updated_at = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        store.notes.create(&older).await.unwrap();
        store.notes.create(&newer).await.unwrap();

        let notes = store.notes.list_by_list("f").await.unwrap();
        assert_eq!(notes.iter().map(|n| n.title.as_str()).collect::<Vec<_>>(), vec!["newer", "older"]);
    }

    #[tokio::test]
    async fn test_trash_round_trip_and_clear() {
        let store = setup_test_db().await;
        let task = Task::new("binned".to_string());
        let item = TrashItem::new(TrashPayload::Task(task.clone()), Utc::now());
        store.trash.create(&item).await.unwrap();

        let found = store.trash.find_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(found.payload, TrashPayload::Task(task));

        assert_eq!(store.trash.clear().await.unwrap(), 1);
        assert!(store.trash.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_local_datastore_load_and_delete() {
        let store = setup_test_db().await;
        let list = List::new("Work".to_string(), ListKind::Task);
        let mut task = Task::new("t".to_string());
        task.list_id = Some(list.id.clone());

        store.upsert(&Record::List(list.clone())).await.unwrap();
        store.upsert(&Record::Task(task.clone())).await.unwrap();
        store.upsert(&Record::Tag(Tag::new("x".to_string()))).await.unwrap();

        let snapshot = store.load().await.unwrap();
        assert_eq!(snapshot.tasks.len(), 1);
        assert_eq!(snapshot.lists.len(), 1);
        assert_eq!(snapshot.tags.len(), 1);

        store.delete_by_list(Table::Tasks, &list.id).await.unwrap();
        store.delete(Table::Lists, &[list.id.clone()]).await.unwrap();
        let snapshot = store.load().await.unwrap();
        assert!(snapshot.tasks.is_empty());
        assert!(snapshot.lists.is_empty());

        assert!(store.delete_by_list(Table::Tags, &list.id).await.is_err());
    }

    #[tokio::test]
    async fn test_closed_database_reports_error() {
        let db_state = init_db(Path::new(":memory:")).await.unwrap();
        let store = LocalDatastore::new(&db_state);
        db_state.close().await;

        let err = store.tasks.list().await.unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));
    }
}
