//! Local Datastore
//!
//! The SQLite database behind the `Datastore` seam.

use async_trait::async_trait;

use crate::domain::{DomainError, DomainResult, Record, Snapshot, Table};
use crate::remote::Datastore;
use super::db::DbState;
use super::traits::{upsert, Repository};
use super::{FilterRepository, ListRepository, NoteRepository, TagRepository, TaskRepository, TrashRepository};

pub struct LocalDatastore {
    pub tasks: TaskRepository,
    pub lists: ListRepository,
    pub tags: TagRepository,
    pub filters: FilterRepository,
    pub notes: NoteRepository,
    pub trash: TrashRepository,
}

impl LocalDatastore {
    pub fn new(db: &DbState) -> Self {
        let conn = db.connection();
        Self {
            tasks: TaskRepository::new(conn.clone()),
            lists: ListRepository::new(conn.clone()),
            tags: TagRepository::new(conn.clone()),
            filters: FilterRepository::new(conn.clone()),
            notes: NoteRepository::new(conn.clone()),
            trash: TrashRepository::new(conn),
        }
    }

    async fn delete_one(&self, table: Table, id: &str) -> DomainResult<()> {
        match table {
            Table::Tasks => self.tasks.delete(id).await,
            Table::Lists => self.lists.delete(id).await,
            Table::Tags => self.tags.delete(id).await,
            Table::Filters => self.filters.delete(id).await,
            Table::Notes => self.notes.delete(id).await,
            Table::Trash => self.trash.delete(id).await,
        }
    }
}

#[async_trait]
impl Datastore for LocalDatastore {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn load(&self) -> DomainResult<Snapshot> {
        Ok(Snapshot {
            tasks: self.tasks.list().await?,
            lists: self.lists.list().await?,
            tags: self.tags.list().await?,
            filters: self.filters.list().await?,
            notes: self.notes.list().await?,
            trash: self.trash.list().await?,
        })
    }

    async fn upsert(&self, record: &Record) -> DomainResult<()> {
        match record {
            Record::Task(r) => upsert(&self.tasks, r).await.map(|_| ()),
            Record::List(r) => upsert(&self.lists, r).await.map(|_| ()),
            Record::Tag(r) => upsert(&self.tags, r).await.map(|_| ()),
            Record::Filter(r) => upsert(&self.filters, r).await.map(|_| ()),
            Record::Note(r) => upsert(&self.notes, r).await.map(|_| ()),
            Record::Trash(r) => upsert(&self.trash, r).await.map(|_| ()),
        }
    }

    async fn delete(&self, table: Table, ids: &[String]) -> DomainResult<()> {
        for id in ids {
            self.delete_one(table, id).await?;
        }
        Ok(())
    }

    async fn delete_by_list(&self, table: Table, list_id: &str) -> DomainResult<()> {
        let removed = match table {
            Table::Tasks => self.tasks.delete_by_list(list_id).await?,
            Table::Notes => self.notes.delete_by_list(list_id).await?,
            other => {
                return Err(DomainError::InvalidInput(format!("{} rows do not belong to a list", other)));
            }
        };
        log::debug!("Removed {} {} of list {}", removed, table, list_id);
        Ok(())
    }
}
