#![allow(dead_code)]

use pressdesk_core::db::open_db_in_memory;
use pressdesk_core::{
    EntityId, EntityKind, FieldUpdate, ListFilter, MemoryStore, PublishingService,
    PublishingStore, Record, RepoError, RepoResult, SqliteStore, StoredRecord,
};
use std::cell::Cell;

pub type DynService<'a> = PublishingService<&'a dyn PublishingStore>;

/// Runs `check` once over a `MemoryStore` and once over an in-memory SQLite
/// database.
pub fn for_each_store(check: impl Fn(&str, DynService<'_>)) {
    let memory = MemoryStore::new();
    check("memory", PublishingService::new(&memory as &dyn PublishingStore));

    let conn = open_db_in_memory().unwrap();
    let sqlite = SqliteStore::try_new(&conn).unwrap();
    check("sqlite", PublishingService::new(&sqlite as &dyn PublishingStore));
}

pub fn row_count(store: &dyn PublishingStore, kind: EntityKind) -> usize {
    store.list(kind, ListFilter::All).unwrap().len()
}

/// Store wrapper that can be told to fail writes.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_inserts: Cell<bool>,
    pub fail_updates: Cell<bool>,
}

impl PublishingStore for FlakyStore {
    fn insert(&self, record: &Record) -> RepoResult<EntityId> {
        if self.fail_inserts.get() {
            return Err(RepoError::Backend("disk full".to_string()));
        }
        self.inner.insert(record)
    }

    fn get(&self, kind: EntityKind, id: EntityId) -> RepoResult<Option<StoredRecord>> {
        self.inner.get(kind, id)
    }

    fn list(&self, kind: EntityKind, filter: ListFilter) -> RepoResult<Vec<StoredRecord>> {
        self.inner.list(kind, filter)
    }

    fn update(&self, id: EntityId, change: &FieldUpdate) -> RepoResult<()> {
        if self.fail_updates.get() {
            return Err(RepoError::Backend("read-only replica".to_string()));
        }
        self.inner.update(id, change)
    }
}
