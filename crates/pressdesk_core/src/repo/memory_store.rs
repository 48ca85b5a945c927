//! In-process `PublishingStore` backed by ordered maps.
//!
//! # Invariants
//! - Each table hands out ids from its own counter, starting at 1.
//! - Ids are never reused, so `BTreeMap` order is insertion order.
//! - Article inserts are rejected when their author or magazine is missing.

use super::{
    FieldUpdate, ListFilter, PublishingStore, Record, RepoError, RepoResult, StoredRecord,
};
use crate::model::{EntityId, EntityKind};
use std::cell::RefCell;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RefCell<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    authors: Table,
    magazines: Table,
    articles: Table,
}

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<EntityId, Record>,
}

impl Tables {
    fn table(&self, kind: EntityKind) -> &Table {
        match kind {
            EntityKind::Author => &self.authors,
            EntityKind::Magazine => &self.magazines,
            EntityKind::Article => &self.articles,
        }
    }

    fn table_mut(&mut self, kind: EntityKind) -> &mut Table {
        match kind {
            EntityKind::Author => &mut self.authors,
            EntityKind::Magazine => &mut self.magazines,
            EntityKind::Article => &mut self.articles,
        }
    }

    fn ensure_references(&self, record: &Record) -> RepoResult<()> {
        if let Record::Article {
            author_id,
            magazine_id,
            ..
        } = record
        {
            for (kind, id) in [
                (EntityKind::Author, *author_id),
                (EntityKind::Magazine, *magazine_id),
            ] {
                if !self.table(kind).rows.contains_key(&id) {
                    return Err(RepoError::DanglingReference { kind, id });
                }
            }
        }
        Ok(())
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently held for `kind`.
    pub fn len(&self, kind: EntityKind) -> usize {
        self.tables.borrow().table(kind).rows.len()
    }

    pub fn is_empty(&self, kind: EntityKind) -> bool {
        self.len(kind) == 0
    }
}

impl PublishingStore for MemoryStore {
    fn insert(&self, record: &Record) -> RepoResult<EntityId> {
        let mut tables = self.tables.borrow_mut();
        tables.ensure_references(record)?;

        let table = tables.table_mut(record.kind());
        let id = table
            .last_id
            .checked_add(1)
            .and_then(EntityId::new)
            .ok_or_else(|| RepoError::Backend(format!("{} id space exhausted", record.kind())))?;
        table.last_id = id.get();
        table.rows.insert(id, record.clone());
        Ok(id)
    }

    fn get(&self, kind: EntityKind, id: EntityId) -> RepoResult<Option<StoredRecord>> {
        let tables = self.tables.borrow();
        Ok(tables
            .table(kind)
            .rows
            .get(&id)
            .map(|record| StoredRecord {
                id,
                record: record.clone(),
            }))
    }

    fn list(&self, kind: EntityKind, filter: ListFilter) -> RepoResult<Vec<StoredRecord>> {
        if !filter.supports(kind) {
            return Err(RepoError::UnsupportedFilter { kind, filter });
        }

        let tables = self.tables.borrow();
        Ok(tables
            .table(kind)
            .rows
            .iter()
            .filter(|(_, record)| matches_filter(record, filter))
            .map(|(id, record)| StoredRecord {
                id: *id,
                record: record.clone(),
            })
            .collect())
    }

    fn update(&self, id: EntityId, change: &FieldUpdate) -> RepoResult<()> {
        let mut tables = self.tables.borrow_mut();
        let kind = change.kind();
        let row = tables
            .table_mut(kind)
            .rows
            .get_mut(&id)
            .ok_or(RepoError::NotFound { kind, id })?;

        match (row, change) {
            (Record::Magazine { name, .. }, FieldUpdate::MagazineName(value)) => {
                name.clone_from(value);
            }
            (Record::Magazine { category, .. }, FieldUpdate::MagazineCategory(value)) => {
                category.clone_from(value);
            }
            (other, _) => {
                return Err(RepoError::InvalidData(format!(
                    "{kind} {id} holds a {} record",
                    other.kind()
                )));
            }
        }
        Ok(())
    }
}

fn matches_filter(record: &Record, filter: ListFilter) -> bool {
    match (filter, record) {
        (ListFilter::All, _) => true,
        (ListFilter::AuthorId(wanted), Record::Article { author_id, .. }) => *author_id == wanted,
        (ListFilter::MagazineId(wanted), Record::Article { magazine_id, .. }) => {
            *magazine_id == wanted
        }
        _ => false,
    }
}
