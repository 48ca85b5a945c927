//! SQLite-backed `PublishingStore`.
//!
//! # Invariants
//! - Connection must be migrated to the latest schema (`try_new` checks).
//! - Article foreign keys are enforced by SQLite (`foreign_keys=ON`).

use super::{
    FieldUpdate, ListFilter, PublishingStore, Record, RepoError, RepoResult, StoredRecord,
};
use crate::db::migrations::ensure_migrated;
use crate::model::{EntityId, EntityKind};
use rusqlite::{params, Connection, Row};

const AUTHOR_SELECT_SQL: &str = "SELECT id, name FROM authors";
const MAGAZINE_SELECT_SQL: &str = "SELECT id, name, category FROM magazines";
const ARTICLE_SELECT_SQL: &str = "SELECT id, title, author_id, magazine_id FROM articles";

pub struct SqliteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_migrated(conn)?;
        Ok(Self { conn })
    }
}

impl PublishingStore for SqliteStore<'_> {
    fn insert(&self, record: &Record) -> RepoResult<EntityId> {
        match record {
            Record::Author { name } => {
                self.conn
                    .execute("INSERT INTO authors (name) VALUES (?1);", params![name])?;
            }
            Record::Magazine { name, category } => {
                self.conn.execute(
                    "INSERT INTO magazines (name, category) VALUES (?1, ?2);",
                    params![name, category],
                )?;
            }
            Record::Article {
                title,
                author_id,
                magazine_id,
            } => {
                self.ensure_exists(EntityKind::Author, *author_id)?;
                self.ensure_exists(EntityKind::Magazine, *magazine_id)?;
                self.conn.execute(
                    "INSERT INTO articles (title, author_id, magazine_id) VALUES (?1, ?2, ?3);",
                    params![title, author_id.get(), magazine_id.get()],
                )?;
            }
        }

        let rowid = self.conn.last_insert_rowid();
        EntityId::new(rowid).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "sqlite assigned non-positive id {rowid} to {}",
                record.kind()
            ))
        })
    }

    fn get(&self, kind: EntityKind, id: EntityId) -> RepoResult<Option<StoredRecord>> {
        let sql = format!("{} WHERE id = ?1;", select_sql(kind));
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![id.get()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_row(kind, row)?));
        }
        Ok(None)
    }

    fn list(&self, kind: EntityKind, filter: ListFilter) -> RepoResult<Vec<StoredRecord>> {
        if !filter.supports(kind) {
            return Err(RepoError::UnsupportedFilter { kind, filter });
        }

        let (clause, bind) = match filter {
            ListFilter::All => ("", None),
            ListFilter::AuthorId(id) => (" WHERE author_id = ?1", Some(id.get())),
            ListFilter::MagazineId(id) => (" WHERE magazine_id = ?1", Some(id.get())),
        };
        let sql = format!("{}{clause} ORDER BY id ASC;", select_sql(kind));
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = match bind {
            Some(value) => stmt.query(params![value])?,
            None => stmt.query([])?,
        };

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_row(kind, row)?);
        }
        Ok(records)
    }

    fn update(&self, id: EntityId, change: &FieldUpdate) -> RepoResult<()> {
        let changed = match change {
            FieldUpdate::MagazineName(name) => self.conn.execute(
                "UPDATE magazines SET name = ?2 WHERE id = ?1;",
                params![id.get(), name],
            )?,
            FieldUpdate::MagazineCategory(category) => self.conn.execute(
                "UPDATE magazines SET category = ?2 WHERE id = ?1;",
                params![id.get(), category],
            )?,
        };

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: change.kind(),
                id,
            });
        }
        Ok(())
    }
}

impl SqliteStore<'_> {
    fn ensure_exists(&self, kind: EntityKind, id: EntityId) -> RepoResult<()> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1);", table_name(kind));
        let exists: bool = self.conn.query_row(&sql, params![id.get()], |row| row.get(0))?;
        if !exists {
            return Err(RepoError::DanglingReference { kind, id });
        }
        Ok(())
    }
}

fn table_name(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Author => "authors",
        EntityKind::Magazine => "magazines",
        EntityKind::Article => "articles",
    }
}

fn select_sql(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Author => AUTHOR_SELECT_SQL,
        EntityKind::Magazine => MAGAZINE_SELECT_SQL,
        EntityKind::Article => ARTICLE_SELECT_SQL,
    }
}

fn parse_row(kind: EntityKind, row: &Row<'_>) -> RepoResult<StoredRecord> {
    let id = parse_id(kind, "id", row.get("id")?)?;
    let record = match kind {
        EntityKind::Author => Record::Author {
            name: row.get("name")?,
        },
        EntityKind::Magazine => Record::Magazine {
            name: row.get("name")?,
            category: row.get("category")?,
        },
        EntityKind::Article => Record::Article {
            title: row.get("title")?,
            author_id: parse_id(kind, "author_id", row.get("author_id")?)?,
            magazine_id: parse_id(kind, "magazine_id", row.get("magazine_id")?)?,
        },
    };
    Ok(StoredRecord { id, record })
}

fn parse_id(kind: EntityKind, column: &str, raw: i64) -> RepoResult<EntityId> {
    EntityId::new(raw).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid id `{raw}` in {}.{column}",
            table_name(kind)
        ))
    })
}
