//! SqliteStore - relational record store backed by rusqlite (bundled SQLite).

use std::marker::PhantomData;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, ErrorCode, OptionalExtension};

use super::{RecordStore, StoreError};
use crate::model::{InventoryRecord, Model, Product, RecordId, Version};

/// Row mapping for a model kept in a SQLite table named after
/// [`Model::COLLECTION`].
///
/// The store owns the key and `version` columns; `COLUMNS` lists the rest,
/// in the order [`values`](SqlRecord::values) returns them.
pub trait SqlRecord: Model<Id = i64> {
    /// Name of the `INTEGER PRIMARY KEY` column.
    const KEY: &'static str;

    /// `CREATE TABLE IF NOT EXISTS` statement for the table.
    const SCHEMA: &'static str;

    const COLUMNS: &'static [&'static str];

    fn values(&self) -> Vec<Value>;

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self>;
}

/// A [`RecordStore`] over one SQLite table.
///
/// Updates are issued as `UPDATE .. WHERE key = ? AND version = ?`, so the
/// version check and the write are a single statement.
pub struct SqliteStore<M: SqlRecord> {
    conn: Mutex<Connection>,
    _marker: PhantomData<fn() -> M>,
}

impl<M: SqlRecord> SqliteStore<M> {
    /// Open or create a SQLite database at the given path and make sure the
    /// model's table exists.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;

        // Several services may share one database file.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        Self::with_connection(conn)
    }

    /// Create an in-memory SQLite database (useful for tests).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(M::SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            _marker: PhantomData,
        })
    }

    fn conn(&self, operation: &'static str) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::LockPoisoned(operation))
    }

    fn select_sql() -> String {
        format!(
            "SELECT {}, {}, version FROM {}",
            M::KEY,
            M::COLUMNS.join(", "),
            M::COLLECTION
        )
    }
}

fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl<M: SqlRecord> RecordStore<M> for SqliteStore<M> {
    fn get(&self, id: &i64) -> Result<Option<M>, StoreError> {
        let conn = self.conn("get")?;
        let sql = format!("{} WHERE {} = ?1", Self::select_sql(), M::KEY);
        let mut stmt = conn.prepare_cached(&sql)?;
        Ok(stmt.query_row([id], |row| M::from_row(row)).optional()?)
    }

    fn list(&self) -> Result<Vec<M>, StoreError> {
        let conn = self.conn("list")?;
        // Key order: caller-assigned keys are not insertion order.
        let sql = format!("{} ORDER BY {}", Self::select_sql(), M::KEY);
        let mut stmt = conn.prepare_cached(&sql)?;
        let rows = stmt.query_map([], |row| M::from_row(row))?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    fn insert(&self, mut model: M) -> Result<M, StoreError> {
        let conn = self.conn("insert")?;

        let mut columns: Vec<&str> = Vec::with_capacity(M::COLUMNS.len() + 2);
        let mut values = Vec::with_capacity(M::COLUMNS.len() + 2);
        let generated = model.id().is_unassigned();
        if !generated {
            columns.push(M::KEY);
            values.push(Value::Integer(*model.id()));
        }
        columns.extend_from_slice(M::COLUMNS);
        values.extend(model.values());
        columns.push("version");
        values.push(Value::Integer(model.version() as i64));

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            M::COLLECTION,
            columns.join(", "),
            placeholders(values.len())
        );

        match conn.execute(&sql, params_from_iter(values.iter())) {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                return Err(StoreError::DuplicateKey {
                    collection: M::COLLECTION,
                    id: model.id().to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        }

        if generated {
            let id = conn.last_insert_rowid();
            tracing::debug!(collection = M::COLLECTION, id, "generated key");
            model.set_id(id);
        }
        Ok(model)
    }

    fn conditional_update(&self, model: &M, expected_version: Version) -> Result<bool, StoreError> {
        let conn = self.conn("conditional_update")?;

        let assignments: Vec<String> = M::COLUMNS
            .iter()
            .chain(std::iter::once(&"version"))
            .enumerate()
            .map(|(i, column)| format!("{column} = ?{}", i + 1))
            .collect();
        let n = assignments.len();
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?{} AND version = ?{}",
            M::COLLECTION,
            assignments.join(", "),
            M::KEY,
            n + 1,
            n + 2
        );

        let mut values = model.values();
        values.push(Value::Integer(model.version() as i64));
        values.push(Value::Integer(*model.id()));
        values.push(Value::Integer(expected_version as i64));

        let affected = conn.execute(&sql, params_from_iter(values.iter()))?;
        Ok(affected == 1)
    }

    fn delete(&self, id: &i64) -> Result<bool, StoreError> {
        let conn = self.conn("delete")?;
        let sql = format!("DELETE FROM {} WHERE {} = ?1", M::COLLECTION, M::KEY);
        let affected = conn.execute(&sql, [id])?;
        Ok(affected == 1)
    }
}

fn version_at(row: &rusqlite::Row<'_>) -> rusqlite::Result<Version> {
    let version: i64 = row.get("version")?;
    Ok(version as Version)
}

impl SqlRecord for Product {
    const KEY: &'static str = "id";
    const SCHEMA: &'static str = "CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        quantity INTEGER NOT NULL,
        version INTEGER NOT NULL
    );";
    const COLUMNS: &'static [&'static str] = &["name", "quantity"];

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Integer(self.quantity),
        ]
    }

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Product {
            id: row.get("id")?,
            name: row.get("name")?,
            quantity: row.get("quantity")?,
            version: version_at(row)?,
        })
    }
}

impl SqlRecord for InventoryRecord {
    const KEY: &'static str = "product_id";
    const SCHEMA: &'static str = "CREATE TABLE IF NOT EXISTS inventory (
        product_id INTEGER PRIMARY KEY,
        quantity INTEGER NOT NULL,
        product_name TEXT NOT NULL,
        product_category TEXT NOT NULL,
        version INTEGER NOT NULL
    );";
    const COLUMNS: &'static [&'static str] = &["quantity", "product_name", "product_category"];

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.quantity),
            Value::Text(self.product_name.clone()),
            Value::Text(self.product_category.clone()),
        ]
    }

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(InventoryRecord {
            product_id: row.get("product_id")?,
            quantity: row.get("quantity")?,
            product_name: row.get("product_name")?,
            product_category: row.get("product_category")?,
            version: version_at(row)?,
        })
    }
}
