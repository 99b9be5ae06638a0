pub mod aggregate;
pub mod engagement;
pub mod post;
pub mod profile;
pub mod schema;
pub mod upload;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use foodlog_blob::{BlobError, BlobStore, FileStore};
use foodlog_core::{ServiceConfig, ServiceError};
use foodlog_sql::{Row, SQLError, SQLStore, SqliteStore, Value};

/// Diary service error type.
#[derive(Debug, Error)]
pub enum DiaryError {
    #[error("login required")]
    AuthRequired,

    #[error("cannot follow yourself")]
    SelfFollow,

    #[error("validation: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// The record store is missing from the configuration or cannot be opened.
    #[error("record store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("storage: {0}")]
    Store(String),
}

impl From<SQLError> for DiaryError {
    fn from(e: SQLError) -> Self {
        match e {
            SQLError::Connection(m) => DiaryError::StoreUnavailable(m),
            other => DiaryError::Store(other.to_string()),
        }
    }
}

impl From<BlobError> for DiaryError {
    fn from(e: BlobError) -> Self {
        DiaryError::Store(e.to_string())
    }
}

impl From<DiaryError> for ServiceError {
    fn from(e: DiaryError) -> Self {
        match e {
            DiaryError::AuthRequired => ServiceError::Unauthorized("login required".into()),
            DiaryError::SelfFollow => ServiceError::Validation("cannot follow yourself".into()),
            DiaryError::Validation(m) => ServiceError::Validation(m),
            DiaryError::NotFound(m) => ServiceError::NotFound(m),
            DiaryError::StoreUnavailable(m) => ServiceError::Unavailable(format!(
                "record store unavailable ({}); check [storage] data_dir in the config file",
                m
            )),
            DiaryError::Store(m) => ServiceError::Storage(m),
        }
    }
}

/// A predicate on one column. Column names always come from this crate,
/// values are bound as parameters.
#[derive(Debug, Clone)]
pub(crate) enum Filter {
    Eq(&'static str, Value),
    Ne(&'static str, Value),
    In(&'static str, Vec<Value>),
}

impl Filter {
    pub(crate) fn eq(col: &'static str, v: impl Into<Value>) -> Self {
        Filter::Eq(col, v.into())
    }

    pub(crate) fn ne(col: &'static str, v: impl Into<Value>) -> Self {
        Filter::Ne(col, v.into())
    }

    pub(crate) fn any_of<I, V>(col: &'static str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Filter::In(col, values.into_iter().map(Into::into).collect())
    }
}

/// Render `filters` as a WHERE clause, appending their values to `params`.
fn where_sql(filters: &[Filter], params: &mut Vec<Value>) -> String {
    let mut clauses = Vec::with_capacity(filters.len());
    for filter in filters {
        match filter {
            Filter::Eq(col, val) => {
                params.push(val.clone());
                clauses.push(format!("{} = ?{}", col, params.len()));
            }
            Filter::Ne(col, val) => {
                params.push(val.clone());
                clauses.push(format!("{} <> ?{}", col, params.len()));
            }
            Filter::In(_, vals) if vals.is_empty() => clauses.push("1 = 0".to_string()),
            Filter::In(col, vals) => {
                let mut slots = Vec::with_capacity(vals.len());
                for val in vals {
                    params.push(val.clone());
                    slots.push(format!("?{}", params.len()));
                }
                clauses.push(format!("{} IN ({})", col, slots.join(", ")));
            }
        }
    }
    if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    }
}

/// The food diary service. Holds the record store and blob store handles.
pub struct DiaryService {
    pub(crate) sql: Arc<dyn SQLStore>,
    pub(crate) blob: Arc<dyn BlobStore>,
}

impl DiaryService {
    /// Create a new DiaryService, initializing the DB schema.
    pub fn new(sql: Arc<dyn SQLStore>, blob: Arc<dyn BlobStore>) -> Result<Arc<Self>, DiaryError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Arc::new(Self { sql, blob }))
    }

    /// Open the on-disk stores named by `config`.
    ///
    /// Fails with `StoreUnavailable` when no record store location is
    /// configured or the database cannot be opened.
    pub fn open(config: &ServiceConfig, public_blob_url: &str) -> Result<Arc<Self>, DiaryError> {
        if !config.has_store() {
            return Err(DiaryError::StoreUnavailable(
                "no record store configured".to_string(),
            ));
        }
        let sql = SqliteStore::open(&config.resolve_sqlite_path())?;
        let blob = FileStore::open(&config.resolve_blob_dir(), public_blob_url)?;
        Self::new(Arc::new(sql), Arc::new(blob))
    }

    /// The store uploaded images live in.
    pub fn blob_store(&self) -> Arc<dyn BlobStore> {
        self.blob.clone()
    }

    // ── Predicate-query primitives ──

    /// SELECT `columns` FROM `table` with filters, optional ordering and paging.
    pub(crate) fn select_rows(
        &self,
        table: &str,
        columns: &str,
        filters: &[Filter],
        order_by: Option<&str>,
        page: Option<(usize, usize)>,
    ) -> Result<Vec<Row>, DiaryError> {
        let mut params = Vec::new();
        let mut sql = format!("SELECT {} FROM {}{}", columns, table, where_sql(filters, &mut params));
        if let Some(order) = order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }
        if let Some((limit, offset)) = page {
            params.push(Value::Integer(limit as i64));
            params.push(Value::Integer(offset as i64));
            sql.push_str(&format!(" LIMIT ?{} OFFSET ?{}", params.len() - 1, params.len()));
        }
        tracing::debug!(%sql, "select");
        Ok(self.sql.query(&sql, &params)?)
    }

    /// COUNT(*) with filters.
    pub(crate) fn count_rows(&self, table: &str, filters: &[Filter]) -> Result<u64, DiaryError> {
        let mut params = Vec::new();
        let sql = format!("SELECT COUNT(*) AS cnt FROM {}{}", table, where_sql(filters, &mut params));
        let rows = self.sql.query(&sql, &params)?;
        Ok(rows
            .first()
            .and_then(|r| r.get_i64("cnt"))
            .unwrap_or(0)
            .max(0) as u64)
    }

    /// INSERT one row. Returns `false` instead of failing when a unique
    /// constraint rejects it, i.e. the row already exists.
    pub(crate) fn insert_row(&self, table: &str, cols: &[(&str, Value)]) -> Result<bool, DiaryError> {
        let names: Vec<&str> = cols.iter().map(|(c, _)| *c).collect();
        let slots: Vec<String> = (1..=cols.len()).map(|i| format!("?{}", i)).collect();
        let params: Vec<Value> = cols.iter().map(|(_, v)| v.clone()).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            names.join(", "),
            slots.join(", "),
        );
        match self.sql.exec(&sql, &params) {
            Ok(_) => Ok(true),
            Err(e) if e.is_constraint() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// UPDATE rows matching `filters`. Returns the affected row count.
    pub(crate) fn update_rows(
        &self,
        table: &str,
        sets: &[(&str, Value)],
        filters: &[Filter],
    ) -> Result<u64, DiaryError> {
        let mut params: Vec<Value> = Vec::new();
        let mut assignments = Vec::with_capacity(sets.len());
        for (col, val) in sets {
            params.push(val.clone());
            assignments.push(format!("{} = ?{}", col, params.len()));
        }
        let sql = format!(
            "UPDATE {} SET {}{}",
            table,
            assignments.join(", "),
            where_sql(filters, &mut params),
        );
        Ok(self.sql.exec(&sql, &params)?)
    }

    /// DELETE rows matching `filters`. Returns the affected row count.
    pub(crate) fn delete_rows(&self, table: &str, filters: &[Filter]) -> Result<u64, DiaryError> {
        let mut params = Vec::new();
        let sql = format!("DELETE FROM {}{}", table, where_sql(filters, &mut params));
        Ok(self.sql.exec(&sql, &params)?)
    }

    // ── JSON record helpers (id + data + indexed columns) ──

    /// Insert a record as JSON into a table with indexed columns.
    pub(crate) fn insert_record<T: Serialize>(
        &self,
        table: &str,
        id: &str,
        record: &T,
        indexes: &[(&str, Value)],
    ) -> Result<(), DiaryError> {
        let json = serde_json::to_string(record).map_err(|e| DiaryError::Store(e.to_string()))?;

        let mut cols: Vec<(&str, Value)> = vec![("id", id.into()), ("data", json.into())];
        cols.extend(indexes.iter().cloned());

        if !self.insert_row(table, &cols)? {
            return Err(DiaryError::Store(format!("{}/{} already exists", table, id)));
        }
        Ok(())
    }

    /// Get a record by id, deserializing the JSON `data` column.
    pub(crate) fn get_record<T: DeserializeOwned>(&self, table: &str, id: &str) -> Result<T, DiaryError> {
        let rows = self.select_rows(table, "data", &[Filter::eq("id", id)], None, None)?;
        let row = rows
            .first()
            .ok_or_else(|| DiaryError::NotFound(format!("{}/{}", table, id)))?;
        decode_data(row)
    }

    /// List records matching `filters`.
    pub(crate) fn list_records<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[Filter],
        order_by: Option<&str>,
        page: Option<(usize, usize)>,
    ) -> Result<Vec<T>, DiaryError> {
        let rows = self.select_rows(table, "data", filters, order_by, page)?;
        rows.iter().map(decode_data).collect()
    }
}

fn decode_data<T: DeserializeOwned>(row: &Row) -> Result<T, DiaryError> {
    let data = row
        .get_str("data")
        .ok_or_else(|| DiaryError::Store("missing data column".into()))?;
    serde_json::from_str(data).map_err(|e| DiaryError::Store(e.to_string()))
}

/// Log a failed read and fall back to an empty value. Aggregations degrade
/// instead of failing the page.
pub(crate) fn degrade<T: Default>(result: Result<T, DiaryError>, what: &str) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!("{} failed, using empty result: {}", what, e);
        T::default()
    })
}
