//! Graph query execution
//!
//! [`GraphDb`] opens a connection from a [`ConnectionPool`], submits a
//! [`Statement`], and hands each decoded [`Row`] to a [`ResultMapper`]. It
//! knows nothing about the domain; mappers do.
//!
//! Two execution modes are supported:
//! - single result: exactly one row is expected. A second row aborts
//!   iteration with [`GraphError::NonUniqueResult`] before it reaches the
//!   mapper, and an empty result is [`GraphError::NoResults`].
//! - multiple results: every row is mapped in arrival order and the row count
//!   is returned. Zero rows is not an error here.
//!
//! The connection is owned by the executing call and dropped on every exit
//! path, which returns it to the pool.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;

pub mod connection_pool;
pub mod errors;
pub mod properties;
pub mod value;

pub use errors::{DriverError, GraphError, MapperError};
pub use value::{Node, Param, Properties, Relationship, Value};

/// How a returned column is decoded by the connection adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Node,
    Relationship,
    Integer,
    StringList,
}

/// A named column in a statement's RETURN clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

/// A cypher query with named bind parameters and its declared columns
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub cypher: String,
    pub params: BTreeMap<String, Param>,
    pub columns: Vec<Column>,
}

impl Statement {
    pub fn new(cypher: impl Into<String>) -> Self {
        Statement {
            cypher: cypher.into(),
            params: BTreeMap::new(),
            columns: Vec::new(),
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<Param>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn column(mut self, name: &'static str, kind: ColumnKind) -> Self {
        self.columns.push(Column { name, kind });
        self
    }
}

/// One decoded row as produced by a [`RowStream`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub data: Vec<Value>,
    pub meta: Option<HashMap<String, Value>>,
}

impl Record {
    pub fn new(data: Vec<Value>) -> Self {
        Record { data, meta: None }
    }
}

/// A row as seen by a mapper: values in column order plus its position
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub data: Vec<Value>,
    pub meta: Option<HashMap<String, Value>>,
    pub index: usize,
}

/// Consumes rows one at a time, accumulating a typed result
pub trait ResultMapper: Send {
    fn map_row(&mut self, row: &Row) -> Result<(), MapperError>;
}

impl<F> ResultMapper for F
where
    F: FnMut(&Row) -> Result<(), MapperError> + Send,
{
    fn map_row(&mut self, row: &Row) -> Result<(), MapperError> {
        self(row)
    }
}

/// Source of graph connections
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionPool: Send + Sync {
    async fn open(&self) -> Result<Box<dyn GraphConnection>, DriverError>;
}

/// A connection checked out of a [`ConnectionPool`]; released on drop
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GraphConnection: Send {
    async fn query(&mut self, statement: &Statement) -> Result<Box<dyn RowStream>, DriverError>;
}

/// Result rows of a submitted statement
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RowStream: Send {
    /// Next row, or `None` once the stream is exhausted
    async fn next_record(&mut self) -> Result<Option<Record>, DriverError>;
}

/// Query execution seam used by the datastore
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Runs a statement that must produce exactly one row
    async fn query_for_result(
        &self,
        statement: &Statement,
        mapper: &mut dyn ResultMapper,
    ) -> Result<(), GraphError>;

    /// Runs a statement producing any number of rows, returning how many were mapped
    async fn query_for_results(
        &self,
        statement: &Statement,
        mapper: &mut dyn ResultMapper,
    ) -> Result<usize, GraphError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResultMode {
    Single,
    Multiple,
}

/// Pool-backed [`QueryExecutor`]
#[derive(Clone)]
pub struct GraphDb {
    pool: Arc<dyn ConnectionPool>,
}

impl GraphDb {
    pub fn new(pool: Arc<dyn ConnectionPool>) -> Self {
        GraphDb { pool }
    }

    async fn query(
        &self,
        statement: &Statement,
        mapper: &mut dyn ResultMapper,
        mode: ResultMode,
    ) -> Result<usize, GraphError> {
        log::debug!(
            "Executing statement ({:?}): {} params={:?}",
            mode,
            statement.cypher,
            statement.params
        );

        let mut conn = self.pool.open().await.map_err(GraphError::OpenConnection)?;
        let mut rows = conn
            .query(statement)
            .await
            .map_err(GraphError::ExecuteQuery)?;

        let mut index = 0;
        while let Some(record) = rows.next_record().await.map_err(GraphError::ReadRows)? {
            if mode == ResultMode::Single && index > 0 {
                return Err(GraphError::NonUniqueResult);
            }

            let row = Row {
                data: record.data,
                meta: record.meta,
                index,
            };
            mapper.map_row(&row).map_err(GraphError::Mapper)?;
            index += 1;
        }

        if mode == ResultMode::Single && index == 0 {
            return Err(GraphError::NoResults);
        }
        Ok(index)
    }
}

#[async_trait]
impl QueryExecutor for GraphDb {
    async fn query_for_result(
        &self,
        statement: &Statement,
        mapper: &mut dyn ResultMapper,
    ) -> Result<(), GraphError> {
        self.query(statement, mapper, ResultMode::Single)
            .await
            .map(|_| ())
    }

    async fn query_for_results(
        &self,
        statement: &Statement,
        mapper: &mut dyn ResultMapper,
    ) -> Result<usize, GraphError> {
        self.query(statement, mapper, ResultMode::Multiple).await
    }
}
