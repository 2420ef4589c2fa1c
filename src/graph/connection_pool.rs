//! Neo4j connection pool backed by `neo4rs`
//!
//! `neo4rs::Graph` owns a bounded pool of Bolt connections. A
//! [`Neo4jConnection`] is a handle onto that pool; the physical connection is
//! checked out when a statement is submitted and goes back to the pool when
//! the returned row stream is dropped.
//!
//! Rows are decoded column by column according to the statement's declared
//! [`ColumnKind`]s, so nothing downstream depends on driver types.
//!
//! A reader task drains the driver stream into a bounded channel. Dropping
//! the [`RowStream`] closes the channel, which stops the reader and hands the
//! Bolt connection back to the pool.

use async_trait::async_trait;
use neo4rs::{query, ConfigBuilder, Graph, Query};
use serde::de::DeserializeOwned;
use std::fmt;
use tokio::sync::mpsc;

use super::errors::DriverError;
use super::value::{Node, Param, Properties, Relationship, Value};
use super::{Column, ColumnKind, ConnectionPool, GraphConnection, Record, RowStream, Statement};
use crate::config::ServerConfig;

/// Decoded rows buffered ahead of the mapper
const ROW_BUFFER: usize = 64;

/// Connection settings for the Neo4j pool
#[derive(Clone)]
pub struct ConnectionConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub max_connections: usize,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("uri", &self.uri)
            .field("user", &self.user)
            .field("password", &"***")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl From<&ServerConfig> for ConnectionConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            uri: config.neo4j_uri.clone(),
            user: config.neo4j_user.clone(),
            password: config.neo4j_password.clone(),
            max_connections: config.neo4j_max_connections,
        }
    }
}

/// [`ConnectionPool`] over a shared `neo4rs::Graph`
pub struct Neo4jPool {
    graph: Graph,
}

impl Neo4jPool {
    /// Build the driver pool. Connections are established lazily by the driver.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, DriverError> {
        let neo_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str())
            .max_connections(config.max_connections)
            .build()?;

        let graph = Graph::connect(neo_config).await?;
        log::info!(
            "Neo4j pool ready: uri={}, max_connections={}",
            config.uri,
            config.max_connections
        );

        Ok(Self { graph })
    }
}

#[async_trait]
impl ConnectionPool for Neo4jPool {
    async fn open(&self) -> Result<Box<dyn GraphConnection>, DriverError> {
        Ok(Box::new(Neo4jConnection {
            graph: self.graph.clone(),
        }))
    }
}

/// Handle used to submit one statement
pub struct Neo4jConnection {
    graph: Graph,
}

#[async_trait]
impl GraphConnection for Neo4jConnection {
    async fn query(&mut self, statement: &Statement) -> Result<Box<dyn RowStream>, DriverError> {
        let mut stream = self.graph.execute(to_neo_query(statement)).await?;
        let columns = statement.columns.clone();
        let (tx, rx) = mpsc::channel(ROW_BUFFER);

        tokio::spawn(async move {
            loop {
                let item = match stream.next().await {
                    Ok(Some(row)) => decode_row(&row, &columns),
                    Ok(None) => break,
                    Err(e) => Err(DriverError::from(e)),
                };
                let failed = item.is_err();
                // Receiver gone: the executor stopped reading
                if tx.send(item).await.is_err() || failed {
                    break;
                }
            }
        });

        Ok(Box::new(Neo4jRowStream { rows: rx }))
    }
}

struct Neo4jRowStream {
    rows: mpsc::Receiver<Result<Record, DriverError>>,
}

#[async_trait]
impl RowStream for Neo4jRowStream {
    async fn next_record(&mut self) -> Result<Option<Record>, DriverError> {
        self.rows.recv().await.transpose()
    }
}

fn to_neo_query(statement: &Statement) -> Query {
    statement
        .params
        .iter()
        .fold(query(&statement.cypher), |q, (name, value)| match value {
            Param::String(s) => q.param(name, s.as_str()),
            Param::Integer(i) => q.param(name, *i),
            Param::Boolean(b) => q.param(name, *b),
        })
}

fn decode_error(column: &Column, err: impl fmt::Display) -> DriverError {
    DriverError::Decode {
        column: column.name.to_string(),
        message: err.to_string(),
    }
}

fn decode_row(row: &neo4rs::Row, columns: &[Column]) -> Result<Record, DriverError> {
    columns
        .iter()
        .map(|column| decode_column(row, column))
        .collect::<Result<Vec<_>, _>>()
        .map(Record::new)
}

fn decode_column(row: &neo4rs::Row, column: &Column) -> Result<Value, DriverError> {
    let name = column.name;
    let value = match column.kind {
        ColumnKind::Node => row
            .get::<neo4rs::Node>(name)
            .map(|node| Value::Node(convert_node(&node))),
        ColumnKind::Relationship => row
            .get::<neo4rs::Relation>(name)
            .map(|rel| Value::Relationship(convert_relationship(&rel))),
        ColumnKind::Integer => row.get::<i64>(name).map(Value::Integer),
        ColumnKind::StringList => row.get::<Vec<String>>(name).map(Value::from),
    };
    value.map_err(|e| decode_error(column, e))
}

/// Uniform typed access over node and relationship properties
trait PropertySource {
    fn property_keys(&self) -> Vec<&str>;
    fn typed<T: DeserializeOwned>(&self, key: &str) -> Option<T>;
}

impl PropertySource for neo4rs::Node {
    fn property_keys(&self) -> Vec<&str> {
        self.keys()
    }

    fn typed<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get::<T>(key).ok()
    }
}

impl PropertySource for neo4rs::Relation {
    fn property_keys(&self) -> Vec<&str> {
        self.keys()
    }

    fn typed<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get::<T>(key).ok()
    }
}

fn property_value(source: &impl PropertySource, key: &str) -> Value {
    // Integers are tried before floats so whole numbers keep their type
    if let Some(s) = source.typed::<String>(key) {
        Value::String(s)
    } else if let Some(i) = source.typed::<i64>(key) {
        Value::Integer(i)
    } else if let Some(b) = source.typed::<bool>(key) {
        Value::Boolean(b)
    } else if let Some(f) = source.typed::<f64>(key) {
        Value::Float(f)
    } else if let Some(list) = source.typed::<Vec<String>>(key) {
        Value::from(list)
    } else {
        log::warn!("Unsupported property type for key '{}', treating as null", key);
        Value::Null
    }
}

fn convert_properties(source: &impl PropertySource) -> Properties {
    source
        .property_keys()
        .into_iter()
        .map(|key| (key.to_string(), property_value(source, key)))
        .collect()
}

fn convert_node(node: &neo4rs::Node) -> Node {
    Node {
        id: node.id(),
        labels: node.labels().into_iter().map(str::to_string).collect(),
        properties: convert_properties(node),
    }
}

fn convert_relationship(rel: &neo4rs::Relation) -> Relationship {
    Relationship {
        id: rel.id(),
        start_node_id: rel.start_node_id(),
        end_node_id: rel.end_node_id(),
        rel_type: rel.typ().to_string(),
        properties: convert_properties(rel),
    }
}
