use thiserror::Error;

/// Failure reported by the graph driver or its connection pool
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("{0}")]
    Neo4j(#[from] neo4rs::Error),

    #[error("failed to decode column '{column}': {message}")]
    Decode { column: String, message: String },

    #[cfg(test)]
    #[error("{0}")]
    Other(String),
}

/// Failure raised while a result mapper consumes a row
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MapperError {
    #[error("expected input value but was nil")]
    NilInput,

    #[error("failed to cast value to requested type, expected {expected:?} but was type {actual:?}")]
    Casting {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("unexpected row shape: {0}")]
    UnexpectedShape(String),
}

/// Errors surfaced by the query executor.
///
/// Connection, query submission and row streaming failures are kept apart so
/// callers can tell a connectivity problem from a malformed query from a
/// broken result stream.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("error opening neo4j connection: {0}")]
    OpenConnection(#[source] DriverError),

    #[error("error executing neo4j query: {0}")]
    ExecuteQuery(#[source] DriverError),

    #[error("unexpected error while reading rows: {0}")]
    ReadRows(#[source] DriverError),

    #[error("mapResult returned an error: {0}")]
    Mapper(#[source] MapperError),

    #[error("unique result expected but was not")]
    NonUniqueResult,

    #[error("no results were found")]
    NoResults,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_prefixes() {
        let open = GraphError::OpenConnection(DriverError::Other("refused".into()));
        let exec = GraphError::ExecuteQuery(DriverError::Other("syntax".into()));
        let read = GraphError::ReadRows(DriverError::Other("reset".into()));
        assert_eq!(open.to_string(), "error opening neo4j connection: refused");
        assert_eq!(exec.to_string(), "error executing neo4j query: syntax");
        assert_eq!(read.to_string(), "unexpected error while reading rows: reset");
    }

    #[test]
    fn test_casting_message_names_both_types() {
        let err = MapperError::Casting {
            expected: "string",
            actual: "int64",
        };
        assert_eq!(
            err.to_string(),
            "failed to cast value to requested type, expected \"string\" but was type \"int64\""
        );
    }
}
