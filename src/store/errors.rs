use thiserror::Error;

use crate::graph::GraphError;

/// Errors returned by datastore operations.
///
/// Generic executor outcomes are translated at each call site: "no results"
/// becomes the not-found kind for that entity. Cardinality and shape
/// violations in the store stay internal errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("code list not found")]
    CodeListNotFound,

    #[error("edition not found")]
    EditionNotFound,

    #[error("codes not found")]
    CodesNotFound,

    #[error("code not found")]
    CodeNotFound,

    #[error("editionExists: multiple editions found")]
    MultipleEditionsFound { count: i64 },

    #[error("{entity} returned with an empty identifier")]
    MissingIdentifier { entity: &'static str },

    #[error("code list identifier mismatch: requested {requested:?} but found {found:?}")]
    IdentifierMismatch { requested: String, found: String },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::CodeListNotFound
                | StoreError::EditionNotFound
                | StoreError::CodesNotFound
                | StoreError::CodeNotFound
        )
    }
}

/// Maps the executor's "no results" to `not_found`; everything else is internal
pub(crate) fn no_results_as(not_found: StoreError) -> impl FnOnce(GraphError) -> StoreError {
    move |err| match err {
        GraphError::NoResults => not_found,
        other => StoreError::Graph(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(StoreError::CodeListNotFound.is_not_found());
        assert!(StoreError::CodesNotFound.is_not_found());
        assert!(!StoreError::MultipleEditionsFound { count: 2 }.is_not_found());
        assert!(!StoreError::MissingIdentifier { entity: "edition" }.is_not_found());
        assert!(!StoreError::IdentifierMismatch {
            requested: "abc".into(),
            found: "def".into()
        }
        .is_not_found());
        assert!(!StoreError::Graph(GraphError::NoResults).is_not_found());
    }

    #[test]
    fn test_no_results_translation() {
        let translated = no_results_as(StoreError::EditionNotFound)(GraphError::NoResults);
        assert!(matches!(translated, StoreError::EditionNotFound));

        let untouched = no_results_as(StoreError::EditionNotFound)(GraphError::NonUniqueResult);
        assert!(matches!(
            untouched,
            StoreError::Graph(GraphError::NonUniqueResult)
        ));
    }
}
