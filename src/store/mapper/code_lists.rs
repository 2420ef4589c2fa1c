use crate::graph::properties::get_string_list;
use crate::graph::{MapperError, ResultMapper, Row};
use crate::models::{CodeList, LinkBuilder};

/// Recovers a code list identifier from a node's label set.
///
/// The first label containing `prefix` wins; the prefix is removed from it
/// and the remainder is the identifier.
pub fn identifier_from_labels(labels: &[&str], prefix: &str) -> Option<String> {
    labels
        .iter()
        .find(|label| label.contains(prefix))
        .map(|label| label.replace(prefix, ""))
}

/// Accumulates code lists from rows of label sets. Rows without a matching
/// label contribute nothing.
pub struct CodeListsMapper<'a> {
    links: &'a LinkBuilder,
    prefix: &'a str,
    pub items: Vec<CodeList>,
}

impl<'a> CodeListsMapper<'a> {
    pub fn new(links: &'a LinkBuilder, prefix: &'a str) -> Self {
        Self {
            links,
            prefix,
            items: Vec::new(),
        }
    }
}

impl ResultMapper for CodeListsMapper<'_> {
    fn map_row(&mut self, row: &Row) -> Result<(), MapperError> {
        let labels = get_string_list(row.data.first())?;
        if let Some(id) = identifier_from_labels(&labels, self.prefix) {
            self.items.push(self.links.code_list(&id));
        }
        Ok(())
    }
}

/// Single code list from one node's label set.
///
/// The exact label of the requested code list is preferred, so identifiers
/// that themselves contain the prefix survive; otherwise the label scan
/// decides and the caller compares the result.
pub struct CodeListMapper<'a> {
    links: &'a LinkBuilder,
    prefix: &'a str,
    requested: &'a str,
    pub code_list: Option<CodeList>,
}

impl<'a> CodeListMapper<'a> {
    pub fn new(links: &'a LinkBuilder, prefix: &'a str, requested: &'a str) -> Self {
        Self {
            links,
            prefix,
            requested,
            code_list: None,
        }
    }
}

impl ResultMapper for CodeListMapper<'_> {
    fn map_row(&mut self, row: &Row) -> Result<(), MapperError> {
        let labels = get_string_list(row.data.first())?;
        let requested_label = format!("{}{}", self.prefix, self.requested);

        let id = if labels.iter().any(|label| *label == requested_label) {
            Some(self.requested.to_string())
        } else {
            identifier_from_labels(&labels, self.prefix)
        };
        self.code_list = id.map(|id| self.links.code_list(&id));
        Ok(())
    }
}
