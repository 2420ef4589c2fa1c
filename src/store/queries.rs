//! Cypher statements for each datastore operation.
//!
//! Code list identifiers are part of a node label and cannot be bound, so
//! they are written into the text as escaped label identifiers. Edition and
//! code values are always bind parameters.

use crate::graph::{ColumnKind, Statement};

const CODE_LABEL: &str = "_code";
const USED_BY: &str = "usedBy";

/// Quotes `label` as a cypher identifier
pub fn escape_label(label: &str) -> String {
    format!("`{}`", label.replace('`', "``"))
}

/// Prefix every per-code-list label starts with
pub fn label_prefix(code_list_label: &str) -> String {
    format!("_{}_", code_list_label)
}

fn code_list_node_label(code_list_label: &str, code_list_id: &str) -> String {
    escape_label(&format!("{}{}", label_prefix(code_list_label), code_list_id))
}

pub fn code_lists(code_list_label: &str) -> Statement {
    Statement::new(format!(
        "MATCH (i) WHERE i:{} RETURN DISTINCT labels(i) AS labels",
        escape_label(&format!("_{}", code_list_label))
    ))
    .column("labels", ColumnKind::StringList)
}

pub fn code_list(code_list_label: &str, code_list_id: &str) -> Statement {
    Statement::new(format!(
        "MATCH (i:{}) RETURN labels(i) AS labels LIMIT 1",
        code_list_node_label(code_list_label, code_list_id)
    ))
    .column("labels", ColumnKind::StringList)
}

pub fn editions(code_list_label: &str, code_list_id: &str) -> Statement {
    Statement::new(format!(
        "MATCH (i:{}) RETURN i ORDER BY i.edition",
        code_list_node_label(code_list_label, code_list_id)
    ))
    .column("i", ColumnKind::Node)
}

pub fn edition(code_list_label: &str, code_list_id: &str, edition: &str) -> Statement {
    Statement::new(format!(
        "MATCH (i:{} {{edition: $edition}}) RETURN i",
        code_list_node_label(code_list_label, code_list_id)
    ))
    .param("edition", edition)
    .column("i", ColumnKind::Node)
}

pub fn count_editions(code_list_label: &str, code_list_id: &str, edition: &str) -> Statement {
    Statement::new(format!(
        "MATCH (cl:{}) WHERE cl.edition = $edition RETURN count(*) AS count",
        code_list_node_label(code_list_label, code_list_id)
    ))
    .param("edition", edition)
    .column("count", ColumnKind::Integer)
}

pub fn codes(code_list_label: &str, code_list_id: &str, edition: &str) -> Statement {
    Statement::new(format!(
        "MATCH (c:{})-[r:{}]->(cl:{}) WHERE cl.edition = $edition RETURN c, r ORDER BY c.value",
        CODE_LABEL,
        USED_BY,
        code_list_node_label(code_list_label, code_list_id)
    ))
    .param("edition", edition)
    .column("c", ColumnKind::Node)
    .column("r", ColumnKind::Relationship)
}

pub fn code(code_list_label: &str, code_list_id: &str, edition: &str, code: &str) -> Statement {
    Statement::new(format!(
        "MATCH (c:{})-[r:{}]->(cl:{}) WHERE cl.edition = $edition AND c.value = $code RETURN c, r",
        CODE_LABEL,
        USED_BY,
        code_list_node_label(code_list_label, code_list_id)
    ))
    .param("edition", edition)
    .param("code", code)
    .column("c", ColumnKind::Node)
    .column("r", ColumnKind::Relationship)
}
