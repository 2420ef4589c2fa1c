use crate::graph::properties::{get_node, get_relationship, get_string_property};
use crate::graph::{MapperError, ResultMapper, Row};
use crate::models::{Code, LinkBuilder};

const VALUE_PROPERTY: &str = "value";
const LABEL_PROPERTY: &str = "label";

/// Scope shared by every code in one result
#[derive(Clone, Copy)]
pub struct CodeScope<'a> {
    pub links: &'a LinkBuilder,
    pub code_list_id: &'a str,
    pub edition_id: &'a str,
}

/// Row shape: code node (holds `value`), usedBy relationship (holds `label`)
fn code_from_row(row: &Row, scope: CodeScope<'_>) -> Result<Code, MapperError> {
    let node = get_node(row.data.first())?;
    let rel = get_relationship(row.data.get(1))?;

    let value = get_string_property(VALUE_PROPERTY, Some(&node.properties))?;
    let label = get_string_property(LABEL_PROPERTY, Some(&rel.properties))?;

    Ok(scope.links.code(
        scope.code_list_id,
        scope.edition_id,
        &node.id.to_string(),
        &value,
        &label,
    ))
}

pub struct CodesMapper<'a> {
    scope: CodeScope<'a>,
    pub items: Vec<Code>,
}

impl<'a> CodesMapper<'a> {
    pub fn new(scope: CodeScope<'a>) -> Self {
        Self {
            scope,
            items: Vec::new(),
        }
    }
}

impl ResultMapper for CodesMapper<'_> {
    fn map_row(&mut self, row: &Row) -> Result<(), MapperError> {
        let code = code_from_row(row, self.scope)?;
        self.items.push(code);
        Ok(())
    }
}

pub struct CodeMapper<'a> {
    scope: CodeScope<'a>,
    pub code: Option<Code>,
}

impl<'a> CodeMapper<'a> {
    pub fn new(scope: CodeScope<'a>) -> Self {
        Self { scope, code: None }
    }
}

impl ResultMapper for CodeMapper<'_> {
    fn map_row(&mut self, row: &Row) -> Result<(), MapperError> {
        self.code = Some(code_from_row(row, self.scope)?);
        Ok(())
    }
}
