use crate::graph::properties::{get_node, get_string_property};
use crate::graph::{MapperError, ResultMapper, Row};
use crate::models::{Edition, LinkBuilder};

const EDITION_PROPERTY: &str = "edition";
const LABEL_PROPERTY: &str = "label";

fn edition_from_row(row: &Row, links: &LinkBuilder, code_list_id: &str) -> Result<Edition, MapperError> {
    let node = get_node(row.data.first())?;
    let id = get_string_property(EDITION_PROPERTY, Some(&node.properties))?;
    let label = get_string_property(LABEL_PROPERTY, Some(&node.properties))?;
    Ok(links.edition(code_list_id, &id, &label))
}

pub struct EditionsMapper<'a> {
    links: &'a LinkBuilder,
    code_list_id: &'a str,
    pub items: Vec<Edition>,
}

impl<'a> EditionsMapper<'a> {
    pub fn new(links: &'a LinkBuilder, code_list_id: &'a str) -> Self {
        Self {
            links,
            code_list_id,
            items: Vec::new(),
        }
    }
}

impl ResultMapper for EditionsMapper<'_> {
    fn map_row(&mut self, row: &Row) -> Result<(), MapperError> {
        let edition = edition_from_row(row, self.links, self.code_list_id)?;
        self.items.push(edition);
        Ok(())
    }
}

pub struct EditionMapper<'a> {
    links: &'a LinkBuilder,
    code_list_id: &'a str,
    pub edition: Option<Edition>,
}

impl<'a> EditionMapper<'a> {
    pub fn new(links: &'a LinkBuilder, code_list_id: &'a str) -> Self {
        Self {
            links,
            code_list_id,
            edition: None,
        }
    }
}

impl ResultMapper for EditionMapper<'_> {
    fn map_row(&mut self, row: &Row) -> Result<(), MapperError> {
        self.edition = Some(edition_from_row(row, self.links, self.code_list_id)?);
        Ok(())
    }
}
