use crate::graph::properties::get_i64;
use crate::graph::{MapperError, ResultMapper, Row};

/// Extracts the single int64 of a `count(*)` row
#[derive(Debug, Default)]
pub struct CountMapper {
    pub count: i64,
}

impl ResultMapper for CountMapper {
    fn map_row(&mut self, row: &Row) -> Result<(), MapperError> {
        if row.data.len() != 1 {
            return Err(MapperError::UnexpectedShape(format!(
                "get count error: expecting single result value but {} returned",
                row.data.len()
            )));
        }
        self.count = get_i64(row.data.first())?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn row(data: Vec<crate::graph::Value>) -> Row {
    Row {
        data,
        meta: None,
        index: 0,
    }
}
