//! Operation scripts: a JSON array of edits applied in order.
//!
//! ```json
//! [
//!   {"op": "insert", "record": {"a": 5}, "index": 1},
//!   {"op": "remove", "index": 0},
//!   {"op": "sort", "column": "a", "direction": "descending"}
//! ]
//! ```

use serde::Deserialize;
use tablebind::{Backend, Record, SortDirection, Table};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Insert {
        record: Record,
        index: Option<usize>,
    },
    InsertAll {
        records: Vec<Record>,
        index: Option<usize>,
    },
    Remove {
        index: usize,
    },
    Replace {
        record: Record,
        index: usize,
    },
    Sort {
        column: String,
        #[serde(default)]
        direction: SortDirection,
    },
    Clear,
}

impl Operation {
    pub fn apply<B: Backend>(self, table: &mut Table<B>) -> tablebind::Result<()> {
        match self {
            Self::Insert { record, index } => table.insert(record, index)?,
            Self::InsertAll { records, index } => table.insert_all(records, index)?,
            Self::Remove { index } => table.remove(index)?,
            Self::Replace { record, index } => table.replace(record, index)?,
            Self::Sort { column, direction } => table.sort_by_column(&column, direction)?,
            Self::Clear => table.clear()?,
        };
        Ok(())
    }
}

pub fn parse(json: &str) -> Result<Vec<Operation>, serde_json::Error> {
    serde_json::from_str(json)
}
