//! Keeps an ordered collection of records mirrored onto a presentation.
//!
//! A [`Table`] binds records to a fixed, ordered set of column keys and
//! drives a [`Backend`] through row and cell hooks. Inserting, removing and
//! sorting records only builds or releases the rows and cells that changed.
//!
//! ```
//! use serde_json::json;
//! use tablebind::{Document, Table, TableOptions, records_from_json};
//!
//! let records = records_from_json(json!([{"a": 1, "b": 2}, {"a": 3, "b": 4}])).unwrap();
//! let mut table = Table::bind(Document::new(), records, TableOptions::new()).unwrap();
//!
//! let row = records_from_json(json!([{"a": 5, "b": 6}])).unwrap().remove(0);
//! table.insert(row, Some(1)).unwrap();
//! assert_eq!(table.value_by_key(1, "a"), Some(&json!(5)));
//! ```

pub mod backend;
pub mod binder;
pub mod document;
pub mod error;
pub mod hooks;
pub mod record;
pub mod text;

pub use backend::{Backend, Role};
pub use binder::{Canvas, CellHooks, RowHooks, SortDirection, Table, TableOptions};
pub use document::{Document, DocumentError, Element, ElementId};
pub use error::{Error, Result};
pub use hooks::{CellRef, RenderHooks, Surface};
pub use record::{
    Record, Value, compare_values, display_value, infer_columns, records_from_json,
    records_from_str,
};
pub use text::{TextOptions, render_table};
