//! Render hook configuration.
//!
//! [`RenderHooks`] has one optional field per hook. Any field left unset
//! falls back to the built-in default for that hook alone, so a caller can
//! override just the cell formatting and keep the default table and rows.
//! The defaults build bare structural elements through [`Backend::create`]
//! and carry no styling.

use std::fmt;

use crate::backend::{Backend, Role};
use crate::record::{Record, Value, display_value};

/// Handles produced by the table hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface<H> {
    /// Outermost element of the table.
    pub root: H,
    /// Container that receives one header cell per column.
    pub header: H,
    /// Container that receives one row per record.
    pub body: H,
}

/// A field about to be rendered.
#[derive(Debug, Clone, Copy)]
pub struct CellRef<'a> {
    /// Column key of the field.
    pub key: &'a str,
    /// Value to display. For header cells this is the column key.
    pub value: &'a Value,
    /// Column position.
    pub index: usize,
    /// Record the field belongs to, `None` for header cells.
    pub row: Option<&'a Record>,
}

impl CellRef<'_> {
    pub fn is_header(&self) -> bool {
        self.row.is_none()
    }
}

pub type TableHook<B> = Box<
    dyn FnMut(
        &mut B,
        &[String],
    ) -> Result<Surface<<B as Backend>::Handle>, <B as Backend>::Error>,
>;

pub type RowHook<B> =
    Box<dyn FnMut(&mut B, &Record, usize) -> Result<<B as Backend>::Handle, <B as Backend>::Error>>;

pub type CellHook<B> = Box<
    dyn FnMut(&mut B, &CellRef<'_>) -> Result<<B as Backend>::Handle, <B as Backend>::Error>,
>;

/// Hook set used to build the presentation.
pub struct RenderHooks<B: Backend> {
    /// Builds the table shell once, at bind time.
    pub table: Option<TableHook<B>>,
    /// Builds the element for one record about to be placed at an index.
    /// Only record rows go through it; the header row belongs to the table
    /// hook.
    pub row: Option<RowHook<B>>,
    /// Builds the element for one field, or one header label.
    pub cell: Option<CellHook<B>>,
}

impl<B: Backend> Default for RenderHooks<B> {
    fn default() -> Self {
        Self {
            table: None,
            row: None,
            cell: None,
        }
    }
}

impl<B: Backend> RenderHooks<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut B, &[String]) -> Result<Surface<B::Handle>, B::Error> + 'static,
    {
        self.table = Some(Box::new(hook));
        self
    }

    pub fn with_row<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut B, &Record, usize) -> Result<B::Handle, B::Error> + 'static,
    {
        self.row = Some(Box::new(hook));
        self
    }

    pub fn with_cell<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut B, &CellRef<'_>) -> Result<B::Handle, B::Error> + 'static,
    {
        self.cell = Some(Box::new(hook));
        self
    }

    pub(crate) fn table(
        &mut self,
        backend: &mut B,
        columns: &[String],
    ) -> Result<Surface<B::Handle>, B::Error> {
        match self.table.as_mut() {
            Some(hook) => hook(backend, columns),
            None => default_table(backend, columns),
        }
    }

    pub(crate) fn row(
        &mut self,
        backend: &mut B,
        record: &Record,
        index: usize,
    ) -> Result<B::Handle, B::Error> {
        match self.row.as_mut() {
            Some(hook) => hook(backend, record, index),
            None => default_row(backend, record, index),
        }
    }

    pub(crate) fn cell(&mut self, backend: &mut B, cell: &CellRef<'_>) -> Result<B::Handle, B::Error> {
        match self.cell.as_mut() {
            Some(hook) => hook(backend, cell),
            None => default_cell(backend, cell),
        }
    }
}

impl<B: Backend> fmt::Debug for RenderHooks<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = |set: bool| if set { "custom" } else { "default" };
        f.debug_struct("RenderHooks")
            .field("table", &state(self.table.is_some()))
            .field("row", &state(self.row.is_some()))
            .field("cell", &state(self.cell.is_some()))
            .finish()
    }
}

/// Default table hook: `Table` holding a `Head` with one `HeaderRow`, then an
/// empty `Body`. The header row is created here directly, so a custom row
/// hook never styles it; override this hook too for a matching header.
pub fn default_table<B: Backend>(
    backend: &mut B,
    _columns: &[String],
) -> Result<Surface<B::Handle>, B::Error> {
    let root = backend.create(Role::Table, None)?;
    let head = backend.create(Role::Head, None)?;
    let header = backend.create(Role::HeaderRow, None)?;
    let body = backend.create(Role::Body, None)?;

    backend.insert(&head, 0, &header)?;
    backend.insert(&root, 0, &head)?;
    backend.insert(&root, 1, &body)?;

    Ok(Surface { root, header, body })
}

/// Default row hook: an empty `Row`.
pub fn default_row<B: Backend>(
    backend: &mut B,
    _record: &Record,
    _index: usize,
) -> Result<B::Handle, B::Error> {
    backend.create(Role::Row, None)
}

/// Default cell hook: a `HeaderCell` or `Cell` holding the displayed value.
pub fn default_cell<B: Backend>(backend: &mut B, cell: &CellRef<'_>) -> Result<B::Handle, B::Error> {
    let role = if cell.is_header() {
        Role::HeaderCell
    } else {
        Role::Cell
    };
    let text = display_value(cell.value);
    backend.create(role, Some(text.as_str()))
}
