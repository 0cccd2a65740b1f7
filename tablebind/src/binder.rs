//! Record-level table binding.
//!
//! A [`Table`] owns a two-level mirrored tree: the root's children are row
//! nodes (one per record) and each row's children are cell nodes (one per
//! column). [`RowHooks`] and [`CellHooks`] translate tree mutations into
//! render hook and backend calls; the public API addresses everything by
//! flat (row, column) coordinates.

use std::cmp::Ordering;
use std::marker::PhantomData;
use std::rc::Rc;

use mirror_tree::{BoxError, Hooks, Leaf, Node, Parent};
use serde::{Deserialize, Serialize};

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::hooks::{CellRef, RenderHooks, Surface};
use crate::record::{Record, Value, compare_values, infer_columns};

/// Tree context: the backend plus the hook set that drives it.
pub struct Canvas<B: Backend> {
    backend: B,
    hooks: RenderHooks<B>,
}

impl<B: Backend> Canvas<B> {
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn hooks(&self) -> &RenderHooks<B> {
        &self.hooks
    }
}

/// Hooks owned by the root: build and tear down one row per record.
pub struct RowHooks<B> {
    columns: Rc<[String]>,
    marker: PhantomData<fn() -> B>,
}

impl<B> RowHooks<B> {
    fn new(columns: Rc<[String]>) -> Self {
        Self {
            columns,
            marker: PhantomData,
        }
    }
}

impl<B: Backend> Hooks for RowHooks<B> {
    type Value = Vec<Record>;
    type Handle = B::Handle;
    type Context = Canvas<B>;
    type Child = Node<CellHooks<B>>;

    fn attach(
        &mut self,
        cx: &mut Canvas<B>,
        parent: Parent<'_, Self>,
        record: Record,
        index: usize,
    ) -> std::result::Result<Node<CellHooks<B>>, BoxError> {
        let handle = cx.hooks.row(&mut cx.backend, &record, index)?;
        cx.backend.insert(parent.handle, index, &handle)?;

        let fields: Vec<Value> = self
            .columns
            .iter()
            .map(|key| record.get(key).cloned().unwrap_or(Value::Null))
            .collect();

        // The row keeps the whole record, fields outside the columns included.
        let mut row = Node::new(record, handle, CellHooks::new(self.columns.clone()));
        let built = row.insert_all(cx, fields, None).map(|_| ());
        if let Err(err) = built {
            log::debug!("[table] row {} failed to build: {}", index, err);
            if let Err(cleanup) = row.clear(cx) {
                log::warn!("[table] row {} cells not released: {}", index, cleanup);
            }
            let row = row.into_parts();
            if let Err(cleanup) = cx.backend.remove(parent.handle, row.handle) {
                log::warn!("[table] row {} handle not released: {}", index, cleanup);
            }
            return Err(err.into());
        }

        // The collection slot mirrors the row record, missing columns as null.
        parent.value.insert(index, row.value().clone());
        Ok(row)
    }

    fn detach(
        &mut self,
        cx: &mut Canvas<B>,
        parent: Parent<'_, Self>,
        mut node: Node<CellHooks<B>>,
        index: usize,
    ) -> std::result::Result<(), BoxError> {
        node.clear(cx)?;
        let row = node.into_parts();
        cx.backend.remove(parent.handle, row.handle)?;
        if index < parent.value.len() {
            parent.value.remove(index);
        }
        Ok(())
    }
}

/// Hooks owned by a row: build and tear down one cell per column.
pub struct CellHooks<B> {
    columns: Rc<[String]>,
    marker: PhantomData<fn() -> B>,
}

impl<B> CellHooks<B> {
    fn new(columns: Rc<[String]>) -> Self {
        Self {
            columns,
            marker: PhantomData,
        }
    }
}

impl<B: Backend> Hooks for CellHooks<B> {
    type Value = Record;
    type Handle = B::Handle;
    type Context = Canvas<B>;
    type Child = Node<Leaf<Value, B::Handle, Canvas<B>>>;

    fn attach(
        &mut self,
        cx: &mut Canvas<B>,
        parent: Parent<'_, Self>,
        value: Value,
        index: usize,
    ) -> std::result::Result<Self::Child, BoxError> {
        let key = self.columns.get(index).ok_or(Error::ColumnIndex(index))?;
        let cell = CellRef {
            key,
            value: &value,
            index,
            row: Some(&*parent.value),
        };
        let handle = cx.hooks.cell(&mut cx.backend, &cell)?;
        cx.backend.insert(parent.handle, index, &handle)?;

        parent.value.insert(key.clone(), value.clone());
        Ok(Node::new(value, handle, Leaf::new()))
    }

    fn detach(
        &mut self,
        cx: &mut Canvas<B>,
        parent: Parent<'_, Self>,
        node: Self::Child,
        index: usize,
    ) -> std::result::Result<(), BoxError> {
        let cell = node.into_parts();
        cx.backend.remove(parent.handle, cell.handle)?;
        if let Some(key) = self.columns.get(index) {
            parent.value.remove(key);
        }
        Ok(())
    }
}

/// Order applied by [`Table::sort_by_column`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Bind-time configuration.
///
/// # Example
///
/// ```
/// use tablebind::{Document, RenderHooks, TableOptions};
///
/// let options = TableOptions::<Document>::new()
///     .with_columns(["name", "age"])
///     .with_hooks(RenderHooks::new());
/// assert_eq!(options.columns.as_deref(), Some(&["name".to_string(), "age".to_string()][..]));
/// ```
pub struct TableOptions<B: Backend> {
    /// Column keys in display order. Inferred from the records when `None`.
    pub columns: Option<Vec<String>>,

    /// Render hooks; unset hooks use the built-in defaults.
    pub hooks: RenderHooks<B>,
}

impl<B: Backend> Default for TableOptions<B> {
    fn default() -> Self {
        Self {
            columns: None,
            hooks: RenderHooks::default(),
        }
    }
}

impl<B: Backend> TableOptions<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the column keys instead of inferring them.
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_hooks(mut self, hooks: RenderHooks<B>) -> Self {
        self.hooks = hooks;
        self
    }
}

/// A collection of records mirrored onto a backend.
pub struct Table<B: Backend> {
    columns: Rc<[String]>,
    canvas: Canvas<B>,
    root: Node<RowHooks<B>>,
    surface: B::Handle,
    header: B::Handle,
    header_cells: Vec<B::Handle>,
}

impl<B: Backend> Table<B> {
    /// Build the table shell and one row per record.
    pub fn bind(backend: B, records: Vec<Record>, options: TableOptions<B>) -> Result<Self> {
        let TableOptions { columns, hooks } = options;
        let columns: Rc<[String]> = columns.unwrap_or_else(|| infer_columns(&records)).into();
        let mut canvas = Canvas { backend, hooks };

        let Surface { root, header, body } = canvas
            .hooks
            .table(&mut canvas.backend, &columns)
            .map_err(Error::surface)?;

        let mut header_cells = Vec::with_capacity(columns.len());
        for (index, key) in columns.iter().enumerate() {
            let label = Value::String(key.clone());
            let cell = CellRef {
                key,
                value: &label,
                index,
                row: None,
            };
            let handle = canvas
                .hooks
                .cell(&mut canvas.backend, &cell)
                .map_err(Error::surface)?;
            canvas
                .backend
                .insert(&header, index, &handle)
                .map_err(Error::surface)?;
            header_cells.push(handle);
        }

        let mut rows = Node::new(
            Vec::with_capacity(records.len()),
            body,
            RowHooks::new(columns.clone()),
        );
        rows.insert_all(&mut canvas, records, None)?;

        log::debug!(
            "[table] bound {} records over {} columns",
            rows.len(),
            columns.len()
        );

        Ok(Self {
            columns,
            canvas,
            root: rows,
            surface: root,
            header,
            header_cells,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == key)
    }

    /// The live collection. Entry `i` always equals [`Table::record`]`(i)`.
    pub fn records(&self) -> &[Record] {
        self.root.value()
    }

    /// The record held by the row at `row`. Columns it lacked are filled
    /// with null; fields outside the columns are kept.
    pub fn record(&self, row: usize) -> Option<&Record> {
        self.root.get(row).map(Node::value)
    }

    /// The value shown at (`row`, `col`).
    pub fn value(&self, row: usize, col: usize) -> Option<&Value> {
        self.root.get(row)?.get(col).map(Node::value)
    }

    pub fn value_by_key(&self, row: usize, key: &str) -> Option<&Value> {
        self.value(row, self.column_index(key)?)
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Insert a record at `index`; `None` or an index past the end appends.
    pub fn insert(&mut self, record: Record, index: Option<usize>) -> Result<&mut Self> {
        self.root.insert(&mut self.canvas, record, index)?;
        Ok(self)
    }

    pub fn insert_all<I>(&mut self, records: I, index: Option<usize>) -> Result<&mut Self>
    where
        I: IntoIterator<Item = Record>,
    {
        self.root.insert_all(&mut self.canvas, records, index)?;
        Ok(self)
    }

    /// Remove the record at `index`. Out of range is a no-op.
    pub fn remove(&mut self, index: usize) -> Result<&mut Self> {
        self.root.remove(&mut self.canvas, index)?;
        Ok(self)
    }

    /// Rebuild the row at `index` from `record`.
    pub fn replace(&mut self, record: Record, index: usize) -> Result<&mut Self> {
        self.root.replace(&mut self.canvas, record, index)?;
        Ok(self)
    }

    pub fn clear(&mut self) -> Result<&mut Self> {
        self.root.clear(&mut self.canvas)?;
        Ok(self)
    }

    /// Reorder records with `compare`. Rows that already sit at their sorted
    /// position are left alone; every other row is rebuilt.
    pub fn sort_by<F>(&mut self, compare: F) -> Result<&mut Self>
    where
        F: FnMut(&Record, &Record) -> Ordering,
    {
        self.root.sort_by(&mut self.canvas, compare)?;
        Ok(self)
    }

    /// Sort by the values of one column.
    pub fn sort_by_column(&mut self, key: &str, direction: SortDirection) -> Result<&mut Self> {
        if self.column_index(key).is_none() {
            return Err(Error::UnknownColumn(key.to_string()));
        }
        self.sort_by(|a, b| {
            let ordering = compare_values(
                a.get(key).unwrap_or(&Value::Null),
                b.get(key).unwrap_or(&Value::Null),
            );
            direction.apply(ordering)
        })
    }

    pub fn root(&self) -> &Node<RowHooks<B>> {
        &self.root
    }

    pub fn backend(&self) -> &B {
        &self.canvas.backend
    }

    pub fn hooks(&self) -> &RenderHooks<B> {
        &self.canvas.hooks
    }

    /// Outermost handle built by the table hook.
    pub fn surface(&self) -> &B::Handle {
        &self.surface
    }

    /// Container holding the header cells.
    pub fn header(&self) -> &B::Handle {
        &self.header
    }

    pub fn header_cells(&self) -> &[B::Handle] {
        &self.header_cells
    }

    /// Container holding the rows.
    pub fn body(&self) -> &B::Handle {
        self.root.handle()
    }

    /// Give up the binding and keep the presentation as it is.
    pub fn into_backend(self) -> B {
        self.canvas.backend
    }
}
