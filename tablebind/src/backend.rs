//! Presentation backend boundary

use std::fmt;

/// Structural role of a presentation element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Table,
    Head,
    HeaderRow,
    Body,
    Row,
    HeaderCell,
    Cell,
}

impl Role {
    /// Markup tag used when a document is written out.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Head => "thead",
            Self::HeaderRow | Self::Row => "tr",
            Self::Body => "tbody",
            Self::HeaderCell => "th",
            Self::Cell => "td",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// The technology that turns row and cell events into visible elements.
///
/// Handles are opaque to the binder. A handle is created once by a render
/// hook and given back exactly once through [`Backend::remove`].
pub trait Backend {
    type Handle;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create a detached element for `role`, optionally holding `text`.
    fn create(&mut self, role: Role, text: Option<&str>) -> Result<Self::Handle, Self::Error>;

    /// Place `child` under `parent` before the child currently at `index`,
    /// or last when `index` is past the end.
    fn insert(
        &mut self,
        parent: &Self::Handle,
        index: usize,
        child: &Self::Handle,
    ) -> Result<(), Self::Error>;

    /// Unlink `child` from `parent` and release it.
    fn remove(&mut self, parent: &Self::Handle, child: Self::Handle) -> Result<(), Self::Error>;
}
