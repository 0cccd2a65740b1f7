//! Error types

use mirror_tree::BoxError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A row or cell hook failed while the tree was being mutated.
    #[error(transparent)]
    Tree(#[from] mirror_tree::Error),

    /// The table hook or a header cell failed at bind time.
    #[error("failed to build table surface: {0}")]
    Surface(#[source] BoxError),

    #[error("collection must be an array of records")]
    NotACollection,

    #[error("element {index} of the collection is not a record")]
    NotARecord { index: usize },

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("no column at position {0}")]
    ColumnIndex(usize),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn surface(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Surface(Box::new(err))
    }
}
