use crate::node::NodeId;

/// Error type returned by attach/detach hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures raised while mutating a tree.
///
/// Mutations are not transactional. When a hook fails the error is returned
/// immediately and the tree keeps whatever state it had reached: a failed
/// attach leaves `children` untouched, a failed detach has already unlinked
/// the child.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The attach hook failed while building the child for `index`.
    #[error("attach hook failed at index {index}: {source}")]
    Attach {
        index: usize,
        #[source]
        source: BoxError,
    },

    /// The detach hook failed while releasing the child removed from `index`.
    #[error("detach hook failed at index {index}: {source}")]
    Detach {
        index: usize,
        #[source]
        source: BoxError,
    },

    /// A leaf node was asked to hold a child.
    #[error("node {0} is a leaf and cannot hold children")]
    Leaf(NodeId),
}
