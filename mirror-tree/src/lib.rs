//! A tree whose structural mutations are mirrored onto an external
//! presentation through injected attach/detach hooks.
//!
//! Every node owns a value, an opaque handle produced by its parent's attach
//! hook, and an ordered list of children. Inserting into a node calls the
//! node's [`Hooks::attach`] to build the child; removing calls
//! [`Hooks::detach`] with the unlinked child so the hook can release its
//! handle. The tree never touches the presentation itself.

mod error;
mod node;

pub use error::{BoxError, Error, Result};
pub use node::{ChildNode, ChildValue, Detached, Hooks, Leaf, Node, NodeId, Parent};
