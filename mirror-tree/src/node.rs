use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::error::{BoxError, Error, Result};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique node identity.
///
/// Two nodes never share an id, even after one of them has been detached.
/// [`Node::sort_by`] compares ids, not values, to decide whether a slot is
/// already settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// Value type of the children of a node governed by `K`.
pub type ChildValue<K> = <<K as Hooks>::Child as ChildNode>::Value;

/// What a parent needs from the nodes it holds.
///
/// Implemented by [`Node`]; hooks name `Node<ChildHooks>` as their
/// [`Hooks::Child`].
pub trait ChildNode {
    type Value;

    fn id(&self) -> NodeId;

    fn value(&self) -> &Self::Value;

    /// Record the parent link. Called when the node is spliced in.
    fn set_parent(&mut self, parent: NodeId);
}

/// Attach/detach capability injected into a node.
///
/// The hooks owned by a node govern that node's children: `attach` builds a
/// child for a newly inserted value, `detach` releases a removed child.
/// Both run synchronously on the caller's stack and receive the shared
/// `Context` (the presentation backend, typically) by mutable reference.
pub trait Hooks: Sized {
    /// Value held by the node these hooks are attached to.
    type Value;
    /// External handle held by the node these hooks are attached to.
    type Handle;
    /// State shared by every level of the tree.
    type Context;
    /// Node type of the children this node builds, usually
    /// `Node<ChildHooks>`.
    type Child: ChildNode;

    /// Build the child for `value`, which will be spliced in at `index`.
    ///
    /// `index` is already clamped to `0..=len`, so it is the position the
    /// child will occupy once inserted. The returned node is spliced in
    /// as-is.
    fn attach(
        &mut self,
        cx: &mut Self::Context,
        parent: Parent<'_, Self>,
        value: ChildValue<Self>,
        index: usize,
    ) -> Result<Self::Child, BoxError>;

    /// Release `node`, which was just unlinked from `index`.
    fn detach(
        &mut self,
        cx: &mut Self::Context,
        parent: Parent<'_, Self>,
        node: Self::Child,
        index: usize,
    ) -> Result<(), BoxError>;
}

/// The node a hook is being called for.
pub struct Parent<'a, K: Hooks> {
    pub id: NodeId,
    pub value: &'a mut K::Value,
    pub handle: &'a mut K::Handle,
}

/// Hooks for nodes that never hold children.
pub struct Leaf<V, H, C> {
    marker: PhantomData<fn() -> (V, H, C)>,
}

impl<V, H, C> Leaf<V, H, C> {
    pub fn new() -> Self {
        Self {
            marker: PhantomData,
        }
    }
}

impl<V, H, C> Default for Leaf<V, H, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, H, C> Hooks for Leaf<V, H, C> {
    type Value = V;
    type Handle = H;
    type Context = C;
    type Child = Node<Self>;

    fn attach(
        &mut self,
        _cx: &mut C,
        parent: Parent<'_, Self>,
        _value: V,
        _index: usize,
    ) -> Result<Node<Self>, BoxError> {
        Err(Box::new(Error::Leaf(parent.id)))
    }

    fn detach(
        &mut self,
        _cx: &mut C,
        _parent: Parent<'_, Self>,
        _node: Node<Self>,
        _index: usize,
    ) -> Result<(), BoxError> {
        Ok(())
    }
}

/// What remains of a node after it has been taken apart by a detach hook.
pub struct Detached<K: Hooks> {
    pub id: NodeId,
    pub value: K::Value,
    pub handle: K::Handle,
}

/// One element of the mirrored tree.
pub struct Node<K: Hooks> {
    id: NodeId,
    parent: Option<NodeId>,
    value: K::Value,
    handle: K::Handle,
    hooks: K,
    children: Vec<K::Child>,
}

impl<K: Hooks> Node<K> {
    /// Create a detached node. The parent link is filled in when the node is
    /// returned from an attach hook.
    pub fn new(value: K::Value, handle: K::Handle, hooks: K) -> Self {
        Self {
            id: NodeId::next(),
            parent: None,
            value,
            handle,
            hooks,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn value(&self) -> &K::Value {
        &self.value
    }

    pub fn handle(&self) -> &K::Handle {
        &self.handle
    }

    pub fn hooks(&self) -> &K {
        &self.hooks
    }

    pub fn children(&self) -> &[K::Child] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Child at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<&K::Child> {
        self.children.get(index)
    }

    fn clamp(&self, index: Option<usize>) -> usize {
        let len = self.children.len();
        index.map_or(len, |index| index.min(len))
    }

    /// Insert `value` at `index` (appends when `None` or past the end).
    pub fn insert(
        &mut self,
        cx: &mut K::Context,
        value: ChildValue<K>,
        index: Option<usize>,
    ) -> Result<&mut Self> {
        let index = self.clamp(index);
        let parent = Parent {
            id: self.id,
            value: &mut self.value,
            handle: &mut self.handle,
        };
        let mut child = self
            .hooks
            .attach(cx, parent, value, index)
            .map_err(|source| Error::Attach { index, source })?;
        child.set_parent(self.id);

        log::trace!("[tree] attached {} to {} at {}", child.id(), self.id, index);
        self.children.insert(index, child);
        Ok(self)
    }

    /// Insert every value in order, starting at `index`.
    ///
    /// Each attach hook sees the index valid at the moment of its own
    /// insert, not the final layout of the batch.
    pub fn insert_all<I>(
        &mut self,
        cx: &mut K::Context,
        values: I,
        index: Option<usize>,
    ) -> Result<&mut Self>
    where
        I: IntoIterator<Item = ChildValue<K>>,
    {
        let base = self.clamp(index);
        for (offset, value) in values.into_iter().enumerate() {
            self.insert(cx, value, Some(base + offset))?;
        }
        Ok(self)
    }

    /// Remove the child at `index`. Out of range is a no-op.
    pub fn remove(&mut self, cx: &mut K::Context, index: usize) -> Result<&mut Self> {
        if index >= self.children.len() {
            log::trace!(
                "[tree] remove({}) on {} ignored, {} children",
                index,
                self.id,
                self.children.len()
            );
            return Ok(self);
        }

        let child = self.children.remove(index);
        log::trace!("[tree] detaching {} from {} at {}", child.id(), self.id, index);

        let parent = Parent {
            id: self.id,
            value: &mut self.value,
            handle: &mut self.handle,
        };
        self.hooks
            .detach(cx, parent, child, index)
            .map_err(|source| Error::Detach { index, source })?;
        Ok(self)
    }

    /// Rebuild the slot at `index` from `value`: a remove followed by an
    /// insert, never an in-place update.
    pub fn replace(
        &mut self,
        cx: &mut K::Context,
        value: ChildValue<K>,
        index: usize,
    ) -> Result<&mut Self> {
        self.remove(cx, index)?;
        self.insert(cx, value, Some(index))
    }

    /// Remove every child, last first.
    pub fn clear(&mut self, cx: &mut K::Context) -> Result<&mut Self> {
        while let Some(last) = self.children.len().checked_sub(1) {
            self.remove(cx, last)?;
        }
        Ok(self)
    }

    /// Reorder children by a stable sort of their values.
    ///
    /// Single forward pass: every index whose current child is not the same
    /// node as the sorted child for that index is replaced with a copy of the
    /// sorted child's value. Nodes are matched by identity at a position
    /// only, so a rotation rebuilds every element even though most of them
    /// only shifted by one.
    pub fn sort_by<F>(&mut self, cx: &mut K::Context, mut compare: F) -> Result<&mut Self>
    where
        F: FnMut(&ChildValue<K>, &ChildValue<K>) -> Ordering,
        ChildValue<K>: Clone,
    {
        let mut order: Vec<usize> = (0..self.children.len()).collect();
        order.sort_by(|&a, &b| compare(self.children[a].value(), self.children[b].value()));

        // Values are captured up front because replacing a slot drops the
        // node that may be needed by a later slot.
        let sorted: Vec<(NodeId, Option<ChildValue<K>>)> = order
            .iter()
            .enumerate()
            .map(|(index, &from)| {
                let node = &self.children[from];
                (node.id(), (from != index).then(|| node.value().clone()))
            })
            .collect();

        let mut rebuilt = 0;
        for (index, (id, value)) in sorted.into_iter().enumerate() {
            if self.children[index].id() == id {
                continue;
            }
            if let Some(value) = value {
                self.replace(cx, value, index)?;
                rebuilt += 1;
            }
        }

        log::debug!(
            "[tree] sorted {}: rebuilt {} of {} children",
            self.id,
            rebuilt,
            self.children.len()
        );
        Ok(self)
    }

    /// Take the node apart, typically inside a detach hook.
    ///
    /// Children still attached are dropped without their detach hooks
    /// running; call [`Node::clear`] first when they own external handles.
    pub fn into_parts(self) -> Detached<K> {
        let Node {
            id,
            value,
            handle,
            children,
            ..
        } = self;
        if !children.is_empty() {
            log::warn!(
                "[tree] {} taken apart with {} attached children",
                id,
                children.len()
            );
        }
        Detached { id, value, handle }
    }
}

impl<K: Hooks> ChildNode for Node<K> {
    type Value = K::Value;

    fn id(&self) -> NodeId {
        self.id
    }

    fn value(&self) -> &K::Value {
        &self.value
    }

    fn set_parent(&mut self, parent: NodeId) {
        self.parent = Some(parent);
    }
}

impl<K> fmt::Debug for Node<K>
where
    K: Hooks,
    K::Value: fmt::Debug,
    K::Handle: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("parent", &self.parent)
            .field("value", &self.value)
            .field("handle", &self.handle)
            .field("children", &self.children.len())
            .finish()
    }
}
