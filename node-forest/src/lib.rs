//! Composite-pattern trees stored in an arena.
//!
//! Every node of a `Forest` carries a caller payload together with its tree links:
//! the parent, the first and last child, the previous and next sibling, the child count and the root.
//! Nodes are moved with `append` , `prepend` , `insert_before` , `insert_after` , `remove` and `swap` ,
//! and walked with the `each_*` traversals.
//!
//! A node created by `create_root` is its own root,
//! and every node linked below it shares that root until it is detached again.
//! A `RootObserver` registered on a root is told about every node entering or leaving its tree.
//!
//! ```
//! use node_forest::Forest;
//!
//! let mut forest = Forest::new();
//! let root = forest.create_root("root");
//! let a = forest.create("a", Some(root)).unwrap();
//! let b = forest.create("b", None).unwrap();
//! forest.insert_before(a, b).unwrap();
//! let order: Vec<_> = forest.node(root).unwrap().children().map(|x| *x).collect();
//! assert_eq!(order, ["b", "a"]);
//! assert_eq!(forest.node(b).unwrap().root_id(), Some(root));
//! ```

use std::{
    fmt::Debug,
    rc::Rc,
    sync::atomic::{AtomicU64, Ordering},
};

const SLICE_ITEMS: usize = 256;

mod error;
mod mem;
mod node;
mod observer;
mod ops;
mod traverse;

pub use error::{Error, HierarchyError, Result, StructuralError};
use mem::{SliceAlloc, SliceKey};
pub use node::{Ancestors, Children, ForestNode, ForestNodeMut};
pub use observer::RootObserver;

// 64 bits wide so ids are not reused
static NEXT_FOREST_ID: AtomicU64 = AtomicU64::new(0);

/// A handle of a node in a forest
///
/// It stays valid until the node is released.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    forest: u64,
    key: SliceKey,
}

impl Debug for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeId({}v{})", self.key.index(), self.key.generation())
    }
}

struct ForestRel<T> {
    parent: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    child_count: usize,
    root: Option<NodeId>,
    self_rooted: bool,
    observer: Option<Rc<dyn RootObserver<T>>>,
    content: T,
}

impl<T> ForestRel<T> {
    fn new(content: T) -> Self {
        Self {
            parent: None,
            prev_sibling: None,
            next_sibling: None,
            first_child: None,
            last_child: None,
            child_count: 0,
            root: None,
            self_rooted: false,
            observer: None,
            content,
        }
    }

    // the observer and the content survive
    fn clean(&mut self) {
        self.parent = None;
        self.prev_sibling = None;
        self.next_sibling = None;
        self.first_child = None;
        self.last_child = None;
        self.child_count = 0;
        self.root = None;
        self.self_rooted = false;
    }

    fn is_blank(&self) -> bool {
        self.parent.is_none()
            && self.prev_sibling.is_none()
            && self.next_sibling.is_none()
            && self.first_child.is_none()
            && self.last_child.is_none()
            && self.child_count == 0
            && self.root.is_none()
    }
}

/// A set of trees sharing one node arena
pub struct Forest<T> {
    id: u64,
    slots: SliceAlloc<ForestRel<T>, SLICE_ITEMS>,
}

impl<T> Default for Forest<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for Forest<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forest")
            .field("id", &self.id)
            .field("len", &self.len())
            .finish()
    }
}

impl<T> Forest<T> {
    /// Create an empty forest
    #[inline]
    pub fn new() -> Self {
        Self {
            id: NEXT_FOREST_ID.fetch_add(1, Ordering::Relaxed),
            slots: SliceAlloc::new(),
        }
    }

    /// Create an empty forest with room for at least `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id: NEXT_FOREST_ID.fetch_add(1, Ordering::Relaxed),
            slots: SliceAlloc::with_capacity(capacity),
        }
    }

    /// The number of nodes not yet released
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if the handle points to a live node of this forest
    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        self.check(node).is_ok()
    }

    fn check(&self, node: NodeId) -> Result<()> {
        if node.forest != self.id {
            log::debug!("{:?} does not belong to forest {}", node, self.id);
            return Err(StructuralError::ForeignForest.into());
        }
        if self.slots.get(node.key).is_none() {
            log::debug!("{:?} has been released", node);
            return Err(StructuralError::Released.into());
        }
        Ok(())
    }

    fn try_rel(&self, node: NodeId) -> Option<&ForestRel<T>> {
        if node.forest != self.id {
            return None;
        }
        self.slots.get(node.key)
    }

    // links stored in the forest always point to live nodes
    #[inline]
    fn rel(&self, node: NodeId) -> &ForestRel<T> {
        &self.slots[node.key]
    }

    #[inline]
    fn rel_mut(&mut self, node: NodeId) -> &mut ForestRel<T> {
        &mut self.slots[node.key]
    }

    /// Get the content of a node
    #[inline]
    pub fn get(&self, node: NodeId) -> Option<&T> {
        self.try_rel(node).map(|x| &x.content)
    }

    /// Get the mutable content of a node
    #[inline]
    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut T> {
        if node.forest != self.id {
            return None;
        }
        self.slots.get_mut(node.key).map(|x| &mut x.content)
    }

    /// Get an immutable view of a node
    #[inline]
    pub fn node(&self, node: NodeId) -> Result<ForestNode<'_, T>> {
        self.check(node)?;
        Ok(ForestNode::new(self, node))
    }

    /// Get a mutable view of a node
    #[inline]
    pub fn node_mut(&mut self, node: NodeId) -> Result<ForestNodeMut<'_, T>> {
        self.check(node)?;
        Ok(ForestNodeMut::new(self, node))
    }

    fn alloc(&mut self, content: T) -> NodeId {
        let key = self.slots.alloc(ForestRel::new(content));
        NodeId {
            forest: self.id,
            key,
        }
    }

    /// Create a blank node, and append it to `parent` if given
    pub fn create(&mut self, content: T, parent: Option<NodeId>) -> Result<NodeId> {
        if let Some(parent) = parent {
            self.check(parent)?;
        }
        let node = self.alloc(content);
        if let Some(parent) = parent {
            self.append(parent, node)?;
        }
        Ok(node)
    }

    /// Create a blank node which is its own root
    pub fn create_root(&mut self, content: T) -> NodeId {
        let node = self.alloc(content);
        let rel = self.rel_mut(node);
        rel.self_rooted = true;
        rel.root = Some(node);
        node
    }

    /// Mark an existing node as a root
    ///
    /// A node with a parent keeps the root of its parent until it is detached.
    pub fn mark_root(&mut self, node: NodeId) -> Result<NodeId> {
        self.check(node)?;
        self.rel_mut(node).self_rooted = true;
        self.refresh_root(node);
        Ok(node)
    }

    /// Register the hooks to call when nodes enter or leave the tree rooted at `root`
    ///
    /// Replaces the previous observer of the node.
    pub fn observe(
        &mut self,
        root: NodeId,
        observer: impl RootObserver<T> + 'static,
    ) -> Result<NodeId> {
        self.check(root)?;
        self.rel_mut(root).observer = Some(Rc::new(observer));
        Ok(root)
    }

    /// Remove the observer of a node
    pub fn unobserve(&mut self, root: NodeId) -> Result<NodeId> {
        self.check(root)?;
        self.rel_mut(root).observer = None;
        Ok(root)
    }

    fn observer_of(&self, root: NodeId) -> Option<Rc<dyn RootObserver<T>>> {
        self.try_rel(root).and_then(|x| x.observer.clone())
    }

    /// Destroy a node (not recursively) and free its slot
    ///
    /// The children become separated trees.
    /// Handles of the node are stale afterwards.
    pub fn release(&mut self, node: NodeId) -> Result<T> {
        self.destroy(node, false)?;
        match self.slots.free(node.key) {
            Some(rel) => Ok(rel.content),
            None => Err(StructuralError::Released.into()),
        }
    }
}
