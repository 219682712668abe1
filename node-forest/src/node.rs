use std::{
    fmt::Debug,
    ops::{Deref, DerefMut},
};

use crate::{Forest, ForestRel, NodeId, Result, RootObserver};

/// An immutable view of a node
pub struct ForestNode<'a, T> {
    forest: &'a Forest<T>,
    id: NodeId,
}

impl<'a, T> Clone for ForestNode<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for ForestNode<'a, T> {}

impl<'a, T> Deref for ForestNode<'a, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.forest.rel(self.id).content
    }
}

impl<'a, T: Debug> Debug for ForestNode<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let content: &T = self;
        write!(f, "ForestNode({:?}) [", content)?;
        for (i, c) in self.children().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", c)?;
        }
        write!(f, "]")?;
        Ok(())
    }
}

impl<'a, T> PartialEq for ForestNode<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<'a, T> ForestNode<'a, T> {
    #[inline]
    pub(crate) fn new(forest: &'a Forest<T>, id: NodeId) -> Self {
        Self { forest, id }
    }

    fn view(&self, id: Option<NodeId>) -> Option<ForestNode<'a, T>> {
        id.map(|id| ForestNode::new(self.forest, id))
    }

    /// Get the handle of the node
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get the forest containing the node
    #[inline]
    pub fn forest(&self) -> &'a Forest<T> {
        self.forest
    }

    #[inline]
    pub fn parent_id(&self) -> Option<NodeId> {
        self.forest.rel(self.id).parent
    }

    /// Get the parent node
    #[inline]
    pub fn parent(&self) -> Option<ForestNode<'a, T>> {
        self.view(self.parent_id())
    }

    #[inline]
    pub fn first_child_id(&self) -> Option<NodeId> {
        self.forest.rel(self.id).first_child
    }

    /// Get the first child node
    #[inline]
    pub fn first_child(&self) -> Option<ForestNode<'a, T>> {
        self.view(self.first_child_id())
    }

    #[inline]
    pub fn last_child_id(&self) -> Option<NodeId> {
        self.forest.rel(self.id).last_child
    }

    /// Get the last child node
    #[inline]
    pub fn last_child(&self) -> Option<ForestNode<'a, T>> {
        self.view(self.last_child_id())
    }

    #[inline]
    pub fn prev_sibling_id(&self) -> Option<NodeId> {
        self.forest.rel(self.id).prev_sibling
    }

    /// Get the previous sibling node
    #[inline]
    pub fn prev_sibling(&self) -> Option<ForestNode<'a, T>> {
        self.view(self.prev_sibling_id())
    }

    #[inline]
    pub fn next_sibling_id(&self) -> Option<NodeId> {
        self.forest.rel(self.id).next_sibling
    }

    /// Get the next sibling node
    #[inline]
    pub fn next_sibling(&self) -> Option<ForestNode<'a, T>> {
        self.view(self.next_sibling_id())
    }

    /// Get the number of children
    #[inline]
    pub fn child_count(&self) -> usize {
        self.forest.rel(self.id).child_count
    }

    #[inline]
    pub fn root_id(&self) -> Option<NodeId> {
        self.forest.rel(self.id).root
    }

    /// Get the root shared by the tree containing this node
    ///
    /// This is not always the topmost ancestor:
    /// only nodes created by `create_root` (or marked with `mark_root` ) are roots.
    #[inline]
    pub fn root(&self) -> Option<ForestNode<'a, T>> {
        self.view(self.root_id())
    }

    /// Check if the node is marked as a root
    #[inline]
    pub fn is_root(&self) -> bool {
        self.forest.rel(self.id).self_rooted
    }

    /// Check if the node has no parent, no siblings, no children and no root
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.forest.rel(self.id).is_blank()
    }

    /// Iterate over the children in order
    pub fn children(&self) -> Children<'a, T> {
        Children {
            forest: self.forest,
            cur: self.first_child_id(),
        }
    }

    /// Iterate over the parent, the grandparent and so on
    pub fn ancestors(&self) -> Ancestors<'a, T> {
        Ancestors {
            forest: self.forest,
            cur: self.parent_id(),
        }
    }

    /// Visit this node and its descendants in pre-order
    pub fn each(self, f: impl FnMut(ForestNode<'a, T>, usize)) -> Self {
        self.each_child_from(0, f)
    }

    /// Visit this node with `depth` and its descendants in pre-order, one level deeper per generation
    pub fn each_child_from(self, depth: usize, f: impl FnMut(ForestNode<'a, T>, usize)) -> Self {
        self.forest.walk_pre_order(self.id, depth, f);
        self
    }

    /// Visit the descendants of this node and then this node, in post-order
    pub fn each_reverse(self, f: impl FnMut(ForestNode<'a, T>, usize)) -> Self {
        self.each_child_to(0, f)
    }

    /// Like `each_reverse` , but this node gets `depth`
    pub fn each_child_to(self, depth: usize, f: impl FnMut(ForestNode<'a, T>, usize)) -> Self {
        self.forest.walk_post_order(self.id, depth, f);
        self
    }

    /// Visit this node and then its ancestors
    pub fn each_parent(self, f: impl FnMut(ForestNode<'a, T>, usize)) -> Self {
        self.each_parent_from(0, f)
    }

    /// Visit this node with `depth` and then its ancestors, one more per level
    pub fn each_parent_from(self, depth: usize, f: impl FnMut(ForestNode<'a, T>, usize)) -> Self {
        self.forest.walk_parent_from(self.id, depth, f);
        self
    }

    /// Visit the topmost ancestor first and this node last, which gets `depth`
    pub fn each_parent_to(self, depth: usize, f: impl FnMut(ForestNode<'a, T>, usize)) -> Self {
        self.forest.walk_parent_to(self.id, depth, f);
        self
    }
}

/// The iterator of the children of a node
pub struct Children<'a, T> {
    forest: &'a Forest<T>,
    cur: Option<NodeId>,
}

impl<'a, T> Iterator for Children<'a, T> {
    type Item = ForestNode<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let ret = ForestNode::new(self.forest, self.cur?);
        self.cur = ret.next_sibling_id();
        Some(ret)
    }
}

/// The iterator of the ancestors of a node
pub struct Ancestors<'a, T> {
    forest: &'a Forest<T>,
    cur: Option<NodeId>,
}

impl<'a, T> Iterator for Ancestors<'a, T> {
    type Item = ForestNode<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let ret = ForestNode::new(self.forest, self.cur?);
        self.cur = ret.parent_id();
        Some(ret)
    }
}

/// A mutable view of a node
///
/// The mutation methods act on this node and return a view of the node they moved,
/// so calls can be chained.
pub struct ForestNodeMut<'a, T> {
    forest: &'a mut Forest<T>,
    id: NodeId,
}

// a hook may release the viewed node, then these panic like a stale index
impl<'a, T> Deref for ForestNodeMut<'a, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.forest.rel(self.id).content
    }
}

impl<'a, T> DerefMut for ForestNodeMut<'a, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.forest.rel_mut(self.id).content
    }
}

impl<'a, T: Debug> Debug for ForestNodeMut<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.as_ref())
    }
}

impl<'a, T> ForestNodeMut<'a, T> {
    #[inline]
    pub(crate) fn new(forest: &'a mut Forest<T>, id: NodeId) -> Self {
        Self { forest, id }
    }

    fn link_of(&self, f: impl FnOnce(&ForestRel<T>) -> Option<NodeId>) -> Option<NodeId> {
        self.forest.try_rel(self.id).and_then(f)
    }

    fn borrow_linked(&mut self, id: Option<NodeId>) -> Option<ForestNodeMut<'_, T>> {
        Some(ForestNodeMut {
            forest: &mut *self.forest,
            id: id?,
        })
    }

    /// Get the handle of the node
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get an immutable view
    #[inline(always)]
    pub fn as_ref(&self) -> ForestNode<'_, T> {
        ForestNode::new(self.forest, self.id)
    }

    /// Give up the view and get the whole forest
    #[inline]
    pub fn into_forest(self) -> &'a mut Forest<T> {
        self.forest
    }

    /// Borrow another node of the same forest
    #[inline]
    pub fn borrow_mut(&mut self, target: NodeId) -> Result<ForestNodeMut<'_, T>> {
        self.forest.node_mut(target)
    }

    /// Get the parent node
    #[inline]
    pub fn parent_mut(&mut self) -> Option<ForestNodeMut<'_, T>> {
        let id = self.link_of(|x| x.parent);
        self.borrow_linked(id)
    }

    /// Get the first child node
    #[inline]
    pub fn first_child_mut(&mut self) -> Option<ForestNodeMut<'_, T>> {
        let id = self.link_of(|x| x.first_child);
        self.borrow_linked(id)
    }

    /// Get the last child node
    #[inline]
    pub fn last_child_mut(&mut self) -> Option<ForestNodeMut<'_, T>> {
        let id = self.link_of(|x| x.last_child);
        self.borrow_linked(id)
    }

    /// Get the previous sibling node
    #[inline]
    pub fn prev_sibling_mut(&mut self) -> Option<ForestNodeMut<'_, T>> {
        let id = self.link_of(|x| x.prev_sibling);
        self.borrow_linked(id)
    }

    /// Get the next sibling node
    #[inline]
    pub fn next_sibling_mut(&mut self) -> Option<ForestNodeMut<'_, T>> {
        let id = self.link_of(|x| x.next_sibling);
        self.borrow_linked(id)
    }

    /// Create a blank node in the same forest, and append it to `parent` if given
    #[inline]
    pub fn create(&mut self, content: T, parent: Option<NodeId>) -> Result<NodeId> {
        self.forest.create(content, parent)
    }

    /// Create a node which is its own root in the same forest
    #[inline]
    pub fn create_root(&mut self, content: T) -> NodeId {
        self.forest.create_root(content)
    }

    /// Register root hooks on this node
    pub fn observe(&mut self, observer: impl RootObserver<T> + 'static) -> Result<&mut Self> {
        self.forest.observe(self.id, observer)?;
        Ok(self)
    }

    /// Mark this node as a root
    pub fn mark_root(&mut self) -> Result<ForestNodeMut<'_, T>> {
        let id = self.forest.mark_root(self.id)?;
        self.forest.node_mut(id)
    }

    /// Visit this node with `depth` and its descendants in pre-order, letting the callback mutate the forest
    pub fn each_child_from_mut(
        &mut self,
        depth: usize,
        f: impl FnMut(&mut Forest<T>, NodeId, usize),
    ) -> Result<ForestNodeMut<'_, T>> {
        let id = self.forest.each_child_from_mut(self.id, depth, f)?;
        self.forest.node_mut(id)
    }

    /// Append `node` as the last child of this node
    pub fn append(&mut self, node: NodeId) -> Result<ForestNodeMut<'_, T>> {
        let id = self.forest.append(self.id, node)?;
        self.forest.node_mut(id)
    }

    /// Append this node as the last child of `parent`
    pub fn append_to(&mut self, parent: NodeId) -> Result<ForestNodeMut<'_, T>> {
        let id = self.forest.append(parent, self.id)?;
        self.forest.node_mut(id)
    }

    /// Prepend `node` as the first child of this node
    pub fn prepend(&mut self, node: NodeId) -> Result<ForestNodeMut<'_, T>> {
        let id = self.forest.prepend(self.id, node)?;
        self.forest.node_mut(id)
    }

    /// Prepend this node as the first child of `parent`
    pub fn prepend_to(&mut self, parent: NodeId) -> Result<ForestNodeMut<'_, T>> {
        let id = self.forest.prepend(parent, self.id)?;
        self.forest.node_mut(id)
    }

    /// Insert this node as the next sibling of `sibling`
    pub fn insert_after(&mut self, sibling: NodeId) -> Result<ForestNodeMut<'_, T>> {
        let id = self.forest.insert_after(sibling, self.id)?;
        self.forest.node_mut(id)
    }

    /// Insert this node as the previous sibling of `sibling`
    pub fn insert_before(&mut self, sibling: NodeId) -> Result<ForestNodeMut<'_, T>> {
        let id = self.forest.insert_before(sibling, self.id)?;
        self.forest.node_mut(id)
    }

    /// Remove this node from its parent
    ///
    /// Fails with `Released` if a root hook released the node meanwhile.
    pub fn remove(&mut self) -> Result<ForestNodeMut<'_, T>> {
        let id = self.forest.remove(self.id)?;
        self.forest.node_mut(id)
    }

    /// Exchange the tree positions of this node and `other`
    pub fn swap(&mut self, other: NodeId) -> Result<ForestNodeMut<'_, T>> {
        let id = self.forest.swap(self.id, other)?;
        self.forest.node_mut(id)
    }

    /// Remove all children of this node
    pub fn empty(&mut self, recursive: bool) -> Result<ForestNodeMut<'_, T>> {
        let id = self.forest.empty(self.id, recursive)?;
        self.forest.node_mut(id)
    }

    /// Tear this node down
    pub fn destroy(&mut self, recursive: bool) -> Result<ForestNodeMut<'_, T>> {
        let id = self.forest.destroy(self.id, recursive)?;
        self.forest.node_mut(id)
    }
}
