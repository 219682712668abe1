use crate::{Forest, ForestNode, NodeId, Result};

impl<T> Forest<T> {
    pub(crate) fn children_of(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut cur = self.rel(node).first_child;
        std::iter::from_fn(move || {
            let ret = cur?;
            cur = self.rel(ret).next_sibling;
            Some(ret)
        })
    }

    pub(crate) fn walk_pre_order<'a>(
        &'a self,
        node: NodeId,
        depth: usize,
        mut f: impl FnMut(ForestNode<'a, T>, usize),
    ) {
        let mut stack = vec![(node, depth)];
        while let Some((cur, d)) = stack.pop() {
            f(ForestNode::new(self, cur), d);
            let mut child = self.rel(cur).last_child;
            while let Some(c) = child {
                stack.push((c, d + 1));
                child = self.rel(c).prev_sibling;
            }
        }
    }

    pub(crate) fn walk_post_order<'a>(
        &'a self,
        node: NodeId,
        depth: usize,
        mut f: impl FnMut(ForestNode<'a, T>, usize),
    ) {
        let mut stack = vec![(node, depth, false)];
        while let Some((cur, d, expanded)) = stack.pop() {
            let last = self.rel(cur).last_child;
            if expanded || last.is_none() {
                f(ForestNode::new(self, cur), d);
                continue;
            }
            stack.push((cur, d, true));
            let mut child = last;
            while let Some(c) = child {
                stack.push((c, d + 1, false));
                child = self.rel(c).prev_sibling;
            }
        }
    }

    pub(crate) fn walk_parent_from<'a>(
        &'a self,
        node: NodeId,
        depth: usize,
        mut f: impl FnMut(ForestNode<'a, T>, usize),
    ) {
        let mut cur = Some(node);
        let mut d = depth;
        while let Some(x) = cur {
            f(ForestNode::new(self, x), d);
            cur = self.rel(x).parent;
            d += 1;
        }
    }

    pub(crate) fn walk_parent_to<'a>(
        &'a self,
        node: NodeId,
        depth: usize,
        mut f: impl FnMut(ForestNode<'a, T>, usize),
    ) {
        let mut chain = vec![];
        self.walk_parent_from(node, depth, |x, _| chain.push(x.id()));
        for (i, x) in chain.into_iter().enumerate().rev() {
            f(ForestNode::new(self, x), depth + i);
        }
    }

    /// Pre-order walk which lets the callback mutate the forest
    ///
    /// The first child and the next sibling of a node are read before the callback runs on it.
    /// Nodes released by the callback are skipped.
    pub(crate) fn walk_pre_order_mut(
        &mut self,
        node: NodeId,
        depth: usize,
        mut f: impl FnMut(&mut Self, NodeId, usize),
    ) {
        let mut stack = vec![(node, depth)];
        while let Some((cur, d)) = stack.pop() {
            let (first, next) = match self.try_rel(cur) {
                Some(rel) => (rel.first_child, rel.next_sibling),
                None => continue,
            };
            f(self, cur, d);
            if cur != node {
                if let Some(next) = next {
                    stack.push((next, d));
                }
            }
            if let Some(first) = first {
                stack.push((first, d + 1));
            }
        }
    }

    pub(crate) fn post_order(&self, node: NodeId) -> Vec<NodeId> {
        let mut ret = vec![];
        self.walk_post_order(node, 0, |x, _| ret.push(x.id()));
        ret
    }

    /// Visit the node and then all its descendants, depth first
    ///
    /// `f` receives each node and its depth, starting from 0 at `node` .
    #[inline]
    pub fn each<'a>(
        &'a self,
        node: NodeId,
        f: impl FnMut(ForestNode<'a, T>, usize),
    ) -> Result<NodeId> {
        self.each_child_from(node, 0, f)
    }

    /// Visit the node and then all its descendants, depth first, starting at `depth`
    ///
    /// Children are visited in order after their parent, one level deeper.
    pub fn each_child_from<'a>(
        &'a self,
        node: NodeId,
        depth: usize,
        f: impl FnMut(ForestNode<'a, T>, usize),
    ) -> Result<NodeId> {
        self.check(node)?;
        self.walk_pre_order(node, depth, f);
        Ok(node)
    }

    /// Like `each_child_from` , but the callback can mutate the forest
    pub fn each_child_from_mut(
        &mut self,
        node: NodeId,
        depth: usize,
        f: impl FnMut(&mut Self, NodeId, usize),
    ) -> Result<NodeId> {
        self.check(node)?;
        self.walk_pre_order_mut(node, depth, f);
        Ok(node)
    }

    /// Visit all descendants of the node and then the node itself
    #[inline]
    pub fn each_reverse<'a>(
        &'a self,
        node: NodeId,
        f: impl FnMut(ForestNode<'a, T>, usize),
    ) -> Result<NodeId> {
        self.each_child_to(node, 0, f)
    }

    /// Visit all descendants of the node and then the node itself, starting at `depth`
    ///
    /// Children are visited in order before their parent, one level deeper.
    pub fn each_child_to<'a>(
        &'a self,
        node: NodeId,
        depth: usize,
        f: impl FnMut(ForestNode<'a, T>, usize),
    ) -> Result<NodeId> {
        self.check(node)?;
        self.walk_post_order(node, depth, f);
        Ok(node)
    }

    /// Visit the node and then each of its ancestors
    #[inline]
    pub fn each_parent<'a>(
        &'a self,
        node: NodeId,
        f: impl FnMut(ForestNode<'a, T>, usize),
    ) -> Result<NodeId> {
        self.each_parent_from(node, 0, f)
    }

    /// Visit the node with `depth` and then each ancestor with the depth increased by one per level
    pub fn each_parent_from<'a>(
        &'a self,
        node: NodeId,
        depth: usize,
        f: impl FnMut(ForestNode<'a, T>, usize),
    ) -> Result<NodeId> {
        self.check(node)?;
        self.walk_parent_from(node, depth, f);
        Ok(node)
    }

    /// Visit the topmost ancestor first and walk down to the node
    ///
    /// The depths are the same as `each_parent_from` gives, so the node itself gets `depth` last.
    pub fn each_parent_to<'a>(
        &'a self,
        node: NodeId,
        depth: usize,
        f: impl FnMut(ForestNode<'a, T>, usize),
    ) -> Result<NodeId> {
        self.check(node)?;
        self.walk_parent_to(node, depth, f);
        Ok(node)
    }
}
