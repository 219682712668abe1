use crate::{Forest, HierarchyError, NodeId, Result, StructuralError};

struct Position {
    parent: NodeId,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

impl<T> Forest<T> {
    fn rejected(&self, op: &str, node: NodeId, target: NodeId) -> crate::Error {
        log::debug!("{} rejected: {:?} cannot move relative to {:?}", op, node, target);
        HierarchyError::new().into()
    }

    fn unlink(&mut self, node: NodeId, parent: NodeId) {
        let (prev, next) = {
            let rel = self.rel(node);
            (rel.prev_sibling, rel.next_sibling)
        };
        match next {
            Some(next) => self.rel_mut(next).prev_sibling = prev,
            None => self.rel_mut(parent).last_child = prev,
        }
        match prev {
            Some(prev) => self.rel_mut(prev).next_sibling = next,
            None => self.rel_mut(parent).first_child = next,
        }
        self.rel_mut(parent).child_count -= 1;
        let rel = self.rel_mut(node);
        rel.parent = None;
        rel.prev_sibling = None;
        rel.next_sibling = None;
        log::trace!("unlinked {:?} from {:?}", node, parent);
    }

    fn detach(&mut self, node: NodeId) -> Result<NodeId> {
        let parent = self
            .rel(node)
            .parent
            .ok_or(StructuralError::NoParent)
            .map_err(|err| {
                log::debug!("cannot detach {:?}: {}", node, err);
                err
            })?;
        self.unlink(node, parent);
        Ok(node)
    }

    fn detach_if_parented(&mut self, node: NodeId) {
        if let Some(parent) = self.rel(node).parent {
            self.unlink(node, parent);
        }
    }

    fn take_position(&mut self, node: NodeId) -> Option<Position> {
        let rel = self.rel(node);
        let pos = Position {
            parent: rel.parent?,
            prev: rel.prev_sibling,
            next: rel.next_sibling,
        };
        self.unlink(node, pos.parent);
        Some(pos)
    }

    // `prev` and `next` must be adjacent children of `parent` (or the list ends)
    fn link(&mut self, node: NodeId, pos: Position) {
        let Position { parent, prev, next } = pos;
        {
            let rel = self.rel_mut(node);
            rel.parent = Some(parent);
            rel.prev_sibling = prev;
            rel.next_sibling = next;
        }
        match prev {
            Some(prev) => self.rel_mut(prev).next_sibling = Some(node),
            None => self.rel_mut(parent).first_child = Some(node),
        }
        match next {
            Some(next) => self.rel_mut(next).prev_sibling = Some(node),
            None => self.rel_mut(parent).last_child = Some(node),
        }
        self.rel_mut(parent).child_count += 1;
        log::trace!("linked {:?} under {:?}", node, parent);
    }

    fn expected_root(&self, node: NodeId) -> Option<NodeId> {
        let rel = self.rel(node);
        match rel.parent {
            Some(parent) => self.rel(parent).root,
            None => rel.self_rooted.then_some(node),
        }
    }

    /// Recompute the root of a single node and notify the observers if it changed
    fn propagate_root(&mut self, node: NodeId) {
        if !self.contains(node) {
            return;
        }
        let new_root = self.expected_root(node);
        let old_root = std::mem::replace(&mut self.rel_mut(node).root, new_root);
        if old_root == new_root {
            return;
        }
        log::trace!("root of {:?} changed from {:?} to {:?}", node, old_root, new_root);
        if let Some(old_root) = old_root {
            if let Some(observer) = self.observer_of(old_root) {
                observer.node_removed(self, old_root, node);
            }
        }
        if let Some(new_root) = new_root {
            if let Some(observer) = self.observer_of(new_root) {
                observer.node_inserted(self, new_root, node);
            }
        }
    }

    /// Propagate the root through the subtree if the root of `node` is out of date
    pub(crate) fn refresh_root(&mut self, node: NodeId) {
        if !self.contains(node) {
            return;
        }
        if self.rel(node).root != self.expected_root(node) {
            self.walk_pre_order_mut(node, 0, |forest, x, _| forest.propagate_root(x));
        }
    }

    fn blank_subtree(&mut self, node: NodeId) {
        for x in self.post_order(node) {
            self.rel_mut(x).clean();
        }
    }

    /// Add `node` as the last child of `parent`
    ///
    /// Nothing changes if `node` is already the last child.
    pub fn append(&mut self, parent: NodeId, node: NodeId) -> Result<NodeId> {
        self.check(parent)?;
        self.check(node)?;
        if node == parent {
            return Err(self.rejected("append", node, parent));
        }
        if self.rel(parent).last_child == Some(node) {
            return Ok(node);
        }
        self.detach_if_parented(node);
        let prev = self.rel(parent).last_child;
        self.link(
            node,
            Position {
                parent,
                prev,
                next: None,
            },
        );
        self.refresh_root(node);
        Ok(node)
    }

    /// Add `node` as the first child of `parent`
    ///
    /// Nothing changes if `node` is already the first child.
    pub fn prepend(&mut self, parent: NodeId, node: NodeId) -> Result<NodeId> {
        self.check(parent)?;
        self.check(node)?;
        if node == parent {
            return Err(self.rejected("prepend", node, parent));
        }
        if self.rel(parent).first_child == Some(node) {
            return Ok(node);
        }
        self.detach_if_parented(node);
        let next = self.rel(parent).first_child;
        self.link(
            node,
            Position {
                parent,
                prev: None,
                next,
            },
        );
        self.refresh_root(node);
        Ok(node)
    }

    /// Add `node` as the next sibling of `sibling`
    ///
    /// Fails if `sibling` has no parent or its parent is `node` itself.
    pub fn insert_after(&mut self, sibling: NodeId, node: NodeId) -> Result<NodeId> {
        self.check(sibling)?;
        self.check(node)?;
        if node == sibling || self.rel(sibling).next_sibling == Some(node) {
            return Ok(node);
        }
        let parent = match self.rel(sibling).parent {
            Some(parent) if parent != node => parent,
            _ => return Err(self.rejected("insert_after", node, sibling)),
        };
        self.detach_if_parented(node);
        let next = self.rel(sibling).next_sibling;
        self.link(
            node,
            Position {
                parent,
                prev: Some(sibling),
                next,
            },
        );
        self.refresh_root(node);
        Ok(node)
    }

    /// Add `node` as the previous sibling of `sibling`
    ///
    /// Fails if `sibling` has no parent or its parent is `node` itself.
    pub fn insert_before(&mut self, sibling: NodeId, node: NodeId) -> Result<NodeId> {
        self.check(sibling)?;
        self.check(node)?;
        if node == sibling || self.rel(sibling).prev_sibling == Some(node) {
            return Ok(node);
        }
        let parent = match self.rel(sibling).parent {
            Some(parent) if parent != node => parent,
            _ => return Err(self.rejected("insert_before", node, sibling)),
        };
        self.detach_if_parented(node);
        let prev = self.rel(sibling).prev_sibling;
        self.link(
            node,
            Position {
                parent,
                prev,
                next: Some(sibling),
            },
        );
        self.refresh_root(node);
        Ok(node)
    }

    /// Remove the node from its parent, keeping its own children
    ///
    /// A node without parent cannot be removed.
    pub fn remove(&mut self, node: NodeId) -> Result<NodeId> {
        self.check(node)?;
        self.detach(node)?;
        self.refresh_root(node);
        Ok(node)
    }

    /// Exchange the tree positions of two nodes
    ///
    /// Each node takes the parent and the siblings the other one had,
    /// even if they are in different trees.
    /// Returns `node1` .
    pub fn swap(&mut self, node1: NodeId, node2: NodeId) -> Result<NodeId> {
        self.check(node1)?;
        self.check(node2)?;
        if node1 == node2 {
            return Ok(node1);
        }
        let parent1 = self.rel(node1).parent;
        let parent2 = self.rel(node2).parent;
        if parent1 == Some(node2) || parent2 == Some(node1) {
            return Err(self.rejected("swap", node1, node2));
        }
        if self.rel(node1).next_sibling == Some(node2) {
            self.move_before(node2, node1);
        } else if self.rel(node2).next_sibling == Some(node1) {
            self.move_before(node1, node2);
        } else {
            let pos1 = self.take_position(node1);
            let pos2 = self.take_position(node2);
            if let Some(pos2) = pos2 {
                self.link(node1, pos2);
            }
            if let Some(pos1) = pos1 {
                self.link(node2, pos1);
            }
        }
        self.refresh_root(node1);
        self.refresh_root(node2);
        Ok(node1)
    }

    // `node` must be the next sibling of `sibling`
    fn move_before(&mut self, node: NodeId, sibling: NodeId) {
        if let Some(parent) = self.rel(sibling).parent {
            self.unlink(node, parent);
            let prev = self.rel(sibling).prev_sibling;
            self.link(
                node,
                Position {
                    parent,
                    prev,
                    next: Some(sibling),
                },
            );
        }
    }

    /// Remove all children of the node
    ///
    /// When not `recursive` , each child is removed in order and keeps its own descendants.
    /// When `recursive` , every descendant is cleared to a blank node without notifying any observer.
    pub fn empty(&mut self, node: NodeId, recursive: bool) -> Result<NodeId> {
        self.check(node)?;
        if recursive {
            let children: Vec<NodeId> = self.children_of(node).collect();
            {
                let rel = self.rel_mut(node);
                rel.first_child = None;
                rel.last_child = None;
                rel.child_count = 0;
            }
            for child in children {
                self.blank_subtree(child);
            }
        } else {
            while let Some(child) = self.try_rel(node).and_then(|x| x.first_child) {
                self.unlink(child, node);
                self.refresh_root(child);
            }
        }
        Ok(node)
    }

    /// Tear the node down
    ///
    /// When not `recursive` , the node loses its root, leaves its parent and is emptied,
    /// so its children become separated trees with their own descendants intact.
    /// When `recursive` , the node leaves its parent and the whole subtree is cleared to blank nodes.
    pub fn destroy(&mut self, node: NodeId, recursive: bool) -> Result<NodeId> {
        self.check(node)?;
        self.detach_if_parented(node);
        if recursive {
            self.blank_subtree(node);
        } else {
            {
                let rel = self.rel_mut(node);
                rel.root = None;
                rel.self_rooted = false;
            }
            self.empty(node, false)?;
        }
        Ok(node)
    }
}

#[cfg(test)]
mod test {
    use crate::*;

    fn chain(forest: &mut Forest<usize>, len: usize) -> Vec<NodeId> {
        let mut ret = vec![forest.create_root(0)];
        for i in 1..len {
            let parent = ret[i - 1];
            ret.push(forest.create(i, Some(parent)).unwrap());
        }
        ret
    }

    fn children(forest: &Forest<usize>, node: NodeId) -> Vec<usize> {
        forest.node(node).unwrap().children().map(|x| *x).collect()
    }

    #[test]
    fn detach_requires_parent() {
        let mut forest = Forest::new();
        let n = forest.create(0, None).unwrap();
        assert_eq!(
            forest.detach(n).unwrap_err(),
            crate::Error::Structural(StructuralError::NoParent)
        );
    }

    #[test]
    fn swap_adjacent() {
        let mut forest = Forest::new();
        let root = forest.create_root(0);
        let n1 = forest.create(1, Some(root)).unwrap();
        let n2 = forest.create(2, Some(root)).unwrap();
        let n3 = forest.create(3, Some(root)).unwrap();
        forest.swap(n1, n2).unwrap();
        assert_eq!(children(&forest, root), [2, 1, 3]);
        forest.swap(n1, n2).unwrap();
        assert_eq!(children(&forest, root), [1, 2, 3]);
        forest.swap(n3, n2).unwrap();
        assert_eq!(children(&forest, root), [1, 3, 2]);
        forest.swap(n1, n2).unwrap();
        assert_eq!(children(&forest, root), [2, 3, 1]);
        let r = forest.node(root).unwrap();
        assert_eq!(r.first_child_id(), Some(n2));
        assert_eq!(r.last_child_id(), Some(n1));
        assert_eq!(r.child_count(), 3);
        assert_eq!(forest.node(n3).unwrap().prev_sibling_id(), Some(n2));
        assert_eq!(forest.node(n3).unwrap().next_sibling_id(), Some(n1));
    }

    #[test]
    fn swap_with_parent() {
        let mut forest = Forest::new();
        let nodes = chain(&mut forest, 3);
        let err = forest.swap(nodes[1], nodes[2]).unwrap_err();
        assert!(err.is_hierarchy());
        let err = forest.swap(nodes[1], nodes[0]).unwrap_err();
        assert!(err.is_hierarchy());
        assert_eq!(children(&forest, nodes[0]), [1]);
        assert_eq!(children(&forest, nodes[1]), [2]);
    }

    #[test]
    fn empty_keeps_grandchildren() {
        let mut forest = Forest::new();
        let root = forest.create_root(0);
        let n1 = forest.create(1, Some(root)).unwrap();
        let n2 = forest.create(2, Some(root)).unwrap();
        let n21 = forest.create(21, Some(n2)).unwrap();
        forest.empty(root, false).unwrap();
        assert_eq!(forest.node(root).unwrap().child_count(), 0);
        assert!(forest.node(n1).unwrap().is_blank());
        let n2v = forest.node(n2).unwrap();
        assert_eq!(n2v.parent_id(), None);
        assert_eq!(n2v.root_id(), None);
        assert_eq!(n2v.first_child_id(), Some(n21));
        let n21v = forest.node(n21).unwrap();
        assert_eq!(n21v.parent_id(), Some(n2));
        assert_eq!(n21v.root_id(), None);
    }

    #[test]
    fn empty_recursive_blanks_descendants() {
        let mut forest = Forest::new();
        let nodes = chain(&mut forest, 5);
        forest.empty(nodes[1], true).unwrap();
        let n1 = forest.node(nodes[1]).unwrap();
        assert_eq!(n1.parent_id(), Some(nodes[0]));
        assert_eq!(n1.root_id(), Some(nodes[0]));
        assert_eq!(n1.child_count(), 0);
        assert!(n1.first_child().is_none());
        for &x in &nodes[2..] {
            assert!(forest.node(x).unwrap().is_blank());
        }
    }

    #[test]
    fn destroy_recursive_detaches_from_parent() {
        let mut forest = Forest::new();
        let root = forest.create_root(0);
        let n1 = forest.create(1, Some(root)).unwrap();
        let n2 = forest.create(2, Some(root)).unwrap();
        let n3 = forest.create(3, Some(root)).unwrap();
        let n21 = forest.create(21, Some(n2)).unwrap();
        forest.destroy(n2, true).unwrap();
        assert_eq!(children(&forest, root), [1, 3]);
        assert_eq!(forest.node(n1).unwrap().next_sibling_id(), Some(n3));
        assert_eq!(forest.node(n3).unwrap().prev_sibling_id(), Some(n1));
        assert!(forest.node(n2).unwrap().is_blank());
        assert!(forest.node(n21).unwrap().is_blank());
    }
}
