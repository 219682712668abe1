use crate::{Forest, NodeId};

/// Hooks of a root node, called when other nodes enter or leave its tree
///
/// Register an observer on a root with `Forest::observe` .
/// The hooks run synchronously in the middle of the mutation that changed the root of `node` .
/// At that time the links of the moved node and its own `root` are up to date,
/// but its descendants may still carry the previous root.
/// Mutating the forest inside a hook is allowed, but it observes that half-finished state,
/// and the interrupted operation continues with whatever the hook left behind.
pub trait RootObserver<T> {
    /// Called after `node` starts to use `root` as its root
    fn node_inserted(&self, _forest: &mut Forest<T>, _root: NodeId, _node: NodeId) {}

    /// Called after `node` stops using `root` as its root
    fn node_removed(&self, _forest: &mut Forest<T>, _root: NodeId, _node: NodeId) {}
}
