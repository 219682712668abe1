#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use node_forest::{Forest, NodeId, RootObserver};

pub fn init_log() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Inserted(NodeId),
    Removed(NodeId),
}

/// Records the root hooks it receives
#[derive(Clone, Default)]
pub struct Recorder {
    events: Rc<RefCell<Vec<Event>>>,
}

impl Recorder {
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn inserted(&self) -> Vec<NodeId> {
        self.events
            .borrow()
            .iter()
            .filter_map(|x| match x {
                Event::Inserted(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    pub fn removed(&self) -> Vec<NodeId> {
        self.events
            .borrow()
            .iter()
            .filter_map(|x| match x {
                Event::Removed(n) => Some(*n),
                _ => None,
            })
            .collect()
    }
}

impl<T> RootObserver<T> for Recorder {
    fn node_inserted(&self, _forest: &mut Forest<T>, _root: NodeId, node: NodeId) {
        self.events.borrow_mut().push(Event::Inserted(node));
    }

    fn node_removed(&self, _forest: &mut Forest<T>, _root: NodeId, node: NodeId) {
        self.events.borrow_mut().push(Event::Removed(node));
    }
}

/// Check the links of every node reachable from `top`
pub fn check_links<T>(forest: &Forest<T>, top: NodeId) {
    forest
        .each(top, |node, _| {
            let mut prev = None;
            let mut count = 0;
            for child in node.children() {
                assert_eq!(child.parent_id(), Some(node.id()));
                assert_eq!(child.prev_sibling_id(), prev);
                assert_eq!(child.root_id(), node.root_id());
                prev = Some(child.id());
                count += 1;
            }
            assert_eq!(node.last_child_id(), prev);
            assert_eq!(node.child_count(), count);
            assert_eq!(node.first_child().is_none(), count == 0);
        })
        .unwrap();
}
