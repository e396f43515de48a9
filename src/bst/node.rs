use crate::bst::store::NodeId;
use crate::entry::Entry;

/// Which side of its parent a node hangs on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    Left,
    Right,
}

/// A struct representing an internal node of a binary search tree.
///
/// `aux` carries the per-node data of the balancing scheme built on top of the plain tree, such
/// as the balance factor of an avl tree. Child links own their subtrees; `parent` is only a
/// handle back up and never keeps a node alive.
pub struct Node<K, V, A> {
    pub entry: Entry<K, V>,
    pub aux: A,
    pub parent: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl<K, V, A> Node<K, V, A> {
    pub fn new(key: K, value: V, aux: A) -> Self {
        Node {
            entry: Entry::new(key, value),
            aux,
            parent: None,
            left: None,
            right: None,
        }
    }

    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn child_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}
