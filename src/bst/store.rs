//! Slab storage for tree nodes.

use crate::bst::node::Node;
use std::mem;
use std::ops::{Index, IndexMut};

/// A handle to a node slot in a `NodeStore<K, V, A>`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NodeId(usize);

enum Slot<K, V, A> {
    Occupied(Node<K, V, A>),
    Vacant(Option<NodeId>),
}

/// Owner of every node of a tree.
///
/// Nodes are allocated into slots of a single `Vec` and addressed by `NodeId`. Freed slots are
/// threaded into an intrusive free list and reused by later allocations, so handles stay stable
/// for the lifetime of a node and a tree never moves its nodes around. Every node is dropped
/// exactly once: either when it is freed, when the store is cleared, or when the store itself is
/// dropped.
///
/// # Examples
///
/// ```
/// use avl_map::bst::{Node, NodeStore};
///
/// let mut store = NodeStore::new();
///
/// let x = store.allocate(Node::new(1, "a", ()));
/// assert_eq!(store[x].entry.key, 1);
///
/// store[x].entry.value = "b";
/// assert_eq!(store[x].entry.value, "b");
///
/// assert_eq!(store.free(x).entry.value, "b");
/// assert!(store.is_empty());
/// ```
pub struct NodeStore<K, V, A> {
    head: Option<NodeId>,
    slots: Vec<Slot<K, V, A>>,
    len: usize,
}

impl<K, V, A> NodeStore<K, V, A> {
    /// Constructs a new, empty `NodeStore<K, V, A>`.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Constructs a new, empty `NodeStore<K, V, A>` with room for `capacity` nodes before it
    /// has to grow.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_map::bst::NodeStore;
    ///
    /// let store: NodeStore<u32, u32, i8> = NodeStore::with_capacity(1024);
    /// assert!(store.capacity() >= 1024);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        NodeStore {
            head: None,
            slots: Vec::with_capacity(capacity),
            len: 0,
        }
    }

    /// Moves a node into the store and returns its handle.
    pub fn allocate(&mut self, node: Node<K, V, A>) -> NodeId {
        self.len += 1;
        match self.head.take() {
            None => {
                self.slots.push(Slot::Occupied(node));
                NodeId(self.slots.len() - 1)
            },
            Some(id) => {
                let vacant_slot = mem::replace(&mut self.slots[id.0], Slot::Occupied(node));
                match vacant_slot {
                    Slot::Vacant(next) => self.head = next,
                    Slot::Occupied(_) => panic!("Error: free list points at an occupied slot."),
                }
                id
            },
        }
    }

    /// Removes a node from the store and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to a live node.
    pub fn free(&mut self, id: NodeId) -> Node<K, V, A> {
        if id.0 >= self.slots.len() {
            panic!("Error: attempting to free invalid node.");
        }
        let old_slot = mem::replace(&mut self.slots[id.0], Slot::Vacant(self.head));
        match old_slot {
            Slot::Occupied(node) => {
                self.head = Some(id);
                self.len -= 1;
                node
            },
            Slot::Vacant(next) => {
                self.slots[id.0] = Slot::Vacant(next);
                panic!("Error: attempting to free vacant node.");
            },
        }
    }

    /// Returns an immutable reference to a node, or `None` if `id` is not live.
    pub fn get(&self, id: NodeId) -> Option<&Node<K, V, A>> {
        match self.slots.get(id.0) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    /// Returns a mutable reference to a node, or `None` if `id` is not live.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<K, V, A>> {
        match self.slots.get_mut(id.0) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    /// Swaps the key-value payloads of two live nodes. Links and auxiliary data stay where they
    /// are.
    pub fn swap_entries(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        let (low, high) = if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) };
        let (head, tail) = self.slots.split_at_mut(high);
        match (&mut head[low], &mut tail[0]) {
            (Slot::Occupied(first), Slot::Occupied(second)) => {
                mem::swap(&mut first.entry, &mut second.entry);
            },
            _ => panic!("Error: attempting to swap vacant node."),
        }
    }

    /// Returns the number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Drops every node in the store.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = None;
        self.len = 0;
    }
}

impl<K, V, A> Default for NodeStore<K, V, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, A> Index<NodeId> for NodeStore<K, V, A> {
    type Output = Node<K, V, A>;

    fn index(&self, id: NodeId) -> &Self::Output {
        self.get(id).expect("Error: node handle out of bounds.")
    }
}

impl<K, V, A> IndexMut<NodeId> for NodeStore<K, V, A> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        self.get_mut(id).expect("Error: node handle out of bounds.")
    }
}
