use crate::bst::node::{Node, Side};
use crate::bst::store::{NodeId, NodeStore};
use crate::bst::{Error, Result};
use std::borrow::Borrow;
use std::cmp::{self, Ordering};

/// A plain binary search tree with parent links.
///
/// `Tree` owns the nodes and the root handle and offers the link maintenance, lookup and
/// traversal primitives that a balancing scheme needs. It never restructures itself; keeping the
/// shape balanced is the job of the caller.
pub struct Tree<K, V, A> {
    store: NodeStore<K, V, A>,
    root: Option<NodeId>,
}

impl<K, V, A> Tree<K, V, A> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Tree {
            store: NodeStore::with_capacity(capacity),
            root: None,
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        self.store.clear();
        self.root = None;
    }

    pub fn node(&self, id: NodeId) -> &Node<K, V, A> {
        &self.store[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V, A> {
        &mut self.store[id]
    }

    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.store[id].left
    }

    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.store[id].right
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.store[id].parent
    }

    pub fn key(&self, id: NodeId) -> &K {
        &self.store[id].entry.key
    }

    pub fn value(&self, id: NodeId) -> &V {
        &self.store[id].entry.value
    }

    pub fn value_mut(&mut self, id: NodeId) -> &mut V {
        &mut self.store[id].entry.value
    }

    pub fn aux(&self, id: NodeId) -> &A {
        &self.store[id].aux
    }

    pub fn aux_mut(&mut self, id: NodeId) -> &mut A {
        &mut self.store[id].aux
    }

    /// Allocates `node` as the root of an empty tree.
    pub fn set_root(&mut self, node: Node<K, V, A>) -> NodeId {
        debug_assert!(self.root.is_none());
        let id = self.store.allocate(node);
        self.store[id].parent = None;
        self.root = Some(id);
        id
    }

    /// Allocates `node` as the `side` child of `parent`, which must not already have a child
    /// there.
    pub fn attach(&mut self, parent: NodeId, side: Side, node: Node<K, V, A>) -> NodeId {
        debug_assert!(self.store[parent].child(side).is_none());
        let id = self.store.allocate(node);
        self.set_child(parent, side, Some(id));
        id
    }

    /// Releases a node that has already been unlinked from the tree.
    pub fn free(&mut self, id: NodeId) -> Node<K, V, A> {
        self.store.free(id)
    }

    /// Links `child` as the `side` child of `parent` in both directions.
    pub fn set_child(&mut self, parent: NodeId, side: Side, child: Option<NodeId>) {
        *self.store[parent].child_mut(side) = child;
        if let Some(child) = child {
            self.store[child].parent = Some(parent);
        }
    }

    /// Returns the side of its parent that `id` hangs on, or `None` for the root.
    pub fn side_of(&self, id: NodeId) -> Option<Side> {
        self.store[id].parent.map(|parent| {
            if self.store[parent].left == Some(id) {
                Side::Left
            } else {
                Side::Right
            }
        })
    }

    /// Puts the subtree rooted at `new` in the position currently held by `old`. The links of
    /// `old` itself are left untouched.
    pub fn replace_subtree(&mut self, old: NodeId, new: Option<NodeId>) {
        let parent = self.store[old].parent;
        match (parent, self.side_of(old)) {
            (Some(parent), Some(side)) => self.set_child(parent, side, new),
            _ => {
                self.root = new;
                if let Some(new) = new {
                    self.store[new].parent = None;
                }
            },
        }
    }

    /// Swaps the key-value payloads of two nodes without touching their links or auxiliary data.
    pub fn swap_entries(&mut self, a: NodeId, b: NodeId) {
        self.store.swap_entries(a, b);
    }

    /// Returns the leftmost node of the subtree rooted at `id`.
    pub fn subtree_min(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.store[id].left {
            id = left;
        }
        id
    }

    /// Returns the rightmost node of the subtree rooted at `id`.
    pub fn subtree_max(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.store[id].right {
            id = right;
        }
        id
    }

    pub fn first(&self) -> Option<NodeId> {
        self.root.map(|root| self.subtree_min(root))
    }

    pub fn last(&self) -> Option<NodeId> {
        self.root.map(|root| self.subtree_max(root))
    }

    /// Returns the in-order predecessor of `id`.
    pub fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(left) = self.store[id].left {
            return Some(self.subtree_max(left));
        }
        let mut curr = id;
        while let Some(parent) = self.store[curr].parent {
            if self.store[parent].right == Some(curr) {
                return Some(parent);
            }
            curr = parent;
        }
        None
    }

    /// Returns the in-order successor of `id`.
    pub fn successor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(right) = self.store[id].right {
            return Some(self.subtree_min(right));
        }
        let mut curr = id;
        while let Some(parent) = self.store[curr].parent {
            if self.store[parent].left == Some(curr) {
                return Some(parent);
            }
            curr = parent;
        }
        None
    }

    /// Returns the height of the tree, counting nodes. An empty tree has height 0.
    pub fn height(&self) -> usize {
        self.subtree_height(self.root)
    }

    pub fn subtree_height(&self, id: Option<NodeId>) -> usize {
        match id {
            None => 0,
            Some(id) => {
                let node = &self.store[id];
                cmp::max(self.subtree_height(node.left), self.subtree_height(node.right)) + 1
            },
        }
    }

    pub fn iter(&self) -> TreeIter<K, V, A> {
        TreeIter {
            tree: self,
            next: self.first(),
            remaining: self.len(),
        }
    }

    /// Consumes the tree and returns its entries in key order.
    pub fn into_entries(mut self) -> Vec<(K, V)> {
        let mut ids = Vec::with_capacity(self.len());
        let mut curr = self.first();
        while let Some(id) = curr {
            ids.push(id);
            curr = self.successor(id);
        }
        ids.into_iter()
            .map(|id| self.store.free(id).entry.into_pair())
            .collect()
    }

    /// Renders the tree sideways: the right subtree above a node, the left subtree below it, and
    /// every level indented by four spaces.
    pub fn render<F>(&self, label: F) -> String
    where
        F: Fn(&Node<K, V, A>) -> String,
    {
        let mut out = String::new();
        self.render_subtree(self.root, 0, &label, &mut out);
        out
    }

    fn render_subtree<F>(&self, id: Option<NodeId>, depth: usize, label: &F, out: &mut String)
    where
        F: Fn(&Node<K, V, A>) -> String,
    {
        if let Some(id) = id {
            let node = &self.store[id];
            self.render_subtree(node.right, depth + 1, label, out);
            out.push_str(&" ".repeat(depth * 4));
            out.push_str(&label(node));
            out.push('\n');
            self.render_subtree(node.left, depth + 1, label, out);
        }
    }
}

impl<K, V, A> Tree<K, V, A>
where
    K: Ord,
{
    /// Returns the node holding `key`, or `None` if there is no such node.
    pub fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut curr = self.root;
        while let Some(id) = curr {
            let node = &self.store[id];
            curr = match key.cmp(node.entry.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    /// Returns the node holding `key`, or `Error::KeyNotFound`.
    pub fn at<Q>(&self, key: &Q) -> Result<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).ok_or(Error::KeyNotFound)
    }

    /// Returns the node with the greatest key less than or equal to `key`.
    pub fn floor<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut ret = None;
        let mut curr = self.root;
        while let Some(id) = curr {
            let node = &self.store[id];
            curr = match key.cmp(node.entry.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => {
                    ret = Some(id);
                    node.right
                },
                Ordering::Equal => return Some(id),
            };
        }
        ret
    }

    /// Returns the node with the least key greater than or equal to `key`.
    pub fn ceil<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut ret = None;
        let mut curr = self.root;
        while let Some(id) = curr {
            let node = &self.store[id];
            curr = match key.cmp(node.entry.key.borrow()) {
                Ordering::Greater => node.right,
                Ordering::Less => {
                    ret = Some(id);
                    node.left
                },
                Ordering::Equal => return Some(id),
            };
        }
        ret
    }
}

impl<K, V, A> Default for Tree<K, V, A> {
    fn default() -> Self {
        Self::new()
    }
}

/// An in-order iterator over a `Tree<K, V, A>` that walks successor links.
pub struct TreeIter<'a, K, V, A>
where
    K: 'a,
    V: 'a,
    A: 'a,
{
    tree: &'a Tree<K, V, A>,
    next: Option<NodeId>,
    remaining: usize,
}

impl<'a, K, V, A> Iterator for TreeIter<'a, K, V, A>
where
    K: 'a,
    V: 'a,
    A: 'a,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        let id = self.next?;
        self.next = tree.successor(id);
        self.remaining -= 1;
        let entry = &tree.store[id].entry;
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V, A> ExactSizeIterator for TreeIter<'a, K, V, A>
where
    K: 'a,
    V: 'a,
    A: 'a,
{
}
