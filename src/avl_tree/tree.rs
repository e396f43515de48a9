use crate::bst::{self, Error, Node, NodeId, Result, Side};
use log::{debug, trace};
use std::borrow::Borrow;
use std::cmp::{self, Ordering};
use std::mem;

/// A binary search tree whose auxiliary node data is the balance factor: the height of the right
/// subtree minus the height of the left subtree.
pub type Tree<T, U> = bst::Tree<T, U, i8>;

fn balance_of<T, U>(tree: &Tree<T, U>, id: NodeId) -> i8 {
    *tree.aux(id)
}

fn set_balance<T, U>(tree: &mut Tree<T, U>, id: NodeId, balance: i8) {
    *tree.aux_mut(id) = balance;
}

// precondition: `parent` has a right child
pub fn rotate_left<T, U>(tree: &mut Tree<T, U>, parent: NodeId) {
    let pivot = match tree.right(parent) {
        Some(pivot) => pivot,
        None => unreachable!(),
    };
    trace!("rotating left at {:?} with pivot {:?}", parent, pivot);
    let inner = tree.left(pivot);
    tree.replace_subtree(parent, Some(pivot));
    tree.set_child(parent, Side::Right, inner);
    tree.set_child(pivot, Side::Left, Some(parent));
}

// precondition: `parent` has a left child
pub fn rotate_right<T, U>(tree: &mut Tree<T, U>, parent: NodeId) {
    let pivot = match tree.left(parent) {
        Some(pivot) => pivot,
        None => unreachable!(),
    };
    trace!("rotating right at {:?} with pivot {:?}", parent, pivot);
    let inner = tree.right(pivot);
    tree.replace_subtree(parent, Some(pivot));
    tree.set_child(parent, Side::Left, inner);
    tree.set_child(pivot, Side::Right, Some(parent));
}

// Rotates `node`, whose balance factor has reached `balance` (-2 or 2), back into shape and
// assigns the new balance factors. Returns `true` if the rotated subtree ended up one level
// shorter than before the rotation.
fn rebalance<T, U>(tree: &mut Tree<T, U>, node: NodeId, balance: i8) -> bool {
    if balance < 0 {
        let child = match tree.left(node) {
            Some(child) => child,
            None => unreachable!(),
        };
        match balance_of(tree, child) {
            -1 => {
                rotate_right(tree, node);
                set_balance(tree, node, 0);
                set_balance(tree, child, 0);
                true
            },
            0 => {
                rotate_right(tree, node);
                set_balance(tree, node, -1);
                set_balance(tree, child, 1);
                false
            },
            _ => {
                let grandchild = match tree.right(child) {
                    Some(grandchild) => grandchild,
                    None => unreachable!(),
                };
                let (node_balance, child_balance) = match balance_of(tree, grandchild) {
                    1 => (0, -1),
                    0 => (0, 0),
                    _ => (1, 0),
                };
                rotate_left(tree, child);
                rotate_right(tree, node);
                set_balance(tree, node, node_balance);
                set_balance(tree, child, child_balance);
                set_balance(tree, grandchild, 0);
                true
            },
        }
    } else {
        let child = match tree.right(node) {
            Some(child) => child,
            None => unreachable!(),
        };
        match balance_of(tree, child) {
            1 => {
                rotate_left(tree, node);
                set_balance(tree, node, 0);
                set_balance(tree, child, 0);
                true
            },
            0 => {
                rotate_left(tree, node);
                set_balance(tree, node, 1);
                set_balance(tree, child, -1);
                false
            },
            _ => {
                let grandchild = match tree.left(child) {
                    Some(grandchild) => grandchild,
                    None => unreachable!(),
                };
                let (node_balance, child_balance) = match balance_of(tree, grandchild) {
                    -1 => (0, 1),
                    0 => (0, 0),
                    _ => (-1, 0),
                };
                rotate_right(tree, child);
                rotate_left(tree, node);
                set_balance(tree, node, node_balance);
                set_balance(tree, child, child_balance);
                set_balance(tree, grandchild, 0);
                true
            },
        }
    }
}

// `child` was just attached under `parent` and has grown the subtree it hangs in by one level.
fn insert_fix<T, U>(tree: &mut Tree<T, U>, mut parent: NodeId, mut child: NodeId) {
    loop {
        let diff = match tree.side_of(child) {
            Some(Side::Left) => -1,
            _ => 1,
        };
        let balance = balance_of(tree, parent) + diff;
        match balance {
            0 => {
                set_balance(tree, parent, 0);
                return;
            },
            -1 | 1 => {
                set_balance(tree, parent, balance);
                match tree.parent(parent) {
                    Some(grandparent) => {
                        child = parent;
                        parent = grandparent;
                    },
                    None => return,
                }
            },
            _ => {
                // a single restructuring restores the height the subtree had before the insert
                rebalance(tree, parent, balance);
                return;
            },
        }
    }
}

// One of the subtrees of `node` just got one level shorter: the left one if `diff` is 1, the
// right one if `diff` is -1.
fn remove_fix<T, U>(tree: &mut Tree<T, U>, node: NodeId, diff: i8) {
    let mut next = Some((node, diff));
    while let Some((node, diff)) = next {
        let parent_diff = match tree.side_of(node) {
            Some(Side::Left) => 1,
            _ => -1,
        };
        let up = tree.parent(node).map(|parent| (parent, parent_diff));
        let balance = balance_of(tree, node) + diff;
        next = match balance {
            -1 | 1 => {
                set_balance(tree, node, balance);
                None
            },
            0 => {
                set_balance(tree, node, 0);
                up
            },
            _ => {
                if rebalance(tree, node, balance) {
                    up
                } else {
                    None
                }
            },
        };
    }
}

/// Inserts a key-value pair into the tree. If the key already exists, its value is replaced and
/// the old value is returned; the shape of the tree is left untouched.
pub fn insert<T, U>(tree: &mut Tree<T, U>, key: T, value: U) -> Option<U>
where
    T: Ord,
{
    let mut curr = match tree.root() {
        Some(root) => root,
        None => {
            tree.set_root(Node::new(key, value, 0));
            return None;
        },
    };

    let side = loop {
        let side = match key.cmp(tree.key(curr)) {
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
            Ordering::Equal => return Some(mem::replace(tree.value_mut(curr), value)),
        };
        match tree.node(curr).child(side) {
            Some(next) => curr = next,
            None => break side,
        }
    };

    let child = tree.attach(curr, side, Node::new(key, value, 0));
    insert_fix(tree, curr, child);
    None
}

/// Removes a key from the tree and returns its key-value pair, or `None` if the key does not
/// exist.
pub fn remove<T, U, V>(tree: &mut Tree<T, U>, key: &V) -> Option<(T, U)>
where
    T: Ord + Borrow<V>,
    V: Ord + ?Sized,
{
    let mut node = tree.find(key)?;

    if tree.left(node).is_some() && tree.right(node).is_some() {
        let predecessor = match tree.predecessor(node) {
            Some(predecessor) => predecessor,
            None => unreachable!(),
        };
        debug!("moving entry of {:?} into predecessor {:?} before removal", node, predecessor);
        tree.swap_entries(node, predecessor);
        node = predecessor;
    }

    let child = tree.left(node).or_else(|| tree.right(node));
    let parent = tree.parent(node);
    let diff = match tree.side_of(node) {
        Some(Side::Left) => 1,
        _ => -1,
    };
    trace!("splicing out {:?}", node);
    tree.replace_subtree(node, child);
    let removed = tree.free(node);

    if let Some(parent) = parent {
        remove_fix(tree, parent, diff);
    }
    Some(removed.entry.into_pair())
}

/// Checks every structural invariant of the tree: parent links agree with child links, keys are
/// strictly increasing in order, stored balance factors match the actual subtree heights, and no
/// balance factor leaves `-1..=1`.
pub fn validate<T, U>(tree: &Tree<T, U>) -> Result<()>
where
    T: Ord,
{
    let mut count = 0;
    if let Some(root) = tree.root() {
        if tree.parent(root).is_some() {
            return Err(violation("root has a parent"));
        }
        check_subtree(tree, root, &mut count)?;
    }
    if count != tree.len() {
        return Err(Error::InvariantViolation(format!(
            "{} nodes reachable from the root but {} stored",
            count,
            tree.len(),
        )));
    }

    let mut prev: Option<&T> = None;
    for (key, _) in tree.iter() {
        if let Some(prev) = prev {
            if prev >= key {
                return Err(violation("keys are not strictly increasing in order"));
            }
        }
        prev = Some(key);
    }
    Ok(())
}

fn violation(reason: &str) -> Error {
    Error::InvariantViolation(reason.to_string())
}

// Returns the height of the subtree rooted at `id`.
fn check_subtree<T, U>(tree: &Tree<T, U>, id: NodeId, count: &mut usize) -> Result<usize> {
    *count += 1;
    let mut heights = [0, 0];
    for (height, side) in heights.iter_mut().zip(&[Side::Left, Side::Right]) {
        if let Some(child) = tree.node(id).child(*side) {
            if tree.parent(child) != Some(id) {
                return Err(violation("parent link disagrees with child link"));
            }
            *height = check_subtree(tree, child, count)?;
        }
    }

    let actual = heights[1] as i64 - heights[0] as i64;
    let stored = i64::from(balance_of(tree, id));
    if actual != stored {
        return Err(Error::InvariantViolation(format!(
            "stored balance factor {} but subtree heights give {}",
            stored, actual,
        )));
    }
    if actual.abs() > 1 {
        return Err(Error::InvariantViolation(format!(
            "balance factor {} is out of range",
            actual,
        )));
    }
    Ok(cmp::max(heights[0], heights[1]) + 1)
}

#[cfg(test)]
mod tests {
    use super::{insert, remove, rotate_left, rotate_right, validate, Tree};
    use crate::bst::{Node, Side};
    use rand::Rng;

    fn build(keys: &[u32]) -> Tree<u32, u32> {
        let mut tree = Tree::new();
        for key in keys {
            insert(&mut tree, *key, *key);
            validate(&tree).unwrap();
        }
        tree
    }

    // (key, parent key, balance) of every node in key order
    fn shape(tree: &Tree<u32, u32>) -> Vec<(u32, Option<u32>, i8)> {
        let mut ret = Vec::new();
        let mut curr = tree.first();
        while let Some(id) = curr {
            let parent = tree.parent(id).map(|parent| *tree.key(parent));
            ret.push((*tree.key(id), parent, *tree.aux(id)));
            curr = tree.successor(id);
        }
        ret
    }

    fn preorder(tree: &Tree<u32, u32>) -> Vec<(u32, i8)> {
        let mut ret = Vec::new();
        let mut stack: Vec<_> = tree.root().into_iter().collect();
        while let Some(id) = stack.pop() {
            ret.push((*tree.key(id), *tree.aux(id)));
            stack.extend(tree.right(id));
            stack.extend(tree.left(id));
        }
        ret
    }

    fn keys(tree: &Tree<u32, u32>) -> Vec<u32> {
        tree.iter().map(|(key, _)| *key).collect()
    }

    #[test]
    fn test_rotate_left() {
        //   1              3
        //  / \            / \
        // 0   3    =>    1   4
        //    / \        / \
        //   2   4      0   2
        let mut tree = Tree::new();
        let one = tree.set_root(Node::new(1, 1, 0));
        tree.attach(one, Side::Left, Node::new(0, 0, 0));
        let three = tree.attach(one, Side::Right, Node::new(3, 3, 0));
        let two = tree.attach(three, Side::Left, Node::new(2, 2, 0));
        tree.attach(three, Side::Right, Node::new(4, 4, 0));

        rotate_left(&mut tree, one);

        assert_eq!(tree.root(), Some(three));
        assert_eq!(tree.parent(three), None);
        assert_eq!(tree.left(three), Some(one));
        assert_eq!(tree.parent(one), Some(three));
        assert_eq!(tree.right(one), Some(two));
        assert_eq!(tree.parent(two), Some(one));
        assert_eq!(keys(&tree), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_rotate_right_below_root() {
        let mut tree = Tree::new();
        let root = tree.set_root(Node::new(10, 10, 0));
        let five = tree.attach(root, Side::Left, Node::new(5, 5, 0));
        let three = tree.attach(five, Side::Left, Node::new(3, 3, 0));
        let four = tree.attach(three, Side::Right, Node::new(4, 4, 0));

        rotate_right(&mut tree, five);

        assert_eq!(tree.root(), Some(root));
        assert_eq!(tree.left(root), Some(three));
        assert_eq!(tree.parent(three), Some(root));
        assert_eq!(tree.right(three), Some(five));
        assert_eq!(tree.left(five), Some(four));
        assert_eq!(tree.parent(four), Some(five));
        assert_eq!(keys(&tree), vec![3, 4, 5, 10]);
    }

    #[test]
    #[should_panic]
    fn test_rotate_without_pivot() {
        let mut tree: Tree<u32, u32> = Tree::new();
        let root = tree.set_root(Node::new(1, 1, 0));
        rotate_left(&mut tree, root);
    }

    #[test]
    fn test_insert_single_rotation() {
        let tree = build(&[1, 2, 3]);
        assert_eq!(preorder(&tree), vec![(2, 0), (1, 0), (3, 0)]);
    }

    #[test]
    fn test_insert_double_rotation() {
        let tree = build(&[3, 1, 2]);
        assert_eq!(preorder(&tree), vec![(2, 0), (1, 0), (3, 0)]);

        let tree = build(&[1, 3, 2]);
        assert_eq!(preorder(&tree), vec![(2, 0), (1, 0), (3, 0)]);
    }

    #[test]
    fn test_insert_double_rotation_left_heavy_grandchild() {
        // grandchild leans right
        let tree = build(&[5, 2, 8, 1, 3, 4]);
        assert_eq!(
            preorder(&tree),
            vec![(3, 0), (2, -1), (1, 0), (5, 0), (4, 0), (8, 0)],
        );

        // grandchild leans left
        let tree = build(&[10, 4, 12, 2, 6, 5]);
        assert_eq!(
            preorder(&tree),
            vec![(6, 0), (4, 0), (2, 0), (5, 0), (10, 1), (12, 0)],
        );
    }

    #[test]
    fn test_insert_double_rotation_right_heavy_grandchild() {
        // grandchild leans left
        let tree = build(&[2, 1, 5, 4, 6, 3]);
        assert_eq!(
            preorder(&tree),
            vec![(4, 0), (2, 0), (1, 0), (3, 0), (5, 1), (6, 0)],
        );

        // grandchild leans right
        let tree = build(&[2, 1, 6, 4, 7, 5]);
        assert_eq!(
            preorder(&tree),
            vec![(4, 0), (2, -1), (1, 0), (6, 0), (5, 0), (7, 0)],
        );
    }

    #[test]
    fn test_insert_sequence() {
        let tree = build(&[1, 3, 5, 10, 6, 11, 8, 4, 7]);
        assert_eq!(keys(&tree), vec![1, 3, 4, 5, 6, 7, 8, 10, 11]);
        assert_eq!(
            preorder(&tree),
            vec![(6, 0), (3, 1), (1, 0), (5, -1), (4, 0), (10, -1), (8, -1), (7, 0), (11, 0)],
        );
        assert_eq!(tree.height(), 4);
    }

    #[test]
    fn test_insert_replace() {
        let mut tree = build(&[2, 1, 3]);
        let before = shape(&tree);
        assert_eq!(insert(&mut tree, 3, 30), Some(3));
        assert_eq!(shape(&tree), before);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.value(tree.find(&3).unwrap()), &30);
    }

    #[test]
    fn test_remove_missing() {
        let mut tree = build(&[2, 1, 3]);
        assert_eq!(remove(&mut tree, &4), None);
        assert_eq!(tree.len(), 3);

        let mut empty: Tree<u32, u32> = Tree::new();
        assert_eq!(remove(&mut empty, &4), None);
    }

    #[test]
    fn test_remove_root_leaf() {
        let mut tree = build(&[1]);
        assert_eq!(remove(&mut tree, &1), Some((1, 1)));
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn test_remove_two_children() {
        let mut tree = build(&[10, 5, 15, 3, 7, 12, 18]);
        assert_eq!(remove(&mut tree, &10), Some((10, 10)));
        validate(&tree).unwrap();

        let root = tree.root().unwrap();
        assert_eq!(tree.key(root), &7);
        assert_eq!(keys(&tree), vec![3, 5, 7, 12, 15, 18]);
        assert_eq!(
            preorder(&tree),
            vec![(7, 0), (5, -1), (3, 0), (15, 0), (12, 0), (18, 0)],
        );
    }

    #[test]
    fn test_remove_rotation_keeps_height() {
        // removing 1 leaves 2 with a balanced right child, so the single rotation does not
        // shorten the subtree
        let mut tree = build(&[2, 1, 4, 3, 5]);
        remove(&mut tree, &1);
        validate(&tree).unwrap();
        assert_eq!(preorder(&tree), vec![(4, -1), (2, 1), (3, 0), (5, 0)]);
    }

    #[test]
    fn test_remove_double_rotation() {
        let mut tree = build(&[2, 1, 4, 3]);
        remove(&mut tree, &1);
        validate(&tree).unwrap();
        assert_eq!(preorder(&tree), vec![(3, 0), (2, 0), (4, 0)]);
    }

    #[test]
    fn test_remove_cascade() {
        // a fibonacci tree of height 5 rebalances at two levels when its shallowest leaf goes
        let mut tree = build(&[8, 5, 11, 3, 7, 10, 12, 2, 4, 6, 9, 1]);
        assert_eq!(tree.height(), 5);
        remove(&mut tree, &12);
        validate(&tree).unwrap();
        assert_eq!(tree.height(), 4);
        assert_eq!(keys(&tree), vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn test_remove_all() {
        let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
        let mut tree: Tree<u32, u32> = Tree::new();
        let mut expected = Vec::new();
        for _ in 0..500 {
            let key = rng.gen_range(0, 1000);
            insert(&mut tree, key, key);
            expected.push(key);
        }
        expected.sort();
        expected.dedup();
        rng.shuffle(&mut expected);

        for key in expected {
            assert_eq!(remove(&mut tree, &key), Some((key, key)));
            validate(&tree).unwrap();
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn test_insert_remove_restores_shape() {
        let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 2, 3, 4]);
        let mut unrotated = 0;
        for size in 0..64 {
            let mut tree = Tree::new();
            for _ in 0..size {
                let key = rng.gen_range(0, 1000) * 2;
                insert(&mut tree, key, key);
            }

            // odd keys are never present
            let key = rng.gen_range(0, 1000) * 2 + 1;
            let before = shape(&tree);
            insert(&mut tree, key, key);
            let after_insert: Vec<_> = shape(&tree)
                .into_iter()
                .filter(|node| node.0 != key)
                .map(|node| (node.0, node.1))
                .collect();
            let rotated = before
                .iter()
                .map(|node| (node.0, node.1))
                .ne(after_insert.into_iter());

            assert_eq!(remove(&mut tree, &key), Some((key, key)));
            validate(&tree).unwrap();
            if rotated {
                assert_eq!(
                    shape(&tree).iter().map(|node| node.0).collect::<Vec<_>>(),
                    before.iter().map(|node| node.0).collect::<Vec<_>>(),
                );
            } else {
                unrotated += 1;
                assert_eq!(shape(&tree), before);
            }
        }
        assert!(unrotated > 0);
    }

    #[test]
    fn test_validate_detects_bad_balance() {
        let mut tree = build(&[2, 1, 3]);
        let root = tree.root().unwrap();
        *tree.aux_mut(root) = 1;
        assert!(validate(&tree).is_err());
    }

    #[test]
    fn test_validate_detects_bad_order() {
        let mut tree = Tree::new();
        let root = tree.set_root(Node::new(2, 2, 0));
        tree.attach(root, Side::Left, Node::new(3, 3, 0));
        tree.attach(root, Side::Right, Node::new(1, 1, 0));
        assert!(validate(&tree).is_err());
    }
}
