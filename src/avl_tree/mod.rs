//! Self-balancing binary search tree where the heights of the two child subtrees of any node
//! differ by at most one.
//!
//! `tree` holds the balancing engine: the two rotations, insertion and removal with their
//! balance factor fix-ups, and a structural validator. `AvlMap` and `AvlSet` wrap it in the usual
//! ordered collection interface.

mod map;
mod set;
pub mod tree;

pub use self::map::{AvlMap, AvlMapIntoIter, AvlMapIter};
pub use self::set::{AvlSet, AvlSetIntoIter, AvlSetIter};
