//! An ordered map and set backed by a parent-linked AVL tree.
//!
//! The `bst` module provides node storage and the plain binary search tree operations. The
//! `avl_tree` module keeps that tree balanced with incrementally maintained balance factors and
//! exposes `AvlMap` and `AvlSet`.

mod entry;
pub mod avl_tree;
pub mod bst;
