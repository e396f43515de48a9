//! Plain binary search tree with parent links, used as the base of the balanced trees.
//!
//! Nodes live in a `NodeStore` and refer to each other through `NodeId` handles. Child handles
//! are the ownership path of the tree; parent handles only point back up.

mod node;
mod store;
mod tree;

pub use self::node::{Node, Side};
pub use self::store::{NodeId, NodeStore};
pub use self::tree::{Tree, TreeIter};

use std::error;
use std::fmt;
use std::result;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// A strict lookup found no entry for the requested key.
    KeyNotFound,
    /// A structural check of a tree failed.
    InvariantViolation(String),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::KeyNotFound => write!(f, "key not found"),
            Error::InvariantViolation(reason) => write!(f, "invariant violation: {}", reason),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
