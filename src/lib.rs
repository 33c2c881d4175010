//! Ordered binary tree structures behind one contract.
//!
//! This crate provides a family of node-based binary trees that share node
//! ownership, rotation primitives, and traversal logic while each enforcing
//! its own rebalancing invariant:
//!
//! - **Binary search tree** ([`search_tree::BinarySearchTree`]): plain
//!   ordered insert/delete, no rebalancing.
//! - **Height-balanced tree** ([`avl::AvlTree`]): AVL-style, keeps every
//!   node's child heights within 1 of each other via rotations.
//! - **Red-black tree** ([`red_black::RedBlackTree`]): two-color labeling
//!   with a shared nil sentinel, bounds height via black-height equality.
//! - **Binary min-heap** ([`array_heap::ArrayHeap`]): array-backed, derives
//!   parent/child relationships by index arithmetic.
//!
//! All four implement the [`BinaryTree`] trait: mutation reports whether a
//! structural change occurred, and structural queries (`root`, `left`,
//! `right`, `parent`, `value`, `color`) expose the shape to read-only
//! collaborators such as a visualization layer. Duplicate inserts and
//! absent removals are ordinary `false` outcomes, never errors.
//!
//! Trees are single-threaded: one instance exclusively owns its node graph,
//! and every operation runs to completion before returning.
//!
//! # Example
//!
//! ```rust
//! use binary_forest::avl::AvlTree;
//! use binary_forest::BinaryTree;
//!
//! let mut tree = AvlTree::new();
//! for v in [10, 5, 15, 3, 7] {
//!     tree.add(v);
//! }
//! assert_eq!(tree.in_order(), vec![3, 5, 7, 10, 15]);
//! assert!(tree.remove(&5));
//! assert!(!tree.remove(&42)); // absent: no structural change
//! ```

pub mod array_heap;
pub mod avl;
pub mod diagnostics;
mod node;
pub mod red_black;
pub mod search_tree;
pub mod traits;
mod tree_core;

pub use node::{Link, Node, NodeRef};
pub use traits::{BinaryTree, Color};
