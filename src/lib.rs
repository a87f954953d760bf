//! This crate provides an AVL tree: an ordered container of borrowed payloads that keeps itself
//! height-balanced.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` will typically store
//! some sort of value (the value that was inserted, for example) and will
//! sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    value less than its own value.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    value greater than its own value.
//!
//! Searching takes `O(height)`, where `height` is the longest path from the root `Node` to a
//! leaf `Node`.
//!
//! ## AVL
//!
//! An AVL tree additionally requires that, for every `Node`, the heights of its two subtrees
//! differ by at most one. Each insert and remove rebalances the `Node`s on the path it took with
//! at most one (single or double) rotation each, which keeps the height below roughly
//! `1.44 * lg(N + 2)` for `N` stored elements.
//!
//! ## Ownership
//!
//! [`AvlTree`] never owns its payloads. It stores `&'a T` references, orders them with a
//! comparator supplied at construction and hands the same references back from
//! [`find`][AvlTree::find], [`remove`][AvlTree::remove] and iteration. The tree owns only its
//! nodes, each of which exclusively owns its children.
//!
//! # Examples
//!
//! ```
//! use std::ops::ControlFlow;
//! use avl_tree::AvlTree;
//!
//! let words = ["pear", "apple", "fig", "cherry"];
//!
//! let mut tree = AvlTree::ordered();
//! for word in &words {
//!     tree.insert(word).unwrap();
//! }
//!
//! assert_eq!(tree.count(), 4);
//! assert_eq!(tree.find(&"fig"), Some(&"fig"));
//!
//! // "fig" ends up at the root. Removing it promotes its in-order predecessor.
//! assert_eq!(tree.remove(&"fig"), Some(&"fig"));
//! assert_eq!(tree.find(&"fig"), None);
//! assert_eq!(tree.find(&"cherry"), Some(&"cherry"));
//!
//! // Traversal is in ascending order and can stop early.
//! let first_long = tree.for_each(|word| {
//!     if word.len() > 3 {
//!         ControlFlow::Break(*word)
//!     } else {
//!         ControlFlow::Continue(())
//!     }
//! });
//! assert_eq!(first_long, ControlFlow::Break("apple"));
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod error;
pub mod iter;
mod node;
mod tree;


pub use error::AllocError;
pub use tree::AvlTree;
