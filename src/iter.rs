//! In-order iteration over an [`AvlTree`][crate::AvlTree].

use std::iter::FusedIterator;

use crate::node::{Link, Node};

/// An iterator over the elements of an [`AvlTree`][crate::AvlTree] in ascending order.
///
/// This walks the tree with an explicit stack holding the path to the next element, so it never
/// recurses.
///
/// # Examples
///
/// ```
/// use avl_tree::AvlTree;
///
/// let mut tree = AvlTree::ordered();
/// for x in &[3, 1, 2] {
///     tree.insert(x).unwrap();
/// }
///
/// let mut iter = tree.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next(), Some(&2));
/// assert_eq!(iter.next(), Some(&3));
/// assert_eq!(iter.next(), None);
/// ```
pub struct Iter<'t, 'a, T> {
    stack: Vec<&'t Node<'a, T>>,
}

impl<'t, 'a, T> Iter<'t, 'a, T> {
    pub(crate) fn new(root: &'t Link<'a, T>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root.root());
        iter
    }

    /// Pushes `node` and all of its left descendants. The smallest of them ends up on top.
    fn push_left_spine(&mut self, mut node: Option<&'t Node<'a, T>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left();
        }
    }
}

impl<'t, 'a, T> Iterator for Iter<'t, 'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        Some(node.payload)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // Everything on the stack is still to be yielded.
        (self.stack.len(), None)
    }
}

impl<'t, 'a, T> FusedIterator for Iter<'t, 'a, T> {}
