//! The tree handle and its operations.
//!
//! Every mutating operation descends by comparison, edits the tree where the search ends and
//! then rebalances each ancestor on the way back up, so the AVL invariant holds again by the time
//! the call returns.

use std::cmp::Ordering;
use std::fmt;
use std::mem;
use std::ops::ControlFlow;

use tracing::trace;

use crate::iter::Iter;
use crate::node::{Link, Node};
use crate::AllocError;

/// A self-balancing Binary Search Tree (specifically, an AVL tree) over borrowed payloads.
///
/// The tree never owns, copies or frees what it stores: it holds `&'a T` references and orders
/// them with a caller-supplied comparator. The comparator is handed the tree's context on every
/// call. Payloads must not compare equal to one another.
///
/// # Examples
///
/// ```
/// use avl_tree::AvlTree;
///
/// struct Employee {
///     id: u32,
///     name: &'static str,
/// }
///
/// let staff = [
///     Employee { id: 7, name: "ada" },
///     Employee { id: 3, name: "grace" },
///     Employee { id: 9, name: "linus" },
/// ];
///
/// let mut tree = AvlTree::new(|a: &Employee, b: &Employee, _: &()| a.id.cmp(&b.id), ());
/// for employee in &staff {
///     tree.insert(employee).unwrap();
/// }
///
/// let probe = Employee { id: 3, name: "" };
/// assert_eq!(tree.find(&probe).map(|e| e.name), Some("grace"));
///
/// let names: Vec<_> = tree.iter().map(|e| e.name).collect();
/// assert_eq!(names, ["grace", "ada", "linus"]);
/// ```
pub struct AvlTree<'a, T, C = (), F = fn(&T, &T, &C) -> Ordering> {
    root: Link<'a, T>,
    cmp: F,
    context: C,
}

impl<'a, T> AvlTree<'a, T>
where
    T: Ord,
{
    /// Generates a new, empty `AvlTree` ordered by `T`'s own [`Ord`] implementation.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::ordered();
    /// tree.insert(&5).unwrap();
    ///
    /// assert_eq!(tree.find(&5), Some(&5));
    /// ```
    pub fn ordered() -> Self {
        Self::new(|a, b, _| a.cmp(b), ())
    }
}

impl<'a, T> Default for AvlTree<'a, T>
where
    T: Ord,
{
    fn default() -> Self {
        Self::ordered()
    }
}

impl<'a, T, C, F> Clone for AvlTree<'a, T, C, F>
where
    C: Clone,
    F: Clone,
{
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            cmp: self.cmp.clone(),
            context: self.context.clone(),
        }
    }
}

impl<'a, T, C, F> fmt::Debug for AvlTree<'a, T, C, F>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvlTree").field("root", &self.root).finish()
    }
}

impl<'a, T, C, F> AvlTree<'a, T, C, F>
where
    F: Fn(&T, &T, &C) -> Ordering,
{
    /// Generates a new, empty `AvlTree` ordering its payloads with `cmp`. The `context` is owned by
    /// the tree and passed unchanged to every comparison.
    ///
    /// `cmp` must be a strict total order that stays the same for the lifetime of the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTree;
    ///
    /// // The context decides the direction of the order.
    /// let descending = true;
    /// let mut tree = AvlTree::new(
    ///     |a: &i32, b: &i32, descending: &bool| if *descending { b.cmp(a) } else { a.cmp(b) },
    ///     descending,
    /// );
    /// for x in &[1, 3, 2] {
    ///     tree.insert(x).unwrap();
    /// }
    ///
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [3, 2, 1]);
    /// ```
    pub fn new(cmp: F, context: C) -> Self {
        Self {
            root: Link::empty(),
            cmp,
            context,
        }
    }

    /// Inserts a reference to `payload` into the tree.
    ///
    /// Nothing already in the tree may compare equal to `payload`. This is checked in debug
    /// builds only.
    ///
    /// # Errors
    ///
    /// Returns an [`AllocError`] if memory for the new node could not be allocated. The tree is
    /// unchanged in that case.
    ///
    /// # Panics
    ///
    /// In debug builds, when `payload` compares equal to an element already in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::ordered();
    /// for x in &[1, 2, 3] {
    ///     tree.insert(x).unwrap();
    /// }
    ///
    /// assert_eq!(tree.count(), 3);
    /// assert_eq!(tree.height(), 2);
    /// ```
    pub fn insert(&mut self, payload: &'a T) -> Result<(), AllocError> {
        // Allocate before touching the tree so a failure can't leave it half-modified.
        let node = Node::try_new_boxed(payload)?;

        let Self { root, cmp, context } = self;
        let (cmp, context) = (&*cmp, &*context);
        root.insert(node, &|a: &T, b: &T| cmp(a, b, context));

        Ok(())
    }

    /// Potentially finds the stored payload comparing equal to `key`. If nothing matches, `None`
    /// is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::ordered();
    /// tree.insert(&1).unwrap();
    ///
    /// assert_eq!(tree.find(&1), Some(&1));
    /// assert_eq!(tree.find(&42), None);
    /// ```
    pub fn find(&self, key: &T) -> Option<&'a T> {
        let (cmp, context) = (&self.cmp, &self.context);
        self.root.find(key, &|a: &T, b: &T| cmp(a, b, context))
    }

    /// Removes the element comparing equal to `key` and returns the stored payload reference. If
    /// the tree does not contain such an element, nothing happens and `None` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::ordered();
    /// tree.insert(&1).unwrap();
    ///
    /// assert_eq!(tree.remove(&1), Some(&1));
    /// assert_eq!(tree.remove(&1), None);
    /// assert!(tree.is_empty());
    /// ```
    pub fn remove(&mut self, key: &T) -> Option<&'a T> {
        let Self { root, cmp, context } = self;
        let (cmp, context) = (&*cmp, &*context);
        let removed = root.remove(key, &|a: &T, b: &T| cmp(a, b, context));

        if removed.is_none() {
            trace!("remove found no matching element");
        }
        removed
    }

    #[cfg(test)]
    pub(crate) fn assert_valid(&self) {
        let (cmp, context) = (&self.cmp, &self.context);
        crate::test::assert_avl(&self.root, &|a: &T, b: &T| cmp(a, b, context));
    }
}

impl<'a, T, C, F> AvlTree<'a, T, C, F> {
    /// Counts the elements by visiting every node. This is `O(n)`.
    pub fn count(&self) -> usize {
        self.root.count()
    }

    /// The number of levels in the tree, 0 when it is empty.
    pub fn height(&self) -> usize {
        self.root.height()
    }

    /// Whether the tree has no elements. This is `O(1)`.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// The context handed to every comparison.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Calls `action` on every element in ascending order. As soon as `action` breaks, the
    /// traversal stops and that [`ControlFlow::Break`] is returned. If every call continues,
    /// `ControlFlow::Continue(())` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::ops::ControlFlow;
    /// use avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::ordered();
    /// for x in &[4, 1, 3, 2] {
    ///     tree.insert(x).unwrap();
    /// }
    ///
    /// let mut seen = Vec::new();
    /// let first_even = tree.for_each(|x| {
    ///     seen.push(*x);
    ///     if x % 2 == 0 {
    ///         ControlFlow::Break(*x)
    ///     } else {
    ///         ControlFlow::Continue(())
    ///     }
    /// });
    ///
    /// assert_eq!(first_even, ControlFlow::Break(2));
    /// assert_eq!(seen, [1, 2]);
    /// ```
    pub fn for_each<B, A>(&self, mut action: A) -> ControlFlow<B>
    where
        A: FnMut(&'a T) -> ControlFlow<B>,
    {
        self.root.for_each(&mut action)
    }

    /// An iterator over the elements in ascending order.
    pub fn iter(&self) -> Iter<'_, 'a, T> {
        Iter::new(&self.root)
    }

    /// The smallest element, if any.
    pub fn first(&self) -> Option<&'a T> {
        let mut node = self.root.root()?;
        while let Some(left) = node.left() {
            node = left;
        }
        Some(node.payload)
    }

    /// The largest element, if any.
    pub fn last(&self) -> Option<&'a T> {
        let mut node = self.root.root()?;
        while let Some(right) = node.right() {
            node = right;
        }
        Some(node.payload)
    }

    /// Removes every element, leaving an empty tree with the same comparator and context. The
    /// payloads themselves are untouched.
    pub fn clear(&mut self) {
        trace!("clearing tree");
        self.root = Link::empty();
    }
}

impl<'t, 'a, T, C, F> IntoIterator for &'t AvlTree<'a, T, C, F> {
    type Item = &'a T;
    type IntoIter = Iter<'t, 'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> Link<'a, T> {
    fn insert<Cmp>(&mut self, new_node: Box<Node<'a, T>>, cmp: &Cmp)
    where
        Cmp: Fn(&T, &T) -> Ordering,
    {
        let Some(node) = self.root_mut() else {
            self.0 = Some(new_node);
            return;
        };

        let ordering = cmp(new_node.payload, node.payload);
        debug_assert_ne!(
            ordering,
            Ordering::Equal,
            "inserted an element that compares equal to one already in the tree"
        );
        match ordering {
            Ordering::Less => node.left.insert(new_node, cmp),
            Ordering::Equal | Ordering::Greater => node.right.insert(new_node, cmp),
        }

        self.balance();
    }

    fn find<Cmp>(&self, key: &T, cmp: &Cmp) -> Option<&'a T>
    where
        Cmp: Fn(&T, &T) -> Ordering,
    {
        let node = self.root()?;
        match cmp(key, node.payload) {
            Ordering::Less => node.left.find(key, cmp),
            Ordering::Equal => Some(node.payload),
            Ordering::Greater => node.right.find(key, cmp),
        }
    }

    fn remove<Cmp>(&mut self, key: &T, cmp: &Cmp) -> Option<&'a T>
    where
        Cmp: Fn(&T, &T) -> Ordering,
    {
        let mut node = self.0.take()?;
        let removed = match cmp(key, node.payload) {
            Ordering::Less => node.left.remove(key, cmp),
            Ordering::Equal => {
                let (replacement, removed) = node.unlink();
                *self = replacement;
                return Some(removed);
            }
            Ordering::Greater => node.right.remove(key, cmp),
        };

        self.0 = Some(node);
        self.balance();
        removed
    }

    pub(crate) fn count(&self) -> usize {
        self.root()
            .map_or(0, |n| 1 + n.left.count() + n.right.count())
    }

    fn for_each<B, A>(&self, action: &mut A) -> ControlFlow<B>
    where
        A: FnMut(&'a T) -> ControlFlow<B>,
    {
        let Some(node) = self.root() else {
            return ControlFlow::Continue(());
        };
        node.left.for_each(action)?;
        action(node.payload)?;
        node.right.for_each(action)
    }
}

impl<'a, T> Node<'a, T> {
    /// Takes this node out of the tree. Returns what should take its place and the payload it
    /// held.
    ///
    /// With at most one child, that child is promoted. With two, the node stays where it is and
    /// takes over the payload of its in-order predecessor, which is removed instead.
    fn unlink(mut self: Box<Self>) -> (Link<'a, T>, &'a T) {
        match (self.left.take().0, self.right.is_empty()) {
            (None, _) => (self.right.take(), self.payload),
            (Some(left), true) => (Link(Some(left)), self.payload),
            (Some(left), false) => {
                let (left, predecessor) = left.remove_largest();
                let removed = mem::replace(&mut self.payload, predecessor);
                self.left = left;

                let mut link = Link(Some(self));
                link.balance();
                (link, removed)
            }
        }
    }

    /// Removes the largest node in this subtree by recursing to the right until there is no right
    /// child. Returns the rebalanced subtree and the payload of the removed node.
    fn remove_largest(mut self: Box<Self>) -> (Link<'a, T>, &'a T) {
        match self.right.take().0 {
            // Being the largest we have no right child, so at most a left one to promote.
            None => (self.left.take(), self.payload),
            Some(right) => {
                let (right, largest) = right.remove_largest();
                self.right = right;

                let mut link = Link(Some(self));
                link.balance();
                (link, largest)
            }
        }
    }
}
