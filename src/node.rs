//! Nodes and the links that own them, along with the height bookkeeping and rotations used to
//! keep every subtree balanced. The recursive tree operations that need a comparator live with the
//! tree in [`crate::tree`].

use std::alloc::{self, Layout};
use std::fmt;
use std::ptr::NonNull;

use tracing::{debug, trace};

use crate::AllocError;

/// Which child of a node we're talking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// The owning slot a node lives in. Either the tree's root or a node's child.
pub(crate) struct Link<'a, T>(pub(crate) Option<Box<Node<'a, T>>>);

/// A `Node` holds a borrowed payload and owns both of its children. The payload itself is never
/// owned by the tree.
pub(crate) struct Node<'a, T> {
    pub(crate) payload: &'a T,
    pub(crate) left: Link<'a, T>,
    pub(crate) right: Link<'a, T>,

    /// How many levels are in the subtree rooted at this node.
    /// A node with no children has a height of 1.
    pub(crate) height: usize,
}

/// Manual implementation of `Clone` so we don't require `T: Clone`. Only the references are
/// copied, never the payloads.
impl<'a, T> Clone for Link<'a, T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<'a, T> Clone for Node<'a, T> {
    fn clone(&self) -> Self {
        Self {
            payload: self.payload,
            left: self.left.clone(),
            right: self.right.clone(),
            height: self.height,
        }
    }
}

impl<'a, T> fmt::Debug for Link<'a, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.root(), f)
    }
}

impl<'a, T> fmt::Debug for Node<'a, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("payload", &self.payload)
            .field("height", &self.height)
            .field("left", &self.left)
            .field("right", &self.right)
            .finish()
    }
}

impl<'a, T> Node<'a, T> {
    /// Allocates a childless node of height 1. Unlike `Box::new` this reports allocation failure
    /// instead of aborting.
    pub(crate) fn try_new_boxed(payload: &'a T) -> Result<Box<Self>, AllocError> {
        let layout = Layout::new::<Self>();

        // SAFETY: `Node` always holds a reference so `layout` has a non-zero size.
        let ptr = unsafe { alloc::alloc(layout) }.cast::<Self>();
        let Some(ptr) = NonNull::new(ptr) else {
            debug!(size = layout.size(), "failed to allocate a tree node");
            return Err(AllocError::new(layout));
        };

        // SAFETY: `ptr` was just returned by the global allocator for the layout of `Self`, so it
        // is valid for writes, properly aligned and may be handed to `Box` which frees it with the
        // same allocator and layout.
        unsafe {
            ptr.as_ptr().write(Node {
                payload,
                left: Link::empty(),
                right: Link::empty(),
                height: 1,
            });
            Ok(Box::from_raw(ptr.as_ptr()))
        }
    }

    pub(crate) fn left(&self) -> Option<&Self> {
        self.left.root()
    }

    pub(crate) fn right(&self) -> Option<&Self> {
        self.right.root()
    }

    fn child_mut(&mut self, side: Side) -> &mut Link<'a, T> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Adjusts the height of `self` to be the max of its children's heights + 1. Both children
    /// must already have correct heights.
    pub(crate) fn fix_height(&mut self) {
        self.height = self.left.height().max(self.right.height()) + 1;
    }

    /// Left subtree height minus right subtree height. Positive means left-heavy.
    pub(crate) fn balance_factor(&self) -> isize {
        self.left.height() as isize - self.right.height() as isize
    }
}

impl<'a, T> Link<'a, T> {
    pub(crate) fn empty() -> Self {
        Self(None)
    }

    pub(crate) fn root(&self) -> Option<&Node<'a, T>> {
        self.0.as_deref()
    }

    pub(crate) fn root_mut(&mut self) -> Option<&mut Node<'a, T>> {
        self.0.as_deref_mut()
    }

    pub(crate) fn take(&mut self) -> Self {
        Self(self.0.take())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// The cached height of the subtree in this slot, 0 when it is empty.
    pub(crate) fn height(&self) -> usize {
        self.root().map_or(0, |n| n.height)
    }

    /// Refreshes the height of the node in this slot and, if it is more than one level taller on
    /// one side, applies the single rotation that fixes it. Both children must already be
    /// balanced with correct heights.
    ///
    /// See https://en.wikipedia.org/wiki/AVL_tree#Rebalancing for terminology.
    pub(crate) fn balance(&mut self) {
        let Some(root) = self.root_mut() else {
            return;
        };
        root.fix_height();

        // A child whose own balance factor is 0 counts as leaning the same way as its parent so
        // it gets a single rotation, not a double one.
        match (root.balance_factor(), root.left(), root.right()) {
            (factor, Some(left), _) if factor > 1 => {
                if left.balance_factor() >= 0 {
                    self.rotate_right()
                } else {
                    self.rotate_left_right()
                }
            }
            (factor, _, Some(right)) if factor < -1 => {
                if right.balance_factor() <= 0 {
                    self.rotate_left()
                } else {
                    self.rotate_right_left()
                }
            }
            _ => {}
        }

        if cfg!(debug_assertions) {
            let Some(root) = self.root() else {
                return;
            };
            let left_height = root.left.height();
            let right_height = root.right.height();
            assert_eq!(root.height, left_height.max(right_height) + 1);
            assert!(left_height.abs_diff(right_height) <= 1);
        }
    }

    /// Rotates the node in this slot toward `side`. Its child on the opposite side moves up to
    /// take its place, and that child's subtree on `side` is handed down to the old root.
    ///
    /// ## Panics
    ///
    /// When the slot is empty or the node has no child on the opposite side.
    ///
    /// # Diagram
    ///
    /// For `side == Side::Right`:
    ///
    /// ```text
    ///      grandparent                parent
    ///       /     \                  /     \
    ///    parent    z     rotate ->  x   grandparent
    ///     / \                               /  \
    ///    x   y                             y    z
    /// ```
    fn rotate(&mut self, side: Side) {
        trace!(?side, "single rotation");
        let mut grandparent = self.0.take().expect("Rotating a tree requires a root");
        let mut parent = grandparent
            .child_mut(side.opposite())
            .0
            .take()
            .expect("Rotating toward a side requires a child on the other side");

        *grandparent.child_mut(side.opposite()) = parent.child_mut(side).take();
        grandparent.fix_height();

        *parent.child_mut(side) = Link(Some(grandparent));
        parent.fix_height();

        self.0 = Some(parent);
    }

    fn rotate_left(&mut self) {
        self.rotate(Side::Left);
    }

    fn rotate_right(&mut self) {
        self.rotate(Side::Right);
    }

    /// Used when the left child is too tall because of its right subtree.
    fn rotate_left_right(&mut self) {
        trace!("left-right rotation");
        self.root_mut()
            .expect("Rotating a tree requires a root")
            .left
            .rotate_left();
        self.rotate_right();
    }

    /// Used when the right child is too tall because of its left subtree.
    fn rotate_right_left(&mut self) {
        trace!("right-left rotation");
        self.root_mut()
            .expect("Rotating a tree requires a root")
            .right
            .rotate_right();
        self.rotate_left();
    }
}
