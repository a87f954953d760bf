use std::alloc::Layout;

use thiserror::Error;

/// Returned by [`AvlTree::insert`][crate::AvlTree::insert] when the allocator could not provide
/// memory for a new node. The tree is left exactly as it was before the call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("failed to allocate {} bytes for a tree node", .layout.size())]
pub struct AllocError {
    layout: Layout,
}

impl AllocError {
    pub(crate) fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// The layout of the allocation that failed.
    pub fn layout(&self) -> Layout {
        self.layout
    }
}
