//! Node storage shared by every container flavor.
//!
//! A node owns exactly one heap allocation (`Box<Node<T>>`) for the
//! lifetime of the entry it backs; `l`/`r` are the XOR-encoded sibling
//! links described in [`crate::link`], and `T` is the per-flavor payload
//! (see `crate::map`, `crate::multimap`, `crate::interval_map`).

use core::ptr::NonNull;

pub(crate) type NodePtr<T> = NonNull<Node<T>>;

pub(crate) struct Node<T> {
    pub(crate) l: usize,
    pub(crate) r: usize,
    pub(crate) payload: T,
}

impl<T> Node<T> {
    #[inline]
    pub(crate) fn new_boxed(payload: T) -> alloc::boxed::Box<Self> {
        alloc::boxed::Box::new(Node { l: 0, r: 0, payload })
    }
}

/// Extracts the BST ordering key from a node's payload.
///
/// Unique-key nodes return their own key; bucketed and interval nodes
/// return the key of the bucket's representative (first) entry — a
/// duplicate key is always appended to an existing node's bucket, never
/// given a sibling subtree of its own.
pub(crate) trait HasKey<K> {
    fn key(&self) -> &K;
}
