//! An ordered map, multimap and interval map built on a single XOR-linked
//! scapegoat tree core.
//!
//! # Overview
//! Every container here stores its nodes as individual heap allocations
//! linked by a single `usize` per side: `node.l = addr(left) ^
//! addr(parent)` and `node.r = addr(right) ^ addr(parent)`. Knowing
//! either neighbor of a link recovers the other, so a cursor is just
//! `(node, parent)` — no node carries a parent pointer, which keeps a
//! `Node<T>` exactly two machine words wider than its payload. Balance
//! comes from the scapegoat discipline: insert descends normally and, on
//! the way back up, rebuilds the topmost subtree whose child-size split
//! violates the α-weight bound into a perfectly balanced BST. Erase never
//! rebalances — it only splices out the removed node, donating its
//! in-order successor or predecessor (whichever roots the smaller
//! subtree) into its place.
//!
//! - [`OrderedMap`] — one value per key.
//! - [`OrderedMultimap`] — many values per key, insertion order preserved
//!   within a key.
//! - [`IntervalMap`] — many `([lo, hi], value)` entries, augmented with a
//!   per-node subtree-max-`hi` field so stabbing queries (`any`/`all`)
//!   can prune whole subtrees instead of visiting every node.
//!
//! All three are generic over a pluggable three-way [`KeyCompare`],
//! defaulting to [`OrdCompare`] ([`Ord`]-based), the same pluggable-but-
//! `Ord`-shaped comparator convention used by [`std::collections::BTreeMap`].
//!
//! # Invariants
//! - Every key in a subtree compares less than its parent on the right and
//!   greater on the left (standard BST order).
//! - Every subtree satisfies the scapegoat α-weight bound: `3 * size(left)
//!   <= 2 * size(subtree)` and likewise for the right child.
//! - A node's bucket (multimap, interval map) is never empty; it is erased
//!   along with the node itself the moment its last entry is removed.
//! - An interval map node's `max` equals the greatest `hi` over its own
//!   bucket and both of its children's `max` fields.
//!
//! # Feature flags
//! - `std` (**enabled by default**) — enables the standard library. Only
//!   adds an [`std::error::Error`] implementation for [`Error`]; the tree
//!   core itself is `no_std` either way.
//! - `alloc` (**enabled by default**) — every container needs a global
//!   allocator (each node is its own heap allocation); this crate has no
//!   allocator-free mode.
//!
//! # Public dependencies
//! None — every container is built on `core`/`alloc` alone.

#![warn(
    rust_2018_idioms,
    clippy::cargo,
    clippy::pedantic,
    clippy::nursery,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unused_qualifications,
    variant_size_differences,
    clippy::unwrap_used, // Only .expect() allowed
)]
#![deny(anonymous_parameters, bare_trait_objects)]
#![allow(
    clippy::use_self,
    clippy::module_name_repetitions,
)]
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(feature = "doc_cfg", feature(doc_cfg))]

#[cfg(feature = "alloc")]
extern crate alloc;

mod aug;
mod bucket;
mod compare;
mod erase;
mod error;
mod insert;
mod interval_map;
mod link;
mod map;
mod multimap;
mod nav;
mod node;
mod payload;
#[cfg(test)]
mod tests;

pub use compare::{KeyCompare, OrdCompare};
pub use error::Error;
pub use interval_map::{IntervalMap, Iter as IntervalMapIter};
pub use map::{Iter as MapIter, OrderedMap};
pub use multimap::{Iter as MultimapIter, OrderedMultimap};

/// A prelude importing every container type and the comparator trait.
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::{IntervalMap, KeyCompare, OrdCompare, OrderedMap, OrderedMultimap};
}
