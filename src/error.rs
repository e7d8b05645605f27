//! The error kinds originating in the tree core.
//!
//! No other errors originate here: every fallible path in this crate
//! surfaces one of these two kinds to the caller of the top-level
//! operation, and an in-flight mutation either completes in full or
//! leaves the tree exactly as it was — insert allocates a node before
//! linking it in, and rebuild allocates its full scratch buffer up
//! front, before touching any existing link.

use core::fmt::{self, Display, Formatter};

/// An error surfaced by a fallible tree operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Error {
    /// Node or scratch-buffer allocation failed during insert or rebuild.
    ///
    /// The standard Rust global allocator aborts the process rather than
    /// reporting allocation failure, so no code path in this build can
    /// currently produce this variant; it is kept for API completeness
    /// and for a future fallible-allocation build.
    Alloc,
    /// The comparator signaled failure (panicked and was caught, or
    /// otherwise indicated it could not complete a comparison).
    ComparatorThrow,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Alloc => "node or scratch-buffer allocation failed",
            Self::ComparatorThrow => "the comparator failed",
        })
    }
}

#[cfg(feature = "std")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "std")))]
impl std::error::Error for Error {}
