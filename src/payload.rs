//! Per-flavor node payloads: the three shapes a `Node<T>` can carry, one
//! per container. Each implements [`HasKey`] so the shared navigator and
//! insert/erase machinery can stay generic over `T`.

use crate::bucket::Bucket;
use crate::node::HasKey;

/// [`crate::map::OrderedMap`]'s payload: one key, one value, no bucket —
/// a second insert of the same key replaces the value in place rather
/// than growing anything.
pub(crate) struct Unique<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

impl<K, V> HasKey<K> for Unique<K, V> {
    #[inline]
    fn key(&self) -> &K {
        &self.key
    }
}

/// [`crate::multimap::OrderedMultimap`]'s payload: every node is a bucket
/// of `(key, value)` pairs that compare equal under the tree's
/// comparator, in insertion order. Never empty — the node itself is
/// erased once its last entry is.
pub(crate) struct Bucketed<K, V> {
    pub(crate) bucket: Bucket<(K, V)>,
}

impl<K, V> HasKey<K> for Bucketed<K, V> {
    #[inline]
    fn key(&self) -> &K {
        &self.bucket.first().0
    }
}

/// [`crate::interval_map::IntervalMap`]'s payload: a bucket of
/// `([lo, hi], value)` entries sharing the same `lo`, plus the
/// subtree-max-`hi` augmentation `max`.
pub(crate) struct Interval<K, V> {
    pub(crate) bucket: Bucket<([K; 2], V)>,
    pub(crate) max: K,
}

impl<K, V> HasKey<K> for Interval<K, V> {
    #[inline]
    fn key(&self) -> &K {
        &self.bucket.first().0[0]
    }
}

pub(crate) type IntervalNode<K, V> = Interval<K, V>;
