//! [`OrderedMultimap`]: many values per key, kept in insertion order
//! within a key and in sorted key order across keys. Every node owns a
//! [`crate::bucket::Bucket`] of entries sharing its key.

use crate::bucket::Bucket;
use crate::compare::{KeyCompare, OrdCompare};
use crate::erase::erase_cursor;
use crate::insert::insert;
use crate::nav::{self, Cursor};
use crate::node::Node;
use crate::payload::Bucketed;
use core::marker::PhantomData;

/// An ordered map permitting duplicate keys, each key's values kept in
/// insertion order.
///
/// # Example
/// ```
/// use xsg::OrderedMultimap;
///
/// let mut m = OrderedMultimap::new();
/// m.insert(1, "a");
/// m.insert(1, "b");
/// m.insert(0, "z");
///
/// assert_eq!(m.count(&1), 2);
/// assert_eq!(
///     m.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(),
///     vec![(0, "z"), (1, "a"), (1, "b")],
/// );
/// ```
pub struct OrderedMultimap<K, V, C = OrdCompare> {
    root: Option<crate::node::NodePtr<Bucketed<K, V>>>,
    cmp: C,
}

impl<K: Ord, V> Default for OrderedMultimap<K, V, OrdCompare> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> OrderedMultimap<K, V, OrdCompare> {
    /// Creates an empty multimap ordered by [`Ord`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: None,
            cmp: OrdCompare,
        }
    }
}

impl<K, V, C: KeyCompare<K>> OrderedMultimap<K, V, C> {
    /// Creates an empty multimap ordered by `cmp` instead of [`Ord`].
    #[must_use]
    pub fn with_comparator(cmp: C) -> Self {
        Self { root: None, cmp }
    }

    /// Number of `(key, value)` entries across every key, found by summing
    /// each node's bucket length over a full traversal. No cache is kept,
    /// unlike the node count used for scapegoat balance.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// `true` if the multimap holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// `true` if `key` has at least one value.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        nav::find(self.root, &self.cmp, key).is_some()
    }

    /// Number of values stored under `key`.
    #[must_use]
    pub fn count(&self, key: &K) -> usize {
        nav::find(self.root, &self.cmp, key).map_or(0, |(n, _)| unsafe { n.as_ref() }.payload.bucket.len())
    }

    /// Appends `value` under `key`, creating the key's bucket if this is
    /// its first value. Insert always succeeds: duplicate keys are
    /// exactly what a multimap is for.
    pub fn insert(&mut self, key: K, value: V)
    where
        K: Clone,
    {
        let cmp_key = key.clone();
        let mut entry = Some((key, value));
        let entry: *mut Option<(K, V)> = &mut entry;

        insert(
            &mut self.root,
            &self.cmp,
            &cmp_key,
            || {
                let (key, value) = unsafe { (*entry).take() }.expect("make_node called at most once");
                Node::new_boxed(Bucketed {
                    bucket: Bucket::one((key, value)),
                })
            },
            |_| {},
            |n| {
                let entry = unsafe { (*entry).take() }.expect("on_equal called at most once");
                unsafe { &mut *n.as_ptr() }.payload.bucket.push(entry);
            },
            |_, _, _| {},
        );
    }

    /// An iterator visiting every `(key, value)` entry; within equal keys,
    /// values come out in insertion order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V, C> {
        Iter {
            cmp: &self.cmp,
            front: self.root.map(|r| (nav::first(r, None), 0)),
            back: self.root.map(|r| {
                let cur = nav::last(r, None);
                let idx = unsafe { cur.0.as_ref() }.payload.bucket.len() - 1;
                (cur, idx)
            }),
            exhausted: self.root.is_none(),
            _marker: PhantomData,
        }
    }

    /// Removes one value under `key` (the first one inserted), returning
    /// it. The node itself is only removed from the tree once its bucket
    /// becomes empty.
    pub fn remove_one(&mut self, key: &K) -> Option<V> {
        self.remove_where(key, |_| true)
    }

    /// Removes the first value under `key` for which `pred` returns
    /// `true`, returning it. Unlike [`remove_one`](Self::remove_one), this
    /// can target an arbitrary entry within the key's bucket, not just the
    /// first-inserted one — the bucket-entry-level counterpart of an
    /// erase-by-cursor on the underlying tree.
    pub fn remove_where(&mut self, key: &K, mut pred: impl FnMut(&V) -> bool) -> Option<V> {
        let (n, p) = nav::find(self.root, &self.cmp, key)?;
        let bucket = &unsafe { n.as_ref() }.payload.bucket;
        let idx = bucket.iter().position(|(_, v)| pred(v))?;

        let bucket = &mut unsafe { &mut *n.as_ptr() }.payload.bucket;
        if bucket.len() > 1 {
            return Some(bucket.remove(idx).1);
        }
        // The bucket's last entry: the node itself goes. `(n, p)` is
        // already the cursor `nav::find` produced, so splice it out
        // directly instead of re-descending from the root by key.
        let (boxed, _) = erase_cursor(&mut self.root, &self.cmp, n, p);
        Some(boxed.payload.bucket.remove(idx).1)
    }
}

impl<K, V, C> Drop for OrderedMultimap<K, V, C> {
    fn drop(&mut self) {
        nav::destroy(self.root);
    }
}

impl<K: PartialEq, V: PartialEq, C: KeyCompare<K>> PartialEq for OrderedMultimap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<K: Ord + Clone, V> core::iter::FromIterator<(K, V)> for OrderedMultimap<K, V, OrdCompare> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<K: Ord + Clone, V> Extend<(K, V)> for OrderedMultimap<K, V, OrdCompare> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

#[cfg(test)]
impl<K, V, C: KeyCompare<K>> OrderedMultimap<K, V, C> {
    /// As [`crate::map::OrderedMap::check_invariants`], plus: every
    /// node's bucket is non-empty and every bucket entry compares equal
    /// to the node's representative key.
    pub(crate) fn check_invariants(&self) {
        check_subtree(&self.cmp, self.root, None, None, None);
    }
}

#[cfg(test)]
fn check_subtree<K, V, C: KeyCompare<K>>(
    cmp: &C,
    n: Option<crate::node::NodePtr<Bucketed<K, V>>>,
    p: Option<crate::node::NodePtr<Bucketed<K, V>>>,
    lo: Option<&K>,
    hi: Option<&K>,
) {
    use core::cmp::Ordering;

    let Some(n) = n else { return };
    let payload = &unsafe { n.as_ref() }.payload;
    assert!(!payload.bucket.is_empty(), "bucket must never be empty");
    let key = &payload.bucket.first().0;
    for (k, _) in payload.bucket.iter() {
        assert_eq!(cmp.compare(k, key), Ordering::Equal, "bucket key mismatch");
    }
    if let Some(lo) = lo {
        assert_eq!(cmp.compare(lo, key), Ordering::Less, "BST order violated");
    }
    if let Some(hi) = hi {
        assert_eq!(cmp.compare(key, hi), Ordering::Less, "BST order violated");
    }

    let l = nav::left(n, p);
    let r = nav::right(n, p);
    let sl = nav::size(l, Some(n));
    let sr = nav::size(r, Some(n));
    let s = 1 + sl + sr;
    assert!(3 * sl <= 2 * s, "left subtree exceeds 2/3 bound");
    assert!(3 * sr <= 2 * s, "right subtree exceeds 2/3 bound");

    check_subtree(cmp, l, Some(n), lo, Some(key));
    check_subtree(cmp, r, Some(n), Some(key), hi);
}

/// Borrowing, double-ended iterator over an [`OrderedMultimap`]'s
/// entries, yielded by [`OrderedMultimap::iter`].
pub struct Iter<'a, K, V, C> {
    cmp: &'a C,
    front: Option<(Cursor<Bucketed<K, V>>, usize)>,
    back: Option<(Cursor<Bucketed<K, V>>, usize)>,
    exhausted: bool,
    _marker: PhantomData<&'a (K, V)>,
}

impl<'a, K, V, C> Iterator for Iter<'a, K, V, C>
where
    C: KeyCompare<K>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let ((n, p), idx) = self.front?;
        let payload = unsafe { &n.as_ref().payload };
        let (k, v) = payload.bucket.get(idx).expect("index within bucket");

        if self.front == self.back {
            self.exhausted = true;
        } else if idx + 1 < payload.bucket.len() {
            self.front = Some(((n, p), idx + 1));
        } else {
            self.front = nav::next(self.cmp, n, p).map(|c| (c, 0));
        }

        Some((k, v))
    }
}

impl<'a, K, V, C> DoubleEndedIterator for Iter<'a, K, V, C>
where
    C: KeyCompare<K>,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let ((n, p), idx) = self.back?;
        let payload = unsafe { &n.as_ref().payload };
        let (k, v) = payload.bucket.get(idx).expect("index within bucket");

        if self.front == self.back {
            self.exhausted = true;
        } else if idx > 0 {
            self.back = Some(((n, p), idx - 1));
        } else {
            self.back = nav::prev(self.cmp, n, p).map(|c| {
                let len = unsafe { c.0.as_ref() }.payload.bucket.len();
                (c, len - 1)
            });
        }

        Some((k, v))
    }
}
