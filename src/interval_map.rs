//! [`IntervalMap`]: a multi-key map keyed by interval `[lo, hi]`,
//! augmented with a per-node subtree-max-`hi` field so stabbing queries
//! can prune whole subtrees.

use crate::aug;
use crate::bucket::Bucket;
use crate::compare::{KeyCompare, OrdCompare};
use crate::erase::erase_cursor;
use crate::insert::insert;
use crate::nav::{self, Cursor};
use crate::node::{Node, NodePtr};
use crate::payload::Interval;
use core::marker::PhantomData;

/// A multi-key map from closed interval `[lo, hi]` to `V`, supporting
/// output-sensitive stabbing queries.
///
/// # Example
/// ```
/// use xsg::IntervalMap;
///
/// let mut m = IntervalMap::new();
/// m.insert([0, 10], "a");
/// m.insert([20, 30], "b");
/// m.insert([5, 15], "c");
///
/// assert!(m.any(12, 12));
/// assert!(!m.any(16, 19));
///
/// let mut hits = Vec::new();
/// m.all(0, 10, |iv, v| hits.push((*iv, *v)));
/// hits.sort();
/// assert_eq!(hits, vec![([0, 10], "a"), ([5, 15], "c")]);
/// ```
pub struct IntervalMap<K, V, C = OrdCompare> {
    root: Option<NodePtr<Interval<K, V>>>,
    cmp: C,
}

impl<K: Ord + Clone, V> Default for IntervalMap<K, V, OrdCompare> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone, V> IntervalMap<K, V, OrdCompare> {
    /// Creates an empty interval map ordered by [`Ord`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: None,
            cmp: OrdCompare,
        }
    }
}

impl<K, V, C> IntervalMap<K, V, C>
where
    K: Ord + Clone,
    C: KeyCompare<K>,
{
    /// Creates an empty interval map ordered by `cmp` instead of [`Ord`].
    #[must_use]
    pub fn with_comparator(cmp: C) -> Self {
        Self { root: None, cmp }
    }

    /// Number of `([lo, hi], value)` entries, found by summing each
    /// node's bucket length over a full traversal. No cache is kept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// `true` if the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Inserts `value` under the closed interval `iv = [lo, hi]`.
    ///
    /// `lo` is the BST ordering key (a node's representative key is its
    /// bucket's first entry's `lo`); `hi` feeds the subtree augmentation
    /// maintained by [`aug::bump_max`] on the way down and
    /// [`aug::recompute_max`] whenever a subtree is rebuilt.
    pub fn insert(&mut self, iv: [K; 2], value: V) {
        let lo = iv[0].clone();
        let hi = iv[1].clone();
        let mut entry = Some((iv, value));
        let entry: *mut Option<([K; 2], V)> = &mut entry;

        insert(
            &mut self.root,
            &self.cmp,
            &lo,
            || {
                let (iv, value) = unsafe { (*entry).take() }.expect("make_node called at most once");
                let max = iv[1].clone();
                Node::new_boxed(Interval {
                    bucket: Bucket::one((iv, value)),
                    max,
                })
            },
            |n| aug::bump_max(n, &hi),
            |n| {
                let entry = unsafe { (*entry).take() }.expect("on_equal called at most once");
                let payload = &mut unsafe { &mut *n.as_ptr() }.payload;
                payload.bucket.push(entry);
                aug::bump_max(n, &hi);
            },
            |n, l, r| aug::recompute_max(n, l, r),
        );
    }

    /// Whether any stored interval overlaps the closed query interval
    /// `[q_lo, q_hi]`.
    #[must_use]
    pub fn any(&self, q_lo: K, q_hi: K) -> bool {
        aug::any(self.root, &self.cmp, &q_lo, &q_hi)
    }

    /// Calls `sink` for every stored `([lo, hi], value)` overlapping the
    /// closed query interval `[q_lo, q_hi]`. Emission order is
    /// unspecified.
    pub fn all(&self, q_lo: K, q_hi: K, mut sink: impl FnMut(&[K; 2], &V)) {
        aug::all(self.root, &self.cmp, &q_lo, &q_hi, |_k, iv, v| sink(iv, v));
    }

    /// Removes one entry under `lo` (the first one inserted there),
    /// returning its interval and value. The subtree-max augmentation
    /// along the splice's path is recomputed via [`aug::reset_max`],
    /// anchored on `lo` itself: descending from the root by comparing
    /// against `lo` always passes through (or lands on) every node whose
    /// `max` could have changed, since the splice only ever reattaches
    /// nodes at or below the positions that such a descent visits.
    pub fn remove_one(&mut self, lo: &K) -> Option<([K; 2], V)> {
        self.remove_where(lo, |_, _| true)
    }

    /// Removes the first entry under `lo` for which `pred` returns `true`,
    /// returning its interval and value. Unlike
    /// [`remove_one`](Self::remove_one), this can target an arbitrary
    /// entry within the key's bucket, not just the first-inserted one.
    pub fn remove_where(
        &mut self,
        lo: &K,
        mut pred: impl FnMut(&[K; 2], &V) -> bool,
    ) -> Option<([K; 2], V)> {
        let (n, p) = nav::find(self.root, &self.cmp, lo)?;
        let bucket = &unsafe { n.as_ref() }.payload.bucket;
        let idx = bucket.iter().position(|(iv, v)| pred(iv, v))?;

        let bucket = &mut unsafe { &mut *n.as_ptr() }.payload.bucket;
        if bucket.len() > 1 {
            let removed = bucket.remove(idx);
            // The removed entry may have been the one that set `n.max`
            // (and every ancestor that inherited it from `n`), so this
            // has to walk the whole root-to-`n` path like the full-erase
            // branch below, not just recompute `n` in isolation.
            aug::reset_max(self.root, &self.cmp, lo);
            return Some(removed);
        }

        // The bucket's last entry: the node itself goes. `(n, p)` is
        // already the cursor `nav::find` produced, so splice it out
        // directly instead of re-descending from the root by key.
        let (boxed, _) = erase_cursor(&mut self.root, &self.cmp, n, p);
        aug::reset_max(self.root, &self.cmp, lo);
        Some(boxed.payload.bucket.remove(idx))
    }

    /// An iterator visiting every `([lo, hi], value)` entry in ascending
    /// `lo` order (and, within equal `lo`, insertion order).
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
}

impl<K, V, C> Drop for IntervalMap<K, V, C> {
    fn drop(&mut self) {
        nav::destroy(self.root);
    }
}

impl<K: PartialEq, V: PartialEq, C: KeyCompare<K>> PartialEq for IntervalMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<K: Ord + Clone, V> core::iter::FromIterator<([K; 2], V)> for IntervalMap<K, V, OrdCompare> {
    fn from_iter<I: IntoIterator<Item = ([K; 2], V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (iv, v) in iter {
            map.insert(iv, v);
        }
        map
    }
}

impl<K: Ord + Clone, V> Extend<([K; 2], V)> for IntervalMap<K, V, OrdCompare> {
    fn extend<I: IntoIterator<Item = ([K; 2], V)>>(&mut self, iter: I) {
        for (iv, v) in iter {
            self.insert(iv, v);
        }
    }
}

#[cfg(test)]
impl<K, V, C> IntervalMap<K, V, C>
where
    K: Ord + Clone,
    C: KeyCompare<K>,
{
    /// As [`crate::multimap::OrderedMultimap::check_invariants`], plus the
    /// augmentation invariant: every node's `max` equals the greatest
    /// `hi` over its bucket and both subtrees, and every stored interval
    /// is well-formed, `lo <= hi`.
    pub(crate) fn check_invariants(&self) {
        check_subtree(&self.cmp, self.root, None, None, None);
    }
}

#[cfg(test)]
fn check_subtree<K, V, C>(
    cmp: &C,
    n: Option<NodePtr<Interval<K, V>>>,
    p: Option<NodePtr<Interval<K, V>>>,
    lo: Option<&K>,
    hi: Option<&K>,
) where
    K: Ord + Clone,
    C: KeyCompare<K>,
{
    use core::cmp::Ordering;

    let Some(n) = n else { return };
    let payload = &unsafe { n.as_ref() }.payload;
    assert!(!payload.bucket.is_empty(), "bucket must never be empty");
    let key = &payload.bucket.first().0[0];
    for (iv, _) in payload.bucket.iter() {
        assert_eq!(cmp.compare(&iv[0], key), Ordering::Equal, "bucket key mismatch");
        assert!(iv[0] <= iv[1], "interval lo must be <= hi");
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

    let mut expected_max = payload.bucket.iter().map(|(iv, _)| iv[1].clone()).max().expect("bucket non-empty");
    if let Some(l) = l {
        let lm = unsafe { &l.as_ref().payload.max };
        if *lm > expected_max {
            expected_max = lm.clone();
        }
    }
    if let Some(r) = r {
        let rm = unsafe { &r.as_ref().payload.max };
        if *rm > expected_max {
            expected_max = rm.clone();
        }
    }
    assert_eq!(payload.max, expected_max, "subtree max-endpoint augmentation drifted");

    check_subtree(cmp, l, Some(n), lo, Some(key));
    check_subtree(cmp, r, Some(n), Some(key), hi);
}

/// Borrowing, double-ended iterator over an [`IntervalMap`]'s entries,
/// yielded by [`IntervalMap::iter`].
pub struct Iter<'a, K, V, C> {
    cmp: &'a C,
    front: Option<(Cursor<Interval<K, V>>, usize)>,
    back: Option<(Cursor<Interval<K, V>>, usize)>,
    exhausted: bool,
    _marker: PhantomData<&'a (K, V)>,
}

impl<'a, K, V, C> Iterator for Iter<'a, K, V, C>
where
    K: Ord + Clone,
    C: KeyCompare<K>,
{
    type Item = (&'a [K; 2], &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let ((n, p), idx) = self.front?;
        let payload = unsafe { &n.as_ref().payload };
        let (iv, v) = payload.bucket.get(idx).expect("index within bucket");

        if self.front == self.back {
            self.exhausted = true;
        } else if idx + 1 < payload.bucket.len() {
            self.front = Some(((n, p), idx + 1));
        } else {
            self.front = nav::next(self.cmp, n, p).map(|c| (c, 0));
        }

        Some((iv, v))
    }
}

impl<'a, K, V, C> DoubleEndedIterator for Iter<'a, K, V, C>
where
    K: Ord + Clone,
    C: KeyCompare<K>,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let ((n, p), idx) = self.back?;
        let payload = unsafe { &n.as_ref().payload };
        let (iv, v) = payload.bucket.get(idx).expect("index within bucket");

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

        Some((iv, v))
    }
}
