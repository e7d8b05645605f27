//! Interval augmentation: maintenance of the per-node subtree max-endpoint
//! `max` across insert, rebuild and erase, and the `any`/`all` stabbing
//! queries that prune on it.
//!
//! `max` comparisons use `K: Ord` directly (the endpoint type the crate
//! already requires `IntervalMap` to provide); only BST routing goes
//! through the pluggable [`KeyCompare`] — ordering among keys is
//! pluggable, but the augmentation itself needs a genuine total order on
//! endpoints to compute a maximum.

use crate::compare::KeyCompare;
use crate::nav::{left, right};
use crate::node::{HasKey, NodePtr};
use crate::payload::IntervalNode;
use alloc::vec::Vec;
use core::cmp::Ordering;

fn bucket_max<K: Ord + Clone, V>(node: &IntervalNode<K, V>) -> K {
    let mut entries = node.bucket.iter();
    // invariant: a node's bucket is never empty (see crate::bucket).
    let mut m = entries.next().expect("bucket is never empty").0[1].clone();
    for (iv, _) in entries {
        if iv[1] > m {
            m = iv[1].clone();
        }
    }
    m
}

/// Recomputes `n.max` from its bucket and the (already-correct) `max`
/// fields of its two current children: `max = max(bucket-max, left.max,
/// right.max)`.
pub(crate) fn recompute_max<K, V>(
    n: NodePtr<IntervalNode<K, V>>,
    l: Option<NodePtr<IntervalNode<K, V>>>,
    r: Option<NodePtr<IntervalNode<K, V>>>,
) where
    K: Ord + Clone,
{
    let mut m = bucket_max(unsafe { &n.as_ref().payload });
    if let Some(l) = l {
        let lm = &unsafe { l.as_ref() }.payload.max;
        if *lm > m {
            m = lm.clone();
        }
    }
    if let Some(r) = r {
        let rm = &unsafe { r.as_ref() }.payload.max;
        if *rm > m {
            m = rm.clone();
        }
    }
    unsafe {
        (*n.as_ptr()).payload.max = m;
    }
}

/// Insert-time maintenance: called for every node visited on the way down
/// to the insertion site, as an `on_descend` hook to `crate::insert::insert`.
/// `max` is monotonically non-decreasing under insert, so a one-pass bump
/// suffices — no second pass needed.
pub(crate) fn bump_max<K: Ord + Clone, V>(n: NodePtr<IntervalNode<K, V>>, hi: &K) {
    unsafe {
        if *hi > (*n.as_ptr()).payload.max {
            (*n.as_ptr()).payload.max = hi.clone();
        }
    }
}

/// Erase-time maintenance: walks from `root` down to the node whose key is
/// `anchor_key` (the promoted donor, the parent of the splice, or the
/// root — whichever the caller identifies as containing the removed
/// interval's former subtree), recomputing `max` at every node on that
/// path, bottom-up. Every other subtree is untouched.
///
/// Implemented iteratively (collect the path, then unwind) rather than
/// recursively, matching this crate's choice to keep every tree walk
/// stack-safe (see `crate::nav`'s module doc).
pub(crate) fn reset_max<K, V, C>(root: Option<NodePtr<IntervalNode<K, V>>>, cmp: &C, anchor_key: &K)
where
    K: Ord + Clone,
    C: KeyCompare<K>,
{
    let mut path = Vec::new();
    let mut cur = root;
    let mut p = None;

    while let Some(n) = cur {
        path.push((n, p));
        match cmp.compare(anchor_key, unsafe { n.as_ref() }.payload.key()) {
            Ordering::Less => {
                let l = left(n, p);
                p = Some(n);
                cur = l;
            }
            Ordering::Greater => {
                let r = right(n, p);
                p = Some(n);
                cur = r;
            }
            Ordering::Equal => break,
        }
    }

    for (n, p) in path.into_iter().rev() {
        recompute_max(n, left(n, p), right(n, p));
    }
}

/// Stabbing query: does any stored interval overlap the closed query
/// interval `q = [q_lo, q_hi]`?
///
/// Every bound here is inclusive (`<=`/`>=`): two *closed* intervals
/// `[q_lo, q_hi]` and `[lo, hi]` overlap iff `q_lo <= hi` and
/// `lo <= q_hi`, with no special case needed for a degenerate
/// (single-point) query — a point query that lands exactly on a stored
/// interval's endpoint still counts as a hit, since both intervals are
/// closed.
pub(crate) fn any<K, V, C>(
    root: Option<NodePtr<IntervalNode<K, V>>>,
    cmp: &C,
    q_lo: &K,
    q_hi: &K,
) -> bool
where
    K: Ord,
    C: KeyCompare<K>,
{
    let Some(mut n) = root else { return false };
    let mut p: Option<NodePtr<IntervalNode<K, V>>> = None;

    if *q_lo > unsafe { n.as_ref() }.payload.max {
        return false;
    }

    loop {
        let c = cmp.compare(q_hi, unsafe { n.as_ref() }.payload.key());
        let cge0 = c != Ordering::Less;

        if cge0 {
            let hit = unsafe { &n.as_ref().payload }
                .bucket
                .iter()
                .any(|(iv, _)| *q_lo <= iv[1]);
            if hit {
                return true;
            }
        }

        if let Some(l) = left(n, p) {
            if *q_lo <= unsafe { l.as_ref() }.payload.max {
                p = Some(n);
                n = l;
                continue;
            }
        }

        if cge0 {
            if let Some(r) = right(n, p) {
                if *q_lo <= unsafe { r.as_ref() }.payload.max {
                    p = Some(n);
                    n = r;
                    continue;
                }
            }
        }

        return false;
    }
}

/// Enumeration: calls `sink` for every stored interval overlapping the
/// closed query interval `q = [q_lo, q_hi]`. Visits both subtrees while
/// they remain viable, output-sensitive via the same `max` pruning as
/// [`any`]. Iterative (explicit stack) rather than recursive, for the
/// same stack-safety reason as [`reset_max`]. Shares [`any`]'s inclusive
/// bounds.
pub(crate) fn all<K, V, C>(
    root: Option<NodePtr<IntervalNode<K, V>>>,
    cmp: &C,
    q_lo: &K,
    q_hi: &K,
    mut sink: impl FnMut(&K, &[K; 2], &V),
) where
    K: Ord,
    C: KeyCompare<K>,
{
    let mut stack = Vec::new();

    if let Some(root) = root {
        if *q_lo <= unsafe { root.as_ref() }.payload.max {
            stack.push((root, None));
        }
    }

    while let Some((n, p)) = stack.pop() {
        let c = cmp.compare(q_hi, unsafe { n.as_ref() }.payload.key());
        let cge0 = c != Ordering::Less;

        if cge0 {
            for (iv, v) in unsafe { &n.as_ref().payload }.bucket.iter() {
                if *q_lo <= iv[1] {
                    sink(&iv[0], iv, v);
                }
            }
            if let Some(r) = right(n, p) {
                if *q_lo <= unsafe { r.as_ref() }.payload.max {
                    stack.push((r, Some(n)));
                }
            }
        }

        if let Some(l) = left(n, p) {
            if *q_lo <= unsafe { l.as_ref() }.payload.max {
                stack.push((l, Some(n)));
            }
        }
    }
}
