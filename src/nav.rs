//! Tree navigator: first/last/next/prev, `find`, `equal_range`, `size`,
//! `height`, `destroy`. Every function here is parameterized by a
//! `(node, parent)` cursor and, where ordering matters, a [`KeyCompare`].
//!
//! `size`, `height` and `destroy` walk with an explicit `Vec`-backed
//! stack rather than native recursion: scapegoat trees rebalance only on
//! insert, so a long run of deletions with no intervening insert can
//! leave a chain-shaped subtree, and a recursive post-order walk over
//! that shape is an avoidable stack overflow.

use crate::compare::KeyCompare;
use crate::link::{decode, encode};
use crate::node::{HasKey, Node, NodePtr};
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cmp::Ordering;

pub(crate) type Cursor<T> = (NodePtr<T>, Option<NodePtr<T>>);

#[inline]
pub(crate) fn left<T>(n: NodePtr<T>, p: Option<NodePtr<T>>) -> Option<NodePtr<T>> {
    decode(unsafe { n.as_ref() }.l, p)
}

#[inline]
pub(crate) fn right<T>(n: NodePtr<T>, p: Option<NodePtr<T>>) -> Option<NodePtr<T>> {
    decode(unsafe { n.as_ref() }.r, p)
}

pub(crate) fn first<T>(mut n: NodePtr<T>, mut p: Option<NodePtr<T>>) -> Cursor<T> {
    while let Some(l) = left(n, p) {
        p = Some(n);
        n = l;
    }
    (n, p)
}

pub(crate) fn last<T>(mut n: NodePtr<T>, mut p: Option<NodePtr<T>>) -> Cursor<T> {
    while let Some(r) = right(n, p) {
        p = Some(n);
        n = r;
    }
    (n, p)
}

/// In-order successor. Climbs from `(n, p)` using the XOR trick directly
/// (no re-descent from root is needed: if `n` is `p`'s left child then
/// `p.l_ == conv(n, pp)`, so `decode(p.l_, n)` recovers `pp` in one step).
pub(crate) fn next<K, T, C>(cmp: &C, n: NodePtr<T>, p: Option<NodePtr<T>>) -> Option<Cursor<T>>
where
    T: HasKey<K>,
    C: KeyCompare<K>,
{
    if let Some(r) = right(n, p) {
        return Some(first(r, Some(n)));
    }

    let key = unsafe { n.as_ref() }.payload.key() as *const K;
    let (mut n, mut p) = (n, p);

    while let Some(pp) = p {
        let pkey = unsafe { pp.as_ref() }.payload.key();
        if cmp.compare(unsafe { &*key }, pkey) == Ordering::Less {
            return Some((pp, left(pp, n)));
        }

        let np = right(pp, n);
        n = pp;
        p = np;
    }

    None
}

/// As [`next`], but never climbs past `bound` — used while flattening a
/// subtree for rebuild, where climbing past the subtree root would walk
/// into the rest of the tree.
pub(crate) fn next_bounded<K, T, C>(
    cmp: &C,
    bound: NodePtr<T>,
    n: NodePtr<T>,
    p: Option<NodePtr<T>>,
) -> Option<Cursor<T>>
where
    T: HasKey<K>,
    C: KeyCompare<K>,
{
    if let Some(r) = right(n, p) {
        return Some(first(r, Some(n)));
    }

    let key = unsafe { n.as_ref() }.payload.key() as *const K;
    let (mut n, mut p) = (n, p);

    loop {
        let pp = match p {
            Some(pp) if n != bound => pp,
            _ => return None,
        };

        let pkey = unsafe { pp.as_ref() }.payload.key();
        if cmp.compare(unsafe { &*key }, pkey) == Ordering::Less {
            return Some((pp, left(pp, n)));
        }

        let np = right(pp, n);
        n = pp;
        p = np;
    }
}

/// In-order predecessor, symmetric to [`next`].
pub(crate) fn prev<K, T, C>(cmp: &C, n: NodePtr<T>, p: Option<NodePtr<T>>) -> Option<Cursor<T>>
where
    T: HasKey<K>,
    C: KeyCompare<K>,
{
    if let Some(l) = left(n, p) {
        return Some(last(l, Some(n)));
    }

    let key = unsafe { n.as_ref() }.payload.key() as *const K;
    let (mut n, mut p) = (n, p);

    while let Some(pp) = p {
        let pkey = unsafe { pp.as_ref() }.payload.key();
        if cmp.compare(unsafe { &*key }, pkey) == Ordering::Greater {
            return Some((pp, right(pp, n)));
        }

        let np = left(pp, n);
        n = pp;
        p = np;
    }

    None
}

/// Node count of the subtree rooted at `(n, p)` (bucket entries are not
/// counted — this is the scapegoat balance metric, not `size()`).
pub(crate) fn size<T>(n: Option<NodePtr<T>>, p: Option<NodePtr<T>>) -> usize {
    let Some(n) = n else { return 0 };

    let mut stack = Vec::new();
    stack.push((n, p));
    let mut count = 0;

    while let Some((n, p)) = stack.pop() {
        count += 1;
        if let Some(l) = left(n, p) {
            stack.push((l, Some(n)));
        }
        if let Some(r) = right(n, p) {
            stack.push((r, Some(n)));
        }
    }

    count
}

/// Height of the subtree rooted at `(n, p)`: the number of edges on the
/// longest root-to-leaf path, `0` for an empty or single-node tree.
pub(crate) fn height<T>(n: Option<NodePtr<T>>, p: Option<NodePtr<T>>) -> usize {
    let Some(n) = n else { return 0 };

    // Explicit post-order walk: push (node, parent, depth) on the way
    // down, track the running maximum on the way back up.
    let mut stack = Vec::new();
    stack.push((n, p, 0usize));
    let mut max_depth = 0;

    while let Some((n, p, depth)) = stack.pop() {
        max_depth = max_depth.max(depth);
        if let Some(l) = left(n, p) {
            stack.push((l, Some(n), depth + 1));
        }
        if let Some(r) = right(n, p) {
            stack.push((r, Some(n), depth + 1));
        }
    }

    max_depth
}

/// Frees every node in the subtree rooted at `(n, p)`, post-order, with an
/// explicit stack so a long chain cannot blow the call stack.
pub(crate) fn destroy<T>(n: Option<NodePtr<T>>) {
    let Some(n) = n else { return };

    let mut stack = Vec::new();
    stack.push((n, None));

    while let Some((n, p)) = stack.pop() {
        if let Some(l) = left(n, p) {
            stack.push((l, Some(n)));
        }
        if let Some(r) = right(n, p) {
            stack.push((r, Some(n)));
        }
        // SAFETY: every node is owned exactly once by the tree and is
        // popped exactly once here, so reclaiming it is sound.
        unsafe {
            drop(Box::from_raw(n.as_ptr()));
        }
    }
}

/// Standard BST descent comparing `key` to each node's key.
pub(crate) fn find<K, T, C>(root: Option<NodePtr<T>>, cmp: &C, key: &K) -> Option<Cursor<T>>
where
    T: HasKey<K>,
    C: KeyCompare<K>,
{
    let (mut n, mut p) = (root?, None);

    loop {
        match cmp.compare(key, unsafe { n.as_ref() }.payload.key()) {
            Ordering::Less => {
                let l = left(n, p)?;
                p = Some(n);
                n = l;
            }
            Ordering::Greater => {
                let r = right(n, p)?;
                p = Some(n);
                n = r;
            }
            Ordering::Equal => return Some((n, p)),
        }
    }
}

/// `(lower, upper)` bound cursors for `key`: the smallest entry `>= key`
/// and the smallest entry `> key`.
pub(crate) fn equal_range<K, T, C>(
    root: Option<NodePtr<T>>,
    cmp: &C,
    key: &K,
) -> (Option<Cursor<T>>, Option<Cursor<T>>)
where
    T: HasKey<K>,
    C: KeyCompare<K>,
{
    let mut n = root;
    let mut p = None;
    let mut glb: Option<Cursor<T>> = None;

    while let Some(cur) = n {
        match cmp.compare(key, unsafe { cur.as_ref() }.payload.key()) {
            Ordering::Less => {
                glb = Some((cur, p));
                let l = left(cur, p);
                p = Some(cur);
                n = l;
            }
            Ordering::Greater => {
                let r = right(cur, p);
                p = Some(cur);
                n = r;
            }
            Ordering::Equal => {
                let upper = right(cur, p).map(|r| first(r, Some(cur))).or(glb);
                return (Some((cur, p)), upper);
            }
        }
    }

    (glb, glb)
}
