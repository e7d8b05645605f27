//! Erase splice: removes a node from the tree while preserving the
//! XOR-link invariant, touching only the nodes whose parent actually
//! changes.
//!
//! No rebalance happens here — only enough relinking to keep every
//! remaining node's `l`/`r` fields consistent with the BST-order
//! invariant. A scapegoat tree rebalances on insert only.

use crate::compare::KeyCompare;
use crate::insert::Slot;
use crate::link::encode;
use crate::nav::{first, last, left, next, right, size, Cursor};
use crate::node::{HasKey, Node, NodePtr};
use alloc::boxed::Box;
use core::cmp::Ordering;

/// Descends from `root` comparing `key`, remembering the slot that refers
/// to the matching node. Returns the freed node's payload box and the
/// post-erase in-order successor cursor, or `None` if `key` was absent.
pub(crate) fn erase_key<K, T, C>(
    root: &mut Option<NodePtr<T>>,
    cmp: &C,
    key: &K,
) -> Option<(Box<Node<T>>, Option<Cursor<T>>)>
where
    T: HasKey<K>,
    C: KeyCompare<K>,
{
    let mut p = None;
    let mut n = (*root)?;
    let mut slot = Slot::Root;

    loop {
        match cmp.compare(key, unsafe { n.as_ref() }.payload.key()) {
            Ordering::Less => {
                let l = left(n, p)?;
                slot = Slot::Left(n, p);
                p = Some(n);
                n = l;
            }
            Ordering::Greater => {
                let r = right(n, p)?;
                slot = Slot::Right(n, p);
                p = Some(n);
                n = r;
            }
            Ordering::Equal => break,
        }
    }

    Some(erase_core(root, cmp, p, n, slot))
}

/// Erases the node at cursor `(n, p)` directly. `pp` (the parent of `p`,
/// needed to rewrite `p`'s own link field) is recovered from the XOR
/// fields themselves rather than threaded through by the caller: since
/// `n` is known to be one of `p`'s two children, decoding `p`'s link on
/// that side against `n` yields `p`'s parent — the same trick `next`/`prev`
/// use, applied one level up.
pub(crate) fn erase_cursor<K, T, C>(
    root: &mut Option<NodePtr<T>>,
    cmp: &C,
    n: NodePtr<T>,
    p: Option<NodePtr<T>>,
) -> (Box<Node<T>>, Option<Cursor<T>>)
where
    T: HasKey<K>,
    C: KeyCompare<K>,
{
    let slot = match p {
        None => Slot::Root,
        Some(owner) => {
            let nkey = unsafe { n.as_ref() }.payload.key();
            let pkey = unsafe { owner.as_ref() }.payload.key();
            if cmp.compare(nkey, pkey) == Ordering::Less {
                Slot::Left(owner, left(owner, Some(n)))
            } else {
                Slot::Right(owner, right(owner, Some(n)))
            }
        }
    };

    erase_core(root, cmp, p, n, slot)
}

/// The shared splice core. `slot` describes where the replacement
/// (successor, predecessor, sole child, or nothing) gets written —
/// `Slot::Root`, or `Slot::Left(p, pp)` / `Slot::Right(p, pp)` depending
/// on which side of `p` the node `n` occupies.
fn erase_core<K, T, C>(
    root: &mut Option<NodePtr<T>>,
    cmp: &C,
    p: Option<NodePtr<T>>,
    n: NodePtr<T>,
    slot: Slot<T>,
) -> (Box<Node<T>>, Option<Cursor<T>>)
where
    T: HasKey<K>,
    C: KeyCompare<K>,
{
    let mut next_cursor = next(cmp, n, p);

    let l = left(n, p);
    let r = right(n, p);

    match (l, r) {
        (Some(l), Some(r)) => {
            if size(Some(l), Some(n)) < size(Some(r), Some(n)) {
                erase_with_successor(&mut next_cursor, root, p, n, l, r, slot);
            } else {
                erase_with_predecessor(&mut next_cursor, root, p, n, l, r, slot);
            }
        }
        _ => {
            let lr = l.or(r);
            if let Some(lr) = lr {
                if next_cursor.map(|(nn, _)| nn) == Some(lr) {
                    next_cursor = Some((lr, p));
                }
                let np = encode(Some(n), p);
                unsafe {
                    (*lr.as_ptr()).l ^= np;
                    (*lr.as_ptr()).r ^= np;
                }
            }
            slot.write(root, lr);
        }
    }

    // SAFETY: `n` is removed from every link field above before this
    // point, so no live cursor can reach it again; it is owned exactly
    // once by the tree and is being retired exactly once here.
    let boxed = unsafe { Box::from_raw(n.as_ptr()) };
    (boxed, next_cursor)
}

/// Donor is the in-order successor, `first(r, n)`. The successor is
/// always the node `next(n, p)` precomputed before the splice, so its
/// post-splice cursor always becomes `(successor, p)`.
#[allow(clippy::too_many_arguments)]
fn erase_with_successor<T>(
    next_cursor: &mut Option<Cursor<T>>,
    root: &mut Option<NodePtr<T>>,
    p: Option<NodePtr<T>>,
    n: NodePtr<T>,
    l: NodePtr<T>,
    r: NodePtr<T>,
    slot: Slot<T>,
) {
    let (fnn, fnp) = first(r, Some(n));
    *next_cursor = Some((fnn, p));

    slot.write(root, Some(fnn));

    unsafe {
        (*fnn.as_ptr()).l = encode(Some(l), p);
    }
    {
        let nfnn = encode(Some(n), Some(fnn));
        unsafe {
            (*l.as_ptr()).l ^= nfnn;
            (*l.as_ptr()).r ^= nfnn;
        }
    }

    if r == fnn {
        unsafe {
            (*r.as_ptr()).r ^= encode(Some(n), p);
        }
    } else {
        // Detach fnn (the leftmost node of r's subtree) from its parent
        // fnp, promoting fnn's right child (it has no left child) into
        // fnp's left slot.
        {
            let fnpp = left(fnp, Some(fnn));
            let rn = right(fnn, Some(fnp));
            unsafe {
                (*fnp.as_ptr()).l = encode(rn, fnpp);
            }
            if let Some(rn) = rn {
                let fnnfnp = encode(Some(fnn), Some(fnp));
                unsafe {
                    (*rn.as_ptr()).l ^= fnnfnp;
                    (*rn.as_ptr()).r ^= fnnfnp;
                }
            }
        }

        unsafe {
            (*fnn.as_ptr()).r = encode(Some(r), p);
        }
        let nfnn = encode(Some(n), Some(fnn));
        unsafe {
            (*r.as_ptr()).l ^= nfnn;
            (*r.as_ptr()).r ^= nfnn;
        }
    }
}

/// Donor is the in-order predecessor, `last(l, n)`. Symmetric to
/// [`erase_with_successor`]; here the successor of `n` (the already
/// precomputed `next_cursor`) is unaffected unless it is `r` itself,
/// whose parent moves from `n` to the promoted predecessor.
#[allow(clippy::too_many_arguments)]
fn erase_with_predecessor<T>(
    next_cursor: &mut Option<Cursor<T>>,
    root: &mut Option<NodePtr<T>>,
    p: Option<NodePtr<T>>,
    n: NodePtr<T>,
    l: NodePtr<T>,
    r: NodePtr<T>,
    slot: Slot<T>,
) {
    let (lnn, lnp) = last(l, Some(n));

    if next_cursor.map(|(nn, _)| nn) == Some(r) {
        *next_cursor = Some((r, lnn));
    }

    slot.write(root, Some(lnn));

    unsafe {
        (*lnn.as_ptr()).r = encode(Some(r), p);
    }
    {
        let nlnn = encode(Some(n), Some(lnn));
        unsafe {
            (*r.as_ptr()).l ^= nlnn;
            (*r.as_ptr()).r ^= nlnn;
        }
    }

    if l == lnn {
        unsafe {
            (*l.as_ptr()).l ^= encode(Some(n), p);
        }
    } else {
        {
            let lnpp = right(lnp, Some(lnn));
            let ln = left(lnn, Some(lnp));
            unsafe {
                (*lnp.as_ptr()).r = encode(ln, lnpp);
            }
            if let Some(ln) = ln {
                let lnnlnp = encode(Some(lnn), Some(lnp));
                unsafe {
                    (*ln.as_ptr()).l ^= lnnlnp;
                    (*ln.as_ptr()).r ^= lnnlnp;
                }
            }
        }

        unsafe {
            (*lnn.as_ptr()).l = encode(Some(l), p);
        }
        let nlnn = encode(Some(n), Some(lnn));
        unsafe {
            (*l.as_ptr()).l ^= nlnn;
            (*l.as_ptr()).r ^= nlnn;
        }
    }
}
