//! Scapegoat insert and rebuild: descend comparing keys, allocate a leaf
//! (or report the existing node) at the insertion site, then rebuild the
//! topmost ancestor whose subtree violates the α-weight bound on the way
//! back up.
//!
//! Insert is an explicit recursive function taking mutable out-parameters
//! by reference rather than a closure capturing mutable state. The node
//! that discovers it is out of balance rebuilds itself immediately and
//! writes the new subtree root into its own parent slot — no pointer
//! needs to bubble back up through the call stack, and no cursor-patching
//! is needed on the way out: a fresh entry's parent is recomputed with one
//! more `O(log n)` descent after insertion completes (see
//! `crate::nav::find`), which is simpler to get right than tracking
//! whether rebuild moved the entry's parent and costs the same
//! asymptotically.

use crate::compare::KeyCompare;
use crate::link::encode;
use crate::nav::{first, left, next_bounded, right, size};
use crate::node::{HasKey, Node, NodePtr};
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::ptr::NonNull;

/// Where a node's pointer is recorded in its parent, so a rebuilt subtree
/// can be re-attached without bubbling its new root back up the stack.
///
/// `Left`/`Right` carry both the owning node (whose `l`/`r` field is being
/// rewritten) and that owner's own parent — the owner's link field encodes
/// its child XOR the *owner's* parent (invariant 1), not XOR the owner
/// itself, so both are needed to write a correct replacement value.
pub(crate) enum Slot<T> {
    Root,
    Left(NodePtr<T>, Option<NodePtr<T>>),
    Right(NodePtr<T>, Option<NodePtr<T>>),
}

impl<T> Slot<T> {
    #[inline]
    pub(crate) fn write(&self, root: &mut Option<NodePtr<T>>, child: Option<NodePtr<T>>) {
        match *self {
            Slot::Root => *root = child,
            Slot::Left(owner, owner_parent) => unsafe {
                (*owner.as_ptr()).l = encode(child, owner_parent);
            },
            Slot::Right(owner, owner_parent) => unsafe {
                (*owner.as_ptr()).r = encode(child, owner_parent);
            },
        }
    }
}

enum Step {
    /// A rebuild already happened at or below this frame; balance checks
    /// above it are unnecessary (the scapegoat argument guarantees no
    /// ancestor above the rebuilt subtree can still be imbalanced).
    Handled,
    /// No rebuild yet; carries this subtree's node count.
    Size(usize),
}

/// Inserts `key` (creating it via `make_node` if absent) into the subtree
/// rooted at `root`. Returns the node (new or pre-existing) and whether it
/// was newly created.
///
/// - `on_descend` is invoked for every node visited on the way down,
///   before the branch decision — interval maps use it to bump `max`;
///   unique/multimap pass a no-op.
/// - `on_equal` is invoked once, on the node matching `key`, when the key
///   was already present — multimap/interval-map append to its bucket.
/// - `on_rebuild_node` is invoked bottom-up for every node touched by a
///   rebuild, after its children are relinked — interval maps recompute
///   `M` here; unique/multimap pass a no-op.
#[allow(clippy::too_many_arguments)]
pub(crate) fn insert<K, T, C, F, D, E, R>(
    root: &mut Option<NodePtr<T>>,
    cmp: &C,
    key: &K,
    make_node: F,
    mut on_descend: D,
    mut on_equal: E,
    mut on_rebuild_node: R,
) -> (NodePtr<T>, bool)
where
    T: HasKey<K>,
    C: KeyCompare<K>,
    F: FnOnce() -> Box<Node<T>>,
    D: FnMut(NodePtr<T>),
    E: FnMut(NodePtr<T>),
    R: FnMut(NodePtr<T>, Option<NodePtr<T>>, Option<NodePtr<T>>),
{
    let mut make_node = Some(make_node);
    let mut target = None;
    let mut created = false;

    if let Some(r) = *root {
        insert_rec(
            root,
            r,
            None,
            Slot::Root,
            cmp,
            key,
            &mut make_node,
            &mut on_descend,
            &mut on_equal,
            &mut on_rebuild_node,
            &mut target,
            &mut created,
        );
    } else {
        let q = leak(make_node.take().expect("make_node called once")());
        *root = Some(q);
        target = Some(q);
        created = true;
    }

    (target.expect("insert always resolves to a node"), created)
}

#[inline]
fn leak<T>(boxed: Box<Node<T>>) -> NodePtr<T> {
    NonNull::from(Box::leak(boxed))
}

#[allow(clippy::too_many_arguments)]
fn insert_rec<K, T, C, F, D, E, R>(
    root: &mut Option<NodePtr<T>>,
    n: NodePtr<T>,
    p: Option<NodePtr<T>>,
    slot: Slot<T>,
    cmp: &C,
    key: &K,
    make_node: &mut Option<F>,
    on_descend: &mut D,
    on_equal: &mut E,
    on_rebuild_node: &mut R,
    target: &mut Option<NodePtr<T>>,
    created: &mut bool,
) -> Step
where
    T: HasKey<K>,
    C: KeyCompare<K>,
    F: FnOnce() -> Box<Node<T>>,
    D: FnMut(NodePtr<T>),
    E: FnMut(NodePtr<T>),
    R: FnMut(NodePtr<T>, Option<NodePtr<T>>, Option<NodePtr<T>>),
{
    on_descend(n);

    let ord = cmp.compare(key, unsafe { n.as_ref() }.payload.key());

    let (sl, sr) = match ord {
        Ordering::Less => {
            let sl = if let Some(l) = left(n, p) {
                match insert_rec(
                    root,
                    l,
                    Some(n),
                    Slot::Left(n, p),
                    cmp,
                    key,
                    make_node,
                    on_descend,
                    on_equal,
                    on_rebuild_node,
                    target,
                    created,
                ) {
                    Step::Handled => return Step::Handled,
                    Step::Size(s) => s,
                }
            } else {
                let q = leak(make_node.take().expect("make_node called once")());
                unsafe {
                    (*q.as_ptr()).l = encode(None, Some(n));
                    (*q.as_ptr()).r = encode(None, Some(n));
                    (*n.as_ptr()).l = encode(Some(q), p);
                }
                *target = Some(q);
                *created = true;
                1
            };
            (sl, size(right(n, p), Some(n)))
        }
        Ordering::Greater => {
            let sr = if let Some(r) = right(n, p) {
                match insert_rec(
                    root,
                    r,
                    Some(n),
                    Slot::Right(n, p),
                    cmp,
                    key,
                    make_node,
                    on_descend,
                    on_equal,
                    on_rebuild_node,
                    target,
                    created,
                ) {
                    Step::Handled => return Step::Handled,
                    Step::Size(s) => s,
                }
            } else {
                let q = leak(make_node.take().expect("make_node called once")());
                unsafe {
                    (*q.as_ptr()).l = encode(None, Some(n));
                    (*q.as_ptr()).r = encode(None, Some(n));
                    (*n.as_ptr()).r = encode(Some(q), p);
                }
                *target = Some(q);
                *created = true;
                1
            };
            (size(left(n, p), Some(n)), sr)
        }
        Ordering::Equal => {
            *target = Some(n);
            *created = false;
            on_equal(n);
            return Step::Handled;
        }
    };

    let s = 1 + sl + sr;
    if 3 * sl > 2 * s || 3 * sr > 2 * s {
        let new_root = rebuild(cmp, n, p, on_rebuild_node);
        slot.write(root, new_root);
        Step::Handled
    } else {
        Step::Size(s)
    }
}

/// Flattens the subtree rooted at `(n, p)` in-order and reconstructs it as
/// a perfectly balanced BST, picking the middle element of each range as
/// that range's root. `on_node` is invoked bottom-up for every node once
/// its children are relinked, so callers can recompute per-node
/// augmentation.
#[allow(clippy::too_many_arguments)]
pub(crate) fn rebuild<K, T, C, R>(
    cmp: &C,
    n: NodePtr<T>,
    p: Option<NodePtr<T>>,
    on_node: &mut R,
) -> NodePtr<T>
where
    T: HasKey<K>,
    C: KeyCompare<K>,
    R: FnMut(NodePtr<T>, Option<NodePtr<T>>, Option<NodePtr<T>>),
{
    let mut flat: Vec<NodePtr<T>> = Vec::new();
    let mut cur = first(n, p);
    loop {
        flat.push(cur.0);
        match next_bounded(cmp, n, cur.0, cur.1) {
            Some(next_cur) => cur = next_cur,
            None => break,
        }
    }

    build_balanced(&flat, 0, flat.len() - 1, p, on_node)
}

fn build_balanced<T, R>(
    flat: &[NodePtr<T>],
    a: usize,
    b: usize,
    parent: Option<NodePtr<T>>,
    on_node: &mut R,
) -> NodePtr<T>
where
    R: FnMut(NodePtr<T>, Option<NodePtr<T>>, Option<NodePtr<T>>),
{
    let i = a + (b - a) / 2;
    let n = flat[i];

    match b - a {
        0 => {
            unsafe {
                (*n.as_ptr()).l = encode(None, parent);
                (*n.as_ptr()).r = encode(None, parent);
            }
            on_node(n, None, None);
        }
        1 => {
            let nb = flat[b];
            unsafe {
                (*nb.as_ptr()).l = encode(None, Some(n));
                (*nb.as_ptr()).r = encode(None, Some(n));
                (*n.as_ptr()).l = encode(None, parent);
                (*n.as_ptr()).r = encode(Some(nb), parent);
            }
            on_node(nb, None, None);
            on_node(n, None, Some(nb));
        }
        _ => {
            let l = build_balanced(flat, a, i - 1, Some(n), on_node);
            let r = build_balanced(flat, i + 1, b, Some(n), on_node);
            unsafe {
                (*n.as_ptr()).l = encode(Some(l), parent);
                (*n.as_ptr()).r = encode(Some(r), parent);
            }
            on_node(n, Some(l), Some(r));
        }
    }

    n
}
