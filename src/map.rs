//! [`OrderedMap`]: one value per key, kept in sorted order, backed by the
//! XOR-linked scapegoat tree in [`crate::insert`]/[`crate::erase`]/
//! [`crate::nav`].

use crate::compare::{KeyCompare, OrdCompare};
use crate::erase::erase_key;
use crate::insert::insert;
use crate::nav::{self, Cursor};
use crate::node::{Node, NodePtr};
use crate::payload::Unique;
use core::marker::PhantomData;

/// An ordered map from `K` to `V`, rejecting duplicate keys like
/// [`std::collections::BTreeMap`] but backed by an XOR-linked scapegoat
/// tree instead of a B-tree.
///
/// # Example
/// ```
/// use xsg::OrderedMap;
///
/// let mut m = OrderedMap::new();
/// m.insert(3, "three");
/// m.insert(1, "one");
/// m.insert(2, "two");
///
/// assert_eq!(m.get(&2), Some(&"two"));
/// assert_eq!(m.iter().map(|(k, _)| *k).collect::<Vec<_>>(), vec![1, 2, 3]);
/// ```
pub struct OrderedMap<K, V, C = OrdCompare> {
    root: Option<NodePtr<Unique<K, V>>>,
    cmp: C,
}

impl<K: Ord, V> Default for OrderedMap<K, V, OrdCompare> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> OrderedMap<K, V, OrdCompare> {
    /// Creates an empty map ordered by [`Ord`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: None,
            cmp: OrdCompare,
        }
    }
}

impl<K, V, C: KeyCompare<K>> OrderedMap<K, V, C> {
    /// Creates an empty map ordered by `cmp` instead of [`Ord`].
    #[must_use]
    pub fn with_comparator(cmp: C) -> Self {
        Self { root: None, cmp }
    }

    /// Number of entries, computed by walking the tree. A unique-key
    /// map's node count already equals its entry count, so no separate
    /// cached count is kept.
    #[must_use]
    pub fn len(&self) -> usize {
        nav::size(self.root, None)
    }

    /// `true` if the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        nav::find(self.root, &self.cmp, key).is_some()
    }

    /// Borrows the value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        let (n, _) = nav::find(self.root, &self.cmp, key)?;
        Some(&unsafe { n.as_ref() }.payload.value)
    }

    /// Mutably borrows the value for `key`, if present.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let (n, _) = nav::find(self.root, &self.cmp, key)?;
        Some(&mut unsafe { &mut *n.as_ptr() }.payload.value)
    }

    /// Inserts `key` -> `value`. If `key` was already present, its value
    /// is replaced and the old one is returned, matching
    /// [`std::collections::BTreeMap::insert`].
    pub fn insert(&mut self, key: K, value: V) -> Option<V>
    where
        K: Clone,
    {
        let cmp_key = key.clone();
        // `make_node` and `on_equal` are mutually exclusive (the former
        // runs only for a new key, the latter only for an existing one),
        // so they share `value` through a raw pointer rather than two
        // conflicting closure captures of the same `Option<V>`.
        let mut value = Some(value);
        let value: *mut Option<V> = &mut value;
        let mut old = None;

        insert(
            &mut self.root,
            &self.cmp,
            &cmp_key,
            || {
                let value = unsafe { (*value).take() }.expect("make_node called at most once");
                Node::new_boxed(Unique { key, value })
            },
            |_| {},
            |n| {
                let value = unsafe { (*value).take() }.expect("on_equal called at most once");
                old = Some(core::mem::replace(
                    &mut unsafe { &mut *n.as_ptr() }.payload.value,
                    value,
                ));
            },
            |_, _, _| {},
        );
        old
    }

    /// Removes `key`, returning its value if present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let (boxed, _) = erase_key(&mut self.root, &self.cmp, key)?;
        Some(boxed.payload.value)
    }

    /// Borrows the entry with the smallest key `>= key`, or the smallest
    /// key `> key` if `inclusive` is `false`.
    fn bound(&self, key: &K, inclusive: bool) -> Option<(&K, &V)> {
        let (lower, upper) = nav::equal_range(self.root, &self.cmp, key);
        let cursor = if inclusive { lower.or(upper) } else { upper };
        let (n, _) = cursor?;
        let payload = &unsafe { n.as_ref() }.payload;
        Some((&payload.key, &payload.value))
    }

    /// Smallest entry with key `>= key`.
    #[must_use]
    pub fn lower_bound(&self, key: &K) -> Option<(&K, &V)> {
        self.bound(key, true)
    }

    /// Smallest entry with key `> key`.
    #[must_use]
    pub fn upper_bound(&self, key: &K) -> Option<(&K, &V)> {
        self.bound(key, false)
    }

    /// An iterator visiting every entry in ascending key order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V, C> {
        let remaining = self.len();
        Iter {
            cmp: &self.cmp,
            front: self.root.map(|r| nav::first(r, None)),
            back: self.root.map(|r| nav::last(r, None)),
            remaining,
            _marker: PhantomData,
        }
    }
}

impl<K, V, C> Drop for OrderedMap<K, V, C> {
    fn drop(&mut self) {
        nav::destroy(self.root);
    }
}

impl<K: PartialEq, V: PartialEq, C: KeyCompare<K>> PartialEq for OrderedMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<K: Ord + Clone, V> core::iter::FromIterator<(K, V)> for OrderedMap<K, V, OrdCompare> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<K: Ord + Clone, V> Extend<(K, V)> for OrderedMap<K, V, OrdCompare> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

#[cfg(test)]
impl<K, V, C: KeyCompare<K>> OrderedMap<K, V, C> {
    /// Walks the whole tree verifying, at every node: BST order, α-weight
    /// balance, and that `next`/`prev` are mutual inverses around that
    /// node. Panics on the first violation found.
    pub(crate) fn check_invariants(&self) {
        check_subtree(&self.cmp, self.root, None, None, None);
        let mut cur = self.root.map(|r| nav::first(r, None));
        while let Some((n, p)) = cur {
            let nxt = nav::next(&self.cmp, n, p);
            if let Some((nn, np)) = nxt {
                assert_eq!(nav::prev(&self.cmp, nn, np), Some((n, p)));
            }
            cur = nxt;
        }
    }

    /// Number of edges on the longest root-to-leaf path — used by tests to
    /// check against the scapegoat height bound.
    pub(crate) fn height(&self) -> usize {
        nav::height(self.root, None)
    }
}

#[cfg(test)]
fn check_subtree<K, V, C: KeyCompare<K>>(
    cmp: &C,
    n: Option<NodePtr<Unique<K, V>>>,
    p: Option<NodePtr<Unique<K, V>>>,
    lo: Option<&K>,
    hi: Option<&K>,
) {
    use core::cmp::Ordering;

    let Some(n) = n else { return };
    let key = &unsafe { n.as_ref() }.payload.key;
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

impl<'a, K, V, C> IntoIterator for &'a OrderedMap<K, V, C>
where
    C: KeyCompare<K>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing, double-ended iterator over an [`OrderedMap`]'s entries in
/// ascending key order, yielded by [`OrderedMap::iter`].
pub struct Iter<'a, K, V, C> {
    cmp: &'a C,
    front: Option<Cursor<Unique<K, V>>>,
    back: Option<Cursor<Unique<K, V>>>,
    remaining: usize,
    _marker: PhantomData<&'a (K, V)>,
}

impl<'a, K, V, C> Iterator for Iter<'a, K, V, C>
where
    C: KeyCompare<K>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let (n, p) = self.front?;
        self.remaining -= 1;
        self.front = nav::next(self.cmp, n, p);
        let payload = unsafe { &n.as_ref().payload };
        Some((&payload.key, &payload.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V, C> DoubleEndedIterator for Iter<'a, K, V, C>
where
    C: KeyCompare<K>,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let (n, p) = self.back?;
        self.remaining -= 1;
        self.back = nav::prev(self.cmp, n, p);
        let payload = unsafe { &n.as_ref().payload };
        Some((&payload.key, &payload.value))
    }
}

impl<'a, K, V, C> ExactSizeIterator for Iter<'a, K, V, C> where C: KeyCompare<K> {}
