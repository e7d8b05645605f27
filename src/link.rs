//! The XOR link codec — the single audited primitive that turns a raw
//! pointer-sized integer into a child link relative to whichever neighbor
//! (parent or child) happens to be known at the call site.
//!
//! Every other module reaches children and parents exclusively through
//! [`encode`]/[`decode`]; nothing outside this file performs a pointer ->
//! integer conversion.

use crate::node::{Node, NodePtr};
use core::ptr::NonNull;

#[inline]
pub(crate) fn addr<T>(p: Option<NodePtr<T>>) -> usize {
    p.map_or(0, |p| p.as_ptr() as usize)
}

#[inline]
pub(crate) fn from_addr<T>(a: usize) -> Option<NodePtr<T>> {
    NonNull::new(a as *mut Node<T>)
}

/// `encode(a, b) = ptr(a) XOR ptr(b)`, symmetric in its operands.
#[inline]
pub(crate) fn encode<T>(a: Option<NodePtr<T>>, b: Option<NodePtr<T>>) -> usize {
    addr(a) ^ addr(b)
}

/// Recovers the neighbor not already known: given a link field and one of
/// the two pointers it was built from, returns the other one.
#[inline]
pub(crate) fn decode<T>(link: usize, known: Option<NodePtr<T>>) -> Option<NodePtr<T>> {
    from_addr(link ^ addr(known))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use alloc::boxed::Box;

    fn leak(n: u32) -> NodePtr<u32> {
        NonNull::from(Box::leak(Box::new(Node {
            l: 0,
            r: 0,
            payload: n,
        })))
    }

    unsafe fn free(p: NodePtr<u32>) {
        drop(Box::from_raw(p.as_ptr()));
    }

    /// Decoding a link against whichever of its two operands is known must
    /// recover the other one exactly, for every combination of null/
    /// non-null operands.
    #[test]
    fn decode_recovers_the_unknown_operand() {
        let a = leak(1);
        let b = leak(2);

        assert_eq!(decode(encode(Some(a), Some(b)), Some(a)), Some(b));
        assert_eq!(decode(encode(Some(a), Some(b)), Some(b)), Some(a));
        assert_eq!(decode(encode(Some(a), None), Some(a)), None);
        assert_eq!(decode(encode(Some(a), None), None), Some(a));
        assert_eq!(decode(encode(None::<NodePtr<u32>>, None), None), None);

        unsafe {
            free(a);
            free(b);
        }
    }

    #[test]
    fn encode_is_symmetric() {
        let a = leak(1);
        let b = leak(2);
        assert_eq!(encode(Some(a), Some(b)), encode(Some(b), Some(a)));
        unsafe {
            free(a);
            free(b);
        }
    }

    /// A leaf's `l`/`r` both equal `encode(None, parent)`, so toggling a
    /// link field twice with the same XOR mask is a no-op — the property
    /// the erase splice and rebuild re-parenting rely on.
    #[test]
    fn xor_toggle_is_its_own_inverse() {
        let a = leak(1);
        let b = leak(2);
        let mut link = encode(None::<NodePtr<u32>>, Some(a));
        let mask = encode(Some(a), Some(b));
        link ^= mask;
        link ^= mask;
        assert_eq!(decode(link, Some(a)), None);
        unsafe {
            free(a);
            free(b);
        }
    }
}
