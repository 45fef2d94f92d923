//! The pluggable total order and the optional item clone/free hooks.
//!
//! `Comparator<T>` is a trait rather than a closure type so a comparator can
//! carry its own state. A plain `Fn(&T, &T) -> Ordering` closure, and any
//! `T: Ord`, both implement it for free.

use core::cmp::Ordering;

pub trait Comparator<T>: Clone {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// The default comparator: compares items through their `Ord` impl.
#[derive(Clone, Copy, Debug, Default)]
pub struct NaturalOrder;

impl<T: Ord> Comparator<T> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Wrap a closure as a comparator, for callers who don't want to name a type.
#[derive(Clone)]
pub struct FnComparator<F>(pub F);

impl<T, F> Comparator<T> for FnComparator<F>
where
    F: Fn(&T, &T) -> Ordering + Clone,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a, b)
    }
}

/// Fallible item clone, required to keep copy-on-write sound when an item
/// owns a resource that must not be aliased. Blanket-implemented for any
/// `Clone` type, since a plain `Clone::clone` can only fail by aborting on
/// allocator OOM, which we treat as infallible here and surface actual
/// CoW-path OOM at the node allocation step instead.
pub trait CloneItem: Sized {
    fn try_clone_item(&self) -> Option<Self>;
}

impl<T: Clone> CloneItem for T {
    #[inline]
    fn try_clone_item(&self) -> Option<Self> {
        Some(self.clone())
    }
}

/// Extracts the integer key a router dispatches on. A shard's items may
/// carry more than just the key (see [`crate::entry::Entry`]); this is the
/// seam a router uses to find the key portion without knowing the rest of
/// `T`.
pub trait Keyed {
    fn route_key(&self) -> i64;
}

impl Keyed for i64 {
    #[inline]
    fn route_key(&self) -> i64 {
        *self
    }
}

impl Keyed for i32 {
    #[inline]
    fn route_key(&self) -> i64 {
        *self as i64
    }
}
