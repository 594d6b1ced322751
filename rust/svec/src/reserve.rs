/// A capacity request consumed by [`SimpleVector::with_reserve`](crate::SimpleVector::with_reserve).
///
/// Carries a single slot count; it exists so that "reserve `n` slots" and "create `n`
/// elements" read differently at the call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReserveProxy {
    capacity: usize,
}

impl ReserveProxy {
    pub const fn new(capacity: usize) -> ReserveProxy {
        ReserveProxy { capacity }
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Requests a vector with room for `capacity` elements and no live elements.
///
/// ```
/// use svec::{SimpleVector, reserve};
///
/// let v = SimpleVector::<i32>::with_reserve(reserve(5)).unwrap();
/// assert_eq!(v.capacity(), 5);
/// assert!(v.is_empty());
/// ```
pub const fn reserve(capacity: usize) -> ReserveProxy {
    ReserveProxy::new(capacity)
}
