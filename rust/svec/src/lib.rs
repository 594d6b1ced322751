//! A growable, contiguous sequence container with explicit capacity management.
//!
//! [`SimpleVector<T>`] wraps one [`ArrayPtr<T>`](svec_array_ptr::ArrayPtr) allocation and
//! tracks how many of its slots hold live elements. Every allocating operation returns a
//! [`Result`], so running out of memory surfaces as an `AllocationFailure` error instead
//! of aborting, and the vector is left untouched when that happens.
//!
//! ```
//! use svec::{SimpleVector, reserve, simple_vector};
//!
//! let mut v = simple_vector![1, 2, 3].unwrap();
//! v.push_back(4).unwrap();
//! v.insert(0, 0).unwrap();
//! assert_eq!(v.as_slice(), &[0, 1, 2, 3, 4]);
//!
//! let r = SimpleVector::<String>::with_reserve(reserve(16)).unwrap();
//! assert_eq!((r.len(), r.capacity()), (0, 16));
//!
//! assert!(v.at(5).is_err());
//! ```

mod into_iter;
mod reserve;
mod vector;

pub use into_iter::IntoIter;
pub use reserve::{ReserveProxy, reserve};
pub use svec_common::{
    Result,
    error::{Error, ErrorKind},
};
pub use vector::SimpleVector;

/// Creates a [`SimpleVector`] from a list of elements, with capacity equal to the
/// number of elements.
///
/// Evaluates to `Result<SimpleVector<T>>`, since the allocation can fail.
///
/// ```
/// let v = svec::simple_vector![10, 20, 30].unwrap();
/// assert_eq!(v.len(), 3);
/// assert_eq!(v.capacity(), 3);
/// ```
#[macro_export]
macro_rules! simple_vector {
    () => {
        $crate::SimpleVector::from_array([])
    };
    ($($x:expr),+ $(,)?) => {
        $crate::SimpleVector::from_array([$($x),+])
    };
}

#[cfg(test)]
mod tests;
