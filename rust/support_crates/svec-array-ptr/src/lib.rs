//! Single-owner handle over one contiguous heap allocation.
//!
//! `ArrayPtr<T>` owns raw storage for a fixed number of `T` slots. It allocates on
//! construction, deallocates exactly once on drop (or on an explicit [`ArrayPtr::release`]),
//! and moves like any other Rust value. It is not `Clone`.
//!
//! The buffer never constructs or drops elements: slots are plain storage, and keeping
//! track of which slots hold live values is the job of the owner (see `svec::SimpleVector`).

mod array_ptr;

pub use array_ptr::ArrayPtr;
