use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::ptr::{self, NonNull};

use svec_common::{Result, error::Error};

/// An exclusively owned allocation of `len` slots of `T`.
///
/// The buffer is either empty (no allocation, `len == 0`) or owns exactly one
/// allocation obtained from the global allocator. Slots are uninitialized storage
/// until the owner writes to them, and the buffer never drops their contents.
///
/// Zero-sized element types never touch the allocator: a non-empty buffer of a
/// zero-sized `T` holds a dangling, well-aligned pointer that is never freed.
pub struct ArrayPtr<T> {
    /// Base of the allocation, `None` when the buffer is empty.
    ptr: Option<NonNull<T>>,
    /// Number of slots in the allocation.
    len: usize,
    _marker: PhantomData<T>,
}

impl<T> ArrayPtr<T> {
    /// Creates a buffer that holds no allocation.
    #[inline]
    pub const fn empty() -> ArrayPtr<T> {
        ArrayPtr {
            ptr: None,
            len: 0,
            _marker: PhantomData,
        }
    }

    /// Allocates storage for `len` slots.
    ///
    /// A zero `len` produces an empty buffer without calling the allocator.
    ///
    /// # Errors
    ///
    /// Returns an `AllocationFailure` error if the byte size of the request overflows
    /// `isize::MAX` or the allocator cannot satisfy it.
    pub fn new(len: usize) -> Result<ArrayPtr<T>> {
        if len == 0 {
            return Ok(Self::empty());
        }

        let layout = Self::layout_for(len)
            .ok_or_else(|| Error::allocation_failure(len, size_of::<T>()))?;

        if layout.size() == 0 {
            return Ok(ArrayPtr {
                ptr: Some(NonNull::dangling()),
                len,
                _marker: PhantomData,
            });
        }

        // SAFETY: `layout` has a non-zero size.
        let raw = unsafe { alloc::alloc(layout) } as *mut T;
        let ptr = NonNull::new(raw).ok_or_else(|| {
            log::debug!("allocation of {} bytes failed", layout.size());
            Error::allocation_failure(len, size_of::<T>())
        })?;

        log::trace!("allocated {len} slots ({} bytes) at {raw:p}", layout.size());
        Ok(ArrayPtr {
            ptr: Some(ptr),
            len,
            _marker: PhantomData,
        })
    }

    /// Returns the memory layout of an allocation of `len` slots, or `None` when the
    /// total size does not fit in `isize::MAX` bytes.
    #[inline]
    pub fn layout_for(len: usize) -> Option<Layout> {
        Layout::array::<T>(len).ok()
    }

    /// Returns the number of slots in the allocation.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the buffer has no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if the buffer currently owns an allocation.
    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.ptr.is_some()
    }

    /// Returns the base address of the allocation, or null if the buffer is empty.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.map_or(ptr::null(), |p| p.as_ptr() as *const T)
    }

    /// Returns the mutable base address of the allocation, or null if the buffer is
    /// empty.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.map_or(ptr::null_mut(), NonNull::as_ptr)
    }

    /// Returns a pointer to slot `index`.
    ///
    /// # Safety
    ///
    /// The buffer must be allocated and `index` must be less than `len()`.
    #[inline]
    pub unsafe fn slot(&self, index: usize) -> *mut T {
        debug_assert!(self.ptr.is_some(), "slot access on an empty buffer");
        debug_assert!(index < self.len, "slot {index} out of {}", self.len);
        match self.ptr {
            // SAFETY: `index` is within the allocation per the caller's contract.
            Some(p) => unsafe { p.as_ptr().add(index) },
            None => ptr::null_mut(),
        }
    }

    /// Returns a shared reference to the value in slot `index`.
    ///
    /// # Safety
    ///
    /// `index` must be in bounds and the slot must hold an initialized value.
    #[inline]
    pub unsafe fn get(&self, index: usize) -> &T {
        unsafe { &*self.slot(index) }
    }

    /// Returns a mutable reference to the value in slot `index`.
    ///
    /// # Safety
    ///
    /// `index` must be in bounds and the slot must hold an initialized value.
    #[inline]
    pub unsafe fn get_mut(&mut self, index: usize) -> &mut T {
        unsafe { &mut *self.slot(index) }
    }

    /// Moves `value` into slot `index` without reading or dropping the previous
    /// contents of the slot.
    ///
    /// # Safety
    ///
    /// `index` must be in bounds. Any value previously stored in the slot is
    /// overwritten without being dropped.
    #[inline]
    pub unsafe fn write(&mut self, index: usize, value: T) {
        unsafe { self.slot(index).write(value) }
    }

    /// Moves the value out of slot `index`, leaving the slot logically uninitialized.
    ///
    /// # Safety
    ///
    /// `index` must be in bounds, the slot must hold an initialized value, and the
    /// caller must not read the slot again before writing it.
    #[inline]
    pub unsafe fn read(&self, index: usize) -> T {
        unsafe { self.slot(index).read() }
    }

    /// Returns the first `count` slots as a slice.
    ///
    /// # Safety
    ///
    /// `count` must not exceed `len()` and all of the first `count` slots must hold
    /// initialized values.
    #[inline]
    pub unsafe fn as_slice(&self, count: usize) -> &[T] {
        debug_assert!(count <= self.len);
        match self.ptr {
            Some(p) => unsafe { std::slice::from_raw_parts(p.as_ptr(), count) },
            None => &[],
        }
    }

    /// Returns the first `count` slots as a mutable slice.
    ///
    /// # Safety
    ///
    /// Same requirements as [`ArrayPtr::as_slice`].
    #[inline]
    pub unsafe fn as_mut_slice(&mut self, count: usize) -> &mut [T] {
        debug_assert!(count <= self.len);
        match self.ptr {
            Some(p) => unsafe { std::slice::from_raw_parts_mut(p.as_ptr(), count) },
            None => &mut [],
        }
    }

    /// Returns slots `[start, end)` as a slice.
    ///
    /// # Safety
    ///
    /// `start <= end <= len()` and every slot in the range must hold an initialized
    /// value. Slots outside the range are not touched and may be uninitialized.
    #[inline]
    pub unsafe fn range(&self, start: usize, end: usize) -> &[T] {
        debug_assert!(start <= end && end <= self.len);
        if start == end {
            return &[];
        }
        unsafe { std::slice::from_raw_parts(self.slot(start), end - start) }
    }

    /// Returns slots `[start, end)` as a mutable slice.
    ///
    /// # Safety
    ///
    /// Same requirements as [`ArrayPtr::range`].
    #[inline]
    pub unsafe fn range_mut(&mut self, start: usize, end: usize) -> &mut [T] {
        debug_assert!(start <= end && end <= self.len);
        if start == end {
            return &mut [];
        }
        unsafe { std::slice::from_raw_parts_mut(self.slot(start), end - start) }
    }

    /// Moves `count` values starting at slot `src` of this buffer into `dst`, starting
    /// at slot `dst_at`. The source slots become logically uninitialized.
    ///
    /// # Safety
    ///
    /// Both ranges must be in bounds of their buffers, and the source slots must hold
    /// initialized values. Values already present in the destination range are
    /// overwritten without being dropped.
    #[inline]
    pub unsafe fn relocate_to(
        &self,
        src: usize,
        dst: &mut ArrayPtr<T>,
        dst_at: usize,
        count: usize,
    ) {
        if count == 0 {
            return;
        }
        debug_assert!(src + count <= self.len);
        debug_assert!(dst_at + count <= dst.len);
        // SAFETY: two distinct owners never share an allocation, so the ranges do
        // not overlap.
        unsafe { ptr::copy_nonoverlapping(self.slot(src), dst.slot(dst_at), count) }
    }

    /// Moves `count` values from slot `from` to slot `to` within this buffer. The
    /// ranges may overlap.
    ///
    /// # Safety
    ///
    /// Both ranges must be in bounds and the source slots must hold initialized
    /// values. Destination slots outside the source range are overwritten without
    /// being dropped.
    #[inline]
    pub unsafe fn shift(&mut self, from: usize, to: usize, count: usize) {
        if count == 0 {
            return;
        }
        debug_assert!(from + count <= self.len);
        debug_assert!(to + count <= self.len);
        unsafe { ptr::copy(self.slot(from), self.slot(to), count) }
    }

    /// Exchanges the allocations of two buffers. Never allocates or fails.
    #[inline]
    pub fn swap(&mut self, other: &mut ArrayPtr<T>) {
        std::mem::swap(self, other);
    }

    /// Deallocates the storage immediately and leaves the buffer empty.
    ///
    /// Calling `release` on an empty buffer does nothing. Values still stored in
    /// the slots are not dropped.
    pub fn release(&mut self) {
        let len = std::mem::replace(&mut self.len, 0);
        let Some(ptr) = self.ptr.take() else {
            return;
        };
        if let Some(layout) = Self::layout_for(len) {
            if layout.size() != 0 {
                log::trace!("releasing {len} slots at {:p}", ptr.as_ptr());
                // SAFETY: `ptr` was obtained from `alloc::alloc` with this exact layout.
                unsafe { alloc::dealloc(ptr.as_ptr() as *mut u8, layout) };
            }
        }
    }
}

impl<T> Drop for ArrayPtr<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T> Default for ArrayPtr<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> std::fmt::Debug for ArrayPtr<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayPtr")
            .field("ptr", &self.as_ptr())
            .field("len", &self.len)
            .finish()
    }
}

// SAFETY: the allocation is uniquely owned, as with `Box<[T]>`.
unsafe impl<T: Send> Send for ArrayPtr<T> {}

// SAFETY: shared access only hands out `&T` (through unsafe accessors).
unsafe impl<T: Sync> Sync for ArrayPtr<T> {}
