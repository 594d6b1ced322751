use std::alloc::Layout;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem::ManuallyDrop;
use std::ops::{Index, IndexMut};
use std::ptr;

use svec_array_ptr::ArrayPtr;
use svec_common::{Result, error::Error, result::verify_index};

use crate::into_iter::IntoIter;
use crate::reserve::ReserveProxy;

/// A growable, contiguous sequence of `T` backed by a single [`ArrayPtr`].
///
/// Slots `[0, len)` of the buffer hold live elements; slots `[len, capacity)` are
/// allocated but uninitialized. Every operation that needs more room allocates a new
/// buffer first, moves the live elements over and only then swaps it in, so a failed
/// allocation leaves the vector exactly as it was.
///
/// # Growth
///
/// - `push_back` and `insert` grow to `max(required, 2 * capacity)` (or 1 from empty).
/// - `resize` grows to `max(new_len, 2 * capacity)`.
/// - `reserve` grows to exactly the requested capacity.
pub struct SimpleVector<T> {
    data: ArrayPtr<T>,
    size: usize,
}

impl<T> SimpleVector<T> {
    /// Creates an empty vector with no allocation.
    #[inline]
    pub const fn new() -> SimpleVector<T> {
        SimpleVector {
            data: ArrayPtr::empty(),
            size: 0,
        }
    }

    /// Creates an empty vector with exactly the capacity carried by `proxy`.
    pub fn with_reserve(proxy: ReserveProxy) -> Result<SimpleVector<T>> {
        Self::with_capacity(proxy.capacity())
    }

    /// Creates an empty vector with room for exactly `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Result<SimpleVector<T>> {
        Ok(SimpleVector {
            data: ArrayPtr::new(capacity)?,
            size: 0,
        })
    }

    /// Creates a vector of `size` elements, each produced by its own call to
    /// `T::default()`.
    pub fn with_size(size: usize) -> Result<SimpleVector<T>>
    where
        T: Default,
    {
        let mut v = Self::with_capacity(size)?;
        v.fill_with(size, T::default);
        Ok(v)
    }

    /// Creates a vector of `size` clones of `value`.
    pub fn from_value(size: usize, value: &T) -> Result<SimpleVector<T>>
    where
        T: Clone,
    {
        let mut v = Self::with_capacity(size)?;
        v.fill_with(size, || value.clone());
        Ok(v)
    }

    /// Creates a vector holding clones of `items`, in order. Capacity equals
    /// `items.len()`.
    pub fn from_slice(items: &[T]) -> Result<SimpleVector<T>>
    where
        T: Clone,
    {
        let mut v = Self::with_capacity(items.len())?;
        v.extend_within_capacity(items.iter().cloned());
        Ok(v)
    }

    /// Creates a vector that takes ownership of the array items, in order. Capacity
    /// equals `N`. This is what the [`simple_vector!`](crate::simple_vector) macro
    /// expands to.
    pub fn from_array<const N: usize>(items: [T; N]) -> Result<SimpleVector<T>> {
        let mut v = Self::with_capacity(N)?;
        v.extend_within_capacity(items);
        Ok(v)
    }

    /// Deep copy with capacity equal to `self.len()`.
    pub fn try_clone(&self) -> Result<SimpleVector<T>>
    where
        T: Clone,
    {
        Self::from_slice(self.as_slice())
    }

    /// Returns the number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns the number of allocated slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the base address of the buffer, or null when nothing is allocated.
    ///
    /// The pointer is invalidated by any operation that reallocates.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots `[0, size)` are initialized.
        unsafe { self.data.as_slice(self.size) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: slots `[0, size)` are initialized.
        unsafe { self.data.as_mut_slice(self.size) }
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Returns the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if `index >= self.len()`.
    #[inline]
    pub fn at(&self, index: usize) -> Result<&T> {
        verify_index(index, self.size)?;
        // SAFETY: `index < size`.
        Ok(unsafe { self.data.get(index) })
    }

    /// Returns the element at `index` for modification.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if `index >= self.len()`.
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        verify_index(index, self.size)?;
        // SAFETY: `index < size`.
        Ok(unsafe { self.data.get_mut(index) })
    }

    /// Returns the element at `index` without a bounds check.
    ///
    /// # Safety
    ///
    /// `index` must be less than `self.len()`.
    #[inline]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.size, "index {index} out of range");
        unsafe { self.data.get(index) }
    }

    /// Returns the element at `index` for modification without a bounds check.
    ///
    /// # Safety
    ///
    /// `index` must be less than `self.len()`.
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.size, "index {index} out of range");
        unsafe { self.data.get_mut(index) }
    }

    /// Appends `value`, doubling the capacity when the vector is full.
    ///
    /// # Errors
    ///
    /// Returns `AllocationFailure` if growing fails; the vector is left unchanged and
    /// `value` is dropped.
    pub fn push_back(&mut self, value: T) -> Result<()> {
        if self.size == self.capacity() {
            let mut grown = self.allocate_for_one_more()?;
            // SAFETY: `grown` has more than `size` slots; the live elements move over
            // and the old slots are not read again.
            unsafe {
                self.data.relocate_to(0, &mut grown, 0, self.size);
                grown.write(self.size, value);
            }
            self.replace_buffer(grown);
        } else {
            // SAFETY: `size < capacity`, the slot is unoccupied.
            unsafe { self.data.write(self.size, value) };
        }
        self.size += 1;
        Ok(())
    }

    /// Inserts `value` at `index`, shifting the elements after it one slot to the
    /// right. Returns the position of the inserted element.
    ///
    /// # Errors
    ///
    /// Returns `AllocationFailure` if growing fails; the vector is left unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `index > self.len()`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<usize> {
        assert!(
            index <= self.size,
            "insert position {index} is out of bounds (size {})",
            self.size
        );

        if self.size == self.capacity() {
            let mut grown = self.allocate_for_one_more()?;
            // SAFETY: `grown` has more than `size` slots; the prefix and the suffix
            // are moved around the gap at `index`.
            unsafe {
                self.data.relocate_to(0, &mut grown, 0, index);
                grown.write(index, value);
                self.data
                    .relocate_to(index, &mut grown, index + 1, self.size - index);
            }
            self.replace_buffer(grown);
        } else {
            // SAFETY: `size < capacity`, so the tail fits one slot further right.
            unsafe {
                self.data.shift(index, index + 1, self.size - index);
                self.data.write(index, value);
            }
        }
        self.size += 1;
        Ok(index)
    }

    /// Removes and returns the last element, or `None` if the vector is empty.
    /// Capacity is unchanged.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.size == 0 {
            return None;
        }
        self.size -= 1;
        // SAFETY: the slot was live and is now past `size`, so it is not read again.
        Some(unsafe { self.data.read(self.size) })
    }

    /// Drops the element at `index` and shifts the following ones left. Returns
    /// `index`, which now refers to the element that followed the erased one, or
    /// equals `self.len()` if the erased element was the last one.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn erase(&mut self, index: usize) -> usize {
        drop(self.remove(index));
        index
    }

    /// Removes the element at `index` and returns it, shifting the following ones
    /// left.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn remove(&mut self, index: usize) -> T {
        assert!(
            index < self.size,
            "erase position {index} is out of bounds (size {})",
            self.size
        );
        // SAFETY: `index < size`; the hole left by the read is filled by the shift.
        unsafe {
            let value = self.data.read(index);
            self.data.shift(index + 1, index, self.size - index - 1);
            self.size -= 1;
            value
        }
    }

    /// Ensures the capacity is at least `new_capacity`, allocating exactly that much
    /// when growing. Does nothing if the capacity is already sufficient.
    ///
    /// # Errors
    ///
    /// Returns `AllocationFailure` if the allocation fails; the vector is left
    /// unchanged.
    pub fn reserve(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity <= self.capacity() {
            return Ok(());
        }
        self.reallocate(new_capacity)
    }

    /// Resizes the vector to `new_size` elements, filling new slots with
    /// `T::default()`.
    pub fn resize(&mut self, new_size: usize) -> Result<()>
    where
        T: Default,
    {
        self.resize_with(new_size, T::default)
    }

    /// Resizes the vector to `new_size` elements, filling new slots with clones of
    /// `value`.
    pub fn resize_with_value(&mut self, new_size: usize, value: &T) -> Result<()>
    where
        T: Clone,
    {
        self.resize_with(new_size, || value.clone())
    }

    /// Resizes the vector to `new_size` elements, filling new slots with the values
    /// returned by `f`.
    ///
    /// Shrinking drops the trailing elements and keeps the capacity. Growing past
    /// the capacity reallocates to `max(new_size, 2 * capacity)`.
    ///
    /// # Errors
    ///
    /// Returns `AllocationFailure` if the reallocation fails; the vector is left
    /// unchanged.
    pub fn resize_with<F>(&mut self, new_size: usize, f: F) -> Result<()>
    where
        F: FnMut() -> T,
    {
        if new_size <= self.size {
            self.truncate(new_size);
            return Ok(());
        }
        if new_size > self.capacity() {
            let doubled = self.doubled_capacity()?;
            self.reallocate(new_size.max(doubled))?;
        }
        self.fill_with(new_size, f);
        Ok(())
    }

    /// Drops the elements past `new_size`. Does nothing if `new_size >= self.len()`.
    pub fn truncate(&mut self, new_size: usize) {
        if new_size >= self.size {
            return;
        }
        let old_size = std::mem::replace(&mut self.size, new_size);
        // SAFETY: slots `[new_size, old_size)` were live and are now past `size`.
        unsafe { ptr::drop_in_place(self.data.range_mut(new_size, old_size)) }
    }

    /// Drops all elements. The allocation is kept.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Exchanges the contents of two vectors without allocating.
    pub fn swap(&mut self, other: &mut SimpleVector<T>) {
        self.data.swap(&mut other.data);
        std::mem::swap(&mut self.size, &mut other.size);
    }

    /// Moves the contents out, leaving `self` empty with no allocation.
    pub fn take(&mut self) -> SimpleVector<T> {
        std::mem::take(self)
    }

    /// Replaces the contents of `self` with a deep copy of `rhs`.
    ///
    /// The copy is built aside and swapped in, so on allocation failure `self` is
    /// unchanged. Assigning from an empty vector also releases the allocation.
    pub fn assign(&mut self, rhs: &SimpleVector<T>) -> Result<()>
    where
        T: Clone,
    {
        if rhs.is_empty() {
            self.clear();
            self.data.release();
            return Ok(());
        }
        let mut temp = rhs.try_clone()?;
        self.swap(&mut temp);
        Ok(())
    }

    /// Replaces the contents of `self` with those of `rhs`, leaving `rhs` empty with
    /// no allocation.
    pub fn assign_move(&mut self, rhs: &mut SimpleVector<T>) {
        *self = rhs.take();
    }
}

impl<T> SimpleVector<T> {
    /// Capacity doubling step used by the growth paths. From an empty vector
    /// `push_back`/`insert` grow to a single slot instead.
    fn doubled_capacity(&self) -> Result<usize> {
        self.capacity()
            .checked_mul(2)
            .ok_or_else(|| Error::allocation_failure(usize::MAX, size_of::<T>()))
    }

    /// Allocates the buffer that `push_back` and `insert` migrate into when the
    /// vector is full.
    fn allocate_for_one_more(&self) -> Result<ArrayPtr<T>> {
        let required = self
            .size
            .checked_add(1)
            .ok_or_else(|| Error::allocation_failure(usize::MAX, size_of::<T>()))?;
        let new_capacity = match self.capacity() {
            0 => 1,
            _ => self.doubled_capacity()?,
        };
        ArrayPtr::new(required.max(new_capacity))
    }

    /// Moves the live elements into a fresh buffer of `new_capacity` slots.
    fn reallocate(&mut self, new_capacity: usize) -> Result<()> {
        debug_assert!(new_capacity >= self.size);
        let mut grown = ArrayPtr::new(new_capacity)?;
        // SAFETY: `grown` holds at least `size` slots; the old slots are abandoned.
        unsafe { self.data.relocate_to(0, &mut grown, 0, self.size) };
        self.replace_buffer(grown);
        Ok(())
    }

    /// Swaps in a buffer that already holds the live elements. The previous buffer
    /// is released without dropping anything.
    fn replace_buffer(&mut self, mut buffer: ArrayPtr<T>) {
        log::debug!(
            "reallocated {} elements: capacity {} -> {}",
            self.size,
            self.data.len(),
            buffer.len()
        );
        self.data.swap(&mut buffer);
    }

    /// Constructs elements with `f` up to `new_size`. The size is bumped after each
    /// write, so a panicking `f` leaves every constructed element owned.
    fn fill_with<F>(&mut self, new_size: usize, mut f: F)
    where
        F: FnMut() -> T,
    {
        debug_assert!(new_size <= self.capacity());
        while self.size < new_size {
            let value = f();
            // SAFETY: `size < new_size <= capacity` and the slot is unoccupied.
            unsafe { self.data.write(self.size, value) };
            self.size += 1;
        }
    }

    /// Appends the items of `iter` without growing. The caller reserves room first.
    fn extend_within_capacity<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for item in iter {
            assert!(self.size < self.capacity());
            // SAFETY: `size < capacity` and the slot is unoccupied.
            unsafe { self.data.write(self.size, item) };
            self.size += 1;
        }
    }
}

/// Reports an allocation failure on a path that cannot return an error.
#[cold]
fn allocation_failed<T>(slots: usize) -> ! {
    let layout = ArrayPtr::<T>::layout_for(slots).unwrap_or(Layout::new::<T>());
    std::alloc::handle_alloc_error(layout)
}

impl<T> Drop for SimpleVector<T> {
    fn drop(&mut self) {
        // SAFETY: slots `[0, size)` are live and dropped exactly once here; the
        // buffer itself is released by its own `Drop`.
        unsafe { ptr::drop_in_place(self.as_mut_slice()) }
    }
}

impl<T> Default for SimpleVector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for SimpleVector<T> {
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(v) => v,
            Err(_) => allocation_failed::<T>(self.size),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        if self.assign(source).is_err() {
            allocation_failed::<T>(source.size)
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SimpleVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleVector")
            .field("values", &self.as_slice())
            .field("size", &self.size)
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl<T> Index<usize> for SimpleVector<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        assert!(
            index < self.size,
            "index {index} is out of range for size {}",
            self.size
        );
        // SAFETY: `index < size`.
        unsafe { self.data.get(index) }
    }
}

impl<T> IndexMut<usize> for SimpleVector<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        assert!(
            index < self.size,
            "index {index} is out of range for size {}",
            self.size
        );
        // SAFETY: `index < size`.
        unsafe { self.data.get_mut(index) }
    }
}

impl<T: PartialEq> PartialEq for SimpleVector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for SimpleVector<T> {}

impl<T: PartialOrd> PartialOrd for SimpleVector<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord> Ord for SimpleVector<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash> Hash for SimpleVector<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}

impl<T> AsRef<[T]> for SimpleVector<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for SimpleVector<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> Extend<T> for SimpleVector<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            if self.push_back(item).is_err() {
                allocation_failed::<T>(self.size.saturating_add(1))
            }
        }
    }
}

impl<T> FromIterator<T> for SimpleVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut v = SimpleVector::new();
        v.extend(iter);
        v
    }
}

impl<T, const N: usize> TryFrom<[T; N]> for SimpleVector<T> {
    type Error = Error;

    fn try_from(items: [T; N]) -> Result<Self> {
        Self::from_array(items)
    }
}

impl<T> TryFrom<ReserveProxy> for SimpleVector<T> {
    type Error = Error;

    fn try_from(proxy: ReserveProxy) -> Result<Self> {
        Self::with_reserve(proxy)
    }
}

impl<'a, T> IntoIterator for &'a SimpleVector<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut SimpleVector<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> IntoIterator for SimpleVector<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        let mut this = ManuallyDrop::new(self);
        let size = this.size;
        IntoIter::new(std::mem::take(&mut this.data), size)
    }
}
