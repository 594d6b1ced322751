use std::iter::FusedIterator;
use std::ptr;

use svec_array_ptr::ArrayPtr;

/// By-value iterator over the elements of a [`SimpleVector`](crate::SimpleVector).
///
/// Owns the vector's buffer. Elements that were not yielded are dropped together with
/// the iterator.
pub struct IntoIter<T> {
    data: ArrayPtr<T>,
    /// Slots `[start, end)` still hold live elements.
    start: usize,
    end: usize,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(data: ArrayPtr<T>, size: usize) -> IntoIter<T> {
        debug_assert!(size <= data.len());
        IntoIter {
            data,
            start: 0,
            end: size,
        }
    }

    /// Returns the elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots `[start, end)` are live.
        unsafe { self.data.range(self.start, self.end) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: the slot is live and `start` moves past it.
        let item = unsafe { self.data.read(self.start) };
        self.start += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: the slot is live and `end` moved below it.
        Some(unsafe { self.data.read(self.end) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // SAFETY: slots `[start, end)` are the remaining live elements.
        unsafe { ptr::drop_in_place(self.data.range_mut(self.start, self.end)) }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}
