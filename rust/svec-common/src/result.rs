pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// Verifies that `index` addresses one of the first `size` elements.
#[inline]
pub fn verify_index(index: usize, size: usize) -> Result<()> {
    if index < size {
        Ok(())
    } else {
        out_of_range(index, size)
    }
}

#[cold]
pub fn out_of_range(index: usize, size: usize) -> Result<()> {
    Err(crate::error::ErrorKind::OutOfRange { index, size }.into())
}
