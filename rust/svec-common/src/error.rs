use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    /// The allocator could not provide `slots` elements of `elem_size` bytes each,
    /// or the total byte size does not fit the address space.
    pub fn allocation_failure(slots: usize, elem_size: usize) -> Error {
        Error(ErrorKind::AllocationFailure { slots, elem_size }.into())
    }

    pub fn out_of_range(index: usize, size: usize) -> Error {
        Error(ErrorKind::OutOfRange { index, size }.into())
    }

    #[inline]
    pub fn is_allocation_failure(&self) -> bool {
        matches!(self.kind(), ErrorKind::AllocationFailure { .. })
    }

    #[inline]
    pub fn is_out_of_range(&self) -> bool {
        matches!(self.kind(), ErrorKind::OutOfRange { .. })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("failed to allocate {slots} slots of {elem_size} bytes")]
    AllocationFailure { slots: usize, elem_size: usize },

    #[error("index {index} is out of range for size {size}")]
    OutOfRange { index: usize, size: usize },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}
