use core::fmt;

/// An error with allocating the array's buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The requested capacity exceeds `isize::MAX` bytes, or computing it overflowed.
    CapacityOverflow,
    /// The global allocator could not satisfy a request of this many bytes.
    OutOfMemory { bytes: usize },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow => write!(f, "capacity overflow"),
            Self::OutOfMemory { bytes } => {
                write!(f, "memory allocation of {bytes} bytes failed")
            }
        }
    }
}

impl std::error::Error for AllocError {}

/// Errors returned by [`DynamicArray`](crate::DynamicArray) operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// A checked access named a position outside `[0, len)`.
    OutOfRange {
        /// The requested position. Wide enough to hold any signed or unsigned index.
        index: i128,
        /// The array's length at the time of the access.
        len: usize,
    },
    /// An element was removed from an empty array.
    EmptyContainer,
    /// The buffer could not be (re)allocated. The array is unchanged.
    Alloc(AllocError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Self::EmptyContainer => write!(f, "container is empty"),
            Self::Alloc(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Alloc(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AllocError> for Error {
    fn from(err: AllocError) -> Self {
        Self::Alloc(err)
    }
}
