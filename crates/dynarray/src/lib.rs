//! A growable contiguous array, [`DynamicArray<T>`], with explicit capacity control.
//!
//! ```
//! use dynarray::{dynarray, Error};
//!
//! let mut array = dynarray![1, 2, 3, 4, 5];
//! assert_eq!((array.len(), array.capacity()), (5, 5));
//!
//! array.reserve(10);
//! assert_eq!((array.len(), array.capacity()), (5, 10));
//!
//! array.resize(11);
//! assert_eq!(array.len(), 11);
//! assert_eq!(array[..5], [1, 2, 3, 4, 5]);
//!
//! assert_eq!(array.at(11), Err(Error::OutOfRange { index: 11, len: 11 }));
//! ```
//!
//! # Memory
//!
//! An array owns a single heap allocation of `capacity` slots, or none at all when the
//! capacity is zero. The first `len` slots hold live elements. Pushing onto a full array
//! grows the capacity by 1.5x (configurable through [`Growth`]); [`DynamicArray::reserve`]
//! and [`DynamicArray::resize`] grow it to an exact size. Nothing shrinks the capacity
//! except moving the buffer out with [`DynamicArray::take`].
//!
//! Reallocations are logged at `trace` level through [`log`]; failed allocations at `error`.
//!
//! # Access
//!
//! Plain indexing (`array[i]`) panics past the end. [`DynamicArray::at`] returns
//! [`Error::OutOfRange`] instead, and `get_unchecked` (through the slice) skips the check.

mod error;
mod growth;
pub mod iter;
mod position;
mod raw;
mod vec;

pub use error::{AllocError, Error};
pub use growth::Growth;
pub use iter::{Cursor, CursorMut, IntoIter, Iter, IterMut};
pub use position::Position;
pub use vec::DynamicArray;
