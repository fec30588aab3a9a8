//! The owned, contiguous storage behind a [`DynamicArray`](crate::DynamicArray).
//!
//! [`RawBuf`] knows how many slots it has but not which of them are initialized.
//! Tracking the live prefix is the array's job.

use core::{
    alloc::Layout,
    mem::{self, MaybeUninit},
    ops::Range,
    ptr::{self, NonNull},
};
use std::alloc;

use bytesize::ByteSize;
use log::error;

use crate::error::AllocError;

/// A heap allocation of `capacity` possibly-uninitialized `T` slots.
///
/// A capacity of zero never holds an allocation. Dropping a `RawBuf` releases the
/// memory but never drops any `T`.
pub(crate) struct RawBuf<T> {
    slots: Option<Box<[MaybeUninit<T>]>>,
}

impl<T> RawBuf<T> {
    /// Constructs a `RawBuf` with no allocation.
    pub const fn new() -> Self {
        Self { slots: None }
    }

    /// Allocates exactly `capacity` uninitialized slots.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the size in bytes overflows `isize::MAX` or if the global allocator
    /// returns null. Nothing is allocated in either case.
    pub fn allocate(capacity: usize) -> Result<Self, AllocError> {
        if capacity == 0 {
            return Ok(Self::new());
        }

        let layout = Layout::array::<T>(capacity).map_err(|_| AllocError::CapacityOverflow)?;
        if layout.size() == 0 {
            // zero-sized T: any capacity fits behind a dangling pointer
            // SAFETY: a dangling, aligned pointer is a valid slice of zero-sized values,
            // and `Box` never deallocates a zero-sized layout.
            let slots = unsafe {
                Box::from_raw(ptr::slice_from_raw_parts_mut(
                    NonNull::<MaybeUninit<T>>::dangling().as_ptr(),
                    capacity,
                ))
            };
            return Ok(Self { slots: Some(slots) });
        }

        // SAFETY: layout has a non-zero size
        let ptr = unsafe { alloc::alloc(layout) };
        if ptr.is_null() {
            error!(
                "failed to allocate {} for {} slots",
                ByteSize::b(layout.size() as u64).to_string_as(true),
                capacity
            );
            return Err(AllocError::OutOfMemory {
                bytes: layout.size(),
            });
        }

        // SAFETY: the global allocator returned this pointer for the layout of
        // `[MaybeUninit<T>; capacity]`, which is what `Box` will free it with.
        let slots = unsafe {
            Box::from_raw(ptr::slice_from_raw_parts_mut(
                ptr.cast::<MaybeUninit<T>>(),
                capacity,
            ))
        };
        Ok(Self { slots: Some(slots) })
    }

    /// Returns the number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.as_ref().map_or(0, |slots| slots.len())
    }

    /// Returns `true` if the buffer holds an allocation (or slots of a zero-sized type).
    #[cfg(test)]
    pub fn is_allocated(&self) -> bool {
        self.slots.is_some()
    }

    /// Returns the size of the buffer in bytes.
    pub fn size_in_bytes(&self) -> usize {
        self.capacity() * mem::size_of::<T>()
    }

    /// Returns a pointer to the first slot, dangling if there is no allocation.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        match &self.slots {
            Some(slots) => slots.as_ptr().cast(),
            None => NonNull::dangling().as_ptr() as *const T,
        }
    }

    /// Returns a mutable pointer to the first slot, dangling if there is no allocation.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        match &mut self.slots {
            Some(slots) => slots.as_mut_ptr().cast(),
            None => NonNull::dangling().as_ptr(),
        }
    }

    /// Exchanges the allocations of two buffers.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.slots, &mut other.slots);
    }

    /// Detaches the allocation, leaving `self` with none.
    pub fn take(&mut self) -> Self {
        Self {
            slots: self.slots.take(),
        }
    }
}

// views
impl<T> RawBuf<T> {
    /// ## Safety
    /// - Slots `[0, len)` must be initialized.
    #[inline]
    pub unsafe fn as_slice(&self, len: usize) -> &[T] {
        debug_assert!(len <= self.capacity());
        core::slice::from_raw_parts(self.as_ptr(), len)
    }

    /// ## Safety
    /// - Slots `[0, len)` must be initialized.
    #[inline]
    pub unsafe fn as_mut_slice(&mut self, len: usize) -> &mut [T] {
        debug_assert!(len <= self.capacity());
        core::slice::from_raw_parts_mut(self.as_mut_ptr(), len)
    }
}

// read
impl<T> RawBuf<T> {
    /// Moves the value out of slot `index`, leaving the slot logically uninitialized.
    ///
    /// ## Safety
    /// - `index < capacity` and the slot must be initialized.
    /// - The slot must not be read or dropped again until it is rewritten.
    #[inline]
    pub unsafe fn read(&self, index: usize) -> T {
        debug_assert!(index < self.capacity());
        self.as_ptr().add(index).read()
    }
}

// write
impl<T> RawBuf<T> {
    /// Writes `value` into slot `index` without dropping the slot's previous contents.
    ///
    /// ## Safety
    /// - `index < capacity`.
    #[inline]
    pub unsafe fn write(&mut self, index: usize, value: T) {
        debug_assert!(index < self.capacity());
        self.as_mut_ptr().add(index).write(value);
    }

    /// Moves the first `len` slots of `self` into the first `len` slots of `dst`.
    ///
    /// Afterwards those slots of `self` are logically uninitialized.
    ///
    /// ## Safety
    /// - Slots `[0, len)` of `self` must be initialized.
    /// - `len <= dst.capacity()`, and the overwritten slots of `dst` must not hold live values.
    pub unsafe fn move_prefix_into(&mut self, dst: &mut Self, len: usize) {
        debug_assert!(len <= self.capacity() && len <= dst.capacity());
        dst.as_mut_ptr().copy_from_nonoverlapping(self.as_ptr(), len);
    }
}

// drop
impl<T> RawBuf<T> {
    /// Drops the values in `range`, leaving those slots logically uninitialized.
    ///
    /// ## Safety
    /// - Every slot in `range` must be initialized and `range.end <= capacity`.
    pub unsafe fn drop_in_place(&mut self, range: Range<usize>) {
        debug_assert!(range.start <= range.end && range.end <= self.capacity());
        let start = self.as_mut_ptr().add(range.start);
        ptr::drop_in_place(ptr::slice_from_raw_parts_mut(start, range.end - range.start));
    }
}

impl<T> Default for RawBuf<T> {
    fn default() -> Self {
        Self::new()
    }
}
