use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    mem,
    ops::{Deref, DerefMut, Index, IndexMut},
    slice::SliceIndex,
};
use std::alloc::{handle_alloc_error, Layout};

use bytesize::ByteSize;
use log::trace;

use crate::{
    error::{AllocError, Error},
    growth::Growth,
    position::Position,
    raw::RawBuf,
};

/// A contiguous growable array type with explicit capacity control.
///
/// Elements `[0, len)` are live. Slots `[len, capacity)` are allocated but hold nothing.
/// An array with zero capacity owns no allocation.
///
/// When a push finds the buffer full, the capacity grows by the array's [`Growth`]
/// factor (1.5x unless configured otherwise). Growth and [`reserve`](Self::reserve) share
/// one reallocation routine, which moves the live elements into a new buffer and
/// releases the old one.
///
/// Operations that may allocate come in two forms. The `try_` form returns
/// [`Error::Alloc`] and leaves the array as it was. The plain form panics on capacity
/// overflow and calls [`handle_alloc_error`] when memory runs out, like `Vec`.
pub struct DynamicArray<T> {
    pub(crate) buf: RawBuf<T>,
    pub(crate) len: usize,
    growth: Growth,
}

impl<T> DynamicArray<T> {
    /// Constructs a new, empty `DynamicArray` with no allocation.
    pub const fn new() -> Self {
        Self::with_growth(Growth::DEFAULT)
    }

    /// Constructs a new, empty `DynamicArray` that grows by the given factor.
    pub const fn with_growth(growth: Growth) -> Self {
        Self {
            buf: RawBuf::new(),
            len: 0,
            growth,
        }
    }

    /// Constructs an empty `DynamicArray` with exactly `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        unwrap_alloc::<T, _>(Self::allocate(capacity))
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self, Error> {
        Ok(Self::allocate(capacity)?)
    }

    fn allocate(capacity: usize) -> Result<Self, AllocError> {
        Ok(Self {
            buf: RawBuf::allocate(capacity)?,
            len: 0,
            growth: Growth::DEFAULT,
        })
    }

    /// Constructs a `DynamicArray` holding `len` default values. Length and capacity are both `len`.
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        let mut array = Self::with_capacity(len);
        array.fill_to(len, T::default);
        array
    }

    pub fn try_with_len(len: usize) -> Result<Self, Error>
    where
        T: Default,
    {
        let mut array = Self::try_with_capacity(len)?;
        array.fill_to(len, T::default);
        Ok(array)
    }

    /// Constructs a `DynamicArray` holding `len` clones of `value`. Length and capacity are both `len`.
    pub fn from_elem(value: T, len: usize) -> Self
    where
        T: Clone,
    {
        let mut array = Self::with_capacity(len);
        array.fill_with_clones(value, len);
        array
    }

    pub fn try_from_elem(value: T, len: usize) -> Result<Self, Error>
    where
        T: Clone,
    {
        let mut array = Self::try_with_capacity(len)?;
        array.fill_with_clones(value, len);
        Ok(array)
    }

    /// Constructs a `DynamicArray` holding clones of `items`, in order. Length and capacity
    /// are both `items.len()`.
    pub fn from_slice(items: &[T]) -> Self
    where
        T: Clone,
    {
        let mut array = Self::with_capacity(items.len());
        array.clone_from_slice_in_place(items);
        array
    }

    pub fn try_from_slice(items: &[T]) -> Result<Self, Error>
    where
        T: Clone,
    {
        let mut array = Self::try_with_capacity(items.len())?;
        array.clone_from_slice_in_place(items);
        Ok(array)
    }

    /// Returns a copy with its own buffer of the same capacity.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the new buffer cannot be allocated.
    pub fn try_clone(&self) -> Result<Self, Error>
    where
        T: Clone,
    {
        Ok(self.clone_in_place()?)
    }

    fn clone_in_place(&self) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        let mut copy = Self::allocate(self.capacity())?;
        copy.growth = self.growth;
        copy.clone_from_slice_in_place(self.as_slice());
        Ok(copy)
    }

    /// Moves the contents out into a new `DynamicArray`, leaving `self` empty with no allocation.
    ///
    /// `self` stays usable afterwards and keeps its growth factor.
    pub fn take(&mut self) -> Self {
        Self {
            buf: self.buf.take(),
            len: mem::replace(&mut self.len, 0),
            growth: self.growth,
        }
    }

    /// Exchanges the contents of two arrays without moving any element.
    pub fn swap_with(&mut self, other: &mut Self) {
        self.buf.swap(&mut other.buf);
        mem::swap(&mut self.len, &mut other.len);
        mem::swap(&mut self.growth, &mut other.growth);
    }

    /// Returns the number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of allocated slots, live or not.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn growth(&self) -> Growth {
        self.growth
    }

    pub fn set_growth(&mut self, growth: Growth) {
        self.growth = growth;
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: [0, len) is initialized
        unsafe { self.buf.as_slice(self.len) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: [0, len) is initialized
        unsafe { self.buf.as_mut_slice(self.len) }
    }

    /// Returns a pointer to the buffer. Dangling when the array has no allocation.
    ///
    /// The pointer is invalidated by any call that reallocates.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_mut_ptr()
    }

    /// Returns the element at `index`.
    ///
    /// Accepts any primitive integer. Negative positions are out of range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `index` is not in `[0, len)`.
    pub fn at<I: Position>(&self, index: I) -> Result<&T, Error> {
        let len = self.len;
        index
            .to_index()
            .and_then(|i| self.as_slice().get(i))
            .ok_or_else(|| Error::OutOfRange {
                index: index.to_report(),
                len,
            })
    }

    /// Returns the element at `index` mutably.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `index` is not in `[0, len)`.
    pub fn at_mut<I: Position>(&mut self, index: I) -> Result<&mut T, Error> {
        let len = self.len;
        index
            .to_index()
            .and_then(|i| self.as_mut_slice().get_mut(i))
            .ok_or_else(|| Error::OutOfRange {
                index: index.to_report(),
                len,
            })
    }

    /// Grows the capacity to exactly `new_capacity` if it is currently smaller.
    ///
    /// Never shrinks. The length and the elements are unchanged, but any pointer into the
    /// old buffer is invalidated.
    pub fn reserve(&mut self, new_capacity: usize) {
        unwrap_alloc::<T, _>(self.grow_to(new_capacity))
    }

    /// Grows the capacity to exactly `new_capacity` if it is currently smaller.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the new buffer cannot be allocated, in which case the array is unchanged.
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<(), Error> {
        Ok(self.grow_to(new_capacity)?)
    }

    /// Appends `value` to the end, growing the buffer if it is full.
    pub fn push(&mut self, value: T) {
        unwrap_alloc::<T, _>(self.grow_for(1));
        // SAFETY: grow_for(1) left at least one vacant slot
        unsafe { self.push_in_place(value) };
    }

    /// Appends `value` to the end, growing the buffer if it is full.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the buffer had to grow and could not. `value` is dropped and the
    /// array is unchanged.
    pub fn try_push(&mut self, value: T) -> Result<(), Error> {
        self.grow_for(1)?;
        // SAFETY: grow_for(1) left at least one vacant slot
        unsafe { self.push_in_place(value) };
        Ok(())
    }

    /// Appends a clone of `value` to the end.
    pub fn push_cloned(&mut self, value: &T)
    where
        T: Clone,
    {
        self.push(value.clone());
    }

    pub fn try_push_cloned(&mut self, value: &T) -> Result<(), Error>
    where
        T: Clone,
    {
        self.try_push(value.clone())
    }

    /// Removes the last element and returns it. The capacity is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the array is empty.
    pub fn pop(&mut self) -> Result<T, Error> {
        if self.len == 0 {
            return Err(Error::EmptyContainer);
        }
        self.len -= 1;
        // SAFETY: the slot was live and is no longer counted
        Ok(unsafe { self.buf.read(self.len) })
    }

    /// Drops the elements past `len`. Does nothing if `len` is not shorter than the array.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let old_len = mem::replace(&mut self.len, len);
        // SAFETY: [len, old_len) was live and is no longer counted
        unsafe { self.buf.drop_in_place(len..old_len) };
    }

    /// Drops every element. The capacity is unchanged.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Sets the length to `new_len`.
    ///
    /// Shrinking drops the trailing elements. Growing fills the new positions with
    /// `T::default()`, reallocating to exactly `new_len` slots first if the capacity is
    /// too small. The capacity never decreases.
    pub fn resize(&mut self, new_len: usize)
    where
        T: Default,
    {
        self.resize_with(new_len, T::default);
    }

    pub fn try_resize(&mut self, new_len: usize) -> Result<(), Error>
    where
        T: Default,
    {
        self.try_resize_with(new_len, T::default)
    }

    /// Like [`resize`](Self::resize), but grown positions hold clones of `value`.
    pub fn resize_with_value(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        if new_len > self.len {
            unwrap_alloc::<T, _>(self.grow_to(new_len));
            self.fill_with_clones(value, new_len - self.len);
        } else {
            self.truncate(new_len);
        }
    }

    /// Like [`resize`](Self::resize), but grown positions hold the values returned by `f`.
    pub fn resize_with<F: FnMut() -> T>(&mut self, new_len: usize, f: F) {
        if new_len > self.len {
            unwrap_alloc::<T, _>(self.grow_to(new_len));
            self.fill_to(new_len, f);
        } else {
            self.truncate(new_len);
        }
    }

    /// # Errors
    ///
    /// Returns `Err` if the buffer had to grow and could not. The array is unchanged.
    pub fn try_resize_with<F: FnMut() -> T>(&mut self, new_len: usize, f: F) -> Result<(), Error> {
        if new_len > self.len {
            self.grow_to(new_len)?;
            self.fill_to(new_len, f);
        } else {
            self.truncate(new_len);
        }
        Ok(())
    }

    /// Appends clones of every element of `items`.
    pub fn extend_from_slice(&mut self, items: &[T])
    where
        T: Clone,
    {
        unwrap_alloc::<T, _>(self.grow_for(items.len()));
        self.clone_from_slice_in_place(items);
    }

    /// Reallocates to exactly `new_capacity` slots when that is more than the current capacity.
    fn grow_to(&mut self, new_capacity: usize) -> Result<(), AllocError> {
        let old_capacity = self.capacity();
        if new_capacity <= old_capacity {
            return Ok(());
        }

        let mut new_buf = RawBuf::allocate(new_capacity)?;
        trace!(
            "reallocating from {} to {} slots ({})",
            old_capacity,
            new_capacity,
            ByteSize::b(new_buf.size_in_bytes() as u64).to_string_as(true)
        );

        // SAFETY: [0, len) is initialized and new_buf has more than len vacant slots
        unsafe { self.buf.move_prefix_into(&mut new_buf, self.len) };
        // the old buffer is released without dropping the moved-out values
        self.buf = new_buf;
        Ok(())
    }

    /// Makes room for `additional` more elements, growing by the growth factor if needed.
    fn grow_for(&mut self, additional: usize) -> Result<(), AllocError> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(AllocError::CapacityOverflow)?;
        let capacity = self.capacity();
        if required <= capacity {
            return Ok(());
        }
        let next = self.growth.next_capacity(capacity)?.max(required);
        self.grow_to(next)
    }

    /// ## Safety
    /// - `len < capacity`.
    #[inline]
    unsafe fn push_in_place(&mut self, value: T) {
        debug_assert!(self.len < self.capacity());
        self.buf.write(self.len, value);
        self.len += 1;
    }

    /// Pushes values from `f` until the length is `new_len`.
    fn fill_to<F: FnMut() -> T>(&mut self, new_len: usize, mut f: F) {
        assert!(new_len <= self.capacity());
        while self.len < new_len {
            // SAFETY: len < new_len <= capacity
            unsafe { self.push_in_place(f()) };
        }
    }

    /// Pushes `count` copies of `value`, moving `value` itself into the last position.
    fn fill_with_clones(&mut self, value: T, count: usize)
    where
        T: Clone,
    {
        if count == 0 {
            return;
        }
        let new_len = self.len + count;
        assert!(new_len <= self.capacity());
        while self.len + 1 < new_len {
            // SAFETY: len < new_len <= capacity
            unsafe { self.push_in_place(value.clone()) };
        }
        // SAFETY: len + 1 == new_len <= capacity
        unsafe { self.push_in_place(value) };
    }

    fn clone_from_slice_in_place(&mut self, items: &[T])
    where
        T: Clone,
    {
        assert!(self.len + items.len() <= self.capacity());
        for item in items {
            // SAFETY: checked above
            unsafe { self.push_in_place(item.clone()) };
        }
    }
}

/// Aborts or panics the way `Vec` does when an infallible operation cannot allocate.
#[inline]
fn unwrap_alloc<T, R>(result: Result<R, AllocError>) -> R {
    match result {
        Ok(value) => value,
        Err(err) => alloc_failed::<T>(err),
    }
}

#[cold]
fn alloc_failed<T>(err: AllocError) -> ! {
    match err {
        AllocError::OutOfMemory { bytes } => {
            match Layout::from_size_align(bytes, mem::align_of::<T>()) {
                Ok(layout) => handle_alloc_error(layout),
                Err(_) => panic!("capacity overflow"),
            }
        }
        AllocError::CapacityOverflow => panic!("capacity overflow"),
    }
}

impl<T> Drop for DynamicArray<T> {
    fn drop(&mut self) {
        // SAFETY: [0, len) is initialized; buf releases the memory afterwards
        unsafe { self.buf.drop_in_place(0..self.len) };
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for DynamicArray<T> {
    /// Copies the live elements into a new buffer with the same capacity.
    fn clone(&self) -> Self {
        unwrap_alloc::<T, _>(self.clone_in_place())
    }
}

impl<T> Deref for DynamicArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for DynamicArray<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for DynamicArray<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for DynamicArray<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, I: SliceIndex<[T]>> Index<I> for DynamicArray<T> {
    type Output = I::Output;

    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, I: SliceIndex<[T]>> IndexMut<I> for DynamicArray<T> {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T: fmt::Debug> fmt::Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T, U> PartialEq<DynamicArray<U>> for DynamicArray<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &DynamicArray<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U, const N: usize> PartialEq<[U; N]> for DynamicArray<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == &other[..]
    }
}

impl<T, U> PartialEq<&[U]> for DynamicArray<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: Eq> Eq for DynamicArray<T> {}

impl<T: PartialOrd> PartialOrd for DynamicArray<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord> Ord for DynamicArray<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash> Hash for DynamicArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T, const N: usize> From<[T; N]> for DynamicArray<T> {
    fn from(items: [T; N]) -> Self {
        let mut array = Self::with_capacity(N);
        for item in items {
            // SAFETY: exactly N slots for N items
            unsafe { array.push_in_place(item) };
        }
        array
    }
}

impl<T: Clone> From<&[T]> for DynamicArray<T> {
    fn from(items: &[T]) -> Self {
        Self::from_slice(items)
    }
}

impl<T> FromIterator<T> for DynamicArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<T> Extend<T> for DynamicArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        unwrap_alloc::<T, _>(self.grow_for(lower));
        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for DynamicArray<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

/// Creates a [`DynamicArray`] containing the arguments.
///
/// - `dynarray![]` is empty with no allocation.
/// - `dynarray![a, b, c]` holds the given elements, with capacity equal to their count.
/// - `dynarray![value; n]` holds `n` clones of `value`.
#[macro_export]
macro_rules! dynarray {
    () => {
        $crate::DynamicArray::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::DynamicArray::from_elem($elem, $n)
    };
    ($($x:expr),+ $(,)?) => {
        $crate::DynamicArray::from([$($x),+])
    };
}
