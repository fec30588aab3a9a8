//! Traversal over the live elements of a [`DynamicArray`], in ascending index order.
//!
//! [`Iter`], [`IterMut`] and [`IntoIter`] plug into the standard iterator protocol.
//! [`Cursor`] and [`CursorMut`] are positions that step forward and back one element
//! at a time, with [`DynamicArray::begin`] at the first element and
//! [`DynamicArray::end`] one past the last.
//!
//! All of them borrow (or own) the array, so nothing that reallocates can run while
//! they are alive.

use core::{fmt, iter::FusedIterator, ptr, slice};

use crate::{raw::RawBuf, vec::DynamicArray};

impl<T> DynamicArray<T> {
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            items: self.as_slice(),
            front: 0,
            back: self.len,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            inner: self.as_mut_slice().iter_mut(),
        }
    }

    /// Returns a cursor at the first element (equal to [`end`](Self::end) when empty).
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor {
            array: self,
            index: 0,
        }
    }

    /// Returns a cursor one past the last element.
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor {
            array: self,
            index: self.len,
        }
    }

    /// Returns a mutable cursor at the first element.
    pub fn begin_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut {
            array: self,
            index: 0,
        }
    }

    /// Returns a mutable cursor one past the last element.
    pub fn end_mut(&mut self) -> CursorMut<'_, T> {
        let index = self.len;
        CursorMut { array: self, index }
    }
}

/// Immutable iterator over a [`DynamicArray`].
pub struct Iter<'a, T> {
    items: &'a [T],
    // next position from the front
    front: usize,
    // one past the next position from the back
    back: usize,
}

impl<'a, T> Iter<'a, T> {
    /// Returns the elements not yet yielded.
    pub fn as_slice(&self) -> &'a [T] {
        &self.items[self.front..self.back]
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items,
            front: self.front,
            back: self.back,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.as_slice()).finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        let item = &self.items[self.front];
        self.front += 1;
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }

    fn nth(&mut self, n: usize) -> Option<&'a T> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(&self.items[self.back])
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Mutable iterator over a [`DynamicArray`].
#[derive(Debug)]
pub struct IterMut<'a, T> {
    inner: slice::IterMut<'a, T>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<&'a mut T> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a mut T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}

impl<'a, T> IntoIterator for &'a mut DynamicArray<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

/// Owning iterator over a [`DynamicArray`].
///
/// Elements that are never yielded are dropped with the iterator, along with the buffer.
pub struct IntoIter<T> {
    buf: RawBuf<T>,
    front: usize,
    back: usize,
}

impl<T> IntoIter<T> {
    /// Returns the elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: [front, back) is initialized
        unsafe { slice::from_raw_parts(self.buf.as_ptr().add(self.front), self.back - self.front) }
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.front += 1;
        // SAFETY: the slot was live and is no longer in [front, back)
        Some(unsafe { self.buf.read(self.front - 1) })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: the slot was live and is no longer in [front, back)
        Some(unsafe { self.buf.read(self.back) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // SAFETY: [front, back) is initialized; buf releases the memory afterwards
        unsafe { self.buf.drop_in_place(self.front..self.back) };
    }
}

impl<T> IntoIterator for DynamicArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> IntoIter<T> {
        // `self` is left empty, so its own drop does nothing
        let buf = self.buf.take();
        let back = core::mem::replace(&mut self.len, 0);
        IntoIter { buf, front: 0, back }
    }
}

/// A read-only position in a [`DynamicArray`].
///
/// Valid positions are `0..=len`; `len` is the end position and has no element.
/// Two cursors are equal when they point into the same array at the same position.
pub struct Cursor<'a, T> {
    array: &'a DynamicArray<T>,
    index: usize,
}

impl<'a, T> Cursor<'a, T> {
    /// Returns the position.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the element under the cursor, or `None` at the end position.
    pub fn get(&self) -> Option<&'a T> {
        self.array.as_slice().get(self.index)
    }

    /// Steps one element forward. Returns `false` (and stays put) at the end position.
    pub fn move_next(&mut self) -> bool {
        if self.index < self.array.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Steps one element back. Returns `false` (and stays put) at the first position.
    pub fn move_prev(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Returns the number of elements between this cursor and the end position.
    pub fn remaining(&self) -> usize {
        self.array.len() - self.index
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.array, other.array) && self.index == other.index
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("index", &self.index)
            .field("current", &self.get())
            .finish()
    }
}

/// A position in a [`DynamicArray`] through which the element can be modified.
pub struct CursorMut<'a, T> {
    array: &'a mut DynamicArray<T>,
    index: usize,
}

impl<'a, T> CursorMut<'a, T> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the element under the cursor, or `None` at the end position.
    pub fn get(&self) -> Option<&T> {
        self.array.as_slice().get(self.index)
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.array.as_mut_slice().get_mut(self.index)
    }

    /// Steps one element forward. Returns `false` (and stays put) at the end position.
    pub fn move_next(&mut self) -> bool {
        if self.index < self.array.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Steps one element back. Returns `false` (and stays put) at the first position.
    pub fn move_prev(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Returns a read-only cursor at the same position.
    pub fn as_cursor(&self) -> Cursor<'_, T> {
        Cursor {
            array: &*self.array,
            index: self.index,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for CursorMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("index", &self.index)
            .field("current", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use crate::dynarray;

    use super::*;

    #[test]
    fn iter_ascending_and_back() {
        let array = dynarray![1, 2, 3, 4];
        assert!(array.iter().copied().eq([1, 2, 3, 4]));
        assert!(array.iter().rev().copied().eq([4, 3, 2, 1]));
        assert_eq!(array.iter().len(), 4);
        assert_eq!(array.iter().sum::<i32>(), 10);
        assert_eq!(array.iter().find(|&&x| x > 2), Some(&3));
    }

    #[test]
    fn iter_meets_in_the_middle() {
        let array = dynarray![1, 2, 3];
        let mut iter = array.iter();
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&3));
        assert_eq!(iter.as_slice(), [2]);
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next_back(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn iter_nth_clamps() {
        let array = dynarray![1, 2, 3];
        let mut iter = array.iter();
        assert_eq!(iter.nth(1), Some(&2));
        assert_eq!(iter.nth(usize::MAX), None);
        assert_eq!(iter.len(), 0);
    }

    #[test]
    fn iteration_skips_spare_capacity() {
        let mut array = DynamicArray::with_capacity(8);
        array.push(1);
        array.push(2);
        assert_eq!(array.iter().count(), 2);
        let mut seen = vec![];
        for x in &array {
            seen.push(*x);
        }
        assert_eq!(seen, [1, 2]);
    }

    #[test]
    fn iter_mut_modifies_in_place() {
        let mut array = dynarray![1, 2, 3];
        for x in &mut array {
            *x *= 10;
        }
        array.iter_mut().rev().take(1).for_each(|x| *x += 1);
        assert_eq!(array, [10, 20, 31]);
    }

    #[test]
    fn into_iter_yields_owned_values() {
        let array = dynarray![String::from("a"), String::from("b"), String::from("c")];
        let mut iter = array.into_iter();
        assert_eq!(iter.next_back().as_deref(), Some("c"));
        assert_eq!(iter.as_slice(), ["a", "b"]);
        let rest: Vec<String> = iter.collect();
        assert_eq!(rest, ["a", "b"]);
    }

    #[test]
    fn into_iter_drops_unyielded_elements() {
        struct Tracked(Rc<Cell<usize>>);
        impl Drop for Tracked {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }

        let drops = Rc::new(Cell::new(0));
        let mut array = DynamicArray::with_capacity(10);
        for _ in 0..5 {
            array.push(Tracked(drops.clone()));
        }
        let mut iter = array.into_iter();
        drop(iter.next());
        drop(iter.next_back());
        assert_eq!(drops.get(), 2);
        drop(iter);
        assert_eq!(drops.get(), 5);
    }

    #[test]
    fn cursor_walks_between_begin_and_end() {
        let array = dynarray![1, 2, 3];
        let mut cursor = array.begin();
        let end = array.end();
        let mut seen = vec![];
        while cursor != end {
            seen.push(*cursor.get().unwrap());
            assert!(cursor.move_next());
        }
        assert_eq!(seen, [1, 2, 3]);
        assert_eq!(cursor.get(), None);
        assert!(!cursor.move_next());

        assert!(cursor.move_prev());
        assert_eq!(cursor.get(), Some(&3));
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn cursor_on_empty_array() {
        let array = DynamicArray::<u8>::new();
        let mut begin = array.begin();
        assert_eq!(begin, array.end());
        assert!(!begin.move_prev());
        assert!(!begin.move_next());
    }

    #[test]
    fn cursors_into_different_arrays_differ() {
        let a = dynarray![1];
        let b = dynarray![1];
        assert_ne!(a.begin(), b.begin());
        let copy = a.begin();
        assert_eq!(copy, a.begin());
    }

    #[test]
    fn cursor_mut_edits_elements() {
        let mut array = dynarray![1, 2, 3];
        {
            let mut cursor = array.end_mut();
            while cursor.move_prev() {
                if let Some(x) = cursor.get_mut() {
                    *x += 100;
                }
            }
            assert_eq!(cursor.index(), 0);
            assert_eq!(cursor.as_cursor().get(), Some(&101));
        }
        let mut cursor = array.begin_mut();
        assert!(cursor.move_next());
        assert_eq!(cursor.get(), Some(&102));
        assert_eq!(array, [101, 102, 103]);
    }
}
