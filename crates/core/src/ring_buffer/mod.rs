//! A fixed-capacity ring buffer with explicit capacity management.
//!
//! Elements live in a window of `len` slots starting at physical slot
//! `begin` and wrapping modulo the capacity. Pushing onto a full buffer
//! overwrites the element at the opposite end instead of failing.
//!
//! Access comes in two flavours: `buf[i]` panics on a bad index, while
//! [`RingBuffer::at`] and [`RingBuffer::get`] report it to the caller.

mod reshape;

use std::fmt;
use std::ops::{Index, IndexMut};
use tracing::{debug, trace};

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingBufferError {
    #[error("index {index} out of range for ring buffer of size {len}")]
    OutOfRange { index: usize, len: usize },

    #[error("ring buffer overflow: {0}")]
    Overflow(OverflowCause),

    #[error("invalid insert position {pos} for ring buffer of size {len}")]
    InvalidArgument { pos: usize, len: usize },

    #[error("requested size {requested} exceeds capacity {capacity}")]
    LengthError { requested: usize, capacity: usize },
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowCause {
    #[error("buffer has zero capacity")]
    ZeroCapacity,
    #[error("buffer is full")]
    Full,
}

/// A ring buffer of `T` whose capacity only changes when asked to.
///
/// Slots outside the live window are always `None`, so an element is
/// dropped exactly when it leaves the window.
pub struct RingBuffer<T> {
    slots: Vec<Option<T>>,
    head: usize,
    len: usize,
}

impl<T> RingBuffer<T> {
    /// Create a buffer with zero capacity. Nothing is allocated.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            head: 0,
            len: 0,
        }
    }

    /// Create an empty buffer with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            head: 0,
            len: 0,
        }
    }

    /// Create a full buffer holding `capacity` clones of `value`.
    pub fn from_elem(capacity: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self {
            slots: vec![Some(value); capacity],
            head: 0,
            len: capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Number of unoccupied slots.
    pub fn reserve(&self) -> usize {
        self.capacity() - self.len
    }

    /// Physical slot of the first element.
    ///
    /// Only meaningful while the buffer is non-empty.
    pub fn begin(&self) -> usize {
        self.head
    }

    /// Physical slot of the last element, `None` when empty.
    pub fn end(&self) -> Option<usize> {
        self.len.checked_sub(1).map(|last| self.physical(last))
    }

    /// Reduce a raw slot offset modulo the capacity.
    ///
    /// Every wraparound computation in this module goes through here.
    /// Callers guarantee the capacity is non-zero.
    #[inline]
    fn wrap(&self, offset: usize) -> usize {
        debug_assert!(self.capacity() > 0, "wrap on zero-capacity ring buffer");
        offset % self.capacity()
    }

    #[inline]
    fn physical(&self, logical: usize) -> usize {
        self.wrap(self.head + logical)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        self.slots[self.physical(index)].as_ref()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }
        let slot = self.physical(index);
        self.slots[slot].as_mut()
    }

    /// Checked access to the element at logical `index`.
    pub fn at(&self, index: usize) -> Result<&T, RingBufferError> {
        let len = self.len;
        self.get(index)
            .ok_or(RingBufferError::OutOfRange { index, len })
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, RingBufferError> {
        let len = self.len;
        self.get_mut(index)
            .ok_or(RingBufferError::OutOfRange { index, len })
    }

    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    pub fn back(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|last| self.get(last))
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        match self.len.checked_sub(1) {
            Some(last) => self.get_mut(last),
            None => None,
        }
    }

    /// Append `item` after the last element.
    ///
    /// On a full buffer the oldest element is overwritten and returned,
    /// and the window advances by one slot.
    pub fn push_back(&mut self, item: T) -> Result<Option<T>, RingBufferError> {
        if self.capacity() == 0 {
            return Err(RingBufferError::Overflow(OverflowCause::ZeroCapacity));
        }

        if self.is_full() {
            // The slot after the last element is the first one.
            let evicted = self.slots[self.head].replace(item);
            self.head = self.wrap(self.head + 1);
            trace!(begin = self.head, "push_back overwrote the first element");
            return Ok(evicted);
        }

        let slot = self.physical(self.len);
        self.slots[slot] = Some(item);
        self.len += 1;
        Ok(None)
    }

    /// Prepend `item` before the first element.
    ///
    /// On a full buffer the last element is overwritten and returned.
    pub fn push_front(&mut self, item: T) -> Result<Option<T>, RingBufferError> {
        if self.capacity() == 0 {
            return Err(RingBufferError::Overflow(OverflowCause::ZeroCapacity));
        }

        let head = self.wrap(self.head + self.capacity() - 1);
        let evicted = self.slots[head].replace(item);
        self.head = head;

        if self.is_full() {
            trace!(begin = self.head, "push_front overwrote the last element");
            Ok(evicted)
        } else {
            self.len += 1;
            Ok(None)
        }
    }

    pub fn pop_back(&mut self) -> Option<T> {
        let last = self.len.checked_sub(1)?;
        let slot = self.physical(last);
        self.len = last;
        self.slots[slot].take()
    }

    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let value = self.slots[self.head].take();
        self.head = self.wrap(self.head + 1);
        self.len -= 1;
        value
    }

    /// Shorten the buffer to `len` elements, keeping the capacity.
    ///
    /// `truncate(0)` empties the buffer without releasing storage. Does
    /// nothing when `len` is not smaller than the current length.
    pub fn truncate(&mut self, len: usize) {
        while self.len > len {
            self.pop_back();
        }
    }

    /// Drop every element and release the storage. The capacity becomes 0.
    pub fn clear(&mut self) {
        if self.capacity() == 0 {
            return;
        }
        debug!(capacity = self.capacity(), len = self.len, "releasing ring buffer storage");
        self.slots = Vec::new();
        self.head = 0;
        self.len = 0;
    }

    /// Exchange the whole state of two buffers without copying elements.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Copy the live elements out in logical order.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        (0..self.len).map(|i| self[i].clone()).collect()
    }
}

impl<T> Default for RingBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for RingBuffer<T> {
    fn clone(&self) -> Self {
        let mut slots = Vec::with_capacity(self.capacity());
        slots.extend((0..self.len).map(|i| Some(self[i].clone())));
        slots.resize_with(self.capacity(), || None);
        Self {
            slots,
            head: 0,
            len: self.len,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.slots.clear();
        self.slots.resize_with(source.capacity(), || None);
        self.head = 0;
        self.len = 0;
        for i in 0..source.len {
            self.slots[i] = Some(source[i].clone());
            self.len += 1;
        }
    }
}

impl<T> Index<usize> for RingBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!(
                "index {index} out of range for ring buffer of size {}",
                self.len
            ),
        }
    }
}

impl<T> IndexMut<usize> for RingBuffer<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!("index {index} out of range for ring buffer of size {len}"),
        }
    }
}

impl<T: PartialEq> PartialEq for RingBuffer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self.capacity() == other.capacity()
            && (0..self.len).all(|i| self[i] == other[i])
    }
}

impl<T: Eq> Eq for RingBuffer<T> {}

// Comparisons against plain sequences look at the live elements only.
impl<T, U> PartialEq<[U]> for RingBuffer<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.len == other.len() && other.iter().enumerate().all(|(i, v)| self[i] == *v)
    }
}

impl<T, U, const N: usize> PartialEq<[U; N]> for RingBuffer<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        *self == other[..]
    }
}

impl<T, U> PartialEq<Vec<U>> for RingBuffer<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Vec<U>) -> bool {
        *self == other[..]
    }
}

impl<T: fmt::Debug> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries((0..self.len).map(|i| &self[i]))
            .finish()
    }
}
