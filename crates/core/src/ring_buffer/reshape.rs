use super::{OverflowCause, RingBuffer, RingBufferError};
use tracing::{debug, trace};

impl<T> RingBuffer<T> {
    /// Move the elements so the first one sits in physical slot 0 and the
    /// window no longer wraps. Logical order is unchanged.
    pub fn linearize(&mut self) {
        if self.len == 0 {
            self.head = 0;
            return;
        }
        if self.head == 0 {
            return;
        }

        trace!(begin = self.head, len = self.len, "linearizing ring buffer");
        // Free slots are all `None`, so rotating the whole block keeps them
        // after the live window.
        self.slots.rotate_left(self.head);
        self.head = 0;
    }

    pub fn is_linearized(&self) -> bool {
        self.head == 0
    }

    /// Make the element at logical index `new_begin` the first one.
    ///
    /// A full buffer only moves its start index. Otherwise the elements in
    /// front of `new_begin` are moved into the free slots after the last
    /// element, which keeps them behind the old tail.
    ///
    /// `new_begin` must be smaller than `len()`. This is only checked in
    /// debug builds. Does nothing on an empty buffer.
    pub fn rotate(&mut self, new_begin: usize) {
        if self.len == 0 {
            return;
        }
        debug_assert!(
            new_begin < self.len,
            "rotate to {new_begin} on ring buffer of size {}",
            self.len
        );

        if !self.is_full() {
            for i in 0..new_begin {
                let from = self.physical(i);
                let to = self.physical(self.len + i);
                self.slots[to] = self.slots[from].take();
            }
        }
        self.head = self.physical(new_begin);
    }

    /// Reallocate storage for `new_capacity` slots.
    ///
    /// The first `min(len, new_capacity)` elements are kept in order and the
    /// rest are dropped. A capacity of 0 behaves like [`RingBuffer::clear`].
    pub fn set_capacity(&mut self, new_capacity: usize) {
        if new_capacity == 0 {
            self.clear();
            return;
        }
        let old_capacity = self.capacity();
        if new_capacity == old_capacity {
            return;
        }

        self.linearize();
        let kept = self.len.min(new_capacity);
        debug!(
            from = old_capacity,
            to = new_capacity,
            dropped = self.len - kept,
            "reallocating ring buffer"
        );

        let mut slots = Vec::with_capacity(new_capacity);
        slots.extend(self.slots.drain(..kept));
        slots.resize_with(new_capacity, || None);
        self.slots = slots;
        self.head = 0;
        self.len = kept;
    }

    /// Grow or shrink the window to `new_size` elements, filling new slots
    /// with clones of `fill`.
    pub fn resize(&mut self, new_size: usize, fill: T) -> Result<(), RingBufferError>
    where
        T: Clone,
    {
        self.resize_with(new_size, || fill.clone())
    }

    pub fn resize_with<F>(&mut self, new_size: usize, mut f: F) -> Result<(), RingBufferError>
    where
        F: FnMut() -> T,
    {
        if new_size > self.capacity() {
            return Err(RingBufferError::LengthError {
                requested: new_size,
                capacity: self.capacity(),
            });
        }

        if new_size <= self.len {
            self.truncate(new_size);
            return Ok(());
        }

        while self.len < new_size {
            let slot = self.physical(self.len);
            self.slots[slot] = Some(f());
            self.len += 1;
        }
        Ok(())
    }

    /// Insert `item` at logical position `pos`, shifting later elements
    /// one slot toward the tail. Never overwrites: a full buffer is an error.
    pub fn insert(&mut self, pos: usize, item: T) -> Result<(), RingBufferError> {
        if self.capacity() == 0 {
            return Err(RingBufferError::Overflow(OverflowCause::ZeroCapacity));
        }
        if self.is_full() {
            return Err(RingBufferError::Overflow(OverflowCause::Full));
        }
        if pos > self.len {
            return Err(RingBufferError::InvalidArgument { pos, len: self.len });
        }

        for i in (pos..self.len).rev() {
            let from = self.physical(i);
            let to = self.physical(i + 1);
            self.slots[to] = self.slots[from].take();
        }
        let slot = self.physical(pos);
        self.slots[slot] = Some(item);
        self.len += 1;
        Ok(())
    }

    /// Remove the elements in the logical range `first..last` and close the
    /// gap by moving later elements forward.
    ///
    /// # Panics
    ///
    /// Panics if `first > last` or `last > len()`.
    pub fn erase(&mut self, first: usize, last: usize) {
        assert!(
            first <= last && last <= self.len,
            "erase range {first}..{last} out of bounds for ring buffer of size {}",
            self.len
        );
        let removed = last - first;
        if removed == 0 {
            return;
        }

        for i in first..last {
            let slot = self.physical(i);
            self.slots[slot] = None;
        }
        for i in last..self.len {
            let from = self.physical(i);
            let to = self.physical(i - removed);
            self.slots[to] = self.slots[from].take();
        }
        self.len -= removed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Capacity 5 holding `[1, 2, 3]` in slots 3, 4 and 0.
    fn wrapped() -> RingBuffer<i32> {
        let mut buf = RingBuffer::with_capacity(5);
        for v in [0, 0, 0, 1, 2] {
            buf.push_back(v).expect("capacity > 0");
        }
        buf.pop_front();
        buf.pop_front();
        buf.pop_front();
        buf.push_back(3).expect("capacity > 0");
        assert_eq!(buf.begin(), 3);
        assert_eq!(buf.end(), Some(0));
        buf
    }

    #[test]
    fn linearize_unwraps_window() {
        let mut buf = wrapped();
        assert!(!buf.is_linearized());
        buf.linearize();
        assert!(buf.is_linearized());
        assert_eq!(buf.begin(), 0);
        assert_eq!(buf.end(), Some(2));
        assert_eq!(buf, [1, 2, 3]);
    }

    #[test]
    fn linearize_empty_resets_begin() {
        let mut buf = wrapped();
        buf.truncate(0);
        buf.linearize();
        assert!(buf.is_linearized());
    }

    #[test]
    fn rotate_partial_buffer_moves_prefix_behind_tail() {
        let mut buf = wrapped();
        buf.rotate(2);
        assert_eq!(buf, [3, 1, 2]);
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn rotate_when_prefix_wraps_into_vacated_slots() {
        let mut buf = RingBuffer::with_capacity(5);
        for v in 1..=4 {
            buf.push_back(v).expect("capacity > 0");
        }
        buf.rotate(3);
        assert_eq!(buf, [4, 1, 2, 3]);
    }

    #[test]
    fn set_capacity_grow_keeps_elements() {
        let mut buf = wrapped();
        buf.set_capacity(8);
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf, [1, 2, 3]);
        assert!(buf.is_linearized());
    }

    #[test]
    fn set_capacity_shrink_truncates_len() {
        let mut buf = wrapped();
        buf.set_capacity(2);
        assert_eq!(buf.capacity(), 2);
        assert_eq!(buf.len(), 2);
        assert!(buf.is_full());
        assert_eq!(buf, [1, 2]);
    }

    #[test]
    fn set_capacity_zero_releases() {
        let mut buf = wrapped();
        buf.set_capacity(0);
        assert_eq!(buf.capacity(), 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn resize_grows_with_fill_and_shrinks_from_tail() {
        let mut buf = wrapped();
        buf.resize(5, 9).expect("within capacity");
        assert_eq!(buf, [1, 2, 3, 9, 9]);
        assert_eq!(buf.begin(), 3);

        buf.resize(2, 0).expect("within capacity");
        assert_eq!(buf, [1, 2]);
        assert_eq!(buf.begin(), 3);
    }

    #[test]
    fn resize_with_default_fill() {
        let mut buf: RingBuffer<u8> = RingBuffer::with_capacity(3);
        buf.resize_with(3, Default::default).expect("within capacity");
        assert_eq!(buf, [0, 0, 0]);
    }

    #[test]
    fn resize_beyond_capacity_fails() {
        let mut buf = wrapped();
        assert_eq!(
            buf.resize(6, 0),
            Err(RingBufferError::LengthError {
                requested: 6,
                capacity: 5
            })
        );
        assert_eq!(buf, [1, 2, 3]);
    }

    #[test]
    fn insert_uses_logical_position_on_wrapped_buffer() {
        let mut buf = wrapped();
        buf.insert(1, 10).expect("room left");
        assert_eq!(buf, [1, 10, 2, 3]);
        assert_eq!(buf.begin(), 3);
        assert_eq!(buf.end(), Some(1));
    }

    #[test]
    fn insert_at_len_appends() {
        let mut buf = wrapped();
        buf.insert(3, 4).expect("room left");
        assert_eq!(buf, [1, 2, 3, 4]);
    }

    #[test]
    fn insert_errors() {
        let mut empty: RingBuffer<i32> = RingBuffer::new();
        assert_eq!(
            empty.insert(0, 1),
            Err(RingBufferError::Overflow(OverflowCause::ZeroCapacity))
        );

        let mut full = RingBuffer::from_elem(2, 0);
        assert_eq!(
            full.insert(0, 1),
            Err(RingBufferError::Overflow(OverflowCause::Full))
        );

        let mut buf = wrapped();
        assert_eq!(
            buf.insert(4, 1),
            Err(RingBufferError::InvalidArgument { pos: 4, len: 3 })
        );
    }

    #[test]
    fn erase_closes_gap_across_wrap() {
        let mut buf = wrapped();
        buf.push_back(4).expect("capacity > 0");
        buf.erase(1, 3);
        assert_eq!(buf, [1, 4]);
        assert_eq!(buf.end(), Some(4));
    }

    #[test]
    fn erase_empty_range_is_noop() {
        let mut buf = wrapped();
        buf.erase(2, 2);
        assert_eq!(buf, [1, 2, 3]);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn erase_past_len_panics() {
        let mut buf = wrapped();
        buf.erase(1, 4);
    }
}
