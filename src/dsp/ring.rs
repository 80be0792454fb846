//! Fixed-capacity ring buffer.
//!
//! Storage is an inline array of `N` slots (a power of two) addressed by a
//! head cursor and a length. The only place that wraps an index is
//! [`RingBuffer::slot`], so callers deal in logical positions: `0` is the
//! oldest element, `len() - 1` the newest.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingBuffer<T, const N: usize> {
    slots: [T; N],
    head: usize,
    len: usize,
}

impl<T: Copy + Default, const N: usize> RingBuffer<T, N> {
    const MASK: usize = {
        assert!(N.is_power_of_two(), "ring capacity must be a power of two");
        N - 1
    };

    pub fn new() -> Self {
        Self {
            slots: [T::default(); N],
            head: 0,
            len: 0,
        }
    }

    /// Physical slot of a logical position.
    #[inline]
    fn slot(&self, logical: usize) -> usize {
        (self.head + logical) & Self::MASK
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Append at the tail. Hands the value back if the ring is full.
    #[inline]
    pub fn push_back(&mut self, value: T) -> Result<(), T> {
        if self.is_full() {
            return Err(value);
        }
        let tail = self.slot(self.len);
        self.slots[tail] = value;
        self.len += 1;
        Ok(())
    }

    /// Remove and return the oldest element.
    #[inline]
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let value = self.slots[self.head];
        self.head = self.slot(1);
        self.len -= 1;
        Some(value)
    }

    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        (index < self.len).then(|| &self.slots[self.slot(index)])
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len {
            let slot = self.slot(index);
            Some(&mut self.slots[slot])
        } else {
            None
        }
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let (first, second) = self.segments();
        self.slots[first].iter().chain(self.slots[second].iter())
    }

    /// Oldest to newest.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        let (first, second) = self.segments();
        // `second` always ends at or before `first` starts
        let (low, high) = self.slots.split_at_mut(first.start);
        high[..first.len()].iter_mut().chain(low[second].iter_mut())
    }

    /// Drop every element and rewind the cursors.
    pub fn clear(&mut self) {
        self.slots = [T::default(); N];
        self.head = 0;
        self.len = 0;
    }

    /// Fill the ring to capacity with copies of `value`.
    pub fn fill(&mut self, value: T) {
        self.slots = [value; N];
        self.head = 0;
        self.len = N;
    }

    /// The occupied region as (head..end, wrapped prefix).
    fn segments(&self) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
        let end = self.head + self.len;
        if end <= N {
            (self.head..end, 0..0)
        } else {
            (self.head..N, 0..end - N)
        }
    }
}

impl<T: Copy + Default, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_preserves_order_across_wrap() {
        let mut ring = RingBuffer::<u32, 4>::new();
        for round in 0..10u32 {
            ring.push_back(round * 2).unwrap();
            ring.push_back(round * 2 + 1).unwrap();
            assert_eq!(ring.pop_front(), Some(round * 2));
            assert_eq!(ring.pop_front(), Some(round * 2 + 1));
        }
        assert!(ring.is_empty());
        assert_eq!(ring.pop_front(), None);
    }

    #[test]
    fn rejects_push_when_full() {
        let mut ring = RingBuffer::<u8, 2>::new();
        assert!(ring.push_back(1).is_ok());
        assert!(ring.push_back(2).is_ok());
        assert_eq!(ring.push_back(3), Err(3));
        assert_eq!(ring.len(), 2);
        assert!(ring.is_full());
    }

    #[test]
    fn iteration_is_oldest_first_when_wrapped() {
        let mut ring = RingBuffer::<i32, 4>::new();
        for value in 0..4 {
            ring.push_back(value).unwrap();
        }
        ring.pop_front();
        ring.pop_front();
        ring.push_back(4).unwrap();
        ring.push_back(5).unwrap();

        let values: Vec<i32> = ring.iter().copied().collect();
        assert_eq!(values, vec![2, 3, 4, 5]);

        for value in ring.iter_mut() {
            *value *= 10;
        }
        let values: Vec<i32> = ring.iter().copied().collect();
        assert_eq!(values, vec![20, 30, 40, 50]);
    }

    #[test]
    fn logical_indexing_follows_head() {
        let mut ring = RingBuffer::<i32, 4>::new();
        ring.fill(7);
        ring.pop_front();
        ring.push_back(9).unwrap();
        assert_eq!(ring.get(3), Some(&9));
        assert_eq!(ring.get(4), None);
        *ring.get_mut(0).unwrap() = 1;
        assert_eq!(ring.front(), Some(&1));
    }

    #[test]
    fn clear_rewinds() {
        let mut ring = RingBuffer::<i32, 8>::new();
        ring.fill(3);
        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.iter().count(), 0);
    }
}
