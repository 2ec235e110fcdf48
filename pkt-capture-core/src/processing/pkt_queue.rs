use std::collections::VecDeque;

/// Bounded FIFO of pending monitor packets.
///
/// Wrap in `parking_lot::Mutex` for cross-thread access.
///
/// Overflow behavior: drops the oldest entry and counts it.
#[derive(Debug)]
pub struct PacketQueue<T> {
    entries: VecDeque<T>,
    capacity: usize,
    dropped: u64,
}

impl<T> PacketQueue<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    /// Append `entry`. Returns the oldest entry if it had to be evicted.
    ///
    /// A zero-capacity queue drops every entry it is given.
    pub fn push(&mut self, entry: T) -> Option<T> {
        if self.capacity == 0 {
            self.dropped += 1;
            return Some(entry);
        }

        let evicted = if self.entries.len() == self.capacity {
            self.dropped += 1;
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    pub fn pop(&mut self) -> Option<T> {
        self.entries.pop_front()
    }

    /// Remove and return up to `count` entries, oldest first.
    pub fn drain_up_to(&mut self, count: usize) -> Vec<T> {
        let n = count.min(self.entries.len());
        self.entries.drain(..n).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries evicted by overflow since creation.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Remove every pending entry, returning them oldest first.
    pub fn flush(&mut self) -> Vec<T> {
        self.entries.drain(..).collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order() {
        let mut queue = PacketQueue::new(4);
        queue.push(1);
        queue.push(2);
        queue.push(3);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.drain_up_to(10), vec![2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn overflow_drops_oldest() {
        let mut queue = PacketQueue::new(2);
        assert_eq!(queue.push("a"), None);
        assert_eq!(queue.push("b"), None);
        assert_eq!(queue.push("c"), Some("a"));

        assert_eq!(queue.dropped(), 1);
        assert_eq!(queue.flush(), vec!["b", "c"]);
    }

    #[test]
    fn zero_capacity_drops_everything() {
        let mut queue = PacketQueue::new(0);

        assert_eq!(queue.push(7), Some(7));
        assert!(queue.is_empty());
        assert_eq!(queue.dropped(), 1);
    }

    #[test]
    fn partial_drain() {
        let mut queue = PacketQueue::new(8);
        for i in 0..5 {
            queue.push(i);
        }

        assert_eq!(queue.drain_up_to(2), vec![0, 1]);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.capacity(), 8);
    }
}
