//! Indexed binary min-heap with decrease-key.
//!
//! Keys are unique; a position map keeps `contains` and `set_priority` at O(1) and
//! O(log n) respectively, which Dijkstra and Prim rely on.

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{Error, GraphResult};

/// Min-priority queue over `(key, priority)` pairs.
#[derive(Debug, Clone)]
pub struct PriorityQueue<K, P> {
    heap: Vec<(K, P)>,
    position: HashMap<K, usize>,
}

impl<K, P> PriorityQueue<K, P>
where
    K: Clone + Eq + Hash,
    P: PartialOrd + Copy,
{
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            position: HashMap::new(),
        }
    }

    /// Number of keys still queued.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Whether `key` is still queued.
    pub fn contains(&self, key: &K) -> bool {
        self.position.contains_key(key)
    }

    /// Current priority of a queued key.
    pub fn priority(&self, key: &K) -> Option<P> {
        self.position.get(key).map(|&i| self.heap[i].1)
    }

    /// Queue `key`, or update its priority if it is already present.
    pub fn push(&mut self, key: K, priority: P) {
        if let Some(&i) = self.position.get(&key) {
            self.reprioritize(i, priority);
            return;
        }
        let i = self.heap.len();
        self.position.insert(key.clone(), i);
        self.heap.push((key, priority));
        self.sift_up(i);
    }

    /// Key with the smallest priority.
    pub fn peek_min(&self) -> Option<(&K, P)> {
        self.heap.first().map(|(k, p)| (k, *p))
    }

    /// Remove and return the key with the smallest priority.
    pub fn extract_min(&mut self) -> Option<K> {
        self.extract_min_with_priority().map(|(key, _)| key)
    }

    /// Remove and return the smallest entry together with its priority.
    pub fn extract_min_with_priority(&mut self) -> Option<(K, P)> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let (key, priority) = self.heap.pop()?;
        self.position.remove(&key);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some((key, priority))
    }

    /// Change the priority of a queued key (decrease-key; increases are handled too).
    pub fn set_priority(&mut self, key: &K, priority: P) -> GraphResult<(), K> {
        let i = *self
            .position
            .get(key)
            .ok_or_else(|| Error::KeyNotFound(key.clone()))?;
        self.reprioritize(i, priority);
        Ok(())
    }

    fn reprioritize(&mut self, i: usize, priority: P) {
        let old = self.heap[i].1;
        self.heap[i].1 = priority;
        if priority < old {
            self.sift_up(i);
        } else {
            self.sift_down(i);
        }
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.heap[i].1 < self.heap[parent].1 {
                self.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.heap.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut smallest = i;
            if left < n && self.heap[left].1 < self.heap[smallest].1 {
                smallest = left;
            }
            if right < n && self.heap[right].1 < self.heap[smallest].1 {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.swap(i, smallest);
            i = smallest;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        if let Some(slot) = self.position.get_mut(&self.heap[a].0) {
            *slot = a;
        }
        if let Some(slot) = self.position.get_mut(&self.heap[b].0) {
            *slot = b;
        }
    }
}

impl<K, P> Default for PriorityQueue<K, P>
where
    K: Clone + Eq + Hash,
    P: PartialOrd + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, P> FromIterator<(K, P)> for PriorityQueue<K, P>
where
    K: Clone + Eq + Hash,
    P: PartialOrd + Copy,
{
    fn from_iter<I: IntoIterator<Item = (K, P)>>(iter: I) -> Self {
        let mut queue = Self::new();
        for (key, priority) in iter {
            queue.push(key, priority);
        }
        queue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let mut q: PriorityQueue<u32, f64> = PriorityQueue::new();
        assert!(q.is_empty());
        assert_eq!(q.extract_min(), None);
    }

    #[test]
    fn test_extracts_in_priority_order() {
        let mut q: PriorityQueue<&str, i32> =
            [("c", 3), ("a", 1), ("e", 5), ("b", 2), ("d", 4)].into_iter().collect();
        let mut order = Vec::new();
        while let Some(k) = q.extract_min() {
            order.push(k);
        }
        assert_eq!(order, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_decrease_key() {
        let mut q: PriorityQueue<u32, f64> =
            [(1, 10.0), (2, 20.0), (3, 30.0)].into_iter().collect();
        q.set_priority(&3, 5.0).unwrap();
        assert_eq!(q.priority(&3), Some(5.0));
        assert_eq!(q.extract_min(), Some(3));
        assert_eq!(q.extract_min(), Some(1));
    }

    #[test]
    fn test_increase_key() {
        let mut q: PriorityQueue<u32, i32> = [(1, 1), (2, 2), (3, 3)].into_iter().collect();
        q.set_priority(&1, 10).unwrap();
        assert_eq!(q.extract_min(), Some(2));
        assert_eq!(q.extract_min(), Some(3));
        assert_eq!(q.extract_min(), Some(1));
    }

    #[test]
    fn test_contains_tracks_extraction() {
        let mut q: PriorityQueue<u32, i32> = [(7, 0), (8, 1)].into_iter().collect();
        assert!(q.contains(&7));
        q.extract_min();
        assert!(!q.contains(&7));
        assert!(q.contains(&8));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_set_priority_missing_key() {
        let mut q: PriorityQueue<u32, i32> = [(1, 1)].into_iter().collect();
        assert_eq!(q.set_priority(&9, 0), Err(Error::KeyNotFound(9)));
    }

    #[test]
    fn test_infinite_priorities_sort_last() {
        let mut q: PriorityQueue<u32, f64> =
            [(0, f64::INFINITY), (1, 0.0), (2, f64::INFINITY)].into_iter().collect();
        assert_eq!(q.extract_min_with_priority(), Some((1, 0.0)));
        assert_eq!(q.peek_min().map(|(_, p)| p), Some(f64::INFINITY));
    }

    #[test]
    fn test_many_updates_keep_heap_valid() {
        let mut q: PriorityQueue<usize, i64> = (0..50).map(|i| (i, 100 - i as i64)).collect();
        for i in (0..50).step_by(3) {
            q.set_priority(&i, -(i as i64)).unwrap();
        }
        let mut last = i64::MIN;
        while let Some((_, p)) = q.extract_min_with_priority() {
            assert!(p >= last);
            last = p;
        }
    }
}
