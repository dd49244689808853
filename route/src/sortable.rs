use std::{cmp::Ord, collections::BinaryHeap};
use core::cmp::Ordering;

/// Queue entry ordered by `key` only, reversed so `BinaryHeap` pops the smallest key.
#[derive(Clone, Debug)]
pub struct Sortable<K: Ord, V> {
	pub key: K,
	pub val: V
}

impl<K: Ord, V> Sortable<K, V> {
	pub fn new(key: K, val: V) -> Self { Self { key, val } }
}

impl<K: Ord, V> PartialOrd for Sortable<K, V> {
	fn partial_cmp(&self, other: &Sortable<K, V>) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl<K: Ord, V> Eq for Sortable<K, V> {}
impl<K: Ord, V> Ord for Sortable<K, V> {
	fn cmp(&self, other: &Sortable<K, V>) -> Ordering { self.key.cmp(&other.key).reverse() }
}

impl<K: Ord, V> PartialEq for Sortable<K, V> {
	fn eq(&self, other: &Sortable<K, V>) -> bool { self.key == other.key }
}

/// Binary min-heap keyed by priority, generic over the payload.
/// Entries are never updated in place: callers push again with a better key and
/// skip the stale copies when they come out.
#[derive(Debug)]
pub struct MinQueue<K: Ord, V> {
	heap: BinaryHeap<Sortable<K, V>>,
}

impl<K: Ord, V> MinQueue<K, V> {
	pub fn new() -> Self { Self { heap: BinaryHeap::new() } }
	pub fn with_capacity(capacity: usize) -> Self { Self { heap: BinaryHeap::with_capacity(capacity) } }

	pub fn push(&mut self, key: K, val: V) { self.heap.push(Sortable::new(key, val)) }

	pub fn pop(&mut self) -> Option<(K, V)> { self.heap.pop().map(|s| (s.key, s.val)) }

	pub fn peek_key(&self) -> Option<&K> { self.heap.peek().map(|s| &s.key) }

	pub fn len(&self) -> usize { self.heap.len() }
	pub fn is_empty(&self) -> bool { self.heap.is_empty() }
}

impl<K: Ord, V> Default for MinQueue<K, V> {
	fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod sortable_tests {
	use super::*;

	#[test]
	fn pops_in_ascending_order() {
		let mut q = MinQueue::new();
		for (k, v) in [(5, "e"), (1, "a"), (3, "c"), (2, "b"), (4, "d")] {
			q.push(k, v);
		}
		assert_eq!(q.len(), 5);
		assert_eq!(q.peek_key(), Some(&1));
		let order: Vec<&str> = std::iter::from_fn(|| q.pop().map(|(_, v)| v)).collect();
		assert_eq!(order, vec!["a", "b", "c", "d", "e"]);
		assert!(q.is_empty());
		assert!(q.pop().is_none());
	}

	#[test]
	fn keeps_duplicate_keys() {
		// same payload pushed twice, as lazy deletion does
		let mut q = MinQueue::new();
		q.push(10, 'x');
		q.push(3, 'x');
		q.push(7, 'y');
		assert_eq!(q.pop(), Some((3, 'x')));
		assert_eq!(q.pop(), Some((7, 'y')));
		assert_eq!(q.pop(), Some((10, 'x')));
	}

	#[test]
	fn payload_does_not_affect_order() {
		let a = Sortable::new(1, vec![9, 9, 9]);
		let b = Sortable::new(1, vec![]);
		assert!(a == b);
		assert!(Sortable::new(1, ()) > Sortable::new(2, ()));
	}
}
