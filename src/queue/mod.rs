//! Generic comparator-driven priority queue.
//!
//! A binary max-heap over a caller-supplied total order: the element that
//! compares [`Ordering::Greater`] than every other element sits at the root
//! and is returned first. The request scheduler uses this with
//! [`crate::request::request_comparator`] so the highest-priority pending
//! request is always the next one admitted.

use crate::error::{HelpstartError, Result};
use std::cmp::Ordering;


/// Binary max-heap over a caller-supplied comparator.
pub struct PriorityQueue<T> {
    heap: Vec<T>,
    comparator: Box<dyn Fn(&T, &T) -> Ordering>,
}

impl<T> PriorityQueue<T> {
    /// Create an empty queue ordered by `comparator`. Elements that compare
    /// greater are popped first.
    pub fn new(comparator: impl Fn(&T, &T) -> Ordering + 'static) -> Self {
        Self {
            heap: Vec::new(),
            comparator: Box::new(comparator),
        }
    }

    /// Number of queued elements.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the queue holds no elements.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// The greatest element without removing it, or `None` when empty.
    pub fn peek(&self) -> Option<&T> {
        self.heap.first()
    }

    /// Insert an element, sifting it up until the heap order holds again.
    /// Amortized O(log n).
    pub fn push(&mut self, element: T) {
        self.heap.push(element);
        let mut index = self.heap.len() - 1;
        while index > 0 {
            let parent = (index - 1) / 2;
            if (self.comparator)(&self.heap[parent], &self.heap[index]) != Ordering::Less {
                break;
            }
            self.heap.swap(parent, index);
            index = parent;
        }
    }

    /// Remove and return the greatest element.
    ///
    /// Errors with [`HelpstartError::EmptyQueue`] when the queue is empty;
    /// callers are expected to check `peek`/`len` first.
    pub fn pop(&mut self) -> Result<T> {
        if self.heap.is_empty() {
            return Err(HelpstartError::EmptyQueue);
        }

        let root = self.heap.swap_remove(0);
        let len = self.heap.len();
        let mut index = 0;
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }

            let right = left + 1;
            let mut greater = left;
            if right < len
                && (self.comparator)(&self.heap[left], &self.heap[right]) == Ordering::Less
            {
                greater = right;
            }

            if (self.comparator)(&self.heap[greater], &self.heap[index]) == Ordering::Less {
                break;
            }
            self.heap.swap(index, greater);
            index = greater;
        }

        Ok(root)
    }

    /// Drop every element, leaving an empty queue.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Iterate a snapshot of the queue in descending comparator order.
    ///
    /// The snapshot is fully materialized up front; iterating never mutates
    /// the heap and an empty queue simply yields nothing.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let mut snapshot: Vec<&T> = self.heap.iter().collect();
        snapshot.sort_by(|a, b| (self.comparator)(a, b).reverse());
        snapshot.into_iter()
    }
}

impl<T> std::fmt::Debug for PriorityQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("len", &self.heap.len())
            .finish()
    }
}
