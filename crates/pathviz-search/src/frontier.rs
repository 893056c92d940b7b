//! Priority frontier shared by Dijkstra and A*.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Reference into the per-cell arrays, ordered by `f` for use in
/// `BinaryHeap`. Equal keys pop in insertion order.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NodeRef {
    pub(crate) idx: usize,
    pub(crate) f: f64,
    seq: u64,
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NodeRef {}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest f first.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap of cell indices keyed by a cost. Superseded entries are not
/// removed; callers skip them when popped.
#[derive(Debug, Default)]
pub(crate) struct OpenList {
    heap: BinaryHeap<NodeRef>,
    seq: u64,
}

impl OpenList {
    pub(crate) fn push(&mut self, idx: usize, f: f64) {
        self.heap.push(NodeRef { idx, f, seq: self.seq });
        self.seq += 1;
    }

    pub(crate) fn pop(&mut self) -> Option<NodeRef> {
        self.heap.pop()
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }
}
