use std::ops::Index;

use super::{Idx, IdxVec};

/// Position of a key that is not in the heap.
const ABSENT: usize = usize::MAX;

/// Binary heap over dense keys, with a position index enabling `contains` and
/// in-place priority updates.
///
/// The heap does not own the priorities: every operation takes a comparator `cmp`,
/// where `cmp(a, b) == true` means that `a` must be closer to the top than `b`.
/// - Min-heap, when "less-than" comparator is used: `cmp = |&a, &b| a < b`.
/// - Max-heap, when "greater-than" comparator is used: `cmp = |&a, &b| a > b`.
#[derive(Debug, Clone)]
pub struct IdxHeap<K: Idx> {
    heap: Vec<K>,
    index: IdxVec<K, usize>,
}

impl<K: Idx> IdxHeap<K> {
    pub const fn new() -> Self {
        Self {
            heap: Vec::new(),
            index: IdxVec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.get(key).map_or(false, |&i| i != ABSENT)
    }

    pub fn clear(&mut self) {
        for k in self.heap.iter() {
            self.index[k] = ABSENT;
        }
        self.heap.clear();
    }

    /// Peek the top item in the heap.
    pub fn peek(&self) -> Option<&K> {
        self.heap.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, K> {
        self.heap.iter()
    }

    fn parent(i: usize) -> usize {
        (i - 1) >> 1
    }
    fn left(i: usize) -> usize {
        2 * i + 1
    }
    fn right(i: usize) -> usize {
        2 * i + 2
    }
}

impl<K: Idx> Default for IdxHeap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Idx + Ord> IdxHeap<K> {
    fn ord_cmp(a: &K, b: &K) -> bool {
        // Max-heap
        a > b
    }

    pub fn insert(&mut self, key: K) -> bool {
        self.insert_by(key, Self::ord_cmp)
    }
    pub fn pop(&mut self) -> Option<K> {
        self.pop_by(Self::ord_cmp)
    }
}

impl<K: Idx> IdxHeap<K> {
    /// Create a heap holding exactly the given keys (which must be distinct).
    pub fn heapify_by<F>(from: Vec<K>, cmp: F) -> Self
    where
        F: Fn(&K, &K) -> bool,
    {
        let mut this = Self::new();
        this.rebuild_by(from, cmp);
        this
    }

    /// Replace the content of the heap with the given (distinct) keys.
    pub fn rebuild_by<F>(&mut self, keys: Vec<K>, cmp: F)
    where
        F: Fn(&K, &K) -> bool,
    {
        self.clear();
        for (i, k) in keys.iter().enumerate() {
            self.index.init_by(k, || ABSENT);
            debug_assert_eq!(self.index[k], ABSENT, "duplicate key (key.idx() = {})", k.idx());
            self.index[k] = i;
        }
        self.heap = keys;
        if self.heap.len() > 1 {
            for i in (0..=Self::parent(self.heap.len() - 1)).rev() {
                self.sift_down_by(i, &cmp);
            }
        }
    }

    /// Insert the value (`key`) into the heap.
    ///
    /// Returns `false` if `key` is already in the heap.
    pub fn insert_by<F>(&mut self, key: K, cmp: F) -> bool
    where
        F: Fn(&K, &K) -> bool,
    {
        if self.contains(&key) {
            return false;
        }
        let i = self.heap.len();
        self.index.init_by(&key, || ABSENT);
        self.heap.push(key);
        self.sift_up_by(i, cmp);
        true
    }

    /// Remove the top item from the heap.
    ///
    /// Returns [`None`] if the heap is empty.
    pub fn pop_by<F>(&mut self, cmp: F) -> Option<K>
    where
        F: Fn(&K, &K) -> bool,
    {
        if self.heap.is_empty() {
            return None;
        }
        let res = self.heap.swap_remove(0);
        self.index[&res] = ABSENT;
        if !self.heap.is_empty() {
            self.index[&self.heap[0]] = 0;
            self.sift_down_by(0, cmp);
        }
        Some(res)
    }

    /// Restore the heap property after an arbitrary change of the priority of `key`.
    ///
    /// Panics if `key` is not present in the heap.
    pub fn update_by<F>(&mut self, key: K, cmp: F)
    where
        F: Fn(&K, &K) -> bool,
    {
        let i = self.position(&key);
        self.sift_up_by(i, &cmp);
        let i = self.position(&key);
        self.sift_down_by(i, cmp);
    }

    /// Move `key` towards the top after its priority has grown.
    pub fn decrease_by<F>(&mut self, key: K, cmp: F)
    where
        F: Fn(&K, &K) -> bool,
    {
        let i = self.position(&key);
        self.sift_up_by(i, cmp);
    }

    fn position(&self, key: &K) -> usize {
        match self.index.get(key) {
            Some(&i) if i != ABSENT => i,
            _ => panic!("The key (key.idx() = {}) is missing from the heap", key.idx()),
        }
    }

    fn sift_up_by<F>(&mut self, mut i: usize, cmp: F)
    where
        F: Fn(&K, &K) -> bool,
    {
        while i > 0 {
            let p = Self::parent(i);
            if cmp(&self.heap[i], &self.heap[p]) {
                self.index[&self.heap[p]] = i;
                self.heap.swap(i, p);
                i = p;
            } else {
                break;
            }
        }
        self.index[&self.heap[i]] = i;
    }

    fn sift_down_by<F>(&mut self, mut i: usize, cmp: F)
    where
        F: Fn(&K, &K) -> bool,
    {
        loop {
            let l = Self::left(i);
            if l >= self.heap.len() {
                break;
            }
            let r = Self::right(i);
            let c = if r < self.heap.len() && cmp(&self.heap[r], &self.heap[l]) {
                r
            } else {
                l
            };

            if cmp(&self.heap[c], &self.heap[i]) {
                self.index[&self.heap[c]] = i;
                self.heap.swap(c, i);
                i = c;
            } else {
                break;
            }
        }
        self.index[&self.heap[i]] = i;
    }

    pub fn into_sorted_vec_by<F>(mut self, cmp: F) -> Vec<K>
    where
        F: Fn(&K, &K) -> bool,
    {
        let mut res = Vec::with_capacity(self.len());
        while let Some(k) = self.pop_by(&cmp) {
            res.push(k);
        }
        res
    }
}

// heap[i]
impl<K: Idx> Index<usize> for IdxHeap<K> {
    type Output = K;

    fn index(&self, i: usize) -> &Self::Output {
        self.heap.index(i)
    }
}
