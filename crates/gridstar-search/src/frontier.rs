//! The open set of the A* search.
//!
//! Entries are kept in a min-heap keyed by `(f, seq)`. `seq` is handed out
//! once per insertion and never compared against cell identity, so ties go to
//! the cell that entered the frontier first. Lowering the key of a member
//! pushes a replacement entry with the same `seq`; the superseded one is
//! skipped when it surfaces.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use gridstar_core::Pos;

#[derive(Debug, Clone, Copy)]
struct Entry {
    f: usize,
    seq: u64,
    idx: usize,
    pos: Pos,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.f.cmp(&other.f).then(self.seq.cmp(&other.seq))
    }
}

/// Result of [`Frontier::push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Push {
    /// The cell was not a member and now is.
    Inserted,
    /// The cell was already a member; its key was lowered.
    Rekeyed,
    /// The cell was already a member with a key at least as low.
    Unchanged,
}

/// Priority frontier with O(1) membership over flat cell indices.
pub(crate) struct Frontier {
    heap: BinaryHeap<Reverse<Entry>>,
    member: Vec<bool>,
    key: Vec<usize>,
    seq_of: Vec<u64>,
    next_seq: u64,
    len: usize,
}

impl Frontier {
    /// An empty frontier for a grid of `cells` cells.
    pub(crate) fn new(cells: usize) -> Self {
        Self {
            heap: BinaryHeap::new(),
            member: vec![false; cells],
            key: vec![usize::MAX; cells],
            seq_of: vec![0; cells],
            next_seq: 0,
            len: 0,
        }
    }

    /// Insert `pos` (at flat index `idx`) with priority `f`, or lower its key
    /// if it is already a member.
    pub(crate) fn push(&mut self, idx: usize, pos: Pos, f: usize) -> Push {
        if self.member[idx] {
            if f >= self.key[idx] {
                return Push::Unchanged;
            }
            self.key[idx] = f;
            let seq = self.seq_of[idx];
            self.heap.push(Reverse(Entry { f, seq, idx, pos }));
            return Push::Rekeyed;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.member[idx] = true;
        self.key[idx] = f;
        self.seq_of[idx] = seq;
        self.len += 1;
        self.heap.push(Reverse(Entry { f, seq, idx, pos }));
        Push::Inserted
    }

    /// Remove and return the member with the lowest `(f, seq)`.
    pub(crate) fn pop(&mut self) -> Option<(usize, Pos)> {
        while let Some(Reverse(entry)) = self.heap.pop() {
            let i = entry.idx;
            // Superseded by a later rekey, or already popped.
            if !self.member[i] || self.key[i] != entry.f || self.seq_of[i] != entry.seq {
                continue;
            }
            self.member[i] = false;
            self.len -= 1;
            return Some((i, entry.pos));
        }
        None
    }

    #[inline]
    pub(crate) fn contains(&self, idx: usize) -> bool {
        self.member[idx]
    }

    /// Number of live members.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }
}
