use snafu::ensure;
use tracing::trace;

use crate::clause::{Clause, ClauseHeader, ClauseMut, MAX_CLAUSE_SIZE};
use crate::cref::ClauseRef;
use crate::error::{OutOfMemorySnafu, Result};
use crate::lit::Lit;

/// Maximum arena size (in words) addressable by a 32-bit [`ClauseRef`].
pub const MAX_ARENA_WORDS: usize = u32::MAX as usize;

/// Region allocator holding every clause in one contiguous `Vec<u32>`.
///
/// Each clause occupies `1 + size (+ 1 for learnts)` words: the header, the literals,
/// and the activity of learnt clauses. Freed clauses are only accounted as `wasted`;
/// memory is reclaimed by relocating the live clauses into a fresh allocator.
#[derive(Debug)]
pub struct ClauseAllocator {
    memory: Vec<u32>,
    wasted: usize,
    limit: usize,
    peak: usize,
}

impl ClauseAllocator {
    pub const fn new() -> Self {
        Self::with_limit(MAX_ARENA_WORDS)
    }

    /// Allocator refusing to grow beyond `limit` words.
    pub const fn with_limit(limit: usize) -> Self {
        let limit = if limit < MAX_ARENA_WORDS { limit } else { MAX_ARENA_WORDS };
        Self {
            memory: Vec::new(),
            wasted: 0,
            limit,
            peak: 0,
        }
    }

    /// Empty allocator sharing the limit of `self`, pre-sized for `capacity` words.
    pub fn fresh_with_capacity(&self, capacity: usize) -> Result<Self> {
        let mut to = Self::with_limit(self.limit);
        to.reserve_to(capacity)?;
        Ok(to)
    }
}

impl Default for ClauseAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl ClauseAllocator {
    /// Number of words in use (including wasted ones).
    pub fn len(&self) -> usize {
        self.memory.len()
    }
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }
    pub fn wasted(&self) -> usize {
        self.wasted
    }
    pub fn capacity(&self) -> usize {
        self.memory.capacity()
    }
    pub fn limit(&self) -> usize {
        self.limit
    }
    /// Largest `len` ever reached, carried over garbage collections.
    pub fn peak(&self) -> usize {
        self.peak
    }

    /// Grow the capacity geometrically (by ~1.5x) until it covers `min_cap` words.
    fn reserve_to(&mut self, min_cap: usize) -> Result<()> {
        let mut cap = self.memory.capacity();
        if cap >= min_cap {
            return Ok(());
        }
        ensure!(
            min_cap <= self.limit,
            OutOfMemorySnafu {
                requested: min_cap,
                limit: self.limit
            }
        );
        while cap < min_cap {
            let delta = ((cap >> 1) + (cap >> 3) + 2) & !1;
            cap = match cap.checked_add(delta) {
                Some(c) => c,
                None => break,
            };
        }
        let cap = cap.clamp(min_cap, self.limit);
        if self.memory.try_reserve_exact(cap - self.memory.len()).is_err() {
            return OutOfMemorySnafu {
                requested: cap,
                limit: self.limit,
            }
            .fail();
        }
        trace!("arena capacity grown to {} words", self.memory.capacity());
        Ok(())
    }

    fn push_words<I>(&mut self, header: ClauseHeader, rest: I) -> Result<ClauseRef>
    where
        I: IntoIterator<Item = u32>,
    {
        let start = self.memory.len();
        let end = start.checked_add(header.words()).unwrap_or(usize::MAX);
        self.reserve_to(end)?;
        self.memory.push(header.word());
        self.memory.extend(rest);
        debug_assert_eq!(self.memory.len(), end);
        self.peak = self.peak.max(end);
        Ok(ClauseRef(start as u32))
    }

    pub fn alloc(&mut self, lits: &[Lit], learnt: bool) -> Result<ClauseRef> {
        assert!(!lits.is_empty(), "clause must have at least one literal");
        ensure!(
            lits.len() <= MAX_CLAUSE_SIZE,
            OutOfMemorySnafu {
                requested: lits.len(),
                limit: MAX_CLAUSE_SIZE
            }
        );
        let header = ClauseHeader::new(lits.len(), learnt);
        let extra = learnt.then(|| 0f32.to_bits());
        self.push_words(header, lits.iter().map(|lit| lit.inner()).chain(extra))
    }

    /// Account the clause as garbage. The clause stays readable until the next collection.
    pub fn free(&mut self, cref: ClauseRef) {
        self.wasted += self.header(cref).words();
    }

    /// Drop the trailing literals of the clause, keeping the first `new_size` ones.
    pub fn shrink(&mut self, cref: ClauseRef, new_size: usize) {
        let header = self.header(cref);
        let size = header.size();
        assert!(new_size >= 1 && new_size <= size);
        let off = cref.offset();
        if header.has_extra() {
            self.memory[off + 1 + new_size] = self.memory[off + 1 + size];
        }
        self.memory[off] = header.with_size(new_size).word();
        self.wasted += size - new_size;
    }

    /// Move the clause into `to` (once) and rewrite `cref` to the new location.
    ///
    /// The first relocation leaves a forwarding pointer in place of the first literal,
    /// so that every further holder of the old reference is redirected to the same copy.
    pub fn reloc(&mut self, cref: &mut ClauseRef, to: &mut ClauseAllocator) -> Result<()> {
        let off = cref.offset();
        let header = self.header(*cref);
        if header.reloced() {
            *cref = ClauseRef(self.memory[off + 1]);
            return Ok(());
        }
        let new = to.push_words(header, self.memory[off + 1..off + header.words()].iter().copied())?;
        self.memory[off] = header.with_reloced().word();
        self.memory[off + 1] = new.0;
        *cref = new;
        Ok(())
    }

    /// Replace `self` with the compacted allocator produced by relocation.
    pub fn replace_with(&mut self, mut to: ClauseAllocator) {
        to.peak = to.peak.max(self.peak);
        *self = to;
    }

    pub fn header(&self, cref: ClauseRef) -> ClauseHeader {
        ClauseHeader::from_word(self.memory[cref.offset()])
    }

    pub fn is_reloced(&self, cref: ClauseRef) -> bool {
        self.header(cref).reloced()
    }

    pub fn clause(&self, cref: ClauseRef) -> Clause<'_> {
        let off = cref.offset();
        debug_assert!(!self.header(cref).reloced(), "access to relocated clause {}", cref);
        Clause::new(&self.memory[off..off + self.header(cref).words()])
    }

    pub fn clause_mut(&mut self, cref: ClauseRef) -> ClauseMut<'_> {
        let off = cref.offset();
        debug_assert!(!self.header(cref).reloced(), "access to relocated clause {}", cref);
        let end = off + self.header(cref).words();
        ClauseMut::new(&mut self.memory[off..end])
    }
}
