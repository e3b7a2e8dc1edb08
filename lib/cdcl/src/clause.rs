use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::lbool::LBool;
use crate::lit::Lit;

const MARK_MASK: u32 = 0b11;
const LEARNT_BIT: u32 = 1 << 2;
const EXTRA_BIT: u32 = 1 << 3;
const RELOCED_BIT: u32 = 1 << 4;
const SIZE_SHIFT: u32 = 5;

/// Largest number of literals a single clause can hold.
pub const MAX_CLAUSE_SIZE: usize = (u32::MAX >> SIZE_SHIFT) as usize;

/// Mark value of a logically deleted clause.
pub const MARK_DELETED: u32 = 1;

/// First word of every clause in the arena.
///
/// Layout: `mark:2 | learnt:1 | has_extra:1 | reloced:1 | size:27`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(transparent)]
pub struct ClauseHeader(u32);

impl ClauseHeader {
    pub(crate) fn new(size: usize, learnt: bool) -> Self {
        debug_assert!(size <= MAX_CLAUSE_SIZE);
        let mut bits = (size as u32) << SIZE_SHIFT;
        if learnt {
            // learnt clauses carry their activity in the extra word
            bits |= LEARNT_BIT | EXTRA_BIT;
        }
        Self(bits)
    }

    pub(crate) const fn from_word(word: u32) -> Self {
        Self(word)
    }

    pub(crate) const fn word(self) -> u32 {
        self.0
    }

    pub const fn size(self) -> usize {
        (self.0 >> SIZE_SHIFT) as usize
    }

    pub(crate) fn with_size(self, size: usize) -> Self {
        debug_assert!(size <= MAX_CLAUSE_SIZE);
        Self((self.0 & ((1 << SIZE_SHIFT) - 1)) | (size as u32) << SIZE_SHIFT)
    }

    pub const fn mark(self) -> u32 {
        self.0 & MARK_MASK
    }

    pub(crate) fn with_mark(self, mark: u32) -> Self {
        Self((self.0 & !MARK_MASK) | (mark & MARK_MASK))
    }

    pub const fn is_deleted(self) -> bool {
        self.mark() == MARK_DELETED
    }

    pub const fn learnt(self) -> bool {
        self.0 & LEARNT_BIT != 0
    }

    pub const fn has_extra(self) -> bool {
        self.0 & EXTRA_BIT != 0
    }

    pub const fn reloced(self) -> bool {
        self.0 & RELOCED_BIT != 0
    }

    pub(crate) fn with_reloced(self) -> Self {
        Self(self.0 | RELOCED_BIT)
    }

    /// Number of arena words occupied by the clause.
    pub const fn words(self) -> usize {
        1 + self.size() + self.has_extra() as usize
    }
}

/// Read-only view of a clause stored in the arena.
#[derive(Debug, Copy, Clone)]
pub struct Clause<'a> {
    words: &'a [u32],
}

impl<'a> Clause<'a> {
    pub(crate) fn new(words: &'a [u32]) -> Self {
        debug_assert_eq!(ClauseHeader::from_word(words[0]).words(), words.len());
        Self { words }
    }

    pub fn header(&self) -> ClauseHeader {
        ClauseHeader::from_word(self.words[0])
    }

    pub fn len(&self) -> usize {
        self.header().size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_learnt(&self) -> bool {
        self.header().learnt()
    }

    pub fn is_deleted(&self) -> bool {
        self.header().is_deleted()
    }

    pub fn lit(&self, i: usize) -> Lit {
        debug_assert!(i < self.len());
        Lit::from_code(self.words[1 + i])
    }

    pub fn lits(&self) -> impl Iterator<Item = Lit> + 'a {
        let words: &'a [u32] = self.words;
        words[1..=self.len()].iter().map(|&w| Lit::from_code(w))
    }

    pub fn to_vec(&self) -> Vec<Lit> {
        self.lits().collect()
    }

    /// Activity of a learnt clause; `0.0` for original clauses.
    pub fn activity(&self) -> f32 {
        if self.header().has_extra() {
            f32::from_bits(self.words[1 + self.len()])
        } else {
            0.0
        }
    }

    /// Value of the clause under the given literal valuation:
    /// `True` if some literal is true, `False` if all are false, `Undef` otherwise.
    pub fn evaluate<F>(&self, value: F) -> LBool
    where
        F: Fn(Lit) -> LBool,
    {
        let mut res = LBool::False;
        for lit in self.lits() {
            match value(lit) {
                LBool::True => return LBool::True,
                LBool::Undef => res = LBool::Undef,
                LBool::False => {}
            }
        }
        res
    }
}

impl Display for Clause<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.lits().join(", "))
    }
}

/// Mutable view of a clause stored in the arena.
#[derive(Debug)]
pub struct ClauseMut<'a> {
    words: &'a mut [u32],
}

impl<'a> ClauseMut<'a> {
    pub(crate) fn new(words: &'a mut [u32]) -> Self {
        debug_assert_eq!(ClauseHeader::from_word(words[0]).words(), words.len());
        Self { words }
    }

    pub fn as_ref(&self) -> Clause<'_> {
        Clause::new(self.words)
    }

    pub fn len(&self) -> usize {
        ClauseHeader::from_word(self.words[0]).size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn lit(&self, i: usize) -> Lit {
        debug_assert!(i < self.len());
        Lit::from_code(self.words[1 + i])
    }

    pub fn set_lit(&mut self, i: usize, lit: Lit) {
        debug_assert!(i < self.len());
        self.words[1 + i] = lit.inner();
    }

    pub fn swap(&mut self, i: usize, j: usize) {
        debug_assert!(i < self.len() && j < self.len());
        self.words.swap(1 + i, 1 + j);
    }

    pub fn set_activity(&mut self, activity: f32) {
        let header = ClauseHeader::from_word(self.words[0]);
        debug_assert!(header.has_extra(), "only learnt clauses have activity");
        self.words[1 + header.size()] = activity.to_bits();
    }

    pub fn set_mark(&mut self, mark: u32) {
        self.words[0] = ClauseHeader::from_word(self.words[0]).with_mark(mark).word();
    }
}
