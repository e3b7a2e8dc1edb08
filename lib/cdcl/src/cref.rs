use std::fmt::{Display, Formatter};

/// Word offset of a clause inside the [`ClauseAllocator`][crate::clause_allocator::ClauseAllocator].
///
/// A reference is invalidated by garbage collection; holders are rewritten by relocation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct ClauseRef(pub(crate) u32);

impl ClauseRef {
    pub const fn offset(self) -> usize {
        self.0 as usize
    }
}

impl Display for ClauseRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.0)
    }
}
