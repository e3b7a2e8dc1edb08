use crate::clause_allocator::ClauseAllocator;
use crate::cref::ClauseRef;
use crate::idx::LitVec;
use crate::lit::Lit;
use crate::var::Var;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Watcher {
    pub(crate) cref: ClauseRef,
    /// Some other literal of the clause; if it is true, the clause need not be inspected.
    pub(crate) blocker: Lit,
}

/// Per-literal watcher lists.
///
/// A clause `C` is watched by its first two literals: the watcher for `C[i]` is stored
/// in the list of `C[i]` and is visited when `C[i]` becomes false.
///
/// Detaching is lazy: the lists of a deleted clause are only marked dirty ("smudged"),
/// and the stale watchers are purged in bulk by [`WatchList::clean_all`].
#[derive(Debug, Default)]
pub struct WatchList {
    watchlist: LitVec<Vec<Watcher>>,
    dirty: LitVec<bool>,
    dirties: Vec<Lit>,
}

impl WatchList {
    pub const fn new() -> Self {
        Self {
            watchlist: LitVec::new(),
            dirty: LitVec::new(),
            dirties: Vec::new(),
        }
    }

    pub fn init(&mut self, var: Var) {
        let neg = Lit::negative(var);
        self.watchlist.init(&neg);
        self.dirty.init(&neg);
    }

    pub fn lookup(&self, lit: Lit) -> &[Watcher] {
        &self.watchlist[lit]
    }

    pub fn lookup_mut(&mut self, lit: Lit) -> &mut Vec<Watcher> {
        &mut self.watchlist[lit]
    }

    pub fn insert(&mut self, lit: Lit, watch: Watcher) {
        self.watchlist[lit].push(watch);
    }

    /// Mark the list of `lit` as containing watchers of deleted clauses.
    pub fn smudge(&mut self, lit: Lit) {
        if !self.dirty[lit] {
            self.dirty[lit] = true;
            self.dirties.push(lit);
        }
    }

    pub fn is_dirty(&self, lit: Lit) -> bool {
        self.dirty[lit]
    }

    /// Remove watchers of deleted clauses from the list of `lit`.
    pub fn clean(&mut self, lit: Lit, ca: &ClauseAllocator) {
        self.watchlist[lit].retain(|w| !ca.header(w.cref).is_deleted());
        self.dirty[lit] = false;
    }

    /// Clean every smudged list.
    pub fn clean_all(&mut self, ca: &ClauseAllocator) {
        let dirties = std::mem::take(&mut self.dirties);
        for &lit in dirties.iter() {
            // a list may have been cleaned individually in the meantime
            if self.dirty[lit] {
                self.clean(lit, ca);
            }
        }
    }

    /// All watcher lists, for rewriting clause references during relocation.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Vec<Watcher>> {
        self.watchlist.iter_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Lit, &[Watcher])> {
        self.watchlist
            .iter()
            .enumerate()
            .map(|(i, ws)| (Lit::from_code(i as u32), ws.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::MARK_DELETED;

    #[test]
    fn test_smudge_and_clean_all() -> color_eyre::Result<()> {
        let mut ca = ClauseAllocator::new();
        let mut watches = WatchList::new();
        for v in 0..3 {
            watches.init(Var::new(v));
        }
        let a = Lit::from_external(1);
        let b = Lit::from_external(2);
        let c = Lit::from_external(3);

        let keep = ca.alloc(&[a, b], false)?;
        let drop = ca.alloc(&[a, c], true)?;
        for (cref, x, y) in [(keep, a, b), (drop, a, c)] {
            watches.insert(x, Watcher { cref, blocker: y });
            watches.insert(y, Watcher { cref, blocker: x });
        }
        assert_eq!(watches.lookup(a).len(), 2);

        ca.clause_mut(drop).set_mark(MARK_DELETED);
        watches.smudge(a);
        watches.smudge(c);
        watches.smudge(a);
        assert!(watches.is_dirty(a));

        watches.clean_all(&ca);
        assert!(!watches.is_dirty(a));
        assert_eq!(watches.lookup(a), &[Watcher { cref: keep, blocker: b }]);
        assert!(watches.lookup(c).is_empty());
        assert_eq!(watches.lookup(b).len(), 1);
        Ok(())
    }
}
