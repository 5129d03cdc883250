use object::Kind;

use crate::registry::NativeFn;

/// What [`CacheCell::dispatch`] did to satisfy a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The stored kind matched the receiver; the memoized operation was
    /// used and the resolver was not consulted.
    Hit,
    /// The cell was empty; first resolution at this site.
    Filled,
    /// The stored kind differed from the receiver's; the entry was
    /// replaced by the freshly resolved one.
    Invalidated,
}

/// A monomorphic inline cache cell.
///
/// Holds at most one `(kind, operation)` pair: the single most recently
/// validated kind seen at its dispatch site. A new kind always replaces
/// the entry, it is never accumulated alongside. Call sites overwhelmingly
/// see one kind in practice, so a single entry already captures nearly all
/// of the benefit.
///
/// A cached pair can never go stale while its kind still matches: kinds
/// are immutable and the method table never changes after startup, so the
/// equality check in [`probe`](Self::probe) is the entire validity test.
#[derive(Debug, Clone, Copy)]
pub struct CacheCell {
    entry: Option<(Kind, NativeFn)>,
    /// Hit counter for profiling.
    hits: u32,
    /// Miss counter (fills and invalidations).
    misses: u32,
}

impl CacheCell {
    pub const fn empty() -> Self {
        Self {
            entry: None,
            hits: 0,
            misses: 0,
        }
    }

    /// The hit test: the memoized operation, if the stored kind matches.
    #[inline(always)]
    pub fn probe(&self, kind: Kind) -> Option<NativeFn> {
        match self.entry {
            Some((cached, method)) if cached == kind => Some(method),
            _ => None,
        }
    }

    pub fn cached_kind(&self) -> Option<Kind> {
        self.entry.map(|(kind, _)| kind)
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    /// Forget the entry and the counters.
    pub fn reset(&mut self) {
        *self = Self::empty();
    }

    /// Resolve the operation for `kind` at this site.
    ///
    /// The transition is a function of (cell state, receiver kind) alone:
    /// a matching entry short-circuits `resolve`; otherwise `resolve` runs
    /// and its result overwrites the entry. Either way the operation
    /// returned is exactly what `resolve` yields for `kind`; the cell
    /// only changes how fast that answer is obtained.
    ///
    /// A resolver error propagates and leaves the entry unchanged; the
    /// cell never memoizes a failed lookup.
    pub fn dispatch<E>(
        &mut self,
        kind: Kind,
        resolve: impl FnOnce(Kind) -> Result<NativeFn, E>,
    ) -> Result<(NativeFn, DispatchOutcome), E> {
        if let Some(method) = self.probe(kind) {
            self.hits = self.hits.saturating_add(1);
            return Ok((method, DispatchOutcome::Hit));
        }

        let outcome = if self.entry.is_none() {
            DispatchOutcome::Filled
        } else {
            DispatchOutcome::Invalidated
        };
        let method = resolve(kind)?;
        self.misses = self.misses.saturating_add(1);
        self.entry = Some((kind, method));
        Ok((method, outcome))
    }
}

impl Default for CacheCell {
    fn default() -> Self {
        Self::empty()
    }
}
