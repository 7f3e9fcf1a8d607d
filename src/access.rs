//! Debug-only exclusive-access guard.
//!
//! `HashTable` calls into user code (`K: Eq`, `K: Hash`) while walking
//! chains. If that code reaches back into the same table, it would
//! observe a half-finished operation. In debug builds, entering a
//! table that is already inside an operation panics and names the phase
//! it was in. In release builds the guard is a zero-sized no-op.
//!
//! The tracker keeps its owner `Send` (a table can be moved into a
//! `Mutex`) and `!Sync` in every build profile.

use core::cell::Cell;
use core::marker::PhantomData;

/// What the table is doing while a guard is held. Rehashing runs inside
/// the `put` that triggered it and calls no user code, so it needs no
/// phase of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(not(debug_assertions), allow(dead_code))]
pub(crate) enum Phase {
    Stable,
    Probing,
}

#[derive(Debug)]
pub(crate) struct DebugAccess {
    #[cfg(debug_assertions)]
    phase: Cell<Phase>,
    // Present in release builds too, where `phase` is compiled out.
    _not_sync: PhantomData<Cell<()>>,
}

impl DebugAccess {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            phase: Cell::new(Phase::Stable),
            _not_sync: PhantomData,
        }
    }

    /// Start an operation. In debug builds, panics if one is in progress.
    #[inline]
    pub(crate) fn enter(&self, phase: Phase) -> AccessGuard<'_> {
        #[cfg(debug_assertions)]
        {
            let current = self.phase.get();
            assert!(
                current == Phase::Stable,
                "reentrant access to HashTable while {current:?}"
            );
            self.phase.set(phase);
            return AccessGuard { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = phase;
            return AccessGuard { _z: PhantomData };
        }
    }

    #[cfg(all(test, debug_assertions))]
    pub(crate) fn phase(&self) -> Phase {
        self.phase.get()
    }
}

impl Default for DebugAccess {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard returned by `DebugAccess::enter`; restores `Phase::Stable`.
pub(crate) struct AccessGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugAccess,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for AccessGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.owner.phase.set(Phase::Stable);
    }
}
