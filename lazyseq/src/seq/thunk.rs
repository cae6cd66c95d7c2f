use std::cell::RefCell;
use std::fmt;

/// Deferred computation stored in a [`Thunk`].
type Compute<V> = Box<dyn FnOnce() -> V>;

/// Resolution state of a [`Thunk`]
enum ThunkState<V> {
    /// Computation not run yet
    Unresolved(Compute<V>),
    /// Computation taken out of the cell and currently running
    Resolving,
    /// Computation finished, value cached
    Resolved(V),
}

/// One-shot memoization cell.
///
/// The computation runs at most once, on the first [`Thunk::force`]. Every
/// later call hands out a clone of the cached value. The computation is
/// moved out of the cell before it runs, so it may force other cells; forcing
/// the same cell from inside its own computation is a cycle and panics.
pub(crate) struct Thunk<V> {
    state: RefCell<ThunkState<V>>,
}

impl<V> Thunk<V> {
    pub(crate) fn deferred(compute: impl FnOnce() -> V + 'static) -> Self {
        Self {
            state: RefCell::new(ThunkState::Unresolved(Box::new(compute))),
        }
    }

    pub(crate) fn resolved(value: V) -> Self {
        Self {
            state: RefCell::new(ThunkState::Resolved(value)),
        }
    }

    pub(crate) fn is_resolved(&self) -> bool {
        matches!(&*self.state.borrow(), ThunkState::Resolved(_))
    }

    /// Runs `f` on the cached value without forcing anything.
    pub(crate) fn peek_with<R>(&self, f: impl FnOnce(&V) -> R) -> Option<R> {
        match &*self.state.borrow() {
            ThunkState::Resolved(value) => Some(f(value)),
            _ => None,
        }
    }

    /// Moves the cached value out, leaving the cell spent. Only used while
    /// tearing a chain down.
    pub(crate) fn take_resolved(&mut self) -> Option<V> {
        let state = self.state.get_mut();
        match std::mem::replace(state, ThunkState::Resolving) {
            ThunkState::Resolved(value) => Some(value),
            other => {
                *state = other;
                None
            }
        }
    }
}

impl<V: Clone> Thunk<V> {
    pub(crate) fn force(&self) -> V {
        let state = std::mem::replace(&mut *self.state.borrow_mut(), ThunkState::Resolving);
        let compute = match state {
            ThunkState::Resolved(value) => {
                let out = value.clone();
                *self.state.borrow_mut() = ThunkState::Resolved(value);
                return out;
            }
            ThunkState::Unresolved(compute) => compute,
            ThunkState::Resolving => {
                tracing::trace!("cycle detected while forcing lazy value");
                panic!("lazy value forced while it was being computed");
            }
        };

        let value = compute();
        *self.state.borrow_mut() = ThunkState::Resolved(value.clone());
        value
    }

    pub(crate) fn peek(&self) -> Option<V> {
        self.peek_with(V::clone)
    }
}

impl<V: fmt::Debug> fmt::Debug for Thunk<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.state.borrow() {
            ThunkState::Unresolved(_) => write!(f, "Thunk(<unresolved>)"),
            ThunkState::Resolving => write!(f, "Thunk(<resolving>)"),
            ThunkState::Resolved(value) => write!(f, "Thunk({value:?})"),
        }
    }
}

/// Cached answer to "is this element excluded from the logical output?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    /// Not evaluated yet, or nothing to evaluate
    Unknown,
    /// Element is skipped by every consumer
    Excluded,
    /// Element is part of the visible output
    Included,
}

impl Verdict {
    pub(crate) fn from_excluded(excluded: bool) -> Self {
        if excluded {
            Verdict::Excluded
        } else {
            Verdict::Included
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn force_runs_computation_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let thunk = Thunk::deferred(move || {
            counter.set(counter.get() + 1);
            42
        });

        assert!(!thunk.is_resolved());
        assert_eq!(thunk.force(), 42);
        assert_eq!(thunk.force(), 42);
        assert!(thunk.is_resolved());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn peek_does_not_force() {
        let thunk = Thunk::deferred(|| "value".to_string());
        assert_eq!(thunk.peek(), None);

        thunk.force();
        assert_eq!(thunk.peek(), Some("value".to_string()));
    }

    #[test]
    fn take_resolved_only_yields_cached_values() {
        let mut pending = Thunk::deferred(|| 1);
        assert_eq!(pending.take_resolved(), None);
        assert_eq!(pending.force(), 1);

        let mut ready = Thunk::resolved(2);
        assert_eq!(ready.take_resolved(), Some(2));
        assert_eq!(ready.take_resolved(), None);
    }

    #[test]
    fn debug_shows_resolution_state() {
        let thunk = Thunk::deferred(|| 7);
        assert_eq!(format!("{thunk:?}"), "Thunk(<unresolved>)");
        thunk.force();
        assert_eq!(format!("{thunk:?}"), "Thunk(7)");
    }
}
