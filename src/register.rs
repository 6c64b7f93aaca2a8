/// Two-slot result cache: `{current, previous}`.
///
/// Recursive indicators derive each result from the one before it. On a
/// replace they must start again from the result that preceded the one being
/// corrected, which is exactly what [`base`](Register::base) returns.
///
/// Only one level of undo exists. Two consecutive replaces both rebase onto
/// the same `previous`, which is the intended live-bar behaviour; a replace
/// issued *after* a replace that produced no value is undefined and is not
/// checked.
///
/// # Example
///
/// ```
/// use streamta::Register;
///
/// let mut r = Register::default();
/// r.set(1, false);
/// r.set(2, false);
///
/// assert_eq!(r.base(false), Some(2));
/// assert_eq!(r.base(true), Some(1));
///
/// r.set(5, true);
/// assert_eq!(r.get(), Some(5));
/// assert_eq!(r.previous(), Some(1));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Register<T> {
    current: Option<T>,
    previous: Option<T>,
}

impl<T: Copy> Register<T> {
    /// Stores `value`. A plain add shifts `current` into `previous` first; a
    /// replace overwrites `current` only.
    #[inline]
    pub fn set(&mut self, value: T, replace: bool) {
        if !replace {
            self.previous = self.current;
        }
        self.current = Some(value);
    }

    /// Clears `current` for a step that produced no value.
    #[inline]
    pub fn clear(&mut self, replace: bool) {
        if !replace {
            self.previous = self.current;
        }
        self.current = None;
    }

    /// The value a new step builds on: `previous` when replacing, otherwise
    /// `current`.
    #[inline]
    #[must_use]
    pub fn base(&self, replace: bool) -> Option<T> {
        if replace { self.previous } else { self.current }
    }

    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<T> {
        self.current
    }

    #[inline]
    #[must_use]
    pub fn previous(&self) -> Option<T> {
        self.previous
    }
}

/// Single-step snapshot of an arbitrary state record.
///
/// Used by state machines and accumulators (ZigZag, TD setup, VWAP) whose
/// whole state, not just the result, must roll back when the latest
/// observation is replaced.
#[derive(Clone, Debug, Default)]
pub(crate) struct Undo<S> {
    current: S,
    saved: S,
}

impl<S: Clone> Undo<S> {
    pub(crate) fn new(state: S) -> Self {
        Self {
            saved: state.clone(),
            current: state,
        }
    }

    /// Prepares the state for a new step and returns it for mutation.
    ///
    /// A replace restores the snapshot taken before the last add; a plain
    /// add takes a fresh snapshot.
    #[inline]
    pub(crate) fn stage(&mut self, replace: bool) -> &mut S {
        if replace {
            self.current.clone_from(&self.saved);
        } else {
            self.saved.clone_from(&self.current);
        }
        &mut self.current
    }

    #[inline]
    pub(crate) fn get(&self) -> &S {
        &self.current
    }
}
