use std::collections::{VecDeque, vec_deque};

/// Bounded trailing window shared by every windowed indicator.
///
/// Two mutations exist: append-with-eviction and replace-last. The value
/// evicted by an append is handed back to the caller, which lets interval
/// comparisons (momentum, rate of change) read "the value N steps ago"
/// without indexing the buffer.
///
/// # Example
///
/// ```
/// use streamta::Window;
///
/// let mut window = Window::new(2);
///
/// assert_eq!(window.push_update(false, 1), None);
/// assert_eq!(window.push_update(false, 2), None);
/// assert_eq!(window.push_update(false, 3), Some(1));
///
/// // replace overwrites the newest element in place
/// assert_eq!(window.push_update(true, 4), None);
/// assert_eq!(window.iter().copied().collect::<Vec<_>>(), vec![2, 4]);
/// ```
#[derive(Clone, Debug)]
pub struct Window<T> {
    capacity: usize,
    items: VecDeque<T>,
}

impl<T: Copy> Window<T> {
    /// Creates an empty window holding at most `capacity` elements.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Appends `value`, or overwrites the newest element when `replace` is
    /// set. Returns the element evicted by this call, if any.
    ///
    /// Replacing on an empty window appends: the first value cannot be
    /// replaced.
    #[inline]
    pub fn push_update(&mut self, replace: bool, value: T) -> Option<T> {
        if replace && self.replace_last(value).is_some() {
            return None;
        }

        self.push(value)
    }

    /// Appends `value` and returns the evicted oldest element once the window
    /// overflows.
    #[inline]
    pub fn push(&mut self, value: T) -> Option<T> {
        self.items.push_back(value);

        if self.items.len() > self.capacity {
            self.items.pop_front()
        } else {
            None
        }
    }

    /// Overwrites the newest element and returns the overwritten value.
    /// Returns `None` (and stores nothing) when the window is empty.
    #[inline]
    pub fn replace_last(&mut self, value: T) -> Option<T> {
        self.items
            .back_mut()
            .map(|last| std::mem::replace(last, value))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// `true` once the window holds `capacity` elements.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }

    /// Oldest element.
    #[inline]
    #[must_use]
    pub fn front(&self) -> Option<T> {
        self.items.front().copied()
    }

    /// Newest element.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<T> {
        self.items.back().copied()
    }

    /// Element `n` positions before the newest (`nth_back(0)` is the newest).
    #[inline]
    #[must_use]
    pub fn nth_back(&self, n: usize) -> Option<T> {
        self.items
            .len()
            .checked_sub(n + 1)
            .and_then(|i| self.items.get(i).copied())
    }

    /// Iterates from oldest to newest.
    #[inline]
    pub fn iter(&self) -> vec_deque::Iter<'_, T> {
        self.items.iter()
    }
}
