//! Re-keyable open set.
//!
//! D* Lite changes the priority of queued vertices constantly: keys go
//! stale whenever `k_m` grows, and vertices leave the queue as soon as they
//! become consistent. [`PriorityQueue`] supports both without rebuilds by
//! keeping an ordered set of `(priority, vertex)` entries alongside an index
//! from vertex to its current priority.

use std::collections::BTreeSet;

use grid_spatial::CellCoord;
use hashbrown::HashMap;
use plan_types::Priority;

/// Open set keyed by [`Priority`], smallest first.
///
/// Every vertex appears at most once. Ties on equal priority are broken by
/// coordinate order, so iteration and popping are deterministic.
///
/// # Example
///
/// ```
/// use grid_spatial::CellCoord;
/// use plan_dstar::queue::PriorityQueue;
/// use plan_types::Priority;
///
/// let mut open = PriorityQueue::new();
/// let a = CellCoord::new(0, 0);
/// let b = CellCoord::new(1, 0);
///
/// open.insert_or_replace(a, Priority::new(5.0, 1.0));
/// open.insert_or_replace(b, Priority::new(3.0, 2.0));
/// assert_eq!(open.top(), Some(b));
///
/// // Re-keying moves an entry rather than duplicating it
/// open.insert_or_replace(b, Priority::new(9.0, 0.0));
/// assert_eq!(open.len(), 2);
/// assert_eq!(open.top(), Some(a));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PriorityQueue {
    ordered: BTreeSet<(Priority, CellCoord)>,
    index: HashMap<CellCoord, Priority>,
}

impl PriorityQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `vertex` with `priority`, replacing any existing priority.
    pub fn insert_or_replace(&mut self, vertex: CellCoord, priority: Priority) {
        if let Some(old) = self.index.insert(vertex, priority) {
            self.ordered.remove(&(old, vertex));
        }
        self.ordered.insert((priority, vertex));
    }

    /// Removes `vertex` and returns its priority. No-op if absent.
    pub fn remove(&mut self, vertex: CellCoord) -> Option<Priority> {
        let old = self.index.remove(&vertex)?;
        self.ordered.remove(&(old, vertex));
        Some(old)
    }

    /// Returns the vertex with the smallest priority.
    #[must_use]
    pub fn top(&self) -> Option<CellCoord> {
        self.ordered.first().map(|&(_, vertex)| vertex)
    }

    /// Returns the smallest priority, or [`Priority::INFINITE`] if empty.
    #[must_use]
    pub fn top_key(&self) -> Priority {
        self.ordered
            .first()
            .map_or(Priority::INFINITE, |&(priority, _)| priority)
    }

    /// Removes and returns the entry with the smallest priority.
    pub fn pop(&mut self) -> Option<(CellCoord, Priority)> {
        let (priority, vertex) = self.ordered.pop_first()?;
        self.index.remove(&vertex);
        Some((vertex, priority))
    }

    /// Returns `true` if `vertex` is queued.
    #[must_use]
    pub fn contains(&self, vertex: CellCoord) -> bool {
        self.index.contains_key(&vertex)
    }

    /// Returns the current priority of `vertex`, if queued.
    #[must_use]
    pub fn priority_of(&self, vertex: CellCoord) -> Option<Priority> {
        self.index.get(&vertex).copied()
    }

    /// Returns the number of queued vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if no vertex is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.ordered.clear();
        self.index.clear();
    }

    /// Iterates over entries in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Priority)> + '_ {
        self.ordered.iter().map(|&(priority, vertex)| (vertex, priority))
    }
}
