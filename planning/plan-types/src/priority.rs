//! Lexicographic priority keys for the open set.

use std::cmp::Ordering;
use std::fmt;

/// Largest difference at which two key components still compare equal.
pub const KEY_TOLERANCE: f64 = 1e-9;

/// Two-component priority `(k1, k2)` ordered lexicographically, smallest first.
///
/// For a vertex `v` a planner sets
/// `k1 = min(g, rhs) + h(start, v) + k_m` and `k2 = min(g, rhs)`.
/// Components may be `+∞`; infinite keys sort after every finite key and two
/// infinite keys are equal.
///
/// Components closer than [`KEY_TOLERANCE`] compare equal. Sums of
/// irrational step costs (`√2` under octile or Euclidean metrics) that agree
/// in exact arithmetic can differ in the last bit; those keys tie on `k1` and
/// are ordered by `k2` as the search requires.
///
/// # Example
///
/// ```
/// use plan_types::Priority;
///
/// let a = Priority::new(3.0, 1.0);
/// let b = Priority::new(3.0, 2.0);
/// let c = Priority::new(2.5, 9.0);
///
/// assert!(a < b);   // k1 tie, k2 decides
/// assert!(c < a);   // k1 decides
/// assert!(b < Priority::INFINITE);
///
/// // 0.1 + 0.2 != 0.3 in binary, but the keys still tie on k1
/// assert!(Priority::new(0.1 + 0.2, 1.0) < Priority::new(0.3, 2.0));
/// ```
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Priority {
    /// Primary key.
    pub k1: f64,
    /// Secondary key, breaks ties on `k1`.
    pub k2: f64,
}

impl Priority {
    /// The key reported for an empty open set.
    pub const INFINITE: Self = Self::new(f64::INFINITY, f64::INFINITY);

    /// Creates a priority from its two components.
    #[must_use]
    pub const fn new(k1: f64, k2: f64) -> Self {
        Self { k1, k2 }
    }

    /// Returns `true` if both components are finite.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.k1.is_finite() && self.k2.is_finite()
    }
}

impl PartialEq for Priority {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Priority {}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_component(self.k1, other.k1)
            .then_with(|| compare_component(self.k2, other.k2))
    }
}

fn compare_component(a: f64, b: f64) -> Ordering {
    match a.total_cmp(&b) {
        Ordering::Equal => Ordering::Equal,
        _ if (a - b).abs() <= KEY_TOLERANCE => Ordering::Equal,
        ordering => ordering,
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.3}, {:.3}]", self.k1, self.k2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicographic_order() {
        assert!(Priority::new(1.0, 5.0) < Priority::new(2.0, 0.0));
        assert!(Priority::new(2.0, 0.0) < Priority::new(2.0, 0.5));
        assert_eq!(Priority::new(2.0, 1.0), Priority::new(2.0, 1.0));
    }

    #[test]
    fn test_infinite_sorts_last() {
        let finite = Priority::new(1e300, 1e300);
        assert!(finite < Priority::INFINITE);
        assert_eq!(Priority::INFINITE, Priority::new(f64::INFINITY, f64::INFINITY));
        assert!(Priority::new(f64::INFINITY, 0.0) < Priority::INFINITE);
    }

    #[test]
    fn test_rounding_noise_ties_on_k1() {
        let exact = 3.0 * std::f64::consts::SQRT_2 + 1.0;
        let summed = std::f64::consts::SQRT_2 + std::f64::consts::SQRT_2 + 1.0 + std::f64::consts::SQRT_2;
        let underconsistent = Priority::new(summed, 1.0);
        let start = Priority::new(exact, exact);

        assert!(underconsistent < start);
        assert_eq!(Priority::new(summed, 2.0), Priority::new(exact, 2.0));
        assert!(Priority::new(exact + 1e-6, 0.0) > Priority::new(exact, 5.0));
    }

    #[test]
    fn test_infinite_components_with_tolerance() {
        assert!(Priority::new(f64::INFINITY, 0.0) > Priority::new(1e12, 1e12));
        assert!(Priority::new(2.0, f64::INFINITY) > Priority::new(2.0 + 1e-12, 3.0));
    }

    #[test]
    fn test_is_finite() {
        assert!(Priority::new(0.0, 0.0).is_finite());
        assert!(!Priority::new(1.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_sort_stability_for_ties() {
        let mut keys = vec![
            Priority::new(4.0, 4.0),
            Priority::new(4.0, 1.0),
            Priority::new(0.0, 9.0),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                Priority::new(0.0, 9.0),
                Priority::new(4.0, 1.0),
                Priority::new(4.0, 4.0),
            ]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Priority::new(1.0, 0.5).to_string(), "[1.000, 0.500]");
    }
}
