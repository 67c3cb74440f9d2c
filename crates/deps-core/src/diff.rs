//! Dependency set difference under approximate score equality.
//!
//! Both sides are indexed by name. A dependency lands in its side's output
//! when the other side has no entry with that name, or has one that is not
//! [`Dependency::is_equivalent`]. A changed score therefore shows up once in
//! each output: callers delete the old row and insert the new one.

use std::collections::HashMap;

use crate::entities::Dependency;

/// Result of [`diff`]. Each list is sorted by dependency name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyDiff {
    /// Present in `current` but absent or different in `incoming`.
    pub only_in_current: Vec<Dependency>,
    /// Present in `incoming` but absent or different in `current`.
    pub only_in_incoming: Vec<Dependency>,
}

impl DependencyDiff {
    /// True when the two sets were equivalent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.only_in_current.is_empty() && self.only_in_incoming.is_empty()
    }
}

/// Compute the symmetric difference between a stored and a freshly fetched set.
///
/// Input order does not affect the result. If a side lists the same name
/// twice, the last occurrence is the one compared against.
#[must_use]
pub fn diff(current: &[Dependency], incoming: &[Dependency]) -> DependencyDiff {
    DependencyDiff {
        only_in_current: one_side(current, &index(incoming)),
        only_in_incoming: one_side(incoming, &index(current)),
    }
}

fn index(deps: &[Dependency]) -> HashMap<&str, &Dependency> {
    deps.iter().map(|d| (d.name.as_str(), d)).collect()
}

fn one_side(side: &[Dependency], other: &HashMap<&str, &Dependency>) -> Vec<Dependency> {
    let mut out: Vec<Dependency> = side
        .iter()
        .filter(|d| {
            other
                .get(d.name.as_str())
                .is_none_or(|o| !d.is_equivalent(o))
        })
        .cloned()
        .collect();
    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn dep(name: &str, score: f64) -> Dependency {
        Dependency::new(name, score, 1_700_000_000)
    }

    fn names(deps: &[Dependency]) -> Vec<&str> {
        deps.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn identical_sets_produce_empty_diff() {
        let a = vec![dep("rxjs", 7.1), dep("tslib", 5.0), dep("zone.js", 6.4)];
        let result = diff(&a, &a);
        assert!(result.is_empty());
    }

    #[test]
    fn both_empty() {
        assert!(diff(&[], &[]).is_empty());
    }

    #[test]
    fn added_and_removed_names() {
        let current = vec![dep("rxjs", 7.1), dep("zone.js", 6.4)];
        let incoming = vec![dep("rxjs", 7.1), dep("tslib", 5.0)];
        let result = diff(&current, &incoming);
        assert_eq!(names(&result.only_in_current), vec!["zone.js"]);
        assert_eq!(names(&result.only_in_incoming), vec!["tslib"]);
    }

    #[test]
    fn changed_score_appears_on_both_sides() {
        let current = vec![dep("rxjs", 7.1)];
        let incoming = vec![dep("rxjs", 8.0)];
        let result = diff(&current, &incoming);
        assert_eq!(result.only_in_current, vec![dep("rxjs", 7.1)]);
        assert_eq!(result.only_in_incoming, vec![dep("rxjs", 8.0)]);
    }

    #[test]
    fn changed_timestamp_appears_on_both_sides() {
        let current = vec![Dependency::new("rxjs", 7.1, 100)];
        let incoming = vec![Dependency::new("rxjs", 7.1, 0)];
        let result = diff(&current, &incoming);
        assert_eq!(result.only_in_current.len(), 1);
        assert_eq!(result.only_in_incoming.len(), 1);
    }

    #[test]
    fn empty_current_means_everything_is_new() {
        let incoming = vec![dep("b", 1.0), dep("a", 2.0)];
        let result = diff(&[], &incoming);
        assert!(result.only_in_current.is_empty());
        assert_eq!(names(&result.only_in_incoming), vec!["a", "b"]);
    }

    #[test]
    fn empty_incoming_means_everything_is_removed() {
        let current = vec![dep("a", 1.0), dep("b", 2.0)];
        let result = diff(&current, &[]);
        assert_eq!(names(&result.only_in_current), vec!["a", "b"]);
        assert!(result.only_in_incoming.is_empty());
    }

    #[test]
    fn input_order_is_irrelevant() {
        let a = vec![dep("a", 1.0), dep("b", 2.0), dep("c", 3.0), dep("d", 4.0)];
        let mut shuffled = a.clone();
        shuffled.reverse();
        shuffled.swap(0, 2);
        let b = vec![dep("c", 3.0), dep("e", 5.0), dep("a", 1.5)];

        let mut b_shuffled = b.clone();
        b_shuffled.rotate_left(1);

        assert_eq!(diff(&a, &b), diff(&shuffled, &b));
        assert_eq!(diff(&a, &b), diff(&shuffled, &b_shuffled));
    }

    #[test]
    fn swapping_arguments_swaps_outputs() {
        let a = vec![dep("a", 1.0), dep("b", 2.0)];
        let b = vec![dep("b", 2.5), dep("c", 3.0)];
        let forward = diff(&a, &b);
        let backward = diff(&b, &a);
        assert_eq!(forward.only_in_current, backward.only_in_incoming);
        assert_eq!(forward.only_in_incoming, backward.only_in_current);
    }

    #[rstest]
    #[case::within_tolerance(1.000_000_000_5, 1.000_000_000_4, true)]
    #[case::exactly_equal(81.5, 81.5, true)]
    #[case::at_tolerance_edge(0.0, 1e-9, true)]
    #[case::far_apart(1.0, 1.000_01, false)]
    #[case::integer_step(3.0, 4.0, false)]
    fn tolerance_table(#[case] left: f64, #[case] right: f64, #[case] equal: bool) {
        let result = diff(&[dep("x", left)], &[dep("x", right)]);
        assert_eq!(result.is_empty(), equal);
    }
}
