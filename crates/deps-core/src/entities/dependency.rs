use serde::{Deserialize, Serialize};

/// Absolute tolerance used whenever two scores are compared.
pub const SCORE_TOLERANCE: f64 = 1e-9;

/// Returns `true` when `a` and `b` differ by at most [`SCORE_TOLERANCE`].
#[must_use]
pub fn scores_match(a: f64, b: f64) -> bool {
    (a - b).abs() <= SCORE_TOLERANCE
}

/// A scored dependency owned by exactly one project.
///
/// `name` is the package's own name, not the id of the repository its score
/// was resolved from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dependency {
    pub name: String,
    /// Trust score as reported by the metadata service. Unbounded here.
    pub score: f64,
    /// Unix timestamp of the scorecard, `0` when the service had no date.
    pub updated_at: i64,
}

impl Dependency {
    #[must_use]
    pub fn new(name: impl Into<String>, score: f64, updated_at: i64) -> Self {
        Self {
            name: name.into(),
            score,
            updated_at,
        }
    }

    /// Equality used by reconciliation: exact name and timestamp, score within
    /// [`SCORE_TOLERANCE`].
    ///
    /// Not a `PartialEq` impl because tolerance comparison is not transitive.
    #[must_use]
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.name == other.name
            && scores_match(self.score, other.score)
            && self.updated_at == other.updated_at
    }
}
