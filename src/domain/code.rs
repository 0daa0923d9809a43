use std::{cmp::Ordering, fmt, num::NonZeroUsize};

use serde::Serialize;

/// A person's label in the descendant tree.
///
/// Path codes (Henry, Modified Henry, d'Aboville) spell out the route from
/// the root; sequence codes (Record) are plain counters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum DescendantCode {
    /// A hierarchical code such as `121`, `12(10)` or `1.2.(1|3).1`.
    Path(String),
    /// A sequential Record number.
    Sequence(NonZeroUsize),
}

impl DescendantCode {
    /// The path code, if this is one.
    #[must_use]
    pub fn as_path(&self) -> Option<&str> {
        match self {
            Self::Path(path) => Some(path),
            Self::Sequence(_) => None,
        }
    }

    /// The Record number, if this is one.
    #[must_use]
    pub const fn as_sequence(&self) -> Option<NonZeroUsize> {
        match self {
            Self::Path(_) => None,
            Self::Sequence(n) => Some(*n),
        }
    }
}

impl PartialOrd for DescendantCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Paths order lexicographically, sequences numerically, and any sequence
/// sorts before any path.
impl Ord for DescendantCode {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Path(a), Self::Path(b)) => a.cmp(b),
            (Self::Sequence(a), Self::Sequence(b)) => a.cmp(b),
            (Self::Sequence(_), Self::Path(_)) => Ordering::Less,
            (Self::Path(_), Self::Sequence(_)) => Ordering::Greater,
        }
    }
}

impl fmt::Display for DescendantCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.write_str(path),
            Self::Sequence(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for DescendantCode {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for DescendantCode {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<NonZeroUsize> for DescendantCode {
    fn from(n: NonZeroUsize) -> Self {
        Self::Sequence(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_compare_lexicographically() {
        let a = DescendantCode::from("112");
        let b = DescendantCode::from("12");
        assert!(a < b);
    }

    #[test]
    fn sequences_compare_numerically() {
        let nine = DescendantCode::from(NonZeroUsize::new(9).unwrap());
        let ten = DescendantCode::from(NonZeroUsize::new(10).unwrap());
        assert!(nine < ten);
        assert_eq!(ten.to_string(), "10");
    }
}
