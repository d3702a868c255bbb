//! The four set operations, n-ary.

use std::collections::BTreeSet;
use std::fmt;

use super::TagSet;

/// A cached set operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SetOperation {
    /// Members present in every operand. No operands yields the empty set.
    Intersect,
    /// Members present in any operand.
    Union,
    /// Members of the first operand not present in any later operand.
    Difference,
    /// Members present in an odd number of operands.
    SymmetricDifference,
}

impl SetOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Intersect => "intersect",
            Self::Union => "union",
            Self::Difference => "difference",
            Self::SymmetricDifference => "symmetric_difference",
        }
    }

    /// Evaluate the operation over `operands`.
    pub fn apply(&self, operands: &[TagSet]) -> TagSet {
        match self {
            Self::Intersect => intersect(operands),
            Self::Union => union(operands),
            Self::Difference => difference(operands),
            Self::SymmetricDifference => symmetric_difference(operands),
        }
    }
}

impl fmt::Display for SetOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn intersect(operands: &[TagSet]) -> TagSet {
    // Walk the smallest operand; every member must appear in all others.
    let Some(smallest) = operands.iter().min_by_key(|s| s.len()) else {
        return TagSet::empty();
    };
    smallest
        .iter()
        .filter(|item| operands.iter().all(|s| s.contains(item)))
        .cloned()
        .collect::<BTreeSet<_>>()
        .into()
}

fn union(operands: &[TagSet]) -> TagSet {
    operands
        .iter()
        .flat_map(|s| s.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into()
}

fn difference(operands: &[TagSet]) -> TagSet {
    let Some((first, rest)) = operands.split_first() else {
        return TagSet::empty();
    };
    first
        .iter()
        .filter(|item| !rest.iter().any(|s| s.contains(item)))
        .cloned()
        .collect::<BTreeSet<_>>()
        .into()
}

fn symmetric_difference(operands: &[TagSet]) -> TagSet {
    let mut acc: BTreeSet<String> = BTreeSet::new();
    for set in operands {
        acc = acc
            .symmetric_difference(set.as_set())
            .cloned()
            .collect();
    }
    acc.into()
}
