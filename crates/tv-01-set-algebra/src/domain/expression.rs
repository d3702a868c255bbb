//! Nested set expressions.

use super::{SetOperation, TagSet};

/// A tree of set operations over literal sets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetExpr {
    Set(TagSet),
    Apply {
        operation: SetOperation,
        operands: Vec<SetExpr>,
    },
}

impl SetExpr {
    pub fn set(set: TagSet) -> Self {
        Self::Set(set)
    }

    pub fn intersect(operands: Vec<SetExpr>) -> Self {
        Self::apply(SetOperation::Intersect, operands)
    }

    pub fn union(operands: Vec<SetExpr>) -> Self {
        Self::apply(SetOperation::Union, operands)
    }

    pub fn difference(operands: Vec<SetExpr>) -> Self {
        Self::apply(SetOperation::Difference, operands)
    }

    pub fn symmetric_difference(operands: Vec<SetExpr>) -> Self {
        Self::apply(SetOperation::SymmetricDifference, operands)
    }

    fn apply(operation: SetOperation, operands: Vec<SetExpr>) -> Self {
        Self::Apply {
            operation,
            operands,
        }
    }

    /// Number of operation nodes in the tree.
    pub fn operation_count(&self) -> usize {
        match self {
            Self::Set(_) => 0,
            Self::Apply { operands, .. } => {
                1 + operands.iter().map(SetExpr::operation_count).sum::<usize>()
            }
        }
    }

    /// Evaluate bottom-up, calling `eval` for every operation node.
    pub fn fold<F>(&self, eval: &mut F) -> TagSet
    where
        F: FnMut(SetOperation, &[TagSet]) -> TagSet,
    {
        match self {
            Self::Set(set) => set.clone(),
            Self::Apply {
                operation,
                operands,
            } => {
                let values: Vec<TagSet> = operands.iter().map(|e| e.fold(eval)).collect();
                eval(*operation, &values)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_evaluates_nested_tree() {
        let a = TagSet::from_iter(["c1", "c2", "c3"]);
        let b = TagSet::from_iter(["c2"]);
        let c = TagSet::from_iter(["c3", "c4"]);

        // (a \ b) ∩ c
        let expr = SetExpr::intersect(vec![
            SetExpr::difference(vec![SetExpr::set(a), SetExpr::set(b)]),
            SetExpr::set(c),
        ]);
        assert_eq!(expr.operation_count(), 2);

        let result = expr.fold(&mut |op: SetOperation, operands: &[TagSet]| op.apply(operands));
        assert_eq!(result, TagSet::from_iter(["c3"]));
    }
}
