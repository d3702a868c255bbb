//! Mathematical-property validators.
//!
//! Test utilities, compiled only for tests or with the `test-utils` feature.
//! Any correct implementation satisfies all of them.

use crate::domain::TagSet;

/// `op(a, b) == op(b, a)`
pub fn is_commutative<F>(op: F, a: &TagSet, b: &TagSet) -> bool
where
    F: Fn(&[TagSet]) -> TagSet,
{
    op(&[a.clone(), b.clone()]) == op(&[b.clone(), a.clone()])
}

/// `op(op(a, b), c) == op(a, op(b, c))`
pub fn is_associative<F>(op: F, a: &TagSet, b: &TagSet, c: &TagSet) -> bool
where
    F: Fn(&[TagSet]) -> TagSet,
{
    let left = op(&[op(&[a.clone(), b.clone()]), c.clone()]);
    let right = op(&[a.clone(), op(&[b.clone(), c.clone()])]);
    left == right
}

/// `outer(a, inner(b, c)) == inner(outer(a, b), outer(a, c))`
pub fn is_distributive<O, I>(outer: O, inner: I, a: &TagSet, b: &TagSet, c: &TagSet) -> bool
where
    O: Fn(&[TagSet]) -> TagSet,
    I: Fn(&[TagSet]) -> TagSet,
{
    let left = outer(&[a.clone(), inner(&[b.clone(), c.clone()])]);
    let right = inner(&[outer(&[a.clone(), b.clone()]), outer(&[a.clone(), c.clone()])]);
    left == right
}
