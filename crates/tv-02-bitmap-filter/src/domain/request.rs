//! Filter requests and their compiled predicates.

use std::collections::BTreeSet;

use shared_types::{Bitmap, FilterKind};

use super::expression::Expr;
use crate::error::FilterError;

/// A filter request over tag bitmaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterRequest {
    /// Cards carrying `bitmap`.
    Match { bitmap: Bitmap },
    /// Cards carrying every bitmap.
    And { bitmaps: BTreeSet<Bitmap> },
    /// Cards carrying at least one bitmap. An empty set matches nothing.
    Or { bitmaps: BTreeSet<Bitmap> },
    /// Cards carrying `include` but not `exclude`.
    Not { include: Bitmap, exclude: Bitmap },
    /// Textual boolean expression, see [`Expr`].
    Complex { expression: String },
}

impl FilterRequest {
    pub fn and(bitmaps: impl IntoIterator<Item = Bitmap>) -> Self {
        Self::And {
            bitmaps: bitmaps.into_iter().collect(),
        }
    }

    pub fn or(bitmaps: impl IntoIterator<Item = Bitmap>) -> Self {
        Self::Or {
            bitmaps: bitmaps.into_iter().collect(),
        }
    }

    pub fn complex(expression: impl Into<String>) -> Self {
        Self::Complex {
            expression: expression.into(),
        }
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            Self::Match { .. } => FilterKind::Match,
            Self::And { .. } => FilterKind::And,
            Self::Or { .. } => FilterKind::Or,
            Self::Not { .. } => FilterKind::Not,
            Self::Complex { .. } => FilterKind::Complex,
        }
    }

    /// Method tag reported in the result.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Match { .. } => "bitmap_match",
            Self::And { .. } => "bitmap_intersection",
            Self::Or { .. } => "bitmap_union",
            Self::Not { .. } => "bitmap_exclusion",
            Self::Complex { .. } => "bitmap_expression",
        }
    }

    /// Validate and compile into a per-card predicate.
    pub fn compile(&self) -> Result<Predicate, FilterError> {
        Ok(match self {
            Self::Match { bitmap } => Predicate::Contains(*bitmap),
            Self::And { bitmaps } => {
                if bitmaps.is_empty() {
                    return Err(FilterError::EmptyBitmapSet {
                        kind: FilterKind::And,
                    });
                }
                Predicate::ContainsAll(bitmaps.clone())
            }
            Self::Or { bitmaps } => Predicate::ContainsAny(bitmaps.clone()),
            Self::Not { include, exclude } => Predicate::Excluding {
                include: *include,
                exclude: *exclude,
            },
            Self::Complex { expression } => Predicate::Expression(Expr::parse(expression)?),
        })
    }
}

/// Compiled form of a [`FilterRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Contains(Bitmap),
    ContainsAll(BTreeSet<Bitmap>),
    ContainsAny(BTreeSet<Bitmap>),
    Excluding { include: Bitmap, exclude: Bitmap },
    Expression(Expr),
}

impl Predicate {
    pub fn matches(&self, tags: &BTreeSet<Bitmap>) -> bool {
        match self {
            Self::Contains(b) => tags.contains(b),
            Self::ContainsAll(query) => query.is_subset(tags),
            Self::ContainsAny(query) => !query.is_disjoint(tags),
            Self::Excluding { include, exclude } => {
                tags.contains(include) && !tags.contains(exclude)
            }
            Self::Expression(expr) => expr.matches(tags),
        }
    }
}
