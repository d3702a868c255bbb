//! # COMPLEX Filter Expressions
//!
//! Grammar (keywords case-insensitive):
//!
//! ```text
//! EXPR   := TERM ( "OR" TERM )*
//! TERM   := FACTOR ( ("AND" | "NOT") FACTOR )*
//! FACTOR := integer | "(" EXPR ")"
//! ```
//!
//! `a NOT b` means "a and not b". `AND`/`NOT` bind tighter than `OR`, and
//! chains are left-associative. Parentheses may touch their operands:
//! `(1 OR 2)AND 3` is valid.

use std::collections::BTreeSet;

use shared_types::Bitmap;

use crate::error::FilterError;

/// Maximum parenthesis nesting.
pub const MAX_EXPRESSION_DEPTH: usize = 32;

/// Parsed expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Bitmap(Bitmap),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    /// Left operand present and right operand absent.
    Not(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Parse `input` into an expression tree.
    pub fn parse(input: &str) -> Result<Self, FilterError> {
        let tokens = tokenize(input)?;
        if tokens.is_empty() {
            return Err(FilterError::expression(0, "empty expression"));
        }
        let mut parser = Parser {
            tokens: &tokens,
            pos: 0,
            end: input.len(),
        };
        let expr = parser.expr(0)?;
        if let Some(tok) = parser.peek() {
            return Err(FilterError::expression(
                tok.offset,
                format!("unexpected {}", tok.kind.describe()),
            ));
        }
        Ok(expr)
    }

    /// Whether a card carrying `tags` satisfies the expression.
    pub fn matches(&self, tags: &BTreeSet<Bitmap>) -> bool {
        match self {
            Self::Bitmap(b) => tags.contains(b),
            Self::And(l, r) => l.matches(tags) && r.matches(tags),
            Self::Or(l, r) => l.matches(tags) || r.matches(tags),
            Self::Not(l, r) => l.matches(tags) && !r.matches(tags),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Int(Bitmap),
    And,
    Or,
    Not,
    LParen,
    RParen,
}

impl TokenKind {
    fn describe(&self) -> String {
        match self {
            Self::Int(n) => format!("integer {n}"),
            Self::And => "AND".into(),
            Self::Or => "OR".into(),
            Self::Not => "NOT".into(),
            Self::LParen => "'('".into(),
            Self::RParen => "')'".into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Token {
    kind: TokenKind,
    /// Byte offset into the source.
    offset: usize,
}

fn tokenize(input: &str) -> Result<Vec<Token>, FilterError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        match c {
            b'(' => {
                tokens.push(Token { kind: TokenKind::LParen, offset: i });
                i += 1;
            }
            b')' => {
                tokens.push(Token { kind: TokenKind::RParen, offset: i });
                i += 1;
            }
            c if c.is_ascii_alphanumeric() => {
                let start = i;
                while i < bytes.len() && bytes[i].is_ascii_alphanumeric() {
                    i += 1;
                }
                let word = &input[start..i];
                let kind = if word.bytes().all(|b| b.is_ascii_digit()) {
                    let value = word.parse::<Bitmap>().map_err(|_| {
                        FilterError::expression(start, "integer out of range")
                    })?;
                    TokenKind::Int(value)
                } else if word.eq_ignore_ascii_case("and") {
                    TokenKind::And
                } else if word.eq_ignore_ascii_case("or") {
                    TokenKind::Or
                } else if word.eq_ignore_ascii_case("not") {
                    TokenKind::Not
                } else {
                    return Err(FilterError::expression(start, format!("unknown word {word:?}")));
                };
                tokens.push(Token { kind, offset: start });
            }
            _ => {
                // Report the full character, not the byte.
                let ch = input[i..].chars().next().unwrap_or('?');
                return Err(FilterError::expression(i, format!("unexpected character {ch:?}")));
            }
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Source length, reported for errors at end of input.
    end: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expr(&mut self, depth: usize) -> Result<Expr, FilterError> {
        let mut left = self.term(depth)?;
        while let Some(Token { kind: TokenKind::Or, .. }) = self.peek() {
            self.pos += 1;
            let right = self.term(depth)?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn term(&mut self, depth: usize) -> Result<Expr, FilterError> {
        let mut left = self.factor(depth)?;
        loop {
            match self.peek().map(|t| t.kind) {
                Some(TokenKind::And) => {
                    self.pos += 1;
                    let right = self.factor(depth)?;
                    left = Expr::And(Box::new(left), Box::new(right));
                }
                Some(TokenKind::Not) => {
                    self.pos += 1;
                    let right = self.factor(depth)?;
                    left = Expr::Not(Box::new(left), Box::new(right));
                }
                _ => return Ok(left),
            }
        }
    }

    fn factor(&mut self, depth: usize) -> Result<Expr, FilterError> {
        match self.next() {
            Some(Token { kind: TokenKind::Int(n), .. }) => Ok(Expr::Bitmap(n)),
            Some(Token { kind: TokenKind::LParen, offset }) => {
                if depth >= MAX_EXPRESSION_DEPTH {
                    return Err(FilterError::expression(
                        offset,
                        format!("nesting deeper than {MAX_EXPRESSION_DEPTH}"),
                    ));
                }
                let inner = self.expr(depth + 1)?;
                match self.next() {
                    Some(Token { kind: TokenKind::RParen, .. }) => Ok(inner),
                    Some(tok) => Err(FilterError::expression(
                        tok.offset,
                        format!("expected ')', found {}", tok.kind.describe()),
                    )),
                    None => Err(FilterError::expression(self.end, "unclosed '('")),
                }
            }
            Some(tok) => Err(FilterError::expression(
                tok.offset,
                format!("expected integer or '(', found {}", tok.kind.describe()),
            )),
            None => Err(FilterError::expression(self.end, "unexpected end of expression")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[Bitmap]) -> BTreeSet<Bitmap> {
        items.iter().copied().collect()
    }

    fn position(err: FilterError) -> usize {
        match err {
            FilterError::InvalidExpression { position, .. } => position,
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        // 1 OR (2 AND 3)
        let expr = Expr::parse("1 OR 2 AND 3").unwrap();
        assert_eq!(
            expr,
            Expr::Or(
                Box::new(Expr::Bitmap(1)),
                Box::new(Expr::And(Box::new(Expr::Bitmap(2)), Box::new(Expr::Bitmap(3))))
            )
        );
        assert!(expr.matches(&tags(&[1])));
        assert!(!expr.matches(&tags(&[2])));
    }

    #[test]
    fn test_not_is_left_associative() {
        // (1 NOT 2) NOT 3
        let expr = Expr::parse("1 not 2 NOT 3").unwrap();
        assert!(expr.matches(&tags(&[1])));
        assert!(!expr.matches(&tags(&[1, 2])));
        assert!(!expr.matches(&tags(&[1, 3])));
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let expr = Expr::parse("(1 OR 2)AND 3").unwrap();
        assert!(expr.matches(&tags(&[2, 3])));
        assert!(!expr.matches(&tags(&[1])));

        let nested = Expr::parse("((1 OR 2) AND (3 OR 4)) NOT 5").unwrap();
        assert!(nested.matches(&tags(&[1, 4])));
        assert!(!nested.matches(&tags(&[1, 4, 5])));
    }

    #[test]
    fn test_malformed_input_reports_position() {
        assert_eq!(position(Expr::parse("").unwrap_err()), 0);
        assert_eq!(position(Expr::parse("1 AND").unwrap_err()), 5);
        assert_eq!(position(Expr::parse("1 XOR 2").unwrap_err()), 2);
        assert_eq!(position(Expr::parse("(1 OR 2").unwrap_err()), 7);
        assert_eq!(position(Expr::parse("1 2").unwrap_err()), 2);
        assert_eq!(position(Expr::parse("1 & 2").unwrap_err()), 2);
        assert_eq!(position(Expr::parse("1 )").unwrap_err()), 2);
    }

    #[test]
    fn test_depth_limit() {
        let ok = format!("{}1{}", "(".repeat(MAX_EXPRESSION_DEPTH), ")".repeat(MAX_EXPRESSION_DEPTH));
        assert!(Expr::parse(&ok).is_ok());

        let deep = format!(
            "{}1{}",
            "(".repeat(MAX_EXPRESSION_DEPTH + 1),
            ")".repeat(MAX_EXPRESSION_DEPTH + 1)
        );
        assert_eq!(position(Expr::parse(&deep).unwrap_err()), MAX_EXPRESSION_DEPTH);
    }

    #[test]
    fn test_integer_overflow_rejected() {
        assert!(Expr::parse("99999999999999999999999").is_err());
    }
}
