//! Selection-expression algebra.
//!
//! Selections are opaque strings in a small boolean predicate language
//! (`chain A`, `resseq 151:159`, `name CA`, combined with `and`, `or`, and
//! parentheses). This module only composes and compares the strings;
//! evaluation against a structure lives in [`crate::ops::select`], and a
//! malformed expression surfaces there, never here.

/// Boolean connective for [`combine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    And,
    Or,
}

impl Op {
    fn keyword(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

/// Combines two selection expressions with a boolean connective.
///
/// Each non-trivial operand is parenthesized, but an operand that is already
/// a single fully-parenthesized term is left alone so parentheses never
/// accumulate across repeated composition. An empty operand yields the other
/// operand unchanged.
pub fn combine(a: &str, b: &str, op: Op) -> String {
    let a = a.trim();
    let b = b.trim();
    if a.is_empty() {
        return b.to_string();
    }
    if b.is_empty() {
        return a.to_string();
    }
    format!("{} {} {}", parenthesize(a), op.keyword(), parenthesize(b))
}

/// Wraps an expression in parentheses unless it is already a single
/// fully-parenthesized term.
pub fn parenthesize(expr: &str) -> String {
    let expr = expr.trim();
    if is_fully_parenthesized(expr) {
        expr.to_string()
    } else {
        format!("({expr})")
    }
}

/// Joins expressions into one disjunction, parenthesizing each operand.
///
/// This is the shape of the combined NCS selection string: one
/// parenthesized reference selection per group, joined with `or`.
pub fn join_or<S: AsRef<str>>(exprs: &[S]) -> String {
    exprs
        .iter()
        .map(|e| parenthesize(e.as_ref()))
        .collect::<Vec<_>>()
        .join(" or ")
}

/// Collapses runs of whitespace to single spaces and trims the ends.
pub fn canonical(expr: &str) -> String {
    expr.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Structural equality: string equality after canonical whitespace.
pub fn canonical_eq(a: &str, b: &str) -> bool {
    canonical(a) == canonical(b)
}

fn is_fully_parenthesized(expr: &str) -> bool {
    let bytes = expr.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'(' || bytes[bytes.len() - 1] != b')' {
        return false;
    }
    // The opening paren must not close before the end of the string.
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 && i != bytes.len() - 1 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_parenthesizes_both_operands() {
        let result = combine("chain A", "chain B", Op::Or);

        assert_eq!(result, "(chain A) or (chain B)");
    }

    #[test]
    fn combine_does_not_duplicate_parentheses() {
        let result = combine("(chain A)", "chain B and (resseq 1:7)", Op::And);

        assert_eq!(result, "(chain A) and (chain B and (resseq 1:7))");
    }

    #[test]
    fn combine_with_empty_side_returns_other() {
        assert_eq!(combine("", "chain B", Op::Or), "chain B");
        assert_eq!(combine("chain A", "", Op::Or), "chain A");
    }

    #[test]
    fn parenthesize_leaves_wrapped_term_alone() {
        assert_eq!(parenthesize("(chain A and (name CA))"), "(chain A and (name CA))");
    }

    #[test]
    fn parenthesize_wraps_adjacent_groups() {
        // "(chain A) or (chain B)" is not a single term even though it
        // starts with '(' and ends with ')'.
        assert_eq!(
            parenthesize("(chain A) or (chain B)"),
            "((chain A) or (chain B))"
        );
    }

    #[test]
    fn join_or_builds_combined_selection() {
        let refs = ["chain A", "chain D"];

        assert_eq!(join_or(&refs), "(chain A) or (chain D)");
    }

    #[test]
    fn canonical_eq_ignores_whitespace_runs() {
        assert!(canonical_eq("chain  A and\t(resseq 1:7)", "chain A and (resseq 1:7)"));
        assert!(!canonical_eq("chain A", "chain B"));
    }
}
