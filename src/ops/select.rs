//! Evaluation of selection expressions against a structure.
//!
//! Supports the predicate language the NCS model actually emits:
//! - `chain A`: chain ID (quoted or bare)
//! - `resseq 151:159` / `resseq 7`: residue sequence number ranges
//! - `name CA`: atom name
//!
//! Combinators: `and`, `or`, parentheses. Evaluation returns ordered global
//! atom indices (positions in `Structure::iter_atoms_with_context` order).
//! Malformed expressions surface here as [`Error::Selection`]; the selection
//! algebra itself never validates.

use crate::model::atom::Atom;
use crate::model::structure::Structure;
use crate::ops::error::Error;

/// One atom with its structural context and global index.
#[derive(Debug, Clone, Copy)]
pub struct AtomSite<'a> {
    pub index: usize,
    pub chain_id: &'a str,
    pub resseq: i32,
    pub atom: &'a Atom,
}

/// Flattens a structure into ordered atom sites.
pub fn sites(structure: &Structure) -> Vec<AtomSite<'_>> {
    structure
        .iter_atoms_with_context()
        .enumerate()
        .map(|(index, (chain, residue, atom))| AtomSite {
            index,
            chain_id: chain.id.as_str(),
            resseq: residue.id,
            atom,
        })
        .collect()
}

/// Evaluates a selection expression to ordered global atom indices.
pub fn evaluate(structure: &Structure, expression: &str) -> Result<Vec<usize>, Error> {
    let selector = parse(expression)?;
    Ok(sites(structure)
        .iter()
        .filter(|site| selector.matches(site))
        .map(|site| site.index)
        .collect())
}

/// Residue sequence number ranges covered by a selection, as merged
/// contiguous `start:end` runs in ascending order.
pub fn residue_number_ranges(
    structure: &Structure,
    expression: &str,
) -> Result<Vec<(i32, i32)>, Error> {
    let selector = parse(expression)?;
    let mut resseqs: Vec<i32> = sites(structure)
        .iter()
        .filter(|site| selector.matches(site))
        .map(|site| site.resseq)
        .collect();
    resseqs.sort_unstable();
    resseqs.dedup();
    Ok(merge_runs(&resseqs))
}

/// Merges sorted, deduplicated sequence numbers into contiguous runs.
pub fn merge_runs(resseqs: &[i32]) -> Vec<(i32, i32)> {
    let mut runs: Vec<(i32, i32)> = Vec::new();
    for &n in resseqs {
        match runs.last_mut() {
            Some((_, end)) if n <= *end + 1 => *end = n,
            _ => runs.push((n, n)),
        }
    }
    runs
}

#[derive(Debug, Clone)]
enum Selector {
    Chain(String),
    Resseq(i32, i32),
    Name(String),
    And(Box<Selector>, Box<Selector>),
    Or(Box<Selector>, Box<Selector>),
}

impl Selector {
    fn matches(&self, site: &AtomSite<'_>) -> bool {
        match self {
            Self::Chain(id) => site.chain_id == id,
            Self::Resseq(start, end) => site.resseq >= *start && site.resseq <= *end,
            Self::Name(name) => site.atom.name.eq_ignore_ascii_case(name),
            Self::And(a, b) => a.matches(site) && b.matches(site),
            Self::Or(a, b) => a.matches(site) || b.matches(site),
        }
    }
}

fn parse(expression: &str) -> Result<Selector, Error> {
    let tokens = tokenize(expression)?;
    let mut parser = Parser {
        expression,
        tokens,
        pos: 0,
    };
    let selector = parser.expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(parser.error(format!(
            "unexpected trailing token '{}'",
            parser.tokens[parser.pos]
        )));
    }
    Ok(selector)
}

fn tokenize(expression: &str) -> Result<Vec<String>, Error> {
    let mut tokens = Vec::new();
    let mut chars = expression.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            '(' | ')' => {
                tokens.push(c.to_string());
                let _ = chars.next();
            }
            '\'' | '"' => {
                let quote = c;
                let _ = chars.next();
                let mut word = String::new();
                loop {
                    match chars.next() {
                        Some(ch) if ch == quote => break,
                        Some(ch) => word.push(ch),
                        None => {
                            return Err(Error::selection(
                                expression,
                                "unterminated quoted token",
                            ))
                        }
                    }
                }
                tokens.push(word);
            }
            c if c.is_whitespace() => {
                let _ = chars.next();
            }
            _ => {
                let mut word = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_whitespace() || ch == '(' || ch == ')' {
                        break;
                    }
                    word.push(ch);
                    let _ = chars.next();
                }
                tokens.push(word);
            }
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    expression: &'a str,
    tokens: Vec<String>,
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, details: impl Into<String>) -> Error {
        Error::selection(self.expression, details)
    }

    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn next(&mut self) -> Option<String> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expr(&mut self) -> Result<Selector, Error> {
        let mut left = self.term()?;
        while self.peek() == Some("or") {
            let _ = self.next();
            let right = self.term()?;
            left = Selector::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<Selector, Error> {
        let mut left = self.factor()?;
        while self.peek() == Some("and") {
            let _ = self.next();
            let right = self.factor()?;
            left = Selector::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn factor(&mut self) -> Result<Selector, Error> {
        match self.next().as_deref() {
            Some("(") => {
                let inner = self.expr()?;
                if self.next().as_deref() != Some(")") {
                    return Err(self.error("expected closing parenthesis"));
                }
                Ok(inner)
            }
            Some("chain") => {
                let id = self
                    .next()
                    .ok_or_else(|| self.error("'chain' requires an identifier"))?;
                Ok(Selector::Chain(id))
            }
            Some("name") => {
                let name = self
                    .next()
                    .ok_or_else(|| self.error("'name' requires an atom name"))?;
                Ok(Selector::Name(name))
            }
            Some("resseq") => {
                let range = self
                    .next()
                    .ok_or_else(|| self.error("'resseq' requires a number or range"))?;
                let (start, end) = match range.split_once(':') {
                    Some((a, b)) => (a.to_string(), b.to_string()),
                    None => (range.clone(), range),
                };
                let start: i32 = start
                    .parse()
                    .map_err(|_| self.error(format!("invalid resseq bound '{start}'")))?;
                let end: i32 = end
                    .parse()
                    .map_err(|_| self.error(format!("invalid resseq bound '{end}'")))?;
                Ok(Selector::Resseq(start, end))
            }
            Some(other) => Err(self.error(format!("unexpected token '{other}'"))),
            None => Err(self.error("empty expression")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::chain::Chain;
    use crate::model::residue::Residue;
    use crate::model::types::Point;

    fn test_structure() -> Structure {
        // Chain A: THR 1 (N CA C O CB), LYS 2 (N CA); chain B: THR 1 (N CA)
        let mut structure = Structure::new();
        let mut a = Chain::new("A");
        let mut r1 = Residue::new(1, "THR");
        for name in ["N", "CA", "C", "O", "CB"] {
            r1.add_atom(Atom::new(name, Point::origin()));
        }
        let mut r2 = Residue::new(2, "LYS");
        for name in ["N", "CA"] {
            r2.add_atom(Atom::new(name, Point::origin()));
        }
        a.add_residue(r1);
        a.add_residue(r2);
        structure.add_chain(a);
        let mut b = Chain::new("B");
        let mut r = Residue::new(1, "THR");
        for name in ["N", "CA"] {
            r.add_atom(Atom::new(name, Point::origin()));
        }
        b.add_residue(r);
        structure.add_chain(b);
        structure
    }

    #[test]
    fn evaluate_chain_selects_all_chain_atoms() {
        let structure = test_structure();

        let indices = evaluate(&structure, "chain A").unwrap();
        assert_eq!(indices, [0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn evaluate_quoted_chain_matches_bare_chain() {
        let structure = test_structure();

        assert_eq!(
            evaluate(&structure, "chain 'B'").unwrap(),
            evaluate(&structure, "chain B").unwrap()
        );
    }

    #[test]
    fn evaluate_resseq_range_restricts_residues() {
        let structure = test_structure();

        let indices = evaluate(&structure, "chain A and (resseq 2:2)").unwrap();
        assert_eq!(indices, [5, 6]);
    }

    #[test]
    fn evaluate_name_disjunction_selects_backbone() {
        let structure = test_structure();

        let indices = evaluate(&structure, "chain A and (name N or name CA)").unwrap();
        assert_eq!(indices, [0, 1, 5, 6]);
    }

    #[test]
    fn evaluate_or_of_chains_concatenates_in_structure_order() {
        let structure = test_structure();

        let indices = evaluate(&structure, "chain B or chain A").unwrap();
        assert_eq!(indices, [0, 1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn evaluate_rejects_malformed_expression() {
        let structure = test_structure();

        assert!(evaluate(&structure, "chain A and").is_err());
        assert!(evaluate(&structure, "(chain A").is_err());
        assert!(evaluate(&structure, "resseq 1:x").is_err());
        assert!(evaluate(&structure, "chan A").is_err());
    }

    #[test]
    fn residue_number_ranges_merges_adjacent_runs() {
        let structure = test_structure();

        let ranges = residue_number_ranges(&structure, "chain A").unwrap();
        assert_eq!(ranges, [(1, 2)]);
    }

    #[test]
    fn merge_runs_splits_on_gaps() {
        assert_eq!(merge_runs(&[1, 2, 3, 7, 8, 12]), [(1, 3), (7, 8), (12, 12)]);
        assert!(merge_runs(&[]).is_empty());
    }
}
