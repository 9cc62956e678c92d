//! Parsing of declarative `ncs_group` blocks.

use crate::io::Error;
use crate::model::group::GroupSpec;

/// Parses declarative `ncs_group` blocks into raw group records.
///
/// Continuation lines produced by the 80-column writer are rejoined first.
/// Each block needs exactly one `reference` line; `selection` lines are
/// collected in order. A block without selections parses fine here and is
/// rejected later by group validation, which owns all semantic checks.
pub fn read_groups(text: &str) -> Result<Vec<GroupSpec>, Error> {
    const FORMAT: &str = "ncs_group";

    let mut specs = Vec::new();
    let mut current: Option<Block> = None;

    for (line_number, logical) in logical_lines(text) {
        let line = logical.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(rest) = line.strip_prefix("ncs_group") {
            if current.is_some() {
                return Err(Error::parse(
                    FORMAT,
                    line_number,
                    "nested ncs_group block",
                ));
            }
            if rest.trim() != "{" {
                return Err(Error::parse(
                    FORMAT,
                    line_number,
                    "expected '{' after ncs_group",
                ));
            }
            current = Some(Block {
                line_number,
                reference: None,
                selections: Vec::new(),
            });
        } else if line == "}" {
            let block = current.take().ok_or_else(|| {
                Error::parse(FORMAT, line_number, "'}' outside any block")
            })?;
            let reference = block.reference.ok_or_else(|| {
                Error::parse(FORMAT, block.line_number, "block has no reference")
            })?;
            specs.push(GroupSpec {
                reference,
                copies: block.selections,
            });
        } else if let Some(value) = key_value(line, "reference") {
            let block = current.as_mut().ok_or_else(|| {
                Error::parse(FORMAT, line_number, "'reference' outside any block")
            })?;
            if block.reference.is_some() {
                return Err(Error::parse(
                    FORMAT,
                    line_number,
                    "block declares more than one reference",
                ));
            }
            block.reference = Some(unquote(value).to_string());
        } else if let Some(value) = key_value(line, "selection") {
            let block = current.as_mut().ok_or_else(|| {
                Error::parse(FORMAT, line_number, "'selection' outside any block")
            })?;
            block.selections.push(unquote(value).to_string());
        } else {
            return Err(Error::parse(
                FORMAT,
                line_number,
                format!("unrecognized line '{line}'"),
            ));
        }
    }

    if let Some(block) = current {
        return Err(Error::parse(
            FORMAT,
            block.line_number,
            "unterminated ncs_group block",
        ));
    }
    Ok(specs)
}

struct Block {
    line_number: usize,
    reference: Option<String>,
    selections: Vec<String>,
}

/// Rejoins `\`-continued lines, tagging each logical line with the number
/// of its first physical line.
///
/// A continuation strips trailing whitespace, the backslash, and exactly
/// one more trailing space before concatenating, undoing the writer's
/// joiner without touching spaces that belong to the expression.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_number = idx + 1;
        let trimmed = raw.trim_end();
        let continued = trimmed.ends_with('\\');
        let fragment = if continued {
            let stripped = &trimmed[..trimmed.len() - 1];
            stripped.strip_suffix(' ').unwrap_or(stripped).to_string()
        } else {
            raw.to_string()
        };

        match pending.take() {
            Some((start, mut acc)) => {
                acc.push_str(&fragment);
                if continued {
                    pending = Some((start, acc));
                } else {
                    lines.push((start, acc));
                }
            }
            None => {
                if continued {
                    pending = Some((line_number, fragment));
                } else {
                    lines.push((line_number, fragment));
                }
            }
        }
    }
    if let Some(p) = pending {
        lines.push(p);
    }
    lines
}

/// Splits `key = value`, returning the value only when the key matches.
fn key_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let (k, v) = line.split_once('=')?;
    if k.trim() == key {
        Some(v.trim())
    } else {
        None
    }
}

/// Strips one layer of matching outer quotes, but only when the inner text
/// never repeats the quote character, so expressions with interior quoted
/// chain IDs survive intact.
fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'\'' || first == b'"') && bytes[bytes.len() - 1] == first {
            let inner = &value[1..value.len() - 1];
            if !inner.contains(first as char) {
                return inner;
            }
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::phil::write_groups;
    use crate::model::group::NcsGroup;

    #[test]
    fn read_groups_parses_two_blocks() {
        let text = "\
ncs_group {
  reference = chain A
  selection = chain B
  selection = chain C
}
ncs_group {
  reference = chain D
  selection = chain E
}
";
        let specs = read_groups(text).unwrap();

        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].reference, "chain A");
        assert_eq!(specs[0].copies, ["chain B", "chain C"]);
        assert_eq!(specs[1].reference, "chain D");
        assert_eq!(specs[1].copies, ["chain E"]);
    }

    #[test]
    fn read_groups_strips_outer_quotes_only_when_unambiguous() {
        let text = "\
ncs_group {
  reference = 'chain A and (resseq 1:10)'
  selection = \"chain 'B'\"
}
";
        let specs = read_groups(text).unwrap();

        assert_eq!(specs[0].reference, "chain A and (resseq 1:10)");
        // Inner double quotes absent, so the outer pair is stripped; the
        // interior single quotes are part of the expression.
        assert_eq!(specs[0].copies, ["chain 'B'"]);
    }

    #[test]
    fn read_groups_keeps_quotes_that_reappear_inside() {
        let text = "\
ncs_group {
  reference = 'chain 'A''
  selection = chain B
}
";
        let specs = read_groups(text).unwrap();
        assert_eq!(specs[0].reference, "'chain 'A''");
    }

    #[test]
    fn read_groups_rejects_two_references_in_one_block() {
        let text = "\
ncs_group {
  reference = chain A
  reference = chain B
  selection = chain C
}
";
        let err = read_groups(text).unwrap_err();
        assert!(matches!(err, Error::Parse { line_number: 3, .. }));
    }

    #[test]
    fn read_groups_rejects_unterminated_block() {
        let text = "ncs_group {\n  reference = chain A\n";
        assert!(read_groups(text).is_err());
    }

    #[test]
    fn read_groups_allows_block_without_selections() {
        // Semantic validation happens in the matcher, not here.
        let text = "ncs_group {\n  reference = chain A\n}\n";
        let specs = read_groups(text).unwrap();
        assert!(specs[0].copies.is_empty());
    }

    #[test]
    fn read_groups_round_trips_wrapped_output() {
        let long: Vec<String> = (0..20).map(|i| format!("name X{i}")).collect();
        let reference = format!("chain A and ({})", long.join(" or "));
        let groups = vec![NcsGroup {
            group_id: 1,
            reference_selection: reference.clone(),
            copy_selections: vec!["chain B".to_string()],
        }];

        let text = write_groups(&groups);
        assert!(text.contains('\\'));

        let specs = read_groups(&text).unwrap();
        assert_eq!(specs[0].reference, reference);
        assert_eq!(specs[0].copies, ["chain B"]);
    }

    #[test]
    fn read_then_write_reproduces_input_bytes() {
        let text = "\
ncs_group {
  reference = chain A and (resseq 151:159)
  selection = chain B and (resseq 151:159)
  selection = chain C and (resseq 151:159)
}
ncs_group {
  reference = chain D
  selection = chain E
}
";
        let specs = read_groups(text).unwrap();
        let groups: Vec<NcsGroup> = specs
            .iter()
            .enumerate()
            .map(|(i, s)| NcsGroup {
                group_id: i + 1,
                reference_selection: s.reference.clone(),
                copy_selections: s.copies.clone(),
            })
            .collect();

        assert_eq!(write_groups(&groups), text);
    }
}
