//! Emission of declarative `ncs_group` blocks.

use crate::model::group::NcsGroup;

/// Serializes groups as declarative blocks, one `reference` line and one
/// `selection` line per copy, each wrapped to 80 columns.
///
/// Selection expressions are emitted verbatim, unquoted, so output built
/// from parsed input reproduces it byte for byte.
pub fn write_groups(groups: &[NcsGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        out.push_str("ncs_group {\n");
        out.push_str(&format_80(&format!(
            "  reference = {}",
            group.reference_selection
        )));
        out.push('\n');
        for copy in &group.copy_selections {
            out.push_str(&format_80(&format!("  selection = {copy}")));
            out.push('\n');
        }
        out.push_str("}\n");
    }
    out
}

/// Wraps a line to 80 columns with `\` continuations.
///
/// Chunks break at the last space inside the 80-column window, keeping the
/// space on the earlier chunk; a window with no usable space is cut hard at
/// column 80. Continuation lines are joined with `" \ \n"`, so stripping
/// the backslash and one adjacent space on each side restores the input
/// exactly.
pub fn format_80(s: &str) -> String {
    if s.len() <= 80 {
        return s.to_string();
    }
    let mut chunks: Vec<&str> = Vec::new();
    let mut i = 0;
    while i < s.len() {
        if s.len() - i <= 80 {
            chunks.push(&s[i..]);
            break;
        }
        // Back the window edge off a character straddling it.
        let mut end = i + 80;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        let cut = match s[i..end].rfind(' ') {
            Some(0) | None => end,
            Some(p) => i + p + 1,
        };
        chunks.push(&s[i..cut]);
        i = cut;
    }
    chunks.join(" \\ \n")
}
