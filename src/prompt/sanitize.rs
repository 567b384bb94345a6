/// Maximum length of a sanitized snippet, in chars.
const MAX_SNIPPET_CHARS: usize = 260;
/// A truncation is only backed up to a word boundary past this many chars;
/// closer boundaries would throw away too much content, so the hard cut wins.
const MIN_WORD_CUT_CHARS: usize = 80;

/// Flatten raw source text into a single typing-friendly line.
///
/// Line-oriented heuristics, not a parser: blank lines, comments, package
/// declarations and import lines (including `import ( ... )` blocks) are
/// dropped, the survivors are joined with single spaces, and the result is
/// capped at [`MAX_SNIPPET_CHARS`]. Returns an empty string when nothing
/// typable survives; callers treat that as a fetch failure.
pub fn clean_code_snippet(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n");
    let mut kept: Vec<&str> = Vec::new();
    let mut in_block_comment = false;
    let mut in_import_block = false;

    for line in normalized.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("/*") {
            in_block_comment = true;
        }
        if in_block_comment {
            if line.contains("*/") {
                in_block_comment = false;
            }
            continue;
        }
        if line.starts_with("//") || line.starts_with("package ") {
            continue;
        }
        if line.starts_with("import (") {
            in_import_block = true;
            continue;
        }
        if in_import_block {
            if line == ")" {
                in_import_block = false;
            }
            continue;
        }
        if line.starts_with("import ") {
            continue;
        }
        kept.push(line);
    }

    if kept.is_empty() {
        return String::new();
    }

    let joined = kept.join(" ");
    let mut out = joined.split_whitespace().collect::<Vec<_>>().join(" ");

    let chars: Vec<char> = out.chars().collect();
    if chars.len() > MAX_SNIPPET_CHARS {
        let mut cut: String = chars[..MAX_SNIPPET_CHARS].iter().collect();
        if let Some(byte_idx) = cut.rfind(' ') {
            if cut[..byte_idx].chars().count() > MIN_WORD_CUT_CHARS {
                cut.truncate(byte_idx);
            }
        }
        out = cut;
    }

    out.trim().to_string()
}
