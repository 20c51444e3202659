//! Text comparison: a character-level similarity ratio plus a line-level
//! unified diff.
//!
//! Both use the `similar` crate (Myers diff algorithm).

use similar::{capture_diff_slices, group_diff_ops, Algorithm, DiffOp, DiffTag, TextDiff};

use crate::config::TextDiffOptions;

/// Label of the left side in unified diff headers.
pub const OLD_LABEL: &str = "doc1";
/// Label of the right side in unified diff headers.
pub const NEW_LABEL: &str = "doc2";

/// The result of comparing two text blobs.
#[derive(Clone, Debug, PartialEq)]
pub struct TextComparison {
    /// Matching-blocks ratio in `[0, 1]`.
    pub similarity: f64,
    /// Unified diff lines, truncated. Empty for identical text.
    pub diff: Vec<String>,
}

impl TextComparison {
    /// Number of `+` lines in the (possibly truncated) diff.
    pub fn additions(&self) -> usize {
        count_marked(&self.diff, '+', "+++")
    }

    /// Number of `-` lines in the (possibly truncated) diff.
    pub fn deletions(&self) -> usize {
        count_marked(&self.diff, '-', "---")
    }
}

fn count_marked(lines: &[String], marker: char, header: &str) -> usize {
    lines
        .iter()
        .filter(|l| l.starts_with(marker) && !l.starts_with(header))
        .count()
}

/// Compare two text blobs.
pub fn diff_text(old: &str, new: &str, options: &TextDiffOptions) -> TextComparison {
    TextComparison {
        similarity: similarity_ratio(old, new, options),
        diff: unified_diff(old, new, options.context_lines, options.max_diff_lines),
    }
}

/// Character-level similarity: `2 * M / (|old| + |new|)` where `M` is the
/// number of characters in matching blocks.
///
/// Two empty strings are a full match.
pub fn similarity_ratio(old: &str, new: &str, options: &TextDiffOptions) -> f64 {
    if old == new {
        return 1.0;
    }

    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .timeout(options.timeout())
        .diff_chars(old, new);

    let total = diff.old_slices().len() + diff.new_slices().len();
    if total == 0 {
        return 1.0;
    }

    let matched: usize = diff
        .ops()
        .iter()
        .map(|op| match op {
            DiffOp::Equal { len, .. } => *len,
            _ => 0,
        })
        .sum();

    (2 * matched) as f64 / total as f64
}

/// Line-level unified diff with `context` unchanged lines around each
/// change, keeping at most `max_lines` emitted lines (headers included).
pub fn unified_diff(old: &str, new: &str, context: usize, max_lines: usize) -> Vec<String> {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();

    let ops = capture_diff_slices(Algorithm::Myers, &old_lines, &new_lines);
    let groups = group_diff_ops(ops, context);
    if groups.is_empty() {
        return Vec::new();
    }

    let mut out = vec![format!("--- {OLD_LABEL}"), format!("+++ {NEW_LABEL}")];

    for group in &groups {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        out.push(format!(
            "@@ -{} +{} @@",
            format_range(first.old_range().start, last.old_range().end),
            format_range(first.new_range().start, last.new_range().end),
        ));

        for op in group {
            let (tag, old_range, new_range) = op.as_tag_tuple();
            match tag {
                DiffTag::Equal => {
                    out.extend(old_range.map(|i| format!(" {}", old_lines[i])));
                }
                DiffTag::Delete => {
                    out.extend(old_range.map(|i| format!("-{}", old_lines[i])));
                }
                DiffTag::Insert => {
                    out.extend(new_range.map(|i| format!("+{}", new_lines[i])));
                }
                DiffTag::Replace => {
                    out.extend(old_range.map(|i| format!("-{}", old_lines[i])));
                    out.extend(new_range.map(|i| format!("+{}", new_lines[i])));
                }
            }
        }

        if out.len() >= max_lines {
            break;
        }
    }

    out.truncate(max_lines);
    out
}

/// Hunk range in unified diff notation: the count is omitted when it is 1,
/// and an empty range points at the line before it.
fn format_range(start: usize, end: usize) -> String {
    let len = end - start;
    match len {
        0 => format!("{start},0"),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, len),
    }
}
