//! Greedy line differ - compares two texts for visual review

use serde::{Deserialize, Serialize};

/// How a line relates the old text to the new text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Added,
    Removed,
    Unchanged,
}

impl DiffKind {
    /// Display prefix used by `render`
    pub fn prefix(self) -> char {
        match self {
            DiffKind::Added => '+',
            DiffKind::Removed => '-',
            DiffKind::Unchanged => ' ',
        }
    }
}

/// A single annotated line of a diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    #[serde(rename = "type")]
    pub kind: DiffKind,
    pub line: String,
}

impl DiffLine {
    pub fn added(line: impl Into<String>) -> Self {
        Self {
            kind: DiffKind::Added,
            line: line.into(),
        }
    }

    pub fn removed(line: impl Into<String>) -> Self {
        Self {
            kind: DiffKind::Removed,
            line: line.into(),
        }
    }

    pub fn unchanged(line: impl Into<String>) -> Self {
        Self {
            kind: DiffKind::Unchanged,
            line: line.into(),
        }
    }
}

/// Line counts per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
    pub unchanged: usize,
}

impl DiffStats {
    pub fn from_lines(diff: &[DiffLine]) -> Self {
        diff.iter().fold(Self::default(), |mut stats, entry| {
            match entry.kind {
                DiffKind::Added => stats.added += 1,
                DiffKind::Removed => stats.removed += 1,
                DiffKind::Unchanged => stats.unchanged += 1,
            }
            stats
        })
    }

    pub fn is_identical(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// Compute a line diff between two texts
///
/// Both texts are split on `\n`. Two cursors walk the old and new lines;
/// on a mismatch the differ looks ahead for the next occurrence of each
/// current line in the other text and skips toward the closer match.
/// Only a strictly closer match in the new text emits added lines; on a tie
/// the old lines are emitted as removed.
pub fn compute(old_text: &str, new_text: &str) -> Vec<DiffLine> {
    let old_lines: Vec<&str> = old_text.split('\n').collect();
    let new_lines: Vec<&str> = new_text.split('\n').collect();
    let mut diff = Vec::with_capacity(old_lines.len().max(new_lines.len()));

    let mut i = 0;
    let mut j = 0;

    while i < old_lines.len() || j < new_lines.len() {
        if i >= old_lines.len() {
            diff.push(DiffLine::added(new_lines[j]));
            j += 1;
        } else if j >= new_lines.len() {
            diff.push(DiffLine::removed(old_lines[i]));
            i += 1;
        } else if old_lines[i] == new_lines[j] {
            diff.push(DiffLine::unchanged(old_lines[i]));
            i += 1;
            j += 1;
        } else {
            let found_in_new = position_from(&new_lines, j, old_lines[i]);
            let found_in_old = position_from(&old_lines, i, new_lines[j]);

            match (found_in_new, found_in_old) {
                (Some(n), Some(o)) if n - j < o - i => {
                    diff.extend(new_lines[j..n].iter().map(|l| DiffLine::added(*l)));
                    j = n;
                }
                (Some(n), None) => {
                    diff.extend(new_lines[j..n].iter().map(|l| DiffLine::added(*l)));
                    j = n;
                }
                (_, Some(o)) => {
                    diff.extend(old_lines[i..o].iter().map(|l| DiffLine::removed(*l)));
                    i = o;
                }
                (None, None) => {
                    diff.push(DiffLine::removed(old_lines[i]));
                    diff.push(DiffLine::added(new_lines[j]));
                    i += 1;
                    j += 1;
                }
            }
        }
    }

    diff
}

/// Index of the first line equal to `needle` at or after `start`
fn position_from(lines: &[&str], start: usize, needle: &str) -> Option<usize> {
    lines[start..]
        .iter()
        .position(|line| *line == needle)
        .map(|offset| start + offset)
}

/// Render a diff as text, one `+`/`-`/` ` prefixed line per entry
pub fn render(diff: &[DiffLine]) -> String {
    diff.iter()
        .map(|entry| format!("{} {}", entry.kind.prefix(), entry.line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.split('\n').map(str::to_string).collect()
    }

    fn keep(diff: &[DiffLine], skip: DiffKind) -> Vec<String> {
        diff.iter()
            .filter(|d| d.kind != skip)
            .map(|d| d.line.clone())
            .collect()
    }

    #[test]
    fn test_single_line_replacement() {
        let diff = compute("a\nb\nc", "a\nx\nc");
        assert_eq!(
            diff,
            vec![
                DiffLine::unchanged("a"),
                DiffLine::removed("b"),
                DiffLine::added("x"),
                DiffLine::unchanged("c"),
            ]
        );
    }

    #[test]
    fn test_identical_texts_are_unchanged() {
        let text = "{{ char }}\n\n{{ user }}\nend";
        let diff = compute(text, text);

        assert!(diff.iter().all(|d| d.kind == DiffKind::Unchanged));
        assert_eq!(keep(&diff, DiffKind::Added), lines(text));
    }

    #[test]
    fn test_insertion_skips_to_match_in_new() {
        let diff = compute("a\nd", "a\nb\nc\nd");
        assert_eq!(
            diff,
            vec![
                DiffLine::unchanged("a"),
                DiffLine::added("b"),
                DiffLine::added("c"),
                DiffLine::unchanged("d"),
            ]
        );
    }

    #[test]
    fn test_deletion_skips_to_match_in_old() {
        let diff = compute("a\nb\nc\nd", "a\nd");
        assert_eq!(
            diff,
            vec![
                DiffLine::unchanged("a"),
                DiffLine::removed("b"),
                DiffLine::removed("c"),
                DiffLine::unchanged("d"),
            ]
        );
    }

    #[test]
    fn test_closer_match_wins() {
        // "a" reappears 2 lines ahead in new, "b" only 1 line ahead in old
        let diff = compute("a\nb\nc", "b\nx\na");
        assert_eq!(diff[0], DiffLine::removed("a"));
        assert_eq!(diff[1], DiffLine::unchanged("b"));
    }

    #[test]
    fn test_equal_distance_prefers_removed() {
        // Both lines reappear one step ahead; only a strictly closer match in new wins
        let diff = compute("a\nb", "b\na");
        assert_eq!(
            diff,
            vec![
                DiffLine::removed("a"),
                DiffLine::unchanged("b"),
                DiffLine::added("a"),
            ]
        );
    }

    #[test]
    fn test_empty_old_text() {
        // An empty text is a single empty line
        let diff = compute("", "one\ntwo");
        assert_eq!(
            diff,
            vec![
                DiffLine::removed(""),
                DiffLine::added("one"),
                DiffLine::added("two"),
            ]
        );
    }

    #[test]
    fn test_trailing_newline_is_a_line() {
        let diff = compute("a\n", "a");
        assert_eq!(
            diff,
            vec![DiffLine::unchanged("a"), DiffLine::removed("")]
        );
    }

    #[test]
    fn test_both_sides_reconstructable() {
        let cases = [
            ("a\nb\nc", "c\nb\na"),
            ("x\ny\nx\ny", "y\nx\ny\nx\nz"),
            ("{{ if x }}\nhi\n{{ end }}", "{{ if y }}\nhi\nthere\n{{ end }}"),
            ("", ""),
            ("same", "different"),
        ];

        for (old, new) in cases {
            let diff = compute(old, new);
            assert_eq!(keep(&diff, DiffKind::Added), lines(old), "old side of {old:?}");
            assert_eq!(keep(&diff, DiffKind::Removed), lines(new), "new side of {new:?}");
        }
    }

    #[test]
    fn test_render_prefixes() {
        let diff = vec![
            DiffLine::unchanged("keep"),
            DiffLine::removed("old"),
            DiffLine::added("new"),
        ];
        assert_eq!(render(&diff), "  keep\n- old\n+ new");
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn test_stats() {
        let stats = DiffStats::from_lines(&compute("a\nb\nc", "a\nx\nc"));
        assert_eq!(
            stats,
            DiffStats {
                added: 1,
                removed: 1,
                unchanged: 2
            }
        );
        assert!(!stats.is_identical());
        assert!(DiffStats::from_lines(&compute("a", "a")).is_identical());
    }
}
