//! Line diffing for template snapshots
//!
//! This crate compares two template texts line by line for human review. The
//! alignment is a greedy look-ahead heuristic: it is good enough to show what
//! changed between two snapshots, but it does not produce a minimal edit
//! script and must not be treated as an LCS diff.

mod differ;

pub use differ::{compute, render, DiffKind, DiffLine, DiffStats};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_functionality() {
        let diff = compute("a\nb", "a\nc");
        assert_eq!(render(&diff), "  a\n- b\n+ c");
    }
}
