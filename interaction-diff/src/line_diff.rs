//! Sequence alignment over opaque comparable units.
//!
//! Alignment is a Myers shortest edit script from `similar`. Its tie-break is
//! fixed, so identical inputs always produce identical opcodes. The raw
//! operations are coalesced so that equal runs and changed runs alternate.

use serde::Serialize;
use similar::{capture_diff_slices, Algorithm, DiffTag};
use std::{hash::Hash, ops::Range};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Equal,
    Insert,
    Delete,
    Replace,
}

impl Tag {
    pub fn is_equal(self) -> bool {
        self == Tag::Equal
    }
}

/// `a[a_range]` turns into `b[b_range]` according to `tag`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opcode {
    pub tag: Tag,
    pub a_range: Range<usize>,
    pub b_range: Range<usize>,
}

fn changed_tag(a_range: &Range<usize>, b_range: &Range<usize>) -> Tag {
    match (a_range.is_empty(), b_range.is_empty()) {
        (false, false) => Tag::Replace,
        (false, true) => Tag::Delete,
        _ => Tag::Insert,
    }
}

/// Computes the opcodes turning `a` into `b`. Opcodes are contiguous and cover
/// both sequences completely; an equal run is never next to another equal
/// run, and a changed run never next to another changed run.
pub fn diff_sequences<T: Eq + Hash + Ord>(a: &[T], b: &[T]) -> Vec<Opcode> {
    let mut opcodes: Vec<Opcode> = Vec::new();

    for op in capture_diff_slices(Algorithm::Myers, a, b) {
        let (tag, a_range, b_range) = op.as_tag_tuple();
        if a_range.is_empty() && b_range.is_empty() {
            continue;
        }

        let equal = tag == DiffTag::Equal;
        match opcodes.last_mut() {
            Some(last) if last.tag.is_equal() == equal => {
                last.a_range.end = a_range.end;
                last.b_range.end = b_range.end;
                if !equal {
                    last.tag = changed_tag(&last.a_range, &last.b_range);
                }
            }
            _ => opcodes.push(Opcode {
                tag: if equal {
                    Tag::Equal
                } else {
                    changed_tag(&a_range, &b_range)
                },
                a_range,
                b_range,
            }),
        }
    }

    opcodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tags(a: &[&str], b: &[&str]) -> Vec<(Tag, Range<usize>, Range<usize>)> {
        diff_sequences(a, b)
            .into_iter()
            .map(|op| (op.tag, op.a_range, op.b_range))
            .collect()
    }

    fn common_subsequence_len(a: &[u8], b: &[u8]) -> usize {
        let mut table = vec![vec![0; b.len() + 1]; a.len() + 1];
        for i in (0..a.len()).rev() {
            for j in (0..b.len()).rev() {
                table[i][j] = if a[i] == b[j] {
                    table[i + 1][j + 1] + 1
                } else {
                    table[i + 1][j].max(table[i][j + 1])
                };
            }
        }
        table[0][0]
    }

    #[test]
    fn identical_sequences_are_one_equal_run() {
        assert_eq!(
            tags(&["a", "b", "c"], &["a", "b", "c"]),
            vec![(Tag::Equal, 0..3, 0..3)]
        );
    }

    #[test]
    fn empty_sequences_have_no_opcodes() {
        assert!(diff_sequences::<&str>(&[], &[]).is_empty());
        assert_eq!(tags(&[], &["x"]), vec![(Tag::Insert, 0..0, 0..1)]);
        assert_eq!(tags(&["x"], &[]), vec![(Tag::Delete, 0..1, 0..0)]);
    }

    #[test]
    fn classifies_changed_lines() {
        assert_eq!(
            tags(&["a", "b", "c", "d"], &["a", "x", "c", "d", "e"]),
            vec![
                (Tag::Equal, 0..1, 0..1),
                (Tag::Replace, 1..2, 1..2),
                (Tag::Equal, 2..4, 2..4),
                (Tag::Insert, 4..4, 4..5),
            ]
        );
    }

    #[test]
    fn a_changed_run_between_equal_lines_becomes_one_replace() {
        assert_eq!(
            tags(&["a", "b", "c", "z"], &["a", "x", "y", "z"]),
            vec![
                (Tag::Equal, 0..1, 0..1),
                (Tag::Replace, 1..3, 1..3),
                (Tag::Equal, 3..4, 3..4),
            ]
        );
    }

    #[test]
    fn ambiguous_alignments_are_stable() {
        let first = diff_sequences(&["a", "b"], &["b", "a"]);

        assert_eq!(first, diff_sequences(&["a", "b"], &["b", "a"]));
        let equal_lines: usize = first
            .iter()
            .filter(|op| op.tag.is_equal())
            .map(|op| op.a_range.len())
            .sum();
        assert_eq!(equal_lines, 1);
    }

    proptest! {
        #[test]
        fn opcodes_cover_both_sequences(
            a in proptest::collection::vec(0u8..4, 0..24),
            b in proptest::collection::vec(0u8..4, 0..24),
        ) {
            let opcodes = diff_sequences(&a, &b);
            let (mut i, mut j) = (0, 0);

            for op in &opcodes {
                prop_assert_eq!(op.a_range.start, i);
                prop_assert_eq!(op.b_range.start, j);
                if op.tag == Tag::Equal {
                    prop_assert_eq!(&a[op.a_range.clone()], &b[op.b_range.clone()]);
                }
                i = op.a_range.end;
                j = op.b_range.end;
            }

            prop_assert_eq!((i, j), (a.len(), b.len()));
            prop_assert!(opcodes
                .windows(2)
                .all(|pair| pair[0].tag.is_equal() != pair[1].tag.is_equal()));
        }

        #[test]
        fn equal_runs_form_a_longest_common_subsequence(
            a in proptest::collection::vec(0u8..4, 0..16),
            b in proptest::collection::vec(0u8..4, 0..16),
        ) {
            let equal_lines: usize = diff_sequences(&a, &b)
                .iter()
                .filter(|op| op.tag.is_equal())
                .map(|op| op.a_range.len())
                .sum();

            prop_assert_eq!(equal_lines, common_subsequence_len(&a, &b));
        }

        #[test]
        fn a_sequence_against_itself_is_all_equal(a in proptest::collection::vec(0u8..4, 0..24)) {
            prop_assert!(diff_sequences(&a, &a).iter().all(|op| op.tag == Tag::Equal));
        }

        #[test]
        fn the_same_inputs_give_the_same_opcodes(
            a in proptest::collection::vec(0u8..4, 0..16),
            b in proptest::collection::vec(0u8..4, 0..16),
        ) {
            prop_assert_eq!(diff_sequences(&a, &b), diff_sequences(&a, &b));
        }
    }
}
