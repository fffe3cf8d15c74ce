//! Longest-matching-block sequence ratio
//!
//! Ratcliff/Obershelp "gestalt pattern matching": find the longest common
//! contiguous block, then recurse on the pieces to its left and right.
//! With `M` matched elements the ratio is `2M / (|a| + |b|)`.
//!
//! Elements are never treated as junk, so the result only depends on the
//! two sequences.

use std::hash::Hash;

use rustc_hash::FxHashMap;

/// A run of equal elements: `a[a_start..a_start + len] == b[b_start..b_start + len]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingBlock {
    pub a_start: usize,
    pub b_start: usize,
    pub len: usize,
}

/// Longest common block inside `a[alo..ahi]` x `b[blo..bhi]`
///
/// Ties resolve to the block starting earliest in `a`, then earliest in `b`.
fn find_longest_match<T: Eq + Hash>(
    a: &[T],
    b2j: &FxHashMap<&T, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> MatchingBlock {
    let mut best = MatchingBlock {
        a_start: alo,
        b_start: blo,
        len: 0,
    };
    // j2len[j] = length of the match ending at a[i-1], b[j]
    let mut j2len: FxHashMap<usize, usize> = FxHashMap::default();

    for (i, item) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next: FxHashMap<usize, usize> = FxHashMap::default();
        if let Some(positions) = b2j.get(item) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| j2len.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next.insert(j, k);
                if k > best.len {
                    best = MatchingBlock {
                        a_start: i + 1 - k,
                        b_start: j + 1 - k,
                        len: k,
                    };
                }
            }
        }
        j2len = next;
    }

    best
}

/// All maximal matching blocks, ordered by position
pub fn matching_blocks<T: Eq + Hash>(a: &[T], b: &[T]) -> Vec<MatchingBlock> {
    let mut b2j: FxHashMap<&T, Vec<usize>> = FxHashMap::default();
    for (j, item) in b.iter().enumerate() {
        b2j.entry(item).or_default().push(j);
    }

    let mut pending = vec![(0, a.len(), 0, b.len())];
    let mut blocks = Vec::new();

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let block = find_longest_match(a, &b2j, alo, ahi, blo, bhi);
        if block.len == 0 {
            continue;
        }
        blocks.push(block);
        if alo < block.a_start && blo < block.b_start {
            pending.push((alo, block.a_start, blo, block.b_start));
        }
        let a_end = block.a_start + block.len;
        let b_end = block.b_start + block.len;
        if a_end < ahi && b_end < bhi {
            pending.push((a_end, ahi, b_end, bhi));
        }
    }

    blocks.sort_by_key(|blk| (blk.a_start, blk.b_start));
    blocks
}

/// Similarity ratio in `[0.0, 1.0]`
///
/// Two empty sequences are identical (`1.0`).
pub fn sequence_ratio<T: Eq + Hash>(a: &[T], b: &[T]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched: usize = matching_blocks(a, b).iter().map(|blk| blk.len).sum();
    2.0 * matched as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn ratio(a: &str, b: &str) -> f64 {
        sequence_ratio(&chars(a), &chars(b))
    }

    #[test]
    fn test_identical() {
        assert_eq!(ratio("pump", "pump"), 1.0);
    }

    #[test]
    fn test_disjoint() {
        assert_eq!(ratio("abcd", "wxyz"), 0.0);
    }

    #[test]
    fn test_prefix() {
        // 2 * 3 / 7
        assert!((ratio("abcd", "abc") - 6.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty() {
        assert_eq!(ratio("", ""), 1.0);
        assert_eq!(ratio("abc", ""), 0.0);
        assert_eq!(ratio("", "abc"), 0.0);
    }

    #[test]
    fn test_recursive_blocks() {
        // Python: SequenceMatcher(None, "abxcd", "abcd").get_matching_blocks()
        // -> [(0, 0, 2), (3, 2, 2)]
        let blocks = matching_blocks(&chars("abxcd"), &chars("abcd"));
        assert_eq!(
            blocks,
            vec![
                MatchingBlock { a_start: 0, b_start: 0, len: 2 },
                MatchingBlock { a_start: 3, b_start: 2, len: 2 },
            ]
        );
        assert!((ratio("abxcd", "abcd") - 8.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_not_symmetric_in_general_but_bounded() {
        let r1 = ratio("vacuum chamber", "chamber vacuum");
        let r2 = ratio("chamber vacuum", "vacuum chamber");
        assert!((0.0..=1.0).contains(&r1));
        assert!((0.0..=1.0).contains(&r2));
    }

    #[test]
    fn test_token_sequences() {
        let a = vec!["vacuum", "chamber", "door"];
        let b = vec!["vacuum", "chamber"];
        assert!((sequence_ratio(&a, &b) - 0.8).abs() < 1e-12);
    }
}
