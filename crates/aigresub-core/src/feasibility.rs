//! Resubstitution feasibility: does some boolean function of a candidate
//! divisor set reproduce the target's truth table?
//!
//! For a fixed set of divisors, group the simulation rows by divisor
//! assignment (`2^k` groups for `k` divisors) and check that the target is
//! constant within every group — if so, a function of exactly those
//! divisors exists that matches the target everywhere. The 4-divisor case
//! is the hot path (driven by [`find_feasible_4`]) and uses the same
//! bit-parallel accumulator layout as the smaller-`k` checks: 2 accumulator
//! words (off-set, on-set) per group, built with pure bitwise ops over
//! whole simulation words rather than a per-row loop.

/// Whether the target is feasible as a plain constant (`k = 0`).
#[must_use]
pub fn feasible_k0(target: &[u64]) -> Option<bool> {
    if target.iter().all(|&w| w == 0) {
        Some(false)
    } else if target.iter().all(|&w| w == u64::MAX) {
        Some(true)
    } else {
        None
    }
}

/// Whether the target is feasible as a single divisor, possibly inverted
/// (`k = 1`). Returns the required polarity (`true` = inverted) if so.
#[must_use]
pub fn feasible_k1(div: &[u64], target: &[u64]) -> Option<bool> {
    if div == target {
        return Some(false);
    }
    if div.iter().zip(target).all(|(d, t)| (d ^ t) == u64::MAX) {
        return Some(true);
    }
    None
}

/// `masks[g]` is the membership mask for assignment group `g`: bit set
/// wherever the simulation row's divisor values match group `g`'s pattern.
/// Feasible iff, for every group, the target is either all-zero or
/// all-one across the rows the mask selects.
fn groups_feasible(masks: &[Vec<u64>], target: &[u64]) -> bool {
    let words = target.len();
    for mask in masks {
        let mut off = vec![0u64; words];
        let mut on = vec![0u64; words];
        for w in 0..words {
            let t = target[w];
            off[w] |= mask[w] & !t;
            on[w] |= mask[w] & t;
        }
        let off_nonzero = off.iter().any(|&w| w != 0);
        let on_nonzero = on.iter().any(|&w| w != 0);
        if off_nonzero && on_nonzero {
            return false;
        }
    }
    true
}

fn bit_mask(divisor: &[u64], words: usize, bit: bool) -> Vec<u64> {
    if bit {
        divisor.to_vec()
    } else {
        (0..words).map(|w| !divisor[w]).collect()
    }
}

/// Generic `k`-divisor feasibility check (`k` in `0..=4`), grouping
/// simulation rows by divisor assignment and requiring the target be
/// constant within every group.
#[must_use]
pub fn feasible_k(divisors: &[&[u64]], target: &[u64]) -> bool {
    let words = target.len();
    let k = divisors.len();
    assert!(k <= 20, "feasibility group count grows as 2^k");
    let num_groups = 1usize << k;
    let mut masks: Vec<Vec<u64>> = Vec::with_capacity(num_groups);
    for g in 0..num_groups {
        let mut combined = vec![u64::MAX; words];
        for (i, div) in divisors.iter().enumerate() {
            let bit = (g >> i) & 1 == 1;
            let m = bit_mask(div, words, bit);
            for w in 0..words {
                combined[w] &= m[w];
            }
        }
        masks.push(combined);
    }
    groups_feasible(&masks, target)
}

/// Exact 4-divisor feasibility check, matching bit-order convention: group
/// index `g` (0..15) has bit 0 -> divisor `i`, bit 1 -> `j`, bit 2 -> `k`,
/// bit 3 -> `l`.
#[must_use]
pub fn solve_resub_overlap_multiword(i: &[u64], j: &[u64], k: &[u64], l: &[u64], target: &[u64]) -> bool {
    feasible_k(&[i, j, k, l], target)
}

/// Exhaustively search all strictly increasing 4-tuples of divisor indices
/// for a feasible combination, returning every tuple that passes (not just
/// the first).
#[must_use]
pub fn find_feasible_4(divisors: &[Vec<u64>], target: &[u64]) -> Vec<[usize; 4]> {
    let d = divisors.len();
    let mut out = Vec::new();
    if d < 4 {
        return out;
    }
    for i in 0..d {
        for j in (i + 1)..d {
            for k in (j + 1)..d {
                for l in (k + 1)..d {
                    if solve_resub_overlap_multiword(
                        &divisors[i],
                        &divisors[j],
                        &divisors[k],
                        &divisors[l],
                        target,
                    ) {
                        out.push([i, j, k, l]);
                    }
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input_pattern;

    #[test]
    fn k0_detects_constant_target() {
        assert_eq!(feasible_k0(&[0]), Some(false));
        assert_eq!(feasible_k0(&[u64::MAX]), Some(true));
        assert_eq!(feasible_k0(&[0x1]), None);
    }

    #[test]
    fn k1_detects_direct_and_inverted_match() {
        let a = input_pattern(0, 1);
        assert_eq!(feasible_k1(&a, &a), Some(false));
        let not_a: Vec<u64> = a.iter().map(|w| !w).collect();
        assert_eq!(feasible_k1(&a, &not_a), Some(true));
    }

    #[test]
    fn four_divisor_and_is_feasible_with_those_four_divisors() {
        let words = 1;
        let a = input_pattern(0, words);
        let b = input_pattern(1, words);
        let c = input_pattern(2, words);
        let d = input_pattern(3, words);
        let target: Vec<u64> = (0..words)
            .map(|w| a[w] & b[w] & c[w] & d[w])
            .collect();
        assert!(solve_resub_overlap_multiword(&a, &b, &c, &d, &target));
    }

    #[test]
    fn unrelated_divisors_are_infeasible() {
        let words = 1;
        let a = input_pattern(0, words);
        let b = input_pattern(1, words);
        let c = input_pattern(2, words);
        let d = input_pattern(3, words);
        // target depends on a 5th, independent input -> no function of
        // a,b,c,d can reproduce it in general.
        let e = input_pattern(4, words);
        assert!(!solve_resub_overlap_multiword(&a, &b, &c, &d, &e));
    }

    #[test]
    fn find_feasible_4_finds_known_tuple_among_larger_divisor_set() {
        let words = 1;
        let a = input_pattern(0, words);
        let b = input_pattern(1, words);
        let c = input_pattern(2, words);
        let d = input_pattern(3, words);
        let e = input_pattern(4, words);
        let target: Vec<u64> = (0..words).map(|w| a[w] & b[w] & c[w] & d[w]).collect();
        let divisors = vec![a, b, c, d, e];
        let found = find_feasible_4(&divisors, &target);
        assert!(found.contains(&[0, 1, 2, 3]));
    }
}
