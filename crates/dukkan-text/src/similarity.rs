// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Similarity scoring between free-text fragments and reference names.

use crate::normalize::normalize;

/// Score two strings for similarity in `[0.0, 1.0]`.
///
/// Inputs are normalized internally (normalization is idempotent, so callers
/// holding already-normalized text pay nothing extra). Rules, in order:
///
/// 1. both empty after normalization: `1.0`; exactly one empty: `0.0`;
/// 2. equal: `1.0`;
/// 3. one contained in the other: `0.8 + (shorter/longer) * 0.2`, capped at
///    `0.999` so containment never beats an exact match;
/// 4. otherwise `1 - levenshtein/longer`, char-based.
///
/// Symmetric: `score(a, b) == score(b, a)`.
pub fn score(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let a_chars = a.chars().count();
    let b_chars = b.chars().count();
    let (shorter, longer, short_len, long_len) = if a_chars <= b_chars {
        (&a, &b, a_chars, b_chars)
    } else {
        (&b, &a, b_chars, a_chars)
    };

    if longer.contains(shorter.as_str()) {
        let ratio = short_len as f64 / long_len as f64;
        return (0.8 + ratio * 0.2).min(0.999);
    }

    strsim::normalized_levenshtein(&a, &b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn equal_after_normalization_scores_one() {
        approx(score("الديوانية", "ديوانيه"), 1.0);
        approx(score("برشلونة", "برشلونه"), 1.0);
    }

    #[test]
    fn both_empty_scores_one_single_empty_scores_zero() {
        approx(score("", ""), 1.0);
        approx(score("،؟", "   "), 1.0);
        approx(score("غماس", ""), 0.0);
        approx(score("", "غماس"), 0.0);
    }

    #[test]
    fn containment_lands_in_the_point_eight_band() {
        // "ديوانيه" (7 chars) inside "ديوانيه غماس" (12 chars).
        let s = score("ديوانية غماس", "الديوانية");
        approx(s, 0.8 + (7.0 / 12.0) * 0.2);
        assert!(s > 0.8 && s < 1.0);
    }

    #[test]
    fn containment_is_capped_below_exact_match() {
        // 299 of 300 chars contained: the uncapped band value would be
        // 0.99933, one char short of looking like an exact match.
        let longer = "م".repeat(300);
        let shorter = "م".repeat(299);
        approx(score(&longer, &shorter), 0.999);
    }

    #[test]
    fn distance_fallback_matches_normalized_levenshtein() {
        // One substitution across four chars.
        approx(score("غماس", "عماس"), 0.75);
        // Completely different short strings score low.
        assert!(score("غماس", "بغداد") < 0.5);
    }

    #[test]
    fn scoring_is_symmetric() {
        for (a, b) in [
            ("ديوانية غماس", "الديوانية"),
            ("غماس", "عماس"),
            ("برشلونة", "برشلونة ازرق"),
            ("", "شيء"),
        ] {
            assert_eq!(score(a, b), score(b, a));
        }
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn score_stays_in_unit_range(a in any::<String>(), b in any::<String>()) {
                let s = score(&a, &b);
                prop_assert!((0.0..=1.0).contains(&s));
            }

            #[test]
            fn score_is_symmetric(a in any::<String>(), b in any::<String>()) {
                prop_assert_eq!(score(&a, &b), score(&b, &a));
            }

            #[test]
            fn identical_inputs_score_one(a in any::<String>()) {
                prop_assert_eq!(score(&a, &a), 1.0);
            }
        }
    }
}
