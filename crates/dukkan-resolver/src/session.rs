// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Disambiguation session construction and reply interpretation.
//!
//! A session stores the candidate list 1-indexed for the user plus the
//! original message text, so the whole parse can be replayed once the user
//! picks. Two reply forms are interpretable: a bare integer inside the
//! candidate range, or a `label: value` line whose value fuzzy-matches
//! exactly one candidate.

use chrono::{DateTime, Duration, Utc};
use dukkan_config::MatchingConfig;
use dukkan_core::types::{
    City, CityId, ConversationId, MatchCandidate, PendingSelection, ProductId, RegionId,
    SelectionCandidate, SelectionContext, SelectionKind,
};
use dukkan_text::{score, unify_digits};

/// The user's accepted choice, resolved into what the replay must hold fixed.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionPin {
    /// Use this region (and its city) instead of re-running geography.
    Region {
        city_id: CityId,
        city_name: String,
        region_id: RegionId,
    },
    /// Use this product for the line at `line_index` instead of re-ranking.
    Variant {
        line_index: usize,
        product_id: ProductId,
    },
}

/// Build a region disambiguation session from near-tie candidates.
pub fn new_region_selection(
    conversation_id: &ConversationId,
    city: &City,
    candidates: &[MatchCandidate],
    original_text: &str,
    now: DateTime<Utc>,
    ttl: Duration,
) -> PendingSelection {
    debug_assert!(!candidates.is_empty());
    PendingSelection {
        conversation_id: conversation_id.clone(),
        kind: SelectionKind::Region,
        candidates: selection_candidates(candidates),
        original_text: original_text.to_string(),
        context: SelectionContext::Region {
            city_id: city.id,
            city_name: city.name.clone(),
        },
        created_at: now,
        expires_at: now + ttl,
    }
}

/// Build a product disambiguation session for one message line.
pub fn new_variant_selection(
    conversation_id: &ConversationId,
    line_index: usize,
    candidates: &[MatchCandidate],
    original_text: &str,
    now: DateTime<Utc>,
    ttl: Duration,
) -> PendingSelection {
    debug_assert!(!candidates.is_empty());
    PendingSelection {
        conversation_id: conversation_id.clone(),
        kind: SelectionKind::Variant,
        candidates: selection_candidates(candidates),
        original_text: original_text.to_string(),
        context: SelectionContext::Variant { line_index },
        created_at: now,
        expires_at: now + ttl,
    }
}

/// Interpret a reply against a pending selection. Returns the 0-based index
/// of the chosen candidate, or `None` when the reply is not a selection.
pub fn interpret_reply(
    text: &str,
    selection: &PendingSelection,
    config: &MatchingConfig,
) -> Option<usize> {
    if let Some(n) = bare_integer(text) {
        let index = usize::try_from(n).ok()?.checked_sub(1)?;
        return (index < selection.candidates.len()).then_some(index);
    }
    labeled_choice(text, selection, config)
}

/// Parse a message that is nothing but an integer, in either digit script.
pub fn bare_integer(text: &str) -> Option<i64> {
    let digits = unify_digits(text.trim());
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Resolve an accepted choice into the pin the replayed parse will honor.
/// `None` only for an out-of-range index.
pub fn pin_for(selection: &PendingSelection, choice: usize) -> Option<SelectionPin> {
    let candidate = selection.candidates.get(choice)?;
    Some(match &selection.context {
        SelectionContext::Region { city_id, city_name } => SelectionPin::Region {
            city_id: *city_id,
            city_name: city_name.clone(),
            region_id: RegionId(candidate.id),
        },
        SelectionContext::Variant { line_index } => SelectionPin::Variant {
            line_index: *line_index,
            product_id: ProductId(candidate.id),
        },
    })
}

fn selection_candidates(candidates: &[MatchCandidate]) -> Vec<SelectionCandidate> {
    candidates
        .iter()
        .map(|c| SelectionCandidate {
            id: c.id,
            label: c.name.clone(),
        })
        .collect()
}

/// `label: value` replies. The value after the colon must fuzzy-match one
/// candidate label at or above the good-match threshold; the best match wins.
fn labeled_choice(
    text: &str,
    selection: &PendingSelection,
    config: &MatchingConfig,
) -> Option<usize> {
    let (_, value) = text.rsplit_once(':')?;
    let mut best: Option<(usize, f64)> = None;
    for (index, candidate) in selection.candidates.iter().enumerate() {
        let s = score(value, &candidate.label);
        if best.is_none_or(|(_, prior)| s > prior) {
            best = Some((index, s));
        }
    }
    let (index, s) = best?;
    (s >= config.good_match).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(labels: &[&str]) -> PendingSelection {
        let candidates: Vec<MatchCandidate> = labels
            .iter()
            .enumerate()
            .map(|(i, name)| MatchCandidate {
                id: i as i64 + 10,
                name: name.to_string(),
                score: 0.8,
            })
            .collect();
        let city = City {
            id: CityId(2),
            name: "الديوانية".to_string(),
            active: true,
        };
        new_region_selection(
            &ConversationId("chat-1".to_string()),
            &city,
            &candidates,
            "النص الاصلي",
            Utc::now(),
            Duration::minutes(10),
        )
    }

    #[test]
    fn bare_integers_in_both_scripts() {
        assert_eq!(bare_integer("2"), Some(2));
        assert_eq!(bare_integer("٢"), Some(2));
        assert_eq!(bare_integer(" 1 "), Some(1));
        assert_eq!(bare_integer("الثاني"), None);
        assert_eq!(bare_integer("2."), None);
        assert_eq!(bare_integer(""), None);
    }

    #[test]
    fn in_range_integer_selects() {
        let s = selection(&["غماس الشرقية", "غماس الغربية"]);
        let cfg = MatchingConfig::default();
        assert_eq!(interpret_reply("1", &s, &cfg), Some(0));
        assert_eq!(interpret_reply("٢", &s, &cfg), Some(1));
    }

    #[test]
    fn out_of_range_integer_is_not_a_selection() {
        let s = selection(&["غماس الشرقية", "غماس الغربية"]);
        let cfg = MatchingConfig::default();
        assert_eq!(interpret_reply("0", &s, &cfg), None);
        assert_eq!(interpret_reply("3", &s, &cfg), None);
        assert_eq!(interpret_reply("99999999999999999999", &s, &cfg), None);
    }

    #[test]
    fn labeled_value_matches_a_candidate() {
        let s = selection(&["غماس الشرقية", "غماس الغربية"]);
        let cfg = MatchingConfig::default();
        assert_eq!(interpret_reply("المنطقة: غماس الغربية", &s, &cfg), Some(1));
    }

    #[test]
    fn labeled_value_below_threshold_is_rejected() {
        let s = selection(&["غماس الشرقية", "غماس الغربية"]);
        let cfg = MatchingConfig::default();
        assert_eq!(interpret_reply("المنطقة: العباسية", &s, &cfg), None);
    }

    #[test]
    fn free_text_without_colon_is_not_a_selection() {
        let s = selection(&["غماس الشرقية", "غماس الغربية"]);
        let cfg = MatchingConfig::default();
        assert_eq!(interpret_reply("غماس الغربية من فضلك", &s, &cfg), None);
    }

    #[test]
    fn pins_carry_the_replay_context() {
        let s = selection(&["غماس الشرقية", "غماس الغربية"]);
        match pin_for(&s, 1) {
            Some(SelectionPin::Region {
                city_id,
                city_name,
                region_id,
            }) => {
                assert_eq!(city_id.0, 2);
                assert_eq!(city_name, "الديوانية");
                assert_eq!(region_id.0, 11);
            }
            other => panic!("expected region pin, got {other:?}"),
        }
        assert!(pin_for(&s, 5).is_none());
    }

    #[test]
    fn variant_selection_pins_the_line_index() {
        let candidates = vec![
            MatchCandidate {
                id: 7,
                name: "جوارب رجالية".to_string(),
                score: 0.8,
            },
            MatchCandidate {
                id: 8,
                name: "جوارب نسائية".to_string(),
                score: 0.8,
            },
        ];
        let s = new_variant_selection(
            &ConversationId("chat-2".to_string()),
            3,
            &candidates,
            "جوارب 2 قطعة",
            Utc::now(),
            Duration::minutes(10),
        );
        assert_eq!(s.kind, SelectionKind::Variant);
        match pin_for(&s, 0) {
            Some(SelectionPin::Variant {
                line_index,
                product_id,
            }) => {
                assert_eq!(line_index, 3);
                assert_eq!(product_id.0, 7);
            }
            other => panic!("expected variant pin, got {other:?}"),
        }
    }

    #[test]
    fn ttl_sets_the_expiry() {
        let s = selection(&["غماس الشرقية"]);
        assert_eq!(s.expires_at - s.created_at, Duration::minutes(10));
        assert!(!s.is_expired(s.created_at));
        assert!(s.is_expired(s.expires_at));
    }
}
