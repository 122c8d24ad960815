// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! City and region resolution from free address text.
//!
//! City matching scores the whole address against every active city, with a
//! fixed-confidence boost when the address contains a registered spelling
//! variation. Region matching slides word n-gram windows over the remaining
//! text, because region names are multi-word and embedded in longer strings.

use dukkan_config::MatchingConfig;
use dukkan_core::types::{City, MatchCandidate, Region};
use dukkan_text::{normalize, score};
use tracing::debug;

use crate::vocab;

/// Confidence assigned when the address contains a registered variation of a
/// city name. Deliberately below 1.0 so an exact name match still outranks it.
const VARIATION_BOOST: f64 = 0.95;

/// Floor for a region to count as a hit on an n-gram window.
const REGION_WINDOW_FLOOR: f64 = 0.6;

/// Outcome of matching the address against the city list.
#[derive(Debug, Clone)]
pub struct CityResolution {
    /// The accepted city, if the top score cleared the auto-accept threshold.
    pub best: Option<City>,
    /// Remaining ranked candidates above the candidate floor.
    pub alternates: Vec<MatchCandidate>,
    /// Score of the top-ranked candidate, 0.0 when none cleared the floor.
    pub confidence: f64,
}

/// Ranked regions for the best-scoring substring of the remaining text.
#[derive(Debug, Clone)]
pub struct RegionResolution {
    pub candidates: Vec<MatchCandidate>,
    /// The winning n-gram substring, kept for logging.
    pub matched_text: String,
}

/// Threshold decision over a [`RegionResolution`].
#[derive(Debug, Clone)]
pub enum RegionDecision {
    /// Exactly one region cleared the good-match band without a tie.
    Auto(Region),
    /// Several regions are equally plausible; the user must pick.
    Ambiguous(Vec<MatchCandidate>),
    /// No region cleared the good-match band. Hard failure: a region is
    /// mandatory and there is no default-region fallback.
    NotFound,
}

/// Match the address text against all active cities.
///
/// Confidence per city is the larger of the direct similarity score and
/// [`VARIATION_BOOST`] when the address contains a registered variation.
pub fn resolve_city(cities: &[City], address: &str, config: &MatchingConfig) -> CityResolution {
    let text = normalize(address);
    if text.is_empty() {
        return CityResolution {
            best: None,
            alternates: Vec::new(),
            confidence: 0.0,
        };
    }
    let words: Vec<&str> = text.split_whitespace().collect();

    let mut ranked: Vec<(&City, f64)> = cities
        .iter()
        .filter(|c| c.active)
        .filter_map(|city| {
            let mut confidence = score(&text, &city.name);
            if has_variation(&words, &city.name) {
                confidence = confidence.max(VARIATION_BOOST);
            }
            (confidence >= config.candidate_floor).then_some((city, confidence))
        })
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let confidence = ranked.first().map(|(_, s)| *s).unwrap_or(0.0);
    let best = (confidence >= config.city_auto_accept)
        .then(|| ranked.first().map(|(c, _)| (*c).clone()))
        .flatten();
    let alternates = ranked
        .iter()
        .skip(usize::from(best.is_some()))
        .map(|(c, s)| MatchCandidate {
            id: c.id.0,
            name: c.name.clone(),
            score: *s,
        })
        .collect();

    debug!(
        address = text.as_str(),
        best = best.as_ref().map(|c| c.name.as_str()),
        confidence,
        "city resolution"
    );
    CityResolution {
        best,
        alternates,
        confidence,
    }
}

/// The configured fallback for addresses that name no recognizable city.
/// Returns the active city whose normalized name equals the configured one.
pub fn default_city_policy(cities: &[City], default_city: &str) -> Option<City> {
    let wanted = normalize(default_city);
    cities
        .iter()
        .find(|c| c.active && normalize(&c.name) == wanted)
        .cloned()
}

/// Remove the matched city mention from the address so region matching only
/// sees the rest. Tries the canonical name and every registered variation,
/// longest phrase first. Returns the normalized address unchanged when the
/// city never appeared textually (fuzzy-only match).
pub fn strip_city_needle(address: &str, city: &City) -> String {
    let text = normalize(address);
    let words: Vec<&str> = text.split_whitespace().collect();

    let canonical = normalize(&city.name);
    let mut needles: Vec<&str> = vec![canonical.as_str()];
    if let Some(variants) = vocab::city_variations(&canonical) {
        needles.extend(variants.iter().copied());
    }
    needles.sort_by(|a, b| {
        let by_words = b.split_whitespace().count().cmp(&a.split_whitespace().count());
        by_words.then(b.chars().count().cmp(&a.chars().count()))
    });
    needles.dedup();

    for needle in needles {
        let phrase: Vec<&str> = needle.split_whitespace().collect();
        if let Some(at) = phrase_position(&words, &phrase) {
            let mut rest = words.clone();
            rest.drain(at..at + phrase.len());
            return rest.join(" ");
        }
    }
    text
}

/// Scan the remaining text with n-gram windows of 4, 3, 2, 1 words and score
/// every window substring against every active region.
///
/// The kept substring maximizes `substring chars x regions at or above the
/// window floor`, favoring longer, more specific matches while still
/// surfacing true ambiguity. Candidates are the floor-clearing regions for
/// that substring, ranked by score.
pub fn resolve_region(regions: &[Region], remaining_text: &str) -> RegionResolution {
    let text = normalize(remaining_text);
    let words: Vec<&str> = text.split_whitespace().collect();
    let active: Vec<&Region> = regions.iter().filter(|r| r.active).collect();

    let empty = RegionResolution {
        candidates: Vec::new(),
        matched_text: String::new(),
    };
    if words.is_empty() || active.is_empty() {
        return empty;
    }

    let mut best_weight = 0usize;
    let mut best_substring: Option<String> = None;
    for n in [4usize, 3, 2, 1] {
        if n > words.len() {
            continue;
        }
        for window in words.windows(n) {
            let substring = window.join(" ");
            let hits = active
                .iter()
                .filter(|r| score(&substring, &r.name) >= REGION_WINDOW_FLOOR)
                .count();
            if hits == 0 {
                continue;
            }
            let weight = substring.chars().count() * hits;
            if weight > best_weight {
                best_weight = weight;
                best_substring = Some(substring);
            }
        }
    }

    let Some(substring) = best_substring else {
        return empty;
    };
    let mut candidates: Vec<MatchCandidate> = active
        .iter()
        .filter_map(|r| {
            let s = score(&substring, &r.name);
            (s >= REGION_WINDOW_FLOOR).then(|| MatchCandidate {
                id: r.id.0,
                name: r.name.clone(),
                score: s,
            })
        })
        .collect();
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    debug!(
        matched_text = substring.as_str(),
        candidates = candidates.len(),
        "region n-gram scan"
    );
    RegionResolution {
        candidates,
        matched_text: substring,
    }
}

/// Apply the good-match and tie thresholds to ranked region candidates.
///
/// Contenders are candidates in the good-match band plus any within the tie
/// epsilon of the top score. More than one contender means the resolver must
/// ask rather than guess.
pub fn decide_region(
    resolution: &RegionResolution,
    regions: &[Region],
    config: &MatchingConfig,
) -> RegionDecision {
    let Some(top) = resolution.candidates.first() else {
        return RegionDecision::NotFound;
    };
    if top.score < config.good_match {
        return RegionDecision::NotFound;
    }
    let contenders: Vec<MatchCandidate> = resolution
        .candidates
        .iter()
        .filter(|c| c.score >= config.good_match || top.score - c.score <= config.tie_epsilon)
        .cloned()
        .collect();
    if contenders.len() > 1 {
        return RegionDecision::Ambiguous(contenders);
    }
    match regions.iter().find(|r| r.id.0 == top.id) {
        Some(region) => RegionDecision::Auto(region.clone()),
        None => RegionDecision::NotFound,
    }
}

fn has_variation(address_words: &[&str], city_name: &str) -> bool {
    let canonical = normalize(city_name);
    let Some(variants) = vocab::city_variations(&canonical) else {
        return false;
    };
    variants.iter().any(|variant| {
        let phrase: Vec<&str> = variant.split_whitespace().collect();
        phrase_position(address_words, &phrase).is_some()
    })
}

/// Index of the first occurrence of `phrase` as a contiguous word run.
fn phrase_position(words: &[&str], phrase: &[&str]) -> Option<usize> {
    if phrase.is_empty() || phrase.len() > words.len() {
        return None;
    }
    (0..=words.len() - phrase.len()).find(|&i| &words[i..i + phrase.len()] == phrase)
}
