// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Product line extraction and catalog matching.
//!
//! Extraction peels color and size tokens off the line first, then runs an
//! ordered list of quantity/price patterns over what is left. The first
//! pattern that matches wins; a line matching none of them is treated as a
//! bare product name with quantity 1.

use std::sync::LazyLock;

use dukkan_config::MatchingConfig;
use dukkan_core::types::{MatchCandidate, Product, Variant};
use dukkan_text::{normalize, score, unify_digits};
use regex::Regex;

use crate::vocab;

/// Everything extracted from one product line before catalog matching.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductLineDraft {
    /// The line as it appeared in the message.
    pub raw: String,
    /// Normalized product name with color/size/quantity/price stripped.
    pub name: String,
    /// Canonical color code, when a known color token was present.
    pub color: Option<String>,
    /// Canonical size code, when a known size token was present.
    pub size: Option<String>,
    pub quantity: u32,
    /// Unit price written in the message itself, in dinars.
    pub explicit_price: Option<i64>,
}

/// Catalog decision for one extracted product name.
#[derive(Debug, Clone)]
pub enum ProductDecision {
    Matched(Product),
    /// Several products score within the tie margin of the best.
    Ambiguous(Vec<MatchCandidate>),
    NotFound,
}

/// Parse one raw product line into a draft.
pub fn extract_line(raw: &str) -> ProductLineDraft {
    let text = normalize(&unify_digits(raw));
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut consumed = vec![false; words.len()];

    let color = strip_token(&words, &mut consumed, vocab::color_token);
    let size = strip_token(&words, &mut consumed, vocab::size_token);

    let remaining = words
        .iter()
        .zip(&consumed)
        .filter(|(_, used)| !**used)
        .map(|(w, _)| *w)
        .collect::<Vec<_>>()
        .join(" ");

    let extraction = EXTRACTORS
        .iter()
        .find_map(|extract| extract(&remaining))
        .unwrap_or(Extraction {
            name: remaining.clone(),
            quantity: None,
            price: None,
        });

    ProductLineDraft {
        raw: raw.to_string(),
        name: extraction.name,
        color: color.map(str::to_string),
        size: size.map(str::to_string),
        quantity: extraction.quantity.unwrap_or(1),
        explicit_price: extraction.price,
    }
}

/// Both catalog-side spellings of the extracted name, for stores that search
/// raw (un-normalized) product names.
pub fn needle_respellings(name: &str) -> Vec<String> {
    let base = normalize(name);
    let flipped = base.replace('ه', "ة");
    let mut needles = vec![base];
    if !needles.contains(&flipped) {
        needles.push(flipped);
    }
    needles
}

/// Rank candidate products against the extracted name and apply the
/// good-match and tie thresholds.
///
/// Products tie only when they are both within the tie epsilon of the top
/// score and inside the good-match band, so a clear exact match is never
/// dragged into ambiguity by a containment-scored sibling.
pub fn rank_products(
    products: &[Product],
    extracted_name: &str,
    config: &MatchingConfig,
) -> ProductDecision {
    let mut ranked: Vec<(&Product, f64)> = products
        .iter()
        .filter(|p| p.active)
        .filter_map(|p| {
            let s = score(extracted_name, &p.name);
            (s >= config.candidate_floor).then_some((p, s))
        })
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let Some((top, top_score)) = ranked.first() else {
        return ProductDecision::NotFound;
    };
    if *top_score < config.good_match {
        return ProductDecision::NotFound;
    }
    let contenders: Vec<MatchCandidate> = ranked
        .iter()
        .filter(|(_, s)| top_score - s <= config.tie_epsilon && *s >= config.good_match)
        .map(|(p, s)| MatchCandidate {
            id: p.id.0,
            name: p.name.clone(),
            score: *s,
        })
        .collect();
    if contenders.len() > 1 {
        return ProductDecision::Ambiguous(contenders);
    }
    ProductDecision::Matched((*top).clone())
}

/// Pick the variant that best fits the extracted color and size.
///
/// Preference order: both dimensions match, then color alone, then size
/// alone, then the first variant with positive available stock, then the
/// first variant. Returns `None` only for a product with no variants.
pub fn select_variant<'a>(
    product: &'a Product,
    color: Option<&str>,
    size: Option<&str>,
) -> Option<&'a Variant> {
    let variants = &product.variants;
    if variants.is_empty() {
        return None;
    }
    if let (Some(c), Some(s)) = (color, size) {
        if let Some(v) = variants
            .iter()
            .find(|v| color_matches(v, c) && size_matches(v, s))
        {
            return Some(v);
        }
    }
    if let Some(c) = color {
        if let Some(v) = variants.iter().find(|v| color_matches(v, c)) {
            return Some(v);
        }
    }
    if let Some(s) = size {
        if let Some(v) = variants.iter().find(|v| size_matches(v, s)) {
            return Some(v);
        }
    }
    variants
        .iter()
        .find(|v| v.available() > 0)
        .or_else(|| variants.first())
}

/// Unit price for a line: an explicitly written price always wins, then the
/// variant price, then the product base price.
pub fn price_resolution_policy(
    explicit: Option<i64>,
    variant_price: Option<i64>,
    base_price: i64,
) -> i64 {
    explicit.or(variant_price).unwrap_or(base_price)
}

fn color_matches(variant: &Variant, wanted: &str) -> bool {
    dimension_matches(variant.color.as_deref(), wanted, vocab::color_token)
}

fn size_matches(variant: &Variant, wanted: &str) -> bool {
    dimension_matches(variant.size.as_deref(), wanted, vocab::size_token)
}

/// Compare a catalog dimension value against an extracted canonical code.
///
/// Known catalog tokens must agree on the canonical code, so `l` never
/// matches an `xl` variant through substring containment. Containment is the
/// fallback for catalog values outside the vocabulary.
fn dimension_matches(
    catalog: Option<&str>,
    wanted: &str,
    canon: fn(&str) -> Option<&'static str>,
) -> bool {
    let Some(raw) = catalog else {
        return false;
    };
    let value = normalize(raw);
    if value.is_empty() {
        return false;
    }
    match canon(&value) {
        Some(code) => code == wanted,
        None => value.contains(wanted) || wanted.contains(value.as_str()),
    }
}

/// Consume the first vocabulary hit among the unconsumed words, trying
/// two-word phrases before single words so compound tokens never half-match.
fn strip_token(
    words: &[&str],
    consumed: &mut [bool],
    lookup: fn(&str) -> Option<&'static str>,
) -> Option<&'static str> {
    for i in 0..words.len().saturating_sub(1) {
        if consumed[i] || consumed[i + 1] {
            continue;
        }
        let phrase = format!("{} {}", words[i], words[i + 1]);
        if let Some(code) = lookup(&phrase) {
            consumed[i] = true;
            consumed[i + 1] = true;
            return Some(code);
        }
    }
    for (i, word) in words.iter().enumerate() {
        if consumed[i] {
            continue;
        }
        if let Some(code) = lookup(word) {
            consumed[i] = true;
            return Some(code);
        }
    }
    None
}

// --- Quantity/price extraction strategies ---

/// Below this a bare trailing number is not believable as a dinar price.
/// Amounts under the threshold must carry the `الف` or `د.ع` marker.
const MIN_PLAUSIBLE_PRICE: i64 = 100;

struct Extraction {
    name: String,
    quantity: Option<u32>,
    price: Option<i64>,
}

type Extractor = fn(&str) -> Option<Extraction>;

/// Ordered extraction strategies; the first match wins. Punctuation is
/// already collapsed by normalization, so the patterns see plain
/// space-separated tokens.
const EXTRACTORS: &[Extractor] = &[
    qty_then_price,
    qty_pieces_then_price,
    price_only,
    qty_pieces,
    price_in_dinars,
];

/// `name qty price`, e.g. from "قميص - 2 - 15000".
fn qty_then_price(text: &str) -> Option<Extraction> {
    static RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^(?P<name>.+?) (?P<qty>\d{1,2}) (?P<price>\d+)(?P<kilo> الف)?$").unwrap()
    });
    let caps = RE.captures(text)?;
    Some(Extraction {
        name: caps["name"].to_string(),
        quantity: Some(caps["qty"].parse().ok()?),
        price: Some(parse_price(&caps["price"], caps.name("kilo").is_some())?),
    })
}

/// `name qty قطعة price`, e.g. from "قميص 2 قطعة - 5000".
fn qty_pieces_then_price(text: &str) -> Option<Extraction> {
    static RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^(?P<name>.+?) (?P<qty>\d{1,2}) قطعه (?P<price>\d+)(?P<kilo> الف)?$")
            .unwrap()
    });
    let caps = RE.captures(text)?;
    Some(Extraction {
        name: caps["name"].to_string(),
        quantity: Some(caps["qty"].parse().ok()?),
        price: Some(parse_price(&caps["price"], caps.name("kilo").is_some())?),
    })
}

/// `name price`, e.g. from "قميص - 15000" or "بنطلون 25 الف".
fn price_only(text: &str) -> Option<Extraction> {
    static RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^(?P<name>.+?) (?P<price>\d+)(?P<kilo> الف)?$").unwrap()
    });
    let caps = RE.captures(text)?;
    Some(Extraction {
        name: caps["name"].to_string(),
        quantity: None,
        price: Some(parse_price(&caps["price"], caps.name("kilo").is_some())?),
    })
}

/// `name qty قطعة`, e.g. "تيشيرت 3 قطعة".
fn qty_pieces(text: &str) -> Option<Extraction> {
    static RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^(?P<name>.+?) (?P<qty>\d{1,2}) قطعه$").unwrap());
    let caps = RE.captures(text)?;
    Some(Extraction {
        name: caps["name"].to_string(),
        quantity: Some(caps["qty"].parse().ok()?),
        price: None,
    })
}

/// `name price د.ع`; the currency marker makes any amount a price.
fn price_in_dinars(text: &str) -> Option<Extraction> {
    static RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^(?P<name>.+?) (?P<price>\d+)(?P<kilo> الف)? د ع$").unwrap()
    });
    let caps = RE.captures(text)?;
    let price: i64 = caps["price"].parse().ok()?;
    let price = if caps.name("kilo").is_some() {
        price.checked_mul(1000)?
    } else {
        price
    };
    Some(Extraction {
        name: caps["name"].to_string(),
        quantity: None,
        price: Some(price),
    })
}

/// `None` rejects the whole pattern so the next strategy gets a try.
fn parse_price(digits: &str, thousands: bool) -> Option<i64> {
    let value: i64 = digits.parse().ok()?;
    if thousands {
        return value.checked_mul(1000);
    }
    (value >= MIN_PLAUSIBLE_PRICE).then_some(value)
}

#[cfg(test)]
mod tests {
    use dukkan_core::types::{ProductId, VariantId};

    use super::*;

    fn variant(id: i64, color: Option<&str>, size: Option<&str>, on_hand: i64) -> Variant {
        Variant {
            id: VariantId(id),
            product_id: ProductId(1),
            color: color.map(str::to_string),
            size: size.map(str::to_string),
            price: None,
            on_hand,
            reserved: 0,
        }
    }

    fn product(id: i64, name: &str, variants: Vec<Variant>) -> Product {
        Product {
            id: ProductId(id),
            name: name.to_string(),
            base_price: 10_000,
            active: true,
            variants,
        }
    }

    #[test]
    fn extracts_color_size_and_name() {
        let draft = extract_line("برشلونة ازرق لارج");
        assert_eq!(draft.name, "برشلونه");
        assert_eq!(draft.color.as_deref(), Some("ازرق"));
        assert_eq!(draft.size.as_deref(), Some("l"));
        assert_eq!(draft.quantity, 1);
        assert_eq!(draft.explicit_price, None);
    }

    #[test]
    fn two_word_size_token_is_consumed_whole() {
        let draft = extract_line("برشلونة اكس لارج");
        assert_eq!(draft.size.as_deref(), Some("xl"));
        assert_eq!(draft.name, "برشلونه");
    }

    #[test]
    fn dashed_quantity_and_price() {
        let draft = extract_line("قميص - 2 - 15000");
        assert_eq!(draft.name, "قميص");
        assert_eq!(draft.quantity, 2);
        assert_eq!(draft.explicit_price, Some(15_000));
    }

    #[test]
    fn pieces_pattern_sets_quantity_only() {
        let draft = extract_line("تيشيرت 3 قطعة");
        assert_eq!(draft.name, "تيشيرت");
        assert_eq!(draft.quantity, 3);
        assert_eq!(draft.explicit_price, None);
    }

    #[test]
    fn pieces_then_price() {
        let draft = extract_line("قميص احمر 2 قطعة - 5000");
        assert_eq!(draft.name, "قميص");
        assert_eq!(draft.color.as_deref(), Some("احمر"));
        assert_eq!(draft.quantity, 2);
        assert_eq!(draft.explicit_price, Some(5_000));
    }

    #[test]
    fn thousands_suffix_multiplies() {
        let draft = extract_line("بنطلون 25 الف");
        assert_eq!(draft.name, "بنطلون");
        assert_eq!(draft.explicit_price, Some(25_000));
    }

    #[test]
    fn dinar_marker_accepts_any_amount() {
        let draft = extract_line("قميص 5000 د.ع");
        assert_eq!(draft.name, "قميص");
        assert_eq!(draft.explicit_price, Some(5_000));
    }

    #[test]
    fn eastern_digits_are_read() {
        let draft = extract_line("قميص ٢ قطعة");
        assert_eq!(draft.quantity, 2);
    }

    #[test]
    fn bare_name_gets_defaults() {
        let draft = extract_line("برشلونة");
        assert_eq!(draft.name, "برشلونه");
        assert_eq!(draft.quantity, 1);
        assert_eq!(draft.explicit_price, None);
    }

    #[test]
    fn small_bare_numbers_are_not_prices() {
        // Without a dinar or thousands marker, "2" stays part of the name
        // rather than being guessed as a price or quantity.
        let draft = extract_line("قميص 2");
        assert_eq!(draft.name, "قميص 2");
        assert_eq!(draft.explicit_price, None);
    }

    #[test]
    fn respellings_cover_both_taa_forms() {
        assert_eq!(needle_respellings("برشلونة"), vec!["برشلونه", "برشلونة"]);
        assert_eq!(needle_respellings("قميص"), vec!["قميص"]);
    }

    #[test]
    fn exact_product_beats_containment_sibling() {
        let products = vec![
            product(1, "برشلونة", vec![]),
            product(2, "برشلونة سيتي", vec![]),
        ];
        match rank_products(&products, "برشلونه", &MatchingConfig::default()) {
            ProductDecision::Matched(p) => assert_eq!(p.id.0, 1),
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn near_equal_products_are_ambiguous() {
        let products = vec![
            product(1, "جوارب رجالية", vec![]),
            product(2, "جوارب نسائية", vec![]),
        ];
        match rank_products(&products, "جوارب", &MatchingConfig::default()) {
            ProductDecision::Ambiguous(candidates) => assert_eq!(candidates.len(), 2),
            other => panic!("expected ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn weak_matches_are_not_found() {
        let products = vec![product(1, "قميص", vec![]), product(2, "بنطلون", vec![])];
        assert!(matches!(
            rank_products(&products, "قبعه", &MatchingConfig::default()),
            ProductDecision::NotFound
        ));
    }

    #[test]
    fn inactive_products_never_match() {
        let mut p = product(1, "قميص", vec![]);
        p.active = false;
        assert!(matches!(
            rank_products(&[p], "قميص", &MatchingConfig::default()),
            ProductDecision::NotFound
        ));
    }

    #[test]
    fn variant_matching_prefers_both_dimensions() {
        let p = product(
            1,
            "برشلونة",
            vec![
                variant(1, Some("أزرق"), Some("L"), 5),
                variant(2, Some("أحمر"), Some("L"), 5),
            ],
        );
        let v = select_variant(&p, Some("احمر"), Some("l")).unwrap();
        assert_eq!(v.id.0, 2);
    }

    #[test]
    fn small_size_code_does_not_match_larger_one() {
        let p = product(
            1,
            "برشلونة",
            vec![
                variant(1, None, Some("XL"), 5),
                variant(2, None, Some("L"), 5),
            ],
        );
        let v = select_variant(&p, None, Some("l")).unwrap();
        assert_eq!(v.id.0, 2);
    }

    #[test]
    fn unknown_catalog_token_falls_back_to_containment() {
        let p = product(
            1,
            "قميص",
            vec![variant(1, Some("ازرق غامق"), None, 5)],
        );
        let v = select_variant(&p, Some("ازرق"), None).unwrap();
        assert_eq!(v.id.0, 1);
    }

    #[test]
    fn no_extraction_prefers_stocked_variant() {
        let p = product(
            1,
            "قميص",
            vec![
                variant(1, Some("أزرق"), Some("M"), 0),
                variant(2, Some("أحمر"), Some("L"), 3),
            ],
        );
        let v = select_variant(&p, None, None).unwrap();
        assert_eq!(v.id.0, 2);
    }

    #[test]
    fn all_out_of_stock_falls_back_to_first_variant() {
        let p = product(
            1,
            "قميص",
            vec![
                variant(1, Some("أزرق"), Some("M"), 0),
                variant(2, Some("أحمر"), Some("L"), 0),
            ],
        );
        let v = select_variant(&p, None, None).unwrap();
        assert_eq!(v.id.0, 1);
    }

    #[test]
    fn no_variants_selects_nothing() {
        let p = product(1, "قميص", vec![]);
        assert!(select_variant(&p, None, None).is_none());
    }

    #[test]
    fn price_policy_precedence() {
        assert_eq!(price_resolution_policy(Some(7_000), Some(9_000), 10_000), 7_000);
        assert_eq!(price_resolution_policy(None, Some(9_000), 10_000), 9_000);
        assert_eq!(price_resolution_policy(None, None, 10_000), 10_000);
    }
}
