// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed vocabularies: colors, sizes, city name variations, and the
//! administrative keywords the line classifier screens for.
//!
//! Color, size, and variation entries are stored in normalized form (see
//! [`dukkan_text::normalize`]); lookups must pass normalized tokens.
//! Administrative keywords are the exception: they are matched against raw
//! line text, because normalization drops some of these words outright.

/// Color vocabulary: canonical normalized Arabic name, then every accepted
/// surface form including transliterations.
const COLORS: &[(&str, &[&str])] = &[
    ("اسود", &["اسود", "black"]),
    ("ابيض", &["ابيض", "white"]),
    ("احمر", &["احمر", "red"]),
    ("ازرق", &["ازرق", "blue"]),
    ("اخضر", &["اخضر", "green"]),
    ("اصفر", &["اصفر", "yellow"]),
    ("برتقالي", &["برتقالي", "orange"]),
    ("بنفسجي", &["بنفسجي", "purple"]),
    ("وردي", &["وردي", "زهري", "pink"]),
    ("بني", &["بني", "brown"]),
    ("رمادي", &["رمادي", "رصاصي", "gray", "grey"]),
    ("سماوي", &["سماوي", "sky"]),
    ("كحلي", &["كحلي", "نيلي", "navy"]),
    ("بيج", &["بيج", "beige"]),
    ("ذهبي", &["ذهبي", "gold"]),
    ("فضي", &["فضي", "silver"]),
    ("عنابي", &["عنابي", "خمري", "maroon"]),
    ("تركواز", &["تركواز", "turquoise"]),
    ("موف", &["موف", "mauve"]),
];

/// Size vocabulary: canonical size code, then accepted surface forms.
/// Multi-word forms are matched by the bigram pass of the extractor.
const SIZES: &[(&str, &[&str])] = &[
    ("s", &["s", "سمول", "صغير", "small"]),
    ("m", &["m", "ميديم", "مديم", "وسط", "متوسط", "medium"]),
    ("l", &["l", "لارج", "كبير", "large"]),
    ("xl", &["xl", "اكس لارج", "اكس", "xlarge"]),
    ("xxl", &["xxl", "دبل اكس", "2xl"]),
    ("xxxl", &["xxxl", "ثلاث اكس", "3xl"]),
];

/// Known spelling/dialect variations of city names, keyed by the normalized
/// canonical name as it appears in the geography reference data. Includes
/// province-vs-capital aliases common in delivery addresses.
const CITY_VARIATIONS: &[(&str, &[&str])] = &[
    ("بغداد", &["بغداد"]),
    ("بصره", &["بصره"]),
    ("موصل", &["موصل", "نينوي"]),
    ("نينوي", &["نينوي", "موصل"]),
    ("اربيل", &["اربيل", "هولير"]),
    ("سليمانيه", &["سليمانيه", "سليماني"]),
    ("دهوك", &["دهوك"]),
    ("كركوك", &["كركوك"]),
    ("ديالي", &["ديالي", "بعقوبه"]),
    ("انبار", &["انبار", "رمادي"]),
    ("بابل", &["بابل", "حله"]),
    ("كربلا", &["كربلا"]),
    ("نجف", &["نجف"]),
    ("ديوانيه", &["ديوانيه", "قادسيه"]),
    ("قادسيه", &["قادسيه", "ديوانيه"]),
    ("مثني", &["مثني", "سماوه"]),
    ("ذي قار", &["ذي قار", "ناصريه"]),
    ("واسط", &["واسط", "كوت"]),
    ("ميسان", &["ميسان", "عماره"]),
    ("صلاح دين", &["صلاح دين", "تكريت"]),
];

/// Keywords of labeled administrative lines ("الاسم: ...", "العنوان: ...").
/// A line containing one of these never classifies as a product line.
///
/// Matched by substring against the raw line, in both ة and ه spellings,
/// since normalization removes مدينة and محافظة entirely.
pub const ADMIN_KEYWORDS: &[&str] = &[
    "اسم",
    "زبون",
    "عنوان",
    "منطقة",
    "منطقه",
    "مدينة",
    "مدينه",
    "محافظة",
    "محافظه",
];

/// Resolve a normalized token (or token bigram) to its canonical color name.
pub fn color_token(token: &str) -> Option<&'static str> {
    lookup(COLORS, token)
}

/// Resolve a normalized token (or token bigram) to its canonical size code.
pub fn size_token(token: &str) -> Option<&'static str> {
    lookup(SIZES, token)
}

/// Registered spelling variations for a normalized canonical city name.
pub fn city_variations(canonical: &str) -> Option<&'static [&'static str]> {
    CITY_VARIATIONS
        .iter()
        .find(|(name, _)| *name == canonical)
        .map(|(_, variants)| *variants)
}

/// Whether a raw line contains any administrative keyword.
pub fn has_admin_keyword(raw_line: &str) -> bool {
    ADMIN_KEYWORDS.iter().any(|k| raw_line.contains(k))
}

fn lookup(table: &'static [(&str, &[&str])], token: &str) -> Option<&'static str> {
    if token.is_empty() {
        return None;
    }
    table
        .iter()
        .find(|(_, forms)| forms.contains(&token))
        .map(|(canonical, _)| *canonical)
}
