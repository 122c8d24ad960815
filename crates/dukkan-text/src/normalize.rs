// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Arabic text normalization for fuzzy matching.
//!
//! Every comparison in the resolver happens on the output of [`normalize`].
//! The function is total (any UTF-8 input), deterministic, and idempotent:
//! `normalize(normalize(s)) == normalize(s)` for all `s`.

/// Administrative labels dropped as standalone words, in their surface form
/// after letter unification (`قضاء` loses its hamza, taa marbuta becomes haa).
const ADMIN_LABELS: &[&str] = &["محافظه", "مدينه", "قضا", "ناحيه"];

/// Arabic diacritics (tashkeel), the superscript alef, and related marks.
fn is_diacritic(c: char) -> bool {
    matches!(c, '\u{064B}'..='\u{065F}' | '\u{0670}')
}

/// Tatweel (kashida), the elongation character.
const TATWEEL: char = '\u{0640}';

/// Normalize a string for matching.
///
/// Steps, in order:
/// 1. strip diacritics and tatweel;
/// 2. unify letter families (`أ إ آ ٱ → ا`, `ة → ه`, `ى → ي`, `ؤ → و`,
///    `ئ → ي`, bare `ء` removed);
/// 3. lowercase Latin letters mixed into the text;
/// 4. collapse punctuation and symbols into spaces;
/// 5. per word, strip leading `ال` to a fixpoint (keeping at least two
///    characters) and drop administrative labels (`محافظة`, `مدينة`,
///    `قضاء`, `ناحية`);
/// 6. re-join with single spaces.
pub fn normalize(text: &str) -> String {
    let mut flat = String::with_capacity(text.len());

    for c in text.chars() {
        if is_diacritic(c) || c == TATWEEL {
            continue;
        }
        let c = match c {
            '\u{0623}' | '\u{0625}' | '\u{0622}' | '\u{0671}' => '\u{0627}', // alef forms
            '\u{0629}' => '\u{0647}', // taa marbuta -> haa
            '\u{0649}' => '\u{064A}', // alef maqsura -> yaa
            '\u{0624}' => '\u{0648}', // waw with hamza -> waw
            '\u{0626}' => '\u{064A}', // yaa with hamza -> yaa
            '\u{0621}' => continue,   // bare hamza
            other => other,
        };
        for c in c.to_lowercase() {
            if c.is_alphanumeric() {
                flat.push(c);
            } else {
                flat.push(' ');
            }
        }
    }

    let mut out = String::with_capacity(flat.len());
    for word in flat.split_whitespace() {
        let word = strip_definite_article(word);
        if ADMIN_LABELS.contains(&word) {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Strip leading `ال` repeatedly, keeping at least two characters. Looping to
/// the fixpoint inside one call is what keeps [`normalize`] idempotent.
fn strip_definite_article(word: &str) -> &str {
    let mut w = word;
    while let Some(rest) = w.strip_prefix("ال") {
        if rest.chars().count() < 2 {
            break;
        }
        w = rest;
    }
    w
}

/// Map Eastern Arabic (٠–٩) and Extended Arabic (۰–۹) digits to ASCII.
///
/// Kept separate from [`normalize`] so phone and quantity parsing can run on
/// text that still has its punctuation.
pub fn unify_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
            '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
            other => other,
        })
        .collect()
}
