// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic per-line classification of inbound messages.
//!
//! Tags each non-blank line as phone, customer name, product, or address.
//! The rules are intentionally lossy: a line that cannot be identified with
//! confidence falls back to `address`, because an unmatched address fragment
//! only weakens region matching while a misread product line would silently
//! drop an item.

use dukkan_config::ResolverConfig;
use dukkan_text::{normalize, unify_digits};

use crate::vocab;

/// Role inferred for one line of the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    Phone,
    Name,
    Product,
    Address,
}

/// One raw line of the message with its inferred role.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
    pub text: String,
    pub role: LineRole,
}

/// The classified message, reduced to the fields the pipeline consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageParts {
    /// First non-phone line, reduced to Arabic letters and spaces.
    pub customer_name: Option<String>,
    /// Digits of the first line that matched the phone shape.
    pub phone: Option<String>,
    /// Raw product lines in message order.
    pub product_lines: Vec<String>,
    /// Address lines joined with single spaces, in message order.
    pub address: String,
}

/// Classify every non-blank line of a message.
///
/// Rules, in order per line: the first line shaped like a phone number is
/// `phone`; the first line that is not a phone is `name`; later lines with a
/// product signal are `product`; everything else is `address`.
pub fn classify_message(text: &str, config: &ResolverConfig) -> Vec<ParsedLine> {
    let mut phone_seen = false;
    let mut name_seen = false;
    let mut out = Vec::new();

    for raw in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let looks_like_phone = is_phone_line(raw, config);
        let role = if looks_like_phone && !phone_seen {
            phone_seen = true;
            LineRole::Phone
        } else if !looks_like_phone && !name_seen {
            name_seen = true;
            LineRole::Name
        } else if is_product_line(raw, config) {
            LineRole::Product
        } else {
            LineRole::Address
        };
        out.push(ParsedLine {
            text: raw.to_string(),
            role,
        });
    }

    out
}

/// Reduce classified lines to the fields the rest of the pipeline needs.
pub fn split_parts(lines: &[ParsedLine]) -> MessageParts {
    let mut customer_name = None;
    let mut phone = None;
    let mut product_lines = Vec::new();
    let mut address_lines = Vec::new();

    for line in lines {
        match line.role {
            LineRole::Phone => phone = Some(digits_of(&line.text)),
            LineRole::Name => {
                let name = arabic_only(&line.text);
                customer_name = (!name.is_empty()).then_some(name);
            }
            LineRole::Product => product_lines.push(line.text.clone()),
            LineRole::Address => address_lines.push(line.text.as_str()),
        }
    }

    MessageParts {
        customer_name,
        phone,
        product_lines,
        address: address_lines.join(" "),
    }
}

/// A phone line is digits only after stripping punctuation and whitespace,
/// with exactly the configured length and prefix. A line containing letters
/// never qualifies.
fn is_phone_line(raw: &str, config: &ResolverConfig) -> bool {
    let unified = unify_digits(raw);
    if unified.chars().any(|c| c.is_alphabetic()) {
        return false;
    }
    let digits = digits_of(&unified);
    digits.chars().count() == config.phone_length && digits.starts_with(&config.phone_prefix)
}

fn is_product_line(raw: &str, config: &ResolverConfig) -> bool {
    if vocab::has_admin_keyword(raw) {
        return false;
    }
    let normalized = normalize(raw);
    if !normalized.chars().any(|c| c.is_alphabetic()) {
        return false;
    }
    if normalized.chars().count() < config.min_product_line_chars {
        return false;
    }
    if config.strict_product_lines && !has_product_signal(&normalized) {
        return false;
    }
    true
}

/// A product signal is a known color or size token, scanned bigram-first the
/// same way the extractor consumes them.
fn has_product_signal(normalized: &str) -> bool {
    let words: Vec<&str> = normalized.split_whitespace().collect();
    for pair in words.windows(2) {
        let bigram = format!("{} {}", pair[0], pair[1]);
        if vocab::color_token(&bigram).is_some() || vocab::size_token(&bigram).is_some() {
            return true;
        }
    }
    words
        .iter()
        .any(|w| vocab::color_token(w).is_some() || vocab::size_token(w).is_some())
}

fn digits_of(text: &str) -> String {
    unify_digits(text)
        .chars()
        .filter(char::is_ascii_digit)
        .collect()
}

/// Keep Arabic letters and spaces, collapse whitespace runs, trim.
fn arabic_only(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .map(|c| if is_arabic_letter(c) { c } else { ' ' })
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_arabic_letter(c: char) -> bool {
    matches!(c, '\u{0621}'..='\u{064A}')
        || matches!(c, '\u{067E}' | '\u{0686}' | '\u{0698}' | '\u{06A4}' | '\u{06A9}' | '\u{06AF}' | '\u{06CC}')
}
