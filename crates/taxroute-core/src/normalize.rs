//! Vietnamese text normalisation for lookup keys.
//!
//! Directory keys and province names are compared in a folded ASCII form:
//! lowercase, tone and vowel marks removed, `đ` written as `d`, and the
//! administrative unit words (quận, huyện, thành phố, thị xã, tỉnh, phường,
//! xã, đặc khu) dropped so that "Quận Hoàn Kiếm" and "Hoàn Kiếm" share a key.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Administrative unit words, matched after marks are folded away.
static ADMIN_UNITS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:quan|huyen|thanh pho|thi xa|tinh|phuong|xa|dac khu)\b").unwrap()
});

/// Normalise free text into a lookup key.
///
/// `normalize("Hà Nội") == "ha noi"`, `normalize("Quận 1") == "1"`.
///
/// The cleaning pass runs to a fixed point, so the result is idempotent even
/// when removing one unit word or symbol brings two fragments together that
/// form another unit word.
pub fn normalize(s: &str) -> String {
    let mut current = clean(&fold_marks(s));
    loop {
        let next = clean(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Lowercase, decompose, and drop combining diacritics (U+0300..U+036F).
fn fold_marks(s: &str) -> String {
    s.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_diacritic(*c))
        .map(|c| if c == 'đ' { 'd' } else { c })
        .collect()
}

fn is_combining_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

fn clean(s: &str) -> String {
    let without_units = ADMIN_UNITS.replace_all(s, " ");
    let kept: String = without_units
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}
