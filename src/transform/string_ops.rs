use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Returns a lowercase representation, reusing the original string if already lowercase.
pub fn lowercase(input: &str) -> Cow<'_, str> {
    if input.chars().all(|ch| !ch.is_uppercase()) {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(input.to_lowercase())
    }
}

/// Returns an uppercase representation, avoiding allocation when unnecessary.
pub fn uppercase(input: &str) -> Cow<'_, str> {
    if input.chars().all(|ch| !ch.is_lowercase()) {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(input.to_uppercase())
    }
}

/// Title-cases a free-text field with the ordinal-number exception.
///
/// Plain title casing turns "123rd street" into "123Rd Street"; street and
/// suite values need the ordinal suffix kept lowercase. Any digits+letters
/// word is rechecked after casing: an ordinal suffix (th/st/nd/rd) is
/// lowercased, any other letter suffix is capitalized normally.
pub fn title_case(input: &str) -> String {
    let mut titled = String::with_capacity(input.len());
    let mut in_word = false;
    for ch in input.chars() {
        if ch.is_alphabetic() {
            if in_word {
                titled.extend(ch.to_lowercase());
            } else {
                titled.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            titled.push(ch);
            in_word = false;
        }
    }

    numeric_suffix_pattern()
        .replace_all(&titled, |caps: &Captures| {
            let digits = &caps[1];
            let suffix = &caps[2];
            let lowered = suffix.to_ascii_lowercase();
            if matches!(lowered.as_str(), "th" | "st" | "nd" | "rd") {
                format!("{digits}{lowered}")
            } else {
                format!("{digits}{}", capitalize(suffix))
            }
        })
        .into_owned()
}

fn numeric_suffix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b(\d+)([a-zA-Z]+)\b").expect("valid suffix pattern"))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
