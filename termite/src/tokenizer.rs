use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE: Regex = Regex::new(r"[0-9A-Za-z]+").expect("valid regex");
}

/// Splits body text into lowercase tokens. Only ASCII letters and digits
/// are token characters; everything else, non-ASCII included, separates.
/// No stemming, no stopword removal, no length filter.
pub fn tokenize(text: &str) -> Vec<String> {
    RE.find_iter(text)
        .map(|m| m.as_str().to_ascii_lowercase())
        .collect()
}
