//! Lenient value comparison shared by datastore lookups and state reconciliation.

use once_cell::sync::Lazy;
use regex::Regex;

/// Tokens that never make two names match on their own.
const NAME_STOPWORDS: [&str; 3] = ["the", "hotel", "house"];

static TIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d{1,2})\s*[:.]?\s*(\d{2})\s*$").expect("time pattern is valid")
});

/// Lenient name comparison.
///
/// Two names match if they are equal, if one contains the other, or if a
/// non-stopword token of one appears among the tokens of the other. Case is ignored.
///
/// ```
/// use turnflow::matching::names_match;
///
/// assert!(names_match("the Lensfield", "Lensfield"));
/// assert!(!names_match("Lensfield", "Acme"));
/// ```
pub fn names_match(a: &str, b: &str) -> bool {
    names_match_excluding(a, b, &[])
}

/// Like [`names_match`], additionally ignoring `exclude` as tokens.
pub fn names_match_excluding(a: &str, b: &str, exclude: &[&str]) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return a == b;
    }
    if a == b || a.contains(&b) || b.contains(&a) {
        return true;
    }
    let b_tokens: Vec<&str> = b.split_whitespace().collect();
    a.split_whitespace()
        .filter(|w| !NAME_STOPWORDS.contains(w) && !exclude.contains(w))
        .any(|w| b_tokens.contains(&w))
}

/// Hour and minute of a time string; `lunch` counts as noon.
pub fn time_values(value: &str) -> Option<(u32, u32)> {
    let value = if value.trim().eq_ignore_ascii_case("lunch") {
        "12:00"
    } else {
        value
    };
    let caps = TIME_REGEX.captures(value)?;
    let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
    Some((hour % 24, minute % 60))
}

/// Canonical `HH:MM` form of a time string, or the input itself when it is not a time.
///
/// ```
/// use turnflow::matching::normalize_time;
///
/// assert_eq!(normalize_time("lunch"), normalize_time("12:00"));
/// assert_eq!(normalize_time("9.30"), "09:30");
/// ```
pub fn normalize_time(value: &str) -> String {
    match time_values(value) {
        Some((h, m)) => format!("{:02}:{:02}", h, m),
        None => value.to_string(),
    }
}

/// `Some(true)` when `t1` is strictly later than `t2`; `None` if either is not a time.
pub fn is_later(t1: &str, t2: &str) -> Option<bool> {
    Some(time_values(t1)? > time_values(t2)?)
}
