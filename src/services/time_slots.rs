//! Wall-clock arithmetic shared by the slot resolver and event mutator.

/// Convert an "HH:MM" string to minutes since midnight.
///
/// Parsing is deliberately lenient: a missing or non-numeric component
/// counts as zero, so `"9"` is 540, `"abc:30"` is 30 and `""` is 0. The
/// leniency matches the data already in the wild; callers that need strict
/// validation must check the raw string themselves.
pub fn to_minutes(time: &str) -> i64 {
    let mut parts = time.split(':');
    let hours = parts
        .next()
        .and_then(|h| h.trim().parse::<i64>().ok())
        .unwrap_or(0);
    let minutes = parts
        .next()
        .and_then(|m| m.trim().parse::<i64>().ok())
        .unwrap_or(0);
    hours * 60 + minutes
}

/// Whether the half-open intervals [s1, e1) and [s2, e2) intersect.
///
/// Zero-length and inverted intervals follow the same rule; enforcing
/// `start < end` is the caller's job when that invariant matters.
pub fn intervals_overlap(s1: i64, e1: i64, s2: i64, e2: i64) -> bool {
    !(e1 <= s2 || s1 >= e2)
}
