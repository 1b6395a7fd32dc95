use std::collections::HashSet;

/// Number of preferences two sets have in common
///
/// Iterates the smaller set and probes the larger, so the cost is
/// O(min(|a|, |b|)).
#[inline]
pub fn match_score(a: &HashSet<String>, b: &HashSet<String>) -> usize {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small.iter().filter(|pref| large.contains(*pref)).count()
}

/// The shared preferences themselves, sorted for stable output
pub fn shared_preferences(a: &HashSet<String>, b: &HashSet<String>) -> Vec<String> {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let mut shared: Vec<String> = small
        .iter()
        .filter(|pref| large.contains(*pref))
        .cloned()
        .collect();
    shared.sort();
    shared
}
