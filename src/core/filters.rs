use crate::models::User;
use std::collections::HashSet;

/// Normalize raw preference input before it is stored
///
/// Trims, lowercases, drops empty entries and removes duplicates while
/// keeping the first occurrence in place.
pub fn normalize_preferences<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|p| p.as_ref().trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

/// Keep only users sharing at least one preference with the viewer
pub fn sharing_preferences(viewer_preferences: &[String], users: Vec<User>) -> Vec<User> {
    let viewer: HashSet<&str> = viewer_preferences.iter().map(String::as_str).collect();
    users
        .into_iter()
        .filter(|u| u.preferences.iter().any(|p| viewer.contains(p.as_str())))
        .collect()
}

/// Every preference in use, de-duplicated in first-seen order
pub fn preference_catalog<'a, I>(preference_lists: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut seen = HashSet::new();
    let mut catalog = Vec::new();
    for list in preference_lists {
        for pref in list {
            if seen.insert(pref.as_str()) {
                catalog.push(pref.clone());
            }
        }
    }
    catalog
}
