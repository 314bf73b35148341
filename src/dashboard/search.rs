use crate::models::Student;

pub const MAX_SUGGESTIONS: usize = 8;

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Typeahead matches for `query`: case-insensitive substring on display name,
/// first [`MAX_SUGGESTIONS`] in list order. A blank query matches nothing.
pub fn suggestions<'a>(students: &'a [Student], query: &str) -> Vec<&'a Student> {
    let query = normalize(query);
    if query.is_empty() {
        return Vec::new();
    }

    students
        .iter()
        .filter(|s| s.display_name.to_lowercase().contains(&query))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Student chosen when a search is confirmed: exact name match first, then
/// the first substring match.
pub fn resolve<'a>(students: &'a [Student], query: &str) -> Option<&'a Student> {
    let query = normalize(query);

    students
        .iter()
        .find(|s| s.display_name.to_lowercase() == query)
        .or_else(|| {
            students
                .iter()
                .find(|s| s.display_name.to_lowercase().contains(&query))
        })
}
