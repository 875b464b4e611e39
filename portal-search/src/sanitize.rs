//! Cleanup of raw search bar input.

/// Longest query (in characters) that is ever sent to the database.
pub const MAX_QUERY_LENGTH: usize = 100;

const STRIPPED_CHARS: [char; 5] = ['<', '>', ';', '"', '\''];

/// Trim the input, drop characters that have no business in a search term and cap the length.
///
/// # Examples
///
/// ```
/// use portal_search::sanitize;
///
/// assert_eq!(sanitize("  ab<c>;d'  "), "abcd");
/// ```
pub fn sanitize(raw: &str) -> String {
    let stripped: String = raw
        .trim()
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect();

    stripped.trim().chars().take(MAX_QUERY_LENGTH).collect()
}

/// True if the trimmed query has at least `min_length` characters.
pub fn is_valid_query(query: &str, min_length: usize) -> bool {
    query.trim().chars().count() >= min_length
}
