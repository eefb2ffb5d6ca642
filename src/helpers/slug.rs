/// Slug normalization for building lyrics page URLs
///
/// Free-text artist and title strings are turned into URL-path-safe tokens
/// the way the lyrics sites expect them: "Dewa 19" becomes "dewa-19",
/// "Hati-Hati di Jalan!" becomes "hati-hati-di-jalan".

/// Normalize a free-text string into a URL-path-safe slug
///
/// This function:
/// - Converts to lowercase
/// - Removes every character outside `[a-z0-9]`, whitespace and hyphens
///   (punctuation and symbols are deleted, not transliterated)
/// - Trims leading/trailing whitespace
/// - Collapses runs of whitespace into a single hyphen
///
/// The result contains only `[a-z0-9-]`. Applying the function twice yields
/// the same result as applying it once.
///
/// # Arguments
/// * `input` - The string to normalize
///
/// # Returns
/// The slug, or an empty string for empty input
pub fn slugify(input: &str) -> String {
    // Step 1: Lowercase and drop everything outside [a-z0-9], whitespace and '-'
    let mut kept = String::new();
    for c in input.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || c == '-' {
            kept.push(c);
        }
    }

    // Step 2: Trim, then collapse whitespace runs into single hyphens
    let mut slug = String::new();
    let mut pending_separator = false;
    for c in kept.trim().chars() {
        if c.is_whitespace() {
            pending_separator = true;
        } else {
            if pending_separator {
                slug.push('-');
                pending_separator = false;
            }
            slug.push(c);
        }
    }

    slug
}
