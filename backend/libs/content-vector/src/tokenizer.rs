/// Feature Tokenizer
///
/// Turns an item's genre, platform and tag names into the space-joined feature string the
/// vectorizer consumes. Order is genres, platforms, tags; duplicates across lists are kept
/// so shared terms accumulate term frequency.

/// Normalize one metadata name into a single token.
///
/// Lower-cases and replaces each internal whitespace character with `_`.
/// Returns `None` for names that are blank after trimming.
pub fn normalize_token(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    Some(
        trimmed
            .chars()
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .collect::<String>()
            .to_lowercase(),
    )
}

/// Normalized tokens for one item, in genre → platform → tag order.
pub fn feature_tokens<G, P, T>(genres: &[G], platforms: &[P], tags: &[T]) -> Vec<String>
where
    G: AsRef<str>,
    P: AsRef<str>,
    T: AsRef<str>,
{
    genres
        .iter()
        .map(|g| g.as_ref())
        .chain(platforms.iter().map(|p| p.as_ref()))
        .chain(tags.iter().map(|t| t.as_ref()))
        .filter_map(normalize_token)
        .collect()
}

/// Feature string for one item (tokens joined by a single space).
pub fn feature_string<G, P, T>(genres: &[G], platforms: &[P], tags: &[T]) -> String
where
    G: AsRef<str>,
    P: AsRef<str>,
    T: AsRef<str>,
{
    feature_tokens(genres, platforms, tags).join(" ")
}

/// Split a stored feature string back into tokens (whitespace only).
pub(crate) fn split_features(features: &str) -> impl Iterator<Item = &str> {
    features.split_whitespace()
}
