//! Keyword extraction and the substring-overlap similarity heuristic used to
//! match free-text column names against canonical schema columns.

fn is_keyword_char(ch: char) -> bool {
    matches!(ch,
        'a'..='z'
        | '0'..='9'
        // Hangul syllables
        | '\u{AC00}'..='\u{D7A3}'
        // Hangul compatibility jamo
        | '\u{3131}'..='\u{318E}')
}

/// Splits `text` into lower-cased alphanumeric/Korean keywords.
///
/// Every other character acts as a separator and single-character tokens are
/// dropped. Duplicates are kept in order of appearance.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let cleaned = text
        .to_lowercase()
        .chars()
        .map(|ch| if is_keyword_char(ch) { ch } else { ' ' })
        .collect::<String>();
    cleaned
        .split_whitespace()
        .filter(|token| token.chars().count() > 1)
        .map(str::to_string)
        .collect()
}

/// Scores how much two texts share, in `[0, 1]`.
///
/// Counts every keyword pair where one side contains the other and divides by
/// the longer keyword list. This is a cheap containment heuristic, not an edit
/// distance: `"판매수량"` and `"수량"` match, `"qty"` and `"quantity"` do not.
///
/// Repeated keywords can push the ratio past 1, so distinct strong matches
/// all report 1.0 here. Rank candidates with [`similarity_ratio`] instead.
pub fn calculate_similarity(a: &str, b: &str) -> f64 {
    similarity_ratio(a, b).min(1.0)
}

/// Unclamped containment ratio behind [`calculate_similarity`].
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let left = extract_keywords(a);
    let right = extract_keywords(b);
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    let matches = left
        .iter()
        .flat_map(|k1| right.iter().map(move |k2| (k1, k2)))
        .filter(|(k1, k2)| k1.contains(k2.as_str()) || k2.contains(k1.as_str()))
        .count();
    let denominator = left.len().max(right.len());
    matches as f64 / denominator as f64
}
