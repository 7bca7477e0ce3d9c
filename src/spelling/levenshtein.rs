//! Edit distances used to score spelling suggestions.

use std::cmp::min;

/// Calculate the optimal string alignment distance, which also counts an
/// adjacent transposition as a single edit. Matches the edit set used by the
/// candidate generator.
#[allow(clippy::needless_range_loop)]
pub fn damerau_levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();
    let len1 = s1_chars.len();
    let len2 = s2_chars.len();

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    let mut matrix = vec![vec![0; len2 + 1]; len1 + 1];

    // Initialize first row and column
    for i in 0..=len1 {
        matrix[i][0] = i;
    }
    for j in 0..=len2 {
        matrix[0][j] = j;
    }

    for i in 1..=len1 {
        for j in 1..=len2 {
            let cost = usize::from(s1_chars[i - 1] != s2_chars[j - 1]);

            matrix[i][j] = min(
                min(
                    matrix[i - 1][j] + 1, // deletion
                    matrix[i][j - 1] + 1, // insertion
                ),
                matrix[i - 1][j - 1] + cost, // substitution
            );

            // Check for transposition
            if i > 1
                && j > 1
                && s1_chars[i - 1] == s2_chars[j - 2]
                && s1_chars[i - 2] == s2_chars[j - 1]
            {
                matrix[i][j] = min(matrix[i][j], matrix[i - 2][j - 2] + 1);
            }
        }
    }

    matrix[len1][len2]
}

/// Length of the common prefix relative to the longer word, in `[0.0, 1.0]`.
pub fn prefix_similarity(s1: &str, s2: &str) -> f64 {
    let common = s1
        .chars()
        .zip(s2.chars())
        .take_while(|(a, b)| a == b)
        .count();
    let max_len = s1.chars().count().max(s2.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    common as f64 / max_len as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damerau_levenshtein_distance() {
        assert_eq!(damerau_levenshtein_distance("casa", "casa"), 0);
        assert_eq!(damerau_levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(damerau_levenshtein_distance("ab", "ba"), 1);
        assert_eq!(damerau_levenshtein_distance("voce", "vcoe"), 1);
        assert_eq!(damerau_levenshtein_distance("caza", "casas"), 2);
        assert_eq!(damerau_levenshtein_distance("", "abc"), 3);
    }

    #[test]
    fn test_unicode_distance() {
        assert_eq!(damerau_levenshtein_distance("não", "nao"), 1);
    }

    #[test]
    fn test_prefix_similarity() {
        assert_eq!(prefix_similarity("casa", "casa"), 1.0);
        assert_eq!(prefix_similarity("casa", "rua"), 0.0);
        assert!((prefix_similarity("casa", "cas") - 0.75).abs() < 1e-9);
        assert_eq!(prefix_similarity("", ""), 1.0);
    }
}
