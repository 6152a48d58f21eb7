//! Edit-distance calculation for fuzzy term matching.

use std::cmp::min;

/// Calculate the Levenshtein distance between two strings.
/// This is the minimum number of single-character edits (insertions,
/// deletions, or substitutions) required to change one word into another.
#[allow(clippy::needless_range_loop)]
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let len1 = s1.chars().count();
    let len2 = s2.chars().count();

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    let mut matrix = vec![vec![0; len2 + 1]; len1 + 1];

    for i in 0..=len1 {
        matrix[i][0] = i;
    }
    for j in 0..=len2 {
        matrix[0][j] = j;
    }

    for i in 1..=len1 {
        for j in 1..=len2 {
            let cost = if s1_chars[i - 1] == s2_chars[j - 1] {
                0
            } else {
                1
            };

            matrix[i][j] = min(
                min(
                    matrix[i - 1][j] + 1, // deletion
                    matrix[i][j - 1] + 1, // insertion
                ),
                matrix[i - 1][j - 1] + cost, // substitution
            );
        }
    }

    matrix[len1][len2]
}

/// Calculate the Damerau-Levenshtein distance, which also counts
/// transpositions of adjacent characters as a single edit. This matches
/// real-world typos better than the plain Levenshtein distance.
#[allow(clippy::needless_range_loop)]
pub fn damerau_levenshtein_distance(s1: &str, s2: &str) -> usize {
    let len1 = s1.chars().count();
    let len2 = s2.chars().count();

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    let mut matrix = vec![vec![0; len2 + 1]; len1 + 1];

    for i in 0..=len1 {
        matrix[i][0] = i;
    }
    for j in 0..=len2 {
        matrix[0][j] = j;
    }

    for i in 1..=len1 {
        for j in 1..=len2 {
            let cost = if s1_chars[i - 1] == s2_chars[j - 1] {
                0
            } else {
                1
            };

            matrix[i][j] = min(
                min(
                    matrix[i - 1][j] + 1, // deletion
                    matrix[i][j - 1] + 1, // insertion
                ),
                matrix[i - 1][j - 1] + cost, // substitution
            );

            if i > 1
                && j > 1
                && s1_chars[i - 1] == s2_chars[j - 2]
                && s1_chars[i - 2] == s2_chars[j - 1]
            {
                matrix[i][j] = min(
                    matrix[i][j],
                    matrix[i - 2][j - 2] + cost, // transposition
                );
            }
        }
    }

    matrix[len1][len2]
}

/// Calculate the Damerau-Levenshtein distance with a maximum threshold for
/// early termination. Returns `None` if the distance exceeds the threshold,
/// which is cheaper than the full computation when filtering candidates.
pub fn damerau_levenshtein_within(s1: &str, s2: &str, threshold: usize) -> Option<usize> {
    let len1 = s1.chars().count();
    let len2 = s2.chars().count();

    // Length difference alone already exceeds the threshold.
    if len1.abs_diff(len2) > threshold {
        return None;
    }

    if len1 == 0 {
        return if len2 <= threshold { Some(len2) } else { None };
    }
    if len2 == 0 {
        return if len1 <= threshold { Some(len1) } else { None };
    }

    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    // Three rolling rows: transpositions look two rows back.
    let mut two_back = vec![0usize; len2 + 1];
    let mut prev_row: Vec<usize> = (0..=len2).collect();
    let mut curr_row = vec![0usize; len2 + 1];

    for i in 1..=len1 {
        curr_row[0] = i;
        let mut min_in_row = i;

        for j in 1..=len2 {
            let cost = if s1_chars[i - 1] == s2_chars[j - 1] {
                0
            } else {
                1
            };

            let mut value = min(
                min(
                    prev_row[j] + 1,     // deletion
                    curr_row[j - 1] + 1, // insertion
                ),
                prev_row[j - 1] + cost, // substitution
            );

            if i > 1
                && j > 1
                && s1_chars[i - 1] == s2_chars[j - 2]
                && s1_chars[i - 2] == s2_chars[j - 1]
            {
                value = min(value, two_back[j - 2] + cost); // transposition
            }

            curr_row[j] = value;
            min_in_row = min(min_in_row, value);
        }

        if min_in_row > threshold {
            return None;
        }

        std::mem::swap(&mut two_back, &mut prev_row);
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    let distance = prev_row[len2];
    if distance <= threshold {
        Some(distance)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("flaw", "lawn"), 2);
        assert_eq!(levenshtein_distance("same", "same"), 0);
    }

    #[test]
    fn test_damerau_counts_transposition_as_one() {
        // Plain Levenshtein needs two edits for a swap.
        assert_eq!(levenshtein_distance("recieve", "receive"), 2);
        assert_eq!(damerau_levenshtein_distance("recieve", "receive"), 1);
        assert_eq!(damerau_levenshtein_distance("abcd", "abdc"), 1);
    }

    #[test]
    fn test_threshold_variant_agrees_with_full() {
        let pairs = [
            ("banana", "bananas"),
            ("apple", "aple"),
            ("smoothie", "smothie"),
            ("note", "tone"),
            ("alpha", "omega"),
        ];
        for (a, b) in pairs {
            let full = damerau_levenshtein_distance(a, b);
            assert_eq!(damerau_levenshtein_within(a, b, 10), Some(full), "{a} vs {b}");
        }
    }

    #[test]
    fn test_threshold_early_exit() {
        assert_eq!(damerau_levenshtein_within("short", "muchlongerterm", 2), None);
        assert_eq!(damerau_levenshtein_within("alpha", "omega", 2), None);
        assert_eq!(damerau_levenshtein_within("alpha", "alpah", 2), Some(1));
    }

    #[test]
    fn test_unicode_input() {
        assert_eq!(levenshtein_distance("café", "cafe"), 1);
        assert_eq!(damerau_levenshtein_within("über", "uber", 1), Some(1));
    }
}
