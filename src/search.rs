// Search ranking shared by the library and queue views
// Five disjoint tiers: exact, prefix, word prefix, substring, fuzzy

use difflib::sequencematcher::SequenceMatcher;

/// Minimum similarity for a name to make the fuzzy tier.
pub const FUZZY_CUTOFF: f64 = 0.5;

/// Order `names` by how well they match `query`, as indices into `names`.
/// A blank query keeps every name in its original order. Names that fail
/// every tier are left out.
pub fn rank<S: AsRef<str>>(query: &str, names: &[S]) -> Vec<usize> {
    if query.trim().is_empty() {
        return (0..names.len()).collect();
    }

    let q = query.to_lowercase();
    let mut exact = Vec::new();
    let mut starts = Vec::new();
    let mut word = Vec::new();
    let mut substring = Vec::new();
    let mut fuzzy = Vec::new();

    for (i, name) in names.iter().enumerate() {
        let lowered = name.as_ref().to_lowercase();
        if lowered == q {
            exact.push(i);
        } else if lowered.starts_with(&q) {
            starts.push(i);
        } else if lowered.split_whitespace().any(|w| w.starts_with(&q)) {
            word.push(i);
        } else if lowered.contains(&q) {
            substring.push(i);
        } else {
            let score = similarity(&lowered, &q);
            if score >= FUZZY_CUTOFF {
                fuzzy.push((i, score));
            }
        }
    }

    // stable, so equal scores keep list order
    fuzzy.sort_by(|a, b| b.1.total_cmp(&a.1));

    exact
        .into_iter()
        .chain(starts)
        .chain(word)
        .chain(substring)
        .chain(fuzzy.into_iter().map(|(i, _)| i))
        .collect()
}

/// Ratcliff/Obershelp ratio over characters: 2 * matched / (len(a) + len(b)).
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let mut matcher = SequenceMatcher::new(&a, &b);
    matcher.ratio() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_query_is_identity() {
        let names = ["b", "a", "c"];
        assert_eq!(rank("", &names), vec![0, 1, 2]);
        assert_eq!(rank("   ", &names), vec![0, 1, 2]);
    }

    #[test]
    fn test_tier_order() {
        let names = ["Abc", "Abcd", "Xabc", "Zzz"];
        assert_eq!(rank("abc", &names), vec![0, 1, 2]);
    }

    #[test]
    fn test_word_prefix_beats_substring() {
        let names = ["Pink Floyd - Time", "Timeless", "Overtime", "time"];
        // exact, prefix, word prefix, substring
        assert_eq!(rank("TIME", &names), vec![3, 1, 0, 2]);
    }

    #[test]
    fn test_fuzzy_orders_by_similarity() {
        let names = ["helo", "zzzz", "hxllo", "hello world"];
        let ranked = rank("hello", &names);
        // "hello world" is a prefix match; "helo" (0.89) beats "hxllo" (0.8)
        assert_eq!(ranked, vec![3, 0, 2]);
    }

    #[test]
    fn test_each_index_at_most_once() {
        let names = ["abc", "abc", "xyz abc", "ab", "cab", "a b c"];
        let ranked = rank("ab", &names);
        let mut seen = ranked.clone();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), ranked.len());
        assert_eq!(ranked, rank("ab", &names));
    }

    #[test]
    fn test_similarity_ratio() {
        assert_eq!(similarity("abcd", "abcd"), 1.0);
        assert_eq!(similarity("abcd", "wxyz"), 0.0);
        assert_eq!(similarity("", ""), 1.0);
        // "abcd" vs "bcde": block "bcd" -> 2 * 3 / 8
        assert_eq!(similarity("abcd", "bcde"), 0.75);
    }

    #[test]
    fn test_similarity_handles_transpositions() {
        // same values Python's difflib gives for these pairs
        assert!((similarity("hello world", "wrold") - 0.375).abs() < 1e-6);
        assert!((similarity("queen - bohemian rhapsody", "bohemain") - 14.0 / 33.0).abs() < 1e-6);
    }
}
