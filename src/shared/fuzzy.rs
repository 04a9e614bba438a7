use std::cmp;

/// Levenshtein distance counted in chars, keeping only two rows.
pub(crate) fn distance(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current: Vec<usize> = vec![0; b.len() + 1];
    for (i, ac) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, bc) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ac != bc);
            let insertion = current[j] + 1;
            let deletion = previous[j + 1] + 1;
            current[j + 1] = cmp::min(substitution, cmp::min(insertion, deletion));
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

/// Similarity in `[0, 1]` between an already lowercased needle and a stop name.
///
/// A name that starts with the needle always scores at least 0.9 so that
/// typing the beginning of a stop ranks it first.
pub(crate) fn score(needle: &str, hay: &str) -> f64 {
    if needle.is_empty() || hay.is_empty() {
        return 0.0;
    }
    if hay.starts_with(needle) {
        let coverage = needle.chars().count() as f64 / hay.chars().count() as f64;
        return 0.9 + 0.1 * coverage;
    }
    let longest = cmp::max(needle.chars().count(), hay.chars().count());
    1.0 - distance(needle, hay) as f64 / longest as f64
}

#[test]
fn fuzzy_empty_vs_nonempty() {
    assert_eq!(distance("", "abc"), 3);
    assert_eq!(distance("abc", ""), 3);
}

#[test]
fn fuzzy_substitution() {
    assert_eq!(distance("cat", "cut"), 1);
}

#[test]
fn fuzzy_insertion_and_deletion() {
    assert_eq!(distance("cat", "cart"), 1);
    assert_eq!(distance("cart", "cat"), 1);
}

#[test]
fn fuzzy_unicode() {
    assert_eq!(distance("café", "cafe"), 1);
}

#[test]
fn fuzzy_longer_sequence() {
    assert_eq!(distance("intention", "execution"), 5);
}

#[test]
fn prefix_scores_high() {
    assert!(score("cent", "central station") > 0.9);
    assert!(score("cent", "central station") > score("cent", "concert hall"));
}
