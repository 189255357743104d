//! Bounded approximate substring matching.
//!
//! Finds the substring of a text with the smallest Levenshtein distance to a
//! pattern (Sellers' algorithm): one dynamic-programming column per text
//! character, with a free starting position. Start offsets are carried
//! through the table so the caller can cut a snippet around the match.

use unicode_normalization::UnicodeNormalization;

/// Best match of a pattern inside a text, in char offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubstringMatch {
    pub start: usize,
    pub end: usize,
    pub distance: usize,
}

/// Chars of `text` after NFC normalization, optionally lowercased one to one.
pub fn prepare(text: &str, case_sensitive: bool) -> Vec<char> {
    let normalized = text.nfc();
    if case_sensitive {
        normalized.collect()
    } else {
        normalized
            .map(|c| c.to_lowercase().next().unwrap_or(c))
            .collect()
    }
}

/// Lowest-distance occurrence of `pattern` in `text`, if within `max_distance`.
///
/// Ties keep the occurrence that ends first.
pub fn best_match(pattern: &[char], text: &[char], max_distance: usize) -> Option<SubstringMatch> {
    let m = pattern.len();
    if m == 0 || text.is_empty() {
        return None;
    }

    // cost[i]: distance of pattern[..i] against the best substring ending here
    let mut cost: Vec<usize> = (0..=m).collect();
    let mut start: Vec<usize> = vec![0; m + 1];
    let mut next_cost = vec![0; m + 1];
    let mut next_start = vec![0; m + 1];
    let mut best: Option<SubstringMatch> = None;

    for (j, &tc) in text.iter().enumerate() {
        next_cost[0] = 0;
        next_start[0] = j + 1;

        for i in 1..=m {
            let substitute = cost[i - 1] + usize::from(pattern[i - 1] != tc);
            let skip_text = cost[i] + 1;
            let skip_pattern = next_cost[i - 1] + 1;

            if substitute <= skip_text && substitute <= skip_pattern {
                next_cost[i] = substitute;
                next_start[i] = start[i - 1];
            } else if skip_text <= skip_pattern {
                next_cost[i] = skip_text;
                next_start[i] = start[i];
            } else {
                next_cost[i] = skip_pattern;
                next_start[i] = next_start[i - 1];
            }
        }

        std::mem::swap(&mut cost, &mut next_cost);
        std::mem::swap(&mut start, &mut next_start);

        let distance = cost[m];
        if distance <= max_distance && best.is_none_or(|b| distance < b.distance) {
            best = Some(SubstringMatch {
                start: start[m],
                end: j + 1,
                distance,
            });
            if distance == 0 {
                break;
            }
        }
    }

    best
}

/// Text around `[start, end)` with `radius` chars on each side, on one line.
pub fn snippet(text: &[char], start: usize, end: usize, radius: usize) -> String {
    let from = start.saturating_sub(radius);
    let to = end.saturating_add(radius).min(text.len());
    text[from..to]
        .iter()
        .map(|&c| if c.is_whitespace() { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_exact_substring() {
        let m = best_match(&chars("lo w"), &chars("hello world"), 0).unwrap();
        assert_eq!((m.start, m.end, m.distance), (3, 7, 0));
    }

    #[test]
    fn test_one_edit() {
        let m = best_match(&chars("helo"), &chars("say hello"), 1).unwrap();
        assert_eq!(m.distance, 1);
        assert_eq!(m.start, 4);
    }

    #[test]
    fn test_outside_bound() {
        assert!(best_match(&chars("xyz"), &chars("hello"), 1).is_none());
        assert!(best_match(&chars("helo"), &chars("hello"), 0).is_none());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(best_match(&[], &chars("abc"), 3).is_none());
        assert!(best_match(&chars("abc"), &[], 3).is_none());
    }

    #[test]
    fn test_prepare_case_and_nfc() {
        // "e" + combining acute composes to a single char
        assert_eq!(prepare("Cafe\u{301}", true), vec!['C', 'a', 'f', '\u{e9}']);
        assert_eq!(prepare("ÄB", false), vec!['ä', 'b']);
    }

    #[test]
    fn test_snippet_window() {
        let text = chars("0123456789\nabcdefghij");
        assert_eq!(snippet(&text, 10, 12, 3), "789 abcd");
        assert_eq!(snippet(&text, 0, 2, 100), "0123456789 abcdefghij");
    }

    #[test]
    fn test_matches_bruteforce_levenshtein() {
        let cases = [
            ("kitten", "the sitting cat"),
            ("rust", "trust the crust"),
            ("abc", "xaxbxcx"),
            ("markdown", "mark down notes"),
            ("zzz", "abc"),
        ];
        for (pattern, text) in cases {
            let p = chars(pattern);
            let t = chars(text);
            let mut expected = usize::MAX;
            for i in 0..=t.len() {
                for j in i..=t.len() {
                    let sub: String = t[i..j].iter().collect();
                    expected = expected.min(strsim::levenshtein(pattern, &sub));
                }
            }
            let found = best_match(&p, &t, usize::MAX).unwrap();
            assert_eq!(found.distance, expected, "{} in {}", pattern, text);

            let matched: String = t[found.start..found.end].iter().collect();
            assert_eq!(strsim::levenshtein(pattern, &matched), found.distance);
        }
    }
}
