//! # Error Suggestions
//!
//! Helper functions for generating hints attached to user-facing errors.
//! Errors should tell users what went wrong AND how to fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crate::suggestions;
//!
//! let hint = suggestions::profile_hint("larg", &["large", "small"]);
//! assert_eq!(hint.as_deref(), Some("Did you mean 'large'?"));
//! ```

/// Build the hint for an unknown profile name.
///
/// Suggests the closest defined profile when one is within a small edit
/// distance, otherwise lists what is available.
pub fn profile_hint(name: &str, defined: &[&str]) -> Option<String> {
    if defined.is_empty() {
        return Some("No profiles are defined; add a `profiles:` section to the config file".to_string());
    }
    match find_similar(name, defined) {
        Some(candidate) => Some(format!("Did you mean '{candidate}'?")),
        None => Some(format!("Defined profiles are: {}", defined.join(", "))),
    }
}

/// Hint for a `--conf` entry without an `=`.
pub fn override_hint(entry: &str) -> String {
    format!("Use a dotted path and a value, e.g. --conf {entry}=<value>")
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Calculate the Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    // Single rolling row; `prev[j]` is the distance between a[..i-1] and b[..j].
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0usize; b_chars.len() + 1];

    for (i, a_ch) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_ch) in b_chars.iter().enumerate() {
            let cost = usize::from(a_ch != b_ch);
            current[j + 1] = (prev[j + 1] + 1)
                .min(current[j] + 1)
                .min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut current);
    }

    prev[b_chars.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_hint_suggests_similar() {
        let hint = profile_hint("larg", &["large", "small"]);
        assert_eq!(hint.as_deref(), Some("Did you mean 'large'?"));
    }

    #[test]
    fn test_profile_hint_lists_profiles_for_very_different() {
        let hint = profile_hint("foobar", &["large", "small"]).unwrap();
        assert_eq!(hint, "Defined profiles are: large, small");
    }

    #[test]
    fn test_profile_hint_without_profiles() {
        let hint = profile_hint("large", &[]).unwrap();
        assert!(hint.contains("No profiles are defined"));
    }

    #[test]
    fn test_override_hint_mentions_entry() {
        assert!(override_hint("worker.instanceType").contains("--conf worker.instanceType=<value>"));
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("large", "large"), 0);
        assert_eq!(edit_distance("larg", "large"), 1);
        assert_eq!(edit_distance("lrage", "large"), 2);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_find_similar() {
        let candidates = ["spot", "ondemand", "large"];

        assert_eq!(find_similar("sopt", &candidates), Some("spot"));
        assert_eq!(find_similar("ondemad", &candidates), Some("ondemand"));
        assert_eq!(find_similar("xyz", &candidates), None);
    }
}
