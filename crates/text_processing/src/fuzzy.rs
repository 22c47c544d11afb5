//! Fuzzy matching of leave-type mentions against reference data
//!
//! Users rarely type the exact configured name ("Sick Leave"): they say
//! "sick", "SL", "casuel" or "बीमारी". Matching goes canonical-first:
//! exact name, then abbreviation, then distinctive-token containment, then
//! edit distance on tokens for typos. The generic word "leave" on its own is
//! never a match.

/// Abbreviations and cross-language synonyms for common leave words
fn expand(word: &str) -> &str {
    match word {
        "sl" => "sick",
        "cl" => "casual",
        "el" => "earned",
        "pl" => "privilege",
        "lwp" => "unpaid",
        "बीमारी" | "बीमार" | "bimari" | "bimar" => "sick",
        other => other,
    }
}

/// Words too generic to identify a leave type by themselves
fn is_generic(word: &str) -> bool {
    matches!(word, "leave" | "leav" | "leve" | "chutti" | "छुट्टी" | "apply" | "my")
}

/// Levenshtein distance, used for typo tolerance on short tokens
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(prev[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut prev, &mut current);
    }

    prev[b.len()]
}

/// Match a user's leave-type mention against the configured leave types,
/// returning the canonical name.
pub fn match_leave_type(input: &str, available: &[String]) -> Option<String> {
    let input_lower = input.to_lowercase();
    let input_words: Vec<&str> = input_lower
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && !('\u{0900}'..='\u{097F}').contains(&c)))
        .filter(|w| !w.is_empty())
        .collect();

    // Exact full-name match first
    for candidate in available {
        if candidate.to_lowercase() == input_lower.trim() {
            return Some(candidate.clone());
        }
    }

    for candidate in available {
        let candidate_lower = candidate.to_lowercase();
        let distinctive: Vec<&str> = candidate_lower
            .split_whitespace()
            .filter(|t| !is_generic(t))
            .collect();

        for word in &input_words {
            let word = expand(word);
            if is_generic(word) || word.len() < 2 {
                continue;
            }
            for token in &distinctive {
                if token == &word {
                    return Some(candidate.clone());
                }
                if word.len() >= 3 && token.len() >= 3 && edit_distance(word, token) <= 1 {
                    return Some(candidate.clone());
                }
            }
        }
    }

    None
}
