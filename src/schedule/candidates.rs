use std::collections::HashSet;

use crate::types::Candidate;

/// Splits a newline-separated block into candidate names, in input order.
/// Each line is trimmed; blank lines are dropped. Accepts `\n`, `\r\n` and
/// bare `\r` line endings.
pub fn parse_candidate_names(text: &str) -> Vec<String> {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Returns the submitted names that are not yet candidates of the schedule,
/// in submission order and without repeats. Presence is exact name equality.
pub fn names_to_append(existing: &[Candidate], submitted: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = existing.iter().map(|c| c.candidate_name.as_str()).collect();

    let mut to_append = Vec::new();
    for name in submitted {
        if seen.insert(name.as_str()) {
            to_append.push(name.clone());
        }
    }
    to_append
}
