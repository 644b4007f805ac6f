//! Fuzzy association between task titles and feature names.
//!
//! The heuristic is deliberately simple: case/punctuation-insensitive
//! substring containment in either direction, or word-level overlap. Both the
//! prioritizer and the saturation gate classify tasks through this single
//! entry point so the two can never disagree about what counts as expansion
//! work.

use crate::project::Task;

/// Does this text relate to this feature name?
pub fn is_related(text: &str, feature: &str) -> bool {
    let t = normalize(text);
    let f = normalize(feature);

    // Direct substring either way
    if t.contains(&f) || f.contains(&t) {
        return true;
    }

    // Word-level overlap on words longer than 3 characters. Short feature
    // names get matched on a single shared word, longer ones need two.
    let t_words: Vec<&str> = t.split(' ').filter(|w| w.len() > 3).collect();
    let f_words: Vec<&str> = f.split(' ').filter(|w| w.len() > 3).collect();
    let overlap = t_words.iter().filter(|w| f_words.contains(w)).count();
    if overlap >= 1 && f_words.len() <= 3 {
        return true;
    }
    overlap >= 2
}

fn normalize(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect()
}

/// A task belongs to the initial scope when it relates to any initial
/// feature. With no initial features given, every task counts as initial.
pub fn is_initial_task(title: &str, initial_features: &[String]) -> bool {
    if initial_features.is_empty() {
        return true;
    }
    initial_features.iter().any(|f| is_related(title, f))
}

/// A task is expansion work when it relates to an added feature and does not
/// also relate to an initial one (initial scope takes priority).
pub fn is_expansion_task(
    title: &str,
    initial_features: &[String],
    current_features: &[String],
) -> bool {
    if initial_features.is_empty() || current_features.is_empty() {
        return false;
    }

    let added: Vec<&String> = current_features
        .iter()
        .filter(|f| !initial_features.contains(f))
        .collect();
    if added.is_empty() {
        return false;
    }

    let related_to_added = added.iter().any(|f| is_related(title, f));
    let related_to_initial = initial_features.iter().any(|f| is_related(title, f));

    related_to_added && !related_to_initial
}

/// Count completed initial-scope tasks against the total, clamped to 1.0
/// when there is nothing to count (an empty project is trivially complete).
pub fn initial_completion_rate(tasks: &[Task], initial_features: &[String]) -> f64 {
    use crate::project::TaskStatus;

    let initial: Vec<&Task> = tasks
        .iter()
        .filter(|t| is_initial_task(&t.title, initial_features))
        .collect();

    let (total, done) = if initial.is_empty() {
        (
            tasks.len(),
            tasks.iter().filter(|t| t.status == TaskStatus::Done).count(),
        )
    } else {
        (
            initial.len(),
            initial
                .iter()
                .filter(|t| t.status == TaskStatus::Done)
                .count(),
        )
    };

    if total == 0 {
        1.0
    } else {
        done as f64 / total as f64
    }
}
