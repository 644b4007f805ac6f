//! Chat export parser.
//!
//! Handles the two timestamp layouts messaging apps commonly produce:
//!
//! ```text
//! 12/02/2025, 09:14 - Dev A: message text here
//! [12/02/2025, 09:14] Dev A: message text here
//! ```
//!
//! both tolerant of optional seconds and AM/PM markers. Lines matching
//! neither layout are continuations of the previous message (exports wrap
//! long messages across lines) and get appended with a newline separator.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::project::ChatMessage;

static DASH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(\d{1,2}/\d{1,2}/\d{2,4}),?\s+\d{1,2}:\d{2}(?::\d{2})?\s*(?:AM|PM)?\s*[-\u{2013}]\s+([^:]+):\s+(.+)$",
    )
    .expect("dash chat pattern is valid")
});

static BRACKET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\[(\d{1,2}/\d{1,2}/\d{2,4}),?\s+\d{1,2}:\d{2}(?::\d{2})?\s*(?:AM|PM)?\]\s+([^:]+):\s+(.+)$",
    )
    .expect("bracket chat pattern is valid")
});

/// Export housekeeping lines that are neither messages nor continuations.
const SYSTEM_PREFIXES: [&str; 4] = [
    "Messages and calls",
    "You deleted",
    "This message was deleted",
    "<Media omitted>",
];

/// Keywords in chat traffic that signal blocked or expanding work.
pub const BLOCKING_KEYWORDS: [&str; 10] = [
    "waiting",
    "blocked",
    "pending",
    "approval",
    "delay",
    "stuck",
    "hold",
    "can we add",
    "scope",
    "new feature",
];

/// Parse a raw chat export into messages. Never fails; unusable input just
/// yields fewer (or zero) messages.
pub fn parse_chat_export(text: &str) -> Vec<ChatMessage> {
    let mut messages: Vec<ChatMessage> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if SYSTEM_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
            continue;
        }

        let captures = DASH_PATTERN
            .captures(trimmed)
            .or_else(|| BRACKET_PATTERN.captures(trimmed));

        if let Some(caps) = captures {
            // A matched header with an impossible date is dropped outright
            // rather than polluting the previous message.
            if let Some(date) = normalize_date(&caps[1]) {
                messages.push(ChatMessage {
                    date,
                    author: caps[2].trim().to_string(),
                    text: caps[3].trim().to_string(),
                });
            }
        } else if let Some(last) = messages.last_mut() {
            last.text.push('\n');
            last.text.push_str(trimmed);
        }
    }

    messages
}

/// Resolve a `a/b/y` date assuming day-first ordering, unless one component
/// is unambiguously greater than 12 and must be the day. Two-digit years are
/// expanded to `20YY`.
///
/// Genuinely ambiguous dates (both components <= 12) are lossy by nature;
/// the day-first assumption is kept as-is because changing it silently
/// shifts every downstream communication-gap value.
fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() != 3 {
        return None;
    }
    let a: u32 = parts[0].parse().ok()?;
    let b: u32 = parts[1].parse().ok()?;
    let year: i32 = match parts[2].len() {
        2 => 2000 + parts[2].parse::<i32>().ok()?,
        _ => parts[2].parse().ok()?,
    };

    let (day, month) = if a > 12 && b <= 12 {
        (a, b)
    } else if b > 12 && a <= 12 {
        (b, a)
    } else {
        (a, b)
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Plain message texts, for feeding into the waiting-score keyword scan.
pub fn extract_texts(messages: &[ChatMessage]) -> Vec<String> {
    messages.iter().map(|m| m.text.clone()).collect()
}

/// Longest silence in days between chronologically adjacent distinct message
/// dates.
pub fn max_gap_days(messages: &[ChatMessage]) -> u32 {
    let dates: std::collections::BTreeSet<NaiveDate> =
        messages.iter().map(|m| m.date).collect();

    let mut max_gap = 0i64;
    let mut prev: Option<NaiveDate> = None;
    for date in dates {
        if let Some(p) = prev {
            max_gap = max_gap.max((date - p).num_days());
        }
        prev = Some(date);
    }
    max_gap.max(0) as u32
}

/// Total blocking keyword hits across all message texts. Each keyword counts
/// at most once per message.
pub fn count_blocking_signals(messages: &[ChatMessage]) -> u32 {
    let mut count = 0u32;
    for msg in messages {
        let lower = msg.text.to_lowercase();
        count += BLOCKING_KEYWORDS
            .iter()
            .filter(|kw| lower.contains(*kw))
            .count() as u32;
    }
    count
}
