//! Commit log parser and commit-derived statistics.
//!
//! Accepts delimited text with a header row, as produced by
//! `git log --pretty=format:"%H,%an,%ad,%s" --date=short` or a tracker's
//! commit export. Header names are matched case-insensitively against a small
//! alias table and fields may be quoted to protect embedded delimiters.

use std::collections::HashMap;

use chrono::{Datelike, Days, NaiveDate};

use crate::project::GitCommit;

/// Commit message fragments that suggest firefighting.
const RISKY_KEYWORDS: [&str; 7] = ["hotfix", "fix", "bug", "wip", "revert", "broken", "urgent"];

/// Commit message fragments that suggest unfinished work. Checked
/// independently of [`RISKY_KEYWORDS`], so one commit can count toward both.
const WIP_KEYWORDS: [&str; 3] = ["wip", "work in progress", "incomplete"];

const SHA_ALIASES: [&str; 2] = ["sha", "hash"];
const AUTHOR_ALIASES: [&str; 2] = ["author", "author_name"];
const DATE_ALIASES: [&str; 2] = ["date", "authored_date"];
const MESSAGE_ALIASES: [&str; 2] = ["message", "commit_message"];

/// Parse a delimited commit export. Returns an empty list when the input has
/// no usable header; rows whose date cannot be parsed are dropped silently.
pub fn parse_commit_log(text: &str) -> Vec<GitCommit> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let header_line = match lines.next() {
        Some(l) => l,
        None => return Vec::new(),
    };

    let delim = sniff_delimiter(header_line);
    let headers: Vec<String> = split_delimited(header_line, delim)
        .iter()
        .map(|h| normalize_header(h))
        .collect();

    let sha_col = find_column(&headers, &SHA_ALIASES);
    let author_col = find_column(&headers, &AUTHOR_ALIASES);
    let date_col = match find_column(&headers, &DATE_ALIASES) {
        Some(c) => c,
        // Without a date column no row can survive the date filter.
        None => return Vec::new(),
    };
    let message_col = find_column(&headers, &MESSAGE_ALIASES);

    let mut commits = Vec::new();
    for line in lines {
        let fields = split_delimited(line, delim);
        let date = match fields.get(date_col).and_then(|f| parse_date(f)) {
            Some(d) => d,
            None => continue,
        };
        let field = |col: Option<usize>| {
            col.and_then(|c| fields.get(c))
                .map(|f| f.trim().to_string())
                .unwrap_or_default()
        };
        let sha = match field(sha_col) {
            s if s.is_empty() => "unknown".to_string(),
            s => s,
        };
        let author = match field(author_col) {
            a if a.is_empty() => "Unknown".to_string(),
            a => a,
        };
        commits.push(GitCommit {
            sha,
            author,
            date,
            message: field(message_col),
        });
    }
    commits
}

fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().split_whitespace().collect::<Vec<_>>().join("_")
}

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| aliases.iter().any(|a| h == a))
}

/// Pick the most frequent candidate delimiter in the header row.
fn sniff_delimiter(header: &str) -> char {
    [',', '\t', ';', '|']
        .into_iter()
        .max_by_key(|d| header.matches(*d).count())
        .filter(|d| header.contains(*d))
        .unwrap_or(',')
}

/// Split one line on `delim`, honoring double-quoted fields with `""`
/// escapes.
fn split_delimited(line: &str, delim: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else if c == '"' && current.is_empty() {
            in_quotes = true;
        } else if c == delim {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    fields.push(current);
    fields
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    // ISO timestamps: keep the date part.
    if s.len() >= 10 {
        if let Ok(d) = NaiveDate::parse_from_str(&s[..10], "%Y-%m-%d") {
            return Some(d);
        }
    }
    None
}

/// One week bucket of commit activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyCount {
    /// Ordinal label (`W1`, `W2`, ...) in chronological order.
    pub week: String,
    pub count: u32,
}

/// Derived statistics over a commit history.
#[derive(Debug, Clone)]
pub struct CommitStats {
    pub weekly: Vec<WeeklyCount>,
    /// Drop of the second-half weekly average against the first half,
    /// as a percentage, floored at 0.
    pub velocity_drop_percent: u32,
    pub hotfix_count: u32,
    pub wip_count: u32,
    /// Days since the most recent commit by any author, floored at 0.
    pub days_since_last_commit: u32,
    pub most_active_author: String,
    /// Authors whose latest commit is more than 7 days old.
    pub silent_authors: Vec<String>,
}

/// Compute weekly velocity and risky-pattern statistics.
///
/// Weeks start on the most recent preceding Sunday. Velocity drop compares
/// the mean commits/week of the first half of the timeline against the
/// second half and is 0 when fewer than two week buckets exist.
pub fn commit_stats(commits: &[GitCommit], today: NaiveDate) -> CommitStats {
    let mut buckets: std::collections::BTreeMap<NaiveDate, u32> = Default::default();
    let mut hotfix_count = 0u32;
    let mut wip_count = 0u32;
    let mut author_order: Vec<String> = Vec::new();
    let mut author_last: HashMap<String, NaiveDate> = HashMap::new();
    let mut author_count: HashMap<String, u32> = HashMap::new();

    for commit in commits {
        *buckets.entry(week_start(commit.date)).or_insert(0) += 1;

        let lower = commit.message.to_lowercase();
        if RISKY_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            hotfix_count += 1;
        }
        if WIP_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            wip_count += 1;
        }

        if !author_last.contains_key(&commit.author) {
            author_order.push(commit.author.clone());
        }
        let last = author_last.entry(commit.author.clone()).or_insert(commit.date);
        if commit.date > *last {
            *last = commit.date;
        }
        *author_count.entry(commit.author.clone()).or_insert(0) += 1;
    }

    let weekly: Vec<WeeklyCount> = buckets
        .values()
        .enumerate()
        .map(|(i, count)| WeeklyCount {
            week: format!("W{}", i + 1),
            count: *count,
        })
        .collect();

    let velocity_drop_percent = velocity_drop(&weekly);

    // First author to reach the highest count wins ties.
    let mut most_active_author = String::new();
    let mut max_commits = 0u32;
    for author in &author_order {
        let count = author_count.get(author).copied().unwrap_or(0);
        if count > max_commits {
            max_commits = count;
            most_active_author = author.clone();
        }
    }

    let days_since_last_commit = author_last
        .values()
        .max()
        .map(|latest| (today - *latest).num_days().max(0) as u32)
        .unwrap_or(0);

    let silent_authors: Vec<String> = author_order
        .iter()
        .filter(|a| {
            author_last
                .get(*a)
                .map(|d| (today - *d).num_days() > 7)
                .unwrap_or(false)
        })
        .cloned()
        .collect();

    CommitStats {
        weekly,
        velocity_drop_percent,
        hotfix_count,
        wip_count,
        days_since_last_commit,
        most_active_author,
        silent_authors,
    }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_sunday() as u64;
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

fn velocity_drop(weekly: &[WeeklyCount]) -> u32 {
    let mid = weekly.len() / 2;
    if mid == 0 {
        return 0;
    }
    let first: u32 = weekly[..mid].iter().map(|w| w.count).sum();
    let second: u32 = weekly[mid..].iter().map(|w| w.count).sum();
    let first_avg = first as f64 / mid as f64;
    let second_avg = second as f64 / (weekly.len() - mid) as f64;
    if first_avg > 0.0 {
        (((first_avg - second_avg) / first_avg * 100.0).round() as i64).max(0) as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_basic_csv() {
        let csv = "sha,author,date,message\n\
                   a1b2c3,Dev A,2025-01-05,feat: initial auth setup\n\
                   b2c3d4,Dev B,2025-01-07,feat: dashboard layout\n";
        let commits = parse_commit_log(csv);
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].sha, "a1b2c3");
        assert_eq!(commits[0].author, "Dev A");
        assert_eq!(commits[0].date, ymd(2025, 1, 5));
        assert_eq!(commits[1].message, "feat: dashboard layout");
    }

    #[test]
    fn test_parse_header_aliases_case_insensitive() {
        let csv = "Hash,Author_Name,Authored_Date,Commit_Message\n\
                   abc,Dev A,2025-01-05,fix stuff\n";
        let commits = parse_commit_log(csv);
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].sha, "abc");
        assert_eq!(commits[0].message, "fix stuff");
    }

    #[test]
    fn test_parse_quoted_field_with_delimiter() {
        let csv = "sha,author,date,message\n\
                   abc,Dev A,2025-01-05,\"feat: auth, sessions, and \"\"sso\"\"\"\n";
        let commits = parse_commit_log(csv);
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].message, "feat: auth, sessions, and \"sso\"");
    }

    #[test]
    fn test_parse_tab_delimited() {
        let tsv = "sha\tauthor\tdate\tmessage\nabc\tDev A\t2025-01-05\thello\n";
        let commits = parse_commit_log(tsv);
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].author, "Dev A");
    }

    #[test]
    fn test_parse_drops_rows_with_bad_dates() {
        let csv = "sha,author,date,message\n\
                   abc,Dev A,not-a-date,one\n\
                   def,Dev B,2025-01-06,two\n";
        let commits = parse_commit_log(csv);
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].sha, "def");
    }

    #[test]
    fn test_parse_fails_soft_on_garbage() {
        assert!(parse_commit_log("").is_empty());
        assert!(parse_commit_log("this is not a commit log at all").is_empty());
        assert!(parse_commit_log("colA,colB\n1,2\n").is_empty());
    }

    #[test]
    fn test_parse_missing_optional_columns_default() {
        let csv = "date,message\n2025-01-05,hello\n";
        let commits = parse_commit_log(csv);
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].sha, "unknown");
        assert_eq!(commits[0].author, "Unknown");
    }

    #[test]
    fn test_parse_iso_timestamp_dates() {
        let csv = "sha,author,date,message\nabc,Dev A,2025-01-05T10:30:00Z,hi\n";
        let commits = parse_commit_log(csv);
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].date, ymd(2025, 1, 5));
    }

    fn commit(author: &str, date: NaiveDate, message: &str) -> GitCommit {
        GitCommit {
            sha: "x".into(),
            author: author.into(),
            date,
            message: message.into(),
        }
    }

    #[test]
    fn test_week_start_is_sunday() {
        // 2025-01-08 is a Wednesday; the preceding Sunday is the 5th.
        assert_eq!(week_start(ymd(2025, 1, 8)), ymd(2025, 1, 5));
        assert_eq!(week_start(ymd(2025, 1, 5)), ymd(2025, 1, 5));
    }

    #[test]
    fn test_velocity_drop_halved_output() {
        // Weeks of Jan 5, 12, 19, 26 with 4/4/2/2 commits.
        let mut commits = Vec::new();
        for d in [5, 6, 7, 8, 12, 13, 14, 15, 19, 20, 26, 27] {
            commits.push(commit("Dev A", ymd(2025, 1, d), "feat"));
        }
        let stats = commit_stats(&commits, ymd(2025, 1, 28));
        assert_eq!(stats.weekly.len(), 4);
        assert_eq!(stats.velocity_drop_percent, 50);
    }

    #[test]
    fn test_velocity_drop_zero_for_single_week() {
        let commits = vec![
            commit("Dev A", ymd(2025, 1, 6), "feat"),
            commit("Dev A", ymd(2025, 1, 7), "feat"),
        ];
        let stats = commit_stats(&commits, ymd(2025, 1, 8));
        assert_eq!(stats.velocity_drop_percent, 0);
    }

    #[test]
    fn test_risky_and_wip_counts_overlap() {
        let commits = vec![
            commit("Dev A", ymd(2025, 1, 6), "WIP: payments api"), // risky + wip
            commit("Dev B", ymd(2025, 1, 7), "hotfix: token expiry"), // risky
            commit("Dev C", ymd(2025, 1, 8), "feat: clean work"),
        ];
        let stats = commit_stats(&commits, ymd(2025, 1, 9));
        assert_eq!(stats.hotfix_count, 2);
        assert_eq!(stats.wip_count, 1);
    }

    #[test]
    fn test_days_since_last_commit_and_silent_authors() {
        let commits = vec![
            commit("Dev A", ymd(2025, 1, 1), "feat"),
            commit("Dev B", ymd(2025, 1, 10), "feat"),
        ];
        let stats = commit_stats(&commits, ymd(2025, 1, 12));
        assert_eq!(stats.days_since_last_commit, 2);
        assert_eq!(stats.silent_authors, vec!["Dev A".to_string()]);
    }

    #[test]
    fn test_most_active_author() {
        let commits = vec![
            commit("Dev A", ymd(2025, 1, 6), "a"),
            commit("Dev B", ymd(2025, 1, 7), "b"),
            commit("Dev B", ymd(2025, 1, 8), "c"),
        ];
        let stats = commit_stats(&commits, ymd(2025, 1, 9));
        assert_eq!(stats.most_active_author, "Dev B");
    }
}
