//! The five signal computers.
//!
//! Each computer is a pure function over one slice of the project snapshot
//! and returns a severity score clamped to 0-100. Missing or empty input
//! always yields 0 rather than an error; the aggregator decides how much
//! weight a silent source deserves.

use chrono::NaiveDate;

use crate::parse::budget::FinancialSummary;
use crate::parse::chat::{count_blocking_signals, max_gap_days};
use crate::parse::commits::commit_stats;
use crate::project::{ChatMessage, GitCommit, ProjectData, TaskStatus};

/// Keywords that indicate work is stalled on someone or something.
pub const WAITING_KEYWORDS: [&str; 9] = [
    "waiting", "blocked", "pending", "approval", "hold", "delay", "stuck", "need", "sign-off",
];

/// Reduced keyword set for the plain-message fallback of the communication
/// gap signal.
const FALLBACK_KEYWORDS: [&str; 6] = [
    "waiting", "blocked", "pending", "approval", "delay", "stuck",
];

const SCORE_CAP: u32 = 100;

/// Waiting bottleneck severity from task staleness and message content.
///
/// A single message contributes once per distinct keyword it contains.
pub fn compute_waiting_score(data: &ProjectData) -> u32 {
    let mut score: u32 = 0;

    for task in &data.tasks {
        if task.status == TaskStatus::Blocked {
            score += 20;
        } else if task.last_updated_days_ago > 7 {
            score += 15;
        } else if task.last_updated_days_ago > 3 {
            score += 8;
        }
    }

    let chat_texts = data.chat_messages.iter().map(|m| m.text.as_str());
    for msg in data.messages.iter().map(|m| m.as_str()).chain(chat_texts) {
        let lower = msg.to_lowercase();
        let hits = WAITING_KEYWORDS
            .iter()
            .filter(|kw| lower.contains(*kw))
            .count() as u32;
        score += hits * 6;
    }

    score.min(SCORE_CAP)
}

/// Scope drift score plus the raw growth percentage behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeDrift {
    pub score: u32,
    pub growth_percent: u32,
}

/// Feature-count growth over the initial baseline. 50% growth maps to a
/// full 100 score.
pub fn compute_scope_drift(data: &ProjectData) -> ScopeDrift {
    let initial = data.initial_features.len();
    let current = data.current_features.len();
    let added = current.saturating_sub(initial);

    let growth_percent = if initial > 0 {
        (added as f64 / initial as f64 * 100.0).round() as u32
    } else {
        0
    };
    let score = ((growth_percent as f64 / 50.0 * 100.0).round() as u32).min(SCORE_CAP);

    ScopeDrift {
        score,
        growth_percent,
    }
}

/// Commit momentum risk: velocity drop across the timeline plus risky commit
/// patterns and repository silence.
pub fn compute_commit_velocity_score(commits: &[GitCommit], today: NaiveDate) -> u32 {
    if commits.is_empty() {
        return 0;
    }
    let stats = commit_stats(commits, today);
    let score = stats.velocity_drop_percent
        + stats.hotfix_count * 5
        + stats.wip_count * 8
        + (stats.days_since_last_commit * 3).min(30);
    score.min(SCORE_CAP)
}

/// Communication gap severity.
///
/// With chat data present this weighs the longest silent stretch between
/// distinct message dates against the volume of blocking keywords. Without
/// chat data it falls back to counting plain messages that carry at least one
/// waiting-style keyword.
pub fn compute_communication_score(chat: &[ChatMessage], messages: &[String]) -> u32 {
    if !chat.is_empty() {
        let max_gap = max_gap_days(chat);
        let blocking = count_blocking_signals(chat);
        (max_gap * 8 + blocking * 4).min(SCORE_CAP)
    } else if !messages.is_empty() {
        let hits = messages
            .iter()
            .filter(|m| {
                let lower = m.to_lowercase();
                FALLBACK_KEYWORDS.iter().any(|kw| lower.contains(kw))
            })
            .count() as u32;
        (hits * 12).min(SCORE_CAP)
    } else {
        0
    }
}

/// Budget burn severity: how far spend is running ahead of elapsed time.
pub fn compute_budget_burn_score(summary: &FinancialSummary, time_remaining_percent: u32) -> u32 {
    let time_used = 100 - time_remaining_percent.min(100);
    let over_burn = summary.burn_percent as i64 - time_used as i64;
    ((over_burn.max(0) as u32) * 2).min(SCORE_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::budget::compute_financial_health;
    use crate::project::{BudgetItem, BudgetStatus, Task};

    fn base_data() -> ProjectData {
        ProjectData {
            project_name: "p".into(),
            release_date: "2025-03-15".into(),
            initial_features: vec![],
            current_features: vec![],
            tasks: vec![],
            messages: vec![],
            commits: vec![],
            chat_messages: vec![],
            budget_items: vec![],
        }
    }

    fn task(status: TaskStatus, idle: u32) -> Task {
        Task {
            title: "t".into(),
            assigned_to: String::new(),
            last_updated_days_ago: idle,
            status,
            estimated_hours: None,
            blocks: vec![],
        }
    }

    #[test]
    fn test_waiting_all_done_no_keywords_is_zero() {
        let mut data = base_data();
        data.tasks = vec![task(TaskStatus::Done, 0), task(TaskStatus::Done, 2)];
        data.messages = vec!["shipped the release notes".into()];
        assert_eq!(compute_waiting_score(&data), 0);
    }

    #[test]
    fn test_waiting_task_contributions() {
        let mut data = base_data();
        data.tasks = vec![
            task(TaskStatus::Blocked, 0),    // +20
            task(TaskStatus::InProgress, 8), // +15
            task(TaskStatus::InProgress, 4), // +8
            task(TaskStatus::InProgress, 1), // +0
        ];
        assert_eq!(compute_waiting_score(&data), 43);
    }

    #[test]
    fn test_waiting_counts_multiple_keywords_per_message() {
        let mut data = base_data();
        data.messages = vec!["waiting on approval, still blocked".into()];
        // waiting + approval + blocked = 3 hits * 6
        assert_eq!(compute_waiting_score(&data), 18);
    }

    #[test]
    fn test_waiting_clamps_at_100() {
        let mut data = base_data();
        data.tasks = (0..10).map(|_| task(TaskStatus::Blocked, 0)).collect();
        assert_eq!(compute_waiting_score(&data), 100);
    }

    #[test]
    fn test_scope_drift_empty_is_zero() {
        let data = base_data();
        let drift = compute_scope_drift(&data);
        assert_eq!(drift.score, 0);
        assert_eq!(drift.growth_percent, 0);
    }

    #[test]
    fn test_scope_drift_doubling_saturates() {
        let mut data = base_data();
        data.initial_features = (0..5).map(|i| format!("f{i}")).collect();
        data.current_features = (0..10).map(|i| format!("f{i}")).collect();
        let drift = compute_scope_drift(&data);
        assert_eq!(drift.growth_percent, 100);
        assert_eq!(drift.score, 100);
    }

    #[test]
    fn test_scope_drift_partial_growth() {
        let mut data = base_data();
        data.initial_features = (0..4).map(|i| format!("f{i}")).collect();
        data.current_features = (0..5).map(|i| format!("f{i}")).collect();
        let drift = compute_scope_drift(&data);
        assert_eq!(drift.growth_percent, 25);
        assert_eq!(drift.score, 50);
    }

    #[test]
    fn test_scope_drift_shrinking_is_zero() {
        let mut data = base_data();
        data.initial_features = (0..5).map(|i| format!("f{i}")).collect();
        data.current_features = (0..3).map(|i| format!("f{i}")).collect();
        assert_eq!(compute_scope_drift(&data).score, 0);
    }

    #[test]
    fn test_commit_velocity_empty_is_zero() {
        let today = NaiveDate::from_ymd_opt(2025, 2, 15).unwrap();
        assert_eq!(compute_commit_velocity_score(&[], today), 0);
    }

    #[test]
    fn test_communication_no_sources_is_zero() {
        assert_eq!(compute_communication_score(&[], &[]), 0);
    }

    #[test]
    fn test_communication_fallback_counts_messages_not_occurrences() {
        let messages = vec![
            "waiting on design and waiting on legal".to_string(), // one hit
            "all good here".to_string(),
            "stuck behind the pending migration".to_string(), // one hit
        ];
        assert_eq!(compute_communication_score(&[], &messages), 24);
    }

    #[test]
    fn test_communication_chat_gap_and_keywords() {
        let mk = |d: u32, text: &str| ChatMessage {
            date: NaiveDate::from_ymd_opt(2025, 2, d).unwrap(),
            author: "a".into(),
            text: text.into(),
        };
        let chat = vec![
            mk(1, "kickoff"),
            mk(1, "waiting on approval"), // 2 keyword hits
            mk(5, "back now"),            // 4-day gap
        ];
        // 4 * 8 + 2 * 4 = 40
        assert_eq!(compute_communication_score(&chat, &[]), 40);
    }

    #[test]
    fn test_budget_burn_over_time_used() {
        let items = vec![BudgetItem {
            item: "Dev".into(),
            budgeted_hours: 100.0,
            spent_hours: 80.0,
            cost_per_hour: 50.0,
            status: BudgetStatus::Active,
        }];
        // burn 80%, time remaining 50% -> time used 50 -> over-burn 30 -> 60
        let summary = compute_financial_health(&items, 50);
        assert_eq!(compute_budget_burn_score(&summary, 50), 60);
    }

    #[test]
    fn test_budget_burn_under_pace_is_zero() {
        let items = vec![BudgetItem {
            item: "Dev".into(),
            budgeted_hours: 100.0,
            spent_hours: 10.0,
            cost_per_hour: 50.0,
            status: BudgetStatus::Active,
        }];
        let summary = compute_financial_health(&items, 50);
        assert_eq!(compute_budget_burn_score(&summary, 50), 0);
    }
}
