//! Built-in demo project.
//!
//! A mid-flight release with enough stress to exercise every signal: two
//! blocked tasks, doubled scope, slowing commits and an overrun budget
//! line. Useful for demos and as a fixture in integration tests.

use chrono::NaiveDate;

use crate::project::{BudgetItem, BudgetStatus, GitCommit, ProjectData, Task, TaskStatus};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    // All literals below are valid dates.
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn task(
    title: &str,
    assigned_to: &str,
    idle: u32,
    status: TaskStatus,
    estimated_hours: f64,
    blocks: &[&str],
) -> Task {
    Task {
        title: title.into(),
        assigned_to: assigned_to.into(),
        last_updated_days_ago: idle,
        status,
        estimated_hours: Some(estimated_hours),
        blocks: blocks.iter().map(|b| b.to_string()).collect(),
    }
}

fn commit(sha: &str, author: &str, y: i32, m: u32, d: u32, message: &str) -> GitCommit {
    GitCommit {
        sha: sha.into(),
        author: author.into(),
        date: date(y, m, d),
        message: message.into(),
    }
}

fn budget(item: &str, budgeted: f64, spent: f64, rate: f64, status: BudgetStatus) -> BudgetItem {
    BudgetItem {
        item: item.into(),
        budgeted_hours: budgeted,
        spent_hours: spent,
        cost_per_hour: rate,
        status,
    }
}

/// The demo snapshot.
pub fn sample_project() -> ProjectData {
    ProjectData {
        project_name: "Apollo Platform v2.0".into(),
        release_date: "2025-03-15".into(),
        initial_features: vec![
            "User Authentication".into(),
            "Dashboard".into(),
            "Payments Integration".into(),
            "Notifications".into(),
            "Settings Page".into(),
        ],
        current_features: vec![
            "User Authentication".into(),
            "Dashboard".into(),
            "Payments Integration".into(),
            "Notifications".into(),
            "Settings Page".into(),
            "Dark Mode".into(),
            "Analytics Module".into(),
            "AI Recommendations".into(),
            "Export to CSV".into(),
            "Team Collaboration".into(),
        ],
        tasks: vec![
            task(
                "Implement Payments API",
                "Dev A",
                6,
                TaskStatus::Blocked,
                20.0,
                &["Deploy to staging", "Stripe webhook handling"],
            ),
            task(
                "Design new Dashboard UI",
                "Designer B",
                8,
                TaskStatus::InProgress,
                15.0,
                &[],
            ),
            task(
                "Write unit tests for Auth",
                "Dev C",
                2,
                TaskStatus::InProgress,
                8.0,
                &[],
            ),
            task(
                "Deploy to staging",
                "DevOps D",
                5,
                TaskStatus::NotStarted,
                4.0,
                &[],
            ),
            task(
                "Analytics Module Backend",
                "Dev A",
                9,
                TaskStatus::NotStarted,
                30.0,
                &[],
            ),
            task(
                "User onboarding flow",
                "Dev B",
                1,
                TaskStatus::Done,
                10.0,
                &[],
            ),
            task(
                "Stripe webhook handling",
                "Dev C",
                4,
                TaskStatus::Blocked,
                12.0,
                &[],
            ),
            task(
                "AI Recommendations engine",
                "Dev D",
                12,
                TaskStatus::NotStarted,
                40.0,
                &[],
            ),
        ],
        messages: vec![
            "Waiting for design approval on the new dashboard screens".into(),
            "Blocked by backend API cant proceed until Stripe webhooks are done".into(),
            "Can we also add an analytics dashboard PM just requested it".into(),
            "Payment flow is pending QA sign-off".into(),
            "Need approval from legal before we ship the AI features".into(),
            "Still waiting on the API keys from the third-party service".into(),
            "Dark mode design is blocked pending brand guidelines approval".into(),
            "Release might slip if analytics backend is not started this week".into(),
        ],
        commits: vec![
            commit("a1b2c3", "Dev A", 2025, 1, 5, "feat: initial auth setup"),
            commit("b2c3d4", "Dev B", 2025, 1, 7, "feat: dashboard layout"),
            commit("c3d4e5", "Dev A", 2025, 1, 10, "fix: login redirect bug"),
            commit("d4e5f6", "Dev C", 2025, 1, 12, "feat: payments integration"),
            commit("e5f6g7", "Dev B", 2025, 1, 15, "feat: notifications"),
            commit("f6g7h8", "Dev A", 2025, 1, 20, "WIP: payments api"),
            commit("g7h8i9", "Dev C", 2025, 1, 28, "hotfix: auth token expiry"),
            commit("h8i9j0", "Dev B", 2025, 2, 10, "feat: dark mode partial"),
        ],
        chat_messages: vec![],
        budget_items: vec![
            budget("Dev A", 80.0, 52.0, 60.0, BudgetStatus::Blocked),
            budget("Dev B", 80.0, 70.0, 55.0, BudgetStatus::Active),
            budget("Dev C", 60.0, 44.0, 55.0, BudgetStatus::Active),
            budget("Dev D", 60.0, 12.0, 50.0, BudgetStatus::Active),
            budget("Designer B", 40.0, 38.0, 50.0, BudgetStatus::Active),
            budget("Dark Mode", 20.0, 23.0, 55.0, BudgetStatus::Cut),
            budget("Analytics Module", 40.0, 5.0, 60.0, BudgetStatus::Blocked),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_shape() {
        let data = sample_project();
        assert_eq!(data.project_name, "Apollo Platform v2.0");
        assert_eq!(data.initial_features.len(), 5);
        assert_eq!(data.current_features.len(), 10);
        assert_eq!(data.tasks.len(), 8);
        assert_eq!(data.messages.len(), 8);
        assert_eq!(data.commits.len(), 8);
        assert_eq!(data.budget_items.len(), 7);
        assert_eq!(data.added_features().len(), 5);
    }

    #[test]
    fn test_sample_serializes() {
        let data = sample_project();
        let json = serde_json::to_string(&data).unwrap();
        let parsed: ProjectData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.tasks.len(), data.tasks.len());
        assert_eq!(parsed.commits[0].date, data.commits[0].date);
    }
}
