//! Task prioritizer.
//!
//! Scores every task by urgency and impact, then ranks descending. The raw
//! score is internal only; callers see the priority label and the reason
//! string. Expansion-scope tasks take a penalty that scales with how
//! stressed the waiting/scope-drift signals are, so added features sink in
//! the ranking exactly when the project can least afford them.

use crate::matching::is_expansion_task;
use crate::project::{PrioritizedTask, Priority, Task, TaskStatus};

/// Signal level at which expansion work takes the full penalty.
const SATURATED_SIGNAL: u32 = 80;
/// Signal level at which expansion work takes the reduced penalty.
const ELEVATED_SIGNAL: u32 = 60;

/// Score and rank tasks. `waiting` and `scope_drift` must be the
/// authoritative signal values from the deadline aggregator.
pub fn prioritize_tasks(
    tasks: &[Task],
    initial_features: &[String],
    current_features: &[String],
    waiting: u32,
    scope_drift: u32,
) -> Vec<PrioritizedTask> {
    let mut scored: Vec<(i64, PrioritizedTask)> = tasks
        .iter()
        .map(|task| score_task(task, initial_features, current_features, waiting, scope_drift))
        .collect();

    // Stable sort keeps input order among equal scores.
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, task)| task).collect()
}

fn score_task(
    task: &Task,
    initial_features: &[String],
    current_features: &[String],
    waiting: u32,
    scope_drift: u32,
) -> (i64, PrioritizedTask) {
    let mut score: i64 = 0;
    let mut reason = String::new();

    let blocks_count = task.blocks.len();
    score += blocks_count as i64 * 25;
    if blocks_count > 0 {
        reason.push_str(&format!("Blocks {blocks_count} other task(s). "));
    }

    if task.status == TaskStatus::Blocked {
        score += 30;
        reason.push_str("Currently blocked — needs immediate unblocking. ");
    }

    if task.last_updated_days_ago > 7 {
        score += 20;
        reason.push_str(&format!("Idle for {} days. ", task.last_updated_days_ago));
    } else if task.last_updated_days_ago > 3 {
        score += 10;
        reason.push_str(&format!("Stale for {} days. ", task.last_updated_days_ago));
    }

    let estimated = task.estimated_hours.unwrap_or(0.0);
    if task.status != TaskStatus::Done && estimated > 20.0 {
        score += 15;
        reason.push_str(&format!("Large task ({estimated}h estimated). "));
    }

    if task.status == TaskStatus::NotStarted && estimated > 15.0 {
        score += 20;
        reason.push_str("Not started — high effort task needs to begin now. ");
    }

    if task.status == TaskStatus::Done {
        score = -100;
        reason = "Already completed.".to_string();
    } else if is_expansion_task(&task.title, initial_features, current_features) {
        if waiting >= SATURATED_SIGNAL || scope_drift >= SATURATED_SIGNAL {
            score -= 40;
            reason.push_str("Expansion scope — deprioritised while signals are saturated. ");
        } else if waiting >= ELEVATED_SIGNAL || scope_drift >= ELEVATED_SIGNAL {
            score -= 20;
            reason.push_str("Expansion scope — deprioritised while signals are elevated. ");
        }
    }

    let priority = if score >= 60 {
        Priority::Critical
    } else if score >= 35 {
        Priority::High
    } else if score >= 15 {
        Priority::Medium
    } else {
        Priority::Low
    };

    let reason = reason.trim().to_string();
    let prioritized = PrioritizedTask {
        title: task.title.clone(),
        assigned_to: task.assigned_to.clone(),
        priority,
        reason: if reason.is_empty() {
            "Normal priority task.".to_string()
        } else {
            reason
        },
        status: task.status,
        blocks_count,
        days_idle: task.last_updated_days_ago,
    };

    (score, prioritized)
}
