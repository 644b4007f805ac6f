//! Deadline aggregator.
//!
//! Combines the five signals into a single extension probability. The
//! combination weights adapt to how many optional data sources are actually
//! present: with nothing but tasks and features to go on, the always-computable
//! waiting and scope-drift signals carry all the weight; each real source
//! shifts weight toward the evidence it provides.

use chrono::NaiveDate;

use crate::parse::budget::compute_financial_health;
use crate::project::{Confidence, DeadlineAssessment, ProjectData, RiskLevel, SignalBreakdown};
use crate::signals::{
    compute_budget_burn_score, compute_commit_velocity_score, compute_communication_score,
    compute_scope_drift, compute_waiting_score,
};

/// Assumed project window in days for the time-remaining estimate.
const PROJECT_WINDOW_DAYS: f64 = 60.0;

/// Per-signal combination weights. Each preset sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalWeights {
    pub waiting: f64,
    pub scope_drift: f64,
    pub commit_velocity: f64,
    pub communication_gap: f64,
    pub budget_burn: f64,
}

impl SignalWeights {
    /// Weight preset for the number of optional sources present (commits,
    /// chat, budget), 0 through 3.
    pub fn for_source_count(source_count: usize) -> Self {
        match source_count {
            0 => Self {
                waiting: 0.60,
                scope_drift: 0.40,
                commit_velocity: 0.0,
                communication_gap: 0.0,
                budget_burn: 0.0,
            },
            1 => Self {
                waiting: 0.35,
                scope_drift: 0.30,
                commit_velocity: 0.20,
                communication_gap: 0.15,
                budget_burn: 0.0,
            },
            2 => Self {
                waiting: 0.30,
                scope_drift: 0.25,
                commit_velocity: 0.22,
                communication_gap: 0.18,
                budget_burn: 0.05,
            },
            _ => Self {
                waiting: 0.28,
                scope_drift: 0.22,
                commit_velocity: 0.22,
                communication_gap: 0.18,
                budget_burn: 0.10,
            },
        }
    }

    fn combine(&self, signals: &SignalBreakdown) -> u32 {
        let total = signals.waiting as f64 * self.waiting
            + signals.scope_drift as f64 * self.scope_drift
            + signals.commit_velocity as f64 * self.commit_velocity
            + signals.communication_gap as f64 * self.communication_gap
            + signals.budget_burn as f64 * self.budget_burn;
        (total.round() as i64).clamp(0, 100) as u32
    }
}

/// Percentage of the assumed 60-day window still ahead of `today`. An
/// unparsable release date degrades to a neutral 50.
pub fn time_remaining_percent(release_date: &str, today: NaiveDate) -> u32 {
    let release = match NaiveDate::parse_from_str(release_date.trim(), "%Y-%m-%d") {
        Ok(d) => d,
        Err(_) => return 50,
    };
    let days_left = (release - today).num_days().max(0) as f64;
    ((days_left / PROJECT_WINDOW_DAYS * 100.0).round() as u32).min(100)
}

/// Compute the combined deadline outlook for one project snapshot.
pub fn compute_deadline_assessment(data: &ProjectData, today: NaiveDate) -> DeadlineAssessment {
    let time_remaining = time_remaining_percent(&data.release_date, today);

    let waiting = compute_waiting_score(data);
    let scope_drift = compute_scope_drift(data).score;
    let commit_velocity = compute_commit_velocity_score(&data.commits, today);
    let communication_gap = compute_communication_score(&data.chat_messages, &data.messages);

    let (budget_burn, budget_burn_percent, financial_risk, wasted_hours) =
        if data.budget_items.is_empty() {
            (0, 0, RiskLevel::Low, 0.0)
        } else {
            let fin = compute_financial_health(&data.budget_items, time_remaining);
            (
                compute_budget_burn_score(&fin, time_remaining),
                fin.burn_percent,
                fin.financial_risk,
                fin.wasted_hours,
            )
        };

    let signals = SignalBreakdown {
        waiting,
        scope_drift,
        commit_velocity,
        budget_burn,
        communication_gap,
    };

    let source_count = [
        !data.commits.is_empty(),
        !data.chat_messages.is_empty(),
        !data.budget_items.is_empty(),
    ]
    .iter()
    .filter(|present| **present)
    .count();

    let probability = SignalWeights::for_source_count(source_count).combine(&signals);

    let confidence = match source_count {
        3.. => Confidence::High,
        2 => Confidence::Medium,
        _ => Confidence::Low,
    };

    DeadlineAssessment {
        probability,
        confidence,
        signals,
        time_remaining_percent: time_remaining,
        budget_burn_percent,
        financial_risk,
        wasted_hours,
    }
}
