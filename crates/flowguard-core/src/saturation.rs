//! Saturation gate.
//!
//! Watches the waiting and scope-drift signals for threshold crossings and
//! partitions the prioritized task list into work that may proceed and
//! expansion work that is held back. The hard threshold sits at 75, below
//! the penalty threshold of the prioritizer, so moderately stressed projects
//! still trip the gate.

use serde::{Deserialize, Serialize};

use crate::matching::{initial_completion_rate, is_expansion_task};
use crate::project::{PrioritizedTask, Priority, SignalBreakdown, Task, TaskStatus};

/// Score at which a signal is saturated and expansion work freezes.
pub const HARD_BLOCK: u32 = 75;
/// Score at which a signal is elevated and low-value expansion work queues.
pub const SOFT_WARN: u32 = 50;
/// Fraction of initial-scope tasks that must be Done before the gate lifts.
pub const INITIAL_COMPLETION_GATE: f64 = 0.70;

/// Threshold classification of one signal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum SaturationLevel {
    Clear,
    Warning,
    Saturated,
}

/// One signal's gate-facing view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalSaturation {
    pub level: SaturationLevel,
    pub score: u32,
    pub label: String,
    pub icon: String,
}

/// Gate state, recomputed fresh for every analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaturationState {
    pub waiting: SignalSaturation,
    pub scope_drift: SignalSaturation,
    pub is_blocked: bool,
    /// Warning is only reported when the gate is not already blocked.
    pub is_warning: bool,
    pub initial_completion_rate: f64,
    pub completion_gate_passed: bool,
    /// Explanation of an active hold, `None` when the gate is clear.
    pub block_reason: Option<String>,
}

/// Partition of the prioritized list produced by [`gate_tasks`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatedTasks {
    pub active: Vec<PrioritizedTask>,
    pub held: Vec<PrioritizedTask>,
}

fn to_level(score: u32) -> SaturationLevel {
    if score >= HARD_BLOCK {
        SaturationLevel::Saturated
    } else if score >= SOFT_WARN {
        SaturationLevel::Warning
    } else {
        SaturationLevel::Clear
    }
}

fn signal_saturation(score: u32, label: &str, icon: &str) -> SignalSaturation {
    SignalSaturation {
        level: to_level(score),
        score,
        label: label.to_string(),
        icon: icon.to_string(),
    }
}

fn percent(rate: f64) -> u32 {
    (rate * 100.0).round() as u32
}

const GATE_PERCENT: u32 = (INITIAL_COMPLETION_GATE * 100.0) as u32;

/// Evaluate the gate against the authoritative signal values.
pub fn evaluate_saturation(
    signals: &SignalBreakdown,
    tasks: &[Task],
    initial_features: &[String],
    current_features: &[String],
) -> SaturationState {
    let waiting = signal_saturation(signals.waiting, "Waiting Bottlenecks", "\u{23f3}");
    let scope_drift = signal_saturation(signals.scope_drift, "Scope Drift", "\u{1f4c8}");

    let is_blocked = waiting.level == SaturationLevel::Saturated
        || scope_drift.level == SaturationLevel::Saturated;
    let is_warning = !is_blocked
        && (waiting.level == SaturationLevel::Warning
            || scope_drift.level == SaturationLevel::Warning);

    let completion_rate = initial_completion_rate(tasks, initial_features);
    let completion_gate_passed = completion_rate >= INITIAL_COMPLETION_GATE;

    let added_count = current_features
        .iter()
        .filter(|f| !initial_features.contains(f))
        .count();

    let block_reason = if is_blocked {
        let mut parts = Vec::new();
        if waiting.level == SaturationLevel::Saturated {
            parts.push(format!("Waiting ({}/100)", waiting.score));
        }
        if scope_drift.level == SaturationLevel::Saturated {
            parts.push(format!("Scope Drift ({}/100)", scope_drift.score));
        }
        let mut reason = format!(
            "{} reached saturation. New tasks are held until {GATE_PERCENT}% of initial work is Done (currently {}%).",
            parts.join(" & "),
            percent(completion_rate),
        );
        if added_count > 0 {
            reason.push_str(&format!(
                " {added_count} expansion feature(s) are queued and frozen."
            ));
        }
        Some(reason)
    } else if is_warning && !completion_gate_passed {
        Some(format!(
            "Signals are elevated. Focus on initial tasks before expanding scope ({}% done, target {GATE_PERCENT}%).",
            percent(completion_rate),
        ))
    } else {
        None
    };

    SaturationState {
        waiting,
        scope_drift,
        is_blocked,
        is_warning,
        initial_completion_rate: completion_rate,
        completion_gate_passed,
        block_reason,
    }
}

/// Partition the ranked tasks according to the gate state.
///
/// Done tasks always stay active. Under a hard block every expansion task is
/// held; under a warning only MEDIUM/LOW expansion tasks queue up. The
/// function is pure: the same inputs always yield the same partition.
pub fn gate_tasks(
    prioritized: Vec<PrioritizedTask>,
    saturation: &SaturationState,
    initial_features: &[String],
    current_features: &[String],
) -> GatedTasks {
    if !saturation.is_blocked && !saturation.is_warning {
        return GatedTasks {
            active: prioritized,
            held: Vec::new(),
        };
    }

    let mut active = Vec::new();
    let mut held = Vec::new();

    for mut task in prioritized {
        if task.status == TaskStatus::Done {
            active.push(task);
            continue;
        }

        let expansion = is_expansion_task(&task.title, initial_features, current_features);

        if saturation.is_blocked && expansion {
            task.reason = format!(
                "[HELD] {} — frozen until {GATE_PERCENT}% initial completion.",
                task.reason
            );
            held.push(task);
        } else if saturation.is_warning
            && expansion
            && matches!(task.priority, Priority::Medium | Priority::Low)
        {
            task.reason = format!(
                "[QUEUED] {} — deprioritised while signals are elevated.",
                task.reason
            );
            held.push(task);
        } else {
            active.push(task);
        }
    }

    // Safety valve: an overly aggressive feature mapping must not empty the
    // active list. If no non-done task survived, abort the hold.
    let non_done_active = active.iter().filter(|t| t.status != TaskStatus::Done).count();
    if non_done_active == 0 && !held.is_empty() {
        active.extend(held);
        return GatedTasks {
            active,
            held: Vec::new(),
        };
    }

    GatedTasks { active, held }
}

/// Deterministic insight strings describing the gate state.
pub fn saturation_insights(saturation: &SaturationState) -> Vec<String> {
    let mut insights = Vec::new();
    if saturation.is_blocked {
        if saturation.waiting.level == SaturationLevel::Saturated {
            insights.push(format!(
                "Waiting signal is at {}/100 — queue is saturated. No new tasks should start until bottlenecks are resolved.",
                saturation.waiting.score
            ));
        }
        if saturation.scope_drift.level == SaturationLevel::Saturated {
            insights.push(format!(
                "Scope Drift is at {}/100 — project has grown beyond safe limits. Scope additions are frozen until initial deliverables reach {GATE_PERCENT}% completion.",
                saturation.scope_drift.score
            ));
        }
        insights.push(format!(
            "Initial task completion: {}%. Hold gate lifts automatically at {GATE_PERCENT}%.",
            percent(saturation.initial_completion_rate)
        ));
    } else if saturation.is_warning {
        insights.push(
            "Signals approaching saturation. Lower-priority expansion work has been queued. Resolve bottlenecks now to avoid a full hold."
                .to_string(),
        );
    }
    insights
}

/// Deterministic recommendation strings matching the gate state.
pub fn saturation_recommendations(saturation: &SaturationState) -> Vec<String> {
    let mut recs = Vec::new();
    if saturation.is_blocked {
        recs.push(
            "Enforce scope freeze immediately — no new features until hold gate clears.".to_string(),
        );
        recs.push(
            "Assign every blocked/stale task a dedicated owner with a 48-hour deadline.".to_string(),
        );
        if saturation.waiting.level == SaturationLevel::Saturated {
            recs.push(
                "Run a daily 15-min unblocking standup targeting the approval chain.".to_string(),
            );
        }
        if saturation.scope_drift.level == SaturationLevel::Saturated {
            recs.push(
                "Move all held expansion tasks to v-next backlog and notify stakeholders."
                    .to_string(),
            );
        }
        recs.push(format!(
            "Track completion daily — must reach {GATE_PERCENT}% before new work is admitted."
        ));
    } else if saturation.is_warning {
        recs.push(
            "Signals elevated — deprioritise new scope until current work stabilises.".to_string(),
        );
        recs.push("Do not start queued expansion tasks until next sprint review.".to_string());
    }
    recs
}
