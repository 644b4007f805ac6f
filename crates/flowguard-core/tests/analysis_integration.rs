//! End-to-end analysis over the bundled sample project.
//!
//! Pins the full pipeline output for a fixed reference date: signal values,
//! adaptive weighting, saturation gating and the deterministic narrative.

use chrono::NaiveDate;
use flowguard_core::{sample_project, Analyzer, Confidence, FinalResult, Priority, RiskLevel};

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 2, 14).unwrap()
}

fn run_sample() -> FinalResult {
    Analyzer::new().analyze_at(&sample_project(), reference_date())
}

#[test]
fn test_sample_signal_values() {
    let result = run_sample();

    // Two blocked tasks, three long-idle tasks and keyword-heavy messages
    // saturate waiting; scope doubled from 5 to 10 features.
    assert_eq!(result.signals.waiting, 100);
    assert_eq!(result.signals.scope_drift, 100);
    // Weekly velocity 3/2 -> 1/1/1 plus risky commits and 4 silent days.
    assert_eq!(result.signals.commit_velocity, 95);
    // Six of eight status messages carry a blocking keyword.
    assert_eq!(result.signals.communication_gap, 72);
    // 64% burn against 52% of the window used.
    assert_eq!(result.signals.budget_burn, 24);
}

#[test]
fn test_sample_probability_and_confidence() {
    let result = run_sample();

    // Commits and budget present, chat absent: two sources.
    assert_eq!(result.confidence, Confidence::Medium);
    // 100*0.30 + 100*0.25 + 95*0.22 + 72*0.18 + 24*0.05 = 90.06
    assert_eq!(result.deadline_extension_probability, 90);
    assert_eq!(result.time_remaining_percent, 48);
    assert_eq!(result.budget_burn_percent, 64);
    assert_eq!(result.financial_risk, RiskLevel::Medium);
    assert_eq!(result.wasted_hours, 23.0);
}

#[test]
fn test_sample_gate_holds_expansion_backlog() {
    let result = run_sample();

    assert!(result.saturation.is_blocked);
    let reason = result.saturation.block_reason.as_deref().unwrap();
    assert!(reason.contains("Waiting (100/100) & Scope Drift (100/100)"));
    assert!(reason.contains("5 expansion feature(s)"));
    // 3 initial-scope tasks, 1 of them Done.
    assert!(!result.saturation.completion_gate_passed);

    let held: Vec<&str> = result.held_tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(
        held,
        vec!["Analytics Module Backend", "AI Recommendations engine"]
    );
    assert!(result.held_tasks[0].reason.starts_with("[HELD]"));
    assert_eq!(result.prioritized_tasks.len(), 6);
}

#[test]
fn test_sample_task_ranking() {
    let result = run_sample();

    // Blocks 2 tasks + blocked + stale: clear top of the list.
    assert_eq!(result.prioritized_tasks[0].title, "Implement Payments API");
    assert_eq!(result.prioritized_tasks[0].priority, Priority::Critical);
    assert_eq!(result.prioritized_tasks[0].blocks_count, 2);

    assert_eq!(result.prioritized_tasks[1].title, "Stripe webhook handling");
    assert_eq!(result.prioritized_tasks[1].priority, Priority::High);

    // Done task sinks to the bottom of the active list.
    let last = result.prioritized_tasks.last().unwrap();
    assert_eq!(last.title, "User onboarding flow");
    assert_eq!(last.reason, "Already completed.");
}

#[test]
fn test_sample_narrative_content() {
    let result = run_sample();

    assert!(!result.ai_powered);
    // waiting 100 * 0.6 + drift 100 * 0.4
    assert_eq!(result.delay_risk_score, 100);
    assert_eq!(result.scope_growth_percent, 100);

    // Saturation templates lead, fallback insights fill to the cap of 6.
    assert_eq!(result.insights.len(), 6);
    assert!(result.insights[0].contains("Waiting signal is at 100/100"));
    assert!(result.insights[1].contains("Scope Drift is at 100/100"));
    assert!(result
        .insights
        .iter()
        .any(|i| i.contains("2 task(s) blocked: Implement Payments API, Stripe webhook handling")));

    assert_eq!(result.recommendations.len(), 6);
    assert!(result.recommendations[0].contains("scope freeze"));
    assert!(result
        .recommendations
        .iter()
        .any(|r| r.contains("unblocking standup")));
}

#[test]
fn test_final_result_serializes_round_trip() {
    let result = run_sample();
    let json = serde_json::to_string(&result).unwrap();
    let parsed: FinalResult = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.deadline_extension_probability, 90);
    assert_eq!(parsed.signals, result.signals);
    assert_eq!(parsed.held_tasks.len(), result.held_tasks.len());

    // Wire names follow the original schema.
    assert!(json.contains("\"CRITICAL\""));
    assert!(json.contains("\"ai_powered\":false"));
}
