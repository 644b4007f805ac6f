//! Core data model shared across the analysis pipeline.
//!
//! `ProjectData` is the single input snapshot: tasks and feature lists are
//! always present, while commits, chat messages and budget items are optional
//! sources that default to empty collections on deserialization. The engine
//! never mutates a `ProjectData`; every analysis derives fresh output records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskStatus {
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Blocked,
    Done,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::NotStarted
    }
}

/// A single tracked task, as submitted by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    #[serde(default)]
    pub assigned_to: String,
    /// Days since the task last changed.
    #[serde(default)]
    pub last_updated_days_ago: u32,
    #[serde(default)]
    pub status: TaskStatus,
    /// Estimated remaining effort in hours, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    /// Titles of tasks this one blocks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<String>,
}

/// One commit parsed from an exported commit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitCommit {
    pub sha: String,
    pub author: String,
    pub date: NaiveDate,
    pub message: String,
}

/// One message parsed from a chat export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub date: NaiveDate,
    pub author: String,
    pub text: String,
}

/// Budget line item state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BudgetStatus {
    Active,
    Blocked,
    /// Work that was cut after hours were already spent.
    Cut,
    Done,
}

impl Default for BudgetStatus {
    fn default() -> Self {
        BudgetStatus::Active
    }
}

/// One row from the budget sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetItem {
    pub item: String,
    #[serde(default)]
    pub budgeted_hours: f64,
    #[serde(default)]
    pub spent_hours: f64,
    #[serde(default)]
    pub cost_per_hour: f64,
    #[serde(default)]
    pub status: BudgetStatus,
}

/// Complete input snapshot for one analysis run.
///
/// `current_features` minus `initial_features` defines the project's
/// expansion scope; the gate and prioritizer both key off that difference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectData {
    pub project_name: String,
    /// Planned release date as `YYYY-MM-DD`. Invalid values degrade to a
    /// neutral time-remaining estimate rather than failing the analysis.
    pub release_date: String,
    #[serde(default)]
    pub initial_features: Vec<String>,
    #[serde(default)]
    pub current_features: Vec<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Free-form status messages (standup notes, ticket comments).
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(default)]
    pub commits: Vec<GitCommit>,
    #[serde(default)]
    pub chat_messages: Vec<ChatMessage>,
    #[serde(default)]
    pub budget_items: Vec<BudgetItem>,
}

impl ProjectData {
    /// Load a snapshot from a JSON file.
    pub fn from_json_file(path: &std::path::Path) -> Result<Self, crate::error::ParseError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| crate::error::ParseError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        serde_json::from_str(&content)
            .map_err(|e| crate::error::ParseError::InvalidProject(e.to_string()))
    }

    /// Feature names present now but absent from the initial scope.
    pub fn added_features(&self) -> Vec<&str> {
        self.current_features
            .iter()
            .filter(|f| !self.initial_features.contains(f))
            .map(|f| f.as_str())
            .collect()
    }
}

/// Normalized 0-100 severity per data source.
///
/// This is the single authoritative signal set: the saturation gate, the
/// prioritizer and any display layer all consume these exact values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignalBreakdown {
    pub waiting: u32,
    pub scope_drift: u32,
    pub commit_velocity: u32,
    pub budget_burn: u32,
    pub communication_gap: u32,
}

/// Priority label assigned by the prioritizer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

/// Derived per-task ranking record. Created fresh per analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrioritizedTask {
    pub title: String,
    pub assigned_to: String,
    pub priority: Priority,
    /// Human-readable explanation of the ranking.
    pub reason: String,
    pub status: TaskStatus,
    pub blocks_count: usize,
    pub days_idle: u32,
}

/// How many independent data sources informed the probability estimate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Qualitative financial risk tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Combined deadline outlook produced by the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadlineAssessment {
    /// Chance of missing the deadline, 0-100.
    pub probability: u32,
    pub confidence: Confidence,
    pub signals: SignalBreakdown,
    pub time_remaining_percent: u32,
    pub budget_burn_percent: u32,
    pub financial_risk: RiskLevel,
    pub wasted_hours: f64,
}
