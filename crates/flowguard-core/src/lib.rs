//! # FlowGuard Core Library
//!
//! This library provides the analysis engine behind FlowGuard, a project
//! health monitor. It is CLI-first: everything the `flowguard-cli` binary
//! does goes through this crate, and any other frontend would be a thin
//! layer over the same pipeline.
//!
//! ## Architecture
//!
//! - **Parsers**: Fail-soft readers for commit logs, chat exports and
//!   budget workbooks
//! - **Signals**: Five 0-100 severity scores computed from the snapshot
//! - **Deadline Aggregator**: Weighted combination of the signals into an
//!   extension probability, with weights that adapt to available sources
//! - **Saturation Gate**: Holds expansion-scope work while signals are
//!   saturated
//! - **Narrative**: LLM-backed insights with a deterministic fallback
//!
//! ## Key Components
//!
//! - [`Analyzer`]: End-to-end pipeline driver
//! - [`ProjectData`]: Input snapshot all analysis reads from
//! - [`FinalResult`]: Complete analysis output
//! - [`AnalyzerConfig`]: TOML configuration for the narrative provider

pub mod analyze;
pub mod config;
pub mod deadline;
pub mod error;
pub mod matching;
pub mod narrative;
pub mod parse;
pub mod prioritize;
pub mod project;
pub mod sample;
pub mod saturation;
pub mod signals;

pub use analyze::{Analyzer, FinalResult};
pub use config::AnalyzerConfig;
pub use deadline::{compute_deadline_assessment, SignalWeights};
pub use error::{ConfigError, CoreError, NarrativeError, ParseError};
pub use narrative::{heuristic_narrative, HttpNarrativeProvider, Narrative, NarrativeProvider};
pub use prioritize::prioritize_tasks;
pub use project::{
    BudgetItem, BudgetStatus, ChatMessage, Confidence, DeadlineAssessment, GitCommit,
    PrioritizedTask, Priority, ProjectData, RiskLevel, SignalBreakdown, Task, TaskStatus,
};
pub use sample::sample_project;
pub use saturation::{evaluate_saturation, gate_tasks, GatedTasks, SaturationState};
