//! Analysis pipeline.
//!
//! Order matters here: signals first, then saturation, then prioritization
//! and gating, and the narrative layer last. The deadline aggregator's
//! signal values are the single source of truth; whatever numbers a
//! narrative provider echoes back, the final result keeps the computed
//! waiting and scope-drift scores.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::AnalyzerConfig;
use crate::deadline::compute_deadline_assessment;
use crate::error::NarrativeError;
use crate::narrative::{heuristic_narrative, HttpNarrativeProvider, Narrative, NarrativeProvider};
use crate::prioritize::prioritize_tasks;
use crate::project::{Confidence, PrioritizedTask, ProjectData, RiskLevel, SignalBreakdown};
use crate::saturation::{
    evaluate_saturation, gate_tasks, saturation_insights, saturation_recommendations,
    SaturationState,
};

/// Upper bound on insight and recommendation list lengths.
const MAX_NARRATIVE_ITEMS: usize = 6;

/// Complete output of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalResult {
    pub delay_risk_score: u32,
    pub waiting_score: u32,
    pub scope_drift_score: u32,
    pub scope_growth_percent: u32,
    pub deadline_extension_probability: u32,
    pub confidence: Confidence,
    pub prioritized_tasks: Vec<PrioritizedTask>,
    pub held_tasks: Vec<PrioritizedTask>,
    pub saturation: SaturationState,
    pub budget_burn_percent: u32,
    pub time_remaining_percent: u32,
    pub wasted_hours: f64,
    pub financial_risk: RiskLevel,
    pub signals: SignalBreakdown,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub ai_powered: bool,
}

/// Stateless analysis driver. Holding one is cheap; the only state is the
/// optional narrative provider.
pub struct Analyzer {
    provider: Option<Box<dyn NarrativeProvider>>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    /// Analyzer with no narrative provider; every run uses the
    /// deterministic narrative.
    pub fn new() -> Self {
        Self { provider: None }
    }

    pub fn with_provider(provider: Box<dyn NarrativeProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Build from configuration. A missing API key is not an error, it
    /// just means fallback narratives.
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, NarrativeError> {
        match config.api_key() {
            Some(key) => {
                let provider = HttpNarrativeProvider::new(config.narrative.clone(), key)?;
                Ok(Self::with_provider(Box::new(provider)))
            }
            None => Ok(Self::new()),
        }
    }

    /// Analyze a snapshot as of the local date.
    pub fn analyze(&self, data: &ProjectData) -> FinalResult {
        self.analyze_at(data, chrono::Local::now().date_naive())
    }

    /// Analyze a snapshot with an explicit reference date. Pure given the
    /// provider's behavior, so tests pin `today`.
    pub fn analyze_at(&self, data: &ProjectData, today: NaiveDate) -> FinalResult {
        let deadline = compute_deadline_assessment(data, today);
        let signals = deadline.signals.clone();

        let saturation = evaluate_saturation(
            &signals,
            &data.tasks,
            &data.initial_features,
            &data.current_features,
        );

        let prioritized = prioritize_tasks(
            &data.tasks,
            &data.initial_features,
            &data.current_features,
            signals.waiting,
            signals.scope_drift,
        );
        let gated = gate_tasks(
            prioritized,
            &saturation,
            &data.initial_features,
            &data.current_features,
        );

        let (narrative, ai_powered) = self.narrative_for(data, &saturation);

        let mut insights = saturation_insights(&saturation);
        insights.extend(narrative.insights);
        insights.truncate(MAX_NARRATIVE_ITEMS);

        let mut recommendations = saturation_recommendations(&saturation);
        recommendations.extend(narrative.recommendations);
        recommendations.truncate(MAX_NARRATIVE_ITEMS);

        FinalResult {
            delay_risk_score: narrative.delay_risk_score,
            waiting_score: signals.waiting,
            scope_drift_score: signals.scope_drift,
            scope_growth_percent: narrative.scope_growth_percent,
            deadline_extension_probability: narrative
                .deadline_extension_probability
                .unwrap_or(deadline.probability),
            confidence: narrative.confidence.unwrap_or(deadline.confidence),
            prioritized_tasks: gated.active,
            held_tasks: gated.held,
            saturation,
            budget_burn_percent: deadline.budget_burn_percent,
            time_remaining_percent: deadline.time_remaining_percent,
            wasted_hours: deadline.wasted_hours,
            financial_risk: deadline.financial_risk,
            signals,
            insights,
            recommendations,
            ai_powered,
        }
    }

    /// Provider narrative when one exists and succeeds, deterministic
    /// fallback otherwise.
    fn narrative_for(
        &self,
        data: &ProjectData,
        saturation: &SaturationState,
    ) -> (Narrative, bool) {
        if let Some(provider) = &self.provider {
            match provider.narrate(data, saturation.block_reason.as_deref()) {
                Ok(narrative) => return (narrative, true),
                Err(_) => return (heuristic_narrative(data), false),
            }
        }
        (heuristic_narrative(data), false)
    }
}
