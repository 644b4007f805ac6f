//! Narrative layer.
//!
//! Produces the human-facing insights and recommendations. When an API key
//! is configured the [`HttpNarrativeProvider`] asks an OpenAI-compatible
//! chat endpoint for them; otherwise (or on any provider failure) the
//! deterministic [`heuristic_narrative`] stands in. Numeric scores returned
//! by a provider are advisory only, the analyzer keeps its own signal
//! values authoritative.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::NarrativeConfig;
use crate::error::NarrativeError;
use crate::project::{Confidence, ProjectData, TaskStatus};
use crate::signals::{compute_scope_drift, compute_waiting_score};

/// Narrative content for one analysis, from either source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Narrative {
    #[serde(default)]
    pub delay_risk_score: u32,
    #[serde(default)]
    pub scope_growth_percent: u32,
    /// Provider's own probability estimate, if it gave one.
    #[serde(default)]
    pub deadline_extension_probability: Option<u32>,
    #[serde(default)]
    pub confidence: Option<Confidence>,
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Source of narrative content. Implementations must be side-effect free
/// apart from their own IO; the analyzer calls at most once per analysis.
pub trait NarrativeProvider {
    fn narrate(&self, data: &ProjectData, saturation_hint: Option<&str>)
        -> Result<Narrative, NarrativeError>;
}

/// Combined delay risk from the two always-available signals.
pub fn delay_risk_score(waiting: u32, scope_drift: u32) -> u32 {
    ((waiting as f64 * 0.6 + scope_drift as f64 * 0.4).round() as u32).min(100)
}

/// Deterministic narrative built from the snapshot alone. Always succeeds.
pub fn heuristic_narrative(data: &ProjectData) -> Narrative {
    let waiting = compute_waiting_score(data);
    let drift = compute_scope_drift(data);

    let blocked: Vec<&str> = data
        .tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Blocked)
        .map(|t| t.title.as_str())
        .collect();
    let stale_count = data
        .tasks
        .iter()
        .filter(|t| t.last_updated_days_ago > 5)
        .count();
    let added = data.added_features();

    let mut insights = Vec::new();
    if !blocked.is_empty() {
        insights.push(format!(
            "{} task(s) blocked: {}.",
            blocked.len(),
            blocked.join(", ")
        ));
    }
    if stale_count > 0 {
        insights.push(format!("{stale_count} task(s) not updated in over 5 days."));
    }
    if !added.is_empty() {
        insights.push(format!(
            "Scope grew by {} feature(s): {}.",
            added.len(),
            added.join(", ")
        ));
    }

    let mut recommendations = Vec::new();
    if waiting > 50 {
        recommendations.push("Hold daily 15-min unblocking standup.".to_string());
        recommendations.push("Assign single decision-maker per pending approval.".to_string());
    }
    if drift.score > 40 {
        recommendations.push(format!(
            "Freeze scope. Move {} feature(s) to v2.1 backlog.",
            added.len()
        ));
    }
    if stale_count > 2 {
        recommendations.push("Re-assign stale tasks idle over 5 days.".to_string());
    }

    Narrative {
        delay_risk_score: delay_risk_score(waiting, drift.score),
        scope_growth_percent: drift.growth_percent,
        deadline_extension_probability: None,
        confidence: None,
        insights,
        recommendations,
    }
}

/// Build the chat prompt. The schema is spelled out verbatim so small
/// models return parseable JSON.
fn build_prompt(data: &ProjectData, saturation_hint: Option<&str>) -> String {
    let context = match saturation_hint {
        Some(hint) if !hint.is_empty() => format!("IMPORTANT CONTEXT: {hint}\n\n"),
        _ => String::new(),
    };

    let summary = json!({
        "project_name": data.project_name,
        "release_date": data.release_date,
        "tasks": data.tasks,
        "messages": data.messages,
        "initial_features": data.initial_features,
        "current_features": data.current_features,
        "commit_count": data.commits.len(),
        "chat_message_count": data.chat_messages.len(),
        "budget_item_count": data.budget_items.len(),
    });
    let summary = serde_json::to_string_pretty(&summary).unwrap_or_default();

    format!(
        "You are a senior release manager and project risk analyst.\n\n\
         Analyze this project and return ONLY valid JSON, no markdown, no explanation.\n\n\
         {context}\
         Return exactly this schema:\n\
         {{\n\
         \x20 \"delay_risk_score\": <0-100>,\n\
         \x20 \"waiting_score\": <0-100>,\n\
         \x20 \"scope_drift_score\": <0-100>,\n\
         \x20 \"scope_growth_percent\": <number>,\n\
         \x20 \"deadline_extension_probability\": <0-100>,\n\
         \x20 \"confidence\": <\"Low\"|\"Medium\"|\"High\">,\n\
         \x20 \"insights\": [<3 to 5 strings>],\n\
         \x20 \"recommendations\": [<3 to 5 strings>]\n\
         }}\n\n\
         Project Data:\n\
         {summary}\n\n\
         JSON only."
    )
}

/// Strip markdown code fences a model may wrap the JSON in.
fn strip_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse a chat-completion body into a [`Narrative`].
fn parse_completion(body: &serde_json::Value) -> Result<Narrative, NarrativeError> {
    let content = body
        .pointer("/choices/0/message/content")
        .and_then(|v| v.as_str())
        .ok_or_else(|| NarrativeError::Malformed("missing choices[0].message.content".into()))?;

    let cleaned = strip_fences(content);
    serde_json::from_str(&cleaned).map_err(|e| NarrativeError::Malformed(e.to_string()))
}

/// Narrative provider backed by an OpenAI-compatible chat completions
/// endpoint.
pub struct HttpNarrativeProvider {
    config: NarrativeConfig,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl HttpNarrativeProvider {
    /// Build a provider. Fails only if the HTTP client cannot be
    /// constructed.
    pub fn new(config: NarrativeConfig, api_key: String) -> Result<Self, NarrativeError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            config,
            api_key,
            client,
        })
    }
}

impl NarrativeProvider for HttpNarrativeProvider {
    fn narrate(
        &self,
        data: &ProjectData,
        saturation_hint: Option<&str>,
    ) -> Result<Narrative, NarrativeError> {
        if self.api_key.is_empty() {
            return Err(NarrativeError::MissingApiKey);
        }

        let body = json!({
            "model": self.config.model,
            "messages": [{ "role": "user", "content": build_prompt(data, saturation_hint) }],
            "temperature": self.config.temperature,
        });

        let resp = self
            .client
            .post(&self.config.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()?;

        if !resp.status().is_success() {
            return Err(NarrativeError::Status {
                status: resp.status().as_u16(),
            });
        }

        let body: serde_json::Value = resp.json()?;
        parse_completion(&body)
    }
}
