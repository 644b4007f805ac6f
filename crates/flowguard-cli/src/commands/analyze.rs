use std::path::PathBuf;

use clap::Args;
use flowguard_core::parse::{budget, chat, commits};
use flowguard_core::{sample_project, Analyzer, AnalyzerConfig, FinalResult, ProjectData};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Project snapshot JSON file
    #[arg(long, conflicts_with = "sample")]
    project: Option<PathBuf>,
    /// Analyze the bundled sample project
    #[arg(long)]
    sample: bool,
    /// Overlay a delimited commit log (CSV/TSV)
    #[arg(long)]
    commits: Option<PathBuf>,
    /// Overlay a chat export text file
    #[arg(long)]
    chat: Option<PathBuf>,
    /// Overlay a budget workbook (xlsx)
    #[arg(long)]
    budget: Option<PathBuf>,
    /// Config file (default: ~/.config/flowguard/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Skip the external narrative provider
    #[arg(long)]
    no_narrative: bool,
    /// Print the full result as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: AnalyzeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut data = load_snapshot(&args)?;

    if let Some(path) = &args.commits {
        let text = std::fs::read_to_string(path)?;
        data.commits = commits::parse_commit_log(&text);
    }
    if let Some(path) = &args.chat {
        let text = std::fs::read_to_string(path)?;
        data.chat_messages = chat::parse_chat_export(&text);
    }
    if let Some(path) = &args.budget {
        data.budget_items = budget::parse_budget_workbook(path);
    }

    let config = match &args.config {
        Some(path) => AnalyzerConfig::load_from(path)?,
        None => AnalyzerConfig::load_or_default(),
    };

    let analyzer = if args.no_narrative {
        Analyzer::new()
    } else {
        Analyzer::from_config(&config)?
    };

    let result = analyzer.analyze(&data);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&data.project_name, &result);
    }
    Ok(())
}

fn load_snapshot(args: &AnalyzeArgs) -> Result<ProjectData, Box<dyn std::error::Error>> {
    match (&args.project, args.sample) {
        (Some(path), _) => Ok(ProjectData::from_json_file(path)?),
        (None, true) => Ok(sample_project()),
        (None, false) => Err("provide --project <file> or --sample".into()),
    }
}

fn print_summary(project_name: &str, result: &FinalResult) {
    println!("{project_name}");
    println!(
        "  deadline extension probability: {}% (confidence: {:?})",
        result.deadline_extension_probability, result.confidence
    );
    println!("  delay risk: {}/100", result.delay_risk_score);
    println!(
        "  time remaining: {}%   budget burn: {}%   financial risk: {:?}",
        result.time_remaining_percent, result.budget_burn_percent, result.financial_risk
    );
    println!("  signals:");
    println!("    waiting:           {:>3}", result.signals.waiting);
    println!("    scope drift:       {:>3}", result.signals.scope_drift);
    println!("    commit velocity:   {:>3}", result.signals.commit_velocity);
    println!("    communication gap: {:>3}", result.signals.communication_gap);
    println!("    budget burn:       {:>3}", result.signals.budget_burn);

    if let Some(reason) = &result.saturation.block_reason {
        println!("  gate: {reason}");
    }

    if !result.prioritized_tasks.is_empty() {
        println!("  tasks:");
        for task in &result.prioritized_tasks {
            println!(
                "    [{:?}] {} ({}) - {}",
                task.priority, task.title, task.assigned_to, task.reason
            );
        }
    }
    if !result.held_tasks.is_empty() {
        println!("  held:");
        for task in &result.held_tasks {
            println!("    [{:?}] {} - {}", task.priority, task.title, task.reason);
        }
    }

    if !result.insights.is_empty() {
        println!("  insights:");
        for insight in &result.insights {
            println!("    - {insight}");
        }
    }
    if !result.recommendations.is_empty() {
        println!("  recommendations:");
        for rec in &result.recommendations {
            println!("    - {rec}");
        }
    }
    if !result.ai_powered {
        println!("  (deterministic narrative; set FLOWGUARD_API_KEY for LLM insights)");
    }
}
