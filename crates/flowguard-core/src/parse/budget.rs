//! Budget spreadsheet parser and financial health summary.
//!
//! Reads the "Budget" sheet out of a workbook via `calamine`. The sheet is
//! located by exact name first, then case-insensitively, then by substring,
//! then by falling back to the first sheet. Column headers are matched
//! against a fixed alias table; missing numeric cells default to 0 and a
//! missing status defaults to `Active`.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use serde::{Deserialize, Serialize};

use crate::project::{BudgetItem, BudgetStatus, RiskLevel};

const ITEM_ALIASES: [&str; 2] = ["item", "name"];
const BUDGETED_ALIASES: [&str; 4] = ["budgeted hours", "budgeted", "budget hours", "budget"];
const SPENT_ALIASES: [&str; 3] = ["spent hours", "spent", "actual hours"];
const RATE_ALIASES: [&str; 4] = ["cost per hour", "rate", "hourly rate", "cost"];
const STATUS_ALIASES: [&str; 1] = ["status"];

/// Parse budget items out of a workbook file. Any IO or format problem
/// yields an empty list.
pub fn parse_budget_workbook(path: &Path) -> Vec<BudgetItem> {
    let mut workbook = match open_workbook_auto(path) {
        Ok(wb) => wb,
        Err(_) => return Vec::new(),
    };

    let names: Vec<String> = workbook
        .sheet_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let sheet = match pick_sheet(&names) {
        Some(s) => s,
        None => return Vec::new(),
    };

    match workbook.worksheet_range(&sheet) {
        Ok(range) => parse_budget_rows(range.rows()),
        Err(_) => Vec::new(),
    }
}

/// Sheet location cascade: exact "Budget", case-insensitive match,
/// substring match, first sheet.
fn pick_sheet(names: &[String]) -> Option<String> {
    if let Some(n) = names.iter().find(|n| *n == "Budget") {
        return Some(n.clone());
    }
    if let Some(n) = names.iter().find(|n| n.eq_ignore_ascii_case("budget")) {
        return Some(n.clone());
    }
    if let Some(n) = names.iter().find(|n| n.to_lowercase().contains("budget")) {
        return Some(n.clone());
    }
    names.first().cloned()
}

/// Parse a header row plus data rows into budget items. Rows with an empty
/// item name and zero budgeted/spent hours are treated as blank and dropped.
pub fn parse_budget_rows<'a, I>(mut rows: I) -> Vec<BudgetItem>
where
    I: Iterator<Item = &'a [Data]>,
{
    let header = match rows.next() {
        Some(h) => h,
        None => return Vec::new(),
    };
    let headers: Vec<String> = header.iter().map(|c| normalize_header(&cell_string(c))).collect();

    let item_col = find_column(&headers, &ITEM_ALIASES);
    let budgeted_col = find_column(&headers, &BUDGETED_ALIASES);
    let spent_col = find_column(&headers, &SPENT_ALIASES);
    let rate_col = find_column(&headers, &RATE_ALIASES);
    let status_col = find_column(&headers, &STATUS_ALIASES);

    let mut items = Vec::new();
    for row in rows {
        let cell = |col: Option<usize>| col.and_then(|c| row.get(c));

        let item = cell(item_col).map(cell_string).unwrap_or_default();
        let budgeted_hours = cell(budgeted_col).map(cell_f64).unwrap_or(0.0);
        let spent_hours = cell(spent_col).map(cell_f64).unwrap_or(0.0);
        let cost_per_hour = cell(rate_col).map(cell_f64).unwrap_or(0.0);
        let status = cell(status_col)
            .map(|c| parse_status(&cell_string(c)))
            .unwrap_or_default();

        // Blank row
        if item.is_empty() && budgeted_hours == 0.0 && spent_hours == 0.0 {
            continue;
        }

        items.push(BudgetItem {
            item,
            budgeted_hours,
            spent_hours,
            cost_per_hour,
            status,
        });
    }
    items
}

fn normalize_header(h: &str) -> String {
    h.trim()
        .to_lowercase()
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    for alias in aliases {
        if let Some(idx) = headers.iter().position(|h| h == alias) {
            return Some(idx);
        }
    }
    None
}

fn cell_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

fn cell_f64(cell: &Data) -> f64 {
    match cell {
        Data::Float(f) => *f,
        Data::Int(i) => *i as f64,
        Data::String(s) => s.trim().parse().unwrap_or(0.0),
        Data::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

fn parse_status(raw: &str) -> BudgetStatus {
    match raw.trim().to_lowercase().as_str() {
        "blocked" => BudgetStatus::Blocked,
        "cut" => BudgetStatus::Cut,
        "done" => BudgetStatus::Done,
        _ => BudgetStatus::Active,
    }
}

/// Cost-side summary over the budget items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub total_budgeted_cost: f64,
    pub total_spent_cost: f64,
    /// Spend as a percentage of budget, rounded. Can exceed 100.
    pub burn_percent: u32,
    /// Hours spent on items that were later cut.
    pub wasted_hours: f64,
    pub wasted_cost: f64,
    /// Spend sitting on blocked items.
    pub blocked_cost: f64,
    pub financial_risk: RiskLevel,
    /// Cut item with the largest sunk cost, empty when none.
    pub top_waste_item: String,
}

/// Aggregate the budget into burn and waste figures, with a risk tier
/// comparing burn pace against elapsed time.
pub fn compute_financial_health(
    items: &[BudgetItem],
    time_remaining_percent: u32,
) -> FinancialSummary {
    let mut total_budgeted = 0.0;
    let mut total_spent = 0.0;
    let mut wasted_hours = 0.0;
    let mut wasted_cost = 0.0;
    let mut blocked_cost = 0.0;
    let mut top_waste_item = String::new();
    let mut max_waste = 0.0;

    for item in items {
        let budgeted_cost = item.budgeted_hours * item.cost_per_hour;
        let spent_cost = item.spent_hours * item.cost_per_hour;

        total_budgeted += budgeted_cost;
        total_spent += spent_cost;

        match item.status {
            BudgetStatus::Cut => {
                wasted_hours += item.spent_hours;
                wasted_cost += spent_cost;
                if spent_cost > max_waste {
                    max_waste = spent_cost;
                    top_waste_item = item.item.clone();
                }
            }
            BudgetStatus::Blocked => blocked_cost += spent_cost,
            _ => {}
        }
    }

    let burn_percent = if total_budgeted > 0.0 {
        (total_spent / total_budgeted * 100.0).round() as u32
    } else {
        0
    };

    let time_used = 100 - time_remaining_percent.min(100) as i64;
    let over_burn = burn_percent as i64 - time_used;

    let financial_risk = if over_burn > 20 || wasted_cost > total_budgeted * 0.1 {
        RiskLevel::High
    } else if over_burn > 10 || blocked_cost > total_budgeted * 0.05 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    FinancialSummary {
        total_budgeted_cost: total_budgeted,
        total_spent_cost: total_spent,
        burn_percent,
        wasted_hours,
        wasted_cost,
        blocked_cost,
        financial_risk,
        top_waste_item,
    }
}
