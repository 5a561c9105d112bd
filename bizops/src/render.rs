//! Terminal rendering for plans, analyses, turns, and the dashboard
//!
//! Every renderer returns a `String` so output can be checked in tests and
//! printed by the caller.

use std::fmt::Write;

use colored::Colorize;

use crate::copilot::{StrategyPlan, Turn, TurnRole};
use crate::dashboard::Dashboard;

const BULLET: &str = "•";

/// Render model text line by line
///
/// `**` lines become bold headings, `-`/`*` lines become bullets, and
/// everything else passes through. Bold markers are dropped everywhere; the
/// line kind comes from the prefix before they are removed.
pub fn render_markdown(text: &str) -> String {
    let mut out = String::new();
    for line in text.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("**") {
            let heading = trimmed.replace("**", "");
            let _ = writeln!(out, "{}", heading.trim().trim_end_matches(':').trim_end().bold());
        } else if let Some(rest) = trimmed.strip_prefix('-').or_else(|| trimmed.strip_prefix('*')) {
            let _ = writeln!(out, "  {} {}", BULLET.cyan(), rest.replace("**", "").trim());
        } else {
            let _ = writeln!(out, "{}", line.replace("**", ""));
        }
    }
    out
}

pub fn render_plan(plan: &StrategyPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", plan.title.bright_cyan().bold());
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "Executive Summary".bold());
    let _ = writeln!(out, "{}", plan.executive_summary);
    let _ = writeln!(out);
    let _ = writeln!(out, "{} {}", "Projected ROI:".bold(), plan.roi_estimate.green());
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "Execution Roadmap".bold());
    for (i, step) in plan.steps.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, step.phase.yellow());
        let _ = writeln!(out, "     {}", step.action);
        let _ = writeln!(out, "     {} {}", "Owner:".dimmed(), step.owner);
        let _ = writeln!(out, "     {} {}", "Impact:".dimmed(), step.estimated_impact);
    }
    out
}

/// Render a turn with its role label; error turns are red
pub fn render_turn(turn: &Turn) -> String {
    let label = match turn.role() {
        TurnRole::User => "You".bright_green(),
        TurnRole::Assistant => "BizOps".bright_blue(),
    };
    let body = if turn.is_error() {
        turn.text().red().to_string()
    } else {
        render_markdown(turn.text()).trim_end().to_string()
    };
    format!("{} {}\n", format!("{}:", label).bold(), body)
}

pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Executive Overview".bright_cyan().bold());
    let _ = writeln!(out);
    for kpi in &dashboard.kpis {
        let trend = kpi.trend_label();
        let trend = if kpi.trend >= 0.0 { trend.green() } else { trend.red() };
        let _ = writeln!(out, "  {:<22} {:>10}  {}", kpi.name, kpi.value_label(), trend);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "Revenue vs Operational Expenses".bold());
    let _ = writeln!(
        out,
        "  {:<5} {:>9} {:>9} {:>9} {:>11}",
        "Month", "Revenue", "Expenses", "Net", "Efficiency"
    );
    for point in &dashboard.series {
        let _ = writeln!(
            out,
            "  {:<5} {:>9} {:>9} {:>9} {:>10}%",
            point.name,
            point.revenue,
            point.expenses,
            point.net(),
            point.efficiency
        );
    }
    if let Some(peak) = dashboard.peak_efficiency() {
        let _ = writeln!(out, "  {} {} ({}%)", "Peak efficiency:".dimmed(), peak.name, peak.efficiency);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", dashboard.status.yellow());
    out
}
