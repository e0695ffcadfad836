//! Output formatters for series, verdicts and the dashboard

use anyhow::Result;
use colored::*;
use finsheet_core::{CompanyReport, Dashboard, Extraction, NumericSeries, ScoreCard, Verdict};
use serde::Serialize;
use std::path::Path;

/// Extraction result for one company
#[derive(Serialize)]
pub struct CompanyExtraction {
    pub company: String,
    pub extraction: Extraction,
}

/// Verdict with the scores behind it
#[derive(Serialize)]
pub struct CompanyVerdict {
    pub company: String,
    pub card: ScoreCard,
    pub verdict: Option<Verdict>,
}

pub fn print_companies(file_path: &Path, companies: &[&str]) {
    println!("{}", format!("Companies in {}", file_path.display()).bold());
    for company in companies {
        println!("  {}", company.cyan());
    }
}

pub fn print_extractions(keywords: &[String], results: &[CompanyExtraction]) {
    println!("{}", format!("Metric: {}", keywords.join(" | ")).bold());
    println!();

    for result in results {
        println!("{} {}", "Company:".bold(), result.company.cyan().bold());
        print_extraction(&result.extraction, 1);
        println!();
    }
}

pub fn print_verdicts(verdicts: &[CompanyVerdict]) {
    for entry in verdicts {
        println!("{} {}", "Company:".bold(), entry.company.cyan().bold());
        print_score_card(&entry.card, 1);
        println!("  {}", verdict_text(entry.verdict));
        println!();
    }
}

/// Print the dashboard sections in the order the panels are laid out
pub fn print_dashboard(file_path: &Path, dashboard: &Dashboard) {
    println!(
        "{}",
        format!("Financial & Forensic Analysis: {}", file_path.display()).bold()
    );
    println!();

    section("Accruals Trend", &dashboard.companies, |report| {
        print_extraction(&report.accruals, 2)
    });

    println!("{}", "Forensic Scores".bold().underline());
    for report in &dashboard.companies {
        println!("  {}", report.company.cyan().bold());
        if report.scores.rows.is_empty() {
            println!("    {}", "No data".bright_black());
        }
        for row in &report.scores.rows {
            println!(
                "    {} (mean {})",
                format_series(&row.series),
                format_value(row.mean)
            );
        }
        println!("    {}", verdict_text(report.scores.verdict));
    }
    println!();

    section("Revenue Trend", &dashboard.companies, |report| {
        print_extraction(&report.revenue, 2)
    });
    section("Profit Trend", &dashboard.companies, |report| {
        print_extraction(&report.profit, 2)
    });

    if let Some(notes) = &dashboard.notes {
        println!("{}", "Analyst Notes".bold().underline());
        for line in notes.lines() {
            println!("  {}", line);
        }
    }
}

fn section(title: &str, reports: &[CompanyReport], body: impl Fn(&CompanyReport)) {
    println!("{}", title.bold().underline());
    for report in reports {
        println!("  {}", report.company.cyan().bold());
        body(report);
    }
    println!();
}

fn print_extraction(extraction: &Extraction, indent: usize) {
    let indent_str = "  ".repeat(indent);
    match extraction {
        Extraction::NoMatch => println!("{}{}", indent_str, "No data".bright_black()),
        Extraction::Matched(series) => {
            for s in series {
                println!("{}{}", indent_str, format_series(s));
            }
        }
    }
}

fn print_score_card(card: &ScoreCard, indent: usize) {
    let indent_str = "  ".repeat(indent);
    println!("{}M-Score: {}", indent_str, format_value(card.m_score));
    println!("{}Z-Score: {}", indent_str, format_value(card.z_score));
    println!("{}F-Score: {}", indent_str, format_value(card.f_score));
}

fn format_series(series: &NumericSeries) -> String {
    let points: Vec<String> = series
        .points
        .iter()
        .map(|p| format!("{}={}", p.period, format_value(p.value)))
        .collect();
    format!("{}: {}", series.label.yellow(), points.join(", "))
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "-".to_string(),
    }
}

fn verdict_text(verdict: Option<Verdict>) -> ColoredString {
    match verdict {
        Some(Verdict::Strong) => Verdict::Strong.label().green().bold(),
        Some(Verdict::Moderate) => Verdict::Moderate.label().yellow().bold(),
        Some(Verdict::HighRisk) => Verdict::HighRisk.label().red().bold(),
        None => "Insufficient data".bright_black(),
    }
}

/// Print any report in JSON format
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
