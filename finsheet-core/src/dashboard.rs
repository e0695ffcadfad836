//! Per-company dashboard report
//!
//! Gathers, for each selected company sheet, the series behind the accruals,
//! forensic score, revenue and profit panels plus a risk verdict.

use crate::config::{DashboardConfig, Metric};
use crate::error::{LoadError, Result};
use crate::extract::{Extraction, Extractor, MatchPolicy, NumericSeries};
use crate::reader::{Sheet, Workbook};
use crate::verdict::{ScoreCard, Verdict};
use log::{info, warn};
use serde::Serialize;
use std::collections::HashSet;

/// A forensic score row with its mean over present periods
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRow {
    pub series: NumericSeries,
    pub mean: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScorePanel {
    pub rows: Vec<ScoreRow>,
    pub card: ScoreCard,
    pub verdict: Option<Verdict>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyReport {
    pub company: String,
    pub accruals: Extraction,
    pub scores: ScorePanel,
    pub revenue: Extraction,
    pub profit: Extraction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub companies: Vec<CompanyReport>,
    /// Free-text analyst interpretation, carried through unchanged
    pub notes: Option<String>,
}

impl Dashboard {
    /// Build the report for the named companies, or all of them if `companies`
    /// is empty
    pub fn build(
        workbook: &Workbook,
        config: &DashboardConfig,
        companies: &[String],
    ) -> Result<Self> {
        warn_unknown_sheets(config, workbook);
        let sheets = select_sheets(workbook, companies)?;
        let mut reports = Vec::with_capacity(sheets.len());

        for sheet in sheets {
            reports.push(company_report(sheet, config)?);
        }

        info!("Built dashboard for {} company(ies)", reports.len());
        Ok(Self {
            companies: reports,
            notes: None,
        })
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Resolve company names to sheets. An empty selection means every sheet.
///
/// Repeated names resolve once, at their first position.
pub fn select_sheets<'a>(
    workbook: &'a Workbook,
    companies: &[String],
) -> Result<Vec<&'a Sheet>> {
    if companies.is_empty() {
        return Ok(workbook.sheets.iter().collect());
    }

    let mut seen = HashSet::new();
    companies
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .map(|name| {
            workbook
                .get_sheet(name)
                .ok_or_else(|| LoadError::UnknownCompany {
                    name: name.clone(),
                    available: workbook.companies().join(", "),
                })
        })
        .collect()
}

/// Warn about `[sheets]` sections that name no sheet in the workbook
pub fn warn_unknown_sheets(config: &DashboardConfig, workbook: &Workbook) {
    for name in config.unknown_sheets(workbook) {
        warn!("Config section [sheets.\"{}\"] matches no sheet in the workbook", name);
    }
}

/// Extractor configured with the sheet's period filter
pub fn extractor_for(config: &DashboardConfig, sheet: &Sheet) -> Result<Extractor> {
    let filter = config.period_filter(Some(&sheet.name))?;
    Ok(Extractor::with_period_filter(filter))
}

/// Latest M, Z and F scores found in a sheet
pub fn score_card(sheet: &Sheet, config: &DashboardConfig) -> Result<ScoreCard> {
    let extractor = extractor_for(config, sheet)?;
    let latest = |metric: Metric| {
        extractor
            .extract(
                sheet,
                config.keywords(metric, Some(&sheet.name)),
                MatchPolicy::First,
            )
            .first()
            .and_then(NumericSeries::latest)
    };

    Ok(ScoreCard {
        m_score: latest(Metric::MScore),
        z_score: latest(Metric::ZScore),
        f_score: latest(Metric::FScore),
    })
}

fn company_report(sheet: &Sheet, config: &DashboardConfig) -> Result<CompanyReport> {
    let extractor = extractor_for(config, sheet)?;
    let lookup = |metric: Metric, policy: MatchPolicy| {
        extractor.extract(sheet, config.keywords(metric, Some(&sheet.name)), policy)
    };

    let rows = lookup(Metric::Scores, MatchPolicy::All)
        .series()
        .iter()
        .map(|series| ScoreRow {
            mean: series.mean(),
            series: series.clone(),
        })
        .collect();
    let card = score_card(sheet, config)?;
    let verdict = Verdict::assess(&card);
    if verdict.is_none() {
        warn!("Sheet '{}' has no forensic scores", sheet.name);
    }

    Ok(CompanyReport {
        company: sheet.name.clone(),
        accruals: lookup(Metric::Accruals, MatchPolicy::First),
        scores: ScorePanel {
            rows,
            card,
            verdict,
        },
        revenue: lookup(Metric::Revenue, MatchPolicy::First),
        profit: lookup(Metric::Profit, MatchPolicy::First),
    })
}
