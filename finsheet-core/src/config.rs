//! Configuration for metric keywords and period selection

use crate::error::{LoadError, Result};
use crate::reader::Workbook;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Named metrics the dashboard looks up in every sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Accruals,
    Revenue,
    Profit,
    Scores,
    MScore,
    ZScore,
    FScore,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::Accruals,
        Metric::Revenue,
        Metric::Profit,
        Metric::Scores,
        Metric::MScore,
        Metric::ZScore,
        Metric::FScore,
    ];

    /// Configuration key for this metric
    pub fn key(&self) -> &'static str {
        match self {
            Metric::Accruals => "accruals",
            Metric::Revenue => "revenue",
            Metric::Profit => "profit",
            Metric::Scores => "scores",
            Metric::MScore => "m_score",
            Metric::ZScore => "z_score",
            Metric::FScore => "f_score",
        }
    }

    /// Keywords used when nothing is configured
    pub fn default_keywords(&self) -> &'static [&'static str] {
        match self {
            Metric::Accruals => &["Accrual"],
            Metric::Revenue => &["Sales", "Revenue"],
            Metric::Profit => &["Profit"],
            Metric::Scores => &["M Score", "Z Score", "F Score"],
            Metric::MScore => &["M Score", "M-Score"],
            Metric::ZScore => &["Z Score", "Z-Score"],
            Metric::FScore => &["F Score", "F-Score"],
        }
    }
}

/// Main dashboard configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub global: GlobalConfig,
    /// Per-company overrides, keyed by sheet name
    #[serde(default)]
    pub sheets: HashMap<String, SheetConfig>,
}

impl DashboardConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: DashboardConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Keywords for a metric with fallback chain: sheet -> global -> default
    pub fn keywords(&self, metric: Metric, sheet_name: Option<&str>) -> Vec<String> {
        // Try sheet-specific first
        if let Some(sheet) = sheet_name.and_then(|name| self.sheets.get(name)) {
            if let Some(keywords) = sheet.keywords.get(metric.key()) {
                return keywords.clone();
            }
        }

        // Try global
        if let Some(keywords) = self.global.keywords.get(metric.key()) {
            return keywords.clone();
        }

        metric
            .default_keywords()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Period header filter with fallback chain: sheet -> global
    pub fn period_filter(&self, sheet_name: Option<&str>) -> Result<Option<Regex>> {
        let pattern = sheet_name
            .and_then(|name| self.sheets.get(name))
            .and_then(|sheet| sheet.period_filter.as_deref())
            .or(self.global.period_filter.as_deref());

        pattern
            .map(|p| {
                Regex::new(p).map_err(|e| {
                    LoadError::Config(format!("invalid period_filter '{}': {}", p, e))
                })
            })
            .transpose()
    }

    /// `[sheets]` keys with no matching sheet in `workbook`, sorted
    pub fn unknown_sheets(&self, workbook: &Workbook) -> Vec<&str> {
        let mut unknown: Vec<&str> = self
            .sheets
            .keys()
            .map(String::as_str)
            .filter(|name| workbook.get_sheet(name).is_none())
            .collect();
        unknown.sort_unstable();
        unknown
    }

    /// Validate keyword tables and period filters
    pub fn validate(&self) -> Result<()> {
        self.period_filter(None)?;
        validate_keywords("global", &self.global.keywords)?;

        for (sheet_name, sheet_config) in &self.sheets {
            self.period_filter(Some(sheet_name))?;
            validate_keywords(&format!("sheet '{}'", sheet_name), &sheet_config.keywords)?;
        }

        Ok(())
    }
}

fn validate_keywords(section: &str, keywords: &HashMap<String, Vec<String>>) -> Result<()> {
    for (key, list) in keywords {
        if !Metric::ALL.iter().any(|m| m.key() == key.as_str()) {
            return Err(LoadError::Config(format!(
                "Unknown metric '{}' in {}",
                key, section
            )));
        }
        if list.iter().all(|k| k.trim().is_empty()) {
            return Err(LoadError::Config(format!(
                "Metric '{}' in {} has no keywords",
                key, section
            )));
        }
    }
    Ok(())
}

/// Global configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Regex that period column headers must match
    #[serde(default)]
    pub period_filter: Option<String>,
    /// Keyword lists keyed by metric name
    #[serde(flatten)]
    pub keywords: HashMap<String, Vec<String>>,
}

/// Sheet-specific configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetConfig {
    #[serde(default)]
    pub period_filter: Option<String>,
    #[serde(flatten)]
    pub keywords: HashMap<String, Vec<String>>,
}
