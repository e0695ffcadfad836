//! Metric row lookup and numeric coercion
//!
//! A metric is found by scanning the label column (column 0) top-to-bottom
//! for labels that contain any of the query keywords, ignoring case. The
//! period cells of each matched row are coerced into a [`NumericSeries`];
//! cells that are not numbers become absent points instead of errors.

use crate::reader::{CellValue, Sheet};
use log::debug;
use regex::Regex;
use serde::Serialize;

/// What to return when several rows match the same query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Only the first matching row, top-to-bottom
    #[default]
    First,
    /// Every matching row, in sheet order
    All,
}

/// Alternative keywords, any of which may match a label.
///
/// Keywords are stored lowercased with their surrounding whitespace kept;
/// blank keywords are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Keywords(Vec<String>);

impl Keywords {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.trim().is_empty())
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Case-insensitive substring test against a label
    pub fn matches(&self, label: &str) -> bool {
        let label = label.to_lowercase();
        self.0.iter().any(|k| label.contains(k.as_str()))
    }
}

impl From<&str> for Keywords {
    fn from(keyword: &str) -> Self {
        Self::new([keyword])
    }
}

impl From<&[&str]> for Keywords {
    fn from(keywords: &[&str]) -> Self {
        Self::new(keywords)
    }
}

impl From<Vec<String>> for Keywords {
    fn from(keywords: Vec<String>) -> Self {
        Self::new(keywords)
    }
}

/// One period of a series. `value` is `None` when the cell was not numeric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub period: String,
    pub value: Option<f64>,
}

/// A matched metric row coerced to numbers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSeries {
    /// Label text of the matched row
    pub label: String,
    /// Index of the row within the sheet's data rows
    pub row: usize,
    pub points: Vec<Point>,
}

impl NumericSeries {
    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Most recent present value
    pub fn latest(&self) -> Option<f64> {
        self.points.iter().rev().find_map(|p| p.value)
    }

    /// Mean over present values
    pub fn mean(&self) -> Option<f64> {
        let present: Vec<f64> = self.points.iter().filter_map(|p| p.value).collect();
        if present.is_empty() {
            None
        } else {
            Some(present.iter().sum::<f64>() / present.len() as f64)
        }
    }

    pub fn is_all_absent(&self) -> bool {
        self.points.iter().all(|p| p.value.is_none())
    }
}

/// Result of a metric query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "series", rename_all = "snake_case")]
pub enum Extraction {
    /// No label matched; callers show "no data" and move on
    NoMatch,
    Matched(Vec<NumericSeries>),
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        matches!(self, Extraction::NoMatch)
    }

    pub fn series(&self) -> &[NumericSeries] {
        match self {
            Extraction::NoMatch => &[],
            Extraction::Matched(series) => series,
        }
    }

    pub fn first(&self) -> Option<&NumericSeries> {
        self.series().first()
    }
}

/// Metric extractor with an optional period header filter
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    period_filter: Option<Regex>,
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only period columns whose header matches `filter`
    pub fn with_period_filter(filter: Option<Regex>) -> Self {
        Self {
            period_filter: filter,
        }
    }

    /// Indices of the period columns that feed a series
    pub fn period_columns(&self, sheet: &Sheet) -> Vec<usize> {
        (1..sheet.width())
            .filter(|&col| {
                let header = &sheet.headers[col];
                if is_placeholder_header(header) {
                    return false;
                }
                match &self.period_filter {
                    Some(filter) => filter.is_match(&sheet.header_text(col)),
                    None => true,
                }
            })
            .collect()
    }

    /// Find rows whose label contains any keyword and coerce them
    pub fn extract(
        &self,
        sheet: &Sheet,
        keywords: impl Into<Keywords>,
        policy: MatchPolicy,
    ) -> Extraction {
        let keywords = keywords.into();
        if keywords.is_empty() || sheet.width() < 2 || sheet.rows.is_empty() {
            return Extraction::NoMatch;
        }

        let columns = self.period_columns(sheet);
        let mut matched = Vec::new();

        for (row, label) in sheet.labels().enumerate() {
            let Some(text) = label.as_text() else {
                continue;
            };
            if !keywords.matches(&text) {
                continue;
            }

            matched.push(coerce_row(sheet, row, text, &columns));
            if policy == MatchPolicy::First {
                break;
            }
        }

        debug!(
            "Sheet '{}': {} row(s) matched {:?}",
            sheet.name,
            matched.len(),
            keywords.0
        );

        if matched.is_empty() {
            Extraction::NoMatch
        } else {
            Extraction::Matched(matched)
        }
    }
}

/// Extract with no period filter
pub fn extract(sheet: &Sheet, keywords: impl Into<Keywords>, policy: MatchPolicy) -> Extraction {
    Extractor::new().extract(sheet, keywords, policy)
}

fn coerce_row(sheet: &Sheet, row: usize, label: String, columns: &[usize]) -> NumericSeries {
    let points = columns
        .iter()
        .map(|&col| Point {
            period: sheet.header_text(col),
            value: sheet.get_cell(row, col).and_then(CellValue::as_number),
        })
        .collect();

    NumericSeries { label, row, points }
}

/// Blank headers and auto-generated `Unnamed: N` headers mark structurally
/// empty columns.
fn is_placeholder_header(header: &CellValue) -> bool {
    match header.as_text() {
        None => true,
        Some(text) => {
            let text = text.trim().to_lowercase();
            text.is_empty() || text == "unnamed" || text.starts_with("unnamed:")
        }
    }
}
