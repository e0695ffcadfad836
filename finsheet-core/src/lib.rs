//! finsheet-core: metric extraction for per-company financial workbooks
//!
//! A workbook holds one sheet per company. Each sheet has a label column
//! followed by period columns; this library finds metric rows by keyword and
//! turns them into numeric series, and derives forensic risk verdicts and a
//! dashboard report from them.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod extract;
pub mod reader;
pub mod verdict;

pub use config::{DashboardConfig, Metric};
pub use dashboard::{CompanyReport, Dashboard};
pub use error::{LoadError, Result};
pub use extract::{Extraction, Extractor, Keywords, MatchPolicy, NumericSeries, Point, extract};
pub use reader::{CellValue, Sheet, Workbook};
pub use verdict::{ScoreCard, Verdict};
