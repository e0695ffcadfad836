//! Risk verdict from the latest forensic scores

use serde::Serialize;
use std::fmt;

/// Beneish M-Score above this suggests earnings manipulation
pub const M_SCORE_MANIPULATION_THRESHOLD: f64 = -2.22;
/// Altman Z-Score below this is the distress zone
pub const Z_SCORE_DISTRESS_THRESHOLD: f64 = 1.8;
/// Altman Z-Score above this is the safe zone
pub const Z_SCORE_SAFE_THRESHOLD: f64 = 3.0;
/// Piotroski F-Score at or above this indicates strong fundamentals
pub const F_SCORE_STRONG_THRESHOLD: f64 = 7.0;

/// Most recent value of each forensic score, if the sheet has one
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreCard {
    pub m_score: Option<f64>,
    pub z_score: Option<f64>,
    pub f_score: Option<f64>,
}

impl ScoreCard {
    pub fn is_empty(&self) -> bool {
        self.m_score.is_none() && self.z_score.is_none() && self.f_score.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Strong,
    Moderate,
    HighRisk,
}

impl Verdict {
    /// Classify a score card. Missing scores are left out of each
    /// comparison; a card with no scores at all has no verdict.
    pub fn assess(card: &ScoreCard) -> Option<Verdict> {
        if card.is_empty() {
            return None;
        }

        let manipulator = card
            .m_score
            .is_some_and(|m| m > M_SCORE_MANIPULATION_THRESHOLD);
        let distressed = card.z_score.is_some_and(|z| z < Z_SCORE_DISTRESS_THRESHOLD);
        if manipulator || distressed {
            return Some(Verdict::HighRisk);
        }

        let safe = card.z_score.is_some_and(|z| z > Z_SCORE_SAFE_THRESHOLD);
        let strong = card.f_score.is_some_and(|f| f >= F_SCORE_STRONG_THRESHOLD);
        if safe && strong {
            Some(Verdict::Strong)
        } else {
            Some(Verdict::Moderate)
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Strong => "Financially strong",
            Verdict::Moderate => "Moderate risk",
            Verdict::HighRisk => "High risk",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
