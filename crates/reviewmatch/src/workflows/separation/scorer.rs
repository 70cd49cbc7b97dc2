use serde::Serialize;

use super::comparator::{compare, ConnectionFactor};
use super::domain::{AffiliationBundle, ComparisonFactor};

/// Denominator of the separation score. Every pair is scored against the full factor set
/// so sparse profiles are not pushed toward either end of the scale.
pub const MAX_POSSIBLE_CONFLICTS: u8 = ComparisonFactor::ALL.len() as u8;

/// Qualitative band for a separation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeparationLabel {
    #[serde(rename = "Excellent Separation")]
    Excellent,
    #[serde(rename = "Good Separation")]
    Good,
    #[serde(rename = "Moderate Separation")]
    Moderate,
    #[serde(rename = "Low Separation")]
    Low,
}

impl SeparationLabel {
    pub const fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => Self::Excellent,
            60..=79 => Self::Good,
            40..=59 => Self::Moderate,
            _ => Self::Low,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent Separation",
            Self::Good => "Good Separation",
            Self::Moderate => "Moderate Separation",
            Self::Low => "Low Separation",
        }
    }
}

/// Scored comparison of one author/reviewer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeparationSummary {
    pub degrees_of_separation: u8,
    pub max_possible_conflicts: u8,
    pub separation_score: u8,
    pub label: SeparationLabel,
    pub factors: Vec<ConnectionFactor>,
}

impl SeparationSummary {
    pub fn conflicting(&self) -> impl Iterator<Item = &ConnectionFactor> {
        self.factors.iter().filter(|factor| factor.is_conflict)
    }
}

/// Stateless scorer applying every comparison factor to a pair of bundles.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeparationScorer;

impl SeparationScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, author: &AffiliationBundle, reviewer: &AffiliationBundle) -> SeparationSummary {
        let factors: Vec<ConnectionFactor> = ComparisonFactor::ALL
            .into_iter()
            .map(|factor| compare(factor, author, reviewer))
            .collect();

        let degrees_of_separation = factors.iter().filter(|factor| factor.is_conflict).count() as u8;
        let separation_score = separation_score(degrees_of_separation, MAX_POSSIBLE_CONFLICTS);

        SeparationSummary {
            degrees_of_separation,
            max_possible_conflicts: MAX_POSSIBLE_CONFLICTS,
            separation_score,
            label: SeparationLabel::from_score(separation_score),
            factors,
        }
    }
}

/// `round(100 * (1 - conflicts / max))` with halves rounded up, clamped to `0..=100`.
pub fn separation_score(conflicts: u8, max_possible_conflicts: u8) -> u8 {
    if max_possible_conflicts == 0 {
        return 100;
    }

    let max = u32::from(max_possible_conflicts);
    let clear = max.saturating_sub(u32::from(conflicts));
    let rounded = (200 * clear + max) / (2 * max);
    rounded.min(100) as u8
}
