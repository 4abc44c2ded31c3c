use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which flavour of the pricing function produced an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateMode {
    /// Live running estimate shown while the form is being filled in.
    Preview,
    /// Final estimate computed from the review step.
    Full,
}

/// The five cost buckets, each already rounded to a whole currency unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub materials: Decimal,
    pub labor: Decimal,
    pub permits: Decimal,
    pub overhead: Decimal,
    pub contingency: Decimal,
}

impl CostBreakdown {
    pub fn total(&self) -> Decimal {
        self.materials + self.labor + self.permits + self.overhead + self.contingency
    }

    /// Bucket labels and amounts in display order.
    pub fn entries(&self) -> [(&'static str, Decimal); 5] {
        [
            ("Materials", self.materials),
            ("Labor", self.labor),
            ("Permits", self.permits),
            ("Overhead", self.overhead),
            ("Contingency", self.contingency),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateRange {
    pub low: Decimal,
    pub expected: Decimal,
    pub high: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ConfidenceLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::VeryHigh => "very-high",
        }
    }

    /// Guidance shown next to the confidence score.
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::Low => "Consider providing more details for a more accurate estimate",
            Self::Medium => "Good foundation, additional details will improve accuracy",
            Self::High => "Well-detailed estimate with good accuracy",
            Self::VeryHigh => "Comprehensive data provided for highly accurate estimate",
        }
    }
}

/// Which optional details the visitor supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQualityFactors {
    pub has_size: bool,
    pub has_materials: bool,
    pub has_features: bool,
    pub has_complexity: bool,
    pub has_timeline: bool,
    /// Share of the factors above that are present, 0-100.
    pub completeness_percentage: u8,
}

/// Extra information attached to a [`EstimateMode::Full`] estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateAssessment {
    pub timeline: String,
    pub accuracy: u8,
    pub confidence_score: u8,
    pub confidence_level: ConfidenceLevel,
    pub data_quality: DataQualityFactors,
}

/// A computed estimate. Created once per calculation and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResult {
    pub mode: EstimateMode,
    pub breakdown: CostBreakdown,

    /// Sum of the breakdown before the veteran discount.
    pub subtotal: Decimal,
    pub veteran_discount: Decimal,

    /// `subtotal - veteran_discount`.
    pub total_cost: Decimal,
    pub cost_per_sq_ft: Decimal,
    pub estimate_range: EstimateRange,
    pub square_footage: u32,

    /// Present for full estimates only.
    pub assessment: Option<EstimateAssessment>,
}

impl EstimateResult {
    pub fn has_veteran_discount(&self) -> bool {
        self.veteran_discount > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn breakdown_total_sums_all_buckets() {
        let breakdown = CostBreakdown {
            materials: dec!(90000),
            labor: dec!(70000),
            permits: dec!(10000),
            overhead: dec!(20000),
            contingency: dec!(10000),
        };

        assert_eq!(breakdown.total(), dec!(200000));
    }

    #[test]
    fn confidence_levels_are_ordered() {
        assert!(ConfidenceLevel::Low < ConfidenceLevel::Medium);
        assert!(ConfidenceLevel::High < ConfidenceLevel::VeryHigh);
    }

    #[test]
    fn confidence_level_serializes_kebab_case() {
        let json = serde_json::to_string(&ConfidenceLevel::VeryHigh).unwrap();

        assert_eq!(json, "\"very-high\"");
    }
}
