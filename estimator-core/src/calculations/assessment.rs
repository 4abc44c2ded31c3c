//! Data-quality, confidence and timeline assessment for full estimates.
//!
//! None of these values affect the price. They tell the visitor how much
//! weight to put on the number and how long the project is likely to take.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::calculations::common::round_whole;
use crate::models::{
    ConfidenceLevel, DataQualityFactors, EstimateAssessment, ProjectInput, ProjectType,
};

/// Confidence score at or above which a full estimate uses the tighter range.
pub const TIGHT_RANGE_CONFIDENCE: u8 = 80;

/// Scores which of the optional details were supplied.
pub fn data_quality(input: &ProjectInput) -> DataQualityFactors {
    let has_size = input.square_footage().is_some();
    let has_materials = input.primary_material().is_some();
    let has_features = !input.features.is_empty();
    let has_complexity = !input.complexity.trim().is_empty();
    let has_timeline = !input.timeline.trim().is_empty();

    let present = [has_size, has_materials, has_features, has_complexity, has_timeline]
        .into_iter()
        .filter(|&p| p)
        .count();

    DataQualityFactors {
        has_size,
        has_materials,
        has_features,
        has_complexity,
        has_timeline,
        completeness_percentage: percentage(present, 5),
    }
}

/// `60 + completeness × 0.4`, so an empty form scores 60 and a complete one 100.
pub fn confidence_score(factors: &DataQualityFactors) -> u8 {
    let score = Decimal::from(60)
        + Decimal::from(factors.completeness_percentage) * Decimal::new(4, 1);
    to_u8(round_whole(score))
}

pub fn confidence_level(score: u8) -> ConfidenceLevel {
    match score {
        0..70 => ConfidenceLevel::Low,
        70..80 => ConfidenceLevel::Medium,
        80..90 => ConfidenceLevel::High,
        _ => ConfidenceLevel::VeryHigh,
    }
}

/// Stated accuracy, 85-95 %, driven by the fields the price depends on.
pub fn accuracy(input: &ProjectInput) -> u8 {
    let core = [
        !input.project_type.trim().is_empty(),
        !input.location.trim().is_empty(),
        !input.size.trim().is_empty(),
        !input.complexity.trim().is_empty(),
        input.primary_material().is_some(),
    ];
    let present = core.into_iter().filter(|&p| p).count();

    let completeness = Decimal::from(present as u32) / Decimal::from(5);
    to_u8(round_whole(Decimal::from(85) + completeness * Decimal::TEN))
}

/// Rough construction timeline for a project type and size.
pub fn project_timeline(
    project_type: &str,
    square_footage: u32,
) -> String {
    let months = |per: u32, low: u32, high: u32| {
        format!(
            "{}-{} months",
            scaled_ceil(square_footage, low, per),
            scaled_ceil(square_footage, high, per)
        )
    };

    match ProjectType::parse(project_type) {
        Some(ProjectType::CustomHome) => months(2000, 8, 12),
        Some(ProjectType::HomeAddition) => months(1000, 2, 4),
        Some(ProjectType::KitchenRemodel) => "4-8 weeks".to_string(),
        Some(ProjectType::BathroomRemodel) => "2-4 weeks".to_string(),
        Some(ProjectType::DeckPatio) => "1-3 weeks".to_string(),
        Some(ProjectType::CommercialBuilding) => months(5000, 6, 18),
        Some(ProjectType::Renovation) => months(1500, 2, 6),
        Some(ProjectType::Other) | None => "2-6 months".to_string(),
    }
}

/// Builds the full assessment attached to a full estimate.
pub fn assess(
    input: &ProjectInput,
    square_footage: u32,
) -> EstimateAssessment {
    let data_quality = data_quality(input);
    let confidence_score = confidence_score(&data_quality);

    EstimateAssessment {
        timeline: project_timeline(&input.project_type, square_footage),
        accuracy: accuracy(input),
        confidence_score,
        confidence_level: confidence_level(confidence_score),
        data_quality,
    }
}

/// ⌈size / per × factor⌉ in integer arithmetic.
fn scaled_ceil(
    size: u32,
    factor: u32,
    per: u32,
) -> u64 {
    (u64::from(size) * u64::from(factor)).div_ceil(u64::from(per))
}

fn percentage(
    present: usize,
    of: usize,
) -> u8 {
    let pct = Decimal::from(present as u32) * Decimal::ONE_HUNDRED / Decimal::from(of as u32);
    to_u8(round_whole(pct))
}

fn to_u8(value: Decimal) -> u8 {
    value.to_u8().unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn complete_input() -> ProjectInput {
        ProjectInput {
            project_type: "Custom Home".to_string(),
            location: "Richland, WA".to_string(),
            size: "2500".to_string(),
            timeline: "6-12-months".to_string(),
            budget: "$500k+".to_string(),
            complexity: "Complex".to_string(),
            materials: vec!["Premium/Luxury".to_string()],
            features: vec!["Pool/Spa".to_string()],
            is_veteran: false,
        }
    }

    // =========================================================================
    // data_quality tests
    // =========================================================================

    #[test]
    fn data_quality_complete_input_is_100_percent() {
        let factors = data_quality(&complete_input());

        assert!(factors.has_size && factors.has_materials && factors.has_features);
        assert!(factors.has_complexity && factors.has_timeline);
        assert_eq!(factors.completeness_percentage, 100);
    }

    #[test]
    fn data_quality_empty_input_is_zero_percent() {
        let factors = data_quality(&ProjectInput::default());

        assert_eq!(factors.completeness_percentage, 0);
    }

    #[test]
    fn data_quality_counts_each_factor_as_twenty_percent() {
        let input = ProjectInput {
            size: "1000".to_string(),
            materials: vec!["Standard Grade".to_string()],
            ..Default::default()
        };

        assert_eq!(data_quality(&input).completeness_percentage, 40);
    }

    #[test]
    fn data_quality_unparseable_size_is_missing() {
        let input = ProjectInput {
            size: "lots".to_string(),
            ..Default::default()
        };

        assert!(!data_quality(&input).has_size);
    }

    // =========================================================================
    // confidence tests
    // =========================================================================

    #[test]
    fn confidence_score_scales_with_completeness() {
        let mut factors = data_quality(&ProjectInput::default());
        assert_eq!(confidence_score(&factors), 60);

        factors.completeness_percentage = 60;
        assert_eq!(confidence_score(&factors), 84);

        factors.completeness_percentage = 100;
        assert_eq!(confidence_score(&factors), 100);
    }

    #[test]
    fn confidence_level_thresholds() {
        assert_eq!(confidence_level(60), ConfidenceLevel::Low);
        assert_eq!(confidence_level(69), ConfidenceLevel::Low);
        assert_eq!(confidence_level(70), ConfidenceLevel::Medium);
        assert_eq!(confidence_level(80), ConfidenceLevel::High);
        assert_eq!(confidence_level(90), ConfidenceLevel::VeryHigh);
        assert_eq!(confidence_level(100), ConfidenceLevel::VeryHigh);
    }

    // =========================================================================
    // accuracy tests
    // =========================================================================

    #[test]
    fn accuracy_ranges_from_85_to_95() {
        assert_eq!(accuracy(&ProjectInput::default()), 85);
        assert_eq!(accuracy(&complete_input()), 95);
    }

    #[test]
    fn accuracy_partial_core_fields() {
        let input = ProjectInput {
            project_type: "Renovation".to_string(),
            location: "Pasco, WA".to_string(),
            size: "800".to_string(),
            ..Default::default()
        };

        // 85 + 3/5 * 10 = 91
        assert_eq!(accuracy(&input), 91);
    }

    // =========================================================================
    // project_timeline tests
    // =========================================================================

    #[test]
    fn timeline_custom_home_scales_with_size() {
        // 2500 / 2000 * 8 = 10, 2500 / 2000 * 12 = 15
        assert_eq!(project_timeline("Custom Home", 2500), "10-15 months");
    }

    #[test]
    fn timeline_rounds_up_partial_months() {
        // 1200 / 1000 * 2 = 2.4 -> 3, 1200 / 1000 * 4 = 4.8 -> 5
        assert_eq!(project_timeline("Home Addition", 1200), "3-5 months");
    }

    #[test]
    fn timeline_fixed_ranges() {
        assert_eq!(project_timeline("Kitchen Remodel", 300), "4-8 weeks");
        assert_eq!(project_timeline("Bathroom Remodel", 120), "2-4 weeks");
        assert_eq!(project_timeline("Deck/Patio", 400), "1-3 weeks");
    }

    #[test]
    fn timeline_commercial_and_renovation() {
        assert_eq!(project_timeline("Commercial Building", 10000), "12-36 months");
        assert_eq!(project_timeline("Renovation", 1500), "2-6 months");
    }

    #[test]
    fn timeline_unknown_type_uses_generic_range() {
        assert_eq!(project_timeline("Other", 1000), "2-6 months");
        assert_eq!(project_timeline("Treehouse", 1000), "2-6 months");
    }

    #[test]
    fn assess_complete_input_is_very_high_confidence() {
        let assessment = assess(&complete_input(), 2500);

        assert_eq!(assessment.confidence_score, 100);
        assert_eq!(assessment.confidence_level, ConfidenceLevel::VeryHigh);
        assert_eq!(assessment.accuracy, 95);
        assert_eq!(assessment.timeline, "10-15 months");
    }
}
