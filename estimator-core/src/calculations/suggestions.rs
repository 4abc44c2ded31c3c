//! Advisory suggestions for fields the visitor has not settled yet.
//!
//! Suggestions never change the price; they are hints shown next to the
//! form. The only input besides the form itself is today's date.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Complexity, MaterialGrade, ProjectInput, ProjectType, Season};

/// More selected features than this suggests a complex project.
const COMPLEX_FEATURE_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SuggestionField {
    Materials,
    Timeline,
    Complexity,
}

impl SuggestionField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Materials => "materials",
            Self::Timeline => "timeline",
            Self::Complexity => "complexity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub suggested: String,
    pub reasoning: String,
}

impl Suggestion {
    fn new(
        suggested: &str,
        reasoning: &str,
    ) -> Self {
        Self {
            suggested: suggested.to_string(),
            reasoning: reasoning.to_string(),
        }
    }
}

pub type Suggestions = BTreeMap<SuggestionField, Suggestion>;

/// Suggests values for materials, timeline and complexity.
///
/// Rules, in order:
/// 1. Kitchen remodels with a budget mentioning "50" get a quality material suggestion.
/// 2. In winter, suggest a later start.
/// 3. More than five features suggests a complex project.
/// 4. With no material chosen, suggest the standard grade unless rule 1 already fired.
pub fn suggest_defaults(
    input: &ProjectInput,
    today: NaiveDate,
) -> Suggestions {
    let mut suggestions = Suggestions::new();

    if input.project_type == ProjectType::KitchenRemodel.label() && input.budget.contains("50") {
        suggestions.insert(
            SuggestionField::Materials,
            Suggestion::new(
                MaterialGrade::HighQualityStandard.label(),
                "Most popular for kitchens in this budget range",
            ),
        );
    }

    if Season::from_month(today.month()) == Season::Winter {
        suggestions.insert(
            SuggestionField::Timeline,
            Suggestion::new(
                "3-6-months",
                "Starting in spring provides better weather and material availability",
            ),
        );
    }

    if input.features.len() > COMPLEX_FEATURE_COUNT {
        suggestions.insert(
            SuggestionField::Complexity,
            Suggestion::new(
                Complexity::Complex.label(),
                "Multiple custom features indicate higher coordination needs",
            ),
        );
    }

    if input.primary_material().is_none() {
        suggestions.entry(SuggestionField::Materials).or_insert_with(|| {
            Suggestion::new(
                MaterialGrade::StandardGrade.label(),
                "Good balance of cost and quality for most projects",
            )
        });
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn spring() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
    }

    fn december() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 5).unwrap()
    }

    #[test]
    fn empty_input_in_spring_suggests_standard_materials_only() {
        let suggestions = suggest_defaults(&ProjectInput::default(), spring());

        assert_eq!(suggestions.len(), 1);
        assert_eq!(
            suggestions[&SuggestionField::Materials].suggested,
            "Standard Grade"
        );
    }

    #[test]
    fn kitchen_with_fifty_budget_suggests_quality_materials() {
        let input = ProjectInput {
            project_type: "Kitchen Remodel".to_string(),
            budget: "$50k-$100k".to_string(),
            ..Default::default()
        };

        let suggestions = suggest_defaults(&input, spring());

        assert_eq!(
            suggestions[&SuggestionField::Materials],
            Suggestion::new(
                "High-Quality Standard",
                "Most popular for kitchens in this budget range"
            )
        );
    }

    #[test]
    fn kitchen_budget_rule_ignores_other_project_types() {
        let input = ProjectInput {
            project_type: "Bathroom Remodel".to_string(),
            budget: "$50k-$100k".to_string(),
            materials: vec!["Budget-Friendly".to_string()],
            ..Default::default()
        };

        assert!(suggest_defaults(&input, spring()).is_empty());
    }

    #[test]
    fn winter_suggests_later_timeline() {
        let input = ProjectInput {
            materials: vec!["Standard Grade".to_string()],
            ..Default::default()
        };

        let suggestions = suggest_defaults(&input, december());

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[&SuggestionField::Timeline].suggested, "3-6-months");
    }

    #[test]
    fn many_features_suggest_complex() {
        let input = ProjectInput {
            materials: vec!["Standard Grade".to_string()],
            features: (0..6).map(|i| format!("feature {i}")).collect(),
            ..Default::default()
        };

        let suggestions = suggest_defaults(&input, spring());

        assert_eq!(suggestions[&SuggestionField::Complexity].suggested, "Complex");
    }

    #[test]
    fn five_features_do_not_suggest_complex() {
        let input = ProjectInput {
            materials: vec!["Standard Grade".to_string()],
            features: (0..5).map(|i| format!("feature {i}")).collect(),
            ..Default::default()
        };

        assert!(!suggest_defaults(&input, spring()).contains_key(&SuggestionField::Complexity));
    }

    #[test]
    fn suggestions_do_not_depend_on_veteran_flag() {
        let mut input = ProjectInput::default();
        let before = suggest_defaults(&input, december());
        input.is_veteran = true;

        assert_eq!(suggest_defaults(&input, december()), before);
    }
}
