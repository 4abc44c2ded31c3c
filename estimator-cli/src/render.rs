//! Plain-text views of estimates, suggestions and the option catalogs.

use std::fmt;

use estimator_core::calculations::common::percent_of;
use estimator_core::calculations::{RateTables, Suggestions};
use estimator_core::{
    Complexity, EstimateMode, EstimateResult, Feature, Location, MaterialGrade, ProjectInput,
    ProjectType, Season,
};

use crate::utils::{format_currency, multiplier_badge};

/// The estimate result page.
pub struct EstimateReport<'a> {
    pub estimate: &'a EstimateResult,
    pub project: &'a ProjectInput,
}

impl<'a> EstimateReport<'a> {
    pub fn new(
        estimate: &'a EstimateResult,
        project: &'a ProjectInput,
    ) -> Self {
        Self { estimate, project }
    }
}

impl fmt::Display for EstimateReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let e = self.estimate;
        let title = match e.mode {
            EstimateMode::Full => "Your Project Estimate",
            EstimateMode::Preview => "Running Estimate",
        };
        writeln!(f, "{title}")?;
        writeln!(f, "{}", "=".repeat(title.len()))?;
        writeln!(f, "Total estimated cost: {}", format_currency(e.total_cost))?;
        if e.has_veteran_discount() {
            writeln!(f, "  Subtotal:           {}", format_currency(e.subtotal))?;
            writeln!(
                f,
                "  Veteran discount:   -{} (10% off, thank you for your service)",
                format_currency(e.veteran_discount)
            )?;
        }
        writeln!(f, "Cost per sq ft:       {}", format_currency(e.cost_per_sq_ft))?;
        writeln!(
            f,
            "Estimate range:       {} - {}",
            format_currency(e.estimate_range.low),
            format_currency(e.estimate_range.high)
        )?;

        writeln!(f)?;
        writeln!(f, "Cost breakdown")?;
        for (label, amount) in e.breakdown.entries() {
            writeln!(
                f,
                "  {:<12} {:>12} {:>6}%",
                label,
                format_currency(amount),
                format!("{:.1}", percent_of(amount, e.subtotal))
            )?;
        }

        if let Some(assessment) = &e.assessment {
            writeln!(f)?;
            writeln!(f, "Project timeline:     {}", assessment.timeline)?;
            writeln!(f, "Estimate accuracy:    {}%", assessment.accuracy)?;
            writeln!(
                f,
                "Confidence:           {}% ({})",
                assessment.confidence_score,
                assessment.confidence_level.label()
            )?;
            writeln!(f, "  {}", assessment.confidence_level.guidance())?;
            writeln!(
                f,
                "Data completeness:    {}%",
                assessment.data_quality.completeness_percentage
            )?;
        }

        writeln!(f)?;
        write!(f, "{}", ProjectSummary(self.project))
    }
}

/// The review-step summary of what the visitor entered.
pub struct ProjectSummary<'a>(pub &'a ProjectInput);

impl fmt::Display for ProjectSummary<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let p = self.0;
        let or_dash = |s: &str| {
            if s.trim().is_empty() {
                "-".to_string()
            } else {
                s.to_string()
            }
        };
        let size = match p.square_footage() {
            Some(sqft) => format!("{} sq ft", format_currency(sqft.into()).trim_start_matches('$')),
            None => or_dash(&p.size),
        };
        let features = if p.features.is_empty() {
            "none".to_string()
        } else {
            p.features.join(", ")
        };

        writeln!(f, "Project summary")?;
        writeln!(f, "  Project type:  {}", or_dash(&p.project_type))?;
        writeln!(f, "  Location:      {}", or_dash(&p.location))?;
        writeln!(f, "  Size:          {size}")?;
        writeln!(f, "  Budget:        {}", or_dash(&p.budget))?;
        writeln!(f, "  Materials:     {}", or_dash(p.primary_material().unwrap_or_default()))?;
        writeln!(f, "  Complexity:    {}", or_dash(&p.complexity))?;
        writeln!(f, "  Features:      {features}")?;
        writeln!(f, "  Timeline:      {}", or_dash(&p.timeline))?;
        writeln!(f, "  Veteran:       {}", if p.is_veteran { "yes" } else { "no" })
    }
}

pub struct SuggestionsReport<'a>(pub &'a Suggestions);

impl fmt::Display for SuggestionsReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No suggestions.");
        }
        writeln!(f, "Suggestions")?;
        for (field, suggestion) in self.0 {
            writeln!(
                f,
                "  {:<10} {} ({})",
                format!("{}:", field.label()),
                suggestion.suggested,
                suggestion.reasoning
            )?;
        }
        Ok(())
    }
}

/// Every catalog with the multiplier currently in effect.
pub struct OptionsReport<'a>(pub &'a RateTables);

impl fmt::Display for OptionsReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let rates = self.0;

        writeln!(f, "Project types (cost per sq ft)")?;
        for t in ProjectType::ALL {
            writeln!(f, "  {:<22} {}", t.label(), format_currency(rates.base_rate(t.label())))?;
        }

        writeln!(f, "\nLocations")?;
        for l in Location::ALL {
            writeln!(f, "  {:<22} x{}", l.label(), rates.location_multiplier(l.label()))?;
        }

        writeln!(f, "\nMaterial grades")?;
        for m in MaterialGrade::ALL {
            let multiplier = rates.material_multiplier(Some(m.label()));
            writeln!(f, "  {:<22} {:>5}  {}", m.label(), multiplier_badge(multiplier), m.description())?;
            writeln!(f, "  {:<22}        Examples: {}", "", m.examples())?;
        }

        writeln!(f, "\nComplexity")?;
        for c in Complexity::ALL {
            writeln!(f, "  {:<22} x{}", c.label(), rates.complexity_multiplier(c.label()))?;
        }

        writeln!(f, "\nSeasons")?;
        for s in Season::ALL {
            writeln!(f, "  {:<22} x{}", s.label(), rates.seasonal_multiplier(s))?;
        }

        writeln!(f, "\nFeatures (each adds 5%)")?;
        for feature in Feature::ALL {
            writeln!(f, "  {}", feature.label())?;
        }
        Ok(())
    }
}
