//! Construction cost pricing.
//!
//! A single pricing function serves both the live preview shown while the
//! form is being filled in and the full estimate computed from the review
//! step. The two modes price identically; the full mode additionally
//! attaches an assessment and may use a tighter estimate range.
//!
//! # Calculation
//!
//! | Step | Value |
//! |------|-------|
//! | 1 | Base cost = base rate × size × material × location × season × (1 + 0.05 × features) |
//! | 2 | Buckets: materials 45 %, labor 35 %, permits 5 %, overhead 10 %, contingency 5 % of base cost, each rounded |
//! | 3 | Subtotal = sum of the rounded buckets |
//! | 4 | Veteran discount = 10 % of subtotal (rounded), veterans only |
//! | 5 | Total = subtotal - veteran discount |
//! | 6 | Cost per sq ft = total / size (rounded) |
//! | 7 | Range = total ± 15 %, or ± 12 % for confident full estimates |
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use estimator_core::calculations::{EstimateCalculator, RateTables};
//! use estimator_core::{EstimateMode, ProjectInput};
//!
//! let input = ProjectInput {
//!     project_type: "Kitchen Remodel".to_string(),
//!     location: "Pasco, WA".to_string(),
//!     size: "1000".to_string(),
//!     materials: vec!["Standard Grade".to_string()],
//!     ..Default::default()
//! };
//! let spring = NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();
//!
//! let calculator = EstimateCalculator::new(RateTables::default());
//! let result = calculator.calculate(&input, EstimateMode::Full, spring).unwrap();
//!
//! assert_eq!(result.breakdown.materials, dec!(90000));
//! assert_eq!(result.total_cost, dec!(200000));
//! assert_eq!(result.cost_per_sq_ft, dec!(200));
//! ```

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;
use tracing::{debug, info};

use crate::calculations::assessment::{TIGHT_RANGE_CONFIDENCE, assess};
use crate::calculations::common::round_whole;
use crate::calculations::rates::RateTables;
use crate::models::{CostBreakdown, EstimateMode, EstimateRange, EstimateResult, ProjectInput, Season};

const MATERIALS_SHARE: Decimal = dec!(0.45);
const LABOR_SHARE: Decimal = dec!(0.35);
const PERMITS_SHARE: Decimal = dec!(0.05);
const OVERHEAD_SHARE: Decimal = dec!(0.10);
const CONTINGENCY_SHARE: Decimal = dec!(0.05);

/// Price increase per selected feature.
const FEATURE_STEP: Decimal = dec!(0.05);

const VETERAN_DISCOUNT_RATE: Decimal = dec!(0.10);

const STANDARD_RANGE_BAND: Decimal = dec!(0.15);
const CONFIDENT_RANGE_BAND: Decimal = dec!(0.12);

/// Errors that can occur while pricing a project.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EstimateError {
    /// The size is missing, not a whole number, or zero.
    #[error("project size '{0}' is not a positive whole number of square feet")]
    InvalidSize(String),
}

/// Pricing calculator bound to a set of rate tables.
#[derive(Debug, Clone, Default)]
pub struct EstimateCalculator {
    rates: RateTables,
}

impl EstimateCalculator {
    pub fn new(rates: RateTables) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &RateTables {
        &self.rates
    }

    /// Prices `input` as of `today` (the date selects the seasonal factor).
    ///
    /// Unknown project types, locations and materials never fail; they are
    /// priced with the default base rate or a neutral multiplier.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::InvalidSize`] if the size cannot be parsed
    /// to a positive number of square feet.
    pub fn calculate(
        &self,
        input: &ProjectInput,
        mode: EstimateMode,
        today: NaiveDate,
    ) -> Result<EstimateResult, EstimateError> {
        let square_footage = input
            .square_footage()
            .ok_or_else(|| EstimateError::InvalidSize(input.size.clone()))?;

        let season = Season::from_month(today.month());
        let base_cost = self.base_cost(input, square_footage, season);
        let breakdown = self.breakdown(base_cost);
        let subtotal = breakdown.total();
        let veteran_discount = self.veteran_discount(subtotal, input.is_veteran);
        let total_cost = subtotal - veteran_discount;
        let cost_per_sq_ft = self.cost_per_sq_ft(total_cost, square_footage);

        let assessment = match mode {
            EstimateMode::Preview => None,
            EstimateMode::Full => Some(assess(input, square_footage)),
        };
        let band = match &assessment {
            Some(a) if a.confidence_score >= TIGHT_RANGE_CONFIDENCE => CONFIDENT_RANGE_BAND,
            _ => STANDARD_RANGE_BAND,
        };
        let estimate_range = self.estimate_range(total_cost, band);

        match mode {
            EstimateMode::Full => info!(
                project_type = %input.project_type,
                square_footage,
                season = season.label(),
                %total_cost,
                "calculated full estimate"
            ),
            EstimateMode::Preview => debug!(%total_cost, "calculated preview estimate"),
        }

        Ok(EstimateResult {
            mode,
            breakdown,
            subtotal,
            veteran_discount,
            total_cost,
            cost_per_sq_ft,
            estimate_range,
            square_footage,
            assessment,
        })
    }

    /// Lightweight running estimate, `None` while the size cannot be priced.
    pub fn preview(
        &self,
        input: &ProjectInput,
        today: NaiveDate,
    ) -> Option<EstimateResult> {
        self.calculate(input, EstimateMode::Preview, today).ok()
    }

    /// Unrounded cost before the breakdown split.
    fn base_cost(
        &self,
        input: &ProjectInput,
        square_footage: u32,
        season: Season,
    ) -> Decimal {
        let feature_multiplier =
            Decimal::ONE + FEATURE_STEP * Decimal::from(input.feature_count() as u64);

        self.rates.base_rate(&input.project_type)
            * Decimal::from(square_footage)
            * self.rates.material_multiplier(input.primary_material())
            * self.rates.location_multiplier(&input.location)
            * self.rates.seasonal_multiplier(season)
            * feature_multiplier
    }

    /// Splits the base cost into buckets, rounding each one independently.
    fn breakdown(
        &self,
        base_cost: Decimal,
    ) -> CostBreakdown {
        CostBreakdown {
            materials: round_whole(base_cost * MATERIALS_SHARE),
            labor: round_whole(base_cost * LABOR_SHARE),
            permits: round_whole(base_cost * PERMITS_SHARE),
            overhead: round_whole(base_cost * OVERHEAD_SHARE),
            contingency: round_whole(base_cost * CONTINGENCY_SHARE),
        }
    }

    fn veteran_discount(
        &self,
        subtotal: Decimal,
        is_veteran: bool,
    ) -> Decimal {
        if is_veteran {
            round_whole(subtotal * VETERAN_DISCOUNT_RATE)
        } else {
            Decimal::ZERO
        }
    }

    fn cost_per_sq_ft(
        &self,
        total_cost: Decimal,
        square_footage: u32,
    ) -> Decimal {
        round_whole(total_cost / Decimal::from(square_footage))
    }

    fn estimate_range(
        &self,
        total_cost: Decimal,
        band: Decimal,
    ) -> EstimateRange {
        EstimateRange {
            low: round_whole(total_cost * (Decimal::ONE - band)),
            expected: total_cost,
            high: round_whole(total_cost * (Decimal::ONE + band)),
        }
    }
}
