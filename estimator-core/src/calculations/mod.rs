//! Estimate calculation modules.
//!
//! This module provides the pricing logic for construction estimates,
//! organized by the rate tables, the pricing function itself and the
//! advisory heuristics layered on top of it.

pub mod assessment;
pub mod common;
pub mod pricing;
pub mod rates;
pub mod suggestions;

pub use pricing::{EstimateCalculator, EstimateError};
pub use rates::{DEFAULT_BASE_RATE, NEUTRAL_MULTIPLIER, RateTables};
pub use suggestions::{Suggestion, SuggestionField, Suggestions, suggest_defaults};
