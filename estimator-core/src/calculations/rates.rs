//! Rate tables used by the pricing function.
//!
//! Every lookup falls back to a neutral value instead of failing: an unknown
//! project type is priced at [`DEFAULT_BASE_RATE`] per square foot and an
//! unknown or missing multiplier key counts as `1.0`. A plausible generic
//! number is preferred over an error for a lead-generation estimate.
//!
//! | Table | Keyed by | Range |
//! |-------|----------|-------|
//! | base rate | project type | 80-220 per sq ft |
//! | material | material grade | 0.8-1.4 |
//! | location | location | 1.0-1.2 |
//! | seasonal | [`Season`] | 0.95-1.1 |
//! | complexity | complexity | 0.9-1.6 (not priced) |

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::models::{Complexity, Location, MaterialGrade, ProjectType, Season};

/// Base cost per square foot for project types missing from the table.
pub const DEFAULT_BASE_RATE: Decimal = dec!(150);

/// Multiplier applied when a key is missing from a multiplier table.
pub const NEUTRAL_MULTIPLIER: Decimal = Decimal::ONE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTables {
    pub base_rates: HashMap<String, Decimal>,
    pub material_multipliers: HashMap<String, Decimal>,
    pub location_multipliers: HashMap<String, Decimal>,
    pub seasonal_factors: HashMap<Season, Decimal>,

    /// Kept for display and rate files; the pricing function does not use it.
    pub complexity_multipliers: HashMap<String, Decimal>,
}

impl Default for RateTables {
    fn default() -> Self {
        let base_rates = [
            (ProjectType::CustomHome, dec!(180)),
            (ProjectType::HomeAddition, dec!(160)),
            (ProjectType::KitchenRemodel, dec!(200)),
            (ProjectType::BathroomRemodel, dec!(220)),
            (ProjectType::DeckPatio, dec!(80)),
            (ProjectType::CommercialBuilding, dec!(140)),
            (ProjectType::Renovation, dec!(120)),
            (ProjectType::Other, dec!(150)),
        ]
        .into_iter()
        .map(|(t, rate)| (t.label().to_string(), rate))
        .collect();

        let material_multipliers = [
            (MaterialGrade::PremiumLuxury, dec!(1.4)),
            (MaterialGrade::HighQualityStandard, dec!(1.2)),
            (MaterialGrade::StandardGrade, dec!(1.0)),
            (MaterialGrade::BudgetFriendly, dec!(0.8)),
        ]
        .into_iter()
        .map(|(m, mult)| (m.label().to_string(), mult))
        .collect();

        let location_multipliers = [
            (Location::Pasco, dec!(1.0)),
            (Location::Kennewick, dec!(1.05)),
            (Location::Richland, dec!(1.08)),
            (Location::WallaWalla, dec!(1.03)),
            (Location::Yakima, dec!(1.02)),
            (Location::Spokane, dec!(1.15)),
            (Location::OtherWashington, dec!(1.1)),
            (Location::Other, dec!(1.2)),
        ]
        .into_iter()
        .map(|(l, mult)| (l.label().to_string(), mult))
        .collect();

        let seasonal_factors = HashMap::from([
            (Season::Winter, dec!(1.1)),
            (Season::Spring, dec!(1.0)),
            (Season::Summer, dec!(0.95)),
            (Season::Fall, dec!(1.0)),
        ]);

        let complexity_multipliers = [
            (Complexity::Simple, dec!(0.9)),
            (Complexity::Standard, dec!(1.0)),
            (Complexity::Complex, dec!(1.3)),
            (Complexity::VeryComplex, dec!(1.6)),
        ]
        .into_iter()
        .map(|(c, mult)| (c.label().to_string(), mult))
        .collect();

        Self {
            base_rates,
            material_multipliers,
            location_multipliers,
            seasonal_factors,
            complexity_multipliers,
        }
    }
}

impl RateTables {
    /// Base cost per square foot for `project_type`.
    pub fn base_rate(
        &self,
        project_type: &str,
    ) -> Decimal {
        self.base_rates.get(project_type).copied().unwrap_or_else(|| {
            debug!(project_type, "unknown project type, using default base rate");
            DEFAULT_BASE_RATE
        })
    }

    /// Multiplier for the chosen material grade; neutral when none was chosen.
    pub fn material_multiplier(
        &self,
        material: Option<&str>,
    ) -> Decimal {
        let Some(material) = material else {
            return NEUTRAL_MULTIPLIER;
        };
        self.material_multipliers.get(material).copied().unwrap_or_else(|| {
            debug!(material, "unknown material grade, using neutral multiplier");
            NEUTRAL_MULTIPLIER
        })
    }

    pub fn location_multiplier(
        &self,
        location: &str,
    ) -> Decimal {
        self.location_multipliers.get(location).copied().unwrap_or_else(|| {
            debug!(location, "unknown location, using neutral multiplier");
            NEUTRAL_MULTIPLIER
        })
    }

    pub fn seasonal_multiplier(
        &self,
        season: Season,
    ) -> Decimal {
        self.seasonal_factors
            .get(&season)
            .copied()
            .unwrap_or(NEUTRAL_MULTIPLIER)
    }

    pub fn complexity_multiplier(
        &self,
        complexity: &str,
    ) -> Decimal {
        self.complexity_multipliers
            .get(complexity)
            .copied()
            .unwrap_or(NEUTRAL_MULTIPLIER)
    }

    /// All tables as sorted `(table, key, value)` rows, for display.
    pub fn rows(&self) -> Vec<(&'static str, String, Decimal)> {
        fn sorted(
            table: &'static str,
            map: &HashMap<String, Decimal>,
        ) -> Vec<(&'static str, String, Decimal)> {
            let ordered: BTreeMap<_, _> = map.iter().collect();
            ordered
                .into_iter()
                .map(|(k, v)| (table, k.clone(), *v))
                .collect()
        }

        let mut rows = sorted("base_rate", &self.base_rates);
        rows.extend(sorted("material", &self.material_multipliers));
        rows.extend(sorted("location", &self.location_multipliers));
        rows.extend(Season::ALL.into_iter().map(|s| {
            ("season", s.label().to_string(), self.seasonal_multiplier(s))
        }));
        rows.extend(sorted("complexity", &self.complexity_multipliers));
        rows
    }
}
