use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectType {
    CustomHome,
    HomeAddition,
    KitchenRemodel,
    BathroomRemodel,
    DeckPatio,
    CommercialBuilding,
    Renovation,
    Other,
}

impl ProjectType {
    pub const ALL: [ProjectType; 8] = [
        Self::CustomHome,
        Self::HomeAddition,
        Self::KitchenRemodel,
        Self::BathroomRemodel,
        Self::DeckPatio,
        Self::CommercialBuilding,
        Self::Renovation,
        Self::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::CustomHome => "Custom Home",
            Self::HomeAddition => "Home Addition",
            Self::KitchenRemodel => "Kitchen Remodel",
            Self::BathroomRemodel => "Bathroom Remodel",
            Self::DeckPatio => "Deck/Patio",
            Self::CommercialBuilding => "Commercial Building",
            Self::Renovation => "Renovation",
            Self::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    Pasco,
    Kennewick,
    Richland,
    WallaWalla,
    Yakima,
    Spokane,
    OtherWashington,
    Other,
}

impl Location {
    pub const ALL: [Location; 8] = [
        Self::Pasco,
        Self::Kennewick,
        Self::Richland,
        Self::WallaWalla,
        Self::Yakima,
        Self::Spokane,
        Self::OtherWashington,
        Self::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pasco => "Pasco, WA",
            Self::Kennewick => "Kennewick, WA",
            Self::Richland => "Richland, WA",
            Self::WallaWalla => "Walla Walla, WA",
            Self::Yakima => "Yakima, WA",
            Self::Spokane => "Spokane, WA",
            Self::OtherWashington => "Other Washington",
            Self::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.label() == s)
    }
}

/// Material quality tiers offered on the details step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialGrade {
    PremiumLuxury,
    HighQualityStandard,
    StandardGrade,
    BudgetFriendly,
}

impl MaterialGrade {
    pub const ALL: [MaterialGrade; 4] = [
        Self::PremiumLuxury,
        Self::HighQualityStandard,
        Self::StandardGrade,
        Self::BudgetFriendly,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::PremiumLuxury => "Premium/Luxury",
            Self::HighQualityStandard => "High-Quality Standard",
            Self::StandardGrade => "Standard Grade",
            Self::BudgetFriendly => "Budget-Friendly",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::PremiumLuxury => "High-end finishes, custom materials, luxury fixtures",
            Self::HighQualityStandard => "Quality materials, good finishes, standard upgrades",
            Self::StandardGrade => "Standard construction materials, basic finishes",
            Self::BudgetFriendly => "Cost-effective options, basic materials",
        }
    }

    pub fn examples(&self) -> &'static str {
        match self {
            Self::PremiumLuxury => "Hardwood, natural stone, custom cabinetry",
            Self::HighQualityStandard => "Engineered wood, quality tile, standard appliances",
            Self::StandardGrade => "Vinyl, standard tile, basic fixtures",
            Self::BudgetFriendly => "Laminate, basic tile, economy fixtures",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.label() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Complexity {
    Simple,
    Standard,
    Complex,
    VeryComplex,
}

impl Complexity {
    pub const ALL: [Complexity; 4] = [
        Self::Simple,
        Self::Standard,
        Self::Complex,
        Self::VeryComplex,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Simple => "Simple",
            Self::Standard => "Standard",
            Self::Complex => "Complex",
            Self::VeryComplex => "Very Complex",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == s)
    }
}

/// Optional add-ons. Only the number selected affects the price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    SmartHome,
    EnergyEfficient,
    CustomCabinetry,
    HighEndAppliances,
    HardwoodFlooring,
    StoneTile,
    CustomLighting,
    Landscaping,
    PoolSpa,
    SecuritySystem,
}

impl Feature {
    pub const ALL: [Feature; 10] = [
        Self::SmartHome,
        Self::EnergyEfficient,
        Self::CustomCabinetry,
        Self::HighEndAppliances,
        Self::HardwoodFlooring,
        Self::StoneTile,
        Self::CustomLighting,
        Self::Landscaping,
        Self::PoolSpa,
        Self::SecuritySystem,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::SmartHome => "Smart Home Technology",
            Self::EnergyEfficient => "Energy Efficient Systems",
            Self::CustomCabinetry => "Custom Cabinetry",
            Self::HighEndAppliances => "High-End Appliances",
            Self::HardwoodFlooring => "Hardwood Flooring",
            Self::StoneTile => "Stone/Tile Work",
            Self::CustomLighting => "Custom Lighting",
            Self::Landscaping => "Landscaping",
            Self::PoolSpa => "Pool/Spa",
            Self::SecuritySystem => "Security System",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.label() == s)
    }
}

/// Pricing season derived from the calendar month.
///
/// | Season | Months |
/// |--------|--------|
/// | Winter | Dec, Jan, Feb |
/// | Spring | Mar, Apr, May |
/// | Summer | Jun, Jul, Aug |
/// | Fall   | Sep, Oct, Nov |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: [Season; 4] = [Self::Winter, Self::Spring, Self::Summer, Self::Fall];

    /// `month` is 1-based (January = 1), as returned by `chrono::Datelike::month`.
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            9..=11 => Self::Fall,
            _ => Self::Winter,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Winter => "winter",
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Fall => "fall",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|season| season.label() == s)
    }
}
