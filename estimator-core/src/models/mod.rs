mod catalog;
mod estimate;
mod project_input;

pub use catalog::{Complexity, Feature, Location, MaterialGrade, ProjectType, Season};
pub use estimate::{
    ConfidenceLevel, CostBreakdown, DataQualityFactors, EstimateAssessment, EstimateMode,
    EstimateRange, EstimateResult,
};
pub use project_input::{ProjectInput, SIZE_MAX, SIZE_MIN};
