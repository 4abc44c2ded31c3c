//! The three-step estimator wizard.
//!
//! ```text
//! Basics (1) ──next──▶ Details (2) ──next──▶ Review (3) ──calculate──▶ Result
//!     ◀──back────────────  ◀──back─────────────     │
//!                                                   ▼
//!                             start_over ◀──────── Result
//! ```
//!
//! Moving forward requires the active step to validate; moving back never
//! does. Validation gates step changes only; the live preview is computed
//! from whatever has been entered.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::calculations::{EstimateCalculator, EstimateError};
use crate::models::{EstimateMode, EstimateResult, ProjectInput, SIZE_MAX, SIZE_MIN};
use crate::wizard::draft::SavedDraft;

/// Simulated latency before a full estimate is shown.
pub const DEFAULT_CALCULATION_DELAY: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WizardStep {
    Basics,
    Details,
    Review,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self {
            Self::Basics => 1,
            Self::Details => 2,
            Self::Review => 3,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Basics),
            2 => Some(Self::Details),
            3 => Some(Self::Review),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Basics => "Project Basics",
            Self::Details => "Project Details",
            Self::Review => "Review Your Information",
        }
    }

    fn next(&self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    fn previous(&self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("cannot leave step {}: {}", .step.number(), .issues.join("; "))]
    CannotProceed {
        step: WizardStep,
        issues: Vec<String>,
    },

    #[error("already on the last step; calculate the estimate instead")]
    LastStep,

    #[error("estimates can only be calculated from the review step (currently on step {})", .0.number())]
    NotOnReviewStep(WizardStep),

    #[error("an estimate is already shown; start over to make changes")]
    ResultShown,

    #[error(transparent)]
    Estimate(#[from] EstimateError),
}

/// Validation messages for the active step and whether it may be left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationStatus {
    pub issues: Vec<String>,
    pub can_proceed: bool,
}

impl ValidationStatus {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Wizard state: active step, the project being described and, once
/// calculated, the estimate.
#[derive(Debug, Clone)]
pub struct EstimatorForm {
    step: WizardStep,
    project: ProjectInput,
    estimate: Option<EstimateResult>,
}

impl Default for EstimatorForm {
    fn default() -> Self {
        Self::new()
    }
}

impl EstimatorForm {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Basics,
            project: ProjectInput::default(),
            estimate: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn project(&self) -> &ProjectInput {
        &self.project
    }

    pub fn estimate(&self) -> Option<&EstimateResult> {
        self.estimate.as_ref()
    }

    pub fn has_result(&self) -> bool {
        self.estimate.is_some()
    }

    /// Applies an edit to the project.
    ///
    /// # Errors
    ///
    /// [`FormError::ResultShown`] once an estimate has been calculated.
    pub fn update(
        &mut self,
        edit: impl FnOnce(&mut ProjectInput),
    ) -> Result<(), FormError> {
        if self.has_result() {
            return Err(FormError::ResultShown);
        }
        edit(&mut self.project);
        Ok(())
    }

    /// Validates everything up to and including the active step.
    pub fn validation(&self) -> ValidationStatus {
        let p = &self.project;
        let mut issues = Vec::new();

        if p.project_type.trim().is_empty() {
            issues.push("Please select a project type".to_string());
        }
        if p.location.trim().is_empty() {
            issues.push("Please select your location".to_string());
        }
        let size = p.square_footage();
        if p.size.trim().is_empty() {
            issues.push("Please enter the project size".to_string());
        } else {
            match size {
                None => issues.push("Project size must be a whole number of square feet".to_string()),
                Some(s) if s < SIZE_MIN => {
                    issues.push("Project size seems too small (minimum 100 sq ft)".to_string())
                }
                Some(s) if s > SIZE_MAX => {
                    issues.push("Project size seems too large (maximum 50,000 sq ft)".to_string())
                }
                Some(_) => {}
            }
        }

        if self.step >= WizardStep::Details {
            if p.primary_material().is_none() {
                issues.push("Please select a material quality level".to_string());
            }
            if p.complexity.trim().is_empty() {
                issues.push("Please indicate project complexity".to_string());
            }
        }

        let can_proceed = match self.step {
            WizardStep::Basics => {
                !p.project_type.trim().is_empty()
                    && !p.location.trim().is_empty()
                    && size.is_some_and(|s| (SIZE_MIN..=SIZE_MAX).contains(&s))
            }
            WizardStep::Details => p.primary_material().is_some(),
            WizardStep::Review => true,
        };

        ValidationStatus {
            issues,
            can_proceed,
        }
    }

    /// Advances one step if the active step validates.
    pub fn next(&mut self) -> Result<WizardStep, FormError> {
        if self.has_result() {
            return Err(FormError::ResultShown);
        }
        let next = self.step.next().ok_or(FormError::LastStep)?;

        let status = self.validation();
        if !status.can_proceed {
            return Err(FormError::CannotProceed {
                step: self.step,
                issues: status.issues,
            });
        }

        debug!(from = self.step.number(), to = next.number(), "wizard step forward");
        self.step = next;
        Ok(next)
    }

    /// Goes back one step. Stays put on the first step.
    pub fn back(&mut self) -> Result<WizardStep, FormError> {
        if self.has_result() {
            return Err(FormError::ResultShown);
        }
        if let Some(previous) = self.step.previous() {
            debug!(from = self.step.number(), to = previous.number(), "wizard step back");
            self.step = previous;
        }
        Ok(self.step)
    }

    /// Computes the full estimate from the review step.
    ///
    /// Waits `latency` first so the visitor sees the calculation happen.
    pub async fn calculate(
        &mut self,
        calculator: &EstimateCalculator,
        latency: Duration,
        today: NaiveDate,
    ) -> Result<&EstimateResult, FormError> {
        if self.has_result() {
            return Err(FormError::ResultShown);
        }
        if self.step != WizardStep::Review {
            return Err(FormError::NotOnReviewStep(self.step));
        }

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let estimate = calculator.calculate(&self.project, EstimateMode::Full, today)?;
        Ok(self.estimate.insert(estimate))
    }

    /// Discards the project and any estimate and returns to the first step.
    pub fn start_over(&mut self) {
        info!("estimator form reset");
        *self = Self::new();
    }

    /// Loads a previously saved draft. Unknown step numbers restart at step 1.
    pub fn restore(
        &mut self,
        draft: SavedDraft,
    ) {
        self.step = WizardStep::from_number(draft.current_step).unwrap_or(WizardStep::Basics);
        self.project = draft.project_data;
        self.estimate = None;
        info!(step = self.step.number(), "restored saved draft");
    }

    pub fn to_draft(
        &self,
        saved_at: DateTime<Utc>,
    ) -> SavedDraft {
        SavedDraft {
            current_step: self.step.number(),
            project_data: self.project.clone(),
            saved_at,
        }
    }
}
