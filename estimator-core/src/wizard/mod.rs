//! Wizard flow: step state, live preview and draft persistence.

pub mod draft;
pub mod form;
pub mod preview;

pub use draft::{DRAFT_STORAGE_KEY, DraftError, DraftManager, RestoreOutcome, SavedDraft};
pub use form::{DEFAULT_CALCULATION_DELAY, EstimatorForm, FormError, ValidationStatus, WizardStep};
pub use preview::{DEFAULT_DEBOUNCE, LivePreview, PreviewSnapshot};
