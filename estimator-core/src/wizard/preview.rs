//! Debounced live preview.
//!
//! Every edit reschedules the preview; only the last edit in a burst is
//! priced. Results are published on a [`tokio::sync::watch`] channel tagged
//! with the revision that produced them.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::calculations::{EstimateCalculator, Suggestions, suggest_defaults};
use crate::models::{EstimateResult, ProjectInput};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewSnapshot {
    /// Revision of the edit this snapshot was computed from; 0 before the
    /// first run.
    pub revision: u64,
    /// `None` while the inputs cannot be priced yet.
    pub estimate: Option<EstimateResult>,
    pub suggestions: Suggestions,
}

pub struct LivePreview {
    calculator: Arc<EstimateCalculator>,
    delay: Duration,
    revision: u64,
    pending: Option<JoinHandle<()>>,
    sender: Arc<watch::Sender<PreviewSnapshot>>,
    completed: Arc<AtomicU64>,
}

impl LivePreview {
    pub fn new(
        calculator: Arc<EstimateCalculator>,
        delay: Duration,
    ) -> Self {
        let (sender, _) = watch::channel(PreviewSnapshot::default());
        Self {
            calculator,
            delay,
            revision: 0,
            pending: None,
            sender: Arc::new(sender),
            completed: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PreviewSnapshot> {
        self.sender.subscribe()
    }

    pub fn latest(&self) -> PreviewSnapshot {
        self.sender.borrow().clone()
    }

    /// Number of preview runs that finished, across all revisions.
    pub fn completed_runs(&self) -> u64 {
        self.completed.load(Ordering::SeqCst)
    }

    /// Schedules a preview of `input` after the quiet period, cancelling
    /// any preview still waiting. Must be called inside a Tokio runtime.
    pub fn schedule(
        &mut self,
        input: ProjectInput,
        today: NaiveDate,
    ) -> u64 {
        self.cancel();
        self.revision += 1;

        let revision = self.revision;
        let delay = self.delay;
        let calculator = Arc::clone(&self.calculator);
        let sender = Arc::clone(&self.sender);
        let completed = Arc::clone(&self.completed);

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let estimate = calculator.preview(&input, today);
            let suggestions = suggest_defaults(&input, today);
            completed.fetch_add(1, Ordering::SeqCst);
            trace!(revision, priced = estimate.is_some(), "preview computed");

            sender.send_replace(PreviewSnapshot {
                revision,
                estimate,
                suggestions,
            });
        }));

        revision
    }

    /// Drops the waiting preview, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for LivePreview {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::{RateTables, SuggestionField};

    fn spring() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 15).unwrap()
    }

    fn preview() -> LivePreview {
        LivePreview::new(
            Arc::new(EstimateCalculator::new(RateTables::default())),
            DEFAULT_DEBOUNCE,
        )
    }

    fn kitchen(size: &str) -> ProjectInput {
        ProjectInput {
            project_type: "Kitchen Remodel".to_string(),
            location: "Pasco, WA".to_string(),
            size: size.to_string(),
            materials: vec!["Standard Grade".to_string()],
            ..ProjectInput::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_edits_runs_once_with_last_input() {
        let mut preview = preview();

        preview.schedule(kitchen("1"), spring());
        preview.schedule(kitchen("10"), spring());
        let last = preview.schedule(kitchen("1000"), spring());
        tokio::time::sleep(Duration::from_millis(250)).await;

        let snapshot = preview.latest();
        assert_eq!(preview.completed_runs(), 1);
        assert_eq!(snapshot.revision, last);
        assert_eq!(
            snapshot.estimate.map(|e| e.total_cost),
            Some(dec!(200000))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_quiet_period() {
        let mut preview = preview();

        preview.schedule(kitchen("1000"), spring());
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(preview.completed_runs(), 0);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(preview.completed_runs(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn incomplete_input_publishes_suggestions_only() {
        let mut preview = preview();
        let mut updates = preview.subscribe();

        preview.schedule(ProjectInput::default(), spring());
        updates.changed().await.unwrap();

        let snapshot = updates.borrow().clone();
        assert_eq!(snapshot.estimate, None);
        assert!(snapshot.suggestions.contains_key(&SuggestionField::Materials));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_preview() {
        let mut preview = preview();

        preview.schedule(kitchen("1000"), spring());
        preview.cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(preview.completed_runs(), 0);
        assert_eq!(preview.latest(), PreviewSnapshot::default());
    }
}
