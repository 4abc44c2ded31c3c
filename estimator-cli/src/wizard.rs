//! Interactive three-step estimator on a line-oriented terminal.
//!
//! Every answer is applied to the form, saved as a draft and fed to the
//! live preview; the running estimate is printed at the end of each step.
//! End of input quits and leaves the draft for next time.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{Local, NaiveDate, Utc};
use estimator_core::calculations::EstimateCalculator;
use estimator_core::wizard::{
    DraftManager, EstimatorForm, FormError, LivePreview, PreviewSnapshot, RestoreOutcome,
    WizardStep,
};
use estimator_core::{Complexity, Feature, Location, MaterialGrade, ProjectInput, ProjectType};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::render::{EstimateReport, ProjectSummary, SuggestionsReport};
use crate::utils::{
    format_currency, multiplier_badge, normalize_size, parse_selection, parse_yes_no,
};

#[derive(Debug, Clone)]
pub struct WizardSettings {
    /// Date used for seasonal pricing and suggestions.
    pub today: NaiveDate,
    pub debounce: Duration,
    pub calculation_delay: Duration,
    pub confirm_restore: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct WizardSession<'a, R, W> {
    input: R,
    output: W,
    calculator: Arc<EstimateCalculator>,
    drafts: DraftManager<'a>,
    settings: WizardSettings,
    form: EstimatorForm,
    preview: LivePreview,
    updates: watch::Receiver<PreviewSnapshot>,
    last_revision: u64,
}

impl<'a, R: AsyncBufRead + Unpin, W: Write> WizardSession<'a, R, W> {
    pub fn new(
        input: R,
        output: W,
        calculator: Arc<EstimateCalculator>,
        drafts: DraftManager<'a>,
        settings: WizardSettings,
    ) -> Self {
        let preview = LivePreview::new(Arc::clone(&calculator), settings.debounce);
        let updates = preview.subscribe();
        Self {
            input,
            output,
            calculator,
            drafts,
            settings,
            form: EstimatorForm::new(),
            preview,
            updates,
            last_revision: 0,
        }
    }

    pub fn form(&self) -> &EstimatorForm {
        &self.form
    }

    /// Runs until the visitor quits or input ends.
    pub async fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Construction Cost Estimator")?;
        writeln!(self.output, "Answer each question; press Enter to keep the current value.")?;

        if self.offer_restore().await? == Flow::Quit {
            return Ok(());
        }

        loop {
            let flow = if self.form.has_result() {
                self.result_step().await?
            } else {
                match self.form.step() {
                    WizardStep::Basics => self.basics_step().await?,
                    WizardStep::Details => self.details_step().await?,
                    WizardStep::Review => self.review_step().await?,
                }
            };
            if flow == Flow::Quit {
                break;
            }
        }

        self.preview.cancel();
        if !self.form.has_result() && !self.form.project().is_empty() {
            writeln!(self.output, "Your progress is saved. Run the wizard again to continue.")?;
        }
        Ok(())
    }

    async fn offer_restore(&mut self) -> Result<Flow> {
        let outcome = match self.drafts.restore(Utc::now()).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "could not read saved draft");
                return Ok(Flow::Continue);
            }
        };

        match outcome {
            RestoreOutcome::Restored(draft) => {
                let saved = draft
                    .saved_at
                    .with_timezone(&Local)
                    .format("%b %-d at %H:%M")
                    .to_string();
                if self.settings.confirm_restore {
                    let question =
                        format!("Found a saved estimate from {saved}. Continue where you left off? [Y/n]");
                    let Some(keep) = self.ask_yes_no(&question, true).await? else {
                        return Ok(Flow::Quit);
                    };
                    if !keep {
                        self.clear_draft().await;
                        return Ok(Flow::Continue);
                    }
                }
                self.form.restore(draft);
                writeln!(
                    self.output,
                    "Restored your saved estimate from {saved} (step {}).",
                    self.form.step().number()
                )?;
            }
            RestoreOutcome::Stale { .. } => {
                writeln!(
                    self.output,
                    "Your saved estimate was more than {} days old and has been cleared.",
                    self.drafts.max_age().num_days()
                )?;
            }
            RestoreOutcome::Empty | RestoreOutcome::Discarded => {}
        }
        Ok(Flow::Continue)
    }

    // ===== steps =====

    async fn basics_step(&mut self) -> Result<Flow> {
        self.step_header()?;

        let labels: Vec<&str> = ProjectType::ALL.iter().map(|t| t.label()).collect();
        let current = self.form.project().project_type.clone();
        let Some(choice) = self.choose("Project type", &labels, &[], &current).await? else {
            return Ok(Flow::Quit);
        };
        if let Some(project_type) = choice {
            self.edit(|p| p.project_type = project_type).await?;
        }

        let labels: Vec<&str> = Location::ALL.iter().map(|l| l.label()).collect();
        let current = self.form.project().location.clone();
        let Some(choice) = self.choose("Location", &labels, &[], &current).await? else {
            return Ok(Flow::Quit);
        };
        if let Some(location) = choice {
            self.edit(|p| p.location = location).await?;
        }

        loop {
            let current = self.form.project().size.clone();
            let Some(answer) = self.ask(&with_current("Project size in square feet", &current)).await? else {
                return Ok(Flow::Quit);
            };
            if answer.is_empty() {
                break;
            }
            match normalize_size(&answer) {
                Ok(size) => {
                    self.edit(|p| p.size = size).await?;
                    break;
                }
                Err(e) => writeln!(self.output, "  {e}")?,
            }
        }

        let current = self.form.project().budget.clone();
        let Some(answer) =
            self.ask(&with_current("Desired budget range (optional, e.g. $50,000 - $100,000)", &current)).await?
        else {
            return Ok(Flow::Quit);
        };
        if !answer.is_empty() {
            self.edit(|p| p.budget = answer).await?;
        }

        let current = self.form.project().is_veteran;
        let question = format!(
            "Are you a veteran or military family member? (10% discount) [{}]",
            if current { "Y/n" } else { "y/N" }
        );
        let Some(veteran) = self.ask_yes_no(&question, current).await? else {
            return Ok(Flow::Quit);
        };
        if veteran != current {
            self.edit(|p| p.is_veteran = veteran).await?;
        }

        self.show_preview().await?;
        self.navigate().await
    }

    async fn details_step(&mut self) -> Result<Flow> {
        self.step_header()?;

        let rates = self.calculator.rates().clone();
        let labels: Vec<&str> = MaterialGrade::ALL.iter().map(|m| m.label()).collect();
        let notes: Vec<String> = MaterialGrade::ALL
            .iter()
            .map(|m| {
                format!(
                    "{} | {} | Examples: {}",
                    multiplier_badge(rates.material_multiplier(Some(m.label()))),
                    m.description(),
                    m.examples()
                )
            })
            .collect();
        let current = self.form.project().primary_material().unwrap_or_default().to_string();
        let Some(choice) = self.choose("Material quality level", &labels, &notes, &current).await? else {
            return Ok(Flow::Quit);
        };
        if let Some(material) = choice {
            self.edit(|p| p.set_material(material)).await?;
        }

        loop {
            writeln!(self.output, "Special features (each adds 5%):")?;
            for (i, feature) in Feature::ALL.iter().enumerate() {
                let mark = if self.form.project().features.iter().any(|f| f == feature.label()) {
                    "x"
                } else {
                    " "
                };
                writeln!(self.output, "  {:>2}. [{mark}] {}", i + 1, feature.label())?;
            }
            let Some(answer) = self.ask("Toggle features by number (e.g. 1,4), Enter when done").await? else {
                return Ok(Flow::Quit);
            };
            if answer.is_empty() {
                break;
            }
            match parse_selection(&answer, Feature::ALL.len()) {
                Some(indexes) => {
                    self.edit(|p| {
                        for i in indexes {
                            p.toggle_feature(Feature::ALL[i].label());
                        }
                    })
                    .await?;
                }
                None => writeln!(
                    self.output,
                    "  Please enter numbers between 1 and {}",
                    Feature::ALL.len()
                )?,
            }
        }

        let labels: Vec<&str> = Complexity::ALL.iter().map(|c| c.label()).collect();
        let current = self.form.project().complexity.clone();
        let Some(choice) = self.choose("Project complexity", &labels, &[], &current).await? else {
            return Ok(Flow::Quit);
        };
        if let Some(complexity) = choice {
            self.edit(|p| p.complexity = complexity).await?;
        }

        let current = self.form.project().timeline.clone();
        let Some(answer) = self.ask(&with_current("Desired timeline (e.g. start in 3 months)", &current)).await? else {
            return Ok(Flow::Quit);
        };
        if !answer.is_empty() {
            self.edit(|p| p.timeline = answer).await?;
        }

        self.show_preview().await?;
        self.navigate().await
    }

    async fn review_step(&mut self) -> Result<Flow> {
        self.step_header()?;
        write!(self.output, "{}", ProjectSummary(self.form.project()))?;
        for issue in self.form.validation().issues {
            writeln!(self.output, "  note: {issue}")?;
        }

        loop {
            let Some(answer) = self.ask("[c]alculate estimate, [b]ack, [q]uit").await? else {
                return Ok(Flow::Quit);
            };
            match answer.to_ascii_lowercase().as_str() {
                "c" | "calculate" => break,
                "b" | "back" => {
                    self.form.back()?;
                    self.save_draft().await;
                    return Ok(Flow::Continue);
                }
                "q" | "quit" => return Ok(Flow::Quit),
                _ => continue,
            }
        }

        writeln!(self.output, "Calculating your estimate...")?;
        self.output.flush()?;
        let result = self
            .form
            .calculate(&self.calculator, self.settings.calculation_delay, self.settings.today)
            .await
            .cloned();
        let estimate = match result {
            Ok(estimate) => estimate,
            Err(FormError::Estimate(e)) => {
                writeln!(self.output, "Could not calculate: {e}")?;
                return Ok(Flow::Continue);
            }
            Err(e) => return Err(e.into()),
        };
        writeln!(self.output)?;
        write!(self.output, "{}", EstimateReport::new(&estimate, self.form.project()))?;
        Ok(Flow::Continue)
    }

    async fn result_step(&mut self) -> Result<Flow> {
        loop {
            let Some(answer) = self.ask("[s]tart over, [q]uit").await? else {
                return Ok(Flow::Quit);
            };
            match answer.to_ascii_lowercase().as_str() {
                "s" | "start over" => {
                    self.preview.cancel();
                    self.form.start_over();
                    self.last_revision = 0;
                    self.clear_draft().await;
                    writeln!(self.output)?;
                    return Ok(Flow::Continue);
                }
                "q" | "quit" => return Ok(Flow::Quit),
                _ => continue,
            }
        }
    }

    // ===== helpers =====

    fn step_header(&mut self) -> Result<()> {
        let step = self.form.step();
        writeln!(self.output)?;
        writeln!(self.output, "Step {} of 3: {}", step.number(), step.title())?;
        Ok(())
    }

    /// Asks to move on once the step's questions are answered.
    async fn navigate(&mut self) -> Result<Flow> {
        let prompt = match self.form.step() {
            WizardStep::Basics => "[n]ext, [e]dit answers, [q]uit",
            _ => "[n]ext, [b]ack, [e]dit answers, [q]uit",
        };
        loop {
            let Some(answer) = self.ask(prompt).await? else {
                return Ok(Flow::Quit);
            };
            match answer.to_ascii_lowercase().as_str() {
                "n" | "next" | "" => {
                    match self.form.next() {
                        Ok(_) => self.save_draft().await,
                        Err(FormError::CannotProceed { issues, .. }) => {
                            writeln!(self.output, "Please fix the following before continuing:")?;
                            for issue in issues {
                                writeln!(self.output, "  - {issue}")?;
                            }
                        }
                        Err(e) => return Err(e.into()),
                    }
                    return Ok(Flow::Continue);
                }
                "b" | "back" if self.form.step() != WizardStep::Basics => {
                    self.form.back()?;
                    self.save_draft().await;
                    return Ok(Flow::Continue);
                }
                "e" | "edit" => return Ok(Flow::Continue),
                "q" | "quit" => return Ok(Flow::Quit),
                _ => continue,
            }
        }
    }

    /// Applies an edit, reschedules the preview and saves the draft.
    async fn edit(
        &mut self,
        edit: impl FnOnce(&mut ProjectInput),
    ) -> Result<()> {
        self.form.update(edit)?;
        self.last_revision = self
            .preview
            .schedule(self.form.project().clone(), self.settings.today);
        self.save_draft().await;
        Ok(())
    }

    async fn save_draft(&self) {
        let draft = self.form.to_draft(Utc::now());
        if let Err(e) = self.drafts.save(&draft).await {
            warn!(error = %e, "could not save draft");
        }
    }

    async fn clear_draft(&self) {
        if let Err(e) = self.drafts.clear().await {
            warn!(error = %e, "could not clear draft");
        }
    }

    /// Waits for the preview of the latest edit and prints it.
    async fn show_preview(&mut self) -> Result<()> {
        if self.last_revision == 0 {
            return Ok(());
        }
        let revision = self.last_revision;
        let snapshot = self
            .updates
            .wait_for(|s| s.revision >= revision)
            .await?
            .clone();
        debug!(revision = snapshot.revision, "showing preview");

        writeln!(self.output)?;
        match &snapshot.estimate {
            Some(estimate) => writeln!(
                self.output,
                "Running estimate: {} ({} - {})",
                format_currency(estimate.total_cost),
                format_currency(estimate.estimate_range.low),
                format_currency(estimate.estimate_range.high)
            )?,
            None => writeln!(self.output, "Running estimate: enter a project size to see a price")?,
        }
        if !snapshot.suggestions.is_empty() {
            write!(self.output, "{}", SuggestionsReport(&snapshot.suggestions))?;
        }
        Ok(())
    }

    /// Reads one trimmed line; `None` at end of input.
    async fn ask(
        &mut self,
        prompt: &str,
    ) -> Result<Option<String>> {
        write!(self.output, "{prompt}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    async fn ask_yes_no(
        &mut self,
        question: &str,
        default: bool,
    ) -> Result<Option<bool>> {
        loop {
            let Some(answer) = self.ask(question).await? else {
                return Ok(None);
            };
            match parse_yes_no(&answer, default) {
                Some(yes) => return Ok(Some(yes)),
                None => writeln!(self.output, "  Please answer y or n")?,
            }
        }
    }

    /// Numbered single choice. `Some(None)` keeps the current value.
    async fn choose(
        &mut self,
        title: &str,
        options: &[&str],
        notes: &[String],
        current: &str,
    ) -> Result<Option<Option<String>>> {
        writeln!(self.output, "{title}:")?;
        for (i, option) in options.iter().enumerate() {
            let mark = if *option == current { "*" } else { " " };
            writeln!(self.output, " {mark}{:>2}. {option}", i + 1)?;
            if let Some(note) = notes.get(i) {
                writeln!(self.output, "       {note}")?;
            }
        }

        loop {
            let Some(answer) = self.ask(&with_current("Choose a number", current)).await? else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(Some(None));
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => {
                    return Ok(Some(Some(options[n - 1].to_string())));
                }
                _ => writeln!(
                    self.output,
                    "  Please enter a number between 1 and {}",
                    options.len()
                )?,
            }
        }
    }
}

fn with_current(
    prompt: &str,
    current: &str,
) -> String {
    if current.is_empty() {
        prompt.to_string()
    } else {
        format!("{prompt} [{current}]")
    }
}
