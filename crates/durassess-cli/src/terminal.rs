use std::io::Write;

use console::style;
use durassess_core::{
    AssessmentError, AssessmentSequencer, AssessmentSession, DiagnosticReport, Measurement,
    Notification, Payload, Role, ScoreResult, Stage, Tier,
};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::time::sleep;
use tracing::info;

use crate::config::Pacing;
use crate::error::CliError;

const STARTUP_STEPS: u64 = 100;
const STARTUP_STATUS: [(u64, &str); 5] = [
    (0, "Starting up..."),
    (20, "Server on..."),
    (40, "AI server up..."),
    (60, "AI activated..."),
    (80, "AI online..."),
];
const THICKNESS_STEPS: u64 = 50;
const WEIGHT_STEPS: u64 = 40;
const SYNC_STEPS: u64 = 20;

/// Only an explicit "yes" starts the problem analysis.
pub fn parse_opt_in(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

/// Interactive terminal front-end. Renders every stage notification with the
/// configured pacing; scoring itself never waits on the animation.
pub struct ConsoleSession<W> {
    pacing: Pacing,
    out: W,
}

impl ConsoleSession<std::io::Stdout> {
    pub async fn run_stdio(pacing: Pacing) -> Result<(), CliError> {
        let mut session = Self::new(pacing, std::io::stdout());
        session.run(BufReader::new(tokio::io::stdin())).await
    }
}

impl<W: Write> ConsoleSession<W> {
    pub fn new(pacing: Pacing, out: W) -> Self {
        Self { pacing, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<(), CliError> {
        let mut lines = input.lines();
        let mut sequencer = AssessmentSequencer::default();

        writeln!(self.out, "{}", style("Bottle Durability Assessment").bold())?;
        self.startup().await?;

        loop {
            if !self.collect(&mut sequencer, &mut lines, Role::Thickness).await? {
                return Ok(());
            }
            if !self.collect(&mut sequencer, &mut lines, Role::Weight).await? {
                return Ok(());
            }

            let offered = sequencer
                .session()
                .score()
                .is_some_and(|result| result.diagnosis_offered());
            if offered {
                writeln!(
                    self.out,
                    "\nTo find the problem, enter 'yes' to start the AI analysis or 'no' to stop it."
                )?;
                let Some(answer) = self.prompt(&mut lines, "Enter option: ").await? else {
                    return Ok(());
                };
                sequencer.request_diagnosis(parse_opt_in(&answer))?;
                self.flush_notifications(&mut sequencer).await?;
            } else {
                writeln!(
                    self.out,
                    "\nAnalysis complete. No further problem solving needed."
                )?;
            }

            let next = self
                .prompt(
                    &mut lines,
                    "\nType 'restart' for a new assessment or press Enter to quit: ",
                )
                .await?;
            match next {
                Some(answer) if answer.trim().eq_ignore_ascii_case("restart") => {
                    sequencer.reset();
                    self.flush_notifications(&mut sequencer).await?;
                }
                _ => {
                    info!(stage = %sequencer.stage(), "console session finished");
                    return Ok(());
                }
            }
        }
    }

    /// Prompt until the value is accepted. Returns `false` on end of input.
    async fn collect<R: AsyncBufRead + Unpin>(
        &mut self,
        sequencer: &mut AssessmentSequencer,
        lines: &mut Lines<R>,
        role: Role,
    ) -> Result<bool, CliError> {
        let label = match role {
            Role::Thickness => "\nEnter thickness of shell (cm): ",
            Role::Weight => "\nEnter weight of bottle (grams): ",
        };
        loop {
            let Some(raw) = self.prompt(lines, label).await? else {
                return Ok(false);
            };
            let submitted = match role {
                Role::Thickness => sequencer.submit_thickness(&raw).map(|_| ()),
                Role::Weight => sequencer.submit_weight(&raw).map(|_| ()),
            };
            match submitted {
                Ok(()) => {
                    self.flush_notifications(sequencer).await?;
                    return Ok(true);
                }
                Err(AssessmentError::InvalidMeasurement { .. }) => {
                    writeln!(
                        self.out,
                        "{}",
                        style(format!("ERROR: Please enter a valid {role}.")).red()
                    )?;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    async fn prompt<R: AsyncBufRead + Unpin>(
        &mut self,
        lines: &mut Lines<R>,
        label: &str,
    ) -> Result<Option<String>, CliError> {
        write!(self.out, "{label}")?;
        self.out.flush()?;
        Ok(lines.next_line().await?)
    }

    async fn flush_notifications(
        &mut self,
        sequencer: &mut AssessmentSequencer,
    ) -> Result<(), CliError> {
        let pending = sequencer.presenter_mut().drain(..).collect::<Vec<_>>();
        for notification in &pending {
            self.render(notification, sequencer.session()).await?;
        }
        Ok(())
    }

    async fn render(
        &mut self,
        notification: &Notification,
        session: &AssessmentSession,
    ) -> Result<(), CliError> {
        match (&notification.payload, notification.stage) {
            (Some(Payload::Measurement(measurement)), _) => {
                self.render_measurement(measurement).await
            }
            (Some(Payload::Score(result)), _) => self.render_score(result, session),
            (Some(Payload::Diagnosis(report)), _) => self.render_diagnosis(report).await,
            (None, Stage::Done) if session.diagnosis().is_none() => {
                writeln!(self.out, "{}", style("\nAI problem analysis stopped.").blue())?;
                Ok(())
            }
            (None, Stage::AwaitingThickness) => {
                writeln!(self.out, "{}", style("\nSession reset.").blue())?;
                Ok(())
            }
            (None, _) => Ok(()),
        }
    }

    async fn render_measurement(&mut self, measurement: &Measurement) -> Result<(), CliError> {
        match measurement.role() {
            Role::Thickness => {
                writeln!(self.out, "\nTHICKNESS CALCULATING...")?;
                self.progress(THICKNESS_STEPS, "Analyzing Thickness").await;
                writeln!(
                    self.out,
                    "{}",
                    style("Thickness analysis complete.").blue()
                )?;
            }
            Role::Weight => {
                writeln!(self.out, "\nWEIGHT DATA PROCESSING...")?;
                self.progress(WEIGHT_STEPS, "Analyzing Weight").await;
                writeln!(
                    self.out,
                    "{}",
                    style("Weight data acquisition finished.").blue()
                )?;
                writeln!(self.out, "\nConnecting to AI Core...")?;
                self.progress(SYNC_STEPS, "Final Sync").await;
            }
        }
        Ok(())
    }

    fn render_score(
        &mut self,
        result: &ScoreResult,
        session: &AssessmentSession,
    ) -> Result<(), CliError> {
        writeln!(
            self.out,
            "\n{}",
            style("--- AI DURABILITY ASSESSMENT ---").bold()
        )?;
        for measurement in [session.thickness(), session.weight()].into_iter().flatten() {
            writeln!(
                self.out,
                "{} = {} {}",
                capitalized(measurement.role()),
                measurement.value(),
                measurement.role().unit()
            )?;
        }
        writeln!(
            self.out,
            "Score = {} (thickness {} + weight {})",
            result.total, result.thickness_score, result.weight_score
        )?;

        let verdict = format!("AI Result: {}", result.tier.verdict());
        let styled = match result.tier {
            Tier::High => style(verdict).green().bold(),
            Tier::Medium => style(verdict).yellow(),
            Tier::Low => style(verdict).red(),
        };
        writeln!(self.out, "{styled}")?;
        Ok(())
    }

    async fn render_diagnosis(&mut self, report: &DiagnosticReport) -> Result<(), CliError> {
        writeln!(self.out, "{}", style("\nAI ANALYZING.....").yellow())?;

        for finding in report {
            let (heading, steps, label, complete) = match finding.role {
                Role::Thickness => (
                    "\nTHICKNESS CALCULATING...",
                    THICKNESS_STEPS,
                    "Analyzing Thickness",
                    "Thickness Analysis Complete ...",
                ),
                Role::Weight => (
                    "\nWEIGHT DATA PROCESSING...",
                    WEIGHT_STEPS,
                    "Analyzing Weight",
                    "Weight data acquisition finished.",
                ),
            };
            writeln!(self.out, "{heading}")?;
            self.progress(steps, label).await;
            writeln!(self.out, "{}", style(complete).yellow())?;
            let line = if finding.is_problem {
                style(finding.headline()).red()
            } else {
                style(finding.headline()).green()
            };
            writeln!(self.out, "{line}")?;
        }

        writeln!(self.out, "\n{}", style("FINAL OUTPUT").bold())?;
        for finding in report {
            let line = if finding.is_problem {
                style(finding.summary()).red()
            } else {
                style(finding.summary()).green()
            };
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    async fn startup(&mut self) -> Result<(), CliError> {
        if self.pacing.animate {
            let bar = ProgressBar::new(STARTUP_STEPS);
            bar.set_style(startup_style());
            for step in 0..=STARTUP_STEPS {
                if let Some((_, status)) = STARTUP_STATUS.iter().find(|(at, _)| *at == step) {
                    bar.set_message(*status);
                }
                bar.set_position(step);
                sleep(self.pacing.startup_delay).await;
            }
            bar.finish_and_clear();
        }
        writeln!(self.out, "{}", style("AI ready to use!").green())?;
        Ok(())
    }

    async fn progress(&self, steps: u64, label: &'static str) {
        if !self.pacing.animate {
            return;
        }
        let bar = ProgressBar::new(steps);
        bar.set_style(step_style());
        bar.set_message(label);
        for _ in 0..steps {
            bar.inc(1);
            sleep(self.pacing.step_delay).await;
        }
        bar.finish_and_clear();
    }
}

fn startup_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("Status: {msg:<20} |{bar:50}| {percent}%")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#-")
}

fn step_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg:<20} |{bar:25.cyan/blue}| {percent}%")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█░")
}

fn capitalized(role: Role) -> &'static str {
    match role {
        Role::Thickness => "Thickness",
        Role::Weight => "Weight",
    }
}
