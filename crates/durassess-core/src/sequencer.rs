use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::diagnostic::{diagnose, DiagnosticReport};
use crate::error::AssessmentError;
use crate::measurement::{validate, Measurement, Role};
use crate::score::{score, ScoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    AwaitingThickness,
    AwaitingWeight,
    Scoring,
    Reported,
    Diagnosing,
    Done,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AwaitingThickness => "awaiting_thickness",
            Self::AwaitingWeight => "awaiting_weight",
            Self::Scoring => "scoring",
            Self::Reported => "reported",
            Self::Diagnosing => "diagnosing",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Payload {
    Measurement(Measurement),
    Score(ScoreResult),
    Diagnosis(DiagnosticReport),
}

/// Emitted once per successful transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
}

/// Receiver for stage notifications. Rendering, pacing and any other display
/// concern live behind this seam.
pub trait Presenter {
    fn present(&mut self, notification: &Notification);
}

impl Presenter for Vec<Notification> {
    fn present(&mut self, notification: &Notification) {
        self.push(notification.clone());
    }
}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    fn present(&mut self, notification: &Notification) {
        (**self).present(notification);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssessmentSession {
    stage: Stage,
    thickness: Option<Measurement>,
    weight: Option<Measurement>,
    score: Option<ScoreResult>,
    diagnosis: Option<DiagnosticReport>,
}

impl AssessmentSession {
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn thickness(&self) -> Option<Measurement> {
        self.thickness
    }

    pub fn weight(&self) -> Option<Measurement> {
        self.weight
    }

    pub fn score(&self) -> Option<ScoreResult> {
        self.score
    }

    pub fn diagnosis(&self) -> Option<DiagnosticReport> {
        self.diagnosis
    }
}

/// Drives one assessment from thickness entry to the final report.
///
/// Every operation either succeeds and notifies the presenter, or fails with
/// [`AssessmentError`] and leaves the session untouched.
pub struct AssessmentSequencer<P = Vec<Notification>> {
    session: AssessmentSession,
    presenter: P,
}

impl Default for AssessmentSequencer<Vec<Notification>> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<P: Presenter> AssessmentSequencer<P> {
    pub fn new(presenter: P) -> Self {
        Self {
            session: AssessmentSession::default(),
            presenter,
        }
    }

    pub fn session(&self) -> &AssessmentSession {
        &self.session
    }

    pub fn stage(&self) -> Stage {
        self.session.stage
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn into_presenter(self) -> P {
        self.presenter
    }

    pub fn submit_thickness(&mut self, raw: &str) -> Result<Measurement, AssessmentError> {
        self.require_stage(Stage::AwaitingThickness, "submit_thickness")?;
        let measurement = admit(Role::Thickness, raw)?;

        self.session.thickness = Some(measurement);
        self.advance(
            Stage::AwaitingWeight,
            Some(Payload::Measurement(measurement)),
        );
        Ok(measurement)
    }

    pub fn submit_weight(&mut self, raw: &str) -> Result<ScoreResult, AssessmentError> {
        self.require_stage(Stage::AwaitingWeight, "submit_weight")?;
        let thickness = self.session.thickness.ok_or(AssessmentError::InvalidTransition {
            operation: "submit_weight",
            stage: self.session.stage,
        })?;
        let measurement = admit(Role::Weight, raw)?;

        self.session.weight = Some(measurement);
        self.advance(Stage::Scoring, Some(Payload::Measurement(measurement)));

        let result = score(thickness.value(), measurement.value());
        debug!(
            thickness_score = result.thickness_score,
            weight_score = result.weight_score,
            total = result.total,
            tier = %result.tier,
            "assessment scored"
        );
        self.session.score = Some(result);
        self.advance(Stage::Reported, Some(Payload::Score(result)));
        Ok(result)
    }

    /// Answer the problem-analysis offer. Only valid after a report whose
    /// total is low enough to offer it. Returns the findings when opted in.
    pub fn request_diagnosis(
        &mut self,
        wants_it: bool,
    ) -> Result<Option<DiagnosticReport>, AssessmentError> {
        let rejected = AssessmentError::InvalidTransition {
            operation: "request_diagnosis",
            stage: self.session.stage,
        };
        self.require_stage(Stage::Reported, "request_diagnosis")?;

        let offered = self
            .session
            .score
            .is_some_and(|result| result.diagnosis_offered());
        if !offered {
            warn!(stage = %self.session.stage, "diagnosis not offered for this score");
            return Err(rejected);
        }
        let (Some(thickness), Some(weight)) = (self.session.thickness, self.session.weight) else {
            return Err(rejected);
        };

        if !wants_it {
            self.advance(Stage::Done, None);
            return Ok(None);
        }

        let report = diagnose(thickness.value(), weight.value());
        self.session.diagnosis = Some(report);
        self.advance(Stage::Diagnosing, Some(Payload::Diagnosis(report)));
        self.advance(Stage::Done, None);
        Ok(Some(report))
    }

    /// Discard every stored value and start over. Allowed from any stage.
    pub fn reset(&mut self) {
        self.session = AssessmentSession::default();
        self.advance(Stage::AwaitingThickness, None);
    }

    fn require_stage(
        &self,
        expected: Stage,
        operation: &'static str,
    ) -> Result<(), AssessmentError> {
        if self.session.stage == expected {
            return Ok(());
        }
        warn!(operation, stage = %self.session.stage, "transition rejected");
        Err(AssessmentError::InvalidTransition {
            operation,
            stage: self.session.stage,
        })
    }

    fn advance(&mut self, stage: Stage, payload: Option<Payload>) {
        debug!(from = %self.session.stage, to = %stage, "stage advanced");
        self.session.stage = stage;
        self.presenter.present(&Notification { stage, payload });
    }
}

fn admit(role: Role, raw: &str) -> Result<Measurement, AssessmentError> {
    validate(role, raw).inspect_err(|err| warn!(%role, error = %err, "measurement rejected"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::Tier;

    fn stages(sequencer: &AssessmentSequencer) -> Vec<Stage> {
        sequencer.presenter().iter().map(|n| n.stage).collect()
    }

    #[test]
    fn weight_before_thickness_is_rejected() {
        let mut sequencer = AssessmentSequencer::default();
        let before = sequencer.session().clone();

        let err = sequencer.submit_weight("50").expect_err("must reject");
        assert_eq!(
            err,
            AssessmentError::InvalidTransition {
                operation: "submit_weight",
                stage: Stage::AwaitingThickness,
            }
        );
        assert_eq!(sequencer.session(), &before);
        assert!(sequencer.presenter().is_empty());
    }

    #[test]
    fn invalid_thickness_keeps_stage_and_allows_resubmission() {
        let mut sequencer = AssessmentSequencer::default();
        let err = sequencer.submit_thickness("0").expect_err("zero rejected");
        assert_eq!(err.kind(), "invalid_measurement");
        assert_eq!(sequencer.stage(), Stage::AwaitingThickness);
        assert!(sequencer.session().thickness().is_none());

        sequencer.submit_thickness("2.5").expect("resubmission accepted");
        assert_eq!(sequencer.stage(), Stage::AwaitingWeight);
    }

    #[test]
    fn invalid_weight_keeps_thickness() {
        let mut sequencer = AssessmentSequencer::default();
        sequencer.submit_thickness("2.5").expect("thickness");
        let before = sequencer.session().clone();

        assert!(sequencer.submit_weight("-4").is_err());
        assert_eq!(sequencer.session(), &before);
        assert_eq!(stages(&sequencer), vec![Stage::AwaitingWeight]);
    }

    #[test]
    fn low_score_flow_with_diagnosis() {
        let mut sequencer = AssessmentSequencer::default();
        sequencer.submit_thickness("1.5").expect("thickness");
        let result = sequencer.submit_weight("5").expect("weight");
        assert_eq!(result.total, 2);
        assert_eq!(result.tier, Tier::Low);
        assert_eq!(sequencer.stage(), Stage::Reported);

        let report = sequencer
            .request_diagnosis(true)
            .expect("diagnosis allowed")
            .expect("opted in");
        assert!(report.iter().all(|finding| finding.is_problem));
        assert_eq!(sequencer.stage(), Stage::Done);
        assert_eq!(
            stages(&sequencer),
            vec![
                Stage::AwaitingWeight,
                Stage::Scoring,
                Stage::Reported,
                Stage::Diagnosing,
                Stage::Done,
            ]
        );
    }

    #[test]
    fn declining_diagnosis_goes_straight_to_done() {
        let mut sequencer = AssessmentSequencer::default();
        sequencer.submit_thickness("1").expect("thickness");
        sequencer.submit_weight("1").expect("weight");

        let out = sequencer.request_diagnosis(false).expect("allowed");
        assert!(out.is_none());
        assert_eq!(sequencer.stage(), Stage::Done);
        assert!(sequencer.session().diagnosis().is_none());
        assert!(!stages(&sequencer).contains(&Stage::Diagnosing));
    }

    #[test]
    fn diagnosis_rejected_when_score_is_not_low() {
        let mut sequencer = AssessmentSequencer::default();
        sequencer.submit_thickness("2.5").expect("thickness");
        let result = sequencer.submit_weight("50").expect("weight");
        assert_eq!(result.total, 4);
        let before = sequencer.session().clone();

        let err = sequencer.request_diagnosis(true).expect_err("not offered");
        assert_eq!(err.kind(), "invalid_transition");
        assert_eq!(sequencer.session(), &before);
    }

    #[test]
    fn diagnosis_rejected_before_report() {
        let mut sequencer = AssessmentSequencer::default();
        assert!(sequencer.request_diagnosis(true).is_err());
        assert_eq!(sequencer.stage(), Stage::AwaitingThickness);
    }

    #[test]
    fn thickness_is_immutable_once_accepted() {
        let mut sequencer = AssessmentSequencer::default();
        sequencer.submit_thickness("1.5").expect("thickness");
        assert!(sequencer.submit_thickness("4").is_err());
        let stored = sequencer.session().thickness().expect("stored");
        assert!((stored.value() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn reset_after_done_clears_everything() {
        let mut sequencer = AssessmentSequencer::default();
        sequencer.submit_thickness("1.5").expect("thickness");
        sequencer.submit_weight("5").expect("weight");
        sequencer.request_diagnosis(true).expect("diagnosis");

        sequencer.reset();
        assert_eq!(sequencer.stage(), Stage::AwaitingThickness);
        assert_eq!(sequencer.session(), &AssessmentSession::default());
        let last = sequencer.presenter().last().expect("reset notification");
        assert_eq!(last.stage, Stage::AwaitingThickness);
        assert!(last.payload.is_none());
    }

    #[test]
    fn borrowed_presenter_receives_notifications() {
        let mut sink: Vec<Notification> = Vec::new();
        {
            let mut sequencer = AssessmentSequencer::new(&mut sink);
            sequencer.submit_thickness("4").expect("thickness");
            sequencer.submit_weight("90").expect("weight");
        }
        let scored = sink
            .iter()
            .find_map(|n| match n.payload {
                Some(Payload::Score(result)) => Some(result),
                _ => None,
            })
            .expect("score payload");
        assert_eq!(scored.tier, Tier::High);
    }
}
