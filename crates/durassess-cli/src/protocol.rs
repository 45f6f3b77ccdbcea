use durassess_core::{
    AssessmentError, AssessmentSession, Notification, Role, ScoreResult, Stage,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CommandRequest {
    SubmitThickness { value: RawValue },
    SubmitWeight { value: RawValue },
    RequestDiagnosis { wants: bool },
    Reset,
    Status,
}

/// A measurement as typed by the user or sent as a JSON number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    pub fn to_input(&self) -> String {
        match self {
            Self::Number(v) => v.to_string(),
            Self::Text(v) => v.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<Notification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CommandError>,
}

#[derive(Debug, Serialize)]
pub struct CommandError {
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub thickness: Option<f64>,
    pub weight: Option<f64>,
    pub score: Option<ScoreResult>,
    pub diagnosis_offered: bool,
}

impl From<&AssessmentSession> for SessionSnapshot {
    fn from(session: &AssessmentSession) -> Self {
        Self {
            thickness: session.thickness().map(|m| m.value()),
            weight: session.weight().map(|m| m.value()),
            score: session.score(),
            diagnosis_offered: session.stage() == Stage::Reported
                && session.score().is_some_and(|s| s.diagnosis_offered()),
        }
    }
}

impl CommandResponse {
    pub fn success(stage: Stage, events: Vec<Notification>, session: SessionSnapshot) -> Self {
        Self {
            ok: true,
            stage: Some(stage),
            events,
            session: Some(session),
            error: None,
        }
    }

    pub fn error(stage: Option<Stage>, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            stage,
            events: Vec::new(),
            session: None,
            error: Some(CommandError {
                kind,
                role: None,
                message: message.into(),
            }),
        }
    }

    pub fn rejected(stage: Stage, err: &AssessmentError) -> Self {
        Self {
            ok: false,
            stage: Some(stage),
            events: Vec::new(),
            session: None,
            error: Some(CommandError {
                kind: err.kind(),
                role: err.role(),
                message: err.to_string(),
            }),
        }
    }
}
