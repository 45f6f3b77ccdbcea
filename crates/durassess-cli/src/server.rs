use std::io::{self, BufRead, Write};

use durassess_core::{AssessmentError, AssessmentSequencer, Notification};
use tracing::{debug, info, warn};

use crate::error::CliError;
use crate::protocol::{CommandRequest, CommandResponse, SessionSnapshot};

/// JSON-lines driver: one command per input line, one reply per command.
pub struct StdioServer {
    sequencer: AssessmentSequencer<Vec<Notification>>,
}

impl Default for StdioServer {
    fn default() -> Self {
        Self::new()
    }
}

impl StdioServer {
    pub fn new() -> Self {
        Self {
            sequencer: AssessmentSequencer::default(),
        }
    }

    pub fn handle_request(&mut self, request: CommandRequest) -> CommandResponse {
        debug!(?request, "handling command");
        let outcome: Result<(), AssessmentError> = match request {
            CommandRequest::SubmitThickness { value } => self
                .sequencer
                .submit_thickness(&value.to_input())
                .map(|_| ()),
            CommandRequest::SubmitWeight { value } => {
                self.sequencer.submit_weight(&value.to_input()).map(|_| ())
            }
            CommandRequest::RequestDiagnosis { wants } => {
                self.sequencer.request_diagnosis(wants).map(|_| ())
            }
            CommandRequest::Reset => {
                self.sequencer.reset();
                Ok(())
            }
            CommandRequest::Status => Ok(()),
        };

        let events = self.sequencer.presenter_mut().drain(..).collect::<Vec<_>>();
        let stage = self.sequencer.stage();
        match outcome {
            Ok(()) => CommandResponse::success(
                stage,
                events,
                SessionSnapshot::from(self.sequencer.session()),
            ),
            Err(err) => CommandResponse::rejected(stage, &err),
        }
    }

    /// Blank lines yield no reply.
    pub fn handle_line(&mut self, line: &str) -> Option<CommandResponse> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        let response = match serde_json::from_str::<CommandRequest>(trimmed) {
            Ok(request) => self.handle_request(request),
            Err(err) => {
                CommandResponse::error(None, "parse_error", format!("parse error: {err}"))
            }
        };
        Some(response)
    }

    pub fn serve<R: BufRead, W: Write>(
        &mut self,
        mut reader: R,
        writer: &mut W,
    ) -> Result<(), CliError> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let response = match std::str::from_utf8(&buf) {
                Ok(line) => self.handle_line(line),
                Err(err) => {
                    warn!(error = %err, "stdio line is not valid utf-8");
                    Some(CommandResponse::error(
                        None,
                        "parse_error",
                        format!("parse error: {err}"),
                    ))
                }
            };
            if let Some(response) = response {
                write_response(writer, &response)?;
            }
        }
        info!(stage = %self.sequencer.stage(), "stdio session closed");
        Ok(())
    }

    pub fn serve_stdio(&mut self) -> Result<(), CliError> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        self.serve(stdin.lock(), &mut stdout)
    }
}

fn write_response<W: Write>(writer: &mut W, response: &CommandResponse) -> Result<(), CliError> {
    let serialized = serde_json::to_string(response)?;
    writeln!(writer, "{serialized}")?;
    writer.flush()?;
    Ok(())
}
