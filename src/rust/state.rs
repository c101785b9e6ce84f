use log::{debug, info, warn};

use crate::client::{ClientError, PredictionResult, Predictor};
use crate::features::{FeatureField, FeatureVector, PredictionRequest};
use crate::input::InputController;

/// Where the session is in its submit cycle. Exactly one is active.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Submitting { request: PredictionRequest },
    Success { result: PredictionResult },
    Failed { message: String },
}

impl InteractionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting { .. } => "submitting",
            Self::Success { .. } => "success",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Outcome of [`InteractionStateMachine::begin_submit`]
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitTicket {
    /// A submission is already in flight; nothing changed
    Busy,
    /// The inputs failed validation; the machine is now `Failed`
    Rejected(ClientError),
    /// The machine is now `Submitting`; the caller must send this request and
    /// report back through [`InteractionStateMachine::complete_submit`]
    Started(PredictionRequest),
}

/// What the presentation layer needs to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub inputs: &'a InputController,
    pub loading: bool,
    pub result: Option<&'a PredictionResult>,
    pub error: Option<&'a str>,
}

/// Sequences `Idle -> Submitting -> Success | Failed` for one user session.
///
/// At most one submission is in flight. Submitting again while `Submitting`
/// is a no-op, and completion is applied once. Inputs live outside the state
/// so edits survive every transition.
#[derive(Debug, Clone, Default)]
pub struct InteractionStateMachine {
    input: InputController,
    state: InteractionState,
}

impl InteractionStateMachine {
    pub fn new(input: InputController) -> Self {
        Self {
            input,
            state: InteractionState::Idle,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn input(&self) -> &InputController {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputController {
        &mut self.input
    }

    /// Applies a field edit. Allowed in every state, including while a
    /// request is in flight (the in-flight request is already frozen).
    pub fn on_field_change(&mut self, field: FeatureField, raw: &str) -> FeatureVector {
        self.input.on_field_change(field, raw)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, InteractionState::Submitting { .. })
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        let (result, error) = match &self.state {
            InteractionState::Success { result } => (Some(result), None),
            InteractionState::Failed { message } => (None, Some(message.as_str())),
            InteractionState::Idle | InteractionState::Submitting { .. } => (None, None),
        };
        Snapshot {
            inputs: &self.input,
            loading: self.is_submitting(),
            result,
            error,
        }
    }

    /// First half of a submit: gate, validate and enter `Submitting`.
    pub fn begin_submit(&mut self) -> SubmitTicket {
        if self.is_submitting() {
            debug!("Submit ignored, a prediction is already in flight");
            return SubmitTicket::Busy;
        }

        match self.input.vector().validate() {
            Ok(request) => {
                info!("Submitting prediction request");
                self.state = InteractionState::Submitting { request };
                SubmitTicket::Started(request)
            }
            Err(reason) => {
                let err = ClientError::ValidationError(reason);
                warn!("Submit rejected: {}", err);
                self.state = InteractionState::Failed { message: err.to_string() };
                SubmitTicket::Rejected(err)
            }
        }
    }

    /// Second half of a submit: record the outcome of the in-flight request.
    ///
    /// Returns `false` (and changes nothing) when no submission is in flight,
    /// so a stray or duplicate completion can never overwrite a later state.
    pub fn complete_submit(&mut self, outcome: Result<PredictionResult, ClientError>) -> bool {
        if !self.is_submitting() {
            debug!("Completion ignored in state {}", self.state.name());
            return false;
        }

        self.state = match outcome {
            Ok(result) => {
                info!("Prediction succeeded: {}", result.species);
                InteractionState::Success { result }
            }
            Err(err) => {
                warn!("Prediction failed: {}", err);
                InteractionState::Failed { message: err.to_string() }
            }
        };
        true
    }

    /// Runs a whole submit cycle against `predictor` and returns the new state.
    ///
    /// Drivers that must stay responsive while the request is pending should
    /// use [`begin_submit`](Self::begin_submit) and
    /// [`complete_submit`](Self::complete_submit) directly.
    pub async fn submit<P: Predictor>(&mut self, predictor: &P) -> &InteractionState {
        if let SubmitTicket::Started(request) = self.begin_submit() {
            let outcome = predictor.predict(&request).await;
            self.complete_submit(outcome);
        }
        &self.state
    }
}
