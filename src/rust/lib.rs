//! An interactive client for a remote iris species classification service.
//!
//! The crate covers one round-trip: edit four measurements, submit them to
//! `POST {base_url}/api/predict`, and render the predicted species with its
//! probability distribution.
//!
//! # Basic Usage
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use iris_predict::{
//!     ClientConfig, FeatureField, InteractionStateMachine, InteractionState, PredictionClient,
//! };
//!
//! let client = PredictionClient::new(&ClientConfig::from_env())?;
//! let mut session = InteractionStateMachine::default();
//! session.on_field_change(FeatureField::PetalLength, "4.7");
//!
//! match session.submit(&client).await {
//!     InteractionState::Success { result } => println!("Predicted species: {}", result.species),
//!     InteractionState::Failed { message } => eprintln!("{}", message),
//!     _ => {}
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! A session is single-threaded and owned by one driver. At most one request
//! is in flight: [`InteractionStateMachine::begin_submit`] refuses to start a
//! second one until [`InteractionStateMachine::complete_submit`] has recorded
//! the first.

pub mod client;
pub mod config;
pub mod features;
pub mod input;
pub mod presenter;
pub mod shell;
pub mod state;
pub mod view;

pub use client::{ClientError, PredictionClient, PredictionResult, Predictor, Probabilities};
pub use config::{ClientConfig, ConfigError};
pub use features::{FeatureField, FeatureVector, FieldParseError, FieldValue, PredictionRequest};
pub use input::InputController;
pub use presenter::{present, ProbabilityBar};
pub use state::{InteractionState, InteractionStateMachine, Snapshot, SubmitTicket};

/// Initializes `env_logger` with a `warn` default, overridable through `RUST_LOG`
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).try_init();
}
