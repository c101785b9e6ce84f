mod error;
mod result;
mod client;

pub use error::ClientError;
pub use result::{PredictionResult, Probabilities};
pub use client::{PredictionClient, Predictor};
