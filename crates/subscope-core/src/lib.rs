pub mod commands;
pub mod contracts;
pub mod detect;
pub mod error;
pub mod ingest;
pub mod knowledge;
pub mod model;
pub mod normalize;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{CoreError, CoreResult};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
