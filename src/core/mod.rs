pub mod outcome;
pub mod request;

pub use outcome::{ExecutionOutcome, FailureKind};
pub use request::ExecutionRequest;
