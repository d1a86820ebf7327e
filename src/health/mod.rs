mod checker;
mod reporter;
mod status;

pub use checker::{HealthCheckLoop, LoopState};
pub use reporter::{Reporter, TracingReporter};
pub use status::CheckResult;
