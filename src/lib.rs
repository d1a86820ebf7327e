pub mod config;
pub mod health;

pub use self::config::{load_config, ConfigError, WorkerConfig};
pub use health::{CheckResult, HealthCheckLoop, LoopState, Reporter, TracingReporter};
