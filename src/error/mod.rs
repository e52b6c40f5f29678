mod app;
mod broker;
mod config;
mod validation;

pub use app::{AppError, AppResult};
pub use broker::BrokerError;
pub use config::ConfigError;
pub use validation::ValidationError;
