// DevNest core library
// Project registry, language statistics, IDE catalog and launcher

pub mod commands;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;

// Re-export models for use by front ends
pub use models::*;

pub use commands::AppState;
pub use services::scanner::CancelFlag;
pub use utils::config::AppConfig;
pub use utils::error::{DevNestError, ErrorCode, Result};
