// Data models module
// Serializable shapes shared by the store, services and command surface

pub mod ide;
pub mod language_stats;
pub mod launch;
pub mod project;

// Re-export all models for convenience
pub use ide::*;
pub use language_stats::*;
pub use launch::*;
pub use project::*;
