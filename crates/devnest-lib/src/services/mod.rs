// Services module
// Scanning, statistics, detection and launching

pub mod classifier;
pub mod detector;
pub mod icon;
pub mod ide_catalog;
pub mod language_stats;
pub mod launcher;
pub mod platform;
pub mod preferences;
pub mod scanner;

pub use platform::Platform;
pub use preferences::PreferenceList;
pub use scanner::{CancelFlag, ScanOutcome};
