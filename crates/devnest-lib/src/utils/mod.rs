// Utility functions module

pub mod config;
pub mod database;
pub mod entity_lock;
pub mod error;
pub mod path_resolver;
pub mod schema;
