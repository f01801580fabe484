// Repository layer
// Data access over the SQLite store

pub mod ide_repo;
pub mod project_repo;

pub use ide_repo::IdeRepository;
pub use project_repo::ProjectRepository;
