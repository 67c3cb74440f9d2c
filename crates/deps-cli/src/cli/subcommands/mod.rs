mod deps;
mod projects;

pub use deps::DepsCommands;
pub use projects::ProjectsCommands;
