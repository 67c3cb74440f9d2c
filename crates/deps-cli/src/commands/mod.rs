pub mod deps;
pub mod dispatch;
pub mod ingest;
pub mod projects;
pub mod versions;
