//! CLI commands

mod graph;
mod init;
mod notes;
mod plan;
mod release;

pub use graph::GraphCommand;
pub use init::InitCommand;
pub use notes::NotesCommand;
pub use plan::PlanCommand;
pub use release::ReleaseCommand;
