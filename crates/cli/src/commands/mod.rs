pub mod graph;
pub mod init;
pub mod list;
pub mod plan;
pub mod run;
pub mod schema;

/// Presentation flags shared by commands that run tasks
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub quiet: bool,
    pub dry_run: bool,
}
