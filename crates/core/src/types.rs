use thiserror::Error;

/// Exit code used for configuration, usage and unknown-task errors
pub const EXIT_USAGE: i32 = 2;
/// Exit code reported when a command's program could not be found
pub const EXIT_TOOL_NOT_FOUND: i32 = 127;
/// Exit code reported when execution was interrupted by the user
pub const EXIT_INTERRUPTED: i32 = 130;

/// The main error type for stint operations
#[derive(Debug, Error)]
pub enum StintError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Task '{0}' not found")]
    TaskNotFound(String),

    #[error("Variable '{name}' is referenced but never defined (in {context})")]
    UndefinedVariable { name: String, context: String },

    #[error("Required tool not found while running task '{task}': {command}")]
    ToolNotFound { task: String, command: String },

    #[error("Command '{command}' in task '{task}' failed with exit code {code}")]
    CommandFailed {
        task: String,
        command: String,
        code: i32,
    },

    #[error("Interrupted while running '{command}' in task '{task}'")]
    Interrupted { task: String, command: String },
}

impl StintError {
    /// Process exit code that should be reported for this error.
    ///
    /// A failing command propagates its own exit code; everything that stops
    /// the runner before a command could run maps to [`EXIT_USAGE`].
    pub fn exit_code(&self) -> i32 {
        match self {
            StintError::CommandFailed { code, .. } => *code,
            StintError::ToolNotFound { .. } => EXIT_TOOL_NOT_FOUND,
            StintError::Interrupted { .. } => EXIT_INTERRUPTED,
            StintError::Io(_) => 1,
            StintError::Yaml(_)
            | StintError::Toml(_)
            | StintError::Config(_)
            | StintError::TaskNotFound(_)
            | StintError::UndefinedVariable { .. } => EXIT_USAGE,
        }
    }
}

/// Result type alias for stint operations
pub type StintResult<T> = Result<T, StintError>;
