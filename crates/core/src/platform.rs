//! Platform detection for command execution

use std::env;

/// Shell used to run command lines on the current platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellInfo {
    /// Program to invoke (e.g. "sh", "cmd")
    pub program: &'static str,
    /// Argument that introduces the command line (e.g. "-c", "/C")
    pub command_flag: &'static str,
}

impl ShellInfo {
    /// Detect the shell for the current platform
    pub fn current() -> Self {
        Self::from_os(env::consts::OS)
    }

    /// Shell for an OS name as reported by `std::env::consts::OS`
    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Self {
                program: "cmd",
                command_flag: "/C",
            },
            _ => Self {
                program: "sh",
                command_flag: "-c",
            },
        }
    }

    /// Exit code the shell reports when the program of a command line is missing
    pub fn not_found_exit_code(&self) -> i32 {
        match self.program {
            "cmd" => 9009,
            _ => 127,
        }
    }
}
