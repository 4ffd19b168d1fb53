//! Command execution utilities
//!
//! This module runs resolved commands one at a time: shell lines through the
//! platform shell, removals natively. Consistent error mapping lives here so
//! the runner only has to decide whether to continue.

use std::path::Path;
use std::process::ExitStatus;

use colored::*;
use tokio::process::Command;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::execution::remove::remove_artifacts;
use crate::platform::ShellInfo;
use crate::task_execution::ResolvedCommand;
use crate::types::{StintError, StintResult};

/// Exit code of a finished child, following the shell convention for signals
fn exit_code(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

/// Ctrl-C notification shared by every command of a run
#[derive(Debug, Clone)]
pub struct Interrupt {
    receiver: watch::Receiver<bool>,
}

impl Interrupt {
    pub fn new(receiver: watch::Receiver<bool>) -> Self {
        Self { receiver }
    }

    /// An interrupt that never fires
    pub fn never() -> Self {
        let (_sender, receiver) = watch::channel(false);
        Self { receiver }
    }

    pub fn is_triggered(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once the interrupt fires; pending forever if it cannot
    async fn triggered(&mut self) {
        if self.receiver.wait_for(|fired| *fired).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Process-wide Ctrl-C listener, active until dropped
pub struct InterruptListener {
    receiver: watch::Receiver<bool>,
    handle: JoinHandle<()>,
}

impl InterruptListener {
    pub fn ctrl_c() -> Self {
        let (sender, receiver) = watch::channel(false);
        let handle = tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    debug!("received Ctrl-C");
                    let _ = sender.send(true);
                }
                Err(e) => warn!(error = %e, "unable to listen for Ctrl-C"),
            }
        });
        Self { receiver, handle }
    }

    pub fn interrupt(&self) -> Interrupt {
        Interrupt::new(self.receiver.clone())
    }
}

impl Drop for InterruptListener {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Executes the commands of one task
pub struct CommandExecutor<'a> {
    workspace_root: &'a Path,
    task_name: &'a str,
    shell: ShellInfo,
    echo: bool,
    interrupt: Interrupt,
}

impl<'a> CommandExecutor<'a> {
    pub fn new(workspace_root: &'a Path, task_name: &'a str) -> Self {
        Self {
            workspace_root,
            task_name,
            shell: ShellInfo::current(),
            echo: true,
            interrupt: Interrupt::never(),
        }
    }

    /// Stop at Ctrl-C as reported by `interrupt`
    pub fn interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Print each command line before running it
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub async fn execute(&self, command: &ResolvedCommand) -> StintResult<()> {
        if self.interrupt.is_triggered() {
            return Err(StintError::Interrupted {
                task: self.task_name.to_string(),
                command: command.to_string(),
            });
        }

        match command {
            ResolvedCommand::Shell {
                line,
                ignore_errors,
            } => self.execute_shell_command(line, *ignore_errors).await,
            ResolvedCommand::Remove { patterns } => {
                self.remove(patterns);
                Ok(())
            }
        }
    }

    /// Run a single shell line, waiting for it or for Ctrl-C
    pub async fn execute_shell_command(&self, line: &str, ignore_errors: bool) -> StintResult<()> {
        if self.echo {
            println!("{}", line.bright_black());
        }

        let mut command = Command::new(self.shell.program);
        command
            .arg(self.shell.command_flag)
            .arg(line)
            .current_dir(self.workspace_root)
            .env("STINT_TASK", self.task_name)
            .kill_on_drop(true);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StintError::ToolNotFound {
                    task: self.task_name.to_string(),
                    command: format!("{} ({})", line, e),
                });
            }
            Err(e) => return Err(StintError::Io(e)),
        };

        let mut interrupt = self.interrupt.clone();
        let status = tokio::select! {
            status = child.wait() => status?,
            _ = interrupt.triggered() => {
                if let Err(e) = child.kill().await {
                    warn!(error = %e, "failed to stop interrupted command");
                }
                return Err(StintError::Interrupted {
                    task: self.task_name.to_string(),
                    command: line.to_string(),
                });
            }
        };

        if status.success() {
            return Ok(());
        }

        let code = exit_code(&status);
        if ignore_errors {
            debug!(task = %self.task_name, code, "ignoring failed command: {}", line);
            println!(
                "{} {}",
                "!".yellow().bold(),
                format!("'{}' failed with exit code {} (ignored)", line, code).yellow()
            );
            return Ok(());
        }

        if code == self.shell.not_found_exit_code() {
            return Err(StintError::ToolNotFound {
                task: self.task_name.to_string(),
                command: line.to_string(),
            });
        }

        Err(StintError::CommandFailed {
            task: self.task_name.to_string(),
            command: line.to_string(),
            code,
        })
    }

    /// Remove artifacts; never fails, problems are logged as warnings
    fn remove(&self, patterns: &[String]) {
        if self.echo {
            println!("{}", format!("remove {}", patterns.join(" ")).bright_black());
        }

        let outcome = remove_artifacts(self.workspace_root, patterns);
        debug!(
            task = %self.task_name,
            removed = outcome.removed.len(),
            missing = outcome.missing.len(),
            failed = outcome.failed.len(),
            "removal finished"
        );
        for path in &outcome.removed {
            debug!(path = %path.display(), "removed artifact");
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_command() {
        let temp_dir = tempfile::tempdir().unwrap();
        let executor = CommandExecutor::new(temp_dir.path(), "touch").echo(false);
        executor
            .execute_shell_command("touch marker", false)
            .await
            .unwrap();
        assert!(temp_dir.path().join("marker").exists());
    }

    #[tokio::test]
    async fn test_failure_carries_exit_code() {
        let temp_dir = tempfile::tempdir().unwrap();
        let executor = CommandExecutor::new(temp_dir.path(), "fail").echo(false);
        let err = executor
            .execute_shell_command("exit 3", false)
            .await
            .unwrap_err();
        assert!(matches!(err, StintError::CommandFailed { code: 3, .. }));
    }

    #[tokio::test]
    async fn test_missing_tool() {
        let temp_dir = tempfile::tempdir().unwrap();
        let executor = CommandExecutor::new(temp_dir.path(), "lint").echo(false);
        let err = executor
            .execute_shell_command("definitely-not-a-real-tool-stint --version", false)
            .await
            .unwrap_err();
        assert!(matches!(err, StintError::ToolNotFound { .. }));
        assert_eq!(err.exit_code(), 127);
    }

    #[tokio::test]
    async fn test_ignored_failure() {
        let temp_dir = tempfile::tempdir().unwrap();
        let executor = CommandExecutor::new(temp_dir.path(), "clean").echo(false);
        executor.execute_shell_command("exit 1", true).await.unwrap();
    }

    #[tokio::test]
    async fn test_interrupt_stops_running_command() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (sender, receiver) = watch::channel(false);
        let executor = CommandExecutor::new(temp_dir.path(), "slow")
            .echo(false)
            .interrupt(Interrupt::new(receiver));

        let trigger = async {
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            sender.send(true).unwrap();
        };
        let (result, ()) = tokio::join!(
            executor.execute_shell_command("sleep 30; touch finished", false),
            trigger
        );

        let err = result.unwrap_err();
        assert!(matches!(err, StintError::Interrupted { .. }));
        assert_eq!(err.exit_code(), 130);
        assert!(!temp_dir.path().join("finished").exists());
    }

    #[tokio::test]
    async fn test_interrupt_before_removal() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp_dir.path().join("dist")).unwrap();
        let (_sender, receiver) = watch::channel(true);
        let executor = CommandExecutor::new(temp_dir.path(), "clean")
            .echo(false)
            .interrupt(Interrupt::new(receiver));

        let err = executor
            .execute(&ResolvedCommand::Remove {
                patterns: vec!["dist".to_string()],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StintError::Interrupted { .. }));
        assert!(temp_dir.path().join("dist").exists());
    }

    #[tokio::test]
    async fn test_task_name_exported() {
        let temp_dir = tempfile::tempdir().unwrap();
        let executor = CommandExecutor::new(temp_dir.path(), "docs").echo(false);
        executor
            .execute_shell_command("test \"$STINT_TASK\" = docs", false)
            .await
            .unwrap();
    }
}
