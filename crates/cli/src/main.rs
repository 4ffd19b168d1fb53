use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use stint_core::presets::Preset;
use stint_core::workspace_manager::{Invocation, WorkspaceManager, WorkspaceManagerConfig};
use stint_core::StintError;

mod commands;

/// Stint - A task runner for project development workflows
#[derive(Parser)]
#[command(name = "stint")]
#[command(about = "Run named development tasks with prerequisites and variable overrides")]
#[command(version)]
#[command(subcommand_value_name = "TASK")]
#[command(subcommand_help_heading = "Commands (or a task name followed by NAME=value overrides)")]
struct Cli {
    /// Path to the workspace root (defaults to current directory)
    #[arg(short, long, default_value = ".", global = true)]
    workspace: PathBuf,

    /// Task configuration file (defaults to stint.yml, stint.yaml or stint.toml)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Use an embedded preset instead of a configuration file
    #[arg(long, global = true)]
    preset: Option<Preset>,

    /// Print the commands that would run without running them
    #[arg(short = 'n', long, global = true)]
    dry_run: bool,

    /// Do not echo commands or task headers
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Increase diagnostic logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Ignore process environment variables when resolving variables
    #[arg(long, global = true)]
    no_env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a task and its prerequisites
    Run {
        /// Task name followed by NAME=value variable overrides
        #[arg(required = true, value_name = "TASK | NAME=VALUE")]
        args: Vec<String>,
    },
    /// Show the commands a task would run, in order, without running them
    Plan {
        /// Task name (defaults to the configured default task) and overrides
        #[arg(value_name = "TASK | NAME=VALUE")]
        args: Vec<String>,
    },
    /// List tasks with their descriptions
    List {
        /// Include tasks without a description and show prerequisites
        #[arg(long)]
        all: bool,
    },
    /// Show the task dependency graph
    Graph,
    /// Print the JSON schema of the configuration format
    Schema,
    /// Write a preset configuration to stint.yml
    Init {
        /// Overwrite an existing stint.yml
        #[arg(long)]
        force: bool,
    },
    /// Any other word is a task name, optionally followed by NAME=value overrides
    #[command(external_subcommand)]
    Task(Vec<String>),
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("stint_core={level},stint_cli={level}")));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn load_manager(cli: &Cli) -> Result<WorkspaceManager> {
    let manager = WorkspaceManager::new(WorkspaceManagerConfig {
        workspace_root: cli.workspace.clone(),
        config_file: cli.file.clone(),
        preset: cli.preset,
        use_environment: !cli.no_env,
    })?;
    Ok(manager)
}

async fn execute(cli: Cli) -> Result<()> {
    let options = commands::OutputOptions {
        quiet: cli.quiet,
        dry_run: cli.dry_run,
    };

    match &cli.command {
        Some(Commands::Init { force }) => {
            commands::init::execute(&cli.workspace, cli.preset.unwrap_or_default(), *force)
        }
        Some(Commands::Schema) => commands::schema::execute(),
        Some(Commands::List { all }) => commands::list::execute(&load_manager(&cli)?, *all),
        Some(Commands::Graph) => commands::graph::execute(&load_manager(&cli)?),
        Some(Commands::Plan { args }) => {
            commands::plan::execute(&load_manager(&cli)?, &Invocation::parse(args)?)
        }
        Some(Commands::Run { args }) => {
            let invocation = Invocation::parse(args)?;
            commands::run::execute(&load_manager(&cli)?, &invocation, options).await
        }
        Some(Commands::Task(args)) => {
            let invocation = Invocation::parse(args)?;
            commands::run::execute(&load_manager(&cli)?, &invocation, options).await
        }
        None => {
            let invocation = Invocation::default();
            commands::run::execute(&load_manager(&cli)?, &invocation, options).await
        }
    }
}

/// Exit code for an error, propagating the failing command's own code
fn exit_code_for(err: &anyhow::Error) -> u8 {
    let code = err
        .downcast_ref::<StintError>()
        .map(StintError::exit_code)
        .unwrap_or(1);
    u8::try_from(code).ok().filter(|c| *c != 0).unwrap_or(1)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::from(exit_code_for(&err))
        }
    }
}
