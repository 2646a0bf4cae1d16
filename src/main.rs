use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use stagehand::script::{ScriptConfig, ScriptMachine};
use stagehand::{Automaton, ChildSpec, LaunchMode, PassiveAutomaton};

/// Supervise a child process and script its I/O.
#[derive(Debug, Parser)]
#[command(name = "stagehand", version)]
struct Cli {
    /// Attach the child to a pseudo-terminal instead of plain pipes.
    #[arg(long)]
    pty: bool,

    /// TOML script driving the child through its output lines.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Child command and its arguments.
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        required = true,
        value_name = "COMMAND"
    )]
    command: Vec<String>,
}

fn main() {
    // Diagnostics go to stderr and default to warn so the child's
    // passthrough stream stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(exit) => std::process::exit(exit),
        Err(err) => {
            eprintln!("stagehand: {err}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let automaton: Box<dyn Automaton> = match &cli.script {
        Some(path) => {
            let config = ScriptConfig::load(path)?;
            Box::new(ScriptMachine::new(&config)?)
        }
        None => Box::new(PassiveAutomaton),
    };

    let spec = ChildSpec::new(&cli.command[0]).args(cli.command[1..].iter().cloned());
    let mode = if cli.pty {
        LaunchMode::Pty
    } else {
        LaunchMode::Direct
    };

    Ok(stagehand::run(&spec, automaton, mode)?)
}
