use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use conmux_core::SupervisorCommand;

/// CLI for the conmux supervisor
#[derive(Parser, Debug)]
#[command(
    name = "conmux-supervisor",
    version,
    about = "Start, stop and query the conmux console servers"
)]
pub struct Cli {
    /// What to do with the console servers
    #[arg(value_enum, default_value_t = Command::Start)]
    pub command: Command,

    /// Installation root, overriding ~/.conmuxrc and $CONMUX
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// More diagnostics on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Start the registry and every configured console, restart changed ones
    /// and stop the ones no longer configured
    Start,
    /// Stop everything that is running
    Stop,
    /// Print one status line per console
    Status,
}

impl From<Command> for SupervisorCommand {
    fn from(command: Command) -> Self {
        match command {
            Command::Start => SupervisorCommand::Start,
            Command::Stop => SupervisorCommand::Stop,
            Command::Status => SupervisorCommand::Status,
        }
    }
}
