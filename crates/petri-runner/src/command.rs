//! Line commands read from stdin.

use petri_core::Phase;
use petri_world::{SimulationController, StartOutcome};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

pub const HELP: &str = "\
commands:
  start            start growing
  pause            stop growing
  toggle           start or pause
  reset            stop and clear the grid
  cell X Y         flip the cell at column X, row Y
  interval MS      set the growth interval in milliseconds
  size N           resize the grid to N x N (clears it)
  state            print the current state as JSON
  help             show this message
  quit             exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Toggle,
    Reset,
    Cell { x: i32, y: i32 },
    Interval(u64),
    Size(u32),
    State,
    Help,
    Quit,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),

    #[error("'{command}' expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("invalid {name} '{value}'")]
    InvalidArgument { name: &'static str, value: String },

    #[error("unexpected input '{0}'")]
    Trailing(String),

    #[error("failed to encode state: {0}")]
    Snapshot(#[from] serde_json::Error),
}

fn argument<'a, T: FromStr>(
    args: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
    name: &'static str,
    expected: &'static str,
) -> Result<T, CommandError> {
    let raw = args
        .next()
        .ok_or(CommandError::MissingArgument { command, expected })?;
    raw.parse().map_err(|_| CommandError::InvalidArgument {
        name,
        value: raw.to_string(),
    })
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?;

        let command = match name.to_ascii_lowercase().as_str() {
            "start" => Command::Start,
            "pause" => Command::Pause,
            "toggle" => Command::Toggle,
            "reset" => Command::Reset,
            "cell" => Command::Cell {
                x: argument(&mut words, "cell", "column", "a column and a row")?,
                y: argument(&mut words, "cell", "row", "a column and a row")?,
            },
            "interval" => Command::Interval(argument(
                &mut words,
                "interval",
                "interval",
                "a duration in milliseconds",
            )?),
            "size" => Command::Size(argument(&mut words, "size", "grid size", "a grid size")?),
            "state" => Command::State,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        if let Some(extra) = words.next() {
            return Err(CommandError::Trailing(extra.to_string()));
        }
        Ok(command)
    }
}

impl Command {
    /// Apply the command and describe the result for the user
    pub fn execute(&self, controller: &SimulationController) -> Result<String, CommandError> {
        debug!(command = ?self, "Executing command");

        let reply = match *self {
            Command::Start => match controller.start() {
                StartOutcome::Started => "started".to_string(),
                StartOutcome::AlreadyRunning => "already running".to_string(),
                StartOutcome::AlreadyFull => {
                    "grid is already full; reset or resize to grow again".to_string()
                }
            },
            Command::Pause => {
                controller.pause();
                "paused".to_string()
            }
            Command::Toggle => match controller.toggle_running() {
                Phase::Running => "started".to_string(),
                Phase::Idle => "paused".to_string(),
            },
            Command::Reset => {
                controller.reset();
                "reset".to_string()
            }
            Command::Cell { x, y } => match controller.toggle_cell(x, y) {
                Some(true) => format!("cell ({x},{y}) occupied"),
                Some(false) => format!("cell ({x},{y}) cleared"),
                None => {
                    let size = controller.state().config.grid_size;
                    format!("cell ({x},{y}) is outside the {size}x{size} grid")
                }
            },
            Command::Interval(ms) => {
                let applied = controller.set_growth_interval(ms);
                format!("growth interval {applied} ms")
            }
            Command::Size(size) => {
                let applied = controller.set_grid_size(size);
                format!("grid size {applied}x{applied}")
            }
            Command::State => serde_json::to_string_pretty(&controller.state())?,
            Command::Help => HELP.to_string(),
            Command::Quit => "bye".to_string(),
        };
        Ok(reply)
    }
}
