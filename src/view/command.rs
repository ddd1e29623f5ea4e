//! Line commands for the terminal dashboard.
//!
//! ```text
//! origins Union Station; Bay St / College St
//! days Monday, Tuesday        (or: days all | days none)
//! duration 5 20
//! show | summary | stations | help | quit
//! ```

use crate::dataset::{DAYS_OF_WEEK, parse_day};
use crate::view::controls::{ControlEvent, DurationRange};
use crate::view::dashboard::Dashboard;
use crate::view::render::Renderer;
use anyhow::{Context, Result, anyhow, bail};
use std::io::Write;

pub const HELP: &str = "\
commands:
  origins NAME[; NAME...]   select up to 5 origin stations (empty clears)
  days DAY[, DAY...]        select days by name, or 'all' / 'none'
  duration MIN MAX          trip duration range in minutes (5-60, step 5)
  show                      redraw the map
  summary                   redraw the summary table
  stations                  list origin stations
  help                      show this message
  quit                      exit
";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Control(ControlEvent),
    Show,
    Summary,
    Stations,
    Help,
    Quit,
}

/// Whether the dispatcher should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Parses one input line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match word.to_ascii_lowercase().as_str() {
        "origins" | "origin" => Command::Control(ControlEvent::SelectOrigins(
            rest.split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )),
        "days" | "day" => Command::Control(ControlEvent::SelectDays(parse_days(rest)?)),
        "duration" => Command::Control(ControlEvent::SetDuration(parse_duration(rest)?)),
        "show" => Command::Show,
        "summary" => Command::Summary,
        "stations" => Command::Stations,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("unknown command '{other}', try 'help'"),
    };
    Ok(Some(command))
}

fn parse_days(rest: &str) -> Result<Vec<chrono::Weekday>> {
    match rest.to_ascii_lowercase().as_str() {
        "all" => return Ok(DAYS_OF_WEEK.to_vec()),
        "none" | "" => return Ok(Vec::new()),
        _ => {}
    }
    rest.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| parse_day(s).ok_or_else(|| anyhow!("unknown day '{s}'")))
        .collect()
}

fn parse_duration(rest: &str) -> Result<DurationRange> {
    let parts: Vec<&str> = rest
        .split(|c: char| c == '-' || c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();
    let [min, max] = parts.as_slice() else {
        bail!("expected 'duration MIN MAX', got '{rest}'");
    };
    let min = min.parse::<u32>().with_context(|| format!("invalid minimum '{min}'"))?;
    let max = max.parse::<u32>().with_context(|| format!("invalid maximum '{max}'"))?;
    Ok(DurationRange::new(min, max))
}

/// Runs one command against the dashboard, writing user-facing messages to `out`.
///
/// Rejected control changes are reported to `out` and do not end the session.
pub fn dispatch<R: Renderer, W: Write>(
    dashboard: &mut Dashboard<R>,
    command: Command,
    out: &mut W,
) -> Result<Flow> {
    match command {
        Command::Control(event) => {
            if let Err(e) = dashboard.handle(event) {
                writeln!(out, "error: {e}")?;
            }
        }
        Command::Show => dashboard.redraw(),
        Command::Summary => dashboard.redraw_summary(),
        Command::Stations => {
            for name in dashboard.origin_options() {
                writeln!(out, "{name}")?;
            }
        }
        Command::Help => write!(out, "{HELP}")?,
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}
