use core::str::FromStr;

use anyhow::{Context, bail};
use sweeper_core::{Coord, Coord2, Level};

pub(crate) const HELP: &str = "\
commands:
  open ROW COL        reveal a cell (alias: o)
  flag ROW COL        toggle a flag (alias: f)
  start               leave setup and deal the first board
  new                 deal a new board, totals are kept
  round               next round (multiplayer)
  rank                show players by total score
  reset               back to setup, scores cleared
  add NAME [#COLOR]   add a player during setup
  remove NAME         remove a player during setup
  level LEVEL         easy, medium or hard, during setup
  help
  quit";

/// One line typed at the prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Open(Coord2),
    Flag(Coord2),
    Start,
    New,
    Round,
    Rank,
    Reset,
    Add { name: String, color: Option<String> },
    Remove(String),
    Level(Level),
    Help,
    Quit,
}

fn parse_coords<'a>(mut args: impl Iterator<Item = &'a str>) -> anyhow::Result<Coord2> {
    let (Some(row), Some(col), None) = (args.next(), args.next(), args.next()) else {
        bail!("expected ROW COL");
    };
    let row: Coord = row.parse().with_context(|| format!("bad row {row:?}"))?;
    let col: Coord = col.parse().with_context(|| format!("bad column {col:?}"))?;
    Ok((row, col))
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<Self> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            bail!("empty command");
        };

        Ok(match verb.to_ascii_lowercase().as_str() {
            "open" | "o" => Self::Open(parse_coords(words)?),
            "flag" | "f" => Self::Flag(parse_coords(words)?),
            "start" => Self::Start,
            "new" => Self::New,
            "round" => Self::Round,
            "rank" => Self::Rank,
            "reset" => Self::Reset,
            "add" => {
                let mut rest: Vec<&str> = words.collect();
                let color = if rest.last().is_some_and(|last| last.starts_with('#')) {
                    rest.pop().map(str::to_owned)
                } else {
                    None
                };
                Self::Add {
                    name: rest.join(" "),
                    color,
                }
            }
            "remove" => Self::Remove(words.collect::<Vec<_>>().join(" ")),
            "level" => {
                let level = words.next().context("expected a level")?;
                Self::Level(level.parse().map_err(anyhow::Error::msg)?)
            }
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => bail!("unknown command {other:?}, try help"),
        })
    }
}
