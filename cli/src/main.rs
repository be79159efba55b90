use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, anyhow};
use clap::Parser;
use sweeper_core::*;

mod command;
mod render;

use command::Command;

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper in the terminal, alone or hot-seat", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Read mode, level, players and seed from a JSON file, flags given here take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// single or multi
    #[arg(short, long)]
    mode: Option<Mode>,

    /// easy, medium or hard
    #[arg(short, long)]
    level: Option<Level>,

    /// Player as NAME or NAME:#COLOR, repeat for every player
    #[arg(short, long = "player", value_parser = parse_player)]
    players: Vec<PlayerConfig>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

fn parse_player(arg: &str) -> std::result::Result<PlayerConfig, String> {
    let (name, color) = match arg.split_once(':') {
        Some((name, color)) => (name, Some(color.to_owned())),
        None => (arg, None),
    };
    if name.trim().is_empty() {
        return Err("player name cannot be empty".to_owned());
    }
    Ok(PlayerConfig {
        name: name.to_owned(),
        color,
    })
}

impl Args {
    fn session_config(&self) -> anyhow::Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("Could not read {}", path.display()))?;
                SessionConfig::from_json(&json)
                    .with_context(|| format!("Invalid session config in {}", path.display()))?
            }
            None => SessionConfig::default(),
        };

        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(level) = self.level {
            config.level = level;
        }
        if !self.players.is_empty() {
            config.players = self.players.clone();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

fn apply(session: &mut Session, command: Command) -> anyhow::Result<String> {
    Ok(match command {
        Command::Open(coords) => {
            let outcome = session.primary_action(coords)?;
            render::outcome(session, &outcome)
        }
        Command::Flag(coords) => match session.secondary_action(coords)? {
            MarkOutcome::Changed => String::new(),
            MarkOutcome::NoChange => "Cannot flag that cell".to_owned(),
        },
        Command::Start => {
            session.start_game()?;
            "Game started".to_owned()
        }
        Command::New => {
            session.new_game()?;
            "New board dealt".to_owned()
        }
        Command::Round => {
            session.new_round()?;
            format!("Round {}", session.round())
        }
        Command::Rank => render::ranking(session),
        Command::Reset => {
            session.back_to_setup();
            "Back to setup, type start to play".to_owned()
        }
        Command::Add { name, color } => {
            let id = session.add_player(&name, color.as_deref())?;
            format!("Added {} as player {}", name.trim(), id)
        }
        Command::Remove(name) => {
            let id = session
                .scoreboard()
                .players()
                .iter()
                .find(|player| player.name == name.trim())
                .map(|player| player.id)
                .ok_or_else(|| anyhow!("no player named {:?}", name))?;
            session.remove_player(id)?;
            format!("Removed {}", name.trim())
        }
        Command::Level(level) => {
            session.set_difficulty(level.difficulty())?;
            format!("Level set to {}", level)
        }
        Command::Help => command::HELP.to_owned(),
        Command::Quit => String::new(),
    })
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config = args.session_config()?;
    log::debug!("config: {:?}", config);
    let mut session = config.into_session().context("Could not set up the session")?;

    let mut out = io::stdout().lock();
    if session.mode() == Mode::Single || session.scoreboard().len() >= MIN_PLAYERS {
        session.start_game()?;
    } else {
        writeln!(
            out,
            "Add at least {} players with `add NAME`, then `start`",
            MIN_PLAYERS
        )?;
    }
    render::screen(&mut out, &session)?;

    for line in io::stdin().lock().lines() {
        let line = line.context("Could not read command")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{:#}", err)?;
                continue;
            }
        };
        log::trace!("command: {:?}", command);

        match apply(&mut session, command) {
            Ok(message) if message.is_empty() => {}
            Ok(message) => writeln!(out, "{}", message)?,
            Err(err) => writeln!(out, "error: {}", err)?,
        }
        render::screen(&mut out, &session)?;
    }

    log::debug!("bye");
    Ok(())
}
