use clap::{Args, ValueEnum};
use serde_json::Value;

use webtools_core::life_counter::{self, GameEvent, GameMode, LifeCounterInput};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Normal,
    Commander,
}

impl From<ModeArg> for GameMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Normal => GameMode::Normal,
            ModeArg::Commander => GameMode::Commander,
        }
    }
}

/// Arguments for the life counter
#[derive(Args)]
pub struct LifeArgs {
    /// Path to JSON input file: optional saved `game`, `mode`, `player_count`, `events`
    #[arg(long)]
    pub input: Option<String>,

    /// Game mode for a new game
    #[arg(long, value_enum, default_value = "normal")]
    pub mode: ModeArg,

    /// Number of players for a new game (2 to 6)
    #[arg(long, default_value_t = 2)]
    pub players: u32,

    /// Event to apply, as JSON (repeatable), e.g. '{"action":"adjust_life","player":1,"delta":-3}'
    #[arg(long = "event")]
    pub events: Vec<String>,
}

pub fn run_life(args: LifeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let game_input: LifeCounterInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if args.events.is_empty() {
        match input::stdin::read_stdin()? {
            Some(data) => serde_json::from_value(data)?,
            None => LifeCounterInput {
                game: None,
                mode: args.mode.into(),
                player_count: args.players,
                events: Vec::new(),
            },
        }
    } else {
        let events = args
            .events
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                serde_json::from_str::<GameEvent>(raw)
                    .map_err(|e| format!("--event #{}: {}", i + 1, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        LifeCounterInput {
            game: None,
            mode: args.mode.into(),
            player_count: args.players,
            events,
        }
    };

    let result = life_counter::run_game(&game_input)?;
    Ok(serde_json::to_value(result)?)
}
