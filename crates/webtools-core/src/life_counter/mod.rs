//! Life, counter, and commander-damage tracking for a card-game table of two
//! to six players.

pub mod game;

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::WebToolsError;
use crate::types::{with_metadata, ComputationOutput};
use crate::WebToolsResult;

pub use game::{
    CounterKind, Counters, EliminationReason, Game, GameEvent, GameMode, Player, PlayerId,
};

fn default_player_count() -> u32 {
    2
}

/// Start (or resume) a game and replay a sequence of events on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifeCounterInput {
    /// Saved game to continue; a fresh game is created when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game: Option<Game>,
    #[serde(default)]
    pub mode: GameMode,
    #[serde(default = "default_player_count")]
    pub player_count: u32,
    #[serde(default)]
    pub events: Vec<GameEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStanding {
    pub id: PlayerId,
    pub name: String,
    pub life: i32,
    pub poison: u32,
    pub monarch: bool,
    pub eliminated: bool,
    pub reasons: Vec<EliminationReason>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifeCounterOutput {
    pub standings: Vec<PlayerStanding>,
    /// Last player standing once everyone else is eliminated.
    pub winner: Option<PlayerId>,
    pub events_applied: usize,
    pub game: Game,
}

pub fn run_game(input: &LifeCounterInput) -> WebToolsResult<ComputationOutput<LifeCounterOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let mut game = match &input.game {
        Some(saved) => {
            saved.validate().map_err(|e| match e {
                WebToolsError::InvalidInput { field, reason } => WebToolsError::InvalidInput {
                    field: format!("game.{field}"),
                    reason,
                },
                other => other,
            })?;
            saved.clone()
        }
        None => Game::new(input.mode, input.player_count)?,
    };

    for (i, event) in input.events.iter().enumerate() {
        game.apply(event).map_err(|e| match e {
            WebToolsError::InvalidInput { field, reason } => WebToolsError::InvalidInput {
                field: format!("events[{i}].{field}"),
                reason,
            },
            other => other,
        })?;
    }

    let standings: Vec<PlayerStanding> = game
        .active_players()
        .iter()
        .map(|p| {
            let reasons = game.elimination_reasons(p);
            PlayerStanding {
                id: p.id,
                name: p.name.clone(),
                life: p.life,
                poison: p.counters.poison,
                monarch: game.monarch == Some(p.id),
                eliminated: !reasons.is_empty(),
                reasons,
            }
        })
        .collect();

    let alive: Vec<&PlayerStanding> = standings.iter().filter(|s| !s.eliminated).collect();
    let winner = match alive.as_slice() {
        [last] => Some(last.id),
        _ => None,
    };
    if alive.is_empty() {
        warnings.push("Every player has been eliminated; the game is a draw".into());
    }

    let output = LifeCounterOutput {
        standings,
        winner,
        events_applied: input.events.len(),
        game,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Event replay over table state (life ≤ 0, 10 poison, or 21 commander damage eliminates)",
        &serde_json::json!({
            "resumed": input.game.is_some(),
            "mode": output.game.mode,
            "player_count": output.game.player_count,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winner_is_last_standing() {
        let out = run_game(&LifeCounterInput {
            game: None,
            mode: GameMode::Normal,
            player_count: 2,
            events: vec![GameEvent::AdjustLife {
                player: 2,
                delta: -20,
            }],
        })
        .unwrap()
        .result;
        assert_eq!(out.winner, Some(1));
        assert!(out.standings[1].eliminated);
    }

    #[test]
    fn test_no_winner_mid_game() {
        let out = run_game(&LifeCounterInput {
            game: None,
            mode: GameMode::Commander,
            player_count: 4,
            events: vec![],
        })
        .unwrap()
        .result;
        assert_eq!(out.winner, None);
        assert_eq!(out.standings.len(), 4);
    }

    #[test]
    fn test_bad_event_names_its_index() {
        let err = run_game(&LifeCounterInput {
            game: None,
            mode: GameMode::Normal,
            player_count: 2,
            events: vec![
                GameEvent::AdjustLife {
                    player: 1,
                    delta: -1,
                },
                GameEvent::SetMonarch { player: 6 },
            ],
        })
        .unwrap_err();
        assert!(err.to_string().contains("events[1].player"));
    }

    #[test]
    fn test_malformed_saved_game_is_rejected() {
        let saved = Game::new(GameMode::Normal, 4).unwrap();
        let cases: Vec<(Game, &str)> = vec![
            (Game { player_count: 1, ..saved.clone() }, "game.player_count"),
            (Game { player_count: 9, ..saved.clone() }, "game.player_count"),
            (Game { starting_life: 0, ..saved.clone() }, "game.starting_life"),
            (Game { monarch: Some(5), ..saved.clone() }, "game.monarch"),
            (
                Game {
                    players: saved.players[..3].to_vec(),
                    ..saved.clone()
                },
                "game.players",
            ),
        ];

        for (game, field) in cases {
            let err = run_game(&LifeCounterInput {
                game: Some(game),
                mode: GameMode::Normal,
                player_count: 2,
                events: vec![],
            })
            .unwrap_err();
            assert!(err.to_string().contains(field), "{field}: {err}");
        }
    }

    #[test]
    fn test_saved_single_player_game_declares_no_winner() {
        let mut saved = Game::new(GameMode::Normal, 2).unwrap();
        saved.player_count = 1;
        let result = run_game(&LifeCounterInput {
            game: Some(saved),
            mode: GameMode::Normal,
            player_count: 2,
            events: vec![],
        });
        assert!(matches!(result, Err(WebToolsError::InvalidInput { .. })));
    }

    #[test]
    fn test_resume_saved_game() {
        let first = run_game(&LifeCounterInput {
            game: None,
            mode: GameMode::Normal,
            player_count: 3,
            events: vec![GameEvent::SetMonarch { player: 3 }],
        })
        .unwrap()
        .result;

        let second = run_game(&LifeCounterInput {
            game: Some(first.game),
            mode: GameMode::Normal,
            player_count: 2,
            events: vec![GameEvent::AdjustLife {
                player: 3,
                delta: -2,
            }],
        })
        .unwrap()
        .result;
        assert_eq!(second.standings.len(), 3);
        assert_eq!(second.standings[2].life, 18);
        assert!(second.standings[2].monarch);
    }
}
