use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::WebToolsError;
use crate::WebToolsResult;

/// Seats at the table; `player_count` of them are in play.
pub const MAX_PLAYERS: u32 = 6;
pub const MIN_PLAYERS: u32 = 2;

pub const LETHAL_POISON: u32 = 10;
pub const LETHAL_COMMANDER_DAMAGE: u32 = 21;

pub type PlayerId = u32;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    Normal,
    Commander,
}

impl GameMode {
    pub fn starting_life(self) -> i32 {
        match self {
            GameMode::Normal => 20,
            GameMode::Commander => 40,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterKind {
    Poison,
    Energy,
    Experience,
    Commander,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub poison: u32,
    pub energy: u32,
    pub experience: u32,
    pub commander: u32,
}

impl Counters {
    fn slot(&mut self, kind: CounterKind) -> &mut u32 {
        match kind {
            CounterKind::Poison => &mut self.poison,
            CounterKind::Energy => &mut self.energy,
            CounterKind::Experience => &mut self.experience,
            CounterKind::Commander => &mut self.commander,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub life: i32,
    pub counters: Counters,
    /// Damage taken from each opposing commander, keyed by source player.
    #[serde(default)]
    pub commander_damage: BTreeMap<PlayerId, u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum GameEvent {
    AdjustLife {
        player: PlayerId,
        delta: i32,
    },
    AdjustCounter {
        player: PlayerId,
        counter: CounterKind,
        delta: i32,
    },
    AdjustCommanderDamage {
        from: PlayerId,
        to: PlayerId,
        delta: i32,
    },
    SetMonarch {
        player: PlayerId,
    },
    ClearMonarch,
    Rename {
        player: PlayerId,
        name: String,
    },
    SetPlayerCount {
        count: u32,
    },
    SetStartingLife {
        life: i32,
    },
    ChangeMode {
        mode: GameMode,
    },
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EliminationReason {
    LifeDepleted,
    Poisoned,
    CommanderDamage { from: PlayerId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub mode: GameMode,
    pub starting_life: i32,
    pub player_count: u32,
    pub players: Vec<Player>,
    #[serde(default)]
    pub monarch: Option<PlayerId>,
}

impl Game {
    pub fn new(mode: GameMode, player_count: u32) -> WebToolsResult<Self> {
        check_player_count(player_count)?;
        let starting_life = mode.starting_life();
        let players = (1..=MAX_PLAYERS)
            .map(|id| Player {
                id,
                name: format!("Player {id}"),
                life: starting_life,
                counters: Counters::default(),
                commander_damage: BTreeMap::new(),
            })
            .collect();
        Ok(Game {
            mode,
            starting_life,
            player_count,
            players,
            monarch: None,
        })
    }

    /// Check a game that came from outside (e.g. a saved game being resumed)
    /// against the invariants `new` and `apply` maintain.
    pub fn validate(&self) -> WebToolsResult<()> {
        check_player_count(self.player_count)?;
        check_starting_life(self.starting_life)?;
        let seats_in_order = self.players.len() == MAX_PLAYERS as usize
            && self.players.iter().zip(1..=MAX_PLAYERS).all(|(p, id)| p.id == id);
        if !seats_in_order {
            return Err(WebToolsError::invalid(
                "players",
                format!("A game has exactly {MAX_PLAYERS} seats with ids 1..={MAX_PLAYERS} in order"),
            ));
        }
        if let Some(m) = self.monarch {
            self.player(m).map_err(|_| {
                WebToolsError::invalid("monarch", format!("Monarch {m} is not an active player"))
            })?;
        }
        for p in &self.players {
            if let Some(from) = p
                .commander_damage
                .keys()
                .find(|&&from| from == p.id || !(1..=MAX_PLAYERS).contains(&from))
            {
                return Err(WebToolsError::invalid(
                    "commander_damage",
                    format!("Player {} has commander damage from invalid source {from}", p.id),
                ));
            }
        }
        Ok(())
    }

    /// Players currently seated in the game.
    pub fn active_players(&self) -> &[Player] {
        let n = (self.player_count as usize).min(self.players.len());
        &self.players[..n]
    }

    pub fn player(&self, id: PlayerId) -> WebToolsResult<&Player> {
        self.active_players()
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| unknown_player(id, self.player_count))
    }

    fn player_mut(&mut self, id: PlayerId) -> WebToolsResult<&mut Player> {
        let count = self.player_count;
        self.players
            .iter_mut()
            .take(count as usize)
            .find(|p| p.id == id)
            .ok_or_else(|| unknown_player(id, count))
    }

    pub fn apply(&mut self, event: &GameEvent) -> WebToolsResult<()> {
        match event {
            GameEvent::AdjustLife { player, delta } => {
                let p = self.player_mut(*player)?;
                p.life = p.life.saturating_add(*delta);
            }
            GameEvent::AdjustCounter {
                player,
                counter,
                delta,
            } => {
                let slot = self.player_mut(*player)?.counters.slot(*counter);
                *slot = clamped_add(*slot, *delta);
            }
            GameEvent::AdjustCommanderDamage { from, to, delta } => {
                if from == to {
                    return Err(WebToolsError::invalid(
                        "from",
                        "A player cannot deal commander damage to themselves",
                    ));
                }
                self.player(*from)?;
                let target = self.player_mut(*to)?;
                let taken = target.commander_damage.entry(*from).or_insert(0);
                *taken = clamped_add(*taken, *delta);
            }
            GameEvent::SetMonarch { player } => {
                self.player(*player)?;
                self.monarch = Some(*player);
            }
            GameEvent::ClearMonarch => self.monarch = None,
            GameEvent::Rename { player, name } => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(WebToolsError::invalid("name", "Player name cannot be empty"));
                }
                self.player_mut(*player)?.name = name.to_string();
            }
            GameEvent::SetPlayerCount { count } => {
                check_player_count(*count)?;
                self.player_count = *count;
                if self.monarch.is_some_and(|m| m > *count) {
                    self.monarch = None;
                }
            }
            GameEvent::SetStartingLife { life } => {
                check_starting_life(*life)?;
                self.starting_life = *life;
            }
            GameEvent::ChangeMode { mode } => {
                self.mode = *mode;
                self.starting_life = mode.starting_life();
                for p in &mut self.players {
                    p.life = self.starting_life;
                    p.commander_damage.clear();
                }
            }
            GameEvent::Reset => {
                for p in &mut self.players {
                    p.life = self.starting_life;
                    p.counters = Counters::default();
                    p.commander_damage.clear();
                }
                self.monarch = None;
            }
        }
        Ok(())
    }

    /// Why `player` has lost, if they have.
    pub fn elimination_reasons(&self, player: &Player) -> Vec<EliminationReason> {
        let mut reasons = Vec::new();
        if player.life <= 0 {
            reasons.push(EliminationReason::LifeDepleted);
        }
        if player.counters.poison >= LETHAL_POISON {
            reasons.push(EliminationReason::Poisoned);
        }
        if self.mode == GameMode::Commander {
            reasons.extend(
                player
                    .commander_damage
                    .iter()
                    .filter(|(_, dmg)| **dmg >= LETHAL_COMMANDER_DAMAGE)
                    .map(|(from, _)| EliminationReason::CommanderDamage { from: *from }),
            );
        }
        reasons
    }
}

fn clamped_add(current: u32, delta: i32) -> u32 {
    let next = i64::from(current) + i64::from(delta);
    next.clamp(0, i64::from(u32::MAX)) as u32
}

fn check_player_count(count: u32) -> WebToolsResult<()> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
        return Err(WebToolsError::invalid(
            "player_count",
            format!("Player count must be between {MIN_PLAYERS} and {MAX_PLAYERS}"),
        ));
    }
    Ok(())
}

fn check_starting_life(life: i32) -> WebToolsResult<()> {
    if life <= 0 {
        return Err(WebToolsError::invalid(
            "starting_life",
            "Starting life must be positive",
        ));
    }
    Ok(())
}

fn unknown_player(id: PlayerId, count: u32) -> WebToolsError {
    WebToolsError::invalid(
        "player",
        format!("No active player {id} (players are 1..={count})"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_game_defaults() {
        let g = Game::new(GameMode::Commander, 4).unwrap();
        assert_eq!(g.players.len(), 6);
        assert_eq!(g.active_players().len(), 4);
        assert!(g.active_players().iter().all(|p| p.life == 40));
        assert_eq!(g.players[2].name, "Player 3");
    }

    #[test]
    fn test_counters_clamp_at_zero() {
        let mut g = Game::new(GameMode::Normal, 2).unwrap();
        g.apply(&GameEvent::AdjustCounter {
            player: 1,
            counter: CounterKind::Poison,
            delta: -3,
        })
        .unwrap();
        assert_eq!(g.players[0].counters.poison, 0);
    }

    #[test]
    fn test_life_can_go_negative() {
        let mut g = Game::new(GameMode::Normal, 2).unwrap();
        g.apply(&GameEvent::AdjustLife { player: 2, delta: -25 })
            .unwrap();
        assert_eq!(g.players[1].life, -5);
        assert_eq!(
            g.elimination_reasons(&g.players[1]),
            vec![EliminationReason::LifeDepleted]
        );
    }

    #[test]
    fn test_inactive_seat_rejected() {
        let mut g = Game::new(GameMode::Normal, 2).unwrap();
        assert!(g.apply(&GameEvent::AdjustLife { player: 3, delta: 1 }).is_err());
        assert!(g.apply(&GameEvent::SetMonarch { player: 5 }).is_err());
    }

    #[test]
    fn test_commander_damage_lethal_only_in_commander_mode() {
        let mut g = Game::new(GameMode::Commander, 3).unwrap();
        g.apply(&GameEvent::AdjustCommanderDamage {
            from: 2,
            to: 1,
            delta: 21,
        })
        .unwrap();
        assert_eq!(
            g.elimination_reasons(&g.players[0]),
            vec![EliminationReason::CommanderDamage { from: 2 }]
        );
        assert!(g
            .apply(&GameEvent::AdjustCommanderDamage {
                from: 1,
                to: 1,
                delta: 1
            })
            .is_err());
    }

    #[test]
    fn test_change_mode_keeps_counters() {
        let mut g = Game::new(GameMode::Normal, 2).unwrap();
        g.apply(&GameEvent::AdjustCounter {
            player: 1,
            counter: CounterKind::Energy,
            delta: 4,
        })
        .unwrap();
        g.apply(&GameEvent::AdjustLife { player: 1, delta: -7 })
            .unwrap();
        g.apply(&GameEvent::ChangeMode {
            mode: GameMode::Commander,
        })
        .unwrap();
        assert_eq!(g.players[0].life, 40);
        assert_eq!(g.players[0].counters.energy, 4);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut g = Game::new(GameMode::Normal, 2).unwrap();
        g.apply(&GameEvent::SetStartingLife { life: 30 }).unwrap();
        g.apply(&GameEvent::SetMonarch { player: 2 }).unwrap();
        g.apply(&GameEvent::AdjustCounter {
            player: 2,
            counter: CounterKind::Experience,
            delta: 2,
        })
        .unwrap();
        g.apply(&GameEvent::Reset).unwrap();
        assert_eq!(g.players[1].life, 30);
        assert_eq!(g.players[1].counters, Counters::default());
        assert_eq!(g.monarch, None);
    }

    #[test]
    fn test_validate_accepts_played_game() {
        let mut g = Game::new(GameMode::Commander, 3).unwrap();
        g.apply(&GameEvent::AdjustCommanderDamage {
            from: 1,
            to: 2,
            delta: 7,
        })
        .unwrap();
        g.apply(&GameEvent::SetMonarch { player: 3 }).unwrap();
        assert!(g.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_commander_source() {
        let mut g = Game::new(GameMode::Commander, 3).unwrap();
        g.players[1].commander_damage.insert(2, 5);
        assert!(g.validate().unwrap_err().to_string().contains("commander_damage"));

        let mut g = Game::new(GameMode::Commander, 3).unwrap();
        g.players[0].commander_damage.insert(7, 5);
        assert!(g.validate().is_err());
    }

    #[test]
    fn test_shrinking_table_drops_monarch() {
        let mut g = Game::new(GameMode::Normal, 4).unwrap();
        g.apply(&GameEvent::SetMonarch { player: 4 }).unwrap();
        g.apply(&GameEvent::SetPlayerCount { count: 3 }).unwrap();
        assert_eq!(g.monarch, None);
        assert!(g.apply(&GameEvent::SetPlayerCount { count: 7 }).is_err());
    }

    #[test]
    fn test_event_json_shape() {
        let ev: GameEvent = serde_json::from_str(
            r#"{"action":"adjust_counter","player":1,"counter":"poison","delta":2}"#,
        )
        .unwrap();
        assert_eq!(
            ev,
            GameEvent::AdjustCounter {
                player: 1,
                counter: CounterKind::Poison,
                delta: 2
            }
        );
    }
}
