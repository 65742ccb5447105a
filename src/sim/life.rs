//! Lives and the death state machine
//!
//! `Alive -(hit)-> Dying -(lives left)-> Alive`
//! `Dying -(no lives left)-> GameOver`
//!
//! `Dying` never outlives the tick that entered it. `GameOver` is terminal
//! until the session restarts and builds a fresh `LifeState`.

use serde::{Deserialize, Serialize};

use crate::error::InvalidTransition;

/// Current phase of the player's life cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifePhase {
    Alive,
    /// A hit was taken; feedback pending, respawn or game over next
    Dying,
    GameOver,
}

/// How a death resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathOutcome {
    Respawn { lives_remaining: u8 },
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeState {
    lives_remaining: u8,
    max_lives: u8,
    phase: LifePhase,
}

impl LifeState {
    /// Fresh state. Starting lives are capped at `max_lives`.
    pub fn new(starting_lives: u8, max_lives: u8) -> Self {
        let lives_remaining = starting_lives.min(max_lives);
        Self {
            lives_remaining,
            max_lives,
            phase: if lives_remaining == 0 {
                LifePhase::GameOver
            } else {
                LifePhase::Alive
            },
        }
    }

    pub fn lives_remaining(&self) -> u8 {
        self.lives_remaining
    }

    pub fn max_lives(&self) -> u8 {
        self.max_lives
    }

    pub fn phase(&self) -> LifePhase {
        self.phase
    }

    pub fn is_alive(&self) -> bool {
        self.phase == LifePhase::Alive
    }

    /// Take a hazard hit: lose a life and enter `Dying`
    pub fn on_hazard_hit(&mut self) -> Result<(), InvalidTransition> {
        if self.phase != LifePhase::Alive {
            return Err(InvalidTransition::HitWhileNotAlive(self.phase));
        }
        self.lives_remaining = self.lives_remaining.saturating_sub(1);
        self.phase = LifePhase::Dying;
        Ok(())
    }

    /// Leave `Dying`: respawn if lives remain, otherwise game over
    pub fn resolve_death(&mut self) -> Result<DeathOutcome, InvalidTransition> {
        if self.phase != LifePhase::Dying {
            return Err(InvalidTransition::ResolveWhileNotDying(self.phase));
        }
        if self.lives_remaining > 0 {
            self.phase = LifePhase::Alive;
            Ok(DeathOutcome::Respawn {
                lives_remaining: self.lives_remaining,
            })
        } else {
            self.phase = LifePhase::GameOver;
            Ok(DeathOutcome::GameOver)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_life_goes_straight_to_game_over() {
        let mut life = LifeState::new(1, 3);
        assert!(life.is_alive());

        life.on_hazard_hit().unwrap();
        assert_eq!(life.phase(), LifePhase::Dying);
        assert_eq!(life.resolve_death().unwrap(), DeathOutcome::GameOver);
        assert_eq!(life.phase(), LifePhase::GameOver);
        assert_eq!(life.lives_remaining(), 0);
    }

    #[test]
    fn test_respawn_until_out_of_lives() {
        let mut life = LifeState::new(3, 3);
        for expected in [2u8, 1] {
            life.on_hazard_hit().unwrap();
            assert_eq!(
                life.resolve_death().unwrap(),
                DeathOutcome::Respawn {
                    lives_remaining: expected
                }
            );
            assert!(life.is_alive());
        }
        life.on_hazard_hit().unwrap();
        assert_eq!(life.resolve_death().unwrap(), DeathOutcome::GameOver);
    }

    #[test]
    fn test_starting_lives_capped() {
        let life = LifeState::new(9, 3);
        assert_eq!(life.lives_remaining(), 3);
    }

    #[test]
    fn test_hit_after_game_over_rejected() {
        let mut life = LifeState::new(1, 1);
        life.on_hazard_hit().unwrap();
        life.resolve_death().unwrap();
        assert_eq!(
            life.on_hazard_hit(),
            Err(InvalidTransition::HitWhileNotAlive(LifePhase::GameOver))
        );
        assert_eq!(life.lives_remaining(), 0);
    }

    #[test]
    fn test_resolve_without_hit_rejected() {
        let mut life = LifeState::new(2, 3);
        assert_eq!(
            life.resolve_death(),
            Err(InvalidTransition::ResolveWhileNotDying(LifePhase::Alive))
        );
    }
}
