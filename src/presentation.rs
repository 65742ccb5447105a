//! Presentation port
//!
//! The core never draws anything itself. It drives whatever UI is attached
//! through `PresentationPort` and never waits on it: every call is
//! fire-and-forget. Input and tick delivery go the other way, through
//! `GameSession::key_down`, `key_up` and `tick`.

use glam::IVec2;

use crate::selection::Skin;
use crate::sim::{
    CollectedCounts, Entity, EntityId, RestartToken, SecretKind, SecretsHeld, VisualTable,
};

pub trait PresentationPort {
    /// Size of the play area in pixels
    fn viewport_bounds(&self) -> IVec2;

    /// Resolve visuals for this session. Anything missing stays `None`
    /// and the game plays on without it.
    fn load_visuals(&mut self, _skin: Skin) -> VisualTable {
        VisualTable::default()
    }

    fn render_entity(&mut self, entity: &Entity);
    fn remove_entity(&mut self, id: EntityId);
    fn move_entity(&mut self, id: EntityId, pos: IVec2);

    fn show_hud_score(&mut self, score: u64);
    fn show_bag_counts(&mut self, counts: &CollectedCounts, secrets: SecretsHeld);

    fn show_transient_message(&mut self, text: &str, duration_ticks: u64);
    fn clear_transient_message(&mut self);

    /// Jitter the play area for `steps` frames by up to `magnitude` pixels
    fn shake_screen(&mut self, _steps: u32, _magnitude: i32) {}

    fn show_secret_message(&mut self, _kind: SecretKind, _text: &str) {}
    fn clear_secret_message(&mut self, _kind: SecretKind) {}

    /// Final screen. Redeem `restart` with `GameSession::restart_with`.
    fn show_game_over_screen(&mut self, final_score: u64, message: &str, restart: RestartToken);
}

/// Everything the core asked the presentation layer to do
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Render(Entity),
    Remove(EntityId),
    Move(EntityId, IVec2),
    Score(u64),
    Bag {
        counts: CollectedCounts,
        secrets: SecretsHeld,
    },
    TransientMessage {
        text: String,
        duration_ticks: u64,
    },
    ClearTransientMessage,
    Shake {
        steps: u32,
        magnitude: i32,
    },
    SecretMessage(SecretKind),
    ClearSecretMessage(SecretKind),
    GameOver {
        final_score: u64,
        message: String,
        restart: RestartToken,
    },
}

/// Port that records every directive. Drives tests and headless runs.
#[derive(Debug, Clone)]
pub struct Recorder {
    pub viewport: IVec2,
    pub visuals: VisualTable,
    pub directives: Vec<Directive>,
}

impl Recorder {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            viewport: IVec2::new(width, height),
            visuals: VisualTable::default(),
            directives: Vec::new(),
        }
    }

    /// Take everything recorded so far
    pub fn drain(&mut self) -> Vec<Directive> {
        std::mem::take(&mut self.directives)
    }

    /// Count directives matching a predicate
    pub fn count(&self, pred: impl Fn(&Directive) -> bool) -> usize {
        self.directives.iter().filter(|d| pred(d)).count()
    }
}

impl PresentationPort for Recorder {
    fn viewport_bounds(&self) -> IVec2 {
        self.viewport
    }

    fn load_visuals(&mut self, _skin: Skin) -> VisualTable {
        self.visuals.clone()
    }

    fn render_entity(&mut self, entity: &Entity) {
        self.directives.push(Directive::Render(entity.clone()));
    }

    fn remove_entity(&mut self, id: EntityId) {
        self.directives.push(Directive::Remove(id));
    }

    fn move_entity(&mut self, id: EntityId, pos: IVec2) {
        self.directives.push(Directive::Move(id, pos));
    }

    fn show_hud_score(&mut self, score: u64) {
        self.directives.push(Directive::Score(score));
    }

    fn show_bag_counts(&mut self, counts: &CollectedCounts, secrets: SecretsHeld) {
        self.directives.push(Directive::Bag {
            counts: counts.clone(),
            secrets,
        });
    }

    fn show_transient_message(&mut self, text: &str, duration_ticks: u64) {
        self.directives.push(Directive::TransientMessage {
            text: text.to_string(),
            duration_ticks,
        });
    }

    fn clear_transient_message(&mut self) {
        self.directives.push(Directive::ClearTransientMessage);
    }

    fn shake_screen(&mut self, steps: u32, magnitude: i32) {
        self.directives.push(Directive::Shake { steps, magnitude });
    }

    fn show_secret_message(&mut self, kind: SecretKind, _text: &str) {
        self.directives.push(Directive::SecretMessage(kind));
    }

    fn clear_secret_message(&mut self, kind: SecretKind) {
        self.directives.push(Directive::ClearSecretMessage(kind));
    }

    fn show_game_over_screen(&mut self, final_score: u64, message: &str, restart: RestartToken) {
        self.directives.push(Directive::GameOver {
            final_score,
            message: message.to_string(),
            restart,
        });
    }
}
