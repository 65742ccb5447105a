//! Game session: the fixed-tick loop tying the core together
//!
//! Each tick, in order:
//! 1. run deferred tasks that are due
//! 2. move the player one step in the held direction, scaled by score
//! 3. clamp the player to the viewport
//! 4. resolve collisions and dispatch them to score, lives and the registry
//! 5. try to spawn secrets
//! 6. push changed HUD state to the presentation layer
//!
//! Gameplay is deterministic in ticks given the seed and the input sequence.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{CollisionEvent, resolve_frame};
use super::entity::{EntityId, SecretKind, VisualTable};
use super::input::{Direction, InputAction, InputState, Key};
use super::life::{DeathOutcome, LifePhase, LifeState};
use super::progression::{CollectedCounts, ScoreState, SecretPossession};
use super::registry::EntityRegistry;
use super::schedule::{DeferredAction, Scheduler};
use crate::error::{InvalidTransition, contract_violation};
use crate::presentation::PresentationPort;
use crate::selection::Skin;
use crate::settings::Settings;

/// Messages shown when the player hits a rock
pub const DEATH_MESSAGES: [&str; 12] = [
    "Ouch! That rock was not a pet!",
    "Oops! I think I saw stars!",
    "I should've dodged that!",
    "Well, that was a smashing experience!",
    "Looks like I crumbled!",
    "That's not how you rock and roll!",
    "Game over, man! Game over!",
    "I've taken rock bottom to a whole new level!",
    "I can't believe I just got schooled by a rock!",
    "That was one hard lesson in gravity!",
    "Rock and roll? More like rock and fall!",
    "And I thought I'd never hit rock bottom!",
];

/// Restart affordance handed to the game-over screen. Only valid for the
/// session generation that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestartToken {
    pub generation: u64,
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Session clock after this tick
    pub tick: u64,
    /// Collision events that were acted on, in dispatch order
    pub events: Vec<CollisionEvent>,
    pub death: Option<DeathOutcome>,
    pub secrets_spawned: Vec<SecretKind>,
}

/// Everything discarded and rebuilt on restart
#[derive(Debug, Clone)]
struct SessionState {
    registry: EntityRegistry,
    score: ScoreState,
    counts: CollectedCounts,
    secrets: SecretPossession,
    life: LifeState,
    input: InputState,
    /// Sequence number of the transient message on screen, if any
    transient_message: Option<u64>,
    /// Secret messages currently open, by `SecretKind::index`
    secret_message_open: [bool; 2],
    score_dirty: bool,
    bag_dirty: bool,
}

impl SessionState {
    fn new(
        settings: &Settings,
        port: &impl PresentationPort,
        visuals: VisualTable,
        rng: &mut impl Rng,
    ) -> Self {
        let mut registry =
            EntityRegistry::new(settings.registry_config(), port.viewport_bounds(), visuals);
        registry.populate(rng);
        Self {
            registry,
            score: ScoreState::new(settings.score_rules()),
            counts: CollectedCounts::default(),
            secrets: SecretPossession::default(),
            life: LifeState::new(settings.starting_lives, settings.max_lives),
            input: InputState::default(),
            transient_message: None,
            secret_message_open: [false; 2],
            score_dirty: false,
            bag_dirty: false,
        }
    }
}

pub struct GameSession<P: PresentationPort, R: Rng = Pcg32> {
    settings: Settings,
    skin: Skin,
    visuals: VisualTable,
    port: P,
    rng: R,
    scheduler: Scheduler,
    /// Ticks processed since the session was first started; never reset
    clock: u64,
    message_seq: u64,
    running: bool,
    state: SessionState,
}

impl<P: PresentationPort> GameSession<P, Pcg32> {
    /// Start a session with a seeded PCG generator
    pub fn with_seed(settings: Settings, skin: Skin, port: P, seed: u64) -> Self {
        Self::start(settings, skin, port, Pcg32::seed_from_u64(seed))
    }
}

impl<P: PresentationPort, R: Rng> GameSession<P, R> {
    /// Build the world, draw it, and get ready for the first tick
    pub fn start(settings: Settings, skin: Skin, mut port: P, mut rng: R) -> Self {
        let visuals = port.load_visuals(skin);
        let state = SessionState::new(&settings, &port, visuals.clone(), &mut rng);
        let mut session = Self {
            settings,
            skin,
            visuals,
            port,
            rng,
            scheduler: Scheduler::new(),
            clock: 0,
            message_seq: 0,
            running: true,
            state,
        };
        session.render_world();
        log::info!(
            "Session started: skin={}, viewport={}x{}, lives={}",
            session.skin.as_str(),
            session.state.registry.viewport().x,
            session.state.registry.viewport().y,
            session.state.life.lives_remaining()
        );
        session
    }

    /// Nominal time between ticks
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.settings.tick_period_ms)
    }

    /// Advance the session by one tick
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport {
            tick: self.clock,
            ..Default::default()
        };
        if !self.running {
            return report;
        }
        self.clock += 1;
        report.tick = self.clock;

        for action in self.scheduler.drain_due(self.clock) {
            self.run_deferred(action);
        }

        if !self.state.life.is_alive() {
            return report;
        }

        self.move_player();
        self.resolve_collisions(&mut report);

        if self.state.life.is_alive() {
            self.spawn_secrets(&mut report);
        }

        self.flush_hud();
        report
    }

    fn move_player(&mut self) {
        let mut moved = false;
        if let Some(dir) = self.state.input.current() {
            let step = self.settings.base_move_step * self.state.score.speed_multiplier() as i32;
            self.state.registry.move_player(dir.unit() * step);
            moved = true;
        }
        moved |= self.state.registry.clamp_player();
        if moved {
            let player = self.state.registry.player();
            self.port.move_entity(player.id, player.pos);
        }
    }

    fn resolve_collisions(&mut self, report: &mut TickReport) {
        let player_box = self.state.registry.player().bbox();
        let events = resolve_frame(&player_box, self.state.registry.collision_targets());

        for event in events {
            if self.state.life.phase() == LifePhase::GameOver {
                break;
            }
            match event {
                CollisionEvent::Collected { id, kind } => {
                    if !self.despawn(id) {
                        continue;
                    }
                    self.state.counts.record(kind);
                    self.state.score.on_collect();
                    self.state.score_dirty = true;
                    self.state.bag_dirty = true;
                    log::debug!("Collected {:?}, score {}", kind, self.state.score.score);
                }
                CollisionEvent::HazardHit { .. } => {
                    // Every overlapping rock costs a life
                    report.death = self.handle_death();
                }
                CollisionEvent::SecretCollected { id, kind } => {
                    if !self.despawn(id) {
                        continue;
                    }
                    let visual = self.visuals.secrets[kind.index()];
                    self.state.secrets.collect(kind, visual);
                    self.state.score.on_secret_collect();
                    self.state.score_dirty = true;
                    self.state.bag_dirty = true;
                    log::info!("Secret {:?} collected, score {}", kind, self.state.score.score);
                }
            }
            report.events.push(event);
        }
    }

    /// Remove an entity and draw its replacement, if any
    fn despawn(&mut self, id: EntityId) -> bool {
        match self.state.registry.despawn(id, &mut self.rng) {
            Ok(despawned) => {
                self.port.remove_entity(despawned.removed.id);
                if let Some(replacement) = despawned.replacement {
                    self.port.render_entity(&replacement);
                }
                true
            }
            Err(err) => {
                contract_violation(err);
                false
            }
        }
    }

    fn handle_death(&mut self) -> Option<DeathOutcome> {
        if let Err(err) = self.state.life.on_hazard_hit() {
            contract_violation(err);
            return None;
        }

        let message = self.pick_death_message();
        self.show_transient_message(message);
        if self.settings.screen_shake {
            self.port
                .shake_screen(crate::consts::SHAKE_STEPS, crate::consts::SHAKE_MAGNITUDE);
        }

        let outcome = match self.state.life.resolve_death() {
            Ok(outcome) => outcome,
            Err(err) => {
                contract_violation(err);
                return None;
            }
        };

        match outcome {
            DeathOutcome::Respawn { lives_remaining } => {
                self.state.registry.reset_player();
                let player = self.state.registry.player();
                self.port.move_entity(player.id, player.pos);
                log::info!("Player hit a rock, {} lives left", lives_remaining);
            }
            DeathOutcome::GameOver => {
                self.flush_hud();
                let final_score = self.state.score.score;
                let message = self.pick_death_message();
                let token = RestartToken {
                    generation: self.scheduler.generation(),
                };
                self.port.show_game_over_screen(final_score, message, token);
                log::info!("Game over, final score {}", final_score);
            }
        }
        Some(outcome)
    }

    fn pick_death_message(&mut self) -> &'static str {
        DEATH_MESSAGES[self.rng.random_range(0..DEATH_MESSAGES.len())]
    }

    fn show_transient_message(&mut self, text: &str) {
        self.message_seq += 1;
        let duration = self.settings.death_message_ticks;
        self.state.transient_message = Some(self.message_seq);
        self.port.show_transient_message(text, duration);
        self.scheduler.schedule(
            self.clock,
            duration,
            DeferredAction::ClearTransientMessage {
                message_seq: self.message_seq,
            },
        );
    }

    fn run_deferred(&mut self, action: DeferredAction) {
        match action {
            DeferredAction::ClearTransientMessage { message_seq } => {
                // A newer message replaced this one; its own task will clear it
                if self.state.transient_message == Some(message_seq) {
                    self.state.transient_message = None;
                    self.port.clear_transient_message();
                }
            }
        }
    }

    fn spawn_secrets(&mut self, report: &mut TickReport) {
        for kind in SecretKind::ALL {
            let collected = self.state.secrets.is_collected(kind);
            let score = self.state.score.score;
            if let Some(secret) =
                self.state
                    .registry
                    .try_spawn_secret(kind, score, collected, &mut self.rng)
            {
                self.port.render_entity(&secret);
                report.secrets_spawned.push(kind);
            }
        }
    }

    fn flush_hud(&mut self) {
        if self.state.score_dirty {
            self.port.show_hud_score(self.state.score.score);
            self.state.score_dirty = false;
        }
        if self.state.bag_dirty {
            self.port
                .show_bag_counts(&self.state.counts, self.state.secrets.held());
            self.state.bag_dirty = false;
        }
    }

    fn render_world(&mut self) {
        for entity in self.state.registry.all() {
            self.port.render_entity(entity);
        }
        self.port.show_hud_score(self.state.score.score);
        self.port
            .show_bag_counts(&self.state.counts, self.state.secrets.held());
    }

    /// Key press from the presentation layer
    pub fn key_down(&mut self, key: Key) {
        if !self.running {
            return;
        }
        if let Some(InputAction::AddPoints) = self.state.input.key_down(key) {
            if self.settings.debug_keys {
                self.add_points(self.settings.debug_points);
            }
        }
    }

    /// Key release from the presentation layer
    pub fn key_up(&mut self, key: Key) {
        if self.running {
            self.state.input.key_up(key);
        }
    }

    /// Debug hook: add points and refresh the score HUD
    pub fn add_points(&mut self, amount: u64) {
        if !self.running {
            return;
        }
        self.state.score.add_points(amount);
        self.port.show_hud_score(self.state.score.score);
        log::debug!("Added {} debug points, score {}", amount, self.state.score.score);
    }

    /// Show or hide the hidden message of a held secret
    pub fn toggle_secret_message(&mut self, kind: SecretKind) {
        if !self.running {
            return;
        }
        if !self.state.secrets.is_collected(kind) {
            contract_violation(InvalidTransition::SecretNotHeld(kind));
            return;
        }
        let open = &mut self.state.secret_message_open[kind.index()];
        *open = !*open;
        if *open {
            self.port.show_secret_message(kind, kind.message());
        } else {
            self.port.clear_secret_message(kind);
        }
    }

    /// Tear everything down and start over. Pending delayed tasks from the
    /// old session are invalidated.
    pub fn restart(&mut self) {
        if !self.running {
            log::warn!("Restart requested on a terminated session");
            return;
        }
        let generation = self.scheduler.advance_generation();
        self.teardown();
        self.state = SessionState::new(
            &self.settings,
            &self.port,
            self.visuals.clone(),
            &mut self.rng,
        );
        self.render_world();
        log::info!("Session restarted (generation {})", generation);
    }

    /// Restart from a game-over screen. Stale tokens are ignored.
    pub fn restart_with(&mut self, token: RestartToken) -> bool {
        if token.generation != self.scheduler.generation() {
            log::debug!(
                "Ignoring restart token from generation {} (current {})",
                token.generation,
                self.scheduler.generation()
            );
            return false;
        }
        self.restart();
        true
    }

    fn teardown(&mut self) {
        let ids: Vec<EntityId> = self.state.registry.all().map(|e| e.id).collect();
        for id in ids {
            self.port.remove_entity(id);
        }
        if self.state.transient_message.take().is_some() {
            self.port.clear_transient_message();
        }
        for kind in SecretKind::ALL {
            if self.state.secret_message_open[kind.index()] {
                self.port.clear_secret_message(kind);
            }
        }
    }

    /// Stop the session for good. Later ticks and input are ignored.
    pub fn terminate(&mut self) {
        if !self.running {
            return;
        }
        self.scheduler.advance_generation();
        self.state.input.clear();
        self.running = false;
        log::info!("Session terminated at tick {}", self.clock);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn score(&self) -> &ScoreState {
        &self.state.score
    }

    pub fn life(&self) -> &LifeState {
        &self.state.life
    }

    pub fn phase(&self) -> LifePhase {
        self.state.life.phase()
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.state.registry
    }

    pub fn counts(&self) -> &CollectedCounts {
        &self.state.counts
    }

    pub fn secrets(&self) -> &SecretPossession {
        &self.state.secrets
    }

    pub fn current_direction(&self) -> Option<Direction> {
        self.state.input.current()
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn generation(&self) -> u64 {
        self.scheduler.generation()
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn skin(&self) -> Skin {
        self.skin
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    #[cfg(test)]
    fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.state.registry
    }
}
