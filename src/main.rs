//! Dino Dash entry point
//!
//! Runs a session headless against a logging presentation layer, at the real
//! tick period, with a simple autopilot at the keys.

use std::time::{Duration, Instant};

use glam::IVec2;

use dino_dash::consts::MAX_SUBSTEPS;
use dino_dash::sim::{
    CollectedCounts, Direction, Entity, EntityId, GameSession, Key, LifePhase,
    RestartToken, SecretKind, SecretsHeld,
};
use dino_dash::{CharacterSelection, PresentationPort, Settings};

/// Presentation layer that only logs what it is asked to show
struct LogPresenter {
    viewport: IVec2,
    pending_restart: Option<RestartToken>,
}

impl LogPresenter {
    fn new(width: i32, height: i32) -> Self {
        Self {
            viewport: IVec2::new(width, height),
            pending_restart: None,
        }
    }
}

impl PresentationPort for LogPresenter {
    fn viewport_bounds(&self) -> IVec2 {
        self.viewport
    }

    fn render_entity(&mut self, entity: &Entity) {
        log::trace!("render {:?} {:?} at {}", entity.id, entity.kind, entity.pos);
    }

    fn remove_entity(&mut self, id: EntityId) {
        log::trace!("remove {:?}", id);
    }

    fn move_entity(&mut self, id: EntityId, pos: IVec2) {
        log::trace!("move {:?} to {}", id, pos);
    }

    fn show_hud_score(&mut self, score: u64) {
        log::debug!("Score: {}", score);
    }

    fn show_bag_counts(&mut self, counts: &CollectedCounts, secrets: SecretsHeld) {
        let bag: Vec<String> = counts.iter().map(|(k, n)| format!("{:?}={}", k, n)).collect();
        log::debug!("Bag: {} secrets(a={}, b={})", bag.join(" "), secrets.a, secrets.b);
    }

    fn show_transient_message(&mut self, text: &str, duration_ticks: u64) {
        log::info!("\"{}\" ({} ticks)", text, duration_ticks);
    }

    fn clear_transient_message(&mut self) {
        log::trace!("message cleared");
    }

    fn shake_screen(&mut self, steps: u32, magnitude: i32) {
        log::debug!("shake x{} ±{}px", steps, magnitude);
    }

    fn show_secret_message(&mut self, kind: SecretKind, text: &str) {
        log::info!("Secret {:?}: {}", kind, text);
    }

    fn show_game_over_screen(&mut self, final_score: u64, message: &str, restart: RestartToken) {
        log::info!("GAME OVER - {} Final Score: {}", message, final_score);
        self.pending_restart = Some(restart);
    }
}

fn direction_key(dir: Direction) -> Key {
    match dir {
        Direction::Left => Key::Left,
        Direction::Right => Key::Right,
        Direction::Up => Key::Up,
        Direction::Down => Key::Down,
    }
}

/// Steer toward the nearest collectible along the longer axis
fn autopilot(session: &mut GameSession<LogPresenter>) {
    let player = session.registry().player().pos;
    let target = session
        .registry()
        .collectibles()
        .iter()
        .map(|e| (e.bbox().min + e.bbox().max) / 2)
        .min_by_key(|c| (*c - player).abs().element_sum());

    let Some(target) = target else {
        return;
    };
    let delta = target - player;
    let wanted = if delta.x.abs() >= delta.y.abs() {
        if delta.x < 0 { Direction::Left } else { Direction::Right }
    } else if delta.y < 0 {
        Direction::Up
    } else {
        Direction::Down
    };

    if session.current_direction() != Some(wanted) {
        if let Some(current) = session.current_direction() {
            session.key_up(direction_key(current));
        }
        session.key_down(direction_key(wanted));
    }
}

fn step(session: &mut GameSession<LogPresenter>, auto_restart: bool) {
    autopilot(session);
    let report = session.tick();
    for event in &report.events {
        log::trace!("tick {}: {:?}", report.tick, event);
    }

    if session.phase() == LifePhase::GameOver && auto_restart {
        if let Some(token) = session.port_mut().pending_restart.take() {
            session.restart_with(token);
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Dino Dash (headless) starting...");

    let settings = Settings::load();
    let headless = settings.headless.clone();
    let seed = headless.seed.unwrap_or_else(rand::random);
    log::info!("Seed: {}", seed);

    let port = LogPresenter::new(headless.viewport_width, headless.viewport_height);
    let mut selection = CharacterSelection::new();
    selection.select(settings.skin);
    let Some(skin) = selection.start() else {
        log::error!("No character selected");
        return;
    };
    let mut session = GameSession::with_seed(settings, skin, port, seed);

    let period = session.tick_period();
    let mut accumulator = Duration::ZERO;
    let mut last = Instant::now();

    while session.clock() < headless.demo_ticks {
        if headless.unpaced {
            step(&mut session, headless.auto_restart);
            continue;
        }

        let now = Instant::now();
        accumulator += now - last;
        last = now;

        let mut substeps = 0;
        while accumulator >= period && substeps < MAX_SUBSTEPS {
            step(&mut session, headless.auto_restart);
            accumulator -= period;
            substeps += 1;
        }
        // Drop the backlog rather than spiral
        if substeps == MAX_SUBSTEPS {
            accumulator = Duration::ZERO;
        }

        std::thread::sleep(period.saturating_sub(accumulator));
    }

    log::info!(
        "Finished after {} ticks: score {}, collected {}, lives {}",
        session.clock(),
        session.score().score,
        session.score().total_collected,
        session.life().lives_remaining()
    );
    session.terminate();
}
