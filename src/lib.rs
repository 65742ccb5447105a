//! Dino Dash - a single-screen arcade collection game
//!
//! Core modules:
//! - `sim`: Deterministic game core (entities, collisions, scoring, lives, session loop)
//! - `presentation`: The narrow port the core drives rendering and HUD through
//! - `selection`: Character skin selection handed to the session at start
//! - `settings`: Data-driven game tuning

pub mod error;
pub mod presentation;
pub mod selection;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, InvalidTransition};
pub use presentation::{Directive, PresentationPort, Recorder};
pub use selection::{CharacterSelection, Skin};
pub use settings::Settings;

use glam::IVec2;

/// Game configuration constants
pub mod consts {
    /// Nominal tick period of the session loop (20 Hz)
    pub const TICK_PERIOD_MS: u64 = 50;
    /// Maximum ticks run per driver update to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Entity edge lengths (pixels, square sprites)
    pub const PLAYER_SIZE: i32 = 50;
    pub const COLLECTIBLE_SIZE: i32 = 50;
    pub const HAZARD_SIZE: i32 = 50;
    pub const SECRET_SIZE: i32 = 50;

    /// On-screen populations
    pub const COLLECTIBLE_COUNT: usize = 10;
    pub const HAZARD_COUNT: usize = 10;

    /// Movement: base step per tick, scaled by `1 + score / SPEED_THRESHOLD`
    pub const BASE_MOVE_STEP: i32 = 10;
    pub const SPEED_THRESHOLD: u64 = 100;
    pub const MAX_SPEED_MULTIPLIER: u32 = 6;

    /// Reward per collectible starts here and grows by the same amount
    pub const REWARD_INCREMENT: u64 = 5;
    /// Collections between reward increases
    pub const REWARD_INTERVAL: u64 = 10;

    /// Secret unlock thresholds and flat bonus
    pub const SECRET_A_THRESHOLD: u64 = 1000;
    pub const SECRET_B_THRESHOLD: u64 = 10_000;
    pub const SECRET_BONUS: u64 = 500;

    /// Death message stays up for 2 seconds
    pub const DEATH_MESSAGE_TICKS: u64 = 2000 / TICK_PERIOD_MS;

    /// Debug key bonus
    pub const DEBUG_POINTS: u64 = 1000;

    /// Lives. The starting count and the cap are tuned separately.
    pub const STARTING_LIVES: u8 = 1;
    pub const MAX_LIVES: u8 = 3;

    /// Screen shake: jitter steps and max offset in pixels
    pub const SHAKE_STEPS: u32 = 10;
    pub const SHAKE_MAGNITUDE: i32 = 5;
}

/// Center point of a viewport (integer division, matching pixel grids)
#[inline]
pub fn viewport_center(viewport: IVec2) -> IVec2 {
    viewport / 2
}
