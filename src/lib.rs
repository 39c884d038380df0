//! Pixel Peak - a small 2D platformer
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (entities, collisions, level)
//! - `game`: Top-level state machine (menu, play, won, game over, exit)
//! - `renderer`: Draw-command capability and frame composition
//! - `audio`: Music/sound request capability
//! - `platform`: Input capability
//! - `settings`: Persisted player preferences
//! - `ui`: Main menu buttons

pub mod audio;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use game::{Game, GamePhase, Trigger};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Window title
    pub const TITLE: &str = "Pixel Peak";

    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// World dimensions (pixels, y grows downward)
    pub const WIDTH: f32 = 1300.0;
    pub const HEIGHT: f32 = 700.0;
    /// Y of the ground surface
    pub const GROUND_TOP: f32 = HEIGHT - 50.0;

    /// Player tuning
    pub const PLAYER_WIDTH: f32 = 60.0;
    pub const PLAYER_HEIGHT: f32 = 80.0;
    pub const PLAYER_SPEED: f32 = 300.0;
    /// Negative is upward
    pub const PLAYER_JUMP_POWER: f32 = -570.0;
    pub const PLAYER_GRAVITY: f32 = 800.0;
    pub const PLAYER_MAX_FALL_SPEED: f32 = 500.0;
    /// Seconds per idle animation frame
    pub const PLAYER_IDLE_FRAME_TIME: f32 = 0.5;

    /// Enemy tuning
    pub const ENEMY_WIDTH: f32 = 60.0;
    pub const ENEMY_HEIGHT: f32 = 60.0;
    pub const ENEMY_SPEED: f32 = 100.0;
    /// Unsupported enemies drop at a constant speed rather than accelerating
    pub const ENEMY_FALL_SPEED: f32 = 150.0;
    /// Distance from a platform top that still counts as standing on it
    pub const ENEMY_SUPPORT_TOLERANCE: f32 = 5.0;
    pub const ENEMY_WALK_FRAME_TIME: f32 = 0.4;
    pub const SQUASH_DURATION: f32 = 0.5;

    /// Flag
    pub const FLAG_SIZE: f32 = 80.0;
    pub const FLAG_FRAME_TIME: f32 = 0.3;

    /// Trampoline
    pub const TRAMPOLINE_JUMP_BOOST: f32 = -800.0;
    pub const TRAMPOLINE_ACTIVE_DURATION: f32 = 0.2;
}
