//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (platforms by level index, enemies by spawn order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod level;
pub mod state;
pub mod tick;

pub use collision::{Aabb, intersects};
pub use level::{Platform, PlatformKind, load_default_level, tick_trampolines};
pub use state::{
    DeathCause, Enemy, EnemyState, Facing, Flag, FrameClock, Patrol, Player, PlayerAnim,
    SimEvent, SpriteId, World,
};
pub use tick::{TickInput, TickOutcome, tick};
