//! Static level geometry
//!
//! Platforms never move once loaded. The only mutable level state is the
//! trampoline's "active" timer, which drives its sprout animation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::state::SpriteId;
use crate::consts::*;

/// Timers closer than this to zero count as expired
const TIMER_EPSILON: f32 = 1e-4;

/// Platform variants; only trampolines carry extra state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlatformKind {
    Ground,
    Floating,
    /// `active_timer`: seconds left showing the extended-spring sprite (>= 0).
    /// `just_triggered` holds the timer for the rest of the tick it was set in.
    Trampoline { active_timer: f32, just_triggered: bool },
}

/// A solid platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Aabb,
    pub kind: PlatformKind,
}

impl Platform {
    pub fn ground(rect: Aabb) -> Self {
        Self {
            rect,
            kind: PlatformKind::Ground,
        }
    }

    pub fn floating(rect: Aabb) -> Self {
        Self {
            rect,
            kind: PlatformKind::Floating,
        }
    }

    pub fn trampoline(rect: Aabb) -> Self {
        Self {
            rect,
            kind: PlatformKind::Trampoline {
                active_timer: 0.0,
                just_triggered: false,
            },
        }
    }

    pub fn is_trampoline(&self) -> bool {
        matches!(self.kind, PlatformKind::Trampoline { .. })
    }

    /// Remaining active time (always 0 for non-trampolines)
    pub fn active_timer(&self) -> f32 {
        match self.kind {
            PlatformKind::Trampoline { active_timer, .. } => active_timer,
            _ => 0.0,
        }
    }

    /// Restart the trampoline's active animation; no-op for other kinds
    pub fn activate(&mut self) {
        if let PlatformKind::Trampoline {
            active_timer,
            just_triggered,
        } = &mut self.kind
        {
            *active_timer = TRAMPOLINE_ACTIVE_DURATION;
            *just_triggered = true;
        }
    }

    /// Count the active timer down, flooring at zero. A timer set during the
    /// current tick starts counting on the next one.
    pub fn decay(&mut self, dt: f32) {
        if let PlatformKind::Trampoline {
            active_timer,
            just_triggered,
        } = &mut self.kind
        {
            if std::mem::take(just_triggered) {
                return;
            }
            if *active_timer > 0.0 {
                *active_timer -= dt;
                // Repeated f32 subtraction of the step leaves a residue
                if *active_timer < TIMER_EPSILON {
                    *active_timer = 0.0;
                }
            }
        }
    }

    /// Sprite for kinds drawn as a single image
    pub fn sprite(&self) -> SpriteId {
        match self.kind {
            PlatformKind::Ground => SpriteId::Ground,
            PlatformKind::Floating => SpriteId::PlatformMiddle,
            PlatformKind::Trampoline { active_timer, .. } if active_timer > 0.0 => {
                SpriteId::TrampolineActive
            }
            PlatformKind::Trampoline { .. } => SpriteId::TrampolineIdle,
        }
    }
}

/// Index of the floating platform the second enemy patrols
pub const LEFT_LEDGE: usize = 1;
/// Index of the floating platform holding the flag
pub const FLAG_LEDGE: usize = 2;
/// Index of the high central platform
pub const SUMMIT_LEDGE: usize = 3;

/// Build the fixed five-platform level
///
/// Deterministic: every call returns identical geometry with idle trampolines.
pub fn load_default_level() -> Vec<Platform> {
    let platforms = vec![
        Platform::ground(Aabb::new(0.0, GROUND_TOP, WIDTH, 50.0)),
        Platform::floating(Aabb::new(150.0, HEIGHT - 380.0, 256.0, 50.0)),
        Platform::floating(Aabb::new(WIDTH - 256.0 - 110.0, HEIGHT - 290.0, 256.0, 50.0)),
        Platform::floating(Aabb::new(
            (WIDTH / 2.0).floor() - 192.0,
            HEIGHT - 560.0,
            384.0,
            50.0,
        )),
        Platform::trampoline(Aabb::new(30.0, GROUND_TOP - 50.0, 60.0, 50.0)),
    ];
    log::debug!("Loaded default level ({} platforms)", platforms.len());
    platforms
}

/// Decay every trampoline's active timer by `dt`
pub fn tick_trampolines(platforms: &mut [Platform], dt: f32) {
    for platform in platforms.iter_mut().filter(|p| p.is_trampoline()) {
        platform.decay(dt);
    }
}

/// Point centred on a platform's top edge (enemy/flag anchor)
pub fn top_center(platform: &Platform) -> Vec2 {
    Vec2::new(
        platform.rect.left() + (platform.rect.width() / 2.0).floor(),
        platform.rect.top(),
    )
}
