//! Entities and world state
//!
//! Everything a playthrough owns lives in [`World`]. A fresh world is built
//! each time a game starts, so no state leaks between runs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::level::{self, FLAG_LEDGE, LEFT_LEDGE, Platform, SUMMIT_LEDGE};
use crate::consts::*;

/// Every image the game can ask the renderer for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteId {
    PlayerIdle0,
    PlayerIdle1,
    PlayerLeft,
    PlayerRight,
    PlayerJump,
    EnemyWalkRight0,
    EnemyWalkRight1,
    EnemyWalkLeft0,
    EnemyWalkLeft1,
    EnemySquashed,
    Flag0,
    Flag1,
    Ground,
    PlatformLeft,
    PlatformMiddle,
    PlatformRight,
    TrampolineIdle,
    TrampolineActive,
}

impl SpriteId {
    pub const ALL: [SpriteId; 18] = [
        SpriteId::PlayerIdle0,
        SpriteId::PlayerIdle1,
        SpriteId::PlayerLeft,
        SpriteId::PlayerRight,
        SpriteId::PlayerJump,
        SpriteId::EnemyWalkRight0,
        SpriteId::EnemyWalkRight1,
        SpriteId::EnemyWalkLeft0,
        SpriteId::EnemyWalkLeft1,
        SpriteId::EnemySquashed,
        SpriteId::Flag0,
        SpriteId::Flag1,
        SpriteId::Ground,
        SpriteId::PlatformLeft,
        SpriteId::PlatformMiddle,
        SpriteId::PlatformRight,
        SpriteId::TrampolineIdle,
        SpriteId::TrampolineActive,
    ];

    /// Asset file stem (`images/<name>.png`)
    pub fn asset_name(&self) -> &'static str {
        match self {
            SpriteId::PlayerIdle0 => "player_idle_0",
            SpriteId::PlayerIdle1 => "player_idle_1",
            SpriteId::PlayerLeft => "player_left",
            SpriteId::PlayerRight => "player_right",
            SpriteId::PlayerJump => "player_jump",
            SpriteId::EnemyWalkRight0 => "enemy_walk_right_0",
            SpriteId::EnemyWalkRight1 => "enemy_walk_right_1",
            SpriteId::EnemyWalkLeft0 => "enemy_walk_left_0",
            SpriteId::EnemyWalkLeft1 => "enemy_walk_left_1",
            SpriteId::EnemySquashed => "enemy_squashed",
            SpriteId::Flag0 => "flag_0",
            SpriteId::Flag1 => "flag_1",
            SpriteId::Ground => "ground",
            SpriteId::PlatformLeft => "platform_left",
            SpriteId::PlatformMiddle => "platform_middle",
            SpriteId::PlatformRight => "platform_right",
            SpriteId::TrampolineIdle => "spring",
            SpriteId::TrampolineActive => "spring_out",
        }
    }
}

/// Accumulating timer that cycles through a fixed number of frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameClock {
    pub timer: f32,
    pub frame: usize,
}

impl FrameClock {
    pub fn accumulate(&mut self, dt: f32) {
        self.timer += dt;
    }

    /// Move to the next of `len` frames once `frame_time` has elapsed.
    /// Returns true if the frame changed.
    pub fn step(&mut self, frame_time: f32, len: usize) -> bool {
        if self.timer >= frame_time {
            self.timer = 0.0;
            self.frame = (self.frame + 1) % len;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

/// Player animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAnim {
    Idle,
    Walking,
    Jumping,
    Falling,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub rect: Aabb,
    pub vel: Vec2,
    pub on_ground: bool,
    pub anim: PlayerAnim,
    pub facing: Facing,
    pub alive: bool,
    /// Idle animation clock
    pub clock: FrameClock,
}

impl Player {
    /// Spawn point: standing on the ground near the right edge
    pub fn spawn_point() -> Vec2 {
        Vec2::new(WIDTH - 100.0, GROUND_TOP)
    }

    pub fn new(midbottom: Vec2) -> Self {
        Self {
            rect: Aabb::from_midbottom(midbottom, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT)),
            vel: Vec2::ZERO,
            on_ground: true,
            anim: PlayerAnim::Idle,
            facing: Facing::Right,
            alive: true,
            clock: FrameClock::default(),
        }
    }

    pub fn sprite(&self) -> SpriteId {
        const IDLE: [SpriteId; 2] = [SpriteId::PlayerIdle0, SpriteId::PlayerIdle1];
        match self.anim {
            PlayerAnim::Idle => IDLE[self.clock.frame % IDLE.len()],
            PlayerAnim::Walking => match self.facing {
                Facing::Left => SpriteId::PlayerLeft,
                Facing::Right => SpriteId::PlayerRight,
            },
            PlayerAnim::Jumping | PlayerAnim::Falling => SpriteId::PlayerJump,
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(Self::spawn_point())
    }
}

/// How an enemy decides where to turn around
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Patrol {
    /// Reverse when the body reaches either x bound
    Range { min: f32, max: f32 },
    /// Stay on a platform, clamping to its edges when turning
    Platform(Aabb),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyState {
    Patrolling,
    /// Inert; removed once `remaining` runs out
    Squashed { remaining: f32 },
}

/// A walking enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub rect: Aabb,
    /// Signed horizontal speed
    pub vx: f32,
    pub patrol: Patrol,
    pub on_ground: bool,
    pub state: EnemyState,
    /// Walk animation clock
    pub clock: FrameClock,
}

impl Enemy {
    pub fn new(id: u32, midbottom: Vec2, patrol: Patrol) -> Self {
        Self {
            id,
            rect: Aabb::from_midbottom(midbottom, Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT)),
            vx: ENEMY_SPEED,
            patrol,
            on_ground: true,
            state: EnemyState::Patrolling,
            clock: FrameClock::default(),
        }
    }

    pub fn is_squashed(&self) -> bool {
        matches!(self.state, EnemyState::Squashed { .. })
    }

    /// Squashed long enough to be removed from play
    pub fn is_expired(&self) -> bool {
        matches!(self.state, EnemyState::Squashed { remaining } if remaining <= 0.0)
    }

    /// Defeat the enemy; it lingers for `SQUASH_DURATION` seconds
    pub fn squash(&mut self) {
        self.state = EnemyState::Squashed {
            remaining: SQUASH_DURATION,
        };
    }

    pub fn sprite(&self) -> SpriteId {
        const RIGHT: [SpriteId; 2] = [SpriteId::EnemyWalkRight0, SpriteId::EnemyWalkRight1];
        const LEFT: [SpriteId; 2] = [SpriteId::EnemyWalkLeft0, SpriteId::EnemyWalkLeft1];
        if self.is_squashed() {
            return SpriteId::EnemySquashed;
        }
        let frames = if self.vx < 0.0 { LEFT } else { RIGHT };
        frames[self.clock.frame % frames.len()]
    }
}

/// The goal flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flag {
    pub rect: Aabb,
    pub collected: bool,
    pub clock: FrameClock,
}

impl Flag {
    pub fn new(center: Vec2) -> Self {
        Self {
            rect: Aabb::from_center(center, Vec2::splat(FLAG_SIZE)),
            collected: false,
            clock: FrameClock::default(),
        }
    }

    /// Mark collected. Returns true only for the call that collected it.
    pub fn collect(&mut self) -> bool {
        let first = !self.collected;
        self.collected = true;
        first
    }

    pub fn sprite(&self) -> SpriteId {
        const FRAMES: [SpriteId; 2] = [SpriteId::Flag0, SpriteId::Flag1];
        FRAMES[self.clock.frame % FRAMES.len()]
    }
}

/// Why the player lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Enemy,
    FellOffWorld,
}

/// Gameplay events produced during a tick, drained by the game layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    EnemySquashed { id: u32 },
    EnemyFellOut { id: u32 },
    TrampolineBounce,
    FlagCollected,
    PlayerDied { cause: DeathCause },
}

/// Complete state of one playthrough
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub platforms: Vec<Platform>,
    pub player: Player,
    /// Active enemies (squashed ones linger until their timer expires)
    pub enemies: Vec<Enemy>,
    pub flag: Option<Flag>,
    /// Events emitted since the last drain
    #[serde(skip)]
    pub events: Vec<SimEvent>,
    /// Simulated seconds since the playthrough began
    pub time: f32,
    next_id: u32,
}

impl World {
    /// Build the default level with its player, enemies and flag
    pub fn new() -> Self {
        let platforms = level::load_default_level();
        let flag = Flag::new(level::top_center(&platforms[FLAG_LEDGE]) - Vec2::new(0.0, 30.0));

        let mut world = Self {
            platforms,
            player: Player::default(),
            enemies: Vec::new(),
            flag: Some(flag),
            events: Vec::new(),
            time: 0.0,
            next_id: 1,
        };

        let ground_enemy = Patrol::Range {
            min: 100.0,
            max: WIDTH - 100.0,
        };
        world.spawn_enemy(Vec2::new(200.0, GROUND_TOP), ground_enemy);
        for ledge in [LEFT_LEDGE, SUMMIT_LEDGE] {
            let platform = &world.platforms[ledge];
            let (start, rect) = (level::top_center(platform), platform.rect);
            world.spawn_enemy(start, Patrol::Platform(rect));
        }

        world
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn spawn_enemy(&mut self, midbottom: Vec2, patrol: Patrol) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Enemy::new(id, midbottom, patrol));
        id
    }

    /// Collect the flag if present. Returns true only on the first collection.
    pub fn collect_flag(&mut self) -> bool {
        self.flag.as_mut().is_some_and(Flag::collect)
    }

    /// Take the events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
