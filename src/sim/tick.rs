//! Fixed timestep simulation tick
//!
//! Advances one playthrough by `dt`. Within a tick the player moves first,
//! then the flag animates, then enemies, then trampoline timers decay. A win
//! or loss ends the tick immediately.

use super::level::{Platform, tick_trampolines};
use super::state::{
    DeathCause, Enemy, EnemyState, Facing, Flag, Patrol, Player, PlayerAnim, SimEvent, World,
};
use crate::consts::*;

/// Held inputs for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Move left (wins over `right` when both are held)
    pub left: bool,
    /// Move right
    pub right: bool,
    /// Jump pressed this tick (edge, not level)
    pub jump: bool,
}

/// What the tick decided about the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// Player reached the flag
    Won,
    /// Player touched an enemy or fell out of the world
    Lost,
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput, dt: f32) -> TickOutcome {
    world.time += dt;

    let outcome = step_player(world, input, dt);
    if outcome != TickOutcome::Continue {
        return outcome;
    }

    if let Some(flag) = world.flag.as_mut() {
        step_flag(flag, dt);
    }

    step_enemies(world, dt);
    tick_trampolines(&mut world.platforms, dt);

    TickOutcome::Continue
}

/// Move the player and apply every player-driven rule
pub fn step_player(world: &mut World, input: &TickInput, dt: f32) -> TickOutcome {
    let World {
        platforms,
        player,
        enemies,
        flag,
        events,
        ..
    } = world;

    player.clock.accumulate(dt);

    // Input
    player.vel.x = 0.0;
    let moving = if input.left {
        player.vel.x = -PLAYER_SPEED;
        player.facing = Facing::Left;
        true
    } else if input.right {
        player.vel.x = PLAYER_SPEED;
        player.facing = Facing::Right;
        true
    } else {
        false
    };

    // Gravity
    if !player.on_ground {
        player.vel.y = (player.vel.y + PLAYER_GRAVITY * dt).min(PLAYER_MAX_FALL_SPEED);
    }

    if input.jump && player.on_ground {
        player.vel.y = PLAYER_JUMP_POWER;
        player.on_ground = false;
        player.anim = PlayerAnim::Jumping;
    }

    player.anim = if !player.on_ground {
        if player.vel.y < 0.0 {
            PlayerAnim::Jumping
        } else if player.vel.y > 0.0 {
            PlayerAnim::Falling
        } else {
            player.anim
        }
    } else if moving {
        PlayerAnim::Walking
    } else {
        PlayerAnim::Idle
    };

    resolve_horizontal(player, platforms, dt);
    let landed = resolve_vertical(player, platforms, events, moving, dt);

    // Enemies: stomp from above, anything else is lethal
    for enemy in enemies.iter_mut().filter(|e| !e.is_squashed()) {
        if !player.rect.intersects(&enemy.rect) {
            continue;
        }
        let stomp_line = enemy.rect.top() + enemy.rect.height() / 3.0;
        if player.vel.y >= 0.0 && player.rect.bottom() <= stomp_line {
            enemy.squash();
            events.push(SimEvent::EnemySquashed { id: enemy.id });
            player.vel.y = PLAYER_JUMP_POWER / 2.0;
            player.on_ground = false;
        } else {
            return kill_player(player, events, DeathCause::Enemy);
        }
    }

    if let Some(flag) = flag.as_mut() {
        if !flag.collected && player.rect.intersects(&flag.rect) && flag.collect() {
            events.push(SimEvent::FlagCollected);
            return TickOutcome::Won;
        }
    }

    player.on_ground = landed;

    if player.rect.top() > HEIGHT {
        return kill_player(player, events, DeathCause::FellOffWorld);
    }

    if player.anim == PlayerAnim::Idle {
        player.clock.step(PLAYER_IDLE_FRAME_TIME, 2);
    }

    TickOutcome::Continue
}

fn kill_player(player: &mut Player, events: &mut Vec<SimEvent>, cause: DeathCause) -> TickOutcome {
    player.alive = false;
    events.push(SimEvent::PlayerDied { cause });
    TickOutcome::Lost
}

/// Integrate x, push out of platforms against the direction of travel, then
/// clamp to the world edges
fn resolve_horizontal(player: &mut Player, platforms: &[Platform], dt: f32) {
    player.rect.pos.x += player.vel.x * dt;

    for platform in platforms {
        if !player.rect.overlaps(&platform.rect) {
            continue;
        }
        if player.vel.x > 0.0 {
            player.rect.set_right(platform.rect.left());
            player.vel.x = 0.0;
        } else if player.vel.x < 0.0 {
            player.rect.set_left(platform.rect.right());
            player.vel.x = 0.0;
        }
    }

    if player.rect.left() < 0.0 {
        player.rect.set_left(0.0);
        player.vel.x = 0.0;
    }
    if player.rect.right() > WIDTH {
        player.rect.set_right(WIDTH);
        player.vel.x = 0.0;
    }
}

/// Integrate y and settle against platforms. Returns whether the player ended
/// the tick standing on a solid (non-trampoline) surface.
fn resolve_vertical(
    player: &mut Player,
    platforms: &mut [Platform],
    events: &mut Vec<SimEvent>,
    moving: bool,
    dt: f32,
) -> bool {
    player.rect.pos.y += player.vel.y * dt;
    let mut landed = false;

    for platform in platforms.iter_mut() {
        let rect = platform.rect;
        if player.vel.y >= 0.0 {
            // Resting exactly on the top edge still counts as contact
            let touching = player.rect.spans_x(&rect)
                && player.rect.bottom() >= rect.top()
                && player.rect.top() < rect.bottom();
            if !touching {
                continue;
            }
            player.rect.set_bottom(rect.top());
            player.vel.y = 0.0;
            if matches!(player.anim, PlayerAnim::Jumping | PlayerAnim::Falling) {
                player.anim = if moving {
                    PlayerAnim::Walking
                } else {
                    PlayerAnim::Idle
                };
            }

            if platform.is_trampoline() {
                player.vel.y = TRAMPOLINE_JUMP_BOOST;
                player.on_ground = false;
                player.anim = PlayerAnim::Jumping;
                platform.activate();
                events.push(SimEvent::TrampolineBounce);
            } else {
                landed = true;
            }
        } else if player.rect.overlaps(&rect) {
            player.rect.set_top(rect.bottom());
            player.vel.y = 0.0;
            player.anim = PlayerAnim::Falling;
        }
    }

    landed
}

fn step_flag(flag: &mut Flag, dt: f32) {
    if flag.collected {
        return;
    }
    flag.clock.accumulate(dt);
    flag.clock.step(FLAG_FRAME_TIME, 2);
}

/// Advance every enemy, then drop the ones whose squash timer ran out
pub fn step_enemies(world: &mut World, dt: f32) {
    let World {
        platforms,
        enemies,
        events,
        ..
    } = world;

    for enemy in enemies.iter_mut() {
        step_enemy(enemy, platforms, events, dt);
    }

    enemies.retain(|e| {
        if e.is_expired() {
            log::debug!("Enemy {} removed", e.id);
            false
        } else {
            true
        }
    });
}

fn step_enemy(enemy: &mut Enemy, platforms: &[Platform], events: &mut Vec<SimEvent>, dt: f32) {
    if let EnemyState::Squashed { remaining } = &mut enemy.state {
        *remaining -= dt;
        return;
    }

    enemy.clock.accumulate(dt);
    enemy.rect.pos.x += enemy.vx * dt;

    match enemy.patrol {
        Patrol::Platform(bounds) => {
            if enemy.vx < 0.0 && enemy.rect.left() <= bounds.left() {
                enemy.rect.set_left(bounds.left());
                enemy.vx = ENEMY_SPEED;
            } else if enemy.vx > 0.0 && enemy.rect.right() >= bounds.right() {
                enemy.rect.set_right(bounds.right());
                enemy.vx = -ENEMY_SPEED;
            }
        }
        Patrol::Range { min, max } => {
            if (enemy.vx < 0.0 && enemy.rect.left() <= min)
                || (enemy.vx > 0.0 && enemy.rect.right() >= max)
            {
                enemy.vx = -enemy.vx;
            }
        }
    }

    if enemy.vx != 0.0 {
        enemy.clock.step(ENEMY_WALK_FRAME_TIME, 2);
    }

    // Ground support: a platform top within tolerance directly below
    enemy.on_ground = false;
    for platform in platforms {
        let gap = enemy.rect.bottom() - platform.rect.top();
        if enemy.rect.spans_x(&platform.rect) && gap.abs() <= ENEMY_SUPPORT_TOLERANCE {
            enemy.rect.set_bottom(platform.rect.top());
            enemy.on_ground = true;
            break;
        }
    }

    if !enemy.on_ground {
        enemy.rect.pos.y += ENEMY_FALL_SPEED * dt;
        if enemy.rect.top() > HEIGHT {
            enemy.state = EnemyState::Squashed { remaining: 0.0 };
            events.push(SimEvent::EnemyFellOut { id: enemy.id });
        }
    }
}
