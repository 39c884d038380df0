//! Frame composition: turns game state into renderer calls

use glam::Vec2;

use super::{Color, Renderer, colors, draw_or_placeholder};
use crate::consts::{HEIGHT, TITLE, WIDTH};
use crate::game::{Game, GamePhase};
use crate::sim::{Aabb, Platform, PlatformKind, SpriteId, World};
use crate::ui::{BUTTON_RADIUS, MenuButton};

/// Edge length of one ground or ledge tile
pub const TILE_SIZE: f32 = 50.0;

const RESULT_HINT: &str = "Aperte 'R' para voltar ao MENU ou 'ESC' para fechar o jogo";

/// Draw one full frame for the current phase
pub fn draw_frame(game: &Game, r: &mut dyn Renderer) {
    let phase = game.phase();
    if phase == GamePhase::MainMenu {
        draw_menu(r, game.is_sound_on());
        return;
    }

    r.clear(colors::BACKGROUND);
    if let Some(world) = game.world().filter(|_| phase.shows_world()) {
        draw_world(r, world);
    }
    match phase {
        GamePhase::Won => draw_banner(r, "VOCÊ VENCEU!", colors::GREEN),
        GamePhase::GameOver => draw_banner(r, "FIM DE JOGO!", colors::RED),
        _ => {}
    }
}

fn draw_menu(r: &mut dyn Renderer, sound_on: bool) {
    r.clear(colors::SKY_BLUE);
    r.draw_text(TITLE, Vec2::new(WIDTH / 2.0, HEIGHT / 4.0), 74.0, colors::WHITE);

    for button in MenuButton::ALL {
        let rect = button.rect();
        fill_rounded_rect(r, rect, BUTTON_RADIUS, colors::STEEL_BLUE);
        r.draw_text(button.label(sound_on), rect.center(), 36.0, colors::WHITE);
    }
}

/// Two overlapping rects plus a circle in each corner
fn fill_rounded_rect(r: &mut dyn Renderer, rect: Aabb, radius: f32, color: Color) {
    let inset = Vec2::splat(radius);
    r.fill_rect(
        Aabb::new(rect.left() + radius, rect.top(), rect.width() - 2.0 * radius, rect.height()),
        color,
    );
    r.fill_rect(
        Aabb::new(rect.left(), rect.top() + radius, rect.width(), rect.height() - 2.0 * radius),
        color,
    );
    let corners = [
        rect.pos + inset,
        Vec2::new(rect.right() - radius, rect.top() + radius),
        Vec2::new(rect.left() + radius, rect.bottom() - radius),
        Vec2::new(rect.right(), rect.bottom()) - inset,
    ];
    for corner in corners {
        r.fill_circle(corner, radius, color);
    }
}

fn draw_world(r: &mut dyn Renderer, world: &World) {
    for platform in &world.platforms {
        draw_platform(r, platform);
    }

    if let Some(flag) = world.flag.as_ref().filter(|f| !f.collected) {
        draw_or_placeholder(r, flag.sprite(), flag.rect, colors::MISSING_FLAG);
    }

    for enemy in &world.enemies {
        draw_or_placeholder(r, enemy.sprite(), enemy.rect, colors::MISSING_ENEMY);
    }

    let player = &world.player;
    draw_or_placeholder(r, player.sprite(), player.rect, colors::MISSING_PLAYER);
}

fn draw_platform(r: &mut dyn Renderer, platform: &Platform) {
    let rect = platform.rect;
    match platform.kind {
        PlatformKind::Ground => {
            let tiles = (rect.width() / TILE_SIZE).ceil() as usize;
            for i in 0..tiles {
                let tile = Aabb::new(rect.left() + i as f32 * TILE_SIZE, rect.top(), TILE_SIZE, rect.height());
                if r.draw_sprite(SpriteId::Ground, tile).is_err() {
                    r.fill_rect(rect, colors::MISSING_PLATFORM);
                    return;
                }
            }
        }
        PlatformKind::Floating => {
            let tile_at = |x: f32| Aabb::new(x, rect.top(), TILE_SIZE, rect.height());
            let right_cap = rect.right() - TILE_SIZE;

            // Without middle tiles the ledge is unrecognisable; fall back whole
            let mut x = rect.left() + TILE_SIZE;
            while x < right_cap {
                if r.draw_sprite(SpriteId::PlatformMiddle, tile_at(x)).is_err() {
                    r.fill_rect(rect, colors::MISSING_PLATFORM);
                    return;
                }
                x += TILE_SIZE;
            }
            draw_or_placeholder(r, SpriteId::PlatformLeft, tile_at(rect.left()), colors::MISSING_PLATFORM);
            draw_or_placeholder(
                r,
                SpriteId::PlatformRight,
                tile_at(right_cap),
                colors::MISSING_PLATFORM,
            );
        }
        PlatformKind::Trampoline { .. } => {
            draw_or_placeholder(r, platform.sprite(), rect, colors::MISSING_PLATFORM);
        }
    }
}

fn draw_banner(r: &mut dyn Renderer, text: &str, color: Color) {
    let center = Vec2::new(WIDTH / 2.0, HEIGHT / 2.0);
    r.draw_text(text, center, 100.0, color);
    r.draw_text(RESULT_HINT, center + Vec2::new(0.0, 100.0), 30.0, colors::WHITE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Trigger;
    use crate::renderer::{DrawCommand, DrawList};
    use crate::settings::Settings;

    fn fills_with(list: &DrawList, color: Color) -> Vec<Aabb> {
        list.commands()
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::FillRect { rect, color: c } if *c == color => Some(*rect),
                _ => None,
            })
            .collect()
    }

    fn started() -> Game {
        let mut game = Game::new(&Settings::default());
        game.apply(Trigger::Start);
        game
    }

    #[test]
    fn test_menu_frame() {
        let game = Game::new(&Settings::default());
        let mut list = DrawList::with_all_assets();
        draw_frame(&game, &mut list);

        assert_eq!(list.commands()[0], DrawCommand::Clear(colors::SKY_BLUE));
        let texts = list.texts();
        assert_eq!(texts, vec![TITLE, "Jogar", "Músicas e sons: ON", "Sair"]);
        let circles = list
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillCircle { .. }))
            .count();
        assert_eq!(circles, 12);
    }

    #[test]
    fn test_world_with_missing_assets_uses_placeholders() {
        let game = started();
        let world = game.world().cloned().unwrap_or_default();
        let mut list = DrawList::without_assets();
        draw_frame(&game, &mut list);

        assert_eq!(fills_with(&list, colors::MISSING_PLAYER), vec![world.player.rect]);
        assert_eq!(fills_with(&list, colors::MISSING_ENEMY).len(), 3);
        assert_eq!(fills_with(&list, colors::MISSING_FLAG).len(), 1);
        // One fill per platform when nothing can be tiled
        let platform_fills = fills_with(&list, colors::MISSING_PLATFORM);
        let expected: Vec<Aabb> = world.platforms.iter().map(|p| p.rect).collect();
        assert_eq!(platform_fills, expected);
    }

    #[test]
    fn test_world_with_assets_draws_sprites() {
        let game = started();
        let mut list = DrawList::with_all_assets();
        draw_frame(&game, &mut list);

        assert!(list.rect_instances().is_empty());
        let sprites: Vec<SpriteId> = list
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Sprite { sprite, .. } => Some(*sprite),
                _ => None,
            })
            .collect();
        let ground = sprites.iter().filter(|s| **s == SpriteId::Ground).count();
        assert_eq!(ground, (WIDTH / TILE_SIZE) as usize);
        assert_eq!(sprites.iter().filter(|s| **s == SpriteId::PlatformLeft).count(), 3);
        assert_eq!(sprites.last(), Some(&SpriteId::PlayerIdle0));
        assert!(list.texts().is_empty());
    }

    #[test]
    fn test_ledge_tiles_cover_full_width() {
        let world = World::new();
        for platform in world.platforms.iter().filter(|p| p.kind == PlatformKind::Floating) {
            let mut list = DrawList::with_all_assets();
            draw_platform(&mut list, platform);
            let tiles: Vec<Aabb> = list
                .commands()
                .iter()
                .filter_map(|c| match c {
                    DrawCommand::Sprite { dest, .. } => Some(*dest),
                    _ => None,
                })
                .collect();

            let mut covered = platform.rect.left();
            let mut spans: Vec<(f32, f32)> = tiles.iter().map(|t| (t.left(), t.right())).collect();
            spans.sort_by(|a, b| a.0.total_cmp(&b.0));
            for (left, right) in spans {
                assert!(left <= covered, "gap at x={covered} on {:?}", platform.rect);
                covered = covered.max(right);
            }
            assert_eq!(covered, platform.rect.right());
        }
    }

    #[test]
    fn test_exit_screen_is_blank() {
        let mut game = started();
        game.apply(Trigger::Quit);
        let mut list = DrawList::with_all_assets();
        draw_frame(&game, &mut list);
        assert_eq!(list.commands(), &[DrawCommand::Clear(colors::BACKGROUND)]);
    }

    #[test]
    fn test_collected_flag_not_drawn() {
        let mut game = started();
        if let Some(world) = game.world_mut() {
            assert!(world.collect_flag());
        }
        let mut list = DrawList::without_assets();
        draw_frame(&game, &mut list);
        assert!(fills_with(&list, colors::MISSING_FLAG).is_empty());
    }

    #[test]
    fn test_result_banners() {
        let mut game = started();
        game.apply(Trigger::FlagReached);
        let mut list = DrawList::with_all_assets();
        draw_frame(&game, &mut list);
        assert_eq!(list.texts(), vec!["VOCÊ VENCEU!", RESULT_HINT]);

        let mut game = started();
        game.apply(Trigger::PlayerLost);
        list.begin_frame();
        draw_frame(&game, &mut list);
        assert_eq!(list.texts(), vec!["FIM DE JOGO!", RESULT_HINT]);
    }
}
