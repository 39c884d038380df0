//! Rendering boundary
//!
//! The game emits logical draw calls through the [`Renderer`] capability.
//! Resolving sprites to images is the backend's job; when it cannot, the
//! frame composer falls back to a flat placeholder in a per-entity debug
//! color so the missing asset is obvious but the game stays playable.

mod draw_list;
mod frame;

pub use draw_list::{DrawCommand, DrawList, RectInstance};
pub use frame::{TILE_SIZE, draw_frame};

use glam::Vec2;

use crate::sim::{Aabb, SpriteId};

/// Linear RGBA color
pub type Color = [f32; 4];

/// Errors a renderer reports back to the caller
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    #[error("image asset '{name}' is not available")]
    Missing { name: &'static str },
}

impl AssetError {
    pub fn missing(sprite: SpriteId) -> Self {
        AssetError::Missing {
            name: sprite.asset_name(),
        }
    }
}

/// Renderer capability provided by the platform
pub trait Renderer {
    /// Fill the whole screen
    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, rect: Aabb, color: Color);

    /// Draw a sprite scaled into `dest`
    fn draw_sprite(&mut self, sprite: SpriteId, dest: Aabb) -> Result<(), AssetError>;

    /// Draw text centred on `center`
    fn draw_text(&mut self, text: &str, center: Vec2, size: f32, color: Color);

    /// Backends without circles get a square
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.fill_rect(
            Aabb::from_center(center, Vec2::splat(radius * 2.0)),
            color,
        );
    }
}

/// Draw `sprite` into `dest`, or fill `dest` with `placeholder` if the
/// backend cannot resolve it. Returns whether the real sprite was drawn.
pub fn draw_or_placeholder(
    renderer: &mut dyn Renderer,
    sprite: SpriteId,
    dest: Aabb,
    placeholder: Color,
) -> bool {
    match renderer.draw_sprite(sprite, dest) {
        Ok(()) => true,
        Err(AssetError::Missing { .. }) => {
            renderer.fill_rect(dest, placeholder);
            false
        }
    }
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    const fn rgb(r: u8, g: u8, b: u8) -> Color {
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
    }

    pub const SKY_BLUE: Color = rgb(135, 206, 235);
    pub const STEEL_BLUE: Color = rgb(70, 130, 180);
    pub const WHITE: Color = rgb(255, 255, 255);
    pub const GREEN: Color = rgb(0, 255, 0);
    pub const RED: Color = rgb(255, 0, 0);
    pub const BACKGROUND: Color = rgb(173, 216, 230);

    /// Placeholders for missing sprites
    pub const MISSING_PLATFORM: Color = rgb(255, 0, 0);
    pub const MISSING_PLAYER: Color = rgb(0, 0, 255);
    pub const MISSING_ENEMY: Color = rgb(255, 255, 0);
    pub const MISSING_FLAG: Color = rgb(0, 255, 0);
}
