//! Recording renderer
//!
//! Captures a frame as a list of commands. Headless runs and tests inspect
//! the list directly; a GPU backend uploads the flattened rectangles.

use std::collections::HashSet;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::{AssetError, Color, Renderer};
use crate::sim::{Aabb, SpriteId};

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillRect { rect: Aabb, color: Color },
    FillCircle { center: Vec2, radius: f32, color: Color },
    Sprite { sprite: SpriteId, dest: Aabb },
    Text { text: String, center: Vec2, size: f32, color: Color },
}

/// Flat colored rectangle, laid out for a GPU instance buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct RectInstance {
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub color: [f32; 4],
}

impl RectInstance {
    pub fn new(rect: &Aabb, color: Color) -> Self {
        Self {
            position: rect.pos.to_array(),
            size: rect.size.to_array(),
            color,
        }
    }
}

/// Renderer that records commands for one frame at a time
#[derive(Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    available: HashSet<SpriteId>,
    reported_missing: HashSet<SpriteId>,
}

impl DrawList {
    /// Backend that can resolve the given sprites only
    pub fn with_assets(sprites: impl IntoIterator<Item = SpriteId>) -> Self {
        Self {
            available: sprites.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn with_all_assets() -> Self {
        Self::with_assets(SpriteId::ALL)
    }

    /// Backend with no images at all (every sprite falls back)
    pub fn without_assets() -> Self {
        Self::default()
    }

    /// Forget the previous frame's commands
    pub fn begin_frame(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Filled rectangles and circles (as squares), in draw order
    pub fn rect_instances(&self) -> Vec<RectInstance> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::FillRect { rect, color } => Some(RectInstance::new(rect, *color)),
                DrawCommand::FillCircle {
                    center,
                    radius,
                    color,
                } => {
                    let rect = Aabb::from_center(*center, Vec2::splat(radius * 2.0));
                    Some(RectInstance::new(&rect, *color))
                }
                _ => None,
            })
            .collect()
    }

    /// Rectangle instances as raw bytes for upload
    pub fn instance_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.rect_instances()).to_vec()
    }

    /// Text strings drawn this frame
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Sprites this backend failed to resolve so far
    pub fn missing(&self) -> &HashSet<SpriteId> {
        &self.reported_missing
    }
}

impl Renderer for DrawList {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, rect: Aabb, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn draw_sprite(&mut self, sprite: SpriteId, dest: Aabb) -> Result<(), AssetError> {
        if !self.available.contains(&sprite) {
            if self.reported_missing.insert(sprite) {
                log::warn!("Missing image '{}', drawing placeholder", sprite.asset_name());
            }
            return Err(AssetError::missing(sprite));
        }
        self.commands.push(DrawCommand::Sprite { sprite, dest });
        Ok(())
    }

    fn draw_text(&mut self, text: &str, center: Vec2, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            center,
            size,
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::colors;

    #[test]
    fn test_instances_flatten_rects_and_circles() {
        let mut list = DrawList::without_assets();
        list.clear(colors::BACKGROUND);
        list.fill_rect(Aabb::new(1.0, 2.0, 3.0, 4.0), colors::RED);
        list.fill_circle(Vec2::new(10.0, 10.0), 5.0, colors::WHITE);
        list.draw_text("hi", Vec2::ZERO, 10.0, colors::WHITE);

        let instances = list.rect_instances();
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].position, [1.0, 2.0]);
        assert_eq!(instances[1].position, [5.0, 5.0]);
        assert_eq!(instances[1].size, [10.0, 10.0]);
        assert_eq!(
            list.instance_bytes().len(),
            2 * std::mem::size_of::<RectInstance>()
        );
    }

    #[test]
    fn test_missing_sprite_reported_once() {
        let mut list = DrawList::with_assets([SpriteId::Ground]);
        let dest = Aabb::new(0.0, 0.0, 1.0, 1.0);
        assert!(list.draw_sprite(SpriteId::Ground, dest).is_ok());
        assert!(list.draw_sprite(SpriteId::Flag0, dest).is_err());
        assert!(list.draw_sprite(SpriteId::Flag0, dest).is_err());
        assert_eq!(list.missing().len(), 1);
        assert_eq!(list.commands().len(), 1);
    }

    #[test]
    fn test_begin_frame_clears_commands() {
        let mut list = DrawList::without_assets();
        list.clear(colors::SKY_BLUE);
        list.begin_frame();
        assert!(list.commands().is_empty());
    }
}
