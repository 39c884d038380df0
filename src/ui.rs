//! Main menu layout and hit-testing

use glam::Vec2;

use crate::consts::{HEIGHT, WIDTH};
use crate::sim::Aabb;

/// Buttons on the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuButton {
    Start,
    Sound,
    Exit,
}

impl MenuButton {
    pub const ALL: [MenuButton; 3] = [MenuButton::Start, MenuButton::Sound, MenuButton::Exit];

    /// Screen rectangle of the button
    pub fn rect(&self) -> Aabb {
        let offset = match self {
            MenuButton::Start => -50.0,
            MenuButton::Sound => 30.0,
            MenuButton::Exit => 110.0,
        };
        Aabb::new(WIDTH / 2.0 - 150.0, HEIGHT / 2.0 + offset, 300.0, 60.0)
    }

    /// Button caption; the sound button reflects the current toggle
    pub fn label(&self, sound_on: bool) -> &'static str {
        match self {
            MenuButton::Start => "Jogar",
            MenuButton::Sound if sound_on => "Músicas e sons: ON",
            MenuButton::Sound => "Músicas e sons: OFF",
            MenuButton::Exit => "Sair",
        }
    }
}

/// Corner radius used when drawing buttons
pub const BUTTON_RADIUS: f32 = 15.0;

/// Find the button under a click, if any
pub fn hit_test(point: Vec2) -> Option<MenuButton> {
    MenuButton::ALL
        .into_iter()
        .find(|button| button.rect().contains_point(point))
}
