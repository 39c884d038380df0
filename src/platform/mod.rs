//! Platform abstraction layer
//!
//! Handles the input side of the platform boundary:
//! - Held-key state sampled once per frame
//! - Pointer clicks queued between frames (menu hit-testing)
//! - A scripted implementation for headless runs and tests

use std::ops::Range;

use glam::Vec2;

/// Logical inputs the game understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    /// Escape: leave the run, or quit from a result screen
    Cancel,
    /// Back to the menu from a result screen
    Restart,
}

/// Input capability provided by the platform
pub trait Input {
    /// Whether `action` is currently held
    fn is_held(&self, action: Action) -> bool;

    /// Clicks since the last call, in screen coordinates
    fn take_clicks(&mut self) -> Vec<Vec2>;
}

/// Held state of every action for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub cancel: bool,
    pub restart: bool,
}

impl InputSnapshot {
    pub fn sample(input: &dyn Input) -> Self {
        Self {
            left: input.is_held(Action::MoveLeft),
            right: input.is_held(Action::MoveRight),
            jump: input.is_held(Action::Jump),
            cancel: input.is_held(Action::Cancel),
            restart: input.is_held(Action::Restart),
        }
    }

    pub fn held(&self, action: Action) -> bool {
        match action {
            Action::MoveLeft => self.left,
            Action::MoveRight => self.right,
            Action::Jump => self.jump,
            Action::Cancel => self.cancel,
            Action::Restart => self.restart,
        }
    }

    /// Held now but not in `previous`
    pub fn pressed(&self, previous: &InputSnapshot, action: Action) -> bool {
        self.held(action) && !previous.held(action)
    }
}

/// Input replayed from a frame-indexed script
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frame: u64,
    holds: Vec<(Range<u64>, Action)>,
    clicks: Vec<(u64, Vec2)>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `action` for the frames in `frames`
    pub fn hold(mut self, action: Action, frames: Range<u64>) -> Self {
        self.holds.push((frames, action));
        self
    }

    /// Click at `pos` on `frame`
    pub fn click(mut self, frame: u64, pos: Vec2) -> Self {
        self.clicks.push((frame, pos));
        self
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Move to the next frame
    pub fn advance(&mut self) {
        self.frame += 1;
    }

    /// Last frame the script does anything on
    pub fn last_frame(&self) -> u64 {
        let holds = self.holds.iter().map(|(r, _)| r.end);
        let clicks = self.clicks.iter().map(|(f, _)| f + 1);
        holds.chain(clicks).max().unwrap_or(0)
    }
}

impl Input for ScriptedInput {
    fn is_held(&self, action: Action) -> bool {
        self.holds
            .iter()
            .any(|(frames, a)| *a == action && frames.contains(&self.frame))
    }

    fn take_clicks(&mut self) -> Vec<Vec2> {
        let frame = self.frame;
        let (now, later): (Vec<_>, Vec<_>) = self.clicks.drain(..).partition(|(f, _)| *f <= frame);
        self.clicks = later;
        now.into_iter().map(|(_, pos)| pos).collect()
    }
}
