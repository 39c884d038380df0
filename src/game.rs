//! Top-level game state machine
//!
//! [`GamePhase::next`] is the pure transition table. [`Game::apply`] is the
//! only place the current phase changes, and it runs each phase's entry
//! actions (fresh world, music, result sounds).

use glam::Vec2;

use crate::audio::{AudioManager, AudioSink, MusicTrack, SoundEffect};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::platform::{Action, Input, InputSnapshot};
use crate::renderer::{self, Renderer};
use crate::settings::Settings;
use crate::sim::{SimEvent, TickInput, TickOutcome, World, tick};
use crate::ui::{self, MenuButton};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    MainMenu,
    InGame,
    Won,
    GameOver,
    /// Terminal: the driver tears the process down
    Exit,
}

/// Something that may move the game to another phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Start button clicked
    Start,
    /// Escape pressed
    Cancel,
    /// Restart key pressed
    Restart,
    /// Exit button clicked
    Quit,
    FlagReached,
    PlayerLost,
}

impl GamePhase {
    /// Phase reached from `self` on `trigger`, or `None` if it is ignored
    pub fn next(self, trigger: Trigger) -> Option<GamePhase> {
        use GamePhase::*;
        match (self, trigger) {
            (Exit, _) => None,
            (MainMenu, Trigger::Start) => Some(InGame),
            (MainMenu, Trigger::Quit) => Some(Exit),
            (InGame, Trigger::FlagReached) => Some(Won),
            (InGame, Trigger::PlayerLost) => Some(GameOver),
            (InGame, Trigger::Cancel) => Some(MainMenu),
            (InGame, Trigger::Quit) => Some(Exit),
            (Won | GameOver, Trigger::Restart) => Some(MainMenu),
            (Won | GameOver, Trigger::Cancel | Trigger::Quit) => Some(Exit),
            _ => None,
        }
    }

    /// Whether the world is shown in this phase
    pub fn shows_world(self) -> bool {
        matches!(self, GamePhase::InGame | GamePhase::Won | GamePhase::GameOver)
    }
}

/// Game instance holding all state
pub struct Game {
    phase: GamePhase,
    /// Present once a run has been started; kept after it ends for display
    world: Option<World>,
    audio: AudioManager,
    previous_input: InputSnapshot,
    /// Jump pressed but not yet seen by a simulation step
    pending_jump: bool,
    /// Seconds not yet simulated
    accumulator: f32,
}

impl Game {
    /// Boot into the main menu and start its music
    pub fn new(settings: &Settings) -> Self {
        let mut audio = AudioManager::new(settings);
        audio.play_music(MusicTrack::Menu);
        log::info!("Game created (sound {})", if audio.is_sound_on() { "on" } else { "off" });
        Self {
            phase: GamePhase::MainMenu,
            world: None,
            audio,
            previous_input: InputSnapshot::default(),
            pending_jump: false,
            accumulator: 0.0,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    /// Mutable world access for scripted setups
    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.world.as_mut()
    }

    pub fn is_sound_on(&self) -> bool {
        self.audio.is_sound_on()
    }

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    pub fn is_exited(&self) -> bool {
        self.phase == GamePhase::Exit
    }

    /// Apply a trigger. Returns the new phase if a transition happened.
    pub fn apply(&mut self, trigger: Trigger) -> Option<GamePhase> {
        let next = self.phase.next(trigger)?;
        log::info!("{:?} -> {:?} ({:?})", self.phase, next, trigger);
        self.phase = next;

        match next {
            GamePhase::InGame => {
                self.world = Some(World::new());
                self.accumulator = 0.0;
                self.pending_jump = false;
                self.audio.play_music(MusicTrack::Game);
            }
            GamePhase::Won => {
                self.audio.stop_music();
                self.audio.play_sound(SoundEffect::Win);
            }
            GamePhase::GameOver => {
                self.audio.stop_music();
                self.audio.play_sound(SoundEffect::GameOver);
            }
            GamePhase::MainMenu => self.audio.play_music(MusicTrack::Menu),
            GamePhase::Exit => self.audio.stop_music(),
        }

        Some(next)
    }

    /// Handle a pointer click in screen coordinates
    pub fn click(&mut self, pos: Vec2) {
        if self.phase != GamePhase::MainMenu {
            return;
        }
        match ui::hit_test(pos) {
            Some(MenuButton::Start) => {
                self.apply(Trigger::Start);
            }
            Some(MenuButton::Sound) => self.toggle_sound(),
            Some(MenuButton::Exit) => {
                self.apply(Trigger::Quit);
            }
            None => {}
        }
    }

    /// Flip the sound toggle; turning it back on resumes the phase's music
    pub fn toggle_sound(&mut self) {
        if self.audio.toggle() {
            let track = if self.phase == GamePhase::InGame {
                MusicTrack::Game
            } else {
                MusicTrack::Menu
            };
            self.audio.play_music(track);
        }
    }

    /// Run one frame: sample input, dispatch clicks and key presses, then
    /// advance the simulation by `dt` seconds
    pub fn frame(&mut self, input: &mut dyn Input, dt: f32) {
        let now = InputSnapshot::sample(&*input);
        let previous = std::mem::replace(&mut self.previous_input, now);

        for pos in input.take_clicks() {
            self.click(pos);
        }
        if now.pressed(&previous, Action::Restart) {
            self.apply(Trigger::Restart);
        }
        if now.pressed(&previous, Action::Cancel) {
            self.apply(Trigger::Cancel);
        }

        let tick_input = TickInput {
            left: now.left,
            right: now.right,
            jump: now.pressed(&previous, Action::Jump),
        };
        self.update(&tick_input, dt);
    }

    /// Advance the simulation by `dt` seconds of wall time in fixed steps.
    /// A jump press is held until the next step runs and applies to that
    /// step only, even when `dt` is shorter than one step.
    pub fn update(&mut self, input: &TickInput, dt: f32) {
        if self.phase != GamePhase::InGame {
            return;
        }

        self.pending_jump |= input.jump;
        self.accumulator += dt.min(0.1);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
            let step_input = TickInput {
                jump: std::mem::take(&mut self.pending_jump),
                ..*input
            };
            self.step(&step_input, SIM_DT);
            if self.phase != GamePhase::InGame {
                self.accumulator = 0.0;
                break;
            }
        }
    }

    /// Run exactly one simulation tick of length `dt`
    pub fn step(&mut self, input: &TickInput, dt: f32) {
        if self.phase != GamePhase::InGame {
            return;
        }
        let Some(world) = self.world.as_mut() else {
            return;
        };

        let outcome = tick(world, input, dt);
        for event in world.drain_events() {
            match event {
                SimEvent::EnemySquashed { id } => {
                    log::debug!("Enemy {} squashed", id);
                    self.audio.play_sound(SoundEffect::Squash);
                }
                SimEvent::EnemyFellOut { id } => log::debug!("Enemy {} fell out of the world", id),
                SimEvent::PlayerDied { cause } => log::info!("Player died: {:?}", cause),
                SimEvent::TrampolineBounce | SimEvent::FlagCollected => {}
            }
        }

        match outcome {
            TickOutcome::Won => {
                self.apply(Trigger::FlagReached);
            }
            TickOutcome::Lost => {
                self.apply(Trigger::PlayerLost);
            }
            TickOutcome::Continue => {}
        }
    }

    /// Forward queued audio requests to the platform
    pub fn flush_audio(&mut self, sink: &mut dyn AudioSink) {
        self.audio.flush(sink);
    }

    /// Draw the current state (read-only)
    pub fn draw(&self, renderer: &mut dyn Renderer) {
        renderer::draw_frame(self, renderer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioRequest, RecordingAudio};
    use crate::consts::*;
    use crate::platform::ScriptedInput;
    use crate::sim::{Aabb, Patrol, Player};

    fn start_point() -> Vec2 {
        MenuButton::Start.rect().center()
    }

    fn started_game() -> Game {
        let mut game = Game::new(&Settings::default());
        game.click(start_point());
        assert_eq!(game.phase(), GamePhase::InGame);
        game
    }

    #[test]
    fn test_transition_table() {
        use GamePhase::*;
        assert_eq!(MainMenu.next(Trigger::Start), Some(InGame));
        assert_eq!(MainMenu.next(Trigger::Cancel), None);
        assert_eq!(MainMenu.next(Trigger::Quit), Some(Exit));
        assert_eq!(InGame.next(Trigger::Cancel), Some(MainMenu));
        assert_eq!(InGame.next(Trigger::FlagReached), Some(Won));
        assert_eq!(InGame.next(Trigger::PlayerLost), Some(GameOver));
        assert_eq!(InGame.next(Trigger::Restart), None);
        assert_eq!(Won.next(Trigger::Restart), Some(MainMenu));
        assert_eq!(GameOver.next(Trigger::Cancel), Some(Exit));
        assert_eq!(Won.next(Trigger::FlagReached), None);
        assert_eq!(GameOver.next(Trigger::PlayerLost), None);
        for trigger in [Trigger::Start, Trigger::Cancel, Trigger::Restart, Trigger::Quit] {
            assert_eq!(Exit.next(trigger), None);
        }
    }

    #[test]
    fn test_start_click_builds_fresh_world() {
        let mut game = Game::new(&Settings::default());
        assert_eq!(game.phase(), GamePhase::MainMenu);
        assert!(game.world().is_none());

        game.click(start_point());
        assert_eq!(game.phase(), GamePhase::InGame);
        let world = game.world().unwrap();
        assert_eq!(world.player.rect.midbottom(), Player::spawn_point());
        assert_eq!(world.enemies.len(), 3);
        assert!(world.flag.is_some());

        let mut sink = RecordingAudio::default();
        game.flush_audio(&mut sink);
        assert_eq!(sink.requests.last(), Some(&AudioRequest::PlayMusic(MusicTrack::Game)));
    }

    #[test]
    fn test_running_right_is_blocked_at_world_edge() {
        let mut game = started_game();
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..120 {
            game.step(&right, SIM_DT);
        }
        assert_eq!(game.phase(), GamePhase::InGame);
        let player = &game.world().unwrap().player;
        assert_eq!(player.rect.right(), WIDTH);
        assert_eq!(player.vel.x, 0.0);
        assert!(player.alive);
    }

    #[test]
    fn test_falling_out_ends_game_once() {
        let mut game = started_game();
        {
            let world = game.world_mut().unwrap();
            world.platforms.clear();
            world.enemies.clear();
            world.flag = None;
        }
        let mut sink = RecordingAudio::default();
        game.flush_audio(&mut sink);
        sink.requests.clear();

        for _ in 0..400 {
            game.step(&TickInput::default(), SIM_DT);
        }
        assert_eq!(game.phase(), GamePhase::GameOver);
        game.flush_audio(&mut sink);
        assert_eq!(sink.count(AudioRequest::PlaySound(SoundEffect::GameOver)), 1);
        assert_eq!(sink.count(AudioRequest::StopMusic), 1);

        // Further ticks are ignored
        let before = game.world().unwrap().player.rect;
        game.step(&TickInput::default(), SIM_DT);
        assert_eq!(game.world().unwrap().player.rect, before);
    }

    #[test]
    fn test_reaching_flag_wins_with_single_sound() {
        let mut game = started_game();
        {
            let world = game.world_mut().unwrap();
            world.enemies.clear();
            let flag_rect = world.flag.as_ref().unwrap().rect;
            world.player.rect =
                Aabb::from_midbottom(Vec2::new(flag_rect.center().x, 410.0), world.player.rect.size);
        }
        let mut sink = RecordingAudio::default();
        game.step(&TickInput::default(), SIM_DT);
        assert_eq!(game.phase(), GamePhase::Won);
        assert!(game.world().unwrap().flag.as_ref().unwrap().collected);

        // A second collect request has no effect
        assert!(!game.world_mut().unwrap().collect_flag());
        assert_eq!(game.apply(Trigger::FlagReached), None);
        game.step(&TickInput::default(), SIM_DT);

        game.flush_audio(&mut sink);
        assert_eq!(sink.count(AudioRequest::PlaySound(SoundEffect::Win)), 1);
    }

    #[test]
    fn test_stomp_plays_squash() {
        let mut game = started_game();
        {
            let world = game.world_mut().unwrap();
            world.enemies.clear();
            world.spawn_enemy(
                Vec2::new(600.0, GROUND_TOP),
                Patrol::Range {
                    min: 100.0,
                    max: 1200.0,
                },
            );
            world.enemies[0].vx = 0.0;
            world.player.rect = Aabb::from_midbottom(Vec2::new(600.0, 595.0), world.player.rect.size);
            world.player.on_ground = false;
        }
        let mut sink = RecordingAudio::default();
        game.step(&TickInput::default(), SIM_DT);
        game.flush_audio(&mut sink);
        assert_eq!(game.phase(), GamePhase::InGame);
        assert_eq!(sink.count(AudioRequest::PlaySound(SoundEffect::Squash)), 1);
    }

    #[test]
    fn test_escape_returns_to_menu_and_restart_from_result() {
        let mut game = started_game();
        assert_eq!(game.apply(Trigger::Cancel), Some(GamePhase::MainMenu));

        game.click(start_point());
        game.apply(Trigger::PlayerLost);
        assert_eq!(game.phase(), GamePhase::GameOver);
        // Clicks outside the menu do nothing
        game.click(start_point());
        assert_eq!(game.phase(), GamePhase::GameOver);

        assert_eq!(game.apply(Trigger::Restart), Some(GamePhase::MainMenu));
        game.click(start_point());
        game.apply(Trigger::FlagReached);
        assert_eq!(game.apply(Trigger::Cancel), Some(GamePhase::Exit));
        assert!(game.is_exited());
        assert_eq!(game.apply(Trigger::Start), None);
    }

    #[test]
    fn test_restart_reinitializes_world() {
        let mut game = started_game();
        game.world_mut().unwrap().enemies.clear();
        game.apply(Trigger::Cancel);
        game.click(start_point());
        assert_eq!(game.world().unwrap().enemies.len(), 3);
    }

    #[test]
    fn test_exit_button() {
        let mut game = Game::new(&Settings::default());
        game.click(MenuButton::Exit.rect().center());
        assert!(game.is_exited());
    }

    #[test]
    fn test_sound_toggle_from_menu() {
        let mut game = Game::new(&Settings::default());
        let mut sink = RecordingAudio::default();
        game.flush_audio(&mut sink);
        assert_eq!(sink.requests.last(), Some(&AudioRequest::PlayMusic(MusicTrack::Menu)));
        sink.requests.clear();

        game.click(MenuButton::Sound.rect().center());
        assert!(!game.is_sound_on());
        game.flush_audio(&mut sink);
        assert_eq!(sink.requests, vec![AudioRequest::SetVolume(0.0)]);
        sink.requests.clear();

        // Muted: starting the game asks for nothing
        game.click(start_point());
        game.flush_audio(&mut sink);
        assert!(sink.requests.is_empty());
        game.apply(Trigger::Cancel);

        game.click(MenuButton::Sound.rect().center());
        assert!(game.is_sound_on());
        game.flush_audio(&mut sink);
        assert_eq!(
            sink.requests,
            vec![
                AudioRequest::SetVolume(1.0),
                AudioRequest::StopMusic,
                AudioRequest::PlayMusic(MusicTrack::Menu)
            ]
        );
    }

    #[test]
    fn test_frame_edges_and_clicks() {
        let mut game = Game::new(&Settings::default());
        let mut input = ScriptedInput::new()
            .click(0, start_point())
            .hold(Action::Jump, 1..10)
            .hold(Action::Cancel, 20..22);

        // Frame 0: start click
        game.frame(&mut input, SIM_DT);
        assert_eq!(game.phase(), GamePhase::InGame);
        input.advance();

        // Frame 1: jump press leaves the ground
        game.frame(&mut input, SIM_DT);
        assert!(!game.world().unwrap().player.on_ground);
        input.advance();

        while input.frame() < 20 {
            game.frame(&mut input, SIM_DT);
            input.advance();
        }
        // Frame 20: escape back to menu, held escape is not repeated
        game.frame(&mut input, SIM_DT);
        input.advance();
        game.frame(&mut input, SIM_DT);
        assert_eq!(game.phase(), GamePhase::MainMenu);
    }

    #[test]
    fn test_jump_press_survives_short_frames() {
        let dt = 1.0 / 144.0;
        let mut game = Game::new(&Settings::default());
        let mut input = ScriptedInput::new()
            .click(0, start_point())
            .hold(Action::Jump, 1..30);

        game.frame(&mut input, dt);
        assert_eq!(game.phase(), GamePhase::InGame);
        input.advance();

        let mut left_ground = false;
        while input.frame() < 30 {
            game.frame(&mut input, dt);
            left_ground |= !game.world().unwrap().player.on_ground;
            input.advance();
        }
        assert!(left_ground);
    }

    #[test]
    fn test_held_jump_does_not_repeat_after_landing() {
        let mut game = Game::new(&Settings::default());
        let mut input = ScriptedInput::new()
            .click(0, start_point())
            .hold(Action::Jump, 1..90);

        game.frame(&mut input, SIM_DT);
        input.advance();
        {
            let player = &mut game.world_mut().unwrap().player;
            player.rect = Aabb::from_midbottom(Vec2::new(1200.0, GROUND_TOP - 50.0), player.rect.size);
            player.on_ground = false;
        }

        // Pressed in the air (ignored), then held through the landing
        while input.frame() < 90 {
            game.frame(&mut input, SIM_DT);
            input.advance();
        }
        let player = &game.world().unwrap().player;
        assert!(player.on_ground);
        assert_eq!(player.rect.bottom(), GROUND_TOP);
        assert_eq!(player.vel.y, 0.0);
    }

    #[test]
    fn test_update_uses_fixed_steps() {
        let mut game = started_game();
        game.update(&TickInput::default(), SIM_DT * 3.5);
        let time = game.world().unwrap().time;
        assert!((time - SIM_DT * 3.0).abs() < 1e-5);
    }
}
