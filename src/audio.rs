//! Audio requests
//!
//! The game never talks to an audio device. It queues fire-and-forget
//! requests in an [`AudioManager`], which the frame driver flushes into
//! whatever [`AudioSink`] the platform provides.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicTrack {
    Menu,
    Game,
}

impl MusicTrack {
    pub fn asset_name(&self) -> &'static str {
        match self {
            MusicTrack::Menu => "menu_music",
            MusicTrack::Game => "game_music",
        }
    }
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Enemy stomped
    Squash,
    /// Flag reached
    Win,
    /// Player lost
    GameOver,
}

impl SoundEffect {
    pub fn asset_name(&self) -> &'static str {
        match self {
            SoundEffect::Squash => "squash_sound",
            SoundEffect::Win => "win_sound",
            SoundEffect::GameOver => "game_over_sound",
        }
    }
}

/// A single request for the audio backend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AudioRequest {
    PlayMusic(MusicTrack),
    StopMusic,
    /// Master volume (0.0 - 1.0)
    SetVolume(f32),
    PlaySound(SoundEffect),
}

/// Audio capability provided by the platform
pub trait AudioSink {
    fn play_music(&mut self, track: MusicTrack);
    fn stop_music(&mut self);
    fn set_volume(&mut self, level: f32);
    fn play_sound(&mut self, effect: SoundEffect);

    /// Dispatch a queued request
    fn submit(&mut self, request: AudioRequest) {
        match request {
            AudioRequest::PlayMusic(track) => self.play_music(track),
            AudioRequest::StopMusic => self.stop_music(),
            AudioRequest::SetVolume(level) => self.set_volume(level),
            AudioRequest::PlaySound(effect) => self.play_sound(effect),
        }
    }
}

/// Audio manager for the game
///
/// Gates every request on the sound toggle so callers can fire and forget.
#[derive(Debug, Clone)]
pub struct AudioManager {
    sound_on: bool,
    volume: f32,
    pending: Vec<AudioRequest>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        Self {
            sound_on: settings.sound_enabled,
            volume: settings.volume.clamp(0.0, 1.0),
            pending: Vec::new(),
        }
    }

    pub fn is_sound_on(&self) -> bool {
        self.sound_on
    }

    /// Flip the sound toggle. Turning sound off silences the backend;
    /// turning it on restores the volume (the caller picks the music).
    pub fn toggle(&mut self) -> bool {
        self.sound_on = !self.sound_on;
        let level = if self.sound_on { self.volume } else { 0.0 };
        self.pending.push(AudioRequest::SetVolume(level));
        log::info!("Sound {}", if self.sound_on { "on" } else { "off" });
        self.sound_on
    }

    /// Replace the current music with `track`
    pub fn play_music(&mut self, track: MusicTrack) {
        if self.sound_on {
            self.pending.push(AudioRequest::StopMusic);
            self.pending.push(AudioRequest::PlayMusic(track));
        }
    }

    pub fn stop_music(&mut self) {
        if self.sound_on {
            self.pending.push(AudioRequest::StopMusic);
        }
    }

    pub fn play_sound(&mut self, effect: SoundEffect) {
        if self.sound_on {
            self.pending.push(AudioRequest::PlaySound(effect));
        }
    }

    /// Requests queued since the last flush
    pub fn pending(&self) -> &[AudioRequest] {
        &self.pending
    }

    /// Forward queued requests to the backend, oldest first
    pub fn flush(&mut self, sink: &mut dyn AudioSink) {
        for request in self.pending.drain(..) {
            sink.submit(request);
        }
    }
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play_music(&mut self, track: MusicTrack) {
        log::info!("music: play {}", track.asset_name());
    }

    fn stop_music(&mut self) {
        log::info!("music: stop");
    }

    fn set_volume(&mut self, level: f32) {
        log::info!("music: volume {:.2}", level);
    }

    fn play_sound(&mut self, effect: SoundEffect) {
        log::info!("sound: {}", effect.asset_name());
    }
}

/// Sink that records every request it receives
#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub requests: Vec<AudioRequest>,
}

impl RecordingAudio {
    pub fn count(&self, request: AudioRequest) -> usize {
        self.requests.iter().filter(|r| **r == request).count()
    }
}

impl AudioSink for RecordingAudio {
    fn play_music(&mut self, track: MusicTrack) {
        self.requests.push(AudioRequest::PlayMusic(track));
    }

    fn stop_music(&mut self) {
        self.requests.push(AudioRequest::StopMusic);
    }

    fn set_volume(&mut self, level: f32) {
        self.requests.push(AudioRequest::SetVolume(level));
    }

    fn play_sound(&mut self, effect: SoundEffect) {
        self.requests.push(AudioRequest::PlaySound(effect));
    }
}
