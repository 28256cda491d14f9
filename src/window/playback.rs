//! Playback actions forwarded to the embedded media player

use crate::core::PlaybackSettings;

/// Normal playback speed, restored by ResetPlaybackRate
pub const NORMAL_RATE: f64 = 1.0;

/// The video element inside the overlay window
pub trait MediaPlayer {
    /// Seeks relative to the current position (negative = backwards).
    fn seek_by(&mut self, seconds: f64);
    fn toggle_play(&mut self);
    fn set_rate(&mut self, rate: f64);
}

/// Tracks playback rate and forwards actions to the player
pub struct PlaybackController {
    player: Box<dyn MediaPlayer>,
    settings: PlaybackSettings,
    rate: f64,
}

impl PlaybackController {
    pub fn new(player: Box<dyn MediaPlayer>, settings: PlaybackSettings) -> Self {
        Self {
            player,
            settings,
            rate: NORMAL_RATE,
        }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn set_settings(&mut self, settings: PlaybackSettings) {
        self.settings = settings;
        let clamped = self.clamp_rate(self.rate);
        if clamped != self.rate {
            self.apply_rate(clamped);
        }
    }

    pub fn seek_forward(&mut self) {
        self.player.seek_by(self.settings.seek_seconds);
    }

    pub fn seek_backward(&mut self) {
        self.player.seek_by(-self.settings.seek_seconds);
    }

    pub fn toggle_play(&mut self) {
        self.player.toggle_play();
    }

    pub fn increase_rate(&mut self) {
        self.apply_rate(self.clamp_rate(self.rate + self.settings.rate_step));
    }

    pub fn decrease_rate(&mut self) {
        self.apply_rate(self.clamp_rate(self.rate - self.settings.rate_step));
    }

    pub fn reset_rate(&mut self) {
        self.apply_rate(NORMAL_RATE);
    }

    fn clamp_rate(&self, rate: f64) -> f64 {
        let rounded = (rate * 100.0).round() / 100.0;
        let min = self.settings.min_rate.min(self.settings.max_rate);
        rounded.clamp(min, self.settings.max_rate)
    }

    fn apply_rate(&mut self, rate: f64) {
        self.rate = rate;
        self.player.set_rate(rate);
        tracing::debug!(rate, "playback rate changed");
    }
}
