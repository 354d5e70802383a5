//! Playback control for a clip.

/// Tracks playback position as a ratio of the clip duration.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipController {
    time_ratio: f32,
    previous_time_ratio: f32,
    playback_speed: f32,
    playing: bool,
    looping: bool,
}

impl Default for ClipController {
    fn default() -> Self {
        Self {
            time_ratio: 0.0,
            previous_time_ratio: 0.0,
            playback_speed: 1.0,
            playing: true,
            looping: true,
        }
    }
}

impl ClipController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt` seconds of a clip lasting `duration` seconds.
    pub fn update(&mut self, duration: f32, dt: f32) {
        if !self.playing || duration <= 0.0 {
            self.previous_time_ratio = self.time_ratio;
            return;
        }
        let time = self.time_ratio * duration + dt * self.playback_speed;
        self.set_time_ratio(time / duration);
    }

    /// Move playback to `ratio`, wrapping when looping and clamping
    /// otherwise. The previous ratio is kept.
    pub fn set_time_ratio(&mut self, ratio: f32) {
        self.previous_time_ratio = self.time_ratio;
        self.time_ratio = if self.looping {
            ratio.rem_euclid(1.0)
        } else {
            ratio.clamp(0.0, 1.0)
        };
    }

    /// Jump to `ratio` with no notion of having passed the frames in between.
    pub fn set_time_ratio_hard(&mut self, ratio: f32) {
        self.set_time_ratio(ratio);
        self.previous_time_ratio = self.time_ratio;
    }

    #[must_use]
    pub const fn time_ratio(&self) -> f32 {
        self.time_ratio
    }

    #[must_use]
    pub const fn previous_time_ratio(&self) -> f32 {
        self.previous_time_ratio
    }

    #[must_use]
    pub const fn playback_speed(&self) -> f32 {
        self.playback_speed
    }

    pub fn set_playback_speed(&mut self, speed: f32) {
        self.playback_speed = speed;
    }

    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    #[must_use]
    pub const fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn reset(&mut self) {
        *self = Self {
            playback_speed: self.playback_speed,
            playing: self.playing,
            looping: self.looping,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn advances_by_speed() {
        let mut controller = ClipController::new();
        controller.set_playback_speed(2.0);
        controller.update(4.0, 0.5);
        assert_relative_eq!(controller.time_ratio(), 0.25);
        assert_relative_eq!(controller.previous_time_ratio(), 0.0);
    }

    #[test]
    fn loops_and_clamps() {
        let mut controller = ClipController::new();
        controller.update(1.0, 1.25);
        assert_relative_eq!(controller.time_ratio(), 0.25, epsilon = 1e-6);

        controller.set_looping(false);
        controller.update(1.0, 1.0);
        assert_relative_eq!(controller.time_ratio(), 1.0);

        controller.set_playback_speed(-1.0);
        controller.update(1.0, 3.0);
        assert_relative_eq!(controller.time_ratio(), 0.0);
    }

    #[test]
    fn paused_controller_holds() {
        let mut controller = ClipController::new();
        controller.set_playing(false);
        controller.update(1.0, 0.3);
        assert_relative_eq!(controller.time_ratio(), 0.0);
    }

    #[test]
    fn hard_set_syncs_previous() {
        let mut controller = ClipController::new();
        controller.update(1.0, 0.1);
        controller.set_time_ratio_hard(0.7);
        assert_relative_eq!(controller.time_ratio(), 0.7);
        assert_relative_eq!(controller.previous_time_ratio(), 0.7);
    }
}
