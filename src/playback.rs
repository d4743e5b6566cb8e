pub const DEFAULT_TOTAL_FRAMES: u32 = 300;

/// Timeline cursor. `current_frame` stays within `0..=total_frames`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playhead {
    current_frame: u32,
    total_frames: u32,
    playing: bool,
}

impl Default for Playhead {
    fn default() -> Self {
        Self::new(DEFAULT_TOTAL_FRAMES)
    }
}

impl Playhead {
    pub fn new(total_frames: u32) -> Self {
        Self { current_frame: 0, total_frames: total_frames.max(1), playing: false }
    }

    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Playhead position in seconds at the given frame rate.
    pub fn seconds(&self, frames_per_second: u32) -> f32 {
        self.current_frame as f32 / frames_per_second.max(1) as f32
    }

    pub fn set_total_frames(&mut self, total_frames: u32) {
        self.total_frames = total_frames.max(1);
        self.current_frame = self.current_frame.min(self.total_frames);
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Stops playback and rewinds to frame 0.
    pub fn stop(&mut self) {
        self.playing = false;
        self.current_frame = 0;
    }

    pub fn seek(&mut self, frame: u32) -> u32 {
        self.current_frame = frame.min(self.total_frames);
        self.current_frame
    }

    /// Moves by `delta` frames, clamped to the timeline.
    pub fn step(&mut self, delta: i64) -> u32 {
        let target = (i64::from(self.current_frame) + delta).clamp(0, i64::from(self.total_frames));
        self.seek(target as u32)
    }

    /// Advances one frame during playback, looping back to 0 on reaching `total_frames`.
    pub fn advance(&mut self) -> u32 {
        let next = self.current_frame.saturating_add(1);
        self.current_frame = if next >= self.total_frames { 0 } else { next };
        self.current_frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playback_wraps_before_total() {
        let mut playhead = Playhead::new(300);
        playhead.seek(299);
        assert_eq!(playhead.advance(), 0);
    }

    #[test]
    fn advance_at_largest_frame_wraps() {
        let mut playhead = Playhead::new(u32::MAX);
        assert_eq!(playhead.seek(u32::MAX), u32::MAX);
        playhead.play();
        assert_eq!(playhead.advance(), 0);
        assert_eq!(playhead.advance(), 1);
    }

    #[test]
    fn step_clamps_to_timeline() {
        let mut playhead = Playhead::new(100);
        assert_eq!(playhead.step(-10), 0);
        assert_eq!(playhead.step(250), 100);
        assert_eq!(playhead.step(-10), 90);
    }

    #[test]
    fn stop_rewinds_and_pauses() {
        let mut playhead = Playhead::new(60);
        playhead.play();
        playhead.seek(42);
        playhead.stop();
        assert!(!playhead.is_playing());
        assert_eq!(playhead.current_frame(), 0);
    }

    #[test]
    fn shrinking_timeline_clamps_cursor() {
        let mut playhead = Playhead::new(300);
        playhead.seek(250);
        playhead.set_total_frames(120);
        assert_eq!(playhead.current_frame(), 120);
    }
}
