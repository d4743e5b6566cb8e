use super::Editor;
use crate::events::EditorEvent;
use crate::render::RenderBackend;

impl<R: RenderBackend> Editor<R> {
    pub fn play(&mut self) {
        if !self.playhead.is_playing() {
            self.playhead.play();
            self.events.push(EditorEvent::PlaybackChanged { playing: true });
        }
    }

    pub fn pause(&mut self) {
        if self.playhead.is_playing() {
            self.playhead.pause();
            self.events.push(EditorEvent::PlaybackChanged { playing: false });
        }
    }

    pub fn toggle_playback(&mut self) -> bool {
        if self.playhead.is_playing() {
            self.pause();
        } else {
            self.play();
        }
        self.playhead.is_playing()
    }

    /// Halts playback and rewinds to frame 0.
    pub fn stop(&mut self) {
        let was_playing = self.playhead.is_playing();
        self.playhead.stop();
        if was_playing {
            self.events.push(EditorEvent::PlaybackChanged { playing: false });
        }
        self.show_frame();
    }

    pub fn seek(&mut self, frame: u32) -> u32 {
        self.playhead.seek(frame);
        self.show_frame()
    }

    pub fn step_frames(&mut self, delta: i64) -> u32 {
        self.playhead.step(delta);
        self.show_frame()
    }

    /// Jumps to the closest keyed frame after the playhead, or to the end of the timeline.
    pub fn jump_next_keyframe(&mut self) -> u32 {
        let current = self.playhead.current_frame();
        let frame = self.animator.next_keyframe(current).unwrap_or(self.playhead.total_frames());
        self.seek(frame)
    }

    /// Jumps to the closest keyed frame before the playhead, or to frame 0.
    pub fn jump_prev_keyframe(&mut self) -> u32 {
        let current = self.playhead.current_frame();
        let frame = self.animator.prev_keyframe(current).unwrap_or(0);
        self.seek(frame)
    }

    /// Keys the primary selection's position and rotation at the current frame. Only cameras
    /// can be keyed.
    pub fn add_keyframe(&mut self) -> bool {
        let frame = self.playhead.current_frame();
        let Some(object) = self.selection.primary().and_then(|id| self.registry.get(id)) else {
            return false;
        };
        let id = object.id;
        if !self.animator.add_keyframe(object, frame) {
            return false;
        }
        self.events.push(EditorEvent::KeyframeAdded { id, frame });
        self.commit();
        self.set_status(format!("Keyframe added at frame {frame}"));
        true
    }

    pub fn set_total_frames(&mut self, total_frames: u32) {
        self.playhead.set_total_frames(total_frames);
        self.events.push(EditorEvent::FrameChanged { frame: self.playhead.current_frame() });
    }

    /// Applies clips at the playhead and reports the new frame.
    fn show_frame(&mut self) -> u32 {
        let frame = self.playhead.current_frame();
        let touched = self.animator.apply_frame(&mut self.registry, frame);
        self.finish_animation_update(&touched);
        self.events.push(EditorEvent::FrameChanged { frame });
        frame
    }
}
