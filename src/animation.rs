use crate::object::{ObjectId, SceneObject, Transform};
use crate::registry::SceneRegistry;
use crate::scene::ClipRecord;
use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: u32,
    pub value: Vec3,
}

impl Keyframe {
    pub fn new(frame: u32, value: Vec3) -> Self {
        Self { frame, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackProperty {
    Position,
    Rotation,
}

impl TrackProperty {
    pub const ALL: [TrackProperty; 2] = [TrackProperty::Position, TrackProperty::Rotation];

    fn read(self, transform: &Transform) -> Vec3 {
        match self {
            TrackProperty::Position => transform.position,
            TrackProperty::Rotation => transform.rotation,
        }
    }

    fn write(self, transform: &mut Transform, value: Vec3) {
        match self {
            TrackProperty::Position => transform.position = value,
            TrackProperty::Rotation => transform.rotation = value,
        }
    }
}

/// Keyframes sorted by frame, at most one per frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    keyframes: Vec<Keyframe>,
}

impl Track {
    /// Builds a track from unordered keyframes; for duplicate frames the later entry wins.
    pub fn from_keyframes(keyframes: impl IntoIterator<Item = Keyframe>) -> Self {
        let mut track = Self::default();
        for keyframe in keyframes {
            track.insert(keyframe);
        }
        track
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn insert(&mut self, keyframe: Keyframe) {
        match self.keyframes.binary_search_by_key(&keyframe.frame, |existing| existing.frame) {
            Ok(index) => self.keyframes[index] = keyframe,
            Err(index) => self.keyframes.insert(index, keyframe),
        }
    }

    /// Samples the track. Empty tracks read as zero, a single keyframe is constant, and frames
    /// outside the keyed range clamp to the first or last keyframe.
    pub fn evaluate(&self, frame: u32) -> Vec3 {
        let (first, last) = match (self.keyframes.first(), self.keyframes.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Vec3::ZERO,
        };
        if self.keyframes.len() == 1 || frame <= first.frame {
            return first.value;
        }
        if frame >= last.frame {
            return last.value;
        }
        let Some((before, after)) = self
            .keyframes
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
            .find(|(before, after)| before.frame <= frame && frame <= after.frame)
        else {
            return last.value;
        };
        if after.frame == before.frame {
            return before.value;
        }
        let t = (frame - before.frame) as f32 / (after.frame - before.frame) as f32;
        before.value + (after.value - before.value) * t
    }

    pub fn next_frame_after(&self, frame: u32) -> Option<u32> {
        self.keyframes.iter().map(|keyframe| keyframe.frame).find(|&candidate| candidate > frame)
    }

    pub fn prev_frame_before(&self, frame: u32) -> Option<u32> {
        self.keyframes.iter().rev().map(|keyframe| keyframe.frame).find(|&candidate| candidate < frame)
    }
}

/// Position and rotation tracks of one object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clip {
    pub position: Track,
    pub rotation: Track,
}

impl Clip {
    pub fn track(&self, property: TrackProperty) -> &Track {
        match property {
            TrackProperty::Position => &self.position,
            TrackProperty::Rotation => &self.rotation,
        }
    }

    pub fn track_mut(&mut self, property: TrackProperty) -> &mut Track {
        match property {
            TrackProperty::Position => &mut self.position,
            TrackProperty::Rotation => &mut self.rotation,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_empty() && self.rotation.is_empty()
    }

    /// Writes each non-empty track onto `transform`; empty tracks leave their property alone.
    pub fn sample_into(&self, frame: u32, transform: &mut Transform) {
        for property in TrackProperty::ALL {
            let track = self.track(property);
            if !track.is_empty() {
                property.write(transform, track.evaluate(frame));
            }
        }
    }

    pub fn from_record(record: &ClipRecord) -> Self {
        Self {
            position: Track::from_keyframes(record.position.iter().copied()),
            rotation: Track::from_keyframes(record.rotation.iter().copied()),
        }
    }

    pub fn to_record(&self) -> ClipRecord {
        ClipRecord { position: self.position.keyframes().to_vec(), rotation: self.rotation.keyframes().to_vec() }
    }
}

/// Orientation that points an object's -Z axis from `eye` toward `target`, keeping +Y up where
/// possible. Returns `None` when the two points coincide.
pub fn look_at_orientation(eye: Vec3, target: Vec3) -> Option<Quat> {
    let mut z = eye - target;
    if z.length_squared() <= f32::EPSILON {
        return None;
    }
    z = z.normalize();
    let mut x = Vec3::Y.cross(z);
    if x.length_squared() <= f32::EPSILON {
        // looking straight up or down
        z.z += 1.0e-4;
        z = z.normalize();
        x = Vec3::Y.cross(z);
    }
    let x = x.normalize();
    let y = z.cross(x);
    Some(Quat::from_mat3(&Mat3::from_cols(x, y, z)))
}

/// Per-object clips plus the camera track-target bindings. Clips only ever exist for cameras.
#[derive(Debug, Clone, Default)]
pub struct Animator {
    clips: BTreeMap<ObjectId, Clip>,
    track_targets: BTreeMap<ObjectId, ObjectId>,
}

impl Animator {
    pub fn clips(&self) -> &BTreeMap<ObjectId, Clip> {
        &self.clips
    }

    pub fn clip(&self, id: ObjectId) -> Option<&Clip> {
        self.clips.get(&id)
    }

    pub fn track_targets(&self) -> &BTreeMap<ObjectId, ObjectId> {
        &self.track_targets
    }

    pub fn track_target(&self, camera: ObjectId) -> Option<ObjectId> {
        self.track_targets.get(&camera).copied()
    }

    /// Captures position and rotation at `frame`. Returns false for non-camera objects.
    pub fn add_keyframe(&mut self, object: &SceneObject, frame: u32) -> bool {
        if !object.is_camera() {
            log::debug!(target: "animation", "keyframes are only supported on cameras (object {})", object.id);
            return false;
        }
        let clip = self.clips.entry(object.id).or_default();
        for property in TrackProperty::ALL {
            clip.track_mut(property).insert(Keyframe::new(frame, property.read(&object.transform)));
        }
        true
    }

    /// Binds a camera to look at `target`. Cameras cannot target themselves or other cameras.
    pub fn set_track_target(&mut self, registry: &SceneRegistry, camera: ObjectId, target: ObjectId) -> bool {
        let camera_ok = registry.get(camera).is_some_and(|object| object.is_camera());
        let target_ok = registry.get(target).is_some_and(|object| !object.is_camera());
        if !camera_ok || !target_ok || camera == target {
            return false;
        }
        self.track_targets.insert(camera, target) != Some(target)
    }

    pub fn clear_track_target(&mut self, camera: ObjectId) -> bool {
        self.track_targets.remove(&camera).is_some()
    }

    /// Drops the clip and every binding that mentions `id` on either end.
    pub fn forget_object(&mut self, id: ObjectId) {
        self.clips.remove(&id);
        self.track_targets.retain(|camera, target| *camera != id && *target != id);
    }

    pub fn clear(&mut self) {
        self.clips.clear();
        self.track_targets.clear();
    }

    pub fn replace(&mut self, clips: BTreeMap<ObjectId, Clip>, track_targets: BTreeMap<ObjectId, ObjectId>) {
        self.clips = clips;
        self.track_targets = track_targets;
    }

    /// Evaluates every camera clip at `frame`. Returns the ids whose transform was written.
    pub fn apply_frame(&self, registry: &mut SceneRegistry, frame: u32) -> Vec<ObjectId> {
        let mut touched = Vec::new();
        for (id, clip) in &self.clips {
            let Some(object) = registry.get_mut(*id) else {
                continue;
            };
            if !object.is_camera() || clip.is_empty() {
                continue;
            }
            clip.sample_into(frame, &mut object.transform);
            touched.push(*id);
        }
        touched
    }

    /// Turns every bound camera toward its target's current position. Bindings with a missing
    /// endpoint are skipped.
    pub fn apply_look_at(&self, registry: &mut SceneRegistry) -> Vec<ObjectId> {
        let mut touched = Vec::new();
        for (camera, target) in &self.track_targets {
            let Some(target_position) = registry.get(*target).map(|object| object.transform.position) else {
                continue;
            };
            let Some(object) = registry.get_mut(*camera) else {
                continue;
            };
            if let Some(orientation) = look_at_orientation(object.transform.position, target_position) {
                object.transform.set_orientation(orientation);
                touched.push(*camera);
            }
        }
        touched
    }

    pub fn next_keyframe(&self, current: u32) -> Option<u32> {
        self.clips.values().filter_map(|clip| clip.position.next_frame_after(current)).min()
    }

    pub fn prev_keyframe(&self, current: u32) -> Option<u32> {
        self.clips.values().filter_map(|clip| clip.position.prev_frame_before(current)).max()
    }
}
