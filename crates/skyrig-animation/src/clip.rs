//! Keyframed animation clips.

use std::f32::consts::PI;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{AnimationError, Result};
use crate::rig::Rig;
use crate::transform::Transform;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Seconds from the start of the clip.
    pub time: f32,
    pub transform: Transform,
}

/// Keys for one joint, sorted by time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub keys: Vec<Keyframe>,
}

impl Track {
    #[must_use]
    pub fn constant(transform: Transform) -> Self {
        Self {
            keys: vec![Keyframe {
                time: 0.0,
                transform,
            }],
        }
    }

    /// Value at `time`, holding the first/last key outside the keyed range.
    #[must_use]
    pub fn sample(&self, time: f32) -> Transform {
        let Some(first) = self.keys.first() else {
            return Transform::IDENTITY;
        };
        let next = self.keys.partition_point(|k| k.time <= time);
        if next == 0 {
            return first.transform;
        }
        let a = self.keys[next - 1];
        let Some(b) = self.keys.get(next) else {
            return a.transform;
        };
        let span = b.time - a.time;
        let t = if span > f32::EPSILON {
            (time - a.time) / span
        } else {
            0.0
        };
        a.transform.interpolate(b.transform, t)
    }
}

/// An animation: one track per rig joint, sampled by time ratio.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    name: String,
    duration: f32,
    tracks: Vec<Track>,
}

impl Clip {
    pub fn new(name: impl Into<String>, duration: f32, tracks: Vec<Track>) -> Result<Self> {
        let clip = Self {
            name: name.into(),
            duration,
            tracks,
        };
        clip.validate()?;
        Ok(clip)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let clip: Self = bincode::deserialize(bytes).map_err(|e| AnimationError::Decode {
            what: "clip",
            reason: e.to_string(),
        })?;
        clip.validate()?;
        Ok(clip)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| AnimationError::Encode {
            what: "clip",
            reason: e.to_string(),
        })
    }

    fn validate(&self) -> Result<()> {
        let invalid = |reason: String| AnimationError::InvalidClip {
            name: self.name.clone(),
            reason,
        };
        if !(self.duration > 0.0 && self.duration.is_finite()) {
            return Err(invalid(format!("duration {} is not positive", self.duration)));
        }
        for (joint, track) in self.tracks.iter().enumerate() {
            if track.keys.is_empty() {
                return Err(invalid(format!("track {joint} has no keys")));
            }
            if track.keys.windows(2).any(|w| w[0].time > w[1].time) {
                return Err(invalid(format!("track {joint} keys are out of order")));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn duration(&self) -> f32 {
        self.duration
    }

    #[must_use]
    pub fn num_tracks(&self) -> usize {
        self.tracks.len()
    }

    /// Sample every track at `ratio` in [0, 1] of the duration.
    pub fn sample(&self, ratio: f32, out: &mut [Transform]) {
        let time = ratio.clamp(0.0, 1.0) * self.duration;
        for (track, local) in self.tracks.iter().zip(out.iter_mut()) {
            *local = track.sample(time);
        }
    }

    /// A looping two-second dance for [`Rig::stick_figure`]-shaped rigs.
    ///
    /// Joints the dance does not name hold their bind pose.
    #[must_use]
    pub fn dance(rig: &Rig) -> Self {
        const DURATION: f32 = 2.0;
        const STEPS: u16 = 8;

        // Key a track at STEPS even intervals; `f` receives the phase in radians.
        fn keyed(f: impl Fn(f32) -> Transform) -> Track {
            Track {
                keys: (0..=STEPS)
                    .map(|step| {
                        let phase = f32::from(step) / f32::from(STEPS);
                        Keyframe {
                            time: phase * DURATION,
                            transform: f(phase * 2.0 * PI),
                        }
                    })
                    .collect(),
            }
        }

        let bind = rig.bind_pose();
        let tracks = rig
            .joints()
            .iter()
            .enumerate()
            .map(|(index, joint)| {
                let rest = bind[index];
                match joint.name.as_str() {
                    "pelvis" => keyed(|a| Transform {
                        translation: rest.translation
                            + Vec3::new(0.15 * a.sin(), -0.05 * (2.0 * a).cos().abs(), 0.0),
                        rotation: Quat::from_rotation_y(0.4 * a.sin()),
                        ..rest
                    }),
                    "chest" => keyed(|a| {
                        rest.with_rotation(Quat::from_rotation_z(-0.15 * a.sin()))
                    }),
                    "head" => keyed(|a| {
                        rest.with_rotation(Quat::from_rotation_x(0.2 * (2.0 * a).sin()))
                    }),
                    "shoulder_l" => keyed(|a| {
                        rest.with_rotation(Quat::from_rotation_z(0.9 + 0.6 * a.sin()))
                    }),
                    "shoulder_r" => keyed(|a| {
                        rest.with_rotation(Quat::from_rotation_z(-0.9 + 0.6 * a.sin()))
                    }),
                    "elbow_l" | "elbow_r" => keyed(|a| {
                        rest.with_rotation(Quat::from_rotation_y(0.8 * (2.0 * a).sin()))
                    }),
                    "knee_l" => keyed(|a| {
                        rest.with_rotation(Quat::from_rotation_x(0.5 * a.sin().max(0.0)))
                    }),
                    "knee_r" => keyed(|a| {
                        rest.with_rotation(Quat::from_rotation_x(0.5 * (-a.sin()).max(0.0)))
                    }),
                    _ => Track::constant(rest),
                }
            })
            .collect();

        Self {
            name: "dance".to_string(),
            duration: DURATION,
            tracks,
        }
    }
}
