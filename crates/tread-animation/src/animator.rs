//! Clip selection with crossfaded, looping playback

use crate::blend::{blend_weighted, JointPose};
use crate::blend_map::BlendMap;
use crate::clip::{AnimationConfig, ClipRoles, ClipSet, MotionState};
use crate::playback::ClipPlayback;
use serde::Serialize;
use tread_core::{Result, TreadError};

/// A switch of the crossfade target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationChange {
    pub from: String,
    pub to: String,
}

/// One clip contributing to the current frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationLayer {
    pub clip: String,
    /// Playback time within the clip, in seconds
    pub time: f64,
    /// Normalized weight; all layers of a frame sum to one
    pub weight: f32,
}

/// Samples a named clip into a pose array. Implemented by hosts that own
/// skeletal clip data.
pub trait PoseSampler {
    fn sample(&self, clip: &str, time: f64, out: &mut [JointPose]);
}

/// Drives which clips play and how much each one shows.
///
/// Exactly one clip is current at any time. Requesting a different clip
/// makes it current and the previous current clip starts fading out; every
/// clip with non-zero weight keeps looping until its weight reaches zero.
pub struct Animator {
    clips: ClipSet,
    roles: ClipRoles,
    blend: BlendMap,
    playback: Vec<ClipPlayback>,
    blend_rate: f32,
    current: usize,
    previous: Option<usize>,
}

impl Animator {
    /// Create an animator with the idle clip already playing at full weight
    pub fn new(config: &AnimationConfig) -> Result<Self> {
        config.validate()?;

        let clips = ClipSet::new(config.clips.clone());
        let idle = clips
            .index_of(&config.roles.idle)
            .ok_or_else(|| TreadError::UnknownClip(config.roles.idle.clone()))?;

        let mut blend = BlendMap::new(clips.len());
        blend.snap_to(idle);
        let mut playback = vec![ClipPlayback::default(); clips.len()];
        playback[idle].start();

        Ok(Self {
            clips,
            roles: config.roles.clone(),
            blend,
            playback,
            blend_rate: config.blend_rate,
            current: idle,
            previous: None,
        })
    }

    /// Make `name` the crossfade target.
    ///
    /// Returns the change when the target actually switched.
    pub fn request(&mut self, name: &str) -> Result<Option<AnimationChange>> {
        let index = self
            .clips
            .index_of(name)
            .ok_or_else(|| TreadError::UnknownClip(name.to_string()))?;
        if index == self.current {
            return Ok(None);
        }

        let change = AnimationChange {
            from: self.clip_name(self.current).to_string(),
            to: name.to_string(),
        };

        // A clip still fading out keeps its phase; a silent one starts over
        if !self.playback[index].playing {
            self.playback[index].start();
        }
        self.previous = Some(self.current);
        self.current = index;

        tracing::debug!(from = %change.from, to = %change.to, "animation crossfade");
        Ok(Some(change))
    }

    /// Request the clip mapped to a motion state
    pub fn request_motion(&mut self, state: MotionState) -> Result<Option<AnimationChange>> {
        let name = self.roles.clip_for(state).to_string();
        self.request(&name)
    }

    /// Step blend weights and playback times by `dt` seconds
    pub fn advance(&mut self, dt: f64) {
        self.blend
            .step_toward(self.current, self.blend_rate * dt as f32);

        for (index, playback) in self.playback.iter_mut().enumerate() {
            let Some(clip) = self.clips.by_index(index) else {
                continue;
            };
            if self.blend.weight(index) > 0.0 {
                if !playback.playing {
                    playback.start();
                }
                playback.advance(clip, dt);
            } else if playback.playing {
                playback.stop();
            }
        }
    }

    /// Clips with non-zero weight, weights normalized to sum to one
    pub fn layers(&self) -> Vec<AnimationLayer> {
        self.blend
            .normalized()
            .into_iter()
            .map(|(index, weight)| AnimationLayer {
                clip: self.clip_name(index).to_string(),
                time: self.playback[index].time,
                weight,
            })
            .collect()
    }

    /// Mix the current layers into a single pose
    pub fn sample_pose(&self, sampler: &dyn PoseSampler, joint_count: usize) -> Vec<JointPose> {
        let layers = self.layers();
        let sampled: Vec<Vec<JointPose>> = layers
            .iter()
            .map(|layer| {
                let mut pose = vec![JointPose::default(); joint_count];
                sampler.sample(&layer.clip, layer.time, &mut pose);
                pose
            })
            .collect();

        let weighted: Vec<(&[JointPose], f32)> = sampled
            .iter()
            .zip(layers.iter())
            .map(|(pose, layer)| (pose.as_slice(), layer.weight))
            .collect();

        let mut out = vec![JointPose::default(); joint_count];
        blend_weighted(&weighted, &mut out);
        out
    }

    pub fn current(&self) -> &str {
        self.clip_name(self.current)
    }

    pub fn previous(&self) -> Option<&str> {
        self.previous.map(|i| self.clip_name(i))
    }

    /// Raw (unnormalized) weight of a clip; zero for unknown names
    pub fn weight(&self, name: &str) -> f32 {
        self.clips
            .index_of(name)
            .map(|i| self.blend.weight(i))
            .unwrap_or(0.0)
    }

    pub fn playback(&self, name: &str) -> Option<&ClipPlayback> {
        self.clips.index_of(name).map(|i| &self.playback[i])
    }

    /// True while any clip other than the current one still shows
    pub fn is_blending(&self) -> bool {
        !self.blend.is_settled(self.current)
    }

    pub fn roles(&self) -> &ClipRoles {
        &self.roles
    }

    fn clip_name(&self, index: usize) -> &str {
        self.clips
            .by_index(index)
            .map(|c| c.name.as_str())
            .unwrap_or_default()
    }
}
