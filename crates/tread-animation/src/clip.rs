//! Clip descriptions and animation configuration

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tread_core::{Result, TreadError};

/// One animation clip known to the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipDesc {
    /// Name the host's animation data is stored under
    pub name: String,
    /// Length of one loop in seconds
    pub duration: f64,
    /// Playback speed multiplier
    #[serde(default = "default_play_rate")]
    pub play_rate: f64,
}

fn default_play_rate() -> f64 {
    1.0
}

impl ClipDesc {
    pub fn new(name: impl Into<String>, duration: f64) -> Self {
        Self {
            name: name.into(),
            duration,
            play_rate: 1.0,
        }
    }
}

/// What the avatar is doing, as far as animation is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionState {
    Idle,
    Walk,
    Run,
    Fall,
}

/// Which clip plays for each motion state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipRoles {
    pub idle: String,
    pub walk: String,
    pub run: String,
    pub fall: String,
}

impl Default for ClipRoles {
    fn default() -> Self {
        Self {
            idle: "idle".into(),
            walk: "walk".into(),
            run: "run".into(),
            fall: "fall".into(),
        }
    }
}

impl ClipRoles {
    pub fn clip_for(&self, state: MotionState) -> &str {
        match state {
            MotionState::Idle => &self.idle,
            MotionState::Walk => &self.walk,
            MotionState::Run => &self.run,
            MotionState::Fall => &self.fall,
        }
    }

    fn all(&self) -> [&str; 4] {
        [&self.idle, &self.walk, &self.run, &self.fall]
    }
}

/// `[animation]` section of the controller config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Weight change per second while crossfading
    pub blend_rate: f32,
    pub roles: ClipRoles,
    #[serde(rename = "clip")]
    pub clips: Vec<ClipDesc>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            blend_rate: 6.0,
            roles: ClipRoles::default(),
            clips: vec![
                ClipDesc::new("idle", 2.0),
                ClipDesc::new("walk", 1.0),
                ClipDesc::new("run", 0.7),
                ClipDesc::new("fall", 1.0),
            ],
        }
    }
}

impl AnimationConfig {
    pub fn validate(&self) -> Result<()> {
        TreadError::check_range("animation.blend_rate", self.blend_rate as f64, 0.01, 1000.0)?;

        let mut seen = HashSet::new();
        for clip in &self.clips {
            if !seen.insert(clip.name.as_str()) {
                return Err(TreadError::ConfigError(format!(
                    "animation clip '{}' is listed twice",
                    clip.name
                )));
            }
            TreadError::check_range(
                &format!("animation.clip.{}.duration", clip.name),
                clip.duration,
                1e-3,
                1e6,
            )?;
            TreadError::check_range(
                &format!("animation.clip.{}.play_rate", clip.name),
                clip.play_rate,
                1e-3,
                100.0,
            )?;
        }

        for role in self.roles.all() {
            if !seen.contains(role) {
                return Err(TreadError::UnknownClip(role.to_string()));
            }
        }
        Ok(())
    }
}

/// Ordered set of clips; a clip's index is stable for the set's lifetime
#[derive(Debug, Clone)]
pub struct ClipSet {
    clips: Vec<ClipDesc>,
}

impl ClipSet {
    pub fn new(clips: Vec<ClipDesc>) -> Self {
        Self { clips }
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.clips.iter().position(|c| c.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&ClipDesc> {
        self.clips.iter().find(|c| c.name == name)
    }

    pub fn by_index(&self, index: usize) -> Option<&ClipDesc> {
        self.clips.get(index)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.clips.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        AnimationConfig::default().validate().unwrap();
    }

    #[test]
    fn test_parse_clips() {
        let config: AnimationConfig = toml::from_str(
            r#"
            blend_rate = 4.0

            [roles]
            idle = "stand"

            [[clip]]
            name = "stand"
            duration = 3.0

            [[clip]]
            name = "walk"
            duration = 1.2
            play_rate = 1.5

            [[clip]]
            name = "run"
            duration = 0.8

            [[clip]]
            name = "fall"
            duration = 1.0
            "#,
        )
        .unwrap();

        config.validate().unwrap();
        assert_eq!(config.roles.clip_for(MotionState::Idle), "stand");
        assert_eq!(config.roles.clip_for(MotionState::Walk), "walk");
        assert_eq!(config.clips[1].play_rate, 1.5);
        assert_eq!(config.clips[0].play_rate, 1.0);
    }

    #[test]
    fn test_missing_role_clip() {
        let mut config = AnimationConfig::default();
        config.clips.retain(|c| c.name != "fall");
        assert!(matches!(config.validate(), Err(TreadError::UnknownClip(name)) if name == "fall"));
    }

    #[test]
    fn test_duplicate_clip() {
        let mut config = AnimationConfig::default();
        config.clips.push(ClipDesc::new("walk", 1.0));
        assert!(matches!(config.validate(), Err(TreadError::ConfigError(_))));
    }

    #[test]
    fn test_clip_set_lookup() {
        let set = ClipSet::new(AnimationConfig::default().clips);
        assert_eq!(set.len(), 4);
        assert_eq!(set.index_of("run"), Some(2));
        assert_eq!(set.get("walk").map(|c| c.duration), Some(1.0));
        assert!(set.index_of("swim").is_none());
        assert_eq!(set.names().collect::<Vec<_>>(), ["idle", "walk", "run", "fall"]);
    }
}
