//! Per-clip crossfade weights

use tread_core::approach;

/// One weight per clip, each kept within [0, 1].
///
/// Crossfading raises the target clip and lowers every other clip by the
/// same amount per step, so a full fade from one clip to another always
/// takes `1 / delta` steps regardless of how many clips are fading out.
#[derive(Debug, Clone, PartialEq)]
pub struct BlendMap {
    weights: Vec<f32>,
}

impl BlendMap {
    /// All weights start at zero
    pub fn new(clip_count: usize) -> Self {
        Self {
            weights: vec![0.0; clip_count],
        }
    }

    pub fn weight(&self, index: usize) -> f32 {
        self.weights.get(index).copied().unwrap_or(0.0)
    }

    /// Set a weight directly, clamped into [0, 1]
    pub fn set(&mut self, index: usize, weight: f32) {
        if let Some(w) = self.weights.get_mut(index) {
            *w = weight.clamp(0.0, 1.0);
        }
    }

    /// Jump straight to `target` at full weight with everything else silent
    pub fn snap_to(&mut self, target: usize) {
        for (i, w) in self.weights.iter_mut().enumerate() {
            *w = if i == target { 1.0 } else { 0.0 };
        }
    }

    /// Move the target's weight up and all other weights down by `delta`
    pub fn step_toward(&mut self, target: usize, delta: f32) {
        let delta = delta.max(0.0);
        for (i, w) in self.weights.iter_mut().enumerate() {
            let goal = if i == target { 1.0 } else { 0.0 };
            *w = approach(*w, goal, delta);
        }
    }

    /// True once the target is at full weight and nothing else contributes
    pub fn is_settled(&self, target: usize) -> bool {
        self.weights
            .iter()
            .enumerate()
            .all(|(i, w)| if i == target { *w >= 1.0 } else { *w <= 0.0 })
    }

    /// Sum of all weights
    pub fn total(&self) -> f32 {
        self.weights.iter().sum()
    }

    /// Non-zero weights scaled to sum to one, as (index, weight) pairs
    pub fn normalized(&self) -> Vec<(usize, f32)> {
        let total = self.total();
        if total <= 0.0 {
            return Vec::new();
        }
        self.weights
            .iter()
            .enumerate()
            .filter(|(_, w)| **w > 0.0)
            .map(|(i, w)| (i, w / total))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
