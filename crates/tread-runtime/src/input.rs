//! Input state management

use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::de::IntoDeserializer;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tread_core::{Result, TreadError};
use winit::keyboard::KeyCode;

/// Action bindings as key names, e.g. `move_forward = ["KeyW", "ArrowUp"]`.
///
/// Actions absent from the table keep their default bindings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub bindings: BTreeMap<String, Vec<String>>,
}

impl InputConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Check that every key name resolves
    pub fn validate(&self) -> Result<()> {
        for keys in self.bindings.values() {
            for key in keys {
                parse_key_code(key)?;
            }
        }
        Ok(())
    }
}

/// Tracks keyboard and pointer input state per frame
pub struct InputState {
    /// Keys currently held down
    keys_down: HashSet<KeyCode>,
    /// Keys pressed this frame
    keys_just_pressed: HashSet<KeyCode>,
    /// Keys released this frame
    keys_just_released: HashSet<KeyCode>,

    /// Pointer position normalized to [-1, 1], +y up; `None` outside the window
    pointer: Option<(f32, f32)>,

    /// Action map: action name -> list of key bindings
    action_map: HashMap<String, Vec<KeyCode>>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys_down: HashSet::new(),
            keys_just_pressed: HashSet::new(),
            keys_just_released: HashSet::new(),
            pointer: None,
            action_map: Self::default_action_map(),
        }
    }

    /// Input state with the defaults overridden by `config`
    pub fn with_config(config: &InputConfig) -> Result<Self> {
        let mut input = Self::new();
        for (action, names) in &config.bindings {
            let keys = names
                .iter()
                .map(|n| parse_key_code(n))
                .collect::<Result<Vec<_>>>()?;
            input.bind_action(action.clone(), keys);
        }
        Ok(input)
    }

    fn default_action_map() -> HashMap<String, Vec<KeyCode>> {
        let mut map = HashMap::new();
        map.insert("move_forward".into(), vec![KeyCode::KeyW]);
        map.insert("move_backward".into(), vec![KeyCode::KeyS]);
        map.insert("move_left".into(), vec![KeyCode::KeyA]);
        map.insert("move_right".into(), vec![KeyCode::KeyD]);
        map.insert("run".into(), vec![KeyCode::ShiftLeft, KeyCode::ShiftRight]);
        map.insert("jump".into(), vec![KeyCode::Space]);
        map
    }

    /// Bind an action to one or more keys
    pub fn bind_action(&mut self, action: impl Into<String>, keys: Vec<KeyCode>) {
        self.action_map.insert(action.into(), keys);
    }

    /// Process a key press event
    pub fn process_key_down(&mut self, key: KeyCode) {
        if !self.keys_down.contains(&key) {
            self.keys_just_pressed.insert(key);
        }
        self.keys_down.insert(key);
    }

    /// Process a key release event
    pub fn process_key_up(&mut self, key: KeyCode) {
        if self.keys_down.remove(&key) {
            self.keys_just_released.insert(key);
        }
    }

    /// Process a pointer position already normalized to [-1, 1] (+y up)
    pub fn process_pointer(&mut self, x: f32, y: f32) {
        self.pointer = Some((x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0)));
    }

    /// Process a cursor position in window pixels (origin top-left, +y down)
    pub fn process_pointer_pixels(&mut self, px: f64, py: f64, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let x = (px / width as f64) * 2.0 - 1.0;
        let y = 1.0 - (py / height as f64) * 2.0;
        self.process_pointer(x as f32, y as f32);
    }

    /// The cursor left the window
    pub fn process_pointer_left(&mut self) {
        self.pointer = None;
    }

    /// Put the pointer back at the window center after it was consumed
    pub fn recenter_pointer(&mut self) {
        if self.pointer.is_some() {
            self.pointer = Some((0.0, 0.0));
        }
    }

    /// Pixel the host should warp the OS cursor to after a recenter
    pub fn pointer_warp_target(width: u32, height: u32) -> (u32, u32) {
        (width / 2, height / 2)
    }

    /// Call at end of frame to clear per-frame state
    pub fn end_frame(&mut self) {
        self.keys_just_pressed.clear();
        self.keys_just_released.clear();
    }

    // --- Query methods ---

    /// Is a key currently held down?
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Was a key pressed this frame?
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.keys_just_pressed.contains(&key)
    }

    /// Was a key released this frame?
    pub fn is_key_just_released(&self, key: KeyCode) -> bool {
        self.keys_just_released.contains(&key)
    }

    /// Is an action currently held? (any bound key is down)
    pub fn is_action_pressed(&self, action: &str) -> bool {
        self.action_map
            .get(action)
            .map(|keys| keys.iter().any(|k| self.keys_down.contains(k)))
            .unwrap_or(false)
    }

    /// Was an action just pressed this frame?
    pub fn is_action_just_pressed(&self, action: &str) -> bool {
        self.action_map
            .get(action)
            .map(|keys| keys.iter().any(|k| self.keys_just_pressed.contains(k)))
            .unwrap_or(false)
    }

    /// Pointer position, or `None` when the pointer is outside the window
    pub fn pointer(&self) -> Option<(f32, f32)> {
        self.pointer
    }

    pub fn has_pointer(&self) -> bool {
        self.pointer.is_some()
    }
}

/// Resolve a key name (winit `KeyCode` variant name) to a key code
pub fn parse_key_code(name: &str) -> Result<KeyCode> {
    let de: StrDeserializer<'_, ValueError> = name.into_deserializer();
    KeyCode::deserialize(de).map_err(|_| TreadError::UnknownKey(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_transitions() {
        let mut input = InputState::new();

        // Press W
        input.process_key_down(KeyCode::KeyW);
        assert!(input.is_key_down(KeyCode::KeyW));
        assert!(input.is_key_just_pressed(KeyCode::KeyW));

        // End frame clears just_pressed
        input.end_frame();
        assert!(input.is_key_down(KeyCode::KeyW));
        assert!(!input.is_key_just_pressed(KeyCode::KeyW));

        // Release W
        input.process_key_up(KeyCode::KeyW);
        assert!(!input.is_key_down(KeyCode::KeyW));
        assert!(input.is_key_just_released(KeyCode::KeyW));
    }

    #[test]
    fn test_held_key_is_not_pressed_again() {
        let mut input = InputState::new();
        input.process_key_down(KeyCode::Space);
        input.end_frame();
        // OS key repeat
        input.process_key_down(KeyCode::Space);
        assert!(!input.is_action_just_pressed("jump"));
    }

    #[test]
    fn test_action_map() {
        let mut input = InputState::new();

        assert!(!input.is_action_pressed("move_forward"));

        input.process_key_down(KeyCode::KeyW);
        assert!(input.is_action_pressed("move_forward"));
        assert!(input.is_action_just_pressed("move_forward"));

        input.end_frame();
        assert!(input.is_action_pressed("move_forward"));
        assert!(!input.is_action_just_pressed("move_forward"));

        input.process_key_down(KeyCode::ShiftRight);
        assert!(input.is_action_pressed("run"));
    }

    #[test]
    fn test_config_rebinds_actions() {
        let config = InputConfig::from_toml_str(
            r#"
            [bindings]
            move_forward = ["ArrowUp"]
            jump = ["KeyJ", "Space"]
            "#,
        )
        .unwrap();
        let mut input = InputState::with_config(&config).unwrap();

        input.process_key_down(KeyCode::KeyW);
        assert!(!input.is_action_pressed("move_forward"));
        input.process_key_down(KeyCode::ArrowUp);
        assert!(input.is_action_pressed("move_forward"));
        input.process_key_down(KeyCode::KeyJ);
        assert!(input.is_action_just_pressed("jump"));
        // Untouched actions keep defaults
        input.process_key_down(KeyCode::KeyA);
        assert!(input.is_action_pressed("move_left"));
    }

    #[test]
    fn test_any_key_code_name_binds() {
        assert_eq!(parse_key_code("F5").unwrap(), KeyCode::F5);
        assert_eq!(parse_key_code("Numpad8").unwrap(), KeyCode::Numpad8);
        assert_eq!(parse_key_code("Backspace").unwrap(), KeyCode::Backspace);
        assert!(parse_key_code("keyw").is_err());

        let mut config = InputConfig::default();
        config
            .bindings
            .insert("jump".into(), vec!["NumpadEnter".into()]);
        let mut input = InputState::with_config(&config).unwrap();
        input.process_key_down(KeyCode::NumpadEnter);
        assert!(input.is_action_just_pressed("jump"));
    }

    #[test]
    fn test_unknown_key_name() {
        let mut config = InputConfig::default();
        config.bindings.insert("jump".into(), vec!["Hyperspace".into()]);
        assert!(matches!(config.validate(), Err(TreadError::UnknownKey(_))));
        assert!(InputState::with_config(&config).is_err());
    }

    #[test]
    fn test_pointer_pixels_normalized() {
        let mut input = InputState::new();
        assert!(input.pointer().is_none());

        input.process_pointer_pixels(400.0, 300.0, 800, 600);
        let (x, y) = input.pointer().unwrap();
        assert!(x.abs() < 1e-6 && y.abs() < 1e-6);

        // Top-right corner is (+1, +1)
        input.process_pointer_pixels(800.0, 0.0, 800, 600);
        let (x, y) = input.pointer().unwrap();
        assert!((x - 1.0).abs() < 1e-6 && (y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_recenter_and_leave() {
        let mut input = InputState::new();
        // Recentering without a pointer does not invent one
        input.recenter_pointer();
        assert!(!input.has_pointer());

        input.process_pointer(0.3, -0.2);
        input.recenter_pointer();
        assert_eq!(input.pointer(), Some((0.0, 0.0)));

        input.process_pointer_left();
        assert!(!input.has_pointer());
        assert_eq!(InputState::pointer_warp_target(801, 600), (400, 300));
    }
}
