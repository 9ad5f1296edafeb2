//! Scripted input runs for headless simulation

use crate::avatar::{Avatar, AvatarSnapshot};
use crate::config::ControllerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tread_core::{Result, TreadError};
use tread_physics::LevelDesc;
use tread_runtime::{parse_key_code, GameClock, GameEvent, InputState, RuntimeSystem};
use tread_scene::SceneGraph;
use winit::keyboard::KeyCode;

/// Input changes applied at a point in time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputStep {
    /// Seconds since the start of the run
    pub at: f64,
    /// Key names to hold down from now on
    pub press: Vec<String>,
    /// Key names to let go of
    pub release: Vec<String>,
    /// One-shot pointer offset from the window center, each axis in [-1, 1]
    pub pointer: Option<[f32; 2]>,
    /// Move the pointer out of the window
    pub pointer_left: bool,
}

/// A level plus a timeline of input steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub name: String,
    /// Seconds to simulate unless overridden
    pub duration: f64,
    pub level: LevelDesc,
    #[serde(rename = "input")]
    pub steps: Vec<InputStep>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: "scenario".into(),
            duration: 5.0,
            level: LevelDesc::default(),
            steps: Vec::new(),
        }
    }
}

impl Scenario {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        let scenario: Self = toml::from_str(source)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        TreadError::check_range("scenario.duration", self.duration, 0.0, 3600.0)?;
        self.level.validate()?;

        for (i, step) in self.steps.iter().enumerate() {
            if !step.at.is_finite() || step.at < 0.0 {
                return Err(TreadError::ScenarioError(format!(
                    "input step {i} has an invalid time {}",
                    step.at
                )));
            }
            for name in step.press.iter().chain(&step.release) {
                parse_key_code(name)?;
            }
            if let Some([x, y]) = step.pointer {
                if !(-1.0..=1.0).contains(&x) || !(-1.0..=1.0).contains(&y) {
                    return Err(TreadError::ScenarioError(format!(
                        "input step {i} pointer [{x}, {y}] is outside the window"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    /// Frame time in seconds
    pub dt: f64,
    /// Overrides the scenario's duration
    pub seconds: Option<f64>,
    /// Record a snapshot every N frames
    pub trace_every: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            seconds: None,
            trace_every: None,
        }
    }
}

/// An event and the frame it was raised on
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameEvent {
    pub frame: u64,
    pub time: f64,
    #[serde(flatten)]
    pub event: GameEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceSample {
    pub frame: u64,
    pub time: f64,
    pub state: AvatarSnapshot,
}

/// Outcome of a scenario run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub scenario: String,
    pub frames: u64,
    pub seconds: f64,
    pub final_state: AvatarSnapshot,
    pub events: Vec<FrameEvent>,
    pub trace: Vec<TraceSample>,
}

/// Drives an avatar through a scenario at a fixed frame time
pub struct ScenarioRunner {
    name: String,
    duration: f64,
    scene: SceneGraph,
    avatar: Avatar,
    input: InputState,
    clock: GameClock,
    steps: Vec<InputStep>,
    next_step: usize,
    events: Vec<FrameEvent>,
}

impl ScenarioRunner {
    pub fn new(scenario: &Scenario, config: &ControllerConfig) -> Result<Self> {
        scenario.validate()?;

        let mut scene = SceneGraph::new();
        let physics = scenario.level.build()?;
        let mut avatar = Avatar::new(
            &mut scene,
            config,
            Some(physics),
            scenario.level.spawn_point(),
        )?;
        avatar.initialize(&mut scene)?;

        let mut steps = scenario.steps.clone();
        steps.sort_by(|a, b| a.at.total_cmp(&b.at));

        Ok(Self {
            name: scenario.name.clone(),
            duration: scenario.duration,
            scene,
            avatar,
            input: InputState::with_config(&config.input)?,
            clock: GameClock::new(),
            steps,
            next_step: 0,
            events: Vec::new(),
        })
    }

    /// Simulate and report
    pub fn run(mut self, options: &RunOptions) -> Result<RunReport> {
        TreadError::check_range("dt", options.dt, 1e-4, 0.25)?;
        let seconds = options.seconds.unwrap_or(self.duration);
        TreadError::check_range("seconds", seconds, 0.0, 3600.0)?;
        let frames = (seconds / options.dt).round() as u64;

        tracing::info!(scenario = %self.name, frames, dt = options.dt, "running scenario");

        let mut trace = Vec::new();
        for _ in 0..frames {
            self.step_frame(options.dt)?;
            if let Some(every) = options.trace_every.filter(|n| *n > 0) {
                if self.clock.frame % every == 0 {
                    trace.push(TraceSample {
                        frame: self.clock.frame,
                        time: self.clock.total_time,
                        state: self.avatar.snapshot(&self.scene)?,
                    });
                }
            }
        }
        self.avatar.shutdown()?;

        Ok(RunReport {
            scenario: self.name.clone(),
            frames,
            seconds: self.clock.total_time,
            final_state: self.avatar.snapshot(&self.scene)?,
            events: std::mem::take(&mut self.events),
            trace,
        })
    }

    /// Apply due input steps, update the avatar and advance the clock.
    ///
    /// Frames are numbered from 1; events carry the clock time at the end
    /// of the frame that raised them.
    pub fn step_frame(&mut self, dt: f64) -> Result<()> {
        let now = self.clock.total_time;
        while let Some(step) = self.steps.get(self.next_step) {
            // Half a frame of slack so steps land on the frame nearest their time
            if step.at > now + dt * 0.5 {
                break;
            }
            apply_step(&mut self.input, step)?;
            self.next_step += 1;
        }

        self.avatar.update(&mut self.input, &mut self.scene, dt)?;
        self.input.end_frame();
        self.clock.advance(dt);

        for event in self.avatar.drain_events() {
            self.events.push(FrameEvent {
                frame: self.clock.frame,
                time: self.clock.total_time,
                event,
            });
        }
        Ok(())
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn events(&self) -> &[FrameEvent] {
        &self.events
    }
}

fn apply_step(input: &mut InputState, step: &InputStep) -> Result<()> {
    let keys = |names: &[String]| -> Result<Vec<KeyCode>> {
        names.iter().map(|n| parse_key_code(n)).collect()
    };
    for key in keys(&step.release)? {
        input.process_key_up(key);
    }
    for key in keys(&step.press)? {
        input.process_key_down(key);
    }
    if step.pointer_left {
        input.process_pointer_left();
    }
    if let Some([x, y]) = step.pointer {
        input.process_pointer(x, y);
    }
    tracing::debug!(at = step.at, ?step.press, ?step.release, "input step");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALK: &str = r#"
        name = "walk and stop"
        duration = 2.0

        [level]
        floor = 0.0
        spawn = [0.0, 0.0, 0.0]

        [[input]]
        at = 0.0
        press = ["KeyW"]

        [[input]]
        at = 1.0
        release = ["KeyW"]
    "#;

    fn run(source: &str, options: &RunOptions) -> RunReport {
        let scenario = Scenario::from_toml_str(source).unwrap();
        ScenarioRunner::new(&scenario, &ControllerConfig::default())
            .unwrap()
            .run(options)
            .unwrap()
    }

    #[test]
    fn test_parse_scenario() {
        let scenario = Scenario::from_toml_str(WALK).unwrap();
        assert_eq!(scenario.name, "walk and stop");
        assert_eq!(scenario.level.floor, Some(0.0));
        assert_eq!(scenario.steps.len(), 2);
        assert_eq!(scenario.steps[1].release, vec!["KeyW".to_string()]);
        assert!(scenario.steps[0].pointer.is_none());
    }

    #[test]
    fn test_invalid_steps() {
        let bad_key = "[[input]]\nat = 0.0\npress = [\"KeyWW\"]";
        assert!(matches!(
            Scenario::from_toml_str(bad_key),
            Err(TreadError::UnknownKey(_))
        ));

        let bad_time = "[[input]]\nat = -1.0";
        assert!(matches!(
            Scenario::from_toml_str(bad_time),
            Err(TreadError::ScenarioError(_))
        ));

        let bad_pointer = "[[input]]\nat = 0.5\npointer = [2.0, 0.0]";
        assert!(matches!(
            Scenario::from_toml_str(bad_pointer),
            Err(TreadError::ScenarioError(_))
        ));
    }

    #[test]
    fn test_walk_then_stop() {
        let report = run(WALK, &RunOptions::default());
        assert_eq!(report.frames, 120);
        assert!((report.seconds - 2.0).abs() < 1e-9);

        let state = &report.final_state;
        assert!((state.position.z + 6.0).abs() < 0.05, "z = {}", state.position.z);
        assert!(state.grounded);
        assert_eq!(state.animation, "idle");

        let changes: Vec<&str> = report
            .events
            .iter()
            .filter_map(|e| match &e.event {
                GameEvent::AnimationChanged { to, .. } => Some(to.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(changes, ["walk", "idle"]);
        assert_eq!(report.events[0].frame, 1);
    }

    #[test]
    fn test_jump_events_in_order() {
        let source = r#"
            duration = 1.5

            [level]
            floor = 0.0

            [[input]]
            at = 0.5
            press = ["Space"]
        "#;
        let report = run(source, &RunOptions::default());

        let jumped = report
            .events
            .iter()
            .find(|e| matches!(e.event, GameEvent::Jumped { .. }))
            .unwrap();
        let landed = report
            .events
            .iter()
            .find(|e| matches!(e.event, GameEvent::Landed { .. }))
            .unwrap();
        assert_eq!(jumped.frame, 31);
        assert!(landed.frame > jumped.frame);
        // 0.8 s of flight
        assert!((landed.time - jumped.time - 0.8).abs() < 0.05);
        assert!(report.final_state.grounded);
    }

    #[test]
    fn test_pointer_step_turns_camera_once() {
        let source = r#"
            duration = 0.5

            [level]
            floor = 0.0

            [[input]]
            at = 0.1
            pointer = [0.45, 0.0]
        "#;
        let report = run(source, &RunOptions::default());
        assert!((report.final_state.camera_heading + 90.0).abs() < 1e-3);
        // The avatar did not move, so it kept its heading
        assert_eq!(report.final_state.heading, 0.0);
    }

    #[test]
    fn test_options_override_and_trace() {
        let options = RunOptions {
            dt: 0.05,
            seconds: Some(1.0),
            trace_every: Some(5),
        };
        let report = run(WALK, &options);
        assert_eq!(report.frames, 20);
        assert_eq!(report.trace.len(), 4);
        assert_eq!(report.trace[0].frame, 5);
        assert!(report.trace[3].state.position.z < report.trace[0].state.position.z);

        let bad = RunOptions {
            dt: 0.0,
            ..Default::default()
        };
        let scenario = Scenario::from_toml_str(WALK).unwrap();
        let runner = ScenarioRunner::new(&scenario, &ControllerConfig::default()).unwrap();
        assert!(runner.run(&bad).is_err());
    }

    #[test]
    fn test_report_json() {
        let source = r#"
            duration = 0.2

            [level]
            floor = 0.0

            [[input]]
            press = ["Space"]
        "#;
        let report = run(source, &RunOptions::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["events"][0]["event"], "jumped");
        assert_eq!(json["events"][0]["frame"], 1);
        assert!(json["events"][0]["position"]["y"].as_f64().unwrap() > 0.0);
        assert!(json["final_state"]["layers"].is_array());
    }
}
