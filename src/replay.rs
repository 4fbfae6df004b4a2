//! Scripted input replay against a populated scene.
//!
//! A script is a TOML file of `[[sample]]` tables, each describing one raw
//! device sample (or a focus policy toggle). Replaying feeds the samples to a
//! pointer agent registered with an [`InputHandler`] and reports what each
//! step did plus the final scene.

use crate::agent::{Agent, AgentRef, RawSample, TickSummary};
use crate::config::{Config, FocusPolicy};
use crate::event::{ControlId, Key, Modifiers};
use crate::handler::InputHandler;
use crate::scene::{EllipseView, Scene};
use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::fs;
use std::path::Path;
use std::rc::Rc;

/// What a script step does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleKind {
    Move,
    Press,
    Drag,
    Release,
    Wheel,
    Click,
    Key,
    TogglePolicy,
}

/// One `[[sample]]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptSample {
    pub kind: SampleKind,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "default_button")]
    pub button: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub delta: f64,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default)]
    pub key: Option<String>,
    /// Finalize the frame after this step
    #[serde(default)]
    pub tick: bool,
}

fn default_button() -> String {
    "left".to_string()
}

fn default_count() -> u32 {
    1
}

impl ScriptSample {
    /// Converts the table into a raw sample. Policy toggles yield `None`.
    pub fn to_raw(&self) -> Result<Option<RawSample>, String> {
        let modifiers = self.parse_modifiers()?;
        let (x, y) = (self.x, self.y);
        let sample = match self.kind {
            SampleKind::TogglePolicy => return Ok(None),
            SampleKind::Move => RawSample::Move { x, y, modifiers },
            SampleKind::Press => RawSample::Press {
                button: self.parse_button()?,
                x,
                y,
                modifiers,
            },
            SampleKind::Drag => RawSample::Drag {
                button: self.parse_button()?,
                x,
                y,
                modifiers,
            },
            SampleKind::Release => RawSample::Release {
                button: self.parse_button()?,
                x,
                y,
                modifiers,
            },
            SampleKind::Wheel => RawSample::wheel_step(self.delta, modifiers),
            SampleKind::Click => RawSample::Click {
                button: self.parse_button()?,
                x,
                y,
                count: self.count,
                modifiers,
            },
            SampleKind::Key => RawSample::Key {
                key: self.parse_key()?,
                modifiers,
            },
        };
        Ok(Some(sample))
    }

    fn parse_modifiers(&self) -> Result<Modifiers, String> {
        self.modifiers.iter().try_fold(Modifiers::NONE, |mask, name| {
            Modifiers::from_binding_name(name.trim())
                .map(|flag| mask | flag)
                .ok_or_else(|| format!("Unknown modifier '{}'", name))
        })
    }

    fn parse_button(&self) -> Result<ControlId, String> {
        ControlId::from_name(self.button.trim())
            .ok_or_else(|| format!("Unknown button '{}'", self.button))
    }

    fn parse_key(&self) -> Result<Key, String> {
        let key = self
            .key
            .as_deref()
            .ok_or_else(|| "Key samples need a 'key' field".to_string())?;
        if let Some(code) = key.strip_prefix('#') {
            return code
                .parse::<u32>()
                .map(|code| Key::Virtual(ControlId(code)))
                .map_err(|_| format!("Invalid virtual key code '{}'", key));
        }
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Key::Char(c)),
            _ => Err(format!("Key samples take a single character: '{}'", key)),
        }
    }
}

/// A parsed replay script.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Script {
    #[serde(rename = "sample", default)]
    pub samples: Vec<ScriptSample>,
}

impl Script {
    pub fn parse(source: &str) -> Result<Self> {
        let script: Script = toml::from_str(source).context("Failed to parse replay script")?;
        for (index, sample) in script.samples.iter().enumerate() {
            sample
                .to_raw()
                .map_err(|err| anyhow!("sample {}: {}", index + 1, err))?;
        }
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script from {}", path.display()))?;
        let script = Self::parse(&source)
            .with_context(|| format!("Invalid script {}", path.display()))?;
        info!("Loaded {} samples from {}", script.samples.len(), path.display());
        Ok(script)
    }
}

/// Outcome of one script step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub kind: SampleKind,
    /// Whether a grabber received the event
    pub delivered: bool,
    /// Scene index of the tracked ellipse after the step
    pub tracked: Option<usize>,
    /// Scene index of the input grabber after the step
    pub input: Option<usize>,
    pub policy: FocusPolicy,
}

/// Full replay result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<StepReport>,
    pub ticks: usize,
    pub totals: TickSummary,
    pub policy: FocusPolicy,
    pub ellipses: Vec<EllipseView>,
}

/// A pointer agent, its handler and the scene it drives.
pub struct Replay {
    handler: InputHandler,
    agent: AgentRef,
    scene: Scene,
}

impl Replay {
    /// Builds the agent from `config.agent` and populates the scene.
    pub fn new(config: &Config) -> Result<Self> {
        let agent: AgentRef = Rc::new(RefCell::new(Agent::from_config(&config.agent)));
        let scene = Scene::populate(config, &mut agent.borrow_mut())?;
        let mut handler = InputHandler::new();
        handler.register(agent.clone());
        Ok(Self {
            handler,
            agent,
            scene,
        })
    }

    pub fn agent(&self) -> &AgentRef {
        &self.agent
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Runs every step of `script`, then finalizes one last frame.
    pub fn run(&mut self, script: &Script) -> Result<ReplayReport> {
        let mut steps = Vec::with_capacity(script.samples.len());
        let mut ticks = 0;
        let mut totals = TickSummary::default();

        for (index, sample) in script.samples.iter().enumerate() {
            let raw = sample
                .to_raw()
                .map_err(|err| anyhow!("sample {}: {}", index + 1, err))?;

            let delivered = match raw {
                Some(raw) => self.agent.borrow_mut().process(raw),
                None => {
                    let policy = self
                        .scene
                        .toggle_focus_policy(&mut self.agent.borrow_mut());
                    debug!("Step {}: focus policy now {:?}", index + 1, policy);
                    false
                }
            };

            if sample.tick {
                accumulate(&mut totals, self.handler.tick());
                ticks += 1;
            }

            steps.push(self.step_report(index + 1, sample.kind, delivered));
        }

        accumulate(&mut totals, self.handler.tick());
        ticks += 1;

        let agent = self.agent.borrow();
        info!(
            "Replayed {} steps: {} events delivered over {} ticks",
            steps.len(),
            totals.dispatched,
            ticks
        );
        Ok(ReplayReport {
            steps,
            ticks,
            totals,
            policy: agent.focus_policy(),
            ellipses: self.scene.snapshot(&agent),
        })
    }

    fn step_report(&self, step: usize, kind: SampleKind, delivered: bool) -> StepReport {
        let agent = self.agent.borrow();
        StepReport {
            step,
            kind,
            delivered,
            tracked: agent
                .tracked_grabber()
                .and_then(|id| self.scene.index_of(id)),
            input: agent.input_grabber().and_then(|id| self.scene.index_of(id)),
            policy: agent.focus_policy(),
        }
    }
}

fn accumulate(totals: &mut TickSummary, summary: TickSummary) {
    totals.dispatched += summary.dispatched;
    totals.oneshots += summary.oneshots;
    totals.fed += summary.fed;
}

impl fmt::Display for ReplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let describe = |slot: Option<usize>| slot.map_or_else(|| "-".to_string(), |i| i.to_string());
        for step in &self.steps {
            writeln!(
                f,
                "#{:<3} {:<13} delivered={:<5} tracked={:<3} input={}",
                step.step,
                format!("{:?}", step.kind),
                step.delivered,
                describe(step.tracked),
                describe(step.input)
            )?;
        }
        writeln!(
            f,
            "{} events delivered ({} one-shot) over {} ticks, policy {:?}",
            self.totals.dispatched, self.totals.oneshots, self.ticks, self.policy
        )?;
        for ellipse in &self.ellipses {
            writeln!(
                f,
                "{}{:<3} center=({:.1}, {:.1}) radii=({:.1}, {:.1}) fill={} stroke={:.0}",
                if ellipse.focused { '*' } else { ' ' },
                ellipse.index,
                ellipse.center[0],
                ellipse.center[1],
                ellipse.radii[0],
                ellipse.radii[1],
                ellipse.fill,
                ellipse.stroke_weight
            )?;
        }
        Ok(())
    }
}
