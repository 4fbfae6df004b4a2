//! Demo scene: a render list of ellipse grabbers shared with an agent.
//!
//! The scene owns one handle to every ellipse; the agent it was populated
//! into owns another. Rendering (here, [`Scene::snapshot`]) asks the agent
//! which ellipse is the input grabber instead of keeping its own pointer.

pub mod color;
pub mod ellipse;

// Re-export commonly used types at module level
pub use color::Color;
pub use ellipse::Ellipse;

use crate::agent::{Agent, AgentError};
use crate::config::{Config, FocusPolicy};
use crate::grabber::{GrabberId, GrabberRef};
use anyhow::Result;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Serializable view of one ellipse, in render order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EllipseView {
    pub index: usize,
    pub center: [f64; 2],
    pub radii: [f64; 2],
    /// `#rrggbbaa`
    pub fill: String,
    /// `#rrggbbaa`
    pub contour: String,
    pub stroke_weight: f64,
    /// Whether the agent currently routes input to this ellipse
    pub focused: bool,
}

/// Ordered collection of ellipses and the ids the agent gave them.
#[derive(Default)]
pub struct Scene {
    ellipses: Vec<(GrabberId, Rc<RefCell<Ellipse>>)>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates `config.scene.ellipses` random ellipses and registers each
    /// with `agent`.
    ///
    /// Positions, radii and colors derive from `config.scene.seed` when set.
    ///
    /// # Errors
    /// Returns an error if the binding strings do not parse.
    pub fn populate(config: &Config, agent: &mut Agent) -> Result<Self> {
        let bindings = config
            .bindings
            .build_bindings()
            .map_err(anyhow::Error::msg)?;
        let mut rng = match config.scene.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::rng().random()),
        };

        let mut scene = Self::new();
        for _ in 0..config.scene.ellipses {
            let ellipse =
                Ellipse::random(&config.scene, &mut rng).with_bindings(bindings.clone());
            scene.add(agent, ellipse)?;
        }
        info!(
            "Populated scene with {} ellipses ({:?})",
            scene.len(),
            agent.focus_policy()
        );
        Ok(scene)
    }

    /// Appends an ellipse to the render list and registers it with `agent`.
    ///
    /// The ellipse adopts the positioning binding of the agent's current
    /// focus policy.
    pub fn add(&mut self, agent: &mut Agent, mut ellipse: Ellipse) -> Result<GrabberId, AgentError> {
        ellipse.set_click_to_pick(agent.focus_policy().is_click_to_pick());
        let ellipse = Rc::new(RefCell::new(ellipse));
        let handle: GrabberRef = ellipse.clone();
        let id = agent.add_grabber(handle)?;
        self.ellipses.push((id, ellipse));
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.ellipses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ellipses.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Rc<RefCell<Ellipse>>> {
        self.ellipses.get(index).map(|(_, ellipse)| ellipse)
    }

    /// Agent id of the ellipse at `index`.
    pub fn id(&self, index: usize) -> Option<GrabberId> {
        self.ellipses.get(index).map(|(id, _)| *id)
    }

    /// Render-list position of the ellipse registered as `id`.
    pub fn index_of(&self, id: GrabberId) -> Option<usize> {
        self.ellipses.iter().position(|(gid, _)| *gid == id)
    }

    /// Switches the agent's focus policy and tells every ellipse which
    /// positioning binding to use under it.
    pub fn set_focus_policy(&self, agent: &mut Agent, policy: FocusPolicy) {
        agent.set_focus_policy(policy);
        for (_, ellipse) in &self.ellipses {
            ellipse
                .borrow_mut()
                .set_click_to_pick(policy.is_click_to_pick());
        }
    }

    /// Flips the focus policy on the agent and every ellipse.
    pub fn toggle_focus_policy(&self, agent: &mut Agent) -> FocusPolicy {
        let policy = agent.focus_policy().toggled();
        self.set_focus_policy(agent, policy);
        policy
    }

    /// Snapshot of every ellipse in render order.
    pub fn snapshot(&self, agent: &Agent) -> Vec<EllipseView> {
        self.ellipses
            .iter()
            .enumerate()
            .map(|(index, (id, ellipse))| {
                let ellipse = ellipse.borrow();
                let (cx, cy) = ellipse.center();
                let (rx, ry) = ellipse.radii();
                EllipseView {
                    index,
                    center: [cx, cy],
                    radii: [rx, ry],
                    fill: ellipse.fill().to_hex(),
                    contour: ellipse.contour().to_hex(),
                    stroke_weight: ellipse.stroke_weight(),
                    focused: agent.is_input_grabber(*id),
                }
            })
            .collect()
    }
}
