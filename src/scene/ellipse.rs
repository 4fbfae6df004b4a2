//! Ellipse grabber used by the demo scene.

use super::color::{BLACK, Color};
use crate::config::{EllipseAction, EllipseBindings, SceneConfig};
use crate::event::Event;
use crate::grabber::Grabber;
use crate::util;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Smallest radius resize and wheel bindings can shrink an ellipse to.
const MIN_RADIUS: f64 = 1.0;

/// Axis-aligned ellipse that can be moved, resized and restyled through its
/// bindings.
///
/// Which binding repositions the ellipse depends on the agent's focus
/// policy: a drag binding under poll-to-track, a plain-move binding under
/// click-to-pick. The host switches it with [`Ellipse::set_click_to_pick`].
#[derive(Debug)]
pub struct Ellipse {
    center: (f64, f64),
    radii: (f64, f64),
    fill: Color,
    contour: Color,
    stroke_weight: f64,
    max_stroke_weight: f64,
    bindings: EllipseBindings,
    click_to_pick: bool,
    rng: StdRng,
}

impl Ellipse {
    /// Creates a circle with a random fill drawn from `seed`.
    pub fn new(center: (f64, f64), radius: f64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let fill = Color::random(&mut rng);
        Self {
            center,
            radii: (radius.max(MIN_RADIUS), radius.max(MIN_RADIUS)),
            fill,
            contour: BLACK,
            stroke_weight: 4.0,
            max_stroke_weight: 12.0,
            bindings: EllipseBindings::default(),
            click_to_pick: false,
            rng,
        }
    }

    /// Creates a circle at a random position that keeps `max_radius` clear
    /// of the canvas edges, with a random radius in the configured range.
    pub fn random<R: Rng + ?Sized>(config: &SceneConfig, rng: &mut R) -> Self {
        let margin = config.max_radius;
        let x = random_between(rng, margin, config.width - margin);
        let y = random_between(rng, margin, config.height - margin);
        let radius = random_between(rng, config.min_radius, config.max_radius);

        let mut ellipse = Self::new((x, y), radius, rng.random());
        ellipse.contour = config.contour_color.to_color();
        // Configs built in code may skip validation
        ellipse.max_stroke_weight = config.max_stroke_weight.max(1.0);
        ellipse.stroke_weight = config.stroke_weight.max(1.0).min(ellipse.max_stroke_weight);
        ellipse
    }

    pub fn with_bindings(mut self, bindings: EllipseBindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn with_radii(mut self, rx: f64, ry: f64) -> Self {
        self.radii = (rx.max(MIN_RADIUS), ry.max(MIN_RADIUS));
        self
    }

    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    pub fn radii(&self) -> (f64, f64) {
        self.radii
    }

    pub fn fill(&self) -> Color {
        self.fill
    }

    pub fn contour(&self) -> Color {
        self.contour
    }

    pub fn stroke_weight(&self) -> f64 {
        self.stroke_weight
    }

    pub fn bindings(&self) -> &EllipseBindings {
        &self.bindings
    }

    /// Swaps the whole binding set at runtime.
    pub fn set_bindings(&mut self, bindings: EllipseBindings) {
        self.bindings = bindings;
    }

    pub fn is_click_to_pick(&self) -> bool {
        self.click_to_pick
    }

    /// Selects the positioning binding: the move binding when `true`, the
    /// drag binding otherwise.
    pub fn set_click_to_pick(&mut self, enable: bool) {
        self.click_to_pick = enable;
    }

    /// Returns true if `(x, y)` lies within the ellipse.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        util::ellipse_contains(self.center, self.radii, x, y)
    }

    fn positioning_action(&self) -> EllipseAction {
        if self.click_to_pick {
            EllipseAction::RepositionMove
        } else {
            EllipseAction::RepositionDrag
        }
    }

    fn resize(&mut self, dx: f64, dy: f64) {
        self.radii = (
            (self.radii.0 + dx).max(MIN_RADIUS),
            (self.radii.1 + dy).max(MIN_RADIUS),
        );
    }

    fn restyle(&mut self, action: EllipseAction) {
        match action {
            EllipseAction::Recolor => self.fill = Color::random(&mut self.rng),
            EllipseAction::Thin => self.stroke_weight = (self.stroke_weight - 1.0).max(1.0),
            EllipseAction::Thicken => {
                self.stroke_weight = (self.stroke_weight + 1.0).min(self.max_stroke_weight)
            }
            _ => {}
        }
    }
}

const STYLE_ACTIONS: [EllipseAction; 3] = [
    EllipseAction::Recolor,
    EllipseAction::Thin,
    EllipseAction::Thicken,
];

impl Grabber for Ellipse {
    fn track_motion2(&self, event: &Event) -> bool {
        event.position().is_some_and(|(x, y)| self.contains(x, y))
    }

    fn track_tap(&self, event: &Event) -> bool {
        event.position().is_some_and(|(x, y)| self.contains(x, y))
    }

    fn motion2_interaction(&mut self, event: &Event) {
        let candidates = [EllipseAction::Resize, self.positioning_action()];
        match self.bindings.resolve(&event.shortcut(), &candidates) {
            Some(EllipseAction::Resize) => {
                let (dx, dy) = event.delta();
                self.resize(dx, dy);
            }
            Some(_) => {
                if let Some(position) = event.position() {
                    self.center = position;
                }
            }
            None => {}
        }
    }

    fn motion1_interaction(&mut self, event: &Event) {
        let wheel = [EllipseAction::WheelResize];
        if self.bindings.resolve(&event.shortcut(), &wheel).is_some() {
            let dx = event.dx();
            self.resize(dx, dx);
        }
    }

    fn tap_interaction(&mut self, event: &Event) {
        if let Some(action) = self.bindings.resolve(&event.shortcut(), &STYLE_ACTIONS) {
            debug!("Ellipse at {:?}: {:?}", self.center, action);
            self.restyle(action);
        }
    }

    fn key_interaction(&mut self, event: &Event) {
        if let Some(action) = self.bindings.resolve(&event.shortcut(), &STYLE_ACTIONS) {
            self.restyle(action);
        }
    }
}

fn random_between<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    if high > low {
        rng.random_range(low..=high)
    } else {
        low
    }
}
