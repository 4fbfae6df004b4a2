use super::*;
use crate::config::{AgentConfig, FocusPolicy};
use crate::event::{ControlId, Event, Key, Lifecycle, Modifiers};
use crate::grabber::{Grabber, GrabberRef};
use std::cell::RefCell;
use std::rc::Rc;

/// Circular test grabber that records every event it receives.
struct Circle {
    cx: f64,
    cy: f64,
    r: f64,
    received: Vec<Event>,
}

impl Circle {
    fn new(cx: f64, cy: f64, r: f64) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            cx,
            cy,
            r,
            received: Vec::new(),
        }))
    }

    fn contains(&self, event: &Event) -> bool {
        event.position().is_some_and(|(x, y)| {
            let (dx, dy) = (x - self.cx, y - self.cy);
            dx * dx + dy * dy <= self.r * self.r
        })
    }
}

impl Grabber for Circle {
    fn track_motion2(&self, event: &Event) -> bool {
        self.contains(event)
    }

    fn track_tap(&self, event: &Event) -> bool {
        self.contains(event)
    }

    fn interact(&mut self, event: &Event) {
        self.received.push(event.clone());
    }
}

fn register(agent: &mut Agent, circle: &Rc<RefCell<Circle>>) -> crate::grabber::GrabberId {
    let handle: GrabberRef = circle.clone();
    agent.add_grabber(handle).unwrap()
}

fn lifecycles(circle: &Rc<RefCell<Circle>>) -> Vec<Lifecycle> {
    circle.borrow().received.iter().map(Event::lifecycle).collect()
}

fn mv(x: f64, y: f64) -> RawSample {
    RawSample::Move {
        x,
        y,
        modifiers: Modifiers::NONE,
    }
}

fn press(x: f64, y: f64) -> RawSample {
    RawSample::Press {
        button: ControlId::LEFT,
        x,
        y,
        modifiers: Modifiers::NONE,
    }
}

fn drag(x: f64, y: f64) -> RawSample {
    RawSample::Drag {
        button: ControlId::LEFT,
        x,
        y,
        modifiers: Modifiers::NONE,
    }
}

fn release(x: f64, y: f64) -> RawSample {
    RawSample::Release {
        button: ControlId::LEFT,
        x,
        y,
        modifiers: Modifiers::NONE,
    }
}

fn click(x: f64, y: f64) -> RawSample {
    RawSample::Click {
        button: ControlId::LEFT,
        x,
        y,
        count: 1,
        modifiers: Modifiers::NONE,
    }
}

fn agent_with_a_and_b() -> (Agent, Rc<RefCell<Circle>>, Rc<RefCell<Circle>>) {
    let mut agent = Agent::new();
    let a = Circle::new(100.0, 100.0, 20.0);
    let b = Circle::new(500.0, 500.0, 20.0);
    register(&mut agent, &a);
    register(&mut agent, &b);
    (agent, a, b)
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[test]
fn test_add_grabber_assigns_ids_in_registration_order() {
    let mut agent = Agent::new();
    let a = Circle::new(0.0, 0.0, 1.0);
    let b = Circle::new(0.0, 0.0, 1.0);
    let id_a = register(&mut agent, &a);
    let id_b = register(&mut agent, &b);

    assert!(id_a < id_b);
    let order: Vec<_> = agent.grabbers().map(|(id, _)| id).collect();
    assert_eq!(order, vec![id_a, id_b]);
    assert_eq!(agent.len(), 2);
}

#[test]
fn test_add_same_grabber_twice_is_rejected() {
    let mut agent = Agent::new();
    let a = Circle::new(0.0, 0.0, 1.0);
    let id = register(&mut agent, &a);

    let again: GrabberRef = a.clone();
    assert_eq!(
        agent.add_grabber(again),
        Err(AgentError::AlreadyRegistered(id))
    );
    assert_eq!(agent.len(), 1);
}

#[test]
fn test_id_of_finds_registered_handle() {
    let (agent, a, _b) = agent_with_a_and_b();
    let handle: GrabberRef = a.clone();
    let stranger: GrabberRef = Circle::new(0.0, 0.0, 1.0);

    assert!(agent.id_of(&handle).is_some());
    assert!(agent.id_of(&stranger).is_none());
}

#[test]
fn test_default_grabber_must_be_registered() {
    let mut agent = Agent::new();
    let a = Circle::new(0.0, 0.0, 1.0);
    let id = register(&mut agent, &a);
    agent.remove_grabber(id);

    assert_eq!(
        agent.set_default_grabber(Some(id)),
        Err(AgentError::UnknownGrabber(id))
    );
    assert_eq!(agent.default_grabber(), None);
}

#[test]
fn test_shift_default_grabber_alternates() {
    let mut agent = Agent::new();
    let a = Circle::new(0.0, 0.0, 1.0);
    let b = Circle::new(0.0, 0.0, 1.0);
    let id_a = register(&mut agent, &a);
    let id_b = register(&mut agent, &b);

    assert!(agent.shift_default_grabber(id_a, id_b));
    assert_eq!(agent.default_grabber(), Some(id_a));
    assert!(agent.shift_default_grabber(id_a, id_b));
    assert_eq!(agent.default_grabber(), Some(id_b));
}

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

#[test]
fn test_poll_is_deterministic_for_the_same_stream() {
    let stream = [(105.0, 105.0), (300.0, 300.0), (505.0, 495.0), (90.0, 100.0)];

    let run = || {
        let (mut agent, _a, _b) = agent_with_a_and_b();
        stream
            .iter()
            .map(|&(x, y)| {
                agent.process(mv(x, y));
                agent.tracked_grabber().map(|id| id.raw())
            })
            .collect::<Vec<_>>()
    };

    let first = run();
    assert_eq!(first, run());
    assert_eq!(first, vec![Some(1), None, Some(2), Some(1)]);
}

#[test]
fn test_poll_first_registered_wins_on_overlap() {
    let mut agent = Agent::new();
    let under = Circle::new(0.0, 0.0, 50.0);
    let over = Circle::new(10.0, 0.0, 50.0);
    let id_under = register(&mut agent, &under);
    register(&mut agent, &over);

    let pointer = Event::motion2(ControlId::NO_ID, Modifiers::NONE, 5.0, 0.0);
    assert_eq!(agent.poll(&pointer), Some(id_under));
}

#[test]
fn test_poll_checks_default_grabber_first() {
    let mut agent = Agent::new();
    let first = Circle::new(0.0, 0.0, 50.0);
    let fallback = Circle::new(0.0, 0.0, 50.0);
    register(&mut agent, &first);
    let id_fallback = register(&mut agent, &fallback);
    agent.set_default_grabber(Some(id_fallback)).unwrap();

    let pointer = Event::motion2(ControlId::NO_ID, Modifiers::NONE, 0.0, 0.0);
    assert_eq!(agent.poll(&pointer), Some(id_fallback));
}

#[test]
fn test_poll_never_calls_interact() {
    let (mut agent, a, b) = agent_with_a_and_b();
    let pointer = Event::motion2(ControlId::NO_ID, Modifiers::NONE, 100.0, 100.0);

    agent.poll(&pointer);
    agent.poll(&pointer);

    assert!(a.borrow().received.is_empty());
    assert!(b.borrow().received.is_empty());
}

#[test]
fn test_input_grabber_falls_back_to_default() {
    let (mut agent, a, _b) = agent_with_a_and_b();
    let id_a = agent.id_of(&(a.clone() as GrabberRef)).unwrap();
    agent.set_default_grabber(Some(id_a)).unwrap();

    agent.process(mv(300.0, 300.0));
    assert_eq!(agent.tracked_grabber(), None);
    assert_eq!(agent.input_grabber(), Some(id_a));
    assert!(agent.is_input_grabber(id_a));
}

#[test]
fn test_disabled_tracking_keeps_focus_frozen() {
    let (mut agent, _a, _b) = agent_with_a_and_b();
    agent.process(mv(105.0, 105.0));
    let tracked = agent.tracked_grabber();
    assert!(tracked.is_some());

    agent.disable_tracking();
    assert_eq!(agent.tracked_grabber(), None);
    agent.process(mv(505.0, 505.0));
    assert_eq!(agent.tracked_grabber(), None);

    agent.toggle_tracking();
    assert!(agent.is_tracking());
    agent.process(mv(105.0, 105.0));
    assert_eq!(agent.tracked_grabber(), tracked);
}

#[test]
fn test_focus_policy_change_resets_tracked() {
    let (mut agent, _a, _b) = agent_with_a_and_b();
    agent.process(mv(105.0, 105.0));
    assert!(agent.tracked_grabber().is_some());

    assert_eq!(agent.toggle_focus_policy(), FocusPolicy::ClickToPick);
    assert_eq!(agent.tracked_grabber(), None);

    // Setting the same policy again is not a change
    agent.process(click(105.0, 105.0));
    let picked = agent.tracked_grabber();
    agent.set_focus_policy(FocusPolicy::ClickToPick);
    assert_eq!(agent.tracked_grabber(), picked);
}

// ---------------------------------------------------------------------------
// Gesture chains
// ---------------------------------------------------------------------------

#[test]
fn test_press_drag_release_scenario() {
    let (mut agent, a, b) = agent_with_a_and_b();
    let id_a = agent.id_of(&(a.clone() as GrabberRef)).unwrap();

    agent.process(mv(105.0, 105.0));
    assert_eq!(agent.tracked_grabber(), Some(id_a));
    a.borrow_mut().received.clear();

    assert!(agent.process(press(105.0, 105.0)));
    assert_eq!(lifecycles(&a), vec![Lifecycle::Fired]);
    assert_eq!(agent.grab_target(), Some(id_a));
    assert!(agent.in_gesture());

    assert!(agent.process(drag(110.0, 110.0)));
    {
        let a = a.borrow();
        let active = &a.received[1];
        assert_eq!(active.lifecycle(), Lifecycle::Active);
        assert_eq!(active.delta(), (5.0, 5.0));
    }

    assert!(agent.process(release(110.0, 110.0)));
    assert_eq!(
        lifecycles(&a),
        vec![Lifecycle::Fired, Lifecycle::Active, Lifecycle::Flushed]
    );
    assert!(!agent.in_gesture());
    assert_eq!(agent.grab_target(), None);
    assert!(b.borrow().received.is_empty());
}

#[test]
fn test_chain_deltas_follow_coordinates() {
    let (mut agent, a, _b) = agent_with_a_and_b();
    let points = [(100.0, 100.0), (103.0, 98.0), (111.0, 90.0), (111.0, 95.0)];

    agent.process(mv(points[0].0, points[0].1));
    a.borrow_mut().received.clear();
    agent.process(press(points[0].0, points[0].1));
    for &(x, y) in &points[1..points.len() - 1] {
        agent.process(drag(x, y));
    }
    let (lx, ly) = points[points.len() - 1];
    agent.process(release(lx, ly));

    let a = a.borrow();
    assert_eq!(a.received.len(), points.len());
    assert_eq!(a.received[0].delta(), (0.0, 0.0));
    for n in 1..points.len() {
        let expected = (
            points[n].0 - points[n - 1].0,
            points[n].1 - points[n - 1].1,
        );
        assert_eq!(a.received[n].delta(), expected, "event {n}");
    }
}

#[test]
fn test_sticky_grab_follows_pointer_outside_region() {
    let (mut agent, a, b) = agent_with_a_and_b();
    agent.process(mv(100.0, 100.0));
    agent.process(press(100.0, 100.0));

    // Well outside A and straight over B
    agent.process(drag(300.0, 300.0));
    agent.process(drag(500.0, 500.0));
    agent.process(release(500.0, 500.0));

    assert!(b.borrow().received.is_empty());
    let seen = lifecycles(&a);
    assert_eq!(
        &seen[1..],
        &[
            Lifecycle::Fired,
            Lifecycle::Active,
            Lifecycle::Active,
            Lifecycle::Flushed
        ]
    );
}

#[test]
fn test_stray_move_keeps_gesture_deltas() {
    let (mut agent, a, _b) = agent_with_a_and_b();
    agent.process(mv(100.0, 100.0));
    agent.process(press(100.0, 100.0));
    agent.process(drag(104.0, 100.0));
    agent.process(mv(300.0, 300.0));
    agent.process(drag(110.0, 102.0));
    agent.process(release(111.0, 102.0));

    let seen = &a.borrow().received;
    let drags: Vec<_> = seen.iter().filter(|e| e.id() == ControlId::LEFT).collect();
    let deltas: Vec<_> = drags.iter().map(|e| e.delta()).collect();
    assert_eq!(deltas, vec![(0.0, 0.0), (4.0, 0.0), (6.0, 2.0), (1.0, 0.0)]);
    assert_eq!(drags.last().unwrap().lifecycle(), Lifecycle::Flushed);
}

#[test]
fn test_moves_after_release_start_a_fresh_chain() {
    let (mut agent, a, _b) = agent_with_a_and_b();
    agent.process(mv(100.0, 100.0));
    agent.process(press(100.0, 100.0));
    agent.process(release(104.0, 100.0));
    agent.process(mv(110.0, 100.0));

    let a = a.borrow();
    let last = a.received.last().unwrap();
    assert_eq!(last.lifecycle(), Lifecycle::Active);
    assert_eq!(last.delta(), (0.0, 0.0));
}

#[test]
fn test_press_outside_every_grabber_is_noop() {
    let (mut agent, a, b) = agent_with_a_and_b();
    agent.process(mv(300.0, 300.0));

    assert!(!agent.process(press(300.0, 300.0)));
    assert!(!agent.process(drag(100.0, 100.0)));
    assert!(!agent.process(release(100.0, 100.0)));

    assert!(a.borrow().received.is_empty());
    assert!(b.borrow().received.is_empty());
}

#[test]
fn test_dispatch_without_focus_never_mutates_grabbers() {
    let (mut agent, a, b) = agent_with_a_and_b();
    let events = [
        Event::motion2(ControlId::LEFT, Modifiers::NONE, 100.0, 100.0),
        Event::tap(ControlId::LEFT, Modifiers::NONE, 500.0, 500.0, 2),
        Event::key(Key::Char('c'), Modifiers::CTRL),
        Event::motion1(ControlId::WHEEL, Modifiers::NONE, 1.0).oneshot(),
    ];

    for event in events {
        assert!(!agent.handle(event));
    }
    assert!(a.borrow().received.is_empty());
    assert!(b.borrow().received.is_empty());
    assert_eq!(agent.pending().dispatched, 0);
}

#[test]
fn test_removing_tracked_grabber_clears_focus() {
    let (mut agent, a, _b) = agent_with_a_and_b();
    let id_a = agent.id_of(&(a.clone() as GrabberRef)).unwrap();
    agent.process(mv(100.0, 100.0));
    agent.process(press(100.0, 100.0));
    let before = a.borrow().received.len();

    assert!(agent.remove_grabber(id_a).is_some());
    assert_eq!(agent.tracked_grabber(), None);
    assert_eq!(agent.grab_target(), None);

    assert!(!agent.process(drag(104.0, 100.0)));
    assert!(!agent.process(release(104.0, 100.0)));
    assert_eq!(a.borrow().received.len(), before);
}

#[test]
fn test_remove_grabbers_clears_everything() {
    let (mut agent, a, _b) = agent_with_a_and_b();
    let id_a = agent.id_of(&(a.clone() as GrabberRef)).unwrap();
    agent.set_default_grabber(Some(id_a)).unwrap();
    agent.process(mv(100.0, 100.0));

    agent.remove_grabbers();
    assert!(agent.is_empty());
    assert_eq!(agent.input_grabber(), None);
}

// ---------------------------------------------------------------------------
// Click-to-pick
// ---------------------------------------------------------------------------

#[test]
fn test_click_to_pick_scenario() {
    let (mut agent, _a, b) = agent_with_a_and_b();
    let id_b = agent.id_of(&(b.clone() as GrabberRef)).unwrap();
    agent.set_focus_policy(FocusPolicy::ClickToPick);

    agent.process(mv(105.0, 105.0));
    assert_eq!(agent.tracked_grabber(), None);

    agent.process(click(505.0, 505.0));
    assert_eq!(agent.tracked_grabber(), Some(id_b));

    for (x, y) in [(105.0, 105.0), (300.0, 10.0), (505.0, 505.0)] {
        agent.process(mv(x, y));
        assert_eq!(agent.tracked_grabber(), Some(id_b));
    }

    // Moves are delivered to the picked grabber
    let moves = b
        .borrow()
        .received
        .iter()
        .filter(|event| event.id().is_none())
        .count();
    assert_eq!(moves, 3);

    agent.process(click(300.0, 300.0));
    assert_eq!(agent.tracked_grabber(), None);
}

#[test]
fn test_poll_to_track_click_does_not_change_focus() {
    let (mut agent, a, _b) = agent_with_a_and_b();
    let id_a = agent.id_of(&(a.clone() as GrabberRef)).unwrap();
    agent.process(mv(100.0, 100.0));

    agent.process(click(505.0, 505.0));
    assert_eq!(agent.tracked_grabber(), Some(id_a));
    let last = a.borrow().received.last().cloned().unwrap();
    assert_eq!(last.count(), Some(1));
}

// ---------------------------------------------------------------------------
// One-shots, sensitivities and ticks
// ---------------------------------------------------------------------------

#[test]
fn test_wheel_is_oneshot_and_keeps_chain() {
    let (mut agent, a, _b) = agent_with_a_and_b();
    agent.process(mv(100.0, 100.0));
    agent.process(press(100.0, 100.0));

    assert!(agent.process(RawSample::Wheel {
        delta: -1.0,
        modifiers: Modifiers::CTRL,
    }));
    agent.process(drag(103.0, 100.0));

    let a = a.borrow();
    let wheel = &a.received[2];
    assert!(wheel.is_oneshot());
    assert_eq!(wheel.id(), ControlId::WHEEL);
    assert_eq!(wheel.dx(), -1.0);
    // The drag still chains to the press
    assert_eq!(a.received[3].delta(), (3.0, 0.0));
}

#[test]
fn test_null_wheel_is_dropped() {
    let (mut agent, a, _b) = agent_with_a_and_b();
    agent.process(mv(100.0, 100.0));
    let before = a.borrow().received.len();

    assert!(!agent.process(RawSample::wheel_step(0.05, Modifiers::NONE)));
    assert_eq!(a.borrow().received.len(), before);
}

#[test]
fn test_sensitivities_scale_absolute_motion_only() {
    let (mut agent, a, _b) = agent_with_a_and_b();
    agent.set_sensitivities([2.0, 0.5]);
    agent.process(mv(100.0, 100.0));
    agent.process(RawSample::Wheel {
        delta: 1.0,
        modifiers: Modifiers::NONE,
    });
    agent.process(press(100.0, 100.0));
    agent.process(drag(104.0, 104.0));

    let a = a.borrow();
    assert_eq!(a.received[1].dx(), 2.0);
    assert_eq!(a.received[3].delta(), (4.0, 4.0));
}

#[test]
fn test_key_goes_to_input_grabber() {
    let (mut agent, a, _b) = agent_with_a_and_b();
    agent.process(mv(100.0, 100.0));

    assert!(agent.process(RawSample::Key {
        key: Key::Char('c'),
        modifiers: Modifiers::NONE,
    }));
    let last = a.borrow().received.last().cloned().unwrap();
    assert_eq!(last.key_value(), Some(Key::Char('c')));
}

#[test]
fn test_tick_reports_and_resets_bookkeeping() {
    let (mut agent, _a, _b) = agent_with_a_and_b();
    agent.process(mv(100.0, 100.0));
    agent.process(click(100.0, 100.0));

    let summary = agent.tick();
    assert_eq!(summary.dispatched, 2);
    assert_eq!(summary.oneshots, 1);
    assert_eq!(summary.fed, 0);
    assert_eq!(agent.pending(), TickSummary::default());
    assert_eq!(agent.tick_count(), 1);
}

#[test]
fn test_tick_drains_feed() {
    let (mut agent, _a, b) = agent_with_a_and_b();
    let id_b = agent.id_of(&(b.clone() as GrabberRef)).unwrap();

    let mut queue = vec![
        FeedEvent::Handle(Event::tap(ControlId::LEFT, Modifiers::NONE, 500.0, 500.0, 1)),
        FeedEvent::PollAndHandle(Event::tap(
            ControlId::LEFT,
            Modifiers::NONE,
            500.0,
            500.0,
            1,
        )),
        FeedEvent::Poll(Event::motion2(ControlId::NO_ID, Modifiers::NONE, 500.0, 500.0)),
    ];
    queue.reverse();
    agent.set_feed(Box::new(move || queue.pop()));
    assert!(agent.has_feed());

    let summary = agent.tick();
    assert_eq!(summary.fed, 3);
    // The first tap arrives before anything is tracked
    assert_eq!(summary.dispatched, 1);
    assert_eq!(agent.tracked_grabber(), Some(id_b));
    assert_eq!(b.borrow().received.len(), 1);

    // An exhausted feed stays installed but yields nothing
    assert_eq!(agent.tick().fed, 0);
    agent.clear_feed();
    assert!(!agent.has_feed());
}

#[test]
fn test_from_config_applies_agent_section() {
    let config = AgentConfig {
        focus_policy: FocusPolicy::ClickToPick,
        tracking: false,
        sensitivities: [1.5, 0.5],
    };
    let agent = Agent::from_config(&config);

    assert_eq!(agent.focus_policy(), FocusPolicy::ClickToPick);
    assert!(!agent.is_tracking());
    assert_eq!(agent.sensitivities(), [1.5, 0.5]);
}
