// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wiring a drop-down controller into a toy host.
//!
//! This example shows how a host:
//! - hit tests its own scene (here: a flat list of `kurbo::Rect`s with parent links),
//! - hands proxy handles for the button, stage, and timer to `understory_dropdown`,
//! - forwards only the input the controller subscribed to,
//! - drives the hover delay from a virtual clock.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example dropdown_host`

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use kurbo::{Point, Rect};
use understory_dropdown::hit::subtree_contains;
use understory_dropdown::{
    AnchorEvent, AnchorTriggers, DisplayTree, DropDownController, DropDownEvent, OneShotTimer,
    OpenButton, Stage, StageEvent, StageTriggers,
};

const ROOT: u32 = 0;
const BUTTON: u32 = 1;
const BUTTON_ICON: u32 = 2;
const LIST: u32 = 10;
const LIST_ITEM: u32 = 11;

/// Host-side state shared by the proxies.
#[derive(Debug, Default)]
struct Host {
    anchor_subs: HashMap<u32, AnchorTriggers>,
    stage_subs: StageTriggers,
    held: HashMap<u32, bool>,
    now: u64,
    /// (handle, due time)
    timers: Vec<(u32, u64)>,
    next_timer: u32,
}

type HostRef = Rc<RefCell<Host>>;

struct ButtonProxy {
    node: u32,
    host: HostRef,
}

impl OpenButton<u32> for ButtonProxy {
    fn node(&self) -> u32 {
        self.node
    }

    fn subscribe(&mut self, triggers: AnchorTriggers) {
        let mut host = self.host.borrow_mut();
        host.anchor_subs
            .entry(self.node)
            .or_insert(AnchorTriggers::empty())
            .insert(triggers);
    }

    fn unsubscribe(&mut self, triggers: AnchorTriggers) {
        if let Some(subs) = self.host.borrow_mut().anchor_subs.get_mut(&self.node) {
            subs.remove(triggers);
        }
    }

    fn set_held_open(&mut self, held: bool) {
        self.host.borrow_mut().held.insert(self.node, held);
    }
}

struct StageProxy {
    host: HostRef,
}

impl Stage for StageProxy {
    fn subscribe(&mut self, triggers: StageTriggers) {
        self.host.borrow_mut().stage_subs.insert(triggers);
    }

    fn unsubscribe(&mut self, triggers: StageTriggers) {
        self.host.borrow_mut().stage_subs.remove(triggers);
    }
}

struct TimerProxy {
    host: HostRef,
}

impl OneShotTimer for TimerProxy {
    type Handle = u32;

    fn start(&mut self, delay_ms: u64) -> u32 {
        let mut host = self.host.borrow_mut();
        host.next_timer += 1;
        let handle = host.next_timer;
        let due = host.now + delay_ms;
        host.timers.push((handle, due));
        handle
    }

    fn stop(&mut self, handle: u32) {
        self.host.borrow_mut().timers.retain(|(h, _)| *h != handle);
    }
}

/// Scene nodes in paint order; later nodes are on top.
struct Scene {
    nodes: Vec<(u32, Option<u32>, Rect)>,
}

impl Scene {
    fn hit(&self, pt: Point) -> Option<u32> {
        self.nodes
            .iter()
            .rev()
            .find(|(_, _, rect)| rect.contains(pt))
            .map(|(id, _, _)| *id)
    }
}

impl DisplayTree<u32> for Scene {
    fn parent_of(&self, node: &u32) -> Option<u32> {
        self.nodes
            .iter()
            .find(|(id, _, _)| id == node)
            .and_then(|(_, parent, _)| *parent)
    }
}

type Controller = DropDownController<u32, ButtonProxy, StageProxy, TimerProxy>;

/// Routes raw pointer input to the controller the way a toolkit dispatcher would.
struct Driver {
    host: HostRef,
    scene: Scene,
    dd: Controller,
    over_button: bool,
}

impl Driver {
    fn anchor_wants(&self, trigger: AnchorTriggers) -> bool {
        self.host
            .borrow()
            .anchor_subs
            .get(&BUTTON)
            .is_some_and(|subs| subs.contains(trigger))
    }

    fn stage_wants(&self, trigger: StageTriggers) -> bool {
        self.host.borrow().stage_subs.contains(trigger)
    }

    fn in_button(&self, target: Option<u32>) -> bool {
        target.is_some_and(|t| subtree_contains(&self.scene, &BUTTON, &t))
    }

    fn pointer_down(&mut self, pt: Point) {
        let target = self.scene.hit(pt);
        log::info!("pointer down at {pt:?} on {target:?}");
        if self.in_button(target) && self.anchor_wants(AnchorTriggers::ACTIVATED) {
            self.dd.handle_anchor_event(AnchorEvent::Activated);
        }
        if self.stage_wants(StageTriggers::POINTER_DOWN) {
            self.dd
                .handle_stage_event(&StageEvent::PointerDown { target }, &self.scene);
        }
    }

    fn pointer_up(&mut self, pt: Point) {
        let target = self.scene.hit(pt);
        if self.stage_wants(StageTriggers::POINTER_UP) {
            self.dd
                .handle_stage_event(&StageEvent::PointerUp { target }, &self.scene);
        }
    }

    fn pointer_move(&mut self, pt: Point, pressed: bool) {
        let target = self.scene.hit(pt);
        log::info!("pointer move to {pt:?} over {target:?}");
        let over = self.in_button(target);
        if over != self.over_button {
            self.over_button = over;
            let (event, trigger) = if over {
                (AnchorEvent::RollOver, AnchorTriggers::ROLL_OVER)
            } else {
                (AnchorEvent::RollOut, AnchorTriggers::ROLL_OUT)
            };
            if self.anchor_wants(trigger) {
                self.dd.handle_anchor_event(event);
            }
        }
        if self.stage_wants(StageTriggers::POINTER_MOVE) {
            self.dd.handle_stage_event(
                &StageEvent::PointerMove { target, pressed },
                &self.scene,
            );
        }
    }

    fn advance(&mut self, ms: u64) {
        let due: Vec<u32> = {
            let mut host = self.host.borrow_mut();
            host.now += ms;
            let now = host.now;
            let (due, pending): (Vec<_>, Vec<_>) =
                std::mem::take(&mut host.timers)
                    .into_iter()
                    .partition(|(_, at)| *at <= now);
            host.timers = pending;
            due.into_iter().map(|(h, _)| h).collect()
        };
        log::info!("clock advanced by {ms}ms");
        for handle in due {
            self.dd.handle_timer(handle);
        }
    }
}

fn main() {
    env_logger::init();

    let scene = Scene {
        nodes: vec![
            (ROOT, None, Rect::new(0.0, 0.0, 400.0, 300.0)),
            (BUTTON, Some(ROOT), Rect::new(10.0, 10.0, 110.0, 40.0)),
            (BUTTON_ICON, Some(BUTTON), Rect::new(90.0, 15.0, 105.0, 35.0)),
            (LIST, Some(ROOT), Rect::new(10.0, 40.0, 160.0, 200.0)),
            (LIST_ITEM, Some(LIST), Rect::new(10.0, 40.0, 160.0, 70.0)),
        ],
    };

    let host = HostRef::default();
    let mut dd = Controller::new(TimerProxy { host: host.clone() });
    dd.set_open_button(Some(ButtonProxy {
        node: BUTTON,
        host: host.clone(),
    }));
    dd.set_stage(Some(StageProxy { host: host.clone() }));
    dd.set_drop_down(Some(LIST));
    dd.add_listener(|ev| match ev {
        DropDownEvent::Open => println!("-> open"),
        DropDownEvent::Close(close) => println!("-> close (commit: {})", close.commit()),
    });

    let mut driver = Driver {
        host,
        scene,
        dd,
        over_button: false,
    };

    println!("click mode");
    driver.pointer_down(Point::new(95.0, 20.0));
    driver.pointer_up(Point::new(95.0, 20.0));
    driver.pointer_down(Point::new(50.0, 55.0));
    driver.pointer_up(Point::new(50.0, 55.0));
    assert!(driver.dd.is_open());
    driver.pointer_down(Point::new(300.0, 250.0));
    assert!(!driver.dd.is_open());

    println!("hover mode, 150ms delay");
    driver.dd.set_roll_over_open_delay(Some(150));
    driver.pointer_move(Point::new(50.0, 20.0), false);
    driver.advance(100);
    driver.pointer_move(Point::new(300.0, 20.0), false);
    driver.advance(100);
    assert!(!driver.dd.is_open());

    driver.pointer_move(Point::new(50.0, 20.0), false);
    driver.advance(150);
    assert!(driver.dd.is_open());
    driver.pointer_move(Point::new(50.0, 100.0), false);
    driver.pointer_move(Point::new(300.0, 250.0), false);
    assert!(!driver.dd.is_open());
    assert!(!driver.host.borrow().held.get(&BUTTON).copied().unwrap_or(false));
}
