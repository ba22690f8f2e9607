// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drop-down controller state machine.
//!
//! ## States
//!
//! - **Closed** (initial): only the open trigger for the current
//!   [`TriggerMode`] is subscribed on the open button.
//! - **Open**: the mode's dismissal triggers (plus `RESIZE` / `WHEEL` when
//!   enabled) are subscribed on the stage and the button is pinned pressed.
//!
//! ## Transitions
//!
//! | from   | input                                             | to     | close commit |
//! |--------|---------------------------------------------------|--------|--------------|
//! | Closed | `Activated` (click mode)                          | Open   |              |
//! | Closed | `RollOver` with zero delay, or timer completion   | Open   |              |
//! | Closed | [`DropDownController::open_drop_down`]            | Open   |              |
//! | Open   | `Activated` (click mode)                          | Closed | `true`       |
//! | Open   | `PointerDown` outside (click mode)                | Closed | `true`       |
//! | Open   | unpressed `PointerMove` outside (hover mode)      | Closed | `true`       |
//! | Open   | release outside after a pressed move (hover mode) | Closed | `true`       |
//! | Open   | `Resize` with `close_on_resize`                   | Closed | `true`       |
//! | Open   | unhandled wheel outside the drop-down             | Closed | `false`      |
//! | Open   | [`DropDownController::close_drop_down`]           | Closed | caller's     |
//!
//! In click mode the pointer-down that activated the button reaches the stage
//! right after the activation. A one-shot press guard swallows it so the
//! drop-down does not close on the gesture that opened it.

use core::mem;

use log::{debug, trace};
use smallvec::SmallVec;

use crate::hit::{is_target_inside, subtree_contains};
use crate::host::{DisplayTree, OneShotTimer, OpenButton, Stage};
use crate::notify::Listeners;
use crate::types::{
    AnchorEvent, AnchorTriggers, CloseEvent, DropDownConfig, DropDownEvent, ListenerId,
    StageEvent, StageTriggers, TriggerMode,
};

/// Opens and closes a drop-down in response to its anchor, outside presses,
/// stage resizes, and (optionally) wheel input.
///
/// ## Usage
///
/// - Construct with [`DropDownController::new`] or
///   [`DropDownController::with_config`], handing over the host's timer.
/// - Assign the collaborators: [`set_open_button`](Self::set_open_button),
///   [`set_stage`](Self::set_stage), [`set_drop_down`](Self::set_drop_down),
///   and optionally [`set_hit_area_additions`](Self::set_hit_area_additions).
/// - Forward input with [`handle_anchor_event`](Self::handle_anchor_event),
///   [`handle_stage_event`](Self::handle_stage_event), and
///   [`handle_timer`](Self::handle_timer).
/// - Observe transitions with [`add_listener`](Self::add_listener).
///
/// ## Example
///
/// ```
/// use understory_dropdown::{
///     AnchorEvent, AnchorTriggers, DropDownController, FlatTree,
///     OneShotTimer, OpenButton, Stage, StageEvent, StageTriggers,
/// };
///
/// struct Button;
/// impl OpenButton<u32> for Button {
///     fn node(&self) -> u32 { 1 }
///     fn subscribe(&mut self, _: AnchorTriggers) {}
///     fn unsubscribe(&mut self, _: AnchorTriggers) {}
///     fn set_held_open(&mut self, _: bool) {}
/// }
/// struct Surface;
/// impl Stage for Surface {
///     fn subscribe(&mut self, _: StageTriggers) {}
///     fn unsubscribe(&mut self, _: StageTriggers) {}
/// }
/// struct NoTimer;
/// impl OneShotTimer for NoTimer {
///     type Handle = ();
///     fn start(&mut self, _: u64) {}
///     fn stop(&mut self, _: ()) {}
/// }
///
/// let mut dd = DropDownController::new(NoTimer);
/// dd.set_open_button(Some(Button));
/// dd.set_stage(Some(Surface));
/// dd.set_drop_down(Some(2));
///
/// // Pressing the button opens; the same press reaching the stage is swallowed.
/// dd.handle_anchor_event(AnchorEvent::Activated);
/// dd.handle_stage_event(&StageEvent::PointerDown { target: Some(1) }, &FlatTree);
/// assert!(dd.is_open());
///
/// // A later press outside closes.
/// dd.handle_stage_event(&StageEvent::PointerDown { target: Some(9) }, &FlatTree);
/// assert!(!dd.is_open());
/// ```
pub struct DropDownController<K, A, S, T: OneShotTimer> {
    open_button: Option<A>,
    drop_down: Option<K>,
    hit_area_additions: SmallVec<[K; 4]>,
    is_open: bool,
    close_on_resize: bool,
    close_on_wheel: bool,
    roll_over_open_delay: Option<u64>,
    stage: Option<S>,
    timer: T,
    /// Hover delay completion we are waiting for.
    pending_open: Option<T::Handle>,
    /// Set by a press-type activation that opened; consumed by the stage press/release of the same gesture.
    mouse_is_down: bool,
    anchor_triggers: AnchorTriggers,
    stage_triggers: StageTriggers,
    listeners: Listeners,
}

impl<K: core::fmt::Debug, A, S, T: OneShotTimer> core::fmt::Debug
    for DropDownController<K, A, S, T>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DropDownController")
            .field("is_open", &self.is_open)
            .field("drop_down", &self.drop_down)
            .field("roll_over_open_delay", &self.roll_over_open_delay)
            .field("close_on_resize", &self.close_on_resize)
            .field("close_on_wheel", &self.close_on_wheel)
            .field("pending_open", &self.pending_open)
            .field("anchor_triggers", &self.anchor_triggers)
            .field("stage_triggers", &self.stage_triggers)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl<K, A, S, T> DropDownController<K, A, S, T>
where
    K: Copy + Eq,
    A: OpenButton<K>,
    S: Stage,
    T: OneShotTimer,
{
    /// Create a closed controller with the default [`DropDownConfig`].
    pub fn new(timer: T) -> Self {
        Self::with_config(timer, DropDownConfig::default())
    }

    /// Create a closed controller with an explicit configuration.
    pub fn with_config(timer: T, config: DropDownConfig) -> Self {
        Self {
            open_button: None,
            drop_down: None,
            hit_area_additions: SmallVec::new(),
            is_open: false,
            close_on_resize: config.close_on_resize,
            close_on_wheel: config.close_on_wheel,
            roll_over_open_delay: config.roll_over_open_delay,
            stage: None,
            timer,
            pending_open: None,
            mouse_is_down: false,
            anchor_triggers: AnchorTriggers::empty(),
            stage_triggers: StageTriggers::empty(),
            listeners: Listeners::default(),
        }
    }

    /// Whether the drop-down is open.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// The active trigger mode, derived from the roll-over delay.
    pub fn trigger_mode(&self) -> TriggerMode {
        TriggerMode::from_delay(self.roll_over_open_delay)
    }

    /// The open button, if assigned.
    pub fn open_button(&self) -> Option<&A> {
        self.open_button.as_ref()
    }

    /// The drop-down node, if assigned.
    pub fn drop_down(&self) -> Option<K> {
        self.drop_down
    }

    /// Extra nodes treated as part of the drop-down's interactive region.
    pub fn hit_area_additions(&self) -> &[K] {
        &self.hit_area_additions
    }

    /// Whether a stage resize closes the drop-down.
    pub fn close_on_resize(&self) -> bool {
        self.close_on_resize
    }

    /// Whether wheel input is listened for while open.
    pub fn close_on_wheel(&self) -> bool {
        self.close_on_wheel
    }

    /// Hover delay in milliseconds, or `None` in click mode.
    pub fn roll_over_open_delay(&self) -> Option<u64> {
        self.roll_over_open_delay
    }

    /// The stage, if assigned.
    pub fn stage(&self) -> Option<&S> {
        self.stage.as_ref()
    }

    /// The timer collaborator.
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Whether a hover delay is currently running.
    pub fn is_open_pending(&self) -> bool {
        self.pending_open.is_some()
    }

    /// Triggers currently subscribed on the open button.
    pub fn anchor_triggers(&self) -> AnchorTriggers {
        self.anchor_triggers
    }

    /// Triggers currently subscribed on the stage.
    pub fn stage_triggers(&self) -> StageTriggers {
        self.stage_triggers
    }

    /// Register a listener for [`DropDownEvent`]s.
    ///
    /// Listeners cannot keep the drop-down open by preventing the default of a
    /// close; they only change the commit flag later listeners observe.
    pub fn add_listener(&mut self, f: impl FnMut(&mut DropDownEvent) + 'static) -> ListenerId {
        self.listeners.add(f)
    }

    /// Remove a listener. Returns `false` if the id is unknown.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Assign the open button, moving the open triggers to it.
    ///
    /// Returns the handle that is no longer in use: the previous button, or
    /// `button` itself when it refers to the node already assigned.
    pub fn set_open_button(&mut self, button: Option<A>) -> Option<A> {
        let same = match (&self.open_button, &button) {
            (Some(cur), Some(new)) => cur.node() == new.node(),
            (None, None) => true,
            _ => false,
        };
        if same {
            return button;
        }

        self.remove_open_triggers();
        if self.is_open
            && let Some(old) = self.open_button.as_mut()
        {
            old.set_held_open(false);
        }
        let old = mem::replace(&mut self.open_button, button);
        if self.is_open
            && let Some(new) = self.open_button.as_mut()
        {
            new.set_held_open(true);
        }
        self.add_open_triggers();
        debug!("drop-down open button reassigned");
        old
    }

    /// Assign the drop-down node. Subscriptions are unaffected.
    pub fn set_drop_down(&mut self, drop_down: Option<K>) {
        self.drop_down = drop_down;
    }

    /// Replace the hit-area additions.
    pub fn set_hit_area_additions(&mut self, nodes: impl IntoIterator<Item = K>) {
        self.hit_area_additions.clear();
        self.hit_area_additions.extend(nodes);
    }

    /// Set whether a stage resize closes the drop-down.
    pub fn set_close_on_resize(&mut self, close_on_resize: bool) {
        if self.close_on_resize == close_on_resize {
            return;
        }
        self.close_on_resize = close_on_resize;
        if self.is_open {
            if close_on_resize {
                self.subscribe_stage(StageTriggers::RESIZE);
            } else {
                self.unsubscribe_stage(StageTriggers::RESIZE);
            }
        }
    }

    /// Set whether wheel input on the stage is listened for while open.
    pub fn set_close_on_wheel(&mut self, close_on_wheel: bool) {
        if self.close_on_wheel == close_on_wheel {
            return;
        }
        self.close_on_wheel = close_on_wheel;
        if self.is_open {
            if close_on_wheel {
                self.subscribe_stage(StageTriggers::WHEEL);
            } else {
                self.unsubscribe_stage(StageTriggers::WHEEL);
            }
        }
    }

    /// Set the hover delay; `None` switches to click mode.
    ///
    /// A running hover delay is canceled. If the drop-down is open and the
    /// mode kind changes, the stage dismissal triggers are re-wired for the new
    /// mode.
    pub fn set_roll_over_open_delay(&mut self, delay_ms: Option<u64>) {
        if self.roll_over_open_delay == delay_ms {
            return;
        }
        let was_click = self.trigger_mode() == TriggerMode::Click;
        self.remove_open_triggers();
        self.roll_over_open_delay = delay_ms;
        self.add_open_triggers();

        let is_click = self.trigger_mode() == TriggerMode::Click;
        if self.is_open && was_click != is_click {
            self.unsubscribe_stage(
                StageTriggers::CLICK_DISMISS | StageTriggers::HOVER_DISMISS | StageTriggers::RELEASE,
            );
            self.mouse_is_down = false;
            self.subscribe_stage(self.trigger_mode().dismiss_triggers());
        }
        debug!("drop-down trigger mode is now {:?}", self.trigger_mode());
    }

    /// Assign the stage, moving any subscribed stage triggers to it.
    ///
    /// Returns the previous stage.
    pub fn set_stage(&mut self, stage: Option<S>) -> Option<S> {
        let carried = self.stage_triggers;
        self.unsubscribe_stage(StageTriggers::all());
        let old = mem::replace(&mut self.stage, stage);
        if self.is_open {
            let wanted = carried | self.dismiss_triggers();
            self.subscribe_stage(wanted);
        }
        old
    }

    /// Open the drop-down. Does nothing if it is already open.
    pub fn open_drop_down(&mut self) {
        if self.is_open {
            return;
        }
        self.cancel_pending_open();
        let wanted = self.dismiss_triggers();
        self.subscribe_stage(wanted);
        self.is_open = true;
        if let Some(button) = self.open_button.as_mut() {
            button.set_held_open(true);
        }
        debug!("drop-down opened");
        self.listeners.emit(DropDownEvent::Open);
    }

    /// Close the drop-down. Does nothing if it is already closed.
    ///
    /// `commit` tells listeners whether the close accepts the current
    /// selection. The close notification is cancelable, but canceling it only
    /// clears the commit flag seen by later listeners; the drop-down closes
    /// regardless.
    pub fn close_drop_down(&mut self, commit: bool) {
        if !self.is_open {
            return;
        }
        self.is_open = false;
        if let Some(button) = self.open_button.as_mut() {
            button.set_held_open(false);
        }
        let ev = self
            .listeners
            .emit(DropDownEvent::Close(CloseEvent::new(commit)));
        debug!("drop-down closed (commit: {commit}, delivered: {ev:?})");
        self.unsubscribe_stage(StageTriggers::all());
        self.mouse_is_down = false;
    }

    /// Handle input from the open button.
    pub fn handle_anchor_event(&mut self, event: AnchorEvent) {
        if !self.anchor_triggers.contains(event.trigger()) {
            trace!("ignoring unsubscribed anchor event {event:?}");
            return;
        }
        match event {
            AnchorEvent::Activated => {
                if self.is_open {
                    self.close_drop_down(true);
                } else {
                    self.mouse_is_down = true;
                    self.open_drop_down();
                }
            }
            AnchorEvent::RollOver => self.roll_over(),
            AnchorEvent::RollOut => {
                trace!("roll-out cancels hover delay");
                self.cancel_pending_open();
            }
        }
    }

    /// Handle a hover delay completion reported by the timer.
    ///
    /// Completions for handles other than the pending one are ignored.
    pub fn handle_timer(&mut self, handle: T::Handle) {
        if self.pending_open != Some(handle) {
            trace!("ignoring stale timer completion {handle:?}");
            return;
        }
        self.pending_open = None;
        self.unsubscribe_anchor(AnchorTriggers::ROLL_OUT);
        self.open_drop_down();
    }

    /// Handle input from the stage. `tree` answers containment queries.
    pub fn handle_stage_event(&mut self, event: &StageEvent<K>, tree: &impl DisplayTree<K>) {
        if !self.stage_triggers.contains(event.trigger()) {
            trace!("ignoring unsubscribed stage event {:?}", event.trigger());
            return;
        }
        match *event {
            StageEvent::PointerDown { target } => {
                if mem::take(&mut self.mouse_is_down) {
                    trace!("press guard swallowed the opening pointer-down");
                    return;
                }
                if !self.is_inside(tree, target.as_ref()) {
                    self.close_drop_down(true);
                }
            }
            StageEvent::PointerUp { target } => match self.trigger_mode() {
                TriggerMode::Click => self.mouse_is_down = false,
                TriggerMode::Hover { .. } => self.release(tree, target.as_ref()),
            },
            StageEvent::PointerMove { target, pressed } => {
                if self.is_inside(tree, target.as_ref()) {
                    return;
                }
                if pressed {
                    // Dragged out; decide on release.
                    self.subscribe_stage(StageTriggers::RELEASE);
                    return;
                }
                self.close_drop_down(true);
            }
            StageEvent::LeaveSurface => self.release(tree, None),
            StageEvent::Resize => self.close_drop_down(true),
            StageEvent::Wheel { target, handled } => self.handle_wheel(target, handled, tree),
        }
    }

    /// Close without committing when an unhandled wheel happens outside the drop-down.
    ///
    /// This is callable directly regardless of subscriptions. It is only wired
    /// to the stage when `close_on_wheel` is enabled.
    pub fn handle_wheel(&mut self, target: Option<K>, handled: bool, tree: &impl DisplayTree<K>) {
        let Some(drop_down) = self.drop_down else {
            return;
        };
        let inside = target.is_some_and(|t| subtree_contains(tree, &drop_down, &t));
        if !inside && !handled {
            self.close_drop_down(false);
        }
    }

    fn roll_over(&mut self) {
        let Some(delay_ms) = self.roll_over_open_delay else {
            return;
        };
        if self.is_open {
            return;
        }
        if delay_ms == 0 {
            self.open_drop_down();
            return;
        }
        if let Some(stale) = self.pending_open.take() {
            self.timer.stop(stale);
        }
        self.subscribe_anchor(AnchorTriggers::ROLL_OUT);
        let handle = self.timer.start(delay_ms);
        trace!("hover delay of {delay_ms}ms started ({handle:?})");
        self.pending_open = Some(handle);
    }

    fn release(&mut self, tree: &impl DisplayTree<K>, target: Option<&K>) {
        if self.is_inside(tree, target) {
            self.unsubscribe_stage(StageTriggers::RELEASE);
            return;
        }
        self.close_drop_down(true);
    }

    fn is_inside(&self, tree: &impl DisplayTree<K>, target: Option<&K>) -> bool {
        let button = self.open_button.as_ref().map(|b| b.node());
        is_target_inside(
            tree,
            target,
            button.as_ref(),
            &self.hit_area_additions,
            self.drop_down.as_ref(),
        )
    }

    fn dismiss_triggers(&self) -> StageTriggers {
        let mut triggers = self.trigger_mode().dismiss_triggers();
        if self.close_on_resize {
            triggers |= StageTriggers::RESIZE;
        }
        if self.close_on_wheel {
            triggers |= StageTriggers::WHEEL;
        }
        triggers
    }

    fn add_open_triggers(&mut self) {
        self.subscribe_anchor(self.trigger_mode().open_trigger());
    }

    fn remove_open_triggers(&mut self) {
        if let Some(handle) = self.pending_open.take() {
            self.timer.stop(handle);
        }
        self.unsubscribe_anchor(AnchorTriggers::all());
    }

    fn cancel_pending_open(&mut self) {
        if let Some(handle) = self.pending_open.take() {
            self.timer.stop(handle);
        }
        self.unsubscribe_anchor(AnchorTriggers::ROLL_OUT);
    }

    fn subscribe_anchor(&mut self, triggers: AnchorTriggers) {
        let Some(button) = self.open_button.as_mut() else {
            return;
        };
        let fresh = triggers.difference(self.anchor_triggers);
        if fresh.is_empty() {
            return;
        }
        button.subscribe(fresh);
        self.anchor_triggers.insert(fresh);
    }

    fn unsubscribe_anchor(&mut self, triggers: AnchorTriggers) {
        let Some(button) = self.open_button.as_mut() else {
            return;
        };
        let live = triggers.intersection(self.anchor_triggers);
        if live.is_empty() {
            return;
        }
        button.unsubscribe(live);
        self.anchor_triggers.remove(live);
    }

    fn subscribe_stage(&mut self, triggers: StageTriggers) {
        let Some(stage) = self.stage.as_mut() else {
            trace!("no stage; skipping subscription of {triggers:?}");
            return;
        };
        let fresh = triggers.difference(self.stage_triggers);
        if fresh.is_empty() {
            return;
        }
        stage.subscribe(fresh);
        self.stage_triggers.insert(fresh);
    }

    fn unsubscribe_stage(&mut self, triggers: StageTriggers) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        let live = triggers.intersection(self.stage_triggers);
        if live.is_empty() {
            return;
        }
        stage.unsubscribe(live);
        self.stage_triggers.remove(live);
    }
}
