// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types: trigger sets, input events, notifications, and configuration.

bitflags::bitflags! {
    /// Events the controller listens for on the open button.
    ///
    /// The controller hands these sets to [`OpenButton::subscribe`](crate::OpenButton::subscribe)
    /// and [`OpenButton::unsubscribe`](crate::OpenButton::unsubscribe); every bit it subscribes is
    /// unsubscribed exactly once later.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct AnchorTriggers: u8 {
        /// Press-type activation of the button (click mode open trigger).
        const ACTIVATED = 0b0000_0001;
        /// Pointer entered the button (hover mode open trigger).
        const ROLL_OVER = 0b0000_0010;
        /// Pointer left the button while a hover delay is pending.
        const ROLL_OUT  = 0b0000_0100;
    }
}

bitflags::bitflags! {
    /// Events the controller listens for on the stage (root surface).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct StageTriggers: u8 {
        /// Pointer pressed anywhere on the surface.
        const POINTER_DOWN  = 0b0000_0001;
        /// Pointer released anywhere on the surface.
        const POINTER_UP    = 0b0000_0010;
        /// Pointer moved anywhere on the surface.
        const POINTER_MOVE  = 0b0000_0100;
        /// Pointer left the surface.
        const LEAVE_SURFACE = 0b0000_1000;
        /// Surface was resized.
        const RESIZE        = 0b0001_0000;
        /// Wheel scrolled anywhere on the surface.
        const WHEEL         = 0b0010_0000;
    }
}

impl StageTriggers {
    /// Dismissal triggers installed on open in click mode.
    pub const CLICK_DISMISS: Self = Self::POINTER_DOWN.union(Self::POINTER_UP);
    /// Dismissal triggers installed on open in hover mode.
    pub const HOVER_DISMISS: Self = Self::POINTER_MOVE;
    /// Triggers installed while a pressed pointer is outside in hover mode.
    pub const RELEASE: Self = Self::POINTER_UP.union(Self::LEAVE_SURFACE);
}

/// How the drop-down is opened from its anchor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TriggerMode {
    /// Open (and toggle closed) on a press-type activation of the button.
    Click,
    /// Open after the pointer rests over the button for `delay_ms` milliseconds.
    Hover {
        /// Delay before opening; zero opens on roll-over.
        delay_ms: u64,
    },
}

impl TriggerMode {
    /// Derive the mode from a roll-over delay, where `None` disables hover opening.
    pub const fn from_delay(delay_ms: Option<u64>) -> Self {
        match delay_ms {
            Some(delay_ms) => Self::Hover { delay_ms },
            None => Self::Click,
        }
    }

    /// The open trigger installed on the anchor in this mode.
    pub const fn open_trigger(self) -> AnchorTriggers {
        match self {
            Self::Click => AnchorTriggers::ACTIVATED,
            Self::Hover { .. } => AnchorTriggers::ROLL_OVER,
        }
    }

    /// The dismissal triggers installed on the stage when opening in this mode.
    pub const fn dismiss_triggers(self) -> StageTriggers {
        match self {
            Self::Click => StageTriggers::CLICK_DISMISS,
            Self::Hover { .. } => StageTriggers::HOVER_DISMISS,
        }
    }
}

/// Input delivered by the host for the open button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AnchorEvent {
    /// Press-type activation (pointer went down on the button).
    Activated,
    /// Pointer entered the button.
    RollOver,
    /// Pointer left the button.
    RollOut,
}

impl AnchorEvent {
    /// The trigger bit that must be subscribed for this event to be handled.
    pub const fn trigger(self) -> AnchorTriggers {
        match self {
            Self::Activated => AnchorTriggers::ACTIVATED,
            Self::RollOver => AnchorTriggers::ROLL_OVER,
            Self::RollOut => AnchorTriggers::ROLL_OUT,
        }
    }
}

/// Input delivered by the host for the stage.
///
/// `target` is the node the host resolved under the pointer, or `None` when
/// nothing (or the bare surface) was hit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum StageEvent<K> {
    /// Pointer pressed.
    PointerDown {
        /// Hit target.
        target: Option<K>,
    },
    /// Pointer released.
    PointerUp {
        /// Hit target.
        target: Option<K>,
    },
    /// Pointer moved.
    PointerMove {
        /// Hit target.
        target: Option<K>,
        /// Whether a button is held during the move.
        pressed: bool,
    },
    /// Pointer left the surface.
    LeaveSurface,
    /// Surface resized.
    Resize,
    /// Wheel scrolled.
    Wheel {
        /// Hit target.
        target: Option<K>,
        /// Whether an earlier handler already consumed the wheel.
        handled: bool,
    },
}

impl<K> StageEvent<K> {
    /// The trigger bit that must be subscribed for this event to be handled.
    pub const fn trigger(&self) -> StageTriggers {
        match self {
            Self::PointerDown { .. } => StageTriggers::POINTER_DOWN,
            Self::PointerUp { .. } => StageTriggers::POINTER_UP,
            Self::PointerMove { .. } => StageTriggers::POINTER_MOVE,
            Self::LeaveSurface => StageTriggers::LEAVE_SURFACE,
            Self::Resize => StageTriggers::RESIZE,
            Self::Wheel { .. } => StageTriggers::WHEEL,
        }
    }
}

/// Payload of the cancelable close notification.
///
/// The default action of a close is to commit the current selection. A close
/// requested with `commit == false` arrives with its default already
/// prevented, and listeners may prevent it too. Preventing the default does
/// not keep the drop-down open.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CloseEvent {
    default_prevented: bool,
}

impl CloseEvent {
    pub(crate) const fn new(commit: bool) -> Self {
        Self {
            default_prevented: !commit,
        }
    }

    /// Whether observers should treat the close as accepting the selection.
    pub const fn commit(&self) -> bool {
        !self.default_prevented
    }

    /// Whether the commit default was prevented.
    pub const fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Prevent the commit default for later listeners.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

/// Notification emitted by the controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DropDownEvent {
    /// The drop-down opened.
    Open,
    /// The drop-down closed.
    Close(CloseEvent),
}

/// Handle returned by [`DropDownController::add_listener`](crate::DropDownController::add_listener).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u32);

/// Initial configuration for a [`DropDownController`](crate::DropDownController).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropDownConfig {
    /// Close when the stage is resized.
    pub close_on_resize: bool,
    /// Hover delay in milliseconds; `None` selects click mode.
    pub roll_over_open_delay: Option<u64>,
    /// Listen for wheel events on the stage while open and close on an
    /// unhandled wheel outside the drop-down.
    pub close_on_wheel: bool,
}

impl Default for DropDownConfig {
    fn default() -> Self {
        Self {
            close_on_resize: true,
            roll_over_open_delay: None,
            close_on_wheel: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_follows_delay() {
        assert_eq!(TriggerMode::from_delay(None), TriggerMode::Click);
        assert_eq!(
            TriggerMode::from_delay(Some(0)),
            TriggerMode::Hover { delay_ms: 0 }
        );
        assert_eq!(
            TriggerMode::Click.open_trigger(),
            AnchorTriggers::ACTIVATED
        );
        assert_eq!(
            TriggerMode::Hover { delay_ms: 5 }.dismiss_triggers(),
            StageTriggers::POINTER_MOVE
        );
    }

    #[test]
    fn close_event_commit_tracks_default() {
        let mut ev = CloseEvent::new(true);
        assert!(ev.commit());
        ev.prevent_default();
        assert!(!ev.commit());
        assert!(CloseEvent::new(false).is_default_prevented());
    }

    #[test]
    fn stage_event_maps_to_its_trigger() {
        let ev: StageEvent<u32> = StageEvent::PointerMove {
            target: Some(3),
            pressed: true,
        };
        assert_eq!(ev.trigger(), StageTriggers::POINTER_MOVE);
        assert_eq!(StageEvent::<u32>::LeaveSurface.trigger(), StageTriggers::LEAVE_SURFACE);
        assert!(StageTriggers::RELEASE.contains(StageTriggers::POINTER_UP));
    }
}
