// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Dropdown: a headless, `no_std` open/dismiss controller for drop-downs.
//!
//! ## Overview
//!
//! [`DropDownController`] owns the open/closed state of an overlay anchored to a
//! button. It opens on an activation of the button (or after hovering it for a
//! configurable delay) and closes on presses outside the button, the drop-down,
//! and any extra hit areas, on stage resize, on a repeated activation, or when
//! asked to.
//!
//! It does not render, lay out, or hit test. The host toolkit owns all of that
//! and gives the controller small capability handles instead:
//!
//! - [`OpenButton`]: the anchor; receives trigger subscriptions and the
//!   held-open visual pin.
//! - [`Stage`]: the root surface; receives dismissal trigger subscriptions.
//! - [`OneShotTimer`]: schedules the hover delay.
//! - [`DisplayTree`]: answers parent lookups for subtree containment. Hosts
//!   without parent links can use [`hit::ParentMap`].
//!
//! ## Subscriptions
//!
//! The controller describes the input it needs as [`AnchorTriggers`] and
//! [`StageTriggers`] bit sets. Every bit it subscribes is unsubscribed exactly
//! once, including across reconfiguration (changing the button, the trigger
//! mode, or the stage while open). The host forwards matching input through
//! [`DropDownController::handle_anchor_event`],
//! [`DropDownController::handle_stage_event`], and
//! [`DropDownController::handle_timer`].
//!
//! ## Trigger modes
//!
//! - [`TriggerMode::Click`] (no roll-over delay): the button's activation
//!   toggles the drop-down; a press outside closes it.
//! - [`TriggerMode::Hover`]: rolling over the button opens after the delay
//!   unless the pointer rolls out first; moving outside closes it, and a drag
//!   that leaves with a button held closes on release.
//!
//! ## Notifications
//!
//! Listeners added with [`DropDownController::add_listener`] receive
//! [`DropDownEvent::Open`] and [`DropDownEvent::Close`]. The close payload is
//! cancelable: its default (committing the selection) is already prevented for
//! `close_drop_down(false)`, and listeners may prevent it too. Preventing it
//! does not keep the drop-down open.
//!
//! ## Logging
//!
//! Transitions are logged at `debug` and ignored input at `trace` through the
//! [`log`] facade. No logger is installed by this crate.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod controller;
pub mod hit;
mod host;
mod notify;
mod types;

pub use controller::DropDownController;
pub use host::{DisplayTree, FlatTree, OneShotTimer, OpenButton, Stage};
pub use types::{
    AnchorEvent, AnchorTriggers, CloseEvent, DropDownConfig, DropDownEvent, ListenerId,
    StageEvent, StageTriggers, TriggerMode,
};
