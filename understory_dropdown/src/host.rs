// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capabilities the host toolkit provides to the controller.
//!
//! The controller never reaches into the host's display tree or event
//! dispatcher directly. Instead it is handed small handles implementing these
//! traits. Handles are typically cheap proxies (an id plus a shared reference
//! to the host's dispatcher) so the host keeps ownership of the real objects.
//!
//! Subscription calls describe *which* input the controller wants to receive.
//! The host is expected to forward matching input through
//! [`DropDownController::handle_anchor_event`](crate::DropDownController::handle_anchor_event)
//! and [`DropDownController::handle_stage_event`](crate::DropDownController::handle_stage_event).
//! Input for triggers that are not subscribed is ignored, so forwarding
//! everything is also correct.

use crate::types::{AnchorTriggers, StageTriggers};

/// The button that anchors the drop-down.
pub trait OpenButton<K> {
    /// The button's node in the host display tree.
    ///
    /// Used for subtree containment and to detect re-assignment of the same button.
    fn node(&self) -> K;

    /// Start delivering the given anchor events.
    fn subscribe(&mut self, triggers: AnchorTriggers);

    /// Stop delivering the given anchor events.
    fn unsubscribe(&mut self, triggers: AnchorTriggers);

    /// Pin (or release) the pressed visual state while the drop-down is open.
    fn set_held_open(&mut self, held: bool);
}

/// The root surface that receives every pointer event.
pub trait Stage {
    /// Start delivering the given stage events.
    fn subscribe(&mut self, triggers: StageTriggers);

    /// Stop delivering the given stage events.
    fn unsubscribe(&mut self, triggers: StageTriggers);
}

/// A one-shot, cancelable timer.
///
/// Each [`start`](OneShotTimer::start) schedules exactly one completion which the
/// host reports through
/// [`DropDownController::handle_timer`](crate::DropDownController::handle_timer)
/// with the returned handle. After [`stop`](OneShotTimer::stop) the completion
/// must not be reported; the controller also ignores completions for handles it
/// no longer waits on.
pub trait OneShotTimer {
    /// Handle identifying a scheduled completion.
    type Handle: Copy + Eq + core::fmt::Debug;

    /// Schedule a completion `delay_ms` milliseconds from now.
    fn start(&mut self, delay_ms: u64) -> Self::Handle;

    /// Cancel a scheduled completion.
    fn stop(&mut self, handle: Self::Handle);
}

/// Read-only view of the host's display tree, used for containment tests.
pub trait DisplayTree<K> {
    /// Parent of `node`, or `None` for roots and unknown nodes.
    ///
    /// Following parents from any node must reach a root; ancestry is
    /// assumed to be acyclic.
    fn parent_of(&self, node: &K) -> Option<K>;

    /// Whether `node` can have children.
    ///
    /// Leaf nodes only contain themselves.
    fn is_container(&self, _node: &K) -> bool {
        true
    }
}

/// A display tree with no parent links; every node only contains itself.
#[derive(Copy, Clone, Debug, Default)]
pub struct FlatTree;

impl<K> DisplayTree<K> for FlatTree {
    fn parent_of(&self, _node: &K) -> Option<K> {
        None
    }
}
