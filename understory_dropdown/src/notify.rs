// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener registry for controller notifications.
//!
//! Listeners run synchronously in registration order. Each receives the same
//! mutable [`DropDownEvent`], so a listener that prevents the default of a
//! [`CloseEvent`](crate::CloseEvent) is observed by the listeners after it.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::types::{DropDownEvent, ListenerId};

type Callback = Box<dyn FnMut(&mut DropDownEvent)>;

#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u32,
    entries: Vec<(ListenerId, Callback)>,
}

impl core::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl Listeners {
    pub(crate) fn add(&mut self, f: impl FnMut(&mut DropDownEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push((id, Box::new(f)));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Deliver `event` to every listener and return it as the last listener left it.
    pub(crate) fn emit(&mut self, mut event: DropDownEvent) -> DropDownEvent {
        for (_, f) in &mut self.entries {
            f(&mut event);
        }
        event
    }
}
