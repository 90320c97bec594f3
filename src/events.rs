//! Engine events and the listener bus.
//!
//! Listeners are plain callbacks registered per [`EventKind`]. They run
//! synchronously, in registration order, when the engine emits. A listener
//! that returns an error or panics is logged and skipped; the remaining
//! listeners still run and the engine carries on.

use std::collections::BTreeMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::action::{Action, ActionError};
use crate::game_state::StackItemKind;
use crate::ids::{InstanceId, PlayerIndex, StackItemId};

/// Event names listeners subscribe to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    ActionExecuted,
    ActionFailed,
    StackItemAdded,
    StackItemResolved,
}

/// Something the engine did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ActionExecuted {
        action: Action,
    },
    ActionFailed {
        action: Action,
        error: ActionError,
        message: String,
    },
    StackItemAdded {
        item: StackItemId,
        kind: StackItemKind,
        source: InstanceId,
        controller: PlayerIndex,
    },
    StackItemResolved {
        item: StackItemId,
        source: InstanceId,
        /// Every chosen target had become illegal, so nothing happened.
        fizzled: bool,
    },
}

impl EngineEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            EngineEvent::ActionExecuted { .. } => EventKind::ActionExecuted,
            EngineEvent::ActionFailed { .. } => EventKind::ActionFailed,
            EngineEvent::StackItemAdded { .. } => EventKind::StackItemAdded,
            EngineEvent::StackItemResolved { .. } => EventKind::StackItemResolved,
        }
    }
}

/// Handle returned by [`EventBus::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

pub type ListenerError = Box<dyn std::error::Error>;
pub type Listener = Box<dyn FnMut(&EngineEvent) -> Result<(), ListenerError>>;

/// Synchronous publish/subscribe for [`EngineEvent`]s.
#[derive(Default)]
pub struct EventBus {
    listeners: BTreeMap<EventKind, Vec<(ListenerId, Listener)>>,
    next_id: u64,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: BTreeMap<_, _> = self
            .listeners
            .iter()
            .map(|(kind, listeners)| (*kind, listeners.len()))
            .collect();
        f.debug_struct("EventBus")
            .field("listeners", &counts)
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&EngineEvent) -> Result<(), ListenerError> + 'static,
    {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners
            .entry(kind)
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns false if it was not subscribed to `kind`.
    pub fn off(&mut self, kind: EventKind, id: ListenerId) -> bool {
        let Some(listeners) = self.listeners.get_mut(&kind) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        before != listeners.len()
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    /// Delivers `event` to every listener of its kind.
    pub fn emit(&mut self, event: &EngineEvent) {
        let kind = event.kind();
        let Some(listeners) = self.listeners.get_mut(&kind) else {
            return;
        };
        for (id, listener) in listeners.iter_mut() {
            match catch_unwind(AssertUnwindSafe(|| listener(event))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    tracing::error!(listener = id.0, %kind, error = %err, "event listener failed");
                }
                Err(payload) => {
                    tracing::error!(
                        listener = id.0,
                        %kind,
                        panic = %panic_message(payload.as_ref()),
                        "event listener panicked"
                    );
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}
