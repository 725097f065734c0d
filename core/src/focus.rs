//! Focus-target registration and notifications.
//!
//! Applications register the UI targets that take keyboard input. Adaptors
//! (and any other listener) are told when a target is added and just before
//! one is removed, so they can attach or release low-level monitoring without
//! the controller knowing what they do with it.
//!
//! Delivery is synchronous, in registration order. Listeners only see the
//! event, never the controller, so they cannot change the listener list while
//! an event is being delivered.

use ahash::AHashMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque handle identifying a UI focus target. Only compared for identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FocusTarget(pub u64);

impl fmt::Display for FocusTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target#{}", self.0)
    }
}

/// Adaptor-specific event handler associated with a focus target.
pub type EventHandler = Arc<dyn Any + Send + Sync>;

#[derive(Clone)]
pub enum FocusEvent<'a> {
    /// A target was registered (or re-registered with a new handler).
    Added {
        target: FocusTarget,
        handler: Option<&'a EventHandler>,
    },
    /// A target is about to be removed; it is still registered while this
    /// event is delivered.
    Removing { target: FocusTarget },
}

impl FocusEvent<'_> {
    pub fn target(&self) -> FocusTarget {
        match self {
            FocusEvent::Added { target, .. } | FocusEvent::Removing { target } => *target,
        }
    }
}

impl fmt::Debug for FocusEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FocusEvent::Added { target, handler } => f
                .debug_struct("Added")
                .field("target", target)
                .field("has_handler", &handler.is_some())
                .finish(),
            FocusEvent::Removing { target } => {
                f.debug_struct("Removing").field("target", target).finish()
            }
        }
    }
}

pub trait FocusListener: Send {
    fn on_focus_event(&mut self, event: &FocusEvent<'_>);
}

impl<F> FocusListener for F
where
    F: FnMut(&FocusEvent<'_>) + Send,
{
    fn on_focus_event(&mut self, event: &FocusEvent<'_>) {
        self(event)
    }
}

/// Registered targets plus the external listeners.
#[derive(Default)]
pub(crate) struct FocusTargets {
    handlers: AHashMap<FocusTarget, Option<EventHandler>>,
    listeners: Vec<Box<dyn FocusListener>>,
}

impl FocusTargets {
    pub(crate) fn add_listener(&mut self, listener: Box<dyn FocusListener>) {
        self.listeners.push(listener);
    }

    pub(crate) fn insert(&mut self, target: FocusTarget, handler: Option<EventHandler>) {
        self.handlers.insert(target, handler);
    }

    pub(crate) fn handler(&self, target: FocusTarget) -> Option<&Option<EventHandler>> {
        self.handlers.get(&target)
    }

    pub(crate) fn remove(&mut self, target: FocusTarget) -> bool {
        self.handlers.remove(&target).is_some()
    }

    pub(crate) fn contains(&self, target: FocusTarget) -> bool {
        self.handlers.contains_key(&target)
    }

    pub(crate) fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Registered targets with their handlers, ordered by target.
    pub(crate) fn registered(&self) -> Vec<(FocusTarget, Option<&EventHandler>)> {
        let mut targets: Vec<_> = self
            .handlers
            .iter()
            .map(|(target, handler)| (*target, handler.as_ref()))
            .collect();
        targets.sort_by_key(|(target, _)| *target);
        targets
    }

    pub(crate) fn notify(&mut self, event: &FocusEvent<'_>) {
        for listener in self.listeners.iter_mut() {
            listener.on_focus_event(event);
        }
    }
}
