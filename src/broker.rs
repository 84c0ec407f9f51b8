//! Synchronous publish/subscribe hub.
//!
//! Dispatch happens on the emitting call stack: every matching handler runs
//! in registration order before `emit` returns. The first handler error
//! aborts the remaining deliveries of that emission and is handed back to
//! the emitter. Handlers may emit, subscribe or unsubscribe while a dispatch
//! is running; such changes apply from the next emission on.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::domain::events::NamedEvent;
use crate::Result;

pub type Handler<E> = Rc<dyn Fn(&E) -> Result<()>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Which event names a handler receives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventPattern {
    Name(String),
    Prefix(String),
    Any,
}

impl EventPattern {
    /// `"*"` matches everything, `"basket:*"` matches by prefix, anything
    /// else is an exact name.
    pub fn parse(pattern: &str) -> Self {
        if pattern == "*" {
            Self::Any
        } else if let Some(prefix) = pattern.strip_suffix('*') {
            Self::Prefix(prefix.to_string())
        } else {
            Self::Name(pattern.to_string())
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Name(exact) => exact == name,
            Self::Prefix(prefix) => name.starts_with(prefix.as_str()),
            Self::Any => true,
        }
    }
}

impl From<&str> for EventPattern {
    fn from(pattern: &str) -> Self { Self::parse(pattern) }
}

struct Subscription<E> {
    id: SubscriptionId,
    pattern: EventPattern,
    handler: Handler<E>,
}

pub struct EventBroker<E> {
    subscriptions: RefCell<Vec<Subscription<E>>>,
    next_id: Cell<u64>,
}

impl<E: NamedEvent> EventBroker<E> {
    pub fn new() -> Self {
        Self { subscriptions: RefCell::new(Vec::new()), next_id: Cell::new(1) }
    }

    pub fn on<F>(&self, pattern: impl Into<EventPattern>, handler: F) -> SubscriptionId
    where
        F: Fn(&E) -> Result<()> + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let pattern = pattern.into();
        tracing::debug!(?pattern, subscription = id.0, "handler registered");
        self.subscriptions.borrow_mut().push(Subscription { id, pattern, handler: Rc::new(handler) });
        id
    }

    /// Removes the handler registered under `id` for `pattern`.
    pub fn off(&self, pattern: impl Into<EventPattern>, id: SubscriptionId) -> bool {
        let pattern = pattern.into();
        let mut subscriptions = self.subscriptions.borrow_mut();
        let before = subscriptions.len();
        subscriptions.retain(|s| !(s.id == id && s.pattern == pattern));
        before != subscriptions.len()
    }

    pub fn emit(&self, event: &E) -> Result<()> {
        let name = event.name();
        let handlers: Vec<Handler<E>> = self
            .subscriptions
            .borrow()
            .iter()
            .filter(|s| s.pattern.matches(name))
            .map(|s| Rc::clone(&s.handler))
            .collect();
        tracing::debug!(event = name, handlers = handlers.len(), "emit");
        for handler in handlers {
            handler(event)?;
        }
        Ok(())
    }

    pub fn handler_count(&self) -> usize { self.subscriptions.borrow().len() }
}

impl<E: NamedEvent> Default for EventBroker<E> {
    fn default() -> Self { Self::new() }
}

impl<E> fmt::Debug for EventBroker<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBroker")
            .field("subscriptions", &self.subscriptions.borrow().len())
            .finish()
    }
}
