//! Lifecycle events and the synchronous publish/subscribe bus.
//!
//! # Invariants
//!
//! 1. Delivery is synchronous and in subscription order.
//! 2. A handler may emit further events; they are delivered before the
//!    outer emission continues.
//! 3. Listeners are snapshotted when an emission starts. A listener added
//!    during delivery first hears the next emission; one removed during
//!    delivery is not called again.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The engine is constructed; collaborators are registered.
    Init,
    /// A push (data to document) was requested.
    Write,
    /// A pull (document to data) was requested.
    Read,
    /// One node's value was resolved for `path`.
    PathChanged { path: String, value: Value },
    /// Flush aggregated changes.
    SendChanges,
    /// The data object changed since the last flush.
    Changed(Value),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Init => EventKind::Init,
            Event::Write => EventKind::Write,
            Event::Read => EventKind::Read,
            Event::PathChanged { .. } => EventKind::PathChanged,
            Event::SendChanges => EventKind::SendChanges,
            Event::Changed(_) => EventKind::Changed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Init,
    Write,
    Read,
    PathChanged,
    SendChanges,
    Changed,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::Init,
        EventKind::Write,
        EventKind::Read,
        EventKind::PathChanged,
        EventKind::SendChanges,
        EventKind::Changed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Init => "init",
            EventKind::Write => "write",
            EventKind::Read => "read",
            EventKind::PathChanged => "path-changed",
            EventKind::SendChanges => "send-changes",
            EventKind::Changed => "changed",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// A listener receiving the owning context mutably.
pub type Handler<C> = Rc<dyn Fn(&mut C, &Event) -> Result<(), Error>>;

struct Subscriber<C> {
    id: SubscriptionId,
    kind: EventKind,
    handler: Handler<C>,
}

/// Subscriber registry for one context `C`.
///
/// The bus does not dispatch by itself: the owner snapshots
/// [`EventBus::listeners`] and calls each handler with `&mut C`, checking
/// [`EventBus::is_subscribed`] before every call.
pub struct EventBus<C> {
    subscribers: Vec<Subscriber<C>>,
    next_id: u64,
}

impl<C> Default for EventBus<C> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 0,
        }
    }
}

impl<C> fmt::Debug for EventBus<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<C> EventBus<C> {
    pub fn subscribe(
        &mut self,
        kind: EventKind,
        handler: impl Fn(&mut C, &Event) -> Result<(), Error> + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            kind,
            handler: Rc::new(handler),
        });
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.subscribers.iter().any(|s| s.id == id)
    }

    /// Snapshot of the handlers for `kind`, in subscription order.
    pub fn listeners(&self, kind: EventKind) -> Vec<(SubscriptionId, Handler<C>)> {
        self.subscribers
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| (s.id, Rc::clone(&s.handler)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Ctx {
        bus: EventBus<Ctx>,
        log: Vec<String>,
    }

    fn emit(ctx: &mut Ctx, event: &Event) -> Result<(), Error> {
        for (id, handler) in ctx.bus.listeners(event.kind()) {
            if ctx.bus.is_subscribed(id) {
                handler(ctx, event)?;
            }
        }
        Ok(())
    }

    #[test]
    fn test_event_names() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(EventKind::from_name("nope"), None);
        assert_eq!(EventKind::PathChanged.to_string(), "path-changed");
    }

    #[test]
    fn test_delivery_in_subscription_order() {
        let mut ctx = Ctx::default();
        ctx.bus.subscribe(EventKind::Write, |c, _| {
            c.log.push("first".into());
            Ok(())
        });
        ctx.bus.subscribe(EventKind::Read, |c, _| {
            c.log.push("other".into());
            Ok(())
        });
        ctx.bus.subscribe(EventKind::Write, |c, _| {
            c.log.push("second".into());
            Ok(())
        });
        emit(&mut ctx, &Event::Write).unwrap();
        assert_eq!(ctx.log, vec!["first", "second"]);
    }

    #[test]
    fn test_reentrant_emit_completes_before_outer_continues() {
        let mut ctx = Ctx::default();
        ctx.bus.subscribe(EventKind::PathChanged, |c, _| {
            c.log.push("path-changed".into());
            emit(c, &Event::SendChanges)
        });
        ctx.bus.subscribe(EventKind::SendChanges, |c, _| {
            c.log.push("send-changes".into());
            Ok(())
        });
        ctx.bus.subscribe(EventKind::PathChanged, |c, _| {
            c.log.push("after".into());
            Ok(())
        });
        let event = Event::PathChanged {
            path: "/a".into(),
            value: Value::Null,
        };
        emit(&mut ctx, &event).unwrap();
        assert_eq!(ctx.log, vec!["path-changed", "send-changes", "after"]);
    }

    #[test]
    fn test_unsubscribe_during_delivery() {
        let mut ctx = Ctx::default();
        let second = std::cell::Cell::new(None);
        let second = Rc::new(second);
        let handle = Rc::clone(&second);
        ctx.bus.subscribe(EventKind::Init, move |c, _| {
            if let Some(id) = handle.get() {
                c.bus.unsubscribe(id);
            }
            Ok(())
        });
        let id = ctx.bus.subscribe(EventKind::Init, |c, _| {
            c.log.push("should not run".into());
            Ok(())
        });
        second.set(Some(id));
        emit(&mut ctx, &Event::Init).unwrap();
        assert!(ctx.log.is_empty());
        assert_eq!(ctx.bus.len(), 1);
    }

    #[test]
    fn test_handler_error_stops_delivery() {
        let mut ctx = Ctx::default();
        ctx.bus.subscribe(EventKind::Read, |_, _| {
            Err(Error::Binding(crate::error::BindingError::Missing))
        });
        ctx.bus.subscribe(EventKind::Read, |c, _| {
            c.log.push("unreached".into());
            Ok(())
        });
        assert!(emit(&mut ctx, &Event::Read).is_err());
        assert!(ctx.log.is_empty());
    }
}
