//! Event Bus
//!
//! Synchronous publish/subscribe keyed by `(emitter type, event type)`.
//! Input and render sources emit without knowing who listens; components
//! subscribe in `on_enable` and react through the [`Context`] they are
//! handed.
//!
//! Example flow:
//! 1. The app polls a mouse motion → emits `(App, MouseMoveEvent)`
//! 2. Every `MouseListener2D` hit-tests its owner → emits
//!    `(MouseListener2D, MouseEnterEvent)` with itself as sender
//! 3. Game handlers read the sender's components and mutate game state
//!
//! Dispatch is immediate: `emit` returns after every handler has run, in
//! subscription order. Nothing is queued.

use std::any::{type_name, Any, TypeId};
use std::collections::{HashMap, HashSet};

use macroquad::prelude::{KeyCode, MouseButton};

use super::context::Context;
use super::object::ObjectId;

/// Identifies one subscriber list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKey {
    emitter: TypeId,
    event: TypeId,
}

impl EventKey {
    pub fn of<S: 'static, E: 'static>() -> Self {
        Self {
            emitter: TypeId::of::<S>(),
            event: TypeId::of::<E>(),
        }
    }
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Returned by handlers to let or stop later handlers of the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

/// The payload view handed to every handler. Handlers may mutate it; the
/// emitter gets it back once dispatch is over.
#[derive(Debug, Clone, PartialEq)]
pub struct EventArgs<E> {
    /// The GameObject that emitted, if the emitter is a component
    pub sender: Option<ObjectId>,
    pub event: E,
}

type Handler = Box<dyn FnMut(&mut Context, &mut dyn Any) -> Propagation>;

struct Subscription {
    id: SubscriptionId,
    handler: Handler,
}

/// Registry of handlers.
#[derive(Default)]
pub struct EventBus {
    subscribers: HashMap<EventKey, Vec<Subscription>>,
    /// Type names per key, for logging
    names: HashMap<EventKey, (&'static str, &'static str)>,
    next_id: u64,
    /// Handler lists currently checked out by `Context::emit`, with the ids
    /// they still hold
    dispatching: HashMap<EventKey, HashSet<SubscriptionId>>,
    /// Unsubscriptions that hit a checked-out list
    pending_removals: HashSet<SubscriptionId>,
    /// Bumped by `unsubscribe_all` so checked-out lists are dropped on return
    epoch: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events of type `E` emitted by `S`.
    pub fn subscribe<S, E, F>(&mut self, mut handler: F) -> SubscriptionId
    where
        S: 'static,
        E: 'static,
        F: FnMut(&mut Context, &mut EventArgs<E>) -> Propagation + 'static,
    {
        let key = EventKey::of::<S, E>();
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        let erased: Handler = Box::new(move |ctx: &mut Context, payload: &mut dyn Any| {
            match payload.downcast_mut::<EventArgs<E>>() {
                Some(args) => handler(ctx, args),
                None => Propagation::Continue,
            }
        });

        self.names.entry(key).or_insert((type_name::<S>(), type_name::<E>()));
        self.subscribers.entry(key).or_default().push(Subscription { id, handler: erased });
        log::trace!("Subscribed {:?} to {}", id, self.describe(key));
        id
    }

    /// Remove a single subscription. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for list in self.subscribers.values_mut() {
            if let Some(pos) = list.iter().position(|s| s.id == id) {
                list.remove(pos);
                return true;
            }
        }
        // The list holding it may be checked out right now
        let checked_out = self.dispatching.values_mut().any(|ids| ids.remove(&id));
        if checked_out {
            self.pending_removals.insert(id);
        }
        checked_out
    }

    /// Clear every registration.
    pub fn unsubscribe_all(&mut self) {
        self.subscribers.clear();
        self.pending_removals.clear();
        for ids in self.dispatching.values_mut() {
            ids.clear();
        }
        self.epoch += 1;
    }

    /// Number of handlers registered for `(S, E)`.
    pub fn subscriber_count<S: 'static, E: 'static>(&self) -> usize {
        self.subscribers.get(&EventKey::of::<S, E>()).map_or(0, Vec::len)
    }

    /// Total number of handlers across all keys.
    pub fn len(&self) -> usize {
        self.subscribers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn describe(&self, key: EventKey) -> String {
        match self.names.get(&key) {
            Some((emitter, event)) => format!("({}, {})", short_name(emitter), short_name(event)),
            None => format!("{:?}", key),
        }
    }

    /// Check out the handler list for `key`. Returns `None` for a key that
    /// has no subscribers or is already being dispatched.
    fn checkout(&mut self, key: EventKey) -> Option<(Vec<Subscription>, u64)> {
        if self.dispatching.contains_key(&key) {
            log::warn!("Re-entrant emission of {} ignored", self.describe(key));
            return None;
        }
        let Some(list) = self.subscribers.remove(&key) else {
            log::trace!("No subscribers for {}", self.describe(key));
            return None;
        };
        self.dispatching.insert(key, list.iter().map(|s| s.id).collect());
        Some((list, self.epoch))
    }

    /// Return a checked-out list, merging subscriptions made while it was out.
    fn restore(&mut self, key: EventKey, mut list: Vec<Subscription>, epoch: u64) {
        self.dispatching.remove(&key);
        if epoch != self.epoch {
            return;
        }
        if !self.pending_removals.is_empty() {
            let removals = &mut self.pending_removals;
            list.retain(|s| !removals.remove(&s.id));
        }
        if let Some(added) = self.subscribers.remove(&key) {
            list.extend(added);
        }
        if !list.is_empty() {
            self.subscribers.insert(key, list);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("keys", &self.subscribers.len())
            .field("handlers", &self.len())
            .finish()
    }
}

fn short_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}

impl Context {
    /// Synchronously invoke every handler subscribed to `(S, E)`.
    ///
    /// Returns the payload after all handlers have seen it.
    pub fn emit<S: 'static, E: 'static>(&mut self, sender: Option<ObjectId>, event: E) -> EventArgs<E> {
        let key = EventKey::of::<S, E>();
        let mut args = EventArgs { sender, event };

        let Some((mut list, epoch)) = self.events.checkout(key) else {
            return args;
        };

        for subscription in list.iter_mut() {
            if (subscription.handler)(self, &mut args) == Propagation::Stop {
                log::trace!("{:?} stopped propagation", subscription.id);
                break;
            }
        }

        self.events.restore(key, list, epoch);
        args
    }
}

// =============================================================================
// Engine events (emitter: App)
// =============================================================================

/// Once per frame, after every camera has rendered
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderEvent {
    pub frame: u64,
    /// Seconds since start
    pub time: f64,
}

/// Once per registered camera per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRenderEvent {
    pub camera: ObjectId,
}

/// Pointer moved, screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseMoveEvent {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseButtonDownEvent {
    pub button: MouseButton,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseButtonUpEvent {
    pub button: MouseButton,
    pub x: f32,
    pub y: f32,
}

/// A key other than Escape was pressed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyDownEvent {
    pub key: KeyCode,
}

// =============================================================================
// Pointer events (emitter: MouseListener2D, sender: the listening object)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEnterEvent {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseLeaveEvent {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseDownEvent {
    pub button: MouseButton,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseUpEvent {
    pub button: MouseButton,
    pub x: f32,
    pub y: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Emitter;
    struct Other;

    #[derive(Debug, Clone, PartialEq)]
    struct Ping(u32);

    fn recorder() -> Rc<RefCell<Vec<&'static str>>> {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn test_handlers_run_once_in_subscription_order() {
        let mut ctx = Context::default();
        let log = recorder();

        let first = log.clone();
        ctx.events.subscribe::<Emitter, Ping, _>(move |_, _| {
            first.borrow_mut().push("first");
            Propagation::Continue
        });
        let second = log.clone();
        ctx.events.subscribe::<Emitter, Ping, _>(move |_, _| {
            second.borrow_mut().push("second");
            Propagation::Continue
        });

        ctx.emit::<Emitter, _>(None, Ping(1));
        assert_eq!(*log.borrow(), vec!["first", "second"]);
        assert_eq!(ctx.events.subscriber_count::<Emitter, Ping>(), 2);
    }

    #[test]
    fn test_keys_are_separate() {
        let mut ctx = Context::default();
        let log = recorder();

        let seen = log.clone();
        ctx.events.subscribe::<Other, Ping, _>(move |_, _| {
            seen.borrow_mut().push("other");
            Propagation::Continue
        });

        ctx.emit::<Emitter, _>(None, Ping(1));
        assert!(log.borrow().is_empty());

        ctx.emit::<Other, _>(None, Ping(1));
        assert_eq!(*log.borrow(), vec!["other"]);
    }

    #[test]
    fn test_emit_without_subscribers_is_noop() {
        let mut ctx = Context::default();
        let args = ctx.emit::<Emitter, _>(None, Ping(5));
        assert_eq!(args.event, Ping(5));
        assert!(args.sender.is_none());
    }

    #[test]
    fn test_handlers_can_mutate_payload() {
        let mut ctx = Context::default();
        ctx.events.subscribe::<Emitter, Ping, _>(|_, args| {
            args.event.0 += 1;
            Propagation::Continue
        });
        ctx.events.subscribe::<Emitter, Ping, _>(|_, args| {
            args.event.0 *= 10;
            Propagation::Continue
        });

        let args = ctx.emit::<Emitter, _>(None, Ping(1));
        assert_eq!(args.event, Ping(20));
    }

    #[test]
    fn test_stop_short_circuits() {
        let mut ctx = Context::default();
        let log = recorder();

        let first = log.clone();
        ctx.events.subscribe::<Emitter, Ping, _>(move |_, _| {
            first.borrow_mut().push("first");
            Propagation::Stop
        });
        let second = log.clone();
        ctx.events.subscribe::<Emitter, Ping, _>(move |_, _| {
            second.borrow_mut().push("second");
            Propagation::Continue
        });

        ctx.emit::<Emitter, _>(None, Ping(1));
        assert_eq!(*log.borrow(), vec!["first"]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut ctx = Context::default();
        let log = recorder();

        let seen = log.clone();
        let id = ctx.events.subscribe::<Emitter, Ping, _>(move |_, _| {
            seen.borrow_mut().push("handler");
            Propagation::Continue
        });

        assert!(ctx.events.unsubscribe(id));
        assert!(!ctx.events.unsubscribe(id));
        ctx.emit::<Emitter, _>(None, Ping(1));
        assert!(log.borrow().is_empty());
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn test_unsubscribe_all() {
        let mut ctx = Context::default();
        ctx.events.subscribe::<Emitter, Ping, _>(|_, _| Propagation::Continue);
        ctx.events.subscribe::<Other, Ping, _>(|_, _| Propagation::Continue);
        assert_eq!(ctx.events.len(), 2);

        ctx.events.unsubscribe_all();
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn test_nested_emission_of_other_key() {
        let mut ctx = Context::default();
        let log = recorder();

        ctx.events.subscribe::<Emitter, Ping, _>(|ctx, args| {
            ctx.emit::<Other, _>(args.sender, Ping(args.event.0));
            Propagation::Continue
        });
        let inner = log.clone();
        ctx.events.subscribe::<Other, Ping, _>(move |_, _| {
            inner.borrow_mut().push("inner");
            Propagation::Continue
        });

        ctx.emit::<Emitter, _>(None, Ping(1));
        assert_eq!(*log.borrow(), vec!["inner"]);
    }

    #[test]
    fn test_reentrant_emission_of_same_key_is_ignored() {
        let mut ctx = Context::default();
        let count = Rc::new(RefCell::new(0));

        let seen = count.clone();
        ctx.events.subscribe::<Emitter, Ping, _>(move |ctx, _| {
            *seen.borrow_mut() += 1;
            ctx.emit::<Emitter, _>(None, Ping(0));
            Propagation::Continue
        });

        ctx.emit::<Emitter, _>(None, Ping(1));
        assert_eq!(*count.borrow(), 1);
        assert_eq!(ctx.events.subscriber_count::<Emitter, Ping>(), 1);
    }

    #[test]
    fn test_subscribe_during_dispatch_applies_next_time() {
        let mut ctx = Context::default();
        let log = recorder();

        let outer = log.clone();
        let mut added = false;
        ctx.events.subscribe::<Emitter, Ping, _>(move |ctx, _| {
            outer.borrow_mut().push("outer");
            if !added {
                added = true;
                let late = outer.clone();
                ctx.events.subscribe::<Emitter, Ping, _>(move |_, _| {
                    late.borrow_mut().push("late");
                    Propagation::Continue
                });
            }
            Propagation::Continue
        });

        ctx.emit::<Emitter, _>(None, Ping(1));
        assert_eq!(*log.borrow(), vec!["outer"]);

        ctx.emit::<Emitter, _>(None, Ping(2));
        assert_eq!(*log.borrow(), vec!["outer", "outer", "late"]);
    }

    #[test]
    fn test_unsubscribe_during_dispatch() {
        let mut ctx = Context::default();
        let log = recorder();

        let victim_log = log.clone();
        let ids = Rc::new(RefCell::new(None));
        let victim_id = ids.clone();
        ctx.events.subscribe::<Emitter, Ping, _>(move |ctx, _| {
            if let Some(id) = victim_id.borrow_mut().take() {
                ctx.events.unsubscribe(id);
            }
            Propagation::Continue
        });
        let victim = ctx.events.subscribe::<Emitter, Ping, _>(move |_, _| {
            victim_log.borrow_mut().push("victim");
            Propagation::Continue
        });
        *ids.borrow_mut() = Some(victim);

        // The list is already checked out, so the victim still runs this time
        ctx.emit::<Emitter, _>(None, Ping(1));
        ctx.emit::<Emitter, _>(None, Ping(2));
        assert_eq!(*log.borrow(), vec!["victim"]);
        assert_eq!(ctx.events.subscriber_count::<Emitter, Ping>(), 1);
    }

    #[test]
    fn test_unsubscribe_unknown_id_during_dispatch() {
        let mut ctx = Context::default();
        let stale = ctx.events.subscribe::<Other, Ping, _>(|_, _| Propagation::Continue);
        assert!(ctx.events.unsubscribe(stale));

        let result = Rc::new(RefCell::new(None));
        let slot = result.clone();
        ctx.events.subscribe::<Emitter, Ping, _>(move |ctx, _| {
            *slot.borrow_mut() = Some(ctx.events.unsubscribe(stale));
            Propagation::Continue
        });

        ctx.emit::<Emitter, _>(None, Ping(1));
        assert_eq!(*result.borrow(), Some(false));
        assert!(ctx.events.pending_removals.is_empty());
        assert!(ctx.events.dispatching.is_empty());
        assert_eq!(ctx.events.subscriber_count::<Emitter, Ping>(), 1);
    }

    #[test]
    fn test_unsubscribe_twice_during_dispatch() {
        let mut ctx = Context::default();
        let victim = Rc::new(RefCell::new(None));
        let results = Rc::new(RefCell::new(Vec::new()));

        let target = victim.clone();
        let seen = results.clone();
        ctx.events.subscribe::<Emitter, Ping, _>(move |ctx, _| {
            if let Some(id) = *target.borrow() {
                seen.borrow_mut().push(ctx.events.unsubscribe(id));
                seen.borrow_mut().push(ctx.events.unsubscribe(id));
            }
            Propagation::Continue
        });
        let id = ctx.events.subscribe::<Emitter, Ping, _>(|_, _| Propagation::Continue);
        *victim.borrow_mut() = Some(id);

        ctx.emit::<Emitter, _>(None, Ping(1));
        assert_eq!(*results.borrow(), vec![true, false]);
        assert!(ctx.events.pending_removals.is_empty());
        assert_eq!(ctx.events.subscriber_count::<Emitter, Ping>(), 1);
    }

    #[test]
    fn test_sender_is_passed_through() {
        let mut ctx = Context::default();
        let id = ctx.scene.spawn("emitter");
        let seen = Rc::new(RefCell::new(None));

        let slot = seen.clone();
        ctx.events.subscribe::<Emitter, Ping, _>(move |_, args| {
            *slot.borrow_mut() = args.sender;
            Propagation::Continue
        });

        ctx.emit::<Emitter, _>(Some(id), Ping(1));
        assert_eq!(*seen.borrow(), Some(id));
    }
}
