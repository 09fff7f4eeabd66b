//! Components
//!
//! A component is a unit of behaviour or data attached to exactly one
//! GameObject. The object owns it; the component only knows its owner's
//! [`ObjectId`], which the lifecycle hooks hand it.
//!
//! Lifecycle: constructed detached, `on_enable` when attached (this is where
//! components subscribe to the event bus), `on_disable` when removed or when
//! the owning object is despawned.

use std::any::{type_name, Any, TypeId};

use super::event::EventBus;
use super::object::ObjectId;

/// Downcasting support for boxed components.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Base trait for everything attachable to a GameObject.
pub trait Component: AsAny {
    /// Called once when the component is attached to `object`.
    fn on_enable(&mut self, _object: ObjectId, _events: &mut EventBus) {}

    /// Called once when the component is detached from `object`.
    fn on_disable(&mut self, _object: ObjectId, _events: &mut EventBus) {}
}

struct Entry {
    type_id: TypeId,
    type_name: &'static str,
    component: Box<dyn Component>,
}

/// The components of a single GameObject, keyed by concrete type.
///
/// Holds at most one component per type. Insertion order is kept so that
/// teardown is deterministic.
#[derive(Default)]
pub struct ComponentMap {
    entries: Vec<Entry>,
}

impl ComponentMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn position<C: Component>(&self) -> Option<usize> {
        let wanted = TypeId::of::<C>();
        self.entries.iter().position(|e| e.type_id == wanted)
    }

    pub fn contains<C: Component>(&self) -> bool {
        self.position::<C>().is_some()
    }

    pub fn get<C: Component>(&self) -> Option<&C> {
        let idx = self.position::<C>()?;
        AsAny::as_any(&*self.entries[idx].component).downcast_ref::<C>()
    }

    pub fn get_mut<C: Component>(&mut self) -> Option<&mut C> {
        let idx = self.position::<C>()?;
        AsAny::as_any_mut(&mut *self.entries[idx].component).downcast_mut::<C>()
    }

    /// Insert a component. Returns it back untouched if one of the same type
    /// is already present.
    pub fn insert<C: Component>(&mut self, component: C) -> Result<(), C> {
        if self.contains::<C>() {
            return Err(component);
        }
        self.entries.push(Entry {
            type_id: TypeId::of::<C>(),
            type_name: type_name::<C>(),
            component: Box::new(component),
        });
        Ok(())
    }

    pub fn remove<C: Component>(&mut self) -> Option<C> {
        let idx = self.position::<C>()?;
        let entry = self.entries.remove(idx);
        AsAny::into_any(entry.component).downcast::<C>().ok().map(|boxed| *boxed)
    }

    /// Take every component out, in insertion order.
    pub fn drain(&mut self) -> impl Iterator<Item = Box<dyn Component>> + '_ {
        self.entries.drain(..).map(|e| e.component)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Type names of the attached components, for logging.
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.type_name)
    }
}

impl std::fmt::Debug for ComponentMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.type_names()).finish()
    }
}
