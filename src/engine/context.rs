//! Application context
//!
//! Everything a handler may need in one place: the scene, the event bus, the
//! resource tables and the camera list. Built once at start-up and passed by
//! `&mut` to every handler instead of living in a global.

use std::any::type_name;

use super::component::Component;
use super::components::Camera;
use super::event::EventBus;
use super::object::ObjectId;
use super::resources::Resources;
use super::scene::Scene;
use super::types::{Size, Vector};
use crate::error::SceneError;

/// Default pixels per world unit.
pub const DEFAULT_PIXEL_PER_UNIT: f32 = 100.0;

pub struct Context {
    pub scene: Scene,
    pub events: EventBus,
    pub resources: Resources,
    /// Render viewpoints, in registration order
    pub cameras: Vec<ObjectId>,
    pub pixel_per_unit: f32,
    /// Screen size in pixels
    pub screen: Size,
}

impl Context {
    pub fn new(pixel_per_unit: f32, screen: Size) -> Self {
        Self {
            scene: Scene::new(),
            events: EventBus::new(),
            resources: Resources::new(),
            cameras: Vec::new(),
            pixel_per_unit,
            screen,
        }
    }

    /// Convert world units to pixels.
    pub fn units(&self, value: f32) -> f32 {
        value * self.pixel_per_unit
    }

    /// Spawn a root object.
    pub fn spawn(&mut self, name: impl Into<String>) -> ObjectId {
        self.scene.spawn(name)
    }

    /// Spawn a root object at a position.
    pub fn spawn_at(&mut self, name: impl Into<String>, position: Vector) -> ObjectId {
        let id = self.scene.spawn(name);
        self.scene.set_position(id, position);
        id
    }

    /// Spawn a child object at a position relative to `parent`.
    pub fn spawn_child_at(
        &mut self,
        parent: ObjectId,
        name: impl Into<String>,
        position: Vector,
    ) -> Result<ObjectId, SceneError> {
        let id = self.scene.spawn_child(parent, name)?;
        self.scene.set_position(id, position);
        Ok(id)
    }

    /// Attach `component` to `object` and enable it.
    ///
    /// Fails if the object is gone or already holds a component of the same
    /// concrete type; the existing component is left untouched.
    pub fn add_component<C: Component>(&mut self, object: ObjectId, mut component: C) -> Result<(), SceneError> {
        let Some(target) = self.scene.get(object) else {
            return Err(SceneError::UnknownObject(object));
        };
        if target.has_component::<C>() {
            return Err(SceneError::DuplicateComponent {
                object: target.name.clone(),
                component: type_name::<C>(),
            });
        }

        component.on_enable(object, &mut self.events);

        // on_enable only sees the bus, so the object is still there
        let target = self.scene.get_mut(object).ok_or(SceneError::UnknownObject(object))?;
        target.components.insert(component).map_err(|_| SceneError::DuplicateComponent {
            object: target.name.clone(),
            component: type_name::<C>(),
        })?;
        log::trace!("Attached {} to '{}'", type_name::<C>(), target.name);
        Ok(())
    }

    /// Disable and detach the `C` component of `object`.
    pub fn remove_component<C: Component>(&mut self, object: ObjectId) -> Option<C> {
        let mut component = self.scene.get_mut(object)?.components.remove::<C>()?;
        component.on_disable(object, &mut self.events);
        log::trace!("Detached {} from {}", type_name::<C>(), object);
        Some(component)
    }

    /// Remove `object` and its subtree, disabling every component.
    ///
    /// Children are disabled before their parents; each object's components
    /// in the order they were attached. Returns the number of objects removed.
    pub fn despawn(&mut self, object: ObjectId) -> usize {
        let removed = self.scene.remove(object);
        let count = removed.len();
        for (id, mut game_object) in removed {
            for mut component in game_object.components.drain() {
                component.on_disable(id, &mut self.events);
            }
            self.cameras.retain(|&c| c != id);
            log::trace!("Despawned '{}' ({})", game_object.name, id);
        }
        count
    }

    /// Spawn an object carrying a [`Camera`] and register it for rendering.
    pub fn create_camera(&mut self, name: impl Into<String>) -> Result<ObjectId, SceneError> {
        let id = self.scene.spawn(name);
        self.add_component(id, Camera::default())?;
        self.cameras.push(id);
        Ok(id)
    }

    /// The first registered camera, used to map the pointer into the world.
    pub fn primary_camera(&self) -> Option<&Camera> {
        self.cameras.iter().find_map(|&id| self.scene.component::<Camera>(id))
    }

    /// Map a screen position (pixels) to world units through the primary camera.
    pub fn screen_to_world(&self, screen: Vector) -> Vector {
        match self.primary_camera() {
            Some(camera) => camera.screen_to_world(screen, self.pixel_per_unit),
            None => Vector::new(screen.x / self.pixel_per_unit, screen.y / self.pixel_per_unit),
        }
    }

    /// Tear down everything the context owns, in reverse acquisition order.
    pub fn clear(&mut self) {
        log::debug!("Unloading resources");
        self.resources.clear();

        log::debug!("Unregistering event handlers");
        self.events.unsubscribe_all();

        log::debug!("Releasing scene");
        self.cameras.clear();
        self.scene = Scene::new();
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(DEFAULT_PIXEL_PER_UNIT, Size::new(800.0, 600.0))
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("objects", &self.scene.len())
            .field("events", &self.events)
            .field("cameras", &self.cameras)
            .field("pixel_per_unit", &self.pixel_per_unit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::event::Propagation;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Probe;

    /// Records its lifecycle into a shared log and keeps one subscription.
    struct Tracked {
        label: &'static str,
        log: Rc<RefCell<Vec<String>>>,
        subscription: Option<crate::engine::event::SubscriptionId>,
    }

    impl Tracked {
        fn new(label: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Self {
            Self { label, log: log.clone(), subscription: None }
        }
    }

    impl Component for Tracked {
        fn on_enable(&mut self, _object: ObjectId, events: &mut EventBus) {
            self.log.borrow_mut().push(format!("enable {}", self.label));
            self.subscription = Some(events.subscribe::<Probe, u32, _>(|_, _| Propagation::Continue));
        }

        fn on_disable(&mut self, _object: ObjectId, events: &mut EventBus) {
            self.log.borrow_mut().push(format!("disable {}", self.label));
            if let Some(id) = self.subscription.take() {
                events.unsubscribe(id);
            }
        }
    }

    struct Other;
    impl Component for Other {}

    #[test]
    fn test_add_component_enables() {
        let mut ctx = Context::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        let id = ctx.spawn("object");

        ctx.add_component(id, Tracked::new("a", &log)).unwrap();
        assert_eq!(*log.borrow(), vec!["enable a"]);
        assert!(ctx.scene.component::<Tracked>(id).is_some());
        assert_eq!(ctx.events.subscriber_count::<Probe, u32>(), 1);
    }

    #[test]
    fn test_duplicate_component_rejected() {
        let mut ctx = Context::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        let id = ctx.spawn("object");

        ctx.add_component(id, Tracked::new("first", &log)).unwrap();
        let err = ctx.add_component(id, Tracked::new("second", &log)).unwrap_err();

        assert!(matches!(err, SceneError::DuplicateComponent { .. }));
        // The rejected component was never enabled
        assert_eq!(*log.borrow(), vec!["enable first"]);
        assert_eq!(ctx.scene.component::<Tracked>(id).unwrap().label, "first");
    }

    #[test]
    fn test_add_component_to_dead_object() {
        let mut ctx = Context::default();
        let id = ctx.spawn("object");
        ctx.despawn(id);

        assert_eq!(ctx.add_component(id, Other), Err(SceneError::UnknownObject(id)));
    }

    #[test]
    fn test_remove_component_disables() {
        let mut ctx = Context::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        let id = ctx.spawn("object");
        ctx.add_component(id, Tracked::new("a", &log)).unwrap();

        let removed = ctx.remove_component::<Tracked>(id);
        assert!(removed.is_some());
        assert_eq!(*log.borrow(), vec!["enable a", "disable a"]);
        assert!(ctx.scene.component::<Tracked>(id).is_none());
        assert!(ctx.events.is_empty());

        assert!(ctx.remove_component::<Tracked>(id).is_none());
    }

    #[test]
    fn test_despawn_disables_subtree() {
        let mut ctx = Context::default();
        let log = Rc::new(RefCell::new(Vec::new()));

        let parent = ctx.spawn("parent");
        let child = ctx.spawn_child_at(parent, "child", Vector::ZERO).unwrap();
        ctx.add_component(parent, Tracked::new("parent", &log)).unwrap();
        ctx.add_component(child, Tracked::new("child", &log)).unwrap();
        ctx.add_component(child, Other).unwrap();

        assert_eq!(ctx.despawn(parent), 2);
        assert_eq!(
            *log.borrow(),
            vec!["enable parent", "enable child", "disable child", "disable parent"]
        );
        assert!(ctx.scene.is_empty());
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn test_create_camera_registers_it() {
        let mut ctx = Context::default();
        let first = ctx.create_camera("main").unwrap();
        let second = ctx.create_camera("minimap").unwrap();

        assert_eq!(ctx.cameras, vec![first, second]);
        assert!(ctx.scene.component::<Camera>(first).is_some());

        ctx.despawn(first);
        assert_eq!(ctx.cameras, vec![second]);
    }

    #[test]
    fn test_units() {
        let ctx = Context::new(64.0, Size::new(640.0, 480.0));
        assert!((ctx.units(1.5) - 96.0).abs() < 0.001);
    }

    #[test]
    fn test_clear() {
        let mut ctx = Context::default();
        ctx.create_camera("main").unwrap();
        ctx.events.subscribe::<Probe, u32, _>(|_, _| Propagation::Continue);

        ctx.clear();
        assert!(ctx.scene.is_empty());
        assert!(ctx.cameras.is_empty());
        assert!(ctx.events.is_empty());
    }
}
