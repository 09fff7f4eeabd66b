//! Scene
//!
//! The Scene owns every GameObject:
//! - Object allocation and lifetime tracking (generational ids)
//! - The parent/children tree
//! - Lookup by name and by component type
//!
//! Components are attached through [`Context`](super::Context) so their
//! lifecycle hooks can reach the event bus; the scene itself only stores them.

use super::component::{Component, ComponentMap};
use super::object::{ObjectAllocator, ObjectId};
use super::types::Vector;
use crate::error::SceneError;

/// A named node owning a set of components.
#[derive(Debug)]
pub struct GameObject {
    id: ObjectId,
    pub name: String,
    /// Position relative to the parent (or the world for roots), in units
    pub position: Vector,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
    pub(crate) components: ComponentMap,
}

impl GameObject {
    fn new(id: ObjectId, name: String) -> Self {
        Self {
            id,
            name,
            position: Vector::ZERO,
            parent: None,
            children: Vec::new(),
            components: ComponentMap::new(),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    pub fn component<C: Component>(&self) -> Option<&C> {
        self.components.get::<C>()
    }

    pub fn component_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.components.get_mut::<C>()
    }

    pub fn has_component<C: Component>(&self) -> bool {
        self.components.contains::<C>()
    }
}

/// Container for all GameObjects.
#[derive(Debug, Default)]
pub struct Scene {
    allocator: ObjectAllocator,
    /// Sparse array indexed by id.index()
    objects: Vec<Option<GameObject>>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Object Management
    // =========================================================================

    /// Spawn a root object.
    pub fn spawn(&mut self, name: impl Into<String>) -> ObjectId {
        let id = self.allocator.allocate();
        let idx = id.index() as usize;
        if idx >= self.objects.len() {
            self.objects.resize_with(idx + 1, || None);
        }
        self.objects[idx] = Some(GameObject::new(id, name.into()));
        log::trace!("Spawned object {}", id);
        id
    }

    /// Spawn an object under `parent`.
    pub fn spawn_child(&mut self, parent: ObjectId, name: impl Into<String>) -> Result<ObjectId, SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::UnknownObject(parent));
        }
        let child = self.spawn(name);
        self.set_parent(child, Some(parent))?;
        Ok(child)
    }

    /// Remove `id` and its whole subtree from the scene, children first.
    /// Lifecycle hooks are the caller's business.
    pub(crate) fn remove(&mut self, id: ObjectId) -> Vec<(ObjectId, GameObject)> {
        let mut removed = Vec::new();
        if !self.contains(id) {
            return removed;
        }
        self.detach(id);
        self.remove_subtree(id, &mut removed);
        removed
    }

    fn remove_subtree(&mut self, id: ObjectId, out: &mut Vec<(ObjectId, GameObject)>) {
        let children = self.get(id).map(|o| o.children.clone()).unwrap_or_default();
        for child in children {
            self.remove_subtree(child, out);
        }
        if self.allocator.free(id) {
            if let Some(object) = self.objects[id.index() as usize].take() {
                out.push((id, object));
            }
        }
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.allocator.is_alive(id)
    }

    pub fn len(&self) -> usize {
        self.allocator.alive_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: ObjectId) -> Option<&GameObject> {
        if !self.contains(id) {
            return None;
        }
        self.objects.get(id.index() as usize).and_then(|slot| slot.as_ref())
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        if !self.contains(id) {
            return None;
        }
        self.objects.get_mut(id.index() as usize).and_then(|slot| slot.as_mut())
    }

    /// Iterate over every live object.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &GameObject)> {
        self.objects
            .iter()
            .filter_map(|slot| slot.as_ref().map(|object| (object.id, object)))
    }

    // =========================================================================
    // Components
    // =========================================================================

    pub fn component<C: Component>(&self, id: ObjectId) -> Option<&C> {
        self.get(id)?.component::<C>()
    }

    pub fn component_mut<C: Component>(&mut self, id: ObjectId) -> Option<&mut C> {
        self.get_mut(id)?.component_mut::<C>()
    }

    /// Every object holding a component of type `C`, in slot order.
    pub fn objects_with<C: Component>(&self) -> Vec<ObjectId> {
        self.iter()
            .filter(|(_, object)| object.has_component::<C>())
            .map(|(id, _)| id)
            .collect()
    }

    /// First object with the given name, in slot order.
    pub fn find_by_name(&self, name: &str) -> Option<ObjectId> {
        self.iter().find(|(_, object)| object.name == name).map(|(id, _)| id)
    }

    // =========================================================================
    // Hierarchy
    // =========================================================================

    /// Reparent `child`, or make it a root with `None`. Rejects cycles.
    pub fn set_parent(&mut self, child: ObjectId, parent: Option<ObjectId>) -> Result<(), SceneError> {
        if !self.contains(child) {
            return Err(SceneError::UnknownObject(child));
        }
        if let Some(parent) = parent {
            if !self.contains(parent) {
                return Err(SceneError::UnknownObject(parent));
            }
            if parent == child || self.is_ancestor(child, parent) {
                return Err(SceneError::HierarchyCycle { child, parent });
            }
        }

        self.detach(child);
        if let Some(parent) = parent {
            if let Some(p) = self.get_mut(parent) {
                p.children.push(child);
            }
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = parent;
        }
        Ok(())
    }

    /// Remove `child` from its parent's children list.
    fn detach(&mut self, child: ObjectId) {
        let old_parent = self.get(child).and_then(|c| c.parent);
        if let Some(old_parent) = old_parent {
            if let Some(p) = self.get_mut(old_parent) {
                p.children.retain(|&c| c != child);
            }
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = None;
        }
    }

    /// True if `ancestor` is somewhere above `id`.
    pub fn is_ancestor(&self, ancestor: ObjectId, id: ObjectId) -> bool {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    pub fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.get(id)?.parent
    }

    pub fn children(&self, id: ObjectId) -> &[ObjectId] {
        self.get(id).map(|o| o.children.as_slice()).unwrap_or(&[])
    }

    /// Position in world units: the sum of local positions up to the root.
    pub fn world_position(&self, id: ObjectId) -> Option<Vector> {
        let mut object = self.get(id)?;
        let mut position = object.position;
        while let Some(parent) = object.parent.and_then(|p| self.get(p)) {
            position = position + parent.position;
            object = parent;
        }
        Some(position)
    }

    pub fn set_position(&mut self, id: ObjectId, position: Vector) -> bool {
        match self.get_mut(id) {
            Some(object) => {
                object.position = position;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker;
    impl Component for Marker {}

    #[test]
    fn test_spawn_and_remove() {
        let mut scene = Scene::new();

        let a = scene.spawn("a");
        let b = scene.spawn("b");
        assert_eq!(scene.len(), 2);

        let removed = scene.remove(a);
        assert_eq!(removed.len(), 1);
        assert_eq!(scene.len(), 1);
        assert!(!scene.contains(a));
        assert!(scene.contains(b));
        assert!(scene.get(a).is_none());
    }

    #[test]
    fn test_stale_id_does_not_resolve() {
        let mut scene = Scene::new();
        let old = scene.spawn("old");
        scene.remove(old);

        let new = scene.spawn("new");
        assert_eq!(new.index(), old.index());
        assert!(scene.get(old).is_none());
        assert_eq!(scene.get(new).unwrap().name, "new");
    }

    #[test]
    fn test_hierarchy_remove() {
        let mut scene = Scene::new();

        let root = scene.spawn("root");
        let child = scene.spawn_child(root, "child").unwrap();
        let grandchild = scene.spawn_child(child, "grandchild").unwrap();
        let other = scene.spawn("other");

        assert_eq!(scene.children(root), &[child]);
        assert_eq!(scene.parent(grandchild), Some(child));

        // Children go first
        let removed: Vec<_> = scene.remove(root).into_iter().map(|(id, _)| id).collect();
        assert_eq!(removed, vec![grandchild, child, root]);
        assert_eq!(scene.len(), 1);
        assert!(scene.contains(other));
    }

    #[test]
    fn test_removing_child_detaches_from_parent() {
        let mut scene = Scene::new();
        let root = scene.spawn("root");
        let child = scene.spawn_child(root, "child").unwrap();

        scene.remove(child);
        assert!(scene.children(root).is_empty());
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        let mut scene = Scene::new();
        let a = scene.spawn("a");
        let b = scene.spawn_child(a, "b").unwrap();

        assert!(matches!(
            scene.set_parent(a, Some(b)),
            Err(SceneError::HierarchyCycle { .. })
        ));
        assert!(matches!(
            scene.set_parent(a, Some(a)),
            Err(SceneError::HierarchyCycle { .. })
        ));

        // Reparenting to root works
        scene.set_parent(b, None).unwrap();
        assert!(scene.parent(b).is_none());
        assert!(scene.children(a).is_empty());
    }

    #[test]
    fn test_world_position() {
        let mut scene = Scene::new();
        let root = scene.spawn("root");
        let child = scene.spawn_child(root, "child").unwrap();

        scene.set_position(root, Vector::new(2.0, 1.0));
        scene.set_position(child, Vector::new(0.5, 0.5));

        assert_eq!(scene.world_position(child), Some(Vector::new(2.5, 1.5)));
        assert_eq!(scene.world_position(root), Some(Vector::new(2.0, 1.0)));
    }

    #[test]
    fn test_lookup_by_name_and_type() {
        let mut scene = Scene::new();
        let a = scene.spawn("tile");
        let b = scene.spawn("tile");
        let c = scene.spawn("board");

        scene.get_mut(b).unwrap().components.insert(Marker).ok();
        scene.get_mut(c).unwrap().components.insert(Marker).ok();

        assert_eq!(scene.find_by_name("tile"), Some(a));
        assert_eq!(scene.find_by_name("missing"), None);
        assert_eq!(scene.objects_with::<Marker>(), vec![b, c]);
        assert!(scene.component::<Marker>(a).is_none());
    }
}
