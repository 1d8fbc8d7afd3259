//! Deferred structural changes.
//!
//! Scripts run while the scene walks its entities, so they never spawn or
//! despawn directly. [`SpawnQueue`] and [`DestroyQueue`] collect the requests
//! and the scene applies them at the end of the frame.

use bevy_ecs::prelude::*;

type SpawnFn = Box<dyn FnOnce(&mut World) -> Entity + Send + Sync>;

/// Pending entity creations, applied in request order.
#[derive(Resource, Default)]
pub struct SpawnQueue {
    pending: Vec<SpawnFn>,
}

impl SpawnQueue {
    /// Queue a bundle to be spawned at the end of the frame.
    pub fn enqueue<B: Bundle + Send + Sync + 'static>(&mut self, bundle: B) {
        self.pending.push(Box::new(move |world| world.spawn(bundle).id()));
    }

    /// Queue an arbitrary world mutation that produces the new entity.
    pub fn enqueue_with(
        &mut self,
        spawn: impl FnOnce(&mut World) -> Entity + Send + Sync + 'static,
    ) {
        self.pending.push(Box::new(spawn));
    }

    /// Apply all pending spawns and return the new entities.
    pub fn flush(&mut self, world: &mut World) -> Vec<Entity> {
        let requests: Vec<SpawnFn> = self.pending.drain(..).collect();
        requests.into_iter().map(|f| f(world)).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Entities to destroy at the end of the frame.
///
/// Duplicates are dropped on insert; entities that are already gone when the
/// queue is drained are the consumer's to skip.
#[derive(Resource, Default, Debug)]
pub struct DestroyQueue {
    pending: Vec<Entity>,
}

impl DestroyQueue {
    pub fn enqueue(&mut self, entity: Entity) {
        if !self.pending.contains(&entity) {
            self.pending.push(entity);
        }
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.pending.contains(&entity)
    }

    /// Take every queued entity, in request order.
    pub fn take(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Flush the world's [`SpawnQueue`], if it has one.
pub fn flush_spawn_queue(world: &mut World) -> Vec<Entity> {
    if !world.contains_resource::<SpawnQueue>() {
        return Vec::new();
    }
    let spawned = world.resource_scope(|world, mut queue: Mut<SpawnQueue>| queue.flush(world));
    if !spawned.is_empty() {
        tracing::trace!("Spawned {} deferred entities", spawned.len());
    }
    spawned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Tag, TransformComponent};

    #[test]
    fn test_deferred_spawn_applies_on_flush() {
        let mut world = World::new();
        world.insert_resource(SpawnQueue::default());

        world
            .resource_mut::<SpawnQueue>()
            .enqueue((Tag::new("Food"), TransformComponent::default()));
        assert_eq!(world.query::<&Tag>().iter(&world).count(), 0);

        let spawned = flush_spawn_queue(&mut world);
        assert_eq!(spawned.len(), 1);
        assert_eq!(world.get::<Tag>(spawned[0]).map(Tag::as_str), Some("Food"));
        assert!(world.resource::<SpawnQueue>().is_empty());
    }

    #[test]
    fn test_enqueue_with_closure() {
        let mut world = World::new();
        world.insert_resource(SpawnQueue::default());
        world.resource_mut::<SpawnQueue>().enqueue_with(|world| {
            let e = world.spawn(Tag::new("Unit")).id();
            world.entity_mut(e).insert(TransformComponent::default());
            e
        });
        let spawned = flush_spawn_queue(&mut world);
        assert!(world.get::<TransformComponent>(spawned[0]).is_some());
    }

    #[test]
    fn test_flush_without_queue_is_noop() {
        let mut world = World::new();
        assert!(flush_spawn_queue(&mut world).is_empty());
    }

    #[test]
    fn test_destroy_queue_dedupes() {
        let mut world = World::new();
        let e = world.spawn_empty().id();
        let mut queue = DestroyQueue::default();
        queue.enqueue(e);
        queue.enqueue(e);
        assert_eq!(queue.len(), 1);
        assert!(queue.contains(e));
        assert_eq!(queue.take(), vec![e]);
        assert!(queue.is_empty());
    }
}
