use slotmap::{SlotMap, new_key_type};
use sinew_physics::{CompoundCollider, CompoundShape};

use crate::instance::AnimatedInstance;

new_key_type! {
    /// Handle to an instance owned by an [`AnimationSystem`].
    pub struct InstanceKey;
}

/// The physics world's integration step.
pub trait PhysicsStep {
    fn step_simulation(&mut self, delta_seconds: f32);
}

/// Owns every animated instance of a world and steps them together.
///
/// All instances are advanced, evaluated and synced before the physics world
/// is stepped, so the solver never sees a shape from the previous pose.
/// Stepping physics on another thread would need a barrier between the two;
/// none is provided.
pub struct AnimationSystem<S: CompoundShape = CompoundCollider> {
    instances: SlotMap<InstanceKey, AnimatedInstance<S>>,
}

impl<S: CompoundShape> Default for AnimationSystem<S> {
    fn default() -> Self {
        Self {
            instances: SlotMap::with_key(),
        }
    }
}

impl<S: CompoundShape> AnimationSystem<S> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, instance: AnimatedInstance<S>) -> InstanceKey {
        self.instances.insert(instance)
    }

    pub fn remove(&mut self, key: InstanceKey) -> Option<AnimatedInstance<S>> {
        self.instances.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: InstanceKey) -> Option<&AnimatedInstance<S>> {
        self.instances.get(key)
    }

    pub fn get_mut(&mut self, key: InstanceKey) -> Option<&mut AnimatedInstance<S>> {
        self.instances.get_mut(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (InstanceKey, &AnimatedInstance<S>)> {
        self.instances.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Advances, evaluates and syncs every instance.
    pub fn update(&mut self, delta_seconds: f32) {
        log::trace!(
            "Updating {} animated instances by {delta_seconds}s",
            self.instances.len()
        );
        for (_key, instance) in &mut self.instances {
            instance.tick(delta_seconds);
        }
    }

    /// One full simulation tick: every instance, then the physics world.
    pub fn step(&mut self, delta_seconds: f32, physics: &mut impl PhysicsStep) {
        self.update(delta_seconds);
        physics.step_simulation(delta_seconds);
    }
}
