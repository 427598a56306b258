//! Object pool
//!
//! Instances live in a slotmap arena for their whole life; returning one to
//! the pool only flags it and pushes its id on the free-list. A recycled
//! instance therefore comes back under the same [`TweenId`] it had before.

use slotmap::{new_key_type, SlotMap};

use crate::animation::{Animation, AnimationHooks};
use crate::config::TwineConfig;
use crate::tween::Tween;

new_key_type! {
    /// Handle to a pooled instance
    pub struct TweenId;
}

/// Total reset applied on vend and on return.
pub trait Poolable {
    fn reset(&mut self);
}

impl<H: AnimationHooks> Poolable for Animation<H> {
    fn reset(&mut self) {
        Animation::reset(self);
    }
}

struct Slot<T> {
    value: T,
    pooled: bool,
}

/// Unbounded arena + free-list of reusable instances.
pub struct Pool<T> {
    items: SlotMap<TweenId, Slot<T>>,
    free: Vec<TweenId>,
    factory: Box<dyn Fn() -> T>,
}

impl<T: Poolable> Pool<T> {
    pub fn new(capacity: usize, factory: impl Fn() -> T + 'static) -> Self {
        Self {
            items: SlotMap::with_capacity_and_key(capacity),
            free: Vec::with_capacity(capacity),
            factory: Box::new(factory),
        }
    }

    /// Vend a pristine instance, recycled when one is available.
    pub fn get(&mut self) -> TweenId {
        self.acquire().0
    }

    pub(crate) fn acquire(&mut self) -> (TweenId, &mut T) {
        let id = match self.free.pop() {
            Some(id) => id,
            None => {
                let id = self.items.insert(Slot {
                    value: (self.factory)(),
                    pooled: false,
                });
                tracing::debug!(?id, "pool constructed a new instance");
                id
            }
        };
        let slot = &mut self.items[id];
        slot.pooled = false;
        slot.value.reset();
        (id, &mut slot.value)
    }

    /// Return an instance to the pool. Returns false if `id` is unknown or
    /// already pooled.
    pub fn free(&mut self, id: TweenId) -> bool {
        match self.items.get_mut(id) {
            Some(slot) if !slot.pooled => {
                slot.value.reset();
                slot.pooled = true;
                self.free.push(id);
                true
            }
            _ => false,
        }
    }

    /// A vended instance; pooled ones are not reachable.
    pub fn item(&self, id: TweenId) -> Option<&T> {
        self.items
            .get(id)
            .filter(|slot| !slot.pooled)
            .map(|slot| &slot.value)
    }

    pub fn item_mut(&mut self, id: TweenId) -> Option<&mut T> {
        self.items
            .get_mut(id)
            .filter(|slot| !slot.pooled)
            .map(|slot| &mut slot.value)
    }

    pub fn is_pooled(&self, id: TweenId) -> bool {
        self.items.get(id).is_some_and(|slot| slot.pooled)
    }

    /// Number of instances waiting in the free-list.
    pub fn size(&self) -> usize {
        self.free.len()
    }

    /// Number of instances currently vended.
    pub fn vended(&self) -> usize {
        self.items.len() - self.free.len()
    }

    /// Drop every pooled instance. Vended ones are untouched.
    pub fn clear(&mut self) {
        for id in self.free.drain(..) {
            self.items.remove(id);
        }
    }

    /// Reserve room for `capacity` pooled instances.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        self.free.reserve(capacity.saturating_sub(self.free.len()));
        self.items.reserve(capacity.saturating_sub(self.items.len()));
    }
}

/// Pool of interpolating tweens sharing one configuration.
pub type TweenPool = Pool<Tween>;

impl Pool<Tween> {
    pub fn from_config(config: &TwineConfig) -> Self {
        let config = config.clone();
        Pool::new(config.pool_capacity, move || Tween::from_config(&config))
    }
}
