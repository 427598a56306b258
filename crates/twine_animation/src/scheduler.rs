//! Tween scheduler
//!
//! Owns a [`TweenPool`] and an ordered list of managed tweens. Each
//! [`update`](Scheduler::update) first sweeps finished tweens back to the pool,
//! then advances the survivors by the same delta: in insertion order when
//! moving forward, in reverse order when rewinding.

use crate::accessor::{Accessor, TargetId};
use crate::callback::TweenCallback;
use crate::config::TwineConfig;
use crate::error::{Result, TwineError};
use crate::pool::{TweenId, TweenPool};
use crate::tween::Tween;

/// Drives a collection of tweens from a single delta.
pub struct Scheduler {
    pool: TweenPool,
    entries: Vec<TweenId>,
    paused: bool,
}

impl Scheduler {
    pub fn new(config: &TwineConfig) -> Self {
        Self {
            pool: TweenPool::from_config(config),
            entries: Vec::with_capacity(config.scheduler_capacity),
            paused: false,
        }
    }

    pub fn pool(&self) -> &TweenPool {
        &self.pool
    }

    // =========================================================================
    // Factories
    // =========================================================================

    /// Vend a tween configured with [`Tween::to`]. It is not managed until
    /// [`add`](Self::add)ed.
    pub fn to(&mut self, accessor: impl Accessor + 'static, duration: f32) -> TweenId {
        let (id, tween) = self.pool.acquire();
        tween.to(accessor, duration);
        id
    }

    pub fn from(&mut self, accessor: impl Accessor + 'static, duration: f32) -> TweenId {
        let (id, tween) = self.pool.acquire();
        tween.from(accessor, duration);
        id
    }

    pub fn set(&mut self, accessor: impl Accessor + 'static) -> TweenId {
        let (id, tween) = self.pool.acquire();
        tween.set(accessor);
        id
    }

    pub fn call(&mut self, callback: impl TweenCallback + 'static) -> TweenId {
        let (id, tween) = self.pool.acquire();
        tween.call(callback);
        id
    }

    pub fn mark(&mut self) -> TweenId {
        let (id, tween) = self.pool.acquire();
        tween.mark();
        id
    }

    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.pool.item(id)
    }

    pub fn get_mut(&mut self, id: TweenId) -> Option<&mut Tween> {
        self.pool.item_mut(id)
    }

    // =========================================================================
    // Management
    // =========================================================================

    /// Manage a vended tween, starting it if its auto-start policy is enabled.
    /// Adding a managed tween again does not duplicate it.
    pub fn add(&mut self, id: TweenId) -> Result<()> {
        let tween = self
            .pool
            .item_mut(id)
            .ok_or(TwineError::UnknownTween(id))?;
        if !self.entries.contains(&id) {
            self.entries.push(id);
        }
        if tween.state().is_auto_start_enabled() {
            tween.start();
        }
        Ok(())
    }

    /// Stop managing a tween without returning it to the pool.
    pub fn remove(&mut self, id: TweenId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|&entry| entry != id);
        self.entries.len() != before
    }

    /// Stop managing a tween and return it to the pool.
    pub fn free(&mut self, id: TweenId) -> bool {
        self.remove(id);
        self.pool.free(id)
    }

    /// Sweep finished tweens, then advance the others by `delta`.
    ///
    /// A negative delta rewinds. Nothing is advanced while paused.
    pub fn update(&mut self, delta: f32) {
        let pool = &mut self.pool;
        self.entries.retain(|&id| {
            let Some(tween) = pool.item(id) else {
                return false;
            };
            if !(tween.is_finished() && tween.state().is_auto_remove_enabled()) {
                return true;
            }
            tracing::debug!(?id, "finished tween returned to pool");
            pool.free(id);
            false
        });

        if self.paused {
            return;
        }

        if delta >= 0.0 {
            for &id in &self.entries {
                if let Some(tween) = self.pool.item_mut(id) {
                    tween.update(delta);
                }
            }
        } else {
            for &id in self.entries.iter().rev() {
                if let Some(tween) = self.pool.item_mut(id) {
                    tween.update(delta);
                }
            }
        }
    }

    /// Kill every managed tween. They leave on the next update.
    pub fn kill_all(&mut self) {
        for &id in &self.entries {
            if let Some(tween) = self.pool.item_mut(id) {
                tween.kill();
            }
        }
    }

    /// Kill every managed tween bound to `target`.
    pub fn kill_target(&mut self, target: TargetId) {
        for &id in &self.entries {
            if let Some(tween) = self.pool.item_mut(id) {
                if tween.contains_target(target) {
                    tween.kill();
                }
            }
        }
    }

    /// Whether a managed, unfinished tween is bound to `target`.
    pub fn contains_target(&self, target: TargetId) -> bool {
        self.tweens()
            .any(|tween| !tween.is_finished() && tween.contains_target(target))
    }

    pub fn set_auto_remove(&mut self, id: TweenId, enabled: bool) -> Result<()> {
        self.get_mut(id)
            .ok_or(TwineError::UnknownTween(id))?
            .set_auto_remove(enabled);
        Ok(())
    }

    pub fn set_auto_start(&mut self, id: TweenId, enabled: bool) -> Result<()> {
        self.get_mut(id)
            .ok_or(TwineError::UnknownTween(id))?
            .set_auto_start(enabled);
        Ok(())
    }

    /// Further updates only sweep finished tweens.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn ensure_capacity(&mut self, capacity: usize) {
        self.entries
            .reserve(capacity.saturating_sub(self.entries.len()));
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Number of managed entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Managed ids, in insertion order
    pub fn ids(&self) -> &[TweenId] {
        &self.entries
    }

    /// Leaf tweens represented by the managed entries
    pub fn running_tweens_count(&self) -> usize {
        self.tweens().map(Tween::tween_count).sum()
    }

    /// Composite sequences represented by the managed entries
    pub fn running_timelines_count(&self) -> usize {
        self.tweens().map(Tween::timeline_count).sum()
    }

    fn tweens(&self) -> impl Iterator<Item = &Tween> {
        self.entries.iter().filter_map(|&id| self.pool.item(id))
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(&TwineConfig::default())
    }
}
