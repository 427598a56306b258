//! Twine Animation
//!
//! Delta-driven tweening: the caller owns the clock and pushes time deltas,
//! the engine turns them into lifecycle events and interpolated values.
//!
//! # Features
//!
//! - **Lifecycle engine**: delay, repetitions, repeat delays and yoyo, with every
//!   boundary crossed by a large (or negative) delta reported exactly once
//! - **Interpolation**: multi-component start/target blending through any easing,
//!   with relative and reversed ("from") targets and waypoint paths
//! - **Pooling**: tweens are recycled through an arena-backed free-list
//! - **Scheduling**: one call advances (or rewinds) a whole collection of tweens
//!
//! # Example
//!
//! ```ignore
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use twine_animation::{Easing, Scheduler};
//!
//! let opacity = Rc::new(Cell::new(0.0f32));
//! let mut scheduler = Scheduler::default();
//!
//! let id = scheduler.to(opacity.clone(), 0.3);
//! if let Some(tween) = scheduler.get_mut(id) {
//!     tween.target(&[1.0]).ease(Easing::CubicOut);
//! }
//! scheduler.add(id)?;
//!
//! // Once per frame
//! scheduler.update(1.0 / 60.0);
//! ```

pub mod accessor;
pub mod animation;
pub mod callback;
pub mod config;
pub mod error;
pub mod pool;
pub mod scheduler;
pub mod state;
pub mod tween;

pub use accessor::{AccessMode, Accessor, FnAccessor, TargetId};
pub use animation::{Animation, AnimationHooks, MAX_REPEAT_COUNT};
pub use callback::{Triggers, TweenCallback, TweenEvent};
pub use config::TwineConfig;
pub use error::{Result, TwineError};
pub use pool::{Pool, Poolable, TweenId, TweenPool};
pub use scheduler::Scheduler;
pub use state::TweenState;
pub use tween::{Interpolator, Tween};

pub use twine_easing::{Easing, EasingFunction, Elastic, Path, PathFunction};
