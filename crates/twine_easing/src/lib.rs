//! Twine Easing
//!
//! Stateless numeric transforms plugged into the Twine tween engine.
//!
//! # Features
//!
//! - **Easing equations**: Penner's quad/cubic/quart/quint/sine/expo/circ/back/bounce/elastic
//!   families plus CSS-style cubic bezier curves
//! - **Waypoint paths**: linear and Catmull-Rom interpolation through control values
//! - **Pluggable**: anything implementing [`EasingFunction`] or [`PathFunction`] can be used

pub mod easing;
pub mod path;

pub use easing::{Easing, EasingFunction, Elastic};
pub use path::{Path, PathFunction};
