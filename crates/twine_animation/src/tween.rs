//! Value interpolation
//!
//! A [`Tween`] is an [`Animation`] whose hooks are an [`Interpolator`]: it
//! captures start values from an [`Accessor`] once the delay has elapsed, then
//! writes eased values between the start and target buffers (optionally
//! through waypoints) at every sub-step the lifecycle engine produces.
//!
//! ```ignore
//! let mut tween = Tween::from_config(&TwineConfig::default());
//! tween
//!     .to(position.clone(), 1.0)
//!     .target(&[100.0, 200.0])
//!     .ease(Easing::CubicOut)
//!     .repeat_yoyo(2, 0.5)
//!     .start();
//! ```

use smallvec::SmallVec;
use twine_easing::{Easing, EasingFunction, Path, PathFunction};

use crate::accessor::{Accessor, TargetId};
use crate::animation::{Animation, AnimationHooks};
use crate::callback::{Triggers, TweenCallback};
use crate::config::TwineConfig;
use crate::state::TweenState;

/// Durations below this are treated as instantaneous.
const DURATION_EPSILON: f32 = 1e-11;

/// An interpolating animation.
pub type Tween = Animation<Interpolator>;

type Values = SmallVec<[f32; 4]>;

/// Start/target/waypoint buffers and the functions blending them.
pub struct Interpolator {
    accessor: Option<Box<dyn Accessor>>,
    easing: Option<Box<dyn EasingFunction>>,
    path: Option<Box<dyn PathFunction>>,
    is_from: bool,
    is_relative: bool,
    combined_attributes_count: usize,
    waypoint_count: usize,

    start_values: Values,
    target_values: Values,
    /// Row-major, one row of `attributes_limit` components per waypoint
    waypoints: SmallVec<[f32; 8]>,
    accessor_buffer: Values,
    path_buffer: SmallVec<[f32; 8]>,

    attributes_limit: usize,
    waypoints_limit: usize,
    default_easing: Easing,
    default_path: Path,
}

impl Interpolator {
    /// Allocate buffers sized by the configuration limits.
    pub fn new(config: &TwineConfig) -> Self {
        let attributes = config.combined_attributes_limit;
        let waypoints = config.waypoints_limit;
        Self {
            accessor: None,
            easing: None,
            path: None,
            is_from: false,
            is_relative: false,
            combined_attributes_count: 0,
            waypoint_count: 0,
            start_values: SmallVec::from_elem(0.0, attributes),
            target_values: SmallVec::from_elem(0.0, attributes),
            waypoints: SmallVec::from_elem(0.0, waypoints * attributes),
            accessor_buffer: SmallVec::from_elem(0.0, attributes),
            path_buffer: SmallVec::from_elem(0.0, waypoints + 2),
            attributes_limit: attributes,
            waypoints_limit: waypoints,
            default_easing: config.default_easing,
            default_path: config.default_path,
        }
    }

    fn write(&mut self, values: Buffer) {
        let count = self.combined_attributes_count;
        let Some(accessor) = self.accessor.as_mut() else {
            return;
        };
        let values = match values {
            Buffer::Start => &self.start_values,
            Buffer::Target => &self.target_values,
        };
        accessor.write(&values[..count]);
    }

    /// Clamp a caller-supplied component count to the attribute limit.
    fn fit(&self, given: usize, what: &str) -> usize {
        let limit = self.attributes_limit;
        if given > limit {
            tracing::warn!(given, limit, "{what} truncated to the combined attribute limit");
        }
        given.min(limit)
    }
}

#[derive(Clone, Copy)]
enum Buffer {
    Start,
    Target,
}

impl Buffer {
    /// `Start` when not reversed, `Target` when reversed.
    fn start_unless(reversed: bool) -> Self {
        if reversed {
            Buffer::Target
        } else {
            Buffer::Start
        }
    }

    fn target_unless(reversed: bool) -> Self {
        if reversed {
            Buffer::Start
        } else {
            Buffer::Target
        }
    }
}

impl AnimationHooks for Interpolator {
    fn reset(&mut self) {
        self.accessor = None;
        self.easing = None;
        self.path = None;
        self.is_from = false;
        self.is_relative = false;
        self.combined_attributes_count = 0;
        self.waypoint_count = 0;
        self.start_values.fill(0.0);
        self.target_values.fill(0.0);
        self.waypoints.fill(0.0);
    }

    fn build(&mut self) {
        let Some(accessor) = self.accessor.as_mut() else {
            return;
        };
        let read = accessor.read(&mut self.accessor_buffer);
        if read > self.attributes_limit {
            tracing::warn!(
                read,
                limit = self.attributes_limit,
                "accessor reports more components than the combined attribute limit"
            );
        }
        self.combined_attributes_count = read.min(self.attributes_limit);
    }

    fn initialize(&mut self, _state: &TweenState) {
        let Some(accessor) = self.accessor.as_mut() else {
            return;
        };
        accessor.read(&mut self.start_values);

        let stride = self.attributes_limit;
        for i in 0..self.combined_attributes_count {
            if self.is_relative {
                let start = self.start_values[i];
                self.target_values[i] += start;
                for waypoint in 0..self.waypoint_count {
                    self.waypoints[waypoint * stride + i] += start;
                }
            }
            if self.is_from {
                std::mem::swap(&mut self.start_values[i], &mut self.target_values[i]);
            }
        }
    }

    fn update(
        &mut self,
        state: &TweenState,
        step: i32,
        last_step: i32,
        is_iteration_step: bool,
        delta: f32,
    ) {
        let Some(easing) = self.easing.as_ref() else {
            return;
        };

        // Leaving an iteration: snap to the endpoint it was heading to
        if !is_iteration_step && step > last_step {
            self.write(Buffer::target_unless(state.is_reverse(last_step)));
            return;
        }
        if !is_iteration_step && step < last_step {
            self.write(Buffer::start_unless(state.is_reverse(last_step)));
            return;
        }

        debug_assert!(is_iteration_step);

        let duration = state.duration();
        let reversed = state.is_reverse(step);
        if duration < DURATION_EPSILON {
            if delta > -DURATION_EPSILON {
                self.write(Buffer::start_unless(reversed));
            } else {
                self.write(Buffer::target_unless(reversed));
            }
            return;
        }

        let time = if reversed {
            duration - state.current_time()
        } else {
            state.current_time()
        };
        let t = easing.compute(time / duration);

        let count = self.combined_attributes_count;
        let waypoints = self.waypoint_count;
        match self.path.as_deref() {
            Some(path) if waypoints > 0 => {
                let stride = self.attributes_limit;
                let points = &mut self.path_buffer[..waypoints + 2];
                for i in 0..count {
                    points[0] = self.start_values[i];
                    for w in 0..waypoints {
                        points[w + 1] = self.waypoints[w * stride + i];
                    }
                    points[waypoints + 1] = self.target_values[i];
                    self.accessor_buffer[i] = path.compute(t, points);
                }
            }
            _ => {
                let pairs = self.start_values.iter().zip(&self.target_values);
                for (out, (&start, &target)) in self.accessor_buffer[..count].iter_mut().zip(pairs) {
                    *out = start + t * (target - start);
                }
            }
        }

        if let Some(accessor) = self.accessor.as_mut() {
            accessor.write(&self.accessor_buffer[..count]);
        }
    }

    fn force_start_values(&mut self) {
        self.write(Buffer::Start);
    }

    fn force_end_values(&mut self) {
        self.write(Buffer::Target);
    }

    fn contains_target(&self, target: TargetId) -> bool {
        self.target_id() == Some(target)
    }
}

impl Interpolator {
    fn target_id(&self) -> Option<TargetId> {
        self.accessor.as_ref().and_then(|accessor| accessor.target_id())
    }
}

impl Animation<Interpolator> {
    /// A pristine tween with buffers sized by `config`.
    pub fn from_config(config: &TwineConfig) -> Self {
        Animation::new(Interpolator::new(config))
    }

    fn setup(&mut self, accessor: Option<Box<dyn Accessor>>, duration: f32) -> &mut Self {
        debug_assert!(duration >= 0.0, "duration cannot be negative");
        let duration = if duration < 0.0 {
            tracing::warn!(duration, "negative duration clamped to zero");
            0.0
        } else {
            duration
        };
        self.state_mut().duration = duration;
        self.hooks_mut().accessor = accessor;
        self
    }

    /// Interpolate from the current values of the target to the values given
    /// with [`target`](Self::target).
    pub fn to(&mut self, accessor: impl Accessor + 'static, duration: f32) -> &mut Self {
        self.setup(Some(Box::new(accessor)), duration);
        let hooks = self.hooks_mut();
        let (easing, path) = (hooks.default_easing, hooks.default_path);
        hooks.easing = Some(Box::new(easing));
        hooks.path = Some(Box::new(path));
        self
    }

    /// Interpolate from the values given with [`target`](Self::target) to the
    /// current values of the target.
    pub fn from(&mut self, accessor: impl Accessor + 'static, duration: f32) -> &mut Self {
        self.to(accessor, duration);
        self.hooks_mut().is_from = true;
        self
    }

    /// Instantly set the target values, at the end of the delay if any.
    pub fn set(&mut self, accessor: impl Accessor + 'static) -> &mut Self {
        self.setup(Some(Box::new(accessor)), 0.0);
        let easing = self.hooks().default_easing;
        self.hooks_mut().easing = Some(Box::new(easing));
        self
    }

    /// A timer: fires START on `callback` once the delay has elapsed.
    pub fn call(&mut self, callback: impl TweenCallback + 'static) -> &mut Self {
        self.setup(None, 0.0);
        self.set_callback(callback);
        self.set_callback_triggers(Triggers::START);
        self
    }

    /// An empty beacon, only useful for its callbacks.
    pub fn mark(&mut self) -> &mut Self {
        self.setup(None, 0.0)
    }

    pub fn ease(&mut self, easing: impl EasingFunction + 'static) -> &mut Self {
        self.hooks_mut().easing = Some(Box::new(easing));
        self
    }

    /// Function used to navigate through waypoints.
    pub fn path(&mut self, path: impl PathFunction + 'static) -> &mut Self {
        self.hooks_mut().path = Some(Box::new(path));
        self
    }

    /// Absolute target values. Components beyond the combined attribute limit
    /// are dropped.
    pub fn target(&mut self, values: &[f32]) -> &mut Self {
        let hooks = self.hooks_mut();
        let count = hooks.fit(values.len(), "target");
        hooks.target_values[..count].copy_from_slice(&values[..count]);
        self
    }

    /// Target values relative to the start values. Waypoints become relative
    /// too. Once initialized, the captured start values are added immediately.
    pub fn target_relative(&mut self, values: &[f32]) -> &mut Self {
        let initialized = self.state().is_initialized();
        let hooks = self.hooks_mut();
        hooks.is_relative = true;
        let count = hooks.fit(values.len(), "relative target");
        for (i, &value) in values[..count].iter().enumerate() {
            let offset = if initialized { hooks.start_values[i] } else { 0.0 };
            hooks.target_values[i] = value + offset;
        }
        self
    }

    /// Append a waypoint. Waypoints beyond the configured limit are dropped.
    pub fn waypoint(&mut self, values: &[f32]) -> &mut Self {
        let hooks = self.hooks_mut();
        if hooks.waypoint_count >= hooks.waypoints_limit {
            tracing::warn!(limit = hooks.waypoints_limit, "waypoint dropped: limit reached");
            return self;
        }
        let count = hooks.fit(values.len(), "waypoint");
        let row = hooks.waypoint_count * hooks.attributes_limit;
        hooks.waypoints[row..row + count].copy_from_slice(&values[..count]);
        hooks.waypoint_count += 1;
        self
    }

    /// Target values, after relative/from resolution once initialized.
    pub fn target_values(&self) -> &[f32] {
        let hooks = self.hooks();
        &hooks.target_values[..hooks.combined_attributes_count]
    }

    /// Start values, captured at initialization.
    pub fn start_values(&self) -> &[f32] {
        let hooks = self.hooks();
        &hooks.start_values[..hooks.combined_attributes_count]
    }

    /// Number of components animated together, known once built.
    pub fn combined_attributes_count(&self) -> usize {
        self.hooks().combined_attributes_count
    }

    pub fn waypoint_count(&self) -> usize {
        self.hooks().waypoint_count
    }

    /// Name of the easing function, if any.
    pub fn easing(&self) -> Option<&str> {
        self.hooks().easing.as_ref().map(|easing| easing.name())
    }

    pub fn target_id(&self) -> Option<TargetId> {
        self.hooks().target_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn linear_config() -> TwineConfig {
        TwineConfig::default()
            .with_default_easing(Easing::Linear)
            .with_waypoints_limit(2)
    }

    #[test]
    fn test_build_reads_attribute_count() {
        let position = Rc::new(RefCell::new(vec![1.0f32, 2.0]));
        let mut tween = Tween::from_config(&linear_config());
        tween.to(position, 1.0);
        assert_eq!(tween.combined_attributes_count(), 0);

        tween.build();
        assert_eq!(tween.combined_attributes_count(), 2);
        assert!(!tween.is_started());
    }

    #[test]
    fn test_linear_interpolation() {
        let value = Rc::new(Cell::new(0.0f32));
        let mut tween = Tween::from_config(&linear_config());
        tween.to(value.clone(), 2.0).target(&[10.0]).start();

        tween.update(0.5);
        assert_eq!(value.get(), 2.5);
        tween.update(1.0);
        assert_eq!(value.get(), 7.5);
        tween.update(1.0);
        assert_eq!(value.get(), 10.0);
        assert!(tween.is_finished());
    }

    #[test]
    fn test_default_easing_is_quad_in_out() {
        let value = Rc::new(Cell::new(0.0f32));
        let mut tween = Tween::from_config(&TwineConfig::default());
        tween.to(value.clone(), 1.0).target(&[1.0]).start();
        assert_eq!(tween.easing(), Some("Quad.INOUT"));

        tween.update(0.25);
        assert_eq!(value.get(), 0.125);
    }

    #[test]
    fn test_relative_and_from() {
        let value = Rc::new(Cell::new(5.0f32));
        let mut tween = Tween::from_config(&linear_config());
        tween.to(value.clone(), 1.0).target_relative(&[10.0]).start();
        tween.update(0.5);
        assert_eq!(tween.start_values(), &[5.0]);
        assert_eq!(tween.target_values(), &[15.0]);
        assert_eq!(value.get(), 10.0);

        let value = Rc::new(Cell::new(5.0f32));
        let mut tween = Tween::from_config(&linear_config());
        tween.from(value.clone(), 1.0).target(&[1.0]).start();
        tween.update(0.0);
        assert_eq!(value.get(), 1.0);
        tween.update(1.0);
        assert_eq!(value.get(), 5.0);
    }

    #[test]
    fn test_target_truncated_to_limit() {
        let values = Rc::new(RefCell::new(vec![0.0f32; 3]));
        let mut tween = Tween::from_config(&linear_config());
        tween
            .to(values.clone(), 1.0)
            .target(&[1.0, 2.0, 3.0, 4.0, 5.0])
            .start();
        tween.update(1.0);
        assert_eq!(tween.target_values(), &[1.0, 2.0, 3.0]);
        assert_eq!(*values.borrow(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_waypoints_beyond_limit_are_dropped() {
        let value = Rc::new(Cell::new(0.0f32));
        let mut tween = Tween::from_config(&linear_config());
        tween
            .to(value.clone(), 1.0)
            .waypoint(&[1.0])
            .waypoint(&[2.0])
            .waypoint(&[3.0]);
        assert_eq!(tween.waypoint_count(), 2);
    }

    #[test]
    fn test_timer_and_beacon_write_nothing() {
        let mut tween = Tween::from_config(&linear_config());
        tween.call(|_: crate::TweenEvent, _: &TweenState| {});
        assert_eq!(tween.callback_triggers(), Triggers::START);
        assert_eq!(tween.easing(), None);
        assert_eq!(tween.duration(), 0.0);

        tween.start();
        tween.update(1.0);
        assert!(tween.is_finished());
        assert_eq!(tween.combined_attributes_count(), 0);

        let mut beacon = Tween::from_config(&linear_config());
        beacon.mark().start();
        beacon.update(0.1);
        assert!(beacon.is_finished());
    }

    #[test]
    fn test_reset_clears_interpolation_setup() {
        let value = Rc::new(Cell::new(0.0f32));
        let mut tween = Tween::from_config(&linear_config());
        tween
            .to(value, 1.0)
            .target(&[4.0])
            .waypoint(&[2.0])
            .start();
        tween.update(0.5);

        tween.reset();
        assert_eq!(tween.easing(), None);
        assert_eq!(tween.waypoint_count(), 0);
        assert_eq!(tween.combined_attributes_count(), 0);
        assert_eq!(tween.target_id(), None);
        assert_eq!(tween.duration(), 0.0);
    }
}
