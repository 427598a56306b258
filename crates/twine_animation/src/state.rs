//! Timing and lifecycle state shared by every animation

use std::any::Any;
use std::fmt;

/// Timing configuration, local clock and lifecycle flags of one animation.
///
/// Step ids:
/// - even numbers mean an iteration is playing,
/// - odd numbers mean the animation sits between two iterations,
/// - `-2` means the initial delay has not ended,
/// - `-1` means the animation is before the first iteration,
/// - `repeat_count * 2 + 1` means it is after the last iteration.
pub struct TweenState {
    pub(crate) step: i32,
    pub(crate) repeat_count: i32,
    pub(crate) is_iteration_step: bool,
    pub(crate) yoyo: bool,

    pub(crate) delay: f32,
    pub(crate) duration: f32,
    pub(crate) repeat_delay: f32,
    pub(crate) current_time: f32,
    /// Portion of the pending update not yet consumed by the step loop
    pub(crate) delta_time: f32,

    pub(crate) started: bool,
    pub(crate) initialized: bool,
    pub(crate) finished: bool,
    pub(crate) killed: bool,
    pub(crate) paused: bool,

    pub(crate) auto_remove: bool,
    pub(crate) auto_start: bool,

    pub(crate) user_data: Option<Box<dyn Any>>,
}

impl Default for TweenState {
    fn default() -> Self {
        Self {
            step: -2,
            repeat_count: 0,
            is_iteration_step: false,
            yoyo: false,
            delay: 0.0,
            duration: 0.0,
            repeat_delay: 0.0,
            current_time: 0.0,
            delta_time: 0.0,
            started: false,
            initialized: false,
            finished: false,
            killed: false,
            paused: false,
            auto_remove: true,
            auto_start: true,
            user_data: None,
        }
    }
}

impl fmt::Debug for TweenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TweenState")
            .field("step", &self.step)
            .field("repeat_count", &self.repeat_count)
            .field("is_iteration_step", &self.is_iteration_step)
            .field("yoyo", &self.yoyo)
            .field("delay", &self.delay)
            .field("duration", &self.duration)
            .field("repeat_delay", &self.repeat_delay)
            .field("current_time", &self.current_time)
            .field("started", &self.started)
            .field("initialized", &self.initialized)
            .field("finished", &self.finished)
            .field("killed", &self.killed)
            .field("paused", &self.paused)
            .finish_non_exhaustive()
    }
}

impl TweenState {
    /// Restore the pristine state of a freshly constructed animation.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Delay before the first iteration
    pub fn delay(&self) -> f32 {
        self.delay
    }

    /// Duration of a single iteration
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Number of repetitions after the first iteration (negative = infinite)
    pub fn repeat_count(&self) -> i32 {
        self.repeat_count
    }

    /// Delay between two iterations
    pub fn repeat_delay(&self) -> f32 {
        self.repeat_delay
    }

    /// Complete duration including the delay and every repetition, or `-1`
    /// when repetitions are infinite.
    ///
    /// ```text
    /// full_duration = delay + duration + (repeat_delay + duration) * repeat_count
    /// ```
    pub fn full_duration(&self) -> f32 {
        if self.repeat_count < 0 {
            return -1.0;
        }
        self.delay + self.duration + (self.repeat_delay + self.duration) * self.repeat_count as f32
    }

    pub fn step(&self) -> i32 {
        self.step
    }

    /// Local time: position in the current iteration, delay or repeat gap
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    pub fn is_iteration_step(&self) -> bool {
        self.is_iteration_step
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Start values are captured at initialization, right after the delay.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// True once every repetition is done or the animation was killed.
    pub fn is_finished(&self) -> bool {
        self.finished || self.killed
    }

    pub fn is_killed(&self) -> bool {
        self.killed
    }

    pub fn is_yoyo(&self) -> bool {
        self.yoyo
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_auto_remove_enabled(&self) -> bool {
        self.auto_remove
    }

    pub fn is_auto_start_enabled(&self) -> bool {
        self.auto_start
    }

    /// Attached user data, if any and of type `T`.
    pub fn user_data<T: Any>(&self) -> Option<&T> {
        self.user_data.as_ref()?.downcast_ref()
    }

    /// Whether the iteration identified by `step` plays backwards.
    pub fn is_reverse(&self, step: i32) -> bool {
        self.yoyo && (step % 4).abs() == 2
    }

    /// Whether `step` lies inside the playable range.
    pub fn is_valid(&self, step: i32) -> bool {
        (step >= 0 && step <= self.repeat_count * 2) || self.repeat_count < 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pristine_state() {
        let state = TweenState::default();
        assert_eq!(state.step(), -2);
        assert_eq!(state.current_time(), 0.0);
        assert!(!state.is_started());
        assert!(!state.is_finished());
        assert!(state.is_auto_remove_enabled());
        assert!(state.is_auto_start_enabled());
        assert!(state.user_data::<u32>().is_none());
    }

    #[test]
    fn test_full_duration() {
        let mut state = TweenState {
            delay: 0.5,
            duration: 2.0,
            repeat_delay: 0.25,
            repeat_count: 3,
            ..Default::default()
        };
        assert_eq!(state.full_duration(), 0.5 + 2.0 + (0.25 + 2.0) * 3.0);

        state.repeat_count = 0;
        assert_eq!(state.full_duration(), 2.5);

        state.repeat_count = -1;
        assert_eq!(state.full_duration(), -1.0);
    }

    #[test]
    fn test_reverse_pattern_under_yoyo() {
        let state = TweenState {
            yoyo: true,
            repeat_count: -1,
            ..Default::default()
        };
        let flags: Vec<bool> = (0..=6).map(|step| state.is_reverse(step)).collect();
        assert_eq!(flags, vec![false, false, true, true, false, false, true]);

        assert!(state.is_reverse(-2));
        assert!(!state.is_reverse(-1));
    }

    #[test]
    fn test_reverse_requires_yoyo() {
        let state = TweenState::default();
        assert!((0..=8).all(|step| !state.is_reverse(step)));
    }

    #[test]
    fn test_valid_range() {
        let mut state = TweenState {
            repeat_count: 2,
            ..Default::default()
        };
        assert!(!state.is_valid(-1));
        assert!((0..=4).all(|step| state.is_valid(step)));
        assert!(!state.is_valid(5));

        state.repeat_count = -1;
        assert!(state.is_valid(-1));
        assert!(state.is_valid(1000));
    }

    #[test]
    fn test_killed_counts_as_finished() {
        let state = TweenState {
            killed: true,
            ..Default::default()
        };
        assert!(state.is_finished());
    }

    #[test]
    fn test_user_data_downcast() {
        let state = TweenState {
            user_data: Some(Box::new(String::from("player"))),
            ..Default::default()
        };
        assert_eq!(state.user_data::<String>().map(String::as_str), Some("player"));
        assert!(state.user_data::<i32>().is_none());
    }
}
