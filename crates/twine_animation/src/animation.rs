//! Animation lifecycle engine
//!
//! [`Animation`] owns the timing state and the update algorithm. It knows
//! nothing about values: every value change is delegated to its
//! [`AnimationHooks`] implementation, invoked at each boundary and each
//! interior step the update algorithm derives from the pushed time delta.
//!
//! A single `update(delta)` is decomposed into exact sub-deltas, one per
//! boundary it crosses (end of delay, iteration ends, repeat gaps), so every
//! lifecycle event fires exactly once per crossing whatever the size or sign of
//! the delta. Boundaries are inclusive in the direction of travel: a forward
//! update landing exactly on the end of an iteration fires END, a backward
//! update landing exactly on its start fires BACK_END. Infinite animations are
//! the one exception: a catch-up delta spanning too many whole cycles skips
//! the surplus ones.

use std::any::Any;

use crate::accessor::TargetId;
use crate::callback::{Triggers, TweenCallback, TweenEvent};
use crate::state::TweenState;

/// Largest finite repeat count: the step after the last iteration,
/// `repeat_count * 2 + 1`, must fit in an `i32`.
pub const MAX_REPEAT_COUNT: i32 = (i32::MAX - 1) / 2;

/// Whole cycles an infinite animation replays in a single update before it
/// starts skipping them.
const MAX_REPLAYED_CYCLES: f32 = 64.0;

/// Value-producing side of an animation.
///
/// Every method except [`reset`](AnimationHooks::reset) has a no-op default,
/// so a pure timer needs nothing but a reset.
pub trait AnimationHooks {
    /// Restore the pristine state (called when vended from and returned to a
    /// pool).
    fn reset(&mut self);

    /// Finalize configuration before the animation starts.
    fn build(&mut self) {}

    /// Called once, when the delay has elapsed.
    fn initialize(&mut self, _state: &TweenState) {}

    /// Produce values for a sub-step.
    ///
    /// `step` and `last_step` are the step ids after and before the sub-step,
    /// `is_iteration_step` tells whether the sub-step ends inside an iteration
    /// and `delta` is the exact portion of time it covers.
    fn update(
        &mut self,
        _state: &TweenState,
        _step: i32,
        _last_step: i32,
        _is_iteration_step: bool,
        _delta: f32,
    ) {
    }

    /// Write the start values to the target.
    fn force_start_values(&mut self) {}

    /// Write the target values to the target.
    fn force_end_values(&mut self) {}

    /// Whether this animation drives the given target.
    fn contains_target(&self, _target: TargetId) -> bool {
        false
    }

    /// Number of leaf tweens represented.
    fn tween_count(&self) -> usize {
        1
    }

    /// Number of composite sequences represented.
    fn timeline_count(&self) -> usize {
        0
    }
}

/// A delta-driven animation: timing state, callback and value hooks.
pub struct Animation<H> {
    state: TweenState,
    callback: Option<Box<dyn TweenCallback>>,
    triggers: Triggers,
    hooks: H,
}

impl<H: AnimationHooks> Animation<H> {
    pub fn new(hooks: H) -> Self {
        Self {
            state: TweenState::default(),
            callback: None,
            triggers: Triggers::default(),
            hooks,
        }
    }

    /// Restore the pristine state: not started, no delay, no repetitions,
    /// no callback, no user data.
    pub fn reset(&mut self) {
        self.state.reset();
        self.callback = None;
        self.triggers = Triggers::default();
        self.hooks.reset();
    }

    pub fn state(&self) -> &TweenState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut TweenState {
        &mut self.state
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Finalize the animation without starting it. `start()` calls this.
    pub fn build(&mut self) -> &mut Self {
        self.hooks.build();
        self
    }

    /// Start or restart the animation unmanaged; the caller drives `update`.
    pub fn start(&mut self) -> &mut Self {
        self.build();
        self.state.current_time = 0.0;
        self.state.started = true;
        self
    }

    /// Add to the initial delay. Must be called before the animation starts.
    pub fn delay(&mut self, delay: f32) -> &mut Self {
        self.state.delay += delay;
        self
    }

    /// Repeat `count` more times (negative = forever) with `delay` between
    /// iterations. Ignored once started; `count` is clamped to
    /// [`MAX_REPEAT_COUNT`].
    pub fn repeat(&mut self, count: i32, delay: f32) -> &mut Self {
        self.set_repetitions(count, delay, false)
    }

    /// Like [`repeat`](Self::repeat), playing every other iteration backwards.
    pub fn repeat_yoyo(&mut self, count: i32, delay: f32) -> &mut Self {
        self.set_repetitions(count, delay, true)
    }

    fn set_repetitions(&mut self, count: i32, delay: f32, yoyo: bool) -> &mut Self {
        if self.state.started {
            tracing::warn!(count, "repetitions cannot change once the animation is started");
            return self;
        }
        if count > MAX_REPEAT_COUNT {
            tracing::warn!(count, max = MAX_REPEAT_COUNT, "repeat count clamped");
        }
        self.state.repeat_count = count.min(MAX_REPEAT_COUNT);
        self.state.repeat_delay = delay.max(0.0);
        self.state.yoyo = yoyo;
        self
    }

    /// Install the callback sink. By default it only receives COMPLETE; see
    /// [`set_callback_triggers`](Self::set_callback_triggers).
    pub fn set_callback(&mut self, callback: impl TweenCallback + 'static) -> &mut Self {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Choose which events reach the callback.
    pub fn set_callback_triggers(&mut self, triggers: Triggers) -> &mut Self {
        self.triggers = triggers;
        self
    }

    /// Attach opaque data, retrievable from callbacks through
    /// [`TweenState::user_data`].
    pub fn set_user_data<T: Any>(&mut self, data: T) -> &mut Self {
        self.state.user_data = Some(Box::new(data));
        self
    }

    /// Whether a scheduler frees this animation once finished.
    pub fn set_auto_remove(&mut self, enabled: bool) -> &mut Self {
        self.state.auto_remove = enabled;
        self
    }

    /// Whether a scheduler starts this animation when it is added.
    pub fn set_auto_start(&mut self, enabled: bool) -> &mut Self {
        self.state.auto_start = enabled;
        self
    }

    // =========================================================================
    // Control
    // =========================================================================

    /// Mark the animation finished. A scheduler removes it on its next update.
    pub fn kill(&mut self) {
        self.state.killed = true;
    }

    /// Freeze the animation: further updates have no effect.
    pub fn pause(&mut self) {
        self.state.paused = true;
    }

    pub fn resume(&mut self) {
        self.state.paused = false;
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn user_data<T: Any>(&self) -> Option<&T> {
        self.state.user_data()
    }

    pub fn callback_triggers(&self) -> Triggers {
        self.triggers
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    pub fn duration(&self) -> f32 {
        self.state.duration
    }

    pub fn full_duration(&self) -> f32 {
        self.state.full_duration()
    }

    pub fn step(&self) -> i32 {
        self.state.step
    }

    pub fn current_time(&self) -> f32 {
        self.state.current_time
    }

    pub fn is_started(&self) -> bool {
        self.state.started
    }

    pub fn is_initialized(&self) -> bool {
        self.state.initialized
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn contains_target(&self, target: TargetId) -> bool {
        self.hooks.contains_target(target)
    }

    pub fn tween_count(&self) -> usize {
        self.hooks.tween_count()
    }

    pub fn timeline_count(&self) -> usize {
        self.hooks.timeline_count()
    }

    // =========================================================================
    // Seeking
    // =========================================================================

    /// Snap to the state before the first iteration, writing the values the
    /// first iteration starts from.
    pub fn force_to_start(&mut self) {
        self.state.current_time = -self.state.delay;
        self.state.step = -1;
        self.state.is_iteration_step = false;
        if self.state.is_reverse(0) {
            self.hooks.force_end_values();
        } else {
            self.hooks.force_start_values();
        }
    }

    /// Snap to the state after the last iteration, `time` being the position
    /// on the global timeline. Meaningless for infinite repetitions.
    pub fn force_to_end(&mut self, time: f32) {
        let last = self.state.repeat_count * 2;
        self.state.current_time = time - self.state.full_duration();
        self.state.step = last + 1;
        self.state.is_iteration_step = false;
        if self.state.is_reverse(last) {
            self.hooks.force_start_values();
        } else {
            self.hooks.force_end_values();
        }
    }

    // =========================================================================
    // Update engine
    // =========================================================================

    /// Advance (or rewind, with a negative delta) the animation.
    ///
    /// Scale the delta for slow or fast motion. Does nothing unless started,
    /// and nothing while paused or killed.
    pub fn update(&mut self, delta: f32) {
        if !self.state.started || self.state.paused || self.state.killed {
            return;
        }

        self.state.delta_time = delta;

        if !self.state.initialized {
            self.initialize();
        }

        if self.state.initialized {
            self.test_relaunch();
            self.update_step();
            self.test_completion();
        }

        self.state.current_time += self.state.delta_time;
        self.state.delta_time = 0.0;
    }

    fn initialize(&mut self) {
        let state = &mut self.state;
        if state.current_time + state.delta_time < state.delay {
            return;
        }

        self.hooks.initialize(&self.state);

        let state = &mut self.state;
        state.initialized = true;
        state.is_iteration_step = true;
        state.step = 0;
        state.delta_time -= state.delay - state.current_time;
        state.current_time = 0.0;

        self.emit(TweenEvent::Begin);
        self.emit(TweenEvent::Start);
    }

    /// Re-enter the playable range from before its start or after its end.
    fn test_relaunch(&mut self) {
        let state = &self.state;
        if state.is_iteration_step || state.repeat_count < 0 {
            return;
        }
        let delta = state.delta_time;
        let target = state.current_time + delta;

        if state.step < 0 && delta > 0.0 && target >= 0.0 {
            debug_assert_eq!(state.step, -1);
            let consumed = -state.current_time;
            let state = &mut self.state;
            state.is_iteration_step = true;
            state.step = 0;
            state.delta_time -= consumed;
            state.current_time = 0.0;

            self.emit(TweenEvent::Begin);
            self.emit(TweenEvent::Start);
            self.call_update(0, -1, consumed);
        } else if state.step > state.repeat_count * 2 && delta < 0.0 && target <= 0.0 {
            debug_assert_eq!(state.step, state.repeat_count * 2 + 1);
            let consumed = -state.current_time;
            let state = &mut self.state;
            let step = state.repeat_count * 2;
            state.is_iteration_step = true;
            state.step = step;
            state.delta_time -= consumed;
            state.current_time = state.duration;

            self.emit(TweenEvent::BackBegin);
            self.emit(TweenEvent::BackStart);
            self.call_update(step, step + 1, consumed);
        }
    }

    /// Consume the pending delta one boundary at a time.
    fn update_step(&mut self) {
        self.skip_cycles();

        while self.state.is_valid(self.state.step) {
            if self.is_degenerate_loop() {
                self.consume_interior();
                break;
            }

            let state = &self.state;
            let delta = state.delta_time;
            let target = state.current_time + delta;

            if !state.is_iteration_step && delta < 0.0 && target <= 0.0 {
                // Backwards out of a repeat gap, into the end of the previous iteration
                let consumed = -state.current_time;
                let state = &mut self.state;
                state.is_iteration_step = true;
                state.step -= 1;
                state.delta_time -= consumed;
                state.current_time = state.duration;

                let step = state.step;
                if self.state.is_reverse(step) {
                    self.hooks.force_start_values();
                } else {
                    self.hooks.force_end_values();
                }
                self.emit(TweenEvent::BackStart);
                self.call_update(step, step + 1, consumed);
            } else if !state.is_iteration_step && delta > 0.0 && target >= state.repeat_delay {
                // Forwards out of a repeat gap, into the start of the next iteration
                let consumed = state.repeat_delay - state.current_time;
                let state = &mut self.state;
                state.is_iteration_step = true;
                state.step += 1;
                state.delta_time -= consumed;
                state.current_time = 0.0;

                let step = state.step;
                if self.state.is_reverse(step) {
                    self.hooks.force_end_values();
                } else {
                    self.hooks.force_start_values();
                }
                self.emit(TweenEvent::Start);
                self.call_update(step, step - 1, consumed);
            } else if state.is_iteration_step && delta < 0.0 && target <= 0.0 {
                // Backwards past the start of the current iteration
                let consumed = -state.current_time;
                let state = &mut self.state;
                state.is_iteration_step = false;
                state.step -= 1;
                state.delta_time -= consumed;
                state.current_time = 0.0;

                let step = state.step;
                self.call_update(step, step + 1, consumed);
                self.emit(TweenEvent::BackEnd);

                if step < 0 && self.state.repeat_count >= 0 {
                    self.emit(TweenEvent::BackComplete);
                } else {
                    self.state.current_time = self.state.repeat_delay;
                }
            } else if state.is_iteration_step && delta > 0.0 && target >= state.duration {
                // Forwards past the end of the current iteration
                let consumed = state.duration - state.current_time;
                let state = &mut self.state;
                state.is_iteration_step = false;
                state.step += 1;
                state.delta_time -= consumed;
                state.current_time = state.duration;

                let step = state.step;
                self.call_update(step, step - 1, consumed);
                self.emit(TweenEvent::End);

                if step > self.state.repeat_count * 2 && self.state.repeat_count >= 0 {
                    self.emit(TweenEvent::Complete);
                }
                self.state.current_time = 0.0;
            } else {
                self.consume_interior();
                break;
            }
        }
    }

    /// The remaining delta fits inside the current segment.
    fn consume_interior(&mut self) {
        let state = &mut self.state;
        let delta = state.delta_time;
        state.delta_time = 0.0;
        state.current_time += delta;

        if state.is_iteration_step {
            let step = state.step;
            self.call_update(step, step, delta);
        }
    }

    /// Infinite zero-length cycles never consume any time: the animation stays
    /// in its first iteration.
    fn is_degenerate_loop(&self) -> bool {
        let state = &self.state;
        state.repeat_count < 0 && state.duration <= 0.0 && state.repeat_delay <= 0.0
    }

    /// An infinite animation caught up by more than [`MAX_REPLAYED_CYCLES`]
    /// cycles drops the surplus whole cycles, whose events are not fired.
    /// One cycle spans two iterations and two gaps, so the yoyo phase is kept.
    fn skip_cycles(&mut self) {
        let state = &mut self.state;
        if state.repeat_count >= 0 {
            return;
        }
        let cycle = 2.0 * (state.duration + state.repeat_delay);
        if cycle <= 0.0 || state.delta_time.abs() <= cycle * MAX_REPLAYED_CYCLES {
            return;
        }
        let skipped = (state.delta_time / cycle).trunc();
        state.delta_time %= cycle;
        tracing::debug!(skipped, "skipped whole cycles of an infinite animation");
    }

    fn test_completion(&mut self) {
        let state = &mut self.state;
        state.finished = state.repeat_count >= 0
            && (state.step > state.repeat_count * 2 || state.step < 0);
    }

    fn call_update(&mut self, step: i32, last_step: i32, delta: f32) {
        let is_iteration_step = self.state.is_iteration_step;
        self.hooks
            .update(&self.state, step, last_step, is_iteration_step, delta);
    }

    fn emit(&mut self, event: TweenEvent) {
        tracing::trace!(?event, step = self.state.step, "tween event");
        if !self.triggers.contains(event) {
            return;
        }
        if let Some(callback) = self.callback.as_mut() {
            callback.on_event(event, &self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Hooks that record every call, as a pure timer would see them.
    #[derive(Default)]
    struct Probe {
        log: Rc<RefCell<Vec<String>>>,
    }

    impl AnimationHooks for Probe {
        fn reset(&mut self) {
            self.log.borrow_mut().push("reset".into());
        }

        fn initialize(&mut self, state: &TweenState) {
            self.log
                .borrow_mut()
                .push(format!("init@{}", state.current_time()));
        }

        fn update(&mut self, _: &TweenState, step: i32, last: i32, iter: bool, delta: f32) {
            self.log
                .borrow_mut()
                .push(format!("update {last}->{step} {iter} {delta}"));
        }

        fn force_start_values(&mut self) {
            self.log.borrow_mut().push("start-values".into());
        }

        fn force_end_values(&mut self) {
            self.log.borrow_mut().push("end-values".into());
        }
    }

    fn timer(duration: f32) -> (Animation<Probe>, Rc<RefCell<Vec<String>>>) {
        let probe = Probe::default();
        let log = probe.log.clone();
        let mut animation = Animation::new(probe);
        animation.state_mut().duration = duration;
        (animation, log)
    }

    #[test]
    fn test_update_before_start_is_ignored() {
        let (mut animation, log) = timer(1.0);
        animation.update(0.5);
        assert_eq!(animation.step(), -2);
        assert_eq!(animation.current_time(), 0.0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_delay_defers_initialization() {
        let (mut animation, log) = timer(1.0);
        animation.delay(0.5).delay(0.25).start();
        assert_eq!(animation.state().delay(), 0.75);

        animation.update(0.5);
        assert!(!animation.is_initialized());
        assert_eq!(animation.step(), -2);
        assert_eq!(animation.current_time(), 0.5);

        animation.update(0.5);
        assert!(animation.is_initialized());
        assert_eq!(animation.step(), 0);
        assert_eq!(animation.current_time(), 0.25);
        assert_eq!(log.borrow()[0], "init@0.5");
        assert_eq!(log.borrow()[1], "update 0->0 true 0.25");
    }

    #[test]
    fn test_hook_order_on_forward_boundary() {
        let (mut animation, log) = timer(1.0);
        animation.repeat(1, 0.0).start();
        animation.update(1.5);

        let log = log.borrow();
        assert_eq!(
            log.as_slice(),
            [
                "init@0",
                "update 0->1 false 1",
                "start-values",
                "update 1->2 true 0",
                "update 2->2 true 0.5",
            ]
        );
    }

    #[test]
    fn test_repeat_is_ignored_after_start() {
        let (mut animation, _) = timer(1.0);
        animation.repeat(2, 0.5).start();
        animation.repeat_yoyo(7, 1.0);
        assert_eq!(animation.state().repeat_count(), 2);
        assert_eq!(animation.state().repeat_delay(), 0.5);
        assert!(!animation.state().is_yoyo());
    }

    #[test]
    fn test_negative_repeat_delay_is_clamped() {
        let (mut animation, _) = timer(1.0);
        animation.repeat_yoyo(1, -3.0);
        assert_eq!(animation.state().repeat_delay(), 0.0);
        assert!(animation.state().is_yoyo());
    }

    #[test]
    fn test_pause_freezes_and_resume_continues() {
        let (mut animation, _) = timer(1.0);
        animation.start();
        animation.update(0.25);
        animation.pause();
        animation.update(0.5);
        assert_eq!(animation.current_time(), 0.25);
        assert!(animation.is_paused());

        animation.resume();
        animation.update(0.5);
        assert_eq!(animation.current_time(), 0.75);
    }

    #[test]
    fn test_kill_finishes_lazily_and_stops_updates() {
        let (mut animation, _) = timer(1.0);
        animation.start();
        animation.update(0.25);
        animation.kill();
        assert!(animation.is_finished());
        animation.update(0.5);
        assert_eq!(animation.current_time(), 0.25);
    }

    #[test]
    fn test_degenerate_infinite_loop_terminates() {
        let (mut animation, _) = timer(0.0);
        animation.repeat(-1, 0.0).start();
        animation.update(1.0);
        assert!(animation.is_initialized());
        assert!(!animation.is_finished());
        assert_eq!(animation.step(), 0);

        animation.update(-3.0);
        assert_eq!(animation.step(), 0);
        assert!(!animation.is_finished());
    }

    #[test]
    fn test_force_to_start_and_end() {
        let (mut animation, log) = timer(1.0);
        animation.delay(0.5).repeat(1, 0.25);
        animation.force_to_end(10.0);
        assert_eq!(animation.step(), 3);
        assert_eq!(animation.current_time(), 10.0 - animation.full_duration());
        assert_eq!(log.borrow().last().map(String::as_str), Some("end-values"));

        animation.force_to_start();
        assert_eq!(animation.step(), -1);
        assert_eq!(animation.current_time(), -0.5);
        assert_eq!(log.borrow().last().map(String::as_str), Some("start-values"));
    }

    #[test]
    fn test_reset_restores_pristine_state() {
        let (mut animation, log) = timer(1.0);
        animation
            .delay(1.0)
            .repeat(3, 0.5)
            .set_user_data(5u8)
            .set_callback(|_: TweenEvent, _: &TweenState| {})
            .set_callback_triggers(Triggers::ANY)
            .start();
        animation.update(2.0);

        animation.reset();
        assert_eq!(animation.step(), -2);
        assert_eq!(animation.current_time(), 0.0);
        assert_eq!(animation.state().delay(), 0.0);
        assert_eq!(animation.state().repeat_count(), 0);
        assert!(!animation.is_started());
        assert!(!animation.has_callback());
        assert_eq!(animation.callback_triggers(), Triggers::COMPLETE);
        assert!(animation.state().user_data::<u8>().is_none());
        assert_eq!(log.borrow().last().map(String::as_str), Some("reset"));
    }
}
