//! Integration tests for the scheduler and its tween pool

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use twine_animation::{
    AccessMode, Easing, FnAccessor, Scheduler, TargetId, Triggers, TweenEvent, TweenId,
    TweenState, TwineConfig,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn linear_scheduler() -> Scheduler {
    Scheduler::new(&TwineConfig::default().with_default_easing(Easing::Linear))
}

/// Schedule a 0 → `to` tween on `value`.
fn animate(scheduler: &mut Scheduler, value: &Rc<Cell<f32>>, to: f32, duration: f32) -> TweenId {
    let id = scheduler.to(value.clone(), duration);
    scheduler.get_mut(id).unwrap().target(&[to]);
    scheduler.add(id).unwrap();
    id
}

/// A scalar accessor tagged with a target identity.
fn tagged(value: Rc<Cell<f32>>, target: u64) -> impl twine_animation::Accessor {
    FnAccessor::new(move |mode, values: &mut [f32]| match mode {
        AccessMode::Read => {
            values[0] = value.get();
            1
        }
        AccessMode::Write => {
            value.set(values[0]);
            1
        }
    })
    .with_target(TargetId(target))
}

#[test]
fn test_finished_tweens_leave_on_next_update() {
    init_tracing();
    let mut scheduler = linear_scheduler();
    let value = Rc::new(Cell::new(0.0f32));
    let id = animate(&mut scheduler, &value, 10.0, 1.0);

    scheduler.update(0.5);
    assert_eq!(value.get(), 5.0);
    scheduler.update(0.5);
    assert_eq!(value.get(), 10.0);
    assert_eq!(scheduler.len(), 1);

    scheduler.update(0.0);
    assert!(scheduler.is_empty());
    assert!(scheduler.get(id).is_none());
    assert_eq!(scheduler.pool().size(), 1);
}

#[test]
fn test_auto_remove_disabled_keeps_finished_tween() {
    let mut scheduler = linear_scheduler();
    let value = Rc::new(Cell::new(0.0f32));
    let id = animate(&mut scheduler, &value, 10.0, 1.0);
    scheduler.set_auto_remove(id, false).unwrap();

    scheduler.update(2.0);
    scheduler.update(0.0);
    assert_eq!(scheduler.ids(), &[id]);

    // still rewindable
    scheduler.update(-1.5);
    assert_eq!(value.get(), 5.0);
}

#[test]
fn test_update_order_follows_direction() {
    let mut scheduler = linear_scheduler();
    let order = Rc::new(RefCell::new(Vec::new()));

    for name in ["first", "second", "third"] {
        let sink = order.clone();
        let id = scheduler.mark();
        let tween = scheduler.get_mut(id).unwrap();
        tween
            .set_callback(move |event: TweenEvent, _: &TweenState| {
                sink.borrow_mut().push((event, name));
            })
            .set_callback_triggers(Triggers::BEGIN | Triggers::BACK_BEGIN)
            .set_auto_remove(false);
        scheduler.add(id).unwrap();
    }

    scheduler.update(1.0);
    scheduler.update(-2.0);
    assert_eq!(
        *order.borrow(),
        [
            (TweenEvent::Begin, "first"),
            (TweenEvent::Begin, "second"),
            (TweenEvent::Begin, "third"),
            (TweenEvent::BackBegin, "third"),
            (TweenEvent::BackBegin, "second"),
            (TweenEvent::BackBegin, "first"),
        ]
    );
}

#[test]
fn test_kill_all_defers_removal() {
    let mut scheduler = linear_scheduler();
    let a = Rc::new(Cell::new(0.0f32));
    let b = Rc::new(Cell::new(0.0f32));
    animate(&mut scheduler, &a, 10.0, 1.0);
    animate(&mut scheduler, &b, 10.0, 1.0);
    scheduler.update(0.25);

    scheduler.kill_all();
    assert_eq!(scheduler.len(), 2);
    assert_eq!(scheduler.running_tweens_count(), 2);

    scheduler.update(0.25);
    assert!(scheduler.is_empty());
    assert_eq!(a.get(), 2.5);
    assert_eq!(b.get(), 2.5);
    assert_eq!(scheduler.running_tweens_count(), 0);
    assert_eq!(scheduler.running_timelines_count(), 0);
}

#[test]
fn test_kill_target() {
    init_tracing();
    let mut scheduler = linear_scheduler();
    let x = Rc::new(Cell::new(0.0f32));
    let y = Rc::new(Cell::new(0.0f32));

    for (value, target) in [(&x, 1), (&y, 2)] {
        let id = scheduler.to(tagged(value.clone(), target), 1.0);
        scheduler.get_mut(id).unwrap().target(&[10.0]);
        scheduler.add(id).unwrap();
    }
    assert!(scheduler.contains_target(TargetId(1)));
    assert!(!scheduler.contains_target(TargetId(3)));

    scheduler.kill_target(TargetId(1));
    assert!(!scheduler.contains_target(TargetId(1)));

    scheduler.update(0.5);
    assert_eq!(scheduler.len(), 1);
    assert_eq!(x.get(), 0.0);
    assert_eq!(y.get(), 5.0);
}

#[test]
fn test_pause_stops_advancing() {
    let mut scheduler = linear_scheduler();
    let value = Rc::new(Cell::new(0.0f32));
    animate(&mut scheduler, &value, 10.0, 1.0);

    scheduler.pause();
    scheduler.update(0.5);
    assert_eq!(value.get(), 0.0);
    assert!(scheduler.is_paused());

    scheduler.resume();
    scheduler.update(0.5);
    assert_eq!(value.get(), 5.0);
}

#[test]
fn test_pool_recycles_swept_tweens() {
    init_tracing();
    let mut scheduler = linear_scheduler();
    let value = Rc::new(Cell::new(0.0f32));

    let first: Vec<_> = (0..3)
        .map(|_| animate(&mut scheduler, &value, 1.0, 0.5))
        .collect();
    scheduler.update(1.0);
    scheduler.update(0.0);
    assert_eq!(scheduler.pool().size(), 3);

    let second: Vec<_> = (0..3).map(|_| scheduler.mark()).collect();
    let mut recycled = second.clone();
    recycled.sort();
    let mut expected = first.clone();
    expected.sort();
    assert_eq!(recycled, expected);
    assert_eq!(scheduler.pool().size(), 0);

    for id in second {
        let tween = scheduler.get(id).unwrap();
        assert!(!tween.is_started());
        assert_eq!(tween.step(), -2);
        assert_eq!(tween.callback_triggers(), Triggers::COMPLETE);
    }
}

#[test]
fn test_call_timer_through_scheduler() {
    let mut scheduler = linear_scheduler();
    let ticks = Rc::new(Cell::new(0));
    let counter = ticks.clone();

    let id = scheduler.call(move |_: TweenEvent, _: &TweenState| counter.set(counter.get() + 1));
    scheduler.get_mut(id).unwrap().repeat(2, 1.0);
    scheduler.add(id).unwrap();

    scheduler.update(0.5);
    assert_eq!(ticks.get(), 1);
    scheduler.update(1.0);
    assert_eq!(ticks.get(), 2);
    scheduler.update(1.0);
    assert_eq!(ticks.get(), 3);
    scheduler.update(1.0);
    assert!(scheduler.is_empty());
}

#[test]
fn test_scheduler_from_toml_config() {
    let config = TwineConfig::from_toml_str(
        r#"
        combined_attributes_limit = 2
        default_easing = "Linear"
        "#,
    )
    .unwrap();
    let mut scheduler = Scheduler::new(&config);
    let value = Rc::new(RefCell::new(vec![0.0f32, 0.0, 0.0]));
    let id = scheduler.to(value.clone(), 1.0);
    scheduler
        .get_mut(id)
        .unwrap()
        .target(&[4.0, 8.0, 12.0]);
    scheduler.add(id).unwrap();

    scheduler.update(0.5);
    assert_eq!(*value.borrow(), vec![2.0, 4.0, 0.0]);
}
