use super::*;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn idle_scheduler_does_nothing_before_period() {
    let t0 = Instant::now();
    let mut a = AutoSave::new_at(t0);
    assert_eq!(a.poll_at(t0 + ms(9_999)), None);
    assert!(!a.is_pending());
}

#[test]
fn periodic_flush_every_ten_seconds() {
    let t0 = Instant::now();
    let mut a = AutoSave::new_at(t0);
    assert_eq!(a.poll_at(t0 + ms(10_000)), Some(FlushReason::Periodic));
    assert_eq!(a.poll_at(t0 + ms(15_000)), None);
    assert_eq!(a.poll_at(t0 + ms(20_000)), Some(FlushReason::Periodic));
}

#[test]
fn debounced_flush_after_one_second_quiet() {
    let t0 = Instant::now();
    let mut a = AutoSave::new_at(t0);
    a.touch_at(t0 + ms(100));
    assert!(a.is_pending());
    assert_eq!(a.poll_at(t0 + ms(1_099)), None);
    assert_eq!(a.poll_at(t0 + ms(1_100)), Some(FlushReason::Debounced));
    assert!(!a.is_pending());
    assert_eq!(a.poll_at(t0 + ms(1_200)), None);
}

#[test]
fn each_edit_restarts_the_debounce() {
    let t0 = Instant::now();
    let mut a = AutoSave::new_at(t0);
    a.touch_at(t0);
    a.touch_at(t0 + ms(800));
    assert_eq!(a.poll_at(t0 + ms(1_500)), None);
    assert_eq!(a.poll_at(t0 + ms(1_800)), Some(FlushReason::Debounced));
}

#[test]
fn flush_resets_periodic_clock() {
    let t0 = Instant::now();
    let mut a = AutoSave::new_at(t0);
    a.touch_at(t0 + ms(8_000));
    assert_eq!(a.poll_at(t0 + ms(9_000)), Some(FlushReason::Debounced));
    assert_eq!(a.poll_at(t0 + ms(10_000)), None);
    assert_eq!(a.poll_at(t0 + ms(19_000)), Some(FlushReason::Periodic));
}

#[test]
fn external_flush_clears_pending() {
    let t0 = Instant::now();
    let mut a = AutoSave::with_intervals_at(ms(50), ms(500), t0);
    a.touch_at(t0);
    a.flushed_at(t0 + ms(10));
    assert_eq!(a.poll_at(t0 + ms(100)), None);
}
