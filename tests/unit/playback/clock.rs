use super::*;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn virtual_clock_jumps_to_deadlines() {
    let mut clock = VirtualClock::new();
    assert_eq!(clock.now(), Duration::ZERO);
    assert_eq!(clock.wait_until(ms(200)), None);
    assert_eq!(clock.now(), ms(200));
    assert_eq!(clock.wait_until(ms(100)), None);
    assert_eq!(clock.now(), ms(200), "time never goes backwards");
    assert!(clock.controls_exhausted());
}

#[test]
fn virtual_clock_delivers_controls_in_time_order() {
    let mut clock = VirtualClock::with_script([
        (ms(300), Control::Stop),
        (ms(50), Control::TogglePause),
    ]);
    clock.push(ms(50), Control::SetSpeed(3));

    assert_eq!(clock.wait_until(ms(40)), None);
    assert_eq!(clock.wait_until(ms(100)), Some(Control::TogglePause));
    assert_eq!(clock.now(), ms(50));
    assert_eq!(clock.wait_until(ms(100)), Some(Control::SetSpeed(3)));
    assert_eq!(clock.wait_until(ms(100)), None);
    assert_eq!(clock.now(), ms(100));
    assert!(!clock.controls_exhausted());
    assert_eq!(clock.wait_until(ms(1000)), Some(Control::Stop));
    assert_eq!(clock.now(), ms(300));
    assert!(clock.controls_exhausted());
}

#[test]
fn realtime_clock_returns_queued_controls_early() {
    let (mut clock, tx) = RealtimeClock::new();
    tx.send(Control::SetTheme("dark".to_string())).unwrap();
    let far = clock.now() + Duration::from_secs(30);
    assert_eq!(clock.wait_until(far), Some(Control::SetTheme("dark".to_string())));
    assert!(clock.now() < far);
}

#[test]
fn realtime_clock_times_out_and_notices_disconnect() {
    let (mut clock, tx) = RealtimeClock::new();
    let deadline = clock.now() + ms(5);
    assert_eq!(clock.wait_until(deadline), None);
    assert!(clock.now() >= deadline);

    drop(tx);
    let deadline = clock.now() + ms(5);
    assert_eq!(clock.wait_until(deadline), None);
    assert!(clock.controls_exhausted());
}
