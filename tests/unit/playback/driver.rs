use super::*;
use crate::encode::sink::PresentLog;
use crate::foundation::color::Rgba8;
use crate::playback::clock::VirtualClock;
use crate::theme::registry::ThemeState;
use crate::trace::store::{Trace, TraceValidation};

const D: Duration = Duration::from_millis(200);

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn two_generation_store() -> TraceStore {
    let json = r#"[
        {"status": {"population_size": 2, "temperature": 1.3, "variance": 4.0},
         "population": [[[1, 2, 3], 10], [[3, 1, 2], 5]]},
        {"status": {"population_size": 1, "temperature": 1.1, "variance": 1.0},
         "population": [[[2, 3, 1], 7]]}
    ]"#;
    TraceStore::with_trace(Trace::from_json_str(json, TraceValidation::Strict).unwrap())
}

fn visualizer() -> Visualizer {
    Visualizer::new(
        3,
        Canvas::new(120, 120).unwrap(),
        ThemeState::default(),
        Rgba8::WHITE,
    )
    .unwrap()
}

fn run_with(clock: VirtualClock, speed: Option<i32>) -> (PlaybackSummary, PresentLog) {
    let mut store = two_generation_store();
    let mut vis = visualizer();
    let mut log = PresentLog::new();
    let mut driver = PlaybackDriver::new(clock).with_speed(speed);
    let summary = driver.run(&mut store, &mut vis, &mut log, 0).unwrap();
    (summary, log)
}

#[test]
fn presents_follow_the_schedule() {
    let (summary, log) = run_with(VirtualClock::new(), None);

    assert_eq!(log.times(), vec![Duration::ZERO, Duration::ZERO, D, 3 * D]);
    assert_eq!(log.ended_at(), Some(5 * D));
    assert_eq!(log.canvas(), Some(Canvas::new(120, 120).unwrap()));
    assert_eq!(
        summary,
        PlaybackSummary {
            steps_shown: 3,
            generations_completed: 2,
            best_value: Some(5.0),
            final_state: PlaybackState::Finished,
            elapsed: 5 * D,
            completed: true,
            frames_presented: 4,
        }
    );
}

#[test]
fn pause_holds_the_step_until_resume() {
    let clock = VirtualClock::with_script([
        (ms(250), Control::TogglePause),
        (ms(1000), Control::TogglePause),
    ]);
    let (summary, log) = run_with(clock, None);

    assert_eq!(
        log.times(),
        vec![Duration::ZERO, Duration::ZERO, D, ms(1200)]
    );
    assert_eq!(summary.steps_shown, 3);
    assert!(summary.completed);
    assert_eq!(summary.elapsed, ms(1600));
}

#[test]
fn paused_run_without_further_controls_is_stopped() {
    let clock = VirtualClock::with_script([(ms(250), Control::TogglePause)]);
    let (summary, log) = run_with(clock, None);

    assert_eq!(log.times(), vec![Duration::ZERO, Duration::ZERO, D]);
    assert_eq!(summary.final_state, PlaybackState::Stopped);
    assert!(!summary.completed);
    assert_eq!(summary.steps_shown, 2);
    assert!(log.ended_at().is_some());
}

#[test]
fn stop_control_ends_the_run() {
    let clock = VirtualClock::with_script([(ms(250), Control::Stop)]);
    let (summary, log) = run_with(clock, None);

    assert_eq!(log.ended_at(), Some(ms(250)));
    assert_eq!(summary.final_state, PlaybackState::Stopped);
    assert_eq!(summary.steps_shown, 2);
    assert_eq!(summary.best_value, Some(5.0));
    assert_eq!(summary.generations_completed, 0);
}

#[test]
fn speed_change_applies_from_the_next_schedule() {
    let clock = VirtualClock::with_script([(ms(100), Control::SetSpeed(200))]);
    let (summary, log) = run_with(clock, None);

    assert_eq!(
        log.times(),
        vec![Duration::ZERO, Duration::ZERO, D, ms(210)]
    );
    assert_eq!(summary.elapsed, ms(220));
}

#[test]
fn initial_speed_level_sets_the_delay() {
    let (summary, log) = run_with(VirtualClock::new(), Some(0));
    assert_eq!(
        log.times(),
        vec![Duration::ZERO, Duration::ZERO, ms(500), ms(1500)]
    );
    assert_eq!(summary.elapsed, ms(2500));
}

#[test]
fn theme_and_resize_controls_redraw() {
    let clock = VirtualClock::with_script([
        (ms(100), Control::SetTheme("red".into())),
        (ms(150), Control::SetTheme("neon".into())),
        (
            ms(300),
            Control::Resize {
                width: 160,
                height: 100,
            },
        ),
    ]);
    let (summary, log) = run_with(clock, None);

    assert_eq!(
        log.times(),
        vec![Duration::ZERO, Duration::ZERO, ms(100), D, ms(300), 3 * D]
    );
    assert_eq!(summary.frames_presented, 6);
    let (_, resized) = &log.presents()[4];
    assert_eq!((resized.width, resized.height), (160, 100));
    let (_, last) = &log.presents()[5];
    assert_eq!((last.width, last.height), (160, 100));
}

#[test]
fn run_without_a_trace_fails() {
    let mut store = TraceStore::new();
    let mut vis = visualizer();
    let mut log = PresentLog::new();
    let mut driver = PlaybackDriver::new(VirtualClock::new());
    assert!(driver.run(&mut store, &mut vis, &mut log, 0).is_err());
    assert!(log.presents().is_empty());
}

#[test]
fn snapshot_replays_best_up_to_the_member() {
    let store = two_generation_store();
    let mut vis = visualizer();

    let frame = render_snapshot(&store, &mut vis, 0, 0).unwrap();
    assert_eq!((frame.width, frame.height), (120, 120));
    assert_eq!(vis.last_panel().unwrap().best_solution, Some(10.0));

    render_snapshot(&store, &mut vis, 1, 0).unwrap();
    let panel = vis.last_panel().unwrap();
    assert_eq!(panel.best_solution, Some(5.0));
    assert_eq!(panel.current_solution, 7.0);
    assert_eq!(vis.graph().ring().len(), 3);
    assert_eq!(store.best().value(), None);
}

#[test]
fn snapshot_rejects_positions_past_the_end() {
    let store = two_generation_store();
    let mut vis = visualizer();
    assert!(matches!(
        render_snapshot(&store, &mut vis, 2, 0),
        Err(TourscopeError::Validation(_))
    ));
    assert!(matches!(
        render_snapshot(&store, &mut vis, 1, 1),
        Err(TourscopeError::Validation(_))
    ));
}
