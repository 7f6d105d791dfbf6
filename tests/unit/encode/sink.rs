use super::*;

fn frame(v: u8) -> FrameRGBA {
    FrameRGBA {
        width: 1,
        height: 1,
        data: vec![v, v, v, 255],
        premultiplied: true,
    }
}

#[test]
fn in_memory_sink_captures_in_order() {
    let mut sink = InMemorySink::new();
    assert!(sink.push_frame(FrameIndex(0), &frame(1)).is_err());

    let cfg = SinkConfig {
        width: 1,
        height: 1,
        fps: Fps::default(),
    };
    sink.begin(cfg).unwrap();
    sink.push_frame(FrameIndex(0), &frame(1)).unwrap();
    sink.push_frame(FrameIndex(2), &frame(2)).unwrap();
    let err = sink.push_frame(FrameIndex(2), &frame(3)).unwrap_err();
    assert!(matches!(err, TourscopeError::Encode(_)));
    sink.end().unwrap();

    assert!(sink.ended());
    assert_eq!(sink.config(), Some(cfg));
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.frames()[1].0, FrameIndex(2));
}

#[test]
fn present_log_records_times() {
    let mut log = PresentLog::new();
    log.begin(Canvas::new(1, 1).unwrap()).unwrap();
    log.present(Duration::ZERO, &frame(1)).unwrap();
    log.present(Duration::from_millis(200), &frame(2)).unwrap();
    log.end(Duration::from_millis(300)).unwrap();
    assert_eq!(
        log.times(),
        vec![Duration::ZERO, Duration::from_millis(200)]
    );
    assert_eq!(log.ended_at(), Some(Duration::from_millis(300)));
    assert!(log.supports_resize());
}
