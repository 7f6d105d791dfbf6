use super::*;

fn frame(w: u32, h: u32, px: [u8; 4], premultiplied: bool) -> FrameRGBA {
    FrameRGBA {
        width: w,
        height: h,
        data: px.repeat((w * h) as usize),
        premultiplied,
    }
}

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::default(),
    }
}

fn out_path(name: &str) -> PathBuf {
    let path = PathBuf::from("target").join("ffmpeg_sink_tests").join(name);
    let _ = std::fs::remove_file(&path);
    path
}

#[test]
fn premultiplied_and_straight_pixels_flatten_alike() {
    let bg = Rgba8::rgb(10, 20, 30);
    let mut premul = vec![0; 3];
    let mut straight = vec![0; 3];
    flatten_to_rgb(&mut premul, &frame(1, 1, [128, 0, 0, 128], true), bg).unwrap();
    flatten_to_rgb(&mut straight, &frame(1, 1, [255, 0, 0, 128], false), bg).unwrap();
    assert_eq!(premul, straight);
    assert_eq!(premul, vec![128 + 5, 10, 15]);
}

#[test]
fn transparent_shows_background_and_opaque_passes_through() {
    let bg = Rgba8::rgb(10, 20, 30);
    let mut out = vec![0; 6];
    let two = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![0, 0, 0, 0, 1, 2, 3, 255],
        premultiplied: true,
    };
    flatten_to_rgb(&mut out, &two, bg).unwrap();
    assert_eq!(out, vec![10, 20, 30, 1, 2, 3]);
}

#[test]
fn mismatched_buffer_is_an_encode_error() {
    let mut out = vec![0; 6];
    let err = flatten_to_rgb(&mut out, &frame(1, 1, [0, 0, 0, 255], true), Rgba8::BLACK)
        .unwrap_err();
    assert!(matches!(err, TourscopeError::Encode(_)));
}

#[test]
fn odd_or_empty_sizes_are_rejected_before_spawning() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(out_path("never.mp4")));
    let err = sink.begin(cfg(641, 480)).unwrap_err();
    assert!(err.to_string().contains("even"));
    assert!(sink.begin(cfg(0, 480)).is_err());
    assert!(
        sink.begin(SinkConfig {
            fps: Fps { num: 30, den: 0 },
            ..cfg(640, 480)
        })
        .is_err()
    );
    assert!(
        sink.push_frame(FrameIndex(0), &frame(2, 2, [0; 4], true))
            .is_err()
    );
    assert!(sink.end().is_err());
}

#[test]
fn refuses_to_overwrite_when_asked_not_to() {
    let path = out_path("existing.mp4");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"keep").unwrap();
    let mut opts = FfmpegSinkOpts::new(&path);
    opts.overwrite = false;
    let err = FfmpegSink::new(opts).begin(cfg(4, 4)).unwrap_err();
    assert!(matches!(err, TourscopeError::Validation(_)));
    assert_eq!(std::fs::read(&path).unwrap(), b"keep");
}

#[test]
fn encoder_reads_rgb24_at_the_sink_rate() {
    let opts = FfmpegSinkOpts::new("out/run.mp4");
    let args: Vec<String> = encoder_args(&opts, Canvas::new(64, 48).unwrap(), Fps::new(25, 2).unwrap())
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    let pos = |s: &str| args.iter().position(|a| a == s).unwrap();
    assert_eq!(args[0], "-y");
    assert_eq!(args[pos("-pix_fmt") + 1], "rgb24");
    assert_eq!(args[pos("-s") + 1], "64x48");
    assert_eq!(args[pos("-r") + 1], "25/2");
    assert!(pos("-r") < pos("-i"));
    assert_eq!(args.last().map(String::as_str), Some("out/run.mp4"));
}

#[test]
fn frames_stream_through_ffmpeg_in_order() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let path = out_path("ordered.mp4");
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&path));
    sink.begin(cfg(16, 16)).unwrap();
    sink.push_frame(FrameIndex(0), &frame(16, 16, [0, 0, 255, 255], true))
        .unwrap();
    sink.push_frame(FrameIndex(1), &frame(16, 16, [0, 0, 255, 128], false))
        .unwrap();
    assert!(
        sink.push_frame(FrameIndex(1), &frame(16, 16, [0; 4], true))
            .is_err()
    );
    assert!(
        sink.push_frame(FrameIndex(2), &frame(8, 8, [0; 4], true))
            .is_err()
    );
    assert_eq!(sink.frames_written(), 2);
    sink.end().unwrap();
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}

#[test]
fn dropping_an_unfinished_sink_finalizes_the_encoder() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let path = out_path("dropped.mp4");
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&path));
    sink.begin(cfg(16, 16)).unwrap();
    for i in 0..3 {
        sink.push_frame(FrameIndex(i), &frame(16, 16, [255, 0, 0, 255], true))
            .unwrap();
    }
    drop(sink);
    // The child has been waited on, so the file is complete once drop returns.
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}
