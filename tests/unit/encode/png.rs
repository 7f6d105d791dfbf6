use super::*;
use crate::foundation::core::Fps;

fn out_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("png_sink_tests").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn frame(w: u32, h: u32, px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: w,
        height: h,
        data: px.repeat((w * h) as usize),
        premultiplied: true,
    }
}

#[test]
fn write_png_unpremultiplies() {
    let path = out_dir("single").join("nested").join("half.png");
    write_png(&path, &frame(2, 2, [128, 0, 0, 128])).unwrap();
    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (2, 2));
    assert_eq!(img.get_pixel(1, 1).0, [255, 0, 0, 128]);
}

#[test]
fn png_sequence_numbers_frames() {
    let dir = out_dir("sequence");
    let mut sink = PngSequenceSink::new(&dir);
    sink.begin(SinkConfig {
        width: 3,
        height: 2,
        fps: Fps::default(),
    })
    .unwrap();
    sink.push_frame(FrameIndex(0), &frame(3, 2, [0, 0, 255, 255]))
        .unwrap();
    sink.push_frame(FrameIndex(1), &frame(3, 2, [0, 255, 0, 255]))
        .unwrap();
    assert!(
        sink.push_frame(FrameIndex(1), &frame(3, 2, [0, 0, 0, 255]))
            .is_err()
    );
    assert!(
        sink.push_frame(FrameIndex(2), &frame(4, 2, [0, 0, 0, 255]))
            .is_err()
    );
    sink.end().unwrap();

    assert_eq!(sink.written(), 2);
    assert!(dir.join("frame_000000.png").is_file());
    let second = image::open(dir.join("frame_000001.png")).unwrap().to_rgba8();
    assert_eq!(second.get_pixel(0, 0).0, [0, 255, 0, 255]);
}

#[test]
fn preview_file_is_overwritten_and_resizable() {
    let path = out_dir("preview").join("live.png");
    let mut preview = PreviewFile::new(&path);
    preview.begin(Canvas::new(2, 2).unwrap()).unwrap();
    preview
        .present(Duration::ZERO, &frame(2, 2, [255, 0, 0, 255]))
        .unwrap();
    preview
        .present(Duration::from_millis(200), &frame(4, 3, [0, 0, 255, 255]))
        .unwrap();
    preview.end(Duration::from_millis(300)).unwrap();

    assert!(preview.supports_resize());
    assert_eq!(preview.presents(), 2);
    let img = image::open(preview.path()).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (4, 3));
    assert_eq!(img.get_pixel(3, 2).0, [0, 0, 255, 255]);
    assert!(!path.with_extension("png.tmp").exists());
}
