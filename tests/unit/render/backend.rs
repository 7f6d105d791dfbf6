use super::*;

const BG: Rgba8 = Rgba8::WHITE;
const RED: Rgba8 = Rgba8::rgb(255, 0, 0);

fn painter(w: u32, h: u32) -> Painter {
    Painter::new(Canvas::new(w, h).unwrap()).unwrap()
}

#[test]
fn begin_frame_clears_to_background() {
    let mut p = painter(16, 8);
    p.begin_frame(Rgba8::rgb(10, 20, 30));
    let frame = p.finish();
    assert_eq!(frame.width, 16);
    assert_eq!(frame.height, 8);
    assert_eq!(frame.data.len(), 16 * 8 * 4);
    assert!(frame.premultiplied);
    assert_eq!(frame.pixel(0, 0), Some([10, 20, 30, 255]));
    assert_eq!(frame.pixel(15, 7), Some([10, 20, 30, 255]));
    assert_eq!(frame.pixel(16, 0), None);
}

#[test]
fn frames_do_not_accumulate_between_begin_calls() {
    let mut p = painter(8, 8);
    p.begin_frame(BG);
    p.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0), RED);
    let _ = p.finish();
    p.begin_frame(BG);
    let frame = p.finish();
    assert_eq!(frame.pixel(4, 4), Some([255, 255, 255, 255]));
}

#[test]
fn fill_rect_and_circle_cover_their_interior() {
    let mut p = painter(40, 40);
    p.begin_frame(BG);
    p.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), RED);
    p.fill_circle(Point::new(30.0, 30.0), 6.0, Rgba8::rgb(0, 0, 255));
    let frame = p.finish();
    assert_eq!(frame.pixel(5, 5), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(30, 30), Some([0, 0, 255, 255]));
    assert_eq!(frame.pixel(20, 5), Some([255, 255, 255, 255]));
}

#[test]
fn dashed_stroke_leaves_gaps() {
    let mut p = painter(40, 20);
    p.begin_frame(BG);
    let mut line = BezPath::new();
    line.move_to((0.0, 10.0));
    line.line_to((40.0, 10.0));
    p.stroke_path(&line, RED, &LineStyle::dashed(2.0, [5.0, 5.0]));
    let frame = p.finish();
    assert_eq!(frame.pixel(2, 10), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(7, 10), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(12, 9), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(2, 15), Some([255, 255, 255, 255]));
}

#[test]
fn zero_width_stroke_draws_nothing() {
    let mut p = painter(10, 10);
    p.begin_frame(BG);
    p.stroke_rect(Rect::new(1.0, 1.0, 9.0, 9.0), RED, &LineStyle::solid(0.0));
    let frame = p.finish();
    assert!(frame.data.chunks_exact(4).all(|px| px == [255, 255, 255, 255]));
}

#[test]
fn glow_is_solid_in_the_core_and_clear_outside() {
    let mut p = painter(60, 60);
    p.begin_frame(BG);
    p.radial_glow(Point::new(30.0, 30.0), RED, 5, 10, 25).unwrap();
    let frame = p.finish();
    assert_eq!(frame.pixel(30, 30), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(30, 52), Some([255, 255, 255, 255]));
    let mid = frame.pixel(40, 30).unwrap();
    assert_eq!(mid[0], 255);
    assert!(mid[1] > 0 && mid[1] < 255, "{mid:?}");
}

#[test]
fn text_without_font_is_a_no_op() {
    let mut p = painter(20, 20);
    assert!(!p.has_font());
    p.begin_frame(BG);
    p.text(
        "12",
        Point::new(10.0, 10.0),
        12.0,
        RED,
        TextAlign::Center,
        TextBaseline::Middle,
    )
    .unwrap();
    let frame = p.finish();
    assert!(frame.data.chunks_exact(4).all(|px| px == [255, 255, 255, 255]));
}

#[test]
fn invalid_font_bytes_are_rejected() {
    let mut p = painter(4, 4);
    assert!(p.set_font(b"not a font".to_vec()).is_err());
    assert!(!p.has_font());
}

#[test]
fn resize_reallocates_the_surface() {
    let mut p = painter(8, 8);
    p.resize(Canvas::new(12, 6).unwrap()).unwrap();
    assert_eq!(p.canvas(), Canvas::new(12, 6).unwrap());
    p.begin_frame(BG);
    let frame = p.finish();
    assert_eq!((frame.width, frame.height), (12, 6));
    assert!(p.resize(Canvas { width: 0, height: 4 }).is_err());
    assert!(Painter::new(Canvas { width: 70_000, height: 4 }).is_err());
}

#[test]
fn straight_alpha_conversion() {
    let frame = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![128, 0, 0, 128, 0, 0, 0, 0],
        premultiplied: true,
    };
    assert_eq!(frame.to_straight_rgba8(), vec![255, 0, 0, 128, 0, 0, 0, 0]);
    let straight = FrameRGBA {
        premultiplied: false,
        ..frame.clone()
    };
    assert_eq!(straight.to_straight_rgba8(), frame.data);
}
