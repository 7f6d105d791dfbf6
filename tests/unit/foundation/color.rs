use super::*;

#[test]
fn parses_hex_rgb_and_rgba() {
    assert_eq!(Rgba8::from_hex("#007bff").unwrap(), Rgba8::rgb(0, 123, 255));
    assert_eq!(Rgba8::from_hex("64B5F6").unwrap(), Rgba8::rgb(100, 181, 246));
    assert_eq!(
        Rgba8::from_hex("#0000ff80").unwrap(),
        Rgba8::rgba(0, 0, 255, 128)
    );
    assert!(Rgba8::from_hex("#fff").is_err());
    assert!(Rgba8::from_hex("#gg0000").is_err());
}

#[test]
fn hex_serde_uses_string_form() {
    let c: Rgba8 = serde_json::from_str("\"#ff4444\"").unwrap();
    assert_eq!(c, Rgba8::rgb(255, 68, 68));
    assert_eq!(serde_json::to_string(&c).unwrap(), "\"#ff4444\"");

    let translucent = Rgba8::rgba(0, 0, 0, 179);
    assert_eq!(translucent.to_hex(), "#000000b3");
    assert!(serde_json::from_str::<Rgba8>("\"nope\"").is_err());
}

#[test]
fn hsl_endpoints_match_gauge_colors() {
    assert_eq!(Rgba8::from_hsl(120.0, 1.0, 0.5), Rgba8::rgb(0, 255, 0));
    assert_eq!(Rgba8::from_hsl(0.0, 1.0, 0.5), Rgba8::rgb(255, 0, 0));
    assert_eq!(Rgba8::from_hsl(60.0, 1.0, 0.5), Rgba8::rgb(255, 255, 0));
    assert_eq!(Rgba8::from_hsl(200.0, 0.0, 0.5), Rgba8::rgb(128, 128, 128));
}

#[test]
fn premultiply_scales_channels_by_alpha() {
    assert_eq!(Rgba8::rgb(10, 20, 30).premultiplied(), [10, 20, 30, 255]);
    assert_eq!(Rgba8::rgba(255, 0, 0, 128).premultiplied(), [128, 0, 0, 128]);
    assert_eq!(Rgba8::rgba(255, 255, 255, 0).premultiplied(), [0, 0, 0, 0]);
}
