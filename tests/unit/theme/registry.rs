use super::*;

#[test]
fn builtin_registry_has_three_themes() {
    let names: Vec<_> = ThemeRegistry::builtin().names().collect();
    assert_eq!(names, vec!["blue", "dark", "red"]);
    assert!(ThemeRegistry::builtin().get("green").is_none());
}

#[test]
fn default_state_is_blue() {
    let state = ThemeState::default();
    assert_eq!(state.name(), "blue");
    assert_eq!(state.current_theme().node, Rgba8::rgb(0x00, 0x7b, 0xff));
    assert_eq!(state.current_theme().best_path, Rgba8::rgb(0xff, 0x44, 0x44));
}

#[test]
fn set_theme_switches_and_rejects_unknown() {
    let mut state = ThemeState::default();
    state.set_theme("dark").unwrap();
    assert_eq!(state.name(), "dark");
    assert_eq!(state.current_theme().panel, Rgba8::rgb(0x34, 0x98, 0xdb));

    let err = state.set_theme("neon").unwrap_err();
    assert!(err.to_string().contains("neon"));
    assert_eq!(state.name(), "dark");
}

#[test]
fn path_color_wraps_by_index() {
    let palette = Palette {
        node: Rgba8::BLACK,
        best_path: Rgba8::BLACK,
        paths: vec![Rgba8::rgb(1, 0, 0), Rgba8::rgb(2, 0, 0)],
        panel: Rgba8::BLACK,
    };
    assert_eq!(palette.path_color(0).r, 1);
    assert_eq!(palette.path_color(1).r, 2);
    assert_eq!(palette.path_color(5).r, 2);

    let empty = Palette {
        paths: Vec::new(),
        ..palette
    };
    assert_eq!(empty.path_color(3), Rgba8::BLACK);

    let red = ThemeState::named("red").unwrap();
    assert_eq!(red.path_color(17), Rgba8::rgb(0xf0, 0x3e, 0x3e));
}
