use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::foundation::color::Rgba8;
use crate::foundation::error::{TourscopeError, TourscopeResult};

/// Theme selected when nothing else is requested.
pub const DEFAULT_THEME: &str = "blue";

/// Colors used to draw one frame.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Palette {
    /// Node fill and glow color.
    pub node: Rgba8,
    /// Stroke color of the best-known tour.
    pub best_path: Rgba8,
    /// Stroke colors of the current tour, picked by index.
    pub paths: Vec<Rgba8>,
    /// Accent color of the stats panel.
    pub panel: Rgba8,
}

impl Palette {
    /// Color for a current-tour stroke keyed by `index` (wraps around `paths`).
    ///
    /// Falls back to the node color when the palette has no path colors.
    pub fn path_color(&self, index: usize) -> Rgba8 {
        if self.paths.is_empty() {
            return self.node;
        }
        self.paths[index % self.paths.len()]
    }
}

/// Immutable table of named palettes.
#[derive(Debug)]
pub struct ThemeRegistry {
    themes: BTreeMap<&'static str, Palette>,
}

impl ThemeRegistry {
    /// The process-wide built-in registry (`blue`, `red`, `dark`).
    pub fn builtin() -> &'static ThemeRegistry {
        static REGISTRY: OnceLock<ThemeRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let mut themes = BTreeMap::new();
            themes.insert(
                "blue",
                Palette {
                    node: Rgba8::rgb(0x00, 0x7b, 0xff),
                    best_path: Rgba8::rgb(0xff, 0x44, 0x44),
                    paths: vec![Rgba8::rgb(0x64, 0xb5, 0xf6)],
                    panel: Rgba8::rgb(0x00, 0x7b, 0xff),
                },
            );
            themes.insert(
                "red",
                Palette {
                    node: Rgba8::rgb(0xdc, 0x35, 0x45),
                    best_path: Rgba8::rgb(0x00, 0x7b, 0xff),
                    paths: vec![Rgba8::rgb(0xf0, 0x3e, 0x3e)],
                    panel: Rgba8::rgb(0xdc, 0x35, 0x45),
                },
            );
            themes.insert(
                "dark",
                Palette {
                    node: Rgba8::rgb(0x2c, 0x3e, 0x50),
                    best_path: Rgba8::rgb(0xe7, 0x4c, 0x3c),
                    paths: vec![Rgba8::rgb(0x34, 0x3a, 0x40)],
                    panel: Rgba8::rgb(0x34, 0x98, 0xdb),
                },
            );
            ThemeRegistry { themes }
        })
    }

    /// Look up a palette by name.
    pub fn get(&self, name: &str) -> Option<&Palette> {
        self.themes.get(name)
    }

    /// Registered theme names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.themes.keys().copied()
    }
}

/// Current theme selection.
#[derive(Clone, Debug)]
pub struct ThemeState {
    name: &'static str,
    registry: &'static ThemeRegistry,
}

impl Default for ThemeState {
    fn default() -> Self {
        Self {
            name: DEFAULT_THEME,
            registry: ThemeRegistry::builtin(),
        }
    }
}

impl ThemeState {
    /// Selection starting at `name`.
    pub fn named(name: &str) -> TourscopeResult<Self> {
        let mut state = Self::default();
        state.set_theme(name)?;
        Ok(state)
    }

    /// Name of the current theme.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Switch to the theme called `name`; unknown names leave the selection unchanged.
    pub fn set_theme(&mut self, name: &str) -> TourscopeResult<()> {
        let Some((key, _)) = self.registry.themes.get_key_value(name) else {
            let known: Vec<_> = self.registry.names().collect();
            return Err(TourscopeError::validation(format!(
                "unknown theme \"{name}\" (known: {})",
                known.join(", ")
            )));
        };
        self.name = key;
        Ok(())
    }

    /// Palette of the current theme.
    pub fn current_theme(&self) -> &'static Palette {
        &self.registry.themes[self.name]
    }

    /// Current-tour stroke color for `index`.
    pub fn path_color(&self, index: usize) -> Rgba8 {
        self.current_theme().path_color(index)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/theme/registry.rs"]
mod tests;
