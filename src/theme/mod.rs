//! Color palettes shared by the graph surface and the stats panel.
//!
//! The palette table is immutable and process-wide ([`ThemeRegistry::builtin`]); the only mutable
//! piece is the current selection, held in an explicit [`ThemeState`] value.

pub(crate) mod registry;
