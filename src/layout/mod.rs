//! Node ring layout.

pub(crate) mod ring;
