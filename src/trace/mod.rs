//! Trace data model and the trace store.

pub(crate) mod model;
pub(crate) mod store;
