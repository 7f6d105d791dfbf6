use std::path::{Path, PathBuf};

use crate::foundation::error::{TourscopeError, TourscopeResult};
use crate::trace::model::{GenerationRecord, to_zero_based};

/// Base name used when the caller does not name a trace.
pub const DEFAULT_TRACE_NAME: &str = "clu_20_1";

/// How strictly a trace is checked against the tour invariant at load time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceValidation {
    /// Every tour must be a permutation of `1..=num_nodes` with a finite cost.
    #[default]
    Strict,
    /// Violations are logged; bad tours are left to the per-frame render guard.
    Lenient,
}

/// An immutable, fully materialized trace.
#[derive(Clone, Debug, PartialEq)]
pub struct Trace {
    generations: Vec<GenerationRecord>,
    num_nodes: usize,
}

impl Trace {
    /// Parse a trace from a JSON document.
    pub fn from_json_str(json: &str, validation: TraceValidation) -> TourscopeResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| TourscopeError::data_load(format!("trace is not valid JSON: {e}")))?;
        Self::from_json_value(value, validation)
    }

    /// Build a trace from an already parsed JSON value.
    pub fn from_json_value(
        value: serde_json::Value,
        validation: TraceValidation,
    ) -> TourscopeResult<Self> {
        check_leading_member(&value)?;
        let generations: Vec<GenerationRecord> = serde_json::from_value(value)
            .map_err(|e| TourscopeError::data_shape(format!("malformed generation record: {e}")))?;
        Self::from_generations(generations, validation)
    }

    /// Build a trace from in-memory generation records.
    pub fn from_generations(
        generations: Vec<GenerationRecord>,
        validation: TraceValidation,
    ) -> TourscopeResult<Self> {
        let num_nodes = generations
            .first()
            .and_then(|g| g.population.first())
            .map(|m| m.tour.len())
            .ok_or_else(|| {
                TourscopeError::data_shape("first generation has no population members")
            })?;
        if num_nodes == 0 {
            return Err(TourscopeError::data_shape(
                "first population member has an empty tour",
            ));
        }

        let trace = Self {
            generations,
            num_nodes,
        };
        let problems = trace.invariant_violations();
        if let Some(first) = problems.first() {
            match validation {
                TraceValidation::Strict => {
                    return Err(TourscopeError::data_shape(format!(
                        "{} invalid population member(s); first: {first}",
                        problems.len()
                    )));
                }
                TraceValidation::Lenient => {
                    tracing::warn!(
                        count = problems.len(),
                        first = %first,
                        "trace violates the tour invariant; continuing leniently"
                    );
                }
            }
        }
        Ok(trace)
    }

    /// All generations in playback order.
    pub fn generations(&self) -> &[GenerationRecord] {
        &self.generations
    }

    /// Generation at `index`, or `None` past the end.
    pub fn generation(&self, index: usize) -> Option<&GenerationRecord> {
        self.generations.get(index)
    }

    /// Number of generations.
    pub fn len(&self) -> usize {
        self.generations.len()
    }

    /// Always `false` for a loaded trace; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    /// Node count, taken from the first member of generation 0.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Total number of population members across all generations.
    pub fn total_steps(&self) -> usize {
        self.generations.iter().map(|g| g.population.len()).sum()
    }

    /// Lowest solution value anywhere in the trace.
    pub fn min_solution_value(&self) -> Option<f64> {
        self.generations
            .iter()
            .flat_map(|g| g.population.iter())
            .map(|m| m.solution_value)
            .filter(|v| v.is_finite())
            .min_by(f64::total_cmp)
    }

    fn invariant_violations(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut seen = vec![false; self.num_nodes];
        for (gi, generation) in self.generations.iter().enumerate() {
            for (mi, member) in generation.population.iter().enumerate() {
                if !member.solution_value.is_finite() {
                    out.push(format!(
                        "generation {gi} member {mi}: solution value {} is not finite",
                        member.solution_value
                    ));
                }
                if member.tour.len() != self.num_nodes {
                    out.push(format!(
                        "generation {gi} member {mi}: tour has {} nodes, expected {}",
                        member.tour.len(),
                        self.num_nodes
                    ));
                    continue;
                }
                seen.fill(false);
                for &id in &member.tour {
                    let idx = id as usize;
                    if idx == 0 || idx > self.num_nodes {
                        out.push(format!(
                            "generation {gi} member {mi}: node id {id} outside 1..={}",
                            self.num_nodes
                        ));
                        break;
                    }
                    if std::mem::replace(&mut seen[idx - 1], true) {
                        out.push(format!(
                            "generation {gi} member {mi}: node id {id} visited twice"
                        ));
                        break;
                    }
                }
            }
        }
        out
    }
}

fn check_leading_member(value: &serde_json::Value) -> TourscopeResult<()> {
    let generations = value
        .as_array()
        .ok_or_else(|| TourscopeError::data_shape("trace must be a JSON array of generations"))?;
    let first = generations
        .first()
        .ok_or_else(|| TourscopeError::data_shape("trace contains no generations"))?;
    let member = first
        .get("population")
        .and_then(|p| p.as_array())
        .and_then(|p| p.first())
        .ok_or_else(|| TourscopeError::data_shape("first generation has no population"))?;
    let tour = match member {
        serde_json::Value::Array(pair) => pair.first(),
        serde_json::Value::Object(obj) => obj.get("tour"),
        _ => None,
    };
    if !tour.is_some_and(|t| t.is_array()) {
        return Err(TourscopeError::data_shape(
            "first population member is missing its tour",
        ));
    }
    Ok(())
}

/// Lowest-cost tour observed so far during playback.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BestKnown {
    value: Option<f64>,
    tour: Vec<usize>,
}

impl BestKnown {
    /// Best solution value, `None` until the first member is seen.
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Best tour as 0-based node indices; empty until the first member is seen.
    pub fn tour(&self) -> &[usize] {
        &self.tour
    }

    fn offer(&mut self, value: f64, tour_one_based: &[u32]) -> bool {
        if value.is_nan() {
            return false;
        }
        let improves = match self.value {
            None => true,
            Some(best) => value < best,
        };
        if improves {
            self.value = Some(value);
            self.tour = to_zero_based(tour_one_based);
        }
        improves
    }
}

/// Owner of the loaded trace and of the best-known state.
///
/// All best-state updates go through [`TraceStore::update_best`].
#[derive(Debug, Default)]
pub struct TraceStore {
    trace: Option<Trace>,
    best: BestKnown,
    source: Option<PathBuf>,
}

impl TraceStore {
    /// Empty store with no trace loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `trace`.
    pub fn with_trace(trace: Trace) -> Self {
        let mut store = Self::new();
        store.replace(trace, None);
        store
    }

    /// Load a trace file, replacing the current trace and resetting the best-known state.
    ///
    /// On failure the store is left untouched.
    #[tracing::instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load(
        &mut self,
        path: impl AsRef<Path>,
        validation: TraceValidation,
    ) -> TourscopeResult<&Trace> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            TourscopeError::data_load(format!("failed to read trace '{}': {e}", path.display()))
        })?;
        let trace = Trace::from_json_str(&json, validation)?;
        tracing::info!(
            generations = trace.len(),
            nodes = trace.num_nodes(),
            steps = trace.total_steps(),
            "trace loaded"
        );
        Ok(self.replace(trace, Some(path.to_path_buf())))
    }

    /// Install an already-built trace, resetting the best-known state.
    pub fn replace(&mut self, trace: Trace, source: Option<PathBuf>) -> &Trace {
        self.best = BestKnown::default();
        self.source = source;
        self.trace.insert(trace)
    }

    /// The loaded trace, if any.
    pub fn trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }

    /// Path of the loaded trace, when it came from a file.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Generation at `index`; `None` signals end of trace (or nothing loaded).
    pub fn generation(&self, index: usize) -> Option<&GenerationRecord> {
        self.trace.as_ref()?.generation(index)
    }

    /// Number of generations in the loaded trace (0 when empty).
    pub fn total_generations(&self) -> usize {
        self.trace.as_ref().map_or(0, Trace::len)
    }

    /// Node count of the loaded trace (0 when empty).
    pub fn num_nodes(&self) -> usize {
        self.trace.as_ref().map_or(0, Trace::num_nodes)
    }

    /// Offer a visited member to the best-known state.
    ///
    /// The best is replaced only on strict improvement (or when nothing is known yet); returns
    /// whether it was replaced. NaN values are never accepted.
    pub fn update_best(&mut self, solution_value: f64, tour_one_based: &[u32]) -> bool {
        self.best.offer(solution_value, tour_one_based)
    }

    /// Current best-known state.
    pub fn best(&self) -> &BestKnown {
        &self.best
    }
}

/// Resolve a user-supplied trace base name against `data_dir`.
///
/// `None` or a blank name selects [`DEFAULT_TRACE_NAME`]; a name without extension gets `.json`.
pub fn resolve_trace_path(data_dir: &Path, name: Option<&str>) -> PathBuf {
    let name = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_TRACE_NAME);
    let mut path = data_dir.join(name);
    if path.extension().is_none() {
        path.set_extension("json");
    }
    path
}

#[cfg(test)]
#[path = "../../tests/unit/trace/store.rs"]
mod tests;
