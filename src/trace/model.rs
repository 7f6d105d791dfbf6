use serde::{Deserialize, Serialize};

/// Scalar statistics recorded for one generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationStatus {
    /// Number of population members recorded for the generation.
    pub population_size: usize,
    /// Annealing temperature at this generation.
    pub temperature: f64,
    /// Cost variance across the population.
    pub variance: f64,
    /// Best cost reported by the solver, when present in the source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_solution: Option<f64>,
    /// Solver-side generation number, when present in the source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<u64>,
}

/// One candidate tour and its cost.
///
/// On the wire a member is the two-element array `[tour, solutionValue]`; the object form
/// `{"tour": [...], "solutionValue": x}` is accepted as well.
#[derive(Clone, Debug, PartialEq)]
pub struct PopulationMember {
    /// 1-based node ids in visiting order (the last node connects back to the first).
    pub tour: Vec<u32>,
    /// Tour cost, lower is better.
    pub solution_value: f64,
}

impl PopulationMember {
    /// The tour as 0-based node indices.
    pub fn zero_based_tour(&self) -> Vec<usize> {
        to_zero_based(&self.tour)
    }
}

impl Serialize for PopulationMember {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        (&self.tour, self.solution_value).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PopulationMember {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Pair(Vec<u32>, f64),
            Object {
                tour: Vec<u32>,
                #[serde(alias = "solutionValue")]
                solution_value: f64,
            },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Pair(tour, solution_value) | Repr::Object {
                tour,
                solution_value,
            } => Ok(Self {
                tour,
                solution_value,
            }),
        }
    }
}

/// One recorded iteration of the optimizer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Summary statistics.
    pub status: GenerationStatus,
    /// Members in playback order.
    pub population: Vec<PopulationMember>,
}

/// Convert 1-based node ids to 0-based indices.
///
/// Id `0` has no 0-based counterpart; it maps to `usize::MAX`, which no node ring contains, so
/// renderers reject it like any other out-of-range index.
pub fn to_zero_based(tour: &[u32]) -> Vec<usize> {
    tour.iter()
        .map(|&id| (id as usize).checked_sub(1).unwrap_or(usize::MAX))
        .collect()
}

/// Convert 0-based node indices back to 1-based node ids.
pub fn to_one_based(tour: &[usize]) -> Vec<u32> {
    tour.iter()
        .map(|&i| u32::try_from(i.saturating_add(1)).unwrap_or(u32::MAX))
        .collect()
}
