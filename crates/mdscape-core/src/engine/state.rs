use nalgebra::DMatrix;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Why a restart stopped iterating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Termination {
    /// Relative stress improvement fell below tolerance, or stress reached zero.
    Converged,
    /// The iteration budget ran out first.
    MaxIterations,
    /// Cancellation was requested at an iteration boundary.
    Cancelled,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Termination::Converged => "converged",
            Termination::MaxIterations => "max-iterations",
            Termination::Cancelled => "cancelled",
        };
        f.write_str(text)
    }
}

/// Final state of a single restart.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub restart: usize,
    pub seed: u64,
    pub coordinates: DMatrix<f64>,
    pub stress: f64,
    pub iterations: usize,
    pub termination: Termination,
}

// Ordering ranks candidates from best to worst: lowest stress, then fewest iterations,
// then earliest restart.
impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.stress
            .total_cmp(&other.stress)
            .then(self.iterations.cmp(&other.iterations))
            .then(self.restart.cmp(&other.restart))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(restart: usize, stress: f64, iterations: usize) -> Candidate {
        Candidate {
            restart,
            seed: 0,
            coordinates: DMatrix::zeros(1, 1),
            stress,
            iterations,
            termination: Termination::Converged,
        }
    }

    #[test]
    fn lowest_stress_wins() {
        let best = [candidate(0, 2.0, 5), candidate(1, 1.0, 50), candidate(2, 3.0, 1)]
            .into_iter()
            .min()
            .unwrap();
        assert_eq!(best.restart, 1);
    }

    #[test]
    fn ties_break_on_iterations_then_restart_index() {
        let best = [candidate(0, 1.0, 9), candidate(1, 1.0, 4), candidate(2, 1.0, 4)]
            .into_iter()
            .min()
            .unwrap();
        assert_eq!(best.restart, 1);
    }

    #[test]
    fn termination_displays_kebab_case() {
        assert_eq!(Termination::MaxIterations.to_string(), "max-iterations");
    }
}
