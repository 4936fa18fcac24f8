//! Iteration driver.

use crate::equation::{Equation, Resolution};

use super::Scallop;

/// Result of one equation level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The level found no equation.
    Missing,
    /// The best equation was resolved only in part, or not at all.
    Partial,
    /// The best equation was fully resolved or rerouted.
    Resolved,
}

impl Scallop {
    /// Alternate trivial-vertex passes with equation levels until no level
    /// fully resolves an equation. Returns the number of rounds run.
    pub fn iterate(&mut self) -> usize {
        let mut levels = vec![0, 1, 2];
        if self.cfg.use_pair_equations {
            levels.push(3);
        }
        self.log_round();
        let mut rounds = 0;
        while rounds < self.cfg.max_iterations {
            rounds += 1;
            if self.decompose_trivial_vertices() {
                self.log_round();
                continue;
            }
            let progressed = levels
                .iter()
                .any(|&level| self.decompose_with_equations(level) == Outcome::Resolved);
            if !progressed {
                return rounds;
            }
            self.log_round();
        }
        tracing::warn!(name = %self.name, rounds, "iteration limit reached");
        rounds
    }

    /// Identify equations at `level` and resolve the best one.
    pub fn decompose_with_equations(&mut self, level: usize) -> Outcome {
        let mut eqns = match level {
            0 => self.identify_equations0(),
            1 => self.identify_equations1(),
            2 => self.identify_equations2(),
            3 => self.identify_equations3(),
            _ => panic!("no equation level {level}"),
        };
        if eqns.is_empty() {
            return Outcome::Missing;
        }
        eqns.sort_by(Equation::cmp2);
        tracing::debug!(level, count = eqns.len(), "equations");
        for (i, eqn) in eqns.iter().enumerate() {
            tracing::trace!(" {}", eqn.render(i));
        }

        let mut best = eqns.swap_remove(0);
        if best.f == Resolution::Rerouted {
            return Outcome::Resolved;
        }
        self.resolve_equation(&mut best);
        if best.f == Resolution::Resolved {
            Outcome::Resolved
        } else {
            Outcome::Partial
        }
    }
}
