use log::debug;
use rustc_hash::FxHashSet;

use std::collections::{BTreeMap, BTreeSet};

use crate::config::SolverConfig;
use crate::constraint::{Comp, Constraint};
use crate::error::{LpError, Result};
use crate::model::Problem;
use crate::rational::Rational;
use crate::solver::{LpResult, SolveAlgorithm, TwoPhase};

/// Counters collected during one automatic exploration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BnbStats {
    /// Relaxations solved successfully.
    pub nodes: usize,
    /// Subproblems whose relaxation failed (infeasible or unbounded).
    pub failed: usize,
    /// Nodes not branched further because they cannot beat the incumbent.
    pub pruned: usize,
    /// Nodes whose relaxation repeated an already seen assignment.
    pub repeated: usize,
    pub max_depth: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BnbResult {
    pub(crate) solution: LpResult,
    pub(crate) relaxation: LpResult,
    pub(crate) branches: BTreeMap<usize, (Problem, Problem)>,
    pub(crate) stats: BnbStats,
}

impl BnbResult {
    /// Best integral solution found.
    pub fn solution(&self) -> &LpResult {
        &self.solution
    }

    /// Optimum of the continuous relaxation of the submitted problem.
    pub fn relaxation(&self) -> &LpResult {
        &self.relaxation
    }

    /// `x_i ≤ floor(v)` and `x_i ≥ ceil(v)` subproblems for every fractional `x_i = v` of
    /// the relaxation.
    pub fn branches(&self) -> &BTreeMap<usize, (Problem, Problem)> {
        &self.branches
    }

    pub fn branch(&self, variable: usize) -> Option<&(Problem, Problem)> {
        self.branches.get(&variable)
    }

    pub fn stats(&self) -> &BnbStats {
        &self.stats
    }
}

/// Bookkeeping shared by every node of one exploration.
///
/// Sibling subproblems carry contradicting bounds and a child always excludes its parent's
/// fractional value, so in exact arithmetic the registry never rejects a node and
/// `BnbStats::repeated` stays zero.
struct Search {
    decision_vars: BTreeSet<usize>,
    registry: FxHashSet<Vec<(usize, Rational)>>,
    incumbent: Option<LpResult>,
    stats: BnbStats,
}

/// Depth-first branch and bound on the first fractional decision variable.
#[derive(Clone, Debug)]
pub struct BranchAndBound<A: SolveAlgorithm = TwoPhase> {
    algorithm: A,
    incumbent_pruning: bool,
}

impl Default for BranchAndBound<TwoPhase> {
    fn default() -> Self {
        Self::from_config(SolverConfig::default())
    }
}

impl BranchAndBound<TwoPhase> {
    pub fn from_config(config: SolverConfig) -> Self {
        Self::new(TwoPhase::new(config.clone()), &config)
    }
}

impl<A: SolveAlgorithm> BranchAndBound<A> {
    pub fn new(algorithm: A, config: &SolverConfig) -> Self {
        Self {
            algorithm,
            incumbent_pruning: config.incumbent_pruning,
        }
    }

    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    /// Both derived subproblems for every fractional variable of `relaxation`.
    pub fn branches(problem: &Problem, relaxation: &LpResult) -> BTreeMap<usize, (Problem, Problem)> {
        relaxation
            .fractional()
            .map(|c| {
                let leq = problem.with_constraint(Constraint::bound(c.index, Comp::Le, c.value.floor()));
                let geq = problem.with_constraint(Constraint::bound(c.index, Comp::Ge, c.value.ceil()));
                (c.index, (leq, geq))
            })
            .collect()
    }

    pub fn solve(&self, problem: &Problem) -> Result<BnbResult> {
        let relaxation = self.algorithm.solve(problem)?;
        let branches = Self::branches(problem, &relaxation);

        let mut search = Search {
            decision_vars: problem.decision_variables(),
            registry: FxHashSet::default(),
            incumbent: None,
            stats: BnbStats::default(),
        };
        let best = self.explore(problem, Some(relaxation.clone()), 0, &mut search);
        debug!("branch and bound finished: {:?}", search.stats);

        match best {
            Some(solution) => Ok(BnbResult {
                solution,
                relaxation,
                branches,
                stats: search.stats,
            }),
            None => Err(LpError::InfeasibleProblem(
                "no integer-feasible point exists".to_string(),
            )),
        }
    }

    /// Best integral result in the subtree rooted at `problem`, `None` when the subtree
    /// offers no candidate.
    fn explore(
        &self,
        problem: &Problem,
        solved: Option<LpResult>,
        depth: usize,
        search: &mut Search,
    ) -> Option<LpResult> {
        let relaxation = match solved {
            Some(relaxation) => relaxation,
            None => match self.algorithm.solve(problem) {
                Ok(relaxation) => relaxation,
                Err(err) => {
                    debug!("depth {}: subproblem dropped ({})", depth, err);
                    search.stats.failed += 1;
                    return None;
                }
            },
        };
        search.stats.nodes += 1;
        search.stats.max_depth = search.stats.max_depth.max(depth);

        if !search
            .registry
            .insert(relaxation.assignment(&search.decision_vars))
        {
            debug!("depth {}: relaxation repeats a seen solution", depth);
            search.stats.repeated += 1;
            return None;
        }

        let opt_dir = problem.opt_dir();
        if self.incumbent_pruning {
            if let Some(incumbent) = &search.incumbent {
                if !opt_dir.improves(relaxation.objective_value(), incumbent.objective_value()) {
                    debug!(
                        "depth {}: bound {} cannot beat incumbent {}",
                        depth,
                        relaxation.objective_value(),
                        incumbent.objective_value()
                    );
                    search.stats.pruned += 1;
                    return None;
                }
            }
        }

        let first_fractional = relaxation
            .fractional()
            .next()
            .map(|c| (c.index, c.value.clone()));
        let (index, value) = match first_fractional {
            Some(c) => c,
            None => {
                let better = match &search.incumbent {
                    Some(incumbent) => {
                        opt_dir.improves(relaxation.objective_value(), incumbent.objective_value())
                    }
                    None => true,
                };
                if better {
                    debug!("depth {}: new incumbent {}", depth, relaxation.objective_value());
                    search.incumbent = Some(relaxation.clone());
                }
                return Some(relaxation);
            }
        };

        debug!("depth {}: branching on x_{} = {}", depth, index, value);
        let leq = problem.with_constraint(Constraint::bound(index, Comp::Le, value.floor()));
        let leq_best = self.explore(&leq, None, depth + 1, search);
        let geq = problem.with_constraint(Constraint::bound(index, Comp::Ge, value.ceil()));
        let geq_best = self.explore(&geq, None, depth + 1, search);

        match (leq_best, geq_best) {
            (Some(l), Some(g)) => {
                if opt_dir.improves(l.objective_value(), g.objective_value()) {
                    Some(l)
                } else {
                    Some(g)
                }
            }
            (Some(l), None) => Some(l),
            (None, g) => g,
        }
    }
}
