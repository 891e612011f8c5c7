//! Exact rational linear programming.
//!
//! Problems are standardized with slack, surplus and artificial variables, solved with a
//! two-phase dense tableau simplex and, for integer programs, wrapped in a depth-first
//! branch and bound. All arithmetic is done on arbitrary precision fractions.

pub mod rational;

pub mod branch_bound;
pub mod config;
pub mod constraint;
pub mod error;
pub mod linear_expr;
pub mod model;
pub mod session;
pub mod simplex;
pub mod solver;
pub mod standard_form;
pub mod tableau;
pub mod var;

pub use crate::{
    branch_bound::{BnbResult, BnbStats, BranchAndBound},
    config::{PivotRule, SolverConfig},
    constraint::{Comp, Constraint},
    error::{LpError, Result},
    linear_expr::{Coefficient, LinearExpr},
    model::{Objective, OptDir, Problem},
    rational::Rational,
    session::{BranchNode, BranchSession, NodeId, Side},
    solver::{LpResult, SolveAlgorithm, TwoPhase},
    standard_form::StandardForm,
    tableau::Tableau,
    var::{VarKind, VariableNames},
};

/// Solves the continuous relaxation of `problem` with the default configuration.
pub fn solve_lp(problem: &Problem) -> Result<LpResult> {
    TwoPhase::default().solve(problem)
}

/// Best integral solution of `problem` plus the branches of its relaxation.
pub fn branch_and_bound(problem: &Problem) -> Result<BnbResult> {
    BranchAndBound::<TwoPhase>::default().solve(problem)
}
