use log::{debug, trace};
use num::Zero;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tabled::{Table, Tabled};

use std::collections::BTreeSet;
use std::fmt;

use crate::config::SolverConfig;
use crate::error::{LpError, Result};
use crate::linear_expr::{Coefficient, LinearExpr};
use crate::model::{Objective, OptDir, Problem};
use crate::rational::Rational;
use crate::simplex::Simplex;
use crate::standard_form::StandardForm;
use crate::tableau::{Tableau, TableauIx};

pub trait SolveAlgorithm {
    fn solve(&self, problem: &Problem) -> Result<LpResult>;
}

/// Optimal objective value plus the values of the basic decision variables.
///
/// Decision variables missing from `coefficients` are non-basic and therefore zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LpResult {
    pub(crate) objective_value: Rational,
    pub(crate) coefficients: Vec<Coefficient>,
}

impl LpResult {
    pub fn new(objective_value: Rational, coefficients: Vec<Coefficient>) -> Self {
        let mut coefficients = coefficients;
        coefficients.sort_by_key(|c| c.index);
        Self {
            objective_value,
            coefficients,
        }
    }

    pub fn objective_value(&self) -> &Rational {
        &self.objective_value
    }

    pub fn coefficients(&self) -> &[Coefficient] {
        &self.coefficients
    }

    pub fn value(&self, index: usize) -> Rational {
        self.coefficients
            .iter()
            .find(|c| c.index == index)
            .map(|c| c.value.clone())
            .unwrap_or_else(Rational::zero)
    }

    pub fn is_integral(&self) -> bool {
        self.coefficients.iter().all(|c| c.value.is_integer())
    }

    /// Coefficients with a fractional value, in index order.
    pub fn fractional(&self) -> impl Iterator<Item = &Coefficient> + '_ {
        self.coefficients.iter().filter(|c| !c.value.is_integer())
    }

    /// Value of every given variable, zero for the non-basic ones.
    pub fn assignment(&self, vars: &BTreeSet<usize>) -> Vec<(usize, Rational)> {
        vars.iter().map(|&v| (v, self.value(v))).collect()
    }

    pub fn values(&self) -> FxHashMap<usize, Rational> {
        self.coefficients
            .iter()
            .map(|c| (c.index, c.value.clone()))
            .collect()
    }
}

#[derive(Tabled)]
struct ValueRow {
    variable: String,
    value: String,
    approx: String,
}

impl fmt::Display for LpResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rows = self
            .coefficients
            .iter()
            .map(|c| ValueRow {
                variable: format!("x_{}", c.index),
                value: c.value.to_string(),
                approx: format!("{:.4}", c.value.to_f64()),
            })
            .chain(std::iter::once(ValueRow {
                variable: "Z".to_string(),
                value: self.objective_value.to_string(),
                approx: format!("{:.4}", self.objective_value.to_f64()),
            }));
        write!(f, "{}", Table::new(rows))
    }
}

/// Two-phase simplex over exact rationals.
#[derive(Clone, Debug, Default)]
pub struct TwoPhase {
    config: SolverConfig,
}

impl TwoPhase {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves `problem` and returns the final tableau along with the result.
    pub fn solve_to_tableau(&self, problem: &Problem) -> Result<(LpResult, Tableau)> {
        let std_form = problem.as_standard_form()?;
        let simplex = Simplex::from_config(&self.config);

        let mut tableau = if std_form.artificial_vars().is_empty() {
            debug!("no artificial variables, skipping phase one");
            let mut tableau = Tableau::new(&std_form, problem.objective());
            tableau.price_out(problem.objective());
            tableau
        } else {
            let mut tableau = self.phase_one(&std_form, &simplex)?;
            tableau.price_out(problem.objective());
            tableau
        };

        trace!("phase two start:\n{}", tableau);
        simplex.solve(&mut tableau, problem.opt_dir())?;

        let coefficients = tableau
            .basic_vars()
            .iter()
            .enumerate()
            .filter(|(_i, var)| std_form.decision_vars().contains(*var))
            .map(|(i, &var)| Coefficient::new(var, tableau.rhs(i).clone()))
            .collect();
        let result = LpResult::new(tableau.objective_value(), coefficients);
        debug!("optimum {} at {:?}", result.objective_value(), result.coefficients());

        Ok((result, tableau))
    }

    /// Minimizes the sum of artificial variables, then hands back a tableau without
    /// artificial columns whose basis is feasible for the original constraints.
    fn phase_one(&self, std_form: &StandardForm, simplex: &Simplex) -> Result<Tableau> {
        let artificial = std_form.artificial_vars();
        let aux = Objective::new(
            OptDir::Min,
            artificial.iter().map(|&a| Coefficient::new(a, 1)).collect::<LinearExpr>(),
        );

        let mut tableau = Tableau::new(std_form, &aux);
        tableau.price_out(&aux);
        trace!("phase one start:\n{}", tableau);
        simplex.solve(&mut tableau, OptDir::Min)?;

        let residual = tableau.objective_value();
        if !residual.is_zero() {
            debug!("phase one optimum {} > 0", residual);
            return Err(LpError::InfeasibleProblem(format!(
                "artificial variables cannot reach zero (phase one optimum {})",
                residual
            )));
        }

        self.drive_out_artificials(&mut tableau, artificial);
        tableau.remove_columns(artificial);
        debug!(
            "phase one feasible, {} rows and {} columns remain",
            tableau.n_rows(),
            tableau.n_cols()
        );

        Ok(tableau)
    }

    /// Artificial variables left basic at zero level leave the basis through a degenerate
    /// pivot on any non-artificial column of their row. A row with no such column is a
    /// redundant constraint and is dropped.
    fn drive_out_artificials(&self, tableau: &mut Tableau, artificial: &[usize]) {
        let mut i = 0;
        while i < tableau.n_rows() {
            let var = tableau.basic_vars()[i];
            if !artificial.contains(&var) {
                i += 1;
                continue;
            }

            let column = (0..tableau.n_cols()).find(|&j| {
                !artificial.contains(&tableau.vars()[j]) && !tableau.value(i, j).is_zero()
            });
            match column {
                Some(j) => {
                    debug!(
                        "artificial x_{} basic at zero, pivoting in x_{}",
                        var,
                        tableau.vars()[j]
                    );
                    tableau.pivot(&TableauIx::new(i, j));
                    i += 1;
                }
                None => {
                    debug!("row {} is redundant, dropping it with artificial x_{}", i, var);
                    tableau.remove_row(i);
                }
            }
        }
    }
}

impl SolveAlgorithm for TwoPhase {
    fn solve(&self, problem: &Problem) -> Result<LpResult> {
        self.solve_to_tableau(problem).map(|(result, _tableau)| result)
    }
}
