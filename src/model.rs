use rustc_hash::FxHashMap;
use serde::Serialize;
use tabular::{Row, Table};

use std::collections::BTreeSet;
use std::fmt;

use crate::constraint::Constraint;
use crate::error::{LpError, Result};
use crate::linear_expr::LinearExpr;
use crate::rational::Rational;
use crate::var::VariableNames;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum OptDir {
    Max,
    Min,
}

impl OptDir {
    /// True when `a` is a strictly better objective value than `b`.
    pub fn improves(self, a: &Rational, b: &Rational) -> bool {
        match self {
            OptDir::Max => a > b,
            OptDir::Min => a < b,
        }
    }
}

impl fmt::Display for OptDir {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OptDir::Max => write!(f, "Max"),
            OptDir::Min => write!(f, "Min"),
        }
    }
}

/// Optimization direction plus coefficients, kept sorted by variable index.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Objective {
    pub(crate) opt_dir: OptDir,
    pub(crate) expr: LinearExpr,
}

impl Objective {
    pub fn new(opt_dir: OptDir, expr: LinearExpr) -> Self {
        let mut expr = expr;
        expr.sort_by_index();
        Self { opt_dir, expr }
    }

    pub fn maximize(expr: LinearExpr) -> Self {
        Self::new(OptDir::Max, expr)
    }

    pub fn minimize(expr: LinearExpr) -> Self {
        Self::new(OptDir::Min, expr)
    }

    pub fn opt_dir(&self) -> OptDir {
        self.opt_dir
    }

    pub fn expr(&self) -> &LinearExpr {
        &self.expr
    }
}

/// Objective plus constraints over non-negative indexed variables.
///
/// The decision variables are exactly the indices appearing in the objective.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Problem {
    pub(crate) objective: Objective,
    pub(crate) constraints: Vec<Constraint>,
}

impl Problem {
    pub fn new(objective: Objective, constraints: Vec<Constraint>) -> Result<Self> {
        let problem = Self {
            objective,
            constraints,
        };
        problem.validate()?;
        Ok(problem)
    }

    pub fn validate(&self) -> Result<()> {
        if self.objective.expr.is_empty() {
            return Err(LpError::MalformedProblem(
                "objective must have at least one coefficient".to_string(),
            ));
        }
        if let Some(i) = self.constraints.iter().position(|c| c.lhs().is_empty()) {
            return Err(LpError::MalformedProblem(format!(
                "constraint {} must have at least one coefficient",
                i + 1
            )));
        }
        Ok(())
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn opt_dir(&self) -> OptDir {
        self.objective.opt_dir
    }

    /// Copy of this problem with one more constraint; `self` is left untouched.
    pub fn with_constraint(&self, constraint: Constraint) -> Self {
        let mut problem = self.clone();
        problem.constraints.push(constraint);
        problem
    }

    pub fn decision_variables(&self) -> BTreeSet<usize> {
        self.objective.expr.indices().collect()
    }

    /// Largest variable index referenced by the objective or any constraint.
    pub fn max_index(&self) -> usize {
        self.constraints
            .iter()
            .filter_map(|c| c.lhs().max_index())
            .chain(self.objective.expr.max_index())
            .max()
            .unwrap_or(0)
    }

    pub fn evaluate(&self, values: &FxHashMap<usize, Rational>) -> Rational {
        self.objective.expr.eval(values)
    }

    /// Positions of the constraints the assignment violates.
    pub fn violations(&self, values: &FxHashMap<usize, Rational>) -> Vec<usize> {
        self.constraints
            .iter()
            .enumerate()
            .filter(|(_i, c)| !c.is_satisfied_by(values))
            .map(|(i, _c)| i)
            .collect()
    }

    /// Exact check of every constraint plus non-negativity of the assignment.
    pub fn is_feasible(&self, values: &FxHashMap<usize, Rational>) -> bool {
        values.values().all(|v| !v.is_negative()) && self.violations(values).is_empty()
    }

    pub fn display_with<'a>(&'a self, names: &'a VariableNames) -> ProblemDisplay<'a> {
        ProblemDisplay {
            problem: self,
            names,
        }
    }
}

pub struct ProblemDisplay<'a> {
    problem: &'a Problem,
    names: &'a VariableNames,
}

impl fmt::Display for ProblemDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        //OptDir/label, colon, lhs, comp, rhs
        let mut table = Table::new("{:<} {:^} {:<} {:^} {:>}");

        let mut row = Row::new();
        row.add_cell(self.problem.opt_dir());
        row.add_cell(":");
        row.add_cell(self.names.format_expr(self.problem.objective.expr()));
        row.add_cell("");
        row.add_cell("");
        table.add_row(row);

        table.add_row(Row::from_cells(
            ["Subject to", ":", "", "", ""].iter().map(|s| s.to_string()),
        ));

        for constraint in self.problem.constraints() {
            let mut row = Row::new();
            row.add_cell("");
            row.add_cell("");
            row.add_cell(self.names.format_expr(constraint.lhs()));
            row.add_cell(format!(" {} ", constraint.comp()));
            row.add_cell(constraint.rhs());
            table.add_row(row);
        }

        write!(f, "{}", table)
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names = VariableNames::default();
        write!(f, "{}", self.display_with(&names))
    }
}
