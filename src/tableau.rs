use ndarray::{Array2, Axis};
use num::Zero;
use tabular::{Row, Table};

use std::collections::BTreeSet;
use std::fmt;

use crate::model::Objective;
use crate::rational::Rational;
use crate::standard_form::StandardForm;
use crate::var::VariableNames;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TableauIx {
    i: usize,
    j: usize,
}

impl TableauIx {
    pub fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }

    pub fn i(&self) -> usize {
        self.i
    }

    pub fn j(&self) -> usize {
        self.j
    }
}

/// Dense simplex tableau.
///
/// `tbl` holds one row per constraint followed by the objective row, and one column per
/// variable followed by the right-hand side. `vars` maps columns to variable indices (columns
/// may be removed, so it is not the identity) and `basic_vars` maps constraint rows to the
/// variable currently basic in them.
#[derive(Clone, Debug, PartialEq)]
pub struct Tableau {
    pub(crate) tbl: Array2<Rational>,
    pub(crate) basic_vars: Vec<usize>,
    pub(crate) vars: Vec<usize>,
}

impl Tableau {
    /// Builds the tableau of a standardized problem, seeding the objective row with
    /// `objective`'s coefficients. The row still has to be priced out against the basis.
    pub fn new(std_form: &StandardForm, objective: &Objective) -> Self {
        let problem = std_form.problem();
        let vars: Vec<usize> = problem
            .constraints()
            .iter()
            .flat_map(|c| c.lhs().indices())
            .chain(problem.objective().expr().indices())
            .chain(objective.expr().indices())
            .collect::<BTreeSet<usize>>()
            .into_iter()
            .collect();

        let m = problem.constraints().len();
        let n = vars.len();
        let mut tableau = Self {
            tbl: Array2::from_elem((m + 1, n + 1), Rational::zero()),
            basic_vars: std_form.basis().to_vec(),
            vars,
        };

        for (i, con) in problem.constraints().iter().enumerate() {
            for c in con.lhs().terms() {
                if let Some(j) = tableau.column_of(c.index) {
                    tableau.tbl[[i, j]] = c.value.clone();
                }
            }
            tableau.tbl[[i, n]] = con.rhs().clone();
        }

        for c in objective.expr().terms() {
            if let Some(j) = tableau.column_of(c.index) {
                tableau.tbl[[m, j]] = c.value.clone();
            }
        }

        tableau
    }

    pub fn tbl(&self) -> &Array2<Rational> {
        &self.tbl
    }

    pub fn basic_vars(&self) -> &[usize] {
        &self.basic_vars
    }

    pub fn vars(&self) -> &[usize] {
        &self.vars
    }

    /// Number of constraint rows.
    pub fn n_rows(&self) -> usize {
        self.basic_vars.len()
    }

    /// Number of variable columns.
    pub fn n_cols(&self) -> usize {
        self.vars.len()
    }

    pub fn value(&self, i: usize, j: usize) -> &Rational {
        &self.tbl[[i, j]]
    }

    pub fn rhs(&self, i: usize) -> &Rational {
        &self.tbl[[i, self.n_cols()]]
    }

    /// Reduced cost of column `j`.
    pub fn reduced_cost(&self, j: usize) -> &Rational {
        &self.tbl[[self.n_rows(), j]]
    }

    pub fn column_of(&self, var: usize) -> Option<usize> {
        self.vars.iter().position(|&v| v == var)
    }

    pub fn is_basic(&self, var: usize) -> bool {
        self.basic_vars.contains(&var)
    }

    pub fn basic_value(&self, var: usize) -> Option<&Rational> {
        self.basic_vars
            .iter()
            .position(|&v| v == var)
            .map(|i| self.rhs(i))
    }

    /// The bottom-right cell holds the negated objective after pricing out.
    pub fn objective_value(&self) -> Rational {
        -&self.tbl[[self.n_rows(), self.n_cols()]]
    }

    /// Recomputes the objective row as `c_j - Σ_i a_ij·c_basic(i)` for every column,
    /// right-hand side included (where `c` is zero).
    pub fn price_out(&mut self, objective: &Objective) {
        let costs = objective.expr().as_map();
        let zero = Rational::zero();
        let cost = |var: usize| costs.get(&var).unwrap_or(&zero);
        let m = self.n_rows();
        let n = self.n_cols();

        for j in 0..=n {
            let mut value = if j < n {
                cost(self.vars[j]).clone()
            } else {
                Rational::zero()
            };
            for i in 0..m {
                let c_b = cost(self.basic_vars[i]);
                if !c_b.is_zero() && !self.tbl[[i, j]].is_zero() {
                    value -= &self.tbl[[i, j]] * c_b;
                }
            }
            self.tbl[[m, j]] = value;
        }
    }

    /// Gauss-Jordan step on `pivot_ind`: the pivot cell becomes 1 and the rest of its column 0.
    pub fn pivot(&mut self, pivot_ind: &TableauIx) {
        assert!(pivot_ind.i() < self.n_rows());
        assert!(pivot_ind.j() < self.n_cols());

        let width = self.tbl.ncols();

        //set coefficients in pivot row
        let div = self.tbl[[pivot_ind.i(), pivot_ind.j()]].clone();
        for j in 0..width {
            self.tbl[[pivot_ind.i(), j]] /= &div;
        }
        let pivot_row = self.tbl.row(pivot_ind.i()).to_owned();

        //eliminate the entering column from every other row, objective row included
        for i in 0..self.tbl.nrows() {
            if i == pivot_ind.i() {
                continue;
            }
            let ratio = self.tbl[[i, pivot_ind.j()]].clone();
            if ratio.is_zero() {
                continue;
            }
            for j in 0..width {
                if !pivot_row[j].is_zero() {
                    self.tbl[[i, j]] -= &pivot_row[j] * &ratio;
                }
            }
        }

        self.basic_vars[pivot_ind.i()] = self.vars[pivot_ind.j()];
    }

    /// Drops the columns of the given variables; unknown variables are ignored.
    pub fn remove_columns(&mut self, vars: &[usize]) {
        let keep: Vec<usize> = (0..self.tbl.ncols())
            .filter(|&j| j == self.n_cols() || !vars.contains(&self.vars[j]))
            .collect();
        self.tbl = self.tbl.select(Axis(1), &keep);
        self.vars.retain(|v| !vars.contains(v));
    }

    /// Drops constraint row `i` together with its basis entry.
    pub fn remove_row(&mut self, i: usize) {
        assert!(i < self.n_rows());
        let keep: Vec<usize> = (0..self.tbl.nrows()).filter(|&r| r != i).collect();
        self.tbl = self.tbl.select(Axis(0), &keep);
        self.basic_vars.remove(i);
    }

    pub fn display_with<'a>(&'a self, names: &'a VariableNames) -> TableauDisplay<'a> {
        TableauDisplay {
            tableau: self,
            names,
        }
    }
}

pub struct TableauDisplay<'a> {
    tableau: &'a Tableau,
    names: &'a VariableNames,
}

impl fmt::Display for TableauDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tableau = self.tableau;
        //basis label, one column per variable, rhs
        let columns = "{:<}".to_string() + &" {:>}".repeat(tableau.n_cols() + 1);
        let mut table = Table::new(columns.as_str());

        let mut header = Row::new();
        header.add_cell("");
        for &var in tableau.vars() {
            header.add_cell(self.names.name(var));
        }
        header.add_cell("rhs");
        table.add_row(header);

        for (i, tbl_row) in tableau.tbl.rows().into_iter().enumerate() {
            let mut row = Row::new();
            match tableau.basic_vars.get(i) {
                Some(&var) => row.add_cell(self.names.name(var)),
                None => row.add_cell("Z"),
            };
            for value in tbl_row.iter() {
                row.add_cell(value);
            }
            table.add_row(row);
        }

        write!(f, "{}", table)
    }
}

impl fmt::Display for Tableau {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names = VariableNames::default();
        write!(f, "{}", self.display_with(&names))
    }
}
