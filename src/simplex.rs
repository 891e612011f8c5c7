use log::{debug, trace};

use crate::config::{PivotRule, SolverConfig};
use crate::error::{LpError, Result};
use crate::model::OptDir;
use crate::rational::Rational;
use crate::tableau::{Tableau, TableauIx};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SimplexState {
    Pivoting,
    Optimal,
    /// No constraint row limits the entering column.
    Unbounded { column: usize },
}

/// Primal simplex on a priced-out tableau.
#[derive(Clone, Debug, Default)]
pub struct Simplex {
    pivot_rule: PivotRule,
    degenerate_pivot_limit: Option<usize>,
}

impl Simplex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SolverConfig) -> Self {
        Self {
            pivot_rule: config.pivot_rule,
            degenerate_pivot_limit: config.degenerate_pivot_limit,
        }
    }

    pub fn with_pivot_rule(mut self, pivot_rule: PivotRule) -> Self {
        self.pivot_rule = pivot_rule;
        self
    }

    /// Column whose reduced cost improves the objective, `None` at optimality.
    pub fn entering_column(tbl: &Tableau, opt_dir: OptDir, rule: PivotRule) -> Option<usize> {
        let improving = (0..tbl.n_cols()).filter(|&j| {
            let cost = tbl.reduced_cost(j);
            match opt_dir {
                OptDir::Max => cost.is_positive(),
                OptDir::Min => cost.is_negative(),
            }
        });

        match rule {
            PivotRule::Dantzig => improving.fold(None, |best: Option<usize>, j| match best {
                Some(b) if !opt_dir.improves(tbl.reduced_cost(j), tbl.reduced_cost(b)) => Some(b),
                _ => Some(j),
            }),
            PivotRule::Bland => improving.min_by_key(|&j| tbl.vars()[j]),
        }
    }

    /// Minimum-ratio test over rows with a strictly positive entry in column `j`.
    pub fn leaving_row(tbl: &Tableau, j: usize, rule: PivotRule) -> Option<usize> {
        let mut best: Option<(usize, Rational)> = None;
        for i in 0..tbl.n_rows() {
            let a = tbl.value(i, j);
            if !a.is_positive() {
                continue;
            }
            let ratio = tbl.rhs(i) / a;
            let replace = match &best {
                None => true,
                Some((b, best_ratio)) => {
                    ratio < *best_ratio
                        || (rule == PivotRule::Bland
                            && ratio == *best_ratio
                            && tbl.basic_vars()[i] < tbl.basic_vars()[*b])
                }
            };
            if replace {
                best = Some((i, ratio));
            }
        }
        best.map(|(i, _ratio)| i)
    }

    #[inline(always)]
    fn pivot_ind(tbl: &Tableau, opt_dir: OptDir, rule: PivotRule) -> std::result::Result<Option<TableauIx>, usize> {
        let j = match Self::entering_column(tbl, opt_dir, rule) {
            Some(j) => j,
            None => return Ok(None),
        };
        match Self::leaving_row(tbl, j, rule) {
            Some(i) => Ok(Some(TableauIx::new(i, j))),
            None => Err(j),
        }
    }

    /// Performs at most one pivot and reports the resulting state.
    pub fn step(tbl: &mut Tableau, opt_dir: OptDir, rule: PivotRule) -> SimplexState {
        match Self::pivot_ind(tbl, opt_dir, rule) {
            Ok(Some(ix)) => {
                tbl.pivot(&ix);
                SimplexState::Pivoting
            }
            Ok(None) => SimplexState::Optimal,
            Err(column) => SimplexState::Unbounded { column },
        }
    }

    /// Pivots until optimal; returns the number of pivots performed.
    pub fn solve(&self, tbl: &mut Tableau, opt_dir: OptDir) -> Result<usize> {
        let mut rule = self.pivot_rule;
        let mut pvt_cnt = 0;
        let mut degenerate_run = 0;

        loop {
            let ix = match Self::pivot_ind(tbl, opt_dir, rule) {
                Ok(Some(ix)) => ix,
                Ok(None) => {
                    debug!("{} optimum reached after {} pivots", opt_dir, pvt_cnt);
                    return Ok(pvt_cnt);
                }
                Err(column) => {
                    let variable = tbl.vars()[column];
                    debug!("no leaving row for x_{}, problem is unbounded", variable);
                    return Err(LpError::Unbounded { variable });
                }
            };

            if tbl.rhs(ix.i()).is_positive() {
                degenerate_run = 0;
            } else {
                degenerate_run += 1;
                if rule != PivotRule::Bland
                    && self.degenerate_pivot_limit.map_or(false, |limit| degenerate_run >= limit)
                {
                    debug!(
                        "{} consecutive degenerate pivots, switching to Bland's rule",
                        degenerate_run
                    );
                    rule = PivotRule::Bland;
                    continue;
                }
            }

            tbl.pivot(&ix);
            pvt_cnt += 1;
            trace!(
                "pivot {} on row {} column {}:\n{}",
                pvt_cnt,
                ix.i(),
                ix.j(),
                tbl
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{Comp, Constraint};
    use crate::linear_expr::LinearExpr;
    use crate::model::{Objective, Problem};
    use crate::rat;

    fn tableau_of(problem: &Problem) -> Tableau {
        let sf = problem.as_standard_form().unwrap();
        let mut tbl = Tableau::new(&sf, problem.objective());
        tbl.price_out(problem.objective());
        tbl
    }

    fn textbook() -> Problem {
        Problem::new(
            Objective::maximize(LinearExpr::from_pairs([(1, 2), (2, 3)])),
            vec![
                Constraint::new(LinearExpr::from_pairs([(1, 1), (2, 1)]), Comp::Le, 4),
                Constraint::new(LinearExpr::from_pairs([(1, 1), (2, 2)]), Comp::Le, 5),
            ],
        )
        .unwrap()
    }

    #[test]
    fn dantzig_picks_most_improving_column() {
        let tbl = tableau_of(&textbook());
        assert_eq!(Simplex::entering_column(&tbl, OptDir::Max, PivotRule::Dantzig), Some(1));
        assert_eq!(Simplex::entering_column(&tbl, OptDir::Max, PivotRule::Bland), Some(0));
        assert_eq!(Simplex::entering_column(&tbl, OptDir::Min, PivotRule::Dantzig), None);
        assert_eq!(Simplex::leaving_row(&tbl, 1, PivotRule::Dantzig), Some(1));
    }

    #[test]
    fn solves_to_textbook_optimum() {
        let mut tbl = tableau_of(&textbook());
        let pivots = Simplex::new().solve(&mut tbl, OptDir::Max).unwrap();
        assert_eq!(pivots, 2);
        assert_eq!(tbl.objective_value(), rat!(9));
        assert_eq!(tbl.basic_value(1), Some(&rat!(3)));
        assert_eq!(tbl.basic_value(2), Some(&rat!(1)));
        assert_eq!(Simplex::step(&mut tbl, OptDir::Max, PivotRule::Dantzig), SimplexState::Optimal);
    }

    #[test]
    fn bland_reaches_same_optimum() {
        let mut tbl = tableau_of(&textbook());
        Simplex::new()
            .with_pivot_rule(PivotRule::Bland)
            .solve(&mut tbl, OptDir::Max)
            .unwrap();
        assert_eq!(tbl.objective_value(), rat!(9));
    }

    #[test]
    fn reports_unbounded_ray() {
        let problem = Problem::new(
            Objective::maximize(LinearExpr::from_pairs([(1, 1), (2, 1)])),
            vec![Constraint::new(LinearExpr::from_pairs([(1, 1), (2, -1)]), Comp::Le, 1)],
        )
        .unwrap();
        let mut tbl = tableau_of(&problem);
        assert_eq!(
            Simplex::new().solve(&mut tbl, OptDir::Max),
            Err(LpError::Unbounded { variable: 2 })
        );
    }

    #[test]
    fn step_reports_unbounded_state() {
        let problem = Problem::new(
            Objective::maximize(LinearExpr::from_pairs([(1, 1)])),
            vec![Constraint::new(LinearExpr::from_pairs([(1, -1)]), Comp::Le, 3)],
        )
        .unwrap();
        let mut tbl = tableau_of(&problem);
        assert_eq!(
            Simplex::step(&mut tbl, OptDir::Max, PivotRule::Dantzig),
            SimplexState::Unbounded { column: 0 }
        );
    }

    /// Beale's example: Dantzig's rule with first-row ties cycles through degenerate bases.
    fn beale() -> Problem {
        Problem::new(
            Objective::maximize(LinearExpr::from_pairs([
                (4, rat!(3, 4)),
                (5, rat!(-20)),
                (6, rat!(1, 2)),
                (7, rat!(-6)),
            ])),
            vec![
                Constraint::new(
                    LinearExpr::from_pairs([(4, rat!(1, 4)), (5, rat!(-8)), (6, rat!(-1)), (7, rat!(9))]),
                    Comp::Le,
                    0,
                ),
                Constraint::new(
                    LinearExpr::from_pairs([(4, rat!(1, 2)), (5, rat!(-12)), (6, rat!(-1, 2)), (7, rat!(3))]),
                    Comp::Le,
                    0,
                ),
                Constraint::bound(6, Comp::Le, 1),
            ],
        )
        .unwrap()
    }

    #[test]
    fn degenerate_run_switches_to_bland() {
        for limit in [Some(1), Some(3), Some(50)] {
            let config = SolverConfig::default()
                .with_pivot_rule(PivotRule::Dantzig)
                .with_degenerate_pivot_limit(limit);
            let mut tbl = tableau_of(&beale());
            Simplex::from_config(&config).solve(&mut tbl, OptDir::Max).unwrap();
            assert_eq!(tbl.objective_value(), rat!(5, 4));
            assert_eq!(Simplex::entering_column(&tbl, OptDir::Max, PivotRule::Dantzig), None);
        }
    }

    #[test]
    fn first_beale_pivot_is_degenerate() {
        let tbl = tableau_of(&beale());
        let j = Simplex::entering_column(&tbl, OptDir::Max, PivotRule::Dantzig).unwrap();
        assert_eq!(tbl.vars()[j], 4);
        let i = Simplex::leaving_row(&tbl, j, PivotRule::Dantzig).unwrap();
        assert_eq!(i, 0);
        assert_eq!(tbl.rhs(i), &rat!(0));
    }
}
