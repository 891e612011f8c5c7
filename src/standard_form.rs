use log::debug;
use num::One;
use rustc_hash::FxHashMap;

use std::collections::BTreeSet;

use crate::constraint::{Comp, Constraint};
use crate::error::Result;
use crate::model::Problem;
use crate::var::VarKind;

/// Equality-only version of a problem plus the bookkeeping the two-phase method needs.
#[derive(Clone, Debug, PartialEq)]
pub struct StandardForm {
    pub(crate) problem: Problem,
    pub(crate) basis: Vec<usize>,
    pub(crate) artificial_vars: Vec<usize>,
    pub(crate) added: Vec<(usize, VarKind)>,
    pub(crate) decision_vars: BTreeSet<usize>,
}

impl StandardForm {
    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    /// Initial basic variable of each constraint row.
    pub fn basis(&self) -> &[usize] {
        &self.basis
    }

    pub fn artificial_vars(&self) -> &[usize] {
        &self.artificial_vars
    }

    /// Inserted variables in allocation order.
    pub fn added(&self) -> &[(usize, VarKind)] {
        &self.added
    }

    pub fn decision_vars(&self) -> &BTreeSet<usize> {
        &self.decision_vars
    }

    pub fn is_artificial(&self, index: usize) -> bool {
        self.artificial_vars.contains(&index)
    }

    pub fn kind(&self, index: usize) -> VarKind {
        self.added
            .iter()
            .find(|(i, _k)| *i == index)
            .map(|(_i, k)| *k)
            .unwrap_or_default()
    }
}

impl Problem {
    /// Converts every constraint to an equality.
    ///
    /// `≤` rows get a slack (+1), `≥` rows a surplus (-1). A second pass then gives every row
    /// still lacking a unit basic column an artificial (+1), so artificial indices are always
    /// the highest ones. Rows with a negative right-hand side are negated first.
    pub fn as_standard_form(&self) -> Result<StandardForm> {
        self.validate()?;

        let decision_vars = self.decision_variables();
        let mut constraints: Vec<Constraint> = self
            .constraints
            .iter()
            .map(|c| c.with_nonnegative_rhs())
            .collect();

        //number of rows each variable appears in
        let mut occurrences: FxHashMap<usize, usize> = FxHashMap::default();
        for c in &constraints {
            for index in c.lhs().indices() {
                *occurrences.entry(index).or_insert(0) += 1;
            }
        }

        let mut next = self.max_index() + 1;
        let mut added = Vec::new();
        let mut basis: Vec<Option<usize>> = vec![None; constraints.len()];

        //slack and surplus pass
        for (i, cons) in constraints.iter_mut().enumerate() {
            match cons.comp {
                Comp::Le => {
                    cons.lhs.add_term(next, 1);
                    added.push((next, VarKind::Slack));
                    basis[i] = Some(next);
                    next += 1;
                }
                Comp::Ge => {
                    cons.lhs.add_term(next, -1);
                    added.push((next, VarKind::Surplus));
                    next += 1;
                }
                Comp::Eq => {
                    //an equality that already owns a unit column needs no artificial
                    basis[i] = cons
                        .lhs
                        .terms()
                        .iter()
                        .rev()
                        .find(|c| {
                            c.value.is_one()
                                && !decision_vars.contains(&c.index)
                                && occurrences.get(&c.index) == Some(&1)
                        })
                        .map(|c| c.index);
                }
            }
        }

        //artificial pass
        let mut artificial_vars = Vec::new();
        for (i, cons) in constraints.iter_mut().enumerate() {
            if basis[i].is_none() {
                cons.lhs.add_term(next, 1);
                added.push((next, VarKind::Artificial));
                artificial_vars.push(next);
                basis[i] = Some(next);
                next += 1;
            }
            cons.comp = Comp::Eq;
        }

        debug!(
            "standardized {} constraints: {} added variables, artificial {:?}",
            constraints.len(),
            added.len(),
            artificial_vars
        );

        Ok(StandardForm {
            problem: Problem {
                objective: self.objective.clone(),
                constraints,
            },
            basis: basis.into_iter().flatten().collect(),
            artificial_vars,
            added,
            decision_vars,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear_expr::LinearExpr;
    use crate::model::Objective;
    use crate::rat;

    fn mixed() -> Problem {
        Problem::new(
            Objective::maximize(LinearExpr::from_pairs([(1, 2), (2, 3)])),
            vec![
                Constraint::new(LinearExpr::from_pairs([(1, 1), (2, 1)]), Comp::Le, 4),
                Constraint::new(LinearExpr::from_pairs([(1, 1), (2, 1)]), Comp::Ge, 2),
                Constraint::new(LinearExpr::from_pairs([(1, 1)]), Comp::Eq, 1),
            ],
        )
        .unwrap()
    }

    #[test]
    fn slack_and_surplus_before_artificial() {
        let sf = mixed().as_standard_form().unwrap();
        assert_eq!(
            sf.added(),
            &[
                (3, VarKind::Slack),
                (4, VarKind::Surplus),
                (5, VarKind::Artificial),
                (6, VarKind::Artificial),
            ]
        );
        assert_eq!(sf.artificial_vars(), &[5, 6]);
        assert_eq!(sf.basis(), &[3, 5, 6]);
        assert!(sf.problem().constraints().iter().all(|c| c.comp() == Comp::Eq));

        let ge = &sf.problem().constraints()[1];
        assert_eq!(ge.lhs().coefficient(4), rat!(-1));
        assert_eq!(ge.lhs().coefficient(5), rat!(1));
    }

    #[test]
    fn single_coefficient_row_gets_surplus_and_artificial() {
        let p = Problem::new(
            Objective::minimize(LinearExpr::from_pairs([(1, 1)])),
            vec![Constraint::bound(1, Comp::Ge, 3)],
        )
        .unwrap();
        let sf = p.as_standard_form().unwrap();
        assert_eq!(sf.problem().constraints()[0].lhs().len(), 3);
        assert_eq!(sf.kind(2), VarKind::Surplus);
        assert_eq!(sf.kind(3), VarKind::Artificial);
        assert_eq!(sf.kind(1), VarKind::Decision);
    }

    #[test]
    fn slack_indices_skip_constraint_only_variables() {
        let p = Problem::new(
            Objective::maximize(LinearExpr::from_pairs([(1, 1)])),
            vec![Constraint::new(LinearExpr::from_pairs([(1, 1), (4, 1)]), Comp::Le, 2)],
        )
        .unwrap();
        let sf = p.as_standard_form().unwrap();
        assert_eq!(sf.added(), &[(5, VarKind::Slack)]);
    }

    #[test]
    fn negative_rhs_is_normalized() {
        let p = Problem::new(
            Objective::maximize(LinearExpr::from_pairs([(1, 1)])),
            vec![Constraint::new(LinearExpr::from_pairs([(1, -1)]), Comp::Le, -2)],
        )
        .unwrap();
        let sf = p.as_standard_form().unwrap();
        let row = &sf.problem().constraints()[0];
        assert_eq!(row.rhs(), &rat!(2));
        assert_eq!(row.lhs().coefficient(1), rat!(1));
        assert_eq!(sf.artificial_vars().len(), 1);
    }

    #[test]
    fn standardizing_twice_adds_nothing() {
        let once = mixed().as_standard_form().unwrap();
        let twice = once.problem().as_standard_form().unwrap();
        assert!(twice.artificial_vars().is_empty());
        assert!(twice.added().is_empty());
        assert_eq!(twice.basis(), once.basis());
        assert_eq!(twice.problem(), once.problem());
    }
}
