//! Property-based tests for the two-phase solver and branch and bound
//!
//! This module tests:
//! - feasibility and optimality of random bounded LPs
//! - infeasibility detection
//! - integrality of branch and bound and agreement with enumeration

use proptest::prelude::*;
use ratplex::simplex::Simplex;
use ratplex::{
    branch_and_bound, rat, Comp, Constraint, LinearExpr, LpError, Objective, OptDir, PivotRule,
    Problem, Rational, SolverConfig, TwoPhase,
};
use rustc_hash::FxHashMap;

/// Non-zero objective coefficient
fn cost_strategy() -> impl Strategy<Value = i64> {
    (1i64..6, any::<bool>()).prop_map(|(v, neg)| if neg { -v } else { v })
}

fn dot(coefs: &[i64], point: &[i64]) -> i64 {
    coefs.iter().zip(point).map(|(a, x)| a * x).sum()
}

fn expr(coefs: &[i64]) -> LinearExpr {
    LinearExpr::from_pairs(coefs.iter().enumerate().map(|(i, &a)| (i + 1, a)))
}

fn assignment(point: &[i64]) -> FxHashMap<usize, Rational> {
    point
        .iter()
        .enumerate()
        .map(|(i, &x)| (i + 1, rat!(x)))
        .collect()
}

/// Random LP built around a known feasible integer point, bounded by a row over every
/// variable.
#[derive(Clone, Debug)]
struct Instance {
    problem: Problem,
    point: Vec<i64>,
}

fn instance_strategy() -> impl Strategy<Value = Instance> {
    (2usize..4)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(0i64..4, n),
                prop::collection::vec(cost_strategy(), n),
                prop::collection::vec(
                    (prop::collection::vec(0i64..5, n), 0usize..3, 0i64..4),
                    1..4,
                ),
                any::<bool>(),
            )
        })
        .prop_map(|(point, costs, rows, maximize)| {
            let objective = if maximize {
                Objective::maximize(expr(&costs))
            } else {
                Objective::minimize(expr(&costs))
            };

            let mut constraints: Vec<Constraint> = rows
                .into_iter()
                .filter(|(coefs, _comp, _slack)| coefs.iter().any(|&a| a != 0))
                .map(|(coefs, comp, slack)| {
                    let at_point = dot(&coefs, &point);
                    let (comp, rhs) = match comp {
                        0 => (Comp::Le, at_point + slack),
                        1 => (Comp::Ge, (at_point - slack).max(0)),
                        _ => (Comp::Eq, at_point),
                    };
                    let coefs: Vec<(usize, i64)> = coefs
                        .iter()
                        .enumerate()
                        .filter(|(_i, &a)| a != 0)
                        .map(|(i, &a)| (i + 1, a))
                        .collect();
                    Constraint::new(LinearExpr::from_pairs(coefs), comp, rhs)
                })
                .collect();
            let ones = vec![1; point.len()];
            constraints.push(Constraint::new(expr(&ones), Comp::Le, dot(&ones, &point) + 3));

            Instance {
                problem: Problem::new(objective, constraints).unwrap(),
                point,
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn optimum_is_feasible_and_optimal(instance in instance_strategy(), bland in any::<bool>()) {
        let rule = if bland { PivotRule::Bland } else { PivotRule::Dantzig };
        let solver = TwoPhase::new(SolverConfig::default().with_pivot_rule(rule));
        let problem = &instance.problem;

        let (result, tableau) = solver.solve_to_tableau(problem).unwrap();
        prop_assert!(problem.is_feasible(&result.values()));
        prop_assert_eq!(&problem.evaluate(&result.values()), result.objective_value());
        prop_assert_eq!(Simplex::entering_column(&tableau, problem.opt_dir(), rule), None);

        //never worse than the point the instance was built around
        let known = problem.evaluate(&assignment(&instance.point));
        prop_assert!(!problem.opt_dir().improves(&known, result.objective_value()));
    }

    #[test]
    fn contradictory_bounds_are_infeasible(
        instance in instance_strategy(),
        gap in 1i64..5,
    ) {
        let upper = instance.point.iter().sum::<i64>() + 3;
        let problem = instance
            .problem
            .with_constraint(Constraint::new(
                expr(&vec![1; instance.point.len()]),
                Comp::Ge,
                upper + gap,
            ));
        prop_assert!(matches!(
            TwoPhase::default().solve_to_tableau(&problem),
            Err(LpError::InfeasibleProblem(_))
        ));
    }

    #[test]
    fn branch_and_bound_matches_enumeration(
        costs in prop::collection::vec(1i64..7, 2),
        rows in prop::collection::vec((prop::collection::vec(1i64..6, 2), 0i64..16), 1..3),
        pruning in any::<bool>(),
    ) {
        let mut constraints: Vec<Constraint> = rows
            .iter()
            .map(|(coefs, rhs)| Constraint::new(expr(coefs), Comp::Le, *rhs))
            .collect();
        constraints.push(Constraint::bound(1, Comp::Le, 7));
        let problem = Problem::new(Objective::maximize(expr(&costs)), constraints).unwrap();

        let mut best: Option<i64> = None;
        for x1 in 0..=15 {
            for x2 in 0..=15 {
                let point = [x1, x2];
                if rows.iter().all(|(coefs, rhs)| dot(coefs, &point) <= *rhs) && x1 <= 7 {
                    let value = dot(&costs, &point);
                    best = Some(best.map_or(value, |b| b.max(value)));
                }
            }
        }

        let bnb = ratplex::BranchAndBound::from_config(
            SolverConfig::default().with_incumbent_pruning(pruning),
        );
        let result = bnb.solve(&problem).unwrap();
        prop_assert!(result.solution().is_integral());
        prop_assert!(problem.is_feasible(&result.solution().values()));
        prop_assert_eq!(Some(result.solution().objective_value().clone()), best.map(Rational::from));
        prop_assert!(!OptDir::Max.improves(result.solution().objective_value(), result.relaxation().objective_value()));
    }

    #[test]
    fn branch_and_bound_is_integral_for_minimization(
        costs in prop::collection::vec(1i64..7, 2),
        coefs in prop::collection::vec(1i64..6, 2),
        rhs in 1i64..20,
    ) {
        //min c·x s.t. a·x >= rhs has an integral optimum reachable by rounding up
        let problem = Problem::new(
            Objective::minimize(expr(&costs)),
            vec![Constraint::new(expr(&coefs), Comp::Ge, rhs)],
        )
        .unwrap();
        let result = branch_and_bound(&problem).unwrap();
        prop_assert!(result.solution().is_integral());
        prop_assert!(problem.is_feasible(&result.solution().values()));
        prop_assert!(!OptDir::Min.improves(result.solution().objective_value(), result.relaxation().objective_value()));
    }
}
