use colored::*;
use dotenv::dotenv;
use log::info;

use ratplex::{
    BranchAndBound, BranchSession, Comp, Constraint, LinearExpr, Objective, Problem, Side,
    SolveAlgorithm, SolverConfig, TwoPhase, VariableNames,
};

fn report_lp(title: &str, problem: &Problem, solver: &TwoPhase) {
    println!("{}", title.bold());
    println!("{}", problem);
    match solver.solve_to_tableau(problem) {
        Ok((result, tableau)) => {
            let mut names = VariableNames::new();
            if let Ok(std_form) = problem.as_standard_form() {
                names.label_added(&std_form);
            }
            println!("final tableau:\n{}", tableau.display_with(&names));
            println!("{}\n", result);
        }
        Err(err) => println!("{}\n", err.to_string().red()),
    }
}

fn main() -> ratplex::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = SolverConfig::from_env();
    info!("solver configuration: {:?}", config);
    let solver = TwoPhase::new(config.clone());

    let textbook = Problem::new(
        Objective::maximize(LinearExpr::from_pairs([(1, 2), (2, 3)])),
        vec![
            Constraint::new(LinearExpr::from_pairs([(1, 1), (2, 1)]), Comp::Le, 4),
            Constraint::new(LinearExpr::from_pairs([(1, 1), (2, 2)]), Comp::Le, 5),
        ],
    )?;
    report_lp("maximization", &textbook, &solver);

    let degenerate = Problem::new(
        Objective::minimize(LinearExpr::from_pairs([(1, 1), (2, 1)])),
        vec![
            Constraint::new(LinearExpr::from_pairs([(1, 1), (2, 1)]), Comp::Ge, 2),
            Constraint::bound(1, Comp::Ge, 0),
            Constraint::bound(2, Comp::Ge, 0),
        ],
    )?;
    report_lp("degenerate minimization", &degenerate, &solver);

    let infeasible = Problem::new(
        Objective::maximize(LinearExpr::from_pairs([(1, 1)])),
        vec![Constraint::bound(1, Comp::Le, 1), Constraint::bound(1, Comp::Ge, 3)],
    )?;
    report_lp("infeasible system", &infeasible, &solver);

    let integer = Problem::new(
        Objective::maximize(LinearExpr::from_pairs([(1, 1)])),
        vec![Constraint::new(LinearExpr::from_pairs([(1, 2)]), Comp::Le, 3)],
    )?;
    println!("{}", "integer program".bold());
    println!("{}", integer);
    println!("relaxation:\n{}", solver.solve(&integer)?);
    let bnb = BranchAndBound::from_config(config.clone()).solve(&integer)?;
    println!("integral solution:\n{}", bnb.solution());
    println!("{:?}\n", bnb.stats());

    let knapsack = Problem::new(
        Objective::maximize(LinearExpr::from_pairs([(1, 5), (2, 4)])),
        vec![
            Constraint::new(LinearExpr::from_pairs([(1, 6), (2, 4)]), Comp::Le, 24),
            Constraint::new(LinearExpr::from_pairs([(1, 1), (2, 2)]), Comp::Le, 6),
        ],
    )?;
    println!("{}", "branch session".bold());
    let mut session = BranchSession::from_config(config, knapsack);
    let variables: Vec<usize> = match session.root().outcome() {
        Ok(result) => result.branches().keys().copied().collect(),
        Err(_err) => Vec::new(),
    };
    for variable in variables {
        session.expand(0, variable, Side::Leq)?;
        session.expand(0, variable, Side::Geq)?;
    }
    for node in session.nodes() {
        let depth = session.path(node.id()).len() - 1;
        let outcome = match node.outcome() {
            Ok(result) => format!("Z = {}", result.solution().objective_value()).green(),
            Err(err) => err.to_string().red(),
        };
        println!("{}{} [{}] {}", "  ".repeat(depth), node.id(), node.label(), outcome);
    }

    Ok(())
}
