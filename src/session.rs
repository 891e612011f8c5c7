use log::debug;

use std::fmt;

use crate::branch_bound::{BnbResult, BranchAndBound};
use crate::config::SolverConfig;
use crate::error::{LpError, Result};
use crate::model::Problem;
use crate::solver::{SolveAlgorithm, TwoPhase};

pub type NodeId = usize;

/// Which of the two derived subproblems of a branch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// `x_i ≤ floor(v)`
    Leq,
    /// `x_i ≥ ceil(v)`
    Geq,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::Leq => write!(f, "≤"),
            Side::Geq => write!(f, "≥"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct BranchNode {
    pub(crate) id: NodeId,
    pub(crate) parent: Option<(NodeId, usize, Side)>,
    pub(crate) problem: Problem,
    pub(crate) outcome: std::result::Result<BnbResult, LpError>,
    pub(crate) children: Vec<NodeId>,
}

impl BranchNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Parent node, branching variable and side this node was derived from.
    pub fn parent(&self) -> Option<(NodeId, usize, Side)> {
        self.parent
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn outcome(&self) -> std::result::Result<&BnbResult, &LpError> {
        self.outcome.as_ref()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn label(&self) -> String {
        match self.parent {
            Some((_parent, variable, side)) => format!("x_{} {}", variable, side),
            None => "root".to_string(),
        }
    }
}

/// User driven exploration of a branch-and-bound tree.
///
/// Every node keeps the subproblem it was built from and the outcome of submitting it to
/// branch and bound. Nodes are only ever appended.
#[derive(Clone, Debug)]
pub struct BranchSession<A: SolveAlgorithm = TwoPhase> {
    bnb: BranchAndBound<A>,
    nodes: Vec<BranchNode>,
}

impl BranchSession<TwoPhase> {
    pub fn start(problem: Problem) -> Self {
        Self::with_solver(BranchAndBound::default(), problem)
    }

    pub fn from_config(config: SolverConfig, problem: Problem) -> Self {
        Self::with_solver(BranchAndBound::from_config(config), problem)
    }
}

impl<A: SolveAlgorithm> BranchSession<A> {
    pub fn with_solver(bnb: BranchAndBound<A>, problem: Problem) -> Self {
        let mut session = Self {
            bnb,
            nodes: Vec::new(),
        };
        session.push(None, problem);
        session
    }

    fn push(&mut self, parent: Option<(NodeId, usize, Side)>, problem: Problem) -> NodeId {
        let id = self.nodes.len();
        let outcome = self.bnb.solve(&problem);
        match &outcome {
            Ok(result) => debug!(
                "node {}: solution {}, {} branches",
                id,
                result.solution().objective_value(),
                result.branches().len()
            ),
            Err(err) => debug!("node {}: {}", id, err),
        }

        self.nodes.push(BranchNode {
            id,
            parent,
            problem,
            outcome,
            children: Vec::new(),
        });
        if let Some((parent, _variable, _side)) = parent {
            self.nodes[parent].children.push(id);
        }
        id
    }

    pub fn root(&self) -> &BranchNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: NodeId) -> Option<&BranchNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> &[BranchNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Submits one derived subproblem of `node` and appends it as a child. Expanding the
    /// same branch twice returns the existing child.
    pub fn expand(&mut self, node: NodeId, variable: usize, side: Side) -> Result<NodeId> {
        let unknown = LpError::UnknownBranch { node, variable };
        let parent = self.nodes.get(node).ok_or_else(|| unknown.clone())?;

        if let Some(&existing) = parent.children.iter().find(|&&child| {
            self.nodes[child].parent == Some((node, variable, side))
        }) {
            return Ok(existing);
        }

        let (leq, geq) = match &parent.outcome {
            Ok(result) => result.branch(variable).ok_or(unknown)?,
            Err(_err) => return Err(unknown),
        };
        let problem = match side {
            Side::Leq => leq.clone(),
            Side::Geq => geq.clone(),
        };

        debug!("expanding node {} on x_{} {}", node, variable, side);
        Ok(self.push(Some((node, variable, side)), problem))
    }

    /// Nodes on the path from the root to `id`, root first.
    pub fn path(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = self.nodes.get(id).map(|n| n.id);
        while let Some(id) = current {
            path.push(id);
            current = self.nodes[id].parent.map(|(parent, _variable, _side)| parent);
        }
        path.reverse();
        path
    }
}
