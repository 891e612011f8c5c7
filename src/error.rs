use thiserror::Error;

/// Result type for solver operations
pub type Result<T> = std::result::Result<T, LpError>;

/// Errors reported by the solver to its immediate caller
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LpError {
    /// Structurally invalid input: empty coefficient list, unknown relation
    #[error("malformed problem: {0}")]
    MalformedProblem(String),

    /// No assignment satisfies every constraint
    #[error("infeasible problem: {0}")]
    InfeasibleProblem(String),

    /// The entering variable can grow without limit
    #[error("unbounded problem: x_{variable} can increase without limit")]
    Unbounded { variable: usize },

    /// A session node was asked for a branch it does not expose
    #[error("node {node} has no branch on x_{variable}")]
    UnknownBranch { node: usize, variable: usize },
}

/// Failure to read a rational literal such as `3/4` or `1.25`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid rational literal `{literal}`")]
pub struct ParseRationalError {
    pub literal: String,
}

impl From<ParseRationalError> for LpError {
    fn from(err: ParseRationalError) -> Self {
        LpError::MalformedProblem(err.to_string())
    }
}
