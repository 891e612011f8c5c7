use rustc_hash::FxHashMap;

use std::fmt;
use std::str::FromStr;

use crate::error::LpError;
use crate::linear_expr::LinearExpr;
use crate::rational::Rational;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comp {
    Le, // <=
    Ge, // >=
    Eq, // ==
}

impl Comp {
    /// Relation obtained after multiplying both sides by -1.
    pub fn flipped(self) -> Self {
        match self {
            Comp::Le => Comp::Ge,
            Comp::Eq => Comp::Eq,
            Comp::Ge => Comp::Le,
        }
    }

    pub fn holds(self, lhs: &Rational, rhs: &Rational) -> bool {
        match self {
            Comp::Le => lhs <= rhs,
            Comp::Eq => lhs == rhs,
            Comp::Ge => lhs >= rhs,
        }
    }
}

impl fmt::Display for Comp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Comp::Le => write!(f, "\u{2264}"),
            Comp::Eq => write!(f, "="),
            Comp::Ge => write!(f, "\u{2265}"),
        }
    }
}

impl FromStr for Comp {
    type Err = LpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "\\leq" | "<=" | "\u{2264}" => Ok(Comp::Le),
            "\\geq" | ">=" | "\u{2265}" => Ok(Comp::Ge),
            "=" | "==" => Ok(Comp::Eq),
            other => Err(LpError::MalformedProblem(format!(
                "unrecognized relation operator `{}`",
                other
            ))),
        }
    }
}

/// `lhs comp rhs` over indexed decision variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constraint {
    pub(crate) lhs: LinearExpr,
    pub(crate) comp: Comp,
    pub(crate) rhs: Rational,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.comp, self.rhs)
    }
}

impl Constraint {
    pub fn new<T: Into<Rational>>(lhs: LinearExpr, comp: Comp, rhs: T) -> Self {
        Self {
            lhs,
            comp,
            rhs: rhs.into(),
        }
    }

    /// Single-variable bound `x_index comp rhs`, as added when branching.
    pub fn bound<T: Into<Rational>>(index: usize, comp: Comp, rhs: T) -> Self {
        Self::new(LinearExpr::new().with_term(index, 1), comp, rhs)
    }

    pub fn lhs(&self) -> &LinearExpr {
        &self.lhs
    }

    pub fn rhs(&self) -> &Rational {
        &self.rhs
    }

    pub fn comp(&self) -> Comp {
        self.comp
    }

    pub fn is_satisfied_by(&self, values: &FxHashMap<usize, Rational>) -> bool {
        self.comp.holds(&self.lhs.eval(values), &self.rhs)
    }

    /// Equivalent constraint with a non-negative right-hand side.
    pub fn with_nonnegative_rhs(&self) -> Self {
        if !self.rhs.is_negative() {
            return self.clone();
        }
        let mut lhs = self.lhs.clone();
        lhs.negate();
        Self {
            lhs,
            comp: self.comp.flipped(),
            rhs: -&self.rhs,
        }
    }
}
