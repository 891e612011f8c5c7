use rustc_hash::FxHashMap;

use std::fmt;

use crate::linear_expr::{write_term, LinearExpr};
use crate::rational::Rational;
use crate::standard_form::StandardForm;

/// Role a variable plays once the problem is in standard form.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VarKind {
    Decision,
    Slack,
    Surplus,
    Artificial,
}

impl Default for VarKind {
    fn default() -> Self {
        VarKind::Decision
    }
}

/// Caller-owned side table from variable index to display name.
///
/// The solver never writes to it; front ends fill it while parsing and may call
/// [`VariableNames::label_added`] to name the columns inserted by standardization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VariableNames {
    names: FxHashMap<usize, String>,
}

impl VariableNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name<T: ToString>(mut self, index: usize, name: T) -> Self {
        self.set_name(index, name);
        self
    }

    pub fn set_name<T: ToString>(&mut self, index: usize, name: T) {
        self.names.insert(index, name.to_string());
    }

    pub fn contains(&self, index: usize) -> bool {
        self.names.contains_key(&index)
    }

    /// Display name, `x_<index>` when none was registered.
    pub fn name(&self, index: usize) -> String {
        match self.names.get(&index) {
            Some(name) => name.clone(),
            None => format!("x_{}", index),
        }
    }

    /// Names slack/surplus columns `s_1, s_2, ...` and artificial columns `a_1, a_2, ...`
    /// in allocation order, leaving already named indices alone.
    pub fn label_added(&mut self, std_form: &StandardForm) {
        let mut s_counter = 0;
        let mut a_counter = 0;
        for &(index, kind) in std_form.added() {
            let name = match kind {
                VarKind::Slack | VarKind::Surplus => {
                    s_counter += 1;
                    format!("s_{}", s_counter)
                }
                VarKind::Artificial => {
                    a_counter += 1;
                    format!("a_{}", a_counter)
                }
                VarKind::Decision => continue,
            };
            self.names.entry(index).or_insert(name);
        }
    }

    pub fn format_term(&self, index: usize, value: &Rational) -> String {
        NamedTerm {
            value,
            name: self.name(index),
        }
        .to_string()
    }

    pub fn format_expr(&self, expr: &LinearExpr) -> String {
        NamedExpr { names: self, expr }.to_string()
    }
}

struct NamedTerm<'a> {
    value: &'a Rational,
    name: String,
}

impl fmt::Display for NamedTerm<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_term(f, self.value, &self.name)
    }
}

struct NamedExpr<'a> {
    names: &'a VariableNames,
    expr: &'a LinearExpr,
}

impl fmt::Display for NamedExpr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.expr.is_empty() {
            return write!(f, "0");
        }
        for (i, c) in self.expr.terms().iter().enumerate() {
            let name = self.names.name(c.index);
            if i == 0 {
                write_term(f, &c.value, &name)?;
            } else if c.value.is_negative() {
                write!(f, " - ")?;
                write_term(f, &-&c.value, &name)?;
            } else {
                write!(f, " + ")?;
                write_term(f, &c.value, &name)?;
            }
        }
        Ok(())
    }
}
