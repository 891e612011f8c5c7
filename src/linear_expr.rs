use num::{One, Zero};
use rustc_hash::FxHashMap;
use serde::Serialize;

use std::fmt;

use crate::rational::Rational;

/// One term `value·x_index`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Coefficient {
    pub index: usize,
    pub value: Rational,
}

impl Coefficient {
    pub fn new<T: Into<Rational>>(index: usize, value: T) -> Self {
        Self {
            index,
            value: value.into(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn value(&self) -> &Rational {
        &self.value
    }
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_term(f, &self.value, &format!("x_{}", self.index))
    }
}

/// Writes `value·name` the way a person would: `x_1`, `-x_1`, `3x_1`, `3/2x_1`.
pub(crate) fn write_term(f: &mut fmt::Formatter, value: &Rational, name: &str) -> fmt::Result {
    if value.is_one() {
        write!(f, "{}", name)
    } else if (-value).is_one() {
        write!(f, "-{}", name)
    } else {
        write!(f, "{}{}", value, name)
    }
}

/// Ordered list of coefficients with at most one entry per variable index.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LinearExpr {
    pub(crate) terms: Vec<Coefficient>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds from `(index, value)` pairs, keeping first-occurrence order.
    pub fn from_pairs<T: Into<Rational>, I: IntoIterator<Item = (usize, T)>>(pairs: I) -> Self {
        pairs
            .into_iter()
            .map(|(index, value)| Coefficient::new(index, value))
            .collect()
    }

    /// Adds `value·x_index`, merging with an existing term on the same index.
    pub fn add_term<T: Into<Rational>>(&mut self, index: usize, value: T) {
        let value = value.into();
        match self.terms.iter_mut().find(|c| c.index == index) {
            Some(c) => c.value += value,
            None => self.terms.push(Coefficient { index, value }),
        }
    }

    pub fn with_term<T: Into<Rational>>(mut self, index: usize, value: T) -> Self {
        self.add_term(index, value);
        self
    }

    pub fn terms(&self) -> &[Coefficient] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.terms.iter().map(|c| c.index)
    }

    pub fn max_index(&self) -> Option<usize> {
        self.indices().max()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.terms.iter().any(|c| c.index == index)
    }

    /// Coefficient of `x_index`, zero when absent.
    pub fn coefficient(&self, index: usize) -> Rational {
        self.terms
            .iter()
            .find(|c| c.index == index)
            .map(|c| c.value.clone())
            .unwrap_or_else(Rational::zero)
    }

    pub(crate) fn sort_by_index(&mut self) {
        self.terms.sort_by_key(|c| c.index);
    }

    pub(crate) fn negate(&mut self) {
        for c in self.terms.iter_mut() {
            c.value = -&c.value;
        }
    }

    /// Value of the expression for the given assignment; missing variables count as zero.
    pub fn eval(&self, values: &FxHashMap<usize, Rational>) -> Rational {
        self.terms
            .iter()
            .filter_map(|c| values.get(&c.index).map(|v| &c.value * v))
            .sum()
    }

    pub(crate) fn as_map(&self) -> FxHashMap<usize, Rational> {
        self.terms
            .iter()
            .map(|c| (c.index, c.value.clone()))
            .collect()
    }
}

impl FromIterator<Coefficient> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = Coefficient>>(iter: I) -> Self {
        let mut expr = LinearExpr::new();
        for c in iter {
            expr.add_term(c.index, c.value);
        }
        expr
    }
}

impl fmt::Display for LinearExpr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (i, c) in self.terms.iter().enumerate() {
            if i == 0 {
                write!(f, "{}", c)?;
            } else if c.value.is_negative() {
                write!(f, " - {}", Coefficient::new(c.index, -&c.value))?;
            } else {
                write!(f, " + {}", c)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rat;

    #[test]
    fn merges_repeated_indices() {
        let expr = LinearExpr::from_pairs([(1, 2), (2, 1), (1, 3)]);
        assert_eq!(expr.len(), 2);
        assert_eq!(expr.coefficient(1), rat!(5));
        assert_eq!(expr.coefficient(7), rat!(0));
        assert_eq!(expr.max_index(), Some(2));
    }

    #[test]
    fn evaluates_with_missing_as_zero() {
        let expr = LinearExpr::from_pairs([(1, 2), (2, 3)]);
        let mut values = FxHashMap::default();
        values.insert(1, rat!(1, 2));
        assert_eq!(expr.eval(&values), rat!(1));
    }

    #[test]
    fn displays_signed_terms() {
        let expr = LinearExpr::new()
            .with_term(1, 1)
            .with_term(2, -1)
            .with_term(3, rat!(3, 2))
            .with_term(4, -2);
        assert_eq!(expr.to_string(), "x_1 - x_2 + 3/2x_3 - 2x_4");
    }
}
