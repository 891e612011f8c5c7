use num::{BigInt, BigRational, One, Signed, ToPrimitive, Zero};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use crate::error::ParseRationalError;

/// Shorthand for creating a rational number.
#[macro_export]
macro_rules! rat {
    ($value:expr) => {
        $crate::rational::Rational::from_integer($value as i64)
    };
    ($numer:expr, $denom:expr) => {
        $crate::rational::Rational::new($numer as i64, $denom as i64)
    };
}

/// Exact fraction, always stored in lowest terms with a positive denominator.
///
/// Every coefficient, pivot and result of the solver is a `Rational`, so repeated division
/// during pivoting never accumulates rounding error.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rational(BigRational);

impl Rational {
    /// Panics when `denom` is zero, like `num::BigRational::new`.
    pub fn new(numer: i64, denom: i64) -> Self {
        Self(BigRational::new(BigInt::from(numer), BigInt::from(denom)))
    }

    pub fn from_integer(value: i64) -> Self {
        Self(BigRational::from_integer(BigInt::from(value)))
    }

    pub fn inner(&self) -> &BigRational {
        &self.0
    }

    pub fn numer(&self) -> &BigInt {
        self.0.numer()
    }

    pub fn denom(&self) -> &BigInt {
        self.0.denom()
    }

    /// Exact numerator/denominator pair.
    pub fn to_pair(&self) -> (BigInt, BigInt) {
        (self.numer().clone(), self.denom().clone())
    }

    /// Decimal approximation, NaN when either part does not fit an `f64`.
    pub fn to_f64(&self) -> f64 {
        match (self.numer().to_f64(), self.denom().to_f64()) {
            (Some(n), Some(d)) => n / d,
            _ => f64::NAN,
        }
    }

    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn floor(&self) -> Self {
        Self(self.0.floor())
    }

    pub fn ceil(&self) -> Self {
        Self(self.0.ceil())
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::zero()
    }
}

impl Zero for Rational {
    fn zero() -> Self {
        Self(BigRational::zero())
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Rational {
    fn one() -> Self {
        Self(BigRational::one())
    }
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl From<i32> for Rational {
    fn from(value: i32) -> Self {
        Self::from_integer(value as i64)
    }
}

impl From<BigInt> for Rational {
    fn from(value: BigInt) -> Self {
        Self(BigRational::from_integer(value))
    }
}

impl From<BigRational> for Rational {
    fn from(value: BigRational) -> Self {
        Self(value)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numer())
        } else {
            write!(f, "{}/{}", self.numer(), self.denom())
        }
    }
}

impl FromStr for Rational {
    type Err = ParseRationalError;

    /// Accepts `-3`, `3/4` and decimal literals such as `1.25`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let literal = s.trim();
        let err = || ParseRationalError {
            literal: s.to_string(),
        };

        if let Some((numer, denom)) = literal.split_once('/') {
            let numer = BigInt::from_str(numer.trim()).map_err(|_| err())?;
            let denom = BigInt::from_str(denom.trim()).map_err(|_| err())?;
            if denom.is_zero() {
                return Err(err());
            }
            return Ok(Self(BigRational::new(numer, denom)));
        }

        if let Some((whole, frac)) = literal.split_once('.') {
            if frac.is_empty() || !frac.chars().all(|c| c.is_ascii_digit()) {
                return Err(err());
            }
            let (negative, whole) = match whole.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, whole.strip_prefix('+').unwrap_or(whole)),
            };
            if !whole.chars().all(|c| c.is_ascii_digit()) {
                return Err(err());
            }
            let digits = format!("{}{}", whole, frac);
            let mut numer = BigInt::from_str(&digits).map_err(|_| err())?;
            if negative {
                numer = -numer;
            }
            let denom = num::pow(BigInt::from(10), frac.len());
            return Ok(Self(BigRational::new(numer, denom)));
        }

        BigInt::from_str(literal)
            .map(Self::from)
            .map_err(|_| err())
    }
}

impl Serialize for Rational {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Rational", 3)?;
        state.serialize_field("numerator", &self.numer().to_string())?;
        state.serialize_field("denominator", &self.denom().to_string())?;
        state.serialize_field("approximation", &self.to_f64())?;
        state.end()
    }
}

macro_rules! forward_binop {
    ($imp:ident, $method:ident, $assign_imp:ident, $assign_method:ident) => {
        impl $imp<Rational> for Rational {
            type Output = Rational;

            fn $method(self, rhs: Rational) -> Rational {
                Rational(self.0.$method(rhs.0))
            }
        }

        impl<'a> $imp<&'a Rational> for Rational {
            type Output = Rational;

            fn $method(self, rhs: &'a Rational) -> Rational {
                Rational(self.0.$method(&rhs.0))
            }
        }

        impl<'a> $imp<Rational> for &'a Rational {
            type Output = Rational;

            fn $method(self, rhs: Rational) -> Rational {
                Rational((&self.0).$method(rhs.0))
            }
        }

        impl<'a, 'b> $imp<&'b Rational> for &'a Rational {
            type Output = Rational;

            fn $method(self, rhs: &'b Rational) -> Rational {
                Rational((&self.0).$method(&rhs.0))
            }
        }

        impl $assign_imp<Rational> for Rational {
            fn $assign_method(&mut self, rhs: Rational) {
                self.0.$assign_method(rhs.0);
            }
        }

        impl<'a> $assign_imp<&'a Rational> for Rational {
            fn $assign_method(&mut self, rhs: &'a Rational) {
                self.0.$assign_method(&rhs.0);
            }
        }
    };
}

forward_binop!(Add, add, AddAssign, add_assign);
forward_binop!(Sub, sub, SubAssign, sub_assign);
forward_binop!(Mul, mul, MulAssign, mul_assign);
forward_binop!(Div, div, DivAssign, div_assign);

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational(-self.0)
    }
}

impl<'a> Neg for &'a Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational(-&self.0)
    }
}

impl Sum for Rational {
    fn sum<I: Iterator<Item = Rational>>(iter: I) -> Self {
        iter.fold(Rational::zero(), |acc, v| acc + v)
    }
}

impl<'a> Sum<&'a Rational> for Rational {
    fn sum<I: Iterator<Item = &'a Rational>>(iter: I) -> Self {
        iter.fold(Rational::zero(), |acc, v| acc + v)
    }
}
