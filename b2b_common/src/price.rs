use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Mul, Sub},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;

use crate::op;

//--------------------------------------       Price         ---------------------------------------------------------
/// A price in whole currency units, as quoted in supplier price lists.
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct Price(i64);

op!(binary Price, Add, add);
op!(binary Price, Sub, sub);
op!(inplace Price, AddAssign, add_assign);

/// Line-item totals: unit price × quantity. Saturates at the bounds of `i64`.
impl Mul<i64> for Price {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self(self.0.saturating_mul(rhs))
    }
}

/// Order totals. Saturates at the bounds of `i64`, like [`Price::mul`].
impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, p| Self(acc.0.saturating_add(p.0)))
    }
}

impl From<i64> for Price {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Price {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}
