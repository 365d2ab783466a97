//! Numeric coefficients: exact rationals with a float fallback.
//!
//! Arithmetic is carried out in `i128` and reduced before narrowing back to
//! `i64`; results that cannot be represented exactly degrade to `f64`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

fn gcd128(mut a: i128, mut b: i128) -> i128 {
    a = a.abs();
    b = b.abs();
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a.max(1)
}

/// A numeric coefficient.
///
/// `Rational(n, d)` keeps the invariant `d > 0`, `gcd(n, d) == 1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Coefficient {
    Rational(i64, i64),
    Float(f64),
}

impl Coefficient {
    pub fn int(n: i64) -> Self {
        Coefficient::Rational(n, 1)
    }

    pub fn rational(num: i64, den: i64) -> Self {
        Self::from_i128(num as i128, den as i128)
    }

    pub fn float(f: f64) -> Self {
        Coefficient::Float(f)
    }

    /// Build a reduced rational, falling back to float when the reduced
    /// form does not fit `i64` or the denominator is zero.
    fn from_i128(num: i128, den: i128) -> Self {
        if den == 0 {
            return Coefficient::Float(if num >= 0 {
                f64::INFINITY
            } else {
                f64::NEG_INFINITY
            });
        }
        let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
        let g = gcd128(num, den);
        let (num, den) = (num / g, den / g);
        if let (Ok(n), Ok(d)) = (i64::try_from(num), i64::try_from(den)) {
            Coefficient::Rational(n, d)
        } else {
            Coefficient::Float(num as f64 / den as f64)
        }
    }

    /// Keep integral floats exact.
    pub fn from_f64_exact(f: f64) -> Self {
        if f.fract() == 0.0 && f.is_finite() && f.abs() < i64::MAX as f64 {
            Coefficient::int(f as i64)
        } else {
            Coefficient::Float(f)
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Coefficient::Rational(n, _) => *n == 0,
            Coefficient::Float(f) => *f == 0.0,
        }
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Coefficient::Rational(1, 1))
            || matches!(self, Coefficient::Float(f) if (*f - 1.0).abs() < 1e-15)
    }

    pub fn is_neg_one(&self) -> bool {
        matches!(self, Coefficient::Rational(-1, 1))
            || matches!(self, Coefficient::Float(f) if (*f + 1.0).abs() < 1e-15)
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Coefficient::Rational(n, _) => *n < 0,
            Coefficient::Float(f) => *f < 0.0,
        }
    }

    pub fn is_integer(&self) -> bool {
        match self {
            Coefficient::Rational(_, d) => *d == 1,
            Coefficient::Float(f) => f.is_finite() && f.fract() == 0.0,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Coefficient::Rational(n, 1) => Some(*n),
            Coefficient::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Coefficient::Rational(n, d) => *n as f64 / *d as f64,
            Coefficient::Float(f) => *f,
        }
    }

    pub fn abs(&self) -> Self {
        match self {
            Coefficient::Rational(n, d) => Coefficient::Rational(n.abs(), *d),
            Coefficient::Float(f) => Coefficient::Float(f.abs()),
        }
    }

    pub fn recip(&self) -> Self {
        match self {
            Coefficient::Rational(n, d) => Self::from_i128(*d as i128, *n as i128),
            Coefficient::Float(f) => Coefficient::Float(1.0 / f),
        }
    }

    pub fn pow_int(&self, exp: i64) -> Self {
        if exp == 0 {
            return Coefficient::int(1);
        }
        if exp < 0 {
            return self.pow_int(-exp).recip();
        }
        match self {
            // Anything past i64 squares overflows anyway; go straight to float.
            Coefficient::Rational(_, _) if exp > 127 => {
                Coefficient::Float(self.to_f64().powf(exp as f64))
            }
            Coefficient::Rational(n, d) => {
                let mut num: i128 = 1;
                let mut den: i128 = 1;
                for _ in 0..exp {
                    num = match num.checked_mul(*n as i128) {
                        Some(v) => v,
                        None => return Coefficient::Float(self.to_f64().powi(exp as i32)),
                    };
                    den = match den.checked_mul(*d as i128) {
                        Some(v) => v,
                        None => return Coefficient::Float(self.to_f64().powi(exp as i32)),
                    };
                }
                Self::from_i128(num, den)
            }
            Coefficient::Float(f) => Coefficient::Float(f.powi(exp as i32)),
        }
    }

    /// Exact square root, when both numerator and denominator are perfect
    /// squares of a non-negative rational.
    pub fn sqrt_exact(&self) -> Option<Self> {
        self.nth_root_exact(2)
    }

    /// Exact `n`-th root of a rational, when one exists. Negative bases are
    /// allowed for odd `n`.
    pub fn nth_root_exact(&self, n: u32) -> Option<Self> {
        let Coefficient::Rational(num, den) = self else {
            return None;
        };
        if n == 0 || (*num < 0 && n % 2 == 0) {
            return None;
        }
        let root_i64 = |v: i64| -> Option<i64> {
            let r = (v.abs() as f64).powf(1.0 / n as f64).round() as i64;
            let r = if v < 0 { -r } else { r };
            for candidate in [r - 1, r, r + 1] {
                let mut acc: i128 = 1;
                for _ in 0..n {
                    acc = acc.checked_mul(candidate as i128)?;
                }
                if acc == v as i128 {
                    return Some(candidate);
                }
            }
            None
        };
        Some(Coefficient::Rational(root_i64(*num)?, root_i64(*den)?))
    }
}

impl Default for Coefficient {
    fn default() -> Self {
        Coefficient::int(0)
    }
}

impl From<i64> for Coefficient {
    fn from(n: i64) -> Self {
        Coefficient::int(n)
    }
}

impl From<f64> for Coefficient {
    fn from(f: f64) -> Self {
        Coefficient::from_f64_exact(f)
    }
}

impl PartialEq for Coefficient {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Coefficient::Rational(n1, d1), Coefficient::Rational(n2, d2)) => {
                n1 == n2 && d1 == d2
            }
            (a, b) => {
                let (a, b) = (a.to_f64(), b.to_f64());
                (a - b).abs() < 1e-15 || (a.is_nan() && b.is_nan())
            }
        }
    }
}

impl Eq for Coefficient {}

impl PartialOrd for Coefficient {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coefficient {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_f64()
            .partial_cmp(&other.to_f64())
            .unwrap_or(Ordering::Equal)
    }
}

impl std::hash::Hash for Coefficient {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Coefficient::Rational(n, d) => {
                state.write_u8(0);
                n.hash(state);
                d.hash(state);
            }
            Coefficient::Float(f) => {
                state.write_u8(1);
                f.to_bits().hash(state);
            }
        }
    }
}

impl Neg for Coefficient {
    type Output = Coefficient;
    fn neg(self) -> Coefficient {
        match self {
            Coefficient::Rational(n, d) => Coefficient::Rational(-n, d),
            Coefficient::Float(f) => Coefficient::Float(-f),
        }
    }
}

impl Add for Coefficient {
    type Output = Coefficient;
    fn add(self, rhs: Coefficient) -> Coefficient {
        match (self, rhs) {
            (Coefficient::Rational(n1, d1), Coefficient::Rational(n2, d2)) => {
                let num = n1 as i128 * d2 as i128 + n2 as i128 * d1 as i128;
                let den = d1 as i128 * d2 as i128;
                Coefficient::from_i128(num, den)
            }
            (a, b) => Coefficient::Float(a.to_f64() + b.to_f64()),
        }
    }
}

impl Sub for Coefficient {
    type Output = Coefficient;
    fn sub(self, rhs: Coefficient) -> Coefficient {
        self + (-rhs)
    }
}

impl Mul for Coefficient {
    type Output = Coefficient;
    fn mul(self, rhs: Coefficient) -> Coefficient {
        match (self, rhs) {
            (Coefficient::Rational(n1, d1), Coefficient::Rational(n2, d2)) => {
                let num = n1 as i128 * n2 as i128;
                let den = d1 as i128 * d2 as i128;
                Coefficient::from_i128(num, den)
            }
            (a, b) => Coefficient::Float(a.to_f64() * b.to_f64()),
        }
    }
}

impl Div for Coefficient {
    type Output = Coefficient;
    fn div(self, rhs: Coefficient) -> Coefficient {
        self * rhs.recip()
    }
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coefficient::Rational(n, d) => {
                if *d == 1 {
                    write!(f, "{n}")
                } else {
                    write!(f, "{n}/{d}")
                }
            }
            Coefficient::Float(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rational_arithmetic_is_exact() {
        let half = Coefficient::rational(1, 2);
        let third = Coefficient::rational(1, 3);
        assert_eq!(half.clone() + third.clone(), Coefficient::rational(5, 6));
        assert_eq!(half.clone() * third.clone(), Coefficient::rational(1, 6));
        assert_eq!(half / third, Coefficient::rational(3, 2));
    }

    #[test]
    fn construction_reduces_and_normalizes_sign() {
        assert_eq!(Coefficient::rational(4, 6), Coefficient::rational(2, 3));
        assert_eq!(Coefficient::rational(1, -2), Coefficient::rational(-1, 2));
    }

    #[test]
    fn overflowing_arithmetic_degrades_to_float() {
        let big = Coefficient::int(i64::MAX);
        let sum = big.clone() * big;
        assert!(matches!(sum, Coefficient::Float(_)));
    }

    #[test]
    fn powers_and_roots() {
        assert_eq!(
            Coefficient::rational(2, 3).pow_int(2),
            Coefficient::rational(4, 9)
        );
        assert_eq!(
            Coefficient::rational(2, 3).pow_int(-1),
            Coefficient::rational(3, 2)
        );
        assert_eq!(
            Coefficient::rational(4, 9).sqrt_exact(),
            Some(Coefficient::rational(2, 3))
        );
        assert_eq!(Coefficient::int(2).sqrt_exact(), None);
        assert_eq!(Coefficient::int(-4).sqrt_exact(), None);
    }

    #[test]
    fn display() {
        assert_eq!(Coefficient::int(5).to_string(), "5");
        assert_eq!(Coefficient::rational(3, 2).to_string(), "3/2");
    }
}
