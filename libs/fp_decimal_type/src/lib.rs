//! Fixed-point decimal numbers backed by a primitive integer.
//!
//! `define_fpd_type!(name: Num, type: i64, precision: 3)` declares `Num`
//! storing `1.2` as `1200`. Sums of such values are exact, which keeps
//! comparisons between arc weights stable regardless of summation order.

pub use num_traits;

use std::fmt::{Display, Formatter};

pub const POW_10: [i128; 19] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
    100_000_000_000,
    1_000_000_000_000,
    10_000_000_000_000,
    100_000_000_000_000,
    1_000_000_000_000_000,
    10_000_000_000_000_000,
    100_000_000_000_000_000,
    1_000_000_000_000_000_000,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseDecimalError {
    Empty,
    InvalidDigit,
    /// more fractional digits than the type can hold
    TooPrecise { precision: usize },
    Overflow,
}

impl Display for ParseDecimalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "cannot parse decimal from empty string"),
            Self::InvalidDigit => write!(f, "invalid digit found in decimal"),
            Self::TooPrecise { precision } => {
                write!(f, "decimal has more than {} fractional digits", precision)
            }
            Self::Overflow => write!(f, "decimal out of range"),
        }
    }
}

impl std::error::Error for ParseDecimalError {}

/// Parses `[+-]digits[.digits]` into the integer `value * 10^precision`.
/// Trailing zeros beyond `precision` are accepted, other digits are not.
pub fn parse_scaled(s: &str, precision: usize) -> Result<i128, ParseDecimalError> {
    let s = s.trim();
    let (negative, digits) = match s.as_bytes().first() {
        None => return Err(ParseDecimalError::Empty),
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        Some(_) => (false, s),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(ParseDecimalError::Empty);
    }

    let mut scaled: i128 = 0;
    let push = |scaled: i128, c: u8| -> Result<i128, ParseDecimalError> {
        if !c.is_ascii_digit() {
            return Err(ParseDecimalError::InvalidDigit);
        }
        scaled
            .checked_mul(10)
            .and_then(|v| v.checked_add((c - b'0') as i128))
            .ok_or(ParseDecimalError::Overflow)
    };
    for c in int_part.bytes() {
        scaled = push(scaled, c)?;
    }
    let frac = frac_part.as_bytes();
    for i in 0..precision {
        scaled = push(scaled, frac.get(i).copied().unwrap_or(b'0'))?;
    }
    if let Some(rest) = frac.get(precision..) {
        if let Some(c) = rest.iter().find(|&&c| c != b'0') {
            return if c.is_ascii_digit() {
                Err(ParseDecimalError::TooPrecise { precision })
            } else {
                Err(ParseDecimalError::InvalidDigit)
            };
        }
    }
    Ok(if negative { -scaled } else { scaled })
}

/// Writes `scaled / 10^precision` without going through floating point.
pub fn fmt_scaled(f: &mut Formatter<'_>, scaled: i128, precision: usize) -> std::fmt::Result {
    let sign = if scaled < 0 { "-" } else { "" };
    let abs = scaled.unsigned_abs();
    let pow = POW_10[precision] as u128;
    if precision == 0 {
        write!(f, "{}{}", sign, abs)
    } else {
        write!(f, "{}{}.{:0width$}", sign, abs / pow, abs % pow, width = precision)
    }
}

#[macro_export]
macro_rules! add_from_impl_float {
    ($id:ident: $v:ty, $($t:ty)*) => ($(
        impl From<$t> for $id {
            /// Rounds to the nearest representable value.
            fn from(o: $t) -> Self {
                Self { v: (o as f64 * Self::PREC_POW_10).round() as $v }
            }
        }
    )*)
}

#[macro_export]
macro_rules! add_from_impl_int {
    ($id:ident: $v:ty, $($t:ty)*) => ($(
        impl From<$t> for $id {
            fn from(o: $t) -> Self {
                Self { v: (o as $v * $crate::POW_10[Self::PRECISION] as $v) }
            }
        }
    )*)
}

#[macro_export]
macro_rules! define_fpd_type {
    (name: $id:ident, type: $t:ty, precision: $prec:expr) => (
        #[derive(Default, Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
        pub struct $id { v: $t }

        impl $id {
            pub const PRECISION: usize = $prec;
            const PREC_POW_10: f64 = $crate::POW_10[$prec] as f64;
            pub const EPSILON: Self = Self { v: 1 };
            pub const MAX: Self = Self { v: <$t>::MAX };
            pub const MIN: Self = Self { v: <$t>::MIN };
            pub const ZERO: Self = Self { v: 0 };
            pub const ONE: Self = Self { v: $crate::POW_10[$prec] as $t };

            pub const fn from_i64(o: i64) -> $id { Self { v: (o * $crate::POW_10[$prec] as i64) as $t } }

            pub const fn from_raw(v: $t) -> $id { Self { v } }

            /// The underlying integer, `value * 10^PRECISION`.
            pub fn value(&self) -> $t {
                self.v
            }

            pub fn abs(&self) -> $id {
                Self { v: self.v.abs() }
            }
        }

        $crate::add_from_impl_int!($id: $t, i8 i16 i32 i64 u8 u16 u32);
        $crate::add_from_impl_float!($id: $t, f32 f64);

        impl std::ops::Add for $id {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self { v: self.v + rhs.v }
            }
        }

        impl std::ops::AddAssign for $id {
            fn add_assign(&mut self, rhs: Self) {
                self.v += rhs.v
            }
        }

        impl std::ops::Sub for $id {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self { v: self.v - rhs.v }
            }
        }

        impl std::ops::SubAssign for $id {
            fn sub_assign(&mut self, rhs: Self) {
                self.v -= rhs.v
            }
        }

        impl std::ops::Neg for $id {
            type Output = Self;
            fn neg(self) -> Self::Output { Self { v: -self.v } }
        }

        impl std::iter::Sum for $id {
            fn sum<I: Iterator<Item = $id>>(iter: I) -> $id {
                $id { v: iter.fold(0, |sum, rhs| sum + rhs.v) }
            }
        }

        impl<'a> std::iter::Sum<&'a $id> for $id {
            fn sum<I: Iterator<Item = &'a $id>>(iter: I) -> $id {
                $id { v: iter.fold(0, |sum, rhs| sum + rhs.v) }
            }
        }

        impl $crate::num_traits::Zero for $id {
            fn zero() -> Self {
                Self::ZERO
            }
            fn is_zero(&self) -> bool {
                self.v == 0
            }
        }

        impl $crate::num_traits::Bounded for $id {
            fn min_value() -> Self {
                Self::MIN
            }
            fn max_value() -> Self {
                Self::MAX
            }
        }

        impl std::str::FromStr for $id {
            type Err = $crate::ParseDecimalError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let scaled = $crate::parse_scaled(s, $prec)?;
                <$t>::try_from(scaled)
                    .map(|v| Self { v })
                    .map_err(|_| $crate::ParseDecimalError::Overflow)
            }
        }

        impl std::fmt::Display for $id {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                $crate::fmt_scaled(f, self.v as i128, $prec)
            }
        }

        impl std::fmt::Debug for $id {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(self, f)
            }
        }

        impl From<$id> for f64 {
            fn from(o: $id) -> Self {
                o.v as f64 / $id::PREC_POW_10
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use num_traits::Zero;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64;

    use super::*;

    define_fpd_type!(name: Num3, type: i64, precision: 3);

    #[test]
    fn precision() {
        define_fpd_type!(name: TestNum4, type: i64, precision: 4);
        let num: TestNum4 = 1.001.into();
        assert_eq!(num.v, 10010);

        define_fpd_type!(name: TestNum2, type: i64, precision: 2);
        let num: TestNum2 = 1.001.into();
        assert_eq!(num.v, 100);
        assert_eq!(TestNum2::from(3u8).v, 300);
    }

    #[test]
    fn parses_exactly() {
        assert_eq!("1.2".parse::<Num3>().unwrap().v, 1200);
        assert_eq!("0.5".parse::<Num3>().unwrap().v, 500);
        assert_eq!("-2.25".parse::<Num3>().unwrap().v, -2250);
        assert_eq!("+7".parse::<Num3>().unwrap().v, 7000);
        assert_eq!(".125".parse::<Num3>().unwrap().v, 125);
        assert_eq!("3.".parse::<Num3>().unwrap().v, 3000);
        assert_eq!(" 0.100000 ".parse::<Num3>().unwrap().v, 100);
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!("".parse::<Num3>(), Err(ParseDecimalError::Empty));
        assert_eq!("-.".parse::<Num3>(), Err(ParseDecimalError::Empty));
        assert_eq!("1,5".parse::<Num3>(), Err(ParseDecimalError::InvalidDigit));
        assert_eq!("1.2x".parse::<Num3>(), Err(ParseDecimalError::InvalidDigit));
        assert_eq!("1.0000x".parse::<Num3>(), Err(ParseDecimalError::InvalidDigit));
        assert_eq!(
            "0.0001".parse::<Num3>(),
            Err(ParseDecimalError::TooPrecise { precision: 3 })
        );
        assert_eq!(
            "99999999999999999999".parse::<Num3>(),
            Err(ParseDecimalError::Overflow)
        );

        define_fpd_type!(name: Small, type: i16, precision: 2);
        assert_eq!("327.67".parse::<Small>().unwrap(), Small::MAX);
        assert_eq!("327.68".parse::<Small>(), Err(ParseDecimalError::Overflow));
    }

    #[test]
    fn display() {
        assert_eq!(Num3::from_i64(3).to_string(), "3.000");
        assert_eq!("-0.05".parse::<Num3>().unwrap().to_string(), "-0.050");
        assert_eq!(format!("{:?}", Num3::from(12.5)), "12.500");
        assert_eq!(Num3::MIN.to_string(), "-9223372036854775.808");

        define_fpd_type!(name: Whole, type: i32, precision: 0);
        assert_eq!(Whole::from(-17).to_string(), "-17");
    }

    #[test]
    fn arithmetic() {
        let a: Num3 = "1.01".parse().unwrap();
        let b: Num3 = "0.95".parse().unwrap();
        assert_eq!((a + b).v, 1960);
        assert_eq!((a - b).v, 60);
        assert_eq!((-a).v, -1010);
        assert_eq!((b - a).abs(), a - b);

        let mut c = a;
        c += b;
        c -= a;
        assert_eq!(c, b);
        assert!(Num3::zero().is_zero());
        assert_eq!([a, b, a].iter().sum::<Num3>().v, 2970);
    }

    #[test]
    fn sums_do_not_depend_on_order() {
        let mut rand = Pcg64::seed_from_u64(842);
        let values: Vec<Num3> = (0..1000)
            .map(|_| Num3::from_raw(rand.gen_range(-100_000..100_000)))
            .collect();
        let forward: Num3 = values.iter().sum();
        let backward: Num3 = values.iter().rev().sum();
        assert_eq!(forward, backward);
        assert_eq!(forward.to_string().parse::<Num3>().unwrap(), forward);
    }
}
