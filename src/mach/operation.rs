use super::Val;
use crate::error;
use crate::lang::{Error, Operator};
use std::cmp::Ordering;
use std::convert::TryFrom;

type Result<T> = std::result::Result<T, Error>;

pub struct Operation {}

enum Pair {
    Integers(i64, i64),
    Floats(f64, f64),
}

fn pair(lhs: &Val, rhs: &Val) -> Result<Pair> {
    match (lhs.as_number(), rhs.as_number()) {
        (Some(Val::Integer(l)), Some(Val::Integer(r))) => Ok(Pair::Integers(l, r)),
        (Some(_), Some(_)) => Ok(Pair::Floats(f64::try_from(lhs)?, f64::try_from(rhs)?)),
        _ => Err(error!(TypeMismatch; format!(
            "CANNOT COMBINE {} AND {}",
            lhs.type_name(),
            rhs.type_name()
        ))),
    }
}

impl Operation {
    pub fn binary(op: Operator, lhs: Val, rhs: Val) -> Result<Val> {
        use Operator::*;
        match op {
            Caret => Operation::power(lhs, rhs),
            Multiply => Operation::multiply(lhs, rhs),
            Divide => Operation::divide(lhs, rhs),
            DivideInt => Operation::divide_int(lhs, rhs),
            Modulus => Operation::remainder(lhs, rhs),
            Plus => Operation::sum(lhs, rhs),
            Minus => Operation::subtract(lhs, rhs),
            Equal => Ok(Val::from(Operation::compare(&lhs, &rhs) == Some(Ordering::Equal))),
            NotEqual => Ok(Val::from(Operation::compare(&lhs, &rhs) != Some(Ordering::Equal))),
            Less => Operation::ordered(&lhs, &rhs, |o| o == Ordering::Less),
            LessEqual => Operation::ordered(&lhs, &rhs, |o| o != Ordering::Greater),
            Greater => Operation::ordered(&lhs, &rhs, |o| o == Ordering::Greater),
            GreaterEqual => Operation::ordered(&lhs, &rhs, |o| o != Ordering::Less),
            And => Ok(Val::from(lhs.is_truthy() && rhs.is_truthy())),
            Or => Ok(Val::from(lhs.is_truthy() || rhs.is_truthy())),
            Xor => Ok(Val::from(lhs.is_truthy() != rhs.is_truthy())),
            Not => Err(error!(InternalError; "NOT IS UNARY")),
        }
    }

    pub fn negate(val: Val) -> Result<Val> {
        match val.as_number() {
            Some(Val::Integer(n)) => match n.checked_neg() {
                Some(n) => Ok(Val::Integer(n)),
                None => Err(error!(Overflow)),
            },
            Some(Val::Float(n)) => Ok(Val::Float(-n)),
            _ => Err(error!(TypeMismatch; format!("CANNOT NEGATE {}", val.type_name()))),
        }
    }

    pub fn not(val: Val) -> Result<Val> {
        Ok(Val::from(!val.is_truthy()))
    }

    /// `+` joins text when either side is a string, and lists with lists.
    pub fn sum(lhs: Val, rhs: Val) -> Result<Val> {
        match (lhs, rhs) {
            (Val::String(l), r) => Ok(Val::from(format!("{}{}", l, r))),
            (l, Val::String(r)) => Ok(Val::from(format!("{}{}", l, r))),
            (Val::List(mut l), Val::List(r)) => {
                l.extend(r);
                Ok(Val::List(l))
            }
            (l, r) => match pair(&l, &r)? {
                Pair::Integers(l, r) => match l.checked_add(r) {
                    Some(n) => Ok(Val::Integer(n)),
                    None => Err(error!(Overflow)),
                },
                Pair::Floats(l, r) => Ok(Val::Float(l + r)),
            },
        }
    }

    pub fn subtract(lhs: Val, rhs: Val) -> Result<Val> {
        match pair(&lhs, &rhs)? {
            Pair::Integers(l, r) => match l.checked_sub(r) {
                Some(n) => Ok(Val::Integer(n)),
                None => Err(error!(Overflow)),
            },
            Pair::Floats(l, r) => Ok(Val::Float(l - r)),
        }
    }

    pub fn multiply(lhs: Val, rhs: Val) -> Result<Val> {
        match pair(&lhs, &rhs)? {
            Pair::Integers(l, r) => match l.checked_mul(r) {
                Some(n) => Ok(Val::Integer(n)),
                None => Err(error!(Overflow)),
            },
            Pair::Floats(l, r) => Ok(Val::Float(l * r)),
        }
    }

    /// `/` always divides as floating point.
    pub fn divide(lhs: Val, rhs: Val) -> Result<Val> {
        let (l, r) = match pair(&lhs, &rhs)? {
            Pair::Integers(l, r) => (l as f64, r as f64),
            Pair::Floats(l, r) => (l, r),
        };
        if r == 0.0 {
            return Err(error!(DivisionByZero));
        }
        Ok(Val::Float(l / r))
    }

    /// `\` rounds the quotient toward negative infinity.
    pub fn divide_int(lhs: Val, rhs: Val) -> Result<Val> {
        match pair(&lhs, &rhs)? {
            Pair::Integers(_, 0) => Err(error!(DivisionByZero)),
            Pair::Integers(l, r) => {
                let q = match l.checked_div(r) {
                    Some(q) => q,
                    None => return Err(error!(Overflow)),
                };
                if (l % r != 0) && ((l < 0) != (r < 0)) {
                    Ok(Val::Integer(q - 1))
                } else {
                    Ok(Val::Integer(q))
                }
            }
            Pair::Floats(_, r) if r == 0.0 => Err(error!(DivisionByZero)),
            Pair::Floats(l, r) => Ok(Val::whole((l / r).floor())),
        }
    }

    /// `MOD` takes the sign of the divisor.
    pub fn remainder(lhs: Val, rhs: Val) -> Result<Val> {
        match pair(&lhs, &rhs)? {
            Pair::Integers(_, 0) => Err(error!(DivisionByZero)),
            Pair::Integers(l, r) => {
                let m = match l.checked_rem(r) {
                    Some(m) => m,
                    None => 0,
                };
                if m != 0 && ((m < 0) != (r < 0)) {
                    Ok(Val::Integer(m + r))
                } else {
                    Ok(Val::Integer(m))
                }
            }
            Pair::Floats(_, r) if r == 0.0 => Err(error!(DivisionByZero)),
            Pair::Floats(l, r) => Ok(Val::Float(l - r * (l / r).floor())),
        }
    }

    pub fn power(lhs: Val, rhs: Val) -> Result<Val> {
        match pair(&lhs, &rhs)? {
            Pair::Integers(l, r) if (0..=u32::max_value() as i64).contains(&r) => {
                match l.checked_pow(r as u32) {
                    Some(n) => Ok(Val::Integer(n)),
                    None => Ok(Val::Float((l as f64).powf(r as f64))),
                }
            }
            Pair::Integers(l, r) => Ok(Val::Float((l as f64).powf(r as f64))),
            Pair::Floats(l, r) => Ok(Val::Float(l.powf(r))),
        }
    }

    /// Numbers compare numerically, text lexicographically. A number and
    /// a numeric string compare as numbers.
    pub fn compare(lhs: &Val, rhs: &Val) -> Option<Ordering> {
        match (lhs, rhs) {
            (Val::String(l), Val::String(r)) => Some(l.cmp(r)),
            (Val::List(l), Val::List(r)) => {
                if l == r {
                    Some(Ordering::Equal)
                } else {
                    None
                }
            }
            (Val::Dict(l), Val::Dict(r)) => {
                if l == r {
                    Some(Ordering::Equal)
                } else {
                    None
                }
            }
            _ => match pair(lhs, rhs) {
                Ok(Pair::Integers(l, r)) => Some(l.cmp(&r)),
                Ok(Pair::Floats(l, r)) => l.partial_cmp(&r),
                Err(_) => Some(lhs.to_string().cmp(&rhs.to_string())),
            },
        }
    }

    fn ordered(lhs: &Val, rhs: &Val, test: fn(Ordering) -> bool) -> Result<Val> {
        match Operation::compare(lhs, rhs) {
            Some(o) => Ok(Val::from(test(o))),
            None => match (lhs, rhs) {
                (Val::Float(_), _) | (_, Val::Float(_)) => Ok(Val::from(false)),
                _ => Err(error!(TypeMismatch; format!(
                    "CANNOT ORDER {} AND {}",
                    lhs.type_name(),
                    rhs.type_name()
                ))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    fn op(o: Operator, l: Val, r: Val) -> Val {
        Operation::binary(o, l, r).unwrap()
    }

    #[test]
    fn test_mixed_promotes_to_float() {
        assert_eq!(op(Operator::Plus, Val::Integer(1), Val::Float(0.5)), Val::Float(1.5));
        assert_eq!(op(Operator::Multiply, Val::Integer(3), Val::Integer(4)), Val::Integer(12));
        assert_eq!(op(Operator::Divide, Val::Integer(7), Val::Integer(2)), Val::Float(3.5));
    }

    #[test]
    fn test_string_concat_and_coercion() {
        assert_eq!(op(Operator::Plus, Val::from("n="), Val::Integer(3)), Val::from("n=3"));
        assert_eq!(op(Operator::Minus, Val::from("5"), Val::Integer(2)), Val::Integer(3));
        let e = Operation::binary(Operator::Minus, Val::from("x"), Val::Integer(2)).unwrap_err();
        assert!(e.is(ErrorCode::TypeMismatch));
    }

    #[test]
    fn test_division_by_zero() {
        for o in &[Operator::Divide, Operator::DivideInt, Operator::Modulus] {
            let e = Operation::binary(*o, Val::Integer(1), Val::Integer(0)).unwrap_err();
            assert!(e.is(ErrorCode::DivisionByZero));
        }
    }

    #[test]
    fn test_floor_division_and_modulus() {
        assert_eq!(op(Operator::DivideInt, Val::Integer(-7), Val::Integer(2)), Val::Integer(-4));
        assert_eq!(op(Operator::Modulus, Val::Integer(-7), Val::Integer(3)), Val::Integer(2));
        assert_eq!(op(Operator::Modulus, Val::Integer(7), Val::Integer(-3)), Val::Integer(-2));
    }

    #[test]
    fn test_power() {
        assert_eq!(op(Operator::Caret, Val::Integer(2), Val::Integer(10)), Val::Integer(1024));
        assert_eq!(op(Operator::Caret, Val::Integer(2), Val::Integer(-1)), Val::Float(0.5));
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(op(Operator::Less, Val::from("abc"), Val::from("abd")), Val::Integer(1));
        assert_eq!(op(Operator::Equal, Val::Integer(2), Val::Float(2.0)), Val::Integer(1));
        assert_eq!(op(Operator::Equal, Val::from("2"), Val::Integer(2)), Val::Integer(1));
        assert_eq!(op(Operator::NotEqual, Val::from("a"), Val::Integer(2)), Val::Integer(1));
        assert_eq!(op(Operator::And, Val::Integer(1), Val::from("")), Val::Integer(0));
    }
}
